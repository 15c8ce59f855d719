//! Sizes of the address range touched by a request.
//!
//! Two independent quantities are computed. [`total_span_bound`] is a byte-oriented figure that is
//! only used to reject requests running past the end of the address space. [`read_span`] is the
//! number of bits or registers actually requested from the device.

use crate::constants::{limits, BITS_PER_REGISTER};
use crate::types::DataType;

/// Bound used for the address range check
///
/// For [`DataType::Bit`] this keeps the legacy approximation `(count - 1) / 9 + offset * 2`.
pub fn total_span_bound(count: u16, offset: u16, data_type: DataType) -> u32 {
    let count = u32::from(count);
    let values = match data_type {
        DataType::Bit => count.saturating_sub(1) / 9,
        DataType::Int8 | DataType::UInt8 => count,
        DataType::Int16 | DataType::UInt16 => count * 2,
        DataType::Int32 | DataType::UInt32 | DataType::Float32 => count * 4,
        DataType::UInt64 | DataType::Float64 => count * 8,
    };
    values + u32::from(offset) * 2
}

/// Check that `address + total_span_bound` stays within the 16-bit address space
pub fn fits_address_space(address: u16, count: u16, offset: u16, data_type: DataType) -> bool {
    u32::from(address) + total_span_bound(count, offset, data_type) <= limits::ADDRESS_MAX
}

/// Number of bit positions (for [`DataType::Bit`]) or registers to read from the device
///
/// For bits the offset is counted in whole registers of 16 bits. For every other type this is
/// the span bound rounded up to whole registers.
pub fn read_span(count: u16, offset: u16, data_type: DataType) -> u32 {
    match data_type {
        DataType::Bit => u32::from(count) + u32::from(offset) * BITS_PER_REGISTER,
        _ => total_span_bound(count, offset, data_type).div_ceil(2),
    }
}
