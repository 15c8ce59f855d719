use crate::constants::BITS_PER_REGISTER;
use crate::error::InternalError;
use crate::request::ReadRequest;
use crate::types::{DataType, Endianness};

/// Raw data returned by the transport
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RawData {
    /// one element per coil or discrete input, each `0` or `1`
    Bits(Vec<u8>),
    /// 16-bit registers in the order they were read
    Registers(Vec<u16>),
}

/// Numeric representation of a decoded value
///
/// Unsigned types use [`Number::Unsigned`]; signed integers and floating point types share
/// [`Number::Real`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    /// unsigned integer
    Unsigned(u64),
    /// signed integer or floating point value
    Real(f64),
}

/// A value tagged with the type it was decoded as
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecodedValue {
    /// type of the value
    pub data_type: DataType,
    /// the value
    pub value: Number,
}

impl DecodedValue {
    fn unsigned(data_type: DataType, value: u64) -> Self {
        Self {
            data_type,
            value: Number::Unsigned(value),
        }
    }

    fn real(data_type: DataType, value: f64) -> Self {
        Self {
            data_type,
            value: Number::Real(value),
        }
    }
}

/// Decode the data read for `request`
pub fn decode(raw: &RawData, request: &ReadRequest) -> Result<Vec<DecodedValue>, InternalError> {
    decode_values(
        raw,
        request.offset,
        request.count,
        request.data_type,
        request.endianness,
    )
}

/// Decode `count` values of `data_type` after skipping `offset` registers
pub fn decode_values(
    raw: &RawData,
    offset: u16,
    count: u16,
    data_type: DataType,
    endianness: Endianness,
) -> Result<Vec<DecodedValue>, InternalError> {
    let count = usize::from(count);

    match (raw, data_type) {
        (RawData::Bits(bits), DataType::Bit) => decode_bits(bits, offset, count),
        (RawData::Registers(registers), data_type) if data_type.is_register_type() => {
            let registers = registers
                .get(usize::from(offset)..)
                .ok_or(InternalError::InsufficientData {
                    expected: usize::from(offset),
                    actual: registers.len(),
                })?;
            decode_registers(registers, count, data_type, endianness)
        }
        _ => Err(InternalError::UnexpectedDataType(data_type)),
    }
}

fn decode_bits(bits: &[u8], offset: u16, count: usize) -> Result<Vec<DecodedValue>, InternalError> {
    let start = usize::from(offset) * BITS_PER_REGISTER as usize;
    let values = bits
        .get(start..start + count)
        .ok_or(InternalError::InsufficientData {
            expected: start + count,
            actual: bits.len(),
        })?;

    Ok(values
        .iter()
        .map(|bit| DecodedValue::unsigned(DataType::Bit, u64::from(*bit)))
        .collect())
}

fn decode_registers(
    registers: &[u16],
    count: usize,
    data_type: DataType,
    endianness: Endianness,
) -> Result<Vec<DecodedValue>, InternalError> {
    let required = data_type.registers_for(count);

    if registers.len() < required {
        return Err(InternalError::InsufficientData {
            expected: required,
            actual: registers.len(),
        });
    }

    let values = match data_type {
        DataType::UInt8 => unpack_bytes(registers, count, endianness)
            .map(|byte| DecodedValue::unsigned(data_type, u64::from(byte)))
            .collect(),
        DataType::Int8 => unpack_bytes(registers, count, endianness)
            .map(|byte| DecodedValue::real(data_type, f64::from(byte as i8)))
            .collect(),
        DataType::UInt16 => registers[..count]
            .iter()
            .map(|reg| DecodedValue::unsigned(data_type, u64::from(read_u16(*reg, endianness))))
            .collect(),
        DataType::Int16 => registers[..count]
            .iter()
            .map(|reg| DecodedValue::real(data_type, f64::from(read_u16(*reg, endianness) as i16)))
            .collect(),
        DataType::UInt32 => registers
            .chunks_exact(2)
            .take(count)
            .map(|regs| DecodedValue::unsigned(data_type, u64::from(read_u32(regs, endianness))))
            .collect(),
        DataType::Int32 => registers
            .chunks_exact(2)
            .take(count)
            .map(|regs| DecodedValue::real(data_type, f64::from(read_u32(regs, endianness) as i32)))
            .collect(),
        DataType::Float32 => registers
            .chunks_exact(2)
            .take(count)
            .map(|regs| {
                let value = f32::from_bits(read_u32(regs, endianness));
                DecodedValue::real(data_type, f64::from(value))
            })
            .collect(),
        DataType::UInt64 => registers
            .chunks_exact(4)
            .take(count)
            .map(|regs| DecodedValue::unsigned(data_type, read_u64(regs, endianness)))
            .collect(),
        DataType::Float64 => registers
            .chunks_exact(4)
            .take(count)
            .map(|regs| DecodedValue::real(data_type, f64::from_bits(read_u64(regs, endianness))))
            .collect(),
        DataType::Bit => return Err(InternalError::UnexpectedDataType(data_type)),
    };

    Ok(values)
}

/// Byte swapped under little-endian, taken as-is otherwise
fn read_u16(register: u16, endianness: Endianness) -> u16 {
    match endianness {
        Endianness::Le => register.swap_bytes(),
        Endianness::Be | Endianness::ModiconBe | Endianness::ModiconLe => register,
    }
}

/// Assemble consecutive registers into one value
///
/// With registers `[AB, CD]` the byte sequences are: BE `ABCD`, LE `DCBA`, Modicon BE `CDAB`,
/// Modicon LE `BADC`. Four registers follow the same pattern.
fn assemble(registers: &[u16], endianness: Endianness) -> u64 {
    let push = |acc: u64, reg: u16| (acc << 16) | u64::from(reg);
    match endianness {
        Endianness::Be => registers.iter().fold(0, |acc, reg| push(acc, *reg)),
        Endianness::Le => registers
            .iter()
            .rev()
            .fold(0, |acc, reg| push(acc, reg.swap_bytes())),
        Endianness::ModiconBe => registers.iter().rev().fold(0, |acc, reg| push(acc, *reg)),
        Endianness::ModiconLe => registers
            .iter()
            .fold(0, |acc, reg| push(acc, reg.swap_bytes())),
    }
}

fn read_u32(registers: &[u16], endianness: Endianness) -> u32 {
    // two registers never exceed 32 bits
    assemble(registers, endianness) as u32
}

fn read_u64(registers: &[u16], endianness: Endianness) -> u64 {
    assemble(registers, endianness)
}

/// Iterates over 8-bit values packed two per register
///
/// The first value of each register is the "most" byte (high byte under BE, low byte
/// otherwise), the second is the other byte. An odd count stops after the "most" byte of the
/// last register.
struct PackedBytes<'a> {
    registers: &'a [u16],
    endianness: Endianness,
    cursor: usize,
    emitted: usize,
    remaining: usize,
}

fn unpack_bytes(registers: &[u16], count: usize, endianness: Endianness) -> PackedBytes<'_> {
    PackedBytes {
        registers,
        endianness,
        cursor: 0,
        emitted: 0,
        remaining: count,
    }
}

impl PackedBytes<'_> {
    fn split(&self, register: u16) -> (u8, u8) {
        let [high, low] = register.to_be_bytes();
        match self.endianness {
            Endianness::Be => (high, low),
            Endianness::Le | Endianness::ModiconBe | Endianness::ModiconLe => (low, high),
        }
    }
}

impl Iterator for PackedBytes<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let register = *self.registers.get(self.cursor)?;
        let (most, less) = self.split(register);

        let value = if self.emitted % 2 == 0 {
            most
        } else {
            self.cursor += 1;
            less
        };

        self.emitted += 1;
        self.remaining -= 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registers(values: &[u16]) -> RawData {
        RawData::Registers(values.to_vec())
    }

    fn numbers(values: Vec<DecodedValue>) -> Vec<Number> {
        values.into_iter().map(|x| x.value).collect()
    }

    fn decode_u32(regs: &[u16], endianness: Endianness) -> u32 {
        let values = numbers(
            decode_values(&registers(regs), 0, 1, DataType::UInt32, endianness).unwrap(),
        );
        match values.as_slice() {
            [Number::Unsigned(x)] => u32::try_from(*x).unwrap(),
            other => panic!("unexpected values: {other:?}"),
        }
    }

    fn swap_bytes_within_registers(value: u32) -> u32 {
        ((value & 0x00FF_00FF) << 8) | ((value & 0xFF00_FF00) >> 8)
    }

    #[test]
    fn decodes_bits_after_register_offset() {
        let mut bits = vec![0u8; 16];
        bits.extend_from_slice(&[1, 0, 1]);
        let values =
            decode_values(&RawData::Bits(bits), 1, 3, DataType::Bit, Endianness::Be).unwrap();
        assert_eq!(
            numbers(values),
            vec![
                Number::Unsigned(1),
                Number::Unsigned(0),
                Number::Unsigned(1)
            ]
        );
    }

    #[test]
    fn packed_bytes_emit_exactly_count_values() {
        let raw = registers(&[0x0102, 0x0304]);
        let values = decode_values(&raw, 0, 3, DataType::UInt8, Endianness::Be).unwrap();
        assert_eq!(
            numbers(values),
            vec![
                Number::Unsigned(1),
                Number::Unsigned(2),
                Number::Unsigned(3)
            ]
        );
    }

    #[test]
    fn packed_bytes_even_count_consumes_whole_registers() {
        let raw = registers(&[0x0102, 0x0304]);
        let values = decode_values(&raw, 0, 4, DataType::UInt8, Endianness::Le).unwrap();
        assert_eq!(
            numbers(values),
            vec![
                Number::Unsigned(2),
                Number::Unsigned(1),
                Number::Unsigned(4),
                Number::Unsigned(3)
            ]
        );
    }

    #[test]
    fn packed_bytes_odd_count_uses_most_byte_of_last_register() {
        let bytes: Vec<u8> = unpack_bytes(&[0xAABB], 1, Endianness::Be).collect();
        assert_eq!(bytes, vec![0xAA]);
        let bytes: Vec<u8> = unpack_bytes(&[0xAABB], 1, Endianness::Le).collect();
        assert_eq!(bytes, vec![0xBB]);
        let bytes: Vec<u8> = unpack_bytes(&[0x1122, 0x3344, 0x5566], 5, Endianness::Be).collect();
        assert_eq!(bytes, vec![0x11, 0x22, 0x33, 0x44, 0x55]);
    }

    #[test]
    fn int8_is_sign_extended() {
        let raw = registers(&[0xFF7F]);
        let values = decode_values(&raw, 0, 2, DataType::Int8, Endianness::Be).unwrap();
        assert_eq!(
            numbers(values),
            vec![Number::Real(-1.0), Number::Real(127.0)]
        );
    }

    #[test]
    fn sixteen_bit_values_swap_only_for_little_endian() {
        let raw = registers(&[0x1234, 0xFFFE]);
        assert_eq!(
            numbers(decode_values(&raw, 0, 2, DataType::UInt16, Endianness::Be).unwrap()),
            vec![Number::Unsigned(0x1234), Number::Unsigned(0xFFFE)]
        );
        assert_eq!(
            numbers(decode_values(&raw, 0, 2, DataType::UInt16, Endianness::Le).unwrap()),
            vec![Number::Unsigned(0x3412), Number::Unsigned(0xFEFF)]
        );
        assert_eq!(
            numbers(decode_values(&raw, 1, 1, DataType::Int16, Endianness::Be).unwrap()),
            vec![Number::Real(-2.0)]
        );
    }

    #[test]
    fn thirty_two_bit_orders() {
        let regs = [0x0102, 0x0304];
        assert_eq!(decode_u32(&regs, Endianness::Be), 0x0102_0304);
        assert_eq!(decode_u32(&regs, Endianness::Le), 0x0403_0201);
        assert_eq!(decode_u32(&regs, Endianness::ModiconBe), 0x0304_0102);
        assert_eq!(decode_u32(&regs, Endianness::ModiconLe), 0x0201_0403);
    }

    #[test]
    fn thirty_two_bit_orders_are_related() {
        let regs = [0xA1B2, 0xC3D4];
        let be = decode_u32(&regs, Endianness::Be);
        let le = decode_u32(&regs, Endianness::Le);
        let mbe = decode_u32(&regs, Endianness::ModiconBe);
        let mle = decode_u32(&regs, Endianness::ModiconLe);

        // full byte reversal
        assert_eq!(be.swap_bytes(), le);
        // Modicon orders swap the register positions
        assert_eq!(be.rotate_left(16), mbe);
        assert_eq!(le.rotate_left(16), mle);
        // Modicon LE is BE with the bytes of each register reversed
        assert_eq!(swap_bytes_within_registers(be), mle);
        assert_eq!(swap_bytes_within_registers(mbe), le);
    }

    #[test]
    fn sixty_four_bit_orders() {
        let raw = registers(&[0x0102, 0x0304, 0x0506, 0x0708]);
        let decode = |endianness| {
            numbers(decode_values(&raw, 0, 1, DataType::UInt64, endianness).unwrap())
        };
        assert_eq!(
            decode(Endianness::Be),
            vec![Number::Unsigned(0x0102_0304_0506_0708)]
        );
        assert_eq!(
            decode(Endianness::Le),
            vec![Number::Unsigned(0x0807_0605_0403_0201)]
        );
        assert_eq!(
            decode(Endianness::ModiconBe),
            vec![Number::Unsigned(0x0708_0506_0304_0102)]
        );
        assert_eq!(
            decode(Endianness::ModiconLe),
            vec![Number::Unsigned(0x0201_0403_0605_0807)]
        );
    }

    #[test]
    fn signed_thirty_two_bit() {
        let raw = registers(&[0xFFFF, 0xFFFE]);
        assert_eq!(
            numbers(decode_values(&raw, 0, 1, DataType::Int32, Endianness::Be).unwrap()),
            vec![Number::Real(-2.0)]
        );
    }

    #[test]
    fn floats_reinterpret_bit_patterns() {
        // 1.5f32 == 0x3FC00000
        let raw = registers(&[0x3FC0, 0x0000, 0x0000, 0xC020]);
        assert_eq!(
            numbers(decode_values(&raw, 0, 1, DataType::Float32, Endianness::Be).unwrap()),
            vec![Number::Real(1.5)]
        );
        // -2.5f32 == 0xC0200000 in Modicon order
        assert_eq!(
            numbers(decode_values(&raw, 2, 1, DataType::Float32, Endianness::ModiconBe).unwrap()),
            vec![Number::Real(-2.5)]
        );
        // 1.0f64 == 0x3FF0000000000000
        let raw = registers(&[0x3FF0, 0, 0, 0]);
        assert_eq!(
            numbers(decode_values(&raw, 0, 1, DataType::Float64, Endianness::Be).unwrap()),
            vec![Number::Real(1.0)]
        );
    }

    #[test]
    fn double_lists_advance_four_registers_per_value() {
        let raw = registers(&[0x3FF0, 0, 0, 0, 0x4000, 0, 0, 0]);
        assert_eq!(
            numbers(decode_values(&raw, 0, 2, DataType::Float64, Endianness::Be).unwrap()),
            vec![Number::Real(1.0), Number::Real(2.0)]
        );
    }

    #[test]
    fn offset_skips_registers() {
        let raw = registers(&[0xDEAD, 0xBEEF, 0x0001]);
        assert_eq!(
            numbers(decode_values(&raw, 2, 1, DataType::UInt16, Endianness::Be).unwrap()),
            vec![Number::Unsigned(1)]
        );
    }

    #[test]
    fn short_buffers_are_reported() {
        let raw = registers(&[0x0001]);
        assert_eq!(
            decode_values(&raw, 0, 1, DataType::UInt32, Endianness::Be),
            Err(InternalError::InsufficientData {
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(
            decode_values(&RawData::Bits(vec![1]), 1, 1, DataType::Bit, Endianness::Be),
            Err(InternalError::InsufficientData {
                expected: 17,
                actual: 1
            })
        );
    }

    #[test]
    fn mismatched_buffer_and_type_is_an_internal_error() {
        assert_eq!(
            decode_values(&RawData::Bits(vec![1]), 0, 1, DataType::UInt16, Endianness::Be),
            Err(InternalError::UnexpectedDataType(DataType::UInt16))
        );
        assert_eq!(
            decode_values(&registers(&[1]), 0, 1, DataType::Bit, Endianness::Be),
            Err(InternalError::UnexpectedDataType(DataType::Bit))
        );
    }

    #[test]
    fn decoding_is_repeatable() {
        let raw = registers(&[0x1234, 0x5678, 0x9ABC, 0xDEF0]);
        let first = decode_values(&raw, 0, 2, DataType::Float32, Endianness::ModiconLe);
        let second = decode_values(&raw, 0, 2, DataType::Float32, Endianness::ModiconLe);
        assert_eq!(first, second);
    }
}
