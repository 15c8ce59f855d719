pub(crate) mod defaults {
    /// TCP port used when the endpoint omits one
    pub(crate) const TCP_PORT: u16 = 502;
    /// baud rate used when the serial endpoint omits one
    pub(crate) const BAUD_RATE: u32 = 115_200;
    /// data bits used when the serial endpoint omits the DPS suffix
    pub(crate) const DATA_BITS: u8 = 8;
    /// stop bits used when the serial endpoint omits the DPS suffix
    pub(crate) const STOP_BITS: u8 = 1;
    /// slave id used for TCP when none is given
    pub(crate) const TCP_SLAVE_ID: u8 = 255;
    /// slave id used for RTU when none is given
    pub(crate) const RTU_SLAVE_ID: u8 = 1;
    /// default response timeout in seconds
    pub(crate) const TIMEOUT_SECS: u64 = 3;
}

pub(crate) mod limits {
    /// highest address a request may touch
    pub(crate) const ADDRESS_MAX: u32 = 0xFFFF;
    /// maximum number of item parameters
    pub(crate) const MAX_PARAMS: usize = 8;
    /// valid slave ids on a serial line
    pub(crate) const RTU_SLAVE_ID: std::ops::RangeInclusive<u64> = 1..=247;
    /// valid unit ids over TCP
    pub(crate) const TCP_SLAVE_ID: std::ops::RangeInclusive<u64> = 0..=255;
    /// serial data bits
    pub(crate) const DATA_BITS: std::ops::RangeInclusive<u8> = 5..=8;
    /// serial stop bits
    pub(crate) const STOP_BITS: std::ops::RangeInclusive<u8> = 1..=2;
}

pub(crate) mod modicon {
    use std::ops::RangeInclusive;

    /// legacy address ranges of each table, the first value maps to address 0
    pub(crate) const COILS: RangeInclusive<u16> = 1..=9999;
    pub(crate) const DISCRETE_INPUTS: RangeInclusive<u16> = 10001..=19999;
    pub(crate) const INPUT_REGISTERS: RangeInclusive<u16> = 30001..=39999;
    pub(crate) const HOLDING_REGISTERS: RangeInclusive<u16> = 40001..=49999;
}

/// number of bit positions covered by one register of offset
pub(crate) const BITS_PER_REGISTER: u32 = 16;
