/// Modbus read function selected by a request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FunctionCode {
    /// Read Coils (0x01)
    Coil,
    /// Read Discrete Inputs (0x02)
    DiscreteInput,
    /// Read Input Registers (0x04)
    InputRegister,
    /// Read Holding Registers (0x03)
    HoldingRegister,
}

/// Type of the values decoded from the raw read buffer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataType {
    /// single coil or discrete input
    Bit,
    /// signed 8-bit integer, two per register
    Int8,
    /// unsigned 8-bit integer, two per register
    UInt8,
    /// signed 16-bit integer
    Int16,
    /// unsigned 16-bit integer
    UInt16,
    /// signed 32-bit integer
    Int32,
    /// unsigned 32-bit integer
    UInt32,
    /// IEEE-754 single precision
    Float32,
    /// unsigned 64-bit integer
    UInt64,
    /// IEEE-754 double precision
    Float64,
}

/// Byte and register order used to assemble values from 16-bit registers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endianness {
    /// big-endian
    Be,
    /// little-endian
    Le,
    /// big-endian bytes with the register order swapped (Modicon mid-endian)
    ModiconBe,
    /// little-endian bytes with the register order swapped
    ModiconLe,
}

impl FunctionCode {
    /// Map the numeric item value onto a function. The value is the Modbus function code.
    pub fn from_item_value(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Coil),
            2 => Some(Self::DiscreteInput),
            3 => Some(Self::HoldingRegister),
            4 => Some(Self::InputRegister),
            _ => None,
        }
    }

    /// True for the two functions that operate on single bits
    pub fn is_bit_access(self) -> bool {
        match self {
            Self::Coil | Self::DiscreteInput => true,
            Self::InputRegister | Self::HoldingRegister => false,
        }
    }
}

impl DataType {
    /// Look up a type by its item name. Matching is case-sensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "bit" => Some(Self::Bit),
            "int8" => Some(Self::Int8),
            "uint8" => Some(Self::UInt8),
            "int16" => Some(Self::Int16),
            "uint16" => Some(Self::UInt16),
            "int32" => Some(Self::Int32),
            "uint32" => Some(Self::UInt32),
            "float" => Some(Self::Float32),
            "uint64" => Some(Self::UInt64),
            "double" => Some(Self::Float64),
            _ => None,
        }
    }

    /// The item name of the type
    pub fn name(self) -> &'static str {
        match self {
            Self::Bit => "bit",
            Self::Int8 => "int8",
            Self::UInt8 => "uint8",
            Self::Int16 => "int16",
            Self::UInt16 => "uint16",
            Self::Int32 => "int32",
            Self::UInt32 => "uint32",
            Self::Float32 => "float",
            Self::UInt64 => "uint64",
            Self::Float64 => "double",
        }
    }

    /// True if the type is read with a register function rather than a bit function
    pub fn is_register_type(self) -> bool {
        !matches!(self, Self::Bit)
    }

    /// Number of registers (or bit positions for [`DataType::Bit`]) holding `count` values.
    /// 8-bit values are packed two per register.
    pub(crate) fn registers_for(self, count: usize) -> usize {
        match self {
            Self::Bit | Self::Int16 | Self::UInt16 => count,
            Self::Int8 | Self::UInt8 => count.div_ceil(2),
            Self::Int32 | Self::UInt32 | Self::Float32 => count * 2,
            Self::UInt64 | Self::Float64 => count * 4,
        }
    }
}

impl Endianness {
    /// Look up an endianness by its item name. Matching is case-insensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "be" => Some(Self::Be),
            "le" => Some(Self::Le),
            "mbe" => Some(Self::ModiconBe),
            "mle" => Some(Self::ModiconLe),
            _ => None,
        }
    }

    /// Check whether this order may be used with `data_type`
    pub fn supports(self, data_type: DataType) -> bool {
        match self {
            Self::Be => true,
            Self::Le => data_type != DataType::Bit,
            Self::ModiconBe | Self::ModiconLe => match data_type {
                DataType::Bit
                | DataType::Int8
                | DataType::UInt8
                | DataType::Int16
                | DataType::UInt16 => false,
                DataType::Int32
                | DataType::UInt32
                | DataType::Float32
                | DataType::UInt64
                | DataType::Float64 => true,
            },
        }
    }
}

impl std::fmt::Display for FunctionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Coil => f.write_str("READ COILS"),
            Self::DiscreteInput => f.write_str("READ DISCRETE INPUTS"),
            Self::InputRegister => f.write_str("READ INPUT REGISTERS"),
            Self::HoldingRegister => f.write_str("READ HOLDING REGISTERS"),
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::fmt::Display for Endianness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Be => f.write_str("be"),
            Self::Le => f.write_str("le"),
            Self::ModiconBe => f.write_str("mbe"),
            Self::ModiconLe => f.write_str("mle"),
        }
    }
}
