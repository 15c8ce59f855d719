use crate::endpoint::EndpointError;
use crate::types::DataType;

/// Item parameter following the endpoint
///
/// Endpoint failures are reported through [`Error::Endpoint`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Param {
    /// slave (unit) id
    SlaveId,
    /// function code 1-4
    Function,
    /// start address
    Address,
    /// count of values
    Count,
    /// data type name
    DataType,
    /// endianness name
    Endianness,
    /// number of registers to skip
    Offset,
}

impl Param {
    /// ordinal word used in user facing messages
    pub fn ordinal(self) -> &'static str {
        match self {
            Param::SlaveId => "second",
            Param::Function => "third",
            Param::Address => "fourth",
            Param::Count => "fifth",
            Param::DataType => "sixth",
            Param::Endianness => "seventh",
            Param::Offset => "eighth",
        }
    }
}

/// Errors detected while validating the item parameters, before any I/O takes place
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParameterError {
    /// more than 8 parameters were supplied
    #[error("Too many parameters.")]
    TooManyParameters,
    /// no parameters were supplied
    #[error("Invalid number of parameters.")]
    InvalidParameterCount,
    /// a parameter could not be parsed or is out of range
    #[error("Invalid {} parameter.", .0.ordinal())]
    Invalid(Param),
    /// a Modicon style address outside the four known ranges
    #[error("Unsupported address for the specified function.")]
    UnsupportedAddress,
    /// bit type with a register function or vice versa
    #[error("Unsupported data type for the specified function.")]
    UnsupportedDataType,
    /// byte order that cannot be applied to the data type
    #[error("Unsupported endianness for the specified data type.")]
    UnsupportedEndianness,
    /// the request would run past the end of the address space
    #[error("Invalid total count.")]
    InvalidTotalCount,
}

/// Errors reported by the transport while connecting or reading
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// the connection or serial port could not be established
    #[error("connection failed: {0}")]
    Connect(String),
    /// no connection was established before the timeout elapsed
    #[error("connection timed out")]
    ConnectTimeout,
    /// the device did not answer within the response timeout
    #[error("response timeout")]
    ResponseTimeout,
    /// the read request failed
    #[error("read failed: {0}")]
    Read(String),
}

/// Conditions that validation should make impossible
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InternalError {
    /// the data type cannot be decoded from the buffer that was read
    #[error("unexpected data type {0}")]
    UnexpectedDataType(DataType),
    /// the buffer returned by the transport is shorter than required
    #[error("insufficient data, expected {expected} values but received {actual}")]
    InsufficientData {
        /// number of registers or bits the decode needs
        expected: usize,
        /// number of registers or bits that were received
        actual: usize,
    },
}

/// Top level error of a single item request
///
/// The `Display` output of each variant is the message reported back to the agent.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// bad parameter
    #[error(transparent)]
    Parameter(#[from] ParameterError),
    /// malformed endpoint string
    #[error("Invalid first parameter.")]
    Endpoint(#[source] EndpointError),
    /// connect or read failure
    #[error("Cannot read modbus data: {0}.")]
    Transport(#[from] TransportError),
    /// decode failure that should be unreachable
    #[error("Cannot read modbus data: internal error: {0}.")]
    Internal(#[from] InternalError),
}

impl From<EndpointError> for Error {
    fn from(err: EndpointError) -> Self {
        Error::Endpoint(err)
    }
}
