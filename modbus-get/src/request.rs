use crate::constants::{defaults, limits, modicon};
use crate::endpoint::Endpoint;
use crate::error::{Error, Param, ParameterError};
use crate::parse;
use crate::span;
use crate::types::{DataType, Endianness, FunctionCode};

/// A fully validated read request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadRequest {
    /// target device
    pub endpoint: Endpoint,
    /// slave (unit) id
    pub slave_id: u8,
    /// read function
    pub function: FunctionCode,
    /// zero based start address within the function's table
    pub address: u16,
    /// number of values to decode
    pub count: u16,
    /// type of each value
    pub data_type: DataType,
    /// byte and register order
    pub endianness: Endianness,
    /// number of registers skipped at the front of the read
    pub offset: u16,
}

impl ReadRequest {
    /// Validate and default the positional item parameters
    ///
    /// `endpoint, [slave_id], [function], [address], [count], [data_type], [endianness], [offset]`
    ///
    /// Missing and empty parameters take their defaults. Checks run in parameter order and the
    /// first failure is returned.
    pub fn from_params<S: AsRef<str>>(params: &[S]) -> Result<Self, Error> {
        if params.len() > limits::MAX_PARAMS {
            return Err(ParameterError::TooManyParameters.into());
        }
        if params.is_empty() {
            return Err(ParameterError::InvalidParameterCount.into());
        }

        let endpoint = match Endpoint::parse(params[0].as_ref()) {
            Ok(endpoint) => endpoint,
            Err(err) => {
                tracing::debug!("rejected endpoint '{}': {err}", params[0].as_ref());
                return Err(err.into());
            }
        };

        let slave_id = parse_slave_id(param(params, 1), &endpoint)?;

        let function = match param(params, 2) {
            None => None,
            Some(text) => Some(
                parse::decimal(text)
                    .and_then(|value| u8::try_from(value).ok())
                    .and_then(FunctionCode::from_item_value)
                    .ok_or(ParameterError::Invalid(Param::Function))?,
            ),
        };

        let (function, address) = match param(params, 3) {
            None => (function.unwrap_or(FunctionCode::Coil), 0),
            Some(text) => {
                let address =
                    parse::decimal_u16(text).ok_or(ParameterError::Invalid(Param::Address))?;
                match function {
                    Some(function) => (function, address),
                    None => infer_function(address)?,
                }
            }
        };

        let count = match param(params, 4) {
            None => 1,
            Some(text) => parse::decimal_u16(text)
                .filter(|count| *count != 0)
                .ok_or(ParameterError::Invalid(Param::Count))?,
        };

        let data_type = match param(params, 5) {
            None if function.is_bit_access() => DataType::Bit,
            None => DataType::UInt16,
            Some(text) => {
                let data_type =
                    DataType::from_name(text).ok_or(ParameterError::Invalid(Param::DataType))?;
                if data_type.is_register_type() == function.is_bit_access() {
                    return Err(ParameterError::UnsupportedDataType.into());
                }
                data_type
            }
        };

        let endianness = match param(params, 6) {
            None => Endianness::Be,
            Some(text) => {
                Endianness::from_name(text).ok_or(ParameterError::Invalid(Param::Endianness))?
            }
        };

        if !endianness.supports(data_type) {
            return Err(ParameterError::UnsupportedEndianness.into());
        }

        let offset = match param(params, 7) {
            None => 0,
            Some(text) => parse::decimal_u16(text).ok_or(ParameterError::Invalid(Param::Offset))?,
        };

        if !span::fits_address_space(address, count, offset, data_type)
            || span::read_span(count, offset, data_type) > u32::from(u16::MAX)
        {
            return Err(ParameterError::InvalidTotalCount.into());
        }

        let request = Self {
            endpoint,
            slave_id,
            function,
            address,
            count,
            data_type,
            endianness,
            offset,
        };

        tracing::debug!("normalized request: {request}");

        Ok(request)
    }

    /// Number of bits or registers requested from the transport
    pub fn read_span(&self) -> u16 {
        // bounded to u16 during validation
        span::read_span(self.count, self.offset, self.data_type) as u16
    }
}

impl std::fmt::Display for ReadRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} slave: {} {} start: {:#06X} qty: {} type: {} order: {} offset: {}",
            self.endpoint,
            self.slave_id,
            self.function,
            self.address,
            self.count,
            self.data_type,
            self.endianness,
            self.offset
        )
    }
}

/// a parameter that is missing or empty is absent
fn param<S: AsRef<str>>(params: &[S], index: usize) -> Option<&str> {
    params
        .get(index)
        .map(|text| text.as_ref())
        .filter(|text| !text.is_empty())
}

fn parse_slave_id(text: Option<&str>, endpoint: &Endpoint) -> Result<u8, ParameterError> {
    let (default, range) = if endpoint.is_serial() {
        (defaults::RTU_SLAVE_ID, limits::RTU_SLAVE_ID)
    } else {
        (defaults::TCP_SLAVE_ID, limits::TCP_SLAVE_ID)
    };

    match text {
        None => Ok(default),
        Some(text) => parse::decimal_in(text, range)
            .and_then(|value| u8::try_from(value).ok())
            .ok_or(ParameterError::Invalid(Param::SlaveId)),
    }
}

/// Resolve the function from a legacy Modicon address and make the address zero based
fn infer_function(address: u16) -> Result<(FunctionCode, u16), ParameterError> {
    let tables = [
        (modicon::COILS, FunctionCode::Coil),
        (modicon::DISCRETE_INPUTS, FunctionCode::DiscreteInput),
        (modicon::INPUT_REGISTERS, FunctionCode::InputRegister),
        (modicon::HOLDING_REGISTERS, FunctionCode::HoldingRegister),
    ];

    tables
        .into_iter()
        .find(|(range, _)| range.contains(&address))
        .map(|(range, function)| (function, address - range.start()))
        .ok_or(ParameterError::UnsupportedAddress)
}
