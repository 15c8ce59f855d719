use crate::decode::{DecodedValue, Number};
use crate::error::InternalError;
use crate::types::DataType;

/// Result handed back to the agent
#[derive(Clone, Debug, PartialEq)]
pub enum ItemValue {
    /// a single unsigned value
    UInt64(u64),
    /// a single signed or floating point value
    Double(f64),
    /// a list of values, `[v0,v1,...]`
    Text(String),
}

/// Render decoded values as a scalar (one value) or a bracketed list (several values)
pub fn format_values(values: &[DecodedValue]) -> Result<ItemValue, InternalError> {
    match values {
        [] => Err(InternalError::InsufficientData {
            expected: 1,
            actual: 0,
        }),
        [single] => Ok(match single.value {
            Number::Unsigned(value) => ItemValue::UInt64(value),
            Number::Real(value) => ItemValue::Double(value),
        }),
        values => {
            let mut list = String::from("[");
            for (i, value) in values.iter().enumerate() {
                if i != 0 {
                    list.push(',');
                }
                list.push_str(&element(value)?);
            }
            list.push(']');
            Ok(ItemValue::Text(list))
        }
    }
}

fn element(value: &DecodedValue) -> Result<String, InternalError> {
    match (value.data_type, value.value) {
        (DataType::Float32, Number::Real(x)) => Ok(fixed(x)),
        (DataType::Float64, Number::Real(x)) => Ok(general(x)),
        (DataType::Int8 | DataType::Int16 | DataType::Int32, Number::Real(x)) => {
            Ok((x as i64).to_string())
        }
        (
            DataType::Bit
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64,
            Number::Unsigned(x),
        ) => Ok(x.to_string()),
        (data_type, _) => Err(InternalError::UnexpectedDataType(data_type)),
    }
}

fn non_finite(value: f64) -> Option<&'static str> {
    if value.is_nan() {
        Some("nan")
    } else if value.is_infinite() {
        Some(if value.is_sign_negative() { "-inf" } else { "inf" })
    } else {
        None
    }
}

/// Six fractional digits, like printf `%f`
pub(crate) fn fixed(value: f64) -> String {
    match non_finite(value) {
        Some(text) => text.to_owned(),
        None => format!("{value:.6}"),
    }
}

/// Six significant digits with trailing zeros removed, like printf `%g`
pub(crate) fn general(value: f64) -> String {
    const PRECISION: i32 = 6;

    if let Some(text) = non_finite(value) {
        return text.to_owned();
    }

    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_owned();
    }

    // the exponent after rounding to the requested precision decides the notation
    let scientific = format!("{:.*e}", (PRECISION - 1) as usize, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return scientific;
    };

    if !(-4..PRECISION).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{sign}{:02}",
            trim_fraction(mantissa),
            exponent.unsigned_abs()
        )
    } else {
        let decimals = (PRECISION - 1 - exponent) as usize;
        trim_fraction(&format!("{value:.decimals$}")).to_owned()
    }
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

impl std::fmt::Display for ItemValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemValue::UInt64(value) => write!(f, "{value}"),
            ItemValue::Double(value) => f.write_str(&fixed(*value)),
            ItemValue::Text(text) => f.write_str(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unsigned(data_type: DataType, value: u64) -> DecodedValue {
        DecodedValue {
            data_type,
            value: Number::Unsigned(value),
        }
    }

    fn real(data_type: DataType, value: f64) -> DecodedValue {
        DecodedValue {
            data_type,
            value: Number::Real(value),
        }
    }

    #[test]
    fn single_values_are_scalars() {
        assert_eq!(
            format_values(&[unsigned(DataType::UInt16, 7)]),
            Ok(ItemValue::UInt64(7))
        );
        assert_eq!(
            format_values(&[real(DataType::Int16, -7.0)]),
            Ok(ItemValue::Double(-7.0))
        );
        assert_eq!(
            format_values(&[real(DataType::Float32, 0.5)]),
            Ok(ItemValue::Double(0.5))
        );
    }

    #[test]
    fn lists_have_no_spaces_or_trailing_comma() {
        assert_eq!(
            format_values(&[unsigned(DataType::UInt16, 1), unsigned(DataType::UInt16, 2)]),
            Ok(ItemValue::Text("[1,2]".to_owned()))
        );
    }

    #[test]
    fn signed_list_elements_are_integers() {
        assert_eq!(
            format_values(&[real(DataType::Int32, -5.0), real(DataType::Int8, 3.0)]),
            Ok(ItemValue::Text("[-5,3]".to_owned()))
        );
    }

    #[test]
    fn float_list_elements_use_six_decimals() {
        assert_eq!(
            format_values(&[real(DataType::Float32, 1.5), real(DataType::Float32, -0.25)]),
            Ok(ItemValue::Text("[1.500000,-0.250000]".to_owned()))
        );
    }

    #[test]
    fn double_list_elements_use_general_format() {
        assert_eq!(
            format_values(&[real(DataType::Float64, 1.5), real(DataType::Float64, 1e-7)]),
            Ok(ItemValue::Text("[1.5,1e-07]".to_owned()))
        );
    }

    #[test]
    fn general_format_matches_printf() {
        assert_eq!(general(0.0), "0");
        assert_eq!(general(100000.0), "100000");
        assert_eq!(general(1000000.0), "1e+06");
        assert_eq!(general(123456789.0), "1.23457e+08");
        assert_eq!(general(0.0001), "0.0001");
        assert_eq!(general(0.00001), "1e-05");
        assert_eq!(general(999999.0), "999999");
        assert_eq!(general(0.00001234), "1.234e-05");
        assert_eq!(general(-2.5), "-2.5");
        assert_eq!(general(3.14159265), "3.14159");
        assert_eq!(general(9999999.0), "1e+07");
        assert_eq!(general(f64::NAN), "nan");
        assert_eq!(general(f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn fixed_format_matches_printf() {
        assert_eq!(fixed(2.0), "2.000000");
        assert_eq!(fixed(-0.1234567), "-0.123457");
        assert_eq!(fixed(f64::INFINITY), "inf");
    }

    #[test]
    fn unsigned_number_for_signed_type_is_an_internal_error() {
        assert_eq!(
            format_values(&[unsigned(DataType::Int16, 1), unsigned(DataType::Int16, 2)]),
            Err(InternalError::UnexpectedDataType(DataType::Int16))
        );
    }

    #[test]
    fn mismatched_number_is_an_internal_error() {
        assert_eq!(
            format_values(&[unsigned(DataType::Float32, 1), unsigned(DataType::Float32, 2)]),
            Err(InternalError::UnexpectedDataType(DataType::Float32))
        );
    }

    #[test]
    fn displays_item_values() {
        assert_eq!(ItemValue::UInt64(42).to_string(), "42");
        assert_eq!(ItemValue::Double(-1.5).to_string(), "-1.500000");
        assert_eq!(ItemValue::Text("[1,2]".to_owned()).to_string(), "[1,2]");
    }
}
