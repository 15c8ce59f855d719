use std::ops::RangeInclusive;

/// Parse an unsigned decimal number made only of ASCII digits.
///
/// Signs, whitespace and radix prefixes are rejected, as is anything that overflows `u64`.
pub(crate) fn decimal(text: &str) -> Option<u64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Parse a decimal number and require it to lie within `range`
pub(crate) fn decimal_in(text: &str, range: RangeInclusive<u64>) -> Option<u64> {
    decimal(text).filter(|value| range.contains(value))
}

/// Parse a decimal 16-bit unsigned value
pub(crate) fn decimal_u16(text: &str) -> Option<u16> {
    decimal(text).and_then(|value| u16::try_from(value).ok())
}
