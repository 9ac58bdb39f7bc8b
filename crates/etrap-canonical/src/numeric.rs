use base64::{engine::general_purpose::STANDARD, Engine as _};
use num_bigint::BigInt;

/// A decoded byte string is only treated as a numeric if it's within a
/// plausible width for the DECIMAL/NUMERIC encodings real CDC producers
/// emit. Outside this range (or on decode failure) the original string
/// is kept untouched — this is the one place the spec leaves to
/// judgment (§4.1), recorded in DESIGN.md.
const MAX_PLAUSIBLE_BYTES: usize = 32;

/// §4.1: if `value` decodes as base64, interpret the bytes as a signed
/// big-endian two's-complement integer and return its decimal string.
/// Returns `None` if the string isn't valid base64, decodes to nothing,
/// or decodes to something implausibly wide to be a numeric column.
pub fn decode_base64_integer(value: &str) -> Option<String> {
    let bytes = STANDARD.decode(value).ok()?;
    if bytes.is_empty() || bytes.len() > MAX_PLAUSIBLE_BYTES {
        return None;
    }
    Some(BigInt::from_signed_bytes_be(&bytes).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_small_positive_integer() {
        // 3 bytes, big-endian two's complement.
        assert_eq!(decode_base64_integer("D0JA").as_deref(), Some("1000000"));
    }

    #[test]
    fn decodes_negative_integer() {
        // 0xFF 0xFF 0xFF 0xFF => -1 in two's complement.
        let encoded = STANDARD.encode([0xFFu8, 0xFF, 0xFF, 0xFF]);
        assert_eq!(decode_base64_integer(&encoded).as_deref(), Some("-1"));
    }

    #[test]
    fn rejects_non_base64_decimal_literal() {
        assert_eq!(decode_base64_integer("999.99"), None);
    }

    #[test]
    fn rejects_empty_decode() {
        assert_eq!(decode_base64_integer(""), None);
    }
}
