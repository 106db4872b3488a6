//! Locale-independent floating-point token recognition
//!
//! Two separate questions are answered here. [`parse_number`] converts a
//! token with `strtod`-like prefix semantics and reports whether the whole
//! token was used. [`is_number`] only classifies a token by its character
//! shape and is used to tell a surplus number apart from garbage.
//!
//! Conversion goes through `core`'s `f64` parser, which always treats `.`
//! as the decimal separator and never consults any process-wide locale.

/// Result of converting one token
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedNumber {
    /// Value of the longest numeric prefix (0.0 if there is none)
    pub value: f64,
    /// Whether the prefix covered the entire token
    pub fully_consumed: bool,
}

/// Check whether a token has the shape of a floating-point literal
///
/// Grammar: `[+-]? digit* ('.' digit*)? ([eE] [+-]? digit*)?`. The decimal
/// point may only appear before the exponent marker, and the exponent sign
/// only directly after the marker.
pub fn is_number(token: &str) -> bool {
    let bytes = token.as_bytes();
    let mut k = match bytes.first() {
        Some(b'+') | Some(b'-') => 1,
        _ => 0,
    };

    let mut found_dec = false;
    let mut found_exp = false;
    let mut found_exp_sign = false;

    while k < bytes.len() {
        match bytes[k] {
            b'0'..=b'9' => {}
            b'.' if !found_dec && !found_exp => found_dec = true,
            b'e' | b'E' if !found_exp => found_exp = true,
            b'+' | b'-' if found_exp && !found_exp_sign && matches!(bytes[k - 1], b'e' | b'E') => {
                found_exp_sign = true
            }
            _ => return false,
        }
        k += 1;
    }
    true
}

/// Convert a token to `f64`, reporting trailing garbage
pub fn parse_number(token: &str) -> ParsedNumber {
    let len = float_prefix_len(token.as_bytes());
    if len == 0 {
        return ParsedNumber {
            value: 0.0,
            fully_consumed: false,
        };
    }

    match token[..len].parse::<f64>() {
        Ok(value) => ParsedNumber {
            value,
            fully_consumed: len == token.len(),
        },
        Err(_) => ParsedNumber {
            value: 0.0,
            fully_consumed: false,
        },
    }
}

/// Length of the longest prefix of `bytes` that forms a valid float
fn float_prefix_len(bytes: &[u8]) -> usize {
    let mut k = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        k = 1;
    }

    if let Some(special) = special_value_len(&bytes[k..]) {
        return k + special;
    }

    let int_digits = count_digits(&bytes[k..]);
    k += int_digits;

    let mut frac_digits = 0;
    if bytes.get(k) == Some(&b'.') {
        frac_digits = count_digits(&bytes[k + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            k += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return 0;
    }

    // The exponent only counts if at least one digit follows it
    if matches!(bytes.get(k), Some(b'e') | Some(b'E')) {
        let mut e = k + 1;
        if matches!(bytes.get(e), Some(b'+') | Some(b'-')) {
            e += 1;
        }
        let exp_digits = count_digits(&bytes[e.min(bytes.len())..]);
        if exp_digits > 0 {
            k = e + exp_digits;
        }
    }

    k
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Length of a leading `inf`, `infinity` or `nan`, case-insensitive
fn special_value_len(bytes: &[u8]) -> Option<usize> {
    const WORDS: [&[u8]; 3] = [b"infinity", b"inf", b"nan"];
    WORDS
        .iter()
        .find(|word| bytes.len() >= word.len() && bytes[..word.len()].eq_ignore_ascii_case(word))
        .map(|word| word.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_number_accepts_literals() {
        for token in ["1", "-2", "+3.5", "0.25", ".5", "5.", "1e5", "1E-5", "2.5e+10", "-", "e5"] {
            assert!(is_number(token), "{token} should be a number");
        }
    }

    #[test]
    fn test_is_number_rejects_garbage() {
        for token in ["abc", "1.2.3", "1e5e6", "1e+-5", "1-5", "1.5e5.1", "1,5", "0x10", "1e5+"] {
            assert!(!is_number(token), "{token} should not be a number");
        }
    }

    #[test]
    fn test_parse_number_full() {
        assert_eq!(
            parse_number("3.14"),
            ParsedNumber {
                value: 3.14,
                fully_consumed: true
            }
        );
        assert_eq!(parse_number("-1e-3").value, -1e-3);
        assert_eq!(parse_number("+.5").value, 0.5);
        assert_eq!(parse_number("7.").value, 7.0);
        assert!(parse_number("1E+2").fully_consumed);
    }

    #[test]
    fn test_parse_number_partial() {
        let parsed = parse_number("12abc");
        assert_eq!(parsed.value, 12.0);
        assert!(!parsed.fully_consumed);

        // Dangling exponent is not part of the number
        let parsed = parse_number("1e");
        assert_eq!(parsed.value, 1.0);
        assert!(!parsed.fully_consumed);

        let parsed = parse_number("1,5");
        assert_eq!(parsed.value, 1.0);
        assert!(!parsed.fully_consumed);
    }

    #[test]
    fn test_parse_number_no_prefix() {
        for token in ["", "abc", ".", "-", "e5"] {
            let parsed = parse_number(token);
            assert_eq!(parsed.value, 0.0);
            assert!(!parsed.fully_consumed, "{token}");
        }
    }

    #[test]
    fn test_parse_number_special_values() {
        assert_eq!(parse_number("inf").value, f64::INFINITY);
        assert_eq!(parse_number("-Infinity").value, f64::NEG_INFINITY);
        assert!(parse_number("NaN").value.is_nan());
        assert!(parse_number("NaN").fully_consumed);
    }

    #[test]
    fn test_decimal_point_is_always_dot() {
        // A comma is never taken as the decimal separator
        assert_eq!(parse_number("3.14").value, 3.14);
        assert_eq!(parse_number("3,14").value, 3.0);
    }
}
