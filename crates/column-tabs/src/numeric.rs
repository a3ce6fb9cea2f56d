//! Numeric token scanning for decimal-point alignment.
//!
//! Only ASCII digits and the separators `'.'` and `','` are recognized. No grouping characters
//! are interpreted, so `"1,234"` reads as `1.234`.

use std::sync::LazyLock;

use regex::bytes::Regex;

static DIGIT_LED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([+-]?)([0-9]+)(?:([.,])([0-9]*))?").expect("digit-led numeric pattern")
});

static SEPARATOR_LED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([+-]?)[.,]([0-9]+)").expect("separator-led numeric pattern"));

/// The first number found inside a field.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericToken {
    /// Byte offset of the token start (the sign, if any) within the scanned text.
    pub start: usize,
    /// Byte offset just past the token.
    pub end: usize,
    /// A `'+'` or `'-'` immediately precedes the digits.
    pub has_sign: bool,
    /// A decimal separator was found.
    pub has_decimal: bool,
    /// Number of digits before the separator.
    pub int_digits: usize,
    /// Canonical form: `'.'` separator, implicit leading `0`, no trailing bare separator.
    pub normalized: String,
    /// Parsed value.
    pub value: f64,
    /// The token is usable; when `false` every other field is meaningless.
    pub ok: bool,
}

impl NumericToken {
    fn invalid() -> Self {
        Self {
            start: 0,
            end: 0,
            has_sign: false,
            has_decimal: false,
            int_digits: 0,
            normalized: String::new(),
            value: 0.0,
            ok: false,
        }
    }
}

/// Find the first numeric token in `text` (already trimmed of surrounding whitespace).
///
/// A digit-led token (`[sign] DIGITS [sep DIGITS?]`) and a separator-led token
/// (`[sign] sep DIGITS`) are both considered; whichever starts first wins, with the digit-led
/// form preferred on a tie.
pub fn parse_numeric(text: &[u8]) -> NumericToken {
    let digit_led = DIGIT_LED.captures(text);
    let separator_led = SEPARATOR_LED.captures(text);

    let digit_start = digit_led.as_ref().and_then(|c| c.get(0)).map(|m| m.start());
    let separator_start = separator_led.as_ref().and_then(|c| c.get(0)).map(|m| m.start());

    let use_separator_led = match (digit_start, separator_start) {
        (Some(d), Some(s)) => s < d,
        (None, Some(_)) => true,
        _ => false,
    };

    let (whole, sign, int_part, separator, frac_part) = if use_separator_led {
        let Some(caps) = separator_led else {
            return NumericToken::invalid();
        };
        let (Some(whole), Some(frac)) = (caps.get(0), caps.get(2)) else {
            return NumericToken::invalid();
        };
        let sign = caps.get(1).map(|m| m.as_bytes()).unwrap_or_default();
        (whole, sign, &b""[..], true, frac.as_bytes())
    } else {
        let Some(caps) = digit_led else {
            return NumericToken::invalid();
        };
        let (Some(whole), Some(int_part)) = (caps.get(0), caps.get(2)) else {
            return NumericToken::invalid();
        };
        let sign = caps.get(1).map(|m| m.as_bytes()).unwrap_or_default();
        let separator = caps.get(3).is_some();
        let frac = caps.get(4).map(|m| m.as_bytes()).unwrap_or_default();
        (whole, sign, int_part.as_bytes(), separator, frac)
    };

    let mut normalized = String::with_capacity(whole.len() + 1);
    if sign == b"-" {
        normalized.push('-');
    }
    if int_part.is_empty() {
        normalized.push('0');
    } else {
        normalized.extend(int_part.iter().map(|&b| b as char));
    }
    if !frac_part.is_empty() {
        normalized.push('.');
        normalized.extend(frac_part.iter().map(|&b| b as char));
    }

    let Ok(value) = normalized.parse::<f64>() else {
        return NumericToken::invalid();
    };

    NumericToken {
        start: whole.start(),
        end: whole.end(),
        has_sign: !sign.is_empty(),
        has_decimal: separator,
        int_digits: int_part.len(),
        normalized,
        value,
        ok: true,
    }
}

/// Strip leading and trailing spaces/tabs, returning the offset of the first kept byte.
pub fn trim_field(field: &[u8]) -> (usize, &[u8]) {
    let is_ws = |b: &u8| *b == b' ' || *b == b'\t';
    let Some(first) = field.iter().position(|b| !is_ws(b)) else {
        return (field.len(), &field[field.len()..]);
    };
    let last = field.iter().rposition(|b| !is_ws(b)).unwrap_or(first);
    (first, &field[first..=last])
}
