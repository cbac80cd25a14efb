//! Amount type for handling the text amounts that the capture forms store.
//!
//! Amounts are persisted exactly as the user typed them. Arithmetic happens on a parsed `f64`
//! that follows the lenient prefix parsing of JavaScript's `parseFloat`, because that is how
//! existing stores were always interpreted: `"12abc"` is `12` and `"abc"` is not a number.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fmt::{Display, Formatter};

/// Represents an amount of Indonesian Rupiah as it was entered.
///
/// Equality is on the stored text, so for numeric comparisons you should use `value` or
/// `value_or_zero`.
///
/// # Examples
///
/// ```
/// # use kantong::model::Amount;
/// let amount = Amount::new("1000000");
/// assert_eq!(amount.value(), Some(1_000_000.0));
/// assert_eq!(amount.to_string(), "Rp 1.000.000,00");
///
/// let junk = Amount::new("abc");
/// assert_eq!(junk.value(), None);
/// assert_eq!(junk.value_or_zero(), 0.0);
/// assert_eq!(junk.to_string(), "Rp 0,00");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Amount {
    raw: String,
}

impl Amount {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// The text exactly as stored.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The parsed numeric value, or `None` if the text does not start with a number.
    pub fn value(&self) -> Option<f64> {
        parse_float(&self.raw)
    }

    /// The parsed numeric value, with anything non-numeric counting as zero.
    pub fn value_or_zero(&self) -> f64 {
        self.value().unwrap_or(0.0)
    }

    /// Returns true if there is nothing but whitespace in the stored text.
    pub fn is_blank(&self) -> bool {
        self.raw.trim().is_empty()
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_idr(self.value_or_zero()))
    }
}

impl From<&str> for Amount {
    fn from(value: &str) -> Self {
        Amount::new(value)
    }
}

impl From<String> for Amount {
    fn from(value: String) -> Self {
        Amount::new(value)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Stores written by hand sometimes carry bare numbers, which parseFloat also accepted.
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(s) => Ok(Amount::new(s)),
            serde_json::Value::Number(n) => Ok(Amount::new(n.to_string())),
            serde_json::Value::Null => Ok(Amount::default()),
            other => Err(serde::de::Error::custom(format!(
                "expected the amount to be a string or a number, found {other}"
            ))),
        }
    }
}

/// Parses the longest numeric prefix of `s` after leading whitespace, the same way JavaScript's
/// `parseFloat` does. Returns `None` where `parseFloat` would return `NaN`.
pub fn parse_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let negative = bytes.first() == Some(&b'-');
    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));

    if s[end..].starts_with("Infinity") {
        return Some(if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let mut frac_end = end + 1;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        let frac_digits = frac_end - (end + 1);
        if digits + frac_digits > 0 {
            end = frac_end;
            digits += frac_digits;
        }
    }

    if digits == 0 {
        return None;
    }

    // An exponent only counts if it has at least one digit, "5e" parses as 5.
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

/// Formats `value` as Rupiah the way the `id-ID` locale does: `.` groups thousands and `,`
/// separates the two decimal places, e.g. `Rp 1.250.000,00` or `-Rp 5.000,50`.
pub fn format_idr(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let grouped = format_num::format_num!(",.2", value.abs());
    let localized: String = grouped
        .chars()
        .map(|c| match c {
            ',' => '.',
            '.' => ',',
            c => c,
        })
        .collect();
    format!("{sign}Rp {localized}")
}
