//! Cell value normalization.
//!
//! Every cell read from a source passes through [`normalize()`], which turns
//! the loader's [`RawCell`] into the canonical [`Scalar`] used by the rest of
//! the crate. Numeric-looking text (currency glyphs, thousands separators and
//! percent signs included) becomes a number; anything that fails to parse is
//! kept as its trimmed text.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Serialize, Serializer};

const DECORATIONS: &[char] = &[',', '₹', '$', '%'];

/// A cell as produced by a source loader, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Empty,
    Bool(bool),
    Int(i64),
    Float(f64),
    Decimal(Decimal),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    Text(String),
}

/// Canonical cell value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Scalar {
    #[default]
    Null,
    Number(f64),
    Text(String),
}

impl Scalar {
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Numeric reading of the value, if it has one.
    ///
    /// Text goes through the same decoration stripping as normalization but
    /// accepts any finite float literal, so `"1e5"` (kept as text by the
    /// integer rule) still counts as numeric here.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Scalar::Null => None,
            Scalar::Number(n) => Some(*n),
            Scalar::Text(s) => {
                let stripped = strip_numeric_decorations(s.trim());
                if stripped.is_empty() {
                    return None;
                }
                stripped.parse::<f64>().ok().filter(|v| v.is_finite())
            }
        }
    }

    pub fn as_display(&self) -> String {
        match self {
            Scalar::Null => String::new(),
            Scalar::Number(n) => format_number(*n),
            Scalar::Text(s) => s.clone(),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::Null => serializer.serialize_none(),
            Scalar::Number(n) => serializer.serialize_f64(*n),
            Scalar::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl From<Scalar> for RawCell {
    fn from(value: Scalar) -> Self {
        match value {
            Scalar::Null => RawCell::Empty,
            Scalar::Number(n) => RawCell::Float(n),
            Scalar::Text(s) => RawCell::Text(s),
        }
    }
}

impl From<&str> for RawCell {
    fn from(value: &str) -> Self {
        RawCell::Text(value.to_string())
    }
}

pub fn normalize(raw: &RawCell) -> Scalar {
    match raw {
        RawCell::Empty => Scalar::Null,
        RawCell::Bool(b) => Scalar::Number(if *b { 1.0 } else { 0.0 }),
        RawCell::Int(i) => Scalar::Number(*i as f64),
        RawCell::Float(f) => Scalar::Number(*f),
        RawCell::Decimal(d) => match d.to_f64() {
            Some(v) => Scalar::Number(v),
            None => Scalar::Text(d.to_string()),
        },
        RawCell::Date(d) => Scalar::Text(d.format("%Y-%m-%d").to_string()),
        RawCell::Time(t) => Scalar::Text(t.format("%H:%M:%S%.f").to_string()),
        RawCell::DateTime(dt) => Scalar::Text(dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string()),
        RawCell::Text(s) => normalize_text(s),
    }
}

pub fn normalize_text(raw: &str) -> Scalar {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Scalar::Null;
    }
    let stripped = strip_numeric_decorations(trimmed);
    if stripped.is_empty() {
        return Scalar::Text(trimmed.to_string());
    }
    match parse_numeric(&stripped) {
        Some(n) => Scalar::Number(n),
        None => Scalar::Text(trimmed.to_string()),
    }
}

/// Removes thousands separators, currency glyphs and percent signs.
pub fn strip_numeric_decorations(value: &str) -> String {
    value
        .chars()
        .filter(|c| !DECORATIONS.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Parses a decoration-free numeric literal.
///
/// Literals containing a `.` are read as floats, everything else as a
/// 64-bit integer. Non-finite floats are rejected.
pub fn parse_numeric(stripped: &str) -> Option<f64> {
    if stripped.contains('.') {
        stripped.parse::<f64>().ok().filter(|v| v.is_finite())
    } else {
        stripped.parse::<i64>().ok().map(|v| v as f64)
    }
}

pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

/// Collects the ASCII digits of `value` and reads the first four as a year.
pub fn leading_year(value: &str) -> Option<i32> {
    let digits = value
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(4)
        .collect::<String>();
    if digits.len() < 4 {
        return None;
    }
    digits.parse().ok()
}
