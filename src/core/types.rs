//! Core value types that flow through field pipelines.
//!
//! Field values arrive from loosely typed sources (form posts, JSON bodies,
//! configuration files), so the pipeline works on a small dynamic [`Value`]
//! enum rather than on concrete Rust types. Filters coerce it, validators
//! inspect it, renderers print it.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Characters stripped by the default trim (space, tab, newlines, NUL, vertical tab).
pub const DEFAULT_TRIM_CHARS: &[char] = &[' ', '\t', '\n', '\r', '\0', '\x0B'];

/// Ordered choice set for select/radio fields (submitted value → label).
pub type Choices = IndexMap<String, String>;

/// Ordered HTML attribute set.
pub type Attribs = IndexMap<String, Value>;

/// A dynamically typed field value.
///
/// Deserialization is untagged so plain JSON/TOML documents map directly
/// onto values: `null`, booleans, integers, floats, strings, arrays and
/// objects.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Value {
    /// Absence of a value
    #[default]
    Null,
    /// Boolean value
    Boolean(bool),
    /// 64-bit signed integer
    Integer(i64),
    /// 64-bit floating point number
    Float(f64),
    /// UTF-8 string
    String(String),
    /// Ordered list of values
    List(Vec<Value>),
    /// Ordered key-value map
    Map(IndexMap<String, Value>),
}

/// Discriminant of a [`Value`], used in messages and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Null,
    Boolean,
    Integer,
    Float,
    String,
    List,
    Map,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Boolean => "boolean",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::List => "list",
            ValueKind::Map => "map",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Value Implementation
// ============================================================================

impl Value {
    /// Get the kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Integer(_) => ValueKind::Integer,
            Value::Float(_) => ValueKind::Float,
            Value::String(_) => ValueKind::String,
            Value::List(_) => ValueKind::List,
            Value::Map(_) => ValueKind::Map,
        }
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if this value is a scalar (not a list or map).
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Value::List(_) | Value::Map(_))
    }

    /// Try to get this value as an integer.
    pub fn as_integer(&self) -> Option<i64> {
        if let Value::Integer(i) = self {
            Some(*i)
        } else {
            None
        }
    }

    /// Try to get this value as a float.
    /// Integers are automatically converted to floats.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        if let Value::String(s) = self {
            Some(s)
        } else {
            None
        }
    }

    /// Try to get this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        if let Value::Boolean(b) = self {
            Some(*b)
        } else {
            None
        }
    }

    /// Try to get this value as a list reference.
    pub fn as_list(&self) -> Option<&Vec<Value>> {
        if let Value::List(items) = self {
            Some(items)
        } else {
            None
        }
    }

    /// Try to get this value as a map reference.
    pub fn as_map(&self) -> Option<&IndexMap<String, Value>> {
        if let Value::Map(map) = self {
            Some(map)
        } else {
            None
        }
    }

    /// Whether this value counts as "no input".
    ///
    /// Numeric zero and the string `"0"` are never blank. Everything else is
    /// blank when its trimmed text is empty: null, `false`, empty or
    /// whitespace-only strings, empty lists and maps.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Boolean(b) => !b,
            Value::Integer(_) | Value::Float(_) => false,
            Value::String(s) => s.trim_matches(DEFAULT_TRIM_CHARS).is_empty(),
            Value::List(items) => items.is_empty(),
            Value::Map(map) => map.is_empty(),
        }
    }

    /// Boolean interpretation of the value.
    ///
    /// `""`, `"0"`, `0`, `0.0`, `false`, null and empty containers are false.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Boolean(b) => *b,
            Value::Integer(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::String(s) => !s.is_empty() && s != "0",
            Value::List(items) => !items.is_empty(),
            Value::Map(map) => !map.is_empty(),
        }
    }

    /// Text form of the value, as printed into markup and messages.
    pub fn to_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Boolean(true) => "1".to_string(),
            Value::Boolean(false) => String::new(),
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => format_float(*f),
            Value::String(s) => s.clone(),
            Value::List(items) => items.iter().map(Value::to_text).collect::<Vec<_>>().join(","),
            Value::Map(map) => map.values().map(Value::to_text).collect::<Vec<_>>().join(","),
        }
    }

    /// Integer coercion.
    ///
    /// Strings contribute their leading integer prefix (`"12abc"` → 12,
    /// `"abc"` → 0, `" 7"` → 7, `"3.9"` → 3); floats truncate toward zero;
    /// containers are 1 when non-empty.
    pub fn to_integer(&self) -> i64 {
        match self {
            Value::Null => 0,
            Value::Boolean(b) => i64::from(*b),
            Value::Integer(i) => *i,
            Value::Float(f) => {
                if f.is_finite() {
                    f.trunc() as i64
                } else {
                    0
                }
            }
            Value::String(s) => leading_integer(s),
            Value::List(items) => i64::from(!items.is_empty()),
            Value::Map(map) => i64::from(!map.is_empty()),
        }
    }

    /// Numeric view of the value: integers, floats and numeric strings.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::String(s) => parse_numeric(s),
            _ => None,
        }
    }

    /// Loose ordering used by the comparison validators.
    ///
    /// Two numeric values (including numeric strings) compare as numbers;
    /// anything else compares by its text form. Two integers compare
    /// exactly.
    pub fn loose_cmp(&self, other: &Value) -> Option<Ordering> {
        if let (Value::Integer(a), Value::Integer(b)) = (self, other) {
            return Some(a.cmp(b));
        }
        match (self.as_number(), other.as_number()) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => Some(self.to_text().cmp(&other.to_text())),
        }
    }

    /// Loose equality: `"5" == 5`, `null == ""`, `true == "yes"`.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Null, v) | (v, Value::Null) => match v {
                Value::String(s) => s.is_empty(),
                Value::Integer(_) | Value::Float(_) | Value::Boolean(_) => !v.is_truthy(),
                Value::List(items) => items.is_empty(),
                Value::Map(map) => map.is_empty(),
                Value::Null => true,
            },
            (Value::Boolean(b), v) | (v, Value::Boolean(b)) => *b == v.is_truthy(),
            (Value::List(a), Value::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.loose_eq(y))
            }
            _ => self.loose_cmp(other) == Some(Ordering::Equal),
        }
    }
}

/// Format a float the way it is shown to users: no trailing `.0`.
fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        format!("{}", f)
    }
}

/// Parse the leading integer of a string, after leading whitespace.
fn leading_integer(s: &str) -> i64 {
    let s = s.trim_start_matches(DEFAULT_TRIM_CHARS);
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut result: i64 = 0;
    for byte in digits.bytes().take_while(u8::is_ascii_digit) {
        let digit = i64::from(byte - b'0');
        result = match result.checked_mul(10).and_then(|r| {
            if negative {
                r.checked_sub(digit)
            } else {
                r.checked_add(digit)
            }
        }) {
            Some(r) => r,
            None => return if negative { i64::MIN } else { i64::MAX },
        };
    }
    result
}

/// Parse a numeric string: optional sign, digits, optional fraction and exponent.
fn parse_numeric(s: &str) -> Option<f64> {
    let trimmed = s.trim_matches(DEFAULT_TRIM_CHARS);
    if trimmed.is_empty() {
        return None;
    }
    let well_formed = trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'));
    if !well_formed || !trimmed.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Value::Integer(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(value: IndexMap<String, Value>) -> Self {
        Value::Map(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_is_not_blank() {
        assert!(!Value::Integer(0).is_blank());
        assert!(!Value::Float(0.0).is_blank());
        assert!(!Value::from("0").is_blank());
    }

    #[test]
    fn test_blank_values() {
        assert!(Value::Null.is_blank());
        assert!(Value::from("").is_blank());
        assert!(Value::from("  \t\n").is_blank());
        assert!(Value::Boolean(false).is_blank());
        assert!(Value::List(vec![]).is_blank());
        assert!(!Value::from(" a ").is_blank());
        assert!(!Value::Boolean(true).is_blank());
    }

    #[test]
    fn test_integer_coercion() {
        assert_eq!(Value::from("12abc").to_integer(), 12);
        assert_eq!(Value::from("abc").to_integer(), 0);
        assert_eq!(Value::from("  -7").to_integer(), -7);
        assert_eq!(Value::from("3.9").to_integer(), 3);
        assert_eq!(Value::Float(-2.7).to_integer(), -2);
        assert_eq!(Value::Boolean(true).to_integer(), 1);
        assert_eq!(Value::Null.to_integer(), 0);
        assert_eq!(Value::from("99999999999999999999").to_integer(), i64::MAX);
    }

    #[test]
    fn test_text_form() {
        assert_eq!(Value::Float(1.0).to_text(), "1");
        assert_eq!(Value::Float(1.5).to_text(), "1.5");
        assert_eq!(Value::Boolean(false).to_text(), "");
        assert_eq!(Value::Null.to_text(), "");
        assert_eq!(
            Value::List(vec![Value::from(1), Value::from("b")]).to_text(),
            "1,b"
        );
    }

    #[test]
    fn test_loose_comparison() {
        assert_eq!(Value::from("10").loose_cmp(&Value::from(9)), Some(Ordering::Greater));
        assert_eq!(Value::from(2).loose_cmp(&Value::Float(2.0)), Some(Ordering::Equal));
        assert_eq!(Value::from("abc").loose_cmp(&Value::from("abd")), Some(Ordering::Less));

        let big = Value::from(9_007_199_254_740_993i64);
        let below = Value::from(9_007_199_254_740_992i64);
        assert_eq!(below.loose_cmp(&big), Some(Ordering::Less));
        assert!(!below.loose_eq(&big));
        assert!(Value::from("5").loose_eq(&Value::from(5)));
        assert!(Value::Null.loose_eq(&Value::from("")));
        assert!(!Value::Null.loose_eq(&Value::from("0")));
        assert!(Value::Boolean(true).loose_eq(&Value::from("yes")));
        assert!(!Value::from("a").loose_eq(&Value::from("b")));
    }

    #[test]
    fn test_numeric_strings() {
        assert_eq!(Value::from(" 4.5 ").as_number(), Some(4.5));
        assert_eq!(Value::from("inf").as_number(), None);
        assert_eq!(Value::from("-").as_number(), None);
        assert_eq!(Value::from("1e3").as_number(), Some(1000.0));
    }

    #[test]
    fn test_untagged_deserialization() {
        let value: Value = serde_json::from_str(r#"{"a": [1, 2.5, "x", null, true]}"#).unwrap();
        let map = value.as_map().unwrap();
        let items = map["a"].as_list().unwrap();
        assert_eq!(items[0], Value::Integer(1));
        assert_eq!(items[1], Value::Float(2.5));
        assert_eq!(items[2], Value::from("x"));
        assert_eq!(items[3], Value::Null);
        assert_eq!(items[4], Value::Boolean(true));
    }
}
