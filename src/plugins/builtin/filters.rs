//! Built-in filters.
//!
//! Every filter is idempotent and leaves values it does not understand
//! untouched.

use super::{flag, primary};
use crate::core::plugin::Filter;
use crate::core::types::{Value, DEFAULT_TRIM_CHARS};
use crate::plugins::kinds::FilterKind;
use crate::plugins::registry::TypeRegistry;

/// Register built-in filters.
pub fn register(registry: &mut TypeRegistry<FilterKind>) {
    registry.register(StringTrim::TYPE_NAME, "Trims characters from both ends of text", |options| {
        Ok(Box::new(StringTrim::from_options(options)))
    });
    registry.register(Int::TYPE_NAME, "Coerces scalars to integers", |_| Ok(Box::new(Int)));
    registry.register(StringToLower::TYPE_NAME, "Lower-cases text", |_| {
        Ok(Box::new(StringToLower))
    });
    registry.register(StringToUpper::TYPE_NAME, "Upper-cases text", |_| {
        Ok(Box::new(StringToUpper))
    });
    registry.register(Digits::TYPE_NAME, "Keeps digits only", |_| Ok(Box::new(Digits)));
    registry.register(Alnum::TYPE_NAME, "Keeps letters and digits only", |options| {
        Ok(Box::new(Alnum {
            allow_white_space: flag(options, "allowWhiteSpace"),
        }))
    });
    registry.register(StripNewlines::TYPE_NAME, "Removes line breaks", |_| {
        Ok(Box::new(StripNewlines))
    });
    registry.register(Null::TYPE_NAME, "Turns blank values into null", |_| Ok(Box::new(Null)));
}

/// Apply a text transformation to strings only.
fn map_text(value: Value, f: impl FnOnce(&str) -> String) -> Value {
    match value {
        Value::String(s) => Value::String(f(&s)),
        other => other,
    }
}

/// Trims a character set from both ends of strings.
#[derive(Debug, Clone)]
pub struct StringTrim {
    charlist: Option<Vec<char>>,
}

impl StringTrim {
    /// Canonical type name.
    pub const TYPE_NAME: &'static str = "filter::StringTrim";

    /// Trim the default whitespace set.
    pub fn new() -> Self {
        Self { charlist: None }
    }

    /// Trim a custom character set.
    pub fn with_charlist(charlist: &str) -> Self {
        Self {
            charlist: Some(charlist.chars().collect()),
        }
    }

    fn from_options(options: Option<&Value>) -> Self {
        match primary(options, "charlist") {
            Some(Value::String(chars)) if !chars.is_empty() => Self::with_charlist(chars),
            _ => Self::new(),
        }
    }
}

impl Default for StringTrim {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for StringTrim {
    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn filter(&self, value: Value) -> Value {
        let chars: &[char] = self.charlist.as_deref().unwrap_or(DEFAULT_TRIM_CHARS);
        map_text(value, |s| s.trim_matches(chars).to_string())
    }
}

/// Coerces scalars to integers (`"12abc"` → `12`, null → `0`). Lists and maps are left alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct Int;

impl Int {
    /// Canonical type name.
    pub const TYPE_NAME: &'static str = "filter::Int";
}

impl Filter for Int {
    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn filter(&self, value: Value) -> Value {
        match value {
            Value::List(_) | Value::Map(_) => value,
            scalar => Value::Integer(scalar.to_integer()),
        }
    }
}

/// Lower-cases strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringToLower;

impl StringToLower {
    /// Canonical type name.
    pub const TYPE_NAME: &'static str = "filter::StringToLower";
}

impl Filter for StringToLower {
    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn filter(&self, value: Value) -> Value {
        map_text(value, str::to_lowercase)
    }
}

/// Upper-cases strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringToUpper;

impl StringToUpper {
    /// Canonical type name.
    pub const TYPE_NAME: &'static str = "filter::StringToUpper";
}

impl Filter for StringToUpper {
    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn filter(&self, value: Value) -> Value {
        map_text(value, str::to_uppercase)
    }
}

/// Keeps only ASCII digits. Numbers become digit strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct Digits;

impl Digits {
    /// Canonical type name.
    pub const TYPE_NAME: &'static str = "filter::Digits";
}

impl Filter for Digits {
    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn filter(&self, value: Value) -> Value {
        match value {
            Value::String(_) | Value::Integer(_) | Value::Float(_) => Value::String(
                value.to_text().chars().filter(char::is_ascii_digit).collect(),
            ),
            other => other,
        }
    }
}

/// Keeps only letters and digits, optionally whitespace too.
#[derive(Debug, Clone, Copy, Default)]
pub struct Alnum {
    allow_white_space: bool,
}

impl Alnum {
    /// Canonical type name.
    pub const TYPE_NAME: &'static str = "filter::Alnum";
}

impl Filter for Alnum {
    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn filter(&self, value: Value) -> Value {
        let allow_white_space = self.allow_white_space;
        map_text(value, |s| {
            s.chars()
                .filter(|c| c.is_alphanumeric() || (allow_white_space && c.is_whitespace()))
                .collect()
        })
    }
}

/// Removes `\r` and `\n` from strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct StripNewlines;

impl StripNewlines {
    /// Canonical type name.
    pub const TYPE_NAME: &'static str = "filter::StripNewlines";
}

impl Filter for StripNewlines {
    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn filter(&self, value: Value) -> Value {
        map_text(value, |s| s.chars().filter(|c| !matches!(c, '\r' | '\n')).collect())
    }
}

/// Turns blank values into null; zero is kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct Null;

impl Null {
    /// Canonical type name.
    pub const TYPE_NAME: &'static str = "filter::Null";
}

impl Filter for Null {
    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn filter(&self, value: Value) -> Value {
        if value.is_blank() {
            Value::Null
        } else {
            value
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_trim() {
        let trim = StringTrim::new();
        assert_eq!(trim.filter(Value::from("  hi \n")), Value::from("hi"));
        assert_eq!(trim.filter(Value::from(5)), Value::from(5));

        let custom = StringTrim::from_options(Some(&Value::from("-")));
        assert_eq!(custom.filter(Value::from("--a-b--")), Value::from("a-b"));
    }

    #[test]
    fn test_int() {
        assert_eq!(Int.filter(Value::from("12abc")), Value::from(12));
        assert_eq!(Int.filter(Value::from("2")), Value::from(2));
        assert_eq!(Int.filter(Value::Boolean(true)), Value::from(1));
        assert_eq!(Int.filter(Value::Null), Value::from(0));
    }

    #[test]
    fn test_case_filters() {
        assert_eq!(StringToLower.filter(Value::from("AbC")), Value::from("abc"));
        assert_eq!(StringToUpper.filter(Value::from("AbC")), Value::from("ABC"));
        assert_eq!(StringToUpper.filter(Value::from(1)), Value::from(1));
    }

    #[test]
    fn test_digits_and_alnum() {
        assert_eq!(Digits.filter(Value::from("a1b2")), Value::from("12"));
        assert_eq!(Digits.filter(Value::from(-12)), Value::from("12"));
        assert_eq!(Alnum::default().filter(Value::from("a b!1")), Value::from("ab1"));
        let relaxed = Alnum {
            allow_white_space: true,
        };
        assert_eq!(relaxed.filter(Value::from("a b!1")), Value::from("a b1"));
    }

    #[test]
    fn test_strip_newlines_and_null() {
        assert_eq!(StripNewlines.filter(Value::from("a\r\nb")), Value::from("ab"));
        assert_eq!(Null.filter(Value::from("  ")), Value::Null);
        assert_eq!(Null.filter(Value::from(0)), Value::from(0));
    }
}
