//! Built-in validators.

use super::{interpolate, length, lookup, message, primary};
use crate::core::error::OptionsError;
use crate::core::plugin::{Validator, Violation};
use crate::core::types::Value;
use crate::plugins::kinds::ValidatorKind;
use crate::plugins::registry::TypeRegistry;
use std::cmp::Ordering;

/// Register built-in validators.
pub fn register(registry: &mut TypeRegistry<ValidatorKind>) {
    registry.register(NotEmpty::TYPE_NAME, "Rejects blank values", |options| {
        Ok(Box::new(NotEmpty::from_options(options)))
    });
    registry.register(
        StringNotEmpty::TYPE_NAME,
        "Rejects the empty string, accepts every other value",
        |options| Ok(Box::new(StringNotEmpty::from_options(options))),
    );
    registry.register(
        StringLength::TYPE_NAME,
        "Checks the character length of a value against min/max",
        |options| Ok(Box::new(StringLength::from_options(options)?)),
    );
    registry.register(Int::TYPE_NAME, "Accepts integer values only", |options| {
        Ok(Box::new(Int::from_options(options)))
    });
    registry.register(Digits::TYPE_NAME, "Accepts digit-only values", |options| {
        Ok(Box::new(Digits::from_options(options)))
    });
    registry.register(Alnum::TYPE_NAME, "Accepts letters and digits only", |options| {
        Ok(Box::new(Alnum::from_options(options)))
    });
    registry.register(InArray::TYPE_NAME, "Accepts values found in a haystack", |options| {
        Ok(Box::new(InArray::from_options(options)?))
    });
    registry.register(MinValue::TYPE_NAME, "Rejects values below a minimum", |options| {
        Ok(Box::new(MinValue::from_options(options)?))
    });
    registry.register(MaxValue::TYPE_NAME, "Rejects values above a maximum", |options| {
        Ok(Box::new(MaxValue::from_options(options)?))
    });
    registry.register(Flag::TYPE_NAME, "Accepts exactly the integers 0 and 1", |options| {
        Ok(Box::new(Flag::from_options(options)))
    });
}

/// Build a violation from the custom message or the default template.
fn violation(
    custom: &Option<String>,
    rule: &str,
    template: &str,
    value: &Value,
    vars: &[(&str, String)],
) -> Violation {
    let template = custom.as_deref().unwrap_or(template);
    Violation::new(rule, interpolate(template, value, vars))
}

// ============================================================================
// Presence
// ============================================================================

/// Rejects blank values (null, empty or whitespace-only strings, empty lists).
///
/// Numeric zero and `"0"` are accepted.
#[derive(Debug, Clone, Default)]
pub struct NotEmpty {
    message: Option<String>,
}

impl NotEmpty {
    /// Canonical type name.
    pub const TYPE_NAME: &'static str = "validate::NotEmpty";

    fn from_options(options: Option<&Value>) -> Self {
        Self {
            message: message(options),
        }
    }
}

impl Validator for NotEmpty {
    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn validate(&self, value: &Value) -> Result<(), Violation> {
        if value.is_blank() {
            return Err(violation(
                &self.message,
                "isEmpty",
                "Value is required and can't be empty",
                value,
                &[],
            ));
        }
        Ok(())
    }
}

/// Rejects the empty string only; non-string values always pass.
#[derive(Debug, Clone, Default)]
pub struct StringNotEmpty {
    message: Option<String>,
}

impl StringNotEmpty {
    /// Canonical type name.
    pub const TYPE_NAME: &'static str = "validate::StringNotEmpty";

    fn from_options(options: Option<&Value>) -> Self {
        Self {
            message: message(options),
        }
    }
}

impl Validator for StringNotEmpty {
    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn validate(&self, value: &Value) -> Result<(), Violation> {
        match value {
            Value::String(s) if s.is_empty() => Err(violation(
                &self.message,
                "isStringEmpty",
                "String is empty",
                value,
                &[],
            )),
            _ => Ok(()),
        }
    }
}

// ============================================================================
// Length and type
// ============================================================================

/// Checks the length in characters of a scalar value.
#[derive(Debug, Clone)]
pub struct StringLength {
    min: usize,
    max: Option<usize>,
    message: Option<String>,
}

impl StringLength {
    /// Canonical type name.
    pub const TYPE_NAME: &'static str = "validate::StringLength";

    /// Create a validator for the given bounds.
    pub fn new(min: usize, max: Option<usize>) -> Result<Self, OptionsError> {
        if let Some(max) = max {
            if min > max {
                return Err(OptionsError::Invalid {
                    option: "min",
                    reason: format!("must be less than or equal to max ({} > {})", min, max),
                });
            }
        }
        Ok(Self {
            min,
            max,
            message: None,
        })
    }

    fn from_options(options: Option<&Value>) -> Result<Self, OptionsError> {
        let min = length(primary(options, "min"), "min")?.unwrap_or(0);
        let max = length(lookup(options, "max"), "max")?;
        let mut validator = Self::new(min, max)?;
        validator.message = message(options);
        Ok(validator)
    }
}

impl Validator for StringLength {
    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn validate(&self, value: &Value) -> Result<(), Violation> {
        if !value.is_scalar() {
            return Err(violation(
                &self.message,
                "stringLengthInvalid",
                "Invalid type given. String expected",
                value,
                &[],
            ));
        }

        let count = value.to_text().chars().count();
        let vars = [
            ("min", self.min.to_string()),
            ("max", self.max.map(|m| m.to_string()).unwrap_or_default()),
        ];
        if count < self.min {
            return Err(violation(
                &self.message,
                "stringLengthTooShort",
                "'%value%' is less than %min% characters long",
                value,
                &vars,
            ));
        }
        if let Some(max) = self.max {
            if count > max {
                return Err(violation(
                    &self.message,
                    "stringLengthTooLong",
                    "'%value%' is more than %max% characters long",
                    value,
                    &vars,
                ));
            }
        }
        Ok(())
    }
}

/// Accepts integers, whole floats and integer strings (`"-12"`).
#[derive(Debug, Clone, Default)]
pub struct Int {
    message: Option<String>,
}

impl Int {
    /// Canonical type name.
    pub const TYPE_NAME: &'static str = "validate::Int";

    fn from_options(options: Option<&Value>) -> Self {
        Self {
            message: message(options),
        }
    }
}

fn is_integer_text(s: &str) -> bool {
    let digits = s.strip_prefix(|c: char| c == '-' || c == '+').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

impl Validator for Int {
    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn validate(&self, value: &Value) -> Result<(), Violation> {
        let valid = match value {
            Value::Integer(_) => true,
            Value::Float(f) => f.is_finite() && f.fract() == 0.0,
            Value::String(s) => is_integer_text(s),
            _ => false,
        };
        if valid {
            Ok(())
        } else {
            Err(violation(
                &self.message,
                "notInt",
                "'%value%' does not appear to be an integer",
                value,
                &[],
            ))
        }
    }
}

/// Accepts non-empty digit-only values.
#[derive(Debug, Clone, Default)]
pub struct Digits {
    message: Option<String>,
}

impl Digits {
    /// Canonical type name.
    pub const TYPE_NAME: &'static str = "validate::Digits";

    fn from_options(options: Option<&Value>) -> Self {
        Self {
            message: message(options),
        }
    }
}

impl Validator for Digits {
    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn validate(&self, value: &Value) -> Result<(), Violation> {
        if !matches!(value, Value::String(_) | Value::Integer(_) | Value::Float(_)) {
            return Err(violation(
                &self.message,
                "digitsInvalid",
                "Invalid type given. String, integer or float expected",
                value,
                &[],
            ));
        }

        let text = value.to_text();
        if text.is_empty() {
            return Err(violation(
                &self.message,
                "digitsStringEmpty",
                "'%value%' is an empty string",
                value,
                &[],
            ));
        }
        if !text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(violation(
                &self.message,
                "notDigits",
                "'%value%' must contain only digits",
                value,
                &[],
            ));
        }
        Ok(())
    }
}

/// Accepts non-empty values made of letters and digits.
#[derive(Debug, Clone, Default)]
pub struct Alnum {
    allow_white_space: bool,
    message: Option<String>,
}

impl Alnum {
    /// Canonical type name.
    pub const TYPE_NAME: &'static str = "validate::Alnum";

    fn from_options(options: Option<&Value>) -> Self {
        Self {
            allow_white_space: super::flag(options, "allowWhiteSpace"),
            message: message(options),
        }
    }
}

impl Validator for Alnum {
    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn validate(&self, value: &Value) -> Result<(), Violation> {
        if !matches!(value, Value::String(_) | Value::Integer(_) | Value::Float(_)) {
            return Err(violation(
                &self.message,
                "alnumInvalid",
                "Invalid type given. String, integer or float expected",
                value,
                &[],
            ));
        }

        let text = value.to_text();
        if text.is_empty() {
            return Err(violation(
                &self.message,
                "alnumStringEmpty",
                "'%value%' is an empty string",
                value,
                &[],
            ));
        }
        let valid = text
            .chars()
            .all(|c| c.is_alphanumeric() || (self.allow_white_space && c.is_whitespace()));
        if !valid {
            return Err(violation(
                &self.message,
                "notAlnum",
                "'%value%' contains characters which are non alphabetic and no digits",
                value,
                &[],
            ));
        }
        Ok(())
    }
}

/// Accepts values found in a haystack.
///
/// Comparison is loose (`"5"` matches `5`) unless `strict` is set.
#[derive(Debug, Clone)]
pub struct InArray {
    haystack: Vec<Value>,
    strict: bool,
    message: Option<String>,
}

impl InArray {
    /// Canonical type name.
    pub const TYPE_NAME: &'static str = "validate::InArray";

    /// Create a validator for a haystack.
    pub fn new(haystack: Vec<Value>) -> Self {
        Self {
            haystack,
            strict: false,
            message: None,
        }
    }

    fn from_options(options: Option<&Value>) -> Result<Self, OptionsError> {
        let haystack = match primary(options, "haystack") {
            Some(Value::List(items)) => items.clone(),
            Some(Value::Map(map)) => map.values().cloned().collect(),
            Some(other) => vec![other.clone()],
            None => return Err(OptionsError::Missing("haystack")),
        };
        Ok(Self {
            haystack,
            strict: super::flag(options, "strict"),
            message: message(options),
        })
    }
}

impl Validator for InArray {
    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn validate(&self, value: &Value) -> Result<(), Violation> {
        let found = self.haystack.iter().any(|candidate| {
            if self.strict {
                candidate == value
            } else {
                candidate.loose_eq(value)
            }
        });
        if found {
            Ok(())
        } else {
            Err(violation(
                &self.message,
                "notInArray",
                "'%value%' was not found in the haystack",
                value,
                &[],
            ))
        }
    }
}

// ============================================================================
// Comparison
// ============================================================================

/// Rejects values below a minimum, compared loosely.
#[derive(Debug, Clone)]
pub struct MinValue {
    min: Value,
    message: Option<String>,
}

impl MinValue {
    /// Canonical type name.
    pub const TYPE_NAME: &'static str = "validate::MinValue";

    /// Create a validator for a minimum.
    pub fn new(min: impl Into<Value>) -> Self {
        Self {
            min: min.into(),
            message: None,
        }
    }

    /// The configured minimum.
    pub fn min(&self) -> &Value {
        &self.min
    }

    fn from_options(options: Option<&Value>) -> Result<Self, OptionsError> {
        let min = primary(options, "min").ok_or(OptionsError::Missing("min"))?;
        if !min.is_scalar() {
            return Err(OptionsError::Invalid {
                option: "min",
                reason: format!("must be a scalar, got {}", min.kind()),
            });
        }
        Ok(Self {
            min: min.clone(),
            message: message(options),
        })
    }
}

impl Validator for MinValue {
    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn validate(&self, value: &Value) -> Result<(), Violation> {
        if value.loose_cmp(&self.min) == Some(Ordering::Less) {
            return Err(violation(
                &self.message,
                "minValue",
                "'%value%' is less than '%min%'",
                value,
                &[("min", self.min.to_text())],
            ));
        }
        Ok(())
    }
}

/// Rejects values above a maximum, compared loosely.
#[derive(Debug, Clone)]
pub struct MaxValue {
    max: Value,
    message: Option<String>,
}

impl MaxValue {
    /// Canonical type name.
    pub const TYPE_NAME: &'static str = "validate::MaxValue";

    /// Create a validator for a maximum.
    pub fn new(max: impl Into<Value>) -> Self {
        Self {
            max: max.into(),
            message: None,
        }
    }

    /// The configured maximum.
    pub fn max(&self) -> &Value {
        &self.max
    }

    fn from_options(options: Option<&Value>) -> Result<Self, OptionsError> {
        let max = primary(options, "max").ok_or(OptionsError::Missing("max"))?;
        if !max.is_scalar() {
            return Err(OptionsError::Invalid {
                option: "max",
                reason: format!("must be a scalar, got {}", max.kind()),
            });
        }
        Ok(Self {
            max: max.clone(),
            message: message(options),
        })
    }
}

impl Validator for MaxValue {
    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn validate(&self, value: &Value) -> Result<(), Violation> {
        if value.loose_cmp(&self.max) == Some(Ordering::Greater) {
            return Err(violation(
                &self.message,
                "maxValue",
                "'%value%' is greater than '%max%'",
                value,
                &[("max", self.max.to_text())],
            ));
        }
        Ok(())
    }
}

/// Accepts exactly the integers `0` and `1`.
///
/// No coercion happens here: `"1"` and `true` are rejected, so flag fields
/// run an integer filter first.
#[derive(Debug, Clone, Default)]
pub struct Flag {
    message: Option<String>,
}

impl Flag {
    /// Canonical type name.
    pub const TYPE_NAME: &'static str = "validate::Flag";

    fn from_options(options: Option<&Value>) -> Self {
        Self {
            message: message(options),
        }
    }
}

impl Validator for Flag {
    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn validate(&self, value: &Value) -> Result<(), Violation> {
        match value {
            Value::Integer(0) | Value::Integer(1) => Ok(()),
            _ => Err(violation(
                &self.message,
                "flag",
                "Allowed values are 0 or 1 only",
                value,
                &[],
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn options(pairs: &[(&str, Value)]) -> Value {
        let map: IndexMap<String, Value> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect();
        Value::Map(map)
    }

    #[test]
    fn test_not_empty() {
        let validator = NotEmpty::default();
        assert!(validator.validate(&Value::from(0)).is_ok());
        assert!(validator.validate(&Value::from("0")).is_ok());
        let violation = validator.validate(&Value::from("   ")).unwrap_err();
        assert_eq!(violation.rule, "isEmpty");
        assert!(validator.validate(&Value::Null).is_err());
    }

    #[test]
    fn test_string_not_empty() {
        let validator = StringNotEmpty::default();
        assert!(validator.validate(&Value::from("")).is_err());
        assert!(validator.validate(&Value::from(" ")).is_ok());
        assert!(validator.validate(&Value::Null).is_ok());
        assert!(validator.validate(&Value::from(0)).is_ok());
    }

    #[test]
    fn test_string_length() {
        let validator = StringLength::new(3, Some(5)).unwrap();
        let short = validator.validate(&Value::from("hi")).unwrap_err();
        assert_eq!(short.rule, "stringLengthTooShort");
        assert_eq!(short.message, "'hi' is less than 3 characters long");

        let long = validator.validate(&Value::from("héllo!")).unwrap_err();
        assert_eq!(long.rule, "stringLengthTooLong");
        assert!(validator.validate(&Value::from("héllo")).is_ok());
        assert!(validator.validate(&Value::List(vec![])).is_err());
    }

    #[test]
    fn test_string_length_bounds() {
        assert!(StringLength::new(5, Some(3)).is_err());
        assert!(StringLength::new(3, None).is_ok());
        let from_options = StringLength::from_options(Some(&options(&[
            ("min", Value::from(4)),
            ("max", Value::from(2)),
        ])));
        assert!(from_options.is_err());
    }

    #[test]
    fn test_int() {
        let validator = Int::default();
        assert!(validator.validate(&Value::from(12)).is_ok());
        assert!(validator.validate(&Value::from("-12")).is_ok());
        assert!(validator.validate(&Value::Float(3.0)).is_ok());
        assert!(validator.validate(&Value::from("1.5")).is_err());
        assert!(validator.validate(&Value::from("12abc")).is_err());
        assert_eq!(validator.validate(&Value::Null).unwrap_err().rule, "notInt");
    }

    #[test]
    fn test_digits_and_alnum() {
        assert!(Digits::default().validate(&Value::from("0123")).is_ok());
        assert!(Digits::default().validate(&Value::from("12a")).is_err());
        assert!(Digits::default().validate(&Value::from(-1)).is_err());

        assert!(Alnum::default().validate(&Value::from("abc123")).is_ok());
        assert!(Alnum::default().validate(&Value::from("abc 123")).is_err());
        let relaxed = Alnum::from_options(Some(&options(&[("allowWhiteSpace", Value::from(true))])));
        assert!(relaxed.validate(&Value::from("abc 123")).is_ok());
    }

    #[test]
    fn test_in_array() {
        let validator = InArray::new(vec![Value::from(1), Value::from("b")]);
        assert!(validator.validate(&Value::from("1")).is_ok());
        assert!(validator.validate(&Value::from("c")).is_err());

        let strict = InArray::from_options(Some(&options(&[
            ("haystack", Value::List(vec![Value::from(1)])),
            ("strict", Value::from(true)),
        ])))
        .unwrap();
        assert!(strict.validate(&Value::from("1")).is_err());
        assert!(strict.validate(&Value::from(1)).is_ok());

        assert_eq!(
            InArray::from_options(None).unwrap_err(),
            OptionsError::Missing("haystack")
        );
    }

    #[test]
    fn test_min_max_value() {
        let min = MinValue::new(5);
        assert!(min.validate(&Value::from(5)).is_ok());
        let violation = min.validate(&Value::from(4)).unwrap_err();
        assert_eq!(violation.rule, "minValue");
        assert_eq!(violation.message, "'4' is less than '5'");

        let max = MaxValue::from_options(Some(&options(&[
            ("max", Value::from(10)),
            ("message", Value::from("At most %max%")),
        ])))
        .unwrap();
        assert!(max.validate(&Value::from("10")).is_ok());
        assert_eq!(max.validate(&Value::from(11)).unwrap_err().message, "At most 10");

        assert_eq!(
            MinValue::from_options(Some(&options(&[("max", Value::from(1))]))).unwrap_err(),
            OptionsError::Missing("min")
        );
    }

    #[test]
    fn test_value_bounds_exact_for_large_integers() {
        let min = MinValue::new(9_007_199_254_740_993i64);
        assert!(min.validate(&Value::from(9_007_199_254_740_992i64)).is_err());
        assert!(min.validate(&Value::from(9_007_199_254_740_993i64)).is_ok());
    }

    #[test]
    fn test_flag_exactness() {
        let validator = Flag::default();
        assert!(validator.validate(&Value::from(0)).is_ok());
        assert!(validator.validate(&Value::from(1)).is_ok());
        let violation = validator.validate(&Value::from(2)).unwrap_err();
        assert_eq!(violation.message, "Allowed values are 0 or 1 only");
        assert!(validator.validate(&Value::from("1")).is_err());
        assert!(validator.validate(&Value::Boolean(true)).is_err());
    }
}
