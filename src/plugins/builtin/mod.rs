//! Built-in plugin implementations.
//!
//! This module contains the standard validators, filters and renderers that
//! typed fields and configuration files refer to by short name.

mod filters;
mod renderers;
mod validators;

use crate::core::error::OptionsError;
use crate::core::types::Value;
use crate::plugins::kinds::{FilterKind, RendererKind, ValidatorKind};
use crate::plugins::registry::TypeRegistry;

/// Register all built-in validators.
pub fn register_validators(registry: &mut TypeRegistry<ValidatorKind>) {
    validators::register(registry);
}

/// Register all built-in filters.
pub fn register_filters(registry: &mut TypeRegistry<FilterKind>) {
    filters::register(registry);
}

/// Register all built-in renderers.
pub fn register_renderers(registry: &mut TypeRegistry<RendererKind>) {
    renderers::register(registry);
}

// Re-export for direct access
pub use filters::{Alnum as AlnumFilter, Digits as DigitsFilter, Int as IntFilter};
pub use filters::{Null, StringToLower, StringToUpper, StringTrim, StripNewlines};
pub use renderers::{
    FormCheckbox, FormHidden, FormPassword, FormRadio, FormSelect, FormText, FormTextarea,
    PlainSpan,
};
pub use validators::{Alnum, Digits, Flag, InArray, Int, MaxValue, MinValue, NotEmpty};
pub use validators::{StringLength, StringNotEmpty};

// ============================================================================
// Option helpers
// ============================================================================

/// Look up a named option in a map of options.
pub(crate) fn lookup<'a>(options: Option<&'a Value>, key: &str) -> Option<&'a Value> {
    options.and_then(Value::as_map).and_then(|map| map.get(key))
}

/// Look up the primary option of a plugin.
///
/// Single-argument plugins accept their argument either as a named option
/// (`{ min = 3 }`) or as the whole options value (`3`).
pub(crate) fn primary<'a>(options: Option<&'a Value>, key: &str) -> Option<&'a Value> {
    match options {
        Some(Value::Map(map)) => map.get(key),
        Some(Value::Null) | None => None,
        Some(other) => Some(other),
    }
}

/// Custom message override.
pub(crate) fn message(options: Option<&Value>) -> Option<String> {
    lookup(options, "message").map(Value::to_text)
}

/// Boolean option, `false` when absent.
pub(crate) fn flag(options: Option<&Value>, key: &str) -> bool {
    lookup(options, key).map_or(false, Value::is_truthy)
}

/// Integer option; numeric strings and whole floats are accepted.
pub(crate) fn integer(value: &Value, option: &'static str) -> Result<i64, OptionsError> {
    match value {
        Value::Integer(i) => Ok(*i),
        Value::Float(f) if f.fract() == 0.0 => Ok(value.to_integer()),
        Value::String(_) if value.as_number().map_or(false, |n| n.fract() == 0.0) => {
            Ok(value.to_integer())
        }
        other => Err(OptionsError::Invalid {
            option,
            reason: format!("must be an integer, got {} '{}'", other.kind(), other),
        }),
    }
}

/// Optional non-negative integer option.
pub(crate) fn length(value: Option<&Value>, option: &'static str) -> Result<Option<usize>, OptionsError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(value) => {
            let n = integer(value, option)?;
            usize::try_from(n).map(Some).map_err(|_| OptionsError::Invalid {
                option,
                reason: format!("must not be negative, got {}", n),
            })
        }
    }
}

/// Replace `%value%` and `%name%` placeholders in a message template.
///
/// The template is scanned once, so placeholders appearing inside the
/// substituted text are left as they are. Unknown placeholders are kept.
pub(crate) fn interpolate(template: &str, value: &Value, vars: &[(&str, String)]) -> String {
    let mut message = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('%') {
        message.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let Some(end) = after.find('%') else {
            rest = &rest[start..];
            break;
        };
        let name = &after[..end];
        let replacement = if name == "value" {
            Some(value.to_text())
        } else {
            vars.iter().find(|(var, _)| *var == name).map(|(_, text)| text.clone())
        };
        match replacement {
            Some(text) => {
                message.push_str(&text);
                rest = &after[end + 1..];
            }
            None => {
                message.push('%');
                rest = after;
            }
        }
    }
    message.push_str(rest);
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    #[test]
    fn test_primary_option() {
        let scalar = Value::from(3);
        assert_eq!(primary(Some(&scalar), "min"), Some(&Value::from(3)));

        let mut map = IndexMap::new();
        map.insert("min".to_string(), Value::from(4));
        let named = Value::Map(map);
        assert_eq!(primary(Some(&named), "min"), Some(&Value::from(4)));
        assert_eq!(primary(Some(&named), "max"), None);
        assert_eq!(primary(None, "min"), None);
    }

    #[test]
    fn test_integer_option() {
        assert_eq!(integer(&Value::from("12"), "min"), Ok(12));
        assert_eq!(integer(&Value::Float(3.0), "min"), Ok(3));
        assert!(integer(&Value::from("abc"), "min").is_err());
        assert!(integer(&Value::Float(1.5), "min").is_err());
        assert!(length(Some(&Value::from(-1)), "min").is_err());
        assert_eq!(length(None, "min"), Ok(None));
    }

    #[test]
    fn test_interpolate() {
        let message = interpolate(
            "'%value%' is less than '%min%'",
            &Value::from(2),
            &[("min", "5".to_string())],
        );
        assert_eq!(message, "'2' is less than '5'");
    }

    #[test]
    fn test_interpolate_leaves_input_placeholders() {
        let message = interpolate(
            "'%value%' is less than %min% characters long",
            &Value::from("%min%"),
            &[("min", "10".to_string())],
        );
        assert_eq!(message, "'%min%' is less than 10 characters long");

        let message = interpolate("100% of %max% (%other%)", &Value::Null, &[("max", "3".to_string())]);
        assert_eq!(message, "100% of 3 (%other%)");
    }

    #[test]
    fn test_all_builtins_registered() {
        assert_eq!(TypeRegistry::<ValidatorKind>::with_builtins().len(), 10);
        assert_eq!(TypeRegistry::<FilterKind>::with_builtins().len(), 8);
        assert_eq!(TypeRegistry::<RendererKind>::with_builtins().len(), 8);
    }
}
