//! Field kind profiles.
//!
//! A typed field does not override the pipeline; its kind describes the
//! stages it needs as data. Before filtering or validating, the field
//! installs every described stage that is not already present, at the front
//! of the relevant collection and in the listed order.

use crate::core::error::ConfigurationError;
use crate::core::params::Params;
use crate::core::types::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Renderer used by character and integer fields.
pub const TEXT_RENDERER: &str = "formText";

/// Renderer used by flag fields.
pub const CHECKBOX_RENDERER: &str = "formCheckbox";

/// Trim filter used by character fields unless configured otherwise.
pub const DEFAULT_TRIM_FILTER: &str = "StringTrim";

/// One pipeline stage to install: a plugin name and its entry params.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    /// Plugin name, short or canonical.
    pub name: String,
    /// Entry params (constructor `options`, renderer `attribs`, ...).
    #[serde(default)]
    pub params: Params,
}

impl Stage {
    /// Create a stage without params.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Params::new(),
        }
    }

    /// Create a stage with constructor options.
    pub fn with_options(name: impl Into<String>, options: IndexMap<String, Value>) -> Self {
        Self {
            name: name.into(),
            params: Params::with_options(options),
        }
    }
}

// ============================================================================
// Profiles
// ============================================================================

/// Length bounds and trimming of character fields.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterProfile {
    min_length: Option<usize>,
    max_length: Option<usize>,
    auto_trim: bool,
    auto_trim_filter: Option<String>,
}

impl Default for CharacterProfile {
    fn default() -> Self {
        Self {
            min_length: None,
            max_length: None,
            auto_trim: true,
            auto_trim_filter: Some(DEFAULT_TRIM_FILTER.to_string()),
        }
    }
}

impl CharacterProfile {
    /// Minimum length; the length check is only installed when this is set.
    pub fn min_length(&self) -> Option<usize> {
        self.min_length
    }

    /// Maximum length.
    pub fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    /// Whether the trim filter is installed.
    pub fn auto_trim(&self) -> bool {
        self.auto_trim
    }

    /// Name of the trim filter.
    pub fn auto_trim_filter(&self) -> Option<&str> {
        self.auto_trim_filter.as_deref()
    }

    /// Set the minimum length, rejecting a minimum above the maximum.
    pub fn set_min_length(&mut self, field: &str, min: Option<usize>) -> Result<(), ConfigurationError> {
        if let (Some(min), Some(max)) = (min, self.max_length) {
            if min > max {
                return Err(ConfigurationError::InvalidLengthBounds {
                    field: field.to_string(),
                    min,
                    max,
                });
            }
        }
        self.min_length = min;
        Ok(())
    }

    /// Set the maximum length, rejecting a maximum below the minimum.
    pub fn set_max_length(&mut self, field: &str, max: Option<usize>) -> Result<(), ConfigurationError> {
        if let (Some(min), Some(max)) = (self.min_length, max) {
            if max < min {
                return Err(ConfigurationError::InvalidLengthBounds {
                    field: field.to_string(),
                    min,
                    max,
                });
            }
        }
        self.max_length = max;
        Ok(())
    }

    /// Enable or disable the trim filter.
    pub fn set_auto_trim(&mut self, enabled: bool) {
        self.auto_trim = enabled;
    }

    /// Choose the trim filter; `None` disables trimming.
    pub fn set_auto_trim_filter(&mut self, filter: Option<String>) {
        self.auto_trim_filter = filter;
    }

    fn filter_stages(&self) -> Vec<Stage> {
        match (&self.auto_trim_filter, self.auto_trim) {
            (Some(filter), true) if !filter.is_empty() => vec![Stage::new(filter.clone())],
            _ => Vec::new(),
        }
    }

    fn validator_stages(&self) -> Vec<Stage> {
        let Some(min) = self.min_length else {
            return Vec::new();
        };
        let mut options = IndexMap::new();
        options.insert("min".to_string(), Value::from(min));
        options.insert("max".to_string(), Value::from(self.max_length));
        vec![Stage::with_options("StringLength", options)]
    }
}

/// Value bounds and integer coercion of integer and flag fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntegerProfile {
    min_value: Option<i64>,
    max_value: Option<i64>,
    auto_int_filter: bool,
}

impl IntegerProfile {
    /// Minimum value.
    pub fn min_value(&self) -> Option<i64> {
        self.min_value
    }

    /// Maximum value.
    pub fn max_value(&self) -> Option<i64> {
        self.max_value
    }

    /// Whether the integer filter is installed.
    pub fn auto_int_filter(&self) -> bool {
        self.auto_int_filter
    }

    /// Set the minimum value, rejecting a minimum above the maximum.
    pub fn set_min_value(&mut self, field: &str, min: Option<i64>) -> Result<(), ConfigurationError> {
        if let (Some(min), Some(max)) = (min, self.max_value) {
            if min > max {
                return Err(ConfigurationError::InvalidValueBounds {
                    field: field.to_string(),
                    min,
                    max,
                });
            }
        }
        self.min_value = min;
        Ok(())
    }

    /// Set the maximum value, rejecting a maximum below the minimum.
    pub fn set_max_value(&mut self, field: &str, max: Option<i64>) -> Result<(), ConfigurationError> {
        if let (Some(min), Some(max)) = (self.min_value, max) {
            if max < min {
                return Err(ConfigurationError::InvalidValueBounds {
                    field: field.to_string(),
                    min,
                    max,
                });
            }
        }
        self.max_value = max;
        Ok(())
    }

    /// Enable or disable the integer filter.
    pub fn set_auto_int_filter(&mut self, enabled: bool) {
        self.auto_int_filter = enabled;
    }

    fn filter_stages(&self) -> Vec<Stage> {
        if self.auto_int_filter {
            vec![Stage::new("Int")]
        } else {
            Vec::new()
        }
    }

    fn validator_stages(&self) -> Vec<Stage> {
        let mut stages = vec![Stage::new("Int")];
        if let Some(min) = self.min_value {
            let mut options = IndexMap::new();
            options.insert("min".to_string(), Value::from(min));
            options.insert(
                "message".to_string(),
                Value::from(format!("Minimum value is {}, but value is lesser", min)),
            );
            stages.push(Stage::with_options("MinValue", options));
        }
        if let Some(max) = self.max_value {
            let mut options = IndexMap::new();
            options.insert("max".to_string(), Value::from(max));
            options.insert(
                "message".to_string(),
                Value::from(format!("Maximum value is {}, but value is greater", max)),
            );
            stages.push(Stage::with_options("MaxValue", options));
        }
        stages
    }
}

// ============================================================================
// Field Kind
// ============================================================================

/// The kind of a field and its type-specific settings.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldKind {
    /// Plain field, no injected stages
    #[default]
    Generic,
    /// Text with optional length bounds, trimmed by default
    Character(CharacterProfile),
    /// Integer with optional value bounds
    Integer(IntegerProfile),
    /// Integer restricted to exactly 0 or 1
    Flag(IntegerProfile),
}

impl FieldKind {
    /// Character kind with default settings.
    pub fn character() -> Self {
        FieldKind::Character(CharacterProfile::default())
    }

    /// Integer kind with default settings.
    pub fn integer() -> Self {
        FieldKind::Integer(IntegerProfile::default())
    }

    /// Flag kind; the integer filter is on by default.
    pub fn flag() -> Self {
        FieldKind::Flag(IntegerProfile {
            auto_int_filter: true,
            ..IntegerProfile::default()
        })
    }

    /// Short label used in configuration and messages.
    pub fn label(&self) -> &'static str {
        match self {
            FieldKind::Generic => "field",
            FieldKind::Character(_) => "char",
            FieldKind::Integer(_) => "integer",
            FieldKind::Flag(_) => "flag",
        }
    }

    /// Renderer a new field of this kind starts with.
    pub fn default_renderer(&self) -> Option<&'static str> {
        match self {
            FieldKind::Generic => None,
            FieldKind::Character(_) | FieldKind::Integer(_) => Some(TEXT_RENDERER),
            FieldKind::Flag(_) => Some(CHECKBOX_RENDERER),
        }
    }

    /// Character settings, if this is a character kind.
    pub fn character_profile(&self) -> Option<&CharacterProfile> {
        match self {
            FieldKind::Character(profile) => Some(profile),
            _ => None,
        }
    }

    /// Mutable character settings.
    pub fn character_profile_mut(&mut self) -> Option<&mut CharacterProfile> {
        match self {
            FieldKind::Character(profile) => Some(profile),
            _ => None,
        }
    }

    /// Integer settings, for integer and flag kinds.
    pub fn integer_profile(&self) -> Option<&IntegerProfile> {
        match self {
            FieldKind::Integer(profile) | FieldKind::Flag(profile) => Some(profile),
            _ => None,
        }
    }

    /// Mutable integer settings.
    pub fn integer_profile_mut(&mut self) -> Option<&mut IntegerProfile> {
        match self {
            FieldKind::Integer(profile) | FieldKind::Flag(profile) => Some(profile),
            _ => None,
        }
    }

    /// Filter stages, in final order.
    pub fn filter_stages(&self) -> Vec<Stage> {
        match self {
            FieldKind::Generic => Vec::new(),
            FieldKind::Character(profile) => profile.filter_stages(),
            FieldKind::Integer(profile) | FieldKind::Flag(profile) => profile.filter_stages(),
        }
    }

    /// Validator stages, in final order.
    pub fn validator_stages(&self) -> Vec<Stage> {
        match self {
            FieldKind::Generic => Vec::new(),
            FieldKind::Character(profile) => profile.validator_stages(),
            FieldKind::Integer(profile) => profile.validator_stages(),
            FieldKind::Flag(profile) => {
                let mut stages = vec![Stage::new("Flag")];
                stages.extend(profile.validator_stages());
                stages
            }
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(stages: &[Stage]) -> Vec<&str> {
        stages.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_character_stages() {
        let mut kind = FieldKind::character();
        assert_eq!(names(&kind.filter_stages()), vec!["StringTrim"]);
        assert!(kind.validator_stages().is_empty());

        let profile = kind.character_profile_mut().unwrap();
        profile.set_max_length("title", Some(50)).unwrap();
        assert!(kind.validator_stages().is_empty());

        kind.character_profile_mut().unwrap().set_min_length("title", Some(3)).unwrap();
        let stages = kind.validator_stages();
        assert_eq!(names(&stages), vec!["StringLength"]);
        let options = stages[0].params.options().and_then(Value::as_map).unwrap();
        assert_eq!(options["min"], Value::from(3));
        assert_eq!(options["max"], Value::from(50));

        kind.character_profile_mut().unwrap().set_auto_trim(false);
        assert!(kind.filter_stages().is_empty());
    }

    #[test]
    fn test_length_bounds_both_orders() {
        let mut profile = CharacterProfile::default();
        profile.set_max_length("f", Some(5)).unwrap();
        assert!(profile.set_min_length("f", Some(10)).is_err());
        assert_eq!(profile.min_length(), None);

        let mut profile = CharacterProfile::default();
        profile.set_min_length("f", Some(10)).unwrap();
        let error = profile.set_max_length("f", Some(5)).unwrap_err();
        assert_eq!(
            error,
            ConfigurationError::InvalidLengthBounds {
                field: "f".to_string(),
                min: 10,
                max: 5
            }
        );
        assert!(profile.set_max_length("f", None).is_ok());
    }

    #[test]
    fn test_value_bounds_both_orders() {
        let mut profile = IntegerProfile::default();
        profile.set_min_value("n", Some(10)).unwrap();
        assert!(profile.set_max_value("n", Some(5)).is_err());
        profile.set_max_value("n", Some(10)).unwrap();
        assert!(profile.set_min_value("n", Some(11)).is_err());
        assert_eq!(profile.min_value(), Some(10));
    }

    #[test]
    fn test_integer_and_flag_stages() {
        let mut kind = FieldKind::integer();
        assert!(kind.filter_stages().is_empty());
        let profile = kind.integer_profile_mut().unwrap();
        profile.set_min_value("n", Some(1)).unwrap();
        profile.set_max_value("n", Some(9)).unwrap();
        assert_eq!(names(&kind.validator_stages()), vec!["Int", "MinValue", "MaxValue"]);

        let flag = FieldKind::flag();
        assert_eq!(names(&flag.filter_stages()), vec!["Int"]);
        assert_eq!(names(&flag.validator_stages()), vec!["Flag", "Int"]);
        assert_eq!(flag.default_renderer(), Some(CHECKBOX_RENDERER));
        assert_eq!(FieldKind::Generic.default_renderer(), None);
    }
}
