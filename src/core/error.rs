//! Error types for formwork.
//!
//! Uses thiserror for structured errors. Two families are kept apart:
//! - Configuration problems ([`PluginError`], [`ConfigurationError`]) are
//!   returned as `Err` and abort the operation.
//! - Validation failures are not errors at all; they are messages collected
//!   in a [`ValidationReport`].

use crate::core::plugin::PluginType;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level error type for formwork.
///
/// This enum encompasses all error categories and enables automatic
/// conversion between specific error types.
#[derive(Error, Debug)]
pub enum FormworkError {
    #[error("Plugin error: {0}")]
    Plugin(#[from] PluginError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("{0}")]
    Other(String),
}

/// Errors raised while registering, resolving or constructing plugins.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PluginError {
    #[error("Invalid {kind} given: '{name}' does not resolve to a registered type")]
    Unresolved { kind: PluginType, name: String },

    #[error("The {kind} '{name}' rejected its options: {source}")]
    InvalidOptions {
        kind: PluginType,
        name: String,
        #[source]
        source: OptionsError,
    },
}

/// Errors a plugin constructor reports about its options.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OptionsError {
    #[error("missing option '{0}'")]
    Missing(&'static str),

    #[error("option '{option}' {reason}")]
    Invalid { option: &'static str, reason: String },
}

/// Errors in field or model configuration.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConfigurationError {
    #[error("Field '{field}': minimum length {min} must be less than or equal to maximum length {max}")]
    InvalidLengthBounds { field: String, min: usize, max: usize },

    #[error("Field '{field}': minimum value {min} must be less than or equal to maximum value {max}")]
    InvalidValueBounds { field: String, min: i64, max: i64 },

    #[error("Field '{field}' of type '{kind}' has no option '{option}'")]
    NotApplicable {
        field: String,
        kind: String,
        option: String,
    },

    #[error("Field '{0}' is not defined")]
    UnknownField(String),

    #[error("Unknown field type '{0}'")]
    UnknownFieldType(String),

    #[error("Unsupported configuration format: {0}")]
    UnsupportedFormat(String),
}

impl PluginError {
    /// The name that failed to resolve or construct.
    pub fn name(&self) -> &str {
        match self {
            PluginError::Unresolved { name, .. } | PluginError::InvalidOptions { name, .. } => name,
        }
    }

    /// The plugin type involved.
    pub fn kind(&self) -> PluginType {
        match self {
            PluginError::Unresolved { kind, .. } | PluginError::InvalidOptions { kind, .. } => *kind,
        }
    }
}

impl ConfigurationError {
    /// Get the field this error concerns, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            ConfigurationError::InvalidLengthBounds { field, .. }
            | ConfigurationError::InvalidValueBounds { field, .. }
            | ConfigurationError::NotApplicable { field, .. } => Some(field),
            ConfigurationError::UnknownField(field) => Some(field),
            _ => None,
        }
    }
}

/// Result type alias for formwork operations.
pub type FormworkResult<T> = Result<T, FormworkError>;

/// Result type alias for plugin operations.
pub type PluginResult<T> = Result<T, PluginError>;

// ============================================================================
// Validation Report
// ============================================================================

/// Outcome of validating every field of a model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Whether every validated field passed.
    pub success: bool,
    /// First failure message per field, in field order.
    pub messages: IndexMap<String, String>,
    /// Fields not validated because the field they depend on failed.
    pub skipped: Vec<String>,
    /// Time taken for validation in milliseconds.
    pub duration_ms: u64,
}

impl ValidationReport {
    /// Create a new empty report (success).
    pub fn new() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    /// Record a failure message for a field.
    pub fn add_message(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.success = false;
        self.messages.insert(field.into(), message.into());
    }

    /// Record a field skipped by the dependency rule.
    pub fn add_skipped(&mut self, field: impl Into<String>) {
        self.skipped.push(field.into());
    }

    /// Get the message recorded for a field.
    pub fn message(&self, field: &str) -> Option<&str> {
        self.messages.get(field).map(String::as_str)
    }

    /// Get a human-readable summary.
    pub fn summary(&self) -> String {
        if self.success {
            "✓ All fields are valid".to_string()
        } else {
            format!("✗ Validation failed for {} field(s)", self.messages.len())
        }
    }

    /// Get one line per failing field, numbered.
    pub fn detailed_messages(&self) -> Vec<String> {
        self.messages
            .iter()
            .enumerate()
            .map(|(i, (field, message))| format!("{}. {}: {}", i + 1, field, message))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plugin_error_display() {
        let error = PluginError::Unresolved {
            kind: PluginType::Validator,
            name: "Bogus".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid validator given: 'Bogus' does not resolve to a registered type"
        );
        assert_eq!(error.name(), "Bogus");
    }

    #[test]
    fn test_invalid_options_chain() {
        let error = PluginError::InvalidOptions {
            kind: PluginType::Validator,
            name: "validate::MinValue".to_string(),
            source: OptionsError::Missing("min"),
        };
        assert!(error.to_string().contains("missing option 'min'"));
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_configuration_error_field() {
        let error = ConfigurationError::InvalidLengthBounds {
            field: "title".to_string(),
            min: 10,
            max: 5,
        };
        assert_eq!(error.field(), Some("title"));
        assert!(error.to_string().contains("minimum length 10"));
    }

    #[test]
    fn test_validation_report() {
        let mut report = ValidationReport::new();
        assert!(report.success);

        report.add_message("title", "too short");
        assert!(!report.success);
        assert_eq!(report.message("title"), Some("too short"));
        assert_eq!(report.detailed_messages(), vec!["1. title: too short".to_string()]);
    }
}
