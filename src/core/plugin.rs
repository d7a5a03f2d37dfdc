//! Plugin capability traits.
//!
//! Every pipeline stage is one of three capabilities:
//!
//! - [`Validator`]: accepts or rejects one value, explaining the rejection.
//! - [`Filter`]: transforms one value into another.
//! - [`Renderer`]: turns one field into markup.
//!
//! Plugins are addressed by a canonical type name such as
//! `validate::StringLength`. A collection only accepts plugins of its own
//! capability; the trait object type enforces that at compile time.

use crate::core::context::RenderContext;
use crate::core::types::{Attribs, Choices, Value};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// The three plugin capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PluginType {
    /// Validates one value
    Validator,
    /// Transforms one value
    Filter,
    /// Renders one field
    Renderer,
}

impl PluginType {
    /// Get the display name for this plugin type.
    pub fn display_name(&self) -> &'static str {
        match self {
            PluginType::Validator => "validator",
            PluginType::Filter => "filter",
            PluginType::Renderer => "renderer",
        }
    }

    /// Get all plugin types in display order.
    pub fn all() -> &'static [PluginType] {
        &[PluginType::Validator, PluginType::Filter, PluginType::Renderer]
    }
}

impl fmt::Display for PluginType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A rejected value.
///
/// `rule` identifies the failed rule (e.g. `stringLengthTooShort`) so that
/// models can substitute their own message templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Rule key, stable across message changes.
    pub rule: String,
    /// Default human-readable message.
    pub message: String,
}

impl Violation {
    /// Create a new violation.
    pub fn new(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.rule)
    }
}

/// Validate-one-value capability.
///
/// # Example Implementation
///
/// ```ignore
/// struct Even;
///
/// impl Validator for Even {
///     fn type_name(&self) -> &str {
///         "app::Even"
///     }
///
///     fn validate(&self, value: &Value) -> Result<(), Violation> {
///         if value.to_integer() % 2 == 0 {
///             Ok(())
///         } else {
///             Err(Violation::new("notEven", format!("'{}' is odd", value)))
///         }
///     }
/// }
/// ```
pub trait Validator: Send + Sync {
    /// Canonical type name this plugin is stored under.
    fn type_name(&self) -> &str;

    /// Check one value.
    fn validate(&self, value: &Value) -> Result<(), Violation>;
}

/// Transform-one-value capability.
///
/// Filters must be idempotent: filtering an already filtered value returns
/// it unchanged.
pub trait Filter: Send + Sync {
    /// Canonical type name this plugin is stored under.
    fn type_name(&self) -> &str;

    /// Transform one value.
    fn filter(&self, value: Value) -> Value;
}

/// How a renderer wants the field's state presented to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputStyle {
    /// Name, value and attributes only
    #[default]
    Plain,
    /// Also receives the field's choices and a list separator
    Choice,
    /// Value is forced to `1`; a truthy field value marks it checked
    Checkbox,
}

/// Everything a renderer needs to draw one field.
#[derive(Debug, Clone)]
pub struct RenderInput<'a> {
    /// Element name
    pub name: &'a str,
    /// Value to show
    pub value: &'a Value,
    /// Merged element attributes
    pub attribs: &'a Attribs,
    /// Choices for select/radio style renderers
    pub choices: Option<&'a Choices>,
    /// Separator between radio options
    pub listsep: Option<&'a str>,
}

/// Render-one-field capability.
///
/// Renderers are bound to a [`RenderContext`] right after construction; the
/// context supplies escaping and markup conventions.
pub trait Renderer: Send + Sync {
    /// Canonical type name this plugin is stored under.
    fn type_name(&self) -> &str;

    /// Bind the rendering context.
    fn set_view(&mut self, view: Arc<RenderContext>);

    /// How the field state should be prepared for this renderer.
    fn input_style(&self) -> InputStyle {
        InputStyle::Plain
    }

    /// Produce markup.
    fn render(&self, input: &RenderInput<'_>) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plugin_type_display() {
        assert_eq!(PluginType::Validator.to_string(), "validator");
        assert_eq!(PluginType::Renderer.display_name(), "renderer");
        assert_eq!(PluginType::all().len(), 3);
    }

    #[test]
    fn test_violation_display() {
        let violation = Violation::new("isEmpty", "Value is required");
        assert_eq!(violation.to_string(), "Value is required (isEmpty)");
    }
}
