//! Model configuration files.
//!
//! A model is described by a TOML or JSON document:
//!
//! ```toml
//! name = "signup"
//!
//! [fields.title]
//! type = "char"
//! required = true
//! minLength = 3
//!
//! [fields.age]
//! type = "integer"
//! minValue = 18
//!
//! [messages.age]
//! minValue = "Adults only"
//! ```

use crate::core::context::{Doctype, RenderContext};
use crate::core::error::{ConfigurationError, FormworkResult};
use crate::field::{Field, FieldKind, FieldOptions};
use crate::model::model::Model;
use crate::plugins::set::PluginSet;
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Field type names accepted in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Generic field
    #[default]
    Field,
    /// Character field
    #[serde(alias = "character")]
    Char,
    /// Integer field
    Integer,
    /// Flag field
    Flag,
}

impl FieldType {
    /// The field kind this type creates, with default settings.
    pub fn kind(self) -> FieldKind {
        match self {
            FieldType::Field => FieldKind::Generic,
            FieldType::Char => FieldKind::character(),
            FieldType::Integer => FieldKind::integer(),
            FieldType::Flag => FieldKind::flag(),
        }
    }
}

impl FromStr for FieldType {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "field" => Ok(FieldType::Field),
            "char" | "character" => Ok(FieldType::Char),
            "integer" | "int" => Ok(FieldType::Integer),
            "flag" => Ok(FieldType::Flag),
            _ => Err(ConfigurationError::UnknownFieldType(s.to_string())),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind().label())
    }
}

/// One field entry: its type plus options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Field type, `field` when omitted.
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    /// Every other key.
    #[serde(flatten)]
    pub options: FieldOptions,
}

/// A whole model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Model name.
    pub name: String,
    /// Markup dialect used by renderers.
    pub doctype: Doctype,
    /// Fields in declaration order.
    pub fields: IndexMap<String, FieldConfig>,
    /// Message templates by field, then rule.
    pub messages: IndexMap<String, IndexMap<String, String>>,
}

impl ModelConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(source: &str) -> FormworkResult<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Parse a JSON document.
    pub fn from_json_str(source: &str) -> FormworkResult<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// Load a `.toml` or `.json` file.
    pub fn from_path(path: impl AsRef<Path>) -> FormworkResult<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        let source = std::fs::read_to_string(path)?;
        debug!("Loading model configuration from {}", path.display());

        let mut config = match extension.as_str() {
            "toml" => Self::from_toml_str(&source)?,
            "json" => Self::from_json_str(&source)?,
            _ => {
                return Err(ConfigurationError::UnsupportedFormat(path.display().to_string()).into())
            }
        };
        if config.name.is_empty() {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                config.name = stem.to_string();
            }
        }
        Ok(config)
    }

    /// Build a model backed by the built-in plugins.
    pub fn build(&self) -> FormworkResult<Model> {
        let plugins = PluginSet::builder()
            .view(RenderContext::new(self.doctype))
            .build();
        self.build_with(plugins)
    }

    /// Build a model backed by a plugin set.
    ///
    /// The set's rendering context is kept; the configured doctype only
    /// applies through [`build`](Self::build).
    pub fn build_with(&self, plugins: PluginSet) -> FormworkResult<Model> {
        let mut model = Model::with_plugins(self.name.clone(), plugins);
        for (name, config) in &self.fields {
            let mut field = Field::with_plugins(name.as_str(), config.field_type.kind(), model.plugins());
            field.configure(&config.options)?;
            model.add_field(field);
        }

        for (field, rules) in &self.messages {
            if !model.contains(field) {
                return Err(ConfigurationError::UnknownField(field.clone()).into());
            }
            for (rule, template) in rules {
                model.set_message_template(field, rule, template.clone());
            }
        }

        for field in model.fields().values() {
            if let Some(dependent) = field.dependent() {
                if !model.contains(dependent) {
                    return Err(ConfigurationError::UnknownField(dependent.to_string()).into());
                }
            }
        }
        debug!("Built model '{}' with {} field(s)", model.name(), model.fields().len());
        Ok(model)
    }
}

impl Model {
    /// Load a configuration file and build its model.
    pub fn from_config(path: impl AsRef<Path>) -> FormworkResult<Model> {
        ModelConfig::from_path(path)?.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::FormworkError;
    use crate::core::types::Value;
    use std::io::Write;

    const SIGNUP: &str = r#"
name = "signup"
doctype = "xhtml"

[fields.title]
type = "char"
required = true
minLength = 3
maxLength = 50

[fields.age]
type = "integer"
minValue = 18
maxLength = 4

[fields.active]
type = "flag"

[fields.color]
choices = { r = "Red", g = "Green" }
defaultViewHelper = "formSelect"
validators = { InArray = { options = { haystack = ["r", "g"] } } }

[messages.age]
minValue = "Adults only"
"#;

    #[test]
    fn test_toml_model() {
        let config = ModelConfig::from_toml_str(SIGNUP).unwrap();
        assert_eq!(config.fields.len(), 4);
        assert_eq!(config.fields["title"].field_type, FieldType::Char);
        assert_eq!(config.fields["color"].field_type, FieldType::Field);

        let mut model = config.build().unwrap();
        assert_eq!(model.name(), "signup");
        model.field_mut("age").unwrap().set_value(12);
        model.field_mut("color").unwrap().set_value("b");
        model.field_mut("title").unwrap().set_value("Hello");

        let report = model.validate().unwrap();
        assert_eq!(report.message("age"), Some("Adults only"));
        assert_eq!(report.message("color"), Some("'b' was not found in the haystack"));
        assert!(report.message("title").is_none());

        let html = model.render("active", None).unwrap().unwrap();
        assert!(html.ends_with(" />"));
    }

    #[test]
    fn test_json_and_unknown_type() {
        let config = ModelConfig::from_json_str(
            r#"{"name": "m", "fields": {"n": {"type": "integer", "autoIntFilter": true}}}"#,
        )
        .unwrap();
        let mut model = config.build().unwrap();
        model.field_mut("n").unwrap().set_value(" 42 ");
        assert!(model.is_valid().unwrap());
        assert_eq!(model.data()["n"], Value::from(42));

        assert!(ModelConfig::from_json_str(r#"{"fields": {"n": {"type": "money"}}}"#).is_err());
        assert_eq!(
            "money".parse::<FieldType>(),
            Err(ConfigurationError::UnknownFieldType("money".to_string()))
        );
        assert_eq!("Character".parse::<FieldType>(), Ok(FieldType::Char));
    }

    #[test]
    fn test_unknown_references() {
        let config = ModelConfig::from_toml_str("[messages.ghost]\nflag = \"x\"\n").unwrap();
        assert!(matches!(
            config.build(),
            Err(FormworkError::Configuration(ConfigurationError::UnknownField(_)))
        ));

        let config = ModelConfig::from_toml_str("[fields.a]\ndependent = \"ghost\"\n").unwrap();
        assert!(config.build().is_err());
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contact.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[fields.email]\ntype = \"char\"\nrequired = true").unwrap();
        drop(file);

        let model = Model::from_config(&path).unwrap();
        assert_eq!(model.name(), "contact");
        assert!(model.field("email").unwrap().is_required());

        let other = dir.path().join("contact.yaml");
        std::fs::write(&other, "fields: {}").unwrap();
        assert!(matches!(
            ModelConfig::from_path(&other),
            Err(FormworkError::Configuration(ConfigurationError::UnsupportedFormat(_)))
        ));
    }
}
