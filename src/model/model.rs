//! A named set of fields validated together.

use crate::core::error::{ConfigurationError, FormworkResult, PluginResult, ValidationReport};
use crate::core::types::{Attribs, Value};
use crate::field::{Field, FieldKind};
use crate::model::messages::{MessageSink, MessageTable};
use crate::plugins::set::PluginSet;
use indexmap::IndexMap;
use log::{debug, info};
use std::time::Instant;

/// Owner of fields, their messages and message templates.
///
/// # Example
///
/// ```ignore
/// let mut model = Model::new("signup");
/// model.add("title", FieldKind::character()).set_required(true);
/// model.populate(&data);
///
/// let report = model.validate()?;
/// println!("{}", report.summary());
/// ```
#[derive(Debug)]
pub struct Model {
    name: String,
    plugins: PluginSet,
    fields: IndexMap<String, Field>,
    messages: MessageTable,
}

impl Model {
    /// Create an empty model backed by the built-in plugins.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_plugins(name, PluginSet::new())
    }

    /// Create an empty model backed by a plugin set.
    pub fn with_plugins(name: impl Into<String>, plugins: PluginSet) -> Self {
        Self {
            name: name.into(),
            plugins,
            fields: IndexMap::new(),
            messages: MessageTable::new(),
        }
    }

    /// Model name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The plugin set new fields are created from.
    pub fn plugins(&self) -> &PluginSet {
        &self.plugins
    }

    // ========================================================================
    // Fields
    // ========================================================================

    /// Add a field, replacing one of the same name in place.
    pub fn add_field(&mut self, field: Field) -> &mut Field {
        let name = field.field_name().to_string();
        let index = match self.fields.get_index_of(&name) {
            Some(index) => {
                self.fields[index] = field;
                index
            }
            None => self.fields.insert_full(name, field).0,
        };
        &mut self.fields[index]
    }

    /// Create and add a field of the given kind.
    pub fn add(&mut self, name: &str, kind: FieldKind) -> &mut Field {
        let field = Field::with_plugins(name, kind, &self.plugins);
        self.add_field(field)
    }

    /// Get a field.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// Get a field mutably.
    pub fn field_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.get_mut(name)
    }

    /// All fields in declaration order.
    pub fn fields(&self) -> &IndexMap<String, Field> {
        &self.fields
    }

    /// Check whether a field exists.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    // ========================================================================
    // Data
    // ========================================================================

    /// Assign values to the fields named in `data`.
    pub fn populate(&mut self, data: &IndexMap<String, Value>) -> &mut Self {
        for (key, value) in data {
            match self.fields.get_mut(key) {
                Some(field) => {
                    field.set_value(value.clone());
                }
                None => debug!("Model '{}': no field '{}', value ignored", self.name, key),
            }
        }
        self
    }

    /// Values of the mapped fields, in declaration order.
    pub fn data(&self) -> IndexMap<String, Value> {
        self.fields
            .iter()
            .filter(|(_, field)| field.is_mapped())
            .map(|(name, field)| (name.clone(), field.value().clone()))
            .collect()
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Validate every field in order.
    ///
    /// Messages from a previous run are cleared first. A field is skipped
    /// when the field it depends on has already failed.
    pub fn validate(&mut self) -> PluginResult<ValidationReport> {
        let start = Instant::now();
        self.messages.clear_messages();
        let mut report = ValidationReport::new();

        for (name, field) in self.fields.iter_mut() {
            if let Some(dependent) = field.dependent() {
                if self.messages.has_message(dependent) {
                    debug!("Skipping '{}': '{}' failed", name, dependent);
                    report.add_skipped(name.clone());
                    continue;
                }
            }
            field.is_valid(&mut self.messages)?;
        }

        for (field, message) in self.messages.messages() {
            report.add_message(field.clone(), message.clone());
        }
        report.duration_ms = start.elapsed().as_millis() as u64;
        info!("Model '{}': {}", self.name, report.summary());
        Ok(report)
    }

    /// Validate one field, ignoring dependencies.
    pub fn validate_field(&mut self, name: &str) -> FormworkResult<bool> {
        let field = self
            .fields
            .get_mut(name)
            .ok_or_else(|| ConfigurationError::UnknownField(name.to_string()))?;
        Ok(field.is_valid(&mut self.messages)?)
    }

    /// Validate every field and report whether all passed.
    pub fn is_valid(&mut self) -> PluginResult<bool> {
        Ok(self.validate()?.success)
    }

    // ========================================================================
    // Messages
    // ========================================================================

    /// Record a message for a field.
    pub fn set_message(&mut self, field: &str, message: impl Into<String>) {
        self.messages.set_message(field, message.into());
    }

    /// Message recorded for a field.
    pub fn message(&self, field: &str) -> Option<&str> {
        self.messages.message(field)
    }

    /// All messages, keyed by field name.
    pub fn messages(&self) -> &IndexMap<String, String> {
        self.messages.messages()
    }

    /// Forget every message.
    pub fn clear_messages(&mut self) {
        self.messages.clear_messages();
    }

    /// Set the message template for a field and rule.
    pub fn set_message_template(&mut self, field: &str, rule: &str, template: impl Into<String>) {
        self.messages.set_template(field, rule, template);
    }

    /// Message template for a field and rule.
    pub fn message_template(&self, field: &str, rule: &str) -> Option<&str> {
        self.messages.template(field, rule)
    }

    /// The message table.
    pub fn message_table(&self) -> &MessageTable {
        &self.messages
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Render a field with its default renderer.
    pub fn render(&mut self, field: &str, attribs: Option<&Attribs>) -> FormworkResult<Option<String>> {
        let entry = self
            .fields
            .get_mut(field)
            .ok_or_else(|| ConfigurationError::UnknownField(field.to_string()))?;
        Ok(entry.render(field, attribs)?)
    }

    /// Render every field that has a default renderer, in order.
    pub fn render_all(&mut self) -> FormworkResult<Vec<(String, String)>> {
        let mut rendered = Vec::new();
        for (name, field) in self.fields.iter_mut() {
            if let Some(html) = field.render(name, None)? {
                rendered.push((name.clone(), html));
            }
        }
        Ok(rendered)
    }
}

impl MessageSink for Model {
    fn set_message(&mut self, field: &str, message: String) {
        self.messages.set_message(field, message);
    }

    fn message_template(&self, field: &str, rule: &str) -> Option<String> {
        self.messages.message_template(field, rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(pairs: &[(&str, Value)]) -> IndexMap<String, Value> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn test_title_scenario() {
        let mut model = Model::new("post");
        model
            .add("title", FieldKind::character())
            .set_required(true)
            .set_min_length(Some(3))
            .unwrap()
            .set_max_length(Some(50))
            .unwrap();
        model.populate(&data(&[("title", Value::from("  hi  "))]));

        let report = model.validate().unwrap();
        assert!(!report.success);
        assert_eq!(model.field("title").unwrap().value(), &Value::from("hi"));
        assert_eq!(report.message("title"), Some("'hi' is less than 3 characters long"));
        assert!(!report.message("title").unwrap().contains("more than"));
    }

    #[test]
    fn test_dependency_skip() {
        let mut model = Model::new("signup");
        model.add("password", FieldKind::character()).set_required(true);
        model
            .add("confirm", FieldKind::character())
            .set_required(true)
            .set_dependent(Some("password".to_string()));

        let report = model.validate().unwrap();
        assert_eq!(report.skipped, vec!["confirm"]);
        assert!(report.message("password").is_some());
        assert!(report.message("confirm").is_none());

        model.populate(&data(&[("password", Value::from("secret"))]));
        let report = model.validate().unwrap();
        assert!(report.skipped.is_empty());
        assert!(report.message("confirm").is_some());
        assert!(model.message("password").is_none());
    }

    #[test]
    fn test_templates_and_messages() {
        let mut model = Model::new("m");
        model.add("age", FieldKind::integer()).set_min_value(Some(18)).unwrap();
        model.set_message_template("age", "minValue", "Adults only");
        model.populate(&data(&[("age", Value::from(12))]));

        assert!(!model.is_valid().unwrap());
        assert_eq!(model.message("age"), Some("Adults only"));
        assert_eq!(model.message_template("age", "minValue"), Some("Adults only"));

        model.clear_messages();
        assert!(model.messages().is_empty());
    }

    #[test]
    fn test_data_and_populate() {
        let mut model = Model::new("m");
        model.add("a", FieldKind::Generic).set_null_when_empty(true);
        model.add("b", FieldKind::Generic).set_mapped(false);
        model.populate(&data(&[("a", Value::from("")), ("b", Value::from(1)), ("zzz", Value::from(2))]));

        let values = model.data();
        assert_eq!(values.len(), 1);
        assert_eq!(values["a"], Value::Null);
        assert!(!model.contains("zzz"));
    }

    #[test]
    fn test_add_field_replaces_in_place() {
        let mut model = Model::new("m");
        model.add("a", FieldKind::Generic);
        model.add("b", FieldKind::Generic);
        model.add("a", FieldKind::integer());
        let names: Vec<&String> = model.fields().keys().collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(model.field("a").unwrap().kind().label(), "integer");
    }

    #[test]
    fn test_render() {
        let mut model = Model::new("m");
        model.add("title", FieldKind::character()).set_value("x");
        model.add("note", FieldKind::Generic);

        let html = model.render("title", None).unwrap().unwrap();
        assert!(html.starts_with(r#"<input type="text" name="title""#));
        assert_eq!(model.render("note", None).unwrap(), None);
        assert!(model.render("missing", None).is_err());
        assert_eq!(model.render_all().unwrap().len(), 1);
    }

    #[test]
    fn test_validate_field() {
        let mut model = Model::new("m");
        model.add("n", FieldKind::integer()).set_value("x");
        assert!(!model.validate_field("n").unwrap());
        assert!(model.validate_field("missing").is_err());
    }
}
