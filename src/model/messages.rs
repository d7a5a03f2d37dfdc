//! Validation messages and message templates.
//!
//! Fields do not hold a reference to their model. They report failures to
//! a [`MessageSink`] handed to them for the duration of one call.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Receiver of validation messages.
pub trait MessageSink {
    /// Record the failure message of a field, replacing any previous one.
    fn set_message(&mut self, field: &str, message: String);

    /// Template overriding the default message of a rule for a field.
    fn message_template(&self, field: &str, rule: &str) -> Option<String>;
}

/// Per-field messages plus per-field, per-rule templates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageTable {
    messages: IndexMap<String, String>,
    templates: IndexMap<String, IndexMap<String, String>>,
}

impl MessageTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Message recorded for a field.
    pub fn message(&self, field: &str) -> Option<&str> {
        self.messages.get(field).map(String::as_str)
    }

    /// Check whether a field has a message.
    pub fn has_message(&self, field: &str) -> bool {
        self.messages.contains_key(field)
    }

    /// All messages, in the order they were recorded.
    pub fn messages(&self) -> &IndexMap<String, String> {
        &self.messages
    }

    /// Forget every message; templates are kept.
    pub fn clear_messages(&mut self) {
        self.messages.clear();
    }

    /// Set the template for a field and rule.
    pub fn set_template(&mut self, field: &str, rule: &str, template: impl Into<String>) {
        self.templates
            .entry(field.to_string())
            .or_default()
            .insert(rule.to_string(), template.into());
    }

    /// Template for a field and rule.
    pub fn template(&self, field: &str, rule: &str) -> Option<&str> {
        self.templates
            .get(field)
            .and_then(|rules| rules.get(rule))
            .map(String::as_str)
    }

    /// All templates, by field then rule.
    pub fn templates(&self) -> &IndexMap<String, IndexMap<String, String>> {
        &self.templates
    }
}

impl MessageSink for MessageTable {
    fn set_message(&mut self, field: &str, message: String) {
        self.messages.insert(field.to_string(), message);
    }

    fn message_template(&self, field: &str, rule: &str) -> Option<String> {
        self.template(field, rule).map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let mut table = MessageTable::new();
        table.set_message("title", "too short".to_string());
        table.set_message("age", "not a number".to_string());
        table.set_message("title", "required".to_string());

        assert_eq!(table.message("title"), Some("required"));
        let fields: Vec<&String> = table.messages().keys().collect();
        assert_eq!(fields, vec!["title", "age"]);

        table.clear_messages();
        assert!(!table.has_message("title"));
    }

    #[test]
    fn test_templates() {
        let mut table = MessageTable::new();
        table.set_template("age", "minValue", "Too young");
        assert_eq!(table.message_template("age", "minValue").as_deref(), Some("Too young"));
        assert_eq!(table.message_template("age", "maxValue"), None);
        table.clear_messages();
        assert_eq!(table.template("age", "minValue"), Some("Too young"));
    }
}
