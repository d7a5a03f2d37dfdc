//! Per-entry plugin parameters.
//!
//! Each collection entry carries a free-form parameter map. Two keys have
//! meaning to the library:
//!
//! - `options`: handed to the plugin constructor on first access.
//! - `attribs`: extra element attributes for renderers.
//!
//! Anything else (e.g. `listsep`) is interpreted by whoever reads it.

use crate::core::types::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Key of the constructor options entry.
pub const OPTIONS: &str = "options";

/// Key of the renderer attributes entry.
pub const ATTRIBS: &str = "attribs";

/// Ordered parameter map attached to a collection entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(IndexMap<String, Value>);

impl Params {
    /// Create an empty parameter map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create parameters holding only constructor options.
    pub fn with_options(options: impl Into<Value>) -> Self {
        Self::new().with(OPTIONS, options)
    }

    /// Add a parameter (builder style).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Constructor options, if any.
    pub fn options(&self) -> Option<&Value> {
        self.0.get(OPTIONS)
    }

    /// Get a parameter.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Set a parameter, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Remove a parameter, keeping the order of the others.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    /// Check if a parameter is present.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Iterate parameters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<IndexMap<String, Value>> for Params {
    fn from(map: IndexMap<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Value> for Params {
    /// A map becomes the parameter map; any other value becomes `options`.
    fn from(value: Value) -> Self {
        match value {
            Value::Map(map) => Self(map),
            Value::Null => Self::new(),
            other => Self::with_options(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_entry() {
        let mut options = IndexMap::new();
        options.insert("min".to_string(), Value::from(3));
        let params = Params::with_options(options).with("listsep", " | ");

        assert_eq!(params.options().and_then(|o| o.as_map()).map(|m| m.len()), Some(1));
        assert_eq!(params.get("listsep"), Some(&Value::from(" | ")));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut params = Params::new().with("a", 1).with("b", 2).with("c", 3);
        params.remove("b");
        let keys: Vec<&str> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "c"]);
    }

    #[test]
    fn test_from_value() {
        assert!(Params::from(Value::Null).is_empty());
        assert_eq!(Params::from(Value::from(5)).options(), Some(&Value::from(5)));
    }
}
