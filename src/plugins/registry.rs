//! Type registry for managing constructible plugin types.
//!
//! A registry maps canonical type names (`validate::StringLength`) to
//! factories. Collections consult it twice: `contains` decides whether a
//! name resolves, `create` builds the instance on first access.

use crate::core::error::OptionsError;
use crate::core::types::Value;
use crate::plugins::kinds::PluginKind;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Factory function creating a plugin from optional constructor options.
pub type PluginFactory<K> = Arc<
    dyn Fn(Option<&Value>) -> Result<Box<<K as PluginKind>::Plugin>, OptionsError> + Send + Sync,
>;

/// Registry entry containing the factory and a short description.
pub struct RegistryEntry<K: PluginKind> {
    /// Factory function to create instances.
    pub factory: PluginFactory<K>,
    /// One-line description for listings.
    pub description: String,
}

impl<K: PluginKind> Clone for RegistryEntry<K> {
    fn clone(&self) -> Self {
        Self {
            factory: Arc::clone(&self.factory),
            description: self.description.clone(),
        }
    }
}

/// Registry of all constructible types of one plugin kind.
///
/// Registries are built once and then shared read-only through `Arc` by
/// every collection of that kind.
pub struct TypeRegistry<K: PluginKind> {
    /// Entries indexed by canonical type name.
    entries: IndexMap<String, RegistryEntry<K>>,
}

impl<K: PluginKind> TypeRegistry<K> {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Create a registry pre-populated with the built-in types of this kind.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        K::register_builtins(&mut registry);
        registry
    }

    /// Register a type under its canonical name.
    ///
    /// Registering an existing name replaces its factory.
    pub fn register<F>(&mut self, name: impl Into<String>, description: impl Into<String>, factory: F)
    where
        F: Fn(Option<&Value>) -> Result<Box<K::Plugin>, OptionsError> + Send + Sync + 'static,
    {
        let name = name.into();
        log::debug!("Registered {} type '{}'", K::TYPE, name);
        self.entries.insert(
            name,
            RegistryEntry {
                factory: Arc::new(factory),
                description: description.into(),
            },
        );
    }

    /// Create a new instance of a type.
    ///
    /// Returns `None` when the name is not registered.
    pub fn create(
        &self,
        name: &str,
        options: Option<&Value>,
    ) -> Option<Result<Box<K::Plugin>, OptionsError>> {
        self.entries.get(name).map(|entry| (entry.factory)(options))
    }

    /// Check if a type is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Get the description of a registered type.
    pub fn description(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(|e| e.description.as_str())
    }

    /// Get all registered type names, in registration order.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|s| s.as_str())
    }

    /// Search types by name or description.
    pub fn search(&self, query: &str) -> Vec<&str> {
        let query = query.to_lowercase();

        self.entries
            .iter()
            .filter(|(name, entry)| {
                name.to_lowercase().contains(&query)
                    || entry.description.to_lowercase().contains(&query)
            })
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Add every type of another registry, replacing same-named types.
    pub fn merge(&mut self, other: TypeRegistry<K>) {
        self.entries.extend(other.entries);
    }

    /// Unregister a type.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.entries.shift_remove(name).is_some()
    }

    /// Get the total number of registered types.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: PluginKind> Default for TypeRegistry<K> {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl<K: PluginKind> Clone for TypeRegistry<K> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<K: PluginKind> fmt::Debug for TypeRegistry<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("kind", &K::TYPE)
            .field("types", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::plugin::{Filter, Validator};
    use crate::plugins::kinds::{FilterKind, ValidatorKind};

    struct Upper;

    impl Filter for Upper {
        fn type_name(&self) -> &str {
            "app::Upper"
        }

        fn filter(&self, value: Value) -> Value {
            Value::from(value.to_text().to_uppercase())
        }
    }

    #[test]
    fn test_register_and_create() {
        let mut registry = TypeRegistry::<FilterKind>::new();
        registry.register("app::Upper", "Upper-case text", |_| Ok(Box::new(Upper)));

        assert!(registry.contains("app::Upper"));

        let filter = registry.create("app::Upper", None).unwrap().unwrap();
        assert_eq!(filter.filter(Value::from("ab")), Value::from("AB"));
        assert!(registry.create("app::Lower", None).is_none());
    }

    #[test]
    fn test_builtins_present() {
        let registry = TypeRegistry::<ValidatorKind>::with_builtins();
        assert!(registry.contains("validate::NotEmpty"));
        assert!(registry.contains("validate::MinValue"));
        assert!(!registry.contains("NotEmpty"));
    }

    #[test]
    fn test_factory_rejects_options() {
        let registry = TypeRegistry::<ValidatorKind>::with_builtins();
        let created = registry.create("validate::MinValue", None).unwrap();
        let error = created.err().unwrap();
        assert_eq!(error, OptionsError::Missing("min"));

        let options = Value::from(3);
        let validator: Box<dyn Validator> =
            registry.create("validate::MinValue", Some(&options)).unwrap().unwrap();
        assert!(validator.validate(&Value::from(2)).is_err());
    }

    #[test]
    fn test_search() {
        let registry = TypeRegistry::<FilterKind>::with_builtins();
        let results = registry.search("trim");
        assert!(results.contains(&"filter::StringTrim"));
        assert!(registry.search("nonexistent").is_empty());
    }

    #[test]
    fn test_unregister() {
        let mut registry = TypeRegistry::<FilterKind>::with_builtins();
        assert!(registry.unregister("filter::Int"));
        assert!(!registry.contains("filter::Int"));
        assert!(!registry.unregister("filter::Int"));
    }
}
