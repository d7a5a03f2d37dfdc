//! The registries of all three plugin kinds, bundled.
//!
//! Fields create their collections from a [`PluginSet`]. Cloning a set is
//! cheap: the registries and the rendering context are shared.

use crate::core::context::RenderContext;
use crate::core::error::OptionsError;
use crate::core::plugin::{Filter, PluginType, Renderer, Validator};
use crate::core::types::Value;
use crate::plugins::kinds::{
    FilterCollection, FilterKind, RendererCollection, RendererKind, ValidatorCollection,
    ValidatorKind,
};
use crate::plugins::registry::TypeRegistry;
use std::sync::Arc;

/// Shared validator, filter and renderer registries plus the rendering context.
#[derive(Debug, Clone)]
pub struct PluginSet {
    validators: Arc<TypeRegistry<ValidatorKind>>,
    filters: Arc<TypeRegistry<FilterKind>>,
    renderers: Arc<TypeRegistry<RendererKind>>,
    view: Arc<RenderContext>,
}

impl PluginSet {
    /// Create a set holding the built-in plugins and the default context.
    pub fn new() -> Self {
        PluginSetBuilder::new().build()
    }

    /// Start building a customized set.
    pub fn builder() -> PluginSetBuilder {
        PluginSetBuilder::new()
    }

    /// The validator registry.
    pub fn validators(&self) -> &Arc<TypeRegistry<ValidatorKind>> {
        &self.validators
    }

    /// The filter registry.
    pub fn filters(&self) -> &Arc<TypeRegistry<FilterKind>> {
        &self.filters
    }

    /// The renderer registry.
    pub fn renderers(&self) -> &Arc<TypeRegistry<RendererKind>> {
        &self.renderers
    }

    /// The rendering context bound into renderers.
    pub fn view(&self) -> &Arc<RenderContext> {
        &self.view
    }

    /// Create an empty validator collection.
    pub fn validator_collection(&self) -> ValidatorCollection {
        ValidatorCollection::new(Arc::clone(&self.validators))
    }

    /// Create an empty filter collection.
    pub fn filter_collection(&self) -> FilterCollection {
        FilterCollection::new(Arc::clone(&self.filters))
    }

    /// Create an empty renderer collection bound to this set's context.
    pub fn renderer_collection(&self) -> RendererCollection {
        RendererCollection::with_binding(Arc::clone(&self.renderers), Arc::clone(&self.view))
    }

    /// Every registered type name with its kind and description.
    pub fn catalog(&self) -> Vec<(PluginType, &str, &str)> {
        let validators = self
            .validators
            .type_names()
            .map(|name| (PluginType::Validator, name, self.validators.description(name)));
        let filters = self
            .filters
            .type_names()
            .map(|name| (PluginType::Filter, name, self.filters.description(name)));
        let renderers = self
            .renderers
            .type_names()
            .map(|name| (PluginType::Renderer, name, self.renderers.description(name)));

        validators
            .chain(filters)
            .chain(renderers)
            .map(|(kind, name, description)| (kind, name, description.unwrap_or_default()))
            .collect()
    }

    /// Search all registries by name or description.
    pub fn search(&self, query: &str) -> Vec<(PluginType, &str)> {
        let mut results: Vec<(PluginType, &str)> = Vec::new();
        results.extend(self.validators.search(query).into_iter().map(|n| (PluginType::Validator, n)));
        results.extend(self.filters.search(query).into_iter().map(|n| (PluginType::Filter, n)));
        results.extend(self.renderers.search(query).into_iter().map(|n| (PluginType::Renderer, n)));
        results
    }
}

impl Default for PluginSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for creating a customized plugin set.
pub struct PluginSetBuilder {
    validators: TypeRegistry<ValidatorKind>,
    filters: TypeRegistry<FilterKind>,
    renderers: TypeRegistry<RendererKind>,
    view: RenderContext,
    include_builtins: bool,
}

impl PluginSetBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            validators: TypeRegistry::new(),
            filters: TypeRegistry::new(),
            renderers: TypeRegistry::new(),
            view: RenderContext::default(),
            include_builtins: true,
        }
    }

    /// Include or exclude built-in plugins.
    pub fn with_builtins(mut self, include: bool) -> Self {
        self.include_builtins = include;
        self
    }

    /// Set the rendering context.
    pub fn view(mut self, view: RenderContext) -> Self {
        self.view = view;
        self
    }

    /// Register a custom validator type.
    pub fn validator<F>(mut self, name: &str, description: &str, factory: F) -> Self
    where
        F: Fn(Option<&Value>) -> Result<Box<dyn Validator>, OptionsError> + Send + Sync + 'static,
    {
        self.validators.register(name, description, factory);
        self
    }

    /// Register a custom filter type.
    pub fn filter<F>(mut self, name: &str, description: &str, factory: F) -> Self
    where
        F: Fn(Option<&Value>) -> Result<Box<dyn Filter>, OptionsError> + Send + Sync + 'static,
    {
        self.filters.register(name, description, factory);
        self
    }

    /// Register a custom renderer type.
    pub fn renderer<F>(mut self, name: &str, description: &str, factory: F) -> Self
    where
        F: Fn(Option<&Value>) -> Result<Box<dyn Renderer>, OptionsError> + Send + Sync + 'static,
    {
        self.renderers.register(name, description, factory);
        self
    }

    /// Build the set. Custom types replace built-ins of the same name.
    pub fn build(self) -> PluginSet {
        PluginSet {
            validators: Arc::new(with_builtins(self.validators, self.include_builtins)),
            filters: Arc::new(with_builtins(self.filters, self.include_builtins)),
            renderers: Arc::new(with_builtins(self.renderers, self.include_builtins)),
            view: Arc::new(self.view),
        }
    }
}

fn with_builtins<K: crate::plugins::kinds::PluginKind>(
    custom: TypeRegistry<K>,
    include: bool,
) -> TypeRegistry<K> {
    if !include {
        return custom;
    }
    let mut registry = TypeRegistry::with_builtins();
    registry.merge(custom);
    registry
}

impl Default for PluginSetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::Doctype;
    use crate::core::params::Params;
    use crate::core::plugin::Violation;

    struct Even;

    impl Validator for Even {
        fn type_name(&self) -> &str {
            "validate::Even"
        }

        fn validate(&self, value: &Value) -> Result<(), Violation> {
            if value.to_integer() % 2 == 0 {
                Ok(())
            } else {
                Err(Violation::new("notEven", "Value must be even"))
            }
        }
    }

    #[test]
    fn test_builder_registers_custom_types() {
        let plugins = PluginSet::builder()
            .validator("validate::Even", "Even integers", |_| Ok(Box::new(Even)))
            .build();

        let mut validators = plugins.validator_collection();
        validators.set("even", Params::new()).unwrap();
        validators.set("notEmpty", Params::new()).unwrap();
        let even = validators.get("even").unwrap().unwrap();
        assert!(even.validate(&Value::from(3)).is_err());
    }

    #[test]
    fn test_without_builtins() {
        let plugins = PluginSet::builder().with_builtins(false).build();
        assert!(plugins.validators().is_empty());
        assert!(plugins.validator_collection().set("NotEmpty", Params::new()).is_err());
    }

    #[test]
    fn test_renderer_collection_uses_set_view() {
        let plugins = PluginSet::builder()
            .view(RenderContext::new(Doctype::Xhtml))
            .build();
        let collection = plugins.renderer_collection();
        assert_eq!(collection.binding().doctype, Doctype::Xhtml);
    }

    #[test]
    fn test_search_and_catalog() {
        let plugins = PluginSet::new();
        let results = plugins.search("digit");
        assert!(results.contains(&(PluginType::Validator, "validate::Digits")));
        assert!(results.contains(&(PluginType::Filter, "filter::Digits")));
        assert_eq!(plugins.catalog().len(), 26);
    }
}
