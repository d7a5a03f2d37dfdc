//! Plugin kinds.
//!
//! A kind ties together everything a collection needs to know about one
//! capability: the trait object it stores, the resolution prefix for short
//! names, and the step that binds a freshly built plugin to its environment.

use crate::core::context::RenderContext;
use crate::core::plugin::{Filter, PluginType, Renderer, Validator};
use crate::plugins::builtin;
use crate::plugins::collection::PluginCollection;
use crate::plugins::registry::TypeRegistry;
use std::fmt;
use std::sync::Arc;

/// Static description of one plugin capability.
pub trait PluginKind: Sized + 'static {
    /// Trait object type stored by collections of this kind.
    type Plugin: ?Sized + Send + Sync;

    /// Environment bound into every plugin after construction.
    type Binding: Clone + Default + fmt::Debug + Send + Sync;

    /// Plugin type, used in errors and logs.
    const TYPE: PluginType;

    /// Prefix prepended to short names during resolution.
    const PREFIX: &'static str;

    /// Canonical type name of an instance.
    fn type_name(plugin: &Self::Plugin) -> &str;

    /// Bind a plugin to the collection's environment.
    fn bind(plugin: &mut Self::Plugin, binding: &Self::Binding);

    /// Register the built-in types of this kind.
    fn register_builtins(registry: &mut TypeRegistry<Self>);
}

/// Validator capability.
#[derive(Debug, Clone, Copy)]
pub struct ValidatorKind;

impl PluginKind for ValidatorKind {
    type Plugin = dyn Validator;
    type Binding = ();

    const TYPE: PluginType = PluginType::Validator;
    const PREFIX: &'static str = "validate::";

    fn type_name(plugin: &Self::Plugin) -> &str {
        plugin.type_name()
    }

    fn bind(_plugin: &mut Self::Plugin, _binding: &Self::Binding) {}

    fn register_builtins(registry: &mut TypeRegistry<Self>) {
        builtin::register_validators(registry);
    }
}

/// Filter capability.
#[derive(Debug, Clone, Copy)]
pub struct FilterKind;

impl PluginKind for FilterKind {
    type Plugin = dyn Filter;
    type Binding = ();

    const TYPE: PluginType = PluginType::Filter;
    const PREFIX: &'static str = "filter::";

    fn type_name(plugin: &Self::Plugin) -> &str {
        plugin.type_name()
    }

    fn bind(_plugin: &mut Self::Plugin, _binding: &Self::Binding) {}

    fn register_builtins(registry: &mut TypeRegistry<Self>) {
        builtin::register_filters(registry);
    }
}

/// Renderer capability; renderers are bound to a [`RenderContext`].
#[derive(Debug, Clone, Copy)]
pub struct RendererKind;

impl PluginKind for RendererKind {
    type Plugin = dyn Renderer;
    type Binding = Arc<RenderContext>;

    const TYPE: PluginType = PluginType::Renderer;
    const PREFIX: &'static str = "view::";

    fn type_name(plugin: &Self::Plugin) -> &str {
        plugin.type_name()
    }

    fn bind(plugin: &mut Self::Plugin, binding: &Self::Binding) {
        plugin.set_view(Arc::clone(binding));
    }

    fn register_builtins(registry: &mut TypeRegistry<Self>) {
        builtin::register_renderers(registry);
    }
}

/// Ordered collection of validators.
pub type ValidatorCollection = PluginCollection<ValidatorKind>;

/// Ordered collection of filters.
pub type FilterCollection = PluginCollection<FilterKind>;

/// Ordered collection of renderers.
pub type RendererCollection = PluginCollection<RendererKind>;
