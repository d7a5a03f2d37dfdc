//! Plugin module.
//!
//! Contains the type registries, the generic lazy collection, the three
//! capability kinds and the built-in plugin implementations.

pub mod builtin;
pub mod collection;
pub mod kinds;
pub mod registry;
pub mod set;

pub use collection::{PluginCollection, Slot};
pub use kinds::{
    FilterCollection, FilterKind, PluginKind, RendererCollection, RendererKind,
    ValidatorCollection, ValidatorKind,
};
pub use registry::{PluginFactory, TypeRegistry};
pub use set::{PluginSet, PluginSetBuilder};
