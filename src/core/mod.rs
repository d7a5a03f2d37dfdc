//! Core types and traits for formwork.
//!
//! This module contains the foundational types that every pipeline is made of:
//! - The dynamic [`Value`] flowing through fields
//! - Plugin capability traits (validator, filter, renderer)
//! - Entry parameters
//! - The rendering context bound into renderers
//! - Error types and the validation report

pub mod types;
pub mod plugin;
pub mod params;
pub mod error;
pub mod context;

// Re-export commonly used types
pub use types::{Attribs, Choices, Value, ValueKind};
pub use plugin::{Filter, InputStyle, PluginType, RenderInput, Renderer, Validator, Violation};
pub use params::Params;
pub use error::{
    ConfigurationError, FormworkError, FormworkResult, OptionsError, PluginError, PluginResult,
    ValidationReport,
};
pub use context::{Doctype, RenderContext};
