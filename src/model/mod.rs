//! Models: named sets of fields with a shared message table.
//!
//! A [`Model`] validates its fields in declaration order, honours field
//! dependencies and collects one failure message per field. Models can be
//! built by hand or loaded from a [`ModelConfig`] file.

pub mod config;
pub mod messages;
mod model;

pub use config::{FieldConfig, FieldType, ModelConfig};
pub use messages::{MessageSink, MessageTable};
pub use model::Model;
