//! Fields, field kinds and field options.
//!
//! A [`Field`] owns one validator, one filter and one renderer collection.
//! Its [`FieldKind`] describes the stages a typed field injects into them.

mod field;
pub mod kind;
pub mod options;

pub use field::Field;
pub use kind::{CharacterProfile, FieldKind, IntegerProfile, Stage};
pub use options::{FieldOptions, StageList};
