//! # Formwork - Field Filtering and Validation Pipelines
//!
//! Formwork attaches ordered pipelines of filters, validators and renderers
//! to the fields of a model. Plugins are registered by name in type
//! registries, looked up by short or canonical name, and constructed lazily
//! the first time a pipeline needs them.
//!
//! ## Features
//!
//! - **Named plugins**: `notEmpty`, `NotEmpty` and `validate::NotEmpty` all resolve to the same type
//! - **Lazy construction**: plugins are built from their stored options on first use, then memoized
//! - **Ordered pipelines**: filters and validators run in collection order; the first failure wins
//! - **Typed fields**: character, integer and flag fields inject the stages their settings need
//! - **Configuration files**: whole models load from TOML or JSON
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use formwork::prelude::*;
//!
//! let mut model = Model::new("post");
//! model
//!     .add("title", FieldKind::character())
//!     .set_required(true)
//!     .set_min_length(Some(3))?;
//! model
//!     .add("tags", FieldKind::Generic)
//!     .filters_mut()
//!     .set("StringToLower", Params::new())?;
//!
//! model.field_mut("title").unwrap().set_value("  hi  ");
//!
//! let report = model.validate()?;
//! assert!(!report.success);
//! println!("{}", report.summary());
//! for line in report.detailed_messages() {
//!     println!("  {}", line);
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: values, capability traits, parameters, errors and the rendering context
//! - [`plugins`]: type registries, the lazy plugin collection and the built-in plugins
//! - [`field`]: fields and the stage profiles of typed fields
//! - [`model`]: models, message tables and configuration loading
//!
//! ## Custom Plugins
//!
//! Implement [`Validator`](core::Validator), [`Filter`](core::Filter) or
//! [`Renderer`](core::Renderer) and register a factory:
//!
//! ```rust,ignore
//! use formwork::prelude::*;
//!
//! struct Even;
//!
//! impl Validator for Even {
//!     fn type_name(&self) -> &str {
//!         "app::Even"
//!     }
//!
//!     fn validate(&self, value: &Value) -> Result<(), Violation> {
//!         match value.as_integer() {
//!             Some(n) if n % 2 == 0 => Ok(()),
//!             _ => Err(Violation::new("notEven", "Value must be even")),
//!         }
//!     }
//! }
//!
//! let plugins = PluginSet::builder()
//!     .validator("app::Even", "Accepts even integers", |_| Ok(Box::new(Even)))
//!     .build();
//!
//! let mut field = Field::with_plugins("count", FieldKind::integer(), &plugins);
//! field.validators_mut().set("app::Even", Params::new())?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod core;
pub mod field;
pub mod model;
pub mod plugins;

/// Prelude module for convenient imports.
///
/// Import everything commonly needed with:
/// ```rust,ignore
/// use formwork::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use crate::core::types::{Attribs, Choices, Value, ValueKind};
    pub use crate::core::params::Params;
    pub use crate::core::context::{Doctype, RenderContext};

    // Capabilities
    pub use crate::core::plugin::{
        Filter, InputStyle, PluginType, RenderInput, Renderer, Validator, Violation,
    };

    // Errors
    pub use crate::core::error::{
        ConfigurationError, FormworkError, FormworkResult, OptionsError, PluginError,
        PluginResult, ValidationReport,
    };

    // Plugins
    pub use crate::plugins::collection::PluginCollection;
    pub use crate::plugins::kinds::{
        FilterCollection, PluginKind, RendererCollection, ValidatorCollection,
    };
    pub use crate::plugins::registry::TypeRegistry;
    pub use crate::plugins::set::{PluginSet, PluginSetBuilder};

    // Fields
    pub use crate::field::{Field, FieldKind, FieldOptions, Stage};

    // Models
    pub use crate::model::{MessageSink, MessageTable, Model, ModelConfig};
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
        assert_eq!(super::NAME, "formwork");
    }

    struct Even;

    impl Validator for Even {
        fn type_name(&self) -> &str {
            "app::Even"
        }

        fn validate(&self, value: &Value) -> Result<(), Violation> {
            match value.as_integer() {
                Some(n) if n % 2 == 0 => Ok(()),
                _ => Err(Violation::new("notEven", "Value must be even")),
            }
        }
    }

    #[test]
    fn test_custom_validator_in_model() {
        let plugins = PluginSet::builder()
            .validator("app::Even", "Accepts even integers", |_| Ok(Box::new(Even)))
            .build();
        let mut model = Model::with_plugins("m", plugins);
        model
            .add("count", FieldKind::integer())
            .validators_mut()
            .set("app::Even", Params::new())
            .unwrap();

        model.field_mut("count").unwrap().set_value(3);
        let report = model.validate().unwrap();
        assert_eq!(report.message("count"), Some("Value must be even"));

        model.field_mut("count").unwrap().set_value(4);
        assert!(model.is_valid().unwrap());
    }
}
