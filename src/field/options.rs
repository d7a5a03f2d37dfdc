//! Field configuration options.
//!
//! Options use the camelCase keys of model configuration files. Every key
//! is optional; absent keys leave the field untouched.

use crate::core::params::Params;
use crate::core::types::{Choices, Value};
use crate::field::kind::Stage;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Recognized options of one field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldOptions {
    /// Element name used when rendering.
    pub name: Option<String>,
    /// Value shown when the field has none.
    pub default_value: Option<Value>,
    /// Whether the field must be filled in.
    pub required: Option<bool>,
    /// Whether an empty value reads back as null.
    pub null_when_empty: Option<bool>,
    /// Whether the value is part of the model's data.
    pub mapped: Option<bool>,
    /// Field whose failure skips this field's validation.
    pub dependent: Option<String>,
    /// Renderer used by `render`.
    pub default_view_helper: Option<String>,
    /// Choices for select and radio renderers.
    pub choices: Option<Choices>,
    /// Character fields: minimum length.
    pub min_length: Option<usize>,
    /// Character fields: maximum length.
    pub max_length: Option<usize>,
    /// Character fields: install the trim filter.
    pub auto_trim: Option<bool>,
    /// Character fields: trim filter name.
    pub auto_trim_filter: Option<String>,
    /// Integer fields: minimum value.
    pub min_value: Option<i64>,
    /// Integer fields: maximum value.
    pub max_value: Option<i64>,
    /// Integer fields: install the integer filter.
    pub auto_int_filter: Option<bool>,
    /// Validators to register, in order.
    pub validators: StageList,
    /// Filters to register, in order.
    pub filters: StageList,
    /// Renderers to register, in order.
    pub view_helpers: StageList,
    /// Keys no field understands; reported and ignored.
    #[serde(flatten)]
    pub unknown: IndexMap<String, Value>,
}

/// Ordered plugin list of a configuration entry.
///
/// Accepts either a list of names (`["NotEmpty", "Int"]`) or an ordered map
/// of name to params (`{ StringLength = { options = { min = 3 } } }`). A
/// non-map params value is taken as the constructor options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "StageListRepr", into = "IndexMap<String, Params>")]
pub struct StageList(pub Vec<Stage>);

#[derive(Deserialize)]
#[serde(untagged)]
enum StageListRepr {
    Names(Vec<String>),
    Map(IndexMap<String, Value>),
}

impl From<StageListRepr> for StageList {
    fn from(repr: StageListRepr) -> Self {
        match repr {
            StageListRepr::Names(names) => StageList(names.into_iter().map(Stage::new).collect()),
            StageListRepr::Map(map) => StageList(
                map.into_iter()
                    .map(|(name, params)| Stage {
                        name,
                        params: Params::from(params),
                    })
                    .collect(),
            ),
        }
    }
}

impl From<StageList> for IndexMap<String, Params> {
    fn from(list: StageList) -> Self {
        list.0.into_iter().map(|stage| (stage.name, stage.params)).collect()
    }
}

impl StageList {
    /// Iterate stages in order.
    pub fn iter(&self) -> impl Iterator<Item = &Stage> {
        self.0.iter()
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if there are no stages.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FieldOptions {
    /// Names of the length/trim options that are set.
    pub(crate) fn character_keys(&self) -> Vec<&'static str> {
        let mut keys = Vec::new();
        if self.min_length.is_some() {
            keys.push("minLength");
        }
        if self.max_length.is_some() {
            keys.push("maxLength");
        }
        if self.auto_trim.is_some() {
            keys.push("autoTrim");
        }
        if self.auto_trim_filter.is_some() {
            keys.push("autoTrimFilter");
        }
        keys
    }

    /// Names of the value-bound/int-filter options that are set.
    pub(crate) fn integer_keys(&self) -> Vec<&'static str> {
        let mut keys = Vec::new();
        if self.min_value.is_some() {
            keys.push("minValue");
        }
        if self.max_value.is_some() {
            keys.push("maxValue");
        }
        if self.auto_int_filter.is_some() {
            keys.push("autoIntFilter");
        }
        keys
    }
}
