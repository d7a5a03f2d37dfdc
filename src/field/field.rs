//! A model field and its filter/validate/render pipeline.

use crate::core::error::{ConfigurationError, FormworkResult, PluginResult};
use crate::core::params::{Params, ATTRIBS};
use crate::core::plugin::{InputStyle, RenderInput};
use crate::core::types::{Attribs, Choices, Value};
use crate::field::kind::{FieldKind, Stage};
use crate::field::options::{FieldOptions, StageList};
use crate::model::messages::MessageSink;
use crate::plugins::kinds::{
    FilterCollection, PluginKind, RendererCollection, ValidatorCollection,
};
use crate::plugins::collection::PluginCollection;
use crate::plugins::set::PluginSet;
use log::{debug, warn};

static NULL: Value = Value::Null;

/// Stage names a field installed on its own, so they can be re-derived
/// when the field's settings change.
#[derive(Debug, Clone, Default)]
struct Installed {
    validators: Vec<String>,
    filters: Vec<String>,
}

/// One field of a model.
///
/// A field owns a validator, a filter and a renderer collection. Filtering
/// runs every filter in order and stores the result; validation filters
/// first, then runs validators until the first failure, which is reported
/// to the [`MessageSink`] under the field name.
///
/// # Example
///
/// ```ignore
/// let mut title = Field::character("title");
/// title.set_required(true).set_min_length(Some(3))?;
/// title.set_value("  hi  ");
///
/// let mut messages = MessageTable::new();
/// assert!(!title.is_valid(&mut messages)?);
/// assert_eq!(title.value(), &Value::from("hi"));
/// ```
#[derive(Debug)]
pub struct Field {
    field_name: String,
    name: Option<String>,
    value: Value,
    default_value: Value,
    choices: Choices,
    required: bool,
    null_when_empty: bool,
    mapped: bool,
    dependent: Option<String>,
    default_renderer: Option<String>,
    kind: FieldKind,
    validators: ValidatorCollection,
    filters: FilterCollection,
    renderers: RendererCollection,
    installed: Installed,
}

impl Field {
    /// Create a generic field backed by the built-in plugins.
    pub fn new(field_name: impl Into<String>) -> Self {
        Self::with_plugins(field_name, FieldKind::Generic, &PluginSet::new())
    }

    /// Create a character field backed by the built-in plugins.
    pub fn character(field_name: impl Into<String>) -> Self {
        Self::with_plugins(field_name, FieldKind::character(), &PluginSet::new())
    }

    /// Create an integer field backed by the built-in plugins.
    pub fn integer(field_name: impl Into<String>) -> Self {
        Self::with_plugins(field_name, FieldKind::integer(), &PluginSet::new())
    }

    /// Create a flag field backed by the built-in plugins.
    pub fn flag(field_name: impl Into<String>) -> Self {
        Self::with_plugins(field_name, FieldKind::flag(), &PluginSet::new())
    }

    /// Create a field of any kind backed by a plugin set.
    pub fn with_plugins(field_name: impl Into<String>, kind: FieldKind, plugins: &PluginSet) -> Self {
        Self {
            field_name: field_name.into(),
            name: None,
            value: Value::Null,
            default_value: Value::Null,
            choices: Choices::new(),
            required: false,
            null_when_empty: false,
            mapped: true,
            dependent: None,
            default_renderer: kind.default_renderer().map(str::to_string),
            kind,
            validators: plugins.validator_collection(),
            filters: plugins.filter_collection(),
            renderers: plugins.renderer_collection(),
            installed: Installed::default(),
        }
    }

    // ========================================================================
    // Properties
    // ========================================================================

    /// Model-facing key, used for messages and templates.
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// Element name override used when rendering.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Set the element name override.
    pub fn set_name(&mut self, name: Option<String>) -> &mut Self {
        self.name = name;
        self
    }

    /// The kind of this field.
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// The current value, or null when empty and null-when-empty is set.
    pub fn value(&self) -> &Value {
        if self.null_when_empty && self.is_empty() {
            &NULL
        } else {
            &self.value
        }
    }

    /// The stored value, unaffected by null-when-empty.
    pub fn raw_value(&self) -> &Value {
        &self.value
    }

    /// Set the value.
    pub fn set_value(&mut self, value: impl Into<Value>) -> &mut Self {
        self.value = value.into();
        self
    }

    /// The default value shown when the field has no value.
    pub fn default_value(&self) -> &Value {
        &self.default_value
    }

    /// Set the default value.
    pub fn set_default_value(&mut self, value: impl Into<Value>) -> &mut Self {
        self.default_value = value.into();
        self
    }

    /// Choices for select and radio renderers.
    pub fn choices(&self) -> &Choices {
        &self.choices
    }

    /// Set the choices.
    pub fn set_choices(&mut self, choices: Choices) -> &mut Self {
        self.choices = choices;
        self
    }

    /// Whether the field must be filled in.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Set the required flag.
    pub fn set_required(&mut self, required: bool) -> &mut Self {
        if self.required != required {
            self.reset_installed();
        }
        self.required = required;
        self
    }

    /// Whether an empty value reads back as null.
    pub fn is_null_when_empty(&self) -> bool {
        self.null_when_empty
    }

    /// Set the null-when-empty flag.
    pub fn set_null_when_empty(&mut self, enabled: bool) -> &mut Self {
        self.null_when_empty = enabled;
        self
    }

    /// Whether the value belongs to the model's data.
    pub fn is_mapped(&self) -> bool {
        self.mapped
    }

    /// Set the mapped flag.
    pub fn set_mapped(&mut self, mapped: bool) -> &mut Self {
        self.mapped = mapped;
        self
    }

    /// Field whose failure skips validation of this one.
    pub fn dependent(&self) -> Option<&str> {
        self.dependent.as_deref()
    }

    /// Set the dependency.
    pub fn set_dependent(&mut self, field: Option<String>) -> &mut Self {
        self.dependent = field;
        self
    }

    /// Renderer used by [`render`](Self::render).
    pub fn default_renderer(&self) -> Option<&str> {
        self.default_renderer.as_deref()
    }

    /// Set the default renderer.
    pub fn set_default_renderer(&mut self, renderer: Option<String>) -> &mut Self {
        self.default_renderer = renderer;
        self
    }

    /// Whether the value counts as "no input".
    ///
    /// Numeric zero and `"0"` are never empty; null, `false`, blank strings
    /// and empty lists are.
    pub fn is_empty(&self) -> bool {
        self.value.is_blank()
    }

    // ========================================================================
    // Kind settings
    // ========================================================================

    fn not_applicable(&self, option: &str) -> ConfigurationError {
        ConfigurationError::NotApplicable {
            field: self.field_name.clone(),
            kind: self.kind.label().to_string(),
            option: option.to_string(),
        }
    }

    /// Set the minimum length of a character field.
    pub fn set_min_length(&mut self, min: Option<usize>) -> Result<&mut Self, ConfigurationError> {
        let error = self.not_applicable("minLength");
        let profile = self.kind.character_profile_mut().ok_or(error)?;
        profile.set_min_length(&self.field_name, min)?;
        self.reset_installed();
        Ok(self)
    }

    /// Set the maximum length of a character field.
    pub fn set_max_length(&mut self, max: Option<usize>) -> Result<&mut Self, ConfigurationError> {
        let error = self.not_applicable("maxLength");
        let profile = self.kind.character_profile_mut().ok_or(error)?;
        profile.set_max_length(&self.field_name, max)?;
        self.reset_installed();
        Ok(self)
    }

    /// Enable or disable trimming of a character field.
    pub fn set_auto_trim(&mut self, enabled: bool) -> Result<&mut Self, ConfigurationError> {
        let error = self.not_applicable("autoTrim");
        self.kind.character_profile_mut().ok_or(error)?.set_auto_trim(enabled);
        self.reset_installed();
        Ok(self)
    }

    /// Choose the trim filter of a character field.
    pub fn set_auto_trim_filter(&mut self, filter: Option<String>) -> Result<&mut Self, ConfigurationError> {
        let error = self.not_applicable("autoTrimFilter");
        self.kind.character_profile_mut().ok_or(error)?.set_auto_trim_filter(filter);
        self.reset_installed();
        Ok(self)
    }

    /// Set the minimum value of an integer or flag field.
    pub fn set_min_value(&mut self, min: Option<i64>) -> Result<&mut Self, ConfigurationError> {
        let error = self.not_applicable("minValue");
        let profile = self.kind.integer_profile_mut().ok_or(error)?;
        profile.set_min_value(&self.field_name, min)?;
        self.reset_installed();
        Ok(self)
    }

    /// Set the maximum value of an integer or flag field.
    pub fn set_max_value(&mut self, max: Option<i64>) -> Result<&mut Self, ConfigurationError> {
        let error = self.not_applicable("maxValue");
        let profile = self.kind.integer_profile_mut().ok_or(error)?;
        profile.set_max_value(&self.field_name, max)?;
        self.reset_installed();
        Ok(self)
    }

    /// Enable or disable the integer filter of an integer or flag field.
    pub fn set_auto_int_filter(&mut self, enabled: bool) -> Result<&mut Self, ConfigurationError> {
        let error = self.not_applicable("autoIntFilter");
        self.kind.integer_profile_mut().ok_or(error)?.set_auto_int_filter(enabled);
        self.reset_installed();
        Ok(self)
    }

    /// Drop the stages this field injected so they are derived again from
    /// the current settings on the next run.
    fn reset_installed(&mut self) {
        for name in self.installed.validators.drain(..) {
            self.validators.remove(&name);
        }
        for name in self.installed.filters.drain(..) {
            self.filters.remove(&name);
        }
    }

    // ========================================================================
    // Collections
    // ========================================================================

    /// The validator collection.
    pub fn validators(&self) -> &ValidatorCollection {
        &self.validators
    }

    /// The validator collection, mutably.
    pub fn validators_mut(&mut self) -> &mut ValidatorCollection {
        &mut self.validators
    }

    /// The filter collection.
    pub fn filters(&self) -> &FilterCollection {
        &self.filters
    }

    /// The filter collection, mutably.
    pub fn filters_mut(&mut self) -> &mut FilterCollection {
        &mut self.filters
    }

    /// The renderer collection.
    pub fn renderers(&self) -> &RendererCollection {
        &self.renderers
    }

    /// The renderer collection, mutably.
    pub fn renderers_mut(&mut self) -> &mut RendererCollection {
        &mut self.renderers
    }

    // ========================================================================
    // Pipeline
    // ========================================================================

    /// Run every filter in order, store the result and return it.
    pub fn filter(&mut self) -> PluginResult<Value> {
        install(&mut self.filters, self.kind.filter_stages(), &mut self.installed.filters)?;

        let mut value = self.value().clone();
        for filter in self.filters.get_all()? {
            value = filter.filter(value);
        }
        self.value = value.clone();
        Ok(value)
    }

    /// Validate the field, reporting the first failure to `sink`.
    ///
    /// An empty, optional field is valid without running anything. A
    /// required field gets a `NotEmpty` validator appended when it has none.
    pub fn is_valid(&mut self, sink: &mut dyn MessageSink) -> PluginResult<bool> {
        if !self.required && self.is_empty() {
            return Ok(true);
        }

        install(
            &mut self.validators,
            self.kind.validator_stages(),
            &mut self.installed.validators,
        )?;
        if self.required && !self.validators.has("NotEmpty") {
            self.validators.set("NotEmpty", Params::new())?;
            if let Some(key) = self.validators.resolve("NotEmpty") {
                self.installed.validators.push(key);
            }
        }

        self.validators.materialize()?;
        let value = self.filter()?;

        for validator in self.validators.instances() {
            if let Err(violation) = validator.validate(&value) {
                debug!(
                    "Field '{}' failed {} ({})",
                    self.field_name,
                    validator.type_name(),
                    violation.rule
                );
                let message = sink
                    .message_template(&self.field_name, &violation.rule)
                    .unwrap_or(violation.message);
                sink.set_message(&self.field_name, message);
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Render with the default renderer, installing it first when absent.
    ///
    /// Returns `Ok(None)` when the field has no default renderer.
    pub fn render(&mut self, name: &str, attribs: Option<&Attribs>) -> PluginResult<Option<String>> {
        let Some(renderer) = self.default_renderer.clone() else {
            return Ok(None);
        };
        if !self.renderers.has(&renderer) {
            self.renderers.prepend(&renderer, Params::new())?;
        }
        self.view(name, &renderer, attribs)
    }

    /// Render with any renderer of the collection.
    ///
    /// The element name is the field's name override when set. The current
    /// value replaces the default when it is non-null and differs. Caller
    /// attributes win over the entry's `attribs` param, except for `id`,
    /// which the entry owns, and the computed `checked` of checkboxes.
    /// Returns `Ok(None)` when the renderer is not in the collection.
    pub fn view(
        &mut self,
        name: &str,
        renderer: &str,
        attribs: Option<&Attribs>,
    ) -> PluginResult<Option<String>> {
        if self.renderers.get(renderer)?.is_none() {
            return Ok(None);
        }

        let element_name = self.name.clone().unwrap_or_else(|| name.to_string());

        let current = self.value();
        let mut value = if !current.is_null() && !current.loose_eq(&self.default_value) {
            current.clone()
        } else {
            self.default_value.clone()
        };

        let mut merged: Attribs = attribs.cloned().unwrap_or_default();
        if let Some(entry_attribs) = self.renderers.get_param(renderer, ATTRIBS).and_then(Value::as_map) {
            for (key, entry_value) in entry_attribs {
                if key == "id" {
                    merged.insert(key.clone(), entry_value.clone());
                } else {
                    merged.entry(key.clone()).or_insert_with(|| entry_value.clone());
                }
            }
        }

        let Some(plugin) = self.renderers.constructed(renderer) else {
            return Ok(None);
        };

        let mut choices = None;
        let mut listsep = None;
        match plugin.input_style() {
            InputStyle::Plain => {}
            InputStyle::Choice => {
                if !self.choices.is_empty() {
                    choices = Some(&self.choices);
                }
                listsep = self.renderers.get_param(renderer, "listsep").map(Value::to_text);
                if let Some(sep) = merged.shift_remove("listsep") {
                    listsep = Some(sep.to_text());
                }
            }
            InputStyle::Checkbox => {
                if value.is_truthy() {
                    merged.insert("checked".to_string(), Value::from("checked"));
                }
                value = Value::from(1);
            }
        }

        let input = RenderInput {
            name: &element_name,
            value: &value,
            attribs: &merged,
            choices,
            listsep: listsep.as_deref(),
        };
        Ok(Some(plugin.render(&input)))
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    /// Apply configuration options.
    ///
    /// Options that do not apply to this field's kind are ignored with a
    /// warning; bound violations and unresolvable plugin names are errors.
    pub fn configure(&mut self, options: &FieldOptions) -> FormworkResult<()> {
        if let Some(name) = &options.name {
            self.set_name(Some(name.clone()));
        }
        if let Some(value) = &options.default_value {
            self.set_default_value(value.clone());
        }
        if let Some(required) = options.required {
            self.set_required(required);
        }
        if let Some(enabled) = options.null_when_empty {
            self.set_null_when_empty(enabled);
        }
        if let Some(mapped) = options.mapped {
            self.set_mapped(mapped);
        }
        if let Some(dependent) = &options.dependent {
            self.set_dependent(Some(dependent.clone()));
        }
        if let Some(renderer) = &options.default_view_helper {
            self.set_default_renderer(Some(renderer.clone()));
        }
        if let Some(choices) = &options.choices {
            self.set_choices(choices.clone());
        }

        if self.kind.character_profile().is_some() {
            if let Some(enabled) = options.auto_trim {
                self.set_auto_trim(enabled)?;
            }
            if let Some(filter) = &options.auto_trim_filter {
                let filter = Some(filter.clone()).filter(|f| !f.is_empty());
                self.set_auto_trim_filter(filter)?;
            }
            // Lower bound first only when it cannot conflict with an existing maximum.
            match (options.min_length, options.max_length) {
                (Some(min), Some(max)) if self.kind.character_profile().and_then(|p| p.max_length()).map_or(false, |old| min > old) => {
                    self.set_max_length(Some(max))?;
                    self.set_min_length(Some(min))?;
                }
                (min, max) => {
                    if let Some(min) = min {
                        self.set_min_length(Some(min))?;
                    }
                    if let Some(max) = max {
                        self.set_max_length(Some(max))?;
                    }
                }
            }
        } else {
            self.warn_ignored(&options.character_keys());
        }

        if self.kind.integer_profile().is_some() {
            if let Some(enabled) = options.auto_int_filter {
                self.set_auto_int_filter(enabled)?;
            }
            match (options.min_value, options.max_value) {
                (Some(min), Some(max)) if self.kind.integer_profile().and_then(|p| p.max_value()).map_or(false, |old| min > old) => {
                    self.set_max_value(Some(max))?;
                    self.set_min_value(Some(min))?;
                }
                (min, max) => {
                    if let Some(min) = min {
                        self.set_min_value(Some(min))?;
                    }
                    if let Some(max) = max {
                        self.set_max_value(Some(max))?;
                    }
                }
            }
        } else {
            self.warn_ignored(&options.integer_keys());
        }

        for key in options.unknown.keys() {
            warn!("Field '{}': unknown option '{}' ignored", self.field_name, key);
        }

        load_stages(&mut self.validators, &options.validators)?;
        load_stages(&mut self.filters, &options.filters)?;
        load_stages(&mut self.renderers, &options.view_helpers)?;
        Ok(())
    }

    fn warn_ignored(&self, keys: &[&str]) {
        for key in keys {
            warn!(
                "Field '{}' of type '{}' ignores option '{}'",
                self.field_name,
                self.kind.label(),
                key
            );
        }
    }
}

/// Prepend every stage not yet present, keeping the listed order.
fn install<K: PluginKind>(
    collection: &mut PluginCollection<K>,
    stages: Vec<Stage>,
    installed: &mut Vec<String>,
) -> PluginResult<()> {
    for stage in stages.into_iter().rev() {
        if collection.has(&stage.name) {
            continue;
        }
        collection.prepend(&stage.name, stage.params)?;
        if let Some(key) = collection.resolve(&stage.name) {
            debug!("Installed {} stage '{}'", K::TYPE, key);
            installed.push(key);
        }
    }
    Ok(())
}

fn load_stages<K: PluginKind>(collection: &mut PluginCollection<K>, stages: &StageList) -> PluginResult<()> {
    for stage in stages.iter() {
        collection.set(&stage.name, stage.params.clone())?;
    }
    Ok(())
}
