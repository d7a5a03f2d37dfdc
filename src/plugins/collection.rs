//! Ordered, name-keyed plugin collections with lazy construction.
//!
//! A collection stores entries keyed by canonical type name. Each entry
//! holds a [`Slot`] (pending or constructed) and its [`Params`]. Instances
//! are built from the `options` parameter the first time they are asked
//! for and memoized afterwards. Entry order is pipeline order.

use crate::core::error::{PluginError, PluginResult};
use crate::core::params::Params;
use crate::core::types::Value;
use crate::plugins::kinds::PluginKind;
use crate::plugins::registry::TypeRegistry;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Construction state of an entry.
pub enum Slot<P: ?Sized> {
    /// Registered by name, not built yet.
    Pending,
    /// Built and bound.
    Constructed(Box<P>),
}

impl<P: ?Sized> Slot<P> {
    /// The instance, when constructed.
    pub fn instance(&self) -> Option<&P> {
        match self {
            Slot::Pending => None,
            Slot::Constructed(plugin) => Some(&**plugin),
        }
    }

    /// Check whether the slot holds an instance.
    pub fn is_constructed(&self) -> bool {
        matches!(self, Slot::Constructed(_))
    }
}

struct Entry<P: ?Sized> {
    slot: Slot<P>,
    params: Params,
}

/// Ordered collection of plugins of one kind.
///
/// # Example
///
/// ```ignore
/// let mut validators = ValidatorCollection::new(registry);
/// validators.append("notEmpty", Params::new())?;
/// validators.prepend("StringLength", Params::with_options(5))?;
/// assert_eq!(validators.names(), vec!["validate::StringLength", "validate::NotEmpty"]);
/// ```
pub struct PluginCollection<K: PluginKind> {
    registry: Arc<TypeRegistry<K>>,
    binding: K::Binding,
    entries: IndexMap<String, Entry<K::Plugin>>,
}

impl<K: PluginKind> PluginCollection<K> {
    /// Create an empty collection backed by a registry.
    pub fn new(registry: Arc<TypeRegistry<K>>) -> Self {
        Self::with_binding(registry, K::Binding::default())
    }

    /// Create an empty collection with an explicit binding.
    pub fn with_binding(registry: Arc<TypeRegistry<K>>, binding: K::Binding) -> Self {
        Self {
            registry,
            binding,
            entries: IndexMap::new(),
        }
    }

    /// The registry this collection resolves against.
    pub fn registry(&self) -> &Arc<TypeRegistry<K>> {
        &self.registry
    }

    /// The binding applied to every plugin.
    pub fn binding(&self) -> &K::Binding {
        &self.binding
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    /// Resolve a name to its canonical type name.
    ///
    /// A registered type or an already stored key is returned unchanged;
    /// otherwise the kind prefix is added (first letter upper-cased) and
    /// the lookup repeated.
    pub fn resolve(&self, name: &str) -> Option<String> {
        if self.is_known(name) {
            return Some(name.to_string());
        }

        let prefixed = format!("{}{}", K::PREFIX, upper_first(name));
        if self.is_known(&prefixed) {
            log::debug!("Resolved {} '{}' to '{}'", K::TYPE, name, prefixed);
            return Some(prefixed);
        }

        None
    }

    fn is_known(&self, name: &str) -> bool {
        self.registry.contains(name) || self.entries.contains_key(name)
    }

    fn resolve_or_err(&self, name: &str) -> PluginResult<String> {
        self.resolve(name).ok_or_else(|| PluginError::Unresolved {
            kind: K::TYPE,
            name: name.to_string(),
        })
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Store a plugin by name, appended when new, replaced in place when present.
    pub fn set(&mut self, name: &str, params: Params) -> PluginResult<&mut Self> {
        let key = self.resolve_or_err(name)?;
        let entry = self.pending_entry(&key, params);
        self.entries.insert(key, entry);
        Ok(self)
    }

    /// Alias of [`set`](Self::set).
    pub fn append(&mut self, name: &str, params: Params) -> PluginResult<&mut Self> {
        self.set(name, params)
    }

    /// Store a plugin by name as the first entry.
    ///
    /// An existing entry with the same name is moved, not duplicated; every
    /// other entry keeps its relative order.
    pub fn prepend(&mut self, name: &str, params: Params) -> PluginResult<&mut Self> {
        let key = self.resolve_or_err(name)?;
        let entry = self.pending_entry(&key, params);
        self.entries.shift_insert(0, key, entry);
        Ok(self)
    }

    /// Store a pre-built plugin under its own type name.
    pub fn set_instance(&mut self, plugin: Box<K::Plugin>, params: Params) -> &mut Self {
        let (key, entry) = self.constructed_entry(plugin, params);
        self.entries.insert(key, entry);
        self
    }

    /// Alias of [`set_instance`](Self::set_instance).
    pub fn append_instance(&mut self, plugin: Box<K::Plugin>, params: Params) -> &mut Self {
        self.set_instance(plugin, params)
    }

    /// Store a pre-built plugin as the first entry.
    pub fn prepend_instance(&mut self, plugin: Box<K::Plugin>, params: Params) -> &mut Self {
        let (key, entry) = self.constructed_entry(plugin, params);
        self.entries.shift_insert(0, key, entry);
        self
    }

    /// Entry for a name-registered plugin.
    ///
    /// A constructed entry whose type the registry cannot build keeps its
    /// instance; only its params change.
    fn pending_entry(&mut self, key: &str, params: Params) -> Entry<K::Plugin> {
        if !self.registry.contains(key) {
            if let Some(existing) = self.entries.get_mut(key) {
                if existing.slot.is_constructed() {
                    let slot = std::mem::replace(&mut existing.slot, Slot::Pending);
                    return Entry { slot, params };
                }
            }
        }
        Entry {
            slot: Slot::Pending,
            params,
        }
    }

    fn constructed_entry(
        &self,
        mut plugin: Box<K::Plugin>,
        params: Params,
    ) -> (String, Entry<K::Plugin>) {
        K::bind(&mut *plugin, &self.binding);
        let key = K::type_name(&*plugin).to_string();
        log::debug!("Stored pre-built {} '{}'", K::TYPE, key);
        (
            key,
            Entry {
                slot: Slot::Constructed(plugin),
                params,
            },
        )
    }

    /// Remove an entry, keeping the order of the others.
    pub fn remove(&mut self, name: &str) -> bool {
        match self.resolve(name) {
            Some(key) => self.entries.shift_remove(&key).is_some(),
            None => false,
        }
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    // ========================================================================
    // Parameters
    // ========================================================================

    /// Set one parameter of an entry. Does nothing when the entry is absent.
    pub fn set_param(&mut self, name: &str, key: &str, value: impl Into<Value>) -> &mut Self {
        if let Some(entry) = self.entry_mut(name) {
            entry.params.insert(key, value);
        }
        self
    }

    /// Get one parameter of an entry.
    pub fn get_param(&self, name: &str, key: &str) -> Option<&Value> {
        self.entry(name).and_then(|entry| entry.params.get(key))
    }

    /// Check whether an entry has a parameter.
    pub fn has_param(&self, name: &str, key: &str) -> bool {
        self.get_param(name, key).is_some()
    }

    /// Remove one parameter of an entry.
    pub fn remove_param(&mut self, name: &str, key: &str) -> Option<Value> {
        self.entry_mut(name).and_then(|entry| entry.params.remove(key))
    }

    /// All parameters of an entry.
    pub fn params(&self, name: &str) -> Option<&Params> {
        self.entry(name).map(|entry| &entry.params)
    }

    fn entry(&self, name: &str) -> Option<&Entry<K::Plugin>> {
        self.resolve(name).and_then(|key| self.entries.get(&key))
    }

    fn entry_mut(&mut self, name: &str) -> Option<&mut Entry<K::Plugin>> {
        let key = self.resolve(name)?;
        self.entries.get_mut(&key)
    }

    // ========================================================================
    // Access
    // ========================================================================

    /// Check whether a name resolves to a stored entry.
    pub fn has(&self, name: &str) -> bool {
        self.entry(name).is_some()
    }

    /// Get a plugin, constructing it on first access.
    ///
    /// Returns `Ok(None)` when the name does not resolve or is not stored.
    pub fn get(&mut self, name: &str) -> PluginResult<Option<&K::Plugin>> {
        let index = match self.resolve(name).and_then(|key| self.entries.get_index_of(&key)) {
            Some(index) => index,
            None => return Ok(None),
        };
        self.construct(index)?;
        Ok(self
            .entries
            .get_index(index)
            .and_then(|(_, entry)| entry.slot.instance()))
    }

    /// Construct every pending entry, in order.
    pub fn materialize(&mut self) -> PluginResult<()> {
        for index in 0..self.entries.len() {
            self.construct(index)?;
        }
        Ok(())
    }

    /// Get every plugin in order, constructing pending ones.
    pub fn get_all(&mut self) -> PluginResult<Vec<&K::Plugin>> {
        self.materialize()?;
        Ok(self.instances().collect())
    }

    /// Get a plugin only if it has already been constructed.
    pub fn constructed(&self, name: &str) -> Option<&K::Plugin> {
        self.entry(name).and_then(|entry| entry.slot.instance())
    }

    /// Iterate the instances constructed so far, in order.
    pub fn instances(&self) -> impl Iterator<Item = &K::Plugin> {
        self.entries.values().filter_map(|entry| entry.slot.instance())
    }

    fn construct(&mut self, index: usize) -> PluginResult<()> {
        let registry = &self.registry;
        let binding = &self.binding;
        let Some((key, entry)) = self.entries.get_index_mut(index) else {
            return Ok(());
        };
        if entry.slot.is_constructed() {
            return Ok(());
        }

        let created = registry.create(key, entry.params.options()).ok_or_else(|| {
            PluginError::Unresolved {
                kind: K::TYPE,
                name: key.clone(),
            }
        })?;
        let mut plugin = created.map_err(|source| PluginError::InvalidOptions {
            kind: K::TYPE,
            name: key.clone(),
            source,
        })?;
        K::bind(&mut *plugin, binding);
        log::debug!("Constructed {} '{}'", K::TYPE, key);
        entry.slot = Slot::Constructed(plugin);
        Ok(())
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    /// Canonical names of all entries, in order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(|s| s.as_str()).collect()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the collection has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check whether an entry has been constructed.
    pub fn is_constructed(&self, name: &str) -> bool {
        self.entry(name).map_or(false, |entry| entry.slot.is_constructed())
    }
}

impl<K: PluginKind> fmt::Debug for PluginCollection<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries: Vec<(&str, bool)> = self
            .entries
            .iter()
            .map(|(name, entry)| (name.as_str(), entry.slot.is_constructed()))
            .collect();
        f.debug_struct("PluginCollection")
            .field("kind", &K::TYPE)
            .field("entries", &entries)
            .finish()
    }
}

/// Upper-case the first character of a name (`notEmpty` → `NotEmpty`).
fn upper_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
