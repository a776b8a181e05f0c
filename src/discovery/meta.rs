//! Registries of registries.
//!
//! A [`MetaRegistry`] keeps track of every registry in an application. Its
//! own discovery imports each module's `registries` sub-module (where
//! registries register themselves into it) and then, when cascading, runs
//! discovery on every registry it now holds so that one call populates
//! both the list of registries and their contents.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use serde_json::Value;

use super::loader::ModuleLoader;
use super::scanner::{DiscoveryOptions, DiscoveryReport};
use crate::error::Result;
use crate::query::{Fields, QuerySet};
use crate::registry::{Registrable, Registry, RegistryHooks};

/// Conventional sub-module imported by meta-registry discovery.
pub const META_LOOK_INTO: &str = "registries";

/// A registry as seen from a meta-registry, with its value type erased.
pub trait Discover: Send + Sync {
    /// Name used in errors and logs.
    fn label(&self) -> String;

    /// The sub-module discovery imports, if configured.
    fn look_into(&self) -> Option<&str>;

    /// Number of registered objects.
    fn len(&self) -> usize;

    /// Check if nothing is registered.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every registered object.
    fn clear(&self);

    /// Run discovery for this registry.
    fn autodiscover(
        &self,
        loader: &dyn ModuleLoader,
        modules: &[String],
        options: DiscoveryOptions,
    ) -> Result<DiscoveryReport>;
}

impl<T, H> Discover for Registry<T, H>
where
    T: Send + Sync,
    H: RegistryHooks<T> + Send + Sync,
{
    fn label(&self) -> String {
        Registry::label(self)
    }

    fn look_into(&self) -> Option<&str> {
        Registry::look_into(self)
    }

    fn len(&self) -> usize {
        Registry::len(self)
    }

    fn clear(&self) {
        Registry::clear(self)
    }

    fn autodiscover(
        &self,
        loader: &dyn ModuleLoader,
        modules: &[String],
        options: DiscoveryOptions,
    ) -> Result<DiscoveryReport> {
        Registry::autodiscover(self, loader, modules, options)
    }
}

/// Shared handle to a registry held by a [`MetaRegistry`].
#[derive(Clone)]
pub struct RegistryHandle(Arc<dyn Discover>);

impl RegistryHandle {
    /// Wrap a shared registry.
    pub fn new<R: Discover + 'static>(registry: Arc<R>) -> Self {
        Self(registry)
    }

    /// Check if this handle points at `registry`.
    pub fn is<R: Discover + 'static>(&self, registry: &Arc<R>) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(registry))
    }
}

impl Deref for RegistryHandle {
    type Target = dyn Discover;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl PartialEq for RegistryHandle {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }
}

impl fmt::Debug for RegistryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryHandle")
            .field("label", &self.0.label())
            .field("look_into", &self.0.look_into())
            .field("len", &self.0.len())
            .finish()
    }
}

impl Registrable for RegistryHandle {}

impl Fields for RegistryHandle {
    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "label" => Some(Value::from(self.0.label())),
            "look_into" => Some(self.0.look_into().map_or(Value::Null, Value::from)),
            "len" => Some(Value::from(self.0.len())),
            _ => None,
        }
    }
}

/// Hooks of the registry inside a [`MetaRegistry`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MetaHooks;

impl RegistryHooks<RegistryHandle> for MetaHooks {
    fn label(&self) -> String {
        "MetaRegistry".to_string()
    }
}

/// A registry whose entries are other registries.
///
/// Usually created once and shared (`Arc<MetaRegistry>`) with the modules
/// that register their registries into it.
#[derive(Debug)]
pub struct MetaRegistry {
    registries: Registry<RegistryHandle, MetaHooks>,
}

impl MetaRegistry {
    /// Create an empty meta-registry looking into `registries` sub-modules.
    pub fn new() -> Self {
        Self {
            registries: Registry::with_hooks(MetaHooks).with_look_into(META_LOOK_INTO),
        }
    }

    /// Use a different sub-module for discovery.
    pub fn with_look_into(mut self, module: impl Into<String>) -> Self {
        self.registries.set_look_into(module);
        self
    }

    /// Change the sub-module used for discovery.
    pub fn set_look_into(&mut self, module: impl Into<String>) {
        self.registries.set_look_into(module);
    }

    /// The sub-module used for discovery.
    pub fn look_into(&self) -> Option<&str> {
        self.registries.look_into()
    }

    /// Register a registry under `name`.
    pub fn register<R: Discover + 'static>(
        &self,
        name: impl Into<String>,
        registry: Arc<R>,
    ) -> Result<RegistryHandle> {
        self.registries
            .register_as(name, RegistryHandle::new(registry))
    }

    /// Register an existing handle under `name`.
    pub fn register_handle(
        &self,
        name: impl Into<String>,
        handle: RegistryHandle,
    ) -> Result<RegistryHandle> {
        self.registries.register_as(name, handle)
    }

    /// Get the registry registered under `name`.
    pub fn get(&self, name: &str) -> Option<RegistryHandle> {
        self.registries.get(name)
    }

    /// Check if a registry is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.registries.contains(name)
    }

    /// Number of registries.
    pub fn len(&self) -> usize {
        self.registries.len()
    }

    /// Check if no registry is registered.
    pub fn is_empty(&self) -> bool {
        self.registries.is_empty()
    }

    /// Registry names in registration order.
    pub fn names(&self) -> Vec<String> {
        self.registries.names()
    }

    /// Registered `(name, registry)` pairs in registration order.
    pub fn entries(&self) -> Vec<(String, RegistryHandle)> {
        self.registries.entries()
    }

    /// Forget every registry. The registries themselves are untouched.
    pub fn clear(&self) {
        self.registries.clear();
    }

    /// A query view over the registered registries.
    pub fn objects(&self) -> QuerySet<RegistryHandle> {
        self.registries.objects()
    }

    /// The underlying registry of handles.
    pub fn as_registry(&self) -> &Registry<RegistryHandle, MetaHooks> {
        &self.registries
    }

    /// Discover registries, then, if `options.cascade` is set, the contents
    /// of every registry held afterwards.
    ///
    /// # Errors
    ///
    /// Returns the first discovery error, either from this registry's own
    /// pass or from a child registry.
    pub fn autodiscover<S: AsRef<str>>(
        &self,
        loader: &dyn ModuleLoader,
        modules: &[S],
        options: DiscoveryOptions,
    ) -> Result<DiscoveryReport> {
        let mut report = self.registries.autodiscover(loader, modules, options)?;
        if options.cascade {
            report.merge(self.autodiscover_registries(loader, modules, options)?);
        }
        Ok(report)
    }

    /// Run discovery on every registry currently held, with the same modules.
    ///
    /// Registries without a `look_into` module are skipped.
    pub fn autodiscover_registries<S: AsRef<str>>(
        &self,
        loader: &dyn ModuleLoader,
        modules: &[S],
        options: DiscoveryOptions,
    ) -> Result<DiscoveryReport> {
        let modules: Vec<String> = modules.iter().map(|m| m.as_ref().to_string()).collect();
        let mut report = DiscoveryReport::default();

        for (name, registry) in self.registries.entries() {
            if registry.look_into().is_none() {
                tracing::warn!("Registry '{}' has no look_into module, skipping", name);
                continue;
            }
            tracing::debug!("Cascading discovery into registry '{}'", name);
            report.merge(registry.autodiscover(loader, &modules, options)?);
        }

        Ok(report)
    }
}

impl Default for MetaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::ModuleTable;

    fn people() -> Arc<Registry<String>> {
        Arc::new(Registry::new().with_look_into("people"))
    }

    #[test]
    fn meta_registry_defaults_to_registries() {
        let meta = MetaRegistry::new();
        assert_eq!(meta.look_into(), Some(META_LOOK_INTO));
        assert!(meta.is_empty());
    }

    #[test]
    fn handle_identity() {
        let meta = MetaRegistry::new();
        let registry = people();
        let other = people();
        meta.register("people", registry.clone()).unwrap();

        let handle = meta.get("people").unwrap();
        assert!(handle.is(&registry));
        assert!(!handle.is(&other));
        assert_eq!(handle, RegistryHandle::new(registry));
    }

    #[test]
    fn handle_exposes_registry_state() {
        let registry = people();
        registry.register_as("alain", "Alain".to_string()).unwrap();
        let handle = RegistryHandle::new(registry);

        assert_eq!(handle.len(), 1);
        assert_eq!(handle.look_into(), Some("people"));
        assert_eq!(handle.field("look_into"), Some(Value::from("people")));
        assert_eq!(handle.field("len"), Some(Value::from(1)));
        assert_eq!(handle.field("unknown"), None);
    }

    #[test]
    fn child_can_be_cleared_through_its_handle() {
        let registry = people();
        registry.register_as("alain", "Alain".to_string()).unwrap();
        let meta = MetaRegistry::new();
        meta.register("people", registry.clone()).unwrap();

        let handle = meta.get("people").unwrap();
        assert!(!handle.is_empty());
        handle.clear();

        assert!(handle.is_empty());
        assert!(registry.is_empty());
        assert_eq!(registry.look_into(), Some("people"));
    }

    #[test]
    fn registries_can_be_queried() {
        let meta = MetaRegistry::new();
        meta.register("people", people()).unwrap();
        meta.register("plain", Arc::new(Registry::<String>::new()))
            .unwrap();

        let found = meta.objects().get(("look_into", "people")).unwrap();
        assert_eq!(found, meta.get("people").unwrap());
        assert_eq!(meta.objects().filter(("look_into", Value::Null)).count(), 1);
    }

    #[test]
    fn registration_requires_a_name() {
        let meta = MetaRegistry::new();
        let handle = RegistryHandle::new(people());
        assert!(meta.as_registry().register(handle).is_err());
    }

    #[test]
    fn cascade_skips_registries_without_look_into() {
        let meta = MetaRegistry::new();
        meta.register("plain", Arc::new(Registry::<String>::new()))
            .unwrap();
        let loader = ModuleTable::new().package("app");

        let report = meta
            .autodiscover(&loader, &["app"], DiscoveryOptions::default())
            .unwrap();
        assert_eq!(report.missing, vec!["app.registries"]);
        assert!(report.imported.is_empty());
    }

    #[test]
    fn without_cascade_children_are_not_discovered() {
        let registry = people();
        let meta = MetaRegistry::new();
        meta.register("people", registry.clone()).unwrap();

        let target = registry.clone();
        let loader = ModuleTable::new().module("app.people", move || {
            target.register_as("alain", "Alain".to_string())?;
            Ok(())
        });

        meta.autodiscover(&loader, &["app"], DiscoveryOptions::new().cascade(false))
            .unwrap();
        assert!(registry.is_empty());

        meta.autodiscover_registries(&loader, &["app"], DiscoveryOptions::default())
            .unwrap();
        assert_eq!(registry.len(), 1);
    }
}
