//! The registry and its registration pipeline.

use std::fmt;

use parking_lot::RwLock;

use super::hooks::{DefaultHooks, RegistryHooks};
use super::naming::Registrable;
use super::store::NamedStore;
use crate::discovery::{scanner, DiscoveryOptions, DiscoveryReport, ModuleLoader};
use crate::error::{RegistryError, Result};
use crate::query::QuerySet;

/// A named, insertion-ordered collection of objects.
///
/// Objects enter through [`register`](Registry::register) (name inferred),
/// [`register_as`](Registry::register_as) (explicit name) or the closure
/// returned by [`registrar`](Registry::registrar), and run through the
/// pipeline defined by the registry's [`RegistryHooks`]. Stored objects are
/// queried through [`objects`](Registry::objects).
///
/// Registration takes `&self` so a registry can be shared (usually behind an
/// `Arc`) with the plugin modules that populate it. The store lock is never
/// held while hooks or module loaders run.
#[derive(Debug)]
pub struct Registry<T, H = DefaultHooks> {
    store: RwLock<NamedStore<T>>,
    look_into: Option<String>,
    hooks: H,
}

impl<T> Registry<T, DefaultHooks> {
    /// Create a new empty registry with default hooks.
    pub fn new() -> Self {
        Self::with_hooks(DefaultHooks)
    }
}

impl<T> Default for Registry<T, DefaultHooks> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, H> Registry<T, H> {
    /// Create a new empty registry driven by `hooks`.
    pub fn with_hooks(hooks: H) -> Self {
        Self {
            store: RwLock::new(NamedStore::new()),
            look_into: None,
            hooks,
        }
    }

    /// Set the sub-module discovery imports from each scanned module.
    pub fn with_look_into(mut self, module: impl Into<String>) -> Self {
        self.look_into = Some(module.into());
        self
    }

    /// Change the sub-module discovery imports.
    pub fn set_look_into(&mut self, module: impl Into<String>) {
        self.look_into = Some(module.into());
    }

    /// The sub-module discovery imports, if configured.
    pub fn look_into(&self) -> Option<&str> {
        self.look_into.as_deref()
    }

    /// The hooks driving this registry.
    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    /// Get the number of registered objects.
    pub fn len(&self) -> usize {
        self.store.read().len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.store.read().is_empty()
    }

    /// Check if an object is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.store.read().contains(name)
    }

    /// Registered names in insertion order.
    pub fn names(&self) -> Vec<String> {
        self.store.read().names().map(str::to_string).collect()
    }

    /// Remove the object registered under `name`.
    pub fn remove(&self, name: &str) -> Option<T> {
        self.store.write().remove(name)
    }

    /// Remove every object. Hooks and `look_into` are kept.
    pub fn clear(&self) {
        self.store.write().clear();
    }
}

impl<T: Clone, H> Registry<T, H> {
    /// Get the object registered under `name`.
    pub fn get(&self, name: &str) -> Option<T> {
        self.store.read().get(name).cloned()
    }

    /// Registered objects in insertion order.
    pub fn values(&self) -> Vec<T> {
        self.store.read().values().cloned().collect()
    }

    /// Registered `(name, object)` pairs in insertion order.
    pub fn entries(&self) -> Vec<(String, T)> {
        self.store
            .read()
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    /// A query view over a snapshot of the current contents.
    ///
    /// Objects registered afterwards show up in the next call, not in a
    /// view that was already taken.
    pub fn objects(&self) -> QuerySet<T> {
        QuerySet::new(self.values())
    }
}

impl<T, H: RegistryHooks<T>> Registry<T, H> {
    /// Name used for this registry in errors and logs.
    pub fn label(&self) -> String {
        self.hooks.label()
    }

    /// Import `<module>.<look_into>` for each module so the registrations
    /// those sub-modules perform when loaded populate this registry.
    ///
    /// # Errors
    ///
    /// Returns `MissingLookInto` if no `look_into` is configured. Modules
    /// whose sub-module is absent are skipped; any other load failure is
    /// returned unchanged.
    pub fn autodiscover<S: AsRef<str>>(
        &self,
        loader: &dyn ModuleLoader,
        modules: &[S],
        options: DiscoveryOptions,
    ) -> Result<DiscoveryReport> {
        let Some(look_into) = self.look_into.as_deref() else {
            return Err(RegistryError::MissingLookInto {
                registry: self.label(),
            });
        };

        scanner::scan(loader, modules, look_into, options.force_reload)
    }
}

impl<T, H> Registry<T, H>
where
    T: Clone + fmt::Debug + Registrable,
    H: RegistryHooks<T>,
{
    /// Register an object under its derived name and return it unchanged.
    ///
    /// The name comes from the `prepare_name` hook, or failing that from the
    /// object's declared name.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the `validate` hook rejects the object,
    /// `NameInference` if no name can be derived, and `Other` for failures
    /// raised by the hooks. A `post_register` failure is returned after the
    /// object has been stored.
    pub fn register(&self, obj: T) -> Result<T> {
        self.register_entry(&obj, None)?;
        Ok(obj)
    }

    /// Register an object under an explicit name and return it unchanged.
    pub fn register_as(&self, name: impl Into<String>, obj: T) -> Result<T> {
        self.register_entry(&obj, Some(name.into()))?;
        Ok(obj)
    }

    /// Build a one-shot registration closure.
    ///
    /// The closure runs the full pipeline on the object it receives, under
    /// `name` if given, and hands the object back unchanged. This is the
    /// form to use where an object is registered at its declaration site.
    pub fn registrar(&self, name: Option<&str>) -> impl FnOnce(T) -> Result<T> + '_ {
        let name = name.map(str::to_string);
        move |obj| {
            self.register_entry(&obj, name)?;
            Ok(obj)
        }
    }

    /// Infer the name an object would be registered under by default.
    ///
    /// # Errors
    ///
    /// Returns `NameInference` if the object has no declared name.
    pub fn object_name(&self, obj: &T) -> Result<String> {
        obj.declared_name()
            .ok_or_else(|| RegistryError::NameInference {
                object: format!("{:?}", obj),
            })
    }

    fn derive_name(&self, obj: &T) -> Result<String> {
        match self.hooks.prepare_name(obj)? {
            Some(name) => Ok(name),
            None => self.object_name(obj),
        }
    }

    fn register_entry(&self, obj: &T, name: Option<String>) -> Result<String> {
        if !self.hooks.validate(obj) {
            return Err(RegistryError::Validation {
                object: format!("{:?}", obj),
                registry: self.label(),
            });
        }

        let name = match name {
            Some(name) => name,
            None => self.derive_name(obj)?,
        };

        let data = self.hooks.prepare_data(obj)?;
        let replaced = self.store.write().insert(name.clone(), data.clone());
        if replaced.is_some() {
            tracing::debug!("{} replaced '{}'", self.label(), name);
        } else {
            tracing::debug!("{} registered '{}'", self.label(), name);
        }

        self.hooks.post_register(&data, &name)?;
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Declared;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Clone, PartialEq)]
    struct Person {
        first_name: String,
    }

    impl Registrable for Person {}

    struct ByFirstName;

    impl RegistryHooks<Person> for ByFirstName {
        fn prepare_name(&self, obj: &Person) -> anyhow::Result<Option<String>> {
            Ok(Some(format!("custom_key {}", obj.first_name)))
        }
    }

    struct Greeting;

    impl RegistryHooks<String> for Greeting {
        fn prepare_data(&self, obj: &String) -> anyhow::Result<String> {
            Ok(format!("hello {}", obj))
        }
    }

    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
    }

    impl RegistryHooks<String> for Counting {
        fn post_register(&self, _data: &String, _name: &str) -> anyhow::Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn registry_new_is_empty() {
        let registry: Registry<String> = Registry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert_eq!(registry.look_into(), None);
    }

    #[test]
    fn register_as_stores_under_name() {
        let registry = Registry::new();
        let returned = registry
            .register_as("key", "something".to_string())
            .unwrap();

        assert_eq!(returned, "something");
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("key").as_deref(), Some("something"));
    }

    #[test]
    fn register_infers_declared_name() {
        let registry = Registry::new();
        registry.register(Declared::new("Potato", 1u8)).unwrap();

        assert!(registry.contains("Potato"));
        assert_eq!(registry.get("Potato").map(|d| *d.value()), Some(1));
    }

    #[test]
    fn register_without_name_fails_for_plain_values() {
        let registry: Registry<String> = Registry::new();
        let err = registry.register("anonymous".to_string()).unwrap_err();

        assert!(matches!(err, RegistryError::NameInference { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn overwrite_keeps_first_position() {
        let registry = Registry::new();
        registry.register_as("a", 1i64).unwrap();
        registry.register_as("b", 2i64).unwrap();
        registry.register_as("a", 3i64).unwrap();

        assert_eq!(registry.values(), vec![3, 2]);
        assert_eq!(registry.names(), vec!["a", "b"]);
    }

    #[test]
    fn prepare_name_derives_key() {
        let registry = Registry::with_hooks(ByFirstName);
        let eliot = Person {
            first_name: "eliot".into(),
        };
        registry.register(eliot.clone()).unwrap();

        assert_eq!(registry.get("custom_key eliot"), Some(eliot));
    }

    #[test]
    fn prepare_data_transforms_stored_value_only() {
        let registry = Registry::with_hooks(Greeting);
        let returned = registry.register_as("eliot", "eliot".to_string()).unwrap();

        assert_eq!(returned, "eliot");
        assert_eq!(registry.get("eliot").as_deref(), Some("hello eliot"));
    }

    #[test]
    fn post_register_runs_once_per_registration() {
        let registry = Registry::with_hooks(Counting::default());
        registry.register_as("a", "1".to_string()).unwrap();
        registry.register_as("b", "2".to_string()).unwrap();

        assert_eq!(registry.hooks().calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn registrar_returns_argument_unchanged() {
        let registry: Registry<serde_json::Value> = Registry::new();
        let register = registry.registrar(Some("custom_name"));
        let value = register(json!({"a": 1})).unwrap();

        assert_eq!(value, json!({"a": 1}));
        assert_eq!(registry.get("custom_name"), Some(json!({"a": 1})));
    }

    #[test]
    fn clear_keeps_configuration() {
        let registry = Registry::new().with_look_into("test_registries");
        registry.register_as("x", 1i32).unwrap();
        registry.clear();

        assert!(registry.is_empty());
        assert_eq!(registry.look_into(), Some("test_registries"));
    }

    #[test]
    fn remove_preserves_remaining_order() {
        let registry = Registry::new();
        for (name, value) in [("a", 1i32), ("b", 2), ("c", 3)] {
            registry.register_as(name, value).unwrap();
        }

        assert_eq!(registry.remove("b"), Some(2));
        assert_eq!(
            registry.entries(),
            vec![("a".to_string(), 1), ("c".to_string(), 3)]
        );
    }

    #[test]
    fn objects_is_a_snapshot() {
        let registry = Registry::new();
        registry.register_as("a", json!({"n": 1})).unwrap();
        let view = registry.objects();
        registry.register_as("b", json!({"n": 2})).unwrap();

        assert_eq!(view.count(), 1);
        assert_eq!(registry.objects().count(), 2);
    }

    #[test]
    fn autodiscover_requires_look_into() {
        let registry: Registry<String> = Registry::new();
        let loader = crate::discovery::ModuleTable::new();
        let err = registry
            .autodiscover(&loader, &["app"], DiscoveryOptions::default())
            .unwrap_err();

        assert!(matches!(err, RegistryError::MissingLookInto { .. }));
    }
}
