//! Overridable steps of the registration pipeline.
//!
//! Every registration runs the same sequence:
//!
//! 1. [`validate`](RegistryHooks::validate) - reject unsupported objects
//! 2. [`prepare_name`](RegistryHooks::prepare_name) - derive a key when none was given
//! 3. [`prepare_data`](RegistryHooks::prepare_data) - transform the value to store
//! 4. store under the key, replacing any previous entry
//! 5. [`post_register`](RegistryHooks::post_register) - react to the stored entry
//!
//! A registry with custom behavior supplies its own hooks type; every
//! method has a default so implementors only override what they need.

use super::naming::short_type_name;

/// Hooks invoked by [`Registry`](super::Registry) while registering objects.
pub trait RegistryHooks<T> {
    /// Decide whether `obj` may be stored. Defaults to accepting everything.
    fn validate(&self, _obj: &T) -> bool {
        true
    }

    /// Derive a key for an object registered without an explicit name.
    ///
    /// Returning `Ok(None)` falls back to the object's declared name.
    fn prepare_name(&self, _obj: &T) -> anyhow::Result<Option<String>> {
        Ok(None)
    }

    /// Produce the value stored for `obj`. Defaults to a copy of `obj`.
    fn prepare_data(&self, obj: &T) -> anyhow::Result<T>
    where
        T: Clone,
    {
        Ok(obj.clone())
    }

    /// Called once the value is stored. Errors reach the caller of
    /// `register`, but the value stays stored.
    fn post_register(&self, _data: &T, _name: &str) -> anyhow::Result<()> {
        Ok(())
    }

    /// Name used for this registry in error messages and logs.
    fn label(&self) -> String {
        short_type_name::<Self>().to_string()
    }
}

/// Hooks with every step left at its default.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHooks;

impl<T> RegistryHooks<T> for DefaultHooks {
    fn label(&self) -> String {
        "Registry".to_string()
    }
}
