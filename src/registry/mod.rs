//! Named, ordered registries of objects.
//!
//! A [`Registry`] stores objects under unique names in insertion order. Every
//! object passes through the registration pipeline defined by the registry's
//! [`RegistryHooks`] (validate, derive a name, transform, store, post-register
//! hook) before it becomes visible to queries.
//!
//! # Example
//!
//! ```
//! use persisting_theory::registry::{Registry, RegistryHooks};
//!
//! struct OnlyPositive;
//!
//! impl RegistryHooks<i64> for OnlyPositive {
//!     fn validate(&self, obj: &i64) -> bool {
//!         *obj > 0
//!     }
//! }
//!
//! let registry = Registry::<i64, _>::with_hooks(OnlyPositive);
//! registry.register_as("twelve", 12).unwrap();
//! assert!(registry.register_as("minus", -1).is_err());
//! assert_eq!(registry.get("twelve"), Some(12));
//! ```

pub mod base;
pub mod hooks;
pub mod naming;
pub mod store;

pub use base::Registry;
pub use hooks::{DefaultHooks, RegistryHooks};
pub use naming::{short_type_name, Declared, Registrable};
pub use store::NamedStore;
