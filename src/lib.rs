//! Persisting Theory - ordered object registries with queries and discovery.
//!
//! A registry is a named, insertion-ordered collection of objects. Objects
//! are added programmatically or at their declaration site, pass through an
//! overridable registration pipeline, and are later retrieved with a small
//! declarative query language. Discovery imports a conventional sub-module
//! from each configured module so that the registrations those modules
//! declare run, and a meta-registry cascades discovery across every
//! registry of an application.
//!
//! # Modules
//!
//! - [`config`] - Discovery configuration loading
//! - [`discovery`] - Module scanning, the module loader boundary and the meta-registry
//! - [`error`] - Error types and result aliases
//! - [`query`] - Lookups and chainable query sets
//! - [`registry`] - Registries, their storage and registration hooks
//!
//! # Example
//!
//! ```
//! use persisting_theory::registry::{Registry, RegistryHooks};
//! use serde_json::{json, Value};
//!
//! struct ByName;
//!
//! impl RegistryHooks<Value> for ByName {
//!     fn prepare_name(&self, obj: &Value) -> anyhow::Result<Option<String>> {
//!         Ok(obj["name"].as_str().map(str::to_string))
//!     }
//! }
//!
//! let registry = Registry::with_hooks(ByName);
//! registry.register(json!({"name": "test_1", "order": 2, "a": 1})).unwrap();
//! registry.register(json!({"name": "test_2", "order": 1, "a": 1})).unwrap();
//!
//! let first = registry.objects().filter(("a", 1)).order_by("order").first().unwrap();
//! assert_eq!(first["name"], "test_2");
//! ```

pub mod config;
pub mod discovery;
pub mod error;
pub mod query;
pub mod registry;

pub use discovery::{DiscoveryOptions, MetaRegistry, ModuleLoader, ModuleTable};
pub use error::{RegistryError, Result};
pub use query::{Fields, Lookup, QuerySet};
pub use registry::{Declared, Registrable, Registry, RegistryHooks};
