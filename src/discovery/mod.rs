//! Plugin discovery.
//!
//! Registries are populated by the modules that declare their contents:
//! importing a module runs its registrations. Discovery walks a configured
//! list of modules and imports the conventional sub-module of each one
//! through a [`ModuleLoader`], skipping modules that don't have it.
//!
//! - [`scanner`] - the discovery pass shared by every registry
//! - [`loader`] - the import boundary and the in-process [`ModuleTable`]
//! - [`meta`] - [`MetaRegistry`], which discovers registries and cascades
//!   discovery into them
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use persisting_theory::discovery::{DiscoveryOptions, MetaRegistry, ModuleTable};
//! use persisting_theory::registry::Registry;
//!
//! let meta = Arc::new(MetaRegistry::new());
//! let vegetables = Arc::new(Registry::<String>::new().with_look_into("vegetables"));
//!
//! let loader = ModuleTable::new()
//!     .module("garden.registries", {
//!         let (meta, vegetables) = (meta.clone(), vegetables.clone());
//!         move || {
//!             meta.register("vegetables", vegetables.clone())?;
//!             Ok(())
//!         }
//!     })
//!     .module("garden.vegetables", {
//!         let vegetables = vegetables.clone();
//!         move || {
//!             vegetables.register_as("Potato", "potato".to_string())?;
//!             Ok(())
//!         }
//!     });
//!
//! meta.autodiscover(&loader, &["garden"], DiscoveryOptions::default()).unwrap();
//! assert!(meta.contains("vegetables"));
//! assert_eq!(vegetables.get("Potato").as_deref(), Some("potato"));
//! ```

pub mod loader;
pub mod meta;
pub mod scanner;

pub use loader::{ImportError, ModuleInit, ModuleLoader, ModuleTable};
pub use meta::{Discover, MetaHooks, MetaRegistry, RegistryHandle, META_LOOK_INTO};
pub use scanner::{scan, submodule_path, DiscoveryOptions, DiscoveryReport};
