//! Discovery configuration.
//!
//! The embedding application decides which modules discovery scans. This
//! module loads that decision from YAML in [`loader`].
//!
//! # Example
//!
//! ```
//! use persisting_theory::config::load_discovery_config;
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let path = temp.path().join("discovery.yml");
//! fs::write(&path, "modules: [tests.app1, tests.app2]").unwrap();
//!
//! let config = load_discovery_config(&path).unwrap();
//! assert_eq!(config.modules.len(), 2);
//! assert!(config.options().force_reload);
//! ```

pub mod loader;

pub use loader::{load_discovery_config, parse_discovery_config, DiscoveryConfig};
