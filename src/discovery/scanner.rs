//! Discovery of registration modules.
//!
//! For every configured module, discovery imports the module itself and
//! then its conventional sub-module (`<module>.<look_into>`). A sub-module
//! that does not exist is skipped. A sub-module that exists but fails, or
//! that is missing something it depends on, stops discovery with the
//! original error.

use serde::{Deserialize, Serialize};

use super::loader::{ImportError, ModuleLoader};
use crate::error::{RegistryError, Result};

/// Options for an `autodiscover` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryOptions {
    /// Run sub-modules again even if they were imported before.
    pub force_reload: bool,
    /// For meta-registries, also run discovery on every child registry.
    pub cascade: bool,
}

impl DiscoveryOptions {
    /// Options with reloading and cascading enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether sub-modules are reloaded.
    pub fn force_reload(mut self, force_reload: bool) -> Self {
        self.force_reload = force_reload;
        self
    }

    /// Set whether meta-registry discovery cascades into child registries.
    pub fn cascade(mut self, cascade: bool) -> Self {
        self.cascade = cascade;
        self
    }
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            force_reload: true,
            cascade: true,
        }
    }
}

/// Outcome of a discovery pass, in scan order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveryReport {
    /// Sub-modules that were imported.
    pub imported: Vec<String>,
    /// Sub-modules that do not exist and were skipped.
    pub missing: Vec<String>,
}

impl DiscoveryReport {
    /// Append another report.
    pub fn merge(&mut self, other: DiscoveryReport) {
        self.imported.extend(other.imported);
        self.missing.extend(other.missing);
    }
}

/// Dotted path of a module's conventional sub-module.
pub fn submodule_path(module: &str, look_into: &str) -> String {
    format!("{}.{}", module, look_into)
}

/// Import `<module>.<look_into>` for every module, in order.
///
/// # Errors
///
/// Returns `ModuleNotFound` if a listed module does not exist and
/// `ModuleLoad` with the loader's error if a module or sub-module fails to
/// load.
pub fn scan<S: AsRef<str>>(
    loader: &dyn ModuleLoader,
    modules: &[S],
    look_into: &str,
    force_reload: bool,
) -> Result<DiscoveryReport> {
    let mut report = DiscoveryReport::default();

    for module in modules {
        let module = module.as_ref();
        loader.import(module, false).map_err(|e| match e {
            ImportError::NotFound { module } => RegistryError::ModuleNotFound { module },
            ImportError::Failed(source) => RegistryError::ModuleLoad(source),
        })?;

        let target = submodule_path(module, look_into);
        match loader.import(&target, force_reload) {
            Ok(()) => {
                tracing::debug!("Imported {}", target);
                report.imported.push(target);
            }
            Err(ImportError::NotFound { module: missing }) if missing == target => {
                tracing::trace!("No {} module in {}, skipping", look_into, module);
                report.missing.push(target);
            }
            Err(e @ ImportError::NotFound { .. }) => {
                return Err(RegistryError::ModuleLoad(anyhow::Error::new(e)));
            }
            Err(ImportError::Failed(source)) => {
                return Err(RegistryError::ModuleLoad(source));
            }
        }
    }

    Ok(report)
}
