//! Module loading boundary used by discovery.
//!
//! Discovery never looks inside a module: importing it is the point, since
//! loading a module runs the registrations it declares. A [`ModuleLoader`]
//! reports one of three outcomes for an import: loaded, not found, or found
//! but failed while loading.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use parking_lot::Mutex;
use thiserror::Error;

/// Why an import did not complete.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The named module does not exist.
    #[error("No module named '{module}'")]
    NotFound { module: String },

    /// The module exists but its initialization failed.
    #[error(transparent)]
    Failed(anyhow::Error),
}

/// Imports modules by dotted path.
pub trait ModuleLoader {
    /// Import `module`.
    ///
    /// A module that was already imported is not run again unless
    /// `force_reload` is set.
    fn import(&self, module: &str, force_reload: bool) -> Result<(), ImportError>;
}

/// Entry point run when a module is imported.
pub type ModuleInit = Arc<dyn Fn() -> anyhow::Result<()> + Send + Sync>;

/// An in-process module table.
///
/// Maps dotted module paths (`app.registries`) to their entry points.
/// Adding a module also declares its parent packages, which import without
/// running anything. A module whose entry point fails is not marked as
/// loaded.
#[derive(Default)]
pub struct ModuleTable {
    packages: IndexSet<String>,
    modules: IndexMap<String, ModuleInit>,
    executions: Mutex<HashMap<String, usize>>,
}

impl ModuleTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a package without an entry point.
    pub fn package(mut self, name: impl Into<String>) -> Self {
        self.add_package(name);
        self
    }

    /// Declare a module with its entry point.
    pub fn module<F>(mut self, path: impl Into<String>, init: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.add_module(path, init);
        self
    }

    /// Declare a package and all of its parents.
    pub fn add_package(&mut self, name: impl Into<String>) {
        let name = name.into();
        let mut end = 0;
        for segment in name.split('.') {
            end += segment.len();
            self.packages.insert(name[..end].to_string());
            end += 1;
        }
    }

    /// Declare a module with its entry point, replacing any previous one.
    pub fn add_module<F>(&mut self, path: impl Into<String>, init: F)
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let path = path.into();
        if let Some((parent, _)) = path.rsplit_once('.') {
            self.add_package(parent);
        }
        self.modules.insert(path, Arc::new(init));
    }

    /// Check if `module` can be imported.
    pub fn contains(&self, module: &str) -> bool {
        self.modules.contains_key(module) || self.packages.contains(module)
    }

    /// How many times the entry point of `module` ran successfully.
    pub fn executions(&self, module: &str) -> usize {
        self.executions.lock().get(module).copied().unwrap_or(0)
    }

    /// Check if the entry point of `module` has run successfully.
    pub fn is_loaded(&self, module: &str) -> bool {
        self.executions(module) > 0
    }
}

impl ModuleLoader for ModuleTable {
    fn import(&self, module: &str, force_reload: bool) -> Result<(), ImportError> {
        let Some(init) = self.modules.get(module).cloned() else {
            if self.packages.contains(module) {
                return Ok(());
            }
            return Err(ImportError::NotFound {
                module: module.to_string(),
            });
        };

        if !force_reload && self.is_loaded(module) {
            return Ok(());
        }

        // The lock is released here: entry points may import other modules.
        init().map_err(ImportError::Failed)?;
        *self
            .executions
            .lock()
            .entry(module.to_string())
            .or_default() += 1;
        Ok(())
    }
}

impl fmt::Debug for ModuleTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleTable")
            .field("packages", &self.packages)
            .field("modules", &self.modules.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
