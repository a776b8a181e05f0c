//! Error types for registry operations.
//!
//! This module defines [`RegistryError`], the error type returned by
//! registration, querying, discovery and configuration loading, and a
//! [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Pipeline and lookup failures get their own variants so callers can
//!   match on them (`DoesNotExist` is often an expected outcome)
//! - Failures of user hooks surface through `RegistryError::Other`
//! - A module that exists but breaks while loading surfaces through
//!   `RegistryError::ModuleLoad` untouched, so the original error can be
//!   downcast by the caller

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The registry's `validate` hook rejected an object.
    #[error("{object} is not a valid value for {registry} registry")]
    Validation { object: String, registry: String },

    /// No explicit name was given and none could be derived.
    #[error("Cannot deduce name from {object}; register it with an explicit name")]
    NameInference { object: String },

    /// `get` matched zero objects.
    #[error("No object matches lookup ({lookup})")]
    DoesNotExist { lookup: String },

    /// `get` matched more than one object.
    #[error("Lookup ({lookup}) returned {count} objects, expected exactly one")]
    MultipleObjectsReturned { lookup: String, count: usize },

    /// A module passed to discovery does not exist at all.
    #[error("No module named '{module}'")]
    ModuleNotFound { module: String },

    /// Discovery was requested on a registry without a `look_into` module.
    #[error("{registry} registry has no look_into module configured")]
    MissingLookInto { registry: String },

    /// Discovery configuration file not found.
    #[error("Discovery configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse a discovery configuration file.
    #[error("Failed to parse discovery config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A module exists but failed while loading.
    #[error(transparent)]
    ModuleLoad(anyhow::Error),

    /// Failure raised by a registry hook.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
