//! Discovery configuration loading.
//!
//! The list of modules to scan is supplied by the embedding application,
//! usually from a YAML file:
//!
//! ```yaml
//! modules:
//!   - tests.app1
//!   - tests.app2
//! force_reload: true
//! cascade: true
//! look_into: test_registries
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::discovery::{DiscoveryOptions, MetaRegistry};
use crate::error::{RegistryError, Result};

fn default_true() -> bool {
    true
}

/// Which modules discovery scans, and how.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Modules to scan, in order.
    #[serde(default)]
    pub modules: Vec<String>,

    /// Run sub-modules again on every discovery pass.
    #[serde(default = "default_true")]
    pub force_reload: bool,

    /// Cascade meta-registry discovery into child registries.
    #[serde(default = "default_true")]
    pub cascade: bool,

    /// Sub-module imported by meta-registry discovery, if not `registries`.
    #[serde(default)]
    pub look_into: Option<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            modules: Vec::new(),
            force_reload: true,
            cascade: true,
            look_into: None,
        }
    }
}

impl DiscoveryConfig {
    /// Options to pass to `autodiscover`.
    pub fn options(&self) -> DiscoveryOptions {
        DiscoveryOptions::new()
            .force_reload(self.force_reload)
            .cascade(self.cascade)
    }

    /// Build a meta-registry using the configured `look_into`.
    pub fn meta_registry(&self) -> MetaRegistry {
        match &self.look_into {
            Some(look_into) => MetaRegistry::new().with_look_into(look_into.clone()),
            None => MetaRegistry::new(),
        }
    }
}

/// Load a discovery configuration file.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParse` if the YAML is invalid.
pub fn load_discovery_config(path: &Path) -> Result<DiscoveryConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            RegistryError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            RegistryError::Io(e)
        }
    })?;

    parse_discovery_config(&content, path)
}

/// Parse YAML content into a [`DiscoveryConfig`].
///
/// # Arguments
///
/// * `content` - The YAML content to parse
/// * `source_path` - Path for error reporting
pub fn parse_discovery_config(content: &str, source_path: &Path) -> Result<DiscoveryConfig> {
    let config: DiscoveryConfig =
        serde_yaml::from_str(content).map_err(|e| RegistryError::ConfigParse {
            path: source_path.to_path_buf(),
            message: e.to_string(),
        })?;

    tracing::debug!(
        "Loaded discovery config from {} with {} modules",
        source_path.display(),
        config.modules.len()
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn parse_full_config() {
        let yaml = r#"
modules:
  - tests.app1
  - tests.app2
force_reload: false
cascade: false
look_into: test_registries
"#;
        let path = PathBuf::from("discovery.yml");
        let config = parse_discovery_config(yaml, &path).unwrap();

        assert_eq!(config.modules, vec!["tests.app1", "tests.app2"]);
        assert!(!config.force_reload);
        assert!(!config.cascade);
        assert_eq!(config.look_into.as_deref(), Some("test_registries"));
    }

    #[test]
    fn parse_applies_defaults() {
        let path = PathBuf::from("discovery.yml");
        let config = parse_discovery_config("modules: [app]", &path).unwrap();

        assert_eq!(config.modules, vec!["app"]);
        assert!(config.force_reload);
        assert!(config.cascade);
        assert_eq!(config.look_into, None);
        assert_eq!(config.options(), DiscoveryOptions::default());
    }

    #[test]
    fn parse_invalid_yaml_reports_path() {
        let path = PathBuf::from("/bad.yml");
        let source = "modules: [unclosed";
        let err = parse_discovery_config(source, &path).unwrap_err();

        match err {
            RegistryError::ConfigParse { path: reported, .. } => assert_eq!(reported, path),
            other => panic!("Expected ConfigParse, got {:?}", other),
        }
    }

    #[test]
    fn load_missing_file_is_not_found() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing.yml");
        let err = load_discovery_config(&path).unwrap_err();

        assert!(matches!(err, RegistryError::ConfigNotFound { .. }));
    }

    #[test]
    fn load_reads_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("discovery.yml");
        fs::write(&path, "modules: [a, b]\ncascade: false\n").unwrap();

        let config = load_discovery_config(&path).unwrap();
        assert_eq!(config.modules, vec!["a", "b"]);
        assert!(!config.options().cascade);
        assert!(config.options().force_reload);
    }

    #[test]
    fn meta_registry_uses_configured_look_into() {
        let config = DiscoveryConfig {
            look_into: Some("test_registries".into()),
            ..Default::default()
        };
        assert_eq!(config.meta_registry().look_into(), Some("test_registries"));
        assert_eq!(
            DiscoveryConfig::default().meta_registry().look_into(),
            Some("registries")
        );
    }
}
