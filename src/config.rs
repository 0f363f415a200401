//! Configuration for the fluent builder layer
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (oas-fluent.toml)
//! - Environment variables (OAS_FLUENT__*)
//!
//! ## Example config file (oas-fluent.toml):
//! ```toml
//! [profiles]
//! default = "3.1"
//! search_paths = ["./profiles"]
//!
//! [guard]
//! extension_prefix = "x-"
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Result;
use crate::profile::{ProfileContext, ProfileRef, ProfileRegistry, DEFAULT_EXTENSION_PREFIX};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FluentConfig {
    /// Which profiles exist and which one is the baseline
    #[serde(default)]
    pub profiles: ProfilesConfig,

    /// Key-guard settings
    #[serde(default)]
    pub guard: GuardConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfilesConfig {
    /// Id of the profile installed as the process-wide default
    #[serde(default = "default_profile_id")]
    pub default: String,

    /// Extra directories of `*.toml` profile definitions
    #[serde(default)]
    pub search_paths: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Prefix for profiles that do not declare their own
    #[serde(default = "default_extension_prefix")]
    pub extension_prefix: String,
}

fn default_profile_id() -> String {
    "3.1".to_string()
}

fn default_extension_prefix() -> String {
    DEFAULT_EXTENSION_PREFIX.to_string()
}

impl Default for ProfilesConfig {
    fn default() -> Self {
        Self {
            default: default_profile_id(),
            search_paths: Vec::new(),
        }
    }
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            extension_prefix: default_extension_prefix(),
        }
    }
}

impl FluentConfig {
    /// Load configuration from default locations
    pub fn load() -> std::result::Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, layering an explicit file over the defaults
    pub fn load_from(config_path: Option<&str>) -> std::result::Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = ["oas-fluent.toml", ".oas-fluent.toml", "config/oas-fluent.toml"];
        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(dirs) = directories::ProjectDirs::from("dev", "oas", "oas-fluent") {
            let xdg_config = dirs.config_dir().join("oas-fluent.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("OAS_FLUENT")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Built-in profiles plus every definition found on the search paths.
    /// Missing directories are skipped.
    pub fn registry(&self) -> Result<ProfileRegistry> {
        let mut registry =
            ProfileRegistry::builtin()?.with_extension_prefix(self.guard.extension_prefix.clone());
        for dir in &self.profiles.search_paths {
            if !dir.is_dir() {
                tracing::debug!(path = %dir.display(), "profile search path not found");
                continue;
            }
            registry.load_dir(dir)?;
        }
        Ok(registry)
    }

    /// Build the registry and install the configured default profile
    pub fn install(&self) -> Result<ProfileRef> {
        let profile = self.registry()?.get(&self.profiles.default)?;
        ProfileContext::set_default(profile.clone());
        tracing::debug!(profile = profile.id(), "installed default profile");
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDGETS: &str = r#"
        id = "widget-1"
        version = "1.0.0"

        [nodes.Widget]
        keys = ["name", "x-"]
    "#;

    #[test]
    fn test_default_config() {
        let config = FluentConfig::default();
        assert_eq!(config.profiles.default, "3.1");
        assert_eq!(config.guard.extension_prefix, "x-");
        assert!(config.profiles.search_paths.is_empty());
    }

    #[test]
    fn test_serialize_config() {
        let config = FluentConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[profiles]"));
        assert!(toml_str.contains("[guard]"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        let path = path.to_str().unwrap();

        let mut config = FluentConfig::default();
        config.profiles.default = "3.2".to_string();
        config.save(path).unwrap();

        let loaded = FluentConfig::load_from(Some(path)).unwrap();
        assert_eq!(loaded.profiles.default, "3.2");
    }

    #[test]
    fn test_registry_reads_search_paths() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("widget.toml"), WIDGETS).unwrap();

        let mut config = FluentConfig::default();
        config.profiles.search_paths = vec![dir.path().to_path_buf(), dir.path().join("missing")];

        let registry = config.registry().unwrap();
        assert!(registry.contains("widget-1"));
        assert!(registry.contains("3.1"));
        assert!(registry.contains("3.2"));
    }
}
