//! Hierarchical configuration loader with precedence
//!
//! Loads configuration from multiple sources with the following precedence (low to high):
//! 1. Embedded defaults (built into binary)
//! 2. Global config (~/.meshctl/config.yaml)
//! 3. Environment variables (MESHCTL_* prefix)
//! 4. CLI flags (handled by caller)

use crate::error::{Error, Result};
use crate::resources::{EmbeddedStore, ResourceStore};
use crate::types::RuntimeConfig;
use crate::utils::get_home_dir;
use camino::{Utf8Path, Utf8PathBuf};
use serde::de::DeserializeOwned;
use std::env;
use std::fs;
use tracing::debug;

/// Name of the global configuration file
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Embedded runtime defaults
const RUNTIME_DEFAULTS: &str = "config/runtime-defaults.yaml";

/// Configuration hierarchy loader
pub struct HierarchicalConfigLoader {
    /// Base directory for configuration files
    config_dir: Utf8PathBuf,
}

impl HierarchicalConfigLoader {
    /// Create a new hierarchical config loader rooted at ~/.meshctl
    pub fn new() -> Result<Self> {
        let config_dir = Self::get_config_dir()?;
        Ok(Self { config_dir })
    }

    /// Create a loader with a custom config directory
    pub fn with_dir(config_dir: Utf8PathBuf) -> Self {
        Self { config_dir }
    }

    fn get_config_dir() -> Result<Utf8PathBuf> {
        let home = get_home_dir()?;
        let home = Utf8PathBuf::from_path_buf(home)
            .map_err(|_| Error::invalid_config("Home directory path is not valid UTF-8"))?;
        Ok(home.join(".meshctl"))
    }

    /// Load runtime configuration with hierarchical precedence
    pub fn load_runtime_config(&self) -> Result<RuntimeConfig> {
        let mut config = Self::load_embedded_config::<RuntimeConfig>(RUNTIME_DEFAULTS)?;

        let config_path = self.config_dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            debug!("Loading runtime config from {}", config_path);
            let file_config = self.load_yaml_file::<RuntimeConfig>(&config_path)?;
            config = Self::merge_runtime_config(config, file_config);
        }

        self.apply_env_overrides(config)
    }

    fn load_embedded_config<T: DeserializeOwned>(filename: &str) -> Result<T> {
        let data = EmbeddedStore::new().read_file(filename)?;

        let content = std::str::from_utf8(&data).map_err(|_| {
            Error::invalid_config(format!("Invalid UTF-8 in embedded config: {}", filename))
        })?;

        serde_yaml_ng::from_str(content).map_err(|e| Error::parse(filename, e))
    }

    fn load_yaml_file<T: DeserializeOwned>(&self, path: &Utf8Path) -> Result<T> {
        let content = fs::read_to_string(path)?;
        serde_yaml_ng::from_str(&content).map_err(|e| Error::parse(path.as_str(), e))
    }

    /// Merge two runtime configs (base is overridden by overlay where set)
    fn merge_runtime_config(base: RuntimeConfig, overlay: RuntimeConfig) -> RuntimeConfig {
        RuntimeConfig {
            default_namespace: if overlay.default_namespace.is_empty() {
                base.default_namespace
            } else {
                overlay.default_namespace
            },
            kubeconfig: overlay.kubeconfig.or(base.kubeconfig),
            context: overlay.context.or(base.context),
            manifests_path: overlay.manifests_path.or(base.manifests_path),
        }
    }

    /// Apply environment variable overrides to runtime config
    fn apply_env_overrides(&self, mut config: RuntimeConfig) -> Result<RuntimeConfig> {
        if let Ok(val) = env::var("MESHCTL_NAMESPACE") {
            if val.trim().is_empty() {
                return Err(Error::invalid_config("MESHCTL_NAMESPACE must not be empty"));
            }
            config.default_namespace = val;
        }

        if let Ok(val) = env::var("MESHCTL_KUBECONFIG") {
            config.kubeconfig = Some(val);
        }

        if let Ok(val) = env::var("MESHCTL_CONTEXT") {
            config.context = Some(val);
        }

        if let Ok(val) = env::var("MESHCTL_MANIFESTS") {
            config.manifests_path = Some(val);
        }

        Ok(config)
    }

    /// Get the config directory path
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }
}
