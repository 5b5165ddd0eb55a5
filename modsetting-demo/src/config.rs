//! Demo configuration.
//!
//! Read from `$XDG_CONFIG_HOME/modsetting-demo/config.toml`. If the file
//! doesn't exist, a default configuration is written there first.

use anyhow::{Context, Result};
use modsetting_binding::BindingConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Which side of the binding loads first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadOrder {
    #[default]
    HostFirst,
    ClientFirst,
}

/// Demo configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    /// Default: "info"
    pub log_level: String,
    /// Load order to simulate
    /// Default: host_first
    pub load_order: LoadOrder,
    /// Where the client looks for the host
    pub binding: BindingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            load_order: LoadOrder::HostFirst,
            binding: BindingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the specified path
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default location, creating it if missing.
    pub fn load_default() -> Result<Self> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_file(&config_path)?;
        }

        Self::load(&config_path)
    }

    /// Returns `$XDG_CONFIG_HOME/modsetting-demo/config.toml`
    pub fn default_config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "modsetting", "modsetting-demo")
            .context("Failed to determine project directories")?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    fn create_default_file(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        fs::write(path, Self::default_config_content())
            .with_context(|| format!("Failed to write default config file: {}", path.display()))?;

        tracing::info!("Created default configuration file at: {}", path.display());
        Ok(())
    }

    fn default_config_content() -> String {
        r#"# ModSetting demo configuration

# Log level: trace, debug, info, warn, error
# RUST_LOG overrides this when set.
log_level = "info"

# Which side loads first: "host_first" or "client_first"
load_order = "host_first"

[binding]
# Marker contained in the host module's identity
host_module = "ModSetting"

# Fully qualified name of the host's exposed type
host_type = "ModSetting.ModBehaviour"

# Host field holding its compatibility version
version_field = "Version"

# Version this client was written against
expected_version = 0.3
"#
        .to_string()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.log_level.as_str()) {
            anyhow::bail!(
                "Invalid log_level: {}. Must be one of: {}",
                self.log_level,
                valid_log_levels.join(", ")
            );
        }

        self.binding
            .validate()
            .context("Invalid [binding] section")?;

        Ok(())
    }
}
