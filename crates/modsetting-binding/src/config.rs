//! Binding configuration.
//!
//! Names the host module and type to look for and the compatibility version
//! this client was written against. Defaults match the ModSetting host.

use crate::error::{BindingError, BindingResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Where to find the host and which version to expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingConfig {
    /// Marker contained in the host module's identity.
    pub host_module: String,

    /// Fully qualified name of the host's exposed type.
    pub host_type: String,

    /// Name of the host's numeric compatibility field.
    pub version_field: String,

    /// Compatibility version this client expects.
    pub expected_version: f32,
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            host_module: "ModSetting".to_string(),
            host_type: "ModSetting.ModBehaviour".to_string(),
            version_field: "Version".to_string(),
            expected_version: 0.3,
        }
    }
}

impl BindingConfig {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> BindingResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse a config from a TOML string. Missing keys take their defaults.
    pub fn from_str(content: &str) -> BindingResult<Self> {
        let config: BindingConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the config.
    pub fn validate(&self) -> BindingResult<()> {
        if self.host_module.trim().is_empty() {
            return Err(BindingError::InvalidConfig(
                "host_module cannot be empty".to_string(),
            ));
        }

        if self.host_type.trim().is_empty() {
            return Err(BindingError::InvalidConfig(
                "host_type cannot be empty".to_string(),
            ));
        }

        if self.version_field.trim().is_empty() {
            return Err(BindingError::InvalidConfig(
                "version_field cannot be empty".to_string(),
            ));
        }

        if !self.expected_version.is_finite() {
            return Err(BindingError::InvalidConfig(
                "expected_version must be a finite number".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = BindingConfig::default();
        assert_eq!(config.host_module, "ModSetting");
        assert_eq!(config.host_type, "ModSetting.ModBehaviour");
        assert_eq!(config.version_field, "Version");
        assert_eq!(config.expected_version, 0.3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = BindingConfig::from_str("expected_version = 0.4\n").unwrap();
        assert_eq!(config.expected_version, 0.4);
        assert_eq!(config.host_type, "ModSetting.ModBehaviour");
    }

    #[test]
    fn test_rejects_empty_names() {
        let result = BindingConfig::from_str("host_type = \"\"\n");
        assert!(matches!(result, Err(BindingError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let result = BindingConfig::from_str("expected_version = \"high\"\n");
        assert!(matches!(result, Err(BindingError::Toml(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "host_module = \"OtherSettings\"").unwrap();
        writeln!(file, "host_type = \"OtherSettings.Api\"").unwrap();

        let config = BindingConfig::from_file(file.path()).unwrap();
        assert_eq!(config.host_module, "OtherSettings");
        assert_eq!(config.host_type, "OtherSettings.Api");
        assert_eq!(config.version_field, "Version");
    }
}
