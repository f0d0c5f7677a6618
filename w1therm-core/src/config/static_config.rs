//! Static configuration loaded once at startup

use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::aliases::AliasData;
use crate::error::{Result, W1ThermError};

/// Directory where the kernel exposes one-wire slave devices
pub const DEFAULT_BUS_ROOT: &str = "/sys/bus/w1/devices";

fn default_bus_root() -> PathBuf {
    PathBuf::from(DEFAULT_BUS_ROOT)
}

fn default_check_modules() -> bool {
    true
}

/// Static configuration for w1therm.
///
/// Located at `~/.config/w1therm/config.toml` by default. Every key is
/// optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StaticConfig {
    /// Directory containing one subdirectory per attached sensor
    #[serde(default = "default_bus_root")]
    pub bus_root: PathBuf,

    /// Verify kernel module support before touching the bus
    #[serde(default = "default_check_modules")]
    pub check_modules: bool,

    /// Human-readable sensor names
    #[serde(default)]
    pub aliases: AliasData,
}

impl Default for StaticConfig {
    fn default() -> Self {
        Self {
            bus_root: default_bus_root(),
            check_modules: default_check_modules(),
            aliases: AliasData::default(),
        }
    }
}

impl StaticConfig {
    /// Load from a TOML file, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| {
            W1ThermError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Parse StaticConfig from TOML string.
    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SensorId;

    #[test]
    fn test_default_static_config() {
        let config = StaticConfig::default();
        assert_eq!(config.bus_root, PathBuf::from("/sys/bus/w1/devices"));
        assert!(config.check_modules);
        assert!(config.aliases.is_empty());
    }

    #[test]
    fn test_static_config_empty_document_uses_defaults() {
        let config = StaticConfig::from_toml("").unwrap();
        assert_eq!(config, StaticConfig::default());
    }

    #[test]
    fn test_static_config_deserialization() {
        let toml_str = r#"
            bus_root = "/tmp/fake-w1"
            check_modules = false

            [aliases]
            000005e2fdc3 = "Living room"
        "#;

        let config = StaticConfig::from_toml(toml_str).unwrap();
        assert_eq!(config.bus_root, PathBuf::from("/tmp/fake-w1"));
        assert!(!config.check_modules);
        assert_eq!(
            config.aliases.get(&SensorId::new("000005e2fdc3").unwrap()),
            Some("Living room")
        );
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[aliases]\n000000000001 = \"Attic\"\n").unwrap();

        let config = StaticConfig::load(&path).unwrap();
        assert_eq!(config.bus_root, PathBuf::from(DEFAULT_BUS_ROOT));
        assert!(config.check_modules);
        assert_eq!(
            config.aliases.get(&SensorId::new("000000000001").unwrap()),
            Some("Attic")
        );
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = StaticConfig::load(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(config, StaticConfig::default());
    }

    #[test]
    fn test_load_invalid_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "check_modules = \"sometimes\"").unwrap();

        let err = StaticConfig::load(&path).unwrap_err();
        assert!(matches!(err, W1ThermError::Config(_)));
    }
}
