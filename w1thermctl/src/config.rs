//! CLI configuration management
//!
//! The CLI reads the shared [`StaticConfig`] file and layers environment
//! variables and command-line flags on top of it.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use w1therm_core::{default_config_path, AliasData, StaticConfig};

/// Environment variable naming the config file
pub const ENV_CONFIG: &str = "W1THERM_CONFIG";
/// Environment variable overriding the bus root
pub const ENV_BUS_ROOT: &str = "W1THERM_BUS_ROOT";
/// Environment variable overriding the output format
pub const ENV_FORMAT: &str = "W1THERM_FORMAT";
/// Environment variable enabling verbose logging
pub const ENV_VERBOSE: &str = "W1THERM_VERBOSE";
/// Environment variable toggling the kernel module check
pub const ENV_CHECK_MODULES: &str = "W1THERM_CHECK_MODULES";

/// Effective CLI configuration
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CliConfig {
    /// One-wire device directory
    pub bus_root: PathBuf,

    /// Default output format
    pub output_format: String,

    /// Enable verbose logging
    pub verbose: bool,

    /// Verify kernel module support before accessing sensors
    pub check_modules: bool,

    /// Human-readable sensor names
    pub aliases: AliasData,
}

impl Default for CliConfig {
    fn default() -> Self {
        let defaults = StaticConfig::default();
        Self {
            bus_root: defaults.bus_root,
            output_format: "table".to_string(),
            verbose: false,
            check_modules: defaults.check_modules,
            aliases: defaults.aliases,
        }
    }
}

impl CliConfig {
    /// Config file location: explicit path, then `W1THERM_CONFIG`, then the
    /// XDG default
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(ENV_CONFIG).map(PathBuf::from))
            .unwrap_or_else(default_config_path)
    }

    /// Create a new builder for constructing configuration
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Builder for CLI configuration with validation and priority chain support
///
/// Priority chain (lowest to highest):
/// 1. Defaults
/// 2. Config file
/// 3. Environment variables
/// 4. CLI arguments
///
/// Each layer overrides what earlier layers set, so apply them in priority
/// order: config file, then environment, then CLI arguments.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    bus_root: Option<PathBuf>,
    output_format: Option<String>,
    verbose: Option<bool>,
    check_modules: Option<bool>,
    aliases: Option<AliasData>,
}

impl ConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set bus root (with validation)
    pub fn with_bus_root(mut self, bus_root: impl Into<PathBuf>) -> Result<Self> {
        let bus_root = bus_root.into();
        Self::validate_bus_root(&bus_root)?;
        self.bus_root = Some(bus_root);
        Ok(self)
    }

    /// Set output format (with validation)
    pub fn with_output_format(mut self, format: impl Into<String>) -> Result<Self> {
        let format = format.into();
        Self::validate_output_format(&format)?;
        self.output_format = Some(format);
        Ok(self)
    }

    /// Set verbose flag
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    /// Set kernel module check flag
    pub fn with_check_modules(mut self, check_modules: bool) -> Self {
        self.check_modules = Some(check_modules);
        self
    }

    /// Load configuration from file
    ///
    /// A missing file is not an error; a malformed one is.
    pub fn with_config_file(self, path: &Path) -> Result<Self> {
        let config = StaticConfig::load(path)
            .with_context(|| format!("Failed to load config file {}", path.display()))?;

        Ok(self.with_static_config(config))
    }

    /// Apply values from an already loaded static configuration
    pub fn with_static_config(self, config: StaticConfig) -> Self {
        Self {
            bus_root: Some(config.bus_root),
            check_modules: Some(config.check_modules),
            aliases: Some(config.aliases),
            ..self
        }
    }

    /// Apply environment variable overrides
    ///
    /// Invalid values are ignored.
    pub fn with_env_overrides(mut self) -> Self {
        let env_bus_root = std::env::var_os(ENV_BUS_ROOT).map(PathBuf::from);
        if let Some(bus_root) = env_bus_root {
            if Self::validate_bus_root(&bus_root).is_ok() {
                self.bus_root = Some(bus_root);
            }
        }

        if let Ok(format) = std::env::var(ENV_FORMAT) {
            if Self::validate_output_format(&format).is_ok() {
                self.output_format = Some(format);
            }
        }

        if let Some(verbose) = std::env::var(ENV_VERBOSE).ok().and_then(|v| parse_bool(&v)) {
            self.verbose = Some(verbose);
        }

        if let Some(check) = std::env::var(ENV_CHECK_MODULES)
            .ok()
            .and_then(|v| parse_bool(&v))
        {
            self.check_modules = Some(check);
        }

        self
    }

    /// Build the final configuration with validation
    pub fn build(self) -> Result<CliConfig> {
        let defaults = CliConfig::default();

        let bus_root = self.bus_root.unwrap_or(defaults.bus_root);
        let output_format = self.output_format.unwrap_or(defaults.output_format);

        // Validate final values
        Self::validate_bus_root(&bus_root)?;
        Self::validate_output_format(&output_format)?;

        Ok(CliConfig {
            bus_root,
            output_format,
            verbose: self.verbose.unwrap_or(defaults.verbose),
            check_modules: self.check_modules.unwrap_or(defaults.check_modules),
            aliases: self.aliases.unwrap_or(defaults.aliases),
        })
    }

    /// Validate bus root path
    fn validate_bus_root(bus_root: &Path) -> Result<()> {
        if bus_root.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("Bus root cannot be empty"));
        }

        if !bus_root.is_absolute() {
            return Err(anyhow::anyhow!(
                "Bus root must be an absolute path, got '{}'",
                bus_root.display()
            ));
        }

        Ok(())
    }

    /// Validate output format
    fn validate_output_format(format: &str) -> Result<()> {
        match format {
            "table" | "json" => Ok(()),
            _ => Err(anyhow::anyhow!(
                "Invalid output format '{}'. Must be 'table' or 'json'",
                format
            )),
        }
    }
}
