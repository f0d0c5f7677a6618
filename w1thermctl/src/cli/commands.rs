//! CLI command and subcommand definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// DS18B20 one-wire temperature sensor CLI
#[derive(Parser, Debug)]
#[command(name = "w1thermctl")]
#[command(version, about = "Read DS18B20 temperature sensors on the one-wire bus", long_about = None)]
pub struct Cli {
    /// One-wire device directory (overrides config file)
    #[arg(short, long, global = true)]
    pub bus_root: Option<PathBuf>,

    /// Output format (overrides config file)
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Don't load config file
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Config file path (default: ~/.config/w1therm/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Don't verify kernel module support before accessing sensors
    #[arg(long, global = true)]
    pub skip_module_check: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty table output
    Table,
    /// JSON output
    Json,
}

impl From<&OutputFormat> for crate::format::OutputFormat {
    fn from(format: &OutputFormat) -> Self {
        match format {
            OutputFormat::Table => crate::format::OutputFormat::Table,
            OutputFormat::Json => crate::format::OutputFormat::Json,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List attached sensors
    List,

    /// Read the temperature of a sensor
    Read {
        /// Sensor ID (e.g. 000005e2fdc3); defaults to the first attached sensor
        #[arg(conflicts_with = "all")]
        id: Option<String>,

        /// Read every attached sensor
        #[arg(short, long)]
        all: bool,
    },

    /// Check that the required kernel modules are loaded
    Check,

    /// Load the required kernel modules (needs root)
    Load,

    /// Show CLI configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,

    /// Show configuration file path
    Path,
}
