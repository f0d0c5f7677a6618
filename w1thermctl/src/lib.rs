//! w1therm CLI Library
//!
//! Command definitions, configuration layering and output formatting for
//! the `w1thermctl` tool. Sensor access itself lives in `w1therm-hardware`.
//!
//! ```no_run
//! use w1thermctl::config::CliConfig;
//! use w1therm_hardware::Locator;
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = CliConfig::builder().with_env_overrides().build()?;
//! let handle = Locator::new(&config.bus_root).open(None)?;
//! println!("{}", handle.read_temperature()?);
//! # Ok(())
//! # }
//! ```

// Internal CLI implementation - not part of public API
#[doc(hidden)]
pub mod cli;

/// Configuration types for the CLI tool.
pub mod config;

// Internal formatting functions - not part of public API
#[doc(hidden)]
pub mod format;
