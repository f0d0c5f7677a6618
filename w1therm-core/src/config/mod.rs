//! Configuration types for w1therm
//!
//! # Architecture
//!
//! - [`StaticConfig`] - bus location and behavior switches, loaded once at
//!   startup from `config.toml`
//! - [`AliasData`] - human-readable sensor names, stored in the same file
//!   under `[aliases]`

mod aliases;
mod paths;
mod static_config;

pub use aliases::AliasData;
pub use paths::default_config_path;
pub use static_config::{StaticConfig, DEFAULT_BUS_ROOT};
