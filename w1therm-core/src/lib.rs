//! w1therm Core Library
//!
//! Shared types, models, and utilities for reading DS18B20 temperature
//! sensors through the kernel one-wire driver. This crate is used by both the
//! hardware crate and the CLI.

pub mod api;
pub mod config;
pub mod error;
pub mod family;
pub mod types;

// Re-export commonly used types
pub use config::{default_config_path, AliasData, StaticConfig, DEFAULT_BUS_ROOT};
pub use error::*;
pub use family::*;
pub use types::*;
