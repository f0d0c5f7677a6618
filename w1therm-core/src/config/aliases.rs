//! Sensor alias data
//!
//! Stored in the `[aliases]` table of `config.toml`:
//!
//! ```toml
//! [aliases]
//! 000005e2fdc3 = "Living room"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::SensorId;

/// Maps sensor IDs to human-readable names.
///
/// Keys are validated sensor IDs; an invalid key fails deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AliasData {
    aliases: BTreeMap<SensorId, String>,
}

impl AliasData {
    /// Get the alias for a sensor, if one is set.
    pub fn get(&self, id: &SensorId) -> Option<&str> {
        self.aliases.get(id).map(String::as_str)
    }

    /// Whether no aliases are configured.
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// Iterate over `(id, alias)` pairs in ID order.
    pub fn iter(&self) -> impl Iterator<Item = (&SensorId, &str)> {
        self.aliases.iter().map(|(id, alias)| (id, alias.as_str()))
    }
}
