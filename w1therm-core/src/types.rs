//! Core types and data structures for w1therm

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::W1ThermError;

/// Sensor identifier: the serial part of a device directory name
///
/// For the directory `28-000005e2fdc3` the identifier is `000005e2fdc3`.
/// Identifiers are lowercase hex, which also keeps them from carrying path
/// separators.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SensorId(String);

impl SensorId {
    /// Create a validated sensor identifier
    ///
    /// # Examples
    ///
    /// ```
    /// use w1therm_core::SensorId;
    ///
    /// assert!(SensorId::new("000005E2FDC3").is_ok());
    /// assert!(SensorId::new("").is_err());
    /// assert!(SensorId::new("../etc").is_err());
    /// ```
    pub fn new(id: impl AsRef<str>) -> Result<Self, W1ThermError> {
        let id = id.as_ref().trim();

        if id.is_empty() {
            return Err(W1ThermError::InvalidSensorId(
                "sensor ID cannot be empty".to_string(),
            ));
        }

        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(W1ThermError::InvalidSensorId(format!(
                "'{}' is not a hexadecimal serial",
                id
            )));
        }

        Ok(Self(id.to_ascii_lowercase()))
    }

    /// Identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SensorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SensorId {
    type Err = W1ThermError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for SensorId {
    type Error = W1ThermError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SensorId> for String {
    fn from(id: SensorId) -> Self {
        id.0
    }
}

/// A temperature sample in degrees Celsius
///
/// Built from the driver's milli-degree integer. No range is enforced here;
/// the sensor's own range applies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Temperature {
    millidegrees: i32,
}

impl Temperature {
    /// Build from thousandths of a degree Celsius
    pub fn from_millidegrees(millidegrees: i32) -> Self {
        Self { millidegrees }
    }

    /// Value in degrees Celsius
    pub fn celsius(&self) -> f64 {
        f64::from(self.millidegrees) / 1000.0
    }

    /// Raw driver value in thousandths of a degree Celsius
    pub fn millidegrees(&self) -> i32 {
        self.millidegrees
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3} °C", self.celsius())
    }
}
