//! Output models for w1therm
//!
//! Serializable views over sensors and readings, shared by the CLI's table
//! and JSON output.

use crate::types::{SensorId, Temperature};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One attached sensor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorInfo {
    /// Sensor identifier
    pub id: SensorId,
    /// Human-readable alias, if configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Data file exposed by the driver
    pub device_path: PathBuf,
}

/// Sensors found on the bus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorListResponse {
    /// Bus root that was scanned
    pub bus_root: PathBuf,
    /// Attached sensors
    pub sensors: Vec<SensorInfo>,
}

/// A validated temperature sample from one sensor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemperatureReading {
    /// Sensor identifier
    pub id: SensorId,
    /// Human-readable alias, if configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Degrees Celsius
    pub celsius: f64,
    /// Raw driver value in thousandths of a degree
    pub millidegrees: i32,
}

impl TemperatureReading {
    /// Build a reading from a sensor identifier and its sample
    pub fn new(id: SensorId, alias: Option<String>, temperature: Temperature) -> Self {
        Self {
            id,
            alias,
            celsius: temperature.celsius(),
            millidegrees: temperature.millidegrees(),
        }
    }
}

/// Outcome of reading one sensor when several are read in a batch
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum ReadOutcome {
    #[serde(rename = "ok")]
    Ok(TemperatureReading),
    #[serde(rename = "error")]
    Error {
        id: SensorId,
        #[serde(skip_serializing_if = "Option::is_none")]
        alias: Option<String>,
        error: String,
    },
}

impl ReadOutcome {
    /// Whether the sensor produced a validated sample
    pub fn is_ok(&self) -> bool {
        matches!(self, ReadOutcome::Ok(_))
    }
}

/// Load state of one required kernel module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleStatus {
    /// Module name as passed to `modprobe`
    pub name: String,
    /// Whether the module is loaded or built in
    pub loaded: bool,
}

/// Kernel support report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportResponse {
    /// Per-module load state
    pub modules: Vec<ModuleStatus>,
}

impl SupportResponse {
    /// True when every required module is loaded
    pub fn ready(&self) -> bool {
        self.modules.iter().all(|m| m.loaded)
    }
}
