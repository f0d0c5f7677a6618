//! Output formatting utilities for the CLI
//!
//! Provides table and JSON formatting with colors.

use anyhow::Result;
use colored::*;
use w1therm_core::api::{ReadOutcome, SensorListResponse, SupportResponse, TemperatureReading};

use tabled::{settings::Style, Table, Tabled};

/// Output format options
#[derive(Debug, Clone)]
pub enum OutputFormat {
    Table,
    Json,
}

fn label(id: &impl std::fmt::Display, alias: Option<&str>) -> String {
    match alias {
        Some(alias) => format!("{} ({})", alias, id),
        None => id.to_string(),
    }
}

fn celsius(value: f64) -> String {
    format!("{:.3} °C", value)
}

/// Format the list of attached sensors
pub fn format_sensor_list(list: &SensorListResponse, format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(list)?),
        OutputFormat::Table => {
            if list.sensors.is_empty() {
                return Ok(format!(
                    "{} {}",
                    "No sensors found in".yellow(),
                    list.bus_root.display()
                ));
            }

            #[derive(Tabled)]
            struct SensorRow {
                #[tabled(rename = "Sensor ID")]
                id: String,
                #[tabled(rename = "Alias")]
                alias: String,
                #[tabled(rename = "Device")]
                device: String,
            }

            let rows: Vec<SensorRow> = list
                .sensors
                .iter()
                .map(|sensor| SensorRow {
                    id: sensor.id.to_string().cyan().to_string(),
                    alias: sensor
                        .alias
                        .clone()
                        .unwrap_or_else(|| "-".dimmed().to_string()),
                    device: sensor.device_path.display().to_string(),
                })
                .collect();

            let table = Table::new(rows).with(Style::rounded()).to_string();
            Ok(format!("{}\n{}", "Attached Sensors:".bold(), table))
        }
    }
}

/// Format a single temperature reading
pub fn format_reading(reading: &TemperatureReading, format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(reading)?),
        OutputFormat::Table => Ok(format!(
            "{}: {}",
            label(&reading.id, reading.alias.as_deref()).bold(),
            celsius(reading.celsius).green()
        )),
    }
}

/// Format the results of reading several sensors
pub fn format_read_outcomes(outcomes: &[ReadOutcome], format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(outcomes)?),
        OutputFormat::Table => {
            #[derive(Tabled)]
            struct ReadingRow {
                #[tabled(rename = "Sensor")]
                sensor: String,
                #[tabled(rename = "Temperature")]
                temperature: String,
            }

            let rows: Vec<ReadingRow> = outcomes
                .iter()
                .map(|outcome| match outcome {
                    ReadOutcome::Ok(reading) => ReadingRow {
                        sensor: label(&reading.id, reading.alias.as_deref()),
                        temperature: celsius(reading.celsius).green().to_string(),
                    },
                    ReadOutcome::Error { id, alias, error } => ReadingRow {
                        sensor: label(id, alias.as_deref()),
                        temperature: error.red().to_string(),
                    },
                })
                .collect();

            let table = Table::new(rows).with(Style::rounded()).to_string();
            Ok(format!("{}\n{}", "Temperatures:".bold(), table))
        }
    }
}

/// Format the kernel support report
pub fn format_support(support: &SupportResponse, format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(support)?),
        OutputFormat::Table => {
            let mut output = String::new();
            output.push_str(&"Kernel Support:".bold().to_string());

            for module in &support.modules {
                output.push('\n');
                output.push_str(&format!(
                    "{:<12} {}",
                    module.name,
                    if module.loaded {
                        "loaded".green()
                    } else {
                        "not loaded".red()
                    }
                ));
            }

            Ok(output)
        }
    }
}

/// Format success message
pub fn format_success(message: &str) -> String {
    format!("{} {}", "✓".green().bold(), message)
}
