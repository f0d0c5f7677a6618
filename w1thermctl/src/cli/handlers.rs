//! Command execution handlers

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};
use w1therm_core::api::{
    ReadOutcome, SensorInfo, SensorListResponse, SupportResponse, TemperatureReading,
};
use w1therm_core::SensorId;
use w1therm_hardware::{Locator, SupportProvider};

use crate::config::CliConfig;
use crate::format::format_success;

use super::commands::*;

/// Fail early when the kernel driver stack is not loaded
pub fn ensure_support(provider: &impl SupportProvider, config: &CliConfig) -> Result<()> {
    if !config.check_modules {
        debug!("Kernel module check disabled");
        return Ok(());
    }

    provider
        .check_required_support()
        .context("Kernel support missing; run `w1thermctl load` as root")
}

/// Handle list command
pub fn handle_list(config: &CliConfig, format: &OutputFormat) -> Result<()> {
    let locator = Locator::new(&config.bus_root);

    let sensors = locator
        .enumerate()?
        .into_iter()
        .map(|id| SensorInfo {
            alias: config.aliases.get(&id).map(str::to_string),
            device_path: locator.device_path(&id),
            id,
        })
        .collect();

    let list = SensorListResponse {
        bus_root: config.bus_root.clone(),
        sensors,
    };

    println!("{}", crate::format::format_sensor_list(&list, &format.into())?);
    Ok(())
}

/// Handle read command
pub fn handle_read(
    config: &CliConfig,
    id: Option<String>,
    all: bool,
    format: &OutputFormat,
) -> Result<()> {
    let locator = Locator::new(&config.bus_root);

    if all {
        return handle_read_all(&locator, config, format);
    }

    let id = id.map(SensorId::new).transpose()?;
    let handle = locator.open(id.as_ref())?;
    let temperature = handle.read_temperature()?;

    // `open` always records the resolved ID
    let id = handle
        .id()
        .cloned()
        .context("Resolved sensor handle has no ID")?;
    let alias = config.aliases.get(&id).map(str::to_string);
    let reading = TemperatureReading::new(id, alias, temperature);

    println!("{}", crate::format::format_reading(&reading, &format.into())?);
    Ok(())
}

fn handle_read_all(locator: &Locator, config: &CliConfig, format: &OutputFormat) -> Result<()> {
    let ids = locator.enumerate()?;
    if ids.is_empty() {
        return Err(anyhow::anyhow!(
            "No sensors found in {}",
            locator.bus_root().display()
        ));
    }

    let outcomes: Vec<ReadOutcome> = ids
        .into_iter()
        .map(|id| {
            let alias = config.aliases.get(&id).map(str::to_string);
            match locator
                .open(Some(&id))
                .and_then(|handle| handle.read_temperature())
            {
                Ok(temperature) => ReadOutcome::Ok(TemperatureReading::new(id, alias, temperature)),
                Err(e) => ReadOutcome::Error {
                    id,
                    alias,
                    error: e.to_string(),
                },
            }
        })
        .collect();

    println!(
        "{}",
        crate::format::format_read_outcomes(&outcomes, &format.into())?
    );

    let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
    if failed > 0 {
        return Err(anyhow::anyhow!(
            "{} of {} sensors could not be read",
            failed,
            outcomes.len()
        ));
    }

    Ok(())
}

/// Handle check command
pub fn handle_check(provider: &impl SupportProvider, format: &OutputFormat) -> Result<()> {
    let support = SupportResponse {
        modules: provider.module_status()?,
    };

    println!("{}", crate::format::format_support(&support, &format.into())?);

    if !support.ready() {
        provider.check_required_support()?;
    }

    Ok(())
}

/// Handle load command
pub fn handle_load(provider: &impl SupportProvider) -> Result<()> {
    provider.load_required_support()?;
    info!("Kernel support ready");
    println!("{}", format_success("Kernel modules loaded"));
    Ok(())
}

/// Handle config commands
pub fn handle_config(
    command: ConfigCommands,
    config: &CliConfig,
    config_path: &Path,
    format: &OutputFormat,
) -> Result<()> {
    match command {
        ConfigCommands::Show => match format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(config)?);
            }
            OutputFormat::Table => {
                println!("Current Configuration:");
                println!("{:<16} {}", "Config file:", config_path.display());
                println!("{:<16} {}", "Bus root:", config.bus_root.display());
                println!("{:<16} {}", "Output format:", config.output_format);
                println!("{:<16} {}", "Verbose:", config.verbose);
                println!("{:<16} {}", "Check modules:", config.check_modules);

                if !config.aliases.is_empty() {
                    println!("Aliases:");
                    for (id, alias) in config.aliases.iter() {
                        println!("  {} = {}", id, alias);
                    }
                }
            }
        },
        ConfigCommands::Path => {
            println!("{}", config_path.display());
        }
    }

    Ok(())
}

/// Generate shell completions
pub fn generate_completion(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
}
