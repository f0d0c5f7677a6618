//! w1therm CLI
//!
//! Command-line interface for reading DS18B20 sensors on the one-wire bus.

use anyhow::Result;
use clap::Parser;
use w1therm_hardware::KernelModules;
use w1thermctl::cli::{
    ensure_support, generate_completion, handle_check, handle_config, handle_list, handle_load,
    handle_read, Cli, Commands, OutputFormat,
};
use w1thermctl::config::CliConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = CliConfig::resolve_path(cli.config.as_deref());

    // Build configuration using priority chain: defaults → file → env → CLI args
    let mut builder = CliConfig::builder();

    // Load config file (unless --no-config is specified)
    if !cli.no_config {
        builder = match builder.with_config_file(&config_path) {
            Ok(builder) => builder,
            Err(e) => {
                eprintln!("Configuration error: {:#}", e);
                std::process::exit(1);
            }
        };
    }

    // Apply environment variable overrides
    builder = builder.with_env_overrides();

    // Apply CLI argument overrides (highest priority)
    if let Some(ref bus_root) = cli.bus_root {
        builder = builder.with_bus_root(bus_root)?;
    }
    if let Some(ref format) = cli.format {
        let format_str = match format {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
        };
        builder = builder.with_output_format(format_str)?;
    }
    if cli.verbose {
        builder = builder.with_verbose(true);
    }
    if cli.skip_module_check {
        builder = builder.with_check_modules(false);
    }

    // Build final configuration with validation
    let config = match builder.build() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(config.verbose);
    tracing::debug!("Configuration file: {}", config_path.display());
    tracing::debug!("Bus root: {}", config.bus_root.display());

    let output_format = match config.output_format.as_str() {
        "json" => OutputFormat::Json,
        _ => OutputFormat::Table,
    };

    let provider = KernelModules::new();

    // Execute commands
    let result = match cli.command {
        Commands::List => ensure_support(&provider, &config)
            .and_then(|_| handle_list(&config, &output_format)),
        Commands::Read { id, all } => ensure_support(&provider, &config)
            .and_then(|_| handle_read(&config, id, all, &output_format)),
        Commands::Check => handle_check(&provider, &output_format),
        Commands::Load => handle_load(&provider),
        Commands::Config { command } => {
            handle_config(command, &config, &config_path, &output_format)
        }
        Commands::Completion { shell } => {
            generate_completion(shell);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        if config.verbose {
            eprintln!("Error details: {:?}", e);
        }
        std::process::exit(1);
    }

    Ok(())
}

/// Logs go to stderr so table and JSON output on stdout stay clean
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Filter used when `RUST_LOG` is not set
fn default_log_level(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "warn"
    }
}
