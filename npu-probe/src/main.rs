//! npu-probe - Device NPU capability checker
//!
//! Provides:
//! - Half-pixel ResizeBilinear support check (driver version, then board + base version)
//! - NPU presence check by SoC name
//! - Property report and per-path explanation

mod config;
mod report;

use crate::config::{ProbeConfig, PropertiesConfig};
use crate::report::Report;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use libdevprop::{
    FileProperties, LayeredProperties, MemoryProperties, PropertyCache, SystemProperties,
};
use npu_gate::{DeviceProperties, Gate};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// npu-probe - Device NPU capability checker
#[derive(Parser, Debug)]
#[command(name = "npu-probe", version, about)]
struct Args {
    /// Configuration file
    #[arg(short, long, default_value = "/data/local/tmp/npu-probe.yaml")]
    config: PathBuf,

    /// Property dump (build.prop format) consulted before the property service
    #[arg(short, long)]
    props: Option<PathBuf>,

    /// Property override, KEY=VALUE (repeatable)
    #[arg(short = 's', long = "set", value_name = "KEY=VALUE", value_parser = parse_override)]
    overrides: Vec<(String, String)>,

    /// Do not query the platform property service
    #[arg(long)]
    no_system: bool,

    /// Debug mode
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, Default)]
enum Commands {
    /// Check for hardware half-pixel ResizeBilinear (default)
    #[default]
    Check,

    /// Check whether the SoC has an NPU
    Npu,

    /// Show the device properties
    Info,

    /// Show how each path decided
    Explain {
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },
}

fn parse_override(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got {:?}", s)),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = ProbeConfig::load(&args.config)?;

    let filter = if args.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!("npu-probe v{} starting", env!("CARGO_PKG_VERSION"));

    let props = read_properties(&args, &config.properties)?;
    let gate = Gate::new(&config.gate);

    match args.command.unwrap_or_default() {
        Commands::Check => {
            let supported = gate.supports_half_pixel(&props);
            info!("Half-pixel ResizeBilinear supported: {}", supported);
            println!("{}", report::half_pixel_line(supported));
        }

        Commands::Npu => {
            println!("{}", report::npu_line(gate.contains_npu(&props)));
        }

        Commands::Info => {
            for line in report::info_lines(&props) {
                println!("{}", line);
            }
        }

        Commands::Explain { json } => {
            let report = Report::new(&gate, &props);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report);
            }
        }
    }

    Ok(())
}

/// Read the device properties from the configured sources.
///
/// Without overrides or a dump this goes through the process-wide system
/// cache; otherwise a layered source is built: overrides, then the dump,
/// then the property service.
fn read_properties(args: &Args, config: &PropertiesConfig) -> Result<DeviceProperties> {
    let use_system = config.system && !args.no_system;

    let mut overrides: MemoryProperties = config.overrides.clone().into_iter().collect();
    for (key, value) in &args.overrides {
        overrides.set(key.clone(), value.clone());
    }

    let dump = args.props.as_ref().or(config.dump.as_ref());

    if use_system && overrides.is_empty() && dump.is_none() {
        return Ok(DeviceProperties::from_cache(PropertyCache::system()));
    }

    let mut layered = LayeredProperties::new();
    if !overrides.is_empty() {
        layered = layered.push(overrides);
    }
    if let Some(path) = dump {
        let file = FileProperties::load(path)
            .with_context(|| format!("Failed to load property dump {}", path.display()))?;
        layered = layered.push(file);
    }
    if use_system {
        layered = layered.push(SystemProperties);
    }
    debug!("Reading properties from {} source(s)", layered.len());

    Ok(DeviceProperties::from_cache(&PropertyCache::new(layered)))
}
