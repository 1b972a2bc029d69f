use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use playback_host::logging::init_logging;
use playback_host::{BackendKind, EngineHandles, HostConfig, HostModule};
use serde_json::{json, Value};

#[derive(Parser, Debug)]
#[command(
    name = "playback_probe",
    about = "Inspect sound backends and output devices through the playback host"
)]
struct Cli {
    /// Host configuration file (defaults to $PLAYBACK_HOST_CONFIG, then assets/host_config.json)
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the engine version
    Version,
    /// Try every backend kind and report which ones connect
    Backends,
    /// Connect and list output devices
    Devices {
        /// Backend name (jack, pulseaudio, alsa, coreaudio, wasapi, dummy); auto-select if omitted
        #[arg(long)]
        backend: Option<String>,
    },
    /// Print the numeric constants exposed to hosts
    Constants,
    /// Invoke an entry point with JSON arguments
    Call {
        method: String,
        /// Each argument is parsed as a JSON value
        args: Vec<String>,
    },
}

fn main() -> ExitCode {
    init_logging();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => HostConfig::load_from_file(path),
        None => HostConfig::load(),
    };

    let handles = EngineHandles::initialize(&config).context("initializing engine handles")?;
    let module = HostModule::new(handles, &[])?;

    let result = dispatch(&module, cli.command);
    module.finalizer().finalize();

    let value = result?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn dispatch(module: &HostModule, command: Commands) -> Result<Value> {
    match command {
        Commands::Version => Ok(module.call("getVersion", &[])?),
        Commands::Backends => run_backends(module),
        Commands::Devices { backend } => run_devices(module, backend.as_deref()),
        Commands::Constants => Ok(module.surface().constants_json()),
        Commands::Call { method, args } => {
            let args = args
                .iter()
                .map(|arg| {
                    serde_json::from_str(arg)
                        .with_context(|| format!("argument {:?} is not valid JSON", arg))
                })
                .collect::<Result<Vec<Value>>>()?;
            tracing::debug!(method = %method, count = args.len(), "invoking entry point");
            module
                .call(&method, &args)
                .with_context(|| format!("calling {}", method))
        }
    }
}

fn run_backends(module: &HostModule) -> Result<Value> {
    let report = BackendKind::ALL
        .into_iter()
        .map(|kind| {
            let outcome = module.call("connectSoundBackend", &[json!(kind.raw())]);
            let entry = json!({
                "id": kind.raw(),
                "name": kind.name(),
                "available": outcome.is_ok(),
                "error": outcome.err().map(|err| err.to_string()),
            });
            module.call("disconnectSoundBackend", &[])?;
            Ok(entry)
        })
        .collect::<Result<Vec<Value>>>()?;
    Ok(Value::Array(report))
}

fn run_devices(module: &HostModule, backend: Option<&str>) -> Result<Value> {
    let args = match backend {
        Some(name) => {
            let kind = BackendKind::parse(name)
                .ok_or_else(|| anyhow!("unknown backend {:?}", name))?;
            vec![json!(kind.raw())]
        }
        None => Vec::new(),
    };

    module
        .call("connectSoundBackend", &args)
        .context("connecting sound backend")?;
    let devices = module.call("getDevices", &[])?;
    tracing::info!(
        count = devices["list"].as_array().map(Vec::len).unwrap_or_default(),
        "listed output devices"
    );
    Ok(devices)
}
