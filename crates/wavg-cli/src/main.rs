use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use wavg_cli::{Cli, Command, Request, commands};
use wavg_core::{Collection, ParamValue, ScanConfig, WavgError};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.json_logs);

    info!(version = env!("CARGO_PKG_VERSION"), "Starting wavg");

    run(cli).inspect_err(|err| {
        if let Some(wavg_error) = err.downcast_ref::<WavgError>() {
            error!(
                category = wavg_error.category(),
                severity = ?wavg_error.severity(),
                "Request failed: {wavg_error}"
            );
        }
    })
}

fn run(cli: Cli) -> Result<()> {
    let mut config = ScanConfig::load(cli.config.as_deref()).context("invalid scan configuration")?;
    let registry = wavg_core::init()?;

    let output = match cli.command {
        Command::Aggregate { script, shards, policy } => {
            if let Some(shards) = shards {
                config.shard_count = shards;
            }
            let collection = load_collection(&script.docs)?;
            let mut request = Request::load(&script)?;
            if let Some(policy) = policy {
                request.set("policy", ParamValue::from(policy.as_str()));
            }
            let report = commands::aggregate(&collection, &registry, &request, &config)?;
            commands::render_aggregation(&report)
        }
        Command::Filter { script, gte, lte } => {
            let collection = load_collection(&script.docs)?;
            let mut request = Request::load(&script)?;
            if let Some(gte) = gte {
                request.set("gte", ParamValue::Float(gte));
            }
            if let Some(lte) = lte {
                request.set("lte", ParamValue::Float(lte));
            }
            let report = commands::filter(&collection, &registry, &request, &config)?;
            commands::render_filter(&report)
        }
        Command::Scripts => commands::scripts(&registry),
    };

    println!("{output}");
    Ok(())
}

/// Structured logs go to stderr so stdout carries only the result.
fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wavg=info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_collection(path: &Path) -> Result<Collection> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read documents from {}", path.display()))?;
    Collection::from_json_str(&source).with_context(|| format!("invalid documents in {}", path.display()))
}
