//! Command-line argument structures.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use wavg_calculator::AccumulationPolicy;

/// Weighted-average filtering and sharded aggregation over JSON documents
#[derive(Parser, Debug)]
#[command(name = "wavg")]
#[command(version, long_about = None)]
pub struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Scan configuration file (TOML)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run init/map/combine on every shard and reduce to one weighted average
    Aggregate {
        #[command(flatten)]
        script: ScriptArgs,

        /// Override the configured shard count
        #[arg(long)]
        shards: Option<usize>,

        /// Accumulation policy (document_mean or weighted_sum)
        #[arg(long)]
        policy: Option<AccumulationPolicy>,
    },

    /// List the documents whose weighted average falls in [gte, lte]
    Filter {
        #[command(flatten)]
        script: ScriptArgs,

        /// Inclusive lower bound
        #[arg(long, allow_hyphen_values = true)]
        gte: Option<f64>,

        /// Inclusive upper bound
        #[arg(long, allow_hyphen_values = true)]
        lte: Option<f64>,
    },

    /// List registered script names
    Scripts,
}

/// Arguments shared by every script-running subcommand.
#[derive(Args, Debug, Clone)]
pub struct ScriptArgs {
    /// JSON array of documents
    #[arg(long, value_name = "FILE")]
    pub docs: PathBuf,

    /// JSON request file: { "script": ..., "params": { ... } }
    #[arg(long, value_name = "FILE", conflicts_with_all = ["fields", "weights"])]
    pub request: Option<PathBuf>,

    /// Fields to average, in order
    #[arg(long, value_delimiter = ',')]
    pub fields: Vec<String>,

    /// One weight per field
    #[arg(long, value_delimiter = ',')]
    pub weights: Option<Vec<f64>>,
}
