#![deny(warnings)]
#![allow(missing_docs)]
//! Reference host for the weighted-average scripts.
//!
//! This crate plays the part a search engine plays in production: it holds a document
//! collection, partitions it into shards, builds scripts from the registry once per
//! request, runs the shard-local phases (in parallel when the collection is large) and
//! reduces the shards' partial results into one value.

use tracing::{debug, instrument};

/// Sharded four-phase aggregation requests
pub mod aggregation;
/// Scan configuration loading and validation
pub mod config;
/// Documents, schema and collection loading
pub mod document;
/// Host error types
pub mod error;
/// Range filter requests
pub mod filter;
/// Shard partitioning and shard-local execution
pub mod shard;

pub use aggregation::{AggregationReport, run_aggregation};
pub use config::ScanConfig;
pub use document::{Collection, Document, DocumentId, DocumentView, Schema};
pub use error::{ErrorSeverity, WavgError, WavgResult};
pub use filter::{FilterReport, run_filter};
pub use shard::{ShardOutcome, partition, run_shard};

// Re-export the script surface so hosts only need this crate
pub use wavg_calculator::{AccumulationPolicy, ScriptRegistry};
pub use wavg_types::{ParamValue, Params};

/// Initialize the host components
#[instrument]
pub fn init() -> WavgResult<ScriptRegistry> {
    let registry = ScriptRegistry::new();
    debug!(scripts = ?registry.names(), "Script registry ready");
    Ok(registry)
}
