//! Subcommand implementations.
//!
//! Each command works on an already loaded collection and request, and returns the JSON
//! it prints, so the binary only does file loading and printing.

use crate::request::Request;
use anyhow::{Result, bail};
use serde_json::{Value, json};
use tracing::info;
use wavg_calculator::{COMBINE_SCRIPT, INIT_SCRIPT, MAP_SCRIPT, REDUCE_SCRIPT, RangePredicate};
use wavg_core::{
    AggregationReport, Collection, FilterReport, ScanConfig, ScriptRegistry, run_aggregation,
    run_filter,
};

const AGGREGATION_SCRIPTS: [&str; 4] = [INIT_SCRIPT, MAP_SCRIPT, COMBINE_SCRIPT, REDUCE_SCRIPT];

/// Runs the four aggregation phases over the collection.
pub fn aggregate(
    collection: &Collection,
    registry: &ScriptRegistry,
    request: &Request,
    config: &ScanConfig,
) -> Result<AggregationReport> {
    if let Some(script) = request.script.as_deref() {
        if !AGGREGATION_SCRIPTS.contains(&script) {
            bail!("'{script}' is not an aggregation script");
        }
    }
    Ok(run_aggregation(collection, registry, &request.params, config)?)
}

/// Runs the range filter over the collection.
pub fn filter(
    collection: &Collection,
    registry: &ScriptRegistry,
    request: &Request,
    config: &ScanConfig,
) -> Result<FilterReport> {
    if let Some(script) = request.script.as_deref() {
        if script != RangePredicate::SCRIPT_NAME {
            bail!("'{script}' is not a filter script");
        }
    }
    Ok(run_filter(collection, registry, &request.params, config)?)
}

pub fn scripts(registry: &ScriptRegistry) -> Value {
    json!(registry.names())
}

/// The reduced value, or `null` when no document contributed.
pub fn render_aggregation(report: &AggregationReport) -> Value {
    info!(
        documents = report.documents,
        documents_contributed = report.documents_contributed,
        shards = report.shards.len(),
        "Aggregation report"
    );
    json!(report.value)
}

pub fn render_filter(report: &FilterReport) -> Value {
    json!({ "matching": report.matching, "hits": report.hits() })
}
