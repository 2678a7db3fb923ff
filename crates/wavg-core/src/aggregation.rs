//! Drives a weighted-average aggregation request across every shard of a collection.
//!
//! Scripts are built from the registry once per request, shards run init/map/combine
//! independently (in parallel above `parallel_threshold`), and reduce runs once after
//! every shard has reported.

use crate::config::ScanConfig;
use crate::document::{Collection, Document};
use crate::error::{WavgError, WavgResult};
use crate::shard::{ShardOutcome, partition, run_shard};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, instrument};
use wavg_calculator::{
    AccumulationPolicy, COMBINE_SCRIPT, INIT_SCRIPT, MAP_SCRIPT, REDUCE_SCRIPT, ScriptRegistry,
    reduce,
};
use wavg_types::{ParamValue, Params};

/// Result of one aggregation request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationReport {
    /// The reduced weighted average; `None` when no document contributed
    pub value: Option<f64>,
    pub policy: AccumulationPolicy,
    pub documents: usize,
    pub documents_contributed: usize,
    pub shards: Vec<ShardOutcome>,
}

/// Runs the four phases over `collection` and returns the reduced value.
#[instrument(skip(collection, registry, params, config), fields(documents = collection.len()))]
pub fn run_aggregation(
    collection: &Collection,
    registry: &ScriptRegistry,
    params: &Params,
    config: &ScanConfig,
) -> WavgResult<AggregationReport> {
    config.validate()?;

    let mut params = params.clone();
    params
        .entry("policy".to_string())
        .or_insert_with(|| ParamValue::from(config.default_policy.as_str()));

    // Every phase is resolved before any document is touched so a bad request fails fast.
    registry.create(INIT_SCRIPT, &params)?;
    let mapper = registry.create(MAP_SCRIPT, &params)?.into_mapper(MAP_SCRIPT)?;
    registry.create(COMBINE_SCRIPT, &params)?;
    registry.create(REDUCE_SCRIPT, &params)?;

    let shards = partition(collection.documents(), config.shard_count);
    let run = |(shard_id, documents): (usize, &Vec<&Document>)| {
        run_shard(shard_id, collection, documents, &mapper)
    };

    let outcomes: Vec<ShardOutcome> = if collection.len() < config.parallel_threshold {
        shards.iter().enumerate().map(run).collect()
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.shard_workers())
            .build()
            .map_err(|e| WavgError::Internal { message: format!("worker pool: {e}") })?;
        pool.install(|| shards.par_iter().enumerate().map(run).collect())
    };

    let value = reduce(outcomes.iter().map(|outcome| outcome.partial));
    let documents_contributed: usize = outcomes.iter().map(|o| o.documents_contributed).sum();

    info!(
        shards = outcomes.len(),
        documents_contributed,
        policy = %mapper.policy(),
        value = ?value,
        "Aggregation completed"
    );

    Ok(AggregationReport {
        value,
        policy: mapper.policy(),
        documents: collection.len(),
        documents_contributed,
        shards: outcomes,
    })
}
