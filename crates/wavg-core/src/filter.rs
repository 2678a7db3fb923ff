//! Range filtering of a collection with the `weighted_avg_range` script.

use crate::config::ScanConfig;
use crate::document::{Collection, Document, DocumentId};
use crate::error::{WavgError, WavgResult};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, instrument};
use wavg_calculator::{RangePredicate, ScriptRegistry};
use wavg_types::Params;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterReport {
    /// Ids of matching documents, in collection order
    pub matching: Vec<DocumentId>,
    pub evaluated: usize,
}

impl FilterReport {
    pub fn hits(&self) -> usize {
        self.matching.len()
    }
}

/// Evaluates the range predicate against every document independently.
#[instrument(skip(collection, registry, params, config), fields(documents = collection.len()))]
pub fn run_filter(
    collection: &Collection,
    registry: &ScriptRegistry,
    params: &Params,
    config: &ScanConfig,
) -> WavgResult<FilterReport> {
    config.validate()?;

    let predicate = registry
        .create(RangePredicate::SCRIPT_NAME, params)?
        .into_filter(RangePredicate::SCRIPT_NAME)?;

    let test = |document: &Document| {
        predicate.matches(&collection.view(document)).then_some(document.id)
    };

    let documents = collection.documents();
    let matching: Vec<DocumentId> = if documents.len() < config.parallel_threshold {
        documents.iter().filter_map(test).collect()
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.max_workers)
            .build()
            .map_err(|e| WavgError::Internal { message: format!("worker pool: {e}") })?;
        pool.install(|| documents.par_iter().filter_map(test).collect())
    };

    let range = predicate.range();
    info!(hits = matching.len(), gte = range.gte, lte = range.lte, "Filter completed");

    Ok(FilterReport { matching, evaluated: documents.len() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wavg_calculator::ScriptError;
    use wavg_types::ParamValue;

    fn params(gte: f64, lte: f64) -> Params {
        [
            ("fields".to_string(), ParamValue::from(vec!["v"])),
            ("gte".to_string(), ParamValue::Float(gte)),
            ("lte".to_string(), ParamValue::Float(lte)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn matching_ids_keep_collection_order() {
        let collection = Collection::new(
            (0..6u64).map(|id| Document::new(id).with_field("v", id as f64)).collect(),
        );
        let report =
            run_filter(&collection, &ScriptRegistry::new(), &params(2.0, 4.0), &ScanConfig::default())
                .unwrap();
        assert_eq!(report.matching, vec![2, 3, 4]);
        assert_eq!(report.evaluated, 6);
    }

    #[test]
    fn missing_bounds_fail_the_request() {
        let mut p = params(0.0, 1.0);
        p.remove("lte");
        let err = run_filter(&Collection::default(), &ScriptRegistry::new(), &p, &ScanConfig::default())
            .unwrap_err();
        assert!(matches!(err, WavgError::Script(ScriptError::MissingParameter { .. })));
    }

    #[test]
    fn empty_collection_has_no_hits() {
        let report =
            run_filter(&Collection::default(), &ScriptRegistry::new(), &params(0.0, 1.0), &ScanConfig::default())
                .unwrap();
        assert_eq!(report.hits(), 0);
        assert_eq!(report.evaluated, 0);
    }
}
