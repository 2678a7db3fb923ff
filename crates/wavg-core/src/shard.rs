//! Shard-local execution of the init, map and combine phases.

use crate::document::{Collection, Document};
use serde::Serialize;
use tracing::{instrument, trace};
use wavg_calculator::{AggregationAccumulator, DocumentMapper, PartialResult};

/// Routes documents to shards by id: `id % shard_count`.
pub fn partition(documents: &[Document], shard_count: usize) -> Vec<Vec<&Document>> {
    let shard_count = shard_count.max(1);
    let mut shards: Vec<Vec<&Document>> = vec![Vec::new(); shard_count];
    for document in documents {
        shards[(document.id % shard_count as u64) as usize].push(document);
    }
    shards
}

/// What one shard handed to the reducer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShardOutcome {
    pub shard_id: usize,
    /// `None` when the shard held no documents at all
    pub partial: Option<PartialResult>,
    pub documents_seen: usize,
    pub documents_contributed: usize,
}

/// Runs init, one map per document, then combine, for a single shard.
///
/// The accumulator lives only for the duration of this call.
#[instrument(skip(collection, documents, mapper), fields(documents = documents.len()))]
pub fn run_shard(
    shard_id: usize,
    collection: &Collection,
    documents: &[&Document],
    mapper: &DocumentMapper,
) -> ShardOutcome {
    if documents.is_empty() {
        return ShardOutcome { shard_id, partial: None, documents_seen: 0, documents_contributed: 0 };
    }

    let mut acc = AggregationAccumulator::new();
    let mut contributed = 0;
    for document in documents {
        if mapper.map(&mut acc, &collection.view(document)) {
            contributed += 1;
        } else {
            trace!(document_id = document.id, "Document has no usable field");
        }
    }

    let partial = acc.combine();
    trace!(sum = partial.sum(), count = partial.count(), "Shard combined");
    ShardOutcome {
        shard_id,
        partial: Some(partial),
        documents_seen: documents.len(),
        documents_contributed: contributed,
    }
}
