//! Four-phase weighted-average aggregation over a sharded document collection.
//!
//! ```text
//! shard 0:  init ─ map(doc) … map(doc) ─ combine ─┐
//! shard 1:  init ─ map(doc) … map(doc) ─ combine ─┼─ reduce ─ Option<f64>
//! shard n:  init ─ map(doc) … map(doc) ─ combine ─┘
//! ```
//!
//! Each shard owns its [`AggregationAccumulator`] for the duration of one request, so
//! shards run independently. Combine emits a [`PartialResult`] that carries the running
//! sum and count, never a shard-level average, and reduce adds those pairs before the
//! single final division. Both accumulation policies are plain sums over documents,
//! which makes the reduced value independent of shard order and of how documents were
//! partitioned.

use crate::FieldResolver;
use crate::error::{ScriptError, ScriptResult};
use crate::formula::FieldWeightSpec;
use crate::inputs::ScriptInputs;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the map phase folds a document into the shard accumulator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccumulationPolicy {
    /// `sum += avg(doc)`, `count += 1`: the mean of per-document weighted averages.
    #[default]
    DocumentMean,
    /// `sum += Σ v·w`, `count += Σ w`: one weighted average over every field observation.
    WeightedSum,
}

impl AccumulationPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccumulationPolicy::DocumentMean => "document_mean",
            AccumulationPolicy::WeightedSum => "weighted_sum",
        }
    }

    /// Reads the optional `policy` parameter.
    pub fn from_inputs(inputs: &ScriptInputs<'_>) -> ScriptResult<Self> {
        match inputs.get_optional_string("policy")? {
            Some(name) => name.parse(),
            None => Ok(Self::default()),
        }
    }
}

impl FromStr for AccumulationPolicy {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "document_mean" => Ok(AccumulationPolicy::DocumentMean),
            "weighted_sum" => Ok(AccumulationPolicy::WeightedSum),
            other => Err(ScriptError::UnknownPolicy(other.to_string())),
        }
    }
}

impl fmt::Display for AccumulationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-shard running totals.
///
/// `count` is a float so that the weighted-sum policy can store total weight in it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregationAccumulator {
    pub sum: f64,
    pub count: f64,
}

impl AggregationAccumulator {
    /// Init phase: a fresh, zeroed accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Combine phase: emits the shard's partial result without consuming the totals.
    pub fn combine(&self) -> PartialResult {
        PartialResult::new(self.sum, self.count)
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0.0
    }
}

/// `(sum, count)` exchanged between a shard and the reducer.
///
/// Serializes as the two-element array `[sum, count]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialResult(pub f64, pub f64);

impl PartialResult {
    pub fn new(sum: f64, count: f64) -> Self {
        Self(sum, count)
    }

    pub fn sum(&self) -> f64 {
        self.0
    }

    pub fn count(&self) -> f64 {
        self.1
    }

    /// Adds another partial result; associative and commutative.
    pub fn merge(self, other: PartialResult) -> PartialResult {
        PartialResult(self.0 + other.0, self.1 + other.1)
    }

    /// `sum / count`, or `None` when nothing was counted.
    pub fn value(&self) -> Option<f64> {
        if self.1 == 0.0 { None } else { Some(self.0 / self.1) }
    }
}

/// Map phase: folds documents into a shard accumulator.
///
/// Built once per shard from the request parameters and shared read-only by every
/// document of that shard.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentMapper {
    spec: FieldWeightSpec,
    policy: AccumulationPolicy,
}

impl DocumentMapper {
    pub fn new(spec: FieldWeightSpec, policy: AccumulationPolicy) -> Self {
        Self { spec, policy }
    }

    /// Builds the mapper from `fields`, `weights` and `policy`.
    pub fn from_inputs(inputs: &ScriptInputs<'_>) -> ScriptResult<Self> {
        let spec = FieldWeightSpec::from_inputs(inputs)?;
        let policy = AccumulationPolicy::from_inputs(inputs)?;
        Ok(Self::new(spec, policy))
    }

    pub fn spec(&self) -> &FieldWeightSpec {
        &self.spec
    }

    pub fn policy(&self) -> AccumulationPolicy {
        self.policy
    }

    /// Adds one document; a document with no contributing field leaves `acc` untouched.
    ///
    /// Returns whether the document contributed.
    pub fn map<R: FieldResolver + ?Sized>(&self, acc: &mut AggregationAccumulator, doc: &R) -> bool {
        let totals = self.spec.totals(doc);
        let Some(avg) = totals.average() else {
            return false;
        };

        match self.policy {
            AccumulationPolicy::DocumentMean => {
                acc.sum += avg;
                acc.count += 1.0;
            }
            AccumulationPolicy::WeightedSum => {
                acc.sum += totals.sum;
                acc.count += totals.weight;
            }
        }
        true
    }
}

/// Reduce phase: merges every shard's partial result into the final value.
///
/// Absent entries (shards that produced nothing) are skipped rather than counted as
/// zero. Returns `None` for an empty input or when no document contributed anywhere.
pub fn reduce<I>(partials: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<PartialResult>>,
{
    partials
        .into_iter()
        .flatten()
        .fold(PartialResult::default(), PartialResult::merge)
        .value()
}
