//! Document filter on the weighted average: `gte <= avg <= lte`.

use crate::FieldResolver;
use crate::error::ScriptResult;
use crate::formula::FieldWeightSpec;
use crate::inputs::ScriptInputs;
use tracing::warn;

/// Closed interval `[gte, lte]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeSpec {
    pub gte: f64,
    pub lte: f64,
}

impl RangeSpec {
    pub fn new(gte: f64, lte: f64) -> Self {
        Self { gte, lte }
    }

    /// Inclusive at both ends.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.gte && value <= self.lte
    }
}

/// Tests whether a document's weighted average lies inside a [`RangeSpec`].
///
/// Parameters are validated once when the predicate is built; evaluating a document
/// never fails. A document without any usable field has no average and never matches.
#[derive(Debug, Clone, PartialEq)]
pub struct RangePredicate {
    spec: FieldWeightSpec,
    range: RangeSpec,
}

impl RangePredicate {
    pub const SCRIPT_NAME: &'static str = "weighted_avg_range";

    pub fn new(spec: FieldWeightSpec, range: RangeSpec) -> Self {
        if range.gte > range.lte {
            warn!(gte = range.gte, lte = range.lte, "Empty range, no document can match");
        }
        Self { spec, range }
    }

    /// Builds the predicate from `fields`, `weights`, `gte` and `lte`.
    pub fn from_inputs(inputs: &ScriptInputs<'_>) -> ScriptResult<Self> {
        let spec = FieldWeightSpec::from_inputs(inputs)?;
        let gte = inputs.get_f64("gte")?;
        let lte = inputs.get_f64("lte")?;
        Ok(Self::new(spec, RangeSpec::new(gte, lte)))
    }

    pub fn spec(&self) -> &FieldWeightSpec {
        &self.spec
    }

    pub fn range(&self) -> RangeSpec {
        self.range
    }

    pub fn matches<R: FieldResolver + ?Sized>(&self, doc: &R) -> bool {
        self.spec
            .weighted_average(doc)
            .is_some_and(|avg| self.range.contains(avg))
    }
}
