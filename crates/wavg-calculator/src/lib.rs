#![deny(warnings)]
//! Weighted-average scripts for document filtering and sharded aggregation.
//!
//! This crate provides the weighted-average formula, the range predicate built on it,
//! the four aggregation phases (init, map, combine, reduce) and the `ScriptRegistry`
//! that builds them by name from a request's parameter bag. It performs no I/O: the
//! host resolves field values through [`FieldResolver`] and drives the phases.

use std::collections::HashMap;
use wavg_types::ParamValue;

pub mod aggregation;
pub mod error;
pub mod formula;
pub mod inputs;
pub mod range;
pub mod registry;
pub mod script;

/// Resolves a field of the document being evaluated to a number.
///
/// `None` means the field does not apply to the document: it is absent, null, not
/// numeric, or not part of the collection's schema. It is never treated as zero.
pub trait FieldResolver {
    fn resolve(&self, field: &str) -> Option<f64>;
}

impl FieldResolver for HashMap<String, f64> {
    fn resolve(&self, field: &str) -> Option<f64> {
        self.get(field).copied()
    }
}

impl FieldResolver for HashMap<String, ParamValue> {
    fn resolve(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(ParamValue::as_f64)
    }
}

impl<R: FieldResolver + ?Sized> FieldResolver for &R {
    fn resolve(&self, field: &str) -> Option<f64> {
        (**self).resolve(field)
    }
}

// Re-export the script surface
pub use aggregation::{
    AccumulationPolicy, AggregationAccumulator, DocumentMapper, PartialResult, reduce,
};
pub use error::{ScriptError, ScriptResult};
pub use formula::{FieldWeightSpec, WeightedTotals, weighted_average};
pub use inputs::ScriptInputs;
pub use range::{RangePredicate, RangeSpec};
pub use registry::{COMBINE_SCRIPT, INIT_SCRIPT, MAP_SCRIPT, REDUCE_SCRIPT, ScriptRegistry};
pub use script::{Script, ScriptConstructor};
