//! The weighted average over a document's fields.
//!
//! A field without a value is not applicable to the document: it is skipped, and adds
//! neither to the weighted sum nor to the total weight. A document where no field
//! contributed has no weighted average at all (`None`), which is different from an
//! average of zero.

use crate::FieldResolver;
use crate::error::{ScriptError, ScriptResult};
use crate::inputs::ScriptInputs;

/// Running totals of one weighted-average evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WeightedTotals {
    /// `Σ value_i * weight_i` over contributing fields
    pub sum: f64,
    /// `Σ weight_i` over contributing fields
    pub weight: f64,
}

impl WeightedTotals {
    /// Adds one present field value with its weight.
    pub fn add(&mut self, value: f64, weight: f64) {
        self.sum += value * weight;
        self.weight += weight;
    }

    /// `sum / weight`, or `None` when nothing contributed.
    pub fn average(&self) -> Option<f64> {
        if self.weight == 0.0 { None } else { Some(self.sum / self.weight) }
    }
}

/// Computes the weighted average of `fields` for one document.
///
/// Each field defaults to weight `1.0` when `weights` is `None`. When present, `weights`
/// must have one entry per field; constructors validate this once per request through
/// [`FieldWeightSpec::new`], so it is only checked in debug builds here.
pub fn weighted_average<R>(values: &R, fields: &[String], weights: Option<&[f64]>) -> Option<f64>
where
    R: FieldResolver + ?Sized,
{
    debug_assert!(weights.is_none_or(|w| w.len() == fields.len()));

    let mut totals = WeightedTotals::default();
    for (i, field) in fields.iter().enumerate() {
        if let Some(value) = values.resolve(field) {
            let weight = weights.and_then(|w| w.get(i).copied()).unwrap_or(1.0);
            totals.add(value, weight);
        }
    }
    totals.average()
}

/// Ordered `(field, weight)` pairs for one request.
///
/// Immutable once built and cheap to share between the documents of a request.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldWeightSpec {
    fields: Vec<String>,
    weights: Vec<f64>,
}

impl FieldWeightSpec {
    /// Pairs `fields` with `weights`, or with `1.0` each when `weights` is `None`.
    pub fn new(fields: Vec<String>, weights: Option<Vec<f64>>) -> ScriptResult<Self> {
        let weights = match weights {
            Some(weights) if weights.len() != fields.len() => {
                return Err(ScriptError::LengthMismatch {
                    fields: fields.len(),
                    weights: weights.len(),
                });
            }
            Some(weights) => weights,
            None => vec![1.0; fields.len()],
        };
        Ok(Self { fields, weights })
    }

    /// Every field with weight `1.0`.
    pub fn unweighted<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        let weights = vec![1.0; fields.len()];
        Self { fields, weights }
    }

    /// Reads `fields` (required) and `weights` (optional) from the parameter bag.
    pub fn from_inputs(inputs: &ScriptInputs<'_>) -> ScriptResult<Self> {
        let fields = inputs.get_string_list("fields")?;
        let weights = inputs.get_optional_f64_list("weights")?;
        Self::new(fields, weights)
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates `(field, weight)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.fields.iter().map(String::as_str).zip(self.weights.iter().copied())
    }

    /// Weighted sum and total weight of the fields present in `doc`.
    pub fn totals<R: FieldResolver + ?Sized>(&self, doc: &R) -> WeightedTotals {
        let mut totals = WeightedTotals::default();
        for (field, weight) in self.iter() {
            if let Some(value) = doc.resolve(field) {
                totals.add(value, weight);
            }
        }
        totals
    }

    /// The document's weighted average, `None` when no field contributed.
    pub fn weighted_average<R: FieldResolver + ?Sized>(&self, doc: &R) -> Option<f64> {
        self.totals(doc).average()
    }
}
