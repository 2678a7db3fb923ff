//! Script variants and the constructors the registry dispatches to.

use crate::aggregation::DocumentMapper;
use crate::error::{ScriptError, ScriptResult};
use crate::inputs::ScriptInputs;
use crate::range::RangePredicate;
use wavg_types::Params;

/// Builds a fresh script instance from one request's parameters.
pub type ScriptConstructor = fn(&ScriptInputs<'_>) -> ScriptResult<Script>;

/// A script instance produced by the registry.
///
/// Init, combine and reduce take no parameters; their behavior lives in
/// [`AggregationAccumulator`](crate::AggregationAccumulator) and [`reduce`](crate::reduce).
#[derive(Debug, Clone, PartialEq)]
pub enum Script {
    Filter(RangePredicate),
    Init,
    Map(DocumentMapper),
    Combine,
    Reduce,
}

impl Script {
    pub fn kind(&self) -> &'static str {
        match self {
            Script::Filter(_) => "filter",
            Script::Init => "init",
            Script::Map(_) => "map",
            Script::Combine => "combine",
            Script::Reduce => "reduce",
        }
    }

    pub fn into_filter(self, name: &str) -> ScriptResult<RangePredicate> {
        match self {
            Script::Filter(predicate) => Ok(predicate),
            other => Err(other.wrong_kind(name, "filter")),
        }
    }

    pub fn into_mapper(self, name: &str) -> ScriptResult<DocumentMapper> {
        match self {
            Script::Map(mapper) => Ok(mapper),
            other => Err(other.wrong_kind(name, "map")),
        }
    }

    fn wrong_kind(&self, name: &str, expected: &'static str) -> ScriptError {
        ScriptError::WrongKind { name: name.to_string(), expected, actual: self.kind() }
    }
}

pub(crate) fn filter(inputs: &ScriptInputs<'_>) -> ScriptResult<Script> {
    RangePredicate::from_inputs(inputs).map(Script::Filter)
}

pub(crate) fn init(_: &ScriptInputs<'_>) -> ScriptResult<Script> {
    Ok(Script::Init)
}

pub(crate) fn map(inputs: &ScriptInputs<'_>) -> ScriptResult<Script> {
    DocumentMapper::from_inputs(inputs).map(Script::Map)
}

pub(crate) fn combine(_: &ScriptInputs<'_>) -> ScriptResult<Script> {
    Ok(Script::Combine)
}

pub(crate) fn reduce(_: &ScriptInputs<'_>) -> ScriptResult<Script> {
    Ok(Script::Reduce)
}

/// Builds `constructor`'s script for `params`, naming errors after `name`.
pub fn construct(name: &str, constructor: ScriptConstructor, params: &Params) -> ScriptResult<Script> {
    constructor(&ScriptInputs::new(name, params))
}
