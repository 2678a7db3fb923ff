//! Name-to-constructor lookup for the built-in scripts.

use crate::error::{ScriptError, ScriptResult};
use crate::range::RangePredicate;
use crate::script::{self, Script, ScriptConstructor};
use std::collections::HashMap;
use tracing::debug;
use wavg_types::Params;

pub const INIT_SCRIPT: &str = "weighted_avg_init";
pub const MAP_SCRIPT: &str = "weighted_avg_map";
pub const COMBINE_SCRIPT: &str = "weighted_avg_combine";
pub const REDUCE_SCRIPT: &str = "weighted_avg_reduce";

/// Looks up scripts by name and builds a fresh instance per request.
pub struct ScriptRegistry {
    constructors: HashMap<String, ScriptConstructor>,
}

impl Default for ScriptRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptRegistry {
    /// A registry holding the range filter and the four aggregation phases.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(RangePredicate::SCRIPT_NAME, script::filter);
        registry.register(INIT_SCRIPT, script::init);
        registry.register(MAP_SCRIPT, script::map);
        registry.register(COMBINE_SCRIPT, script::combine);
        registry.register(REDUCE_SCRIPT, script::reduce);
        registry
    }

    pub fn empty() -> Self {
        Self { constructors: HashMap::new() }
    }

    /// Registers `constructor` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: &str, constructor: ScriptConstructor) {
        self.constructors.insert(name.to_string(), constructor);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Builds the script registered under `name`; parameter validation happens here,
    /// once, before any document is evaluated.
    pub fn create(&self, name: &str, params: &Params) -> ScriptResult<Script> {
        let constructor = self
            .constructors
            .get(name)
            .copied()
            .ok_or_else(|| ScriptError::UnknownScript(name.to_string()))?;

        let script = script::construct(name, constructor, params)?;
        debug!(script = name, kind = script.kind(), "Script created");
        Ok(script)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wavg_types::ParamValue;

    fn params() -> Params {
        [
            ("fields".to_string(), ParamValue::from(vec!["value1", "value2"])),
            ("weights".to_string(), ParamValue::from(vec![0.5, 1.0])),
            ("gte".to_string(), ParamValue::Integer(65)),
            ("lte".to_string(), ParamValue::Integer(100)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn builtins_are_registered() {
        let registry = ScriptRegistry::new();
        assert_eq!(
            registry.names(),
            vec![
                "weighted_avg_combine",
                "weighted_avg_init",
                "weighted_avg_map",
                "weighted_avg_range",
                "weighted_avg_reduce",
            ]
        );
    }

    #[test]
    fn each_name_builds_its_variant() {
        let registry = ScriptRegistry::new();
        let p = params();
        assert_eq!(registry.create(INIT_SCRIPT, &p).unwrap(), Script::Init);
        assert_eq!(registry.create(COMBINE_SCRIPT, &p).unwrap(), Script::Combine);
        assert_eq!(registry.create(REDUCE_SCRIPT, &p).unwrap(), Script::Reduce);
        assert_eq!(registry.create(MAP_SCRIPT, &p).unwrap().kind(), "map");
        assert_eq!(registry.create(RangePredicate::SCRIPT_NAME, &p).unwrap().kind(), "filter");
    }

    #[test]
    fn phases_without_parameters_accept_an_empty_bag() {
        let registry = ScriptRegistry::new();
        let empty = Params::new();
        assert!(registry.create(INIT_SCRIPT, &empty).is_ok());
        assert!(registry.create(REDUCE_SCRIPT, &empty).is_ok());
        assert!(matches!(
            registry.create(MAP_SCRIPT, &empty),
            Err(ScriptError::MissingParameter { .. })
        ));
    }

    #[test]
    fn unknown_names_are_errors() {
        let registry = ScriptRegistry::new();
        assert_eq!(
            registry.create("weighted_avg_median", &params()),
            Err(ScriptError::UnknownScript("weighted_avg_median".to_string()))
        );
    }

    #[test]
    fn wrong_kind_is_reported() {
        let registry = ScriptRegistry::new();
        let err = registry.create(INIT_SCRIPT, &params()).unwrap().into_mapper(INIT_SCRIPT).unwrap_err();
        assert_eq!(
            err,
            ScriptError::WrongKind { name: INIT_SCRIPT.to_string(), expected: "map", actual: "init" }
        );
    }

    #[test]
    fn custom_constructors_can_be_registered() {
        let mut registry = ScriptRegistry::empty();
        assert!(!registry.contains("noop"));
        registry.register("noop", |_| Ok(Script::Init));
        assert_eq!(registry.create("noop", &Params::new()), Ok(Script::Init));
    }
}
