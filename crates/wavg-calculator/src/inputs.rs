//! Typed access to a script's loose parameter bag.

use crate::error::{ScriptError, ScriptResult};
use wavg_types::{ParamValue, Params};

/// Provides a safe interface for script constructors to read request parameters.
///
/// Every error names the script being built so a misconfigured request can be traced
/// back to the script reference that carried it.
#[derive(Debug, Clone, Copy)]
pub struct ScriptInputs<'a> {
    script: &'a str,
    params: &'a Params,
}

impl<'a> ScriptInputs<'a> {
    /// Creates a new `ScriptInputs` for the named script.
    pub fn new(script: &'a str, params: &'a Params) -> Self {
        Self { script, params }
    }

    /// Name of the script these inputs belong to.
    pub fn script(&self) -> &'a str {
        self.script
    }

    /// `Null` counts as absent, the way an omitted JSON member would.
    fn lookup(&self, name: &str) -> Option<&'a ParamValue> {
        self.params.get(name).filter(|value| !value.is_null())
    }

    fn missing(&self, name: &str) -> ScriptError {
        ScriptError::MissingParameter {
            script: self.script.to_string(),
            parameter: name.to_string(),
        }
    }

    fn invalid(&self, name: &str, expected: &str, actual: &ParamValue) -> ScriptError {
        ScriptError::InvalidParameter {
            script: self.script.to_string(),
            parameter: name.to_string(),
            expected: expected.to_string(),
            actual: actual.type_name().to_string(),
        }
    }

    /// Gets a required number, accepting integers and floats.
    pub fn get_f64(&self, name: &str) -> ScriptResult<f64> {
        let value = self.lookup(name).ok_or_else(|| self.missing(name))?;
        value.as_f64().ok_or_else(|| self.invalid(name, "a number", value))
    }

    /// Gets an optional string.
    pub fn get_optional_string(&self, name: &str) -> ScriptResult<Option<&'a str>> {
        match self.lookup(name) {
            None => Ok(None),
            Some(value) => {
                value.as_str().map(Some).ok_or_else(|| self.invalid(name, "a string", value))
            }
        }
    }

    /// Gets a required array of strings.
    pub fn get_string_list(&self, name: &str) -> ScriptResult<Vec<String>> {
        let value = self.lookup(name).ok_or_else(|| self.missing(name))?;
        let items = value
            .as_array()
            .ok_or_else(|| self.invalid(name, "an array of strings", value))?;

        items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| self.invalid(name, "an array of strings", item))
            })
            .collect()
    }

    /// Gets an optional array of numbers.
    pub fn get_optional_f64_list(&self, name: &str) -> ScriptResult<Option<Vec<f64>>> {
        let Some(value) = self.lookup(name) else {
            return Ok(None);
        };
        let items = value
            .as_array()
            .ok_or_else(|| self.invalid(name, "an array of numbers", value))?;

        items
            .iter()
            .map(|item| item.as_f64().ok_or_else(|| self.invalid(name, "an array of numbers", item)))
            .collect::<ScriptResult<Vec<_>>>()
            .map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(entries: Vec<(&str, ParamValue)>) -> Params {
        entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }

    #[test]
    fn numbers_accept_integers() {
        let p = params(vec![("gte", ParamValue::Integer(65)), ("lte", ParamValue::Float(100.5))]);
        let inputs = ScriptInputs::new("test", &p);
        assert_eq!(inputs.get_f64("gte").unwrap(), 65.0);
        assert_eq!(inputs.get_f64("lte").unwrap(), 100.5);
    }

    #[test]
    fn null_is_treated_as_missing() {
        let p = params(vec![("weights", ParamValue::Null), ("gte", ParamValue::Null)]);
        let inputs = ScriptInputs::new("test", &p);
        assert_eq!(inputs.get_optional_f64_list("weights").unwrap(), None);
        assert!(matches!(
            inputs.get_f64("gte"),
            Err(ScriptError::MissingParameter { .. })
        ));
    }

    #[test]
    fn mixed_number_lists_are_accepted() {
        let p = params(vec![(
            "weights",
            ParamValue::Array(vec![ParamValue::Integer(1), ParamValue::Float(1.0)]),
        )]);
        let inputs = ScriptInputs::new("test", &p);
        assert_eq!(inputs.get_optional_f64_list("weights").unwrap(), Some(vec![1.0, 1.0]));
    }

    #[test]
    fn non_string_field_names_are_rejected() {
        let p = params(vec![("fields", ParamValue::from(vec![1i64, 2]))]);
        let err = ScriptInputs::new("test", &p).get_string_list("fields").unwrap_err();
        assert_eq!(
            err,
            ScriptError::InvalidParameter {
                script: "test".to_string(),
                parameter: "fields".to_string(),
                expected: "an array of strings".to_string(),
                actual: "integer".to_string(),
            }
        );
    }

    #[test]
    fn scalar_where_list_expected_is_invalid() {
        let p = params(vec![("fields", ParamValue::from("value1"))]);
        assert!(matches!(
            ScriptInputs::new("test", &p).get_string_list("fields"),
            Err(ScriptError::InvalidParameter { .. })
        ));
    }
}
