//! Loading a script request from a JSON file or from command-line flags.

use crate::cli::ScriptArgs;
use anyhow::{Context, Result, anyhow, bail};
use std::path::Path;
use wavg_types::{ParamValue, Params};

/// A script name (optional for the CLI) and its parameter bag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Request {
    pub script: Option<String>,
    pub params: Params,
}

impl Request {
    /// Parses `{ "script": "...", "params": { ... } }`; both members are optional.
    pub fn from_json_str(source: &str) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_str(source).context("request is not valid JSON")?;
        let serde_json::Value::Object(mut members) = value else {
            bail!("request must be a JSON object");
        };

        let script = match members.remove("script") {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(name)) => Some(name),
            Some(other) => bail!("request 'script' must be a string, found {other}"),
        };

        let params = match members.remove("params") {
            None | Some(serde_json::Value::Null) => Params::new(),
            Some(raw) => match ParamValue::try_from(&raw)? {
                ParamValue::Object(params) => params,
                other => return Err(anyhow!("request 'params' must be an object, found {}", other.type_name())),
            },
        };

        Ok(Self { script, params })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read request file {}", path.display()))?;
        Self::from_json_str(&source).with_context(|| format!("invalid request file {}", path.display()))
    }

    /// Builds the parameter bag from `--fields` and `--weights`.
    pub fn from_flags(args: &ScriptArgs) -> Self {
        let mut params = Params::new();
        if !args.fields.is_empty() {
            params.insert(
                "fields".to_string(),
                ParamValue::Array(args.fields.iter().map(|f| ParamValue::from(f.as_str())).collect()),
            );
        }
        if let Some(weights) = &args.weights {
            params.insert("weights".to_string(), ParamValue::from(weights.clone()));
        }
        Self { script: None, params }
    }

    /// Reads `--request` when given, otherwise the flags.
    pub fn load(args: &ScriptArgs) -> Result<Self> {
        match &args.request {
            Some(path) => Self::from_file(path),
            None => Ok(Self::from_flags(args)),
        }
    }

    /// Sets `key`, replacing any value from the request file.
    pub fn set(&mut self, key: &str, value: ParamValue) {
        self.params.insert(key.to_string(), value);
    }
}
