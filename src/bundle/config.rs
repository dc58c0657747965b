// src/bundle/config.rs

//! Run configuration and batch header bags, and the bundle-level config
//! they are merged into.

use crate::core::AssembleError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const N_QUBITS: &str = "n_qubits";
const MEMORY_SLOTS: &str = "memory_slots";

fn object_from_value(value: Value, what: &str) -> Result<Map<String, Value>, AssembleError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(AssembleError::InvalidRunConfig {
            message: format!("{} must be a JSON object of key/value pairs, found {}", what, json_kind(&other)),
        }),
    }
}

fn object_from_str(text: &str, what: &str) -> Result<Map<String, Value>, AssembleError> {
    let value: Value = serde_json::from_str(text).map_err(|e| AssembleError::InvalidRunConfig {
        message: format!("{} is not valid JSON: {}", what, e),
    })?;
    object_from_value(value, what)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Caller-supplied run options (shots, seeds, memory flags, ...).
///
/// The assembler treats the bag as opaque and copies it verbatim into the
/// bundle config, except for `n_qubits` and `memory_slots`, which are
/// always replaced by the values computed from the circuits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunConfig(Map<String, Value>);

impl RunConfig {
    /// Creates an empty run configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a run configuration from a JSON value.
    ///
    /// # Errors
    /// Returns `AssembleError::InvalidRunConfig` unless `value` is an object.
    pub fn from_value(value: Value) -> Result<Self, AssembleError> {
        object_from_value(value, "run config").map(Self)
    }

    /// Parses a run configuration from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, AssembleError> {
        object_from_str(text, "run config").map(Self)
    }

    /// Sets `key` to `value`, replacing any earlier entry.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Value> for RunConfig {
    type Error = AssembleError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

/// Free-form batch header, passed through to the bundle untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BundleHeader(Map<String, Value>);

impl BundleHeader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a header from a JSON value; it must be an object.
    pub fn from_value(value: Value) -> Result<Self, AssembleError> {
        object_from_value(value, "bundle header").map(Self)
    }

    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

impl TryFrom<Value> for BundleHeader {
    type Error = AssembleError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

/// Bundle-level sizing plus the caller's run options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleConfig {
    /// Largest qubit count of any experiment in the bundle.
    pub n_qubits: usize,
    /// Largest memory-slot count of any experiment in the bundle.
    pub memory_slots: usize,
    /// Remaining run options, copied verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BundleConfig {
    /// Overlays `run_config` and then writes the computed sizing fields.
    ///
    /// Any `n_qubits`/`memory_slots` entries in the run config are dropped;
    /// the computed maxima always win.
    pub fn overlay(run_config: &RunConfig, n_qubits: usize, memory_slots: usize) -> Self {
        let mut extra = run_config.as_map().clone();
        extra.remove(N_QUBITS);
        extra.remove(MEMORY_SLOTS);
        Self { n_qubits, memory_slots, extra }
    }

    /// Looks up a run option carried through from the run configuration.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_run_config_rejects_non_objects() {
        for bad in [json!(null), json!(3), json!("shots"), json!([1, 2])] {
            let err = RunConfig::from_value(bad).unwrap_err();
            assert!(matches!(err, AssembleError::InvalidRunConfig { .. }));
        }
        assert!(RunConfig::from_json_str("{not json").is_err());
        assert!(BundleHeader::from_value(json!(true)).is_err());
    }

    #[test]
    fn test_try_from_value() -> Result<(), AssembleError> {
        let run_config = RunConfig::try_from(json!({"shots": 8}))?;
        assert!(!run_config.is_empty());
        assert_eq!(run_config.get("shots"), Some(&json!(8)));
        assert!(RunConfig::new().is_empty());

        let header = BundleHeader::try_from(json!({"backend_name": "local"}))?;
        assert_eq!(header.get("backend_name"), Some(&json!("local")));
        assert!(BundleHeader::try_from(json!([1])).is_err());
        Ok(())
    }

    #[test]
    fn test_overlay_keeps_options_and_overrides_sizes() {
        let run_config = RunConfig::new()
            .set("shots", 1024)
            .set("memory", true)
            .set("n_qubits", 99)
            .set("memory_slots", 99);
        let config = BundleConfig::overlay(&run_config, 3, 2);
        assert_eq!(config.n_qubits, 3);
        assert_eq!(config.memory_slots, 2);
        assert_eq!(config.get("shots"), Some(&json!(1024)));
        assert!(config.get("n_qubits").is_none());

        let wire = serde_json::to_value(&config).unwrap();
        assert_eq!(wire, json!({"n_qubits": 3, "memory_slots": 2, "shots": 1024, "memory": true}));
    }

    #[test]
    fn test_nested_option_values_are_opaque() -> Result<(), AssembleError> {
        let run_config = RunConfig::from_json_str(r#"{"seed": 7, "qubit_lo_freq": [4.9, 5.1]}"#)?;
        let config = BundleConfig::overlay(&run_config, 1, 1);
        assert_eq!(config.get("qubit_lo_freq"), Some(&json!([4.9, 5.1])));
        Ok(())
    }
}
