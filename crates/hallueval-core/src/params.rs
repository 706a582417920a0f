//! Decoding-parameter bag shared by all backends.
//!
//! Backends take an open set of named options rather than a fixed struct:
//! the recognized decoding options get typed accessors and defaults, and
//! anything else passes through untyped to whatever the concrete backend
//! understands. A `BTreeMap` keeps iteration order deterministic.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Option key for the model identifier.
pub const MODEL_NAME: &str = "model_name";
/// Option key for the sampling temperature.
pub const TEMPERATURE: &str = "temperature";
/// Option key for the generation length cap.
pub const MAX_NEW_TOKENS: &str = "max_new_tokens";
/// Option key for nucleus sampling.
pub const TOP_P: &str = "top_p";
/// Option key for top-k sampling.
pub const TOP_K: &str = "top_k";

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f64 = 1.0;
/// Default generation length cap.
pub const DEFAULT_MAX_NEW_TOKENS: u64 = 1024;
/// Default nucleus-sampling threshold.
pub const DEFAULT_TOP_P: f64 = 0.9;
/// Default top-k cutoff.
pub const DEFAULT_TOP_K: u64 = 5;

/// Open mapping from option name to value.
///
/// Created at backend construction with the defaults filled in; updated
/// either in place ([`Params::update`]) or on an independent copy
/// ([`Params::merged`]). No validation of option names or value types:
/// unknown options pass through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params {
    entries: BTreeMap<String, Value>,
}

impl Params {
    /// Create the default parameter set for a backend.
    ///
    /// `model_name` defaults to the backend's own identifying name when the
    /// caller does not override it afterwards.
    pub fn new(model_name: impl Into<String>) -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(MODEL_NAME.to_string(), Value::from(model_name.into()));
        entries.insert(TEMPERATURE.to_string(), Value::from(DEFAULT_TEMPERATURE));
        entries.insert(
            MAX_NEW_TOKENS.to_string(),
            Value::from(DEFAULT_MAX_NEW_TOKENS),
        );
        entries.insert(TOP_P.to_string(), Value::from(DEFAULT_TOP_P));
        entries.insert(TOP_K.to_string(), Value::from(DEFAULT_TOP_K));
        Self { entries }
    }

    /// Set a single option, recognized or not.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Look up an option by name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Merge overrides into this parameter set in place.
    pub fn update(&mut self, overrides: impl IntoIterator<Item = (String, Value)>) {
        self.entries.extend(overrides);
    }

    /// Independent copy of this parameter set with overrides applied.
    ///
    /// The original is fully unaffected.
    pub fn merged(&self, overrides: impl IntoIterator<Item = (String, Value)>) -> Self {
        let mut copy = self.clone();
        copy.update(overrides);
        copy
    }

    /// Model identifier, if set to a string.
    pub fn model_name(&self) -> Option<&str> {
        self.get(MODEL_NAME).and_then(Value::as_str)
    }

    /// Sampling temperature.
    pub fn temperature(&self) -> f64 {
        self.get(TEMPERATURE)
            .and_then(Value::as_f64)
            .unwrap_or(DEFAULT_TEMPERATURE)
    }

    /// Generation length cap.
    pub fn max_new_tokens(&self) -> u64 {
        self.get(MAX_NEW_TOKENS)
            .and_then(Value::as_u64)
            .unwrap_or(DEFAULT_MAX_NEW_TOKENS)
    }

    /// Nucleus-sampling threshold.
    pub fn top_p(&self) -> f64 {
        self.get(TOP_P)
            .and_then(Value::as_f64)
            .unwrap_or(DEFAULT_TOP_P)
    }

    /// Top-k cutoff.
    pub fn top_k(&self) -> u64 {
        self.get(TOP_K)
            .and_then(Value::as_u64)
            .unwrap_or(DEFAULT_TOP_K)
    }
}
