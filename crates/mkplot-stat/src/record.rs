//! Per-instance result records
//!
//! A record is an open-ended set of named fields. Only two of them are
//! mandatory and validated at load time:
//!
//! - `status`: `true` when the tool solved the instance within the timeout
//! - `rtime`: the measured running time in seconds
//!
//! Any other field (memory usage, number of calls, correctness flags, ...) is
//! kept opaque and looked up by name when a measurement key is configured.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::RecordError;

/// Key of the mandatory solved flag.
pub const STATUS_KEY: &str = "status";
/// Key of the mandatory running time.
pub const RUNTIME_KEY: &str = "rtime";

/// A single field of a result record.
///
/// Numbers keep their original JSON representation so that a table written
/// back to disk is identical to the one that was read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_more::Display)]
#[serde(untagged)]
pub enum FieldValue {
    #[display("{_0}")]
    Bool(bool),
    #[display("{_0}")]
    Number(serde_json::Number),
    #[display("{_0}")]
    Text(String),
    #[display("{_0}")]
    Other(serde_json::Value),
}

impl FieldValue {
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value)
            .map_or(FieldValue::Other(serde_json::Value::Null), FieldValue::Number)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

/// Result of one tool on one instance.
///
/// Guaranteed to hold a boolean `status` and a numeric `rtime`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, FieldValue>",
    into = "BTreeMap<String, FieldValue>"
)]
pub struct Record {
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    #[must_use]
    pub fn new(status: bool, rtime: f64) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(STATUS_KEY.to_owned(), FieldValue::from(status));
        fields.insert(RUNTIME_KEY.to_owned(), FieldValue::from(rtime));
        Self { fields }
    }

    #[must_use]
    pub fn status(&self) -> bool {
        self.fields
            .get(STATUS_KEY)
            .and_then(FieldValue::as_bool)
            .unwrap_or(false)
    }

    pub fn set_status(&mut self, status: bool) {
        self.fields
            .insert(STATUS_KEY.to_owned(), FieldValue::from(status));
    }

    #[must_use]
    pub fn rtime(&self) -> f64 {
        self.number(RUNTIME_KEY).unwrap_or(f64::INFINITY)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Numeric value of `key`, if present and numeric.
    #[must_use]
    pub fn number(&self, key: &str) -> Option<f64> {
        self.fields.get(key).and_then(FieldValue::as_f64)
    }

    pub fn set_number(&mut self, key: &str, value: f64) {
        self.fields.insert(key.to_owned(), FieldValue::from(value));
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl TryFrom<BTreeMap<String, FieldValue>> for Record {
    type Error = RecordError;

    fn try_from(fields: BTreeMap<String, FieldValue>) -> Result<Self, Self::Error> {
        if fields.get(STATUS_KEY).and_then(FieldValue::as_bool).is_none() {
            return Err(RecordError::MissingStatus);
        }
        if fields.get(RUNTIME_KEY).and_then(FieldValue::as_f64).is_none() {
            return Err(RecordError::MissingRuntime);
        }
        Ok(Self { fields })
    }
}

impl From<Record> for BTreeMap<String, FieldValue> {
    fn from(record: Record) -> Self {
        record.fields
    }
}
