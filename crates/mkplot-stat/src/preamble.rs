//! Table metadata and the labels derived from it
//!
//! The preamble of a result table describes the run that produced it: the
//! program and its arguments, the benchmark set, the runsolver limits, and
//! so on. Labels shown in legends are built by joining configured preamble
//! values, and tool subsets (for VBS series) refer to tables by that label.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt, slice,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Preamble key naming the tool.
pub const PROGRAM_KEY: &str = "program";
/// Preamble key holding the tool arguments.
pub const PROGRAM_ARGS_KEY: &str = "prog_args";
/// Preamble key holding a human-friendly tool name.
pub const PROGRAM_ALIAS_KEY: &str = "prog_alias";
/// Preamble key naming the benchmark set.
pub const BENCHMARK_KEY: &str = "benchmark";
/// Preamble key holding the runsolver limits.
pub const RUNSOLVER_ARGS_KEY: &str = "runsolver_args";

/// Metadata map of a result table.
pub type Preamble = BTreeMap<String, PreambleValue>;

/// A preamble value.
///
/// Clustering turns the `benchmark` and `runsolver_args` entries into lists
/// holding one value per merged table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PreambleValue {
    Text(String),
    List(Vec<String>),
    Other(serde_json::Value),
}

impl PreambleValue {
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PreambleValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for PreambleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreambleValue::Text(s) => f.write_str(s),
            PreambleValue::List(items) => f.write_str(&items.join(" ")),
            PreambleValue::Other(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for PreambleValue {
    fn from(value: &str) -> Self {
        PreambleValue::Text(value.to_owned())
    }
}

impl From<String> for PreambleValue {
    fn from(value: String) -> Self {
        PreambleValue::Text(value)
    }
}

/// Preamble keys whose values, joined by a space, label a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Legend {
    Key(String),
    Keys(Vec<String>),
}

impl Default for Legend {
    fn default() -> Self {
        Legend::Key(PROGRAM_KEY.to_owned())
    }
}

impl Legend {
    #[must_use]
    pub fn keys(&self) -> &[String] {
        match self {
            Legend::Key(key) => slice::from_ref(key),
            Legend::Keys(keys) => keys,
        }
    }
}

impl From<Vec<String>> for Legend {
    fn from(mut keys: Vec<String>) -> Self {
        if keys.len() == 1 {
            Legend::Key(keys.remove(0))
        } else {
            Legend::Keys(keys)
        }
    }
}

/// Which tables take part in a virtual best solver.
///
/// Serialized as the string `"all"` or as a list of table labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolSelection {
    All,
    Tools(BTreeSet<String>),
}

impl ToolSelection {
    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        match self {
            ToolSelection::All => true,
            ToolSelection::Tools(tools) => tools.contains(label),
        }
    }
}

impl<S> FromIterator<S> for ToolSelection
where
    S: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        ToolSelection::Tools(iter.into_iter().map(Into::into).collect())
    }
}

const ALL_TOOLS: &str = "all";

#[derive(Deserialize)]
#[serde(untagged)]
enum ToolSelectionRepr {
    Text(String),
    List(Vec<String>),
}

impl Serialize for ToolSelection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ToolSelection::All => ALL_TOOLS.serialize(serializer),
            ToolSelection::Tools(tools) => tools.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for ToolSelection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match ToolSelectionRepr::deserialize(deserializer)? {
            ToolSelectionRepr::Text(text) if text == ALL_TOOLS => Ok(ToolSelection::All),
            ToolSelectionRepr::Text(text) => Err(serde::de::Error::custom(format!(
                "expected \"{ALL_TOOLS}\" or a list of tools, got \"{text}\""
            ))),
            ToolSelectionRepr::List(tools) => Ok(tools.into_iter().collect()),
        }
    }
}
