//! Results of one tool run, loaded from a single file
//!
//! # File Format
//!
//! ```json
//! {
//!   "preamble": {
//!     "program": "minisat",
//!     "prog_args": "-no-elim",
//!     "benchmark": "sat2013",
//!     "runsolver_args": "-C 1800 -M 4096"
//!   },
//!   "stats": {
//!     "inst1.cnf": { "status": true, "rtime": 12.3 },
//!     "inst2.cnf": { "status": false, "rtime": 1800.0 }
//!   }
//! }
//! ```
//!
//! The instance names of a table are the keys of its `stats` map. They are
//! kept in a sorted map, so the set of instances always matches the set of
//! records and is iterated in sorted order.

use std::{
    collections::BTreeMap,
    fs::File,
    io::{self, BufReader, BufWriter, Read, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    criterion::{Criterion, FailureSign},
    error::StatError,
    preamble::{
        BENCHMARK_KEY, Legend, PROGRAM_ALIAS_KEY, PROGRAM_ARGS_KEY, PROGRAM_KEY, Preamble,
        PreambleValue,
    },
    record::Record,
};

/// On-disk layout of a result table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatFile {
    pub preamble: Preamble,
    pub stats: BTreeMap<String, Record>,
}

/// Per-instance results of one tool.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    preamble: Preamble,
    entries: BTreeMap<String, Record>,
    origin: Option<PathBuf>,
}

impl ResultTable {
    #[must_use]
    pub fn new(preamble: Preamble, entries: BTreeMap<String, Record>) -> Self {
        Self {
            preamble,
            entries,
            origin: None,
        }
    }

    /// Reads a table from a JSON file, remembering the path as its origin.
    pub fn load<P>(path: P) -> Result<Self, StatError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        tracing::info!("reading {}", path.display());

        let file = File::open(path).map_err(|source| StatError::Io {
            path: path.to_owned(),
            source,
        })?;
        let mut table =
            Self::from_reader(BufReader::new(file)).map_err(|source| StatError::Parse {
                path: path.to_owned(),
                source,
            })?;
        table.origin = Some(path.to_owned());
        Ok(table)
    }

    pub fn from_reader<R>(reader: R) -> Result<Self, serde_json::Error>
    where
        R: Read,
    {
        let StatFile { preamble, stats } = serde_json::from_reader(reader)?;
        Ok(Self::new(preamble, stats))
    }

    /// Writes the table to `to`, or back to the file it was loaded from.
    pub fn write(&self, to: Option<&Path>) -> Result<(), StatError> {
        let path = to
            .or(self.origin.as_deref())
            .ok_or(StatError::NoDestination)?;
        tracing::info!("writing {}", path.display());

        let file = File::create(path).map_err(|source| StatError::Io {
            path: path.to_owned(),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        self.to_writer(&mut writer)
            .and_then(|()| writer.flush().map_err(serde_json::Error::io))
            .map_err(|source| StatError::Write {
                path: path.to_owned(),
                source,
            })
    }

    /// Serializes `{preamble, stats}` as JSON indented by four spaces.
    pub fn to_writer<W>(&self, writer: W) -> Result<(), serde_json::Error>
    where
        W: io::Write,
    {
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
        StatFileRef {
            preamble: &self.preamble,
            stats: &self.entries,
        }
        .serialize(&mut serializer)
    }

    #[must_use]
    pub fn preamble(&self) -> &Preamble {
        &self.preamble
    }

    pub fn preamble_mut(&mut self) -> &mut Preamble {
        &mut self.preamble
    }

    #[must_use]
    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }

    /// Human-readable provenance used in diagnostics.
    #[must_use]
    pub fn origin_display(&self) -> String {
        match &self.origin {
            Some(path) => format!("'{}'", path.display()),
            None => "a synthesized table".to_owned(),
        }
    }

    /// Instance names in sorted order.
    pub fn instances(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, instance: &str) -> Option<&Record> {
        self.entries.get(instance)
    }

    pub fn get_mut(&mut self, instance: &str) -> Option<&mut Record> {
        self.entries.get_mut(instance)
    }

    /// Records in instance order.
    pub fn records(&self) -> impl Iterator<Item = (&str, &Record)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Mutable records in instance order. Instance names cannot be changed.
    pub fn records_mut(&mut self) -> impl Iterator<Item = (&str, &mut Record)> {
        self.entries.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    fn preamble_text(&self, key: &str) -> Result<String, StatError> {
        self.preamble
            .get(key)
            .map(ToString::to_string)
            .ok_or_else(|| StatError::MissingPreambleKey {
                key: key.to_owned(),
                origin: self.origin_display(),
            })
    }

    /// Legend label: the preamble values of `legend`, joined by a space and
    /// trimmed.
    pub fn label(&self, legend: &Legend) -> Result<String, StatError> {
        self.join_preamble(legend.keys())
            .map(|label| label.trim().to_owned())
    }

    /// Preamble values of `keys` joined by a space.
    pub fn join_preamble(&self, keys: &[String]) -> Result<String, StatError> {
        let values = keys
            .iter()
            .map(|key| self.preamble_text(key))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(values.join(" "))
    }

    /// Name used when listing the tools that solved an instance.
    #[must_use]
    pub fn tool_name(&self) -> String {
        if let Some(alias) = self.preamble.get(PROGRAM_ALIAS_KEY) {
            return alias.to_string();
        }
        let text = |key: &str| {
            self.preamble
                .get(key)
                .map(ToString::to_string)
                .unwrap_or_default()
        };
        format!("{} {}", text(PROGRAM_KEY), text(PROGRAM_ARGS_KEY))
            .trim()
            .to_owned()
    }

    /// Marks every solved instance for which `sign` holds as unsolved.
    ///
    /// Returns the number of flipped records.
    pub fn invalidate(&mut self, sign: &FailureSign) -> usize {
        let mut flipped = 0;
        for (instance, record) in &mut self.entries {
            if record.status() && sign.holds(record) {
                tracing::debug!("updating {instance}");
                record.set_status(false);
                flipped += 1;
            }
        }
        flipped
    }

    /// Invalidates results using `sign` and persists the table to its origin.
    pub fn update_status(&mut self, sign: &FailureSign) -> Result<usize, StatError> {
        let flipped = self.invalidate(sign);
        self.write(None)?;
        Ok(flipped)
    }

    /// Solved instances whose value satisfies `criterion`, with that value.
    pub fn select<'a>(
        &'a self,
        criterion: &'a Criterion,
    ) -> impl Iterator<Item = (&'a str, f64)> + 'a {
        self.records()
            .filter(|(_, record)| record.status())
            .filter_map(|(instance, record)| {
                criterion.matches(record).map(|value| (instance, value))
            })
    }

    /// Name of the benchmark set, as required for clustering.
    pub fn benchmark_name(&self) -> Result<&str, StatError> {
        match self.preamble.get(BENCHMARK_KEY) {
            Some(PreambleValue::Text(name)) => Ok(name),
            Some(_) => Err(StatError::NotClusterable {
                origin: self.origin_display(),
            }),
            None => Err(StatError::MissingPreambleKey {
                key: BENCHMARK_KEY.to_owned(),
                origin: self.origin_display(),
            }),
        }
    }

    /// Suffixes every instance name with `@<benchmark>`.
    pub(crate) fn disambiguate(&mut self) -> Result<String, StatError> {
        let benchmark = self.benchmark_name()?.to_owned();
        self.entries = std::mem::take(&mut self.entries)
            .into_iter()
            .map(|(instance, record)| (format!("{instance}@{benchmark}"), record))
            .collect();
        Ok(benchmark)
    }

    /// Moves all records of `other` into this table.
    pub(crate) fn absorb(&mut self, other: ResultTable) {
        self.entries.extend(other.entries);
    }
}

#[derive(Serialize)]
struct StatFileRef<'a> {
    preamble: &'a Preamble,
    stats: &'a BTreeMap<String, Record>,
}
