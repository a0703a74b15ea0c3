//! Ordered collections of result tables
//!
//! A [`ResultCollection`] holds the tables of one comparison in input order
//! and maintains the sorted union of their instance names. All structural
//! changes (loading, clustering, adding a virtual best solver) recompute that
//! union.
//!
//! # Lifecycle
//!
//! ```text
//! load ─▶ cluster (optional, at most once) ─▶ synthesize_vbs (optional) ─▶ series
//! ```
//!
//! Clustering renames instances to `<instance>@<benchmark>` and turns the
//! `benchmark` preamble entry into a list, so a second clustering is rejected
//! with [`StatError::NotClusterable`].

use std::{
    collections::{BTreeMap, BTreeSet},
    ops::{Deref, DerefMut},
    path::{Path, PathBuf},
};

use crate::{
    criterion::{Criterion, FailureSign},
    error::StatError,
    preamble::{
        BENCHMARK_KEY, Legend, PROGRAM_ARGS_KEY, PROGRAM_KEY, PreambleValue, RUNSOLVER_ARGS_KEY,
        ToolSelection,
    },
    record::{FieldValue, RUNTIME_KEY, Record},
    table::ResultTable,
};

/// Label given to a synthesized virtual best solver when none is set.
pub const DEFAULT_VBS_LABEL: &str = "vbs";

/// Tables of several tool runs, indexed by the union of their instances.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultCollection {
    tables: Vec<ResultTable>,
    all_instances: BTreeSet<String>,
}

/// Parameters of a synthesized virtual best solver table.
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualBest {
    pub label: String,
    pub selection: ToolSelection,
    /// Lower bound applied to the best running time.
    pub floor: f64,
    /// Running time recorded for instances no selected tool solved.
    pub timeout: f64,
}

impl VirtualBest {
    #[must_use]
    pub fn new(selection: ToolSelection, timeout: f64) -> Self {
        Self {
            label: DEFAULT_VBS_LABEL.to_owned(),
            selection,
            floor: 0.0,
            timeout,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    #[must_use]
    pub fn with_floor(mut self, floor: f64) -> Self {
        self.floor = floor;
        self
    }
}

/// An instance whose tables disagree on the value of a key.
#[derive(Debug, Clone, PartialEq)]
pub struct Disagreement {
    pub instance: String,
    /// Each distinct value with the origins of the tables reporting it.
    pub values: Vec<(FieldValue, Vec<String>)>,
}

/// Which instances [`ResultCollection::listing`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr, derive_more::Display)]
pub enum ListKind {
    All,
    Solved,
    Failed,
}

/// One line of an instance listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceListing {
    pub instance: String,
    /// Tools with the requested status; empty for [`ListKind::All`].
    pub tools: Vec<String>,
}

impl ResultCollection {
    #[must_use]
    pub fn new(tables: Vec<ResultTable>) -> Self {
        let mut collection = Self {
            tables,
            all_instances: BTreeSet::new(),
        };
        collection.reindex();
        collection
    }

    /// Loads one table per path, in order.
    pub fn load<I, P>(paths: I) -> Result<Self, StatError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let tables = paths
            .into_iter()
            .map(ResultTable::load)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(tables))
    }

    fn reindex(&mut self) {
        self.all_instances = self
            .tables
            .iter()
            .flat_map(ResultTable::instances)
            .map(str::to_owned)
            .collect();
    }

    #[must_use]
    pub fn tables(&self) -> &[ResultTable] {
        &self.tables
    }

    /// Mutable access to the tables.
    ///
    /// The instance index is recomputed when the returned guard is dropped,
    /// so tables may be replaced through it.
    pub fn tables_mut(&mut self) -> TablesMut<'_> {
        TablesMut { collection: self }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResultTable> {
        self.tables.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Sorted union of the instances of all tables.
    #[must_use]
    pub fn all_instances(&self) -> &BTreeSet<String> {
        &self.all_instances
    }

    /// Writes every table to the matching path of `to`, or to its origin.
    pub fn write(&self, to: Option<&[PathBuf]>) -> Result<(), StatError> {
        match to {
            Some(paths) => {
                if paths.len() != self.tables.len() {
                    return Err(StatError::DestinationCount {
                        expected: self.tables.len(),
                        actual: paths.len(),
                    });
                }
                for (table, path) in self.tables.iter().zip(paths) {
                    table.write(Some(path))?;
                }
            }
            None => {
                for table in &self.tables {
                    table.write(None)?;
                }
            }
        }
        Ok(())
    }

    /// Merges tables that share the same values for `join_keys`.
    ///
    /// Every instance is first renamed to `<instance>@<benchmark>` so that
    /// same-named instances from different benchmark sets stay distinct. The
    /// merged table keeps the preamble of its first member; its `benchmark`
    /// and `runsolver_args` entries become the lists of the members' values
    /// in table order, with an empty string for members lacking
    /// `runsolver_args`. Clusters appear in order of their first member.
    pub fn cluster(&mut self, join_keys: &[String]) -> Result<(), StatError> {
        for table in &self.tables {
            table.benchmark_name()?;
            table.join_preamble(join_keys)?;
        }

        let mut clusters: Vec<ResultTable> = vec![];
        let mut cluster_args: Vec<Vec<Option<String>>> = vec![];
        let mut cluster_index = BTreeMap::<String, usize>::new();

        for mut table in std::mem::take(&mut self.tables) {
            let benchmark = table.disambiguate()?;
            let runsolver_args = table
                .preamble()
                .get(RUNSOLVER_ARGS_KEY)
                .map(ToString::to_string);
            let key = table.join_preamble(join_keys)?;

            if let Some(&index) = cluster_index.get(&key) {
                let cluster = &mut clusters[index];
                push_preamble_item(cluster, BENCHMARK_KEY, benchmark);
                cluster_args[index].push(runsolver_args);
                cluster.absorb(table);
            } else {
                table
                    .preamble_mut()
                    .insert(BENCHMARK_KEY.to_owned(), PreambleValue::List(vec![benchmark]));
                cluster_index.insert(key, clusters.len());
                cluster_args.push(vec![runsolver_args]);
                clusters.push(table);
            }
        }

        // Members without runsolver arguments get an empty entry so that the
        // list stays aligned with `benchmark`.
        for (cluster, args) in clusters.iter_mut().zip(cluster_args) {
            if args.iter().any(Option::is_some) {
                let args = args.into_iter().map(Option::unwrap_or_default).collect();
                cluster
                    .preamble_mut()
                    .insert(RUNSOLVER_ARGS_KEY.to_owned(), PreambleValue::List(args));
            }
        }

        self.tables = clusters;
        self.reindex();
        Ok(())
    }

    /// Appends a table holding the best solved result of the selected tables
    /// for every instance of the collection.
    ///
    /// The best result is the solved record with the smallest running time,
    /// floored at `vbs.floor`. Instances no selected table solved get an
    /// unsolved record with the running time set to `vbs.timeout`. Tables are
    /// selected by their `legend` label.
    pub fn synthesize_vbs(
        &mut self,
        vbs: &VirtualBest,
        legend: &Legend,
    ) -> Result<&ResultTable, StatError> {
        let first = self.tables.first().ok_or(StatError::EmptyCollection)?;

        let mut eligible = vec![];
        for table in &self.tables {
            if vbs.selection.contains(&table.label(legend)?) {
                eligible.push(table);
            }
        }

        let entries = self
            .all_instances
            .iter()
            .map(|instance| {
                let best = eligible
                    .iter()
                    .filter_map(|table| table.get(instance))
                    .filter(|record| record.status())
                    .min_by(|a, b| a.rtime().total_cmp(&b.rtime()));
                let record = match best {
                    Some(best) => {
                        let mut record = best.clone();
                        record.set_number(RUNTIME_KEY, best.rtime().max(vbs.floor));
                        record
                    }
                    None => Record::new(false, vbs.timeout),
                };
                (instance.clone(), record)
            })
            .collect();

        let mut preamble = first.preamble().clone();
        preamble.insert(PROGRAM_KEY.to_owned(), PreambleValue::from(vbs.label.as_str()));
        preamble.insert(PROGRAM_ARGS_KEY.to_owned(), PreambleValue::from(""));

        self.tables.push(ResultTable::new(preamble, entries));
        self.reindex();
        Ok(&self.tables[self.tables.len() - 1])
    }

    /// Reports instances where tables that solved them disagree on `key`.
    pub fn compare(&self, key: &str) -> Vec<Disagreement> {
        let mut disagreements = vec![];

        for instance in &self.all_instances {
            let mut values: Vec<(FieldValue, Vec<String>)> = vec![];
            for table in &self.tables {
                let Some(value) = table
                    .get(instance)
                    .filter(|record| record.status())
                    .and_then(|record| record.get(key))
                else {
                    continue;
                };
                match values.iter_mut().find(|(v, _)| v == value) {
                    Some((_, origins)) => origins.push(table.origin_display()),
                    None => values.push((value.clone(), vec![table.origin_display()])),
                }
            }

            if values.len() > 1 {
                tracing::warn!("different values found for '{key}' on {instance}: {values:?}");
                disagreements.push(Disagreement {
                    instance: instance.clone(),
                    values,
                });
            }
        }

        disagreements
    }

    /// Lists instances, with the tools that solved (or failed) them.
    ///
    /// Instances without any tool of the requested status are omitted.
    #[must_use]
    pub fn listing(&self, kind: ListKind) -> Vec<InstanceListing> {
        let wanted = match kind {
            ListKind::All => {
                return self
                    .all_instances
                    .iter()
                    .map(|instance| InstanceListing {
                        instance: instance.clone(),
                        tools: vec![],
                    })
                    .collect();
            }
            ListKind::Solved => true,
            ListKind::Failed => false,
        };

        self.all_instances
            .iter()
            .filter_map(|instance| {
                let tools = self
                    .tables
                    .iter()
                    .filter(|table| {
                        table
                            .get(instance)
                            .is_some_and(|record| record.status() == wanted)
                    })
                    .map(ResultTable::tool_name)
                    .collect::<Vec<_>>();
                (!tools.is_empty()).then(|| InstanceListing {
                    instance: instance.clone(),
                    tools,
                })
            })
            .collect()
    }

    /// Solved instances of every table satisfying `criterion`.
    pub fn select<'a>(
        &'a self,
        criterion: &'a Criterion,
    ) -> impl Iterator<Item = (&'a ResultTable, &'a str, f64)> + 'a {
        self.tables.iter().flat_map(move |table| {
            table
                .select(criterion)
                .map(move |(instance, value)| (table, instance, value))
        })
    }

    /// Invalidates results of every table using `sign` and persists them.
    pub fn update_status(&mut self, sign: &FailureSign) -> Result<usize, StatError> {
        self.tables
            .iter_mut()
            .map(|table| table.update_status(sign))
            .sum()
    }
}

/// Mutable view of the tables of a [`ResultCollection`].
///
/// Dropping the view refreshes [`ResultCollection::all_instances`].
#[derive(Debug)]
pub struct TablesMut<'a> {
    collection: &'a mut ResultCollection,
}

impl Deref for TablesMut<'_> {
    type Target = [ResultTable];

    fn deref(&self) -> &Self::Target {
        &self.collection.tables
    }
}

impl DerefMut for TablesMut<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.collection.tables
    }
}

impl Drop for TablesMut<'_> {
    fn drop(&mut self) {
        self.collection.reindex();
    }
}

fn push_preamble_item(table: &mut ResultTable, key: &str, item: String) {
    let preamble = table.preamble_mut();
    match preamble.get_mut(key) {
        Some(PreambleValue::List(items)) => items.push(item),
        _ => {
            preamble.insert(key.to_owned(), PreambleValue::List(vec![item]));
        }
    }
}

impl<'a> IntoIterator for &'a ResultCollection {
    type Item = &'a ResultTable;
    type IntoIter = std::slice::Iter<'a, ResultTable>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables.iter()
    }
}
