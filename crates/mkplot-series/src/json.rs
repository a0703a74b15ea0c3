//! Series from result tables
//!
//! Each table yields one series over its own instances, in sorted order.
//! Virtual best solver series span every instance of the collection.
//!
//! # Shared records
//!
//! While building a VBS series, solved records whose measured value reaches
//! the timeout are overwritten in place with the unsolved value. Later VBS
//! series over the same tables observe the overwritten values, so VBS series
//! are computed strictly in configuration order, after all tool series.

use std::collections::BTreeMap;

use mkplot_stat::{ResultCollection, ResultTable, ToolSelection};

use crate::{
    error::SeriesError,
    options::PlotOptions,
    series::{NOTHING_SOLVED, Series, SeriesBuilder, sort_series},
};

/// Computes the sorted series of a collection.
///
/// Clusters the collection first when `join_key` is configured. Tool
/// series are labeled by the legend keys; VBS series by their names.
pub fn collection_series(
    collection: &mut ResultCollection,
    options: &PlotOptions,
) -> Result<Vec<Series>, SeriesError> {
    if let Some(join_key) = &options.join_key {
        collection.cluster(join_key)?;
    }

    let mut series = collection
        .iter()
        .map(|table| table_series(table, options))
        .collect::<Result<Vec<_>, _>>()?;

    for spec in options.vbs.iter().flatten() {
        series.push(vbs_series(collection, &spec.name, &spec.selection, options)?);
    }

    let mut series = series
        .into_iter()
        .filter(|s| options.keeps(&s.label))
        .map(|mut s| {
            s.label = options.display_label(&s.label).to_owned();
            s
        })
        .collect::<Vec<_>>();
    sort_series(&mut series, options.reverse);
    Ok(series)
}

/// Series of one table over its own instances.
///
/// A record lacking the measured key counts as taking the timeout.
pub fn table_series(table: &ResultTable, options: &PlotOptions) -> Result<Series, SeriesError> {
    let mut builder = SeriesBuilder::new();
    for (_, record) in table.records() {
        if record.status() {
            let value = record.number(&options.key).unwrap_or(options.timeout);
            builder.push_solved(value, options);
        } else {
            builder.push_unsolved(options);
        }
    }
    Ok(builder.build(table.label(&options.legend)?))
}

/// Virtual best solver series over the tables chosen by `selection`.
///
/// For every instance of the collection, the value is the smallest measured
/// value among the selected tables that solved it, floored; instances nobody
/// solved take the unsolved value. Records without the measured key are
/// skipped. Solved records at or above the timeout are overwritten with the
/// unsolved value.
pub fn vbs_series(
    collection: &mut ResultCollection,
    name: &str,
    selection: &ToolSelection,
    options: &PlotOptions,
) -> Result<Series, SeriesError> {
    let ceiling = options.unsolved_value();
    let floor = options.floor();

    let mut best = collection
        .all_instances()
        .iter()
        .map(|instance| (instance.clone(), ceiling))
        .collect::<BTreeMap<_, _>>();
    let mut solved = 0;

    let mut tables = collection.tables_mut();
    for table in tables.iter_mut() {
        if !selection.contains(&table.label(&options.legend)?) {
            continue;
        }
        for (instance, record) in table.records_mut() {
            if !record.status() {
                continue;
            }
            let Some(mut value) = record.number(&options.key) else {
                continue;
            };
            let Some(current) = best.get_mut(instance) else {
                continue;
            };
            if value >= options.timeout {
                record.set_number(&options.key, ceiling);
                value = ceiling;
            } else if *current >= ceiling {
                solved += 1;
            }
            *current = floor.max(value.min(*current));
        }
    }

    let max_solved = best
        .values()
        .copied()
        .filter(|&v| v < ceiling)
        .fold(NOTHING_SOLVED, f64::max);

    Ok(Series {
        label: name.to_owned(),
        values: best.into_values().collect(),
        solved,
        max_solved,
    })
}
