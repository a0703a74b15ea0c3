//! Row-oriented runtime tables
//!
//! The row format holds one column per tool and one row per instance:
//!
//! ```text
//! |instance| |minisat| |glucose|
//! |i1.cnf| 12.5 3600
//! |i2.cnf| 0.3 0.4
//! ```
//!
//! Fields are separated by spaces and quoted with `|`. The first row names
//! the tools; the first column is for human reference only and is ignored.
//! There is no status field: a value below the timeout counts as solved.

use std::{
    fs::File,
    io::{self, BufReader, Read},
    num::ParseFloatError,
    path::{Path, PathBuf},
};

use mkplot_stat::ToolSelection;

use crate::{
    error::SeriesError,
    options::PlotOptions,
    series::{Series, SeriesBuilder, sort_series},
};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum CsvError {
    #[display("cannot access '{}'", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[display("malformed row table: {source}")]
    Read { source: csv::Error },
    #[display("row table has no header row")]
    Empty,
    #[display("row table has no instance rows")]
    NoRows,
    #[display("row {row} has {actual} values, expected one per tool ({expected})")]
    ColumnCount {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[display("row {row}: '{value}' is not a number")]
    Value {
        row: usize,
        value: String,
        source: ParseFloatError,
    },
}

/// Runtime values of several tools over a shared list of instances.
#[derive(Debug, Clone, PartialEq)]
pub struct RowTable {
    tools: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl RowTable {
    /// Builds a table, checking that every row has one value per tool.
    pub fn new(tools: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self, CsvError> {
        if let Some((row, values)) = rows
            .iter()
            .enumerate()
            .find(|(_, values)| values.len() != tools.len())
        {
            return Err(CsvError::ColumnCount {
                row: row + 1,
                expected: tools.len(),
                actual: values.len(),
            });
        }
        Ok(Self { tools, rows })
    }

    pub fn load<P>(path: P) -> Result<Self, CsvError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        tracing::info!("reading {} as a row table", path.display());
        let file = File::open(path).map_err(|source| CsvError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R>(reader: R) -> Result<Self, CsvError>
    where
        R: Read,
    {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b' ')
            .quote(b'|')
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        // Runs of spaces produce empty fields, which carry no value.
        let mut records = reader.records();
        let header = records
            .next()
            .ok_or(CsvError::Empty)?
            .map_err(|source| CsvError::Read { source })?;
        let tools = non_empty_fields(&header).map(str::to_owned).collect();

        let mut rows = vec![];
        for (index, record) in records.enumerate() {
            let record = record.map_err(|source| CsvError::Read { source })?;
            let row = non_empty_fields(&record)
                .map(|value| {
                    value.parse().map_err(|source| CsvError::Value {
                        row: index + 1,
                        value: value.to_owned(),
                        source,
                    })
                })
                .collect::<Result<Vec<f64>, _>>()?;
            rows.push(row);
        }
        if rows.is_empty() {
            return Err(CsvError::NoRows);
        }

        Self::new(tools, rows)
    }

    #[must_use]
    pub fn tools(&self) -> &[String] {
        &self.tools
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Computes one series per tool plus the configured VBS series.
    ///
    /// Tool series are labeled after replacements; VBS series keep their
    /// configured names. Filtering with `only` uses the original names.
    pub fn series(&self, options: &PlotOptions) -> Result<Vec<Series>, SeriesError> {
        let mut named = vec![];

        for (column, tool) in self.tools.iter().enumerate() {
            let series = self.column_series(options, |row| row[column]);
            named.push((tool.as_str(), series.build(options.display_label(tool).to_owned())));
        }

        for spec in options.vbs.iter().flatten() {
            let columns = self.selected_columns(&spec.selection);
            if columns.is_empty() {
                return Err(SeriesError::EmptyVbsSelection {
                    name: spec.name.clone(),
                });
            }
            let series = self.column_series(options, |row| {
                columns
                    .iter()
                    .map(|&column| row[column])
                    .min_by(f64::total_cmp)
                    .unwrap_or(f64::INFINITY)
            });
            named.push((spec.name.as_str(), series.build(spec.name.clone())));
        }

        let mut series = named
            .into_iter()
            .filter(|(name, _)| options.keeps(name))
            .map(|(_, series)| series)
            .collect::<Vec<_>>();
        sort_series(&mut series, options.reverse);
        Ok(series)
    }

    fn selected_columns(&self, selection: &ToolSelection) -> Vec<usize> {
        self.tools
            .iter()
            .enumerate()
            .filter(|(_, tool)| selection.contains(tool))
            .map(|(column, _)| column)
            .collect()
    }

    fn column_series<F>(&self, options: &PlotOptions, value_of: F) -> SeriesBuilder
    where
        F: Fn(&[f64]) -> f64,
    {
        let mut builder = SeriesBuilder::new();
        for row in self.rows.iter().map(Vec::as_slice) {
            let value = value_of(row);
            if value < options.timeout {
                builder.push_solved(value, options);
            } else {
                builder.push_unsolved(options);
            }
        }
        builder
    }
}

fn non_empty_fields(record: &csv::StringRecord) -> impl Iterator<Item = &str> {
    record
        .iter()
        .skip(1)
        .map(str::trim)
        .filter(|field| !field.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "\
|instance| |a| |b|
|i1|  1.0  20.0
|i2|  5.0  2.0
|i3|  15.0  30.0
";

    #[test]
    fn test_parse_skips_first_column_and_blank_fields() {
        let table = RowTable::from_reader(TABLE.as_bytes()).expect("table");
        assert_eq!(table.tools(), ["a", "b"]);
        assert_eq!(table.rows()[1], [5.0, 2.0]);
        assert_eq!(table.rows().len(), 3);
    }

    #[test]
    fn test_inconsistent_rows_are_rejected() {
        let text = "|x| a b\n|i1| 1.0\n";
        assert!(matches!(
            RowTable::from_reader(text.as_bytes()),
            Err(CsvError::ColumnCount {
                row: 1,
                expected: 2,
                actual: 1
            })
        ));

        let text = "|x| a b\n|i1| 1.0 fast\n";
        assert!(matches!(
            RowTable::from_reader(text.as_bytes()),
            Err(CsvError::Value { row: 1, .. })
        ));

        assert!(matches!(
            RowTable::from_reader("".as_bytes()),
            Err(CsvError::Empty)
        ));
        assert!(matches!(
            RowTable::from_reader("|instance| |a| |b|\n".as_bytes()),
            Err(CsvError::NoRows)
        ));
    }

    #[test]
    fn test_vbs_takes_row_minimum_of_selected_tools() {
        let table = RowTable::from_reader(TABLE.as_bytes()).expect("table");
        let options: PlotOptions = serde_json::from_value(serde_json::json!({
            "timeout": 10,
            "plot_type": "scatter",
            "vbs": {"best": "all", "only-b": ["b"]},
        }))
        .expect("options");

        let series = table.series(&options).expect("series");
        let best = series.iter().find(|s| s.label == "best").expect("best");
        assert_eq!(best.values, [1.0, 2.0, 10.0]);
        assert_eq!(best.solved, 2);
        assert!((best.max_solved - 2.0).abs() < f64::EPSILON);

        let only_b = series.iter().find(|s| s.label == "only-b").expect("only-b");
        assert_eq!(only_b.values, [10.0, 2.0, 10.0]);
        assert_eq!(only_b.solved, 1);
    }

    #[test]
    fn test_vbs_selecting_no_tool_fails() {
        let table = RowTable::from_reader(TABLE.as_bytes()).expect("table");
        let options: PlotOptions = serde_json::from_value(serde_json::json!({
            "vbs": {"none": ["c"]},
        }))
        .expect("options");
        assert!(matches!(
            table.series(&options),
            Err(SeriesError::EmptyVbsSelection { .. })
        ));
    }

    #[test]
    fn test_only_filters_by_original_names() {
        let table = RowTable::from_reader(TABLE.as_bytes()).expect("table");
        let options: PlotOptions = serde_json::from_value(serde_json::json!({
            "timeout": 10,
            "only": ["a"],
            "repls": {"a": "Tool A"},
        }))
        .expect("options");
        let series = table.series(&options).expect("series");
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].label, "Tool A");
    }
}
