//! Plot series computed from benchmark results.
//!
//! Turns result tables (or row-oriented runtime tables) into the labeled,
//! sorted series that cactus and scatter renderers draw:
//!
//! - **Options** ([`options::PlotOptions`]): timeout, measured key, legend,
//!   VBS definitions, label filters and replacements, plot type and axes
//! - **Series** ([`series::Series`]): per-instance values clamped into
//!   `[floor, timeout]`, with unsolved instances set to the unsolved value
//! - **Result-table path** ([`json`]): one series per table, optional
//!   clustering, VBS series over the union of instances
//! - **Row-table path** ([`csv`]): one series per column, VBS as the row
//!   minimum of the selected columns
//! - **Loading** ([`load::load_series`]): reads result tables, falling back to
//!   the row format for a single unparsable input
//! - **Axes** ([`axes::AxisLimits`]): plot area limits, with scatter checks
//!
//! # Examples
//!
//! ```
//! use mkplot_series::{PlotOptions, RowTable};
//!
//! let text = "|instance| |a| |b|\n|i1| 1.0 2.0\n|i2| 20.0 0.5\n";
//! let table = RowTable::from_reader(text.as_bytes())?;
//! let options = PlotOptions { timeout: 10.0, ..PlotOptions::default() };
//!
//! let series = table.series(&options)?;
//! assert_eq!(series[0].label, "b");
//! assert_eq!(series[0].solved, 2);
//! assert_eq!(series[1].values, [1.0, 100.0]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use self::{
    axes::AxisLimits,
    csv::{CsvError, RowTable},
    error::{LoadError, SeriesError},
    json::{collection_series, table_series, vbs_series},
    load::load_series,
    options::{DefaultsFile, PlotOptions, PlotType, VbsSpec, VbsSpecs},
    series::{Series, SeriesSummary, clamp, sort_series},
};

pub mod axes;
pub mod csv;
pub mod error;
pub mod json;
pub mod load;
pub mod options;
pub mod series;
