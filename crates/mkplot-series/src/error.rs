use mkplot_stat::StatError;

use crate::csv::CsvError;

/// Configuration errors, raised before anything is rendered.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum SeriesError {
    #[display("{_0}")]
    #[from]
    Stat(StatError),
    #[display("a scatter plot compares two series, got {count}")]
    TooFewScatterSeries { count: usize },
    #[display(
        "number of instances for each competitor must be the same ('{first}': {first_len}, '{second}': {second_len})"
    )]
    UnequalScatterSeries {
        first: String,
        first_len: usize,
        second: String,
        second_len: usize,
    },
    #[display("right-most positions must be the same for X and Y axes (x_max = {x_max}, y_max = {y_max})")]
    ConflictingAxisMaxima { x_max: f64, y_max: f64 },
    #[display("VBS '{name}' selects none of the available tools")]
    EmptyVbsSelection { name: String },
}

/// Errors of [`load_series`](crate::load::load_series).
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum LoadError {
    #[display("no input files given")]
    NoInput,
    #[display("{_0}")]
    #[from]
    Stat(StatError),
    /// Neither the result-table format nor the row format could be read.
    #[display("input is neither a result table ({json}) nor a row table ({csv})")]
    FormatMismatch {
        #[error(not(source))]
        json: StatError,
        #[error(source)]
        csv: CsvError,
    },
    #[display("{_0}")]
    #[from]
    Series(SeriesError),
}
