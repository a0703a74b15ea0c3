use std::path::Path;

use mkplot_stat::{ResultCollection, StatError};

use crate::{
    axes::check_scatter_series,
    csv::RowTable,
    error::LoadError,
    json::collection_series,
    options::{PlotOptions, PlotType},
    series::Series,
};

/// Reads the input files and computes their sorted series.
///
/// Inputs are read as result tables. A single input that does not parse as
/// one is retried as a row table; if that fails too, both diagnostics are
/// reported. Scatter plots are validated before returning.
pub fn load_series<P>(paths: &[P], options: &PlotOptions) -> Result<Vec<Series>, LoadError>
where
    P: AsRef<Path>,
{
    let series = match paths {
        [] => return Err(LoadError::NoInput),
        [path] => match ResultCollection::load([path]) {
            Ok(mut collection) => collection_series(&mut collection, options)?,
            Err(json @ StatError::Parse { .. }) => {
                tracing::warn!("{json}; trying the row table format");
                RowTable::load(path)
                    .map_err(|csv| LoadError::FormatMismatch { json, csv })?
                    .series(options)?
            }
            Err(err) => return Err(err.into()),
        },
        paths => {
            let mut collection = ResultCollection::load(paths)?;
            collection_series(&mut collection, options)?
        }
    };

    if options.plot_type == PlotType::Scatter {
        check_scatter_series(&series)?;
    }
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_input() {
        let paths: [&Path; 0] = [];
        assert!(matches!(
            load_series(&paths, &PlotOptions::default()),
            Err(LoadError::NoInput)
        ));
    }
}
