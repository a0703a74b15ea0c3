//! Axis limits derived from the configuration and the series
//!
//! Renderers draw within these limits; resolving them here lets conflicting
//! settings fail before any output is produced.

use serde::Serialize;

use crate::{
    error::SeriesError,
    options::{PlotOptions, PlotType},
    series::Series,
};

/// Resolved plot area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisLimits {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

/// Instance counts on the cactus X axis are rounded up to this step.
const CACTUS_X_STEP: f64 = 100.0;

impl AxisLimits {
    pub fn resolve(options: &PlotOptions, series: &[Series]) -> Result<Self, SeriesError> {
        match options.plot_type {
            PlotType::Cactus => Ok(Self::cactus(options, series)),
            PlotType::Scatter => Self::scatter(options, series),
        }
    }

    /// Cactus limits: X spans the instance counts, Y the running times.
    ///
    /// Without an explicit `x_max`, X ends at the largest solved count
    /// rounded up to a multiple of 100; without `y_max`, Y ends at the
    /// timeout.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn cactus(options: &PlotOptions, series: &[Series]) -> Self {
        let x_max = options.x_max.unwrap_or_else(|| {
            let most_solved = series.iter().map(|s| s.solved).max().unwrap_or(0);
            (most_solved as f64 / CACTUS_X_STEP).ceil() * CACTUS_X_STEP
        });
        Self {
            x_min: options.x_min.unwrap_or(0.0),
            x_max,
            y_min: options.y_min,
            y_max: options.y_max.unwrap_or(options.timeout),
        }
    }

    /// Scatter limits: both axes share the same range.
    ///
    /// An explicit `x_min` overrides `y_min`. The maxima must agree when both
    /// are set; when neither is, they default to the smallest power of ten
    /// (from 10 upwards) not below the timeout.
    pub fn scatter(options: &PlotOptions, series: &[Series]) -> Result<Self, SeriesError> {
        check_scatter_series(series)?;

        let min = match options.x_min {
            Some(x_min) if x_min != 0.0 => x_min,
            _ => options.y_min,
        };
        let max = match (nonzero(options.x_max), nonzero(options.y_max)) {
            (Some(x_max), Some(y_max)) if (x_max - y_max).abs() > f64::EPSILON => {
                return Err(SeriesError::ConflictingAxisMaxima { x_max, y_max });
            }
            (None, None) => {
                let mut max = 10.0;
                while max < options.timeout {
                    max *= 10.0;
                }
                max
            }
            (x_max, y_max) => x_max.or(y_max).unwrap_or_default(),
        };

        Ok(Self {
            x_min: min,
            x_max: max,
            y_min: min,
            y_max: max,
        })
    }
}

fn nonzero(value: Option<f64>) -> Option<f64> {
    value.filter(|&v| v != 0.0)
}

/// A scatter plot compares the first two series instance by instance.
pub fn check_scatter_series(series: &[Series]) -> Result<(), SeriesError> {
    let [first, second, ..] = series else {
        return Err(SeriesError::TooFewScatterSeries {
            count: series.len(),
        });
    };
    if first.values.len() != second.values.len() {
        return Err(SeriesError::UnequalScatterSeries {
            first: first.label.clone(),
            first_len: first.values.len(),
            second: second.label.clone(),
            second_len: second.values.len(),
        });
    }
    Ok(())
}
