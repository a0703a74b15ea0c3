//! Series handed to renderers, and their post-processing
//!
//! A [`Series`] is one line of a cactus plot (or one axis of a scatter
//! plot): a label, one value per instance, the number of solved instances,
//! and the largest solved value observed before capping.
//!
//! # Ordering
//!
//! Series are ordered by the composite key
//!
//! ```text
//! solved + len(values) / sum(values)
//! ```
//!
//! The second term is below one for any series whose values sum to more
//! than its length, so it only breaks ties between series solving the same
//! number of instances, preferring the faster one. By default the best
//! series comes first; `reverse` yields exactly the opposite sequence.

use serde::Serialize;

use crate::options::PlotOptions;

/// One labeled series of per-instance values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub label: String,
    pub values: Vec<f64>,
    /// Number of instances solved within the timeout.
    pub solved: usize,
    /// Largest solved value seen before capping, or `-1` if nothing was
    /// solved.
    pub max_solved: f64,
}

/// Value of `max_solved` when no instance was solved.
pub const NOTHING_SOLVED: f64 = -1.0;

impl Series {
    /// Composite sort key: solved count plus inverse mean value.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn sort_key(&self) -> f64 {
        let sum = self.values.iter().sum::<f64>();
        let ratio = if self.values.is_empty() {
            0.0
        } else {
            self.values.len() as f64 / sum
        };
        self.solved as f64 + ratio
    }

    /// Summary statistics of the values capped at `timeout`.
    #[must_use]
    pub fn summary(&self, timeout: f64) -> Option<SeriesSummary> {
        SeriesSummary::new(self, timeout)
    }
}

/// Forces a solved value into `[floor, ceiling]`.
///
/// Values at or above the ceiling become the ceiling; values at or below the
/// floor become the floor.
#[must_use]
pub fn clamp(value: f64, floor: f64, ceiling: f64) -> f64 {
    if value >= ceiling {
        ceiling
    } else if value <= floor {
        floor
    } else {
        value
    }
}

/// Incrementally builds a series from per-instance outcomes.
#[derive(Debug, Clone)]
pub(crate) struct SeriesBuilder {
    values: Vec<f64>,
    solved: usize,
    max_solved: f64,
}

impl SeriesBuilder {
    pub(crate) fn new() -> Self {
        Self {
            values: vec![],
            solved: 0,
            max_solved: NOTHING_SOLVED,
        }
    }

    /// Records a solved instance; `value` is tracked raw and stored clamped.
    pub(crate) fn push_solved(&mut self, value: f64, options: &PlotOptions) {
        if value.is_finite() && value > self.max_solved {
            self.max_solved = value;
        }
        self.values
            .push(clamp(value, options.floor(), options.timeout));
        self.solved += 1;
    }

    pub(crate) fn push_unsolved(&mut self, options: &PlotOptions) {
        self.values.push(options.unsolved_value());
    }

    pub(crate) fn build(self, label: String) -> Series {
        Series {
            label,
            values: self.values,
            solved: self.solved,
            max_solved: self.max_solved,
        }
    }
}

/// Sorts series by [`Series::sort_key`], best first unless `reverse`.
pub fn sort_series(series: &mut [Series], reverse: bool) {
    series.sort_by(|a, b| a.sort_key().total_cmp(&b.sort_key()));
    if !reverse {
        series.reverse();
    }
}

/// Descriptive statistics of a series, as printed by a dry run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSummary {
    pub solved: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl SeriesSummary {
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new(series: &Series, timeout: f64) -> Option<Self> {
        let capped = series.values.iter().map(|v| v.min(timeout));
        let min = capped.clone().min_by(f64::total_cmp)?;
        let max = capped.clone().max_by(f64::total_cmp)?;
        let mean = capped.sum::<f64>() / series.values.len() as f64;
        Some(Self {
            solved: series.solved,
            min,
            max,
            mean,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(label: &str, values: &[f64], solved: usize) -> Series {
        Series {
            label: label.to_owned(),
            values: values.to_vec(),
            solved,
            max_solved: NOTHING_SOLVED,
        }
    }

    #[test]
    fn test_clamp_bounds_inclusive() {
        assert!((clamp(20.0, 0.1, 10.0) - 10.0).abs() < f64::EPSILON);
        assert!((clamp(10.0, 0.1, 10.0) - 10.0).abs() < f64::EPSILON);
        assert!((clamp(0.1, 0.1, 10.0) - 0.1).abs() < f64::EPSILON);
        assert!((clamp(0.0, 0.1, 10.0) - 0.1).abs() < f64::EPSILON);
        assert!((clamp(5.0, 0.1, 10.0) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_sort_prefers_more_solved_then_faster() {
        let mut list = vec![
            series("slow", &[5.0, 5.0, 100.0], 2),
            series("best", &[1.0, 1.0, 1.0], 3),
            series("fast", &[1.0, 1.0, 100.0], 2),
        ];
        sort_series(&mut list, false);
        let labels = list.iter().map(|s| s.label.as_str()).collect::<Vec<_>>();
        assert_eq!(labels, ["best", "fast", "slow"]);

        sort_series(&mut list, true);
        let labels = list.iter().map(|s| s.label.as_str()).collect::<Vec<_>>();
        assert_eq!(labels, ["slow", "fast", "best"]);
    }

    #[test]
    fn test_empty_series_key_is_solved_count() {
        let empty = series("empty", &[], 0);
        assert!(empty.sort_key().abs() < f64::EPSILON);
        assert!(empty.summary(10.0).is_none());
    }

    #[test]
    fn test_summary_caps_at_timeout() {
        let s = series("s", &[1.0, 3.0, 100.0], 2);
        let summary = s.summary(10.0).expect("summary");
        assert_eq!(summary.solved, 2);
        assert!((summary.min - 1.0).abs() < f64::EPSILON);
        assert!((summary.max - 10.0).abs() < f64::EPSILON);
        assert!((summary.mean - 14.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_builder_tracks_raw_maximum() {
        let options = PlotOptions {
            timeout: 10.0,
            ..PlotOptions::default()
        };
        let mut builder = SeriesBuilder::new();
        builder.push_solved(12.0, &options);
        builder.push_solved(0.0, &options);
        builder.push_unsolved(&options);
        let s = builder.build("t".to_owned());

        assert_eq!(s.solved, 2);
        assert!((s.max_solved - 12.0).abs() < f64::EPSILON);
        assert_eq!(s.values, [10.0, options.floor(), 100.0]);
    }
}
