use std::{
    collections::BTreeMap,
    io::{self, Write},
    path::PathBuf,
};

use anyhow::Context;
use clap::Args;
use mkplot_series::{AxisLimits, PlotOptions, PlotType, Series, VbsSpecs, load_series};
use mkplot_stat::Legend;
use serde::Serialize;

use crate::util::{self, Output};

#[derive(Debug, Clone, Args)]
pub(crate) struct PlotArg {
    /// Result tables, or a single row table
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Defaults file holding a `settings` object
    #[arg(long)]
    config: Option<PathBuf>,

    /// Time limit used for capping values
    #[arg(short, long)]
    timeout: Option<f64>,

    /// Record field to measure
    #[arg(short, long)]
    key: Option<String>,

    /// Preamble keys forming series labels (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    legend: Option<Vec<String>>,

    /// Preamble keys identifying tables to merge (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    join_key: Option<Vec<String>>,

    /// Virtual best solvers as a JSON object, e.g. '{"vbs": "all"}'
    #[arg(long, value_parser = util::parse_json::<VbsSpecs>)]
    vbs: Option<VbsSpecs>,

    /// Labels of the series to keep (comma-separated)
    #[arg(long, value_delimiter = ',')]
    only: Option<Vec<String>>,

    /// Label replacements as a JSON object, e.g. '{"old": "new"}'
    #[arg(long, value_parser = util::parse_json::<BTreeMap<String, String>>)]
    repls: Option<BTreeMap<String, String>>,

    /// Put the worst series first
    #[arg(short, long)]
    reverse: bool,

    /// Kind of plot (cactus or scatter)
    #[arg(short, long)]
    plot_type: Option<PlotType>,

    #[arg(long)]
    x_min: Option<f64>,
    #[arg(long)]
    y_min: Option<f64>,
    #[arg(long)]
    x_max: Option<f64>,
    #[arg(long)]
    y_max: Option<f64>,

    /// Print per-series statistics instead of the series
    #[arg(long)]
    dry_run: bool,

    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

impl PlotArg {
    /// Defaults file settings with command-line overrides applied.
    fn options(&self) -> anyhow::Result<PlotOptions> {
        let mut options = match &self.config {
            Some(path) => util::read_defaults_file(path)?.settings,
            None => PlotOptions::default(),
        };

        if let Some(timeout) = self.timeout {
            options.timeout = timeout;
        }
        if let Some(key) = &self.key {
            options.key.clone_from(key);
        }
        if let Some(legend) = &self.legend {
            options.legend = Legend::from(legend.clone());
        }
        if self.join_key.is_some() {
            options.join_key.clone_from(&self.join_key);
        }
        if self.vbs.is_some() {
            options.vbs.clone_from(&self.vbs);
        }
        if self.only.is_some() {
            options.only.clone_from(&self.only);
        }
        if self.repls.is_some() {
            options.repls.clone_from(&self.repls);
        }
        options.reverse |= self.reverse;
        if let Some(plot_type) = self.plot_type {
            options.plot_type = plot_type;
        }
        if let Some(y_min) = self.y_min {
            options.y_min = y_min;
        }
        options.x_min = self.x_min.or(options.x_min);
        options.x_max = self.x_max.or(options.x_max);
        options.y_max = self.y_max.or(options.y_max);

        Ok(options)
    }
}

/// Everything a renderer needs to draw the plot.
#[derive(Debug, Serialize)]
struct PlotData<'a> {
    options: &'a PlotOptions,
    limits: AxisLimits,
    series: &'a [Series],
}

pub(crate) fn run(arg: &PlotArg) -> anyhow::Result<()> {
    let options = arg.options()?;
    let series = load_series(&arg.files, &options).context("Failed to compute plot series")?;
    let limits = AxisLimits::resolve(&options, &series)?;
    tracing::info!("computed {} series of a {} plot", series.len(), options.plot_type);

    if arg.dry_run {
        let mut stdout = io::stdout().lock();
        write_summaries(&mut stdout, &series, options.timeout)
            .context("Failed to print series summaries")?;
        return Ok(());
    }

    let data = PlotData {
        options: &options,
        limits,
        series: &series,
    };
    Output::save_json(&data, arg.output.as_deref())
}

/// Per-series statistics of a dry run, values capped at `timeout`.
fn write_summaries<W>(writer: &mut W, series: &[Series], timeout: f64) -> io::Result<()>
where
    W: Write,
{
    for s in series {
        writeln!(writer, "{}:", s.label)?;
        writeln!(writer, "    # solved: {}", s.solved)?;
        if let Some(summary) = s.summary(timeout) {
            writeln!(writer, "    min. val: {:.1}", summary.min)?;
            writeln!(writer, "    max. val: {:.1}", summary.max)?;
            writeln!(writer, "    avg. val: {:.1}", summary.mean)?;
        }
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summaries_cap_values_at_timeout() {
        let series = [
            Series {
                label: "b".to_owned(),
                values: vec![2.0, 0.4],
                solved: 2,
                max_solved: 2.0,
            },
            Series {
                label: "a".to_owned(),
                values: vec![1.0, 100.0],
                solved: 1,
                max_solved: 1.0,
            },
        ];
        let mut out = vec![];
        write_summaries(&mut out, &series, 10.0).expect("write");

        let text = String::from_utf8(out).expect("utf-8");
        assert_eq!(
            text,
            "b:\n    # solved: 2\n    min. val: 0.4\n    max. val: 2.0\n    avg. val: 1.2\n\
             a:\n    # solved: 1\n    min. val: 1.0\n    max. val: 10.0\n    avg. val: 5.5\n"
        );
    }
}
