//! Result table maintenance commands
//!
//! Listing and comparing instances, selecting results by a criterion,
//! invalidating results after the fact, and writing virtual best solver
//! tables.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Subcommand};
use mkplot_stat::{
    Criterion, DEFAULT_VBS_LABEL, FailureSign, Legend, ListKind, ResultCollection, ToolSelection,
    VirtualBest,
};

use crate::util::Output;

#[derive(Debug, Clone, Subcommand)]
pub(crate) enum StatMode {
    /// List instances, or the tools that solved or failed each of them
    List(#[clap(flatten)] ListArg),
    /// Print solved results matching a criterion such as 'rtime>=100'
    Select(#[clap(flatten)] SelectArg),
    /// Report instances whose solved results disagree on a key
    Compare(#[clap(flatten)] CompareArg),
    /// Mark results carrying a failure sign as unsolved, in place
    Update(#[clap(flatten)] UpdateArg),
    /// Write the virtual best solver table of the inputs
    Vbs(#[clap(flatten)] VbsArg),
}

#[derive(Debug, Clone, Args)]
pub(crate) struct ListArg {
    /// Result tables
    #[arg(required = true)]
    files: Vec<PathBuf>,
    /// Which instances to list (all, solved, or failed)
    #[arg(long, default_value = "all")]
    kind: ListKind,
}

#[derive(Debug, Clone, Args)]
pub(crate) struct SelectArg {
    /// Result tables
    #[arg(required = true)]
    files: Vec<PathBuf>,
    /// Condition on a numeric field, e.g. 'rtime>=100'
    #[arg(short, long)]
    criterion: Criterion,
}

#[derive(Debug, Clone, Args)]
pub(crate) struct CompareArg {
    /// Result tables
    #[arg(required = true)]
    files: Vec<PathBuf>,
    /// Record field to compare
    #[arg(short, long)]
    key: String,
}

#[derive(Debug, Clone, Args)]
pub(crate) struct UpdateArg {
    /// Result tables, rewritten in place
    #[arg(required = true)]
    files: Vec<PathBuf>,
    /// Field whose presence marks a failure; 'no-<field>' marks its absence
    #[arg(short, long)]
    sign: FailureSign,
}

#[derive(Debug, Clone, Args)]
pub(crate) struct VbsArg {
    /// Result tables
    #[arg(required = true)]
    files: Vec<PathBuf>,
    /// Program name of the synthesized table
    #[arg(long, default_value = DEFAULT_VBS_LABEL)]
    label: String,
    /// Labels of the tools to combine (comma-separated); all tools if omitted
    #[arg(long, value_delimiter = ',')]
    tools: Option<Vec<String>>,
    /// Preamble keys forming tool labels (comma-separated)
    #[arg(long, value_delimiter = ',', default_value = "program")]
    legend: Vec<String>,
    /// Running time recorded for instances no tool solved
    #[arg(short, long, default_value_t = 3600.0)]
    timeout: f64,
    /// Lower bound of the best running time
    #[arg(long, default_value_t = 0.0)]
    floor: f64,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(mode: &StatMode) -> anyhow::Result<()> {
    match mode {
        StatMode::List(arg) => list(arg),
        StatMode::Select(arg) => select(arg),
        StatMode::Compare(arg) => compare(arg),
        StatMode::Update(arg) => update(arg),
        StatMode::Vbs(arg) => vbs(arg),
    }
}

fn load(files: &[PathBuf]) -> anyhow::Result<ResultCollection> {
    ResultCollection::load(files).context("Failed to load result tables")
}

fn list(arg: &ListArg) -> anyhow::Result<()> {
    let collection = load(&arg.files)?;
    for listing in collection.listing(arg.kind) {
        if listing.tools.is_empty() {
            println!("{}", listing.instance);
        } else {
            println!("{}: {}", listing.instance, listing.tools.join(", "));
        }
    }
    Ok(())
}

fn select(arg: &SelectArg) -> anyhow::Result<()> {
    let collection = load(&arg.files)?;
    for (table, instance, value) in collection.select(&arg.criterion) {
        println!("{} {instance} {value}", table.origin_display());
    }
    Ok(())
}

fn compare(arg: &CompareArg) -> anyhow::Result<()> {
    let collection = load(&arg.files)?;
    let disagreements = collection.compare(&arg.key);
    for disagreement in &disagreements {
        println!("{}:", disagreement.instance);
        for (value, origins) in &disagreement.values {
            println!("  {value}: {}", origins.join(", "));
        }
    }
    eprintln!(
        "{} instance(s) with different values for '{}'",
        disagreements.len(),
        arg.key
    );
    Ok(())
}

fn update(arg: &UpdateArg) -> anyhow::Result<()> {
    let mut collection = load(&arg.files)?;
    let flipped = collection
        .update_status(&arg.sign)
        .context("Failed to update result tables")?;
    eprintln!("{flipped} result(s) marked as unsolved");
    Ok(())
}

fn vbs(arg: &VbsArg) -> anyhow::Result<()> {
    let mut collection = load(&arg.files)?;
    let selection = match &arg.tools {
        Some(tools) => tools.iter().collect(),
        None => ToolSelection::All,
    };
    let spec = VirtualBest::new(selection, arg.timeout)
        .with_label(arg.label.as_str())
        .with_floor(arg.floor);

    let table = collection
        .synthesize_vbs(&spec, &Legend::from(arg.legend.clone()))
        .context("Failed to synthesize the virtual best solver")?;
    let mut output = Output::from_output_path(arg.output.as_deref())?;
    output.write_table(table)
}
