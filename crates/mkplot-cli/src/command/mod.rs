use clap::{Parser, Subcommand};

use self::{plot::PlotArg, stat::StatMode};

mod plot;
mod stat;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What to do with the result files
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Compute cactus or scatter plot series
    Plot(#[clap(flatten)] PlotArg),
    /// Inspect, compare, and edit result tables
    #[command(subcommand)]
    Stat(StatMode),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Plot(arg) => plot::run(&arg)?,
        Mode::Stat(mode) => stat::run(&mode)?,
    }
    Ok(())
}
