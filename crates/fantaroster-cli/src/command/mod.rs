use clap::{Parser, Subcommand};
use fantaroster_core::ObjectiveWeights;

use self::{
    compare_formations::CompareFormationsArg, optimize::OptimizeArg, suggest::SuggestArg,
};

mod compare_formations;
mod optimize;
mod suggest;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Build an optimal roster with the genetic optimizer
    Optimize(#[clap(flatten)] OptimizeArg),
    /// Suggest single-player upgrades for an existing roster
    Suggest(#[clap(flatten)] SuggestArg),
    /// Optimize every preset formation and rank the outcomes
    CompareFormations(#[clap(flatten)] CompareFormationsArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Optimize(arg) => optimize::run(&arg)?,
        Mode::Suggest(arg) => suggest::run(&arg)?,
        Mode::CompareFormations(arg) => compare_formations::run(&arg)?,
    }
    Ok(())
}

/// Objective weight flags shared by all subcommands.
#[derive(Debug, Clone, Copy, clap::Args)]
pub(crate) struct WeightArg {
    /// Relative weight of raw performance
    #[arg(long, default_value_t = ObjectiveWeights::default().performance)]
    performance_weight: f64,
    /// Relative weight of cost-efficiency
    #[arg(long, default_value_t = ObjectiveWeights::default().value)]
    value_weight: f64,
    /// Relative weight of reliability
    #[arg(long, default_value_t = ObjectiveWeights::default().reliability)]
    reliability_weight: f64,
}

impl WeightArg {
    pub(crate) fn to_weights(self) -> ObjectiveWeights {
        ObjectiveWeights {
            performance: self.performance_weight,
            value: self.value_weight,
            reliability: self.reliability_weight,
        }
    }
}
