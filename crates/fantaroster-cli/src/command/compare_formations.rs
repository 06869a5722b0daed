use std::path::PathBuf;

use fantaroster_core::{Formation, OptimizerSeed, PlayerId};
use fantaroster_optimizer::{OptimizerConfig, build_optimal_team};
use rand::Rng as _;
use serde::{Deserialize, Serialize};

use crate::{command::WeightArg, model::pool::load_pool, util::Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct CompareFormationsArg {
    /// Player pool JSON file
    #[arg(long)]
    pool: PathBuf,
    /// Budget in credits
    #[arg(long, default_value_t = 500)]
    budget: u32,
    #[clap(flatten)]
    weights: WeightArg,
    /// Generation limit per formation
    #[arg(long, default_value_t = 30)]
    generations: usize,
    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

/// One formation's optimization outcome, for the ranked comparison.
///
/// Formations are ranked by raw performance sum: fitness values are
/// normalized within each run's own population and are not comparable
/// across formations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct FormationOutcome {
    formation: String,
    performance: f64,
    total_cost: u32,
    roster: Vec<PlayerId>,
}

pub(crate) fn run(arg: &CompareFormationsArg) -> anyhow::Result<()> {
    let pool = load_pool(&arg.pool)?;
    eprintln!("Loaded {} players from {}", pool.len(), arg.pool.display());

    let seed = arg
        .seed
        .map_or_else(|| rand::rng().random(), OptimizerSeed::from_u64);
    let weights = arg.weights.to_weights();

    let mut outcomes = Vec::new();
    for (name, formation) in Formation::PRESETS {
        // every formation starts from the same seed for a fair comparison
        let config = OptimizerConfig {
            max_generations: arg.generations,
            seed: Some(seed),
            ..OptimizerConfig::default()
        };
        match build_optimal_team(&pool, arg.budget, &formation, &weights, &config) {
            Ok(result) => {
                eprintln!(
                    "  {name}: performance {:.1}, cost {}",
                    result.objective_scores.performance, result.total_cost
                );
                outcomes.push(FormationOutcome {
                    formation: name.to_owned(),
                    performance: result.objective_scores.performance,
                    total_cost: result.total_cost,
                    roster: result.roster,
                });
            }
            Err(err) => eprintln!("  {name}: skipped ({err})"),
        }
    }

    outcomes.sort_by(|a, b| b.performance.total_cmp(&a.performance));

    if let Some(best) = outcomes.first() {
        eprintln!();
        eprintln!(
            "Best formation: {} with performance {:.1}",
            best.formation, best.performance
        );
    }

    Output::save_json(&outcomes, arg.output.clone())?;
    Ok(())
}
