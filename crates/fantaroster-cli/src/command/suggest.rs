use std::path::PathBuf;

use anyhow::bail;
use fantaroster_core::{OptimizerSeed, Player, Roster};
use fantaroster_optimizer::{OptimizerConfig, suggest_for_roster};
use rand::Rng as _;

use crate::{command::WeightArg, model::pool::load_pool, util::Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SuggestArg {
    /// Player pool JSON file
    #[arg(long)]
    pool: PathBuf,
    /// Names of the currently rostered players
    #[arg(long, required = true, num_args = 1..)]
    players: Vec<String>,
    /// Budget in credits
    #[arg(long, default_value_t = 500)]
    budget: u32,
    #[clap(flatten)]
    weights: WeightArg,
    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &SuggestArg) -> anyhow::Result<()> {
    let pool = load_pool(&arg.pool)?;
    let roster = resolve_roster(&pool, &arg.players)?;
    eprintln!(
        "Scoring {} rostered players against a pool of {}...",
        roster.len(),
        pool.len()
    );

    let seed = arg
        .seed
        .map_or_else(|| rand::rng().random(), OptimizerSeed::from_u64);
    let config = OptimizerConfig {
        seed: Some(seed),
        ..OptimizerConfig::default()
    };
    let weights = arg.weights.to_weights();

    let suggestions = suggest_for_roster(&pool, arg.budget, &roster, &weights, &config)?;

    if suggestions.is_empty() {
        eprintln!("No single swap improves this roster within the budget.");
    } else {
        eprintln!("Suggested upgrades, best first:");
        for suggestion in &suggestions {
            eprintln!(
                "  {} -> {} ({:+.3})",
                suggestion.remove, suggestion.add, suggestion.expected_fitness_delta
            );
        }
    }

    Output::save_json(&suggestions, arg.output.clone())?;
    Ok(())
}

/// Maps player names to pool indices, rejecting unknown or repeated names.
fn resolve_roster(pool: &[Player], names: &[String]) -> anyhow::Result<Roster> {
    let mut slots = Vec::with_capacity(names.len());
    for name in names {
        let Some(index) = pool.iter().position(|p| p.id.as_str() == name) else {
            bail!("player {name:?} is not in the pool");
        };
        if slots.contains(&index) {
            bail!("player {name:?} is listed twice");
        }
        slots.push(index);
    }
    Ok(Roster::new(slots, pool))
}
