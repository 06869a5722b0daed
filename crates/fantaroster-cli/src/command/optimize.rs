use std::{path::PathBuf, time::Duration};

use chrono::Utc;
use fantaroster_core::{Formation, OptimizerSeed, Player, PlayerId, Role};
use fantaroster_optimizer::{Deadline, OptimizationResult, OptimizerConfig, build_optimal_team};
use rand::Rng as _;

use crate::{
    command::WeightArg,
    model::{pool::load_pool, report},
    util::Output,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct OptimizeArg {
    /// Player pool JSON file
    #[arg(long)]
    pool: PathBuf,
    /// Formation in D-C-A form, e.g. 3-5-2
    #[arg(long, default_value = "4-4-2")]
    formation: Formation,
    /// Budget in credits
    #[arg(long, default_value_t = 500)]
    budget: u32,
    #[clap(flatten)]
    weights: WeightArg,
    /// Generation limit
    #[arg(long, default_value_t = 50)]
    generations: usize,
    /// Candidates per generation
    #[arg(long, default_value_t = 100)]
    population: usize,
    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,
    /// Stop after this many seconds and keep the best roster found
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &OptimizeArg) -> anyhow::Result<()> {
    let pool = load_pool(&arg.pool)?;
    eprintln!("Loaded {} players from {}", pool.len(), arg.pool.display());

    let seed = arg
        .seed
        .map_or_else(|| rand::rng().random(), OptimizerSeed::from_u64);
    let weights = arg.weights.to_weights();
    let config = OptimizerConfig {
        max_generations: arg.generations,
        population_size: arg.population,
        seed: Some(seed),
        deadline: arg
            .timeout_secs
            .map(|secs| Deadline::after(Duration::from_secs(secs))),
        ..OptimizerConfig::default()
    };

    eprintln!(
        "Optimizing formation {} with budget {}...",
        arg.formation, arg.budget
    );
    let result = build_optimal_team(&pool, arg.budget, &arg.formation, &weights, &config)?;

    print_result(&pool, &result, arg.budget);

    let recommendations = report::recommendations(&pool, &result, arg.budget);
    eprintln!("Recommendations:");
    for note in &recommendations {
        eprintln!("  - {note}");
    }

    let report = report::OptimizationReport {
        formation: arg.formation.to_string(),
        budget: arg.budget,
        optimized_at: Utc::now(),
        seed,
        weights,
        result,
        recommendations,
    };
    Output::save_json(&report, arg.output.clone())?;

    if let Some(path) = &arg.output {
        eprintln!();
        eprintln!("Report saved to {}", path.display());
    }
    Ok(())
}

fn print_result(pool: &[Player], result: &OptimizationResult, budget: u32) {
    eprintln!();
    if result.partial {
        eprintln!("Deadline reached; reporting the best roster found so far.");
    }
    eprintln!(
        "Best roster after {} generations (fitness {:.3}, cost {}/{budget}):",
        result.generations_run, result.fitness, result.total_cost
    );
    for role in Role::ALL {
        let line = roster_line(pool, &result.roster, role);
        if !line.is_empty() {
            eprintln!("  {role}: {line}");
        }
    }
    eprintln!(
        "  Objectives: performance {:.1}, value {:.3}, reliability {:.1}",
        result.objective_scores.performance,
        result.objective_scores.value,
        result.objective_scores.reliability,
    );

    if !result.suggestions.is_empty() {
        eprintln!("Suggested upgrades:");
        for suggestion in &result.suggestions {
            eprintln!(
                "  {} -> {} ({:+.3})",
                suggestion.remove, suggestion.add, suggestion.expected_fitness_delta
            );
        }
    }
}

fn roster_line(pool: &[Player], roster: &[PlayerId], role: Role) -> String {
    let names: Vec<&str> = roster
        .iter()
        .filter(|id| {
            pool.iter()
                .find(|p| p.id == **id)
                .is_some_and(|p| p.role == role)
        })
        .map(PlayerId::as_str)
        .collect();
    names.join(", ")
}
