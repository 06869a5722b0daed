//! Genetic roster optimizer.
//!
//! This crate searches the space of feasible rosters for a combination that
//! maximizes a weighted blend of three objectives: raw performance,
//! cost-efficiency and reliability. The search is a genetic algorithm over
//! roster genomes (per-role pool-index vectors) with explicit feasibility
//! repair.
//!
//! # Algorithm Overview
//!
//! One optimization call runs this cycle:
//!
//! 1. **Initialize** - Draft a population of feasible rosters per role,
//!    mixing uniform draws with draws biased toward points-per-credit
//! 2. **Evaluate** - Min–max normalize each objective within the population
//!    and assign every candidate a weighted fitness
//! 3. **Elitism** - Carry the top candidates into the next generation
//!    unchanged
//! 4. **Selection** - Pick parents by tournament
//! 5. **Crossover** - Inherit each role slot from either parent, with
//!    duplicate fallback
//! 6. **Mutation** - Occasionally swap one slot for a same-role alternative
//! 7. **Repair** - Any infeasible child is repaired or discarded
//!
//! The loop stops at the generation limit, on stagnation of the best fitness,
//! or when a caller-supplied deadline expires (a partial result, not an
//! error). The final best roster is annotated with ranked single-swap
//! improvement suggestions.
//!
//! # Determinism
//!
//! All randomness flows through a single seeded generator owned by the run:
//! identical pool, budget, formation, weights and seed reproduce the same
//! roster and fitness. Candidate ranking breaks fitness ties by lower cost,
//! then by lexicographic player identifiers, so ordering never depends on
//! memory layout or hash iteration.
//!
//! # Entry Point
//!
//! ```rust,ignore
//! use fantaroster_optimizer::{OptimizerConfig, build_optimal_team};
//!
//! let result = build_optimal_team(
//!     &pool,
//!     500,
//!     &"4-4-2".parse()?,
//!     &ObjectiveWeights::default(),
//!     &OptimizerConfig::default(),
//! )?;
//! println!("fitness {:.3}, cost {}", result.fitness, result.total_cost);
//! ```

pub use self::{
    controller::{
        Deadline, EvolutionRun, OptimizationResult, OptimizerConfig, Phase, build_optimal_team,
    },
    evaluate::{ObjectiveBounds, evaluate_population},
    evolve::Evolver,
    objective::ObjectiveScores,
    population::{Candidate, Population},
    suggest::{SwapSuggestion, suggest_for_roster, suggest_swaps},
};

use fantaroster_core::Role;

pub mod controller;
pub mod evaluate;
pub mod evolve;
pub mod objective;
pub mod population;
pub mod suggest;

/// Why an optimization call cannot produce any feasible roster.
///
/// Both infeasibility kinds are detected during initialization, before any
/// generation runs, and carry enough context to explain the failure without
/// inspecting optimizer internals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum OptimizeError {
    /// The player pool is empty.
    #[display("player pool is empty")]
    EmptyPool,
    /// A role quota exceeds the number of pool players with that role.
    #[display("formation needs {required} {role} players but the pool only has {available}")]
    InfeasibleFormation {
        role: Role,
        required: usize,
        available: usize,
    },
    /// Even the cheapest legal roster costs more than the budget.
    #[display(
        "cheapest legal roster costs {minimum_cost} but the budget is {budget} \
         (short by {shortfall})"
    )]
    InfeasibleBudget {
        minimum_cost: u32,
        budget: u32,
        shortfall: u32,
    },
}
