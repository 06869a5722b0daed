use fantaroster_core::{Formation, ObjectiveWeights, Player, PlayerId, Role, Roster};
use rand::Rng as _;
use serde::{Deserialize, Serialize};

use crate::{
    Candidate, ObjectiveBounds, ObjectiveScores, OptimizeError, OptimizerConfig, Population,
    evaluate_population,
};

/// One proposed single-player swap and its estimated payoff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapSuggestion {
    /// Rostered player to let go.
    pub remove: PlayerId,
    /// Pool player to bring in.
    pub add: PlayerId,
    /// Fitness change the swap would produce, measured in the final
    /// population's normalization context.
    pub expected_fitness_delta: f64,
}

/// Derives ranked swap suggestions for a candidate roster.
///
/// For every rostered player, considers the `top_alternatives` highest-scoring
/// same-role pool players that are not rostered and fit within the player's
/// cost plus the remaining budget headroom, keeps the best positive-delta
/// swap per player, and ranks all suggestions by delta, best first. Greedy by
/// construction: each suggestion assumes the rest of the roster stays put,
/// and multi-player exchanges are never explored.
#[must_use]
pub fn suggest_swaps(
    candidate: &Candidate,
    pool: &[Player],
    budget: u32,
    weights: &ObjectiveWeights,
    bounds: &ObjectiveBounds,
    top_alternatives: usize,
) -> Vec<SwapSuggestion> {
    let roster = candidate.roster();
    let base_fitness = bounds.fitness(candidate.objectives(), weights);
    let headroom = budget.saturating_sub(candidate.total_cost());

    let mut suggestions = Vec::new();
    for &slot in roster.slots() {
        let current = &pool[slot];
        let budget_cap = current.cost + headroom;

        let mut alternatives: Vec<usize> = (0..pool.len())
            .filter(|&i| {
                pool[i].role == current.role && !roster.contains(i) && pool[i].cost <= budget_cap
            })
            .collect();
        alternatives.sort_by(|&a, &b| {
            pool[b]
                .avg_score
                .total_cmp(&pool[a].avg_score)
                .then_with(|| pool[a].id.cmp(&pool[b].id))
        });
        alternatives.truncate(top_alternatives);

        let mut best_swap: Option<SwapSuggestion> = None;
        for alternative in alternatives {
            let swapped = roster.with_replacement(slot, alternative, pool);
            let scores = ObjectiveScores::of_roster(&swapped, pool);
            let delta = bounds.fitness(scores, weights) - base_fitness;
            if delta > 0.0
                && best_swap
                    .as_ref()
                    .is_none_or(|s| delta > s.expected_fitness_delta)
            {
                best_swap = Some(SwapSuggestion {
                    remove: current.id.clone(),
                    add: pool[alternative].id.clone(),
                    expected_fitness_delta: delta,
                });
            }
        }
        suggestions.extend(best_swap);
    }

    suggestions.sort_by(|a, b| {
        b.expected_fitness_delta
            .total_cmp(&a.expected_fitness_delta)
            .then_with(|| a.remove.cmp(&b.remove))
            .then_with(|| a.add.cmp(&b.add))
    });
    suggestions
}

/// Suggests improvements for an existing roster without running a full
/// optimization.
///
/// The formation is derived from the roster's own role counts, a reference
/// population is drafted and evaluated to establish the normalization
/// context, and the roster's swaps are scored against it. An over-budget
/// input roster gets no headroom: only alternatives at or below each
/// player's own cost are considered.
pub fn suggest_for_roster(
    pool: &[Player],
    budget: u32,
    roster: &Roster,
    weights: &ObjectiveWeights,
    config: &OptimizerConfig,
) -> Result<Vec<SwapSuggestion>, OptimizeError> {
    let counts = roster.role_counts(pool);
    let formation =
        Formation::from_quotas(Role::ALL.into_iter().map(|role| (role, counts[role.index()])));

    let seed = config.seed.unwrap_or_else(|| rand::rng().random());
    let mut rng = seed.into_rng();
    let mut population =
        Population::initialize(pool, budget, &formation, config.population_size, &mut rng)?;
    let bounds = evaluate_population(&mut population, weights);

    let candidate = Candidate::new(roster.clone(), pool);
    Ok(suggest_swaps(
        &candidate,
        pool,
        budget,
        weights,
        &bounds,
        config.top_alternatives,
    ))
}
