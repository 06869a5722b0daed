use fantaroster_core::ObjectiveWeights;
use fantaroster_stats::SampleStats;

use crate::{ObjectiveScores, Population};

/// Per-objective normalization bounds sampled from one population.
///
/// Objectives are min–max normalized *within the current population*, not
/// against a fixed global scale, so the configured weights keep their
/// relative meaning as the search converges. The bounds stay valid as a
/// scoring context after evaluation, which is how swap suggestions measure
/// fitness deltas against the final generation.
#[derive(Debug, Clone, Copy)]
pub struct ObjectiveBounds {
    performance: SampleStats,
    value: SampleStats,
    reliability: SampleStats,
}

impl ObjectiveBounds {
    /// Samples the bounds of all three objectives across a population.
    ///
    /// Returns `None` for an empty population.
    #[must_use]
    pub fn of_population(population: &Population) -> Option<Self> {
        let stats = |f: fn(&ObjectiveScores) -> f64| {
            SampleStats::new(
                population
                    .candidates()
                    .iter()
                    .map(move |c| f(&c.objectives())),
            )
        };
        Some(Self {
            performance: stats(|s| s.performance)?,
            value: stats(|s| s.value)?,
            reliability: stats(|s| s.reliability)?,
        })
    }

    /// Scores raw objectives against these bounds with the given weights.
    ///
    /// Each objective is min–max scaled; an objective whose population range
    /// is degenerate cannot discriminate between candidates and counts as
    /// 1.0 for everyone. Values outside the sampled bounds (possible when
    /// scoring rosters that were not part of the population) extrapolate
    /// beyond `[0, 1]`.
    #[must_use]
    pub fn fitness(&self, scores: ObjectiveScores, weights: &ObjectiveWeights) -> f64 {
        let norm = |stats: &SampleStats, value: f64| stats.normalized(value).unwrap_or(1.0);
        weights.performance * norm(&self.performance, scores.performance)
            + weights.value * norm(&self.value, scores.value)
            + weights.reliability * norm(&self.reliability, scores.reliability)
    }
}

/// Assigns population-relative fitness to every candidate and ranks them.
///
/// Returns the sampled [`ObjectiveBounds`] so callers can keep scoring
/// against the same context. Candidates end up sorted best-first by the
/// deterministic total order (fitness, then cost, then player identifiers).
///
/// # Panics
///
/// Panics if the population is empty; initialization never produces one.
pub fn evaluate_population(
    population: &mut Population,
    weights: &ObjectiveWeights,
) -> ObjectiveBounds {
    let bounds =
        ObjectiveBounds::of_population(population).expect("population is never empty");
    for candidate in population.candidates_mut() {
        let fitness = bounds.fitness(candidate.objectives(), weights);
        candidate.set_fitness(fitness);
    }
    population.rank();
    bounds
}

#[cfg(test)]
mod tests {
    use fantaroster_core::{Player, PlayerId, Role, Roster};

    use crate::Candidate;

    use super::*;

    fn player(id: &str, cost: u32, avg_score: f64, appearances: u32) -> Player {
        Player {
            id: PlayerId::new(id),
            role: Role::Midfielder,
            club: "Testese".to_owned(),
            cost,
            avg_score,
            appearances,
            goals: 0,
            assists: 0,
        }
    }

    /// Three single-slot rosters with distinct performance/value/reliability
    /// profiles.
    fn population_and_pool() -> (Population, Vec<Player>) {
        let pool = vec![
            player("star", 50, 8.0, 38),
            player("bargain", 5, 6.0, 20),
            player("benchwarmer", 10, 5.5, 10),
        ];
        let candidates = (0..pool.len())
            .map(|i| Candidate::new(Roster::new(vec![i], &pool), &pool))
            .collect();
        (Population::from_candidates(candidates), pool)
    }

    #[test]
    fn test_normalized_fitness_is_weighted_sum() {
        let (mut population, _pool) = population_and_pool();
        let weights = ObjectiveWeights::performance_only();
        evaluate_population(&mut population, &weights);

        // Performance-only weights: the best performer scores exactly 1.0,
        // the worst exactly 0.0.
        let fitnesses: Vec<f64> = population
            .candidates()
            .iter()
            .map(Candidate::fitness)
            .collect();
        assert_eq!(fitnesses[0], 1.0);
        assert_eq!(*fitnesses.last().unwrap(), 0.0);
    }

    #[test]
    fn test_best_candidate_first_after_evaluation() {
        let (mut population, _pool) = population_and_pool();
        let weights = ObjectiveWeights::performance_only();
        evaluate_population(&mut population, &weights);

        let best = population.best().unwrap();
        assert_eq!(best.id_key()[0], PlayerId::new("star"));
    }

    #[test]
    fn test_evaluation_is_idempotent_within_context() {
        let (mut population, _pool) = population_and_pool();
        let weights = ObjectiveWeights::default();

        let bounds = evaluate_population(&mut population, &weights);
        let first: Vec<f64> = population
            .candidates()
            .iter()
            .map(Candidate::fitness)
            .collect();

        // Re-scoring the same candidates in the same context changes nothing.
        for candidate in population.candidates() {
            let again = bounds.fitness(candidate.objectives(), &weights);
            assert_eq!(again, candidate.fitness());
        }
        evaluate_population(&mut population, &weights);
        let second: Vec<f64> = population
            .candidates()
            .iter()
            .map(Candidate::fitness)
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_degenerate_objective_counts_full_for_everyone() {
        let pool = vec![player("a", 10, 6.0, 20), player("b", 10, 6.0, 20)];
        let candidates = (0..pool.len())
            .map(|i| Candidate::new(Roster::new(vec![i], &pool), &pool))
            .collect();
        let mut population = Population::from_candidates(candidates);
        let weights = ObjectiveWeights::default();
        evaluate_population(&mut population, &weights);

        let expected = weights.performance + weights.value + weights.reliability;
        for candidate in population.candidates() {
            assert!((candidate.fitness() - expected).abs() < 1e-12);
        }
    }
}
