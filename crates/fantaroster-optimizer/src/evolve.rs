use fantaroster_core::{Formation, Player, Roster};
use rand::{
    Rng,
    seq::{IndexedRandom as _, IteratorRandom as _},
};

use crate::{Candidate, Population};

/// Consecutive offspring repair failures tolerated before falling back to
/// cloning a tournament winner, so the generation always fills.
const MAX_CONSECUTIVE_REPAIR_FAILURES: usize = 25;

/// Controls how one generation produces the next.
///
/// The evolver is stateless: it holds the operator parameters and draws all
/// randomness from the generator passed into [`Evolver::evolve`].
#[derive(Debug, Clone, Copy)]
pub struct Evolver {
    /// Number of top candidates carried over unchanged (elitism).
    pub elite_count: usize,
    /// Tournament size for parent selection (larger = stronger pressure).
    pub tournament_size: usize,
    /// Probability that a child undergoes a one-slot mutation.
    pub mutation_rate: f64,
}

impl Evolver {
    /// Evolves the population into the next generation.
    ///
    /// 1. The top `elite_count` candidates are copied unchanged, which is
    ///    what keeps the best fitness from regressing.
    /// 2. The remainder is filled with tournament-selected parents combined
    ///    by per-role crossover, occasionally mutated, then validated and
    ///    repaired. Children that cannot be repaired are discarded and
    ///    resampled.
    ///
    /// # Panics
    ///
    /// Panics if the population is not ranked best-first (callers evaluate
    /// before evolving).
    #[must_use]
    pub fn evolve<R>(
        &self,
        population: &Population,
        pool: &[Player],
        budget: u32,
        formation: &Formation,
        rng: &mut R,
    ) -> Population
    where
        R: Rng + ?Sized,
    {
        let candidates = population.candidates();
        assert!(
            candidates.is_sorted_by(|a, b| a.fitness() >= b.fitness()),
            "population must be ranked before evolving"
        );

        let mut next: Vec<Candidate> =
            candidates[..self.elite_count.min(candidates.len())].to_vec();

        let mut failures = 0;
        while next.len() < candidates.len() {
            let p1 = tournament_select(candidates, self.tournament_size, rng);
            let p2 = tournament_select(candidates, self.tournament_size, rng);

            let mut child = crossover(p1.roster(), p2.roster(), pool, formation, rng);
            if rng.random_bool(self.mutation_rate) {
                mutate(&mut child, pool, rng);
            }

            if child.is_feasible(pool, budget, formation)
                || child.repair(pool, budget, formation, rng).is_ok()
            {
                next.push(Candidate::new(child, pool));
                failures = 0;
            } else {
                failures += 1;
                if failures >= MAX_CONSECUTIVE_REPAIR_FAILURES {
                    next.push(tournament_select(candidates, self.tournament_size, rng).clone());
                    failures = 0;
                }
            }
        }

        Population::from_candidates(next)
    }
}

/// Selects a parent by tournament.
///
/// Draws `tournament_size` distinct candidates uniformly at random and
/// returns the one with the highest fitness.
///
/// # Panics
///
/// Panics if `tournament_size` is zero or the population is empty.
pub fn tournament_select<'a, R>(
    candidates: &'a [Candidate],
    tournament_size: usize,
    rng: &mut R,
) -> &'a Candidate
where
    R: Rng + ?Sized,
{
    assert!(tournament_size > 0);
    candidates
        .choose_multiple(rng, tournament_size)
        .max_by(|a, b| a.fitness().total_cmp(&b.fitness()))
        .expect("tournament draws from a non-empty population")
}

/// Combines two parent rosters role bucket by role bucket.
///
/// Each slot inherits from either parent with equal probability. When the
/// inherited player is already on the child, the slot falls back to an
/// unused same-role player of the other parent, then to a random unused
/// pool player of that role.
pub fn crossover<R>(
    a: &Roster,
    b: &Roster,
    pool: &[Player],
    formation: &Formation,
    rng: &mut R,
) -> Roster
where
    R: Rng + ?Sized,
{
    let mut child: Vec<usize> = Vec::with_capacity(formation.roster_size());
    for (role, quota) in formation.quotas() {
        let from_a = a.role_slots(role, pool);
        let from_b = b.role_slots(role, pool);
        for slot in 0..quota {
            let (primary, secondary) = if rng.random_bool(0.5) {
                (&from_a, &from_b)
            } else {
                (&from_b, &from_a)
            };
            let gene = primary
                .get(slot)
                .copied()
                .filter(|g| !child.contains(g))
                .or_else(|| {
                    secondary
                        .iter()
                        .copied()
                        .filter(|g| !child.contains(g))
                        .choose(rng)
                })
                .or_else(|| {
                    (0..pool.len())
                        .filter(|&i| pool[i].role == role && !child.contains(&i))
                        .choose(rng)
                })
                .expect("role supply is checked before evolution");
            child.push(gene);
        }
    }
    Roster::new(child, pool)
}

/// Replaces one random slot with a same-role pool player not on the roster.
///
/// A no-op when the roster is empty or no alternative exists.
pub fn mutate<R>(roster: &mut Roster, pool: &[Player], rng: &mut R)
where
    R: Rng + ?Sized,
{
    let Some(&slot) = roster.slots().choose(rng) else {
        return;
    };
    let role = pool[slot].role;
    let replacement = (0..pool.len())
        .filter(|&i| pool[i].role == role && !roster.contains(i))
        .choose(rng);
    if let Some(replacement) = replacement {
        *roster = roster.with_replacement(slot, replacement, pool);
    }
}

#[cfg(test)]
mod tests {
    use fantaroster_core::{OptimizerSeed, PlayerId, Role};

    use crate::evaluate_population;

    use super::*;

    fn player(id: &str, role: Role, cost: u32, avg_score: f64) -> Player {
        Player {
            id: PlayerId::new(id),
            role,
            club: "Testese".to_owned(),
            cost,
            avg_score,
            appearances: 30,
            goals: 0,
            assists: 0,
        }
    }

    fn pool() -> Vec<Player> {
        vec![
            player("d0", Role::Defender, 10, 5.5),
            player("d1", Role::Defender, 14, 5.9),
            player("d2", Role::Defender, 18, 6.2),
            player("d3", Role::Defender, 26, 6.6),
            player("c0", Role::Midfielder, 12, 6.0),
            player("c1", Role::Midfielder, 16, 6.4),
            player("c2", Role::Midfielder, 24, 6.9),
            player("a0", Role::Forward, 20, 6.8),
            player("a1", Role::Forward, 34, 7.5),
        ]
    }

    fn formation() -> Formation {
        Formation::from_quotas([
            (Role::Defender, 2),
            (Role::Midfielder, 2),
            (Role::Forward, 1),
        ])
    }

    #[test]
    fn test_crossover_child_has_parent_structure() {
        let pool = pool();
        let formation = formation();
        let a = Roster::new(vec![0, 1, 4, 5, 7], &pool);
        let b = Roster::new(vec![2, 3, 5, 6, 8], &pool);
        let mut rng = OptimizerSeed::from_u64(3).into_rng();

        for _ in 0..50 {
            let child = crossover(&a, &b, &pool, &formation, &mut rng);
            let counts = child.role_counts(&pool);
            assert_eq!(counts[Role::Defender.index()], 2);
            assert_eq!(counts[Role::Midfielder.index()], 2);
            assert_eq!(counts[Role::Forward.index()], 1);
            // no duplicates: slots are sorted, adjacent equality would show
            assert!(child.slots().windows(2).all(|w| w[0] != w[1]));
        }
    }

    #[test]
    fn test_mutation_changes_one_slot_same_role() {
        let pool = pool();
        let original = Roster::new(vec![0, 1, 4, 5, 7], &pool);
        let mut rng = OptimizerSeed::from_u64(4).into_rng();

        for _ in 0..50 {
            let mut mutated = original.clone();
            mutate(&mut mutated, &pool, &mut rng);

            assert_eq!(mutated.role_counts(&pool), original.role_counts(&pool));
            let changed: Vec<_> = mutated
                .slots()
                .iter()
                .filter(|s| !original.contains(**s))
                .collect();
            assert!(changed.len() <= 1);
        }
    }

    #[test]
    fn test_mutation_is_noop_without_alternatives() {
        let pool = vec![player("a0", Role::Forward, 20, 6.8)];
        let mut roster = Roster::new(vec![0], &pool);
        let mut rng = OptimizerSeed::from_u64(5).into_rng();
        mutate(&mut roster, &pool, &mut rng);
        assert_eq!(roster.slots(), [0]);
    }

    #[test]
    fn test_evolve_preserves_size_and_feasibility() {
        let pool = pool();
        let formation = formation();
        let budget = 90;
        let mut rng = OptimizerSeed::from_u64(6).into_rng();
        let mut population =
            Population::initialize(&pool, budget, &formation, 30, &mut rng).unwrap();
        let weights = fantaroster_core::ObjectiveWeights::default();

        let evolver = Evolver {
            elite_count: 3,
            tournament_size: 3,
            mutation_rate: 0.15,
        };
        for _ in 0..5 {
            evaluate_population(&mut population, &weights);
            population = evolver.evolve(&population, &pool, budget, &formation, &mut rng);

            assert_eq!(population.len(), 30);
            for candidate in population.candidates() {
                assert!(candidate.roster().is_feasible(&pool, budget, &formation));
            }
        }
    }

    #[test]
    fn test_elites_survive_unchanged() {
        let pool = pool();
        let formation = formation();
        let budget = 120;
        let mut rng = OptimizerSeed::from_u64(7).into_rng();
        let mut population =
            Population::initialize(&pool, budget, &formation, 20, &mut rng).unwrap();
        let weights = fantaroster_core::ObjectiveWeights::default();
        evaluate_population(&mut population, &weights);

        let elites: Vec<Roster> = population.candidates()[..2]
            .iter()
            .map(|c| c.roster().clone())
            .collect();

        let evolver = Evolver {
            elite_count: 2,
            tournament_size: 3,
            mutation_rate: 0.15,
        };
        let next = evolver.evolve(&population, &pool, budget, &formation, &mut rng);

        for (i, elite) in elites.iter().enumerate() {
            assert_eq!(next.candidates()[i].roster(), elite);
        }
    }

    #[test]
    fn test_tournament_prefers_higher_fitness() {
        let pool = pool();
        let mut population =
            Population::initialize(&pool, 120, &formation(), 10, &mut OptimizerSeed::from_u64(8).into_rng())
                .unwrap();
        let weights = fantaroster_core::ObjectiveWeights::default();
        evaluate_population(&mut population, &weights);

        // A tournament spanning the whole population must return its best.
        let winner = tournament_select(
            population.candidates(),
            population.len(),
            &mut OptimizerSeed::from_u64(9).into_rng(),
        );
        assert_eq!(winner.fitness(), population.best().unwrap().fitness());
    }
}
