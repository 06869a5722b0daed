use fantaroster_core::{Formation, Player, PlayerId, Roster};
use fantaroster_stats::SampleStats;
use rand::{Rng, seq::IndexedRandom as _};

use crate::{ObjectiveScores, OptimizeError};

/// Share of initial draws made uniformly at random instead of value-biased.
///
/// The uniform minority preserves genetic diversity; the biased majority
/// seeds the population with competitive rosters.
const UNIFORM_DRAW_SHARE: f64 = 0.2;

/// Floor for sampling weights so players with zero points-per-credit stay
/// reachable in biased draws.
const MIN_SAMPLE_WEIGHT: f64 = 0.01;

/// Draft retries per population slot before falling back to the cheapest
/// legal roster.
const MAX_DRAFT_ATTEMPTS: usize = 20;

/// A single candidate solution: one feasible roster plus its scores.
///
/// Raw objective scores, total cost and the sorted identifier key are fixed
/// at construction (the roster never changes once wrapped); fitness is
/// population-relative and assigned by
/// [`evaluate_population`](crate::evaluate_population) each generation.
#[derive(Debug, Clone)]
pub struct Candidate {
    roster: Roster,
    objectives: ObjectiveScores,
    total_cost: u32,
    id_key: Vec<PlayerId>,
    fitness: f64,
}

impl Candidate {
    /// Wraps a roster, computing its raw scores and ranking keys.
    #[must_use]
    pub fn new(roster: Roster, pool: &[Player]) -> Self {
        let objectives = ObjectiveScores::of_roster(&roster, pool);
        let total_cost = roster.total_cost(pool);
        let id_key = roster.sorted_ids(pool);
        Self {
            roster,
            objectives,
            total_cost,
            id_key,
            fitness: f64::MIN,
        }
    }

    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Raw, pre-normalization objective scores.
    #[must_use]
    pub fn objectives(&self) -> ObjectiveScores {
        self.objectives
    }

    #[must_use]
    pub fn total_cost(&self) -> u32 {
        self.total_cost
    }

    /// Population-relative fitness assigned during the last evaluation.
    #[must_use]
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    pub(crate) fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }

    /// Sorted player identifiers, the deterministic final ranking tie-break.
    pub(crate) fn id_key(&self) -> &[PlayerId] {
        &self.id_key
    }
}

/// A fixed-size collection of candidates for one generation.
#[derive(Debug, Clone)]
pub struct Population {
    candidates: Vec<Candidate>,
}

impl Population {
    /// Drafts the initial population of feasible rosters.
    ///
    /// Infeasibility is diagnosed up front, before any drafting: a role
    /// quota larger than the pool's supply fails with
    /// [`OptimizeError::InfeasibleFormation`], and a cheapest-legal-roster
    /// cost above the budget fails with [`OptimizeError::InfeasibleBudget`].
    /// Once those checks pass a feasible roster is guaranteed to exist, so
    /// slots that exhaust their draft attempts fall back to that cheapest
    /// roster instead of retrying forever.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    pub fn initialize<R>(
        pool: &[Player],
        budget: u32,
        formation: &Formation,
        size: usize,
        rng: &mut R,
    ) -> Result<Self, OptimizeError>
    where
        R: Rng + ?Sized,
    {
        assert!(size > 0, "population size must be positive");
        check_pool_supports(pool, budget, formation)?;

        let candidates = (0..size)
            .map(|_| Candidate::new(draft_feasible(pool, budget, formation, rng), pool))
            .collect();
        Ok(Self { candidates })
    }

    pub(crate) fn from_candidates(candidates: Vec<Candidate>) -> Self {
        Self { candidates }
    }

    /// All candidates, ranked best-first after evaluation.
    #[must_use]
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// The top-ranked candidate. Meaningful after evaluation has sorted the
    /// population.
    #[must_use]
    pub fn best(&self) -> Option<&Candidate> {
        self.candidates.first()
    }

    /// Fitness distribution of the current generation.
    #[must_use]
    pub fn fitness_stats(&self) -> Option<SampleStats> {
        SampleStats::new(self.candidates.iter().map(Candidate::fitness))
    }

    pub(crate) fn candidates_mut(&mut self) -> &mut [Candidate] {
        &mut self.candidates
    }

    /// Sorts candidates best-first with the deterministic total order:
    /// fitness descending, then total cost ascending, then lexicographic
    /// player identifiers.
    pub(crate) fn rank(&mut self) {
        self.candidates.sort_by(|a, b| {
            b.fitness()
                .total_cmp(&a.fitness())
                .then_with(|| a.total_cost().cmp(&b.total_cost()))
                .then_with(|| a.id_key().cmp(b.id_key()))
        });
    }
}

/// Verifies the pool can field the formation within budget at all.
fn check_pool_supports(
    pool: &[Player],
    budget: u32,
    formation: &Formation,
) -> Result<(), OptimizeError> {
    if pool.is_empty() {
        return Err(OptimizeError::EmptyPool);
    }

    let mut minimum_cost = 0;
    for (role, quota) in formation.quotas() {
        let mut costs: Vec<u32> = pool
            .iter()
            .filter(|p| p.role == role)
            .map(|p| p.cost)
            .collect();
        if costs.len() < quota {
            return Err(OptimizeError::InfeasibleFormation {
                role,
                required: quota,
                available: costs.len(),
            });
        }
        costs.sort_unstable();
        minimum_cost += costs[..quota].iter().sum::<u32>();
    }

    if minimum_cost > budget {
        return Err(OptimizeError::InfeasibleBudget {
            minimum_cost,
            budget,
            shortfall: minimum_cost - budget,
        });
    }
    Ok(())
}

/// Drafts one feasible roster, repairing or resampling infeasible drafts.
fn draft_feasible<R>(pool: &[Player], budget: u32, formation: &Formation, rng: &mut R) -> Roster
where
    R: Rng + ?Sized,
{
    for _ in 0..MAX_DRAFT_ATTEMPTS {
        let mut roster = draft(pool, formation, rng);
        if roster.is_feasible(pool, budget, formation)
            || roster.repair(pool, budget, formation, rng).is_ok()
        {
            return roster;
        }
    }
    cheapest_legal_roster(pool, formation)
}

/// Samples one roster per the mixed strategy, ignoring the budget.
///
/// Per role bucket: each slot is drawn uniformly with probability
/// [`UNIFORM_DRAW_SHARE`], otherwise weighted by points-per-credit.
/// Duplicates within a role are excluded during sampling, so the draft only
/// ever violates the budget constraint.
fn draft<R>(pool: &[Player], formation: &Formation, rng: &mut R) -> Roster
where
    R: Rng + ?Sized,
{
    let mut slots = Vec::with_capacity(formation.roster_size());
    for (role, quota) in formation.quotas() {
        let bucket: Vec<usize> = (0..pool.len()).filter(|&i| pool[i].role == role).collect();
        let mut chosen: Vec<usize> = Vec::with_capacity(quota);
        while chosen.len() < quota {
            let unused: Vec<usize> = bucket
                .iter()
                .copied()
                .filter(|i| !chosen.contains(i))
                .collect();
            let pick = if rng.random_bool(UNIFORM_DRAW_SHARE) {
                *unused
                    .choose(rng)
                    .expect("role supply is checked before drafting")
            } else {
                *unused
                    .choose_weighted(rng, |&i| pool[i].value_score().max(MIN_SAMPLE_WEIGHT))
                    .expect("sampling weights are floored above zero")
            };
            chosen.push(pick);
        }
        slots.extend(chosen);
    }
    Roster::new(slots, pool)
}

/// The cheapest roster satisfying the formation: per role, the `quota`
/// cheapest players (ties broken by higher score, then pool order).
fn cheapest_legal_roster(pool: &[Player], formation: &Formation) -> Roster {
    let mut slots = Vec::with_capacity(formation.roster_size());
    for (role, quota) in formation.quotas() {
        let mut bucket: Vec<usize> = (0..pool.len()).filter(|&i| pool[i].role == role).collect();
        bucket.sort_by(|&a, &b| {
            pool[a]
                .cost
                .cmp(&pool[b].cost)
                .then(pool[b].avg_score.total_cmp(&pool[a].avg_score))
                .then(a.cmp(&b))
        });
        slots.extend(&bucket[..quota]);
    }
    Roster::new(slots, pool)
}

#[cfg(test)]
mod tests {
    use fantaroster_core::{OptimizerSeed, Role};

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

    fn small_pool() -> Vec<Player> {
        vec![
            player("d0", Role::Defender, 10, 5.5),
            player("d1", Role::Defender, 15, 6.0),
            player("d2", Role::Defender, 25, 6.4),
            player("c0", Role::Midfielder, 12, 6.1),
            player("c1", Role::Midfielder, 20, 6.8),
            player("a0", Role::Forward, 30, 7.2),
            player("a1", Role::Forward, 18, 6.6),
        ]
    }

    fn formation() -> Formation {
        Formation::from_quotas([
            (Role::Defender, 2),
            (Role::Midfielder, 1),
            (Role::Forward, 1),
        ])
    }

    #[test]
    fn test_initialize_produces_feasible_population() {
        let pool = small_pool();
        let mut rng = OptimizerSeed::from_u64(1).into_rng();
        let population =
            Population::initialize(&pool, 80, &formation(), 40, &mut rng).unwrap();

        assert_eq!(population.len(), 40);
        for candidate in population.candidates() {
            assert!(candidate.roster().is_feasible(&pool, 80, &formation()));
        }
    }

    #[test]
    fn test_initialize_rejects_role_shortage() {
        let pool = small_pool();
        let needy = Formation::from_quotas([(Role::Defender, 4)]);
        let mut rng = OptimizerSeed::from_u64(1).into_rng();
        let err = Population::initialize(&pool, 500, &needy, 10, &mut rng).unwrap_err();

        assert_eq!(
            err,
            OptimizeError::InfeasibleFormation {
                role: Role::Defender,
                required: 4,
                available: 3,
            }
        );
    }

    #[test]
    fn test_initialize_rejects_impossible_budget() {
        let pool = small_pool();
        // Cheapest legal roster: d0 + d1 + c0 + a1 = 55.
        let mut rng = OptimizerSeed::from_u64(1).into_rng();
        let err = Population::initialize(&pool, 54, &formation(), 10, &mut rng).unwrap_err();

        assert_eq!(
            err,
            OptimizeError::InfeasibleBudget {
                minimum_cost: 55,
                budget: 54,
                shortfall: 1,
            }
        );
    }

    #[test]
    fn test_initialize_rejects_empty_pool() {
        let mut rng = OptimizerSeed::from_u64(1).into_rng();
        let err = Population::initialize(&[], 500, &formation(), 10, &mut rng).unwrap_err();
        assert_eq!(err, OptimizeError::EmptyPool);
    }

    #[test]
    fn test_tight_budget_still_fills_population() {
        let pool = small_pool();
        // Budget admits exactly the cheapest roster; every draft must repair
        // or fall back, and the population must still reach full size.
        let mut rng = OptimizerSeed::from_u64(2).into_rng();
        let population =
            Population::initialize(&pool, 55, &formation(), 20, &mut rng).unwrap();

        assert_eq!(population.len(), 20);
        for candidate in population.candidates() {
            assert!(candidate.roster().is_feasible(&pool, 55, &formation()));
        }
    }

    #[test]
    fn test_cheapest_legal_roster_is_minimal() {
        let pool = small_pool();
        let roster = cheapest_legal_roster(&pool, &formation());
        assert_eq!(roster.total_cost(&pool), 55);
        assert!(roster.is_feasible(&pool, 55, &formation()));
    }

    #[test]
    fn test_rank_breaks_ties_deterministically() {
        let pool = small_pool();
        let cheap = Candidate::new(Roster::new(vec![0, 1, 3, 6], &pool), &pool);
        let costly = Candidate::new(Roster::new(vec![1, 2, 4, 5], &pool), &pool);

        let mut population = Population::from_candidates(vec![costly.clone(), cheap.clone()]);
        for candidate in population.candidates_mut() {
            candidate.set_fitness(1.0);
        }
        population.rank();

        // Equal fitness: the cheaper roster ranks first.
        assert_eq!(
            population.best().unwrap().total_cost(),
            cheap.total_cost()
        );
    }
}
