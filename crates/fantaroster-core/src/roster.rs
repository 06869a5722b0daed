use rand::{Rng, seq::IndexedRandom as _};

use crate::{Formation, Player, PlayerId, Role};

/// Upper bound on repair moves for a single roster.
pub const MAX_REPAIR_ATTEMPTS: usize = 50;

/// Error returned when a roster cannot be made feasible within
/// [`MAX_REPAIR_ATTEMPTS`] repair moves.
///
/// Callers discard the roster and resample; this never surfaces to the
/// optimizer's caller directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("roster could not be repaired within {attempts} attempts")]
pub struct RepairExhausted {
    pub attempts: usize,
}

/// One complete roster, stored as indices into the player pool.
///
/// Slots are kept sorted by `(role, pool index)`, so all goalkeepers come
/// first, then defenders, midfielders and forwards. A roster is *feasible*
/// for a given budget and formation when its role counts match the formation
/// quotas exactly, all players are distinct, and its total cost is within
/// budget. Rosters produced by sampling or crossover may temporarily violate
/// these rules until [`Roster::repair`] runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    slots: Vec<usize>,
}

impl Roster {
    /// Builds a roster from pool indices, normalizing the slot order.
    #[must_use]
    pub fn new(mut slots: Vec<usize>, pool: &[Player]) -> Self {
        slots.sort_by_key(|&i| (pool[i].role.index(), i));
        Self { slots }
    }

    /// The pool indices of the rostered players, in role-major order.
    #[must_use]
    pub fn slots(&self) -> &[usize] {
        &self.slots
    }

    /// Number of rostered players.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Whether the player at `pool_index` is on this roster.
    #[must_use]
    pub fn contains(&self, pool_index: usize) -> bool {
        self.slots.contains(&pool_index)
    }

    /// Iterates the rostered players.
    pub fn players<'p>(&'p self, pool: &'p [Player]) -> impl Iterator<Item = &'p Player> + 'p {
        self.slots.iter().map(move |&i| &pool[i])
    }

    /// Total cost of the roster in credits.
    #[must_use]
    pub fn total_cost(&self, pool: &[Player]) -> u32 {
        self.players(pool).map(|p| p.cost).sum()
    }

    /// Pool indices of rostered players with the given role.
    #[must_use]
    pub fn role_slots(&self, role: Role, pool: &[Player]) -> Vec<usize> {
        self.slots
            .iter()
            .copied()
            .filter(|&i| pool[i].role == role)
            .collect()
    }

    /// Player count per role, indexed by [`Role::index`].
    #[must_use]
    pub fn role_counts(&self, pool: &[Player]) -> [usize; Role::COUNT] {
        let mut counts = [0; Role::COUNT];
        for player in self.players(pool) {
            counts[player.role.index()] += 1;
        }
        counts
    }

    /// Rostered player identifiers in lexicographic order.
    ///
    /// This is the deterministic identity of the roster-as-a-set, used as the
    /// final tie-break when ranking candidates.
    #[must_use]
    pub fn sorted_ids(&self, pool: &[Player]) -> Vec<PlayerId> {
        let mut ids: Vec<_> = self.players(pool).map(|p| p.id.clone()).collect();
        ids.sort();
        ids
    }

    /// Returns a copy with `old_index` replaced by `new_index`.
    #[must_use]
    pub fn with_replacement(&self, old_index: usize, new_index: usize, pool: &[Player]) -> Self {
        let slots = self
            .slots
            .iter()
            .map(|&i| if i == old_index { new_index } else { i })
            .collect();
        Self::new(slots, pool)
    }

    /// Decides feasibility: exact role quotas, distinct players, cost within
    /// budget.
    #[must_use]
    pub fn is_feasible(&self, pool: &[Player], budget: u32, formation: &Formation) -> bool {
        let counts = self.role_counts(pool);
        let quotas_match = formation
            .quotas()
            .all(|(role, quota)| counts[role.index()] == quota);

        // slots are sorted, so duplicates are adjacent
        let distinct = self.slots.windows(2).all(|w| w[0] != w[1]);

        quotas_match && distinct && self.total_cost(pool) <= budget
    }

    /// Attempts to make the roster feasible with a bounded number of moves.
    ///
    /// Each move fixes the most pressing violation:
    ///
    /// 1. a duplicated player is dropped;
    /// 2. an over-quota role loses its highest-cost, lowest-score player, and
    ///    an under-quota role gains the cheapest unused player of that role;
    /// 3. while over budget, the highest-cost rostered player with a
    ///    strictly cheaper unused same-role alternative is swapped for a
    ///    random such alternative.
    ///
    /// Fails with [`RepairExhausted`] when the attempt budget runs out or no
    /// move can make progress; the caller discards and resamples.
    pub fn repair<R>(
        &mut self,
        pool: &[Player],
        budget: u32,
        formation: &Formation,
        rng: &mut R,
    ) -> Result<(), RepairExhausted>
    where
        R: Rng + ?Sized,
    {
        for _ in 0..MAX_REPAIR_ATTEMPTS {
            if self.is_feasible(pool, budget, formation) {
                return Ok(());
            }
            if !self.repair_move(pool, budget, formation, rng) {
                break;
            }
        }

        if self.is_feasible(pool, budget, formation) {
            Ok(())
        } else {
            Err(RepairExhausted {
                attempts: MAX_REPAIR_ATTEMPTS,
            })
        }
    }

    /// Applies one repair move; returns false when no move can help.
    fn repair_move<R>(
        &mut self,
        pool: &[Player],
        budget: u32,
        formation: &Formation,
        rng: &mut R,
    ) -> bool
    where
        R: Rng + ?Sized,
    {
        if self.drop_duplicate() {
            return true;
        }
        if self.fix_role_counts(pool, formation) {
            return true;
        }
        if self.total_cost(pool) > budget {
            return self.swap_cheaper(pool, rng);
        }
        false
    }

    fn drop_duplicate(&mut self) -> bool {
        let dup = self
            .slots
            .windows(2)
            .position(|w| w[0] == w[1]);
        match dup {
            Some(pos) => {
                self.slots.remove(pos);
                true
            }
            None => false,
        }
    }

    fn fix_role_counts(&mut self, pool: &[Player], formation: &Formation) -> bool {
        let counts = self.role_counts(pool);
        for (role, quota) in formation.quotas() {
            let count = counts[role.index()];
            if count > quota {
                return self.drop_worst_of_role(role, pool);
            }
            if count < quota {
                return self.add_cheapest_of_role(role, pool);
            }
        }
        false
    }

    fn drop_worst_of_role(&mut self, role: Role, pool: &[Player]) -> bool {
        let worst = self
            .slots
            .iter()
            .enumerate()
            .filter(|&(_, &i)| pool[i].role == role)
            .max_by(|&(_, &a), &(_, &b)| {
                let pa = &pool[a];
                let pb = &pool[b];
                pa.cost
                    .cmp(&pb.cost)
                    .then(pb.avg_score.total_cmp(&pa.avg_score))
                    .then(b.cmp(&a))
            });
        match worst {
            Some((pos, _)) => {
                self.slots.remove(pos);
                true
            }
            None => false,
        }
    }

    fn add_cheapest_of_role(&mut self, role: Role, pool: &[Player]) -> bool {
        let cheapest = (0..pool.len())
            .filter(|&i| pool[i].role == role && !self.contains(i))
            .min_by(|&a, &b| {
                pool[a]
                    .cost
                    .cmp(&pool[b].cost)
                    .then(pool[b].avg_score.total_cmp(&pool[a].avg_score))
                    .then(a.cmp(&b))
            });
        match cheapest {
            Some(idx) => {
                self.insert_slot(idx, pool);
                true
            }
            None => false,
        }
    }

    /// Swaps the most expensive replaceable player for a random strictly
    /// cheaper same-role alternative.
    fn swap_cheaper<R>(&mut self, pool: &[Player], rng: &mut R) -> bool
    where
        R: Rng + ?Sized,
    {
        let mut offenders: Vec<usize> = self.slots.clone();
        offenders.sort_by(|&a, &b| {
            let pa = &pool[a];
            let pb = &pool[b];
            pb.cost
                .cmp(&pa.cost)
                .then(pa.avg_score.total_cmp(&pb.avg_score))
                .then(a.cmp(&b))
        });

        for offender in offenders {
            let role = pool[offender].role;
            let cheaper: Vec<usize> = (0..pool.len())
                .filter(|&i| {
                    pool[i].role == role && pool[i].cost < pool[offender].cost && !self.contains(i)
                })
                .collect();
            if let Some(&replacement) = cheaper.choose(rng) {
                self.remove_slot(offender);
                self.insert_slot(replacement, pool);
                return true;
            }
        }
        false
    }

    fn remove_slot(&mut self, pool_index: usize) {
        if let Some(pos) = self.slots.iter().position(|&i| i == pool_index) {
            self.slots.remove(pos);
        }
    }

    fn insert_slot(&mut self, pool_index: usize, pool: &[Player]) {
        let key = (pool[pool_index].role.index(), pool_index);
        let pos = self
            .slots
            .partition_point(|&i| (pool[i].role.index(), i) < key);
        self.slots.insert(pos, pool_index);
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

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

    /// Pool: defenders d0..d3 cost 10/20/30/40, forwards a0..a1 cost 15/25.
    fn pool() -> Vec<Player> {
        vec![
            player("d0", Role::Defender, 10, 5.8),
            player("d1", Role::Defender, 20, 6.0),
            player("d2", Role::Defender, 30, 6.3),
            player("d3", Role::Defender, 40, 6.6),
            player("a0", Role::Forward, 15, 6.9),
            player("a1", Role::Forward, 25, 7.4),
        ]
    }

    fn formation() -> Formation {
        Formation::from_quotas([(Role::Defender, 2), (Role::Forward, 1)])
    }

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    #[test]
    fn test_slots_are_role_major_sorted() {
        let pool = pool();
        let roster = Roster::new(vec![4, 1, 0], &pool);
        assert_eq!(roster.slots(), [0, 1, 4]);
    }

    #[test]
    fn test_feasible_roster_passes() {
        let pool = pool();
        let roster = Roster::new(vec![0, 1, 4], &pool);
        assert!(roster.is_feasible(&pool, 45, &formation()));
        assert_eq!(roster.total_cost(&pool), 45);
    }

    #[test]
    fn test_over_budget_is_infeasible() {
        let pool = pool();
        let roster = Roster::new(vec![0, 1, 4], &pool);
        assert!(!roster.is_feasible(&pool, 44, &formation()));
    }

    #[test]
    fn test_duplicate_player_is_infeasible() {
        let pool = pool();
        let roster = Roster::new(vec![0, 0, 4], &pool);
        assert!(!roster.is_feasible(&pool, 100, &formation()));
    }

    #[test]
    fn test_wrong_role_counts_are_infeasible() {
        let pool = pool();
        let roster = Roster::new(vec![0, 1, 2], &pool);
        assert!(!roster.is_feasible(&pool, 100, &formation()));
    }

    #[test]
    fn test_repair_swaps_down_to_budget() {
        let pool = pool();
        // d2 + d3 + a1 = 95, budget 50: repair must swap expensive players out.
        let mut roster = Roster::new(vec![2, 3, 5], &pool);
        roster.repair(&pool, 50, &formation(), &mut rng()).unwrap();
        assert!(roster.is_feasible(&pool, 50, &formation()));
    }

    #[test]
    fn test_repair_fixes_duplicates() {
        let pool = pool();
        let mut roster = Roster::new(vec![1, 1, 4], &pool);
        roster.repair(&pool, 100, &formation(), &mut rng()).unwrap();
        assert!(roster.is_feasible(&pool, 100, &formation()));
    }

    #[test]
    fn test_repair_fills_missing_quota() {
        let pool = pool();
        let mut roster = Roster::new(vec![1, 4], &pool);
        roster.repair(&pool, 100, &formation(), &mut rng()).unwrap();
        assert!(roster.is_feasible(&pool, 100, &formation()));
    }

    #[test]
    fn test_repair_fails_when_budget_unreachable() {
        let pool = pool();
        // Cheapest legal roster (d0 + d1 + a0) costs 45.
        let mut roster = Roster::new(vec![2, 3, 5], &pool);
        let err = roster
            .repair(&pool, 40, &formation(), &mut rng())
            .unwrap_err();
        assert_eq!(err.attempts, MAX_REPAIR_ATTEMPTS);
    }

    #[test]
    fn test_with_replacement_keeps_order() {
        let pool = pool();
        let roster = Roster::new(vec![0, 1, 4], &pool);
        let swapped = roster.with_replacement(1, 3, &pool);
        assert_eq!(swapped.slots(), [0, 3, 4]);
        // the original is untouched
        assert_eq!(roster.slots(), [0, 1, 4]);
    }

    #[test]
    fn test_sorted_ids_are_lexicographic() {
        let pool = pool();
        let roster = Roster::new(vec![4, 0, 2], &pool);
        let ids: Vec<_> = roster
            .sorted_ids(&pool)
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(ids, ["a0", "d0", "d2"]);
    }
}
