use fantaroster_core::{Player, Roster};
use serde::{Deserialize, Serialize};

/// Raw, pre-normalization objective scores of one roster.
///
/// These are the values reported to callers; fitness is computed from their
/// population-normalized counterparts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveScores {
    /// Sum of average match scores over the roster.
    pub performance: f64,
    /// Performance per credit spent: `performance / total cost`, 0 when the
    /// roster is free.
    pub value: f64,
    /// Sum of per-player reliability (appearance fractions in `[0, 1]`).
    pub reliability: f64,
}

impl ObjectiveScores {
    /// Scores a roster against the pool it indexes into.
    ///
    /// Pure function of the roster and pool; player records are never
    /// mutated.
    #[must_use]
    pub fn of_roster(roster: &Roster, pool: &[Player]) -> Self {
        let performance: f64 = roster.players(pool).map(|p| p.avg_score).sum();
        let cost = roster.total_cost(pool);
        let value = if cost == 0 {
            0.0
        } else {
            performance / f64::from(cost)
        };
        let reliability = roster.players(pool).map(Player::reliability).sum();
        Self {
            performance,
            value,
            reliability,
        }
    }
}

#[cfg(test)]
mod tests {
    use fantaroster_core::{PlayerId, Role};

    use super::*;

    fn player(id: &str, cost: u32, avg_score: f64, appearances: u32) -> Player {
        Player {
            id: PlayerId::new(id),
            role: Role::Forward,
            club: "Testese".to_owned(),
            cost,
            avg_score,
            appearances,
            goals: 0,
            assists: 0,
        }
    }

    #[test]
    fn test_scores_sum_over_roster() {
        let pool = vec![player("a", 10, 6.0, 19), player("b", 30, 7.0, 38)];
        let roster = Roster::new(vec![0, 1], &pool);
        let scores = ObjectiveScores::of_roster(&roster, &pool);

        assert!((scores.performance - 13.0).abs() < 1e-12);
        assert!((scores.value - 13.0 / 40.0).abs() < 1e-12);
        assert!((scores.reliability - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_free_roster_has_zero_value() {
        let pool = vec![player("a", 0, 6.0, 19)];
        let roster = Roster::new(vec![0], &pool);
        let scores = ObjectiveScores::of_roster(&roster, &pool);
        assert_eq!(scores.value, 0.0);
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let pool = vec![player("a", 12, 6.5, 25), player("b", 22, 7.1, 33)];
        let roster = Roster::new(vec![0, 1], &pool);
        let first = ObjectiveScores::of_roster(&roster, &pool);
        let second = ObjectiveScores::of_roster(&roster, &pool);
        assert_eq!(first, second);
    }
}
