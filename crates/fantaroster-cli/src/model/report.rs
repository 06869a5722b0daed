use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use fantaroster_core::{ObjectiveWeights, OptimizerSeed, Player};
use fantaroster_optimizer::OptimizationResult;
use serde::{Deserialize, Serialize};

/// Saved outcome of an `optimize` run: the result plus everything needed to
/// reproduce or explain it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct OptimizationReport {
    pub formation: String,
    pub budget: u32,
    pub optimized_at: DateTime<Utc>,
    pub seed: OptimizerSeed,
    pub weights: ObjectiveWeights,
    pub result: OptimizationResult,
    pub recommendations: Vec<String>,
}

/// Plain-language observations about the winning roster.
///
/// Flags underspent budget, shaky appearance records, below-average
/// points-per-credit and heavy club concentration (classic leagues cap
/// rosters at three players per club).
pub(crate) fn recommendations(
    pool: &[Player],
    result: &OptimizationResult,
    budget: u32,
) -> Vec<String> {
    let players: Vec<&Player> = result
        .roster
        .iter()
        .filter_map(|id| pool.iter().find(|p| &p.id == id))
        .collect();
    if players.is_empty() {
        return Vec::new();
    }
    #[expect(clippy::cast_precision_loss)]
    let roster_len = players.len() as f64;

    let mut notes = Vec::new();

    if budget > 0 {
        let utilization = 100.0 * f64::from(result.total_cost) / f64::from(budget);
        if utilization < 90.0 {
            notes.push(format!(
                "Only {utilization:.0}% of the budget is spent; consider stronger players."
            ));
        }
    }

    let avg_reliability =
        players.iter().map(|p| p.reliability()).sum::<f64>() / roster_len;
    if avg_reliability < 0.7 {
        notes.push(
            "Some players have low appearance counts; consider steadier alternatives."
                .to_owned(),
        );
    }

    #[expect(clippy::cast_precision_loss)]
    let pool_len = pool.len() as f64;
    let roster_value = players.iter().map(|p| p.value_score()).sum::<f64>() / roster_len;
    let pool_value = pool.iter().map(Player::value_score).sum::<f64>() / pool_len;
    if roster_value < pool_value {
        notes.push(
            "Points-per-credit is below the pool average; cheaper contributors could free up \
             budget."
                .to_owned(),
        );
    }

    let mut clubs: BTreeMap<&str, usize> = BTreeMap::new();
    for player in &players {
        *clubs.entry(player.club.as_str()).or_default() += 1;
    }
    for (club, count) in clubs {
        if count > 3 {
            notes.push(format!(
                "{count} players come from {club}; spreading clubs reduces fixture risk."
            ));
        }
    }

    if notes.is_empty() {
        notes.push("The roster is well balanced.".to_owned());
    }
    notes
}
