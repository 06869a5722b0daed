use serde::{Deserialize, Serialize};

use crate::Role;

/// Unique player identifier.
///
/// Identifiers come from the upstream pool provider and are opaque here; the
/// optimizer only relies on equality and on lexicographic ordering, which is
/// the final deterministic tie-break wherever candidates must be ranked.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[display("{_0}")]
pub struct PlayerId(String);

impl PlayerId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// One validated player record from the pool provider.
///
/// Records are immutable for the duration of an optimization run. Cost is in
/// whole credits; `avg_score` is the average fantasy score per appearance
/// ("fantamedia"). Goals and assists are carried for reporting only and play
/// no part in the search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub role: Role,
    pub club: String,
    pub cost: u32,
    pub avg_score: f64,
    pub appearances: u32,
    #[serde(default)]
    pub goals: u32,
    #[serde(default)]
    pub assists: u32,
}

impl Player {
    /// Matchdays in a season; appearances are capped against this.
    pub const SEASON_MATCHDAYS: u32 = 38;

    /// Points per credit: average score divided by cost.
    ///
    /// Defined as 0 for free (zero-cost) players so the division stays total.
    #[must_use]
    pub fn value_score(&self) -> f64 {
        if self.cost == 0 {
            0.0
        } else {
            self.avg_score / f64::from(self.cost)
        }
    }

    /// How reliably the player actually plays, in `[0, 1]`.
    ///
    /// The fraction of season matchdays with an appearance, capped at 1.0.
    #[must_use]
    pub fn reliability(&self) -> f64 {
        (f64::from(self.appearances) / f64::from(Self::SEASON_MATCHDAYS)).min(1.0)
    }
}
