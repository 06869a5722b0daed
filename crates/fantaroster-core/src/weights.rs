use serde::{Deserialize, Serialize};

/// Relative importance of the three optimization objectives.
///
/// Weights express relative importance and are not required to sum to 1;
/// objectives are min–max normalized within each population before the
/// weighted sum is taken, so only the ratios matter. A weight of zero removes
/// an objective from the search entirely.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveWeights {
    /// Weight of the raw performance sum.
    pub performance: f64,
    /// Weight of cost-efficiency (performance per credit spent).
    pub value: f64,
    /// Weight of roster reliability (appearance fractions).
    pub reliability: f64,
}

impl Default for ObjectiveWeights {
    /// The league-advisor defaults: performance first, then value, then
    /// reliability.
    fn default() -> Self {
        Self {
            performance: 0.5,
            value: 0.3,
            reliability: 0.2,
        }
    }
}

impl ObjectiveWeights {
    /// Weights that optimize raw performance only.
    #[must_use]
    pub fn performance_only() -> Self {
        Self {
            performance: 1.0,
            value: 0.0,
            reliability: 0.0,
        }
    }
}
