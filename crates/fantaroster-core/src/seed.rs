use std::fmt::Write as _;

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Seed for a deterministic optimization run.
///
/// A 128-bit (16-byte) seed that initializes the run-owned random number
/// generator. Two runs over the same pool, budget, formation and weights with
/// the same seed produce identical rosters and fitness values, enabling:
///
/// - Reproducible optimization results for debugging
/// - Seeds recorded in saved reports and replayed later
/// - Deterministic testing
///
/// Serialized as a 32-character hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptimizerSeed([u8; 16]);

impl OptimizerSeed {
    /// Builds a seed from a `u64`, for CLI flags and quick experiments.
    #[must_use]
    pub fn from_u64(value: u64) -> Self {
        Self(u128::from(value).to_be_bytes())
    }

    /// Creates the run's random number generator from this seed.
    #[must_use]
    pub fn into_rng(self) -> Pcg32 {
        Pcg32::from_seed(self.0)
    }
}

impl Serialize for OptimizerSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let num = u128::from_be_bytes(self.0);
        let mut hex_str = String::with_capacity(2 * self.0.len());
        write!(&mut hex_str, "{num:032x}").unwrap();
        serializer.serialize_str(&hex_str)
    }
}

impl<'de> Deserialize<'de> for OptimizerSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        if hex_str.len() != 32 {
            return Err(serde::de::Error::custom(format!(
                "invalid seed: expected 32 hex characters, got {}",
                hex_str.len()
            )));
        }
        let num = u128::from_str_radix(&hex_str, 16)
            .map_err(|e| serde::de::Error::custom(format!("invalid seed: {hex_str} ({e})")))?;
        Ok(Self(num.to_be_bytes()))
    }
}

/// Allows drawing a random `OptimizerSeed` with `rng.random()`.
impl Distribution<OptimizerSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> OptimizerSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        OptimizerSeed(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_32_char_hex() {
        let seed = OptimizerSeed::from_u64(0xDEAD_BEEF);
        let json = serde_json::to_string(&seed).unwrap();
        assert_eq!(json, "\"000000000000000000000000deadbeef\"");
    }

    #[test]
    fn test_round_trip_preserves_seed() {
        let seed: OptimizerSeed = rand::rng().random();
        let json = serde_json::to_string(&seed).unwrap();
        let back: OptimizerSeed = serde_json::from_str(&json).unwrap();
        assert_eq!(seed, back);
    }

    #[test]
    fn test_deserialize_rejects_wrong_length() {
        let result: Result<OptimizerSeed, _> = serde_json::from_str("\"abc\"");
        assert!(result.unwrap_err().to_string().contains("invalid seed"));
    }

    #[test]
    fn test_deserialize_rejects_non_hex() {
        let json = format!("\"{}\"", "g".repeat(32));
        let result: Result<OptimizerSeed, _> = serde_json::from_str(&json);
        assert!(result.unwrap_err().to_string().contains("invalid seed"));
    }

    #[test]
    fn test_same_seed_same_random_stream() {
        let seed = OptimizerSeed::from_u64(42);
        let mut a = seed.into_rng();
        let mut b = seed.into_rng();
        for _ in 0..32 {
            assert_eq!(a.random::<u64>(), b.random::<u64>());
        }
    }
}
