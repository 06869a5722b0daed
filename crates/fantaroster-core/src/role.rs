use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The closed set of squad roles, using fantacalcio role codes.
///
/// Every player belongs to exactly one role and rosters are filled per role,
/// so the set is a fixed enum rather than free-form strings.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub enum Role {
    /// Goalkeeper (`P`, portiere).
    #[serde(rename = "P")]
    #[display("P")]
    Goalkeeper,
    /// Defender (`D`, difensore).
    #[serde(rename = "D")]
    #[display("D")]
    Defender,
    /// Midfielder (`C`, centrocampista).
    #[serde(rename = "C")]
    #[display("C")]
    Midfielder,
    /// Forward (`A`, attaccante).
    #[serde(rename = "A")]
    #[display("A")]
    Forward,
}

impl Role {
    /// Number of distinct roles.
    pub const COUNT: usize = 4;

    /// All roles, in the conventional P-D-C-A listing order.
    pub const ALL: [Role; Role::COUNT] = [
        Role::Goalkeeper,
        Role::Defender,
        Role::Midfielder,
        Role::Forward,
    ];

    /// Returns this role's position in [`Role::ALL`], usable as an array index.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Role::Goalkeeper => 0,
            Role::Defender => 1,
            Role::Midfielder => 2,
            Role::Forward => 3,
        }
    }
}

/// Error returned when parsing a role code fails.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown role code {code:?}, expected one of P, D, C, A")]
pub struct ParseRoleError {
    pub code: String,
}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "P" | "p" => Ok(Role::Goalkeeper),
            "D" | "d" => Ok(Role::Defender),
            "C" | "c" => Ok(Role::Midfielder),
            "A" | "a" => Ok(Role::Forward),
            _ => Err(ParseRoleError {
                code: s.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_all_order() {
        for (i, role) in Role::ALL.into_iter().enumerate() {
            assert_eq!(role.index(), i);
        }
    }

    #[test]
    fn test_display_uses_role_codes() {
        let codes: Vec<_> = Role::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(codes, ["P", "D", "C", "A"]);
    }

    #[test]
    fn test_from_str_accepts_both_cases() {
        assert_eq!("P".parse::<Role>().unwrap(), Role::Goalkeeper);
        assert_eq!("d".parse::<Role>().unwrap(), Role::Defender);
        assert_eq!("C".parse::<Role>().unwrap(), Role::Midfielder);
        assert_eq!("a".parse::<Role>().unwrap(), Role::Forward);
    }

    #[test]
    fn test_from_str_rejects_unknown_code() {
        let err = "X".parse::<Role>().unwrap_err();
        assert_eq!(err.code, "X");
    }

    #[test]
    fn test_serde_round_trip_uses_codes() {
        let json = serde_json::to_string(&Role::Midfielder).unwrap();
        assert_eq!(json, "\"C\"");
        let role: Role = serde_json::from_str("\"A\"").unwrap();
        assert_eq!(role, Role::Forward);
    }
}
