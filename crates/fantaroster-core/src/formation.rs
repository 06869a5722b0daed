use std::{fmt, str::FromStr};

use crate::Role;

/// Required player count per role; the quota sum is the roster size.
///
/// Formations are conventionally written as `"D-C-A"` with one implied
/// goalkeeper, so `"4-4-2"` means one goalkeeper, four defenders, four
/// midfielders and two forwards. Arbitrary quota tables (including zero
/// goalkeepers) can be built with [`Formation::from_quotas`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Formation {
    quotas: [usize; Role::COUNT],
}

impl Formation {
    /// The formations commonly allowed in classic leagues.
    pub const PRESETS: [(&'static str, Formation); 7] = [
        ("3-4-3", Formation::classic(3, 4, 3)),
        ("3-5-2", Formation::classic(3, 5, 2)),
        ("4-3-3", Formation::classic(4, 3, 3)),
        ("4-4-2", Formation::classic(4, 4, 2)),
        ("4-5-1", Formation::classic(4, 5, 1)),
        ("5-3-2", Formation::classic(5, 3, 2)),
        ("5-4-1", Formation::classic(5, 4, 1)),
    ];

    /// Builds a classic formation: one goalkeeper plus the given outfield quotas.
    #[must_use]
    pub const fn classic(defenders: usize, midfielders: usize, forwards: usize) -> Self {
        Self {
            quotas: [1, defenders, midfielders, forwards],
        }
    }

    /// Builds a formation from explicit `(role, count)` quotas.
    ///
    /// Unlisted roles default to a quota of zero; listing a role twice keeps
    /// the last count.
    #[must_use]
    pub fn from_quotas<I>(quotas: I) -> Self
    where
        I: IntoIterator<Item = (Role, usize)>,
    {
        let mut table = [0; Role::COUNT];
        for (role, count) in quotas {
            table[role.index()] = count;
        }
        Self { quotas: table }
    }

    /// Required number of players for `role`.
    #[must_use]
    pub fn quota(&self, role: Role) -> usize {
        self.quotas[role.index()]
    }

    /// Iterates `(role, quota)` pairs in [`Role::ALL`] order.
    pub fn quotas(&self) -> impl Iterator<Item = (Role, usize)> + '_ {
        Role::ALL.into_iter().map(|role| (role, self.quota(role)))
    }

    /// Total roster size: the sum of all role quotas.
    #[must_use]
    pub fn roster_size(&self) -> usize {
        self.quotas.iter().sum()
    }
}

impl fmt::Display for Formation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [p, d, c, a] = self.quotas;
        if p == 1 {
            write!(f, "{d}-{c}-{a}")
        } else {
            write!(f, "P{p}-D{d}-C{c}-A{a}")
        }
    }
}

/// Error returned when parsing a formation string fails.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid formation {input:?}, expected \"D-C-A\" such as \"4-4-2\"")]
pub struct ParseFormationError {
    pub input: String,
}

impl FromStr for Formation {
    type Err = ParseFormationError;

    /// Parses the `"D-C-A"` form with one implied goalkeeper.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseFormationError {
            input: s.to_owned(),
        };

        let parts: Vec<&str> = s.split('-').collect();
        let [d, c, a]: [&str; 3] = parts.try_into().map_err(|_| err())?;
        let parse = |part: &str| part.trim().parse::<usize>().map_err(|_| err());
        Ok(Self::classic(parse(d)?, parse(c)?, parse(a)?))
    }
}
