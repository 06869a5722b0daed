use std::{collections::BTreeSet, path::Path};

use anyhow::bail;
use fantaroster_core::{Player, PlayerId, Role};
use serde::{Deserialize, Serialize};

use crate::util;

/// One player entry in a pool file, using the listone's field names.
///
/// This is the ingestion boundary: records are validated here and converted
/// into core [`Player`] values before the optimizer sees them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct PlayerRecord {
    name: String,
    role: Role,
    team: String,
    price: u32,
    fantamedia: f64,
    appearances: u32,
    #[serde(default)]
    goals: u32,
    #[serde(default)]
    assists: u32,
}

impl PlayerRecord {
    fn into_player(self) -> Player {
        Player {
            id: PlayerId::new(self.name),
            role: self.role,
            club: self.team,
            cost: self.price,
            avg_score: self.fantamedia,
            appearances: self.appearances,
            goals: self.goals,
            assists: self.assists,
        }
    }
}

/// Reads and validates a player pool from a JSON file.
///
/// The file is a JSON array of [`PlayerRecord`] entries. Player names must be
/// unique since they identify players throughout the optimizer.
pub(crate) fn load_pool<P>(path: P) -> anyhow::Result<Vec<Player>>
where
    P: AsRef<Path>,
{
    let records: Vec<PlayerRecord> = util::read_json_file("player pool", path)?;

    let mut seen = BTreeSet::new();
    for record in &records {
        if !seen.insert(record.name.as_str()) {
            bail!("duplicate player {:?} in pool", record.name);
        }
    }

    Ok(records.into_iter().map(PlayerRecord::into_player).collect())
}
