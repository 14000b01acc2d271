//! Pokedex catalog loading
//!
//! The catalog file is a JSON array of creature entries:
//!
//! ```json
//! [
//!   {
//!     "Name": "Bulbasaur",
//!     "Elements": ["Grass", "Poison"],
//!     "Stats": {"HP": 45, "Attack": 49, "Defense": 49, "Speed": 45,
//!               "Sp_Attack": 65, "Sp_Defense": 65},
//!     "DamegeWhenAttacked": [{"Element": "Fire", "Coefficient": 2.0}]
//!   }
//! ]
//! ```
//!
//! Extra keys such as `Profile` are ignored.

use std::path::Path;

use pokebat_battle::{BaseStats, Creature, DamageMultiplier, Element};
use serde::Deserialize;

use crate::error::TeamError;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PokedexEntry {
    name: String,
    elements: Vec<Element>,
    stats: PokedexStats,
    #[serde(default, rename = "DamegeWhenAttacked", alias = "DamageWhenAttacked")]
    damage_when_attacked: Vec<PokedexDamage>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct PokedexStats {
    #[serde(rename = "HP")]
    hp: u32,
    #[serde(rename = "Attack")]
    attack: u32,
    #[serde(rename = "Defense")]
    defense: u32,
    #[serde(rename = "Speed")]
    speed: u32,
    #[serde(rename = "Sp_Attack")]
    sp_attack: u32,
    #[serde(rename = "Sp_Defense")]
    sp_defense: u32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PokedexDamage {
    element: Element,
    coefficient: f64,
}

impl From<PokedexEntry> for Creature {
    fn from(entry: PokedexEntry) -> Self {
        let stats = entry.stats;
        Creature {
            name: entry.name,
            elements: entry.elements,
            stats: BaseStats::new(
                stats.hp,
                stats.attack,
                stats.defense,
                stats.speed,
                stats.sp_attack,
                stats.sp_defense,
            ),
            damage_taken: entry
                .damage_when_attacked
                .into_iter()
                .map(|d| DamageMultiplier {
                    element: d.element,
                    coefficient: d.coefficient,
                })
                .collect(),
        }
    }
}

/// Parse and validate a catalog from JSON text
pub fn parse_catalog(json: &str) -> Result<Vec<Creature>, TeamError> {
    let entries: Vec<PokedexEntry> = serde_json::from_str(json)?;

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let creature = Creature::from(entry);
            creature
                .validate()
                .map_err(|source| TeamError::InvalidCreature { index, source })?;
            Ok(creature)
        })
        .collect()
}

/// Read, parse and validate a catalog file
pub fn load_catalog(path: impl AsRef<Path>) -> Result<Vec<Creature>, TeamError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| TeamError::Io {
        path: path.display().to_string(),
        source,
    })?;

    parse_catalog(&json)
}
