//! Roster assignment

use pokebat_battle::{Creature, ROSTER_SIZE};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::TeamError;

/// Players in one battle
pub const PLAYERS: usize = 2;

/// Shuffle the catalog and deal two disjoint rosters of [`ROSTER_SIZE`].
///
/// The first roster goes to player A, the second to player B. The catalog
/// itself is left untouched.
pub fn assign_rosters<R: Rng + ?Sized>(
    catalog: &[Creature],
    rng: &mut R,
) -> Result<[Vec<Creature>; PLAYERS], TeamError> {
    ensure_playable(catalog)?;

    let needed = ROSTER_SIZE * PLAYERS;
    let mut pool: Vec<&Creature> = catalog.iter().collect();
    pool.shuffle(rng);

    let first = pool[..ROSTER_SIZE].iter().map(|c| (*c).clone()).collect();
    let second = pool[ROSTER_SIZE..needed]
        .iter()
        .map(|c| (*c).clone())
        .collect();

    Ok([first, second])
}

/// Fail early if a catalog can't supply a full battle
pub fn ensure_playable(catalog: &[Creature]) -> Result<(), TeamError> {
    let needed = ROSTER_SIZE * PLAYERS;
    if catalog.len() < needed {
        return Err(TeamError::CatalogTooSmall {
            needed,
            available: catalog.len(),
        });
    }
    Ok(())
}
