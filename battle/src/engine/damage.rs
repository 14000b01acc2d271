//! Damage model
//!
//! A pure function from (attacker, defender, attack kind) to an HP delta.
//! The attack kind is the only random input and is rolled separately so
//! the arithmetic stays deterministic.

use rand::Rng;

use crate::types::Creature;

/// An attack never deals less than this
pub const MIN_DAMAGE: u32 = 1;

/// Which stat pair an attack uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackKind {
    /// Attack vs Defense
    Physical,
    /// SpecialAttack vs SpecialDefense
    Special,
}

impl AttackKind {
    /// Pick physical or special with equal probability
    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.gen_bool(0.5) {
            AttackKind::Special
        } else {
            AttackKind::Physical
        }
    }
}

/// Stat difference before elemental scaling. May be negative.
pub fn raw_damage(attacker: &Creature, defender: &Creature, kind: AttackKind) -> i64 {
    let (offense, defense) = match kind {
        AttackKind::Physical => (attacker.stats.attack, defender.stats.defense),
        AttackKind::Special => (attacker.stats.special_attack, defender.stats.special_defense),
    };
    i64::from(offense) - i64::from(defense)
}

/// Final damage dealt by `attacker` to `defender`.
///
/// The attacker's first element is looked up in the defender's multiplier
/// table; a hit scales the raw damage and truncates toward zero. The result
/// is floored at [`MIN_DAMAGE`].
pub fn calculate_damage(attacker: &Creature, defender: &Creature, kind: AttackKind) -> u32 {
    let raw = raw_damage(attacker, defender, kind);

    let scaled = match attacker
        .attacking_element()
        .and_then(|element| defender.multiplier_against(element))
    {
        Some(coefficient) => (raw as f64 * coefficient).trunc() as i64,
        None => raw,
    };

    scaled.clamp(i64::from(MIN_DAMAGE), i64::from(u32::MAX)) as u32
}
