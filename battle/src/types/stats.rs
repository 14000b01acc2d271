//! Base stats

/// Base stats of a creature template. All values are non-negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BaseStats {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
    pub special_attack: u32,
    pub special_defense: u32,
}

impl BaseStats {
    pub fn new(
        hp: u32,
        attack: u32,
        defense: u32,
        speed: u32,
        special_attack: u32,
        special_defense: u32,
    ) -> Self {
        Self {
            hp,
            attack,
            defense,
            speed,
            special_attack,
            special_defense,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_orders_fields() {
        let stats = BaseStats::new(45, 49, 48, 45, 65, 64);
        assert_eq!(stats.hp, 45);
        assert_eq!(stats.attack, 49);
        assert_eq!(stats.defense, 48);
        assert_eq!(stats.speed, 45);
        assert_eq!(stats.special_attack, 65);
        assert_eq!(stats.special_defense, 64);
    }

    #[test]
    fn test_default_is_zero() {
        let stats = BaseStats::default();
        assert_eq!(stats.hp, 0);
        assert_eq!(stats.speed, 0);
    }
}
