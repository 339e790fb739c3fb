/// Battle configuration constants and tunable parameters.
///
/// The associated constants hold the game's balance numbers; only the damage
/// spreads vary per instance.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleConfig {
    /// Damage variance applied to PVE and dungeon attacks.
    pub pve_spread: DamageSpread,
    /// Narrower damage variance used in player-vs-player duels.
    pub pvp_spread: DamageSpread,
}

/// Uniform multiplier range applied to raw attack power.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageSpread {
    pub low: f64,
    pub high: f64,
}

impl DamageSpread {
    pub const PVE: Self = Self {
        low: 0.8,
        high: 1.2,
    };
    pub const PVP: Self = Self {
        low: 0.9,
        high: 1.1,
    };
}

impl BattleConfig {
    // ===== compile-time constants used as type parameters =====
    /// One slot per (kind, stat) pair; four kinds are in use.
    pub const MAX_STATUS_EFFECTS: usize = 8;

    // ===== progression =====
    /// XP needed to leave level `n` is `n * XP_PER_LEVEL`.
    pub const XP_PER_LEVEL: u32 = 100;
    /// Every N-th level grants attribute points.
    pub const ATTRIBUTE_MILESTONE: u32 = 5;
    pub const ATTRIBUTE_POINTS_PER_MILESTONE: u32 = 4;
    pub const HP_GROWTH_BASE: u32 = 10;
    pub const MP_GROWTH_BASE: u32 = 5;
    /// Constitution / intelligence divisor for max HP / MP growth.
    pub const GROWTH_ATTRIBUTE_DIVISOR: i32 = 4;

    // ===== encounters =====
    pub const ELITE_CHANCE: f64 = 0.1;
    pub const ELITE_STAT_MULTIPLIER: f64 = 1.75;
    pub const ELITE_REWARD_MULTIPLIER: f64 = 2.0;
    pub const LOOT_CHANCE: f64 = 0.3;
    pub const LOOT_ROLLS: u32 = 1;
    pub const ELITE_LOOT_ROLLS: u32 = 2;

    // ===== combat =====
    /// Poison damage per tick as a fraction of the skill's magnitude.
    pub const POISON_RATIO: f64 = 0.5;
    /// Flee chance is `dexterity / FLEE_DEXTERITY_DIVISOR`.
    pub const FLEE_DEXTERITY_DIVISOR: f64 = 20.0;
    /// Passive defense from dexterity: `dex / 4`.
    pub const PASSIVE_DEXTERITY_DIVISOR: i32 = 4;
    /// Extra defense while defending: `dex / 2`.
    pub const DEFEND_DEXTERITY_DIVISOR: i32 = 2;
    /// Piercing skills only face half of the target's defense.
    pub const PIERCING_DEFENSE_DIVISOR: i32 = 2;

    // ===== dungeon =====
    pub const DUNGEON_STAGES: u32 = 4;
    pub const SOLO_DUNGEON_MULTIPLIER: u32 = 4;
    pub const SOLO_MIN_ENEMIES: u32 = 2;
    pub const SOLO_MAX_ENEMIES: u32 = 3;
    /// A party of `n` meets between `n` and `n + PARTY_EXTRA_ENEMIES` enemies.
    pub const PARTY_EXTRA_ENEMIES: u32 = 2;

    pub fn new() -> Self {
        Self {
            pve_spread: DamageSpread::PVE,
            pvp_spread: DamageSpread::PVP,
        }
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}
