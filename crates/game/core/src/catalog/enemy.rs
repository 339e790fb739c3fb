use crate::config::BattleConfig;
use crate::env::RngSource;
use crate::stats::round_half_even;

/// Static monster definition.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyTemplate {
    /// Catalog name. Never carries the elite prefix; quest progress keys on it.
    pub name: String,
    pub hp: u32,
    pub attack: i32,
    pub defense: i32,
    pub xp_reward: u32,
    pub gold_reward: u32,
    pub min_level: u32,
    pub max_level: u32,
    pub elite: bool,
}

impl EnemyTemplate {
    pub fn new(name: impl Into<String>, hp: u32, attack: i32, defense: i32) -> Self {
        Self {
            name: name.into(),
            hp,
            attack,
            defense,
            xp_reward: 0,
            gold_reward: 0,
            min_level: 1,
            max_level: 1,
            elite: false,
        }
    }

    #[must_use]
    pub fn with_rewards(mut self, xp: u32, gold: u32) -> Self {
        self.xp_reward = xp;
        self.gold_reward = gold;
        self
    }

    #[must_use]
    pub fn with_levels(mut self, min_level: u32, max_level: u32) -> Self {
        self.min_level = min_level;
        self.max_level = max_level;
        self
    }

    /// Elite variant: HP, attack and defense ×1.75 (rounded half to even),
    /// rewards doubled. Applying it twice is a no-op.
    #[must_use]
    pub fn elite(&self) -> Self {
        if self.elite {
            return self.clone();
        }
        let scale = |value: f64| round_half_even(value * BattleConfig::ELITE_STAT_MULTIPLIER);
        let reward = |value: u32| {
            round_half_even(f64::from(value) * BattleConfig::ELITE_REWARD_MULTIPLIER) as u32
        };
        Self {
            name: self.name.clone(),
            hp: scale(f64::from(self.hp)).max(0) as u32,
            attack: scale(f64::from(self.attack)) as i32,
            defense: scale(f64::from(self.defense)) as i32,
            xp_reward: reward(self.xp_reward),
            gold_reward: reward(self.gold_reward),
            min_level: self.min_level,
            max_level: self.max_level,
            elite: true,
        }
    }

    /// Random encounters turn elite with a 10% chance.
    #[must_use]
    pub fn roll_encounter<R: RngSource + ?Sized>(&self, rng: &mut R) -> Self {
        if rng.chance(BattleConfig::ELITE_CHANCE) {
            self.elite()
        } else {
            self.clone()
        }
    }

    pub fn display_name(&self) -> String {
        if self.elite {
            format!("Elite {}", self.name)
        } else {
            self.name.clone()
        }
    }

    /// Named hunts require the hunter to have outgrown the monster.
    pub fn huntable_at(&self, level: u32) -> bool {
        level > self.max_level
    }
}
