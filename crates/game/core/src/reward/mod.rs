//! End-of-battle outcomes: experience, gold, loot and defeat penalties.
//!
//! The runtime settles a battle by loading a fresh [`CharacterSheet`], feeding
//! it through these functions and writing the result back as a
//! [`crate::CharacterPatch`].

mod experience;

pub use experience::{LevelUp, PendingLevelUp, complete_level_up, grant};

use crate::catalog::{EnemyTemplate, ItemDefinition};
use crate::config::BattleConfig;
use crate::env::RngSource;
use crate::state::{BattleMode, BattleOutcome, CharacterSheet, UserId};
use crate::stats::{EquipmentBonuses, SpecialBonus};

/// XP and gold pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rewards {
    pub xp: u32,
    pub gold: u32,
}

impl Rewards {
    pub const fn new(xp: u32, gold: u32) -> Self {
        Self { xp, gold }
    }

    /// Base rewards of a (possibly elite) enemy.
    pub fn from_enemy(template: &EnemyTemplate) -> Self {
        Self::new(template.xp_reward, template.gold_reward)
    }

    #[must_use]
    pub fn add(self, other: Self) -> Self {
        Self::new(
            self.xp.saturating_add(other.xp),
            self.gold.saturating_add(other.gold),
        )
    }

    #[must_use]
    pub fn scaled(self, multiplier: u32) -> Self {
        Self::new(
            self.xp.saturating_mul(multiplier),
            self.gold.saturating_mul(multiplier),
        )
    }

    /// Adds the XP and gold bonus percentages granted by equipment.
    #[must_use]
    pub fn with_equipment_bonus(self, equipment: &EquipmentBonuses) -> Self {
        Self::new(
            self.xp
                .saturating_add(equipment.percent_of(SpecialBonus::XpBonusPercent, self.xp)),
            self.gold
                .saturating_add(equipment.percent_of(SpecialBonus::GoldBonusPercent, self.gold)),
        )
    }
}

/// Number of loot rolls a defeated enemy grants.
pub const fn loot_rolls(elite: bool) -> u32 {
    if elite {
        BattleConfig::ELITE_LOOT_ROLLS
    } else {
        BattleConfig::LOOT_ROLLS
    }
}

/// Rolls each loot chance and returns how many succeeded.
pub fn roll_loot<R: RngSource + ?Sized>(elite: bool, rng: &mut R) -> u32 {
    (0..loot_rolls(elite))
        .filter(|_| rng.next_f64() <= BattleConfig::LOOT_CHANCE)
        .count() as u32
}

/// HP a defeated character is left with after settlement.
pub const fn defeat_hp(mode: BattleMode, max_hp: u32) -> u32 {
    match mode {
        BattleMode::Pve | BattleMode::Pvp => 1,
        BattleMode::Dungeon => max_hp / 2,
    }
}

/// Builds the storage update carrying a settled sheet's progression fields.
pub fn progression_patch(sheet: &CharacterSheet) -> crate::CharacterPatch {
    crate::CharacterPatch {
        level: Some(sheet.level),
        experience: Some(sheet.experience),
        gold: Some(sheet.gold),
        hp: Some(sheet.hp),
        max_hp: Some(sheet.max_hp),
        mp: Some(sheet.mp),
        max_mp: Some(sheet.max_mp),
        attributes: Some(sheet.attributes),
        unspent_attribute_points: Some(sheet.unspent_attribute_points),
        pvp_wins: None,
        pvp_losses: None,
    }
}

/// An item awarded to a participant.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LootDrop {
    pub user: UserId,
    pub item: ItemDefinition,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelUpRecord {
    pub user: UserId,
    pub level_up: LevelUp,
}

/// Terminal record of one battle or dungeon run.
///
/// `xp_gained` and `gold_gained` are per surviving participant.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleReport {
    pub outcome: BattleOutcome,
    pub xp_gained: u32,
    pub gold_gained: u32,
    pub loot: Vec<LootDrop>,
    pub level_ups: Vec<LevelUpRecord>,
    pub rounds: u32,
}

impl BattleReport {
    pub fn empty(outcome: BattleOutcome, rounds: u32) -> Self {
        Self {
            outcome,
            xp_gained: 0,
            gold_gained: 0,
            loot: Vec::new(),
            level_ups: Vec::new(),
            rounds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::SequenceRng;

    #[test]
    fn equipment_bonus_then_solo_multiplier() {
        let gear = EquipmentBonuses::default()
            .with_special(SpecialBonus::XpBonusPercent, 50)
            .with_special(SpecialBonus::GoldBonusPercent, 10);
        let rewards = Rewards::new(20, 30).scaled(4).with_equipment_bonus(&gear);
        assert_eq!(rewards, Rewards::new(120, 132));
    }

    #[test]
    fn equipment_bonus_saturates() {
        let gear = EquipmentBonuses::default()
            .with_special(SpecialBonus::XpBonusPercent, 50)
            .with_special(SpecialBonus::GoldBonusPercent, 100);
        let rewards = Rewards::new(u32::MAX, u32::MAX - 10).with_equipment_bonus(&gear);
        assert_eq!(rewards, Rewards::new(u32::MAX, u32::MAX));
    }

    #[test]
    fn elite_rolls_twice() {
        assert_eq!(loot_rolls(false), 1);
        assert_eq!(loot_rolls(true), 2);

        let mut rng = SequenceRng::new(vec![0.3, 0.9]);
        assert_eq!(roll_loot(true, &mut rng), 1);
        let mut rng = SequenceRng::constant(0.1);
        assert_eq!(roll_loot(true, &mut rng), 2);
        assert_eq!(roll_loot(false, &mut rng), 1);
    }

    #[test]
    fn defeat_penalties_by_mode() {
        assert_eq!(defeat_hp(BattleMode::Pve, 80), 1);
        assert_eq!(defeat_hp(BattleMode::Pvp, 80), 1);
        assert_eq!(defeat_hp(BattleMode::Dungeon, 81), 40);
    }
}
