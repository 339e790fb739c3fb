//! Equipment bonus aggregates.

use std::collections::BTreeMap;

use strum::{Display, EnumString};

use super::round_half_even;

/// Named special bonuses granted by equipment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum SpecialBonus {
    /// Heals the attacker for a share of basic-attack damage.
    LifestealPercent,
    XpBonusPercent,
    GoldBonusPercent,
}

/// Sum of everything a character has equipped.
///
/// `durations` carries optional turn limits for special bonuses; the battle
/// engine treats bonuses as active for the whole fight.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquipmentBonuses {
    pub attack: i32,
    pub defense: i32,
    pub special: BTreeMap<SpecialBonus, i32>,
    pub durations: BTreeMap<SpecialBonus, u32>,
}

impl EquipmentBonuses {
    pub fn new(attack: i32, defense: i32) -> Self {
        Self {
            attack,
            defense,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_special(mut self, bonus: SpecialBonus, percent: i32) -> Self {
        self.special.insert(bonus, percent);
        self
    }

    pub fn special(&self, bonus: SpecialBonus) -> Option<i32> {
        self.special.get(&bonus).copied().filter(|pct| *pct != 0)
    }

    /// `round(base * pct / 100)` for the given bonus, or 0 when absent.
    pub fn percent_of(&self, bonus: SpecialBonus, base: u32) -> u32 {
        match self.special(bonus) {
            Some(pct) => {
                round_half_even(f64::from(base) * f64::from(pct) / 100.0).max(0) as u32
            }
            None => 0,
        }
    }
}
