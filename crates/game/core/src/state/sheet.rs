//! Persistent character record and partial updates to it.

use super::UserId;
use crate::config::BattleConfig;
use crate::stats::{Attributes, CharacterClass};

/// Snapshot of a character as stored outside the battle engine.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterSheet {
    pub user: UserId,
    pub name: String,
    pub class: CharacterClass,
    pub level: u32,
    pub experience: u32,
    pub gold: u32,
    pub hp: u32,
    pub max_hp: u32,
    pub mp: u32,
    pub max_mp: u32,
    pub attributes: Attributes,
    pub unspent_attribute_points: u32,
    pub pvp_wins: u32,
    pub pvp_losses: u32,
}

impl CharacterSheet {
    /// A fresh level-1 character at full resources.
    pub fn new(
        user: UserId,
        name: impl Into<String>,
        class: CharacterClass,
        attributes: Attributes,
        max_hp: u32,
        max_mp: u32,
    ) -> Self {
        Self {
            user,
            name: name.into(),
            class,
            level: 1,
            experience: 0,
            gold: 0,
            hp: max_hp,
            max_hp,
            mp: max_mp,
            max_mp,
            attributes,
            unspent_attribute_points: 0,
            pvp_wins: 0,
            pvp_losses: 0,
        }
    }

    /// Experience needed to leave the current level.
    pub fn xp_to_next_level(&self) -> u32 {
        self.level * BattleConfig::XP_PER_LEVEL
    }
}

/// Field-level update for a [`CharacterSheet`]. `None` leaves a field untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterPatch {
    pub level: Option<u32>,
    pub experience: Option<u32>,
    pub gold: Option<u32>,
    pub hp: Option<u32>,
    pub max_hp: Option<u32>,
    pub mp: Option<u32>,
    pub max_mp: Option<u32>,
    pub attributes: Option<Attributes>,
    pub unspent_attribute_points: Option<u32>,
    pub pvp_wins: Option<u32>,
    pub pvp_losses: Option<u32>,
}

impl CharacterPatch {
    pub fn hp(hp: u32) -> Self {
        Self {
            hp: Some(hp),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Writes every `Some` field into `sheet`. Current HP/MP are clamped to
    /// the (possibly updated) maxima.
    pub fn apply_to(&self, sheet: &mut CharacterSheet) {
        if let Some(level) = self.level {
            sheet.level = level;
        }
        if let Some(experience) = self.experience {
            sheet.experience = experience;
        }
        if let Some(gold) = self.gold {
            sheet.gold = gold;
        }
        if let Some(max_hp) = self.max_hp {
            sheet.max_hp = max_hp;
        }
        if let Some(max_mp) = self.max_mp {
            sheet.max_mp = max_mp;
        }
        if let Some(hp) = self.hp {
            sheet.hp = hp;
        }
        if let Some(mp) = self.mp {
            sheet.mp = mp;
        }
        if let Some(attributes) = self.attributes {
            sheet.attributes = attributes;
        }
        if let Some(points) = self.unspent_attribute_points {
            sheet.unspent_attribute_points = points;
        }
        if let Some(wins) = self.pvp_wins {
            sheet.pvp_wins = wins;
        }
        if let Some(losses) = self.pvp_losses {
            sheet.pvp_losses = losses;
        }
        sheet.hp = sheet.hp.min(sheet.max_hp);
        sheet.mp = sheet.mp.min(sheet.max_mp);
    }
}
