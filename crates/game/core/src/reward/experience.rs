//! Experience, gold and level progression.

use crate::config::BattleConfig;
use crate::state::CharacterSheet;
use crate::stats::Attribute;

/// A level gained by [`grant`] whose growth has not been applied yet.
///
/// Growth waits because milestone levels may first ask the player where to
/// put their attribute points, and max HP/MP growth reads the post-allocation
/// constitution and intelligence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingLevelUp {
    pub new_level: u32,
    pub attribute_points: u32,
}

/// A completed level-up.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelUp {
    pub new_level: u32,
    pub max_hp: u32,
    pub max_mp: u32,
    pub allocated: Vec<Attribute>,
    /// Points banked on the character for later.
    pub unspent_points: u32,
}

/// Adds experience and gold to `sheet`.
///
/// Advances at most one level per call, even when the award crosses several
/// thresholds; the remainder carries over.
pub fn grant(sheet: &mut CharacterSheet, xp: u32, gold: u32) -> Option<PendingLevelUp> {
    sheet.gold = sheet.gold.saturating_add(gold);
    sheet.experience = sheet.experience.saturating_add(xp);

    let threshold = sheet.xp_to_next_level();
    if sheet.experience < threshold {
        return None;
    }
    sheet.experience -= threshold;
    sheet.level += 1;

    let attribute_points = if sheet.level % BattleConfig::ATTRIBUTE_MILESTONE == 0 {
        BattleConfig::ATTRIBUTE_POINTS_PER_MILESTONE
    } else {
        0
    };
    Some(PendingLevelUp {
        new_level: sheet.level,
        attribute_points,
    })
}

/// Applies attribute allocations and resource growth, then fully restores
/// HP and MP.
///
/// At most `pending.attribute_points` allocations are honoured; points not
/// allocated are banked as unspent.
pub fn complete_level_up(
    sheet: &mut CharacterSheet,
    pending: PendingLevelUp,
    allocations: &[Attribute],
) -> LevelUp {
    let allocated: Vec<Attribute> = allocations
        .iter()
        .copied()
        .take(pending.attribute_points as usize)
        .collect();
    for attribute in &allocated {
        sheet.attributes.raise(*attribute, 1);
    }
    let unspent_points = pending.attribute_points - allocated.len() as u32;
    sheet.unspent_attribute_points += unspent_points;

    let divisor = BattleConfig::GROWTH_ATTRIBUTE_DIVISOR;
    let hp_growth = BattleConfig::HP_GROWTH_BASE as i32 + sheet.attributes.constitution / divisor;
    let mp_growth = BattleConfig::MP_GROWTH_BASE as i32 + sheet.attributes.intelligence / divisor;
    sheet.max_hp = sheet.max_hp.saturating_add(hp_growth.max(0) as u32);
    sheet.max_mp = sheet.max_mp.saturating_add(mp_growth.max(0) as u32);
    sheet.hp = sheet.max_hp;
    sheet.mp = sheet.max_mp;

    LevelUp {
        new_level: pending.new_level,
        max_hp: sheet.max_hp,
        max_mp: sheet.max_mp,
        allocated,
        unspent_points,
    }
}
