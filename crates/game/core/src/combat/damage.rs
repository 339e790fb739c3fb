//! Damage calculation.

use crate::config::{BattleConfig, DamageSpread};
use crate::env::RngSource;
use crate::stats::round_half_even;

// ============================================================================
// Basic Attack
// ============================================================================

/// Damage of a basic attack.
///
/// # Formula
///
/// ```text
/// damage = max(0, round(attack × U(low, high)) − defense)
/// ```
pub fn attack_damage<R: RngSource + ?Sized>(
    attack: i32,
    defense: i32,
    spread: DamageSpread,
    rng: &mut R,
) -> u32 {
    let multiplier = rng.uniform(spread.low, spread.high);
    scaled_attack_damage(attack, defense, multiplier)
}

/// [`attack_damage`] with the random multiplier already drawn.
pub fn scaled_attack_damage(attack: i32, defense: i32, multiplier: f64) -> u32 {
    let raw = round_half_even(f64::from(attack) * multiplier);
    (raw - i64::from(defense)).max(0) as u32
}

// ============================================================================
// Skill Damage
// ============================================================================

/// `max(0, magnitude − defense)`
pub fn skill_damage(magnitude: u32, defense: i32) -> u32 {
    (i64::from(magnitude) - i64::from(defense)).max(0) as u32
}

/// `max(0, magnitude − defense / 2)`
pub fn piercing_damage(magnitude: u32, defense: i32) -> u32 {
    skill_damage(magnitude, defense / BattleConfig::PIERCING_DEFENSE_DIVISOR)
}

/// Per-tick damage of the poison a skill of `magnitude` installs.
pub fn poison_damage(magnitude: u32) -> u32 {
    round_half_even(f64::from(magnitude) * BattleConfig::POISON_RATIO).max(0) as u32
}

// ============================================================================
// Lifesteal
// ============================================================================

/// `round(damage × pct / 100)`; nothing when no damage was dealt.
pub fn lifesteal(damage: u32, percent: i32) -> u32 {
    if damage == 0 || percent <= 0 {
        return 0;
    }
    round_half_even(f64::from(damage) * f64::from(percent) / 100.0).max(0) as u32
}
