//! Timed status effects (the effect tracker).
//!
//! A combatant holds at most one effect per [`EffectKind`] slot. Installing an
//! effect into an occupied slot replaces magnitude and duration; effects never
//! stack. An effect is removed the moment its remaining duration reaches zero.
//!
//! Two clocks drive expiry:
//! - damage over time ticks at the start of the afflicted combatant's own turn
//!   ([`StatusEffects::tick_damage_over_time`])
//! - buffs and debuffs tick once per completed round
//!   ([`StatusEffects::tick_round`])

use arrayvec::ArrayVec;

use crate::config::BattleConfig;

/// Stat targeted by a buff or debuff.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatTarget {
    Attack,
    Defense,
}

/// Slot key for a status effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectKind {
    Buff(StatTarget),
    Debuff(StatTarget),
    DamageOverTime,
}

impl EffectKind {
    pub const fn is_damage_over_time(self) -> bool {
        matches!(self, Self::DamageOverTime)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub kind: EffectKind,
    pub magnitude: u32,
    pub remaining: u32,
}

impl StatusEffect {
    pub const fn new(kind: EffectKind, magnitude: u32, duration: u32) -> Self {
        Self {
            kind,
            magnitude,
            remaining: duration,
        }
    }
}

/// Result of one damage-over-time application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DotTick {
    pub damage: u32,
    pub remaining: u32,
    /// True when this tick removed the effect.
    pub dissipated: bool,
}

/// Fixed-capacity set of active effects on one combatant.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    active: ArrayVec<StatusEffect, { BattleConfig::MAX_STATUS_EFFECTS }>,
}

impl StatusEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `effect`, replacing any effect in the same slot.
    ///
    /// Returns `false` when nothing was installed: a zero-duration effect
    /// would already be expired.
    pub fn apply(&mut self, effect: StatusEffect) -> bool {
        if effect.remaining == 0 {
            self.remove(effect.kind);
            return false;
        }
        if let Some(slot) = self.active.iter_mut().find(|e| e.kind == effect.kind) {
            *slot = effect;
            return true;
        }
        self.active.try_push(effect).is_ok()
    }

    pub fn get(&self, kind: EffectKind) -> Option<&StatusEffect> {
        self.active.iter().find(|e| e.kind == kind)
    }

    /// Magnitude of the effect in `kind`'s slot, or 0.
    pub fn magnitude(&self, kind: EffectKind) -> i32 {
        self.get(kind).map_or(0, |e| e.magnitude as i32)
    }

    pub fn remove(&mut self, kind: EffectKind) -> Option<StatusEffect> {
        let index = self.active.iter().position(|e| e.kind == kind)?;
        Some(self.active.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.active.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }

    /// Fires the damage-over-time effect once, if present.
    ///
    /// The caller applies `damage` directly to HP (defense is bypassed). The
    /// duration is decremented right after, and the effect is deleted when it
    /// reaches zero.
    pub fn tick_damage_over_time(&mut self) -> Option<DotTick> {
        let effect = self
            .active
            .iter_mut()
            .find(|e| e.kind.is_damage_over_time())?;
        let damage = effect.magnitude;
        effect.remaining = effect.remaining.saturating_sub(1);
        let remaining = effect.remaining;
        let dissipated = remaining == 0;
        if dissipated {
            self.remove(EffectKind::DamageOverTime);
        }
        Some(DotTick {
            damage,
            remaining,
            dissipated,
        })
    }

    /// Decrements every buff and debuff by one round and drops the expired.
    ///
    /// Returns the kinds that expired.
    pub fn tick_round(&mut self) -> Vec<EffectKind> {
        let mut expired = Vec::new();
        for effect in self.active.iter_mut() {
            if effect.kind.is_damage_over_time() {
                continue;
            }
            effect.remaining = effect.remaining.saturating_sub(1);
            if effect.remaining == 0 {
                expired.push(effect.kind);
            }
        }
        self.active.retain(|e| e.remaining > 0);
        expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POISON: EffectKind = EffectKind::DamageOverTime;
    const ATTACK_UP: EffectKind = EffectKind::Buff(StatTarget::Attack);

    #[test]
    fn poison_fires_exactly_duration_times() {
        let mut effects = StatusEffects::new();
        effects.apply(StatusEffect::new(POISON, 10, 3));

        let first = effects.tick_damage_over_time().unwrap();
        assert_eq!((first.damage, first.remaining, first.dissipated), (10, 2, false));
        let second = effects.tick_damage_over_time().unwrap();
        assert_eq!((second.damage, second.remaining, second.dissipated), (10, 1, false));
        let third = effects.tick_damage_over_time().unwrap();
        assert_eq!((third.damage, third.remaining, third.dissipated), (10, 0, true));

        assert!(effects.get(POISON).is_none());
        assert!(effects.tick_damage_over_time().is_none());
    }

    #[test]
    fn reapplying_replaces_instead_of_stacking() {
        let mut effects = StatusEffects::new();
        effects.apply(StatusEffect::new(ATTACK_UP, 5, 3));
        effects.apply(StatusEffect::new(ATTACK_UP, 8, 1));

        assert_eq!(effects.len(), 1);
        assert_eq!(effects.magnitude(ATTACK_UP), 8);
        assert_eq!(effects.get(ATTACK_UP).unwrap().remaining, 1);
    }

    #[test]
    fn round_tick_skips_damage_over_time() {
        let mut effects = StatusEffects::new();
        effects.apply(StatusEffect::new(ATTACK_UP, 5, 1));
        effects.apply(StatusEffect::new(POISON, 4, 2));

        let expired = effects.tick_round();
        assert_eq!(expired, vec![ATTACK_UP]);
        assert_eq!(effects.magnitude(ATTACK_UP), 0);
        assert_eq!(effects.get(POISON).unwrap().remaining, 2);
    }

    #[test]
    fn zero_duration_is_never_installed() {
        let mut effects = StatusEffects::new();
        assert!(!effects.apply(StatusEffect::new(ATTACK_UP, 5, 0)));
        assert!(effects.is_empty());
    }
}
