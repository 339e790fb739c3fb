use super::ForfeitReason;
use crate::catalog::ItemId;
use crate::state::{CombatantId, EffectKind};
use crate::stats::Attribute;

/// How a resolved turn ended.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Resolution {
    Acted,
    Forfeited(ForfeitReason),
    Fled,
}

/// A single mutation applied to battle state.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatDelta {
    Damaged { target: CombatantId, amount: u32 },
    Healed { target: CombatantId, amount: u32 },
    ManaRestored { target: CombatantId, amount: u32 },
    ManaSpent { actor: CombatantId, amount: u32 },
    EffectApplied {
        target: CombatantId,
        kind: EffectKind,
        magnitude: u32,
        duration: u32,
    },
    Defending { actor: CombatantId },
    Defeated { target: CombatantId },
}

/// A change that outlives the battle and must reach storage right away.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PersistentChange {
    /// One unit of the item was used up.
    ConsumeItem { item: ItemId },
    RaiseMaxHp(u32),
    GainExperience(u32),
    RaiseAttribute { attribute: Attribute, amount: u32 },
}

/// Everything one call to the resolver produced, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionOutcome {
    pub lines: Vec<String>,
    pub resolution: Resolution,
    pub deltas: Vec<CombatDelta>,
    pub persistent: Vec<PersistentChange>,
}

impl ActionOutcome {
    pub(crate) fn acted() -> Self {
        Self {
            lines: Vec::new(),
            resolution: Resolution::Acted,
            deltas: Vec::new(),
            persistent: Vec::new(),
        }
    }

    pub(crate) fn forfeited(actor: &str, reason: ForfeitReason) -> Self {
        Self {
            lines: vec![reason.describe(actor)],
            resolution: Resolution::Forfeited(reason),
            deltas: Vec::new(),
            persistent: Vec::new(),
        }
    }

    pub(crate) fn line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub(crate) fn delta(&mut self, delta: CombatDelta) {
        self.deltas.push(delta);
    }

    pub fn is_forfeit(&self) -> bool {
        matches!(self.resolution, Resolution::Forfeited(_))
    }

    /// Total damage dealt to `target` by this action.
    pub fn damage_to(&self, target: CombatantId) -> u32 {
        self.deltas
            .iter()
            .map(|delta| match delta {
                CombatDelta::Damaged { target: t, amount } if *t == target => *amount,
                _ => 0,
            })
            .sum()
    }
}
