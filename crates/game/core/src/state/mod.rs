//! Battle state and the persistent character record it is built from.
//!
//! [`BattleState`] owns every [`Combatant`] of one battle. Combatants are only
//! mutated through [`crate::action::ActionResolver`] and the effect tracker in
//! [`StatusEffects`]; [`CharacterSheet`] is the storage-side view the runtime
//! loads before a fight and patches after it.
mod battle;
mod combatant;
mod effects;
mod ids;
mod sheet;

pub use battle::{BattleMode, BattleOutcome, BattleState, BattleView, CombatantView};
pub use combatant::{CharacterProfile, Combatant, Profile};
pub use effects::{DotTick, EffectKind, StatTarget, StatusEffect, StatusEffects};
pub use ids::{CombatantId, Side, UserId};
pub use sheet::{CharacterPatch, CharacterSheet};
