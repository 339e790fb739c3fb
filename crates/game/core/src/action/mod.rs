//! Turn actions and their resolution.
//!
//! [`BattleAction`] is the closed set of things a combatant can do with a
//! turn. [`ActionResolver::resolve`] applies one to a [`crate::BattleState`]
//! and reports the log lines, the state deltas and any change that has to be
//! persisted immediately (consumed items, permanent stat gains).
mod outcome;
mod resolver;
mod types;

pub use outcome::{ActionOutcome, CombatDelta, PersistentChange, Resolution};
pub use resolver::ActionResolver;
pub use types::{BattleAction, ForfeitReason};
