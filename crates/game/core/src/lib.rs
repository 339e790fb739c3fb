//! Deterministic combat rules shared by every battle mode.
//!
//! `combat-core` defines the canonical rules (stats, status effects, actions,
//! rewards) and exposes pure APIs with no I/O. Randomness is injected through
//! [`RngSource`], so a battle replays exactly under a scripted source. All
//! mutation of a battle flows through [`ActionResolver`] and the effect
//! tracker on [`StatusEffects`]; the async runtime crate drives turn order and
//! persistence on top of these types.
pub mod action;
pub mod catalog;
pub mod combat;
pub mod config;
pub mod env;
pub mod error;
pub mod reward;
pub mod state;
pub mod stats;

pub use action::{
    ActionOutcome, ActionResolver, BattleAction, CombatDelta, ForfeitReason, PersistentChange,
    Resolution,
};
pub use catalog::{
    DungeonInfo, DungeonMode, DungeonStage, EnemyTemplate, InventoryEntry, ItemCategory,
    ItemDefinition, ItemEffect, ItemId, Skill, SkillEffect,
};
pub use config::{BattleConfig, DamageSpread};
pub use env::{PcgRng, RngSource, SequenceRng};
pub use error::{ActionError, ErrorSeverity, GameError};
pub use reward::{BattleReport, LevelUp, LevelUpRecord, LootDrop, PendingLevelUp, Rewards};
pub use state::{
    BattleMode, BattleOutcome, BattleState, BattleView, CharacterPatch, CharacterProfile,
    CharacterSheet, Combatant, CombatantId, CombatantView, EffectKind, Profile, Side, StatTarget,
    StatusEffect, StatusEffects, UserId,
};
pub use stats::{
    Attribute, Attributes, CharacterClass, ClassKind, EquipmentBonuses, ResourceMeter,
    SpecialBonus, StatResolver, round_half_even,
};
