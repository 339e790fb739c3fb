//! Common error infrastructure for combat-core.
//!
//! Domain errors for rejected actions live here alongside the shared
//! [`ErrorSeverity`] classification used by the runtime when deciding whether a
//! failure forfeits a turn or aborts a battle.

use crate::state::CombatantId;

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the actor may pick something else inside the same turn window
/// - **Validation**: invalid input, resolved as a forfeited turn
/// - **Internal**: unexpected state inconsistency that indicates a bug
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    Recoverable,
    Validation,
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all combat-core errors.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Reasons an action is rejected before it mutates any state.
///
/// A rejected action never produces an `Err` at the battle level: the
/// scheduler converts it into a forfeited turn with one log line.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionError {
    #[error("invalid selection")]
    InvalidSelection,

    #[error("no skills known")]
    NoSkillsKnown,

    #[error("no consumable items")]
    NoConsumables,

    #[error("insufficient mana: {required} required, {available} available")]
    InsufficientMp { required: u32, available: u32 },

    #[error("item {item} is not available in sufficient quantity")]
    InsufficientItem { item: String },

    #[error("target {target} not found")]
    TargetNotFound { target: CombatantId },

    #[error("{actor} is defeated and cannot act")]
    ActorDefeated { actor: CombatantId },
}

impl GameError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InsufficientMp { .. } | Self::InsufficientItem { .. } => {
                ErrorSeverity::Recoverable
            }
            Self::InvalidSelection
            | Self::NoSkillsKnown
            | Self::NoConsumables
            | Self::TargetNotFound { .. } => ErrorSeverity::Validation,
            Self::ActorDefeated { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidSelection => "ACTION_INVALID_SELECTION",
            Self::NoSkillsKnown => "ACTION_NO_SKILLS",
            Self::NoConsumables => "ACTION_NO_CONSUMABLES",
            Self::InsufficientMp { .. } => "ACTION_INSUFFICIENT_MP",
            Self::InsufficientItem { .. } => "ACTION_INSUFFICIENT_ITEM",
            Self::TargetNotFound { .. } => "ACTION_TARGET_NOT_FOUND",
            Self::ActorDefeated { .. } => "ACTION_ACTOR_DEFEATED",
        }
    }
}
