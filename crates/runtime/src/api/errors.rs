//! Unified error types surfaced by the runtime API.
//!
//! Expected in-battle conditions (timeouts, bad selections, missing MP) are
//! never errors here: they resolve to forfeited turns. What remains is
//! rejected battle starts and collaborator failures, which callers bubble up.
use combat_core::{ErrorSeverity, GameError, UserId};
use thiserror::Error;

use crate::registry::SessionKind;
pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("user {user} is already in an active {kind} battle")]
    AlreadyInBattle { user: UserId, kind: SessionKind },

    #[error("user {user} appears more than once in the same battle")]
    DuplicateParticipant { user: UserId },

    #[error("a battle needs at least one participant")]
    EmptyParty,

    #[error("no enemy named {name:?} exists")]
    UnknownEnemy { name: String },

    #[error("no enemy is available for level {level}")]
    NoEnemyForLevel { level: u32 },

    #[error("no dungeon named {name:?} exists")]
    UnknownDungeon { name: String },

    #[error("user {user} is level {level}, {required} is required")]
    LevelTooLow {
        user: UserId,
        level: u32,
        required: u32,
    },

    #[error("user {user} has no character")]
    CharacterNotFound { user: UserId },

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("input provider failed: {0}")]
    Provider(String),

    #[error("combat service built without storage collaborators")]
    MissingStores,

    #[error("combat service built without catalogs")]
    MissingOracles,
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::AlreadyInBattle { .. }
            | Self::DuplicateParticipant { .. }
            | Self::EmptyParty
            | Self::UnknownEnemy { .. }
            | Self::NoEnemyForLevel { .. }
            | Self::UnknownDungeon { .. }
            | Self::LevelTooLow { .. }
            | Self::CharacterNotFound { .. } => ErrorSeverity::Validation,
            Self::Provider(_) => ErrorSeverity::Recoverable,
            Self::Repository(_)
            | Self::MissingStores
            | Self::MissingOracles => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyInBattle { .. } => "RUNTIME_ALREADY_IN_BATTLE",
            Self::DuplicateParticipant { .. } => "RUNTIME_DUPLICATE_PARTICIPANT",
            Self::EmptyParty => "RUNTIME_EMPTY_PARTY",
            Self::UnknownEnemy { .. } => "RUNTIME_UNKNOWN_ENEMY",
            Self::NoEnemyForLevel { .. } => "RUNTIME_NO_ENEMY_FOR_LEVEL",
            Self::UnknownDungeon { .. } => "RUNTIME_UNKNOWN_DUNGEON",
            Self::LevelTooLow { .. } => "RUNTIME_LEVEL_TOO_LOW",
            Self::CharacterNotFound { .. } => "RUNTIME_CHARACTER_NOT_FOUND",
            Self::Repository(_) => "RUNTIME_REPOSITORY",
            Self::Provider(_) => "RUNTIME_PROVIDER",
            Self::MissingStores => "RUNTIME_MISSING_STORES",
            Self::MissingOracles => "RUNTIME_MISSING_ORACLES",
        }
    }
}
