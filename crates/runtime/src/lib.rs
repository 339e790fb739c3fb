//! Async battle orchestration on top of `combat-core`.
//!
//! This crate wires together the input port, catalog access, repositories
//! and the session registry into one service. Consumers build a
//! [`CombatService`], start hunts, duels and dungeon runs on it, and read the
//! narration from its [`EventBus`] or their own [`OutputSink`].
//!
//! Modules are organized by responsibility:
//! - [`service`] hosts the façade and its builder
//! - [`api`] exposes the ports downstream clients implement or call
//! - [`events`] provides the topic-based event bus and an in-memory sink
//! - [`registry`] enforces one active battle per user
//! - [`oracle`] and [`repository`] provide static content and dynamic data
//! - `scheduler` keeps turn order and settlement internal to the crate
pub mod api;
pub mod config;
pub mod events;
pub mod oracle;
pub mod registry;
pub mod repository;
pub mod rng;
pub mod service;

mod scheduler;

pub use api::{
    ActionProvider, AutoAttackProvider, ItemOption, NullSink, OutputSink, PlayerInput, Prompt,
    Result, RuntimeError, SkillOption,
};
pub use config::{PacingConfig, RuntimeConfig, TimeoutConfig};
pub use events::{BattleEvent, EventBus, MemorySink, Topic};
pub use oracle::{
    DungeonCatalog, DungeonOracleImpl, EnemyCatalog, EnemyOracleImpl, LootOracleImpl, LootTable,
    OracleManager, SkillCatalog, SkillOracleImpl,
};
pub use registry::{SessionGuard, SessionId, SessionInfo, SessionKind, SessionRegistry};
pub use repository::{
    CharacterStore, EquipmentStore, InMemoryStore, InventoryStore, QuestLog, RepositoryError,
    Stores,
};
pub use rng::{EntropyRng, RngFactory};
pub use service::{CombatService, CombatServiceBuilder};
