//! Static catalog values: skills, items, enemies and dungeons.
//!
//! These are read-only data handed to the engine by the runtime's oracles.
mod dungeon;
mod enemy;
mod item;
mod skill;

pub use dungeon::{DungeonInfo, DungeonMode, DungeonStage};
pub use enemy::EnemyTemplate;
pub use item::{InventoryEntry, ItemCategory, ItemDefinition, ItemEffect, ItemId};
pub use skill::{Skill, SkillEffect};
