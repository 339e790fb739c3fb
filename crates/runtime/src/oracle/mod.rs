//! Static game content consulted by battles.
//!
//! Catalog traits describe read-only content (skills, enemies, loot pools,
//! dungeons). The in-memory implementations are bundled into an
//! [`OracleManager`] so the scheduler reaches every catalog through one value.
//! Dynamic data lives in [`crate::repository`].
mod dungeons;
mod enemies;
mod loot;
mod skills;
mod traits;

use std::sync::Arc;

pub use dungeons::DungeonOracleImpl;
pub use enemies::EnemyOracleImpl;
pub use loot::LootOracleImpl;
pub use skills::SkillOracleImpl;
pub use traits::{DungeonCatalog, EnemyCatalog, LootTable, SkillCatalog};

/// Manages all catalog implementations and provides unified access
#[derive(Clone)]
pub struct OracleManager {
    pub(crate) skills: Arc<dyn SkillCatalog>,
    pub(crate) enemies: Arc<dyn EnemyCatalog>,
    pub(crate) loot: Arc<dyn LootTable>,
    pub(crate) dungeons: Arc<dyn DungeonCatalog>,
}

impl OracleManager {
    /// Creates a new oracle manager
    pub fn new(
        skills: Arc<dyn SkillCatalog>,
        enemies: Arc<dyn EnemyCatalog>,
        loot: Arc<dyn LootTable>,
        dungeons: Arc<dyn DungeonCatalog>,
    ) -> Self {
        Self {
            skills,
            enemies,
            loot,
            dungeons,
        }
    }

    pub fn skills(&self) -> &dyn SkillCatalog {
        self.skills.as_ref()
    }

    pub fn enemies(&self) -> &dyn EnemyCatalog {
        self.enemies.as_ref()
    }

    pub fn loot(&self) -> &dyn LootTable {
        self.loot.as_ref()
    }

    pub fn dungeons(&self) -> &dyn DungeonCatalog {
        self.dungeons.as_ref()
    }
}
