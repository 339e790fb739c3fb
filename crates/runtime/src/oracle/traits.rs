//! Read-only catalog contracts.

use combat_core::{CharacterClass, DungeonInfo, EnemyTemplate, ItemDefinition, RngSource, Skill};

pub trait SkillCatalog: Send + Sync {
    /// Skills of `class` whose level gate `level` meets.
    fn for_class_and_level(&self, class: CharacterClass, level: u32) -> Vec<Skill>;
}

pub trait EnemyCatalog: Send + Sync {
    fn by_name(&self, name: &str) -> Option<EnemyTemplate>;

    /// A uniformly chosen enemy whose level band contains `level`.
    fn random(&self, level: u32, rng: &mut dyn RngSource) -> Option<EnemyTemplate>;
}

pub trait LootTable: Send + Sync {
    /// A uniformly chosen item droppable at `level`.
    fn random(&self, level: u32, rng: &mut dyn RngSource) -> Option<ItemDefinition>;

    /// Special drops of a dungeon boss.
    fn boss_loot(&self, boss: &str) -> Vec<ItemDefinition>;
}

pub trait DungeonCatalog: Send + Sync {
    fn by_name(&self, name: &str) -> Option<DungeonInfo>;
}
