use std::collections::HashMap;

use combat_core::{ItemDefinition, RngSource};

use super::LootTable;

/// LootTable implementation with static drop pools
#[derive(Default)]
pub struct LootOracleImpl {
    items: Vec<ItemDefinition>,
    boss_drops: HashMap<String, Vec<ItemDefinition>>,
}

impl LootOracleImpl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_item(&mut self, item: ItemDefinition) {
        self.items.push(item);
    }

    pub fn add_boss_drop(&mut self, boss: impl Into<String>, item: ItemDefinition) {
        self.boss_drops.entry(boss.into()).or_default().push(item);
    }
}

impl LootTable for LootOracleImpl {
    fn random(&self, level: u32, rng: &mut dyn RngSource) -> Option<ItemDefinition> {
        let droppable: Vec<&ItemDefinition> = self
            .items
            .iter()
            .filter(|item| item.min_level <= level)
            .collect();
        if droppable.is_empty() {
            return None;
        }
        Some(droppable[rng.index(droppable.len())].clone())
    }

    fn boss_loot(&self, boss: &str) -> Vec<ItemDefinition> {
        self.boss_drops.get(boss).cloned().unwrap_or_default()
    }
}
