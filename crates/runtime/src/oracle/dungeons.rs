use std::collections::HashMap;

use combat_core::DungeonInfo;

use super::DungeonCatalog;

#[derive(Default)]
pub struct DungeonOracleImpl {
    dungeons: HashMap<String, DungeonInfo>,
}

impl DungeonOracleImpl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_dungeon(&mut self, dungeon: DungeonInfo) {
        self.dungeons.insert(dungeon.name.clone(), dungeon);
    }
}

impl DungeonCatalog for DungeonOracleImpl {
    fn by_name(&self, name: &str) -> Option<DungeonInfo> {
        self.dungeons.get(name).cloned()
    }
}
