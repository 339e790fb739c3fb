use std::collections::BTreeMap;

use combat_core::{EnemyTemplate, RngSource};

use super::EnemyCatalog;

/// EnemyCatalog implementation with static monster definitions.
///
/// Bosses live in the same table; dungeons reference them by name.
#[derive(Default)]
pub struct EnemyOracleImpl {
    enemies: BTreeMap<String, EnemyTemplate>,
}

impl EnemyOracleImpl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_enemy(&mut self, template: EnemyTemplate) {
        self.enemies.insert(template.name.clone(), template);
    }
}

impl EnemyCatalog for EnemyOracleImpl {
    fn by_name(&self, name: &str) -> Option<EnemyTemplate> {
        self.enemies.get(name).cloned()
    }

    fn random(&self, level: u32, rng: &mut dyn RngSource) -> Option<EnemyTemplate> {
        let candidates: Vec<&EnemyTemplate> = self
            .enemies
            .values()
            .filter(|e| e.min_level <= level && level <= e.max_level)
            .collect();
        if candidates.is_empty() {
            return None;
        }
        Some(candidates[rng.index(candidates.len())].clone())
    }
}
