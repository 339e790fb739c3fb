//! Repository layer for dynamic game data.
//!
//! Repositories handle data that CHANGES through battles:
//! - Character sheets (HP, XP, gold, level, attributes, ranked record)
//! - Inventories (consumed potions, loot)
//! - Quest progress
//!
//! Static content (skills, enemies, loot pools, dungeons) is handled by
//! Oracles, not Repositories.

mod error;
mod memory;
mod traits;

use std::sync::Arc;

pub use error::{RepositoryError, Result};
pub use memory::InMemoryStore;
pub use traits::{CharacterStore, EquipmentStore, InventoryStore, QuestLog};

/// Bundles the storage collaborators a battle needs.
#[derive(Clone)]
pub struct Stores {
    pub characters: Arc<dyn CharacterStore>,
    pub inventory: Arc<dyn InventoryStore>,
    pub equipment: Arc<dyn EquipmentStore>,
    pub quests: Arc<dyn QuestLog>,
}

impl Stores {
    pub fn new(
        characters: Arc<dyn CharacterStore>,
        inventory: Arc<dyn InventoryStore>,
        equipment: Arc<dyn EquipmentStore>,
        quests: Arc<dyn QuestLog>,
    ) -> Self {
        Self {
            characters,
            inventory,
            equipment,
            quests,
        }
    }

    /// Every collaborator backed by the same in-memory store.
    pub fn in_memory(store: Arc<InMemoryStore>) -> Self {
        Self {
            characters: store.clone(),
            inventory: store.clone(),
            equipment: store.clone(),
            quests: store,
        }
    }
}
