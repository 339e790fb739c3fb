//! Storage contracts for the dynamic data a battle reads and writes.
//!
//! Calls are synchronous from the engine's point of view. The engine never
//! retries; a failure propagates out of the battle and the session guard
//! still releases its participants.

use combat_core::{
    CharacterPatch, CharacterSheet, EquipmentBonuses, InventoryEntry, ItemDefinition, ItemId,
    UserId,
};

use super::Result;

pub trait CharacterStore: Send + Sync {
    fn get(&self, user: UserId) -> Result<Option<CharacterSheet>>;

    /// Writes every `Some` field of `patch`. Fails with `NotFound` for
    /// unknown users.
    fn update(&self, user: UserId, patch: &CharacterPatch) -> Result<()>;
}

pub trait InventoryStore: Send + Sync {
    fn get(&self, user: UserId) -> Result<Vec<InventoryEntry>>;

    /// Removes `quantity` units. Returns `false`, changing nothing, when the
    /// user holds fewer.
    fn remove(
        &self,
        user: UserId,
        item: ItemId,
        quantity: u32,
        enhancement: u32,
    ) -> Result<bool>;

    fn add(
        &self,
        user: UserId,
        item: &ItemDefinition,
        quantity: u32,
        enhancement: u32,
    ) -> Result<()>;
}

pub trait EquipmentStore: Send + Sync {
    /// Aggregate bonuses of everything the user has equipped.
    fn bonuses(&self, user: UserId) -> Result<EquipmentBonuses>;
}

pub trait QuestLog: Send + Sync {
    /// Counts one kill of `enemy` (catalog name) towards active quests.
    fn record_kill(&self, user: UserId, enemy: &str) -> Result<()>;
}
