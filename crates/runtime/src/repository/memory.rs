//! In-memory storage collaborators for tests and local runs.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use combat_core::{
    CharacterPatch, CharacterSheet, EquipmentBonuses, InventoryEntry, ItemDefinition, ItemId,
    UserId,
};

use super::{CharacterStore, EquipmentStore, InventoryStore, QuestLog, RepositoryError, Result};

/// Implements every storage trait over plain maps.
#[derive(Default)]
pub struct InMemoryStore {
    characters: RwLock<HashMap<UserId, CharacterSheet>>,
    inventories: RwLock<HashMap<UserId, Vec<InventoryEntry>>>,
    equipment: RwLock<HashMap<UserId, EquipmentBonuses>>,
    kills: RwLock<HashMap<UserId, BTreeMap<String, u32>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_character(&self, sheet: CharacterSheet) -> Result<()> {
        let mut characters = self
            .characters
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        characters.insert(sheet.user, sheet);
        Ok(())
    }

    pub fn set_equipment(&self, user: UserId, bonuses: EquipmentBonuses) -> Result<()> {
        let mut equipment = self
            .equipment
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        equipment.insert(user, bonuses);
        Ok(())
    }

    /// Recorded kills of `enemy` by `user`.
    pub fn kills(&self, user: UserId, enemy: &str) -> Result<u32> {
        let kills = self
            .kills
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(kills
            .get(&user)
            .and_then(|log| log.get(enemy))
            .copied()
            .unwrap_or(0))
    }

    /// Units of `item` held by `user`, over all enhancement levels.
    pub fn quantity(&self, user: UserId, item: ItemId) -> Result<u32> {
        Ok(InventoryStore::get(self, user)?
            .iter()
            .filter(|entry| entry.item.id == item)
            .map(|entry| entry.quantity)
            .sum())
    }
}

impl CharacterStore for InMemoryStore {
    fn get(&self, user: UserId) -> Result<Option<CharacterSheet>> {
        let characters = self
            .characters
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(characters.get(&user).cloned())
    }

    fn update(&self, user: UserId, patch: &CharacterPatch) -> Result<()> {
        let mut characters = self
            .characters
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let sheet = characters
            .get_mut(&user)
            .ok_or_else(|| RepositoryError::NotFound {
                entity: format!("character {user}"),
            })?;
        patch.apply_to(sheet);
        Ok(())
    }
}

impl InventoryStore for InMemoryStore {
    fn get(&self, user: UserId) -> Result<Vec<InventoryEntry>> {
        let inventories = self
            .inventories
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(inventories.get(&user).cloned().unwrap_or_default())
    }

    fn remove(
        &self,
        user: UserId,
        item: ItemId,
        quantity: u32,
        enhancement: u32,
    ) -> Result<bool> {
        let mut inventories = self
            .inventories
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let Some(entries) = inventories.get_mut(&user) else {
            return Ok(false);
        };
        let Some(index) = entries
            .iter()
            .position(|e| e.item.id == item && e.enhancement == enhancement)
        else {
            return Ok(false);
        };
        if entries[index].quantity < quantity {
            return Ok(false);
        }
        entries[index].quantity -= quantity;
        if entries[index].quantity == 0 {
            entries.remove(index);
        }
        Ok(true)
    }

    fn add(
        &self,
        user: UserId,
        item: &ItemDefinition,
        quantity: u32,
        enhancement: u32,
    ) -> Result<()> {
        if quantity == 0 {
            return Ok(());
        }
        let mut inventories = self
            .inventories
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let entries = inventories.entry(user).or_default();
        match entries
            .iter_mut()
            .find(|e| e.item.id == item.id && e.enhancement == enhancement)
        {
            Some(entry) => entry.quantity += quantity,
            None => entries.push(InventoryEntry {
                item: item.clone(),
                quantity,
                enhancement,
            }),
        }
        Ok(())
    }
}

impl EquipmentStore for InMemoryStore {
    fn bonuses(&self, user: UserId) -> Result<EquipmentBonuses> {
        let equipment = self
            .equipment
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(equipment.get(&user).cloned().unwrap_or_default())
    }
}

impl QuestLog for InMemoryStore {
    fn record_kill(&self, user: UserId, enemy: &str) -> Result<()> {
        let mut kills = self
            .kills
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        *kills
            .entry(user)
            .or_default()
            .entry(enemy.to_string())
            .or_default() += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{Attributes, CharacterClass, ItemEffect};

    #[test]
    fn remove_refuses_to_go_negative() {
        let store = InMemoryStore::new();
        let potion = ItemDefinition::consumable(1, "Potion", ItemEffect::HealHp(20));
        store.add(UserId(1), &potion, 2, 0).unwrap();

        assert!(!store.remove(UserId(1), potion.id, 3, 0).unwrap());
        assert!(store.remove(UserId(1), potion.id, 2, 0).unwrap());
        assert_eq!(store.quantity(UserId(1), potion.id).unwrap(), 0);
        assert!(InventoryStore::get(&store, UserId(1)).unwrap().is_empty());
    }

    #[test]
    fn enhancement_levels_are_separate_stacks() {
        let store = InMemoryStore::new();
        let potion = ItemDefinition::consumable(1, "Potion", ItemEffect::HealHp(20));
        store.add(UserId(1), &potion, 1, 0).unwrap();
        store.add(UserId(1), &potion, 1, 2).unwrap();
        assert!(!store.remove(UserId(1), potion.id, 2, 0).unwrap());
        assert_eq!(InventoryStore::get(&store, UserId(1)).unwrap().len(), 2);
    }

    #[test]
    fn update_unknown_character_fails() {
        let store = InMemoryStore::new();
        let err = store.update(UserId(9), &CharacterPatch::hp(1)).unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { .. }));

        let sheet = CharacterSheet::new(
            UserId(9),
            "Rin",
            CharacterClass::Cleric,
            Attributes::uniform(8),
            50,
            20,
        );
        store.insert_character(sheet).unwrap();
        store.update(UserId(9), &CharacterPatch::hp(1)).unwrap();
        assert_eq!(CharacterStore::get(&store, UserId(9)).unwrap().unwrap().hp, 1);
    }

    #[test]
    fn kills_accumulate_per_enemy() {
        let store = InMemoryStore::new();
        store.record_kill(UserId(2), "Goblin").unwrap();
        store.record_kill(UserId(2), "Goblin").unwrap();
        assert_eq!(store.kills(UserId(2), "Goblin").unwrap(), 2);
        assert_eq!(store.kills(UserId(2), "Wolf").unwrap(), 0);
    }
}
