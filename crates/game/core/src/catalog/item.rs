/// Identifier of an item definition in the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemCategory {
    Potion,
    Weapon,
    Armor,
    Material,
}

/// Effect of a consumable. Heals are battle scoped; the rest are permanent
/// character changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemEffect {
    HealHp(u32),
    HealMp(u32),
    IncreaseMaxHp(u32),
    GainXp(u32),
    IncreaseDexterity(u32),
}

impl ItemEffect {
    /// Effects that only restore current resources.
    pub const fn is_heal(self) -> bool {
        matches!(self, Self::HealHp(_) | Self::HealMp(_))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemDefinition {
    pub id: ItemId,
    pub name: String,
    pub category: ItemCategory,
    /// Loot rolls only produce items at or below the player's level.
    pub min_level: u32,
    pub effect: Option<ItemEffect>,
}

impl ItemDefinition {
    pub fn consumable(id: u32, name: impl Into<String>, effect: ItemEffect) -> Self {
        Self {
            id: ItemId(id),
            name: name.into(),
            category: ItemCategory::Potion,
            min_level: 1,
            effect: Some(effect),
        }
    }

    pub fn is_consumable(&self) -> bool {
        self.category == ItemCategory::Potion && self.effect.is_some()
    }
}

/// One inventory line: an item, how many, and its enhancement level.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InventoryEntry {
    pub item: ItemDefinition,
    pub quantity: u32,
    pub enhancement: u32,
}

impl InventoryEntry {
    pub fn new(item: ItemDefinition, quantity: u32) -> Self {
        Self {
            item,
            quantity,
            enhancement: 0,
        }
    }
}
