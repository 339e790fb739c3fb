//! Base attributes and character classes.

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// One of the six base attributes every character carries.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter, EnumString,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Attribute {
    Strength,
    Constitution,
    Dexterity,
    Intelligence,
    Wisdom,
    Charisma,
}

/// Base attribute block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attributes {
    pub strength: i32,
    pub constitution: i32,
    pub dexterity: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
}

impl Attributes {
    pub const fn new(
        strength: i32,
        constitution: i32,
        dexterity: i32,
        intelligence: i32,
        wisdom: i32,
        charisma: i32,
    ) -> Self {
        Self {
            strength,
            constitution,
            dexterity,
            intelligence,
            wisdom,
            charisma,
        }
    }

    /// Same value for every attribute.
    pub const fn uniform(value: i32) -> Self {
        Self::new(value, value, value, value, value, value)
    }

    pub fn get(&self, attribute: Attribute) -> i32 {
        match attribute {
            Attribute::Strength => self.strength,
            Attribute::Constitution => self.constitution,
            Attribute::Dexterity => self.dexterity,
            Attribute::Intelligence => self.intelligence,
            Attribute::Wisdom => self.wisdom,
            Attribute::Charisma => self.charisma,
        }
    }

    pub fn get_mut(&mut self, attribute: Attribute) -> &mut i32 {
        match attribute {
            Attribute::Strength => &mut self.strength,
            Attribute::Constitution => &mut self.constitution,
            Attribute::Dexterity => &mut self.dexterity,
            Attribute::Intelligence => &mut self.intelligence,
            Attribute::Wisdom => &mut self.wisdom,
            Attribute::Charisma => &mut self.charisma,
        }
    }

    /// Adds `amount` to one attribute and returns the new value.
    pub fn raise(&mut self, attribute: Attribute, amount: i32) -> i32 {
        let slot = self.get_mut(attribute);
        *slot += amount;
        *slot
    }
}

/// Whether a class fights with weapons or spells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClassKind {
    Physical,
    Magical,
}

/// Playable classes. Each has a key attribute and a skill pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CharacterClass {
    Warrior,
    Rogue,
    Ranger,
    Sorcerer,
    Bard,
    Cleric,
}

impl CharacterClass {
    pub const fn kind(self) -> ClassKind {
        match self {
            Self::Warrior | Self::Rogue | Self::Ranger => ClassKind::Physical,
            Self::Sorcerer | Self::Bard | Self::Cleric => ClassKind::Magical,
        }
    }

    pub const fn key_attribute(self) -> Attribute {
        match self {
            Self::Warrior => Attribute::Strength,
            Self::Rogue | Self::Ranger => Attribute::Dexterity,
            Self::Sorcerer => Attribute::Intelligence,
            Self::Bard => Attribute::Charisma,
            Self::Cleric => Attribute::Wisdom,
        }
    }

    /// Attribute used as the base of a basic attack.
    ///
    /// Physical classes swing with their key attribute, everyone else falls
    /// back to strength.
    pub const fn attack_attribute(self) -> Attribute {
        match self.kind() {
            ClassKind::Physical => self.key_attribute(),
            ClassKind::Magical => Attribute::Strength,
        }
    }
}
