use super::{CharacterSheet, CombatantId, Side, StatusEffects, UserId};
use crate::catalog::EnemyTemplate;
use crate::stats::{Attributes, CharacterClass, EquipmentBonuses, ResourceMeter};

/// Player-specific combat data copied from the character sheet.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterProfile {
    pub user: UserId,
    pub class: CharacterClass,
    pub level: u32,
    pub attributes: Attributes,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Profile {
    Character(CharacterProfile),
    /// The (possibly elite-scaled) template the monster was spawned from.
    Monster(EnemyTemplate),
}

/// A participant in one battle.
///
/// Built from a snapshot at battle start and owned exclusively by that
/// battle. Nothing here is persisted until settlement.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub id: CombatantId,
    pub name: String,
    pub side: Side,
    pub profile: Profile,
    pub hp: ResourceMeter,
    pub mp: ResourceMeter,
    pub equipment: EquipmentBonuses,
    pub effects: StatusEffects,
    /// Set by the defend action; cleared when this combatant's next turn starts.
    pub defending: bool,
}

impl Combatant {
    /// Player combatant at the sheet's current HP/MP.
    pub fn from_sheet(
        id: CombatantId,
        side: Side,
        sheet: &CharacterSheet,
        equipment: EquipmentBonuses,
    ) -> Self {
        Self {
            id,
            name: sheet.name.clone(),
            side,
            profile: Profile::Character(CharacterProfile {
                user: sheet.user,
                class: sheet.class,
                level: sheet.level,
                attributes: sheet.attributes,
            }),
            hp: ResourceMeter::new(sheet.hp, sheet.max_hp),
            mp: ResourceMeter::new(sheet.mp, sheet.max_mp),
            equipment,
            effects: StatusEffects::new(),
            defending: false,
        }
    }

    /// Monster combatant at full HP on the opposing side.
    pub fn from_template(id: CombatantId, template: &EnemyTemplate) -> Self {
        Self {
            id,
            name: template.display_name(),
            side: Side::Opposition,
            profile: Profile::Monster(template.clone()),
            hp: ResourceMeter::full(template.hp),
            mp: ResourceMeter::default(),
            equipment: EquipmentBonuses::default(),
            effects: StatusEffects::new(),
            defending: false,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Restores HP and MP to their maxima.
    #[must_use]
    pub fn at_full_resources(mut self) -> Self {
        self.hp.refill();
        self.mp.refill();
        self
    }

    pub fn is_alive(&self) -> bool {
        !self.hp.is_depleted()
    }

    pub fn user(&self) -> Option<UserId> {
        match &self.profile {
            Profile::Character(character) => Some(character.user),
            Profile::Monster(_) => None,
        }
    }

    pub fn character(&self) -> Option<&CharacterProfile> {
        match &self.profile {
            Profile::Character(character) => Some(character),
            Profile::Monster(_) => None,
        }
    }

    pub fn character_mut(&mut self) -> Option<&mut CharacterProfile> {
        match &mut self.profile {
            Profile::Character(character) => Some(character),
            Profile::Monster(_) => None,
        }
    }

    pub fn monster(&self) -> Option<&EnemyTemplate> {
        match &self.profile {
            Profile::Monster(template) => Some(template),
            Profile::Character(_) => None,
        }
    }

    /// Monsters have no attribute block and count as zero.
    pub fn attributes(&self) -> Attributes {
        self.character()
            .map_or_else(Attributes::default, |c| c.attributes)
    }

    /// Starts this combatant's turn: drops the defend stance and fires any
    /// damage-over-time effect. Returns the log lines produced.
    pub fn begin_turn(&mut self) -> Vec<String> {
        self.defending = false;
        let mut lines = Vec::new();
        if let Some(tick) = self.effects.tick_damage_over_time() {
            self.hp.damage(tick.damage);
            lines.push(format!(
                "{} suffers {} poison damage. ({} turns left)",
                self.name, tick.damage, tick.remaining
            ));
            if tick.dissipated {
                lines.push(format!("The poison on {} has dissipated.", self.name));
            }
        }
        lines
    }
}
