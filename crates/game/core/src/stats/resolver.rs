//! Effective combat stats.
//!
//! Pure functions of a combatant's current state. Effect durations are never
//! touched here; the effect tracker owns decrement timing.

use crate::config::BattleConfig;
use crate::state::{Combatant, EffectKind, Profile, StatTarget};

const ATTACK_UP: EffectKind = EffectKind::Buff(StatTarget::Attack);
const DEFENSE_UP: EffectKind = EffectKind::Buff(StatTarget::Defense);
const DEFENSE_DOWN: EffectKind = EffectKind::Debuff(StatTarget::Defense);

pub struct StatResolver;

impl StatResolver {
    /// Attack base + equipment attack + attack buff.
    ///
    /// Players use their class's attack attribute as the base; monsters use
    /// their template attack.
    pub fn effective_attack(combatant: &Combatant) -> i32 {
        let base = match &combatant.profile {
            Profile::Character(character) => character
                .attributes
                .get(character.class.attack_attribute()),
            Profile::Monster(template) => template.attack,
        };
        base + combatant.equipment.attack + combatant.effects.magnitude(ATTACK_UP)
    }

    /// Defense after equipment, dexterity, buffs, debuffs and the defend
    /// stance, clamped at zero.
    ///
    /// Players: `con + equip + dex/4 + buff - debuff`, plus `dex/2` while
    /// defending. Monsters: `defense + buff - debuff`.
    pub fn effective_defense(combatant: &Combatant) -> i32 {
        let base = match &combatant.profile {
            Profile::Character(character) => {
                let attrs = &character.attributes;
                let mut defense = attrs.constitution
                    + combatant.equipment.defense
                    + attrs.dexterity / BattleConfig::PASSIVE_DEXTERITY_DIVISOR;
                if combatant.defending {
                    defense += attrs.dexterity / BattleConfig::DEFEND_DEXTERITY_DIVISOR;
                }
                defense
            }
            Profile::Monster(template) => template.defense + combatant.equipment.defense,
        };
        let modified = base + combatant.effects.magnitude(DEFENSE_UP)
            - combatant.effects.magnitude(DEFENSE_DOWN);
        modified.max(0)
    }

    /// Flee probability `dexterity / 20`. Not clamped.
    pub fn flee_chance(combatant: &Combatant) -> f64 {
        f64::from(combatant.attributes().dexterity) / BattleConfig::FLEE_DEXTERITY_DIVISOR
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::EnemyTemplate;
    use crate::state::{CharacterSheet, CombatantId, Side, StatusEffect, UserId};
    use crate::stats::{Attributes, CharacterClass, EquipmentBonuses};

    fn rogue() -> Combatant {
        let attrs = Attributes::new(8, 10, 14, 9, 9, 9);
        let sheet = CharacterSheet::new(UserId(7), "Vex", CharacterClass::Rogue, attrs, 60, 20);
        Combatant::from_sheet(CombatantId(0), Side::Party, &sheet, EquipmentBonuses::new(4, 2))
    }

    #[test]
    fn physical_class_attacks_with_key_attribute() {
        let mut vex = rogue();
        assert_eq!(StatResolver::effective_attack(&vex), 14 + 4);
        vex.effects
            .apply(StatusEffect::new(ATTACK_UP, 5, 2));
        assert_eq!(StatResolver::effective_attack(&vex), 23);
    }

    #[test]
    fn defense_includes_dexterity_and_stance() {
        let mut vex = rogue();
        // 10 con + 2 equip + 14/4
        assert_eq!(StatResolver::effective_defense(&vex), 15);
        vex.defending = true;
        assert_eq!(StatResolver::effective_defense(&vex), 22);
    }

    #[test]
    fn debuffed_defense_never_goes_negative() {
        let template = EnemyTemplate::new("Slime", 20, 4, 3);
        let mut slime = Combatant::from_template(CombatantId(1), &template);
        slime.effects.apply(StatusEffect::new(DEFENSE_DOWN, 10, 2));
        assert_eq!(StatResolver::effective_defense(&slime), 0);
    }

    #[test]
    fn flee_chance_is_literal() {
        let mut vex = rogue();
        vex.character_mut().unwrap().attributes.dexterity = 30;
        assert_eq!(StatResolver::flee_chance(&vex), 1.5);
    }
}
