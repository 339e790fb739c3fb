use crate::stats::{Attribute, Attributes, CharacterClass, round_half_even};

/// What a skill does once its MP is paid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillEffect {
    /// `magnitude - defense`
    Damage,
    /// `magnitude - defense / 2`
    DamagePiercing,
    /// Damage, then a poison of half the magnitude.
    DamageAndPoison,
    Heal,
    BuffAttack,
    BuffDefense,
    DebuffDefense,
}

impl SkillEffect {
    /// Effects that need an opposing target.
    pub const fn is_offensive(self) -> bool {
        matches!(
            self,
            Self::Damage | Self::DamagePiercing | Self::DamageAndPoison | Self::DebuffDefense
        )
    }
}

/// Immutable catalog entry for a class skill.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Skill {
    pub name: String,
    pub description: String,
    pub class: CharacterClass,
    pub min_level: u32,
    pub mp_cost: u32,
    pub effect: SkillEffect,
    pub base_value: f64,
    pub scaling_stat: Option<Attribute>,
    pub scaling_factor: f64,
    pub effect_duration: u32,
}

impl Skill {
    /// `round(base_value + scaling_stat * scaling_factor)`, never negative.
    pub fn magnitude(&self, attributes: &Attributes) -> u32 {
        let scaling = self
            .scaling_stat
            .map_or(0.0, |stat| f64::from(attributes.get(stat)) * self.scaling_factor);
        round_half_even(self.base_value + scaling).max(0) as u32
    }

    pub fn usable_by(&self, class: CharacterClass, level: u32) -> bool {
        self.class == class && level >= self.min_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fireball() -> Skill {
        Skill {
            name: "Fireball".into(),
            description: String::new(),
            class: CharacterClass::Sorcerer,
            min_level: 3,
            mp_cost: 10,
            effect: SkillEffect::Damage,
            base_value: 10.0,
            scaling_stat: Some(Attribute::Intelligence),
            scaling_factor: 1.5,
            effect_duration: 0,
        }
    }

    #[test]
    fn magnitude_scales_with_attribute() {
        let mut attrs = Attributes::uniform(10);
        attrs.intelligence = 13;
        // 10 + 19.5 = 29.5 rounds to even
        assert_eq!(fireball().magnitude(&attrs), 30);
        attrs.intelligence = 15;
        // 10 + 22.5 = 32.5
        assert_eq!(fireball().magnitude(&attrs), 32);
    }

    #[test]
    fn level_and_class_gate() {
        let skill = fireball();
        assert!(!skill.usable_by(CharacterClass::Sorcerer, 2));
        assert!(skill.usable_by(CharacterClass::Sorcerer, 3));
        assert!(!skill.usable_by(CharacterClass::Bard, 9));
    }
}
