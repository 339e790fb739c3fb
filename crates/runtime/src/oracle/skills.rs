use combat_core::{CharacterClass, Skill};

use super::SkillCatalog;

/// SkillCatalog implementation with static skill definitions
#[derive(Default)]
pub struct SkillOracleImpl {
    skills: Vec<Skill>,
}

impl SkillOracleImpl {
    pub fn new(skills: Vec<Skill>) -> Self {
        Self { skills }
    }

    pub fn add_skill(&mut self, skill: Skill) {
        self.skills.push(skill);
    }
}

impl SkillCatalog for SkillOracleImpl {
    fn for_class_and_level(&self, class: CharacterClass, level: u32) -> Vec<Skill> {
        self.skills
            .iter()
            .filter(|skill| skill.usable_by(class, level))
            .cloned()
            .collect()
    }
}
