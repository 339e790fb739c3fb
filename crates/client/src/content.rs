//! Built-in demo world: a handful of enemies, items, dungeons and heroes.
use std::sync::Arc;

use anyhow::Result;
use combat_core::{
    Attribute, Attributes, CharacterClass, CharacterSheet, DungeonInfo, EnemyTemplate,
    EquipmentBonuses, ItemDefinition, ItemEffect, Skill, SkillEffect, SpecialBonus, UserId,
};
use combat_runtime::{
    DungeonOracleImpl, EnemyOracleImpl, InMemoryStore, InventoryStore, LootOracleImpl,
    OracleManager, SkillOracleImpl,
};

pub fn oracles() -> OracleManager {
    OracleManager::new(
        Arc::new(SkillOracleImpl::new(skills())),
        Arc::new(enemies()),
        Arc::new(loot()),
        Arc::new(dungeons()),
    )
}

fn skills() -> Vec<Skill> {
    vec![
        Skill {
            name: "Power Strike".into(),
            description: "A heavy two-handed blow.".into(),
            class: CharacterClass::Warrior,
            min_level: 1,
            mp_cost: 5,
            effect: SkillEffect::Damage,
            base_value: 8.0,
            scaling_stat: Some(Attribute::Strength),
            scaling_factor: 1.2,
            effect_duration: 0,
        },
        Skill {
            name: "Venom Blade".into(),
            description: "Cuts and leaves poison behind.".into(),
            class: CharacterClass::Rogue,
            min_level: 1,
            mp_cost: 6,
            effect: SkillEffect::DamageAndPoison,
            base_value: 6.0,
            scaling_stat: Some(Attribute::Dexterity),
            scaling_factor: 1.0,
            effect_duration: 3,
        },
        Skill {
            name: "Mend".into(),
            description: "Restores the caster's wounds.".into(),
            class: CharacterClass::Cleric,
            min_level: 1,
            mp_cost: 8,
            effect: SkillEffect::Heal,
            base_value: 12.0,
            scaling_stat: Some(Attribute::Wisdom),
            scaling_factor: 1.0,
            effect_duration: 0,
        },
    ]
}

fn enemies() -> EnemyOracleImpl {
    let mut enemies = EnemyOracleImpl::new();
    for template in [
        EnemyTemplate::new("Goblin", 30, 9, 2)
            .with_rewards(20, 8)
            .with_levels(1, 3),
        EnemyTemplate::new("Wolf", 26, 11, 1)
            .with_rewards(22, 5)
            .with_levels(1, 4),
        EnemyTemplate::new("Skeleton", 40, 12, 4)
            .with_rewards(35, 12)
            .with_levels(2, 6),
        EnemyTemplate::new("Goblin King", 90, 14, 5)
            .with_rewards(120, 60)
            .with_levels(10, 15),
    ] {
        enemies.add_enemy(template);
    }
    enemies
}

fn loot() -> LootOracleImpl {
    let mut loot = LootOracleImpl::new();
    loot.add_item(ItemDefinition::consumable(
        1,
        "Minor Healing Potion",
        ItemEffect::HealHp(25),
    ));
    loot.add_item(ItemDefinition::consumable(
        2,
        "Minor Mana Potion",
        ItemEffect::HealMp(15),
    ));
    loot.add_boss_drop(
        "Goblin King",
        ItemDefinition::consumable(10, "Crown Shard", ItemEffect::IncreaseMaxHp(5)),
    );
    loot
}

fn dungeons() -> DungeonOracleImpl {
    let mut dungeons = DungeonOracleImpl::new();
    dungeons.add_dungeon(DungeonInfo {
        name: "Goblin Warren".into(),
        level_requirement: 1,
        boss: "Goblin King".into(),
        enemy_pool: vec!["Goblin".into(), "Wolf".into()],
    });
    dungeons
}

/// Demo heroes, cycling through a few classes.
pub fn heroes(count: usize) -> Vec<CharacterSheet> {
    const ROSTER: [(&str, CharacterClass); 3] = [
        ("Aria", CharacterClass::Warrior),
        ("Bram", CharacterClass::Rogue),
        ("Cyra", CharacterClass::Cleric),
    ];
    (0..count.max(1))
        .map(|index| {
            let (name, class) = ROSTER[index % ROSTER.len()];
            let name = if index < ROSTER.len() {
                name.to_string()
            } else {
                format!("{name} {}", index / ROSTER.len() + 1)
            };
            CharacterSheet::new(
                UserId(index as u64 + 1),
                name,
                class,
                Attributes::new(14, 12, 12, 10, 10, 10),
                70,
                30,
            )
        })
        .collect()
}

/// Registers every hero with a couple of potions; the first hero also
/// wears a ring of insight.
pub fn seed_store(store: &InMemoryStore, heroes: &[CharacterSheet]) -> Result<()> {
    let potion = ItemDefinition::consumable(1, "Minor Healing Potion", ItemEffect::HealHp(25));
    for hero in heroes {
        store.insert_character(hero.clone())?;
        store.add(hero.user, &potion, 2, 0)?;
    }
    if let Some(first) = heroes.first() {
        store.set_equipment(
            first.user,
            EquipmentBonuses::default().with_special(SpecialBonus::XpBonusPercent, 10),
        )?;
    }
    Ok(())
}
