mod common;

use std::sync::Arc;
use std::time::Duration;

use combat_core::{
    Attribute, BattleMode, BattleOutcome, CharacterClass, EnemyTemplate, ItemDefinition,
    ItemEffect, ItemId, Skill, SkillEffect,
};
use combat_runtime::{BattleEvent, InventoryStore, PlayerInput, Prompt, RuntimeError, SessionKind};
use common::{Content, HERO, ScriptedProvider, VanishingInventory, World, attack, warrior};

/// Takes three basic attacks from a level-1 warrior and deals no damage back.
fn goblin() -> EnemyTemplate {
    EnemyTemplate::new("Goblin", 20, 5, 2)
        .with_rewards(30, 12)
        .with_levels(1, 5)
}

fn goblin_world() -> World {
    World::new(Content::default().with_enemy(goblin()))
}

fn war_cry() -> Skill {
    Skill {
        name: "War Cry".into(),
        description: "A shout that steadies the arm.".into(),
        class: CharacterClass::Warrior,
        min_level: 1,
        mp_cost: 8,
        effect: SkillEffect::BuffAttack,
        base_value: 3.0,
        scaling_stat: None,
        scaling_factor: 0.0,
        effect_duration: 2,
    }
}

#[tokio::test(start_paused = true)]
async fn autohunt_win_settles_rewards_and_releases_session() {
    let world = goblin_world();
    world.add(warrior(HERO, "Aria"));

    let report = world.service.autohunt(HERO).await.unwrap();

    assert_eq!(report.outcome, BattleOutcome::PlayerWon);
    assert_eq!((report.xp_gained, report.gold_gained), (30, 12));
    assert_eq!(report.rounds, 3);
    assert!(report.loot.is_empty());
    assert!(report.level_ups.is_empty());

    let sheet = world.sheet(HERO);
    assert_eq!((sheet.level, sheet.experience, sheet.gold), (1, 30, 12));
    assert_eq!(sheet.hp, 50);
    assert_eq!(world.store.kills(HERO, "Goblin").unwrap(), 1);
    assert!(!world.service.registry().is_active(HERO));

    let events = world.sink.events();
    assert!(matches!(
        events.first(),
        Some(BattleEvent::Started {
            mode: BattleMode::Pve,
            participants,
            ..
        }) if participants == &vec![HERO]
    ));
    assert!(matches!(
        events.last(),
        Some(BattleEvent::Finished { report: finished, .. }) if *finished == report
    ));
    assert!(world.said("A wild Goblin appears!"));
}

#[tokio::test(start_paused = true)]
async fn successful_escape_grants_nothing() {
    let world = goblin_world();
    let mut sheet = warrior(HERO, "Aria");
    sheet.attributes.dexterity = 20;
    sheet.hp = 30;
    world.add(sheet);

    let provider = ScriptedProvider::new([PlayerInput::Flee]);
    let report = world.service.hunt(HERO, &provider).await.unwrap();

    assert_eq!(report.outcome, BattleOutcome::Fled);
    assert_eq!(report.xp_gained, 0);
    let sheet = world.sheet(HERO);
    assert_eq!((sheet.hp, sheet.experience, sheet.gold), (30, 0, 0));
    assert_eq!(world.store.kills(HERO, "Goblin").unwrap(), 0);
    assert!(world.said("escaped from the battle!"));
}

#[tokio::test(start_paused = true)]
async fn silent_player_forfeits_every_turn_and_wakes_at_one_hp() {
    let brute = EnemyTemplate::new("Brute", 100, 40, 0).with_levels(1, 5);
    let world = World::new(Content::default().with_enemy(brute));
    world.add(warrior(HERO, "Aria"));

    let provider = ScriptedProvider::default();
    let started = tokio::time::Instant::now();
    let report = world.service.hunt(HERO, &provider).await.unwrap();

    assert_eq!(report.outcome, BattleOutcome::EnemyWon);
    assert_eq!(report.rounds, 2);
    assert!(started.elapsed() >= Duration::from_secs(120));
    assert_eq!(world.sheet(HERO).hp, 1);
    let forfeits = world
        .sink
        .all_lines()
        .iter()
        .filter(|line| line.contains("took too long to act"))
        .count();
    assert_eq!(forfeits, 2);
    assert!(!world.service.registry().is_active(HERO));
}

#[tokio::test(start_paused = true)]
async fn milestone_level_up_asks_for_each_point() {
    let world = goblin_world();
    let mut sheet = warrior(HERO, "Aria");
    sheet.level = 4;
    sheet.experience = 380;
    sheet.hp = 20;
    world.add(sheet);

    let provider = ScriptedProvider::new([
        attack(),
        attack(),
        attack(),
        PlayerInput::Attribute(Attribute::Strength),
        PlayerInput::Attribute(Attribute::Constitution),
        PlayerInput::Unrecognized("luck".into()),
    ]);
    let report = world.service.hunt(HERO, &provider).await.unwrap();

    assert_eq!(report.outcome, BattleOutcome::PlayerWon);
    let record = &report.level_ups[0];
    assert_eq!(record.user, HERO);
    assert_eq!(record.level_up.new_level, 5);
    assert_eq!(
        record.level_up.allocated,
        vec![Attribute::Strength, Attribute::Constitution]
    );
    assert_eq!(record.level_up.unspent_points, 2);

    let attribute_prompts: Vec<(u32, u32)> = provider
        .prompts()
        .into_iter()
        .filter_map(|prompt| match prompt {
            Prompt::Attribute { point, total, .. } => Some((point, total)),
            _ => None,
        })
        .collect();
    assert_eq!(attribute_prompts, vec![(1, 4), (2, 4), (3, 4), (4, 4)]);

    let sheet = world.sheet(HERO);
    assert_eq!((sheet.level, sheet.experience), (5, 10));
    assert_eq!(sheet.attributes.strength, 11);
    assert_eq!(sheet.attributes.constitution, 11);
    assert_eq!(sheet.unspent_attribute_points, 2);
    // 50 + 10 + 11 / 4 and 20 + 5 + 10 / 4, fully restored
    assert_eq!((sheet.max_hp, sheet.hp), (62, 62));
    assert_eq!((sheet.max_mp, sheet.mp), (27, 27));
}

#[tokio::test(start_paused = true)]
async fn items_are_consumed_the_moment_they_are_used() {
    let world = goblin_world();
    let mut sheet = warrior(HERO, "Aria");
    sheet.hp = 30;
    world.add(sheet);
    let potion = ItemDefinition::consumable(7, "Minor Potion", ItemEffect::HealHp(20));
    world.store.add(HERO, &potion, 2, 0).unwrap();

    let provider = ScriptedProvider::new([
        PlayerInput::Skill { target: None },
        PlayerInput::Item,
        PlayerInput::Select(0),
        attack(),
        attack(),
        attack(),
    ]);
    let report = world.service.hunt(HERO, &provider).await.unwrap();

    assert_eq!(report.outcome, BattleOutcome::PlayerWon);
    assert_eq!(report.rounds, 5);
    assert!(world.said("has not learned any skills yet"));
    assert!(world.said("uses Minor Potion and recovers 20 HP!"));
    assert_eq!(world.store.quantity(HERO, ItemId(7)).unwrap(), 1);
    assert_eq!(world.sheet(HERO).hp, 50);
}

#[tokio::test(start_paused = true)]
async fn items_gone_from_storage_cannot_be_used() {
    let world = World::with_inventory(Content::default().with_enemy(goblin()), |store| {
        Arc::new(VanishingInventory(store))
    });
    let mut sheet = warrior(HERO, "Aria");
    sheet.hp = 30;
    world.add(sheet);
    let potion = ItemDefinition::consumable(7, "Minor Potion", ItemEffect::HealHp(20));
    world.store.add(HERO, &potion, 2, 0).unwrap();

    let provider = ScriptedProvider::new([
        PlayerInput::Item,
        PlayerInput::Select(0),
        attack(),
        attack(),
        attack(),
    ]);
    let report = world.service.hunt(HERO, &provider).await.unwrap();

    assert_eq!(report.outcome, BattleOutcome::PlayerWon);
    assert_eq!(report.rounds, 4);
    assert!(world.said("Aria could not use Minor Potion and loses the turn."));
    assert!(!world.said("recovers"));
    assert_eq!(world.store.quantity(HERO, ItemId(7)).unwrap(), 2);
    assert_eq!(world.sheet(HERO).hp, 30);
}

#[tokio::test(start_paused = true)]
async fn mana_spent_before_an_escape_stays_spent() {
    let world = World::new(Content::default().with_enemy(goblin()).with_skill(war_cry()));
    let mut sheet = warrior(HERO, "Aria");
    sheet.attributes.dexterity = 20;
    sheet.hp = 30;
    world.add(sheet);

    let provider = ScriptedProvider::new([
        PlayerInput::Skill { target: None },
        PlayerInput::Select(0),
        PlayerInput::Flee,
    ]);
    let report = world.service.hunt(HERO, &provider).await.unwrap();

    assert_eq!(report.outcome, BattleOutcome::Fled);
    assert_eq!(report.rounds, 2);
    assert!(world.said("Aria's attack rises by 3 for 2 turns!"));
    let sheet = world.sheet(HERO);
    assert_eq!((sheet.hp, sheet.mp, sheet.experience), (30, 12, 0));
}

#[tokio::test(start_paused = true)]
async fn mana_spent_before_a_defeat_stays_spent() {
    let brute = EnemyTemplate::new("Brute", 100, 40, 0).with_levels(1, 5);
    let world = World::new(Content::default().with_enemy(brute).with_skill(war_cry()));
    world.add(warrior(HERO, "Aria"));

    let provider = ScriptedProvider::new([
        PlayerInput::Skill { target: None },
        PlayerInput::Select(0),
    ]);
    let report = world.service.hunt(HERO, &provider).await.unwrap();

    assert_eq!(report.outcome, BattleOutcome::EnemyWon);
    let sheet = world.sheet(HERO);
    assert_eq!((sheet.hp, sheet.mp), (1, 12));
}

#[tokio::test(start_paused = true)]
async fn named_hunts_require_outgrowing_the_enemy() {
    let world = goblin_world();
    world.add(warrior(HERO, "Aria"));
    let provider = ScriptedProvider::new([attack(), attack(), attack()]);

    let err = world
        .service
        .hunt_named(HERO, "Goblin", &provider)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::LevelTooLow {
            level: 1,
            required: 6,
            ..
        }
    ));
    assert!(!world.service.registry().is_active(HERO));

    let err = world
        .service
        .hunt_named(HERO, "Dragon", &provider)
        .await
        .unwrap_err();
    assert!(matches!(err, RuntimeError::UnknownEnemy { .. }));

    let mut veteran = warrior(HERO, "Aria");
    veteran.level = 6;
    world.add(veteran);
    let report = world
        .service
        .hunt_named(HERO, "Goblin", &provider)
        .await
        .unwrap();
    assert_eq!(report.outcome, BattleOutcome::PlayerWon);
    assert_eq!(world.store.kills(HERO, "Goblin").unwrap(), 1);
}

#[tokio::test(start_paused = true)]
async fn busy_players_cannot_start_another_battle() {
    let world = goblin_world();
    world.add(warrior(HERO, "Aria"));

    let guard = world
        .service
        .registry()
        .register(SessionKind::Dungeon, &[HERO])
        .unwrap();
    let err = world.service.autohunt(HERO).await.unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::AlreadyInBattle {
            kind: SessionKind::Dungeon,
            ..
        }
    ));

    drop(guard);
    assert!(world.service.autohunt(HERO).await.is_ok());
}

#[tokio::test(start_paused = true)]
async fn errors_and_abandoned_battles_still_release_the_session() {
    let world = goblin_world();

    let err = world.service.autohunt(HERO).await.unwrap_err();
    assert!(matches!(err, RuntimeError::CharacterNotFound { user } if user == HERO));
    assert!(!world.service.registry().is_active(HERO));

    world.add(warrior(HERO, "Aria"));
    let provider = ScriptedProvider::default();
    let abandoned =
        tokio::time::timeout(Duration::from_secs(5), world.service.hunt(HERO, &provider)).await;
    assert!(abandoned.is_err());
    assert!(!world.service.registry().is_active(HERO));
    assert_eq!(world.service.registry().active_sessions(), 0);
}

#[tokio::test(start_paused = true)]
async fn hunts_without_matching_enemies_are_rejected() {
    let world = goblin_world();
    let mut sheet = warrior(HERO, "Aria");
    sheet.level = 9;
    world.add(sheet);

    let err = world.service.autohunt(HERO).await.unwrap_err();
    assert!(matches!(err, RuntimeError::NoEnemyForLevel { level: 9 }));
}
