mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use combat_core::{
    BattleOutcome, DungeonInfo, EnemyTemplate, EquipmentBonuses, ItemDefinition, ItemEffect,
    ItemId, Side, SpecialBonus, UserId,
};
use combat_runtime::{
    ActionProvider, AutoAttackProvider, BattleEvent, InventoryStore, PlayerInput, Prompt, Result,
    RuntimeError,
};
use common::{Content, HERO, RIVAL, StallingProvider, VanishingInventory, World, warrior};

fn crypt(level_requirement: u32) -> DungeonInfo {
    DungeonInfo {
        name: "Haunted Crypt".into(),
        level_requirement,
        boss: "Lich".into(),
        enemy_pool: vec!["Skeleton".into()],
    }
}

/// Skeletons die to a single basic attack; the lich takes three.
fn crypt_content(skeleton_attack: i32, rewards: bool) -> Content {
    let (skeleton, lich) = if rewards {
        ((5, 3), (50, 20))
    } else {
        ((0, 0), (0, 0))
    };
    Content::default()
        .with_enemy(
            EnemyTemplate::new("Skeleton", 10, skeleton_attack, 0)
                .with_rewards(skeleton.0, skeleton.1),
        )
        .with_enemy(EnemyTemplate::new("Lich", 30, 0, 0).with_rewards(lich.0, lich.1))
        .with_dungeon(crypt(1))
}

/// Attacks in battle; at the rest stop drinks once, then asks the leader's
/// permission to move on.
struct Resting {
    drinker: UserId,
    query: &'static str,
    drank: AtomicBool,
    hurried: AtomicBool,
    leader: UserId,
}

impl Resting {
    fn new(leader: UserId, drinker: UserId, query: &'static str) -> Self {
        Self {
            drinker,
            query,
            drank: AtomicBool::new(false),
            hurried: AtomicBool::new(false),
            leader,
        }
    }
}

#[async_trait]
impl ActionProvider for Resting {
    async fn provide(&self, prompt: &Prompt) -> Result<PlayerInput> {
        Ok(match prompt {
            Prompt::Action { view, .. } => PlayerInput::Attack {
                target: view.living(Side::Opposition).next().map(|c| c.id),
            },
            Prompt::Rest { members, .. } => {
                if !self.drank.swap(true, Ordering::SeqCst) {
                    PlayerInput::RestUseItem {
                        user: self.drinker,
                        item: self.query.to_string(),
                    }
                } else if members.len() > 1 && !self.hurried.swap(true, Ordering::SeqCst) {
                    let impatient = members
                        .iter()
                        .copied()
                        .find(|member| *member != self.leader)
                        .unwrap_or(self.leader);
                    PlayerInput::Continue { user: impatient }
                } else {
                    PlayerInput::Continue { user: self.leader }
                }
            }
            _ => PlayerInput::Cancel,
        })
    }
}

#[tokio::test(start_paused = true)]
async fn solo_clear_multiplies_rewards_and_hands_out_boss_loot() {
    let shard = ItemDefinition::consumable(50, "Phylactery Shard", ItemEffect::GainXp(100));
    let world = World::new(crypt_content(0, true).with_boss_drop("Lich", shard));
    world.add(warrior(HERO, "Aria"));

    let report = world
        .service
        .dungeon(&[HERO], "Haunted Crypt", &AutoAttackProvider)
        .await
        .unwrap();

    // six skeletons (5 xp, 3 gold) plus the lich (50, 20), times four
    assert_eq!(report.outcome, BattleOutcome::PlayerWon);
    assert_eq!((report.xp_gained, report.gold_gained), (320, 152));
    assert_eq!(report.rounds, 9);
    assert_eq!(report.loot.len(), 1);
    assert_eq!(report.loot[0].user, HERO);
    assert_eq!(world.store.quantity(HERO, ItemId(50)).unwrap(), 1);

    // one level per award; the rest carries over
    let sheet = world.sheet(HERO);
    assert_eq!((sheet.level, sheet.experience, sheet.gold), (2, 220, 152));
    assert_eq!((sheet.max_hp, sheet.hp), (62, 62));
    assert_eq!(report.level_ups.len(), 1);

    let stages: Vec<u32> = world
        .sink
        .events()
        .iter()
        .filter_map(|event| match event {
            BattleEvent::StageEntered { stage, .. } => Some(*stage),
            _ => None,
        })
        .collect();
    assert_eq!(stages, vec![1, 2, 3, 4]);
    assert!(world.said("Enemies appear: Skeleton 1, Skeleton 2, Skeleton 3!"));
    assert!(!world.service.registry().is_active(HERO));
}

#[tokio::test(start_paused = true)]
async fn rest_stop_heals_with_potions_and_carries_hp_forward() {
    let world = World::new(crypt_content(15, false));
    world.add(warrior(HERO, "Aria"));
    let scroll = ItemDefinition::consumable(3, "Healing Scroll of Insight", ItemEffect::GainXp(50));
    let potion = ItemDefinition::consumable(4, "Minor Healing Potion", ItemEffect::HealHp(20));
    world.store.add(HERO, &scroll, 1, 0).unwrap();
    world.store.add(HERO, &potion, 2, 0).unwrap();

    let provider = Resting::new(HERO, HERO, "HEALING");
    let report = world
        .service
        .dungeon(&[HERO], "Haunted Crypt", &provider)
        .await
        .unwrap();

    assert_eq!(report.outcome, BattleOutcome::PlayerWon);
    // 3 damage per skeleton swing: 50 -> 41, rest to 50, 50 -> 41
    assert!(world.said("Aria uses Minor Healing Potion and recovers 9 HP!"));
    assert_eq!(world.store.quantity(HERO, ItemId(4)).unwrap(), 1);
    assert_eq!(world.store.quantity(HERO, ItemId(3)).unwrap(), 1);
    let sheet = world.sheet(HERO);
    assert_eq!(sheet.hp, 41);
    assert_eq!(sheet.experience, 0);
}

#[tokio::test(start_paused = true)]
async fn rest_stop_skips_potions_that_vanished_from_storage() {
    let world = World::with_inventory(crypt_content(15, false), |store| {
        Arc::new(VanishingInventory(store))
    });
    world.add(warrior(HERO, "Aria"));
    let potion = ItemDefinition::consumable(4, "Minor Healing Potion", ItemEffect::HealHp(20));
    world.store.add(HERO, &potion, 2, 0).unwrap();

    let provider = Resting::new(HERO, HERO, "healing");
    let report = world
        .service
        .dungeon(&[HERO], "Haunted Crypt", &provider)
        .await
        .unwrap();

    assert_eq!(report.outcome, BattleOutcome::PlayerWon);
    assert!(world.said("Aria could not use Minor Healing Potion."));
    assert!(!world.said("recovers"));
    assert_eq!(world.store.quantity(HERO, ItemId(4)).unwrap(), 2);
    assert_eq!(world.sheet(HERO).hp, 32);
}

#[tokio::test(start_paused = true)]
async fn rest_stop_moves_on_by_itself_when_nobody_answers() {
    let world = World::new(crypt_content(0, false));
    world.add(warrior(HERO, "Aria"));

    let started = tokio::time::Instant::now();
    let report = world
        .service
        .dungeon(&[HERO], "Haunted Crypt", &StallingProvider)
        .await
        .unwrap();

    assert_eq!(report.outcome, BattleOutcome::PlayerWon);
    assert!(started.elapsed() >= Duration::from_secs(120));
    assert!(world.said("Rest time is over. The party moves on."));
}

#[tokio::test(start_paused = true)]
async fn wiped_party_limps_home_at_half_health() {
    let world = World::new(crypt_content(100, true));
    world.add(warrior(HERO, "Aria"));

    let report = world
        .service
        .dungeon(&[HERO], "Haunted Crypt", &AutoAttackProvider)
        .await
        .unwrap();

    assert_eq!(report.outcome, BattleOutcome::EnemyWon);
    assert_eq!((report.xp_gained, report.gold_gained), (0, 0));
    assert_eq!(report.rounds, 1);
    let sheet = world.sheet(HERO);
    assert_eq!((sheet.hp, sheet.experience, sheet.gold), (25, 0, 0));

    let stages = world
        .sink
        .events()
        .iter()
        .filter(|event| matches!(event, BattleEvent::StageEntered { .. }))
        .count();
    assert_eq!(stages, 1);
    assert!(!world.service.registry().is_active(HERO));
}

#[tokio::test(start_paused = true)]
async fn party_shares_rewards_and_only_the_leader_continues() {
    let world = World::new(crypt_content(0, true));
    world.add(warrior(HERO, "Aria"));
    world.add(warrior(RIVAL, "Bram"));
    world
        .store
        .set_equipment(
            HERO,
            EquipmentBonuses::default().with_special(SpecialBonus::XpBonusPercent, 50),
        )
        .unwrap();

    let provider = Resting::new(HERO, RIVAL, "potion");
    let report = world
        .service
        .dungeon(&[HERO, RIVAL], "Haunted Crypt", &provider)
        .await
        .unwrap();

    // no solo multiplier for parties
    assert_eq!(report.outcome, BattleOutcome::PlayerWon);
    assert_eq!((report.xp_gained, report.gold_gained), (80, 38));
    assert!(world.said("Bram has no healing potion matching 'potion'."));
    assert!(world.said("Only the party leader can continue."));

    let hero = world.sheet(HERO);
    assert_eq!((hero.level, hero.experience, hero.gold), (2, 20, 38));
    let rival = world.sheet(RIVAL);
    assert_eq!((rival.level, rival.experience, rival.gold), (1, 80, 38));
    assert_eq!(report.level_ups.len(), 1);
    assert_eq!(report.level_ups[0].user, HERO);
    assert!(report.loot.is_empty());
}

#[tokio::test(start_paused = true)]
async fn entry_requires_every_member_to_qualify() {
    let content = crypt_content(0, true).with_dungeon(DungeonInfo {
        name: "Dragon's Lair".into(),
        ..crypt(3)
    });
    let world = World::new(content);
    let mut hero = warrior(HERO, "Aria");
    hero.level = 3;
    world.add(hero);
    world.add(warrior(RIVAL, "Bram"));

    let err = world
        .service
        .dungeon(&[HERO, RIVAL], "Dragon's Lair", &AutoAttackProvider)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::LevelTooLow {
            user,
            level: 1,
            required: 3,
        } if user == RIVAL
    ));

    let err = world
        .service
        .dungeon(&[HERO], "Sunken Temple", &AutoAttackProvider)
        .await
        .unwrap_err();
    assert!(matches!(err, RuntimeError::UnknownDungeon { .. }));
    assert_eq!(world.service.registry().active_sessions(), 0);
}
