mod common;

use async_trait::async_trait;
use combat_core::{BattleOutcome, UserId};
use combat_runtime::{
    ActionProvider, AutoAttackProvider, PlayerInput, Prompt, Result, RuntimeError, SessionKind,
};
use common::{Content, HERO, RIVAL, World, attack, warrior};

/// Answers `quitter`'s action prompts with `choice` and attacks otherwise.
struct Quitter {
    quitter: UserId,
    choice: PlayerInput,
}

#[async_trait]
impl ActionProvider for Quitter {
    async fn provide(&self, prompt: &Prompt) -> Result<PlayerInput> {
        Ok(match prompt {
            Prompt::Action { user, .. } if *user == self.quitter => self.choice.clone(),
            _ => attack(),
        })
    }
}

fn duelists() -> World {
    let world = World::new(Content::default());
    let mut hero = warrior(HERO, "Aria");
    hero.attributes.strength = 20;
    hero.hp = 30;
    hero.mp = 5;
    world.add(hero);
    let mut rival = warrior(RIVAL, "Bram");
    rival.mp = 3;
    world.add(rival);
    world
}

#[tokio::test(start_paused = true)]
async fn ranked_duel_restores_winner_and_leaves_loser_at_one_hp() {
    let world = duelists();

    let report = world
        .service
        .duel(HERO, RIVAL, true, &AutoAttackProvider)
        .await
        .unwrap();

    // 20 attack against 12 defense, seven hits through 50 HP
    assert_eq!(report.outcome, BattleOutcome::PlayerWon);
    assert_eq!(report.rounds, 7);
    assert_eq!((report.xp_gained, report.gold_gained), (0, 0));

    let hero = world.sheet(HERO);
    assert_eq!((hero.pvp_wins, hero.pvp_losses), (1, 0));
    assert_eq!((hero.hp, hero.mp), (50, 20));
    let rival = world.sheet(RIVAL);
    assert_eq!((rival.pvp_wins, rival.pvp_losses), (0, 1));
    assert_eq!((rival.hp, rival.mp), (1, 20));
    assert_eq!(rival.experience, 0);

    assert!(world.said("Ranked duel: Aria vs Bram!"));
    assert!(world.said("Aria wins the duel against Bram!"));
    assert!(!world.service.registry().is_active(HERO));
    assert!(!world.service.registry().is_active(RIVAL));
}

#[tokio::test(start_paused = true)]
async fn surrender_ends_a_friendly_duel_without_touching_the_record() {
    let world = duelists();
    let provider = Quitter {
        quitter: RIVAL,
        choice: PlayerInput::Surrender,
    };

    let report = world
        .service
        .duel(HERO, RIVAL, false, &provider)
        .await
        .unwrap();

    assert_eq!(report.outcome, BattleOutcome::PlayerWon);
    assert_eq!(report.rounds, 1);
    assert!(world.said("Bram surrenders the duel!"));

    let hero = world.sheet(HERO);
    let rival = world.sheet(RIVAL);
    assert_eq!((hero.pvp_wins, rival.pvp_losses), (0, 0));
    assert_eq!(rival.hp, 1);
}

#[tokio::test(start_paused = true)]
async fn escaping_a_duel_changes_nothing() {
    let world = World::new(Content::default());
    let mut hero = warrior(HERO, "Aria");
    hero.attributes.dexterity = 20;
    hero.hp = 30;
    world.add(hero);
    world.add(warrior(RIVAL, "Bram"));
    let provider = Quitter {
        quitter: HERO,
        choice: PlayerInput::Flee,
    };

    let report = world
        .service
        .duel(HERO, RIVAL, true, &provider)
        .await
        .unwrap();

    assert_eq!(report.outcome, BattleOutcome::Fled);
    let hero = world.sheet(HERO);
    assert_eq!((hero.hp, hero.pvp_wins, hero.pvp_losses), (30, 0, 0));
    assert_eq!(world.sheet(RIVAL).hp, 50);
}

#[tokio::test(start_paused = true)]
async fn duel_participants_must_be_distinct_and_free() {
    let world = duelists();

    let err = world
        .service
        .duel(HERO, HERO, true, &AutoAttackProvider)
        .await
        .unwrap_err();
    assert!(matches!(err, RuntimeError::DuplicateParticipant { user } if user == HERO));

    let guard = world
        .service
        .registry()
        .register(SessionKind::Pve, &[RIVAL])
        .unwrap();
    let err = world
        .service
        .duel(HERO, RIVAL, true, &AutoAttackProvider)
        .await
        .unwrap_err();
    assert!(matches!(err, RuntimeError::AlreadyInBattle { user, .. } if user == RIVAL));
    assert!(!world.service.registry().is_active(HERO));
    drop(guard);
}
