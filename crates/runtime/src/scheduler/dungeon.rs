//! Four-stage dungeon runs.
//!
//! The party walks through two hordes, a rest stop and the boss. Each combat
//! stage is its own [`BattleState`]; HP, MP and deaths carry over between
//! stages while status effects and defend stances do not. Rewards are only
//! handed out once the boss falls.
use combat_core::{
    BattleAction, BattleMode, BattleOutcome, BattleReport, BattleState, Combatant, CombatantId,
    DungeonInfo, DungeonMode, DungeonStage, EnemyTemplate, ItemEffect, LevelUpRecord, LootDrop,
    Rewards, RngSource, Side, UserId,
};
use tokio::time::Instant;

use super::settlement::{settle_dungeon_casualty, settle_dungeon_survivor};
use super::{Battle, Services, pause};
use crate::api::{ActionProvider, PlayerInput, Prompt, Result, RuntimeError};
use crate::events::BattleEvent;
use crate::registry::SessionId;

pub(crate) struct DungeonRequest<'p> {
    /// Leader first, then the other members in join order.
    pub party: Vec<UserId>,
    pub dungeon: DungeonInfo,
    pub mode: DungeonMode,
    pub provider: &'p dyn ActionProvider,
}

type Rng = Box<dyn RngSource + Send>;

/// Where a run ended up after its last stage.
struct Progress {
    party: Vec<Combatant>,
    rng: Rng,
    rounds: u32,
    /// Base rewards of every horde enemy slain so far.
    earned: Rewards,
    /// Set once the boss is down.
    boss: Option<EnemyTemplate>,
}

pub(crate) async fn run_dungeon(
    services: &Services,
    session: SessionId,
    request: DungeonRequest<'_>,
    rng: Rng,
) -> Result<BattleReport> {
    let DungeonRequest {
        party: users,
        dungeon,
        mode,
        provider,
    } = request;
    let Some(&leader) = users.first() else {
        return Err(RuntimeError::EmptyParty);
    };

    let mut party = Vec::with_capacity(users.len());
    for (index, &user) in users.iter().enumerate() {
        let sheet = services.character(user)?;
        let equipment = services.stores.equipment.bonuses(user)?;
        party.push(
            Combatant::from_sheet(CombatantId(index), Side::Party, &sheet, equipment)
                .at_full_resources(),
        );
    }
    services.narrate(
        session,
        vec![format!(
            "{} party enters {}!",
            match mode {
                DungeonMode::Solo => "A solo",
                DungeonMode::Party => "A",
            },
            dungeon.name
        )],
    );

    let mut progress = Progress {
        party,
        rng,
        rounds: 0,
        earned: Rewards::default(),
        boss: None,
    };
    let pacing = &services.config.pacing;

    for (index, stage) in DungeonStage::ALL.into_iter().enumerate() {
        if index > 0 {
            pause(pacing.stage_transition).await;
        }
        services.sink.emit(BattleEvent::StageEntered {
            session,
            stage: stage.number(),
            title: stage.title().to_string(),
        });
        services.narrate(
            session,
            vec![format!(
                "Stage {}/{}: {}",
                stage.number(),
                DungeonStage::ALL.len(),
                stage.title()
            )],
        );
        pause(pacing.stage_intro).await;

        let cleared = match stage {
            DungeonStage::Rest => {
                progress = rest(services, session, leader, provider, progress).await?;
                true
            }
            DungeonStage::FirstHorde | DungeonStage::SecondHorde | DungeonStage::Boss => {
                let enemies = stage_enemies(services, &dungeon, mode, stage, &mut progress)?;
                let (next, outcome) =
                    fight_stage(services, session, provider, stage, progress, enemies).await?;
                progress = next;
                outcome == BattleOutcome::PlayerWon
            }
        };
        tracing::debug!(%session, stage = stage.number(), cleared, "dungeon stage finished");

        if !cleared {
            return fail(services, session, &dungeon, progress);
        }
    }

    complete(services, session, &dungeon, mode, progress)
}

/// Rolls the enemies of a combat stage. The boss stage always faces the
/// dungeon's guardian alone.
fn stage_enemies(
    services: &Services,
    dungeon: &DungeonInfo,
    mode: DungeonMode,
    stage: DungeonStage,
    progress: &mut Progress,
) -> Result<Vec<EnemyTemplate>> {
    let enemies = services.oracles.enemies();
    let lookup = |name: &str| {
        enemies.by_name(name).ok_or_else(|| RuntimeError::UnknownEnemy {
            name: name.to_string(),
        })
    };

    if stage == DungeonStage::Boss {
        return Ok(vec![lookup(&dungeon.boss)?]);
    }
    dungeon
        .roll_stage_enemies(mode, progress.party.len(), progress.rng.as_mut())
        .iter()
        .map(|name| lookup(name))
        .collect()
}

async fn fight_stage(
    services: &Services,
    session: SessionId,
    provider: &dyn ActionProvider,
    stage: DungeonStage,
    progress: Progress,
    enemies: Vec<EnemyTemplate>,
) -> Result<(Progress, BattleOutcome)> {
    let Progress {
        party,
        rng,
        mut rounds,
        mut earned,
        mut boss,
    } = progress;

    let numbered = enemies.len() > 1;
    let monsters = enemies.iter().enumerate().map(|(index, template)| {
        let monster = Combatant::from_template(CombatantId(0), template);
        if numbered {
            let name = format!("{} {}", monster.name, index + 1);
            monster.with_name(name)
        } else {
            monster
        }
    });
    let state = BattleState::new(BattleMode::Dungeon, party.into_iter().chain(monsters));

    let mut battle = Battle::new(services, session, state, rng);
    let names: Vec<&str> = battle
        .state
        .members(Side::Opposition)
        .map(|c| c.name.as_str())
        .collect();
    battle.say(format!("Enemies appear: {}!", names.join(", ")));

    let outcome = battle.fight(provider, true).await?;
    let (state, rng) = battle.into_parts();
    rounds += state.round;

    if outcome == BattleOutcome::PlayerWon {
        if stage == DungeonStage::Boss {
            boss = enemies.into_iter().next();
        } else {
            earned = enemies
                .iter()
                .fold(earned, |sum, enemy| sum.add(Rewards::from_enemy(enemy)));
        }
    }

    let party = state
        .combatants
        .into_iter()
        .filter(|c| c.side == Side::Party)
        .map(|mut member| {
            member.effects.clear();
            member.defending = false;
            member
        })
        .collect();

    Ok((
        Progress {
            party,
            rng,
            rounds,
            earned,
            boss,
        },
        outcome,
    ))
}

/// The rest stop. Living members may drink healing potions by name until the
/// leader continues or the rest deadline passes.
async fn rest(
    services: &Services,
    session: SessionId,
    leader: UserId,
    provider: &dyn ActionProvider,
    progress: Progress,
) -> Result<Progress> {
    let Progress {
        party,
        rng,
        rounds,
        earned,
        boss,
    } = progress;
    let members: Vec<UserId> = party.iter().filter_map(Combatant::user).collect();

    let mut battle = Battle::new(
        services,
        session,
        BattleState::new(BattleMode::Dungeon, party),
        rng,
    );
    battle.say(
        "The party finds a safe room. Living members may drink healing potions; \
         the leader continues when everyone is ready.",
    );

    let deadline = Instant::now() + services.config.timeouts.rest;
    loop {
        let prompt = Prompt::Rest {
            leader,
            members: members.clone(),
            view: battle.state.view(),
        };
        let input = match tokio::time::timeout_at(deadline, provider.provide(&prompt)).await {
            Ok(Ok(input)) => input,
            Ok(Err(err)) => {
                tracing::warn!(%session, error = %err, "rest input failed; moving on");
                break;
            }
            Err(_) => {
                battle.say("Rest time is over. The party moves on.");
                break;
            }
        };

        match input {
            PlayerInput::Continue { user } if user == leader => {
                battle.say("The leader gives the signal to move on.");
                break;
            }
            PlayerInput::Continue { .. } => battle.say("Only the party leader can continue."),
            PlayerInput::RestUseItem { user, item } => battle.drink(user, &item)?,
            _ => {}
        }
    }

    let (state, rng) = battle.into_parts();
    Ok(Progress {
        party: state.combatants,
        rng,
        rounds,
        earned,
        boss,
    })
}

impl Battle<'_> {
    /// Uses the first healing potion whose name contains `query`, ignoring
    /// case. Other consumables cannot be used while resting.
    fn drink(&mut self, user: UserId, query: &str) -> Result<()> {
        let Some(member) = self.state.combatants.iter().find(|c| c.user() == Some(user)) else {
            return Ok(());
        };
        let (actor, name) = (member.id, member.name.clone());
        if !member.is_alive() {
            self.say(format!("{name} has fallen and cannot use items."));
            return Ok(());
        }

        let needle = query.trim().to_lowercase();
        let entry = self
            .services
            .stores
            .inventory
            .get(user)?
            .into_iter()
            .find(|entry| {
                entry.quantity > 0
                    && entry.item.effect.is_some_and(ItemEffect::is_heal)
                    && entry.item.name.to_lowercase().contains(&needle)
            });
        let Some(entry) = entry else {
            self.say(format!("{name} has no healing potion matching '{query}'."));
            return Ok(());
        };

        if !self.take_item(user, &entry)? {
            self.say(format!("{name} could not use {}.", entry.item.name));
            return Ok(());
        }

        let action = BattleAction::UseItem {
            item: entry.item.clone(),
        };
        let outcome = self
            .resolver
            .resolve(&mut self.state, actor, &action, self.rng.as_mut());
        self.narrate(outcome.lines.clone());
        self.settle_action(user, &outcome, Some(&entry))
    }
}

fn complete(
    services: &Services,
    session: SessionId,
    dungeon: &DungeonInfo,
    mode: DungeonMode,
    mut progress: Progress,
) -> Result<BattleReport> {
    let boss_rewards = progress
        .boss
        .as_ref()
        .map(Rewards::from_enemy)
        .unwrap_or_default();
    let total = progress
        .earned
        .add(boss_rewards)
        .scaled(mode.reward_multiplier());
    services.narrate(
        session,
        vec![format!(
            "{} is cleared! Each survivor earns {} XP and {} gold before equipment bonuses.",
            dungeon.name, total.xp, total.gold
        )],
    );

    let mut level_ups = Vec::new();
    for member in &progress.party {
        let Some(user) = member.user() else {
            continue;
        };
        if !member.is_alive() {
            settle_dungeon_casualty(services, user)?;
            continue;
        }
        let rewards = total.with_equipment_bonus(&member.equipment);
        if let Some(level_up) = settle_dungeon_survivor(services, session, member, rewards)? {
            level_ups.push(LevelUpRecord { user, level_up });
        }
    }

    let mut loot = Vec::new();
    let survivors: Vec<&Combatant> = progress.party.iter().filter(|c| c.is_alive()).collect();
    let drops = services.oracles.loot().boss_loot(&dungeon.boss);
    if !drops.is_empty() && !survivors.is_empty() {
        let item = drops[progress.rng.index(drops.len())].clone();
        let lucky = survivors[progress.rng.index(survivors.len())];
        if let Some(user) = lucky.user() {
            services.stores.inventory.add(user, &item, 1, 0)?;
            services.narrate(
                session,
                vec![format!("{} claims the boss's {}!", lucky.name, item.name)],
            );
            loot.push(LootDrop { user, item });
        }
    }

    tracing::info!(
        %session,
        dungeon = %dungeon.name,
        survivors = survivors.len(),
        xp = total.xp,
        gold = total.gold,
        "dungeon cleared"
    );
    Ok(BattleReport {
        outcome: BattleOutcome::PlayerWon,
        xp_gained: total.xp,
        gold_gained: total.gold,
        loot,
        level_ups,
        rounds: progress.rounds,
    })
}

fn fail(
    services: &Services,
    session: SessionId,
    dungeon: &DungeonInfo,
    progress: Progress,
) -> Result<BattleReport> {
    for user in progress.party.iter().filter_map(Combatant::user) {
        settle_dungeon_casualty(services, user)?;
    }
    services.narrate(
        session,
        vec![format!(
            "The party was wiped out in {}. Everyone limps home at half health.",
            dungeon.name
        )],
    );
    tracing::info!(%session, dungeon = %dungeon.name, "dungeon failed");
    Ok(BattleReport::empty(BattleOutcome::EnemyWon, progress.rounds))
}
