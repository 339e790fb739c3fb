//! End-of-battle bookkeeping: rewards, level-ups, penalties and loot.
//!
//! Settlement always starts from a freshly loaded sheet so that anything an
//! action already persisted mid-battle (consumed items, permanent stat
//! boosts) is kept, then writes the whole progression back in one patch.
use combat_core::reward::{complete_level_up, defeat_hp, grant, progression_patch, roll_loot};
use combat_core::{
    Attribute, BattleMode, BattleOutcome, BattleReport, CharacterPatch, CharacterSheet, Combatant,
    EnemyTemplate, LevelUp, LevelUpRecord, LootDrop, PendingLevelUp, Rewards, Side, UserId,
};

use super::input::{Answer, ask};
use super::{Battle, Services};
use crate::api::{ActionProvider, PlayerInput, Prompt, Result};
use crate::registry::SessionId;

/// Settles a hunt: rewards and loot on a win, 1 HP on a loss. A successful
/// escape only keeps the MP spent before it.
pub(crate) async fn settle_hunt(
    battle: &mut Battle<'_>,
    user: UserId,
    enemy: &EnemyTemplate,
    provider: Option<&dyn ActionProvider>,
) -> Result<BattleReport> {
    let outcome = battle.state.outcome;
    let rounds = battle.state.round;
    let services = battle.services;
    let spent_mp = battle
        .state
        .members(Side::Party)
        .next()
        .map(|player| player.mp.current());

    match outcome {
        BattleOutcome::PlayerWon => {}
        BattleOutcome::EnemyWon => {
            let sheet = services.character(user)?;
            let hp = defeat_hp(BattleMode::Pve, sheet.max_hp);
            let patch = CharacterPatch {
                mp: spent_mp.map(|mp| mp.min(sheet.max_mp)),
                ..CharacterPatch::hp(hp)
            };
            services.stores.characters.update(user, &patch)?;
            battle.say(format!(
                "{} was defeated by {} and crawls back to town with {} HP.",
                sheet.name,
                enemy.display_name(),
                hp
            ));
            return Ok(BattleReport::empty(outcome, rounds));
        }
        BattleOutcome::Fled => {
            if let Some(mp) = spent_mp {
                let sheet = services.character(user)?;
                let patch = CharacterPatch {
                    mp: Some(mp.min(sheet.max_mp)),
                    ..CharacterPatch::default()
                };
                services.stores.characters.update(user, &patch)?;
            }
            return Ok(BattleReport::empty(outcome, rounds));
        }
        BattleOutcome::Active => return Ok(BattleReport::empty(outcome, rounds)),
    }

    let Some(player) = battle.state.members(Side::Party).next().cloned() else {
        return Ok(BattleReport::empty(outcome, rounds));
    };
    let rewards = Rewards::from_enemy(enemy).with_equipment_bonus(&player.equipment);

    let mut sheet = services.character(user)?;
    let start_level = sheet.level;
    keep_battle_resources(&mut sheet, &player);
    battle.say(format!(
        "{} defeated {}! Gained {} XP and {} gold.",
        sheet.name,
        enemy.display_name(),
        rewards.xp,
        rewards.gold
    ));

    let mut level_ups = Vec::new();
    if let Some(pending) = grant(&mut sheet, rewards.xp, rewards.gold) {
        let allocations = match provider {
            Some(provider) => {
                allocate_points(services, battle.session, user, pending, provider).await
            }
            None => Vec::new(),
        };
        let level_up = complete_level_up(&mut sheet, pending, &allocations);
        battle.narrate(level_up_lines(&sheet.name, &level_up));
        level_ups.push(LevelUpRecord { user, level_up });
    }
    services
        .stores
        .characters
        .update(user, &progression_patch(&sheet))?;

    let mut loot = Vec::new();
    for _ in 0..roll_loot(enemy.elite, battle.rng.as_mut()) {
        let Some(item) = services
            .oracles
            .loot()
            .random(start_level, battle.rng.as_mut())
        else {
            continue;
        };
        services.stores.inventory.add(user, &item, 1, 0)?;
        battle.say(format!("{} found {}!", sheet.name, item.name));
        loot.push(LootDrop { user, item });
    }

    services.stores.quests.record_kill(user, &enemy.name)?;

    tracing::info!(
        %user,
        enemy = %enemy.name,
        xp = rewards.xp,
        gold = rewards.gold,
        loot = loot.len(),
        "hunt settled"
    );
    Ok(BattleReport {
        outcome,
        xp_gained: rewards.xp,
        gold_gained: rewards.gold,
        loot,
        level_ups,
        rounds,
    })
}

/// Settles a duel. The winner is fully restored, the loser is left at 1 HP
/// with full MP, and ranked duels update the win/loss record. An escape
/// changes nothing.
pub(crate) fn settle_duel(battle: &Battle<'_>, ranked: bool) -> Result<BattleReport> {
    let state = &battle.state;
    let report = BattleReport::empty(state.outcome, state.round);
    let Some(winning_side) = state.outcome.winner() else {
        return Ok(report);
    };

    let fighter = |side: Side| state.members(side).next();
    let (Some(winner), Some(loser)) = (fighter(winning_side), fighter(winning_side.opponent()))
    else {
        return Ok(report);
    };
    let (Some(winner_id), Some(loser_id)) = (winner.user(), loser.user()) else {
        return Ok(report);
    };

    let characters = &battle.services.stores.characters;
    let winner_sheet = battle.services.character(winner_id)?;
    let loser_sheet = battle.services.character(loser_id)?;

    let mut winner_patch = CharacterPatch {
        mp: Some(winner_sheet.max_mp),
        ..CharacterPatch::hp(winner_sheet.max_hp)
    };
    let mut loser_patch = CharacterPatch {
        mp: Some(loser_sheet.max_mp),
        ..CharacterPatch::hp(defeat_hp(BattleMode::Pvp, loser_sheet.max_hp))
    };
    if ranked {
        winner_patch.pvp_wins = Some(winner_sheet.pvp_wins.saturating_add(1));
        loser_patch.pvp_losses = Some(loser_sheet.pvp_losses.saturating_add(1));
    }
    characters.update(winner_id, &winner_patch)?;
    characters.update(loser_id, &loser_patch)?;

    battle.say(format!("{} wins the duel against {}!", winner.name, loser.name));
    tracing::info!(winner = %winner_id, loser = %loser_id, ranked, "duel settled");
    Ok(report)
}

/// Grants a dungeon survivor their share and completes any level-up without
/// prompting. Returns the level-up, if one happened.
pub(crate) fn settle_dungeon_survivor(
    services: &Services,
    session: SessionId,
    member: &Combatant,
    rewards: Rewards,
) -> Result<Option<LevelUp>> {
    let Some(user) = member.user() else {
        return Ok(None);
    };
    let mut sheet = services.character(user)?;
    keep_battle_resources(&mut sheet, member);

    let level_up = grant(&mut sheet, rewards.xp, rewards.gold)
        .map(|pending| complete_level_up(&mut sheet, pending, &[]));
    services
        .stores
        .characters
        .update(user, &progression_patch(&sheet))?;

    let mut lines = vec![format!(
        "{} receives {} XP and {} gold.",
        sheet.name, rewards.xp, rewards.gold
    )];
    if let Some(level_up) = &level_up {
        lines.extend(level_up_lines(&sheet.name, level_up));
    }
    services.narrate(session, lines);
    Ok(level_up)
}

/// Leaves a fallen or defeated dungeon member at half their maximum HP.
pub(crate) fn settle_dungeon_casualty(services: &Services, user: UserId) -> Result<()> {
    let sheet = services.character(user)?;
    let hp = defeat_hp(BattleMode::Dungeon, sheet.max_hp);
    services
        .stores
        .characters
        .update(user, &CharacterPatch::hp(hp))?;
    Ok(())
}

fn keep_battle_resources(sheet: &mut CharacterSheet, combatant: &Combatant) {
    sheet.hp = combatant.hp.current().min(sheet.max_hp);
    sheet.mp = combatant.mp.current().min(sheet.max_mp);
}

/// Asks for each milestone point in turn. Invalid answers bank that point;
/// a timeout or provider failure banks every point still open.
async fn allocate_points(
    services: &Services,
    session: SessionId,
    user: UserId,
    pending: PendingLevelUp,
    provider: &dyn ActionProvider,
) -> Vec<Attribute> {
    let total = pending.attribute_points;
    let deadline = services.config.timeouts.attribute;
    let say = |line: String| services.narrate(session, vec![line]);
    let mut allocations = Vec::with_capacity(total as usize);

    for point in 1..=total {
        let prompt = Prompt::Attribute { user, point, total };
        match ask(provider, &prompt, deadline).await {
            Answer::Input(PlayerInput::Attribute(attribute)) => {
                say(format!("Point {point}/{total} goes to {attribute}."));
                allocations.push(attribute);
            }
            Answer::Input(_) => {
                say(format!("Point {point}/{total} was not spent and is saved."));
            }
            Answer::TimedOut | Answer::Unavailable => {
                say("No choice was made; remaining points are saved for later.".to_string());
                break;
            }
        }
    }
    allocations
}

fn level_up_lines(name: &str, level_up: &LevelUp) -> Vec<String> {
    let mut lines = vec![format!(
        "{} reached level {}! Max HP {}, Max MP {}. HP and MP fully restored.",
        name, level_up.new_level, level_up.max_hp, level_up.max_mp
    )];
    if level_up.unspent_points > 0 {
        lines.push(format!(
            "{} attribute point(s) saved for later.",
            level_up.unspent_points
        ));
    }
    lines
}
