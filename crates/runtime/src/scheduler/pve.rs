//! Single player against a single monster.
use combat_core::{
    BattleMode, BattleReport, BattleState, Combatant, CombatantId, EnemyTemplate, RngSource, Side,
    UserId,
};

use super::{Battle, Services, settlement};
use crate::api::{ActionProvider, AutoAttackProvider, Result};
use crate::registry::SessionId;

pub(crate) struct HuntRequest<'p> {
    pub user: UserId,
    /// Already elite-rolled when the encounter was random.
    pub enemy: EnemyTemplate,
    /// `None` runs an autohunt: always attack, no pacing, no prompts.
    pub provider: Option<&'p dyn ActionProvider>,
}

pub(crate) async fn run_hunt(
    services: &Services,
    session: SessionId,
    request: HuntRequest<'_>,
    rng: Box<dyn RngSource + Send>,
) -> Result<BattleReport> {
    let HuntRequest {
        user,
        enemy,
        provider,
    } = request;
    let sheet = services.character(user)?;
    let equipment = services.stores.equipment.bonuses(user)?;

    let player = Combatant::from_sheet(CombatantId(0), Side::Party, &sheet, equipment);
    let monster = Combatant::from_template(CombatantId(1), &enemy);
    let state = BattleState::new(BattleMode::Pve, [player, monster]);

    let mut battle = Battle::new(services, session, state, rng);
    let intro = if enemy.elite {
        format!("An ELITE {} appears! It looks much stronger.", enemy.name)
    } else {
        format!("A wild {} appears!", enemy.name)
    };
    battle.say(intro);

    match provider {
        Some(provider) => battle.fight(provider, true).await?,
        None => battle.fight(&AutoAttackProvider, false).await?,
    };

    settlement::settle_hunt(&mut battle, user, &enemy, provider).await
}
