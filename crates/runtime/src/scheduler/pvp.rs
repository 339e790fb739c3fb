//! Duels between two players.
use combat_core::{
    BattleMode, BattleReport, BattleState, Combatant, CombatantId, RngSource, Side, UserId,
};

use super::{Battle, Services, settlement};
use crate::api::{ActionProvider, Result};
use crate::registry::SessionId;

pub(crate) struct DuelRequest<'p> {
    /// Acts first and is counted as the party side.
    pub challenger: UserId,
    pub challenged: UserId,
    pub ranked: bool,
    pub provider: &'p dyn ActionProvider,
}

pub(crate) async fn run_duel(
    services: &Services,
    session: SessionId,
    request: DuelRequest<'_>,
    rng: Box<dyn RngSource + Send>,
) -> Result<BattleReport> {
    let DuelRequest {
        challenger,
        challenged,
        ranked,
        provider,
    } = request;

    let mut fighters = Vec::with_capacity(2);
    for (index, (user, side)) in [(challenger, Side::Party), (challenged, Side::Opposition)]
        .into_iter()
        .enumerate()
    {
        let sheet = services.character(user)?;
        let equipment = services.stores.equipment.bonuses(user)?;
        fighters.push(
            Combatant::from_sheet(CombatantId(index), side, &sheet, equipment).at_full_resources(),
        );
    }
    let intro = format!(
        "{} duel: {} vs {}!",
        if ranked { "Ranked" } else { "Friendly" },
        fighters[0].name,
        fighters[1].name
    );
    let state = BattleState::new(BattleMode::Pvp, fighters);

    let mut battle = Battle::new(services, session, state, rng);
    battle.say(intro);

    battle.fight(provider, false).await?;
    settlement::settle_duel(&battle, ranked)
}
