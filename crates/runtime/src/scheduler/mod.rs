//! Turn scheduling for every battle mode.
//!
//! A [`Battle`] owns one battle's state and random source and drives it round
//! by round: every living party member acts in join order, then every living
//! member of the opposing side. Damage over time fires at the start of each
//! actor's own turn, buffs and debuffs lose a turn when the round closes, and
//! terminal conditions are re-checked after every single action.
//!
//! The mode-specific flows (hunts, duels, dungeon runs) build a [`Battle`],
//! call [`Battle::fight`] and hand the finished state to settlement.
mod dungeon;
mod input;
mod pve;
mod pvp;
mod settlement;

use std::sync::Arc;
use std::time::Duration;

use combat_core::{
    ActionOutcome, ActionResolver, BattleAction, BattleOutcome, BattleState, CharacterPatch,
    CombatantId, ForfeitReason, InventoryEntry, PersistentChange, Resolution, RngSource, Side,
    UserId,
};

use crate::api::{ActionProvider, OutputSink, Result, RuntimeError};
use crate::config::RuntimeConfig;
use crate::events::BattleEvent;
use crate::oracle::OracleManager;
use crate::registry::SessionId;
use crate::repository::Stores;

pub(crate) use dungeon::{DungeonRequest, run_dungeon};
pub(crate) use pve::{HuntRequest, run_hunt};
pub(crate) use pvp::{DuelRequest, run_duel};

/// Collaborators shared by every battle of a service.
pub(crate) struct Services {
    pub stores: Stores,
    pub oracles: OracleManager,
    pub sink: Arc<dyn OutputSink>,
    pub config: RuntimeConfig,
}

impl Services {
    /// Loads a character or fails with `CharacterNotFound`.
    pub fn character(&self, user: UserId) -> Result<combat_core::CharacterSheet> {
        self.stores
            .characters
            .get(user)?
            .ok_or(RuntimeError::CharacterNotFound { user })
    }

    pub fn narrate(&self, session: SessionId, lines: Vec<String>) {
        if lines.is_empty() {
            return;
        }
        self.sink.emit(BattleEvent::Log { session, lines });
    }
}

/// One running battle.
pub(crate) struct Battle<'s> {
    services: &'s Services,
    session: SessionId,
    state: BattleState,
    resolver: ActionResolver,
    rng: Box<dyn RngSource + Send>,
}

impl<'s> Battle<'s> {
    pub fn new(
        services: &'s Services,
        session: SessionId,
        state: BattleState,
        rng: Box<dyn RngSource + Send>,
    ) -> Self {
        Self {
            services,
            session,
            resolver: ActionResolver::for_mode(state.mode),
            state,
            rng,
        }
    }

    pub fn into_parts(self) -> (BattleState, Box<dyn RngSource + Send>) {
        (self.state, self.rng)
    }

    pub fn narrate(&self, lines: Vec<String>) {
        self.services.narrate(self.session, lines);
    }

    pub fn say(&self, line: impl Into<String>) {
        self.narrate(vec![line.into()]);
    }

    /// Runs rounds until the battle reaches a terminal state.
    ///
    /// Player combatants are asked through `provider`; monsters attack a
    /// uniformly chosen living opponent. With `paced`, the runtime waits the
    /// configured turn delay before monsters act.
    pub async fn fight(
        &mut self,
        provider: &dyn ActionProvider,
        paced: bool,
    ) -> Result<BattleOutcome> {
        let delay = if paced {
            self.services.config.pacing.turn
        } else {
            Duration::ZERO
        };

        self.state.check_terminal();
        while !self.state.is_over() {
            self.services.sink.emit(BattleEvent::RoundStarted {
                session: self.session,
                round: self.state.round,
            });

            for side in [Side::Party, Side::Opposition] {
                if self.state.is_over() {
                    break;
                }
                let monsters = self.state.members(side).any(|c| c.monster().is_some());
                if monsters {
                    pause(delay).await;
                }
                for actor in self.state.living(side) {
                    if self.state.is_over() {
                        break;
                    }
                    self.take_turn(actor, provider).await?;
                }
            }

            if !self.state.is_over() {
                self.state.end_round();
            }
        }

        tracing::debug!(
            session = %self.session,
            outcome = ?self.state.outcome,
            rounds = self.state.round,
            "battle finished"
        );
        Ok(self.state.outcome)
    }

    async fn take_turn(&mut self, actor: CombatantId, provider: &dyn ActionProvider) -> Result<()> {
        let Some(combatant) = self.state.get_mut(actor) else {
            return Ok(());
        };
        if !combatant.is_alive() {
            return Ok(());
        }
        let lines = combatant.begin_turn();
        self.narrate(lines);
        self.state.check_terminal();
        if self.state.is_over() || !self.state.get(actor).is_some_and(|c| c.is_alive()) {
            return Ok(());
        }

        let user = self.state.get(actor).and_then(|c| c.user());
        let (action, entry) = match user {
            Some(user) => self.choose_action(actor, user, provider).await?,
            None => (self.monster_action(actor), None),
        };

        let outcome = self
            .resolver
            .resolve(&mut self.state, actor, &action, self.rng.as_mut());
        if let Resolution::Forfeited(reason) = &outcome.resolution {
            tracing::debug!(session = %self.session, %actor, ?reason, "turn forfeited");
        }
        self.narrate(outcome.lines.clone());
        if let Some(user) = user {
            self.settle_action(user, &outcome, entry.as_ref())?;
        }
        Ok(())
    }

    fn monster_action(&mut self, actor: CombatantId) -> BattleAction {
        let Some(side) = self.state.get(actor).map(|c| c.side.opponent()) else {
            return BattleAction::Forfeit(ForfeitReason::InputUnavailable);
        };
        let targets = self.state.living(side);
        if targets.is_empty() {
            return BattleAction::Forfeit(ForfeitReason::InputUnavailable);
        }
        let target = targets[self.rng.index(targets.len())];
        BattleAction::Attack { target }
    }

    /// Takes one unit of `entry` out of storage. Returns `false` when the
    /// stack is already gone, in which case the item must not be used.
    fn take_item(&self, user: UserId, entry: &InventoryEntry) -> Result<bool> {
        let taken = self.services.stores.inventory.remove(
            user,
            entry.item.id,
            1,
            entry.enhancement,
        )?;
        if !taken {
            tracing::warn!(%user, item = ?entry.item.id, "item vanished before use");
        }
        Ok(taken)
    }

    /// Refunds a taken item when its action was forfeited, then writes the
    /// permanent part of the action.
    fn settle_action(
        &self,
        user: UserId,
        outcome: &ActionOutcome,
        taken: Option<&InventoryEntry>,
    ) -> Result<()> {
        if let (Some(entry), true) = (taken, outcome.is_forfeit()) {
            self.services
                .stores
                .inventory
                .add(user, &entry.item, 1, entry.enhancement)?;
        }
        if outcome.persistent.is_empty() {
            return Ok(());
        }
        self.persist(user, outcome)
    }

    /// Writes the permanent part of an action straight to storage.
    fn persist(&self, user: UserId, outcome: &ActionOutcome) -> Result<()> {
        let mut sheet = self.services.character(user)?;
        let mut patch = CharacterPatch::default();

        for change in &outcome.persistent {
            match change {
                // Taken from storage before the effect was applied.
                PersistentChange::ConsumeItem { .. } => {}
                PersistentChange::RaiseMaxHp(amount) => {
                    sheet.max_hp = sheet.max_hp.saturating_add(*amount);
                    patch.max_hp = Some(sheet.max_hp);
                }
                PersistentChange::GainExperience(amount) => {
                    sheet.experience = sheet.experience.saturating_add(*amount);
                    patch.experience = Some(sheet.experience);
                }
                PersistentChange::RaiseAttribute { attribute, amount } => {
                    sheet.attributes.raise(*attribute, *amount as i32);
                    patch.attributes = Some(sheet.attributes);
                }
            }
        }

        if !patch.is_empty() {
            self.services.stores.characters.update(user, &patch)?;
        }
        Ok(())
    }
}

pub(crate) async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
