//! Turns raw player input into validated battle actions.
//!
//! Every wait is bounded. Whatever cannot be turned into an action (timeouts,
//! cancelled or invalid submenus, provider failures) becomes a
//! [`BattleAction::Forfeit`] so the resolver logs it and the turn passes.
use std::time::Duration;

use combat_core::{
    ActionError, BattleAction, CombatantId, ForfeitReason, InventoryEntry, Skill, UserId,
};

use super::Battle;
use crate::api::{ActionProvider, ItemOption, PlayerInput, Prompt, Result, SkillOption};

/// What came back from one bounded wait.
pub(crate) enum Answer {
    Input(PlayerInput),
    TimedOut,
    Unavailable,
}

impl Answer {
    fn into_input(self) -> std::result::Result<PlayerInput, ForfeitReason> {
        match self {
            Self::Input(input) => Ok(input),
            Self::TimedOut => Err(ForfeitReason::TimedOut),
            Self::Unavailable => Err(ForfeitReason::InputUnavailable),
        }
    }
}

/// Asks `provider` and gives up after `deadline`.
pub(crate) async fn ask(
    provider: &dyn ActionProvider,
    prompt: &Prompt,
    deadline: Duration,
) -> Answer {
    match tokio::time::timeout(deadline, provider.provide(prompt)).await {
        Ok(Ok(input)) => Answer::Input(input),
        Ok(Err(err)) => {
            tracing::warn!(user = ?prompt.user(), error = %err, "input provider failed");
            Answer::Unavailable
        }
        Err(_) => {
            tracing::debug!(user = ?prompt.user(), ?deadline, "input timed out");
            Answer::TimedOut
        }
    }
}

type Choice = (BattleAction, Option<InventoryEntry>);

fn forfeit(reason: impl Into<ForfeitReason>) -> Choice {
    (BattleAction::Forfeit(reason.into()), None)
}

impl Battle<'_> {
    /// Main action menu, plus the skill or item submenu it may open.
    ///
    /// The returned inventory entry is the stack an item action already took
    /// one unit from.
    pub(super) async fn choose_action(
        &mut self,
        actor: CombatantId,
        user: UserId,
        provider: &dyn ActionProvider,
    ) -> Result<Choice> {
        let prompt = Prompt::Action {
            user,
            actor,
            view: self.state.view(),
        };
        let deadline = self.services.config.timeouts.action;
        let input = match ask(provider, &prompt, deadline).await.into_input() {
            Ok(input) => input,
            Err(reason) => return Ok(forfeit(reason)),
        };

        Ok(match input {
            PlayerInput::Attack { target } => match self.target_or_first(actor, target) {
                Some(target) => (BattleAction::Attack { target }, None),
                None => forfeit(ActionError::TargetNotFound { target: actor }),
            },
            PlayerInput::Defend => (BattleAction::Defend, None),
            PlayerInput::Skill { target } => self.choose_skill(actor, user, target, provider).await,
            PlayerInput::Item => self.choose_item(user, provider).await?,
            PlayerInput::Flee => (BattleAction::Flee, None),
            PlayerInput::Surrender => (BattleAction::Surrender, None),
            PlayerInput::Cancel => forfeit(ForfeitReason::Cancelled),
            PlayerInput::Select(_)
            | PlayerInput::Attribute(_)
            | PlayerInput::RestUseItem { .. }
            | PlayerInput::Continue { .. }
            | PlayerInput::Unrecognized(_) => forfeit(ActionError::InvalidSelection),
        })
    }

    fn target_or_first(
        &self,
        actor: CombatantId,
        target: Option<CombatantId>,
    ) -> Option<CombatantId> {
        target.or_else(|| self.state.first_living_opponent(actor))
    }

    async fn choose_skill(
        &mut self,
        actor: CombatantId,
        user: UserId,
        target: Option<CombatantId>,
        provider: &dyn ActionProvider,
    ) -> Choice {
        let Some(character) = self.state.get(actor).and_then(|c| c.character()) else {
            return forfeit(ActionError::NoSkillsKnown);
        };
        let skills: Vec<Skill> = self
            .services
            .oracles
            .skills()
            .for_class_and_level(character.class, character.level);
        if skills.is_empty() {
            return forfeit(ActionError::NoSkillsKnown);
        }

        let prompt = Prompt::Skill {
            user,
            skills: skills
                .iter()
                .map(|skill| SkillOption {
                    name: skill.name.clone(),
                    description: skill.description.clone(),
                    mp_cost: skill.mp_cost,
                })
                .collect(),
        };
        let deadline = self.services.config.timeouts.submenu;
        let index = match ask(provider, &prompt, deadline).await.into_input() {
            Ok(PlayerInput::Select(index)) => index,
            Ok(PlayerInput::Cancel) => return forfeit(ForfeitReason::Cancelled),
            Ok(_) => return forfeit(ActionError::InvalidSelection),
            Err(reason) => return forfeit(reason),
        };
        let Some(skill) = skills.into_iter().nth(index) else {
            return forfeit(ActionError::InvalidSelection);
        };

        let target = if skill.effect.is_offensive() {
            match self.target_or_first(actor, target) {
                Some(target) => target,
                None => return forfeit(ActionError::TargetNotFound { target: actor }),
            }
        } else {
            actor
        };
        (BattleAction::UseSkill { skill, target }, None)
    }

    async fn choose_item(&mut self, user: UserId, provider: &dyn ActionProvider) -> Result<Choice> {
        let consumables: Vec<InventoryEntry> = self
            .services
            .stores
            .inventory
            .get(user)?
            .into_iter()
            .filter(|entry| entry.item.is_consumable() && entry.quantity > 0)
            .collect();
        if consumables.is_empty() {
            return Ok(forfeit(ActionError::NoConsumables));
        }

        let prompt = Prompt::Item {
            user,
            items: consumables
                .iter()
                .map(|entry| ItemOption {
                    name: entry.item.name.clone(),
                    quantity: entry.quantity,
                })
                .collect(),
        };
        let deadline = self.services.config.timeouts.submenu;
        let index = match ask(provider, &prompt, deadline).await.into_input() {
            Ok(PlayerInput::Select(index)) => index,
            Ok(PlayerInput::Cancel) => return Ok(forfeit(ForfeitReason::Cancelled)),
            Ok(_) => return Ok(forfeit(ActionError::InvalidSelection)),
            Err(reason) => return Ok(forfeit(reason)),
        };
        let Some(entry) = consumables.into_iter().nth(index) else {
            return Ok(forfeit(ActionError::InvalidSelection));
        };
        if !self.take_item(user, &entry)? {
            return Ok(forfeit(ActionError::InsufficientItem {
                item: entry.item.name,
            }));
        }

        Ok((
            BattleAction::UseItem {
                item: entry.item.clone(),
            },
            Some(entry),
        ))
    }
}
