use crate::catalog::{ItemDefinition, Skill};
use crate::error::ActionError;
use crate::state::CombatantId;

/// A fully validated choice for one combatant's turn.
///
/// The runtime turns raw player input into one of these; the enemy AI always
/// produces [`BattleAction::Attack`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleAction {
    Attack { target: CombatantId },
    Defend,
    UseSkill { skill: Skill, target: CombatantId },
    /// The runtime has already taken one unit out of the inventory.
    UseItem { item: ItemDefinition },
    Flee,
    /// Duel-only: concede the fight.
    Surrender,
    Forfeit(ForfeitReason),
}

/// Why a turn passed without an action.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ForfeitReason {
    /// The input deadline expired.
    TimedOut,
    /// The player cancelled a submenu.
    Cancelled,
    /// No input source is available for this actor.
    InputUnavailable,
    /// Fleeing is not possible in this kind of battle.
    CannotFlee,
    /// The escape roll failed.
    FleeFailed,
    Rejected(ActionError),
}

impl ForfeitReason {
    pub fn describe(&self, actor: &str) -> String {
        match self {
            Self::TimedOut => format!("{actor} took too long to act and lost the turn."),
            Self::Cancelled => format!("{actor} cancelled and lost the turn."),
            Self::InputUnavailable => format!("{actor} hesitates and loses the turn."),
            Self::CannotFlee => format!("{actor} finds no way out and loses the turn."),
            Self::FleeFailed => format!("The escape attempt failed! {actor} loses the turn."),
            Self::Rejected(ActionError::InvalidSelection) => {
                format!("Invalid choice. {actor} loses the turn.")
            }
            Self::Rejected(ActionError::NoSkillsKnown) => {
                format!("{actor} has not learned any skills yet and loses the turn.")
            }
            Self::Rejected(ActionError::NoConsumables) => {
                format!("{actor} has no consumable items and loses the turn.")
            }
            Self::Rejected(ActionError::InsufficientMp {
                required,
                available,
            }) => format!(
                "{actor} does not have enough MP ({available}/{required}) and loses the turn."
            ),
            Self::Rejected(ActionError::InsufficientItem { item }) => {
                format!("{actor} could not use {item} and loses the turn.")
            }
            Self::Rejected(ActionError::TargetNotFound { .. }) => {
                format!("Invalid target. {actor} loses the turn.")
            }
            Self::Rejected(ActionError::ActorDefeated { .. }) => {
                format!("{actor} is down and cannot act.")
            }
        }
    }
}

impl From<ActionError> for ForfeitReason {
    fn from(error: ActionError) -> Self {
        Self::Rejected(error)
    }
}
