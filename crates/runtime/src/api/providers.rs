//! Asynchronous input port for player decisions.
//!
//! The scheduler never talks to a chat platform. It asks an [`ActionProvider`]
//! for the next [`PlayerInput`] against a [`Prompt`] and races the answer
//! against a deadline; whatever the provider cannot answer in time becomes a
//! forfeited turn.
use async_trait::async_trait;
use combat_core::{Attribute, BattleView, CombatantId, Side, UserId};

use super::errors::Result;

/// One selectable skill, as shown to the player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkillOption {
    pub name: String,
    pub description: String,
    pub mp_cost: u32,
}

/// One selectable consumable, as shown to the player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemOption {
    pub name: String,
    pub quantity: u32,
}

/// What the scheduler is waiting for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Prompt {
    /// Main action menu for `user`'s combatant.
    Action {
        user: UserId,
        actor: CombatantId,
        view: BattleView,
    },
    /// Skill submenu. Answer with [`PlayerInput::Select`] or [`PlayerInput::Cancel`].
    Skill {
        user: UserId,
        skills: Vec<SkillOption>,
    },
    /// Item submenu. Answer with [`PlayerInput::Select`] or [`PlayerInput::Cancel`].
    Item { user: UserId, items: Vec<ItemOption> },
    /// One attribute point to spend after a milestone level-up.
    Attribute {
        user: UserId,
        point: u32,
        total: u32,
    },
    /// Dungeon rest stage. Any living member may heal; the leader continues.
    Rest {
        leader: UserId,
        members: Vec<UserId>,
        view: BattleView,
    },
}

impl Prompt {
    /// The player expected to answer, if the prompt is addressed to one.
    pub fn user(&self) -> Option<UserId> {
        match self {
            Self::Action { user, .. }
            | Self::Skill { user, .. }
            | Self::Item { user, .. }
            | Self::Attribute { user, .. } => Some(*user),
            Self::Rest { .. } => None,
        }
    }
}

/// Raw, unvalidated answer to a [`Prompt`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlayerInput {
    /// `None` targets the first living opponent.
    Attack { target: Option<CombatantId> },
    Defend,
    /// Opens the skill submenu. `None` targets the first living opponent.
    Skill { target: Option<CombatantId> },
    /// Opens the item submenu.
    Item,
    Flee,
    Surrender,
    /// Zero-based entry of a submenu.
    Select(usize),
    Cancel,
    Attribute(Attribute),
    /// Rest stage: `user` drinks the named potion.
    RestUseItem { user: UserId, item: String },
    /// Rest stage: `user` asks to move on.
    Continue { user: UserId },
    Unrecognized(String),
}

/// Trait for providing player input for a prompt.
///
/// Implementations can handle chat messages, CLI input, scripted fixtures or
/// simple policies. Returning `Err` forfeits the turn just like a timeout.
#[async_trait]
pub trait ActionProvider: Send + Sync {
    async fn provide(&self, prompt: &Prompt) -> Result<PlayerInput>;
}

/// Always attacks the first living opponent and otherwise does nothing.
///
/// Used for autohunt-style runs and as a fallback.
pub struct AutoAttackProvider;

#[async_trait]
impl ActionProvider for AutoAttackProvider {
    async fn provide(&self, prompt: &Prompt) -> Result<PlayerInput> {
        Ok(match prompt {
            Prompt::Action { view, .. } => PlayerInput::Attack {
                target: view.living(Side::Opposition).next().map(|c| c.id),
            },
            Prompt::Skill { .. } | Prompt::Item { .. } | Prompt::Attribute { .. } => {
                PlayerInput::Cancel
            }
            Prompt::Rest { leader, .. } => PlayerInput::Continue { user: *leader },
        })
    }
}
