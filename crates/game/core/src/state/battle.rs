//! Per-battle state: combatants, round counter and terminal outcome.

use super::{Combatant, CombatantId, Side};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleMode {
    Pve,
    Pvp,
    Dungeon,
}

/// Terminal state of a battle. `PlayerWon` and `EnemyWon` are named from the
/// party side's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleOutcome {
    Active,
    PlayerWon,
    EnemyWon,
    Fled,
}

impl BattleOutcome {
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Active)
    }

    /// Winning side, if the battle ended in a victory.
    pub const fn winner(self) -> Option<Side> {
        match self {
            Self::PlayerWon => Some(Side::Party),
            Self::EnemyWon => Some(Side::Opposition),
            Self::Active | Self::Fled => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleState {
    pub mode: BattleMode,
    /// Indexed by [`CombatantId`]; party members come first in join order.
    pub combatants: Vec<Combatant>,
    /// 1-based round counter.
    pub round: u32,
    pub outcome: BattleOutcome,
}

impl BattleState {
    /// Assembles a battle, reassigning ids to match positions.
    pub fn new(mode: BattleMode, combatants: impl IntoIterator<Item = Combatant>) -> Self {
        let combatants = combatants
            .into_iter()
            .enumerate()
            .map(|(index, mut combatant)| {
                combatant.id = CombatantId(index);
                combatant
            })
            .collect();
        Self {
            mode,
            combatants,
            round: 1,
            outcome: BattleOutcome::Active,
        }
    }

    pub fn get(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.get(id.0)
    }

    pub fn get_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.combatants.get_mut(id.0)
    }

    /// Two distinct combatants borrowed mutably at once.
    pub fn pair_mut(
        &mut self,
        a: CombatantId,
        b: CombatantId,
    ) -> Option<(&mut Combatant, &mut Combatant)> {
        if a == b || a.0 >= self.combatants.len() || b.0 >= self.combatants.len() {
            return None;
        }
        if a.0 < b.0 {
            let (left, right) = self.combatants.split_at_mut(b.0);
            Some((&mut left[a.0], &mut right[0]))
        } else {
            let (left, right) = self.combatants.split_at_mut(a.0);
            Some((&mut right[0], &mut left[b.0]))
        }
    }

    /// Members of `side`, in join order.
    pub fn members(&self, side: Side) -> impl Iterator<Item = &Combatant> {
        self.combatants.iter().filter(move |c| c.side == side)
    }

    /// Living members of `side`, in join order.
    pub fn living(&self, side: Side) -> Vec<CombatantId> {
        self.members(side)
            .filter(|c| c.is_alive())
            .map(|c| c.id)
            .collect()
    }

    pub fn side_defeated(&self, side: Side) -> bool {
        self.members(side).all(|c| !c.is_alive())
    }

    /// First living combatant opposing `actor`.
    pub fn first_living_opponent(&self, actor: CombatantId) -> Option<CombatantId> {
        let side = self.get(actor)?.side.opponent();
        self.living(side).first().copied()
    }

    /// Re-evaluates the outcome after an action. Fled is sticky.
    pub fn check_terminal(&mut self) -> BattleOutcome {
        if self.outcome.is_terminal() {
            return self.outcome;
        }
        if self.side_defeated(Side::Opposition) {
            self.outcome = BattleOutcome::PlayerWon;
        } else if self.side_defeated(Side::Party) {
            self.outcome = BattleOutcome::EnemyWon;
        }
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_terminal()
    }

    /// Closes a round: buffs and debuffs on every combatant lose one turn.
    pub fn end_round(&mut self) {
        for combatant in &mut self.combatants {
            combatant.effects.tick_round();
        }
        self.round += 1;
    }

    /// Read-only summary for prompts and presentation.
    pub fn view(&self) -> BattleView {
        BattleView {
            mode: self.mode,
            round: self.round,
            combatants: self
                .combatants
                .iter()
                .map(|c| CombatantView {
                    id: c.id,
                    name: c.name.clone(),
                    side: c.side,
                    hp: c.hp.current(),
                    max_hp: c.hp.maximum(),
                    mp: c.mp.current(),
                    max_mp: c.mp.maximum(),
                    alive: c.is_alive(),
                })
                .collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantView {
    pub id: CombatantId,
    pub name: String,
    pub side: Side,
    pub hp: u32,
    pub max_hp: u32,
    pub mp: u32,
    pub max_mp: u32,
    pub alive: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleView {
    pub mode: BattleMode,
    pub round: u32,
    pub combatants: Vec<CombatantView>,
}

impl BattleView {
    pub fn living(&self, side: Side) -> impl Iterator<Item = &CombatantView> {
        self.combatants
            .iter()
            .filter(move |c| c.side == side && c.alive)
    }
}
