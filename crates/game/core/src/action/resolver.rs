//! Applies one combatant's chosen action to battle state.
//!
//! Every rejection happens before the first mutation, so a forfeited turn
//! never leaves the battle half-changed. Terminal conditions are re-checked
//! after every call.

use super::{ActionOutcome, BattleAction, CombatDelta, ForfeitReason, PersistentChange, Resolution};
use crate::catalog::{ItemDefinition, ItemEffect, Skill, SkillEffect};
use crate::combat;
use crate::config::DamageSpread;
use crate::env::RngSource;
use crate::error::ActionError;
use crate::state::{
    BattleMode, BattleOutcome, BattleState, Combatant, CombatantId, EffectKind, StatTarget,
    StatusEffect,
};
use crate::stats::{Attribute, SpecialBonus, StatResolver};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActionResolver {
    spread: DamageSpread,
}

impl ActionResolver {
    pub const fn new(spread: DamageSpread) -> Self {
        Self { spread }
    }

    /// Duels use the narrow spread; everything else the wide one.
    pub const fn for_mode(mode: BattleMode) -> Self {
        match mode {
            BattleMode::Pvp => Self::new(DamageSpread::PVP),
            BattleMode::Pve | BattleMode::Dungeon => Self::new(DamageSpread::PVE),
        }
    }

    pub fn resolve<R: RngSource + ?Sized>(
        &self,
        state: &mut BattleState,
        actor: CombatantId,
        action: &BattleAction,
        rng: &mut R,
    ) -> ActionOutcome {
        let Some(acting) = state.get(actor) else {
            return ActionOutcome::forfeited(
                "Unknown combatant",
                ActionError::TargetNotFound { target: actor }.into(),
            );
        };
        let name = acting.name.clone();
        if !acting.is_alive() {
            return ActionOutcome::forfeited(&name, ActionError::ActorDefeated { actor }.into());
        }

        let outcome = match action {
            BattleAction::Attack { target } => self.attack(state, actor, *target, rng),
            BattleAction::Defend => defend(state, actor),
            BattleAction::UseSkill { skill, target } => use_skill(state, actor, skill, *target),
            BattleAction::UseItem { item } => use_item(state, actor, item),
            BattleAction::Flee => flee(state, actor, rng),
            BattleAction::Surrender => surrender(state, actor),
            BattleAction::Forfeit(reason) => ActionOutcome::forfeited(&name, reason.clone()),
        };
        state.check_terminal();
        outcome
    }

    fn attack<R: RngSource + ?Sized>(
        &self,
        state: &mut BattleState,
        actor: CombatantId,
        target: CombatantId,
        rng: &mut R,
    ) -> ActionOutcome {
        let Some((attacker, defender)) = opposing_pair(state, actor, target) else {
            return target_missing(state, actor, target);
        };

        let damage = combat::attack_damage(
            StatResolver::effective_attack(attacker),
            StatResolver::effective_defense(defender),
            self.spread,
            rng,
        );
        let mut outcome = ActionOutcome::acted();
        outcome.line(format!(
            "{} attacks {} and deals {} damage!",
            attacker.name, defender.name, damage
        ));
        deal_damage(&mut outcome, defender, damage);

        if let Some(percent) = attacker.equipment.special(SpecialBonus::LifestealPercent) {
            let drained = combat::lifesteal(damage, percent);
            if drained > 0 {
                let healed = attacker.hp.restore(drained);
                outcome.delta(CombatDelta::Healed {
                    target: attacker.id,
                    amount: healed,
                });
                outcome.line(format!(
                    "{} drains {} HP! (HP: {})",
                    attacker.name,
                    drained,
                    attacker.hp.current()
                ));
            }
        }
        outcome
    }
}

fn defend(state: &mut BattleState, actor: CombatantId) -> ActionOutcome {
    let mut outcome = ActionOutcome::acted();
    if let Some(defender) = state.get_mut(actor) {
        defender.defending = true;
        outcome.delta(CombatDelta::Defending { actor });
        outcome.line(format!(
            "{} braces for the next attack, raising their defense!",
            defender.name
        ));
    }
    outcome
}

fn use_skill(
    state: &mut BattleState,
    actor: CombatantId,
    skill: &Skill,
    target: CombatantId,
) -> ActionOutcome {
    let Some(caster) = state.get(actor) else {
        return target_missing(state, actor, actor);
    };
    let available = caster.mp.current();
    if available < skill.mp_cost {
        return ActionOutcome::forfeited(
            &caster.name,
            ActionError::InsufficientMp {
                required: skill.mp_cost,
                available,
            }
            .into(),
        );
    }
    let magnitude = skill.magnitude(&caster.attributes());

    if skill.effect.is_offensive() {
        let Some((caster, foe)) = opposing_pair(state, actor, target) else {
            return target_missing(state, actor, target);
        };
        let mut outcome = begin_cast(caster, skill);
        let defense = StatResolver::effective_defense(foe);
        match skill.effect {
            SkillEffect::Damage => {
                let damage = combat::skill_damage(magnitude, defense);
                outcome.line(format!(
                    "The skill deals {} damage to {}!",
                    damage, foe.name
                ));
                deal_damage(&mut outcome, foe, damage);
            }
            SkillEffect::DamagePiercing => {
                let damage = combat::piercing_damage(magnitude, defense);
                outcome.line(format!(
                    "The piercing strike deals {} damage to {}!",
                    damage, foe.name
                ));
                deal_damage(&mut outcome, foe, damage);
            }
            SkillEffect::DamageAndPoison => {
                let damage = combat::skill_damage(magnitude, defense);
                outcome.line(format!("The skill deals {} direct damage...", damage));
                deal_damage(&mut outcome, foe, damage);
                let poison = combat::poison_damage(magnitude);
                install(
                    &mut outcome,
                    foe,
                    EffectKind::DamageOverTime,
                    poison,
                    skill.effect_duration,
                );
                outcome.line(format!(
                    "...and poisons {} for {} turns!",
                    foe.name, skill.effect_duration
                ));
            }
            SkillEffect::DebuffDefense => {
                install(
                    &mut outcome,
                    foe,
                    EffectKind::Debuff(StatTarget::Defense),
                    magnitude,
                    skill.effect_duration,
                );
                outcome.line(format!(
                    "{}'s defense is reduced by {} for {} turns!",
                    foe.name, magnitude, skill.effect_duration
                ));
            }
            SkillEffect::Heal | SkillEffect::BuffAttack | SkillEffect::BuffDefense => {}
        }
        return outcome;
    }

    let Some(caster) = state.get_mut(actor) else {
        return ActionOutcome::acted();
    };
    let mut outcome = begin_cast(caster, skill);
    match skill.effect {
        SkillEffect::Heal => {
            let healed = caster.hp.restore(magnitude);
            outcome.delta(CombatDelta::Healed {
                target: actor,
                amount: healed,
            });
            outcome.line(format!(
                "{} heals {} HP! Current HP: {}",
                caster.name,
                healed,
                caster.hp.current()
            ));
        }
        SkillEffect::BuffAttack => {
            install(
                &mut outcome,
                caster,
                EffectKind::Buff(StatTarget::Attack),
                magnitude,
                skill.effect_duration,
            );
            outcome.line(format!(
                "{}'s attack rises by {} for {} turns!",
                caster.name, magnitude, skill.effect_duration
            ));
        }
        SkillEffect::BuffDefense => {
            install(
                &mut outcome,
                caster,
                EffectKind::Buff(StatTarget::Defense),
                magnitude,
                skill.effect_duration,
            );
            outcome.line(format!(
                "A barrier raises {}'s defense by {} for {} turns!",
                caster.name, magnitude, skill.effect_duration
            ));
        }
        SkillEffect::Damage
        | SkillEffect::DamagePiercing
        | SkillEffect::DamageAndPoison
        | SkillEffect::DebuffDefense => {}
    }
    outcome
}

fn use_item(state: &mut BattleState, actor: CombatantId, item: &ItemDefinition) -> ActionOutcome {
    let Some(user) = state.get_mut(actor) else {
        return ActionOutcome::acted();
    };
    let Some(effect) = item.effect.filter(|_| item.is_consumable()) else {
        return ActionOutcome::forfeited(&user.name, ActionError::InvalidSelection.into());
    };

    let mut outcome = ActionOutcome::acted();
    outcome
        .persistent
        .push(PersistentChange::ConsumeItem { item: item.id });
    match effect {
        ItemEffect::HealHp(amount) => {
            let healed = user.hp.restore(amount);
            outcome.delta(CombatDelta::Healed {
                target: actor,
                amount: healed,
            });
            outcome.line(format!(
                "{} uses {} and recovers {} HP! Current HP: {}",
                user.name,
                item.name,
                healed,
                user.hp.current()
            ));
        }
        ItemEffect::HealMp(amount) => {
            let restored = user.mp.restore(amount);
            outcome.delta(CombatDelta::ManaRestored {
                target: actor,
                amount: restored,
            });
            outcome.line(format!(
                "{} uses {} and recovers {} MP! Current MP: {}",
                user.name,
                item.name,
                restored,
                user.mp.current()
            ));
        }
        ItemEffect::IncreaseMaxHp(amount) => {
            user.hp.raise_maximum(amount);
            outcome.persistent.push(PersistentChange::RaiseMaxHp(amount));
            outcome.line(format!(
                "{} uses {} and their maximum HP rises by {}! New maximum: {}",
                user.name,
                item.name,
                amount,
                user.hp.maximum()
            ));
        }
        ItemEffect::GainXp(amount) => {
            outcome
                .persistent
                .push(PersistentChange::GainExperience(amount));
            outcome.line(format!(
                "{} uses {} and gains {} experience!",
                user.name, item.name, amount
            ));
        }
        ItemEffect::IncreaseDexterity(amount) => {
            if let Some(character) = user.character_mut() {
                character
                    .attributes
                    .raise(Attribute::Dexterity, amount as i32);
            }
            outcome.persistent.push(PersistentChange::RaiseAttribute {
                attribute: Attribute::Dexterity,
                amount,
            });
            outcome.line(format!(
                "{} uses {} and their dexterity rises permanently by {}!",
                user.name, item.name, amount
            ));
        }
    }
    outcome
}

fn flee<R: RngSource + ?Sized>(
    state: &mut BattleState,
    actor: CombatantId,
    rng: &mut R,
) -> ActionOutcome {
    let Some(runner) = state.get(actor) else {
        return ActionOutcome::acted();
    };
    if state.mode == BattleMode::Dungeon || runner.character().is_none() {
        return ActionOutcome::forfeited(&runner.name, ForfeitReason::CannotFlee);
    }
    let name = runner.name.clone();
    if rng.chance(StatResolver::flee_chance(runner)) {
        state.outcome = BattleOutcome::Fled;
        ActionOutcome {
            lines: vec![format!("{name} escaped from the battle!")],
            resolution: Resolution::Fled,
            deltas: Vec::new(),
            persistent: Vec::new(),
        }
    } else {
        ActionOutcome::forfeited(&name, ForfeitReason::FleeFailed)
    }
}

fn surrender(state: &mut BattleState, actor: CombatantId) -> ActionOutcome {
    let mode = state.mode;
    let Some(quitter) = state.get_mut(actor) else {
        return ActionOutcome::acted();
    };
    if mode != BattleMode::Pvp {
        return ActionOutcome::forfeited(&quitter.name, ActionError::InvalidSelection.into());
    }
    let mut outcome = ActionOutcome::acted();
    outcome.line(format!("{} surrenders the duel!", quitter.name));
    let remaining = quitter.hp.current();
    deal_damage(&mut outcome, quitter, remaining);
    outcome
}

/// Borrows `actor` and `target` mutably, requiring a living target on the
/// other side.
fn opposing_pair(
    state: &mut BattleState,
    actor: CombatantId,
    target: CombatantId,
) -> Option<(&mut Combatant, &mut Combatant)> {
    let (acting, targeted) = state.pair_mut(actor, target)?;
    (acting.side != targeted.side && targeted.is_alive()).then_some((acting, targeted))
}

fn target_missing(state: &BattleState, actor: CombatantId, target: CombatantId) -> ActionOutcome {
    let name = state.get(actor).map_or("Unknown combatant", |c| c.name.as_str());
    ActionOutcome::forfeited(name, ActionError::TargetNotFound { target }.into())
}

fn begin_cast(caster: &mut Combatant, skill: &Skill) -> ActionOutcome {
    let mut outcome = ActionOutcome::acted();
    if caster.mp.spend(skill.mp_cost) {
        outcome.delta(CombatDelta::ManaSpent {
            actor: caster.id,
            amount: skill.mp_cost,
        });
    }
    outcome.line(format!("{} uses {}!", caster.name, skill.name));
    outcome
}

fn deal_damage(outcome: &mut ActionOutcome, target: &mut Combatant, damage: u32) {
    target.hp.damage(damage);
    outcome.delta(CombatDelta::Damaged {
        target: target.id,
        amount: damage,
    });
    if !target.is_alive() {
        outcome.delta(CombatDelta::Defeated { target: target.id });
        outcome.line(format!("{} has been defeated!", target.name));
    }
}

fn install(
    outcome: &mut ActionOutcome,
    target: &mut Combatant,
    kind: EffectKind,
    magnitude: u32,
    duration: u32,
) {
    if target
        .effects
        .apply(StatusEffect::new(kind, magnitude, duration))
    {
        outcome.delta(CombatDelta::EffectApplied {
            target: target.id,
            kind,
            magnitude,
            duration,
        });
    }
}
