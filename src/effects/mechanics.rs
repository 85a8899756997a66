//! Built-in mechanic components.
//!
//! Mechanics perform the gameplay effect against every inbound target, then
//! let their children run with the same list. They generally do not fail.

use crate::core::EntityId;

use super::node::{Behavior, ComponentCategory, EffectContext, EffectNode, Outcome};

/// Deals damage to each target.
///
/// Settings: `value` (formula or level-scaled number, default 1),
/// `true_damage` (bypass armor, default false).
pub struct DamageMechanic;

impl Behavior for DamageMechanic {
    fn key(&self) -> &'static str {
        "damage"
    }

    fn category(&self) -> ComponentCategory {
        ComponentCategory::Mechanic
    }

    fn apply(
        &self,
        ctx: &mut EffectContext<'_>,
        node: &EffectNode,
        caster: EntityId,
        level: i32,
        targets: &[EntityId],
    ) -> Outcome {
        let amount = ctx.value(node.settings(), "value", caster, level, 1.0);
        if amount <= 0.0 {
            return Outcome::Pass;
        }
        let true_damage = node.settings().bool("true_damage", false);
        for &target in targets {
            ctx.world.damage(target, amount, caster, true_damage);
        }
        Outcome::Pass
    }
}

/// Restores health to each target.
///
/// Settings: `value` (formula or level-scaled number, default 1).
pub struct HealMechanic;

impl Behavior for HealMechanic {
    fn key(&self) -> &'static str {
        "heal"
    }

    fn category(&self) -> ComponentCategory {
        ComponentCategory::Mechanic
    }

    fn apply(
        &self,
        ctx: &mut EffectContext<'_>,
        node: &EffectNode,
        caster: EntityId,
        level: i32,
        targets: &[EntityId],
    ) -> Outcome {
        let amount = ctx.value(node.settings(), "value", caster, level, 1.0);
        for &target in targets {
            ctx.world.heal(target, amount);
        }
        Outcome::Pass
    }
}

/// Restores mana to each target.
///
/// Settings: `value` (formula or level-scaled number, default 1).
pub struct ManaMechanic;

impl Behavior for ManaMechanic {
    fn key(&self) -> &'static str {
        "mana"
    }

    fn category(&self) -> ComponentCategory {
        ComponentCategory::Mechanic
    }

    fn apply(
        &self,
        ctx: &mut EffectContext<'_>,
        node: &EffectNode,
        caster: EntityId,
        level: i32,
        targets: &[EntityId],
    ) -> Outcome {
        let amount = ctx.value(node.settings(), "value", caster, level, 1.0);
        for &target in targets {
            ctx.world.restore_mana(target, amount);
        }
        Outcome::Pass
    }
}

/// Plays a particle effect at each target's position.
///
/// Settings: `particle` (effect name, default `flame`).
pub struct ParticleMechanic;

impl Behavior for ParticleMechanic {
    fn key(&self) -> &'static str {
        "particle"
    }

    fn category(&self) -> ComponentCategory {
        ComponentCategory::Mechanic
    }

    fn apply(
        &self,
        ctx: &mut EffectContext<'_>,
        node: &EffectNode,
        _caster: EntityId,
        _level: i32,
        targets: &[EntityId],
    ) -> Outcome {
        let effect = node.settings().text("particle", "flame").to_string();
        for &target in targets {
            if let Some(at) = ctx.world.position(target) {
                ctx.world.spawn_particle(&effect, at);
            }
        }
        Outcome::Pass
    }
}

/// Plays a sound at each target's position.
///
/// Settings: `sound` (sound name, default `click`).
pub struct SoundMechanic;

impl Behavior for SoundMechanic {
    fn key(&self) -> &'static str {
        "sound"
    }

    fn category(&self) -> ComponentCategory {
        ComponentCategory::Mechanic
    }

    fn apply(
        &self,
        ctx: &mut EffectContext<'_>,
        node: &EffectNode,
        _caster: EntityId,
        _level: i32,
        targets: &[EntityId],
    ) -> Outcome {
        let sound = node.settings().text("sound", "click").to_string();
        for &target in targets {
            if let Some(at) = ctx.world.position(target) {
                ctx.world.play_sound(&sound, at);
            }
        }
        Outcome::Pass
    }
}

/// Runs a host command against each target.
///
/// Settings: `command` (required; the node fails without one).
pub struct CommandMechanic;

impl Behavior for CommandMechanic {
    fn key(&self) -> &'static str {
        "command"
    }

    fn category(&self) -> ComponentCategory {
        ComponentCategory::Mechanic
    }

    fn apply(
        &self,
        ctx: &mut EffectContext<'_>,
        node: &EffectNode,
        _caster: EntityId,
        _level: i32,
        targets: &[EntityId],
    ) -> Outcome {
        let Some(command) = node.settings().get("command").and_then(|v| v.as_text()) else {
            return Outcome::Fail;
        };
        let command = command.to_string();
        for &target in targets {
            ctx.world.run_command(&command, target);
        }
        Outcome::Pass
    }
}
