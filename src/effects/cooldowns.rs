//! Built-in cooldown components.

use tracing::warn;

use crate::core::EntityId;

use super::node::{Behavior, ComponentCategory, EffectContext, EffectNode, Outcome};

/// Gates the subtree behind a per-skill cooldown.
///
/// Settings: `cooldown` (seconds, formula or level-scaled, default 1).
/// Fails while the skill is still cooling; otherwise starts the cooldown
/// and passes. Needs the node's skill binding to track the cooldown - an
/// unbound node passes with a warning.
pub struct CooldownGate;

impl Behavior for CooldownGate {
    fn key(&self) -> &'static str {
        "cooldown"
    }

    fn category(&self) -> ComponentCategory {
        ComponentCategory::Cooldown
    }

    fn apply(
        &self,
        ctx: &mut EffectContext<'_>,
        node: &EffectNode,
        caster: EntityId,
        level: i32,
        _targets: &[EntityId],
    ) -> Outcome {
        let Some(skill) = node.skill() else {
            warn!("cooldown component on a node with no bound skill");
            return Outcome::Pass;
        };
        if ctx.world.cooldown_remaining(caster, skill) > 0.0 {
            return Outcome::Fail;
        }
        let seconds = ctx.value(node.settings(), "cooldown", caster, level, 1.0);
        ctx.world.start_cooldown(caster, skill, seconds);
        Outcome::Pass
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Settings, SkillId, SkillRng};
    use crate::host::{SimEntity, SimWorld};
    use crate::skills::CastData;

    fn run(node: &EffectNode, world: &mut SimWorld, caster: EntityId) -> bool {
        let mut data = CastData::default();
        let mut rng = SkillRng::new(9);
        let mut ctx = EffectContext {
            world,
            data: &mut data,
            rng: &mut rng,
        };
        node.execute(&mut ctx, caster, 1, &[caster])
    }

    #[test]
    fn test_cooldown_blocks_until_elapsed() {
        let mut world = SimWorld::new();
        let caster = world.spawn(SimEntity::default());

        let mut node = EffectNode::new(Box::new(CooldownGate))
            .with_settings(Settings::new().with("cooldown", 5.0));
        node.bind_skill(SkillId::new(2));

        assert!(run(&node, &mut world, caster));
        assert!(!run(&node, &mut world, caster)); // still cooling

        world.advance_cooldowns(5.0);
        assert!(run(&node, &mut world, caster));
    }

    #[test]
    fn test_unbound_node_passes() {
        let mut world = SimWorld::new();
        let caster = world.spawn(SimEntity::default());

        let node = EffectNode::new(Box::new(CooldownGate));
        assert!(run(&node, &mut world, caster));
    }
}
