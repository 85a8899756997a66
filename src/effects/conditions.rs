//! Built-in condition components.
//!
//! Conditions gate a subtree on caster state. They never touch the target
//! list; a failing condition short-circuits its children.

use crate::core::EntityId;

use super::node::{Behavior, ComponentCategory, EffectContext, EffectNode, Outcome};

fn verdict(pass: bool) -> Outcome {
    if pass {
        Outcome::Pass
    } else {
        Outcome::Fail
    }
}

/// Passes a percentage roll.
///
/// Settings: `chance` (level-scaled percent, default 100).
pub struct ChanceCondition;

impl Behavior for ChanceCondition {
    fn key(&self) -> &'static str {
        "chance"
    }

    fn category(&self) -> ComponentCategory {
        ComponentCategory::Condition
    }

    fn apply(
        &self,
        ctx: &mut EffectContext<'_>,
        node: &EffectNode,
        caster: EntityId,
        level: i32,
        _targets: &[EntityId],
    ) -> Outcome {
        let percent = ctx.value(node.settings(), "chance", caster, level, 100.0);
        verdict(ctx.rng.chance(percent))
    }
}

/// Passes while the caster's health sits in a range.
///
/// Settings: `min` (default 0), `max` (default unbounded), both level-scaled
/// or formulas; `percent` switches the comparison to health/max-health.
pub struct HealthCondition;

impl Behavior for HealthCondition {
    fn key(&self) -> &'static str {
        "health"
    }

    fn category(&self) -> ComponentCategory {
        ComponentCategory::Condition
    }

    fn apply(
        &self,
        ctx: &mut EffectContext<'_>,
        node: &EffectNode,
        caster: EntityId,
        level: i32,
        _targets: &[EntityId],
    ) -> Outcome {
        let min = ctx.value(node.settings(), "min", caster, level, 0.0);
        let max = ctx.value(node.settings(), "max", caster, level, f64::MAX);
        let current = if node.settings().bool("percent", false) {
            let max_health = ctx.world.max_health(caster);
            if max_health > 0.0 {
                100.0 * ctx.world.health(caster) / max_health
            } else {
                0.0
            }
        } else {
            ctx.world.health(caster)
        };
        verdict(current >= min && current <= max)
    }
}

/// Passes while the caster's mana sits in a range.
///
/// Settings: `min` (default 0), `max` (default unbounded).
pub struct ManaCondition;

impl Behavior for ManaCondition {
    fn key(&self) -> &'static str {
        "mana"
    }

    fn category(&self) -> ComponentCategory {
        ComponentCategory::Condition
    }

    fn apply(
        &self,
        ctx: &mut EffectContext<'_>,
        node: &EffectNode,
        caster: EntityId,
        level: i32,
        _targets: &[EntityId],
    ) -> Outcome {
        let min = ctx.value(node.settings(), "min", caster, level, 0.0);
        let max = ctx.value(node.settings(), "max", caster, level, f64::MAX);
        let mana = ctx.world.mana(caster);
        verdict(mana >= min && mana <= max)
    }
}

/// Passes when a formula is truthy.
///
/// Settings: `condition` (formula string; sees stats, `Lv`, and any values
/// the trigger extracted, e.g. `api_damage > 5 && STR >= 10`).
pub struct ValueCondition;

impl Behavior for ValueCondition {
    fn key(&self) -> &'static str {
        "value"
    }

    fn category(&self) -> ComponentCategory {
        ComponentCategory::Condition
    }

    fn apply(
        &self,
        ctx: &mut EffectContext<'_>,
        node: &EffectNode,
        caster: EntityId,
        level: i32,
        _targets: &[EntityId],
    ) -> Outcome {
        let value = ctx.value(node.settings(), "condition", caster, level, 0.0);
        verdict(crate::formula::truthy(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Settings, SkillRng};
    use crate::host::{SimEntity, SimWorld};
    use crate::skills::CastData;

    fn run(node: &EffectNode, world: &mut SimWorld, caster: EntityId) -> bool {
        run_with_data(node, world, caster, CastData::default())
    }

    fn run_with_data(
        node: &EffectNode,
        world: &mut SimWorld,
        caster: EntityId,
        mut data: CastData,
    ) -> bool {
        let mut rng = SkillRng::new(42);
        let mut ctx = EffectContext {
            world,
            data: &mut data,
            rng: &mut rng,
        };
        node.execute(&mut ctx, caster, 1, &[caster])
    }

    #[test]
    fn test_chance_extremes() {
        let mut world = SimWorld::new();
        let caster = world.spawn(SimEntity::default());

        let always = EffectNode::new(Box::new(ChanceCondition))
            .with_settings(Settings::new().with("chance", 100.0));
        let never = EffectNode::new(Box::new(ChanceCondition))
            .with_settings(Settings::new().with("chance", 0.0));

        assert!(run(&always, &mut world, caster));
        assert!(!run(&never, &mut world, caster));
    }

    #[test]
    fn test_health_range() {
        let mut world = SimWorld::new();
        let caster = world.spawn(SimEntity::default()); // 20/20 hp

        let healthy = EffectNode::new(Box::new(HealthCondition))
            .with_settings(Settings::new().with("min", 15.0));
        assert!(run(&healthy, &mut world, caster));

        let wounded = EffectNode::new(Box::new(HealthCondition))
            .with_settings(Settings::new().with("max", 10.0));
        assert!(!run(&wounded, &mut world, caster));
    }

    #[test]
    fn test_health_percent_mode() {
        let mut world = SimWorld::new();
        let caster = world.spawn(SimEntity::default());
        world.entity_mut(caster).unwrap().health = 5.0; // 25%

        let below_half = EffectNode::new(Box::new(HealthCondition)).with_settings(
            Settings::new().with("max", 50.0).with("percent", true),
        );
        assert!(run(&below_half, &mut world, caster));
    }

    #[test]
    fn test_mana_range() {
        let mut world = SimWorld::new();
        let caster = world.spawn(SimEntity::default()); // 100 mana

        let enough = EffectNode::new(Box::new(ManaCondition))
            .with_settings(Settings::new().with("min", 50.0));
        assert!(run(&enough, &mut world, caster));

        let too_much = EffectNode::new(Box::new(ManaCondition))
            .with_settings(Settings::new().with("max", 50.0));
        assert!(!run(&too_much, &mut world, caster));
    }

    #[test]
    fn test_value_condition_sees_cast_data() {
        let mut world = SimWorld::new();
        let caster = world.spawn(SimEntity::default());

        // Extracted keys use `_` so formulas can reference them.
        let node = EffectNode::new(Box::new(ValueCondition))
            .with_settings(Settings::new().with("condition", "api_damage > 5"));

        let mut big = CastData::default();
        big.insert("api_damage".to_string(), 9.0);
        assert!(run_with_data(&node, &mut world, caster, big));

        let mut small = CastData::default();
        small.insert("api_damage".to_string(), 2.0);
        assert!(!run_with_data(&node, &mut world, caster, small));
    }
}
