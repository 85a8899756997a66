//! Built-in cost components.
//!
//! Costs deduct a resource before the subtree runs and fail the node when
//! the caster can't pay, which short-circuits the children.

use crate::core::EntityId;

use super::node::{Behavior, ComponentCategory, EffectContext, EffectNode, Outcome};

/// Deducts mana from the caster.
///
/// Settings: `cost` (formula or level-scaled number, default 1). Fails when
/// the caster can't afford it; nothing is deducted in that case.
pub struct ManaCost;

impl Behavior for ManaCost {
    fn key(&self) -> &'static str {
        "mana"
    }

    fn category(&self) -> ComponentCategory {
        ComponentCategory::Cost
    }

    fn apply(
        &self,
        ctx: &mut EffectContext<'_>,
        node: &EffectNode,
        caster: EntityId,
        level: i32,
        _targets: &[EntityId],
    ) -> Outcome {
        let cost = ctx.value(node.settings(), "cost", caster, level, 1.0);
        if cost <= 0.0 || ctx.world.spend_mana(caster, cost) {
            Outcome::Pass
        } else {
            Outcome::Fail
        }
    }
}
