//! Built-in filter components.
//!
//! Filters are predicates over the inbound target list: the node passes
//! only when every target satisfies the predicate, and never alters the
//! list itself. Use a target component to recompute the list.

use crate::core::EntityId;

use super::node::{Behavior, ComponentCategory, EffectContext, EffectNode, Outcome};

fn all_targets(targets: &[EntityId], mut pred: impl FnMut(EntityId) -> bool) -> Outcome {
    if !targets.is_empty() && targets.iter().all(|&t| pred(t)) {
        Outcome::Pass
    } else {
        Outcome::Fail
    }
}

/// Requires every target to be a given kind of entity.
///
/// Settings: `type` = `player` | `mob` | `any` (default `any`).
pub struct EntityTypeFilter;

impl Behavior for EntityTypeFilter {
    fn key(&self) -> &'static str {
        "entity_type"
    }

    fn category(&self) -> ComponentCategory {
        ComponentCategory::Filter
    }

    fn apply(
        &self,
        ctx: &mut EffectContext<'_>,
        node: &EffectNode,
        _caster: EntityId,
        _level: i32,
        targets: &[EntityId],
    ) -> Outcome {
        let wanted = node.settings().text("type", "any").to_ascii_lowercase();
        all_targets(targets, |t| match wanted.as_str() {
            "player" => ctx.world.is_player(t),
            "mob" => !ctx.world.is_player(t),
            _ => true,
        })
    }
}

/// Requires every target to stand in a given relation to the caster.
///
/// Settings: `group` = `ally` | `enemy` | `any` (default `any`).
pub struct GroupFilter;

impl Behavior for GroupFilter {
    fn key(&self) -> &'static str {
        "group"
    }

    fn category(&self) -> ComponentCategory {
        ComponentCategory::Filter
    }

    fn apply(
        &self,
        ctx: &mut EffectContext<'_>,
        node: &EffectNode,
        caster: EntityId,
        _level: i32,
        targets: &[EntityId],
    ) -> Outcome {
        let wanted = node.settings().text("group", "any").to_ascii_lowercase();
        all_targets(targets, |t| match wanted.as_str() {
            "ally" => t == caster || ctx.world.in_same_group(caster, t),
            "enemy" => ctx.world.is_hostile(caster, t),
            _ => true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Settings, SkillRng};
    use crate::host::{SimEntity, SimWorld};
    use crate::skills::CastData;

    fn run(node: &EffectNode, world: &mut SimWorld, caster: EntityId, targets: &[EntityId]) -> bool {
        let mut data = CastData::default();
        let mut rng = SkillRng::new(7);
        let mut ctx = EffectContext {
            world,
            data: &mut data,
            rng: &mut rng,
        };
        node.execute(&mut ctx, caster, 1, targets)
    }

    #[test]
    fn test_entity_type_filter() {
        let mut world = SimWorld::new();
        let caster = world.spawn(SimEntity::default().as_player());
        let player = world.spawn(SimEntity::default().as_player());
        let mob = world.spawn(SimEntity::default());

        let players_only = EffectNode::new(Box::new(EntityTypeFilter))
            .with_settings(Settings::new().with("type", "player"));

        assert!(run(&players_only, &mut world, caster, &[player]));
        assert!(!run(&players_only, &mut world, caster, &[player, mob]));
    }

    #[test]
    fn test_group_filter() {
        let mut world = SimWorld::new();
        let caster = world.spawn(SimEntity::default().with_group("red"));
        let ally = world.spawn(SimEntity::default().with_group("red"));
        let enemy = world.spawn(SimEntity::default().with_group("blue"));

        let allies = EffectNode::new(Box::new(GroupFilter))
            .with_settings(Settings::new().with("group", "ally"));
        let enemies = EffectNode::new(Box::new(GroupFilter))
            .with_settings(Settings::new().with("group", "enemy"));

        assert!(run(&allies, &mut world, caster, &[ally, caster]));
        assert!(!run(&allies, &mut world, caster, &[ally, enemy]));
        assert!(run(&enemies, &mut world, caster, &[enemy]));
        assert!(!run(&enemies, &mut world, caster, &[ally]));
    }

    #[test]
    fn test_empty_target_list_fails() {
        let mut world = SimWorld::new();
        let caster = world.spawn(SimEntity::default());

        let any = EffectNode::new(Box::new(GroupFilter));
        assert!(!run(&any, &mut world, caster, &[]));
    }
}
