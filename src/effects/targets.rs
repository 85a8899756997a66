//! Built-in target components.
//!
//! Target components compute a brand-new target list from the world and
//! replace the inbound list for their subtree. All shapes share one set of
//! filter settings:
//!
//! - `group`: `ally` | `enemy` | `any` (default `any`)
//! - `type`: `player` | `mob` | `any` (default `any`)
//! - `caster`: include the caster in the result (default false)
//! - `wall`: allow targets without line of sight (default false)
//! - `random`: shuffle the result order (default false)
//! - `max_targets` (level-scaled, default 99)
//!
//! Shape dimensions (`range`, `radius`, `angle`, `width`) are level-scaled.

use crate::core::{EntityId, Settings, Vec3};

use super::node::{Behavior, ComponentCategory, EffectContext, EffectNode, Outcome, TargetList};

/// Group relation a target must hold toward the caster.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum GroupRelation {
    Any,
    Ally,
    Enemy,
}

/// Entity kind a target must be.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EntityKind {
    Any,
    Player,
    Mob,
}

/// Shared target-filter settings, resolved once per execution.
struct TargetProps {
    group: GroupRelation,
    kind: EntityKind,
    include_caster: bool,
    through_wall: bool,
    random: bool,
    max_targets: usize,
}

impl TargetProps {
    fn from_settings(settings: &Settings, level: i32) -> Self {
        let group = match settings.text("group", "any").to_ascii_lowercase().as_str() {
            "ally" => GroupRelation::Ally,
            "enemy" => GroupRelation::Enemy,
            _ => GroupRelation::Any,
        };
        let kind = match settings.text("type", "any").to_ascii_lowercase().as_str() {
            "player" => EntityKind::Player,
            "mob" => EntityKind::Mob,
            _ => EntityKind::Any,
        };
        Self {
            group,
            kind,
            include_caster: settings.bool("caster", false),
            through_wall: settings.bool("wall", false),
            random: settings.bool("random", false),
            max_targets: settings.scaled("max_targets", level, 99.0).max(0.0) as usize,
        }
    }

    fn admits(&self, ctx: &EffectContext<'_>, caster: EntityId, target: EntityId) -> bool {
        if !ctx.world.is_living(target) {
            return false;
        }
        let group_ok = match self.group {
            GroupRelation::Any => true,
            GroupRelation::Ally => ctx.world.in_same_group(caster, target),
            GroupRelation::Enemy => ctx.world.is_hostile(caster, target),
        };
        let kind_ok = match self.kind {
            EntityKind::Any => true,
            EntityKind::Player => ctx.world.is_player(target),
            EntityKind::Mob => !ctx.world.is_player(target),
        };
        group_ok
            && kind_ok
            && (self.through_wall || ctx.world.has_line_of_sight(caster, target))
    }
}

/// Gather candidates around the caster filtered by the shared props and a
/// shape predicate, then apply caster-inclusion, ordering, and the bound.
fn select(
    ctx: &mut EffectContext<'_>,
    caster: EntityId,
    props: &TargetProps,
    search_radius: f64,
    mut shape: impl FnMut(&EffectContext<'_>, Vec3, Vec3) -> bool,
) -> Outcome {
    let Some(origin) = ctx.world.position(caster) else {
        return Outcome::Targets(TargetList::new());
    };
    let facing = ctx.world.facing(caster);

    let mut found = TargetList::new();
    for candidate in ctx.world.entities_near(origin, search_radius) {
        if candidate == caster {
            continue;
        }
        let Some(pos) = ctx.world.position(candidate) else {
            continue;
        };
        if props.admits(ctx, caster, candidate) && shape(ctx, pos, facing) {
            found.push(candidate);
        }
    }

    if props.include_caster {
        found.insert(0, caster);
    }
    if props.random {
        ctx.rng.shuffle(&mut found);
    }
    found.truncate(props.max_targets);
    Outcome::Targets(found)
}

/// Targets the caster alone.
pub struct SelfTarget;

impl Behavior for SelfTarget {
    fn key(&self) -> &'static str {
        "self"
    }

    fn category(&self) -> ComponentCategory {
        ComponentCategory::Target
    }

    fn apply(
        &self,
        _ctx: &mut EffectContext<'_>,
        _node: &EffectNode,
        caster: EntityId,
        _level: i32,
        _targets: &[EntityId],
    ) -> Outcome {
        let mut list = TargetList::new();
        list.push(caster);
        Outcome::Targets(list)
    }
}

/// Targets the one entity the caster is looking at.
///
/// Settings: `range` (default 5), `tolerance` (degrees off the facing line
/// accepted, default 30). Picks the closest admitted entity inside the
/// tolerance cone.
pub struct SingleTarget;

impl Behavior for SingleTarget {
    fn key(&self) -> &'static str {
        "single"
    }

    fn category(&self) -> ComponentCategory {
        ComponentCategory::Target
    }

    fn apply(
        &self,
        ctx: &mut EffectContext<'_>,
        node: &EffectNode,
        caster: EntityId,
        level: i32,
        _targets: &[EntityId],
    ) -> Outcome {
        let range = node.settings().scaled("range", level, 5.0);
        let tolerance = node.settings().scaled("tolerance", level, 30.0);
        let mut props = TargetProps::from_settings(node.settings(), level);
        props.max_targets = props.max_targets.min(1);
        // The caster never counts toward "what they're looking at".
        props.include_caster = false;

        let Some(origin) = ctx.world.position(caster) else {
            return Outcome::Targets(TargetList::new());
        };
        let facing = ctx.world.facing(caster);

        let mut best: Option<(f64, EntityId)> = None;
        for candidate in ctx.world.entities_near(origin, range) {
            if candidate == caster {
                continue;
            }
            let Some(pos) = ctx.world.position(candidate) else {
                continue;
            };
            if !props.admits(ctx, caster, candidate) {
                continue;
            }
            let offset = pos.sub(origin);
            if facing.angle_degrees(offset) > tolerance {
                continue;
            }
            let dist = offset.length_squared();
            if best.is_none_or(|(d, _)| dist < d) {
                best = Some((dist, candidate));
            }
        }

        let mut list = TargetList::new();
        if let Some((_, target)) = best {
            list.push(target);
        }
        Outcome::Targets(list)
    }
}

/// Targets everything inside a cone along the caster's facing.
///
/// Settings: `range` (default 5), `angle` (full cone angle in degrees,
/// default 90).
pub struct ConeTarget;

impl Behavior for ConeTarget {
    fn key(&self) -> &'static str {
        "cone"
    }

    fn category(&self) -> ComponentCategory {
        ComponentCategory::Target
    }

    fn apply(
        &self,
        ctx: &mut EffectContext<'_>,
        node: &EffectNode,
        caster: EntityId,
        level: i32,
        _targets: &[EntityId],
    ) -> Outcome {
        let range = node.settings().scaled("range", level, 5.0);
        let half_angle = node.settings().scaled("angle", level, 90.0) / 2.0;
        let props = TargetProps::from_settings(node.settings(), level);
        let origin = match ctx.world.position(caster) {
            Some(p) => p,
            None => return Outcome::Targets(TargetList::new()),
        };

        select(ctx, caster, &props, range, |_, pos, facing| {
            facing.angle_degrees(pos.sub(origin)) <= half_angle
        })
    }
}

/// Targets everything inside a sphere around the caster.
///
/// Settings: `radius` (default 3).
pub struct SphereTarget;

impl Behavior for SphereTarget {
    fn key(&self) -> &'static str {
        "sphere"
    }

    fn category(&self) -> ComponentCategory {
        ComponentCategory::Target
    }

    fn apply(
        &self,
        ctx: &mut EffectContext<'_>,
        node: &EffectNode,
        caster: EntityId,
        level: i32,
        _targets: &[EntityId],
    ) -> Outcome {
        let radius = node.settings().scaled("radius", level, 3.0);
        let props = TargetProps::from_settings(node.settings(), level);
        // entities_near is already the sphere test.
        select(ctx, caster, &props, radius, |_, _, _| true)
    }
}

/// Targets everything within a horizontal radius, ignoring height.
///
/// Settings: `radius` (default 5).
pub struct AreaTarget;

impl Behavior for AreaTarget {
    fn key(&self) -> &'static str {
        "area"
    }

    fn category(&self) -> ComponentCategory {
        ComponentCategory::Target
    }

    fn apply(
        &self,
        ctx: &mut EffectContext<'_>,
        node: &EffectNode,
        caster: EntityId,
        level: i32,
        _targets: &[EntityId],
    ) -> Outcome {
        let radius = node.settings().scaled("radius", level, 5.0);
        let props = TargetProps::from_settings(node.settings(), level);
        let origin = match ctx.world.position(caster) {
            Some(p) => p,
            None => return Outcome::Targets(TargetList::new()),
        };

        // Over-search vertically, then test in the horizontal plane.
        let search = radius.hypot(256.0);
        select(ctx, caster, &props, search, |_, pos, _| {
            pos.horizontal().distance(origin.horizontal()) <= radius
        })
    }
}

/// Targets everything inside a corridor along the caster's facing.
///
/// Settings: `range` (default 10), `width` (default 2).
pub struct LineTarget;

impl Behavior for LineTarget {
    fn key(&self) -> &'static str {
        "line"
    }

    fn category(&self) -> ComponentCategory {
        ComponentCategory::Target
    }

    fn apply(
        &self,
        ctx: &mut EffectContext<'_>,
        node: &EffectNode,
        caster: EntityId,
        level: i32,
        _targets: &[EntityId],
    ) -> Outcome {
        let range = node.settings().scaled("range", level, 10.0);
        let half_width = node.settings().scaled("width", level, 2.0) / 2.0;
        let props = TargetProps::from_settings(node.settings(), level);
        let origin = match ctx.world.position(caster) {
            Some(p) => p,
            None => return Outcome::Targets(TargetList::new()),
        };

        select(ctx, caster, &props, range, |_, pos, facing| {
            let offset = pos.sub(origin);
            let along = offset.dot(facing.normalized());
            if along < 0.0 || along > range {
                return false;
            }
            let perp_sq = offset.length_squared() - along * along;
            perp_sq.max(0.0).sqrt() <= half_width
        })
    }
}

/// Targets the nearest hostile entity.
///
/// Settings: `range` (default 8). Hostility is forced regardless of the
/// `group` setting.
pub struct NearestTarget;

impl Behavior for NearestTarget {
    fn key(&self) -> &'static str {
        "nearest"
    }

    fn category(&self) -> ComponentCategory {
        ComponentCategory::Target
    }

    fn apply(
        &self,
        ctx: &mut EffectContext<'_>,
        node: &EffectNode,
        caster: EntityId,
        level: i32,
        _targets: &[EntityId],
    ) -> Outcome {
        let range = node.settings().scaled("range", level, 8.0);
        let mut props = TargetProps::from_settings(node.settings(), level);
        props.group = GroupRelation::Enemy;
        props.include_caster = false;

        let Some(origin) = ctx.world.position(caster) else {
            return Outcome::Targets(TargetList::new());
        };

        let mut best: Option<(f64, EntityId)> = None;
        for candidate in ctx.world.entities_near(origin, range) {
            if candidate == caster {
                continue;
            }
            let Some(pos) = ctx.world.position(candidate) else {
                continue;
            };
            if !props.admits(ctx, caster, candidate) {
                continue;
            }
            let dist = pos.distance_squared(origin);
            if best.is_none_or(|(d, _)| dist < d) {
                best = Some((dist, candidate));
            }
        }

        let mut list = TargetList::new();
        if let Some((_, target)) = best {
            list.push(target);
        }
        Outcome::Targets(list)
    }
}

/// Targets everything inside a horizontal slice along the caster's facing.
///
/// Like a cone but evaluated purely in the horizontal plane, so height never
/// excludes a target. Settings: `range` (default 5), `angle` (default 90).
pub struct SectorTarget;

impl Behavior for SectorTarget {
    fn key(&self) -> &'static str {
        "sector"
    }

    fn category(&self) -> ComponentCategory {
        ComponentCategory::Target
    }

    fn apply(
        &self,
        ctx: &mut EffectContext<'_>,
        node: &EffectNode,
        caster: EntityId,
        level: i32,
        _targets: &[EntityId],
    ) -> Outcome {
        let range = node.settings().scaled("range", level, 5.0);
        let half_angle = node.settings().scaled("angle", level, 90.0) / 2.0;
        let props = TargetProps::from_settings(node.settings(), level);
        let origin = match ctx.world.position(caster) {
            Some(p) => p,
            None => return Outcome::Targets(TargetList::new()),
        };

        let search = range.hypot(256.0);
        select(ctx, caster, &props, search, |_, pos, facing| {
            let flat = pos.horizontal().sub(origin.horizontal());
            flat.length() <= range && facing.horizontal().angle_degrees(flat) <= half_angle
        })
    }
}
