//! The effect node tree.
//!
//! A skill's behavior is a strict tree of heterogeneous nodes. Each node
//! pairs a [`Behavior`] (what it checks or does) with settings and children;
//! the tree structure encodes composition: children run only when their
//! parent succeeded, and target nodes replace the target list their subtree
//! sees.
//!
//! ## Execution semantics by category
//!
//! - **Condition / Filter / Cost / Cooldown**: the behavior is a predicate
//!   or gated side effect. On failure the node returns false and children
//!   never run. On success children run with the same targets and the
//!   node's result is its own success AND the children's aggregate.
//! - **Mechanic**: performs the gameplay effect, runs children, and reports
//!   whether its own effect ran.
//! - **Target**: computes a fresh target list from the world and forwards
//!   it to children; an empty list fails the node outright.
//!
//! The children's aggregate is true when any child succeeded (or when there
//! are none).

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;
use tracing::warn;

use crate::core::{EntityId, SettingValue, Settings, SkillId, SkillRng};
use crate::formula::{evaluate_safe, VariableContext};
use crate::host::{World, WorldStatSource};
use crate::skills::CastData;

/// The six component categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentCategory {
    Condition,
    Filter,
    Mechanic,
    Target,
    Cost,
    Cooldown,
}

impl ComponentCategory {
    /// Lowercase name, as used in definitions and error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ComponentCategory::Condition => "condition",
            ComponentCategory::Filter => "filter",
            ComponentCategory::Mechanic => "mechanic",
            ComponentCategory::Target => "target",
            ComponentCategory::Cost => "cost",
            ComponentCategory::Cooldown => "cooldown",
        }
    }
}

impl std::fmt::Display for ComponentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Target list threaded through one execution.
///
/// Most casts touch a handful of entities; keep them inline.
pub type TargetList = SmallVec<[EntityId; 4]>;

/// Result of one behavior application.
pub enum Outcome {
    /// Predicate passed or effect ran; children proceed with the same list.
    Pass,
    /// Predicate failed; short-circuit.
    Fail,
    /// A target behavior computed a replacement list.
    Targets(TargetList),
}

/// Cleanup failure from one behavior.
///
/// Only ever logged; cleanup never propagates errors.
#[derive(Debug, Error)]
#[error("cleanup failed in `{component}`: {message}")]
pub struct CleanupError {
    pub component: String,
    pub message: String,
}

/// Everything a behavior can touch while executing.
pub struct EffectContext<'a> {
    /// The host world.
    pub world: &'a mut dyn World,
    /// The caster's scratch values extracted from the triggering event.
    pub data: &'a mut CastData,
    /// Shared RNG for chance rolls and random ordering.
    pub rng: &'a mut SkillRng,
}

impl EffectContext<'_> {
    /// Resolve a numeric setting for a caster.
    ///
    /// A text setting is treated as a formula and evaluated against the
    /// caster's stats, `Lv` = skill level, and the cast-data scratch values;
    /// evaluation failures log and yield the default. A numeric setting is
    /// level-scaled via `<key>` / `<key>_per_level`.
    #[must_use]
    pub fn value(
        &self,
        settings: &Settings,
        key: &str,
        caster: EntityId,
        level: i32,
        default: f64,
    ) -> f64 {
        match settings.get(key) {
            Some(SettingValue::Text(expr)) => {
                let source = WorldStatSource::new(&*self.world, caster, level);
                let mut ctx = VariableContext::with_source(&source);
                ctx.extend(self.data.iter().map(|(k, &v)| (k.clone(), v)));
                evaluate_safe(expr, &ctx, default)
            }
            _ => settings.scaled(key, level, default),
        }
    }
}

/// One unit of skill behavior.
///
/// Implementations are stateless: all per-node configuration lives in the
/// node's settings, all per-cast state in the [`EffectContext`].
pub trait Behavior {
    /// The component's string key ("damage", "sphere", ...).
    fn key(&self) -> &'static str;

    /// Which category the component belongs to.
    fn category(&self) -> ComponentCategory;

    /// Apply the behavior for one execution step.
    fn apply(
        &self,
        ctx: &mut EffectContext<'_>,
        node: &EffectNode,
        caster: EntityId,
        level: i32,
        targets: &[EntityId],
    ) -> Outcome;

    /// Undo any lingering state when the owning skill deactivates.
    ///
    /// Most behaviors have nothing to undo.
    fn clean_up(
        &self,
        _ctx: &mut EffectContext<'_>,
        _node: &EffectNode,
        _caster: EntityId,
    ) -> Result<(), CleanupError> {
        Ok(())
    }
}

/// A node in a skill's effect tree.
///
/// Owns its children exclusively; trees are strict (no cycles, no sharing).
/// The owning skill's ID is bound once after construction and propagates to
/// children as they are added.
pub struct EffectNode {
    key: String,
    category: ComponentCategory,
    settings: Settings,
    children: Vec<EffectNode>,
    skill: Option<SkillId>,
    behavior: Box<dyn Behavior>,
}

impl EffectNode {
    /// Wrap a behavior in a node with empty settings.
    #[must_use]
    pub fn new(behavior: Box<dyn Behavior>) -> Self {
        Self {
            key: behavior.key().to_string(),
            category: behavior.category(),
            settings: Settings::new(),
            children: Vec::new(),
            skill: None,
            behavior,
        }
    }

    /// Set the settings map (builder pattern, used by loaders and tests).
    #[must_use]
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Add a child (builder pattern).
    #[must_use]
    pub fn with_child(mut self, child: EffectNode) -> Self {
        self.add_child(child);
        self
    }

    /// The component key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The component category.
    #[must_use]
    pub fn category(&self) -> ComponentCategory {
        self.category
    }

    /// The settings map.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Mutable settings, for loader-side population.
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Child nodes, in execution order.
    #[must_use]
    pub fn children(&self) -> &[EffectNode] {
        &self.children
    }

    /// The owning skill, once bound.
    #[must_use]
    pub fn skill(&self) -> Option<SkillId> {
        self.skill
    }

    /// Append a child, inheriting this node's skill binding.
    pub fn add_child(&mut self, mut child: EffectNode) {
        if let Some(skill) = self.skill {
            child.bind_skill(skill);
        }
        self.children.push(child);
    }

    /// Bind the owning skill, recursively. Set once at construction.
    pub fn bind_skill(&mut self, skill: SkillId) {
        self.skill = Some(skill);
        for child in &mut self.children {
            child.bind_skill(skill);
        }
    }

    /// Execute this subtree against a target list.
    ///
    /// Returns false when a prerequisite failed or a target behavior found
    /// no matching entities.
    pub fn execute(
        &self,
        ctx: &mut EffectContext<'_>,
        caster: EntityId,
        level: i32,
        targets: &[EntityId],
    ) -> bool {
        match self.behavior.apply(ctx, self, caster, level, targets) {
            Outcome::Fail => false,
            Outcome::Pass => {
                let children_worked = self.execute_children(ctx, caster, level, targets);
                // Mechanics report their own effect; predicates AND in the
                // children's aggregate.
                match self.category {
                    ComponentCategory::Mechanic => true,
                    _ => children_worked,
                }
            }
            Outcome::Targets(list) => {
                if list.is_empty() {
                    return false;
                }
                self.execute_children(ctx, caster, level, &list)
            }
        }
    }

    fn execute_children(
        &self,
        ctx: &mut EffectContext<'_>,
        caster: EntityId,
        level: i32,
        targets: &[EntityId],
    ) -> bool {
        if self.children.is_empty() {
            return true;
        }
        let mut worked = false;
        for child in &self.children {
            worked |= child.execute(ctx, caster, level, targets);
        }
        worked
    }

    /// Release any lingering state for a caster, depth-first.
    ///
    /// Never fails: behavior cleanup errors are logged and swallowed so
    /// every sibling still gets cleaned up.
    pub fn clean_up(&self, ctx: &mut EffectContext<'_>, caster: EntityId) {
        if let Err(err) = self.behavior.clean_up(ctx, self, caster) {
            warn!(component = self.key, %caster, %err, "cleanup failure swallowed");
        }
        for child in &self.children {
            child.clean_up(ctx, caster);
        }
    }
}

impl std::fmt::Debug for EffectNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectNode")
            .field("key", &self.key)
            .field("category", &self.category)
            .field("settings", &self.settings)
            .field("children", &self.children)
            .field("skill", &self.skill)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::SimWorld;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Mechanic that counts its executions.
    struct SpyMechanic {
        calls: Rc<Cell<usize>>,
    }

    impl Behavior for SpyMechanic {
        fn key(&self) -> &'static str {
            "spy"
        }

        fn category(&self) -> ComponentCategory {
            ComponentCategory::Mechanic
        }

        fn apply(
            &self,
            _ctx: &mut EffectContext<'_>,
            _node: &EffectNode,
            _caster: EntityId,
            _level: i32,
            _targets: &[EntityId],
        ) -> Outcome {
            self.calls.set(self.calls.get() + 1);
            Outcome::Pass
        }
    }

    /// Condition with a fixed verdict.
    struct FixedCondition {
        pass: bool,
    }

    impl Behavior for FixedCondition {
        fn key(&self) -> &'static str {
            "fixed"
        }

        fn category(&self) -> ComponentCategory {
            ComponentCategory::Condition
        }

        fn apply(
            &self,
            _ctx: &mut EffectContext<'_>,
            _node: &EffectNode,
            _caster: EntityId,
            _level: i32,
            _targets: &[EntityId],
        ) -> Outcome {
            if self.pass {
                Outcome::Pass
            } else {
                Outcome::Fail
            }
        }
    }

    /// Cleanup that always fails, to prove siblings still run.
    struct FailingCleanup {
        cleaned: Rc<Cell<usize>>,
    }

    impl Behavior for FailingCleanup {
        fn key(&self) -> &'static str {
            "failing"
        }

        fn category(&self) -> ComponentCategory {
            ComponentCategory::Mechanic
        }

        fn apply(
            &self,
            _ctx: &mut EffectContext<'_>,
            _node: &EffectNode,
            _caster: EntityId,
            _level: i32,
            _targets: &[EntityId],
        ) -> Outcome {
            Outcome::Pass
        }

        fn clean_up(
            &self,
            _ctx: &mut EffectContext<'_>,
            _node: &EffectNode,
            _caster: EntityId,
        ) -> Result<(), CleanupError> {
            self.cleaned.set(self.cleaned.get() + 1);
            Err(CleanupError {
                component: "failing".to_string(),
                message: "nothing to release".to_string(),
            })
        }
    }

    struct CountingCleanup {
        cleaned: Rc<Cell<usize>>,
    }

    impl Behavior for CountingCleanup {
        fn key(&self) -> &'static str {
            "counting"
        }

        fn category(&self) -> ComponentCategory {
            ComponentCategory::Mechanic
        }

        fn apply(
            &self,
            _ctx: &mut EffectContext<'_>,
            _node: &EffectNode,
            _caster: EntityId,
            _level: i32,
            _targets: &[EntityId],
        ) -> Outcome {
            Outcome::Pass
        }

        fn clean_up(
            &self,
            _ctx: &mut EffectContext<'_>,
            _node: &EffectNode,
            _caster: EntityId,
        ) -> Result<(), CleanupError> {
            self.cleaned.set(self.cleaned.get() + 1);
            Ok(())
        }
    }

    #[test]
    fn test_failed_condition_skips_children() {
        let calls = Rc::new(Cell::new(0));
        let mut root = EffectNode::new(Box::new(FixedCondition { pass: false }));
        root.add_child(EffectNode::new(Box::new(SpyMechanic { calls: calls.clone() })));

        let mut world = SimWorld::new();
        let caster = world.spawn(crate::host::SimEntity::default());
        let mut data = CastData::default();
        let mut rng = SkillRng::new(1);
        let mut ctx = EffectContext {
            world: &mut world,
            data: &mut data,
            rng: &mut rng,
        };

        assert!(!root.execute(&mut ctx, caster, 1, &[caster]));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_passed_condition_runs_children() {
        let calls = Rc::new(Cell::new(0));
        let mut root = EffectNode::new(Box::new(FixedCondition { pass: true }));
        root.add_child(EffectNode::new(Box::new(SpyMechanic { calls: calls.clone() })));

        let mut world = SimWorld::new();
        let caster = world.spawn(crate::host::SimEntity::default());
        let mut data = CastData::default();
        let mut rng = SkillRng::new(1);
        let mut ctx = EffectContext {
            world: &mut world,
            data: &mut data,
            rng: &mut rng,
        };

        assert!(root.execute(&mut ctx, caster, 1, &[caster]));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_skill_binding_propagates() {
        let mut root = EffectNode::new(Box::new(FixedCondition { pass: true }));
        root.add_child(EffectNode::new(Box::new(FixedCondition { pass: true })));
        root.bind_skill(SkillId::new(4));

        assert_eq!(root.skill(), Some(SkillId::new(4)));
        assert_eq!(root.children()[0].skill(), Some(SkillId::new(4)));

        // Children added after binding inherit it too.
        root.add_child(EffectNode::new(Box::new(FixedCondition { pass: true })));
        assert_eq!(root.children()[1].skill(), Some(SkillId::new(4)));
    }

    #[test]
    fn test_cleanup_failure_does_not_stop_siblings() {
        let failed = Rc::new(Cell::new(0));
        let counted = Rc::new(Cell::new(0));

        let mut root = EffectNode::new(Box::new(FixedCondition { pass: true }));
        root.add_child(EffectNode::new(Box::new(FailingCleanup {
            cleaned: failed.clone(),
        })));
        root.add_child(EffectNode::new(Box::new(CountingCleanup {
            cleaned: counted.clone(),
        })));

        let mut world = SimWorld::new();
        let caster = world.spawn(crate::host::SimEntity::default());
        let mut data = CastData::default();
        let mut rng = SkillRng::new(1);
        let mut ctx = EffectContext {
            world: &mut world,
            data: &mut data,
            rng: &mut rng,
        };

        root.clean_up(&mut ctx, caster);
        assert_eq!(failed.get(), 1);
        assert_eq!(counted.get(), 1);
    }
}
