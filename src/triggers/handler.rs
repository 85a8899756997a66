//! Trigger handlers.
//!
//! A handler pairs one trigger with one effect tree inside a skill. The
//! manager fans events out to handlers; the handler checks the trigger's
//! predicate, resolves caster and target, stages cast data, and runs the
//! tree.

use std::sync::Arc;

use crate::core::{EntityId, Settings, SkillId, SkillRng};
use crate::effects::{EffectContext, EffectNode};
use crate::host::World;
use crate::skills::SkillRuntime;
use crate::triggers::event::{EventKind, WorldEvent};
use crate::triggers::trigger::Trigger;

/// One trigger bound to one effect tree.
pub struct TriggerHandler {
    skill: SkillId,
    trigger: Arc<dyn Trigger>,
    settings: Settings,
    root: Arc<EffectNode>,
}

impl TriggerHandler {
    /// Binds `root` (and every child) to `skill` and wraps it for
    /// shared dispatch.
    #[must_use]
    pub fn new(
        skill: SkillId,
        trigger: Arc<dyn Trigger>,
        settings: Settings,
        mut root: EffectNode,
    ) -> Self {
        root.bind_skill(skill);
        TriggerHandler {
            skill,
            trigger,
            settings,
            root: Arc::new(root),
        }
    }

    #[must_use]
    pub fn skill(&self) -> SkillId {
        self.skill
    }

    #[must_use]
    pub fn trigger_key(&self) -> &'static str {
        self.trigger.key()
    }

    /// Event kind this handler listens on; `None` for cast-only handlers.
    #[must_use]
    pub fn event_kind(&self) -> Option<EventKind> {
        self.trigger.event_kind()
    }

    #[must_use]
    pub fn root(&self) -> &EffectNode {
        &self.root
    }

    /// The entity whose registration this handler runs under for `event`.
    #[must_use]
    pub fn event_caster(&self, event: &WorldEvent) -> Option<EntityId> {
        self.trigger.caster(event)
    }

    /// Runs the tree for a world event. Returns true when the tree
    /// reported that it worked.
    pub fn handle(
        &self,
        world: &mut dyn World,
        rng: &mut SkillRng,
        event: &WorldEvent,
        skill: &mut SkillRuntime,
        level: i32,
    ) -> bool {
        let Some(caster) = self.trigger.caster(event) else {
            return false;
        };
        if !skill.is_active(caster) {
            return false;
        }
        if !self.trigger.should_trigger(event, level, &self.settings) {
            return false;
        }
        let target = self.trigger.target(event, &self.settings).unwrap_or(caster);

        let data = skill.cast_data_mut(caster);
        self.trigger.extract(event, data);
        let mut ctx = EffectContext { world, data, rng };
        self.root.execute(&mut ctx, caster, level, &[target])
    }

    /// Runs the tree without an event, for manual casts.
    pub fn handle_immediate(
        &self,
        world: &mut dyn World,
        rng: &mut SkillRng,
        skill: &mut SkillRuntime,
        caster: EntityId,
        level: i32,
        target: Option<EntityId>,
    ) -> bool {
        if !skill.is_active(caster) {
            return false;
        }
        let data = skill.cast_data_mut(caster);
        let mut ctx = EffectContext { world, data, rng };
        self.root
            .execute(&mut ctx, caster, level, &[target.unwrap_or(caster)])
    }
}
