//! Trigger manager.
//!
//! Owns the skill runtimes and the per-caster activation table, fans
//! world events out to handlers, and retires registrations whose timed
//! activation has lapsed. One manager per world; construct it explicitly
//! with the clock it should trust.

use std::sync::Arc;
use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::core::{Clock, EntityId, SkillId, SkillRng};
use crate::effects::EffectContext;
use crate::host::World;
use crate::skills::{CastData, SkillRuntime};
use crate::triggers::event::{DamageCause, WorldEvent};
use crate::triggers::handler::TriggerHandler;

/// One caster's activation of one skill.
struct ActiveRegistration {
    level: i32,
    /// `None` means the activation never expires on its own.
    expires_at: Option<Instant>,
    handlers: Vec<Arc<TriggerHandler>>,
}

impl ActiveRegistration {
    fn expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Event fan-out and activation bookkeeping for one world.
pub struct TriggerManager {
    clock: Box<dyn Clock>,
    rng: SkillRng,
    skills: FxHashMap<SkillId, SkillRuntime>,
    active: FxHashMap<EntityId, FxHashMap<SkillId, ActiveRegistration>>,
}

impl TriggerManager {
    /// A manager driven by `clock`, with an entropy-seeded RNG.
    #[must_use]
    pub fn new(clock: impl Clock + 'static) -> Self {
        Self::with_seed(clock, None)
    }

    /// A manager with a fixed RNG seed, for reproducible runs.
    #[must_use]
    pub fn with_seed(clock: impl Clock + 'static, seed: Option<u64>) -> Self {
        TriggerManager {
            clock: Box::new(clock),
            rng: match seed {
                Some(seed) => SkillRng::new(seed),
                None => SkillRng::from_entropy(),
            },
            skills: FxHashMap::default(),
            active: FxHashMap::default(),
        }
    }

    /// Registers a skill runtime; replaces any previous skill with the
    /// same ID.
    pub fn register_skill(&mut self, skill: SkillRuntime) {
        self.skills.insert(skill.id(), skill);
    }

    #[must_use]
    pub fn skill(&self, id: SkillId) -> Option<&SkillRuntime> {
        self.skills.get(&id)
    }

    /// Whether a non-expired activation exists for the pair.
    #[must_use]
    pub fn is_active(&self, skill: SkillId, caster: EntityId) -> bool {
        let now = self.clock.now();
        self.active
            .get(&caster)
            .and_then(|regs| regs.get(&skill))
            .is_some_and(|reg| !reg.expired(now))
    }

    /// Number of live registrations for a caster, expired ones included
    /// until the next sweep.
    #[must_use]
    pub fn registration_count(&self, caster: EntityId) -> usize {
        self.active.get(&caster).map_or(0, |regs| regs.len())
    }

    /// Activates a skill for a caster.
    ///
    /// A zero `duration` means the activation persists until explicitly
    /// deactivated. Re-activating an already active pair deactivates the
    /// old registration (cleanup included) before installing the new one.
    /// Expired registrations for the same caster are swept first.
    pub fn activate_skill(
        &mut self,
        world: &mut dyn World,
        skill_id: SkillId,
        caster: EntityId,
        level: i32,
        duration: Duration,
        handlers: Vec<Arc<TriggerHandler>>,
    ) {
        self.sweep_caster(world, caster);
        if self
            .active
            .get(&caster)
            .is_some_and(|regs| regs.contains_key(&skill_id))
        {
            self.deactivate_skill(world, skill_id, caster);
        }

        let expires_at = (!duration.is_zero()).then(|| self.clock.now() + duration);
        debug!(%skill_id, %caster, level, ?expires_at, "skill activated");
        self.active.entry(caster).or_default().insert(
            skill_id,
            ActiveRegistration {
                level,
                expires_at,
                handlers,
            },
        );
        if let Some(skill) = self.skills.get_mut(&skill_id) {
            skill.set_active(caster);
        }
    }

    /// Deactivates a skill for a caster, running handler cleanup and
    /// dropping the caster's cast data. Idempotent.
    pub fn deactivate_skill(&mut self, world: &mut dyn World, skill_id: SkillId, caster: EntityId) {
        let Some(regs) = self.active.get_mut(&caster) else {
            return;
        };
        let Some(reg) = regs.remove(&skill_id) else {
            return;
        };
        if regs.is_empty() {
            self.active.remove(&caster);
        }
        debug!(%skill_id, %caster, "skill deactivated");

        match self.skills.get_mut(&skill_id) {
            Some(skill) => {
                for handler in &reg.handlers {
                    let mut ctx = EffectContext {
                        world: &mut *world,
                        data: skill.cast_data_mut(caster),
                        rng: &mut self.rng,
                    };
                    handler.root().clean_up(&mut ctx, caster);
                }
                skill.set_inactive(caster);
            }
            None => {
                // Activation outlived its skill registration; clean up
                // with throwaway cast data.
                warn!(%skill_id, %caster, "deactivating unregistered skill");
                let mut data = CastData::default();
                for handler in &reg.handlers {
                    let mut ctx = EffectContext {
                        world: &mut *world,
                        data: &mut data,
                        rng: &mut self.rng,
                    };
                    handler.root().clean_up(&mut ctx, caster);
                }
            }
        }
    }

    /// Retires every expired registration, running cleanup for each.
    pub fn sweep_expired(&mut self, world: &mut dyn World) {
        let casters: Vec<EntityId> = self.active.keys().copied().collect();
        for caster in casters {
            self.sweep_caster(world, caster);
        }
    }

    fn sweep_caster(&mut self, world: &mut dyn World, caster: EntityId) {
        let now = self.clock.now();
        let expired: Vec<SkillId> = self
            .active
            .get(&caster)
            .map(|regs| {
                regs.iter()
                    .filter(|(_, reg)| reg.expired(now))
                    .map(|(&id, _)| id)
                    .collect()
            })
            .unwrap_or_default();
        for skill_id in expired {
            debug!(%skill_id, %caster, "activation expired");
            self.deactivate_skill(world, skill_id, caster);
        }
    }

    // === Event dispatch ===

    /// A sneak toggle by `entity`.
    pub fn dispatch_crouch(&mut self, world: &mut dyn World, entity: EntityId, started: bool) {
        self.dispatch(world, &WorldEvent::CrouchToggle { entity, started });
    }

    /// A death, reaching the victim's death skills and the killer's kill
    /// skills.
    pub fn dispatch_death(
        &mut self,
        world: &mut dyn World,
        victim: EntityId,
        killer: Option<EntityId>,
    ) {
        self.dispatch(world, &WorldEvent::Death { victim, killer });
    }

    /// Entity-on-entity physical damage, reaching both sides.
    pub fn dispatch_physical(
        &mut self,
        world: &mut dyn World,
        damager: EntityId,
        victim: EntityId,
        damage: f64,
        projectile: bool,
    ) {
        self.dispatch(
            world,
            &WorldEvent::PhysicalDamage {
                damager,
                victim,
                damage,
                projectile,
            },
        );
    }

    /// Generic damage with a cause, reaching the victim's land and
    /// environmental skills.
    pub fn dispatch_damage(
        &mut self,
        world: &mut dyn World,
        victim: EntityId,
        cause: DamageCause,
        damage: f64,
    ) {
        self.dispatch(
            world,
            &WorldEvent::Damage {
                victim,
                cause,
                damage,
            },
        );
    }

    /// A projectile launch; `shooter` is set only for living shooters.
    pub fn dispatch_launch(
        &mut self,
        world: &mut dyn World,
        projectile: EntityId,
        shooter: Option<EntityId>,
    ) {
        self.dispatch(world, &WorldEvent::ProjectileLaunch { projectile, shooter });
    }

    /// Routes an event to the handlers of every entity it implicates.
    pub fn dispatch(&mut self, world: &mut dyn World, event: &WorldEvent) {
        match event {
            WorldEvent::CrouchToggle { entity, .. } => {
                self.dispatch_to(world, event, *entity);
            }
            WorldEvent::Death { victim, killer } => {
                self.dispatch_to(world, event, *victim);
                if let Some(killer) = killer {
                    if killer != victim {
                        self.dispatch_to(world, event, *killer);
                    }
                }
            }
            WorldEvent::PhysicalDamage { damager, victim, .. } => {
                self.dispatch_to(world, event, *damager);
                if damager != victim {
                    self.dispatch_to(world, event, *victim);
                }
            }
            WorldEvent::Damage { victim, .. } => {
                self.dispatch_to(world, event, *victim);
            }
            WorldEvent::ProjectileLaunch { shooter, .. } => {
                if let Some(shooter) = shooter {
                    self.dispatch_to(world, event, *shooter);
                }
            }
        }
    }

    /// Runs every non-expired handler of `entity` that listens on the
    /// event's kind and resolves its caster to `entity`. The caster check
    /// keeps multi-entity events (death, physical damage) from running a
    /// handler through the other party's registration. Expired
    /// registrations are skipped here and removed by the next sweep.
    fn dispatch_to(&mut self, world: &mut dyn World, event: &WorldEvent, entity: EntityId) {
        let now = self.clock.now();
        let kind = event.kind();
        let matches: Vec<(SkillId, i32, Arc<TriggerHandler>)> = self
            .active
            .get(&entity)
            .map(|regs| {
                regs.iter()
                    .filter(|(_, reg)| !reg.expired(now))
                    .flat_map(|(&skill_id, reg)| {
                        reg.handlers
                            .iter()
                            .filter(|handler| {
                                handler.event_kind() == Some(kind)
                                    && handler.event_caster(event) == Some(entity)
                            })
                            .map(move |handler| (skill_id, reg.level, Arc::clone(handler)))
                    })
                    .collect()
            })
            .unwrap_or_default();

        for (skill_id, level, handler) in matches {
            let Some(skill) = self.skills.get_mut(&skill_id) else {
                continue;
            };
            handler.handle(world, &mut self.rng, event, skill, level);
        }
    }

    /// Runs a skill's cast-only handlers for a caster.
    ///
    /// Returns true when any handler's tree worked. Inactive or expired
    /// pairs cast nothing.
    pub fn cast(
        &mut self,
        world: &mut dyn World,
        skill_id: SkillId,
        caster: EntityId,
        target: Option<EntityId>,
    ) -> bool {
        let now = self.clock.now();
        let Some(reg) = self
            .active
            .get(&caster)
            .and_then(|regs| regs.get(&skill_id))
        else {
            return false;
        };
        if reg.expired(now) {
            return false;
        }
        let level = reg.level;
        let handlers: Vec<Arc<TriggerHandler>> = reg
            .handlers
            .iter()
            .filter(|handler| handler.event_kind().is_none())
            .cloned()
            .collect();

        let mut worked = false;
        for handler in handlers {
            let Some(skill) = self.skills.get_mut(&skill_id) else {
                break;
            };
            worked |= handler.handle_immediate(world, &mut self.rng, skill, caster, level, target);
        }
        worked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ManualClock, Settings};
    use crate::effects::ComponentRegistry;
    use crate::host::{SimEntity, SimWorld};
    use crate::triggers::trigger::CrouchTrigger;

    fn crouch_handler(skill: SkillId) -> Arc<TriggerHandler> {
        let node = ComponentRegistry::with_defaults()
            .create_mechanic("damage")
            .unwrap()
            .with_settings(Settings::new().with("value", 1.0));
        Arc::new(TriggerHandler::new(
            skill,
            Arc::new(CrouchTrigger),
            Settings::new(),
            node,
        ))
    }

    #[test]
    fn test_dispatch_respects_activation() {
        let clock = ManualClock::new();
        let mut manager = TriggerManager::with_seed(clock, Some(11));
        let mut world = SimWorld::new();
        let caster = world.spawn(SimEntity::default());
        let skill_id = SkillId::new(1);
        manager.register_skill(SkillRuntime::new(skill_id, "spark"));

        let event = WorldEvent::CrouchToggle {
            entity: caster,
            started: true,
        };
        manager.dispatch(&mut world, &event);
        assert!(world.damage_log.is_empty());

        manager.activate_skill(
            &mut world,
            skill_id,
            caster,
            1,
            Duration::ZERO,
            vec![crouch_handler(skill_id)],
        );
        manager.dispatch(&mut world, &event);
        assert_eq!(world.damage_log.len(), 1);
    }

    #[test]
    fn test_expired_registration_stops_firing() {
        let clock = ManualClock::new();
        let mut manager = TriggerManager::with_seed(clock.clone(), Some(11));
        let mut world = SimWorld::new();
        let caster = world.spawn(SimEntity::default());
        let skill_id = SkillId::new(1);
        manager.register_skill(SkillRuntime::new(skill_id, "spark"));
        manager.activate_skill(
            &mut world,
            skill_id,
            caster,
            1,
            Duration::from_secs(5),
            vec![crouch_handler(skill_id)],
        );

        let event = WorldEvent::CrouchToggle {
            entity: caster,
            started: true,
        };
        clock.advance(Duration::from_secs(4));
        manager.dispatch(&mut world, &event);
        assert_eq!(world.damage_log.len(), 1);

        clock.advance(Duration::from_secs(2));
        manager.dispatch(&mut world, &event);
        assert_eq!(world.damage_log.len(), 1);
        assert!(!manager.is_active(skill_id, caster));

        // removal happens at the sweep, not at dispatch
        assert_eq!(manager.registration_count(caster), 1);
        manager.sweep_expired(&mut world);
        assert_eq!(manager.registration_count(caster), 0);
    }

    #[test]
    fn test_deactivate_is_idempotent() {
        let clock = ManualClock::new();
        let mut manager = TriggerManager::with_seed(clock, Some(11));
        let mut world = SimWorld::new();
        let caster = world.spawn(SimEntity::default());
        let skill_id = SkillId::new(1);
        manager.register_skill(SkillRuntime::new(skill_id, "spark"));
        manager.activate_skill(
            &mut world,
            skill_id,
            caster,
            1,
            Duration::ZERO,
            vec![crouch_handler(skill_id)],
        );

        manager.deactivate_skill(&mut world, skill_id, caster);
        manager.deactivate_skill(&mut world, skill_id, caster);
        assert_eq!(manager.registration_count(caster), 0);
        assert!(!manager.is_active(skill_id, caster));
    }

    /// Deactivating a caster's last skill drops the caster's whole entry,
    /// so the table doesn't accumulate one empty map per past caster.
    #[test]
    fn test_last_deactivation_drops_caster_entry() {
        let clock = ManualClock::new();
        let mut manager = TriggerManager::with_seed(clock, Some(11));
        let mut world = SimWorld::new();
        let caster = world.spawn(SimEntity::default());
        let skill_id = SkillId::new(1);
        manager.register_skill(SkillRuntime::new(skill_id, "spark"));
        manager.activate_skill(
            &mut world,
            skill_id,
            caster,
            1,
            Duration::ZERO,
            vec![crouch_handler(skill_id)],
        );
        assert!(manager.active.contains_key(&caster));

        manager.deactivate_skill(&mut world, skill_id, caster);
        assert!(!manager.active.contains_key(&caster));
    }
}
