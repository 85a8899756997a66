//! Trigger definitions.
//!
//! A trigger decides whether a world event should fire a skill's effect
//! tree, which entity casts, which entity is targeted, and what numbers
//! from the event land in cast data for formulas to read. Triggers are
//! stateless; one shared instance serves every skill that listens on it.

use crate::core::{EntityId, Settings};
use crate::skills::CastData;
use crate::triggers::event::{EventKind, WorldEvent};

/// Maps world events to skill activations.
pub trait Trigger {
    /// Lowercase registry key, e.g. `"physical_dealt"`.
    fn key(&self) -> &'static str;

    /// Which event kind this trigger listens on. `None` means the trigger
    /// is eventless and only fires through an explicit cast.
    fn event_kind(&self) -> Option<EventKind>;

    /// Whether the event satisfies this trigger's predicate for a handler
    /// configured with `settings`.
    fn should_trigger(&self, event: &WorldEvent, level: i32, settings: &Settings) -> bool;

    /// Copies event values into cast data before the effect tree runs.
    fn extract(&self, _event: &WorldEvent, _data: &mut CastData) {}

    /// The entity whose skill activates for this event.
    fn caster(&self, event: &WorldEvent) -> Option<EntityId>;

    /// The initial target handed to the effect tree. `None` falls back to
    /// the caster.
    fn target(&self, event: &WorldEvent, settings: &Settings) -> Option<EntityId>;
}

/// Eventless trigger used by manually cast skills.
pub struct CastTrigger;

impl Trigger for CastTrigger {
    fn key(&self) -> &'static str {
        "cast"
    }

    fn event_kind(&self) -> Option<EventKind> {
        None
    }

    fn should_trigger(&self, _event: &WorldEvent, _level: i32, _settings: &Settings) -> bool {
        true
    }

    fn caster(&self, _event: &WorldEvent) -> Option<EntityId> {
        None
    }

    fn target(&self, _event: &WorldEvent, _settings: &Settings) -> Option<EntityId> {
        None
    }
}

/// Fires when the caster toggles sneak. The `type` setting selects
/// `start`, `stop`, or `both`; default `start`.
pub struct CrouchTrigger;

impl Trigger for CrouchTrigger {
    fn key(&self) -> &'static str {
        "crouch"
    }

    fn event_kind(&self) -> Option<EventKind> {
        Some(EventKind::Crouch)
    }

    fn should_trigger(&self, event: &WorldEvent, _level: i32, settings: &Settings) -> bool {
        let WorldEvent::CrouchToggle { started, .. } = event else {
            return false;
        };
        match settings.text("type", "start").to_ascii_lowercase().as_str() {
            "both" => true,
            "stop" => !started,
            _ => *started,
        }
    }

    fn caster(&self, event: &WorldEvent) -> Option<EntityId> {
        match event {
            WorldEvent::CrouchToggle { entity, .. } => Some(*entity),
            _ => None,
        }
    }

    fn target(&self, event: &WorldEvent, _settings: &Settings) -> Option<EntityId> {
        self.caster(event)
    }
}

/// Fires when the caster takes fall damage. The fall damage is exposed
/// to formulas as `api_damage`.
pub struct LandTrigger;

impl Trigger for LandTrigger {
    fn key(&self) -> &'static str {
        "land"
    }

    fn event_kind(&self) -> Option<EventKind> {
        Some(EventKind::Damage)
    }

    fn should_trigger(&self, event: &WorldEvent, _level: i32, _settings: &Settings) -> bool {
        matches!(
            event,
            WorldEvent::Damage {
                cause: super::event::DamageCause::Fall,
                ..
            }
        )
    }

    fn extract(&self, event: &WorldEvent, data: &mut CastData) {
        if let WorldEvent::Damage { damage, .. } = event {
            data.insert("api_damage".to_string(), *damage);
        }
    }

    fn caster(&self, event: &WorldEvent) -> Option<EntityId> {
        match event {
            WorldEvent::Damage { victim, .. } => Some(*victim),
            _ => None,
        }
    }

    fn target(&self, event: &WorldEvent, _settings: &Settings) -> Option<EntityId> {
        self.caster(event)
    }
}

/// Fires on the victim's death, but only when a killer exists. The
/// `target` setting may name `killer` to aim the tree at the killer.
pub struct DeathTrigger;

impl Trigger for DeathTrigger {
    fn key(&self) -> &'static str {
        "death"
    }

    fn event_kind(&self) -> Option<EventKind> {
        Some(EventKind::Death)
    }

    fn should_trigger(&self, event: &WorldEvent, _level: i32, _settings: &Settings) -> bool {
        matches!(event, WorldEvent::Death { killer: Some(_), .. })
    }

    fn caster(&self, event: &WorldEvent) -> Option<EntityId> {
        match event {
            WorldEvent::Death { victim, .. } => Some(*victim),
            _ => None,
        }
    }

    fn target(&self, event: &WorldEvent, settings: &Settings) -> Option<EntityId> {
        let WorldEvent::Death { victim, killer } = event else {
            return None;
        };
        if settings.text("target", "self").eq_ignore_ascii_case("killer") {
            *killer
        } else {
            Some(*victim)
        }
    }
}

/// Fires for the killer when they score a kill. The killer is the
/// caster; the victim is the default target.
pub struct KillTrigger;

impl Trigger for KillTrigger {
    fn key(&self) -> &'static str {
        "kill"
    }

    fn event_kind(&self) -> Option<EventKind> {
        Some(EventKind::Death)
    }

    fn should_trigger(&self, event: &WorldEvent, _level: i32, _settings: &Settings) -> bool {
        matches!(event, WorldEvent::Death { killer: Some(_), .. })
    }

    fn caster(&self, event: &WorldEvent) -> Option<EntityId> {
        match event {
            WorldEvent::Death { killer, .. } => *killer,
            _ => None,
        }
    }

    fn target(&self, event: &WorldEvent, settings: &Settings) -> Option<EntityId> {
        let WorldEvent::Death { victim, killer } = event else {
            return None;
        };
        if settings.text("target", "victim").eq_ignore_ascii_case("self") {
            *killer
        } else {
            Some(*victim)
        }
    }
}

/// Resolves a `target` setting for the physical damage triggers.
/// Accepts `self`, `attacker`, and `victim`.
fn physical_target(
    settings: &Settings,
    default: &str,
    this: EntityId,
    damager: EntityId,
    victim: EntityId,
) -> EntityId {
    match settings.text("target", default).to_ascii_lowercase().as_str() {
        "self" => this,
        "attacker" => damager,
        _ => victim,
    }
}

/// Fires for the damager on melee physical damage. Projectile hits are
/// excluded; those go through [`LaunchTrigger`] skills instead.
pub struct PhysicalDealtTrigger;

impl Trigger for PhysicalDealtTrigger {
    fn key(&self) -> &'static str {
        "physical_dealt"
    }

    fn event_kind(&self) -> Option<EventKind> {
        Some(EventKind::PhysicalDamage)
    }

    fn should_trigger(&self, event: &WorldEvent, _level: i32, _settings: &Settings) -> bool {
        matches!(event, WorldEvent::PhysicalDamage { projectile: false, .. })
    }

    fn extract(&self, event: &WorldEvent, data: &mut CastData) {
        if let WorldEvent::PhysicalDamage { damage, .. } = event {
            data.insert("api_damage".to_string(), *damage);
        }
    }

    fn caster(&self, event: &WorldEvent) -> Option<EntityId> {
        match event {
            WorldEvent::PhysicalDamage { damager, .. } => Some(*damager),
            _ => None,
        }
    }

    fn target(&self, event: &WorldEvent, settings: &Settings) -> Option<EntityId> {
        let WorldEvent::PhysicalDamage { damager, victim, .. } = event else {
            return None;
        };
        Some(physical_target(settings, "victim", *damager, *damager, *victim))
    }
}

/// Fires for the victim of physical damage, projectile or melee.
pub struct PhysicalTakenTrigger;

impl Trigger for PhysicalTakenTrigger {
    fn key(&self) -> &'static str {
        "physical_taken"
    }

    fn event_kind(&self) -> Option<EventKind> {
        Some(EventKind::PhysicalDamage)
    }

    fn should_trigger(&self, event: &WorldEvent, _level: i32, _settings: &Settings) -> bool {
        matches!(event, WorldEvent::PhysicalDamage { .. })
    }

    fn extract(&self, event: &WorldEvent, data: &mut CastData) {
        if let WorldEvent::PhysicalDamage { damage, .. } = event {
            data.insert("api_damage".to_string(), *damage);
        }
    }

    fn caster(&self, event: &WorldEvent) -> Option<EntityId> {
        match event {
            WorldEvent::PhysicalDamage { victim, .. } => Some(*victim),
            _ => None,
        }
    }

    fn target(&self, event: &WorldEvent, settings: &Settings) -> Option<EntityId> {
        let WorldEvent::PhysicalDamage { damager, victim, .. } = event else {
            return None;
        };
        Some(physical_target(settings, "self", *victim, *damager, *victim))
    }
}

/// Fires when a living entity launches a projectile.
pub struct LaunchTrigger;

impl Trigger for LaunchTrigger {
    fn key(&self) -> &'static str {
        "launch"
    }

    fn event_kind(&self) -> Option<EventKind> {
        Some(EventKind::ProjectileLaunch)
    }

    fn should_trigger(&self, event: &WorldEvent, _level: i32, _settings: &Settings) -> bool {
        matches!(event, WorldEvent::ProjectileLaunch { shooter: Some(_), .. })
    }

    fn caster(&self, event: &WorldEvent) -> Option<EntityId> {
        match event {
            WorldEvent::ProjectileLaunch { shooter, .. } => *shooter,
            _ => None,
        }
    }

    fn target(&self, event: &WorldEvent, _settings: &Settings) -> Option<EntityId> {
        self.caster(event)
    }
}

/// Fires when the caster takes damage with no entity behind it. The
/// `type` setting, when present, must be a substring of the cause name.
pub struct EnvironmentalTrigger;

impl Trigger for EnvironmentalTrigger {
    fn key(&self) -> &'static str {
        "environmental"
    }

    fn event_kind(&self) -> Option<EventKind> {
        Some(EventKind::Damage)
    }

    fn should_trigger(&self, event: &WorldEvent, _level: i32, settings: &Settings) -> bool {
        let WorldEvent::Damage { cause, .. } = event else {
            return false;
        };
        if cause.entity_caused() {
            return false;
        }
        let filter = settings.text("type", "").to_ascii_lowercase();
        filter.is_empty() || cause.name().contains(&filter)
    }

    fn extract(&self, event: &WorldEvent, data: &mut CastData) {
        if let WorldEvent::Damage { damage, .. } = event {
            data.insert("api_damage".to_string(), *damage);
        }
    }

    fn caster(&self, event: &WorldEvent) -> Option<EntityId> {
        match event {
            WorldEvent::Damage { victim, .. } => Some(*victim),
            _ => None,
        }
    }

    fn target(&self, event: &WorldEvent, _settings: &Settings) -> Option<EntityId> {
        self.caster(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triggers::event::DamageCause;

    fn physical(projectile: bool) -> WorldEvent {
        WorldEvent::PhysicalDamage {
            damager: EntityId::new(1),
            victim: EntityId::new(2),
            damage: 6.0,
            projectile,
        }
    }

    #[test]
    fn test_crouch_type_setting() {
        let start = WorldEvent::CrouchToggle {
            entity: EntityId::new(1),
            started: true,
        };
        let stop = WorldEvent::CrouchToggle {
            entity: EntityId::new(1),
            started: false,
        };
        let trigger = CrouchTrigger;

        let default = Settings::new();
        assert!(trigger.should_trigger(&start, 1, &default));
        assert!(!trigger.should_trigger(&stop, 1, &default));

        let stop_only = Settings::new().with("type", "stop");
        assert!(!trigger.should_trigger(&start, 1, &stop_only));
        assert!(trigger.should_trigger(&stop, 1, &stop_only));

        let both = Settings::new().with("type", "both");
        assert!(trigger.should_trigger(&start, 1, &both));
        assert!(trigger.should_trigger(&stop, 1, &both));
    }

    #[test]
    fn test_land_only_on_fall() {
        let trigger = LandTrigger;
        let settings = Settings::new();
        let fall = WorldEvent::Damage {
            victim: EntityId::new(3),
            cause: DamageCause::Fall,
            damage: 4.5,
        };
        let fire = WorldEvent::Damage {
            victim: EntityId::new(3),
            cause: DamageCause::Fire,
            damage: 1.0,
        };
        assert!(trigger.should_trigger(&fall, 1, &settings));
        assert!(!trigger.should_trigger(&fire, 1, &settings));

        let mut data = CastData::default();
        trigger.extract(&fall, &mut data);
        assert_eq!(data.get("api_damage"), Some(&4.5));
    }

    #[test]
    fn test_death_requires_killer() {
        let trigger = DeathTrigger;
        let settings = Settings::new();
        let murdered = WorldEvent::Death {
            victim: EntityId::new(2),
            killer: Some(EntityId::new(1)),
        };
        let accident = WorldEvent::Death {
            victim: EntityId::new(2),
            killer: None,
        };
        assert!(trigger.should_trigger(&murdered, 1, &settings));
        assert!(!trigger.should_trigger(&accident, 1, &settings));
        assert_eq!(trigger.caster(&murdered), Some(EntityId::new(2)));

        let at_killer = Settings::new().with("target", "killer");
        assert_eq!(trigger.target(&murdered, &at_killer), Some(EntityId::new(1)));
    }

    #[test]
    fn test_kill_casts_as_killer() {
        let trigger = KillTrigger;
        let event = WorldEvent::Death {
            victim: EntityId::new(2),
            killer: Some(EntityId::new(1)),
        };
        assert_eq!(trigger.caster(&event), Some(EntityId::new(1)));
        assert_eq!(trigger.target(&event, &Settings::new()), Some(EntityId::new(2)));
    }

    #[test]
    fn test_physical_dealt_excludes_projectiles() {
        let trigger = PhysicalDealtTrigger;
        let settings = Settings::new();
        assert!(trigger.should_trigger(&physical(false), 1, &settings));
        assert!(!trigger.should_trigger(&physical(true), 1, &settings));

        let taken = PhysicalTakenTrigger;
        assert!(taken.should_trigger(&physical(true), 1, &settings));
    }

    #[test]
    fn test_physical_target_setting() {
        let dealt = PhysicalDealtTrigger;
        let event = physical(false);
        assert_eq!(dealt.target(&event, &Settings::new()), Some(EntityId::new(2)));
        let selfish = Settings::new().with("target", "self");
        assert_eq!(dealt.target(&event, &selfish), Some(EntityId::new(1)));

        let taken = PhysicalTakenTrigger;
        assert_eq!(taken.target(&event, &Settings::new()), Some(EntityId::new(2)));
        let attacker = Settings::new().with("target", "attacker");
        assert_eq!(taken.target(&event, &attacker), Some(EntityId::new(1)));
    }

    #[test]
    fn test_launch_requires_living_shooter() {
        let trigger = LaunchTrigger;
        let settings = Settings::new();
        let from_player = WorldEvent::ProjectileLaunch {
            projectile: EntityId::new(9),
            shooter: Some(EntityId::new(1)),
        };
        let from_dispenser = WorldEvent::ProjectileLaunch {
            projectile: EntityId::new(9),
            shooter: None,
        };
        assert!(trigger.should_trigger(&from_player, 1, &settings));
        assert!(!trigger.should_trigger(&from_dispenser, 1, &settings));
    }

    #[test]
    fn test_environmental_type_filter() {
        let trigger = EnvironmentalTrigger;
        let burn = WorldEvent::Damage {
            victim: EntityId::new(4),
            cause: DamageCause::Fire,
            damage: 2.0,
        };
        let stab = WorldEvent::Damage {
            victim: EntityId::new(4),
            cause: DamageCause::EntityAttack,
            damage: 2.0,
        };
        assert!(trigger.should_trigger(&burn, 1, &Settings::new()));
        assert!(!trigger.should_trigger(&stab, 1, &Settings::new()));

        let fire_only = Settings::new().with("type", "fire");
        assert!(trigger.should_trigger(&burn, 1, &fire_only));
        let lava_only = Settings::new().with("type", "lava");
        assert!(!trigger.should_trigger(&burn, 1, &lava_only));
    }
}
