//! World events.
//!
//! The host delivers one call per occurrence; each variant carries the
//! minimal fields the built-in triggers need. Everything else about the
//! occurrence stays on the host side.

use serde::{Deserialize, Serialize};

use crate::core::EntityId;

/// Discriminant used for dispatch: which handlers can care about an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Sneak toggled on or off.
    Crouch,
    /// An entity died.
    Death,
    /// Entity-on-entity physical damage.
    PhysicalDamage,
    /// Generic damage (fall, fire, drowning, ...).
    Damage,
    /// A projectile was launched.
    ProjectileLaunch,
}

/// Why a generic damage event happened.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageCause {
    Fall,
    Fire,
    Lava,
    Drowning,
    Suffocation,
    Poison,
    Lightning,
    Contact,
    EntityAttack,
    Projectile,
    /// Host-specific cause; the name should be lowercase.
    Custom(String),
}

impl DamageCause {
    /// Lowercase name, matched by the environmental trigger's `type`
    /// substring filter.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            DamageCause::Fall => "fall",
            DamageCause::Fire => "fire",
            DamageCause::Lava => "lava",
            DamageCause::Drowning => "drowning",
            DamageCause::Suffocation => "suffocation",
            DamageCause::Poison => "poison",
            DamageCause::Lightning => "lightning",
            DamageCause::Contact => "contact",
            DamageCause::EntityAttack => "entity_attack",
            DamageCause::Projectile => "projectile",
            DamageCause::Custom(name) => name,
        }
    }

    /// Whether another entity caused the damage.
    #[must_use]
    pub fn entity_caused(&self) -> bool {
        matches!(self, DamageCause::EntityAttack | DamageCause::Projectile)
    }
}

/// One occurrence delivered by the host event loop.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum WorldEvent {
    /// An entity started or stopped sneaking.
    CrouchToggle { entity: EntityId, started: bool },

    /// An entity died, possibly at the hands of a killer.
    Death {
        victim: EntityId,
        killer: Option<EntityId>,
    },

    /// One entity physically damaged another.
    PhysicalDamage {
        damager: EntityId,
        victim: EntityId,
        damage: f64,
        /// True when the damager was a projectile rather than a melee hit.
        projectile: bool,
    },

    /// An entity took generic (possibly environmental) damage.
    Damage {
        victim: EntityId,
        cause: DamageCause,
        damage: f64,
    },

    /// A projectile left its shooter.
    ProjectileLaunch {
        projectile: EntityId,
        /// Set by the host only when the shooter is a living entity.
        shooter: Option<EntityId>,
    },
}

impl WorldEvent {
    /// The event's dispatch kind.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            WorldEvent::CrouchToggle { .. } => EventKind::Crouch,
            WorldEvent::Death { .. } => EventKind::Death,
            WorldEvent::PhysicalDamage { .. } => EventKind::PhysicalDamage,
            WorldEvent::Damage { .. } => EventKind::Damage,
            WorldEvent::ProjectileLaunch { .. } => EventKind::ProjectileLaunch,
        }
    }
}
