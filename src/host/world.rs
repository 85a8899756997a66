//! The host world capability.
//!
//! Everything the effect tree needs from the embedding game - spatial
//! queries, combat state, and the side effects mechanics perform - goes
//! through this one trait. The runtime owns no world state of its own.

use crate::core::{EntityId, SkillId, Vec3};
use crate::formula::StatSource;

/// Host-provided view of and mutation surface for the game world.
///
/// The runtime is fully synchronous: every method is a plain call the host
/// resolves immediately on its main tick.
pub trait World {
    // === Queries ===

    /// An entity's position, or `None` if it no longer exists.
    fn position(&self, entity: EntityId) -> Option<Vec3>;

    /// The direction an entity is facing (unit vector).
    fn facing(&self, entity: EntityId) -> Vec3;

    /// All entities within `radius` of a point, excluding nothing.
    fn entities_near(&self, center: Vec3, radius: f64) -> Vec<EntityId>;

    /// Whether the entity is a living combatant.
    fn is_living(&self, entity: EntityId) -> bool;

    /// Whether the entity is a player.
    fn is_player(&self, entity: EntityId) -> bool;

    /// Whether `other` is hostile toward `viewer`.
    fn is_hostile(&self, viewer: EntityId, other: EntityId) -> bool;

    /// Whether two entities share a group (party, team).
    fn in_same_group(&self, a: EntityId, b: EntityId) -> bool;

    /// Whether nothing solid blocks the line between two entities.
    fn has_line_of_sight(&self, from: EntityId, to: EntityId) -> bool;

    /// Current health.
    fn health(&self, entity: EntityId) -> f64;

    /// Maximum health.
    fn max_health(&self, entity: EntityId) -> f64;

    /// Current mana.
    fn mana(&self, entity: EntityId) -> f64;

    /// Resolve a short stat name for an entity.
    fn stat(&self, entity: EntityId, short_name: &str) -> Option<f64>;

    /// The entity's character level.
    fn character_level(&self, entity: EntityId) -> i32;

    /// Seconds left on a skill cooldown; 0 when ready.
    fn cooldown_remaining(&self, entity: EntityId, skill: SkillId) -> f64;

    // === Effects ===

    /// Deal damage to a target. `true_damage` bypasses armor.
    fn damage(&mut self, target: EntityId, amount: f64, source: EntityId, true_damage: bool);

    /// Restore health, capped at max by the host.
    fn heal(&mut self, target: EntityId, amount: f64);

    /// Restore mana.
    fn restore_mana(&mut self, entity: EntityId, amount: f64);

    /// Deduct mana; returns false (and deducts nothing) when insufficient.
    fn spend_mana(&mut self, entity: EntityId, amount: f64) -> bool;

    /// Put a skill on cooldown for an entity.
    fn start_cooldown(&mut self, entity: EntityId, skill: SkillId, seconds: f64);

    /// Spawn a named particle effect at a point.
    fn spawn_particle(&mut self, effect: &str, at: Vec3);

    /// Play a named sound at a point.
    fn play_sound(&mut self, sound: &str, at: Vec3);

    /// Run a host command against a target entity.
    fn run_command(&mut self, command: &str, target: EntityId);
}

/// Adapts a world entity to the evaluator's [`StatSource`] capability.
///
/// Built fresh per evaluation; reads only.
pub struct WorldStatSource<'a> {
    world: &'a dyn World,
    entity: EntityId,
    skill_level: i32,
}

impl<'a> WorldStatSource<'a> {
    /// Create a stat source for one entity at one skill level.
    #[must_use]
    pub fn new(world: &'a dyn World, entity: EntityId, skill_level: i32) -> Self {
        Self {
            world,
            entity,
            skill_level,
        }
    }
}

impl StatSource for WorldStatSource<'_> {
    fn resolve_stat(&self, short_name: &str) -> Option<f64> {
        self.world.stat(self.entity, short_name)
    }

    fn skill_level(&self) -> i32 {
        self.skill_level
    }

    fn character_level(&self) -> i32 {
        self.world.character_level(self.entity)
    }
}
