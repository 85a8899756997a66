//! A simple in-memory world for tests and demos.
//!
//! `SimWorld` stores entities in plain maps and records every side effect
//! the runtime performs (damage, particles, commands) so tests can assert
//! on them. Hostility is group-based: entities in different groups are
//! hostile to each other.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::core::{EntityId, SkillId, Vec3};

use super::world::World;

/// One simulated entity.
#[derive(Clone, Debug)]
pub struct SimEntity {
    pub position: Vec3,
    pub facing: Vec3,
    pub living: bool,
    pub player: bool,
    pub group: String,
    pub health: f64,
    pub max_health: f64,
    pub mana: f64,
    pub level: i32,
    pub stats: FxHashMap<String, f64>,
}

impl Default for SimEntity {
    fn default() -> Self {
        Self {
            position: Vec3::default(),
            facing: Vec3::new(1.0, 0.0, 0.0),
            living: true,
            player: false,
            group: "neutral".to_string(),
            health: 20.0,
            max_health: 20.0,
            mana: 100.0,
            level: 1,
            stats: FxHashMap::default(),
        }
    }
}

impl SimEntity {
    /// An entity at a position with defaults for everything else.
    #[must_use]
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Set the group (builder pattern).
    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    /// Mark as a player (builder pattern).
    #[must_use]
    pub fn as_player(mut self) -> Self {
        self.player = true;
        self
    }

    /// Set a stat (builder pattern).
    #[must_use]
    pub fn with_stat(mut self, name: impl Into<String>, value: f64) -> Self {
        self.stats.insert(name.into(), value);
        self
    }
}

/// One damage application recorded by the sim.
#[derive(Clone, Debug, PartialEq)]
pub struct DamageRecord {
    pub target: EntityId,
    pub amount: f64,
    pub source: EntityId,
    pub true_damage: bool,
}

/// In-memory [`World`] implementation.
#[derive(Default)]
pub struct SimWorld {
    entities: FxHashMap<EntityId, SimEntity>,
    cooldowns: FxHashMap<(EntityId, SkillId), f64>,
    blocked_sight: FxHashSet<(EntityId, EntityId)>,
    next_id: u64,

    /// Recorded side effects, for test assertions.
    pub damage_log: Vec<DamageRecord>,
    pub heal_log: Vec<(EntityId, f64)>,
    pub particles: Vec<(String, Vec3)>,
    pub sounds: Vec<(String, Vec3)>,
    pub commands: Vec<(String, EntityId)>,
}

impl SimWorld {
    /// Create an empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity, returning its ID.
    pub fn spawn(&mut self, entity: SimEntity) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        self.entities.insert(id, entity);
        id
    }

    /// Borrow an entity.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&SimEntity> {
        self.entities.get(&id)
    }

    /// Mutably borrow an entity.
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut SimEntity> {
        self.entities.get_mut(&id)
    }

    /// Block line of sight between two entities (both directions).
    pub fn block_sight(&mut self, a: EntityId, b: EntityId) {
        self.blocked_sight.insert((a, b));
        self.blocked_sight.insert((b, a));
    }

    /// Advance every running cooldown by `seconds`.
    pub fn advance_cooldowns(&mut self, seconds: f64) {
        for remaining in self.cooldowns.values_mut() {
            *remaining = (*remaining - seconds).max(0.0);
        }
        self.cooldowns.retain(|_, remaining| *remaining > 0.0);
    }
}

impl World for SimWorld {
    fn position(&self, entity: EntityId) -> Option<Vec3> {
        self.entities.get(&entity).map(|e| e.position)
    }

    fn facing(&self, entity: EntityId) -> Vec3 {
        self.entities
            .get(&entity)
            .map(|e| e.facing.normalized())
            .unwrap_or_default()
    }

    fn entities_near(&self, center: Vec3, radius: f64) -> Vec<EntityId> {
        let mut found: Vec<EntityId> = self
            .entities
            .iter()
            .filter(|(_, e)| e.position.distance_squared(center) <= radius * radius)
            .map(|(&id, _)| id)
            .collect();
        // Stable order so tests are deterministic.
        found.sort_by_key(|id| id.raw());
        found
    }

    fn is_living(&self, entity: EntityId) -> bool {
        self.entities.get(&entity).is_some_and(|e| e.living)
    }

    fn is_player(&self, entity: EntityId) -> bool {
        self.entities.get(&entity).is_some_and(|e| e.player)
    }

    fn is_hostile(&self, viewer: EntityId, other: EntityId) -> bool {
        match (self.entities.get(&viewer), self.entities.get(&other)) {
            (Some(a), Some(b)) => a.group != b.group,
            _ => false,
        }
    }

    fn in_same_group(&self, a: EntityId, b: EntityId) -> bool {
        match (self.entities.get(&a), self.entities.get(&b)) {
            (Some(a), Some(b)) => a.group == b.group,
            _ => false,
        }
    }

    fn has_line_of_sight(&self, from: EntityId, to: EntityId) -> bool {
        !self.blocked_sight.contains(&(from, to))
    }

    fn health(&self, entity: EntityId) -> f64 {
        self.entities.get(&entity).map_or(0.0, |e| e.health)
    }

    fn max_health(&self, entity: EntityId) -> f64 {
        self.entities.get(&entity).map_or(0.0, |e| e.max_health)
    }

    fn mana(&self, entity: EntityId) -> f64 {
        self.entities.get(&entity).map_or(0.0, |e| e.mana)
    }

    fn stat(&self, entity: EntityId, short_name: &str) -> Option<f64> {
        self.entities
            .get(&entity)
            .and_then(|e| e.stats.get(short_name).copied())
    }

    fn character_level(&self, entity: EntityId) -> i32 {
        self.entities.get(&entity).map_or(1, |e| e.level)
    }

    fn cooldown_remaining(&self, entity: EntityId, skill: SkillId) -> f64 {
        self.cooldowns.get(&(entity, skill)).copied().unwrap_or(0.0)
    }

    fn damage(&mut self, target: EntityId, amount: f64, source: EntityId, true_damage: bool) {
        self.damage_log.push(DamageRecord {
            target,
            amount,
            source,
            true_damage,
        });
        if let Some(entity) = self.entities.get_mut(&target) {
            entity.health = (entity.health - amount).max(0.0);
            if entity.health == 0.0 {
                entity.living = false;
            }
        }
    }

    fn heal(&mut self, target: EntityId, amount: f64) {
        self.heal_log.push((target, amount));
        if let Some(entity) = self.entities.get_mut(&target) {
            entity.health = (entity.health + amount).min(entity.max_health);
        }
    }

    fn restore_mana(&mut self, entity: EntityId, amount: f64) {
        if let Some(entity) = self.entities.get_mut(&entity) {
            entity.mana += amount;
        }
    }

    fn spend_mana(&mut self, entity: EntityId, amount: f64) -> bool {
        match self.entities.get_mut(&entity) {
            Some(e) if e.mana >= amount => {
                e.mana -= amount;
                true
            }
            _ => false,
        }
    }

    fn start_cooldown(&mut self, entity: EntityId, skill: SkillId, seconds: f64) {
        if seconds > 0.0 {
            self.cooldowns.insert((entity, skill), seconds);
        }
    }

    fn spawn_particle(&mut self, effect: &str, at: Vec3) {
        self.particles.push((effect.to_string(), at));
    }

    fn play_sound(&mut self, sound: &str, at: Vec3) {
        self.sounds.push((sound.to_string(), at));
    }

    fn run_command(&mut self, command: &str, target: EntityId) {
        self.commands.push((command.to_string(), target));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_and_query() {
        let mut world = SimWorld::new();
        let a = world.spawn(SimEntity::at(Vec3::new(0.0, 0.0, 0.0)));
        let b = world.spawn(SimEntity::at(Vec3::new(3.0, 0.0, 0.0)));
        let far = world.spawn(SimEntity::at(Vec3::new(50.0, 0.0, 0.0)));

        let near = world.entities_near(Vec3::default(), 5.0);
        assert_eq!(near, vec![a, b]);
        assert!(!near.contains(&far));
    }

    #[test]
    fn test_group_hostility() {
        let mut world = SimWorld::new();
        let a = world.spawn(SimEntity::default().with_group("red"));
        let b = world.spawn(SimEntity::default().with_group("blue"));
        let c = world.spawn(SimEntity::default().with_group("red"));

        assert!(world.is_hostile(a, b));
        assert!(!world.is_hostile(a, c));
        assert!(world.in_same_group(a, c));
    }

    #[test]
    fn test_damage_kills_at_zero() {
        let mut world = SimWorld::new();
        let victim = world.spawn(SimEntity::default());
        let source = world.spawn(SimEntity::default());

        world.damage(victim, 25.0, source, false);
        assert_eq!(world.health(victim), 0.0);
        assert!(!world.is_living(victim));
        assert_eq!(world.damage_log.len(), 1);
    }

    #[test]
    fn test_mana_spend() {
        let mut world = SimWorld::new();
        let caster = world.spawn(SimEntity::default());

        assert!(world.spend_mana(caster, 60.0));
        assert!(!world.spend_mana(caster, 60.0));
        assert_eq!(world.mana(caster), 40.0);
    }

    #[test]
    fn test_cooldown_ticks_down() {
        let mut world = SimWorld::new();
        let caster = world.spawn(SimEntity::default());
        let skill = SkillId::new(1);

        world.start_cooldown(caster, skill, 4.0);
        assert_eq!(world.cooldown_remaining(caster, skill), 4.0);
        world.advance_cooldowns(4.0);
        assert_eq!(world.cooldown_remaining(caster, skill), 0.0);
    }
}
