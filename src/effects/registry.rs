//! Component registry.
//!
//! Seven independently keyed factory tables, one per category plus one for
//! triggers. The definition loader asks the registry for nodes by string
//! key; third parties extend the tables with their own components at load
//! time. Lookups are case-insensitive.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::triggers::{
    CastTrigger, CrouchTrigger, DeathTrigger, EnvironmentalTrigger, KillTrigger, LandTrigger,
    LaunchTrigger, PhysicalDealtTrigger, PhysicalTakenTrigger, Trigger,
};

use super::conditions::{ChanceCondition, HealthCondition, ManaCondition, ValueCondition};
use super::cooldowns::CooldownGate;
use super::costs::ManaCost;
use super::filters::{EntityTypeFilter, GroupFilter};
use super::mechanics::{
    CommandMechanic, DamageMechanic, HealMechanic, ManaMechanic, ParticleMechanic, SoundMechanic,
};
use super::node::{Behavior, ComponentCategory, EffectNode};
use super::targets::{
    AreaTarget, ConeTarget, LineTarget, NearestTarget, SectorTarget, SelfTarget, SingleTarget,
    SphereTarget,
};

/// Factory producing a fresh behavior instance.
pub type ComponentFactory = Box<dyn Fn() -> Box<dyn Behavior>>;

/// A skill definition referenced a key no table knows.
///
/// Loaders report this as a warning and skip the offending node; it never
/// aborts a load batch.
#[derive(Debug, Error)]
#[error("no {category} component registered for key `{key}`")]
pub struct UnknownComponentError {
    pub category: ComponentCategory,
    pub key: String,
}

/// Factory tables for every component category and for triggers.
#[derive(Default)]
pub struct ComponentRegistry {
    conditions: FxHashMap<String, ComponentFactory>,
    mechanics: FxHashMap<String, ComponentFactory>,
    filters: FxHashMap<String, ComponentFactory>,
    targets: FxHashMap<String, ComponentFactory>,
    costs: FxHashMap<String, ComponentFactory>,
    cooldowns: FxHashMap<String, ComponentFactory>,
    // Triggers are stateless; singletons are shared rather than re-made.
    triggers: FxHashMap<String, Arc<dyn Trigger>>,
}

fn normalize(key: &str) -> String {
    key.to_ascii_lowercase()
}

impl ComponentRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with every built-in component and trigger.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register_condition("chance", || Box::new(ChanceCondition));
        registry.register_condition("health", || Box::new(HealthCondition));
        registry.register_condition("mana", || Box::new(ManaCondition));
        registry.register_condition("value", || Box::new(ValueCondition));

        registry.register_mechanic("damage", || Box::new(DamageMechanic));
        registry.register_mechanic("heal", || Box::new(HealMechanic));
        registry.register_mechanic("mana", || Box::new(ManaMechanic));
        registry.register_mechanic("particle", || Box::new(ParticleMechanic));
        registry.register_mechanic("sound", || Box::new(SoundMechanic));
        registry.register_mechanic("command", || Box::new(CommandMechanic));

        registry.register_filter("entity_type", || Box::new(EntityTypeFilter));
        registry.register_filter("group", || Box::new(GroupFilter));

        registry.register_target("self", || Box::new(SelfTarget));
        registry.register_target("single", || Box::new(SingleTarget));
        registry.register_target("cone", || Box::new(ConeTarget));
        registry.register_target("sphere", || Box::new(SphereTarget));
        registry.register_target("area", || Box::new(AreaTarget));
        registry.register_target("line", || Box::new(LineTarget));
        registry.register_target("nearest", || Box::new(NearestTarget));
        registry.register_target("sector", || Box::new(SectorTarget));

        registry.register_cost("mana", || Box::new(ManaCost));

        registry.register_cooldown("cooldown", || Box::new(CooldownGate));

        registry.register_trigger(Arc::new(CastTrigger));
        registry.register_trigger(Arc::new(CrouchTrigger));
        registry.register_trigger(Arc::new(LandTrigger));
        registry.register_trigger(Arc::new(DeathTrigger));
        registry.register_trigger(Arc::new(KillTrigger));
        registry.register_trigger(Arc::new(PhysicalDealtTrigger));
        registry.register_trigger(Arc::new(PhysicalTakenTrigger));
        registry.register_trigger(Arc::new(LaunchTrigger));
        registry.register_trigger(Arc::new(EnvironmentalTrigger));

        registry
    }

    // === Registration ===

    /// Register a condition factory.
    pub fn register_condition<F>(&mut self, key: &str, factory: F)
    where
        F: Fn() -> Box<dyn Behavior> + 'static,
    {
        self.conditions.insert(normalize(key), Box::new(factory));
    }

    /// Register a mechanic factory.
    pub fn register_mechanic<F>(&mut self, key: &str, factory: F)
    where
        F: Fn() -> Box<dyn Behavior> + 'static,
    {
        self.mechanics.insert(normalize(key), Box::new(factory));
    }

    /// Register a filter factory.
    pub fn register_filter<F>(&mut self, key: &str, factory: F)
    where
        F: Fn() -> Box<dyn Behavior> + 'static,
    {
        self.filters.insert(normalize(key), Box::new(factory));
    }

    /// Register a target factory.
    pub fn register_target<F>(&mut self, key: &str, factory: F)
    where
        F: Fn() -> Box<dyn Behavior> + 'static,
    {
        self.targets.insert(normalize(key), Box::new(factory));
    }

    /// Register a cost factory.
    pub fn register_cost<F>(&mut self, key: &str, factory: F)
    where
        F: Fn() -> Box<dyn Behavior> + 'static,
    {
        self.costs.insert(normalize(key), Box::new(factory));
    }

    /// Register a cooldown factory.
    pub fn register_cooldown<F>(&mut self, key: &str, factory: F)
    where
        F: Fn() -> Box<dyn Behavior> + 'static,
    {
        self.cooldowns.insert(normalize(key), Box::new(factory));
    }

    /// Register a trigger under its own key.
    pub fn register_trigger(&mut self, trigger: Arc<dyn Trigger>) {
        self.triggers.insert(normalize(trigger.key()), trigger);
    }

    // === Creation ===

    /// Create a condition node by key.
    #[must_use]
    pub fn create_condition(&self, key: &str) -> Option<EffectNode> {
        self.conditions
            .get(&normalize(key))
            .map(|f| EffectNode::new(f()))
    }

    /// Create a mechanic node by key.
    #[must_use]
    pub fn create_mechanic(&self, key: &str) -> Option<EffectNode> {
        self.mechanics
            .get(&normalize(key))
            .map(|f| EffectNode::new(f()))
    }

    /// Create a filter node by key.
    #[must_use]
    pub fn create_filter(&self, key: &str) -> Option<EffectNode> {
        self.filters
            .get(&normalize(key))
            .map(|f| EffectNode::new(f()))
    }

    /// Create a target node by key.
    #[must_use]
    pub fn create_target(&self, key: &str) -> Option<EffectNode> {
        self.targets
            .get(&normalize(key))
            .map(|f| EffectNode::new(f()))
    }

    /// Create a cost node by key.
    #[must_use]
    pub fn create_cost(&self, key: &str) -> Option<EffectNode> {
        self.costs.get(&normalize(key)).map(|f| EffectNode::new(f()))
    }

    /// Create a cooldown node by key.
    #[must_use]
    pub fn create_cooldown(&self, key: &str) -> Option<EffectNode> {
        self.cooldowns
            .get(&normalize(key))
            .map(|f| EffectNode::new(f()))
    }

    /// Create a node by key, probing the category tables in fixed priority
    /// order: condition, mechanic, filter, target, cost, cooldown.
    ///
    /// A key present in two tables resolves by that priority; authors must
    /// avoid cross-category collisions when they care which one wins.
    #[must_use]
    pub fn create_component(&self, key: &str) -> Option<EffectNode> {
        self.create_condition(key)
            .or_else(|| self.create_mechanic(key))
            .or_else(|| self.create_filter(key))
            .or_else(|| self.create_target(key))
            .or_else(|| self.create_cost(key))
            .or_else(|| self.create_cooldown(key))
    }

    /// Create a node by category and key, with an error for loader
    /// warn-and-skip reporting.
    pub fn require(
        &self,
        category: ComponentCategory,
        key: &str,
    ) -> Result<EffectNode, UnknownComponentError> {
        let node = match category {
            ComponentCategory::Condition => self.create_condition(key),
            ComponentCategory::Mechanic => self.create_mechanic(key),
            ComponentCategory::Filter => self.create_filter(key),
            ComponentCategory::Target => self.create_target(key),
            ComponentCategory::Cost => self.create_cost(key),
            ComponentCategory::Cooldown => self.create_cooldown(key),
        };
        node.ok_or_else(|| UnknownComponentError {
            category,
            key: key.to_string(),
        })
    }

    /// Look up a trigger by key.
    #[must_use]
    pub fn trigger(&self, key: &str) -> Option<Arc<dyn Trigger>> {
        self.triggers.get(&normalize(key)).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = ComponentRegistry::with_defaults();

        let upper = registry.create_mechanic("Damage").unwrap();
        let lower = registry.create_mechanic("damage").unwrap();
        assert_eq!(upper.key(), lower.key());
        assert_eq!(upper.category(), ComponentCategory::Mechanic);
    }

    #[test]
    fn test_unknown_key() {
        let registry = ComponentRegistry::with_defaults();
        assert!(registry.create_mechanic("tsunami").is_none());

        let err = registry
            .require(ComponentCategory::Mechanic, "tsunami")
            .unwrap_err();
        assert_eq!(err.key, "tsunami");
        assert_eq!(err.category, ComponentCategory::Mechanic);
    }

    #[test]
    fn test_create_component_priority() {
        // "mana" exists as condition, mechanic, and cost; the probe order
        // makes the condition win.
        let registry = ComponentRegistry::with_defaults();
        let node = registry.create_component("mana").unwrap();
        assert_eq!(node.category(), ComponentCategory::Condition);
    }

    #[test]
    fn test_third_party_registration() {
        use crate::core::EntityId;
        use crate::effects::{EffectContext, Outcome};

        struct NoopMechanic;

        impl Behavior for NoopMechanic {
            fn key(&self) -> &'static str {
                "noop"
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
        }

        let mut registry = ComponentRegistry::with_defaults();
        registry.register_mechanic("Noop", || Box::new(NoopMechanic));

        assert!(registry.create_mechanic("noop").is_some());
        assert!(registry.create_component("NOOP").is_some());
    }

    #[test]
    fn test_triggers_registered() {
        let registry = ComponentRegistry::with_defaults();
        for key in [
            "cast", "crouch", "land", "death", "kill", "physical_dealt", "physical_taken",
            "launch", "environmental",
        ] {
            assert!(registry.trigger(key).is_some(), "missing trigger {key}");
        }
        assert!(registry.trigger("CAST").is_some());
    }
}
