//! The composable effect tree: node abstraction, built-in components, and
//! the factory registry.

mod conditions;
mod cooldowns;
mod costs;
mod filters;
mod mechanics;
mod node;
mod registry;
mod targets;

pub use conditions::{ChanceCondition, HealthCondition, ManaCondition, ValueCondition};
pub use cooldowns::CooldownGate;
pub use costs::ManaCost;
pub use filters::{EntityTypeFilter, GroupFilter};
pub use mechanics::{
    CommandMechanic, DamageMechanic, HealMechanic, ManaMechanic, ParticleMechanic, SoundMechanic,
};
pub use node::{
    Behavior, CleanupError, ComponentCategory, EffectContext, EffectNode, Outcome, TargetList,
};
pub use registry::{ComponentFactory, ComponentRegistry, UnknownComponentError};
pub use targets::{
    AreaTarget, ConeTarget, LineTarget, NearestTarget, SectorTarget, SelfTarget, SingleTarget,
    SphereTarget,
};
