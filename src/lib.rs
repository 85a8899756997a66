//! # skill-engine
//!
//! A data-driven skill effect runtime for game hosts.
//!
//! ## Design Principles
//!
//! 1. **Host-Agnostic**: No entity model of its own. Hosts implement the
//!    [`World`] trait and the engine works against that seam.
//!
//! 2. **Composition Over Code**: Skills are trees of small reusable
//!    components (conditions, mechanics, filters, targets, costs,
//!    cooldowns) wired together from data, not from code.
//!
//! 3. **Formulas Everywhere**: Any numeric setting may be a formula over
//!    the caster's stats, the skill level, and per-cast values, evaluated
//!    at execution time.
//!
//! ## Architecture
//!
//! - **Effect trees**: A skill's behavior is an [`EffectNode`] tree whose
//!   category decides how a node's result gates its children.
//!
//! - **Triggers**: World events flow into a [`TriggerManager`] which fans
//!   them out to the handlers of every affected caster's active skills,
//!   with timed activations retired by expiry sweeps.
//!
//! - **No globals**: The manager is constructed explicitly with the clock
//!   it trusts; tests drive time with [`ManualClock`].
//!
//! ## Modules
//!
//! - `core`: Entity IDs, settings maps, vector math, RNG, clock
//! - `formula`: Tokenizer and single-pass formula evaluator
//! - `effects`: Effect tree, built-in components, factory registry
//! - `triggers`: World events, triggers, handlers, the manager
//! - `skills`: Per-skill runtime state (activation sets, cast data)
//! - `host`: The `World` trait and an in-memory test world

pub mod core;
pub mod effects;
pub mod formula;
pub mod host;
pub mod skills;
pub mod triggers;

// Re-export commonly used types
pub use crate::core::{
    Clock, EntityId, ManualClock, SettingValue, Settings, SkillId, SkillRng, SystemClock, Vec3,
};

pub use crate::formula::{
    evaluate, evaluate_level_based, evaluate_safe, validate, Evaluator, FormulaError, StatSource,
    VariableContext,
};

pub use crate::effects::{
    Behavior, CleanupError, ComponentCategory, ComponentRegistry, EffectContext, EffectNode,
    Outcome, TargetList, UnknownComponentError,
};

pub use crate::triggers::{
    DamageCause, EventKind, Trigger, TriggerHandler, TriggerManager, WorldEvent,
};

pub use crate::skills::{CastData, SkillRuntime};

pub use crate::host::{SimEntity, SimWorld, World, WorldStatSource};
