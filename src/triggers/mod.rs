//! Event-driven skill activation.
//!
//! Triggers translate host world events into effect tree runs. The
//! [`TriggerManager`] is the stateful piece: it tracks which casters have
//! which skills active, for how long, and fans each incoming event out to
//! the matching [`TriggerHandler`]s.

mod event;
mod handler;
mod manager;
mod trigger;

pub use event::{DamageCause, EventKind, WorldEvent};
pub use handler::TriggerHandler;
pub use manager::TriggerManager;
pub use trigger::{
    CastTrigger, CrouchTrigger, DeathTrigger, EnvironmentalTrigger, KillTrigger, LandTrigger,
    LaunchTrigger, PhysicalDealtTrigger, PhysicalTakenTrigger, Trigger,
};
