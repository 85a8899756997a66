//! Core types: identifiers, settings maps, math, RNG, and the clock.

mod entity;
mod math;
mod rng;
mod settings;
mod time;

pub use entity::{EntityId, SkillId};
pub use math::Vec3;
pub use rng::SkillRng;
pub use settings::{SettingValue, Settings};
pub use time::{Clock, ManualClock, SystemClock};
