//! Skill runtime records.

mod runtime;

pub use runtime::{CastData, SkillRuntime};
