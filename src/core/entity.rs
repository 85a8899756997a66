//! Entity and skill identification.
//!
//! Every world object the runtime can touch (player, mob, projectile) has a
//! unique `EntityId` assigned by the host. Skills get a `SkillId` when their
//! runtime is registered with the trigger manager at load time.
//!
//! The runtime never interprets the raw values - they're opaque handles into
//! the host's world.

use serde::{Deserialize, Serialize};

/// Unique identifier for any world entity.
///
/// Players, mobs, and projectiles all have EntityIds. The host allocates
/// them; the runtime only compares and stores them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl EntityId {
    /// Create a new entity ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Unique identifier for a registered skill.
///
/// One skill runtime exists per ID for the process lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SkillId(pub u32);

impl SkillId {
    /// Create a new skill ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for SkillId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Skill({})", self.0)
    }
}
