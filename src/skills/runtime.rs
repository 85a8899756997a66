//! Per-skill runtime state.
//!
//! One `SkillRuntime` exists per skill ID for the process lifetime,
//! registered once at load. It tracks which entities currently have the
//! skill active and holds each caster's scratch map of values extracted
//! from triggering events (damage dealt, fall distance, ...), which formula
//! evaluation sees as custom variables.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::core::{EntityId, SkillId};

/// Per-caster scratch values extracted from the triggering event.
pub type CastData = FxHashMap<String, f64>;

/// Process-lifetime record for one skill.
#[derive(Clone, Debug)]
pub struct SkillRuntime {
    id: SkillId,
    name: String,
    active: FxHashSet<EntityId>,
    cast_data: FxHashMap<EntityId, CastData>,
}

impl SkillRuntime {
    /// Create a runtime for a skill.
    #[must_use]
    pub fn new(id: SkillId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            active: FxHashSet::default(),
            cast_data: FxHashMap::default(),
        }
    }

    /// The skill's ID.
    #[must_use]
    pub fn id(&self) -> SkillId {
        self.id
    }

    /// The skill's display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the skill is active for a caster.
    #[must_use]
    pub fn is_active(&self, caster: EntityId) -> bool {
        self.active.contains(&caster)
    }

    /// Flag the skill active for a caster.
    pub fn set_active(&mut self, caster: EntityId) {
        self.active.insert(caster);
    }

    /// Flag the skill inactive for a caster and drop their scratch data.
    pub fn set_inactive(&mut self, caster: EntityId) {
        self.active.remove(&caster);
        self.cast_data.remove(&caster);
    }

    /// Number of entities with the skill active.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// A caster's scratch data, if any has been extracted.
    #[must_use]
    pub fn cast_data(&self, caster: EntityId) -> Option<&CastData> {
        self.cast_data.get(&caster)
    }

    /// A caster's scratch data, created on first use.
    pub fn cast_data_mut(&mut self, caster: EntityId) -> &mut CastData {
        self.cast_data.entry(caster).or_default()
    }
}
