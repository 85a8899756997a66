//! Variable resolution for formula evaluation.
//!
//! A formula sees three layers of names, highest priority first:
//!
//! 1. Custom variables supplied by the caller (extracted event data,
//!    loader-defined constants).
//! 2. The reserved level names `Lv` (skill level) and `LV` (character
//!    level), defaulting to 1 when no stat source is attached.
//! 3. Short stat names (`STR`, `INT`, ...) resolved through the read-only
//!    [`StatSource`] capability.
//!
//! A context is built fresh per evaluation call and owned exclusively by it,
//! so evaluation is safe for concurrent callers as long as the stat source
//! tolerates concurrent reads.

use rustc_hash::FxHashMap;

/// Read-only capability for resolving character state.
///
/// Implemented by the host over whatever stat subsystem it has; the
/// evaluator only ever reads through it.
pub trait StatSource {
    /// Resolve a short stat name to its current value.
    fn resolve_stat(&self, short_name: &str) -> Option<f64>;

    /// The level of the skill being evaluated (`Lv`).
    fn skill_level(&self) -> i32 {
        1
    }

    /// The character's level (`LV`).
    fn character_level(&self) -> i32 {
        1
    }
}

/// The set of named values visible to one formula evaluation.
#[derive(Default)]
pub struct VariableContext<'a> {
    custom: FxHashMap<String, f64>,
    source: Option<&'a dyn StatSource>,
}

impl<'a> VariableContext<'a> {
    /// Create an empty context with no stat source.
    ///
    /// `Lv` and `LV` still resolve, to their default of 1.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context backed by a stat source.
    #[must_use]
    pub fn with_source(source: &'a dyn StatSource) -> Self {
        Self {
            custom: FxHashMap::default(),
            source: Some(source),
        }
    }

    /// Add a custom variable (builder pattern).
    #[must_use]
    pub fn with_var(mut self, name: impl Into<String>, value: f64) -> Self {
        self.set(name, value);
        self
    }

    /// Set a custom variable.
    pub fn set(&mut self, name: impl Into<String>, value: f64) {
        self.custom.insert(name.into(), value);
    }

    /// Copy a batch of custom variables into the context.
    pub fn extend<I, S>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        for (name, value) in vars {
            self.set(name, value);
        }
    }

    /// Resolve a name, or `None` if no layer knows it.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<f64> {
        if let Some(&value) = self.custom.get(name) {
            return Some(value);
        }
        match name {
            "Lv" => Some(f64::from(
                self.source.map_or(1, StatSource::skill_level),
            )),
            "LV" => Some(f64::from(
                self.source.map_or(1, StatSource::character_level),
            )),
            _ => self.source.and_then(|s| s.resolve_stat(name)),
        }
    }
}

/// Fixed stat source used by `validate`.
///
/// Presets the conventional short stats to sentinel values so any formula
/// referencing them parses and evaluates.
pub(crate) struct ValidationStats;

impl StatSource for ValidationStats {
    fn resolve_stat(&self, short_name: &str) -> Option<f64> {
        match short_name {
            "STR" => Some(10.0),
            "INT" => Some(11.0),
            "SPI" => Some(12.0),
            "VIT" => Some(13.0),
            "DEX" => Some(14.0),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedStats;

    impl StatSource for FixedStats {
        fn resolve_stat(&self, short_name: &str) -> Option<f64> {
            (short_name == "STR").then_some(10.0)
        }

        fn skill_level(&self) -> i32 {
            3
        }

        fn character_level(&self) -> i32 {
            20
        }
    }

    #[test]
    fn test_levels_default_to_one() {
        let ctx = VariableContext::new();
        assert_eq!(ctx.resolve("Lv"), Some(1.0));
        assert_eq!(ctx.resolve("LV"), Some(1.0));
        assert_eq!(ctx.resolve("STR"), None);
    }

    #[test]
    fn test_source_layers() {
        let stats = FixedStats;
        let ctx = VariableContext::with_source(&stats);
        assert_eq!(ctx.resolve("STR"), Some(10.0));
        assert_eq!(ctx.resolve("Lv"), Some(3.0));
        assert_eq!(ctx.resolve("LV"), Some(20.0));
        assert_eq!(ctx.resolve("AGI"), None);
    }

    #[test]
    fn test_custom_beats_reserved_and_stats() {
        let stats = FixedStats;
        let ctx = VariableContext::with_source(&stats)
            .with_var("STR", 99.0)
            .with_var("Lv", 7.0);
        assert_eq!(ctx.resolve("STR"), Some(99.0));
        assert_eq!(ctx.resolve("Lv"), Some(7.0));
    }
}
