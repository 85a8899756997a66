//! Component settings: string-keyed scalar maps.
//!
//! Skill authors configure components through untyped key/value settings
//! ("radius" = 4, "group" = "enemy"). The map stays dynamic so third-party
//! components can define their own keys, but access goes through typed
//! getters with defaults.
//!
//! ## Level scaling
//!
//! Any numeric setting may carry a companion `<key>_per_level` entry. The
//! effective value at skill level L is `base + per_level * (L - 1)`, read
//! via [`Settings::scaled`].

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Value for a single setting.
///
/// Supports the scalar types skill definitions need.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    /// Numeric value (radius, damage, chance). Also holds formulas' results.
    Num(f64),
    /// Boolean flag (include caster, through walls).
    Bool(bool),
    /// Text value (group name, particle key, formula string).
    Text(String),
    /// List of strings (command arguments, allowed entity types).
    TextList(Vec<String>),
}

impl SettingValue {
    /// Get as a number if this is a Num value.
    #[must_use]
    pub fn as_num(&self) -> Option<f64> {
        match self {
            SettingValue::Num(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as bool if this is a Bool value.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as string reference if this is a Text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SettingValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get as string list reference if this is a TextList value.
    #[must_use]
    pub fn as_text_list(&self) -> Option<&[String]> {
        match self {
            SettingValue::TextList(v) => Some(v),
            _ => None,
        }
    }
}

impl From<f64> for SettingValue {
    fn from(v: f64) -> Self {
        SettingValue::Num(v)
    }
}

impl From<i32> for SettingValue {
    fn from(v: i32) -> Self {
        SettingValue::Num(f64::from(v))
    }
}

impl From<bool> for SettingValue {
    fn from(v: bool) -> Self {
        SettingValue::Bool(v)
    }
}

impl From<String> for SettingValue {
    fn from(v: String) -> Self {
        SettingValue::Text(v)
    }
}

impl From<&str> for SettingValue {
    fn from(v: &str) -> Self {
        SettingValue::Text(v.to_string())
    }
}

impl From<Vec<String>> for SettingValue {
    fn from(v: Vec<String>) -> Self {
        SettingValue::TextList(v)
    }
}

/// A component's configuration map.
///
/// Immutable once the owning node is built; the loader populates it before
/// wiring the node into a tree.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    values: FxHashMap<String, SettingValue>,
}

impl Settings {
    /// Create an empty settings map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value (builder pattern).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<SettingValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Set a value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<SettingValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Get the raw value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.values.get(key)
    }

    /// Check whether a key is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Get a numeric setting, falling back to a default.
    #[must_use]
    pub fn num(&self, key: &str, default: f64) -> f64 {
        self.values.get(key).and_then(SettingValue::as_num).unwrap_or(default)
    }

    /// Get a boolean setting, falling back to a default.
    #[must_use]
    pub fn bool(&self, key: &str, default: bool) -> bool {
        self.values.get(key).and_then(SettingValue::as_bool).unwrap_or(default)
    }

    /// Get a text setting, falling back to a default.
    #[must_use]
    pub fn text<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.values.get(key).and_then(SettingValue::as_text).unwrap_or(default)
    }

    /// Get a text-list setting; absent keys yield an empty slice.
    #[must_use]
    pub fn text_list(&self, key: &str) -> &[String] {
        self.values
            .get(key)
            .and_then(SettingValue::as_text_list)
            .unwrap_or(&[])
    }

    /// Get a level-scaled numeric setting.
    ///
    /// Reads `<key>` as the base and `<key>_per_level` as the per-level
    /// bonus: `base + per_level * (level - 1)`.
    #[must_use]
    pub fn scaled(&self, key: &str, level: i32, default: f64) -> f64 {
        let base = self.num(key, default);
        let per_level = self.num(&format!("{key}_per_level"), 0.0);
        base + per_level * f64::from(level - 1)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over all entries.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &SettingValue)> {
        self.values.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_getters() {
        let settings = Settings::new()
            .with("radius", 4.0)
            .with("wall", true)
            .with("group", "enemy");

        assert_eq!(settings.num("radius", 0.0), 4.0);
        assert_eq!(settings.num("missing", 2.5), 2.5);
        assert!(settings.bool("wall", false));
        assert_eq!(settings.text("group", "both"), "enemy");
        assert_eq!(settings.text("missing", "both"), "both");
    }

    #[test]
    fn test_level_scaling() {
        let settings = Settings::new()
            .with("radius", 3.0)
            .with("radius_per_level", 0.5);

        assert_eq!(settings.scaled("radius", 1, 0.0), 3.0);
        assert_eq!(settings.scaled("radius", 5, 0.0), 5.0);
    }

    #[test]
    fn test_level_scaling_without_per_level() {
        let settings = Settings::new().with("range", 8.0);
        assert_eq!(settings.scaled("range", 10, 0.0), 8.0);
    }

    #[test]
    fn test_default_when_absent() {
        let settings = Settings::new();
        assert_eq!(settings.scaled("angle", 3, 90.0), 90.0);
    }

    #[test]
    fn test_serde_round_trip() {
        let settings = Settings::new()
            .with("damage", 6.0)
            .with("true_damage", false)
            .with("particle", "flame");

        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(settings, back);
    }
}
