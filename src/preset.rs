//! Preset document model and its mapping from and to typed parameter values.
//!
//! A preset is a JSON object keyed by group name, then by parameter key:
//!
//! ```json
//! {
//!   "simulation": { "particles": 1000, "radius": 3.5, "enabled": true },
//!   "render": { "tint": 16711680, "tint_alpha": 128 }
//! }
//! ```
//!
//! Colors are stored as packed `0xRRGGBB` integer with a sibling `<key>_alpha` entry.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Color, Error, ParameterGroup, ParameterType, ParameterValue, Result};

// -------------------------------------------------------------------------------------------------

/// Persistent preset identifier. Valid ids start at 1.
pub type PresetId = u32;

/// Suffix of the synthetic alpha entries of color parameters.
pub const ALPHA_KEY_SUFFIX: &str = "_alpha";

// -------------------------------------------------------------------------------------------------

/// A snapshot of parameter values, as stored in a preset file.
///
/// Reading values from a preset is permissive: keys which are not present in the live
/// parameter group get skipped, and so do values whose JSON type doesn't match the
/// parameter's type. Parameters which are missing in the preset are not touched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Preset {
    groups: Map<String, Value>,
}

impl Preset {
    /// Create a new empty preset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot all current values of the given parameter groups.
    pub fn capture<'a, I>(groups: I) -> Self
    where
        I: IntoIterator<Item = &'a dyn ParameterGroup>,
    {
        let mut preset = Self::new();
        for group in groups {
            preset.capture_group(group);
        }
        preset
    }

    /// Snapshot all current values of a single group, replacing a previously stored
    /// group with the same name.
    pub fn capture_group(&mut self, group: &dyn ParameterGroup) {
        let mut values = Map::new();
        for key in group.keys() {
            match group.value(&key) {
                Some(ParameterValue::Bool(value)) => {
                    values.insert(key, Value::from(value));
                }
                Some(ParameterValue::Int(value)) => {
                    values.insert(key, Value::from(value));
                }
                Some(ParameterValue::Float(value)) => {
                    values.insert(key, Value::from(value));
                }
                Some(ParameterValue::Color(color)) => {
                    values.insert(format!("{key}{ALPHA_KEY_SUFFIX}"), Value::from(color.a));
                    values.insert(key, Value::from(color.hex()));
                }
                None => {
                    log::trace!(target: "Presets", "Parameter '{}' has no value", key);
                }
            }
        }
        self.groups
            .insert(group.name().to_string(), Value::Object(values));
    }

    /// Names of all groups in the preset.
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// true when the preset contains the given group.
    pub fn has_group(&self, name: &str) -> bool {
        self.groups.contains_key(name)
    }

    /// Raw JSON value of a single parameter.
    pub fn raw_value(&self, group: &str, key: &str) -> Option<&Value> {
        self.groups
            .get(group)
            .and_then(Value::as_object)
            .and_then(|values| values.get(key))
    }

    /// Set a raw JSON value of a single parameter, creating the group if needed.
    pub fn set_raw_value(&mut self, group: &str, key: &str, value: Value) {
        let entry = self
            .groups
            .entry(group.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        if let Value::Object(values) = entry {
            values.insert(key.to_string(), value);
        }
    }

    /// Convert the preset's values for the given group into typed parameter values, using
    /// the live group's parameter types. Returns an empty list when the preset does not
    /// contain the group.
    ///
    /// Unknown keys and values with mismatching types are skipped and logged.
    pub fn values_for(&self, group: &dyn ParameterGroup) -> Vec<(String, ParameterValue)> {
        let values = match self.groups.get(group.name()) {
            Some(Value::Object(values)) => values,
            Some(_) => {
                log::warn!(target: "Presets",
                    "Preset group '{}' is not an object, skipping it", group.name());
                return vec![];
            }
            None => return vec![],
        };
        let mut result = Vec::with_capacity(values.len());
        for (key, json) in values {
            let current = match group.value(key) {
                Some(current) => current,
                None => {
                    if !Self::is_alpha_key_of_color(group, key) {
                        log::trace!(target: "Presets",
                            "Preset key '{}' not found in group '{}'", key, group.name());
                    }
                    continue;
                }
            };
            let alpha = values.get(&format!("{key}{ALPHA_KEY_SUFFIX}"));
            match Self::convert(key, json, alpha, current.parameter_type()) {
                Ok(value) => result.push((key.clone(), value)),
                Err(err) => {
                    log::warn!(target: "Presets",
                        "Skipping value of group '{}': {}", group.name(), err);
                }
            }
        }
        result
    }

    /// Serialize the preset into a pretty printed JSON string.
    ///
    /// ### Errors
    /// Returns an error if the serialization failed.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize a preset from a JSON string.
    ///
    /// ### Errors
    /// Returns an error if the string is not a valid JSON object.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    // true when the given key is the synthetic alpha entry of a color parameter.
    fn is_alpha_key_of_color(group: &dyn ParameterGroup, key: &str) -> bool {
        key.strip_suffix(ALPHA_KEY_SUFFIX)
            .and_then(|base| group.value(base))
            .is_some_and(|value| matches!(value, ParameterValue::Color(_)))
    }

    // convert a JSON value to a parameter value of the given type.
    fn convert(
        key: &str,
        json: &Value,
        alpha: Option<&Value>,
        parameter_type: ParameterType,
    ) -> Result<ParameterValue> {
        let mismatch = || Error::TypeMismatch {
            key: key.to_string(),
            expected: parameter_type.name(),
        };
        match parameter_type {
            ParameterType::Boolean => json.as_bool().map(ParameterValue::Bool).ok_or_else(mismatch),
            ParameterType::Integer => {
                // floats which got stored for integer parameters are truncated
                let value = match json.as_i64() {
                    Some(value) => i32::try_from(value).ok(),
                    None => json
                        .as_f64()
                        .filter(|value| value.is_finite())
                        .map(|value| value as i32),
                };
                value.map(ParameterValue::Int).ok_or_else(mismatch)
            }
            ParameterType::Float => json
                .as_f64()
                .map(|value| ParameterValue::Float(value as f32))
                .ok_or_else(mismatch),
            ParameterType::Color => {
                let hex = json
                    .as_u64()
                    .and_then(|hex| u32::try_from(hex).ok())
                    .ok_or_else(mismatch)?;
                let alpha = alpha
                    .and_then(Value::as_f64)
                    .map_or(255, |alpha| alpha.clamp(0.0, 255.0) as u8);
                Ok(ParameterValue::Color(Color::from_hex(hex, alpha)))
            }
        }
    }
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::ParameterMap;

    fn group() -> ParameterMap {
        ParameterMap::new("render")
            .with("visible", true)
            .with("count", 12)
            .with("radius", 0.1_f32)
            .with("tint", Color::rgba(0xFF, 0x80, 0x00, 40))
    }

    #[test]
    fn capture() {
        let group = group();
        let preset = Preset::capture([&group as &dyn ParameterGroup]);
        let json = serde_json::to_value(&preset).unwrap();
        assert_eq!(
            json,
            json!({
                "render": {
                    "visible": true,
                    "count": 12,
                    "radius": 0.1_f32,
                    "tint": 0xFF8000,
                    "tint_alpha": 40
                }
            })
        );
    }

    #[test]
    fn round_trip() {
        let group = group();
        let preset = Preset::capture([&group as &dyn ParameterGroup]);
        let preset = Preset::from_json_str(&preset.to_json_string().unwrap()).unwrap();
        let mut values = preset.values_for(&group);
        values.sort_by(|a, b| a.0.cmp(&b.0));
        assert_eq!(
            values,
            vec![
                ("count".to_string(), ParameterValue::Int(12)),
                ("radius".to_string(), ParameterValue::Float(0.1)),
                (
                    "tint".to_string(),
                    ParameterValue::Color(Color::rgba(0xFF, 0x80, 0x00, 40))
                ),
                ("visible".to_string(), ParameterValue::Bool(true)),
            ]
        );
    }

    #[test]
    fn permissive_reading() {
        let group = group();
        let preset = Preset::from_json_str(
            r#"{
                "render": {
                    "count": 3.9,
                    "radius": "wide",
                    "unknown": 1,
                    "tint": 255
                },
                "other": { "x": 1 }
            }"#,
        )
        .unwrap();
        let mut values = preset.values_for(&group);
        values.sort_by(|a, b| a.0.cmp(&b.0));
        assert_eq!(
            values,
            vec![
                ("count".to_string(), ParameterValue::Int(3)),
                (
                    "tint".to_string(),
                    ParameterValue::Color(Color::rgba(0, 0, 0xFF, 255))
                ),
            ]
        );
        assert!(preset.has_group("other"));
        assert!(preset.values_for(&ParameterMap::new("missing")).is_empty());
    }

    #[test]
    fn raw_values() {
        let mut preset = Preset::new();
        preset.set_raw_value("params", "x", json!(10));
        assert_eq!(preset.raw_value("params", "x"), Some(&json!(10)));
        assert_eq!(preset.group_names().collect::<Vec<_>>(), vec!["params"]);
        assert!(Preset::from_json_str("[1, 2]").is_err());
    }
}
