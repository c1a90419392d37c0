//! Host facing parameter access: the only way the engine reads or writes parameter values.

use std::collections::BTreeMap;

use crate::{Error, ParameterValue, Result};

// -------------------------------------------------------------------------------------------------

/// Inclusive value range of a numeric parameter.
///
/// Bounds are owned by the host and are only used to scale and clamp mutations. Non-finite
/// bounds are kept, but have no range: values never get clamped or mutated with them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterBounds {
    min: f32,
    max: f32,
}

impl ParameterBounds {
    /// Create new bounds. Swaps min and max when they are passed in reversed order.
    pub fn new(min: f32, max: f32) -> Self {
        if max < min {
            Self { min: max, max: min }
        } else {
            Self { min, max }
        }
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// true when both min and max are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Distance between min and max. 0 for non-finite bounds.
    pub fn range(&self) -> f32 {
        if self.is_finite() {
            self.max - self.min
        } else {
            0.0
        }
    }

    /// Clamp the given value into the bounds. Values are returned unchanged when the bounds
    /// are not finite.
    pub fn clamp(&self, value: f32) -> f32 {
        if self.is_finite() {
            value.clamp(self.min, self.max)
        } else {
            value
        }
    }
}

// -------------------------------------------------------------------------------------------------

/// A named collection of parameters, implemented by the host.
///
/// The engine never holds references into the host's parameter storage: it only accesses
/// values through this interface. Group names must be unique within one engine.
pub trait ParameterGroup {
    /// The group's unique name. First level key in preset files.
    fn name(&self) -> &str;

    /// All parameter keys of the group.
    fn keys(&self) -> Vec<String>;

    /// Current value of the given parameter, or None if the group has no such key.
    fn value(&self, key: &str) -> Option<ParameterValue>;

    /// Apply a new value to the given parameter.
    ///
    /// ### Errors
    /// Returns [`Error::UnknownParameter`] when the key does not exist and
    /// [`Error::TypeMismatch`] when the value's type differs from the parameter's type.
    fn set_value(&mut self, key: &str, value: ParameterValue) -> Result<()>;

    /// Optional value bounds of numeric parameters.
    fn bounds(&self, _key: &str) -> Option<ParameterBounds> {
        None
    }
}

// -------------------------------------------------------------------------------------------------

/// A single entry in a [`ParameterMap`].
#[derive(Debug, Clone, PartialEq)]
struct ParameterEntry {
    value: ParameterValue,
    bounds: Option<ParameterBounds>,
}

/// A simple, self-contained [`ParameterGroup`] implementation, which stores its values in an
/// ordered map.
///
/// Useful for hosts which don't have a parameter system of their own, and for tests.
///
/// ```rust
/// use presets::prelude::*;
///
/// let mut group = ParameterMap::new("circle")
///     .with("x", 0)
///     .with_bounds("radius", 10.0_f32, 1.0, 100.0)
///     .with("fill", Color::rgb(255, 0, 0));
/// group.set_value("x", ParameterValue::Int(42)).unwrap();
/// assert_eq!(group.value("x"), Some(ParameterValue::Int(42)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterMap {
    name: String,
    entries: BTreeMap<String, ParameterEntry>,
}

impl ParameterMap {
    /// Create a new empty parameter group with the given name.
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Builder function to add an unbounded parameter.
    pub fn with<K: Into<String>, V: Into<ParameterValue>>(mut self, key: K, value: V) -> Self {
        self.insert(key, value, None);
        self
    }

    /// Builder function to add a bounded numeric parameter.
    pub fn with_bounds<K: Into<String>, V: Into<ParameterValue>>(
        mut self,
        key: K,
        value: V,
        min: f32,
        max: f32,
    ) -> Self {
        self.insert(key, value, Some(ParameterBounds::new(min, max)));
        self
    }

    /// Add or replace a parameter.
    pub fn insert<K: Into<String>, V: Into<ParameterValue>>(
        &mut self,
        key: K,
        value: V,
        bounds: Option<ParameterBounds>,
    ) {
        let value = value.into();
        self.entries
            .insert(key.into(), ParameterEntry { value, bounds });
    }

    /// Remove a parameter. Returns its last value, if it existed.
    pub fn remove(&mut self, key: &str) -> Option<ParameterValue> {
        self.entries.remove(key).map(|entry| entry.value)
    }

    /// Number of parameters in the group.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// true when the group has no parameters.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ParameterGroup for ParameterMap {
    fn name(&self) -> &str {
        &self.name
    }

    fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    fn value(&self, key: &str) -> Option<ParameterValue> {
        self.entries.get(key).map(|entry| entry.value)
    }

    fn set_value(&mut self, key: &str, value: ParameterValue) -> Result<()> {
        let entry = self
            .entries
            .get_mut(key)
            .ok_or_else(|| Error::UnknownParameter(key.to_string()))?;
        let expected = entry.value.parameter_type();
        if value.parameter_type() != expected {
            return Err(Error::TypeMismatch {
                key: key.to_string(),
                expected: expected.name(),
            });
        }
        entry.value = value;
        Ok(())
    }

    fn bounds(&self, key: &str) -> Option<ParameterBounds> {
        self.entries.get(key).and_then(|entry| entry.bounds)
    }
}

// -------------------------------------------------------------------------------------------------
