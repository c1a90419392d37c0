//! Engine configuration.

use std::path::PathBuf;

use crate::{
    interpolation::DEFAULT_INTERPOLATION_DURATION, mutation::DEFAULT_MUTATION_PERCENTAGE,
    sequencer::DEFAULT_PRESET_DURATION, store::DEFAULT_FOLDER_PATH, Easing, PresetId,
};

// -------------------------------------------------------------------------------------------------

/// Default upper bound of randomly picked presets.
pub const DEFAULT_MAX_RANDOM_PRESET: PresetId = 16;

// -------------------------------------------------------------------------------------------------

/// Initial settings of a [`PresetEngine`](crate::PresetEngine).
///
/// ```rust
/// use presets::{Easing, EngineConfig};
///
/// let config = EngineConfig::default()
///     .with_folder_path("my_presets")
///     .with_interpolation_duration(1.5)
///     .with_easing(Easing::QuadOut)
///     .with_random_seed(42);
/// assert_eq!(config.preset_duration, 5.0);
/// ```
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Folder preset files are read from and written to.
    pub folder_path: PathBuf,
    /// Seconds a sequence preset stays active.
    pub preset_duration: f64,
    /// Seconds of a transition towards a new preset.
    pub interpolation_duration: f64,
    /// Default mutation amount, as fraction of a parameter's value range.
    pub mutation_percentage: f32,
    /// Random presets are picked from `1..=max_random_preset`.
    pub max_random_preset: PresetId,
    /// Easing curve of transitions.
    pub easing: Easing,
    /// Seed for mutations and random presets. When None, the engine seeds from entropy.
    pub random_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            folder_path: PathBuf::from(DEFAULT_FOLDER_PATH),
            preset_duration: DEFAULT_PRESET_DURATION,
            interpolation_duration: DEFAULT_INTERPOLATION_DURATION,
            mutation_percentage: DEFAULT_MUTATION_PERCENTAGE,
            max_random_preset: DEFAULT_MAX_RANDOM_PRESET,
            easing: Easing::default(),
            random_seed: None,
        }
    }
}

impl EngineConfig {
    pub fn with_folder_path<P: Into<PathBuf>>(self, folder_path: P) -> Self {
        Self {
            folder_path: folder_path.into(),
            ..self
        }
    }

    pub fn with_preset_duration(self, preset_duration: f64) -> Self {
        Self {
            preset_duration,
            ..self
        }
    }

    pub fn with_interpolation_duration(self, interpolation_duration: f64) -> Self {
        Self {
            interpolation_duration,
            ..self
        }
    }

    pub fn with_mutation_percentage(self, mutation_percentage: f32) -> Self {
        Self {
            mutation_percentage,
            ..self
        }
    }

    /// Set the upper bound of randomly picked presets. Values below 1 are raised to 1.
    pub fn with_max_random_preset(self, max_random_preset: PresetId) -> Self {
        Self {
            max_random_preset: max_random_preset.max(1),
            ..self
        }
    }

    pub fn with_easing(self, easing: Easing) -> Self {
        Self { easing, ..self }
    }

    pub fn with_random_seed(self, seed: u64) -> Self {
        Self {
            random_seed: Some(seed),
            ..self
        }
    }
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.folder_path, Path::new("data"));
        assert_eq!(config.preset_duration, 5.0);
        assert_eq!(config.interpolation_duration, 3.0);
        assert_eq!(config.mutation_percentage, 0.1);
        assert_eq!(config.max_random_preset, 16);
        assert_eq!(config.easing, Easing::CubicInOut);
        assert_eq!(config.random_seed, None);
    }

    #[test]
    fn builders() {
        let config = EngineConfig::default()
            .with_preset_duration(2.0)
            .with_mutation_percentage(0.5)
            .with_max_random_preset(0);
        assert_eq!(config.preset_duration, 2.0);
        assert_eq!(config.mutation_percentage, 0.5);
        assert_eq!(config.max_random_preset, 1);
    }
}
