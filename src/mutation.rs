//! Random perturbation of parameter values with bounded Gaussian noise.

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::{Color, ParameterBounds, ParameterGroup, ParameterValue};

// -------------------------------------------------------------------------------------------------

/// Default mutation amount, as fraction of a parameter's value range.
pub const DEFAULT_MUTATION_PERCENTAGE: f32 = 0.1;

/// Value range color channels are mutated in.
const COLOR_CHANNEL_RANGE: f32 = 255.0;

// -------------------------------------------------------------------------------------------------

/// Which values a mutation starts from. Mutations of preset values also vary the saturation
/// of colors, mutations of the current values keep it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationSource {
    /// Perturb the parameters' current values.
    Current,
    /// Perturb the values loaded from a preset.
    Preset,
}

// -------------------------------------------------------------------------------------------------

/// Mutate a single value.
///
/// Adds zero-mean Gaussian noise with a standard deviation of `percentage / 4` of the
/// parameter's value range to numeric values, clamping the result into the bounds. Numeric
/// parameters without finite bounds and booleans are returned as they are. Colors are perturbed in
/// HSB space, with a fixed range of 0-255 for each component.
///
/// A percentage of 0 returns the unmodified value.
pub fn mutate_value<R: Rng + ?Sized>(
    rng: &mut R,
    value: ParameterValue,
    bounds: Option<ParameterBounds>,
    percentage: f32,
    source: MutationSource,
) -> ParameterValue {
    let percentage = percentage.max(0.0);
    if percentage == 0.0 {
        return value;
    }
    match value {
        ParameterValue::Bool(_) => value,
        ParameterValue::Int(current) => match bounds {
            Some(bounds) if bounds.is_finite() => {
                let noise = gaussian(rng, percentage / 4.0 * bounds.range());
                let mutated = bounds.clamp(current as f32 + noise) as i32;
                // truncation may leave fractional bounds
                let (min, max) = (bounds.min().ceil() as i32, bounds.max().floor() as i32);
                if min <= max {
                    ParameterValue::Int(mutated.clamp(min, max))
                } else {
                    ParameterValue::Int(mutated)
                }
            }
            _ => value,
        },
        ParameterValue::Float(current) => match bounds {
            Some(bounds) if bounds.is_finite() => {
                let noise = gaussian(rng, percentage / 4.0 * bounds.range());
                ParameterValue::Float(bounds.clamp(current + noise))
            }
            _ => value,
        },
        ParameterValue::Color(color) => {
            ParameterValue::Color(mutate_color(rng, color, percentage, source))
        }
    }
}

/// Mutate the given values of a parameter group, using the group's bounds.
pub fn mutate_values<R, I>(
    rng: &mut R,
    group: &dyn ParameterGroup,
    values: I,
    percentage: f32,
    source: MutationSource,
) -> Vec<(String, ParameterValue)>
where
    R: Rng + ?Sized,
    I: IntoIterator<Item = (String, ParameterValue)>,
{
    values
        .into_iter()
        .map(|(key, value)| {
            let bounds = group.bounds(&key);
            let mutated = mutate_value(rng, value, bounds, percentage, source);
            log::trace!(target: "Mutator",
                "Mutated '{}.{}' from {} to {}", group.name(), key, value, mutated);
            (key, mutated)
        })
        .collect()
}

/// Mutate all current values of a parameter group.
pub fn mutate_group<R: Rng + ?Sized>(
    rng: &mut R,
    group: &dyn ParameterGroup,
    percentage: f32,
) -> Vec<(String, ParameterValue)> {
    let current = group
        .keys()
        .into_iter()
        .filter_map(|key| group.value(&key).map(|value| (key, value)));
    mutate_values(rng, group, current, percentage, MutationSource::Current)
}

// -------------------------------------------------------------------------------------------------

fn mutate_color<R: Rng + ?Sized>(
    rng: &mut R,
    color: Color,
    percentage: f32,
    source: MutationSource,
) -> Color {
    let std_dev = percentage / 4.0 * COLOR_CHANNEL_RANGE;
    let mut channel = |value: f32| (value + gaussian(rng, std_dev)).clamp(0.0, COLOR_CHANNEL_RANGE);
    let (hue, saturation, brightness) = color.hsb();
    let hue = channel(hue);
    let saturation = match source {
        MutationSource::Preset => channel(saturation),
        MutationSource::Current => saturation,
    };
    let brightness = channel(brightness);
    let alpha = channel(color.a as f32) as u8;
    Color::from_hsb(hue, saturation, brightness, alpha)
}

// Zero-mean Gaussian sample. Returns 0 for degenerated deviations.
fn gaussian<R: Rng + ?Sized>(rng: &mut R, std_dev: f32) -> f32 {
    if !std_dev.is_finite() || std_dev <= 0.0 {
        return 0.0;
    }
    match Normal::new(0.0, std_dev) {
        Ok(normal) => normal.sample(rng),
        Err(err) => {
            log::error!(target: "Mutator", "Invalid normal distribution: {err}");
            0.0
        }
    }
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    use super::*;
    use crate::ParameterMap;

    #[test]
    fn stays_within_bounds() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0x1234);
        let float_bounds = ParameterBounds::new(-1.0, 1.0);
        let int_bounds = ParameterBounds::new(0.0, 10.0);
        for _ in 0..2000 {
            let value = mutate_value(
                &mut rng,
                ParameterValue::Float(0.9),
                Some(float_bounds),
                1.0,
                MutationSource::Current,
            );
            let ParameterValue::Float(value) = value else {
                panic!("unexpected type");
            };
            assert!((-1.0..=1.0).contains(&value));

            let value = mutate_value(
                &mut rng,
                ParameterValue::Int(10),
                Some(int_bounds),
                1.0,
                MutationSource::Preset,
            );
            let ParameterValue::Int(value) = value else {
                panic!("unexpected type");
            };
            assert!((0..=10).contains(&value));
        }
    }

    #[test]
    fn zero_percentage_is_a_no_op() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        for value in [
            ParameterValue::Float(0.5),
            ParameterValue::Int(3),
            ParameterValue::Color(Color::rgba(10, 20, 30, 40)),
        ] {
            let bounds = Some(ParameterBounds::new(0.0, 1.0));
            assert_eq!(
                mutate_value(&mut rng, value, bounds, 0.0, MutationSource::Preset),
                value
            );
        }
    }

    #[test]
    fn untouched_values() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(2);
        assert_eq!(
            mutate_value(&mut rng, ParameterValue::Bool(true), None, 1.0, MutationSource::Current),
            ParameterValue::Bool(true)
        );
        assert_eq!(
            mutate_value(&mut rng, ParameterValue::Float(7.0), None, 1.0, MutationSource::Current),
            ParameterValue::Float(7.0)
        );
    }

    #[test]
    fn degenerated_bounds() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(5);
        // reversed bounds get swapped
        let value = mutate_value(
            &mut rng,
            ParameterValue::Float(5.0),
            Some(ParameterBounds::new(10.0, 0.0)),
            0.5,
            MutationSource::Current,
        );
        let ParameterValue::Float(value) = value else {
            panic!("unexpected type");
        };
        assert!((0.0..=10.0).contains(&value));
        // non-finite bounds skip the mutation
        for bounds in [
            ParameterBounds::new(f32::NAN, 10.0),
            ParameterBounds::new(0.0, f32::INFINITY),
        ] {
            assert_eq!(
                mutate_value(
                    &mut rng,
                    ParameterValue::Float(5.0),
                    Some(bounds),
                    0.5,
                    MutationSource::Current
                ),
                ParameterValue::Float(5.0)
            );
            assert_eq!(
                mutate_value(
                    &mut rng,
                    ParameterValue::Int(5),
                    Some(bounds),
                    0.5,
                    MutationSource::Preset
                ),
                ParameterValue::Int(5)
            );
        }
    }

    #[test]
    fn current_mutations_keep_saturation() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
        let grey = Color::rgba(128, 128, 128, 255);
        for _ in 0..100 {
            let value = mutate_value(
                &mut rng,
                ParameterValue::Color(grey),
                None,
                0.5,
                MutationSource::Current,
            );
            let ParameterValue::Color(color) = value else {
                panic!("unexpected type");
            };
            // a grey without saturation stays grey
            assert!(color.r == color.g && color.g == color.b);
        }
    }

    #[test]
    fn group_mutation() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(4);
        let group = ParameterMap::new("params")
            .with_bounds("x", 50, 0.0, 100.0)
            .with("enabled", false);
        let mutated = mutate_group(&mut rng, &group, 0.5);
        assert_eq!(mutated.len(), 2);
        assert!(mutated
            .iter()
            .any(|(key, value)| key == "enabled" && *value == ParameterValue::Bool(false)));
        assert!(mutated.iter().any(|(key, value)| key == "x"
            && matches!(value, ParameterValue::Int(x) if (0..=100).contains(x))));
    }
}
