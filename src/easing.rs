//! Easing curves for preset transitions.

use std::fmt::Display;

// -------------------------------------------------------------------------------------------------

/// A monotonic easing curve, mapping a normalized time `0..=1` to a normalized progress
/// `0..=1`, applied when tweening parameters towards a preset.
///
/// `Custom` allows plugging in any function. Custom functions should map 0 to 0 and 1 to 1:
/// transitions always snap to the target value when they finished, regardless of the curve.
#[derive(Debug, Clone, Copy, Default)]
pub enum Easing {
    Linear,
    QuadIn,
    QuadOut,
    QuadInOut,
    CubicIn,
    CubicOut,
    #[default]
    CubicInOut,
    QuartIn,
    QuartOut,
    QuartInOut,
    QuintIn,
    QuintOut,
    QuintInOut,
    Custom(fn(f32) -> f32),
}

impl Easing {
    /// All built-in curves.
    pub fn all() -> &'static [Easing] {
        &[
            Self::Linear,
            Self::QuadIn,
            Self::QuadOut,
            Self::QuadInOut,
            Self::CubicIn,
            Self::CubicOut,
            Self::CubicInOut,
            Self::QuartIn,
            Self::QuartOut,
            Self::QuartInOut,
            Self::QuintIn,
            Self::QuintOut,
            Self::QuintInOut,
        ]
    }

    /// Apply the curve to the given time. `t` gets clamped to `0..=1`.
    #[must_use]
    #[inline]
    pub fn ease(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::QuadIn => t * t,
            Self::QuadOut => t * (2.0 - t),
            Self::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Self::CubicIn => t * t * t,
            Self::CubicOut => {
                let t = t - 1.0;
                t * t * t + 1.0
            }
            Self::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    (t - 1.0) * (2.0 * t - 2.0) * (2.0 * t - 2.0) + 1.0
                }
            }
            Self::QuartIn => t * t * t * t,
            Self::QuartOut => {
                let t = t - 1.0;
                1.0 - t * t * t * t
            }
            Self::QuartInOut => {
                if t < 0.5 {
                    8.0 * t * t * t * t
                } else {
                    let t = t - 1.0;
                    1.0 - 8.0 * t * t * t * t
                }
            }
            Self::QuintIn => t * t * t * t * t,
            Self::QuintOut => {
                let t = t - 1.0;
                1.0 + t * t * t * t * t
            }
            Self::QuintInOut => {
                if t < 0.5 {
                    16.0 * t * t * t * t * t
                } else {
                    let t = t - 1.0;
                    1.0 + 16.0 * t * t * t * t * t
                }
            }
            Self::Custom(func) => func(t),
        }
    }

    /// Map `t` (`0..=1`) into the range `start..=end`, applying the curve.
    #[must_use]
    #[inline]
    pub fn interpolate(&self, start: f32, end: f32, t: f32) -> f32 {
        start + (end - start) * self.ease(t)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Linear => "Linear",
            Self::QuadIn => "Quad In",
            Self::QuadOut => "Quad Out",
            Self::QuadInOut => "Quad In-Out",
            Self::CubicIn => "Cubic In",
            Self::CubicOut => "Cubic Out",
            Self::CubicInOut => "Cubic In-Out",
            Self::QuartIn => "Quart In",
            Self::QuartOut => "Quart Out",
            Self::QuartInOut => "Quart In-Out",
            Self::QuintIn => "Quint In",
            Self::QuintOut => "Quint Out",
            Self::QuintInOut => "Quint In-Out",
            Self::Custom(_) => "Custom",
        }
    }
}

// custom curves compare by kind only: function pointer addresses are not unique
impl PartialEq for Easing {
    fn eq(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl Eq for Easing {}

impl Display for Easing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl From<fn(f32) -> f32> for Easing {
    fn from(func: fn(f32) -> f32) -> Self {
        Self::Custom(func)
    }
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_points() {
        for easing in Easing::all() {
            assert!(easing.ease(0.0).abs() < 1e-6, "{easing}");
            assert!((easing.ease(1.0) - 1.0).abs() < 1e-6, "{easing}");
            // clamped
            assert!(easing.ease(-1.0).abs() < 1e-6, "{easing}");
            assert!((easing.ease(2.0) - 1.0).abs() < 1e-6, "{easing}");
        }
    }

    #[test]
    fn monotonic() {
        for easing in Easing::all() {
            let mut last = easing.ease(0.0);
            for step in 1..=100 {
                let value = easing.ease(step as f32 / 100.0);
                assert!(value >= last - 1e-6, "{easing} is not monotonic at {step}");
                last = value;
            }
        }
    }

    #[test]
    fn in_out_curves() {
        assert!((Easing::CubicInOut.ease(0.5) - 0.5).abs() < 1e-6);
        assert!(Easing::CubicInOut.ease(0.25) < 0.25);
        assert!(Easing::CubicInOut.ease(0.75) > 0.75);
        assert_eq!(Easing::Linear.interpolate(10.0, 20.0, 0.5), 15.0);
    }

    #[test]
    fn custom() {
        fn step(t: f32) -> f32 {
            if t < 1.0 {
                0.0
            } else {
                1.0
            }
        }
        let easing = Easing::from(step as fn(f32) -> f32);
        assert_eq!(easing.interpolate(0.0, 10.0, 0.9), 0.0);
        assert_eq!(easing.interpolate(0.0, 10.0, 1.0), 10.0);
        assert_eq!(easing.name(), "Custom");
    }

    #[test]
    fn equality() {
        fn half(t: f32) -> f32 {
            t * 0.5
        }
        assert_eq!(Easing::QuadIn, Easing::QuadIn);
        assert_ne!(Easing::QuadIn, Easing::QuadOut);
        let custom = Easing::from(half as fn(f32) -> f32);
        assert_eq!(custom, Easing::from(half as fn(f32) -> f32));
        assert_ne!(custom, Easing::Linear);
    }
}
