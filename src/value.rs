//! Typed parameter values as exposed by a [`ParameterGroup`](crate::ParameterGroup).

use std::fmt::Display;

// -------------------------------------------------------------------------------------------------

/// An 8-bit RGB color with a separate alpha channel.
///
/// Presets store colors as packed `0xRRGGBB` hex value plus an alpha value, so this is the
/// representation the engine works with. HSB accessors use a `0..=255` scale for all three
/// components, which is the space the mutation engine perturbs colors in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Default for Color {
    fn default() -> Self {
        Self::rgba(0, 0, 0, 255)
    }
}

impl Color {
    /// Create a new, fully opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a new color with the given alpha value.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from a packed `0xRRGGBB` value and an alpha value.
    /// Bits above the lower 24 bits are ignored.
    pub const fn from_hex(hex: u32, alpha: u8) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as u8,
            g: ((hex >> 8) & 0xFF) as u8,
            b: (hex & 0xFF) as u8,
            a: alpha,
        }
    }

    /// Packed `0xRRGGBB` value, without alpha.
    pub const fn hex(&self) -> u32 {
        (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    /// Hue, saturation and brightness, each in range `0.0..=255.0`.
    pub fn hsb(&self) -> (f32, f32, f32) {
        let (r, g, b) = (self.r as f32, self.g as f32, self.b as f32);
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        if max == min {
            // greys have no hue
            return (0.0, 0.0, max);
        }
        let range = max - min;
        let mut hue_sixth = if r == max {
            (g - b) / range
        } else if g == max {
            2.0 + (b - r) / range
        } else {
            4.0 + (r - g) / range
        };
        if hue_sixth < 0.0 {
            hue_sixth += 6.0;
        }
        let hue = hue_sixth * 255.0 / 6.0;
        let saturation = range / max * 255.0;
        (hue, saturation, max)
    }

    /// Create a color from hue, saturation and brightness values in range `0.0..=255.0`.
    /// Values outside of the range get clamped.
    pub fn from_hsb(hue: f32, saturation: f32, brightness: f32, alpha: u8) -> Self {
        let hue = hue.clamp(0.0, 255.0);
        let saturation = saturation.clamp(0.0, 255.0);
        let brightness = brightness.clamp(0.0, 255.0);
        if brightness == 0.0 {
            return Self::rgba(0, 0, 0, alpha);
        }
        if saturation == 0.0 {
            let grey = brightness.round() as u8;
            return Self::rgba(grey, grey, grey, alpha);
        }
        let hue_six = hue * 6.0 / 255.0;
        let category = hue_six.floor();
        let remainder = hue_six - category;
        let saturation = saturation / 255.0;
        let pv = (1.0 - saturation) * brightness;
        let qv = (1.0 - saturation * remainder) * brightness;
        let tv = (1.0 - saturation * (1.0 - remainder)) * brightness;
        let (r, g, b) = match category as u32 {
            1 => (qv, brightness, pv),
            2 => (pv, brightness, tv),
            3 => (pv, qv, brightness),
            4 => (tv, pv, brightness),
            5 => (brightness, pv, qv),
            // 0 and 6 (a full turn)
            _ => (brightness, tv, pv),
        };
        let channel = |v: f32| v.round().clamp(0.0, 255.0) as u8;
        Self::rgba(channel(r), channel(g), channel(b), alpha)
    }

    /// Linearly blend all channels, including alpha, towards `other` by `t` (`0..=1`).
    pub fn lerp(&self, other: &Color, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let blend = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t) as u8;
        Self {
            r: blend(self.r, other.r),
            g: blend(self.g, other.g),
            b: blend(self.b, other.b),
            a: blend(self.a, other.a),
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:06X} (alpha {})", self.hex(), self.a)
    }
}

// -------------------------------------------------------------------------------------------------

/// Kind of a [`ParameterValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterType {
    Boolean,
    Integer,
    Float,
    Color,
}

impl ParameterType {
    /// Lower case display name, as used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Color => "color",
        }
    }
}

impl Display for ParameterType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// -------------------------------------------------------------------------------------------------

/// A single parameter value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParameterValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Color(Color),
}

impl ParameterValue {
    /// The value's type.
    pub fn parameter_type(&self) -> ParameterType {
        match self {
            Self::Bool(_) => ParameterType::Boolean,
            Self::Int(_) => ParameterType::Integer,
            Self::Float(_) => ParameterType::Float,
            Self::Color(_) => ParameterType::Color,
        }
    }

    /// Numeric values as float, None for booleans and colors.
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Self::Int(value) => Some(*value as f32),
            Self::Float(value) => Some(*value),
            Self::Bool(_) | Self::Color(_) => None,
        }
    }
}

impl From<bool> for ParameterValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for ParameterValue {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<f32> for ParameterValue {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<Color> for ParameterValue {
    fn from(value: Color) -> Self {
        Self::Color(value)
    }
}

impl Display for ParameterValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value:.3}"),
            Self::Color(value) => write!(f, "{value}"),
        }
    }
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex() {
        let color = Color::from_hex(0x12AB34, 128);
        assert_eq!(color, Color::rgba(0x12, 0xAB, 0x34, 128));
        assert_eq!(color.hex(), 0x12AB34);
        assert_eq!(Color::from_hex(0xFF000000, 255).hex(), 0);
    }

    #[test]
    fn hsb() {
        assert_eq!(Color::rgb(255, 0, 0).hsb(), (0.0, 255.0, 255.0));
        assert_eq!(Color::rgb(100, 100, 100).hsb(), (0.0, 0.0, 100.0));
        for color in [
            Color::rgb(255, 0, 0),
            Color::rgb(0, 255, 0),
            Color::rgb(0, 0, 255),
            Color::rgb(200, 30, 90),
            Color::rgba(12, 240, 180, 7),
        ] {
            let (h, s, b) = color.hsb();
            let converted = Color::from_hsb(h, s, b, color.a);
            // allow rounding errors of one step per channel
            assert!((converted.r as i32 - color.r as i32).abs() <= 1, "{color}");
            assert!((converted.g as i32 - color.g as i32).abs() <= 1, "{color}");
            assert!((converted.b as i32 - color.b as i32).abs() <= 1, "{color}");
            assert_eq!(converted.a, color.a);
        }
        assert_eq!(Color::from_hsb(20.0, 80.0, 0.0, 10), Color::rgba(0, 0, 0, 10));
    }

    #[test]
    fn lerp() {
        let from = Color::rgba(0, 100, 200, 0);
        let to = Color::rgba(200, 100, 0, 255);
        assert_eq!(from.lerp(&to, 0.0), from);
        assert_eq!(from.lerp(&to, 1.0), to);
        assert_eq!(from.lerp(&to, 0.5), Color::rgba(100, 100, 100, 127));
    }

    #[test]
    fn value_types() {
        assert_eq!(ParameterValue::from(2_i32).parameter_type(), ParameterType::Integer);
        assert_eq!(ParameterValue::from(2.5_f32).as_f32(), Some(2.5));
        assert_eq!(ParameterValue::from(true).as_f32(), None);
        assert_eq!(ParameterType::Color.to_string(), "color");
    }
}
