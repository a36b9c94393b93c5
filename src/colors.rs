//! Color values for the trace
//!
//! This module holds the color type shared by the engine and the renderer,
//! the default cold/hot endpoints of the fading tail, and the gradient helper.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// RGB color with components in `[0.0, 1.0]`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

// Gradient endpoints
pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

/// Oldest end of the animated tail
pub const COLD: Rgb = BLACK;
/// Newest end of the animated tail
pub const HOT: Rgb = WHITE;
/// Uniform color of the static trace
pub const FROZEN: Rgb = WHITE;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("expected 6 hex digits, got {0:?}")]
    Length(String),
    #[error("invalid hex color {0:?}")]
    Digits(String),
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    pub fn to_rgb8(self) -> [u8; 3] {
        [to_u8(self.r), to_u8(self.g), to_u8(self.b)]
    }

    /// Relative luminance (Rec. 709 weights), used to order colors from cold to hot
    pub fn luminance(&self) -> f32 {
        0.2126 * self.r + 0.7152 * self.g + 0.0722 * self.b
    }

    /// Parse `#rrggbb` (the leading `#` is optional)
    pub fn from_hex(value: &str) -> Result<Self, ColorParseError> {
        let digits = value.trim().trim_start_matches('#');
        if digits.len() != 6 {
            return Err(ColorParseError::Length(value.to_string()));
        }

        let mut bytes = [0u8; 3];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|_| ColorParseError::Digits(value.to_string()))?;

        Ok(Self::from_rgb8(bytes[0], bytes[1], bytes[2]))
    }

    pub fn to_hex(self) -> String {
        format!("#{}", hex::encode(self.to_rgb8()))
    }
}

fn to_u8(component: f32) -> u8 {
    (component.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Linear interpolation between two colors, `f` in `[0, 1]`
pub fn lerp(from: Rgb, to: Rgb, f: f32) -> Rgb {
    Rgb {
        r: from.r + (to.r - from.r) * f,
        g: from.g + (to.g - from.g) * f,
        b: from.b + (to.b - from.b) * f,
    }
}

/// Color of buffer slot `index` in a gradient spanning `len` slots
///
/// Slot 0 is `cold`, slot `len - 1` is `hot`. A single slot is `cold`.
pub fn gradient_color(index: usize, len: usize, cold: Rgb, hot: Rgb) -> Rgb {
    if len <= 1 {
        return cold;
    }
    lerp(cold, hot, index as f32 / (len - 1) as f32)
}

// Colors are stored as hex strings in the config file
impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Rgb::from_hex(&value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_endpoints() {
        assert_eq!(gradient_color(0, 10, COLD, HOT), COLD);
        assert_eq!(gradient_color(9, 10, COLD, HOT), HOT);
        assert_eq!(gradient_color(0, 1, COLD, HOT), COLD);
        assert_eq!(gradient_color(0, 0, COLD, HOT), COLD);
    }

    #[test]
    fn test_gradient_is_monotonic() {
        let len = 37;
        let mut prev = gradient_color(0, len, COLD, HOT).luminance();
        for i in 1..len {
            let next = gradient_color(i, len, COLD, HOT).luminance();
            assert!(next > prev, "slot {} not hotter than slot {}", i, i - 1);
            prev = next;
        }
    }

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Rgb::from_hex("#ffffff").unwrap(), WHITE);
        assert_eq!(Rgb::from_hex("000000").unwrap(), BLACK);
        assert_eq!(Rgb::from_hex("#3498db").unwrap().to_rgb8(), [52, 152, 219]);
        assert!(matches!(Rgb::from_hex("#fff"), Err(ColorParseError::Length(_))));
        assert!(matches!(Rgb::from_hex("#gg0000"), Err(ColorParseError::Digits(_))));
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(Rgb::from_rgb8(231, 76, 60).to_hex(), "#e74c3c");
    }
}
