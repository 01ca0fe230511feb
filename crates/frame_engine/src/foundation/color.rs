//! Linear RGB color used for tints, uniforms and clear colors

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// RGB color with channels nominally in [0, 1]
///
/// Serializes as a `"#RRGGBB"` string so config files can use the same
/// notation as a color picker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    /// Red channel
    pub r: f32,
    /// Green channel
    pub g: f32,
    /// Blue channel
    pub b: f32,
}

/// Errors produced when parsing a hex color string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    /// String is not `#RRGGBB` or `RRGGBB`
    #[error("Invalid color '{0}', expected #RRGGBB")]
    InvalidFormat(String),
}

impl Color {
    /// Opaque black
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);

    /// Opaque white
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    /// Create a color from channel values
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create a color from a packed `0xRRGGBB` value
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| f32::from(((hex >> shift) & 0xFF) as u8) / 255.0;
        Self::new(channel(16), channel(8), channel(0))
    }

    /// Pack the color back into `0xRRGGBB`, clamping each channel
    pub fn to_hex(self) -> u32 {
        let clamped = self.clamped();
        let channel = |value: f32| (value * 255.0).round() as u32;
        (channel(clamped.r) << 16) | (channel(clamped.g) << 8) | channel(clamped.b)
    }

    /// Copy of this color with every channel clamped to [0, 1]
    pub fn clamped(self) -> Self {
        use super::math::utils::clamp;
        Self::new(clamp(self.r, 0.0, 1.0), clamp(self.g, 0.0, 1.0), clamp(self.b, 0.0, 1.0))
    }

    /// Whether every channel already lies in [0, 1]
    pub fn is_in_range(self) -> bool {
        [self.r, self.g, self.b].iter().all(|c| (0.0..=1.0).contains(c))
    }

    /// Channels as a `vec4` with alpha 1, the layout shaders expect
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, 1.0]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidFormat(s.to_string()));
        }
        u32::from_str_radix(digits, 16)
            .map(Self::from_hex)
            .map_err(|_| ColorParseError::InvalidFormat(s.to_string()))
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_hex_string() {
        let color: Color = "#ED3080".parse().unwrap();
        assert_relative_eq!(color.r, 237.0 / 255.0);
        assert_relative_eq!(color.g, 48.0 / 255.0);
        assert_relative_eq!(color.b, 128.0 / 255.0);
        assert_eq!(color.to_string(), "#ED3080");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("#12345".parse::<Color>().is_err());
        assert!("#GGGGGG".parse::<Color>().is_err());
        assert!("".parse::<Color>().is_err());
    }

    #[test]
    fn test_clamped_channels() {
        let color = Color::new(1.5, -0.2, 0.5).clamped();
        assert_eq!(color, Color::new(1.0, 0.0, 0.5));
        assert!(color.is_in_range());
        assert!(!Color::new(f32::NAN, 0.0, 0.0).is_in_range());
    }

    #[test]
    fn test_serde_uses_hex_notation() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            tint: Color,
        }

        let parsed: Wrapper = toml::from_str("tint = \"#F7D5E0\"").unwrap();
        assert_eq!(parsed.tint, Color::from_hex(0xF7D5E0));

        let written = toml::to_string(&parsed).unwrap();
        assert!(written.contains("#F7D5E0"));
    }
}
