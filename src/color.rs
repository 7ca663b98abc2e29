//! Color codec for palette entries
//!
//! Colors are plain 24-bit RGB values written as `#RRGGBB`. Parsing is
//! case-insensitive, display is always uppercase. This module also owns the
//! RGB/HSL conversions used by the harmony rules and the luminance-based
//! sustainability score.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for color parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// Input string was empty
    #[error("empty color string")]
    Empty,
    /// Input string doesn't start with '#'
    #[error("color must start with '#'")]
    MissingHash,
    /// Invalid length (must be exactly 6 hex chars after #)
    #[error("invalid color length {0}, expected 6")]
    InvalidLength(usize),
    /// Contains non-hex characters
    #[error("invalid hex character '{0}'")]
    InvalidHex(char),
}

/// A 24-bit RGB color.
///
/// Two colors are equal when their channels match, which is the same as
/// comparing their hex strings case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// A color in HSL space.
///
/// Hue is in degrees `[0, 360)`, saturation and lightness are percentages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

/// Text color that stays readable on top of a swatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextTone {
    /// Dark text, for light swatches
    Dark,
    /// Light text, for dark swatches
    Light,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#RRGGBB` string.
    ///
    /// # Examples
    ///
    /// ```
    /// use ecopalette::color::Color;
    ///
    /// let teal = Color::from_hex("#008080").unwrap();
    /// assert_eq!(teal.rgb(), (0, 128, 128));
    /// assert_eq!(Color::from_hex("#00ff00").unwrap().to_string(), "#00FF00");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `ColorError` if the input is not exactly `#` followed by six
    /// hex digits.
    pub fn from_hex(s: &str) -> Result<Self, ColorError> {
        if s.is_empty() {
            return Err(ColorError::Empty);
        }
        let hex = s.strip_prefix('#').ok_or(ColorError::MissingHash)?;

        // Validate all characters are hex before looking at the length so
        // that "#GG0000" reports the bad digit rather than a length issue
        if let Some(c) = hex.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(ColorError::InvalidHex(c));
        }
        if hex.len() != 6 {
            return Err(ColorError::InvalidLength(hex.len()));
        }

        let bytes = hex.as_bytes();
        Ok(Self {
            r: parse_hex_pair(bytes[0], bytes[1])?,
            g: parse_hex_pair(bytes[2], bytes[3])?,
            b: parse_hex_pair(bytes[4], bytes[5])?,
        })
    }

    /// Channel triple, for display.
    pub fn rgb(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// Perceptual luminance in `[0, 255]` using ITU-R BT.601 weights.
    pub fn luminance(&self) -> f64 {
        (f64::from(self.r) * 299.0 + f64::from(self.g) * 587.0 + f64::from(self.b) * 114.0)
            / 1000.0
    }

    /// Sustainability score in `[0, 100]`; darker colors score higher.
    ///
    /// ```
    /// use ecopalette::color::Color;
    ///
    /// assert_eq!(Color::BLACK.sustainability(), 100);
    /// assert_eq!(Color::WHITE.sustainability(), 0);
    /// ```
    pub fn sustainability(&self) -> u8 {
        (((255.0 - self.luminance()) / 255.0) * 100.0).round() as u8
    }

    /// Convert to HSL.
    pub fn hsl(&self) -> Hsl {
        rgb_to_hsl(self.r, self.g, self.b)
    }

    /// Build a color from HSL components (see [`hsl_to_rgb`]).
    pub fn from_hsl(h: f64, s: f64, l: f64) -> Self {
        hsl_to_rgb(h, s, l)
    }

    /// Text tone for labels drawn over this color.
    pub fn text_tone(&self) -> TextTone {
        if self.sustainability() < 50 {
            TextTone::Dark
        } else {
            TextTone::Light
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::from_hex(s)
    }
}

impl TryFrom<String> for Color {
    type Error = ColorError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Color::from_hex(&s)
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_string()
    }
}

/// Convert RGB channels to HSL.
///
/// Achromatic colors (all channels equal) get hue and saturation 0.
pub fn rgb_to_hsl(r: u8, g: u8, b: u8) -> Hsl {
    let r = f64::from(r) / 255.0;
    let g = f64::from(g) / 255.0;
    let b = f64::from(b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return Hsl { h: 0.0, s: 0.0, l: l * 100.0 };
    }

    let d = max - min;
    let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    Hsl { h: h * 60.0, s: s * 100.0, l: l * 100.0 }
}

/// Convert HSL to an RGB color.
///
/// Hue wraps modulo 360; saturation and lightness are clamped to `[0, 100]`.
/// Channels are rounded to the nearest integer.
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> Color {
    let h = h.rem_euclid(360.0);
    let s = s.clamp(0.0, 100.0) / 100.0;
    let l = l.clamp(0.0, 100.0) / 100.0;

    let a = s * l.min(1.0 - l);
    let channel = |n: f64| {
        let k = (n + h / 30.0) % 12.0;
        let v = l - a * (k - 3.0).min(9.0 - k).min(1.0).max(-1.0);
        (v * 255.0).round().clamp(0.0, 255.0) as u8
    };

    Color::new(channel(0.0), channel(8.0), channel(4.0))
}

/// Parse a single hex digit (0-9, A-F, a-f) to u8 (0-15)
fn parse_hex_digit(c: u8) -> Result<u8, ColorError> {
    match c {
        b'0'..=b'9' => Ok(c - b'0'),
        b'a'..=b'f' => Ok(c - b'a' + 10),
        b'A'..=b'F' => Ok(c - b'A' + 10),
        _ => Err(ColorError::InvalidHex(char::from(c))),
    }
}

/// Parse a two-digit hex pair to u8 (0-255)
fn parse_hex_pair(high: u8, low: u8) -> Result<u8, ColorError> {
    Ok(parse_hex_digit(high)? * 16 + parse_hex_digit(low)?)
}
