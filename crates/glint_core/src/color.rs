//! Linear RGB color with saturating arithmetic.
//!
//! Every arithmetic result is clamped to at most 1.0 per channel. Shading is
//! done entirely in linear space; [`Color::gamma_encode`] is applied once,
//! when a pixel is handed to the output canvas.

use std::ops::{Add, AddAssign, Mul};

use glint_math::Vec3;
use thiserror::Error;

/// Display gamma used for output encoding.
pub const GAMMA: f32 = 2.2;

/// Errors that can occur when parsing colors.
#[derive(Error, Debug, PartialEq)]
pub enum ColorError {
    #[error("Expected a #RRGGBB hex color, got {0:?}")]
    InvalidHex(String),
}

pub type ColorResult<T> = Result<T, ColorError>;

/// An RGB color, each channel conceptually in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);

    /// Create a color from linear channel values.
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create a gray color with all channels set to `value`.
    pub const fn splat(value: f32) -> Self {
        Self::new(value, value, value)
    }

    /// Create a color from 8-bit channels.
    pub fn from_rgb8(rgb: [u8; 3]) -> Self {
        Self::new(
            rgb[0] as f32 / 255.0,
            rgb[1] as f32 / 255.0,
            rgb[2] as f32 / 255.0,
        )
    }

    /// Parse an HTML-style `#RRGGBB` (or `RRGGBB`) string.
    pub fn from_hex(hex: &str) -> ColorResult<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(ColorError::InvalidHex(hex.to_string()));
        }

        let mut rgb = [0u8; 3];
        for (i, channel) in rgb.iter_mut().enumerate() {
            *channel = u8::from_str_radix(&digits[i * 2..i * 2 + 2], 16)
                .map_err(|_| ColorError::InvalidHex(hex.to_string()))?;
        }

        Ok(Self::from_rgb8(rgb))
    }

    /// Convert to 8-bit channels, clamping to [0, 1] first and rounding to nearest.
    pub fn to_rgb8(&self) -> [u8; 3] {
        [
            (255.0 * self.r.clamp(0.0, 1.0)).round() as u8,
            (255.0 * self.g.clamp(0.0, 1.0)).round() as u8,
            (255.0 * self.b.clamp(0.0, 1.0)).round() as u8,
        ]
    }

    /// Format as `#rrggbb`.
    pub fn to_hex(&self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }

    /// Linear to display encoding (exponent 1/2.2).
    pub fn gamma_encode(&self) -> Self {
        self.map(|c| c.max(0.0).powf(1.0 / GAMMA))
    }

    /// Display to linear decoding (exponent 2.2).
    pub fn gamma_decode(&self) -> Self {
        self.map(|c| c.max(0.0).powf(GAMMA))
    }

    /// Largest channel value.
    pub fn max_channel(&self) -> f32 {
        self.r.max(self.g).max(self.b)
    }

    fn map(&self, f: impl Fn(f32) -> f32) -> Self {
        Self::new(f(self.r), f(self.g), f(self.b))
    }

    fn saturate(self) -> Self {
        self.map(|c| c.min(1.0))
    }
}

impl From<Vec3> for Color {
    fn from(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<[f32; 3]> for Color {
    fn from(rgb: [f32; 3]) -> Self {
        Self::new(rgb[0], rgb[1], rgb[2])
    }
}

impl Add for Color {
    type Output = Color;

    fn add(self, other: Color) -> Color {
        Color::new(self.r + other.r, self.g + other.g, self.b + other.b).saturate()
    }
}

impl AddAssign for Color {
    fn add_assign(&mut self, other: Color) {
        *self = *self + other;
    }
}

impl Mul for Color {
    type Output = Color;

    fn mul(self, other: Color) -> Color {
        Color::new(self.r * other.r, self.g * other.g, self.b * other.b).saturate()
    }
}

impl Mul<f32> for Color {
    type Output = Color;

    fn mul(self, scale: f32) -> Color {
        self.map(|c| c * scale).saturate()
    }
}
