//! Light sources.

use std::f32::consts::PI;

use glint_math::Vec3;

use crate::Color;

/// A source of direct illumination.
pub trait Light: Send + Sync {
    fn color(&self) -> Color;

    /// Unit vector pointing from `point` toward the light.
    fn direction_from(&self, point: Vec3) -> Vec3;

    /// Light intensity arriving at `point`, ignoring occlusion.
    fn intensity_at(&self, point: Vec3) -> f32;

    /// Distance from `point` to the light. Infinite for lights that are
    /// modeled as infinitely far away.
    fn distance_from(&self, point: Vec3) -> f32;
}

/// Parallel light from an infinitely distant source, like the sun.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// Direction the light travels in (normalized)
    pub direction: Vec3,
    pub color: Color,
    pub intensity: f32,
}

impl DirectionalLight {
    pub fn new(direction: Vec3, color: Color, intensity: f32) -> Self {
        Self {
            direction: direction.normalize_or_zero(),
            color,
            intensity,
        }
    }
}

impl Light for DirectionalLight {
    fn color(&self) -> Color {
        self.color
    }

    fn direction_from(&self, _point: Vec3) -> Vec3 {
        -self.direction
    }

    fn intensity_at(&self, _point: Vec3) -> f32 {
        self.intensity
    }

    fn distance_from(&self, _point: Vec3) -> f32 {
        f32::INFINITY
    }
}

/// Point light radiating equally in all directions, with inverse-square
/// falloff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalLight {
    pub position: Vec3,
    pub color: Color,
    pub intensity: f32,
}

impl SphericalLight {
    pub fn new(position: Vec3, color: Color, intensity: f32) -> Self {
        Self {
            position,
            color,
            intensity,
        }
    }
}

impl Light for SphericalLight {
    fn color(&self) -> Color {
        self.color
    }

    fn direction_from(&self, point: Vec3) -> Vec3 {
        (self.position - point).normalize_or_zero()
    }

    fn intensity_at(&self, point: Vec3) -> f32 {
        let r2 = (self.position - point).length_squared();
        self.intensity / (4.0 * PI * r2)
    }

    fn distance_from(&self, point: Vec3) -> f32 {
        (self.position - point).length()
    }
}
