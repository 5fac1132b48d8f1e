//! Surface appearance parameters.

use std::fmt;
use std::sync::Arc;

use crate::{Color, Texture};

/// Dielectric parameters for transparent materials.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Refraction {
    /// Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub index: f32,
    /// Fraction of the transmitted light that makes it through (0-1)
    pub transparency: f32,
}

impl Refraction {
    pub fn new(index: f32, transparency: f32) -> Self {
        Self {
            index,
            transparency,
        }
    }
}

/// Material of a shape.
///
/// Built once during scene setup and never mutated afterwards. A texture,
/// when present, fully replaces the base color.
#[derive(Clone)]
pub struct Material {
    /// Base color (linear RGB, 0-1)
    pub color: Color,

    /// Fraction of incident diffuse light reflected
    pub albedo: f32,

    /// Optional texture overriding `color`
    pub texture: Option<Arc<dyn Texture>>,

    /// 0.0 = no reflection, 1.0 = perfect mirror
    pub reflectivity: f32,

    /// Present for transparent materials
    pub refraction: Option<Refraction>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            albedo: 1.0,
            texture: None,
            reflectivity: 0.0,
            refraction: None,
        }
    }
}

impl Material {
    /// Create a diffuse material with the given color and albedo.
    pub fn new(color: Color, albedo: f32) -> Self {
        Self {
            color,
            albedo,
            ..Default::default()
        }
    }

    /// Create a diffuse material with the given color.
    pub fn diffuse(color: Color) -> Self {
        Self::new(color, 1.0)
    }

    pub fn with_texture(mut self, texture: Arc<dyn Texture>) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn with_reflectivity(mut self, reflectivity: f32) -> Self {
        self.reflectivity = reflectivity;
        self
    }

    pub fn with_refraction(mut self, refraction: Refraction) -> Self {
        self.refraction = Some(refraction);
        self
    }

    /// Color at texture coordinates `(u, v)`.
    pub fn color_at(&self, u: f32, v: f32) -> Color {
        match &self.texture {
            Some(texture) => texture.sample(u, v),
            None => self.color,
        }
    }

    pub fn is_reflective(&self) -> bool {
        self.reflectivity > 0.0
    }
}

impl fmt::Debug for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Material")
            .field("color", &self.color)
            .field("albedo", &self.albedo)
            .field("textured", &self.texture.is_some())
            .field("reflectivity", &self.reflectivity)
            .field("refraction", &self.refraction)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Checkerboard;

    #[test]
    fn test_defaults() {
        let m = Material::default();
        assert_eq!(m.color, Color::WHITE);
        assert_eq!(m.albedo, 1.0);
        assert_eq!(m.reflectivity, 0.0);
        assert!(m.texture.is_none());
        assert!(m.refraction.is_none());
        assert!(!m.is_reflective());
    }

    #[test]
    fn test_color_at_without_texture() {
        let m = Material::new(Color::new(0.2, 0.4, 0.6), 0.5);
        assert_eq!(m.color_at(0.3, 0.7), Color::new(0.2, 0.4, 0.6));
        assert_eq!(m.color_at(-100.0, 1e6), Color::new(0.2, 0.4, 0.6));
    }

    #[test]
    fn test_texture_overrides_color() {
        let board = Checkerboard::new(1.0, Color::BLACK, Color::new(0.0, 1.0, 0.0));
        let m = Material::diffuse(Color::WHITE).with_texture(Arc::new(board));

        assert_eq!(m.color_at(0.5, 0.5), Color::BLACK);
        assert_eq!(m.color_at(1.5, 0.5), Color::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_closure_texture() {
        let m = Material::default().with_texture(Arc::new(|u: f32, v: f32| Color::new(u, v, 0.0)));
        assert_eq!(m.color_at(0.25, 0.75), Color::new(0.25, 0.75, 0.0));
    }

    #[test]
    fn test_builders() {
        let glass = Material::diffuse(Color::WHITE)
            .with_reflectivity(0.1)
            .with_refraction(Refraction::new(1.5, 0.9));
        assert!(glass.is_reflective());
        assert_eq!(glass.refraction, Some(Refraction::new(1.5, 0.9)));
    }
}
