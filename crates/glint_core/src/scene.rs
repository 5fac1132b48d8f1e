//! Scene container and closest-hit search.
//!
//! A scene is built once and then only read while rendering, so it can be
//! shared freely between render threads.

use glint_math::{Interval, Ray};

use crate::{Color, Light, Shape};

/// Image and camera parameters that travel with a scene description.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View {
    pub width: u32,
    pub height: u32,
    /// Horizontal field of view in degrees
    pub fov: f32,
    /// Color of pixels whose primary ray hits nothing
    pub background: Color,
}

impl Default for View {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            fov: 90.0,
            background: Color::BLACK,
        }
    }
}

/// The nearest shape along a ray.
#[derive(Clone, Copy)]
pub struct Intersection<'a> {
    pub shape: &'a dyn Shape,
    pub distance: f32,
}

/// Shapes and lights to render.
#[derive(Default)]
pub struct Scene {
    shapes: Vec<Box<dyn Shape>>,
    lights: Vec<Box<dyn Light>>,
}

impl Scene {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a shape. Shapes are searched in insertion order.
    pub fn add_shape(&mut self, shape: impl Shape + 'static) {
        self.shapes.push(Box::new(shape));
    }

    pub fn add_light(&mut self, light: impl Light + 'static) {
        self.lights.push(Box::new(light));
    }

    pub fn with_shape(mut self, shape: impl Shape + 'static) -> Self {
        self.add_shape(shape);
        self
    }

    pub fn with_light(mut self, light: impl Light + 'static) -> Self {
        self.add_light(light);
        self
    }

    pub fn shapes(&self) -> &[Box<dyn Shape>] {
        &self.shapes
    }

    pub fn lights(&self) -> &[Box<dyn Light>] {
        &self.lights
    }

    /// Find the shape with the nearest positive intersection along `ray`.
    ///
    /// Brute-force scan over every shape. On equal distances the shape added
    /// first wins.
    pub fn closest_intersection(&self, ray: &Ray) -> Option<Intersection<'_>> {
        let mut closest: Option<Intersection<'_>> = None;

        for shape in &self.shapes {
            let Some(distance) = shape.intersect(ray) else {
                continue;
            };
            if !Interval::FORWARD.surrounds(distance) {
                continue;
            }
            if closest.map_or(true, |c| distance < c.distance) {
                closest = Some(Intersection {
                    shape: shape.as_ref(),
                    distance,
                });
            }
        }

        closest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DirectionalLight, Material, Plane, Sphere};
    use glint_math::Vec3;

    fn colored(r: f32, g: f32, b: f32) -> Material {
        Material::diffuse(Color::new(r, g, b))
    }

    #[test]
    fn test_empty_scene_has_no_hits() {
        let scene = Scene::new();
        assert!(scene.closest_intersection(&Ray::new(Vec3::ZERO, -Vec3::Z)).is_none());
    }

    #[test]
    fn test_closest_hit_picks_nearest() {
        let scene = Scene::new()
            .with_shape(Sphere::new(Vec3::new(0.0, 0.0, -10.0), 1.0, colored(1.0, 0.0, 0.0)))
            .with_shape(Sphere::new(Vec3::new(0.0, 0.0, -4.0), 1.0, colored(0.0, 1.0, 0.0)))
            .with_shape(Plane::new(Vec3::new(0.0, 0.0, -20.0), -Vec3::Z, colored(0.0, 0.0, 1.0)));

        let hit = scene
            .closest_intersection(&Ray::new(Vec3::ZERO, -Vec3::Z))
            .unwrap();
        assert!((hit.distance - 3.0).abs() < 1e-5);
        assert_eq!(hit.shape.material().color, Color::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_behind_origin_is_not_a_hit() {
        let scene = Scene::new().with_shape(Sphere::new(Vec3::new(0.0, 0.0, 5.0), 1.0, Material::default()));
        assert!(scene.closest_intersection(&Ray::new(Vec3::ZERO, -Vec3::Z)).is_none());
    }

    #[test]
    fn test_ties_go_to_first_inserted() {
        let scene = Scene::new()
            .with_shape(Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, colored(1.0, 0.0, 0.0)))
            .with_shape(Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, colored(0.0, 1.0, 0.0)));

        let hit = scene
            .closest_intersection(&Ray::new(Vec3::ZERO, -Vec3::Z))
            .unwrap();
        assert_eq!(hit.shape.material().color, Color::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_lights_are_kept_in_order() {
        let mut scene = Scene::new();
        scene.add_light(DirectionalLight::new(-Vec3::Y, Color::WHITE, 1.0));
        scene.add_light(DirectionalLight::new(-Vec3::Z, Color::WHITE, 2.0));

        assert_eq!(scene.lights().len(), 2);
        assert_eq!(scene.lights()[1].intensity_at(Vec3::ZERO), 2.0);
    }

    #[test]
    fn test_default_view() {
        let view = View::default();
        assert_eq!((view.width, view.height), (512, 512));
        assert_eq!(view.fov, 90.0);
        assert_eq!(view.background, Color::BLACK);
    }
}
