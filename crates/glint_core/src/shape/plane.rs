//! Infinite plane primitive.

use glint_math::{Ray, Vec2, Vec3};

use super::{unit_direction, Shape};
use crate::Material;

/// Rays whose direction has a smaller component along the normal than this
/// are treated as parallel to the plane.
pub const PARALLEL_EPSILON: f32 = 1e-3;

/// An infinite plane through `origin`.
///
/// `normal` points away from the visible side: a floor seen from above has
/// normal `(0, -1, 0)`. Rays hit the plane only when travelling along the
/// normal, and [`Shape::surface_normal`] reports the flipped normal so it
/// faces back toward them.
#[derive(Debug, Clone)]
pub struct Plane {
    pub origin: Vec3,
    pub normal: Vec3,
    pub material: Material,
}

impl Plane {
    /// Create a new plane. The normal is normalized here.
    pub fn new(origin: Vec3, normal: Vec3, material: Material) -> Self {
        Self {
            origin,
            normal: normal.normalize_or_zero(),
            material,
        }
    }

    /// Two in-plane axes used for texture mapping.
    fn texture_axes(&self) -> (Vec3, Vec3) {
        let mut x_axis = self.normal.cross(Vec3::Z);
        if x_axis.length_squared() < 1e-12 {
            // Normal is along Z, so Y is a safe reference instead
            x_axis = self.normal.cross(Vec3::Y);
        }
        let x_axis = x_axis.normalize_or_zero();
        let y_axis = self.normal.cross(x_axis);
        (x_axis, y_axis)
    }
}

impl Shape for Plane {
    fn intersect(&self, ray: &Ray) -> Option<f32> {
        let (direction, length) = unit_direction(ray)?;

        // Also rejects back-facing rays
        let denom = self.normal.dot(direction);
        if denom < PARALLEL_EPSILON {
            return None;
        }

        let distance = (self.origin - ray.origin).dot(self.normal) / denom;
        if distance > 0.0 {
            Some(distance / length)
        } else {
            None
        }
    }

    fn surface_normal(&self, _hit_point: Vec3) -> Vec3 {
        -self.normal
    }

    fn texture_coordinates(&self, hit_point: Vec3) -> Vec2 {
        let (x_axis, y_axis) = self.texture_axes();
        let hit_vec = hit_point - self.origin;
        Vec2::new(hit_vec.dot(x_axis), hit_vec.dot(y_axis))
    }

    fn material(&self) -> &Material {
        &self.material
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor() -> Plane {
        Plane::new(Vec3::new(0.0, -2.0, -5.0), Vec3::new(0.0, -1.0, 0.0), Material::default())
    }

    #[test]
    fn test_plane_hit() {
        let plane = floor();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, -1.0, 0.0));
        let distance = plane.intersect(&ray).unwrap();
        assert!((distance - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_plane_oblique_hit_lands_on_plane() {
        let plane = floor();
        let ray = Ray::normalized(Vec3::ZERO, Vec3::new(0.3, -0.5, -1.0));
        let t = plane.intersect(&ray).unwrap();
        assert!((ray.at(t).y + 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_parallel_ray_never_hits() {
        let plane = floor();
        for origin in [Vec3::ZERO, Vec3::new(0.0, -2.0, 0.0), Vec3::new(5.0, -10.0, 3.0)] {
            let ray = Ray::new(origin, Vec3::new(0.0, 0.0, -1.0));
            assert!(plane.intersect(&ray).is_none(), "hit from {:?}", origin);
        }

        // Nearly parallel, within epsilon
        let grazing = Ray::normalized(Vec3::ZERO, Vec3::new(0.0, -1e-4, -1.0));
        assert!(plane.intersect(&grazing).is_none());
    }

    #[test]
    fn test_back_side_and_behind_are_misses() {
        let plane = floor();

        // Travelling against the normal
        let up = Ray::new(Vec3::new(0.0, -5.0, 0.0), Vec3::Y);
        assert!(plane.intersect(&up).is_none());

        // Plane is behind the origin
        let below = Ray::new(Vec3::new(0.0, -5.0, 0.0), -Vec3::Y);
        assert!(plane.intersect(&below).is_none());
    }

    #[test]
    fn test_surface_normal_faces_viewer() {
        let plane = floor();
        assert_eq!(plane.surface_normal(Vec3::ZERO), Vec3::Y);
    }

    #[test]
    fn test_texture_coordinates_are_planar() {
        let plane = floor();
        let at_origin = plane.texture_coordinates(plane.origin);
        assert!(at_origin.length() < 1e-6);

        // Moving one unit inside the plane moves uv by one unit
        let moved = plane.texture_coordinates(plane.origin + Vec3::X);
        assert!((moved.length() - 1.0).abs() < 1e-5);

        // Coordinates are unbounded
        let far = plane.texture_coordinates(plane.origin + Vec3::new(100.0, 0.0, 0.0));
        assert!(far.length() > 99.0);
    }

    #[test]
    fn test_texture_axes_fallback_for_z_normal() {
        let wall = Plane::new(Vec3::new(0.0, 0.0, -20.0), Vec3::new(0.0, 0.0, -1.0), Material::default());
        let moved = wall.texture_coordinates(wall.origin + Vec3::new(0.0, 3.0, 0.0));
        assert!(moved.x.is_finite() && moved.y.is_finite());
        assert!((moved.length() - 3.0).abs() < 1e-5);
    }
}
