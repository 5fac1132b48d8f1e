//! Sphere primitive.

use std::f32::consts::PI;

use glint_math::{Ray, Vec2, Vec3};

use super::{unit_direction, Shape};
use crate::Material;

/// A sphere given by center and radius.
#[derive(Debug, Clone)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
    pub material: Material,
}

impl Sphere {
    /// Create a new sphere. Negative radii are clamped to zero.
    pub fn new(center: Vec3, radius: f32, material: Material) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            material,
        }
    }
}

impl Shape for Sphere {
    fn intersect(&self, ray: &Ray) -> Option<f32> {
        let (direction, length) = unit_direction(ray)?;

        // Project the center onto the ray, then measure how far the ray
        // passes from the center
        let hyp = self.center - ray.origin;
        let adj = hyp.dot(direction);
        let opp2 = hyp.dot(hyp) - adj * adj;
        let radius2 = self.radius * self.radius;
        if opp2 > radius2 {
            return None;
        }

        let side = (radius2 - opp2).sqrt();
        let t0 = adj - side;
        let t1 = adj + side;

        let distance = match (t0 < 0.0, t1 < 0.0) {
            (true, true) => return None,
            // Origin is inside the sphere
            (true, false) => t1,
            (false, true) => t0,
            (false, false) => t0.min(t1),
        };

        Some(distance / length)
    }

    fn surface_normal(&self, hit_point: Vec3) -> Vec3 {
        (hit_point - self.center).normalize_or_zero()
    }

    fn texture_coordinates(&self, hit_point: Vec3) -> Vec2 {
        let hit_vec = hit_point - self.center;
        let u = 0.5 + hit_vec.z.atan2(hit_vec.x) / (2.0 * PI);
        // clamp absorbs rounding just outside the acos domain
        let v = (hit_vec.y - self.radius).clamp(-1.0, 1.0).acos() / PI;
        Vec2::new(u, v)
    }

    fn material(&self) -> &Material {
        &self.material
    }
}
