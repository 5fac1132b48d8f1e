//! Shape trait and the built-in surfaces.
//!
//! The renderer only ever talks to `dyn Shape`, so a new kind of surface
//! needs an implementation here and nothing else.

mod plane;
mod sphere;

pub use plane::Plane;
pub use sphere::Sphere;

use glint_math::{Ray, Vec2, Vec3};

use crate::{Color, Material};

/// A surface that rays can hit.
pub trait Shape: Send + Sync {
    /// Distance along `ray` to the nearest intersection in front of its
    /// origin, or `None` on a miss.
    ///
    /// The distance is the ray parameter, so `ray.at(distance)` is the hit
    /// point even for rays with a non-unit direction.
    fn intersect(&self, ray: &Ray) -> Option<f32>;

    /// Unit normal at a point on the surface.
    fn surface_normal(&self, hit_point: Vec3) -> Vec3;

    /// Texture coordinates `(u, v)` of a point on the surface.
    fn texture_coordinates(&self, hit_point: Vec3) -> Vec2;

    fn material(&self) -> &Material;

    /// Base (or texture) color at `hit_point`, ignoring lights and other
    /// shapes.
    fn base_color_at(&self, hit_point: Vec3) -> Color {
        let uv = self.texture_coordinates(hit_point);
        self.material().color_at(uv.x, uv.y)
    }
}

/// Split a ray direction into its unit vector and length.
///
/// Returns `None` for a zero-length direction, which can never hit anything.
pub(crate) fn unit_direction(ray: &Ray) -> Option<(Vec3, f32)> {
    let length = ray.direction.length();
    if length > 0.0 && length.is_finite() {
        Some((ray.direction / length, length))
    } else {
        None
    }
}
