//! Core recursive ray tracer.
//!
//! Implements Whitted-style shading with:
//! - Lambertian direct lighting with shadow rays
//! - Mirror reflection
//! - Fresnel-weighted refraction through dielectrics
//! - Gamma encoding applied once, when a pixel reaches the canvas

use std::f32::consts::PI;
use std::time::{Duration, Instant};

use glint_core::{Color, Intersection, Scene, Shape};
use glint_math::{Interval, Ray, Vec3};

use crate::canvas::check_size;
use crate::{Camera, Canvas, CanvasResult};

/// Deepest level of reflection/refraction recursion. Deeper rays shade black.
pub const MAX_DEPTH: u32 = 10;

/// Offset applied to secondary ray origins along the surface normal, to
/// keep them from re-hitting the surface they start on (shadow acne).
pub const SHADOW_BIAS: f32 = 1e-4;

/// Summary of a finished render.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RenderStats {
    /// Pixels traced
    pub pixels: usize,
    /// Pixels whose primary ray hit a shape
    pub hits: usize,
    pub elapsed: Duration,
}

/// Trace `ray` into the scene and shade whatever it hits first.
///
/// Returns `None` when the ray escapes the scene.
pub fn cast_ray(scene: &Scene, ray: &Ray, depth: u32) -> Option<Color> {
    scene
        .closest_intersection(ray)
        .map(|hit| shade(scene, ray, &hit, depth))
}

/// Compute the linear color seen along `ray` at intersection `hit`.
pub fn shade(scene: &Scene, ray: &Ray, hit: &Intersection<'_>, depth: u32) -> Color {
    if depth > MAX_DEPTH {
        return Color::BLACK;
    }

    let shape = hit.shape;
    let material = shape.material();
    let hit_point = ray.at(hit.distance);
    let normal = shape.surface_normal(hit_point);
    let incident = ray.direction.normalize_or_zero();

    let mut color = diffuse_color(scene, shape, hit_point, normal);

    if material.is_reflective() {
        let reflection = Ray::normalized(hit_point + normal * SHADOW_BIAS, reflect(incident, normal));
        if let Some(reflected) = cast_ray(scene, &reflection, depth + 1) {
            color = color * (1.0 - material.reflectivity) + reflected * material.reflectivity;
        }
    }

    if let Some(refraction) = material.refraction {
        let kr = fresnel(incident, normal, refraction.index);
        if kr < 1.0 {
            let transmitted = transmission_ray(hit_point, incident, normal, refraction.index)
                .and_then(|r| cast_ray(scene, &r, depth + 1));
            if let Some(through) = transmitted {
                let share = (1.0 - kr) * refraction.transparency;
                color = color * (1.0 - share) + through * share;
            }
        }
    }

    color
}

/// Direct lighting at a surface point, summed over every light.
///
/// With no lights in the scene the surface shows its unlit base color.
fn diffuse_color(scene: &Scene, shape: &dyn Shape, hit_point: Vec3, normal: Vec3) -> Color {
    let material = shape.material();
    let surface = shape.base_color_at(hit_point);

    if scene.lights().is_empty() {
        return surface;
    }

    let light_reflected = material.albedo / PI;
    let shadow_origin = hit_point + normal * SHADOW_BIAS;
    let mut color = Color::BLACK;

    for light in scene.lights() {
        let to_light = light.direction_from(hit_point);
        let shadow_ray = Ray::normalized(shadow_origin, to_light);
        let unoccluded = Interval::new(0.0, light.distance_from(hit_point));
        let in_shadow = scene
            .closest_intersection(&shadow_ray)
            .is_some_and(|blocker| unoccluded.surrounds(blocker.distance));

        let intensity = if in_shadow {
            0.0
        } else {
            light.intensity_at(hit_point)
        };
        let light_power = normal.dot(to_light).max(0.0) * intensity;

        color += light.color() * (light_power * light_reflected) * surface;
    }

    color
}

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(incident: Vec3, normal: Vec3) -> Vec3 {
    incident - 2.0 * incident.dot(normal) * normal
}

/// Refract `incident` through a surface with outward `normal` and index of
/// refraction `index` (the outside is assumed to be air).
///
/// Whether the ray is entering or leaving is taken from the sign of
/// `incident . normal`. Returns `None` on total internal reflection.
pub fn refract(incident: Vec3, normal: Vec3, index: f32) -> Option<Vec3> {
    let (cos_i, eta, n) = orient(incident, normal, index);
    let k = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
    if k < 0.0 {
        None
    } else {
        Some(eta * incident + (eta * cos_i - k.sqrt()) * n)
    }
}

/// Fresnel reflectance for unpolarized light at a dielectric boundary.
///
/// Returns 1.0 under total internal reflection.
pub fn fresnel(incident: Vec3, normal: Vec3, index: f32) -> f32 {
    let mut cos_i = incident.dot(normal).clamp(-1.0, 1.0);
    let (mut eta_i, mut eta_t) = (1.0, index);
    if cos_i > 0.0 {
        std::mem::swap(&mut eta_i, &mut eta_t);
    }

    let sin_t = eta_i / eta_t * (1.0 - cos_i * cos_i).max(0.0).sqrt();
    if sin_t >= 1.0 {
        return 1.0;
    }

    let cos_t = (1.0 - sin_t * sin_t).max(0.0).sqrt();
    cos_i = cos_i.abs();
    let r_s = ((eta_t * cos_i) - (eta_i * cos_t)) / ((eta_t * cos_i) + (eta_i * cos_t));
    let r_p = ((eta_i * cos_i) - (eta_t * cos_t)) / ((eta_i * cos_i) + (eta_t * cos_t));
    (r_s * r_s + r_p * r_p) / 2.0
}

/// Build the transmitted ray leaving `hit_point`, offset to the far side of
/// the surface.
fn transmission_ray(hit_point: Vec3, incident: Vec3, normal: Vec3, index: f32) -> Option<Ray> {
    let direction = refract(incident, normal, index)?;
    let (_, _, n) = orient(incident, normal, index);
    Some(Ray::normalized(hit_point - n * SHADOW_BIAS, direction))
}

/// Cosine of incidence, relative index `eta_i / eta_t`, and the normal
/// flipped to face the incoming ray.
fn orient(incident: Vec3, normal: Vec3, index: f32) -> (f32, f32, Vec3) {
    let cos_i = incident.dot(normal).clamp(-1.0, 1.0);
    if cos_i < 0.0 {
        // Entering from outside
        (-cos_i, 1.0 / index, normal)
    } else {
        (cos_i, index, -normal)
    }
}

/// Trace the primary ray for pixel (x, y).
///
/// Returns the display-ready color, or `None` if the ray hits nothing and
/// the pixel should keep the background.
pub fn render_pixel(scene: &Scene, camera: &Camera, x: u32, y: u32) -> Option<Color> {
    let ray = camera.primary_ray(x, y);
    cast_ray(scene, &ray, 0).map(|color| color.gamma_encode())
}

/// Render the entire scene into `canvas`, one pixel at a time in row-major
/// order.
///
/// Pixels whose primary ray escapes are never written. Fails before
/// tracing anything if the canvas and camera sizes differ.
pub fn render(scene: &Scene, camera: &Camera, canvas: &mut dyn Canvas) -> CanvasResult<RenderStats> {
    check_size(canvas, camera)?;

    let start = Instant::now();
    log::info!(
        "Rendering {}x{}: {} shapes, {} lights",
        camera.image_width,
        camera.image_height,
        scene.shapes().len(),
        scene.lights().len()
    );

    let mut stats = RenderStats::default();
    for y in 0..camera.image_height {
        for x in 0..camera.image_width {
            stats.pixels += 1;
            if let Some(color) = render_pixel(scene, camera, x, y) {
                canvas.set_pixel(x, y, color);
                stats.hits += 1;
            }
        }
    }

    stats.elapsed = start.elapsed();
    log::info!("Rendered {} pixels ({} hits) in {:?}", stats.pixels, stats.hits, stats.elapsed);
    Ok(stats)
}
