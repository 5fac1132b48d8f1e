//! Glint Renderer - recursive CPU ray tracing.
//!
//! One primary ray per pixel, brute-force closest-hit search, and
//! Whitted-style shading: Lambertian lighting with hard shadows, mirror
//! reflection, and Fresnel-weighted refraction, bounded at a fixed
//! recursion depth.

mod bucket;
mod camera;
mod canvas;
mod renderer;

pub use bucket::{generate_buckets, render_bucket, render_parallel, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use camera::Camera;
pub use canvas::{Canvas, CanvasError, CanvasResult, ImageBuffer};
pub use renderer::{
    cast_ray, fresnel, reflect, refract, render, render_pixel, shade, RenderStats, MAX_DEPTH, SHADOW_BIAS,
};

/// Re-export the scene model and math types
pub use glint_core::{Color, Scene, View};
pub use glint_math::{Ray, Vec3};
