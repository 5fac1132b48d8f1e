//! Bucket-based tile rendering.
//!
//! Divides the image into tiles (buckets) that are traced independently
//! and in parallel using rayon. Results are written to the canvas from the
//! calling thread, so the canvas itself never sees concurrent writers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use glint_core::{Color, Scene};
use rayon::prelude::*;

use crate::canvas::check_size;
use crate::renderer::{render_pixel, RenderStats};
use crate::{Camera, Canvas, CanvasResult};

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    /// Width of the bucket in pixels
    pub width: u32,
    /// Height of the bucket in pixels
    pub height: u32,
    /// Index of this bucket in the render order
    pub index: usize,
}

impl Bucket {
    /// Create a new bucket.
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// Generate buckets for an image, sorted center-out.
///
/// Buckets closest to the middle of the frame come first.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let bucket_size = bucket_size.max(1);
    let mut buckets = Vec::new();
    let mut index = 0;

    // Generate grid of buckets
    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = bucket_size.min(width - x);
            let bh = bucket_size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, index));
            index += 1;
            x += bucket_size;
        }
        y += bucket_size;
    }

    sort_spiral(&mut buckets, width, height);

    // Update indices after sorting
    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Sort buckets by distance from image center.
fn sort_spiral(buckets: &mut [Bucket], width: u32, height: u32) {
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;

    let distance = |b: &Bucket| {
        let bx = b.x as f32 + b.width as f32 / 2.0;
        let by = b.y as f32 + b.height as f32 / 2.0;
        (bx - center_x).powi(2) + (by - center_y).powi(2)
    };

    // Stable sort keeps row-major order between equally distant buckets
    buckets.sort_by(|a, b| {
        distance(a)
            .partial_cmp(&distance(b))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    /// The bucket that was rendered
    pub bucket: Bucket,
    /// Display-ready colors in row-major order, `None` where the primary ray
    /// missed everything
    pub pixels: Vec<Option<Color>>,
}

impl BucketResult {
    /// Write the traced pixels into `canvas`, skipping misses and anything
    /// that falls outside the canvas.
    ///
    /// Returns the number of pixels written.
    pub fn write_to(&self, canvas: &mut dyn Canvas) -> usize {
        let (width, height) = (canvas.width(), canvas.height());
        let mut written = 0;
        for (i, pixel) in self.pixels.iter().enumerate() {
            let x = self.bucket.x + i as u32 % self.bucket.width;
            let y = self.bucket.y + i as u32 / self.bucket.width;
            if x >= width || y >= height {
                continue;
            }
            if let Some(color) = pixel {
                canvas.set_pixel(x, y, *color);
                written += 1;
            }
        }
        written
    }
}

/// Render a single bucket.
pub fn render_bucket(bucket: &Bucket, scene: &Scene, camera: &Camera) -> BucketResult {
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            let global_x = bucket.x + local_x;
            let global_y = bucket.y + local_y;
            pixels.push(render_pixel(scene, camera, global_x, global_y));
        }
    }

    BucketResult {
        bucket: *bucket,
        pixels,
    }
}

/// Render the entire scene in parallel buckets.
///
/// Produces exactly the same pixels as [`crate::render`], and fails the same
/// way when the canvas and camera sizes differ.
pub fn render_parallel(
    scene: &Scene,
    camera: &Camera,
    canvas: &mut dyn Canvas,
    bucket_size: u32,
) -> CanvasResult<RenderStats> {
    check_size(canvas, camera)?;

    let start = Instant::now();
    let buckets = generate_buckets(camera.image_width, camera.image_height, bucket_size);
    let total = buckets.len();
    let finished = AtomicUsize::new(0);

    log::info!(
        "Rendering {}x{} in {} buckets on {} threads: {} shapes, {} lights",
        camera.image_width,
        camera.image_height,
        total,
        rayon::current_num_threads(),
        scene.shapes().len(),
        scene.lights().len()
    );

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| {
            let result = render_bucket(bucket, scene, camera);
            let done = finished.fetch_add(1, Ordering::Relaxed) + 1;
            log::debug!("Bucket {} done ({}/{})", bucket.index, done, total);
            result
        })
        .collect();

    let mut stats = RenderStats::default();
    for result in &results {
        stats.pixels += result.pixels.len();
        stats.hits += result.write_to(canvas);
    }

    stats.elapsed = start.elapsed();
    log::info!("Rendered {} pixels ({} hits) in {:?}", stats.pixels, stats.hits, stats.elapsed);
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{render, CanvasError, ImageBuffer};
    use glint_core::{DirectionalLight, Material, Plane, Refraction, Sphere};
    use glint_math::Vec3;

    #[test]
    fn test_generate_buckets_exact_fit() {
        let buckets = generate_buckets(128, 128, 64);
        assert_eq!(buckets.len(), 4); // 2x2 grid

        // Total pixels should equal image size
        let total_pixels: u32 = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total_pixels, 128 * 128);
    }

    #[test]
    fn test_generate_buckets_partial_fit() {
        let buckets = generate_buckets(100, 100, 64);
        assert_eq!(buckets.len(), 4); // 2x2 grid with partial buckets

        let total_pixels: u32 = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total_pixels, 100 * 100);
    }

    #[test]
    fn test_spiral_order() {
        let buckets = generate_buckets(192, 192, 64);
        assert_eq!(buckets.len(), 9); // 3x3 grid

        // First bucket should be the center one
        let first = &buckets[0];
        assert_eq!(first.x, 64);
        assert_eq!(first.y, 64);
        assert!(buckets.iter().enumerate().all(|(i, b)| b.index == i));
    }

    #[test]
    fn test_zero_bucket_size_does_not_hang() {
        let buckets = generate_buckets(3, 2, 0);
        assert_eq!(buckets.len(), 6);
    }

    #[test]
    fn test_parallel_matches_serial() {
        let scene = Scene::new()
            .with_shape(Sphere::new(
                Vec3::new(0.5, -0.5, -3.0),
                1.0,
                Material::new(Color::new(0.0, 1.0, 0.0), 0.6).with_reflectivity(0.3),
            ))
            .with_shape(Sphere::new(
                Vec3::new(-1.0, 0.3, -1.2),
                0.2,
                Material::default().with_refraction(Refraction::new(1.5, 0.7)),
            ))
            .with_shape(Plane::new(
                Vec3::new(0.0, -2.0, -5.0),
                Vec3::new(0.0, -1.0, 0.0),
                Material::diffuse(Color::new(1.0, 0.0, 1.0)),
            ))
            .with_light(DirectionalLight::new(Vec3::new(0.0, -1.0, -1.0), Color::WHITE, 2.0));
        let camera = Camera::new(37, 23);
        let background = Color::splat(0.33);

        let mut serial = ImageBuffer::new(37, 23, background);
        let serial_stats = render(&scene, &camera, &mut serial).unwrap();

        let mut parallel = ImageBuffer::new(37, 23, background);
        let parallel_stats = render_parallel(&scene, &camera, &mut parallel, 8).unwrap();

        assert_eq!(serial.pixels, parallel.pixels);
        assert_eq!(serial_stats.pixels, parallel_stats.pixels);
        assert_eq!(serial_stats.hits, parallel_stats.hits);
    }

    #[test]
    fn test_render_parallel_rejects_mismatched_canvas() {
        let scene = Scene::new().with_shape(Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, Material::default()));
        let mut image = ImageBuffer::new(10, 10, Color::BLACK);

        let result = render_parallel(&scene, &Camera::new(20, 20), &mut image, 8);
        assert!(matches!(
            result,
            Err(CanvasError::SizeMismatch {
                camera_width: 20,
                camera_height: 20,
                ..
            })
        ));
        assert!(image.pixels.iter().all(|&p| p == Color::BLACK));
    }

    #[test]
    fn test_write_to_skips_pixels_outside_canvas() {
        // 4x2 bucket hanging off the right and bottom edges of a 3x3 canvas
        let result = BucketResult {
            bucket: Bucket::new(1, 2, 4, 2, 0),
            pixels: vec![Some(Color::WHITE); 8],
        };
        let mut image = ImageBuffer::new(3, 3, Color::BLACK);

        assert_eq!(result.write_to(&mut image), 2);
        assert_eq!(image.get(1, 2), Color::WHITE);
        assert_eq!(image.get(2, 2), Color::WHITE);
        assert_eq!(image.get(0, 2), Color::BLACK);
        assert_eq!(image.get(2, 1), Color::BLACK);
    }
}
