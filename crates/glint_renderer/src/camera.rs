//! Camera for primary ray generation.
//!
//! The camera sits at the world origin and looks down -Z. Only the image
//! size and horizontal field of view are configurable.

use glint_core::View;
use glint_math::{Ray, Vec3};

/// Pinhole camera generating one ray through the center of each pixel.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub image_width: u32,
    pub image_height: u32,

    /// Field of view in degrees
    fov: f32,

    // Cached computed values (set by initialize())
    fov_adjustment: f32,
    aspect_ratio: f32,
}

impl Camera {
    /// Create a camera for the given image size with a 90 degree field of view.
    pub fn new(width: u32, height: u32) -> Self {
        let mut camera = Self {
            image_width: width,
            image_height: height,
            fov: 90.0,
            fov_adjustment: 1.0,
            aspect_ratio: 1.0,
        };
        camera.initialize();
        camera
    }

    /// Create a camera matching a scene description's view.
    pub fn from_view(view: &View) -> Self {
        Self::new(view.width, view.height).with_fov(view.fov)
    }

    /// Set the field of view in degrees.
    pub fn with_fov(mut self, fov: f32) -> Self {
        self.fov = fov;
        self.initialize();
        self
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    fn initialize(&mut self) {
        self.fov_adjustment = (self.fov.to_radians() / 2.0).tan();

        let (w, h) = (self.image_width as f32, self.image_height as f32);
        // Ratio of the longer side to the shorter one
        self.aspect_ratio = if self.image_width > self.image_height {
            w / h
        } else {
            h / w
        };
    }

    /// Generate the ray through the center of pixel (x, y).
    ///
    /// Row 0 is the top of the image.
    pub fn primary_ray(&self, x: u32, y: u32) -> Ray {
        let ndc_x = ((x as f32 + 0.5) / self.image_width as f32) * 2.0 - 1.0;
        let ndc_y = 1.0 - ((y as f32 + 0.5) / self.image_height as f32) * 2.0;

        let mut ray_x = ndc_x * self.fov_adjustment;
        let mut ray_y = ndc_y * self.fov_adjustment;
        if self.image_width > self.image_height {
            ray_x *= self.aspect_ratio;
        } else {
            ray_y *= self.aspect_ratio;
        }

        Ray::normalized(Vec3::ZERO, Vec3::new(ray_x, ray_y, -1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_core::Color;

    #[test]
    fn test_center_ray_looks_down_negative_z() {
        let camera = Camera::new(11, 11);
        let ray = camera.primary_ray(5, 5);

        assert_eq!(ray.origin, Vec3::ZERO);
        assert!((ray.direction - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-6);
    }

    #[test]
    fn test_rays_are_normalized() {
        let camera = Camera::new(64, 48).with_fov(70.0);
        for (x, y) in [(0, 0), (63, 0), (0, 47), (63, 47), (20, 30)] {
            let ray = camera.primary_ray(x, y);
            assert!((ray.direction.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_row_zero_is_top() {
        let camera = Camera::new(10, 10);
        assert!(camera.primary_ray(5, 0).direction.y > 0.0);
        assert!(camera.primary_ray(5, 9).direction.y < 0.0);
        assert!(camera.primary_ray(0, 5).direction.x < 0.0);
        assert!(camera.primary_ray(9, 5).direction.x > 0.0);
    }

    #[test]
    fn test_fov_90_corner_pixel() {
        let camera = Camera::new(10, 10);
        let d = camera.primary_ray(9, 0).direction;
        // tan(45) = 1, so the slope equals the ndc value 0.9
        assert!((d.x / -d.z - 0.9).abs() < 1e-5);
        assert!((d.y / -d.z - 0.9).abs() < 1e-5);
    }

    #[test]
    fn test_wide_image_stretches_x() {
        let camera = Camera::new(20, 10);
        let d = camera.primary_ray(19, 5).direction;
        assert!((d.x / -d.z - 1.9).abs() < 1e-5);
        assert!((d.y / -d.z + 0.1).abs() < 1e-5);
    }

    #[test]
    fn test_tall_image_stretches_y() {
        let camera = Camera::new(10, 20);
        let d = camera.primary_ray(5, 0).direction;
        assert!((d.x / -d.z - 0.1).abs() < 1e-5);
        assert!((d.y / -d.z - 1.9).abs() < 1e-5);
    }

    #[test]
    fn test_narrow_fov_narrows_rays() {
        let wide = Camera::new(10, 10).primary_ray(9, 5).direction;
        let narrow = Camera::new(10, 10).with_fov(30.0).primary_ray(9, 5).direction;
        assert!(narrow.x < wide.x);
    }

    #[test]
    fn test_from_view() {
        let view = View {
            width: 320,
            height: 200,
            fov: 60.0,
            background: Color::BLACK,
        };
        let camera = Camera::from_view(&view);
        assert_eq!(camera.image_width, 320);
        assert_eq!(camera.image_height, 200);
        assert_eq!(camera.fov(), 60.0);
    }
}
