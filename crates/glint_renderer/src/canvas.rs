//! Output sinks for rendered pixels.

use std::path::Path;

use glint_core::Color;
use thiserror::Error;

use crate::Camera;

/// Errors that can occur when writing a canvas out.
#[derive(Error, Debug)]
pub enum CanvasError {
    #[error("Failed to write image: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Canvas is {canvas_width}x{canvas_height} but the camera renders {camera_width}x{camera_height}")]
    SizeMismatch {
        canvas_width: u32,
        canvas_height: u32,
        camera_width: u32,
        camera_height: u32,
    },
}

pub type CanvasResult<T> = Result<T, CanvasError>;

/// Receives display-ready (gamma encoded) pixel colors.
///
/// Pixels may arrive in any order. Pixels that are never written keep
/// whatever the sink was initialized with, normally the background color.
pub trait Canvas {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn set_pixel(&mut self, x: u32, y: u32, color: Color);
}

/// Check that `canvas` has room for every pixel `camera` produces.
pub(crate) fn check_size(canvas: &dyn Canvas, camera: &Camera) -> CanvasResult<()> {
    if canvas.width() != camera.image_width || canvas.height() != camera.image_height {
        return Err(CanvasError::SizeMismatch {
            canvas_width: canvas.width(),
            canvas_height: canvas.height(),
            camera_width: camera.image_width,
            camera_height: camera.image_height,
        });
    }
    Ok(())
}

/// Simple in-memory image for storing render output.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with `background`.
    pub fn new(width: u32, height: u32, background: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![background; (width * height) as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Convert to RGBA bytes (for display or saving).
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity((self.width * self.height * 4) as usize);
        for color in &self.pixels {
            let [r, g, b] = color.to_rgb8();
            bytes.extend_from_slice(&[r, g, b, 255]);
        }
        bytes
    }

    /// Write the image as a PNG file.
    pub fn save_png(&self, path: impl AsRef<Path>) -> CanvasResult<()> {
        let path = path.as_ref();
        image::save_buffer_with_format(
            path,
            &self.to_rgba8(),
            self.width,
            self.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )?;
        log::info!("Wrote {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }
}

impl Canvas for ImageBuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        let idx = (y * self.width + x) as usize;
        self.pixels[idx] = color;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_filled_with_background() {
        let bg = Color::new(0.2, 0.3, 0.4);
        let image = ImageBuffer::new(4, 3, bg);
        assert_eq!(image.pixels.len(), 12);
        assert!(image.pixels.iter().all(|&p| p == bg));
    }

    #[test]
    fn test_set_and_get() {
        let mut image = ImageBuffer::new(4, 3, Color::BLACK);
        image.set_pixel(3, 2, Color::WHITE);
        assert_eq!(image.get(3, 2), Color::WHITE);
        assert_eq!(image.get(2, 2), Color::BLACK);
        assert_eq!(image.pixels[11], Color::WHITE);
    }

    #[test]
    fn test_to_rgba8() {
        let mut image = ImageBuffer::new(2, 1, Color::BLACK);
        image.set_pixel(1, 0, Color::new(1.0, 0.0, 1.0));
        assert_eq!(image.to_rgba8(), vec![0, 0, 0, 255, 255, 0, 255, 255]);
    }

    #[test]
    fn test_save_png_roundtrip() {
        let mut image = ImageBuffer::new(3, 2, Color::from_hex("#555555").unwrap());
        image.set_pixel(0, 0, Color::WHITE);

        let path = std::env::temp_dir().join(format!("glint_canvas_{}.png", std::process::id()));
        image.save_png(&path).unwrap();

        let decoded = image::open(&path).unwrap().to_rgba8();
        std::fs::remove_file(&path).ok();

        assert_eq!(decoded.dimensions(), (3, 2));
        assert_eq!(decoded.get_pixel(0, 0).0, [255, 255, 255, 255]);
        assert_eq!(decoded.get_pixel(2, 1).0, [0x55, 0x55, 0x55, 255]);
    }
}
