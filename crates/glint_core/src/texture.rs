//! Texture providers for materials.
//!
//! A texture is anything that maps surface coordinates `(u, v)` to a
//! [`Color`]. Shapes hand out their own parameterization (normalized for
//! spheres, unbounded for planes) and providers are responsible for any
//! tiling of out-of-range coordinates.

use std::path::Path;

use thiserror::Error;

use crate::Color;

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Failed to load texture: {0}")]
    LoadError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decoding error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Texture {0} has no pixels")]
    Empty(String),

    #[error("Texture {path} is {width}x{height} but has {len} pixels")]
    SizeMismatch {
        path: String,
        width: u32,
        height: u32,
        len: usize,
    },
}

pub type TextureResult<T> = Result<T, TextureError>;

/// Capability that samples a color at surface coordinates.
pub trait Texture: Send + Sync {
    fn sample(&self, u: f32, v: f32) -> Color;
}

impl<F> Texture for F
where
    F: Fn(f32, f32) -> Color + Send + Sync,
{
    fn sample(&self, u: f32, v: f32) -> Color {
        self(u, v)
    }
}

/// Map texture coordinates onto absolute texel coordinates, repeating the
/// texture in every direction.
///
/// Negative inputs wrap back into `[0, width) x [0, height)`.
pub fn to_absolute_coordinates(u: f32, v: f32, width: u32, height: u32) -> (f32, f32) {
    let (w, h) = (width as f32, height as f32);
    ((u * w).rem_euclid(w), (v * h).rem_euclid(h))
}

/// Procedural two-color checkerboard.
#[derive(Debug, Clone, Copy)]
pub struct Checkerboard {
    /// Size of one square in texture units
    pub scale: f32,
    pub even: Color,
    pub odd: Color,
}

impl Checkerboard {
    pub fn new(scale: f32, even: Color, odd: Color) -> Self {
        Self { scale, even, odd }
    }
}

impl Texture for Checkerboard {
    fn sample(&self, u: f32, v: f32) -> Color {
        let cell = (u / self.scale).floor() as i64 + (v / self.scale).floor() as i64;
        if cell.rem_euclid(2) == 0 {
            self.even
        } else {
            self.odd
        }
    }
}

/// A texture backed by a decoded image.
///
/// Pixels are stored as linear colors. Sampling is nearest-texel and the
/// image repeats outside the unit square.
#[derive(Clone, Debug)]
pub struct ImageTexture {
    /// Texture width in pixels
    width: u32,

    /// Texture height in pixels
    height: u32,

    /// Linear colors, row-major, row 0 at the top
    pixels: Vec<Color>,

    /// Original file path (for debugging)
    path: String,
}

impl ImageTexture {
    /// Create a new texture from row-major pixel data.
    ///
    /// Fails if either dimension is zero or `pixels` does not hold exactly
    /// `width * height` colors.
    pub fn new(
        width: u32,
        height: u32,
        pixels: Vec<Color>,
        path: impl Into<String>,
    ) -> TextureResult<Self> {
        let path = path.into();
        if width == 0 || height == 0 {
            return Err(TextureError::Empty(path));
        }
        if pixels.len() != width as usize * height as usize {
            return Err(TextureError::SizeMismatch {
                path,
                width,
                height,
                len: pixels.len(),
            });
        }

        Ok(Self {
            width,
            height,
            pixels,
            path,
        })
    }

    /// Load a texture from an image file and convert it to linear color.
    pub fn open(path: impl AsRef<Path>) -> TextureResult<Self> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|e| {
            TextureError::LoadError(format!("Failed to open {}: {}", path.display(), e))
        })?;

        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        let pixels = rgb
            .pixels()
            .map(|p| Color::from_rgb8(p.0).gamma_decode())
            .collect();

        Self::new(width, height, pixels, path.to_string_lossy())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Path the texture was loaded from
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Get pixel at integer coordinates.
    fn get_pixel(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }
}

impl Texture for ImageTexture {
    fn sample(&self, u: f32, v: f32) -> Color {
        let (x, y) = to_absolute_coordinates(u, v, self.width, self.height);
        // rem_euclid can round up to exactly width/height
        let x = (x as u32).min(self.width - 1);
        let y = (y as u32).min(self.height - 1);
        self.get_pixel(x, y)
    }
}
