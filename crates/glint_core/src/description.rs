//! JSON scene descriptions.
//!
//! A description names the camera view, the shapes with their materials,
//! and the lights. Loading turns it into an immutable [`Scene`] plus a
//! [`View`].
//!
//! ```json
//! {
//!   "camera": { "width": 100, "height": 100, "background": "#555555" },
//!   "shapes": [
//!     { "type": "sphere", "center": [0.5, -0.5, -3.0], "radius": 1.0,
//!       "material": { "color": "#00ff00", "albedo": 0.6 } },
//!     { "type": "plane", "origin": [0.0, -2.0, -5.0], "normal": [0.0, -1.0, 0.0] }
//!   ],
//!   "lights": [
//!     { "type": "directional", "direction": [0.0, 0.0, -1.0], "intensity": 2.0 }
//!   ]
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use glint_math::Vec3;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    Checkerboard, Color, ColorError, DirectionalLight, ImageTexture, Material, Plane, Refraction,
    Scene, Sphere, SphericalLight, Texture, TextureError, View,
};

/// Errors that can occur while loading a scene description.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid scene JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid color: {0}")]
    Color(#[from] ColorError),

    #[error("Texture error: {0}")]
    Texture(#[from] TextureError),

    #[error("Image size must be non-zero, got {width}x{height}")]
    EmptyImage { width: u32, height: u32 },
}

pub type SceneResult<T> = Result<T, SceneError>;

/// A loaded scene with its view settings.
pub struct LoadedScene {
    pub view: View,
    pub scene: Scene,
}

/// A color written either as `"#RRGGBB"` or as a linear `[r, g, b]` triple.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ColorDesc {
    Hex(String),
    Rgb([f32; 3]),
}

impl ColorDesc {
    pub fn resolve(&self) -> SceneResult<Color> {
        match self {
            ColorDesc::Hex(hex) => Ok(Color::from_hex(hex)?),
            ColorDesc::Rgb(rgb) => Ok(Color::from(*rgb)),
        }
    }
}

fn white() -> ColorDesc {
    ColorDesc::Rgb([1.0, 1.0, 1.0])
}

fn black() -> ColorDesc {
    ColorDesc::Rgb([0.0, 0.0, 0.0])
}

fn one() -> f32 {
    1.0
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CameraDesc {
    #[serde(default = "CameraDesc::default_size")]
    pub width: u32,
    #[serde(default = "CameraDesc::default_size")]
    pub height: u32,
    #[serde(default = "CameraDesc::default_fov")]
    pub fov: f32,
    #[serde(default = "black")]
    pub background: ColorDesc,
}

impl CameraDesc {
    fn default_size() -> u32 {
        View::default().width
    }

    fn default_fov() -> f32 {
        View::default().fov
    }
}

impl Default for CameraDesc {
    fn default() -> Self {
        Self {
            width: Self::default_size(),
            height: Self::default_size(),
            fov: Self::default_fov(),
            background: black(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", deny_unknown_fields)]
pub enum TextureDesc {
    Checkerboard {
        #[serde(default = "one")]
        scale: f32,
        #[serde(default = "white")]
        even: ColorDesc,
        #[serde(default = "black")]
        odd: ColorDesc,
    },
    Image {
        path: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RefractionDesc {
    pub index: f32,
    #[serde(default = "one")]
    pub transparency: f32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MaterialDesc {
    #[serde(default = "white")]
    pub color: ColorDesc,
    #[serde(default = "one")]
    pub albedo: f32,
    #[serde(default)]
    pub reflectivity: f32,
    #[serde(default)]
    pub refraction: Option<RefractionDesc>,
    #[serde(default)]
    pub texture: Option<TextureDesc>,
}

impl Default for MaterialDesc {
    fn default() -> Self {
        Self {
            color: white(),
            albedo: 1.0,
            reflectivity: 0.0,
            refraction: None,
            texture: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", deny_unknown_fields)]
pub enum ShapeDesc {
    Sphere {
        center: [f32; 3],
        radius: f32,
        #[serde(default)]
        material: MaterialDesc,
    },
    Plane {
        origin: [f32; 3],
        normal: [f32; 3],
        #[serde(default)]
        material: MaterialDesc,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", deny_unknown_fields)]
pub enum LightDesc {
    Directional {
        direction: [f32; 3],
        #[serde(default = "white")]
        color: ColorDesc,
        intensity: f32,
    },
    Spherical {
        position: [f32; 3],
        #[serde(default = "white")]
        color: ColorDesc,
        intensity: f32,
    },
}

/// Top-level scene description document.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneDesc {
    #[serde(default)]
    pub camera: CameraDesc,
    #[serde(default)]
    pub shapes: Vec<ShapeDesc>,
    #[serde(default)]
    pub lights: Vec<LightDesc>,
}

impl SceneDesc {
    /// Parse a description from a JSON string.
    pub fn from_json(json: &str) -> SceneResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build the scene. Relative texture paths resolve against `base_dir`.
    pub fn build(&self, base_dir: Option<&Path>) -> SceneResult<LoadedScene> {
        let view = self.camera.resolve()?;

        let mut scene = Scene::new();
        for shape in &self.shapes {
            match shape {
                ShapeDesc::Sphere {
                    center,
                    radius,
                    material,
                } => scene.add_shape(Sphere::new(
                    Vec3::from(*center),
                    *radius,
                    material.resolve(base_dir)?,
                )),
                ShapeDesc::Plane {
                    origin,
                    normal,
                    material,
                } => {
                    let normal = Vec3::from(*normal);
                    if normal.length_squared() == 0.0 {
                        log::warn!("Plane at {:?} has a zero normal and will never be hit", origin);
                    }
                    scene.add_shape(Plane::new(
                        Vec3::from(*origin),
                        normal,
                        material.resolve(base_dir)?,
                    ))
                }
            }
        }

        for light in &self.lights {
            match light {
                LightDesc::Directional {
                    direction,
                    color,
                    intensity,
                } => {
                    warn_negative_intensity(*intensity);
                    scene.add_light(DirectionalLight::new(
                        Vec3::from(*direction),
                        color.resolve()?,
                        *intensity,
                    ))
                }
                LightDesc::Spherical {
                    position,
                    color,
                    intensity,
                } => {
                    warn_negative_intensity(*intensity);
                    scene.add_light(SphericalLight::new(
                        Vec3::from(*position),
                        color.resolve()?,
                        *intensity,
                    ))
                }
            }
        }

        log::info!(
            "Loaded scene: {} shapes, {} lights, {}x{} @ {} deg",
            scene.shapes().len(),
            scene.lights().len(),
            view.width,
            view.height,
            view.fov
        );

        Ok(LoadedScene { view, scene })
    }
}

impl CameraDesc {
    fn resolve(&self) -> SceneResult<View> {
        if self.width == 0 || self.height == 0 {
            return Err(SceneError::EmptyImage {
                width: self.width,
                height: self.height,
            });
        }
        Ok(View {
            width: self.width,
            height: self.height,
            fov: self.fov,
            background: self.background.resolve()?,
        })
    }
}

impl MaterialDesc {
    fn resolve(&self, base_dir: Option<&Path>) -> SceneResult<Material> {
        let mut material = Material::new(self.color.resolve()?, self.albedo)
            .with_reflectivity(self.reflectivity);

        if let Some(refraction) = self.refraction {
            if refraction.index <= 1.0 {
                log::warn!(
                    "Refraction index {} is not above 1.0; rendering it anyway",
                    refraction.index
                );
            }
            material = material.with_refraction(Refraction::new(
                refraction.index,
                refraction.transparency,
            ));
        }

        if let Some(texture) = &self.texture {
            material = material.with_texture(texture.resolve(base_dir)?);
        }

        Ok(material)
    }
}

impl TextureDesc {
    fn resolve(&self, base_dir: Option<&Path>) -> SceneResult<Arc<dyn Texture>> {
        match self {
            TextureDesc::Checkerboard { scale, even, odd } => Ok(Arc::new(Checkerboard::new(
                *scale,
                even.resolve()?,
                odd.resolve()?,
            ))),
            TextureDesc::Image { path } => {
                let full_path = match base_dir {
                    Some(base) if path.is_relative() => base.join(path),
                    _ => path.clone(),
                };
                let texture = ImageTexture::open(full_path)?;
                log::debug!(
                    "Loaded texture {} ({}x{})",
                    texture.path(),
                    texture.width(),
                    texture.height()
                );
                Ok(Arc::new(texture))
            }
        }
    }
}

fn warn_negative_intensity(intensity: f32) {
    if intensity < 0.0 {
        log::warn!("Light intensity {} is negative; rendering it anyway", intensity);
    }
}

/// Load a scene description from a JSON file.
///
/// Relative texture paths are resolved against the file's directory.
pub fn load_scene(path: impl AsRef<Path>) -> SceneResult<LoadedScene> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)?;
    log::debug!("Parsing scene description {}", path.display());
    SceneDesc::from_json(&json)?.build(path.parent())
}

/// Load a scene description from a JSON string.
pub fn load_scene_from_str(json: &str) -> SceneResult<LoadedScene> {
    SceneDesc::from_json(json)?.build(None)
}
