//! Glint Core - scene data model for the Glint ray tracer.
//!
//! This crate provides:
//!
//! - **Appearance**: `Color`, `Material`, and `Texture` providers
//! - **Geometry**: the `Shape` trait with `Sphere` and `Plane`
//! - **Lighting**: the `Light` trait with `DirectionalLight` and `SphericalLight`
//! - **Scenes**: `Scene` with closest-hit search, and JSON scene descriptions
//!
//! # Example
//!
//! ```ignore
//! use glint_core::load_scene;
//!
//! let loaded = load_scene("scenes/demo.json")?;
//! println!("Loaded {} shapes, {} lights",
//!     loaded.scene.shapes().len(),
//!     loaded.scene.lights().len());
//! ```

pub mod color;
pub mod description;
pub mod light;
pub mod material;
pub mod scene;
pub mod shape;
pub mod texture;

// Re-export commonly used types
pub use color::{Color, ColorError, ColorResult};
pub use description::{load_scene, load_scene_from_str, LoadedScene, SceneDesc, SceneError, SceneResult};
pub use light::{DirectionalLight, Light, SphericalLight};
pub use material::{Material, Refraction};
pub use scene::{Intersection, Scene, View};
pub use shape::{Plane, Shape, Sphere};
pub use texture::{to_absolute_coordinates, Checkerboard, ImageTexture, Texture, TextureError, TextureResult};

/// Re-export math types from glint_math
pub use glint_math::{Interval, Ray, Vec2, Vec3};
