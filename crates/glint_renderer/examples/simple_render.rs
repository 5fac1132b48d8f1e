//! Simple ray tracer example.
//!
//! Builds a scene in code, including a procedural texture written as a
//! closure, renders it in parallel buckets and saves it as a PNG.

use std::sync::Arc;

use glint_core::{
    Checkerboard, DirectionalLight, Material, Plane, Refraction, Sphere, SphericalLight,
};
use glint_renderer::{render_parallel, Camera, Color, ImageBuffer, Scene, Vec3, DEFAULT_BUCKET_SIZE};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let scene = build_scene();
    let camera = Camera::new(800, 450).with_fov(70.0);
    let mut image = ImageBuffer::new(800, 450, Color::new(0.5, 0.7, 1.0));

    let stats = render_parallel(&scene, &camera, &mut image, DEFAULT_BUCKET_SIZE)?;
    println!(
        "Rendered {} pixels ({} hits) in {:?}",
        stats.pixels, stats.hits, stats.elapsed
    );

    let filename = "output.png";
    image.save_png(filename)?;
    println!("Saved to {}", filename);
    Ok(())
}

fn build_scene() -> Scene {
    // Ground
    let floor = Material::new(Color::WHITE, 0.8).with_texture(Arc::new(Checkerboard::new(
        1.0,
        Color::splat(0.9),
        Color::splat(0.1),
    )));

    // Concentric stripes around the sphere's equator
    let stripes = |u: f32, _v: f32| {
        if (u * 24.0).floor() as i32 % 2 == 0 {
            Color::new(0.9, 0.5, 0.1)
        } else {
            Color::new(0.2, 0.1, 0.4)
        }
    };

    Scene::new()
        .with_shape(Plane::new(
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::new(0.0, -1.0, 0.0),
            floor,
        ))
        .with_shape(Sphere::new(
            Vec3::new(-2.2, 0.0, -5.0),
            1.0,
            Material::new(Color::WHITE, 0.7).with_texture(Arc::new(stripes)),
        ))
        .with_shape(Sphere::new(
            Vec3::new(0.0, 0.0, -5.0),
            1.0,
            Material::new(Color::WHITE, 0.1).with_refraction(Refraction::new(1.5, 0.95)),
        ))
        .with_shape(Sphere::new(
            Vec3::new(2.2, 0.0, -5.0),
            1.0,
            Material::new(Color::new(0.7, 0.6, 0.5), 0.5).with_reflectivity(0.7),
        ))
        .with_light(DirectionalLight::new(
            Vec3::new(-0.3, -1.0, -0.5),
            Color::WHITE,
            2.0,
        ))
        .with_light(SphericalLight::new(
            Vec3::new(0.0, 3.0, -3.0),
            Color::new(1.0, 0.8, 0.6),
            300.0,
        ))
}
