use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use glint_core::{
    load_scene, Color, DirectionalLight, LoadedScene, Material, Plane, Scene, Sphere, View,
};
use glint_math::Vec3;
use glint_renderer::{render, render_parallel, Camera, ImageBuffer, DEFAULT_BUCKET_SIZE};

const USAGE: &str = "\
Usage: glint [SCENE.json] [options]

Renders a JSON scene description (or the built-in demo scene) to a PNG.

Options:
  -o, --output <PATH>     Output file (default: render.png)
      --serial            Render on a single thread
      --bucket-size <N>   Bucket size for parallel rendering (default: 64)
  -h, --help              Print this help";

/// Command line options
#[derive(Debug, Clone, PartialEq)]
struct Args {
    scene: Option<PathBuf>,
    output: PathBuf,
    serial: bool,
    bucket_size: u32,
    help: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            scene: None,
            output: PathBuf::from("render.png"),
            serial: false,
            bucket_size: DEFAULT_BUCKET_SIZE,
            help: false,
        }
    }
}

impl Args {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut parsed = Args::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => parsed.help = true,
                "--serial" => parsed.serial = true,
                "-o" | "--output" => {
                    let path = args.next().context("--output needs a path")?;
                    parsed.output = PathBuf::from(path);
                }
                "--bucket-size" => {
                    let value = args.next().context("--bucket-size needs a number")?;
                    parsed.bucket_size = value
                        .parse()
                        .with_context(|| format!("Invalid bucket size {:?}", value))?;
                    if parsed.bucket_size == 0 {
                        bail!("Bucket size must be at least 1");
                    }
                }
                flag if flag.starts_with('-') => bail!("Unknown option {}\n\n{}", flag, USAGE),
                path => {
                    if parsed.scene.is_some() {
                        bail!("Only one scene file can be rendered at a time");
                    }
                    parsed.scene = Some(PathBuf::from(path));
                }
            }
        }

        Ok(parsed)
    }
}

/// Two spheres over a floor, lit head-on by a white directional light.
fn demo_scene() -> Result<LoadedScene> {
    let scene = Scene::new()
        .with_shape(Sphere::new(
            Vec3::new(0.5, -0.5, -3.0),
            1.0,
            Material::new(Color::from_hex("#00ff00")?, 0.6),
        ))
        .with_shape(Sphere::new(
            Vec3::new(-1.0, 0.3, -1.2),
            0.2,
            Material::new(Color::from_hex("#ffff00")?, 0.7),
        ))
        .with_shape(Plane::new(
            Vec3::new(0.0, -2.0, -5.0),
            Vec3::new(0.0, -1.0, 0.0),
            Material::diffuse(Color::from_hex("#ff00ff")?),
        ))
        .with_light(DirectionalLight::new(
            Vec3::new(0.0, 0.0, -1.0),
            Color::WHITE,
            2.0,
        ));

    let view = View {
        width: 100,
        height: 100,
        fov: 90.0,
        background: Color::from_hex("#555555")?,
    };

    Ok(LoadedScene { view, scene })
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse(std::env::args().skip(1))?;
    if args.help {
        println!("{}", USAGE);
        return Ok(());
    }

    let LoadedScene { view, scene } = match &args.scene {
        Some(path) => load_scene(path)
            .with_context(|| format!("Failed to load scene {}", path.display()))?,
        None => {
            log::info!("No scene given, rendering the demo scene");
            demo_scene()?
        }
    };

    let camera = Camera::from_view(&view);
    let mut image = ImageBuffer::new(view.width, view.height, view.background);

    let stats = if args.serial {
        render(&scene, &camera, &mut image)
    } else {
        render_parallel(&scene, &camera, &mut image, args.bucket_size)
    }
    .context("Render failed")?;
    log::info!(
        "{} of {} pixels hit geometry ({:.2?})",
        stats.hits,
        stats.pixels,
        stats.elapsed
    );

    image
        .save_png(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    Ok(())
}
