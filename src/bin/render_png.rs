//! Headless renderer: draw a few frames and save the last one.
//!
//! ```bash
//! cargo run --release --bin render_png -- --frames 30 --turn 0.02 -o out.png
//! ```

use std::{path::PathBuf, time::Instant};

use anyhow::Context as _;
use clap::Parser;

use yacast_rs::demo::{self, Scene};

#[derive(Debug, Parser)]
#[command(about = "Render the raycaster to a PNG file")]
struct Args {
    #[arg(long, default_value_t = 160)]
    width: usize,

    #[arg(long, default_value_t = 144)]
    height: usize,

    /// Frames to render; the camera turns and pitches between them.
    #[arg(long, default_value_t = 1)]
    frames: u32,

    /// Rotation per frame, radians (positive turns left).
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    turn: f32,

    /// Pitch per frame, passed to `Camera::look`.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    look: f32,

    #[arg(long)]
    tileset: Option<PathBuf>,

    #[arg(long)]
    skybox: Option<PathBuf>,

    /// Text layout to load instead of the built-in level.
    #[arg(long)]
    map: Option<PathBuf>,

    #[arg(long, short = 'o', default_value = "frame.png")]
    output: PathBuf,

    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    demo::init_logging(args.verbose)?;

    let scene = Scene::load(
        args.map.as_deref(),
        args.tileset.as_deref(),
        args.skybox.as_deref(),
        args.height,
    )
    .context("loading scene")?;
    let mut renderer = scene.renderer(args.width, args.height)?;
    let Scene {
        map, mut camera, ..
    } = scene;

    let t0 = Instant::now();
    for frame in 0..args.frames.max(1) {
        if frame > 0 {
            camera.rotate(args.turn);
            camera.look(args.look);
        }
        renderer.render(&camera, &map)?;
    }
    log::info!(
        "{} frame(s) at {}x{} in {:.2} ms",
        args.frames.max(1),
        args.width,
        args.height,
        t0.elapsed().as_secs_f64() * 1000.0
    );

    let fb = renderer.frame();
    let img = image::RgbaImage::from_raw(fb.width() as u32, fb.height() as u32, fb.pixels().to_vec())
        .context("framebuffer does not match its dimensions")?;
    img.save(&args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;
    log::info!("wrote {}", args.output.display());
    Ok(())
}
