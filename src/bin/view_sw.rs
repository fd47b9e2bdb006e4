//! Interactive viewer.
//!
//! ```bash
//! cargo run --release --bin view_sw -- [--map level.txt] [--tileset tiles.png]
//! ```
//!
//! W/S walk, A/D strafe, ←/→ turn, ↑/↓ look, drag with the left mouse
//! button to turn and look, Esc quits.

use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::Context as _;
use clap::Parser;
use minifb::{Key, MouseButton, MouseMode, Scale, Window, WindowOptions};

use yacast_rs::{
    demo::{self, MouseLook, Scene},
    renderer::RendererExt,
    world::Collider,
};

const MOVE_SPEED: f32 = 0.05;
const TURN_SPEED: f32 = 0.03;
const LOOK_STEP: f32 = 0.02;
const PLAYER_RADIUS: f32 = 0.2;

#[derive(Debug, Parser)]
#[command(about = "Software raycaster viewer")]
struct Args {
    /// Framebuffer width in pixels.
    #[arg(long, default_value_t = 320)]
    width: usize,

    /// Framebuffer height in pixels.
    #[arg(long, default_value_t = 240)]
    height: usize,

    /// Window pixels per framebuffer pixel: 1, 2, 4 or 8.
    #[arg(long, default_value_t = 2)]
    scale: u8,

    /// Horizontal strip of 64×64 wall textures; square `n` becomes id `n + 1`.
    #[arg(long)]
    tileset: Option<PathBuf>,

    /// Horizontal-cross skybox image.
    #[arg(long)]
    skybox: Option<PathBuf>,

    /// Text layout to load instead of the built-in level.
    #[arg(long)]
    map: Option<PathBuf>,

    /// Debug-level logging.
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    demo::init_logging(args.verbose)?;

    let scale = match args.scale {
        1 => Scale::X1,
        2 => Scale::X2,
        4 => Scale::X4,
        8 => Scale::X8,
        other => anyhow::bail!("unsupported scale {other}; use 1, 2, 4 or 8"),
    };

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

    let (w, h) = (args.width, args.height);
    let mut buffer = vec![0u32; w * h];
    let mut win = Window::new(
        "yacast - software",
        w,
        h,
        WindowOptions {
            scale,
            ..WindowOptions::default()
        },
    )?;
    win.set_target_fps(60);
    let mut mouse = MouseLook::default();

    // ────────────────── benchmarking state ──────────────────────────────
    let mut acc_time = Duration::ZERO;
    let mut acc_frames = 0usize;
    let mut last_print = Instant::now();

    while win.is_open() && !win.is_key_down(Key::Escape) {
        /* movement --------------------------------------------------------- */
        let collider = Some(Collider {
            world: &map,
            radius: PLAYER_RADIUS,
        });
        if win.is_key_down(Key::W) {
            camera.move_forward(MOVE_SPEED, collider);
        }
        if win.is_key_down(Key::S) {
            camera.move_forward(-MOVE_SPEED, collider);
        }
        if win.is_key_down(Key::A) {
            camera.strafe(-MOVE_SPEED, collider);
        }
        if win.is_key_down(Key::D) {
            camera.strafe(MOVE_SPEED, collider);
        }
        if win.is_key_down(Key::Left) {
            camera.rotate(TURN_SPEED);
        }
        if win.is_key_down(Key::Right) {
            camera.rotate(-TURN_SPEED);
        }
        if win.is_key_down(Key::Up) {
            camera.look(LOOK_STEP);
        }
        if win.is_key_down(Key::Down) {
            camera.look(-LOOK_STEP);
        }

        let pointer = if win.get_mouse_down(MouseButton::Left) {
            win.get_mouse_pos(MouseMode::Discard)
        } else {
            None
        };
        let (turn, look) = mouse.update(pointer, (w, h));
        camera.rotate(turn);
        camera.look(look);

        /* draw */
        let t0 = Instant::now();
        renderer.draw_frame(&camera, &map, |fb| fb.copy_to_argb(&mut buffer));
        acc_time += t0.elapsed();
        acc_frames += 1;
        win.update_with_buffer(&buffer, w, h)?;

        if last_print.elapsed() >= Duration::from_secs(3) {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames as f64;
            log::info!("avg render: {avg_ms:.2} ms ({:.1} FPS)", 1000.0 / avg_ms);
            log::debug!("camera at {:?} facing {:?}", camera.pos(), camera.dir());
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }
    }
    Ok(())
}
