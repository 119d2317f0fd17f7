use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

use clap::Parser;
use trirast::prelude::*;
use trirast::window::{WINDOW_HEIGHT, WINDOW_WIDTH};

const MOVE_SPEED: f32 = 3.0;
const TURN_SPEED: f32 = 1.5;
const SPIN_SPEED: f32 = 0.6;

/// Software-rasterized mesh viewer. WASD moves, arrow keys turn, Escape quits.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Image to texture the meshes with. Defaults to a checkerboard.
    #[arg(long)]
    texture: Option<PathBuf>,
    /// OBJ file to display. Defaults to a cube.
    #[arg(long)]
    mesh: Option<PathBuf>,
    #[arg(long, default_value_t = WINDOW_WIDTH)]
    width: u32,
    #[arg(long, default_value_t = WINDOW_HEIGHT)]
    height: u32,
    /// Worker threads. Defaults to the number of CPUs.
    #[arg(long)]
    workers: Option<usize>,
    /// Render at 1/N of the window resolution.
    #[arg(long, default_value_t = 2)]
    downscale: u32,
}

fn load_scene(engine: &mut Engine, args: &Args) -> trirast::Result<Vec<MeshId>> {
    let fallback = Texture::checkerboard(64, 8, colors::WHITE, 0xFF3050C0);
    match &args.texture {
        Some(path) => {
            if engine.add_texture(0, path).is_err() {
                log::warn!("using the built-in checkerboard instead");
                engine.set_texture(0, fallback)?;
            }
        }
        None => engine.set_texture(0, fallback)?,
    }

    let meshes = match &args.mesh {
        Some(path) => match Mesh::load_obj(path, 0) {
            Ok(meshes) => meshes,
            Err(err) => {
                log::warn!("failed to load {}: {err}; showing a cube", path.display());
                vec![Mesh::cube(0)]
            }
        },
        None => vec![Mesh::cube(0)],
    };

    meshes
        .into_iter()
        .map(|mesh| engine.add_mesh(mesh))
        .collect()
}

fn main() -> trirast::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut window = Window::new("trirast", args.width, args.height)?;
    let config = RenderConfig {
        workers: args.workers,
        downscale: args.downscale.max(1),
        ..RenderConfig::default()
    };
    let mut engine = Engine::with_config(args.width, args.height, config)?;
    let meshes = load_scene(&mut engine, &args)?;

    engine.set_camera_position(Vec3::new(0.0, 0.0, -5.0));
    engine.set_light(PointLight::new(
        Vec3::new(0.0, 3.0, -3.0),
        colors::WHITE,
        engine.config().light_intensity,
    ));

    let delta = Rc::new(Cell::new(0.0f32));
    let latest = Rc::clone(&delta);
    engine.set_update_listener(move |dt| latest.set(dt));

    let mut transform = Transform::new();
    let mut last_logged = 0;

    loop {
        match window.poll_events() {
            WindowEvent::Quit => break,
            WindowEvent::Resize(w, h) => engine.set_surface_size(w, h),
            WindowEvent::None => {}
        }

        let report = engine.render_frame(&mut window)?;
        let dt = delta.get();

        let input = window.input();
        let camera = engine.camera_mut();
        camera.move_forward(input.forward_axis() * MOVE_SPEED * dt);
        camera.move_right(input.strafe_axis() * MOVE_SPEED * dt);
        camera.turn(-input.yaw_axis() * TURN_SPEED * dt);
        camera.tilt(-input.pitch_axis() * TURN_SPEED * dt);

        transform.rotate_y(SPIN_SPEED * dt).rotate_x(SPIN_SPEED * 0.5 * dt);
        for &id in &meshes {
            if let Some(mesh) = engine.mesh_mut(id) {
                mesh.set_transform(transform.to_matrix());
            }
        }

        let second = report.elapsed.as_secs();
        if second != last_logged {
            last_logged = second;
            log::info!(
                "{} fps, {} triangles, {} fragments drawn",
                report.fps,
                report.triangles,
                report.stats.drawn_fragments
            );
        }
    }

    Ok(())
}
