//! Frame orchestration.
//!
//! The [`Engine`] owns the scene (meshes, camera, light, textures) and a
//! [`WorkerPool`]. Each call to [`Engine::render_frame`] turns every mesh
//! triangle into a [`DrawJob`], hands the batch to the workers, waits for the
//! frame to finish or its deadline to pass, then presents the image and
//! resets the buffers for the next frame.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::camera::Camera;
use crate::config::RenderConfig;
use crate::error::Result;
use crate::light::PointLight;
use crate::math::vec3::Vec3;
use crate::mesh::Mesh;
use crate::projection::Projection;
use crate::render::{DrawJob, FrameBuffer, FrameStats, RenderContext, TriangleRasterizer, WorkerPool};
use crate::scene::{MeshId, MeshTable};
use crate::surface::Surface;
use crate::texture::Texture;

/// What happened during one [`Engine::render_frame`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub stats: FrameStats,
    /// Triangles across all registered meshes.
    pub triangles: usize,
    /// Jobs issued for the frame (one per triangle).
    pub jobs_expected: usize,
    /// Jobs dropped from the queue after the deadline passed.
    pub cancelled_jobs: usize,
    /// The frame deadline passed before every job finished.
    pub timed_out: bool,
    /// Time since the previous frame.
    pub delta: Duration,
    /// Time since the engine was created.
    pub elapsed: Duration,
    /// Frames completed during the last full second.
    pub fps: u32,
}

/// Tracks frame timing. FPS is refreshed once per second.
#[derive(Debug)]
struct FrameClock {
    started: Instant,
    last_frame: Instant,
    window_start: Instant,
    frames_in_window: u32,
    fps: u32,
}

impl FrameClock {
    fn new() -> Self {
        let now = Instant::now();
        Self {
            started: now,
            last_frame: now,
            window_start: now,
            frames_in_window: 0,
            fps: 0,
        }
    }

    /// Returns `(delta, elapsed, fps)`.
    fn tick(&mut self) -> (Duration, Duration, u32) {
        let now = Instant::now();
        let delta = now - self.last_frame;
        self.last_frame = now;

        self.frames_in_window += 1;
        if now - self.window_start >= Duration::from_secs(1) {
            self.fps = self.frames_in_window;
            self.frames_in_window = 0;
            self.window_start = now;
        }
        (delta, now - self.started, self.fps)
    }
}

type UpdateListener = Box<dyn FnMut(f32)>;

pub struct Engine {
    config: RenderConfig,
    context: Arc<RenderContext>,
    pool: WorkerPool,
    meshes: MeshTable,
    camera: Camera,
    projection: Projection,
    surface_size: (u32, u32),
    render_size: (u32, u32),
    listener: Option<UpdateListener>,
    clock: FrameClock,
    /// Colors of the last presented frame.
    pixels: Vec<u32>,
}

impl Engine {
    /// Engine with the default [`RenderConfig`] for a `width` x `height`
    /// surface.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::with_config(width, height, RenderConfig::default())
    }

    pub fn with_config(width: u32, height: u32, config: RenderConfig) -> Result<Self> {
        let render_size = config.render_size(width, height);
        let (render_w, render_h) = render_size;
        let workers = config.worker_count();

        let light = PointLight {
            intensity: config.light_intensity,
            ..PointLight::default()
        };
        let context = Arc::new(RenderContext::new(
            FrameBuffer::new(render_w, render_h, config.background),
            light,
            TriangleRasterizer::from_config(&config),
            workers,
        ));
        let pool = WorkerPool::start(workers, Arc::clone(&context))?;

        let projection = Projection::from_degrees(
            config.fov_degrees,
            render_w as f32 / render_h as f32,
            config.z_near,
            config.z_far,
        );

        log::info!(
            "engine ready: surface {width}x{height}, rendering at {render_w}x{render_h}"
        );

        Ok(Self {
            camera: Camera::new(config.angle_unit),
            config,
            context,
            pool,
            meshes: MeshTable::new(),
            projection,
            surface_size: (width, height),
            render_size,
            listener: None,
            clock: FrameClock::new(),
            pixels: Vec::new(),
        })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn worker_count(&self) -> usize {
        self.pool.worker_count()
    }

    pub fn surface_size(&self) -> (u32, u32) {
        self.surface_size
    }

    /// Resolution the framebuffer is rendered at.
    pub fn render_size(&self) -> (u32, u32) {
        self.render_size
    }

    /// Resize the target surface. The framebuffer is reallocated at the new
    /// render resolution and the projection's aspect ratio follows.
    pub fn set_surface_size(&mut self, width: u32, height: u32) {
        let render_size = self.config.render_size(width, height);
        self.surface_size = (width, height);
        if render_size == self.render_size {
            return;
        }
        let (render_w, render_h) = render_size;
        self.render_size = render_size;
        self.context.replace_framebuffer(FrameBuffer::new(
            render_w,
            render_h,
            self.config.background,
        ));
        self.projection
            .set_aspect_ratio(render_w as f32 / render_h as f32);
        self.pixels.clear();
        log::info!("surface resized to {width}x{height}, rendering at {render_w}x{render_h}");
    }

    /// Decode an image file into texture slot `id`.
    ///
    /// On failure the slot is left empty and the engine stays usable.
    pub fn add_texture<P: AsRef<Path>>(&mut self, id: usize, path: P) -> Result<()> {
        self.context.textures_mut().load(id, path)
    }

    pub fn set_texture(&mut self, id: usize, texture: Texture) -> Result<()> {
        self.context.textures_mut().insert(id, texture)
    }

    pub fn add_mesh(&mut self, mesh: Mesh) -> Result<MeshId> {
        let id = self.meshes.add(mesh)?;
        log::debug!(
            "registered mesh {} ({} triangles)",
            id.index(),
            self.meshes.get(id).map_or(0, Mesh::triangle_count)
        );
        Ok(id)
    }

    pub fn mesh(&self, id: MeshId) -> Option<&Mesh> {
        self.meshes.get(id)
    }

    pub fn mesh_mut(&mut self, id: MeshId) -> Option<&mut Mesh> {
        self.meshes.get_mut(id)
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn camera_position(&self) -> Vec3 {
        self.camera.position()
    }

    pub fn set_camera_position(&mut self, position: Vec3) {
        self.camera.set_position(position);
    }

    /// Euler angles in the configured [`AngleUnit`](crate::config::AngleUnit).
    pub fn camera_rotation(&self) -> Vec3 {
        self.camera.rotation()
    }

    pub fn set_camera_rotation(&mut self, rotation: Vec3) {
        self.camera.set_rotation(rotation);
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn light(&self) -> PointLight {
        self.context.light()
    }

    pub fn set_light(&mut self, light: PointLight) {
        self.context.set_light(light);
    }

    /// Called once per frame, after presenting, with the frame delta in
    /// seconds. Replaces any previous listener.
    pub fn set_update_listener(&mut self, listener: impl FnMut(f32) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn clear_update_listener(&mut self) {
        self.listener = None;
    }

    /// Colors of the last presented frame, top row first. Empty before the
    /// first frame.
    pub fn frame_pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Render one frame and present it to `surface`.
    pub fn render_frame(&mut self, surface: &mut dyn Surface) -> Result<FrameReport> {
        let view = self.camera.view_matrix();
        let projection = self.projection.matrix();
        let generation = self.context.generation();

        let jobs: Vec<DrawJob> = self
            .meshes
            .iter()
            .flat_map(|mesh| {
                let model = mesh.transform();
                let texture_id = mesh.texture_id();
                mesh.triangles().map(move |triangle| {
                    DrawJob::new(triangle, texture_id, model, view, projection, generation)
                })
            })
            .collect();
        let jobs_expected = jobs.len();

        self.context.latch().arm(generation, jobs_expected);
        self.pool.push_batch(jobs);

        let timed_out = !self.context.latch().wait_timeout(self.config.frame_budget);
        let mut cancelled_jobs = 0;
        if timed_out {
            cancelled_jobs = self.pool.cancel_pending();
            log::warn!(
                "frame missed its {:?} deadline: {} of {jobs_expected} job(s) unfinished, {cancelled_jobs} cancelled",
                self.config.frame_budget,
                self.context.latch().remaining(),
            );
        }
        self.context.seal();

        let framebuffer = self.context.framebuffer();
        framebuffer.copy_colors(&mut self.pixels);
        let presented = surface.present(&self.pixels, framebuffer.width(), framebuffer.height());
        framebuffer.clear(self.config.background);

        let stats = self.context.stats().drain();
        log::debug!(
            "frame: {} drawn, {} off-screen, {} occluded, {} back-facing, {} dense, {} timed out, {}/{jobs_expected} jobs",
            stats.drawn_fragments,
            stats.discarded_fragments,
            stats.occluded_fragments,
            stats.discarded_triangles,
            stats.dense_triangles,
            stats.timed_out_triangles,
            stats.completed_jobs,
        );

        let (delta, elapsed, fps) = self.clock.tick();
        if let Some(listener) = self.listener.as_mut() {
            listener(delta.as_secs_f32());
        }

        presented?;
        Ok(FrameReport {
            stats,
            triangles: self.meshes.triangle_count(),
            jobs_expected,
            cancelled_jobs,
            timed_out,
            delta,
            elapsed,
            fps,
        })
    }
}
