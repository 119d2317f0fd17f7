//! Triangle fill.
//!
//! A triangle is filled by walking two interpolation parameters over its
//! object-space corners instead of scanning pixels: `alpha_x` slides along
//! the edges `v0 -> v1` and `v0 -> v2`, and `alpha_y` slides between the two
//! resulting edge points. Each sample is projected, depth tested, textured,
//! lit and written straight into the shared [`FrameBuffer`].
//!
//! Step sizes adapt to the triangle's projected size so that small triangles
//! cost little and large ones are still covered densely enough. Because the
//! walk is affine in object space, texture coordinates are not
//! perspective-correct.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use super::framebuffer::{DepthTest, FrameBuffer};
use super::job::{DrawJob, Generation};
use super::stats::FrameStats;
use crate::config::RenderConfig;
use crate::light::PointLight;
use crate::texture::TextureTable;

/// Everything a fill reads or writes besides the job itself.
#[derive(Debug, Clone, Copy)]
pub struct RasterTarget<'a> {
    pub framebuffer: &'a FrameBuffer,
    pub textures: &'a TextureTable,
    pub light: PointLight,
    /// Generation of the frame currently being assembled.
    pub generation: &'a AtomicU64,
}

impl RasterTarget<'_> {
    /// Depth-tested write that only lands while `generation` is current.
    ///
    /// Shading sits between the per-sample check and the write, so the frame
    /// can be sealed in between; `None` means it was and nothing was stored.
    #[inline]
    pub fn write_current(
        &self,
        generation: Generation,
        x: u32,
        y: u32,
        depth: f32,
        color: u32,
    ) -> Option<DepthTest> {
        if self.generation.load(Ordering::Acquire) != generation {
            return None;
        }
        Some(self.framebuffer.write(x, y, depth, color))
    }
}

/// How a fill ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriangleOutcome {
    /// Every sample was visited.
    Completed,
    /// Culled before any sampling.
    BackFacing,
    /// The step size fell below the floor; nothing was drawn.
    TooDense,
    /// The per-triangle budget ran out; samples drawn so far are kept.
    TimedOut,
    /// The frame was sealed while this fill was running.
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriangleReport {
    pub outcome: TriangleOutcome,
    pub stats: FrameStats,
}

impl TriangleReport {
    fn new(outcome: TriangleOutcome, stats: FrameStats) -> Self {
        Self { outcome, stats }
    }
}

/// Fills triangles into a shared framebuffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleRasterizer {
    iter_scale: f32,
    min_step: f32,
    budget: Duration,
}

impl Default for TriangleRasterizer {
    fn default() -> Self {
        Self::from_config(&RenderConfig::default())
    }
}

impl TriangleRasterizer {
    pub fn new(iter_scale: f32, min_step: f32, budget: Duration) -> Self {
        Self {
            iter_scale,
            min_step,
            budget,
        }
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        Self::new(config.iter_scale, config.min_step, config.triangle_budget)
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Fill one triangle.
    ///
    /// Counters for the fill are returned rather than published; the caller
    /// decides whether they still belong to the current frame.
    pub fn fill(&self, job: &DrawJob, target: &RasterTarget<'_>) -> TriangleReport {
        let started = Instant::now();
        let mut stats = FrameStats::default();

        let model = job.model;
        let mvp = job.model_view_projection();
        let [v0, v1, v2] = job.vertices;
        let [t0, t1, t2] = job.tex_coords;

        let world = job.vertices.map(|v| model.transform_point(v));
        let screen = job.vertices.map(|v| mvp.transform_point(v));

        // Outward normal for clockwise-on-screen front faces.
        let normal = (world[1] - world[0])
            .normalize()
            .cross((world[2] - world[0]).normalize());
        if normal.dot(job.view.row3(2)) >= 0.0 {
            stats.discarded_triangles += 1;
            return TriangleReport::new(TriangleOutcome::BackFacing, stats);
        }

        let width = target.framebuffer.width();
        let height = target.framebuffer.height();

        let max_dist = screen[0]
            .distance(screen[1])
            .max(screen[0].distance(screen[2]))
            .max(screen[1].distance(screen[2]));
        let step_x = 1.0 / (width as f32 * max_dist * self.iter_scale);
        let step_y = 1.0 / (height as f32 * max_dist * self.iter_scale);
        if step_x < self.min_step || step_y < self.min_step {
            log::trace!("skipping dense triangle (max_dist = {max_dist})");
            stats.dense_triangles += 1;
            return TriangleReport::new(TriangleOutcome::TooDense, stats);
        }

        let x_max = (width - 1) as f32;
        let y_max = (height - 1) as f32;

        let mut alpha_x = 0.0f32;
        while alpha_x < 1.0 {
            let edge0 = v0.lerp(v1, alpha_x);
            let edge1 = v0.lerp(v2, alpha_x);
            let uv0 = t0.lerp(t1, alpha_x);
            let uv1 = t0.lerp(t2, alpha_x);

            let mut alpha_y = 0.0f32;
            while alpha_y < 1.0 {
                if started.elapsed() >= self.budget {
                    log::trace!("triangle fill exceeded {:?}", self.budget);
                    stats.timed_out_triangles += 1;
                    return TriangleReport::new(TriangleOutcome::TimedOut, stats);
                }
                if target.generation.load(Ordering::Acquire) != job.generation {
                    return TriangleReport::new(TriangleOutcome::Cancelled, stats);
                }

                let t = alpha_y;
                alpha_y += step_y;
                let point = edge0.lerp(edge1, t);

                let ssc = mvp.transform_point(point);
                // NaN coordinates fail `contains` too.
                if !(-1.0..=1.0).contains(&ssc.x) || !(-1.0..=1.0).contains(&ssc.y) {
                    stats.discarded_fragments += 1;
                    continue;
                }

                let px = ((ssc.x + 1.0) * 0.5 * x_max) as u32;
                let py = ((ssc.y + 1.0) * 0.5 * y_max) as u32;
                let row = height - 1 - py;

                if !target.framebuffer.is_nearer(px, row, ssc.z) {
                    stats.occluded_fragments += 1;
                    continue;
                }

                let uv = uv0.lerp(uv1, t);
                let texel = target.textures.sample(job.texture_id, uv.x, uv.y);
                let color = target
                    .light
                    .shade(texel, model.transform_point(point), normal);

                match target.write_current(job.generation, px, row, ssc.z, color) {
                    Some(DepthTest::Drawn) => stats.drawn_fragments += 1,
                    Some(DepthTest::Occluded) => stats.occluded_fragments += 1,
                    None => return TriangleReport::new(TriangleOutcome::Cancelled, stats),
                }
            }
            alpha_x += step_x;
        }

        TriangleReport::new(TriangleOutcome::Completed, stats)
    }
}
