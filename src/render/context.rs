//! State shared between the orchestrator and the workers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::framebuffer::FrameBuffer;
use super::job::{DrawJob, Generation};
use super::latch::FrameLatch;
use super::rasterizer::{RasterTarget, TriangleOutcome, TriangleRasterizer, TriangleReport};
use super::stats::{FrameStats, StatsBoard};
use crate::light::PointLight;
use crate::texture::TextureTable;

/// Frame state every worker reads.
///
/// The texture table and light are only written by the host between
/// frames; the framebuffer is written concurrently through its atomics and
/// only swapped out on a resize.
#[derive(Debug)]
pub struct RenderContext {
    framebuffer: RwLock<Arc<FrameBuffer>>,
    textures: RwLock<TextureTable>,
    light: RwLock<PointLight>,
    generation: AtomicU64,
    latch: FrameLatch,
    stats: StatsBoard,
    rasterizer: TriangleRasterizer,
}

impl RenderContext {
    pub fn new(
        framebuffer: FrameBuffer,
        light: PointLight,
        rasterizer: TriangleRasterizer,
        workers: usize,
    ) -> Self {
        let context = Self {
            framebuffer: RwLock::new(Arc::new(framebuffer)),
            textures: RwLock::new(TextureTable::new()),
            light: RwLock::new(light),
            generation: AtomicU64::new(1),
            latch: FrameLatch::new(),
            stats: StatsBoard::new(workers),
            rasterizer,
        };
        context.latch.seal(context.generation());
        context
    }

    /// The generation jobs should be stamped with right now.
    pub fn generation(&self) -> Generation {
        self.generation.load(Ordering::Acquire)
    }

    /// Close the current frame.
    ///
    /// Queued and running jobs from the old generation stop touching the
    /// framebuffer, and their counters are no longer published. Returns the
    /// new generation.
    pub fn seal(&self) -> Generation {
        let next = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        self.latch.seal(next);
        next
    }

    pub fn latch(&self) -> &FrameLatch {
        &self.latch
    }

    pub fn stats(&self) -> &StatsBoard {
        &self.stats
    }

    pub fn rasterizer(&self) -> &TriangleRasterizer {
        &self.rasterizer
    }

    pub fn framebuffer(&self) -> Arc<FrameBuffer> {
        Arc::clone(&self.framebuffer.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn replace_framebuffer(&self, framebuffer: FrameBuffer) {
        *self
            .framebuffer
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Arc::new(framebuffer);
    }

    pub fn textures(&self) -> RwLockReadGuard<'_, TextureTable> {
        self.textures.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn textures_mut(&self) -> RwLockWriteGuard<'_, TextureTable> {
        self.textures.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn light(&self) -> PointLight {
        *self.light.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_light(&self, light: PointLight) {
        *self.light.write().unwrap_or_else(PoisonError::into_inner) = light;
    }

    /// Run one job on behalf of `worker`.
    ///
    /// Stale jobs are dropped without filling. Counters and the latch are
    /// only touched if the job's frame is still open when it finishes.
    pub fn execute(&self, worker: usize, job: &DrawJob) -> Option<TriangleReport> {
        if job.generation != self.generation() {
            log::trace!("worker {worker} dropped stale job");
            return None;
        }

        let framebuffer = self.framebuffer();
        let textures = self.textures();
        let target = RasterTarget {
            framebuffer: &framebuffer,
            textures: &textures,
            light: self.light(),
            generation: &self.generation,
        };
        let report = self.rasterizer.fill(job, &target);
        drop(textures);

        if report.outcome != TriangleOutcome::Cancelled {
            let stats = FrameStats {
                completed_jobs: 1,
                ..report.stats
            };
            self.latch
                .complete(job.generation, || self.stats.record(worker, stats));
        }
        Some(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors;
    use crate::math::mat4::Mat4;
    use crate::math::vec2::Vec2;
    use crate::math::vec3::Vec3;
    use crate::mesh::TriangleRef;

    fn context() -> RenderContext {
        RenderContext::new(
            FrameBuffer::new(32, 32, colors::BACKGROUND),
            PointLight::default(),
            TriangleRasterizer::default(),
            2,
        )
    }

    fn job(generation: Generation) -> DrawJob {
        let triangle = TriangleRef {
            positions: [
                Vec3::new(-1.0, -1.0, 0.0),
                Vec3::new(-1.0, 1.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
            ],
            tex_coords: [Vec2::ZERO; 3],
        };
        DrawJob::new(
            triangle,
            0,
            Mat4::translation(0.0, 0.0, 4.0),
            Mat4::identity(),
            Mat4::perspective_lh(45f32.to_radians(), 1.0, 0.01, 1000.0),
            generation,
        )
    }

    #[test]
    fn current_job_publishes_stats_and_counts_down() {
        let context = context();
        let generation = context.generation();
        context.latch().arm(generation, 1);

        let report = context.execute(0, &job(generation)).unwrap();
        assert_eq!(report.outcome, TriangleOutcome::Completed);
        assert_eq!(context.latch().remaining(), 0);

        let stats = context.stats().drain();
        assert_eq!(stats.completed_jobs, 1);
        assert_eq!(stats.drawn_fragments, report.stats.drawn_fragments);
    }

    #[test]
    fn stale_job_is_dropped() {
        let context = context();
        let old = context.generation();
        context.latch().arm(old, 1);
        let next = context.seal();
        assert_eq!(next, old + 1);

        assert!(context.execute(1, &job(old)).is_none());
        assert_eq!(context.stats().snapshot(), FrameStats::default());
        assert_eq!(context.framebuffer().color_at(16, 16), Some(colors::BACKGROUND));
    }

    #[test]
    fn resize_swaps_the_framebuffer() {
        let context = context();
        context.replace_framebuffer(FrameBuffer::new(8, 4, colors::WHITE));
        let fb = context.framebuffer();
        assert_eq!((fb.width(), fb.height()), (8, 4));
    }
}
