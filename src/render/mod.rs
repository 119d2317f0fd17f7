//! The rasterization core and the job system that feeds it.

pub mod context;
pub mod framebuffer;
pub mod job;
pub mod latch;
pub mod pool;
pub mod rasterizer;
pub mod stats;

pub use context::RenderContext;
pub use framebuffer::{DepthTest, FrameBuffer, FAR_DEPTH};
pub use job::{DrawJob, Generation};
pub use latch::FrameLatch;
pub use pool::WorkerPool;
pub use rasterizer::{RasterTarget, TriangleOutcome, TriangleRasterizer, TriangleReport};
pub use stats::{FrameStats, StatsBoard};
