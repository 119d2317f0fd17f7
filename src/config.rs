//! Renderer tuning knobs.

use std::time::Duration;

use crate::colors;

/// How camera rotation angles are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AngleUnit {
    #[default]
    Radians,
    Degrees,
}

impl AngleUnit {
    /// Converts an angle in this unit to radians.
    #[inline]
    pub fn to_radians(self, angle: f32) -> f32 {
        match self {
            AngleUnit::Radians => angle,
            AngleUnit::Degrees => angle.to_radians(),
        }
    }
}

/// Configuration for an [`Engine`](crate::Engine).
///
/// The defaults reproduce the reference renderer: half-resolution rendering,
/// a 100 ms per-triangle budget and a 500 ms frame deadline.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Surface size is divided by this to get the render resolution.
    pub downscale: u32,
    /// Trades fill density for speed. Values below 1 leave holes in
    /// triangles close to the camera.
    pub iter_scale: f32,
    /// Triangles whose interpolation step falls below this are skipped.
    pub min_step: f32,
    /// Wall-clock ceiling for a single triangle fill.
    pub triangle_budget: Duration,
    /// How long the orchestrator waits for a frame's jobs.
    pub frame_budget: Duration,
    /// Worker thread count; `None` uses the available hardware concurrency.
    pub workers: Option<usize>,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub z_near: f32,
    pub z_far: f32,
    /// Scales the diffuse term before clamping.
    pub light_intensity: f32,
    pub background: u32,
    pub angle_unit: AngleUnit,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            downscale: 2,
            iter_scale: 0.5,
            min_step: 1e-4,
            triangle_budget: Duration::from_millis(100),
            frame_budget: Duration::from_millis(500),
            workers: None,
            fov_degrees: 45.0,
            z_near: 0.01,
            z_far: 1000.0,
            light_intensity: 8.0,
            background: colors::BACKGROUND,
            angle_unit: AngleUnit::Radians,
        }
    }
}

impl RenderConfig {
    /// Resolves [`RenderConfig::workers`] against the machine.
    pub fn worker_count(&self) -> usize {
        self.workers
            .unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(1)
            })
            .max(1)
    }

    /// Render resolution for a surface of the given size. Never zero.
    pub fn render_size(&self, surface_width: u32, surface_height: u32) -> (u32, u32) {
        let divisor = self.downscale.max(1);
        (
            (surface_width / divisor).max(1),
            (surface_height / divisor).max(1),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_size_divides_surface() {
        let config = RenderConfig::default();
        assert_eq!(config.render_size(800, 600), (400, 300));
        assert_eq!(config.render_size(1, 1), (1, 1));
    }

    #[test]
    fn worker_count_is_at_least_one() {
        let config = RenderConfig {
            workers: Some(0),
            ..RenderConfig::default()
        };
        assert_eq!(config.worker_count(), 1);
        assert!(RenderConfig::default().worker_count() >= 1);
    }

    #[test]
    fn degrees_convert_to_radians() {
        assert_eq!(AngleUnit::Radians.to_radians(1.5), 1.5);
        let r = AngleUnit::Degrees.to_radians(180.0);
        assert!((r - std::f32::consts::PI).abs() < 1e-6);
    }
}
