//! Draw jobs: one triangle's worth of work.

use crate::math::mat4::Mat4;
use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;
use crate::mesh::TriangleRef;

/// Identifies the frame a job was issued for.
///
/// The orchestrator advances the shared generation when it seals a frame;
/// any job or fill still carrying the old value is stale and must not touch
/// the buffers again.
pub type Generation = u64;

/// Immutable snapshot of everything a single triangle fill needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawJob {
    pub texture_id: usize,
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
    /// Object-space corners.
    pub vertices: [Vec3; 3],
    pub tex_coords: [Vec2; 3],
    pub generation: Generation,
}

impl DrawJob {
    pub fn new(
        triangle: TriangleRef,
        texture_id: usize,
        model: Mat4,
        view: Mat4,
        projection: Mat4,
        generation: Generation,
    ) -> Self {
        Self {
            texture_id,
            model,
            view,
            projection,
            vertices: triangle.positions,
            tex_coords: triangle.tex_coords,
            generation,
        }
    }

    /// `projection * view * model`.
    pub fn model_view_projection(&self) -> Mat4 {
        self.projection * (self.view * self.model)
    }
}
