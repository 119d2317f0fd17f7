//! A multi-threaded software rasterizer.
//!
//! Meshes are split into one draw job per triangle every frame. A pool of
//! worker threads fills those triangles into a shared, lock-free color and
//! depth buffer; the [`Engine`] waits for the frame (up to a deadline),
//! presents it to a [`Surface`] and resets for the next one. No GPU is
//! involved; the optional `window` feature only uses SDL2 to show the result.
//!
//! # Quick Start
//!
//! ```no_run
//! use trirast::prelude::*;
//!
//! # fn main() -> trirast::Result<()> {
//! let mut engine = Engine::new(800, 600)?;
//! engine.set_texture(0, Texture::checkerboard(64, 8, colors::WHITE, 0xFF3050C0))?;
//! let cube = engine.add_mesh(Mesh::cube(0))?;
//! if let Some(mesh) = engine.mesh_mut(cube) {
//!     mesh.set_transform(Mat4::translation(0.0, 0.0, 5.0));
//! }
//!
//! let mut surface = BufferSurface::new();
//! let report = engine.render_frame(&mut surface)?;
//! println!("{} fragments drawn", report.stats.drawn_fragments);
//! # Ok(())
//! # }
//! ```

// Public API - exposed to library consumers
pub mod camera;
pub mod colors;
pub mod config;
pub mod engine;
pub mod error;
pub mod light;
pub mod math;
pub mod mesh;
pub mod projection;
pub mod render;
pub mod scene;
pub mod surface;
pub mod texture;
pub mod transform;
#[cfg(feature = "window")]
pub mod window;

// Re-export commonly needed types at crate root for convenience
pub use config::{AngleUnit, RenderConfig};
pub use engine::{Engine, FrameReport};
pub use error::{Error, Result};
pub use light::PointLight;
pub use mesh::Mesh;
pub use render::FrameStats;
pub use scene::MeshId;
pub use surface::{BufferSurface, Surface};
pub use texture::Texture;
pub use transform::Transform;

/// Prelude module for convenient imports.
///
/// # Example
/// ```ignore
/// use trirast::prelude::*;
/// ```
pub mod prelude {
    // Engine
    pub use crate::config::{AngleUnit, RenderConfig};
    pub use crate::engine::{Engine, FrameReport};
    pub use crate::render::FrameStats;

    // Scene
    pub use crate::camera::Camera;
    pub use crate::colors;
    pub use crate::light::PointLight;
    pub use crate::mesh::Mesh;
    pub use crate::projection::Projection;
    pub use crate::scene::MeshId;
    pub use crate::texture::Texture;
    pub use crate::transform::Transform;

    // Math
    pub use crate::math::mat4::Mat4;
    pub use crate::math::vec2::Vec2;
    pub use crate::math::vec3::Vec3;
    pub use crate::math::vec4::Vec4;

    // Output
    pub use crate::surface::{BufferSurface, Surface};

    // Window & Input
    #[cfg(feature = "window")]
    pub use crate::window::{InputState, Window, WindowEvent};
}

