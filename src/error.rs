//! Error type shared by the scene-building and presentation APIs.
//!
//! Nothing inside the raster path returns an error: degenerate geometry and
//! budget overruns are absorbed there. These variants cover the edges where
//! the host hands the renderer resources.

use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("texture slot {id} is out of range (capacity {capacity})")]
    TextureSlot { id: usize, capacity: usize },

    #[error("failed to decode texture: {0}")]
    TextureDecode(#[from] image::ImageError),

    #[error("mesh table is full (capacity {0})")]
    MeshTableFull(usize),

    #[error("mesh has {positions} positions and {tex_coords} texture coordinates; expected equal counts that are a multiple of 3")]
    MeshLayout { positions: usize, tex_coords: usize },

    #[error("failed to load OBJ: {0}")]
    ObjLoad(#[from] tobj::LoadError),

    #[error("failed to spawn render worker: {0}")]
    WorkerSpawn(#[source] io::Error),

    #[error("presentation failed: {0}")]
    Present(String),
}
