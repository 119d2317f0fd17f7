use std::path::Path;

use crate::colors;
use crate::error::{Error, Result};

/// Number of texture slots a scene can address.
pub const TEXTURE_SLOTS: usize = 32;

/// Represents a decoded 2D image used for texture mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    data: Vec<u32>, // The pixel data of the texture in ARGB format, top row first.
    width: u32,     // The width of the texture in pixels.
    height: u32,    // The height of the texture in pixels.
}

impl Texture {
    // Load a texture from an image file (PNG, JPG, etc.)
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::result::Result<Self, image::ImageError> {
        let img = image::open(path)?.to_rgba8();
        let (width, height) = img.dimensions();

        // Convert RGBA bytes to ARGB u32
        let data: Vec<u32> = img
            .pixels()
            .map(|p| {
                let [r, g, b, a] = p.0;
                ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
            })
            .collect();

        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Builds a texture from ARGB pixels stored top row first.
    ///
    /// Returns `None` when the dimensions are zero or don't match `data`.
    pub fn from_pixels(width: u32, height: u32, data: Vec<u32>) -> Option<Self> {
        if width == 0 || height == 0 || data.len() != (width * height) as usize {
            return None;
        }
        Some(Self {
            data,
            width,
            height,
        })
    }

    /// A single-color texture.
    pub fn solid(width: u32, height: u32, color: u32) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        Self {
            data: vec![color; (width * height) as usize],
            width,
            height,
        }
    }

    /// A two-color checkerboard with square cells of `cell` pixels.
    pub fn checkerboard(size: u32, cell: u32, a: u32, b: u32) -> Self {
        let size = size.max(1);
        let cell = cell.max(1);
        let data = (0..size * size)
            .map(|i| {
                let (x, y) = (i % size, i / size);
                if (x / cell + y / cell) % 2 == 0 {
                    a
                } else {
                    b
                }
            })
            .collect();
        Self {
            data,
            width: size,
            height: size,
        }
    }

    /// Sample the texture at UV coordinates using nearest-neighbor filtering.
    ///
    /// # UV Coordinate Convention
    /// - The texel index is `ceil(uv * size)` clamped into the image, so
    ///   coordinates outside [0,1] stick to the border rather than wrapping.
    /// - `v = 0` is the bottom row: images are stored top-left origin, so the
    ///   row is flipped.
    #[inline]
    pub fn sample(&self, u: f32, v: f32) -> u32 {
        let x = texel_index(u, self.width);
        let y = texel_index(v, self.height);
        let row = self.height - 1 - y;
        self.data[(row * self.width + x) as usize]
    }

    pub fn width(&self) -> u32 {
        self.width
    }
    pub fn height(&self) -> u32 {
        self.height
    }
}

#[inline]
fn texel_index(coord: f32, size: u32) -> u32 {
    // NaN saturates to 0 through the float-to-int cast.
    ((coord * size as f32).ceil().clamp(0.0, (size - 1) as f32)) as u32
}

/// Fixed-capacity table of texture slots indexed by id.
///
/// Slots start empty; sampling an empty slot yields [`colors::NO_TEXTURE`].
#[derive(Debug, Clone)]
pub struct TextureTable {
    slots: Vec<Option<Texture>>,
}

impl Default for TextureTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureTable {
    pub fn new() -> Self {
        Self {
            slots: vec![None; TEXTURE_SLOTS],
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Stores a texture in slot `id`, replacing whatever was there.
    pub fn insert(&mut self, id: usize, texture: Texture) -> Result<()> {
        *self.slot_mut(id)? = Some(texture);
        Ok(())
    }

    /// Decodes `path` into slot `id`.
    ///
    /// A decode failure is logged and leaves the slot empty, so the scene
    /// keeps rendering with the fallback color.
    pub fn load<P: AsRef<Path>>(&mut self, id: usize, path: P) -> Result<()> {
        let path = path.as_ref();
        let slot = self.slot_mut(id)?;
        match Texture::from_file(path) {
            Ok(texture) => {
                log::info!(
                    "loaded texture {} ({}x{}) into slot {}",
                    path.display(),
                    texture.width(),
                    texture.height(),
                    id
                );
                *slot = Some(texture);
                Ok(())
            }
            Err(err) => {
                log::warn!("failed to load texture {} into slot {}: {}", path.display(), id, err);
                *slot = None;
                Err(Error::TextureDecode(err))
            }
        }
    }

    pub fn get(&self, id: usize) -> Option<&Texture> {
        self.slots.get(id).and_then(Option::as_ref)
    }

    /// Samples slot `id`, falling back to [`colors::NO_TEXTURE`] for empty or
    /// out-of-range slots.
    #[inline]
    pub fn sample(&self, id: usize, u: f32, v: f32) -> u32 {
        match self.get(id) {
            Some(texture) => texture.sample(u, v),
            None => colors::NO_TEXTURE,
        }
    }

    fn slot_mut(&mut self, id: usize) -> Result<&mut Option<Texture>> {
        let capacity = self.slots.len();
        self.slots
            .get_mut(id)
            .ok_or(Error::TextureSlot { id, capacity })
    }
}
