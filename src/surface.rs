//! Where finished frames go.

use crate::error::Result;

/// A display target for finished frames.
///
/// `pixels` is ARGB8888, top row first, `width * height` long.
pub trait Surface {
    fn present(&mut self, pixels: &[u32], width: u32, height: u32) -> Result<()>;
}

/// Keeps the most recent frame in memory. Useful headless and in tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BufferSurface {
    pixels: Vec<u32>,
    width: u32,
    height: u32,
    frames: u64,
}

impl BufferSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of frames presented so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }
}

impl Surface for BufferSurface {
    fn present(&mut self, pixels: &[u32], width: u32, height: u32) -> Result<()> {
        self.pixels.clear();
        self.pixels.extend_from_slice(pixels);
        self.width = width;
        self.height = height;
        self.frames += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_last_frame() {
        let mut surface = BufferSurface::new();
        surface.present(&[1, 2, 3, 4], 2, 2).unwrap();
        surface.present(&[5, 6, 7, 8, 9, 10], 3, 2).unwrap();

        assert_eq!(surface.frames(), 2);
        assert_eq!((surface.width(), surface.height()), (3, 2));
        assert_eq!(surface.pixel(2, 1), Some(10));
        assert_eq!(surface.pixel(3, 0), None);
    }
}
