//! Shared color + depth buffer.
//!
//! Every worker writes into the same [`FrameBuffer`] concurrently. Instead of
//! guarding the whole buffer with one lock, each pixel is a single
//! `AtomicU64` holding both values:
//!
//! ```text
//!  63            32 31             0
//! +----------------+----------------+
//! |  depth (f32)   |  color (ARGB)  |
//! +----------------+----------------+
//! ```
//!
//! A write re-runs the depth test inside a compare-and-swap loop, so the
//! visible-surface invariant holds no matter which worker lands first.

use std::sync::atomic::{AtomicU64, Ordering};

/// Depth of a cleared pixel. Fragments must be strictly nearer (smaller).
pub const FAR_DEPTH: f32 = 1.0;

#[inline]
fn pack(depth: f32, color: u32) -> u64 {
    ((depth.to_bits() as u64) << 32) | color as u64
}

#[inline]
fn unpack_depth(pixel: u64) -> f32 {
    f32::from_bits((pixel >> 32) as u32)
}

#[inline]
fn unpack_color(pixel: u64) -> u32 {
    pixel as u32
}

/// Result of a depth-tested write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthTest {
    /// The fragment was nearer and is now stored.
    Drawn,
    /// Something at least as near was already there.
    Occluded,
}

pub struct FrameBuffer {
    pixels: Box<[AtomicU64]>,
    width: u32,
    height: u32,
}

impl FrameBuffer {
    /// Create a buffer cleared to `background` at [`FAR_DEPTH`].
    pub fn new(width: u32, height: u32, background: u32) -> Self {
        let cleared = pack(FAR_DEPTH, background);
        let pixels = (0..(width as usize * height as usize))
            .map(|_| AtomicU64::new(cleared))
            .collect();
        Self {
            pixels,
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| (y * self.width + x) as usize)
    }

    /// Cheap pre-check used before shading: would a fragment at `depth` pass?
    ///
    /// The answer can go stale immediately; [`FrameBuffer::write`] repeats the
    /// test atomically.
    #[inline]
    pub fn is_nearer(&self, x: u32, y: u32, depth: f32) -> bool {
        match self.index(x, y) {
            Some(i) => depth < unpack_depth(self.pixels[i].load(Ordering::Acquire)),
            None => false,
        }
    }

    /// Store `color` at `(x, y)` if `depth` is strictly less than the stored
    /// depth. Out-of-bounds coordinates count as occluded.
    #[inline]
    pub fn write(&self, x: u32, y: u32, depth: f32, color: u32) -> DepthTest {
        let Some(i) = self.index(x, y) else {
            return DepthTest::Occluded;
        };
        let cell = &self.pixels[i];
        let new = pack(depth, color);
        let mut current = cell.load(Ordering::Acquire);
        loop {
            // NaN depth fails this comparison and is never stored.
            if !(depth < unpack_depth(current)) {
                return DepthTest::Occluded;
            }
            match cell.compare_exchange_weak(current, new, Ordering::AcqRel, Ordering::Acquire) {
                Ok(_) => return DepthTest::Drawn,
                Err(actual) => current = actual,
            }
        }
    }

    /// Reset every pixel to `background` at [`FAR_DEPTH`].
    pub fn clear(&self, background: u32) {
        let cleared = pack(FAR_DEPTH, background);
        for pixel in self.pixels.iter() {
            pixel.store(cleared, Ordering::Release);
        }
    }

    pub fn color_at(&self, x: u32, y: u32) -> Option<u32> {
        self.index(x, y)
            .map(|i| unpack_color(self.pixels[i].load(Ordering::Acquire)))
    }

    pub fn depth_at(&self, x: u32, y: u32) -> Option<f32> {
        self.index(x, y)
            .map(|i| unpack_depth(self.pixels[i].load(Ordering::Acquire)))
    }

    /// Copy the color plane, top row first, into `out`.
    pub fn copy_colors(&self, out: &mut Vec<u32>) {
        out.clear();
        out.extend(
            self.pixels
                .iter()
                .map(|p| unpack_color(p.load(Ordering::Acquire))),
        );
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    const RED: u32 = 0xFFFF0000;
    const BLUE: u32 = 0xFF0000FF;

    #[test]
    fn new_buffer_is_cleared() {
        let fb = FrameBuffer::new(3, 2, BLUE);
        assert_eq!(fb.color_at(2, 1), Some(BLUE));
        assert_eq!(fb.depth_at(0, 0), Some(FAR_DEPTH));
        assert_eq!(fb.color_at(3, 0), None);
    }

    #[test]
    fn nearer_fragment_wins_either_order() {
        let a = FrameBuffer::new(1, 1, 0);
        assert_eq!(a.write(0, 0, 0.5, RED), DepthTest::Drawn);
        assert_eq!(a.write(0, 0, 0.7, BLUE), DepthTest::Occluded);

        let b = FrameBuffer::new(1, 1, 0);
        assert_eq!(b.write(0, 0, 0.7, BLUE), DepthTest::Drawn);
        assert_eq!(b.write(0, 0, 0.5, RED), DepthTest::Drawn);

        assert_eq!(a.color_at(0, 0), b.color_at(0, 0));
        assert_eq!(a.depth_at(0, 0), Some(0.5));
    }

    #[test]
    fn equal_depth_is_occluded() {
        let fb = FrameBuffer::new(1, 1, 0);
        fb.write(0, 0, 0.25, RED);
        assert_eq!(fb.write(0, 0, 0.25, BLUE), DepthTest::Occluded);
        assert_eq!(fb.write(0, 0, FAR_DEPTH, BLUE), DepthTest::Occluded);
    }

    #[test]
    fn nan_depth_never_lands() {
        let fb = FrameBuffer::new(1, 1, 0);
        assert!(!fb.is_nearer(0, 0, f32::NAN));
        assert_eq!(fb.write(0, 0, f32::NAN, RED), DepthTest::Occluded);
        assert_eq!(fb.color_at(0, 0), Some(0));
    }

    #[test]
    fn clear_resets_depth_and_color() {
        let fb = FrameBuffer::new(2, 2, 0);
        fb.write(1, 1, 0.1, RED);
        fb.clear(BLUE);
        assert_eq!(fb.color_at(1, 1), Some(BLUE));
        assert_eq!(fb.depth_at(1, 1), Some(FAR_DEPTH));
    }

    #[test]
    fn concurrent_writers_keep_nearest() {
        let fb = Arc::new(FrameBuffer::new(4, 4, 0));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let fb = Arc::clone(&fb);
                thread::spawn(move || {
                    for step in 0..200u32 {
                        let depth = 0.001 + ((t * 200 + step) as f32) / 4000.0;
                        for y in 0..4 {
                            for x in 0..4 {
                                fb.write(x, y, depth, t);
                            }
                        }
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(fb.depth_at(x, y), Some(0.001));
                assert_eq!(fb.color_at(x, y), Some(0));
            }
        }
    }

    #[test]
    fn copy_colors_is_row_major() {
        let fb = FrameBuffer::new(2, 2, 0);
        fb.write(1, 0, 0.5, RED);
        fb.write(0, 1, 0.5, BLUE);
        let mut out = Vec::new();
        fb.copy_colors(&mut out);
        assert_eq!(out, vec![0, RED, BLUE, 0]);
    }
}
