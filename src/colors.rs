//! Packed ARGB8888 colors.
//!
//! Every buffer in the crate stores colors as `0xAARRGGBB` in a `u32`, the
//! layout SDL's `ARGB8888` streaming textures expect.

pub const BLACK: u32 = 0xFF000000;
pub const WHITE: u32 = 0xFFFFFFFF;

/// Sampled from an empty texture slot.
pub const NO_TEXTURE: u32 = BLACK;

/// Cleared color of the framebuffer between frames.
pub const BACKGROUND: u32 = BLACK;

#[inline]
pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    0xFF000000 | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

/// Splits a color into its `(r, g, b)` channels.
#[inline]
pub fn unpack_rgb(color: u32) -> (u8, u8, u8) {
    (
        ((color >> 16) & 0xFF) as u8,
        ((color >> 8) & 0xFF) as u8,
        (color & 0xFF) as u8,
    )
}

/// Blend two colors channel by channel, rounding to the nearest integer.
///
/// `t = 0` returns `a`, `t = 1` returns `b`. The result is always opaque.
#[inline]
pub fn lerp_color(a: u32, b: u32, t: f32) -> u32 {
    let (ar, ag, ab) = unpack_rgb(a);
    let (br, bg, bb) = unpack_rgb(b);
    let channel = |x: u8, y: u8| {
        let v = (1.0 - t) * x as f32 + t * y as f32;
        v.round().clamp(0.0, 255.0) as u8
    };
    pack_rgb(channel(ar, br), channel(ag, bg), channel(ab, bb))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_round_trips_channels() {
        let c = pack_rgb(0x12, 0x34, 0x56);
        assert_eq!(c, 0xFF123456);
        assert_eq!(unpack_rgb(c), (0x12, 0x34, 0x56));
    }

    #[test]
    fn lerp_color_hits_endpoints() {
        let a = pack_rgb(200, 17, 3);
        let b = pack_rgb(1, 255, 128);
        assert_eq!(lerp_color(a, b, 0.0), a);
        assert_eq!(lerp_color(a, b, 1.0), b);
    }

    #[test]
    fn lerp_color_rounds_to_nearest() {
        let c = lerp_color(BLACK, pack_rgb(255, 3, 1), 0.5);
        // 127.5 -> 128, 1.5 -> 2, 0.5 -> 1
        assert_eq!(unpack_rgb(c), (128, 2, 1));
    }

    #[test]
    fn lerp_color_forces_opaque_alpha() {
        let c = lerp_color(0x00102030, 0x00102030, 0.3);
        assert_eq!(c >> 24, 0xFF);
    }
}
