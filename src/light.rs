//! Point light shading.

use crate::colors::{self, lerp_color};
use crate::math::vec3::Vec3;

/// A single point light with inverse-square falloff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    /// Color that strongly lit fragments blend toward.
    pub color: u32,
    /// Multiplier applied to the attenuated diffuse term before clamping.
    pub intensity: f32,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 3.0, 3.0),
            color: colors::WHITE,
            intensity: 8.0,
        }
    }
}

impl PointLight {
    pub fn new(position: Vec3, color: u32, intensity: f32) -> Self {
        Self {
            position,
            color,
            intensity,
        }
    }

    /// Unclamped diffuse factor for a fragment at `world`.
    ///
    /// `normal` is the outward surface normal as the rasterizer builds it:
    /// the cross product of the two normalized edges leaving the first
    /// corner. Its length is the sine of the angle between those edges, not
    /// 1, and it scales the factor linearly. The factor is
    /// `clamp(dot(to_light, normal), 0, 1) * intensity / (1 + d²)`.
    #[inline]
    pub fn diffuse(&self, world: Vec3, normal: Vec3) -> f32 {
        let to_light = (self.position - world).normalize();
        let distance = world.distance(self.position);
        let attenuation = 1.0 / (1.0 + distance * distance);
        self.intensity * to_light.dot(normal).clamp(0.0, 1.0) * attenuation
    }

    /// Shades a texel lit by this light.
    ///
    /// The texel fades in from black by the diffuse factor, then washes toward
    /// the light color by the squared factor; both clamped to [0, 1].
    #[inline]
    pub fn shade(&self, texel: u32, world: Vec3, normal: Vec3) -> u32 {
        let diffuse = self.diffuse(world, normal);
        let lit = lerp_color(colors::BLACK, texel, diffuse.clamp(0.0, 1.0));
        lerp_color(lit, self.color, (diffuse * diffuse).clamp(0.0, 1.0))
    }
}
