//! 4x4 transformation matrix using column-major convention.
//!
//! # Convention
//! - Vectors are **column vectors** on the right: `Mat4 * Vec`
//! - Translation is stored in the **last column**
//! - Transforms chain **right-to-left**: `A * B * v` applies B first, then A
//!
//! A full vertex transform is therefore `projection * view * model * v`.

use std::ops::Mul;

use super::vec3::Vec3;
use super::vec4::Vec4;

/// 4x4 matrix stored as `data[row][col]` with column-major convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    data: [[f32; 4]; 4],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mat4 {
    pub const fn new(data: [[f32; 4]; 4]) -> Self {
        Mat4 { data }
    }

    pub const fn identity() -> Self {
        Mat4::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a translation matrix.
    ///
    /// Translation is stored in the last column (column-major convention).
    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        Mat4::new([
            [1.0, 0.0, 0.0, x],
            [0.0, 1.0, 0.0, y],
            [0.0, 0.0, 1.0, z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a scale matrix.
    pub fn scaling(x: f32, y: f32, z: f32) -> Self {
        Mat4::new([
            [x, 0.0, 0.0, 0.0],
            [0.0, y, 0.0, 0.0],
            [0.0, 0.0, z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a rotation matrix around the X axis.
    pub fn rotation_x(angle: f32) -> Self {
        let c = angle.cos();
        let s = angle.sin();
        Mat4::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, s, 0.0],
            [0.0, -s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a rotation matrix around the Y axis.
    pub fn rotation_y(angle: f32) -> Self {
        let c = angle.cos();
        let s = angle.sin();
        Mat4::new([
            [c, 0.0, -s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a rotation matrix around the Z axis.
    pub fn rotation_z(angle: f32) -> Self {
        let c = angle.cos();
        let s = angle.sin();
        Mat4::new([
            [c, s, 0.0, 0.0],
            [-s, c, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a left-handed perspective matrix.
    ///
    /// The camera looks down +Z. After perspective division, x and y land in
    /// [-1, 1] inside the view and depth maps `near -> 0`, `far -> 1`, so a
    /// smaller depth is always nearer. Clip-space `w` is the view-space `z`.
    ///
    /// `fov` is the vertical field of view in radians.
    pub fn perspective_lh(fov: f32, aspect_ratio: f32, near: f32, far: f32) -> Self {
        let f = 1.0 / (fov / 2.0).tan();
        let a = far / (far - near);
        let b = -near * far / (far - near);
        Mat4::new([
            [f / aspect_ratio, 0.0, 0.0, 0.0],
            [0.0, f, 0.0, 0.0],
            [0.0, 0.0, a, b],
            [0.0, 0.0, 1.0, 0.0],
        ])
    }

    pub fn transpose(&self) -> Self {
        let mut data = [[0.0f32; 4]; 4];
        for (row, values) in data.iter_mut().enumerate() {
            for (col, value) in values.iter_mut().enumerate() {
                *value = self.data[col][row];
            }
        }
        Mat4::new(data)
    }

    /// Access element at [row][col].
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row][col]
    }

    /// The first three entries of a row.
    ///
    /// For a view matrix, row 2 is the camera's forward axis expressed in
    /// world space.
    #[inline]
    pub fn row3(&self, row: usize) -> Vec3 {
        Vec3::new(self.data[row][0], self.data[row][1], self.data[row][2])
    }

    /// Transforms a point (w = 1) and applies perspective division.
    #[inline]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        (*self * Vec4::point(point)).wdivide()
    }
}

/// Matrix multiplication: Mat4 * Mat4.
///
/// For column-major convention, `A * B * v` applies B first, then A.
impl Mul<Mat4> for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Self::Output {
        let mut result = [[0.0f32; 4]; 4];

        for (row, values) in result.iter_mut().enumerate() {
            for (col, value) in values.iter_mut().enumerate() {
                *value = self.data[row][0] * rhs.data[0][col]
                    + self.data[row][1] * rhs.data[1][col]
                    + self.data[row][2] * rhs.data[2][col]
                    + self.data[row][3] * rhs.data[3][col];
            }
        }

        Mat4::new(result)
    }
}

/// Transform a Vec4 by a matrix: Mat4 * Vec4 (column vector).
impl Mul<Vec4> for Mat4 {
    type Output = Vec4;

    fn mul(self, v: Vec4) -> Self::Output {
        let row = |r: usize| {
            self.data[r][0] * v.x + self.data[r][1] * v.y + self.data[r][2] * v.z + self.data[r][3] * v.w
        };
        Vec4::new(row(0), row(1), row(2), row(3))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn identity_is_neutral() {
        let m = Mat4::translation(1.0, 2.0, 3.0) * Mat4::rotation_y(0.3);
        assert_eq!(Mat4::identity() * m, m);
        assert_eq!(m * Mat4::identity(), m);
    }

    #[test]
    fn translation_moves_points() {
        let p = Mat4::translation(1.0, -2.0, 3.0).transform_point(Vec3::ONE);
        assert_eq!(p, Vec3::new(2.0, -1.0, 4.0));
    }

    #[test]
    fn composition_applies_right_to_left() {
        // Scale first, then translate.
        let m = Mat4::translation(10.0, 0.0, 0.0) * Mat4::scaling(2.0, 2.0, 2.0);
        let p = m.transform_point(Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(p, Vec3::new(12.0, 2.0, 2.0));
    }

    #[test]
    fn rotation_y_quarter_turn() {
        let p = Mat4::rotation_y(std::f32::consts::FRAC_PI_2).transform_point(Vec3::FORWARD);
        assert_relative_eq!(p.x, -1.0, epsilon = 1e-6);
        assert_relative_eq!(p.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn transpose_swaps_rows_and_columns() {
        let m = Mat4::translation(4.0, 5.0, 6.0);
        let t = m.transpose();
        assert_eq!(t.get(3, 0), 4.0);
        assert_eq!(t.get(3, 2), 6.0);
        assert_eq!(t.transpose(), m);
    }

    #[test]
    fn perspective_maps_depth_range_to_unit_interval() {
        let proj = Mat4::perspective_lh(45f32.to_radians(), 1.0, 0.5, 50.0);
        let near = proj.transform_point(Vec3::new(0.0, 0.0, 0.5));
        let far = proj.transform_point(Vec3::new(0.0, 0.0, 50.0));
        let mid = proj.transform_point(Vec3::new(0.0, 0.0, 5.0));
        assert_relative_eq!(near.z, 0.0, epsilon = 1e-6);
        assert_relative_eq!(far.z, 1.0, epsilon = 1e-6);
        assert!(mid.z > near.z && mid.z < far.z);
    }

    #[test]
    fn perspective_edges_of_view_land_on_unit_square() {
        let fov = 90f32.to_radians();
        let proj = Mat4::perspective_lh(fov, 2.0, 0.1, 100.0);
        // tan(45deg) = 1: at z = 3 the view spans y in [-3, 3] and x in [-6, 6].
        let top = proj.transform_point(Vec3::new(0.0, 3.0, 3.0));
        let right = proj.transform_point(Vec3::new(6.0, 0.0, 3.0));
        assert_relative_eq!(top.y, 1.0, epsilon = 1e-5);
        assert_relative_eq!(right.x, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn row3_reads_first_three_columns() {
        let m = Mat4::rotation_x(0.0) * Mat4::translation(7.0, 8.0, 9.0);
        assert_eq!(m.row3(2), Vec3::FORWARD);
    }
}
