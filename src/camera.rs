//! Free-look camera.
//!
//! # Coordinate System
//!
//! Uses a **left-handed** coordinate system:
//! - X: positive right
//! - Y: positive up
//! - Z: positive forward (into screen)
//!
//! The camera is a world position plus Euler angles. The view matrix undoes
//! both: `Rx(-x) * Ry(-y) * Rz(-z) * T(-position)`.

use crate::config::AngleUnit;
use crate::math::mat4::Mat4;
use crate::math::vec3::Vec3;

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    position: Vec3,
    rotation: Vec3, // Euler angles about X, Y, Z in `unit`
    unit: AngleUnit,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(AngleUnit::default())
    }
}

impl Camera {
    /// Creates a camera at the origin looking along +Z.
    pub fn new(unit: AngleUnit) -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            unit,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Euler angles in the camera's [`AngleUnit`].
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: Vec3) {
        self.rotation = rotation;
    }

    pub fn unit(&self) -> AngleUnit {
        self.unit
    }

    /// Adds to the yaw (rotation about Y), in the camera's unit.
    pub fn turn(&mut self, delta: f32) {
        self.rotation.y += delta;
    }

    /// Adds to the pitch (rotation about X), in the camera's unit.
    pub fn tilt(&mut self, delta: f32) {
        self.rotation.x += delta;
    }

    /// Moves along the view direction.
    pub fn move_forward(&mut self, distance: f32) {
        self.position = self.position + self.forward() * distance;
    }

    /// Moves along the camera's right axis.
    pub fn move_right(&mut self, distance: f32) {
        self.position = self.position + self.right() * distance;
    }

    /// World to view transform.
    pub fn view_matrix(&self) -> Mat4 {
        let to_rad = |a: f32| self.unit.to_radians(a);
        Mat4::rotation_x(-to_rad(self.rotation.x))
            * Mat4::rotation_y(-to_rad(self.rotation.y))
            * Mat4::rotation_z(-to_rad(self.rotation.z))
            * Mat4::translation(-self.position.x, -self.position.y, -self.position.z)
    }

    /// World-space view direction (the view matrix's third row).
    pub fn forward(&self) -> Vec3 {
        self.view_matrix().row3(2)
    }

    /// World-space right axis (the view matrix's first row).
    pub fn right(&self) -> Vec3 {
        self.view_matrix().row3(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn camera_starts_looking_forward() {
        let camera = Camera::default();
        assert_eq!(camera.forward(), Vec3::FORWARD);
        assert_eq!(camera.view_matrix(), Mat4::identity());
    }

    #[test]
    fn view_matrix_moves_world_opposite_to_camera() {
        let mut camera = Camera::default();
        camera.set_position(Vec3::new(0.0, 0.0, -5.0));
        let origin = camera.view_matrix().transform_point(Vec3::ZERO);
        assert_relative_eq!(origin.z, 5.0, epsilon = 1e-6);
    }

    #[test]
    fn yaw_quarter_turn_faces_negative_x() {
        let mut camera = Camera::default();
        camera.turn(FRAC_PI_2);
        let f = camera.forward();
        assert_relative_eq!(f.x, -1.0, epsilon = 1e-6);
        assert_relative_eq!(f.z, 0.0, epsilon = 1e-6);

        // Whatever the camera faces ends up straight ahead in view space.
        let ahead = camera.view_matrix().transform_point(f * 3.0);
        assert_relative_eq!(ahead.z, 3.0, epsilon = 1e-5);
        assert_relative_eq!(ahead.x, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn degrees_and_radians_agree() {
        let mut radians = Camera::new(AngleUnit::Radians);
        let mut degrees = Camera::new(AngleUnit::Degrees);
        radians.set_rotation(Vec3::new(0.2, FRAC_PI_2, 0.0));
        degrees.set_rotation(Vec3::new(0.2f32.to_degrees(), 90.0, 0.0));
        let (a, b) = (radians.forward(), degrees.forward());
        assert_relative_eq!(a.x, b.x, epsilon = 1e-5);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-5);
        assert_relative_eq!(a.z, b.z, epsilon = 1e-5);
    }

    #[test]
    fn move_forward_follows_view_direction() {
        let mut camera = Camera::default();
        camera.move_forward(2.0);
        camera.move_right(1.0);
        assert_eq!(camera.position(), Vec3::new(1.0, 0.0, 2.0));
    }
}
