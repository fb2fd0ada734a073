use nalgebra::Unit;

use crate::math::{Matrix4, UnitQuaternion, Vector3, TOLERANCE};

/// Orbiting camera: a translation applied after an accumulated rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Offset applied after rotating.
    pub translation: Vector3,
    /// Accumulated orientation.
    pub rotation: UnitQuaternion,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            translation: Vector3::zeros(),
            rotation: UnitQuaternion::identity(),
        }
    }
}

impl Camera {
    /// Creates a camera at the origin with no rotation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// View matrix `T * R`.
    #[must_use]
    pub fn view_matrix(&self) -> Matrix4 {
        Matrix4::new_translation(&self.translation) * self.rotation.to_homogeneous()
    }

    /// Applies a further rotation of `degrees` about `axis`, in front of the
    /// current orientation. A zero-length axis leaves the camera unchanged.
    pub fn rotate_by(&mut self, axis: &Vector3, degrees: f64) {
        let Some(axis) = Unit::try_new(*axis, TOLERANCE) else {
            return;
        };
        let delta = UnitQuaternion::from_axis_angle(&axis, degrees.to_radians());
        self.rotation = delta * self.rotation;
    }

    /// Moves the camera in the view plane.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.translation.x += dx;
        self.translation.y += dy;
    }
}
