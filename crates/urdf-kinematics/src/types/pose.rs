//! Pose type definition

use glam::{DMat4, DQuat, DVec3};

/// Pose (position and orientation) as declared by an `<origin>` element
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pose {
    pub xyz: [f64; 3],
    pub rpy: [f64; 3], // roll, pitch, yaw in radians
}

impl Pose {
    pub fn new(xyz: [f64; 3], rpy: [f64; 3]) -> Self {
        Self { xyz, rpy }
    }

    pub fn from_position(xyz: [f64; 3]) -> Self {
        Self { xyz, rpy: [0.0; 3] }
    }

    /// Orientation as a quaternion.
    ///
    /// URDF rpy is roll about X, then pitch about Y, then yaw about Z, all about the
    /// fixed parent axes. That is the intrinsic Z-Y-X product `Rz * Ry * Rx`.
    pub fn to_quat(&self) -> DQuat {
        let [roll, pitch, yaw] = self.rpy;
        DQuat::from_rotation_z(yaw) * DQuat::from_rotation_y(pitch) * DQuat::from_rotation_x(roll)
    }

    /// Get position as DVec3
    pub fn position(&self) -> DVec3 {
        DVec3::from(self.xyz)
    }

    pub fn to_mat4(&self) -> DMat4 {
        DMat4::from_rotation_translation(self.to_quat(), self.position())
    }
}

impl From<&urdf_rs::Pose> for Pose {
    fn from(urdf_pose: &urdf_rs::Pose) -> Self {
        Self {
            xyz: urdf_pose.xyz.0,
            rpy: urdf_pose.rpy.0,
        }
    }
}
