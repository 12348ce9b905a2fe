//! Rigid poses and the frame convention shared by the solver.
//!
//! Frames are Y-up. A pose's boresight is its local +Z axis, local +Y is up
//! and local +X is right (`up x forward`).

use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// Position + orientation of a rigid body in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Point3<f32>,
    pub orientation: UnitQuaternion<f32>,
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

impl Pose {
    pub const fn new(position: Point3<f32>, orientation: UnitQuaternion<f32>) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Pose at the origin, looking down +Z.
    pub fn identity() -> Self {
        Self::new(Point3::origin(), UnitQuaternion::identity())
    }

    /// Unrotated pose at `position`.
    pub fn from_position(position: Point3<f32>) -> Self {
        Self::new(position, UnitQuaternion::identity())
    }

    /// Pose at `position` whose forward axis has the given heading and
    /// elevation (radians). Heading is positive toward +X, elevation is
    /// positive toward +Y. Roll is zero.
    pub fn looking(position: Point3<f32>, heading: f32, elevation: f32) -> Self {
        let yaw = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), heading);
        let pitch = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), -elevation);
        Self::new(position, yaw * pitch)
    }

    pub fn from_isometry(iso: &Isometry3<f32>) -> Self {
        Self::new(Point3::from(iso.translation.vector), iso.rotation)
    }

    pub fn to_isometry(&self) -> Isometry3<f32> {
        Isometry3::from_parts(Translation3::from(self.position.coords), self.orientation)
    }

    /// World-space boresight direction (local +Z).
    pub fn forward(&self) -> Vector3<f32> {
        self.orientation * Vector3::z()
    }

    /// World-space local +Y.
    pub fn up(&self) -> Vector3<f32> {
        self.orientation * Vector3::y()
    }

    /// World-space local +X.
    pub fn right(&self) -> Vector3<f32> {
        self.orientation * Vector3::x()
    }

    /// Map a point from this pose's local frame into world space.
    pub fn transform_point(&self, local: &Point3<f32>) -> Point3<f32> {
        self.position + self.orientation * local.coords
    }

    /// Express a world-space direction in this pose's local frame.
    pub fn inverse_transform_vector(&self, world: &Vector3<f32>) -> Vector3<f32> {
        self.orientation.inverse_transform_vector(world)
    }

    pub fn is_finite(&self) -> bool {
        self.position.coords.iter().all(|v| v.is_finite())
            && self.orientation.coords.iter().all(|v| v.is_finite())
    }
}

/// Horizontal angle of `v` measured from +Z, positive toward +X (radians).
pub fn heading(v: &Vector3<f32>) -> f32 {
    v.x.atan2(v.z)
}

/// Angle of `v` above the horizontal plane (radians).
pub fn elevation(v: &Vector3<f32>) -> f32 {
    v.y.atan2(v.x.hypot(v.z))
}
