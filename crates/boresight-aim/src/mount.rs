//! Rigid muzzle mount relative to a pivot.
//!
//! Stands in for a scene-graph parent/child link: given a pivot pose, a
//! [`MuzzleMount`] regenerates the muzzle pose that is rigidly attached to it.

use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};

use crate::pose::Pose;

/// Muzzle pose expressed in the pivot's local frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MuzzleMount {
    offset: Isometry3<f32>,
}

impl MuzzleMount {
    pub fn new(translation: Vector3<f32>, rotation: UnitQuaternion<f32>) -> Self {
        Self {
            offset: Isometry3::from_parts(Translation3::from(translation), rotation),
        }
    }

    /// Mount with the muzzle translated but aligned with the pivot.
    pub fn from_translation(translation: Vector3<f32>) -> Self {
        Self::new(translation, UnitQuaternion::identity())
    }

    /// Capture the mount from a pivot/muzzle pose pair.
    pub fn from_poses(pivot: &Pose, muzzle: &Pose) -> Self {
        Self {
            offset: pivot.to_isometry().inverse() * muzzle.to_isometry(),
        }
    }

    /// Muzzle translation in the pivot frame.
    pub fn translation(&self) -> Vector3<f32> {
        self.offset.translation.vector
    }

    /// Muzzle rotation relative to the pivot.
    pub fn rotation(&self) -> UnitQuaternion<f32> {
        self.offset.rotation
    }

    /// Minimum engagement radius: targets at or inside it cannot be aimed at.
    pub fn min_range(&self) -> f32 {
        self.offset.translation.vector.norm()
    }

    /// World pose of the muzzle for the given pivot pose.
    pub fn muzzle_pose(&self, pivot: &Pose) -> Pose {
        Pose::from_isometry(&(pivot.to_isometry() * self.offset))
    }
}
