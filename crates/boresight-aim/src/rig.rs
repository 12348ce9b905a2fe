//! Caller-owned pivot/muzzle pose pair.

use nalgebra::Point3;

use boresight_core::error::AimError;
use boresight_core::types::AimStatus;

use crate::mount::MuzzleMount;
use crate::pose::Pose;
use crate::solver::{AimOutcome, AimSolver};

/// The two poses an aim solve reads, owned by the caller.
///
/// Precondition for [`AimRig::aim`]: `muzzle` reflects the pivot's current
/// orientation. Nothing here enforces it; callers without a scene graph can
/// keep it true with [`AimRig::sync_muzzle`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AimRig {
    pub pivot: Option<Pose>,
    pub muzzle: Option<Pose>,
}

impl AimRig {
    pub const fn new(pivot: Pose, muzzle: Pose) -> Self {
        Self {
            pivot: Some(pivot),
            muzzle: Some(muzzle),
        }
    }

    /// Rig whose muzzle is placed by `mount` relative to `pivot`.
    pub fn mounted(pivot: Pose, mount: &MuzzleMount) -> Self {
        Self::new(pivot, mount.muzzle_pose(&pivot))
    }

    /// Re-derive the muzzle pose from the pivot. No-op without a pivot.
    pub fn sync_muzzle(&mut self, mount: &MuzzleMount) {
        if let Some(pivot) = &self.pivot {
            self.muzzle = Some(mount.muzzle_pose(pivot));
        }
    }

    /// Solve and write the new orientation into `pivot`.
    ///
    /// The pivot is only touched on [`AimStatus::Solved`]. The muzzle is
    /// never written.
    pub fn aim(&mut self, solver: &AimSolver, target: &Point3<f32>) -> Result<AimStatus, AimError> {
        let outcome = solver.solve(self.pivot.as_ref(), self.muzzle.as_ref(), target)?;
        if let (AimOutcome::Solved(solution), Some(pivot)) = (&outcome, self.pivot.as_mut()) {
            pivot.orientation = solution.orientation;
        }
        Ok(outcome.status())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use boresight_core::types::InfeasibleReason;
    use nalgebra::Vector3;

    #[test]
    fn aim_updates_pivot_only() {
        let mount = MuzzleMount::from_translation(Vector3::new(1.0, 0.0, 0.0));
        let mut rig = AimRig::mounted(Pose::identity(), &mount);
        let muzzle_before = rig.muzzle;

        let status = rig
            .aim(&AimSolver::with_defaults(), &Point3::new(0.0, 0.0, 10.0))
            .unwrap();
        assert_eq!(status, AimStatus::Solved);
        assert_eq!(rig.muzzle, muzzle_before);

        let heading = crate::pose::heading(&rig.pivot.unwrap().forward());
        assert_relative_eq!(heading, -(0.1f32).asin(), epsilon = 1e-5);
    }

    #[test]
    fn infeasible_aim_leaves_pivot_unchanged() {
        let mount = MuzzleMount::from_translation(Vector3::new(1.0, 0.0, 0.0));
        let start = Pose::looking(Point3::origin(), 0.3, 0.0);
        let mut rig = AimRig::mounted(start, &mount);

        let status = rig
            .aim(&AimSolver::with_defaults(), &Point3::new(0.0, 0.0, 0.5))
            .unwrap();
        assert_eq!(
            status,
            AimStatus::Infeasible(InfeasibleReason::WithinMinimumRange)
        );
        assert_eq!(rig.pivot, Some(start));
    }

    #[test]
    fn empty_rig_reports_missing_pivot() {
        let mut rig = AimRig::default();
        let err = rig
            .aim(&AimSolver::with_defaults(), &Point3::new(0.0, 0.0, 5.0))
            .unwrap_err();
        assert_eq!(err, AimError::MissingPivot);
    }

    #[test]
    fn rig_without_muzzle_reports_missing_muzzle() {
        let mut rig = AimRig {
            pivot: Some(Pose::identity()),
            muzzle: None,
        };
        let err = rig
            .aim(&AimSolver::with_defaults(), &Point3::new(0.0, 0.0, 5.0))
            .unwrap_err();
        assert_eq!(err, AimError::MissingMuzzle);
        assert_eq!(rig.pivot, Some(Pose::identity()));
    }

    #[test]
    fn sync_muzzle_follows_new_pivot_orientation() {
        let mount = MuzzleMount::from_translation(Vector3::new(0.5, -0.25, 1.0));
        let mut rig = AimRig::mounted(Pose::identity(), &mount);
        let solver = AimSolver::with_defaults();
        let target = Point3::new(4.0, 2.0, 9.0);

        rig.aim(&solver, &target).unwrap();
        rig.sync_muzzle(&mount);

        let expected = mount.muzzle_pose(&rig.pivot.unwrap());
        assert_eq!(rig.muzzle, Some(expected));

        // Solving again from the synced pose pair lands on the same orientation.
        let first = rig.pivot.unwrap().orientation;
        rig.aim(&solver, &target).unwrap();
        assert_relative_eq!(rig.pivot.unwrap().orientation, first, epsilon = 1e-5);
    }
}
