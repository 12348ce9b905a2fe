//! Closed-form parallax correction for an offset muzzle.
//!
//! The pivot's naive look-at misses the target by the muzzle's perpendicular
//! offset. The solver removes that error with two decoupled plane solves,
//! each a law-of-sines triangle between the offset, the sightline and the
//! corrected aim vector:
//!
//! 1. **Horizontal**: yaw the pivot->target bearing about world up by
//!    `asin(lateral / horizontal_distance)`.
//! 2. **Vertical**: pitch the yaw-corrected vector about its horizontal
//!    perpendicular by `asin(vertical / distance)`.
//!
//! The final look rotation is right-multiplied by the muzzle/pivot
//! orientation offset so the muzzle's boresight, not the pivot's, lands on
//! the target. No iteration is involved.

use nalgebra::{Point3, Unit, UnitQuaternion, Vector3};

use boresight_core::config::{AimConfig, SolverConfig};
use boresight_core::error::AimError;
use boresight_core::types::{AimStatus, InfeasibleReason};

use crate::debug::{DebugColor, DebugSink, NoDebug};
use crate::pose::Pose;

/// A successful solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AimSolution {
    /// New world orientation for the pivot.
    pub orientation: UnitQuaternion<f32>,
    /// Yaw applied to the raw bearing (radians, positive toward +X).
    pub yaw_correction: f32,
    /// Pitch applied after the yaw pass (radians, positive upward).
    pub pitch_correction: f32,
    /// Pivot-relative aim vector after the horizontal pass.
    pub horizontal_aim: Vector3<f32>,
    /// Pivot-relative final aim vector.
    pub aim: Vector3<f32>,
}

/// Outcome of a solve that did not hit a configuration error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AimOutcome {
    Solved(AimSolution),
    /// Leave the pivot untouched.
    Infeasible(InfeasibleReason),
}

impl AimOutcome {
    pub const fn is_solved(&self) -> bool {
        matches!(self, Self::Solved(_))
    }

    pub const fn solution(&self) -> Option<&AimSolution> {
        match self {
            Self::Solved(solution) => Some(solution),
            Self::Infeasible(_) => None,
        }
    }

    pub fn orientation(&self) -> Option<UnitQuaternion<f32>> {
        self.solution().map(|s| s.orientation)
    }

    pub const fn status(&self) -> AimStatus {
        match self {
            Self::Solved(_) => AimStatus::Solved,
            Self::Infeasible(reason) => AimStatus::Infeasible(*reason),
        }
    }
}

/// Muzzle position relative to the pivot in the muzzle's frame, depth removed.
pub fn local_offset(pivot: &Pose, muzzle: &Pose) -> Vector3<f32> {
    let mut offset = muzzle.inverse_transform_vector(&(muzzle.position - pivot.position));
    offset.z = 0.0;
    offset
}

/// Static misalignment between muzzle and pivot: `muzzle^-1 * pivot`.
pub fn orientation_offset(pivot: &Pose, muzzle: &Pose) -> UnitQuaternion<f32> {
    muzzle.orientation.inverse() * pivot.orientation
}

/// `asin(a / c)` with the ratio clamped into the `asin` domain.
fn clamped_asin(a: f32, c: f32) -> f32 {
    (a / c).clamp(-1.0, 1.0).asin()
}

fn is_finite_point(p: &Point3<f32>) -> bool {
    p.coords.iter().all(|v| v.is_finite())
}

/// Stateless parallax-correcting aim solver.
///
/// `solve` takes `&self`; one solver serves any number of pivots.
#[derive(Debug, Clone)]
pub struct AimSolver {
    config: SolverConfig,
    debug_cross_size: f32,
}

impl Default for AimSolver {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl AimSolver {
    pub const fn new(config: SolverConfig) -> Self {
        Self {
            config,
            debug_cross_size: 2.0,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(SolverConfig::default())
    }

    pub const fn from_aim_config(config: &AimConfig) -> Self {
        Self::new(config.solver).with_debug_cross_size(config.debug_cross_size)
    }

    /// Half-extent of the axis crosses emitted by [`Self::solve_with_debug`].
    #[must_use]
    pub const fn with_debug_cross_size(mut self, size: f32) -> Self {
        self.debug_cross_size = size;
        self
    }

    pub const fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solve for the pivot orientation that puts the muzzle's boresight on
    /// `target`.
    ///
    /// The muzzle pose must reflect the pivot's current orientation. A
    /// missing pose is a configuration error; every geometric failure is an
    /// [`AimOutcome::Infeasible`].
    pub fn solve(
        &self,
        pivot: Option<&Pose>,
        muzzle: Option<&Pose>,
        target: &Point3<f32>,
    ) -> Result<AimOutcome, AimError> {
        self.solve_with_debug(pivot, muzzle, target, &mut NoDebug)
    }

    /// [`Self::solve`], emitting an axis cross at the horizontally corrected
    /// aim point and at the final aim point.
    pub fn solve_with_debug<S: DebugSink + ?Sized>(
        &self,
        pivot: Option<&Pose>,
        muzzle: Option<&Pose>,
        target: &Point3<f32>,
        sink: &mut S,
    ) -> Result<AimOutcome, AimError> {
        let pivot = pivot.ok_or(AimError::MissingPivot)?;
        let muzzle = muzzle.ok_or(AimError::MissingMuzzle)?;

        if !(pivot.is_finite() && muzzle.is_finite() && is_finite_point(target)) {
            return Ok(AimOutcome::Infeasible(InfeasibleReason::NonFiniteInput));
        }

        // Inside the muzzle radius no triangle closes.
        let to_target = target - pivot.position;
        let offset_sq = (muzzle.position - pivot.position).norm_squared();
        if to_target.norm_squared() <= offset_sq {
            return Ok(AimOutcome::Infeasible(InfeasibleReason::WithinMinimumRange));
        }

        let rotation_offset = orientation_offset(pivot, muzzle);
        let offset = local_offset(pivot, muzzle);
        let eps = self.config.epsilon;

        // Horizontal pass: rotate about world up.
        let bearing = Vector3::new(to_target.x, 0.0, to_target.z);
        let c = bearing.norm();
        if c <= eps {
            // Target straight above or below the pivot.
            return Ok(AimOutcome::Infeasible(InfeasibleReason::ParallelToUp));
        }
        let lateral = Vector3::new(offset.x, 0.0, offset.z).norm();
        let alpha = clamped_asin(lateral, c);
        // Muzzle right of the pivot aims left of the raw bearing, and vice versa.
        let yaw = if offset.x > 0.0 { -alpha } else { alpha };
        let horizontal_aim = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), yaw) * bearing;

        sink.axis_cross(
            pivot.position + horizontal_aim,
            self.debug_cross_size,
            DebugColor::Green,
        );

        // Vertical pass: rotate about the horizontal perpendicular of the
        // corrected bearing, at the target's true height.
        let raised = horizontal_aim + Vector3::new(0.0, to_target.y, 0.0);
        let c = raised.norm();
        let Some(pitch_axis) = Unit::try_new(Vector3::y().cross(&horizontal_aim), eps) else {
            return Ok(AimOutcome::Infeasible(InfeasibleReason::ParallelToUp));
        };
        let alpha = clamped_asin(offset.y, c);
        let aim = UnitQuaternion::from_axis_angle(&pitch_axis, alpha) * raised;

        sink.axis_cross(pivot.position + aim, self.debug_cross_size, DebugColor::Cyan);

        let length = aim.norm();
        if !length.is_finite() || length <= eps {
            return Ok(AimOutcome::Infeasible(InfeasibleReason::DegenerateAim));
        }
        if (aim / length).cross(&Vector3::y()).norm() <= self.config.up_tolerance {
            return Ok(AimOutcome::Infeasible(InfeasibleReason::ParallelToUp));
        }

        let orientation = UnitQuaternion::face_towards(&aim, &Vector3::y()) * rotation_offset;
        if !orientation.coords.iter().all(|v| v.is_finite()) {
            return Ok(AimOutcome::Infeasible(InfeasibleReason::DegenerateAim));
        }

        Ok(AimOutcome::Solved(AimSolution {
            orientation,
            yaw_correction: yaw,
            pitch_correction: -alpha,
            horizontal_aim,
            aim,
        }))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
