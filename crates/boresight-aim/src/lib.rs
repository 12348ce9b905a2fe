//! Parallax-corrected aiming for emitters mounted off a pivot's center.
//!
//! A turret's naive look-at points the pivot's forward axis at the target,
//! so a muzzle mounted to the side or below misses by its offset. The
//! [`AimSolver`] corrects for the offset in closed form: a yaw pass in the
//! horizontal plane, then a pitch pass in the vertical plane through the
//! corrected bearing.
//!
//! # Architecture
//!
//! ```text
//! (pivot Pose, muzzle Pose, target) ──► AimSolver ──► pivot orientation
//! ```
//!
//! [`AimRig`] bundles the two poses for callers without a scene graph, and
//! [`MuzzleMount`] regenerates the muzzle pose after the pivot turns. The
//! [`plugin`] module wires the solver into Bevy as two per-frame phases.

pub mod debug;
pub mod mount;
pub mod plugin;
pub mod pose;
pub mod rig;
pub mod solver;

pub use debug::{DebugColor, DebugLine, DebugSink, NoDebug};
pub use mount::MuzzleMount;
pub use plugin::{AimCorrection, AimDebugLines, AimTarget, BoresightAimPlugin};
pub use pose::Pose;
pub use rig::AimRig;
pub use solver::{AimOutcome, AimSolution, AimSolver};

pub mod prelude {
    pub use crate::{
        AimCorrection, AimDebugLines, AimOutcome, AimRig, AimSolution, AimSolver, AimTarget,
        BoresightAimPlugin, DebugColor, DebugLine, DebugSink, MuzzleMount, NoDebug, Pose,
    };
    pub use boresight_core::prelude::*;
}
