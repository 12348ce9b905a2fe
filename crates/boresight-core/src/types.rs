use serde::{Deserialize, Serialize};

use crate::error::AimError;

// ---------------------------------------------------------------------------
// InfeasibleReason
// ---------------------------------------------------------------------------

/// Why a solve left the pivot untouched.
///
/// Infeasibility is routine (a target crossing the minimum range) and is not
/// an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InfeasibleReason {
    /// Target is at or inside the pivot-to-muzzle distance.
    WithinMinimumRange,
    /// Corrected aim vector collapsed to (near) zero length.
    DegenerateAim,
    /// Corrected aim vector is parallel to world up, so no look rotation exists.
    ParallelToUp,
    /// An input pose or the target contained NaN or infinity.
    NonFiniteInput,
}

impl std::fmt::Display for InfeasibleReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            Self::WithinMinimumRange => "target within minimum range",
            Self::DegenerateAim => "degenerate aim vector",
            Self::ParallelToUp => "aim vector parallel to up axis",
            Self::NonFiniteInput => "non-finite input",
        };
        f.pad(msg)
    }
}

// ---------------------------------------------------------------------------
// AimStatus
// ---------------------------------------------------------------------------

/// Result of the most recent aim attempt for a rig.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AimStatus {
    /// No solve has run yet, both phases are off, or the target cannot be
    /// resolved.
    #[default]
    Idle,
    /// The pivot orientation was updated.
    Solved,
    /// The solve was skipped; the pivot keeps its previous orientation.
    Infeasible(InfeasibleReason),
    /// A configuration error stopped aiming until the rig is reconfigured.
    Disabled(AimError),
}

impl AimStatus {
    pub const fn is_solved(&self) -> bool {
        matches!(self, Self::Solved)
    }

    pub const fn is_infeasible(&self) -> bool {
        matches!(self, Self::Infeasible(_))
    }

    pub const fn is_disabled(&self) -> bool {
        matches!(self, Self::Disabled(_))
    }
}
