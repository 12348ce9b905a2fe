// boresight-core: Errors, config, shared types, and system ordering for boresight aim correction.

pub mod config;
pub mod error;
pub mod types;

use bevy::prelude::*;

use crate::config::AimConfig;

/// System sets for the two per-tick aim phases.
///
/// `Early` runs in [`Update`]; `Late` runs in [`PostUpdate`] ahead of
/// transform propagation. Either, both, or neither may have systems.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AimSet {
    Early,
    Late,
}

/// Registers [`AimSet`] ordering and the shared [`AimConfig`] resource.
pub struct BoresightCorePlugin;

impl Plugin for BoresightCorePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AimConfig>()
            .configure_sets(Update, AimSet::Early)
            .configure_sets(
                PostUpdate,
                AimSet::Late.before(bevy::transform::TransformSystem::TransformPropagate),
            );
    }
}

pub mod prelude {
    pub use crate::AimSet;
    pub use crate::BoresightCorePlugin;
    pub use crate::config::{AimConfig, SolverConfig};
    pub use crate::error::{AimError, BoresightError, ConfigError};
    pub use crate::types::{AimStatus, InfeasibleReason};
}
