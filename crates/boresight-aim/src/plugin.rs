//! Bevy ECS integration for the aim solver.
//!
//! Provides [`BoresightAimPlugin`], which runs every [`AimCorrection`] rig
//! once in [`AimSet::Early`] (during [`Update`]) and once in [`AimSet::Late`]
//! (during [`PostUpdate`], ahead of transform propagation). Each phase can be
//! toggled per rig.
//!
//! # Usage
//!
//! 1. Add [`BoresightCorePlugin`](boresight_core::BoresightCorePlugin) and
//!    [`BoresightAimPlugin`] to your app.
//! 2. Spawn the pivot and the muzzle (usually as a child of the pivot). The
//!    muzzle's boresight is its local +Z axis.
//! 3. Spawn an [`AimCorrection`] naming both entities and an [`AimTarget`].
//!
//! Poses are read from [`GlobalTransform`]; the solved world rotation is
//! written back to the pivot's local [`Transform`], accounting for a parent.
//! A rig whose pivot or muzzle cannot be resolved logs one error and
//! disables itself until [`AimCorrection::reconfigure`] is called.

use bevy::prelude::*;
use nalgebra::{Point3, Quaternion, UnitQuaternion};

use boresight_core::AimSet;
use boresight_core::config::AimConfig;
use boresight_core::types::AimStatus;

use crate::debug::{DebugColor, DebugLine, DebugSink, NoDebug};
use crate::pose::Pose;
use crate::solver::{AimOutcome, AimSolver};

/// Bevy plugin that aims every [`AimCorrection`] rig each frame.
pub struct BoresightAimPlugin;

impl Plugin for BoresightAimPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AimConfig>()
            .init_resource::<AimDebugLines>()
            .add_systems(First, clear_debug_lines_system)
            .add_systems(Update, aim_early_system.in_set(AimSet::Early))
            .add_systems(PostUpdate, aim_late_system.in_set(AimSet::Late));
    }
}

/// What a rig aims at.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AimTarget {
    /// Nothing; the rig idles.
    #[default]
    None,
    /// The world position of another entity.
    Entity(Entity),
    /// A fixed world position.
    Point(Vec3),
}

/// One pivot/muzzle pair to keep aimed.
#[derive(Component, Debug, Clone)]
pub struct AimCorrection {
    pub pivot: Option<Entity>,
    pub muzzle: Option<Entity>,
    pub target: AimTarget,
    /// Solve in [`AimSet::Early`].
    pub aim_early: bool,
    /// Solve in [`AimSet::Late`].
    pub aim_late: bool,
    /// Push debug lines into [`AimDebugLines`].
    pub draw_debug: bool,
    /// Cleared when a configuration error is reported.
    pub enabled: bool,
    status: AimStatus,
}

impl Default for AimCorrection {
    fn default() -> Self {
        Self {
            pivot: None,
            muzzle: None,
            target: AimTarget::None,
            aim_early: true,
            aim_late: true,
            draw_debug: false,
            enabled: true,
            status: AimStatus::Idle,
        }
    }
}

impl AimCorrection {
    pub fn new(pivot: Entity, muzzle: Entity) -> Self {
        Self {
            pivot: Some(pivot),
            muzzle: Some(muzzle),
            ..Self::default()
        }
    }

    /// Rig with phase and debug flags taken from `config`.
    pub fn from_config(config: &AimConfig, pivot: Option<Entity>, muzzle: Option<Entity>) -> Self {
        Self {
            pivot,
            muzzle,
            aim_early: config.aim_early,
            aim_late: config.aim_late,
            draw_debug: config.draw_debug,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_target(mut self, target: AimTarget) -> Self {
        self.target = target;
        self
    }

    /// Aim at a fixed world position from now on.
    pub const fn aim_at(&mut self, point: Vec3) {
        self.target = AimTarget::Point(point);
    }

    /// Replace the pivot/muzzle references and re-enable the rig.
    pub const fn reconfigure(&mut self, pivot: Option<Entity>, muzzle: Option<Entity>) {
        self.pivot = pivot;
        self.muzzle = muzzle;
        self.enabled = true;
        self.status = AimStatus::Idle;
    }

    /// Result of the most recent solve.
    pub const fn status(&self) -> AimStatus {
        self.status
    }
}

/// Debug geometry produced this frame. Cleared in [`First`].
#[derive(Resource, Debug, Default)]
pub struct AimDebugLines {
    pub lines: Vec<DebugLine>,
}

type TransformQuery<'w, 's> = Query<
    'w,
    's,
    (
        &'static mut Transform,
        &'static GlobalTransform,
        Option<&'static Parent>,
    ),
>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AimPhase {
    Early,
    Late,
}

#[allow(clippy::needless_pass_by_value)]
pub fn aim_early_system(
    config: Res<AimConfig>,
    mut rigs: Query<&mut AimCorrection>,
    mut transforms: TransformQuery<'_, '_>,
    mut debug: ResMut<AimDebugLines>,
) {
    aim_rigs(AimPhase::Early, &config, &mut rigs, &mut transforms, &mut debug);
}

#[allow(clippy::needless_pass_by_value)]
pub fn aim_late_system(
    config: Res<AimConfig>,
    mut rigs: Query<&mut AimCorrection>,
    mut transforms: TransformQuery<'_, '_>,
    mut debug: ResMut<AimDebugLines>,
) {
    aim_rigs(AimPhase::Late, &config, &mut rigs, &mut transforms, &mut debug);
}

fn clear_debug_lines_system(mut debug: ResMut<AimDebugLines>) {
    debug.lines.clear();
}

fn aim_rigs(
    phase: AimPhase,
    config: &AimConfig,
    rigs: &mut Query<&mut AimCorrection>,
    transforms: &mut TransformQuery<'_, '_>,
    debug: &mut AimDebugLines,
) {
    let solver = AimSolver::from_aim_config(config);

    for mut rig in rigs.iter_mut() {
        if !rig.enabled {
            continue;
        }

        let pivot = rig.pivot.and_then(|entity| world_pose(transforms, entity));
        let muzzle = rig.muzzle.and_then(|entity| world_pose(transforms, entity));

        if phase == AimPhase::Early && rig.draw_debug {
            if let Some(muzzle) = &muzzle {
                let end = muzzle.position + muzzle.forward() * config.debug_ray_length;
                debug.lines.line(muzzle.position, end, DebugColor::Magenta);
            }
        }

        let phase_enabled = match phase {
            AimPhase::Early => rig.aim_early,
            AimPhase::Late => rig.aim_late,
        };
        if !phase_enabled {
            if !rig.aim_early && !rig.aim_late {
                rig.status = AimStatus::Idle;
            }
            continue;
        }
        let Some(target) = resolve_target(rig.target, transforms) else {
            rig.status = AimStatus::Idle;
            continue;
        };

        let mut no_debug = NoDebug;
        let sink: &mut dyn DebugSink = if rig.draw_debug {
            &mut debug.lines
        } else {
            &mut no_debug
        };

        match solver.solve_with_debug(pivot.as_ref(), muzzle.as_ref(), &target, sink) {
            Err(err) => {
                error!("boresight: {err}, disabling aim correction");
                rig.enabled = false;
                rig.status = AimStatus::Disabled(err);
            }
            Ok(AimOutcome::Solved(solution)) => {
                if let Some(entity) = rig.pivot {
                    write_world_rotation(transforms, entity, &solution.orientation);
                }
                if !rig.status.is_solved() {
                    debug!(
                        "boresight: aim solved (yaw {:.4}, pitch {:.4})",
                        solution.yaw_correction, solution.pitch_correction
                    );
                }
                rig.status = AimStatus::Solved;
            }
            Ok(AimOutcome::Infeasible(reason)) => {
                rig.status = AimStatus::Infeasible(reason);
            }
        }
    }
}

fn world_pose(transforms: &TransformQuery<'_, '_>, entity: Entity) -> Option<Pose> {
    transforms
        .get(entity)
        .ok()
        .map(|(_, global, _)| pose_from_global(global))
}

fn resolve_target(target: AimTarget, transforms: &TransformQuery<'_, '_>) -> Option<Point3<f32>> {
    match target {
        AimTarget::None => None,
        AimTarget::Entity(entity) => transforms
            .get(entity)
            .ok()
            .map(|(_, global, _)| to_point(global.translation())),
        AimTarget::Point(point) => Some(to_point(point)),
    }
}

/// Write a world rotation into the entity's local [`Transform`].
fn write_world_rotation(
    transforms: &mut TransformQuery<'_, '_>,
    entity: Entity,
    world: &UnitQuaternion<f32>,
) {
    let world = to_bevy_quat(world);
    let parent_rotation = transforms
        .get(entity)
        .ok()
        .and_then(|(_, _, parent)| parent.map(Parent::get))
        .and_then(|parent| transforms.get(parent).ok())
        .map(|(_, global, _)| global.to_scale_rotation_translation().1);

    if let Ok((mut transform, _, _)) = transforms.get_mut(entity) {
        transform.rotation = match parent_rotation {
            Some(parent) => (parent.inverse() * world).normalize(),
            None => world,
        };
    }
}

fn to_point(v: Vec3) -> Point3<f32> {
    Point3::new(v.x, v.y, v.z)
}

fn pose_from_global(global: &GlobalTransform) -> Pose {
    let (_, rotation, translation) = global.to_scale_rotation_translation();
    Pose::new(
        to_point(translation),
        UnitQuaternion::new_normalize(Quaternion::new(rotation.w, rotation.x, rotation.y, rotation.z)),
    )
}

fn to_bevy_quat(q: &UnitQuaternion<f32>) -> Quat {
    Quat::from_xyzw(q.i, q.j, q.k, q.w)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
