//! Rig fixtures with known mounts.

use boresight_aim::{AimRig, MuzzleMount, Pose};
use nalgebra::{Point3, Vector3};
use rand::Rng;

/// Rig with the pivot at `pivot` and the muzzle translated by `offset` in
/// the pivot frame.
pub fn mounted_rig(pivot: Pose, offset: Vector3<f32>) -> (AimRig, MuzzleMount) {
    let mount = MuzzleMount::from_translation(offset);
    (AimRig::mounted(pivot, &mount), mount)
}

/// Mount with lateral/vertical offsets in `[-max_offset, max_offset]` and a
/// forward barrel length in `[0, 2 * max_offset]`.
pub fn random_mount(rng: &mut impl Rng, max_offset: f32) -> MuzzleMount {
    MuzzleMount::from_translation(Vector3::new(
        rng.gen_range(-max_offset..=max_offset),
        rng.gen_range(-max_offset..=max_offset),
        rng.gen_range(0.0..=2.0 * max_offset),
    ))
}

/// Random point at least `factor` times `min_range` away from `origin`, in
/// front of it (positive z) and within 45 degrees of the horizon.
pub fn random_target_beyond(
    rng: &mut impl Rng,
    origin: &Point3<f32>,
    min_range: f32,
    factor: f32,
) -> Point3<f32> {
    let distance = min_range.max(0.1) * rng.gen_range(factor..=factor * 4.0);
    let heading = rng.gen_range(-1.2f32..=1.2);
    let elevation = rng.gen_range(-0.7f32..=0.7);
    let dir = Vector3::new(
        elevation.cos() * heading.sin(),
        elevation.sin(),
        elevation.cos() * heading.cos(),
    );
    origin + dir * distance
}
