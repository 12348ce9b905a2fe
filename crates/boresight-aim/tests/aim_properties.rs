//! Randomized geometric properties of the aim solver.

use approx::assert_relative_eq;
use nalgebra::{Point3, UnitQuaternion, Vector3};

use boresight_aim::pose::{elevation, heading};
use boresight_aim::{AimOutcome, AimSolver, MuzzleMount, Pose};
use boresight_core::types::InfeasibleReason;
use boresight_test_utils::{mounted_rig, random_mount, random_target_beyond, seeded_rng};
use rand::Rng;

const TRIALS: usize = 200;

/// Perpendicular distance from `target` to the muzzle's boresight line.
fn boresight_miss(muzzle: &Pose, target: &Point3<f32>) -> f32 {
    (target - muzzle.position).cross(&muzzle.forward()).norm()
}

fn aimed_pivot(solver: &AimSolver, mount: &MuzzleMount, start: Pose, target: &Point3<f32>) -> Pose {
    let muzzle = mount.muzzle_pose(&start);
    let outcome = solver.solve(Some(&start), Some(&muzzle), target).unwrap();
    let orientation = outcome
        .orientation()
        .unwrap_or_else(|| panic!("expected a solution, got {outcome:?}"));
    Pose::new(start.position, orientation)
}

#[test]
fn zero_offset_is_plain_look_at() {
    let solver = AimSolver::with_defaults();
    let mut rng = seeded_rng(1);
    for _ in 0..TRIALS {
        let pivot = Pose::from_position(Point3::new(
            rng.gen_range(-5.0..5.0),
            rng.gen_range(-5.0..5.0),
            rng.gen_range(-5.0..5.0),
        ));
        let target = random_target_beyond(&mut rng, &pivot.position, 1.0, 2.0);
        let outcome = solver.solve(Some(&pivot), Some(&pivot), &target).unwrap();
        let look_at = UnitQuaternion::face_towards(&(target - pivot.position), &Vector3::y());
        assert_relative_eq!(outcome.orientation().unwrap(), look_at, epsilon = 1e-5);
    }
}

#[test]
fn mirrored_lateral_offset_mirrors_yaw() {
    let solver = AimSolver::with_defaults();
    let mut rng = seeded_rng(2);
    for _ in 0..TRIALS {
        let mount = random_mount(&mut rng, 1.0);
        let t = mount.translation();
        let mirrored = MuzzleMount::from_translation(Vector3::new(-t.x, t.y, t.z));
        let pivot = Pose::identity();
        let target = random_target_beyond(&mut rng, &pivot.position, mount.min_range(), 3.0);

        let a = solver
            .solve(Some(&pivot), Some(&mount.muzzle_pose(&pivot)), &target)
            .unwrap();
        let b = solver
            .solve(Some(&pivot), Some(&mirrored.muzzle_pose(&pivot)), &target)
            .unwrap();
        let (Some(a), Some(b)) = (a.solution(), b.solution()) else {
            panic!("both mirrored rigs must solve");
        };
        assert_relative_eq!(a.yaw_correction, -b.yaw_correction, epsilon = 1e-6);
        if t.x.abs() > 1e-3 {
            assert_eq!(a.yaw_correction.signum(), -t.x.signum());
        }
    }
}

#[test]
fn recovers_heading_of_level_shot() {
    let solver = AimSolver::with_defaults();
    let mut rng = seeded_rng(3);
    for _ in 0..TRIALS {
        let offset = Vector3::new(rng.gen_range(-1.0..1.0), 0.0, rng.gen_range(0.0..2.0));
        let mount = MuzzleMount::from_translation(offset);
        let theta = rng.gen_range(-1.4f32..1.4);

        let aimed = Pose::looking(Point3::origin(), theta, 0.0);
        let aimed_muzzle = mount.muzzle_pose(&aimed);
        let target = aimed_muzzle.position + aimed_muzzle.forward() * rng.gen_range(5.0..50.0);

        let start = Pose::looking(Point3::origin(), rng.gen_range(-3.0..3.0), 0.0);
        let pivot = aimed_pivot(&solver, &mount, start, &target);
        assert_relative_eq!(heading(&pivot.forward()), theta, epsilon = 1e-3);
        assert_relative_eq!(elevation(&pivot.forward()), 0.0, epsilon = 1e-3);
    }
}

#[test]
fn recovers_elevation_with_vertical_offset() {
    let solver = AimSolver::with_defaults();
    let mut rng = seeded_rng(4);
    for _ in 0..TRIALS {
        let offset = Vector3::new(0.0, rng.gen_range(-1.0..1.0), rng.gen_range(0.0..2.0));
        let mount = MuzzleMount::from_translation(offset);
        let theta = rng.gen_range(-1.2f32..1.2);
        let phi = rng.gen_range(-0.6f32..0.6);

        let aimed = Pose::looking(Point3::new(2.0, 1.0, -3.0), theta, phi);
        let aimed_muzzle = mount.muzzle_pose(&aimed);
        let target = aimed_muzzle.position + aimed_muzzle.forward() * rng.gen_range(5.0..50.0);

        let pivot = aimed_pivot(&solver, &mount, Pose::from_position(aimed.position), &target);
        assert_relative_eq!(heading(&pivot.forward()), theta, epsilon = 1e-3);
        assert_relative_eq!(elevation(&pivot.forward()), phi, epsilon = 1e-3);
    }
}

#[test]
fn corrected_aim_beats_naive_look_at() {
    let solver = AimSolver::with_defaults();
    let mut rng = seeded_rng(5);
    for _ in 0..TRIALS {
        let mount = random_mount(&mut rng, 1.0);
        let target = random_target_beyond(&mut rng, &Point3::origin(), mount.min_range(), 4.0);

        let naive = Pose::new(
            Point3::origin(),
            UnitQuaternion::face_towards(&target.coords, &Vector3::y()),
        );
        let naive_miss = boresight_miss(&mount.muzzle_pose(&naive), &target);

        let pivot = aimed_pivot(&solver, &mount, Pose::identity(), &target);
        let corrected_miss = boresight_miss(&mount.muzzle_pose(&pivot), &target);

        assert!(
            corrected_miss <= naive_miss * 0.25 + 1e-4,
            "corrected miss {corrected_miss} vs naive {naive_miss}"
        );
    }
}

#[test]
fn single_axis_offsets_converge_exactly() {
    let solver = AimSolver::with_defaults();
    let mut rng = seeded_rng(6);
    for _ in 0..TRIALS {
        let vertical = MuzzleMount::from_translation(Vector3::new(
            0.0,
            rng.gen_range(-1.0..1.0),
            rng.gen_range(0.0..2.0),
        ));
        let target = random_target_beyond(&mut rng, &Point3::origin(), vertical.min_range(), 3.0);
        let pivot = aimed_pivot(&solver, &vertical, Pose::identity(), &target);
        let miss = boresight_miss(&vertical.muzzle_pose(&pivot), &target);
        assert!(miss < 1e-3, "vertical offset miss {miss}");

        let lateral = MuzzleMount::from_translation(Vector3::new(
            rng.gen_range(-1.0..1.0),
            0.0,
            rng.gen_range(0.0..2.0),
        ));
        let level_target = Point3::new(
            rng.gen_range(-20.0..20.0),
            0.0,
            rng.gen_range(5.0..40.0),
        );
        let pivot = aimed_pivot(&solver, &lateral, Pose::identity(), &level_target);
        let miss = boresight_miss(&lateral.muzzle_pose(&pivot), &level_target);
        assert!(miss < 1e-3, "lateral offset miss {miss}");
    }
}

#[test]
fn never_produces_nan_outside_minimum_range() {
    let solver = AimSolver::with_defaults();
    let mut rng = seeded_rng(7);
    for _ in 0..TRIALS * 5 {
        let mount = random_mount(&mut rng, 2.0);
        let (mut rig, _) = mounted_rig(Pose::identity(), mount.translation());
        // Includes targets barely outside the boundary.
        let target = random_target_beyond(&mut rng, &Point3::origin(), mount.min_range(), 1.0001);
        let status = rig.aim(&solver, &target).unwrap();
        let pivot = rig.pivot.unwrap();
        assert!(pivot.is_finite(), "non-finite orientation with status {status:?}");
    }
}

#[test]
fn inside_minimum_range_is_always_noop() {
    let solver = AimSolver::with_defaults();
    let mut rng = seeded_rng(8);
    for _ in 0..TRIALS {
        let mount = random_mount(&mut rng, 1.0);
        let start = Pose::looking(Point3::origin(), rng.gen_range(-3.0..3.0), 0.2);
        let (mut rig, _) = mounted_rig(start, mount.translation());
        let dir = Vector3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        let Some(dir) = dir.try_normalize(1e-3) else {
            continue;
        };
        let target = Point3::from(dir * mount.min_range() * rng.gen_range(0.0..0.99));

        let outcome = solver.solve(rig.pivot.as_ref(), rig.muzzle.as_ref(), &target).unwrap();
        assert_eq!(
            outcome,
            AimOutcome::Infeasible(InfeasibleReason::WithinMinimumRange)
        );
        rig.aim(&solver, &target).unwrap();
        assert_eq!(rig.pivot, Some(start));
    }
}

#[test]
fn repeated_solves_are_identical() {
    let solver = AimSolver::with_defaults();
    let mut rng = seeded_rng(9);
    let mount = random_mount(&mut rng, 1.0);
    let pivot = Pose::identity();
    let muzzle = mount.muzzle_pose(&pivot);
    let target = random_target_beyond(&mut rng, &pivot.position, mount.min_range(), 5.0);

    let first = solver.solve(Some(&pivot), Some(&muzzle), &target).unwrap();
    let second = solver.solve(Some(&pivot), Some(&muzzle), &target).unwrap();
    assert_eq!(first, second);
}
