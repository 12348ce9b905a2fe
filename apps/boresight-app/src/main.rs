//! Boresight aim-correction CLI.
//!
//! Provides four modes of operation:
//! - `solve`: Solve a single pivot/muzzle/target configuration
//! - `sweep`: Tabulate corrections against target range
//! - `scene`: Run a headless Bevy turret and print per-frame convergence
//! - `info`: Print workspace crate versions and solver defaults

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use bevy::prelude::*;
use bevy::transform::TransformPlugin;
use clap::{Parser, Subcommand};
use nalgebra::{Point3, Vector3};

use boresight_aim::pose::{elevation, heading};
use boresight_aim::{
    AimCorrection, AimOutcome, AimSolver, AimTarget, BoresightAimPlugin, MuzzleMount, Pose,
};
use boresight_core::prelude::{AimConfig, AimStatus, BoresightCorePlugin, BoresightError};

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

/// Parallax-corrected aiming for offset muzzles.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// TOML file with an `AimConfig`.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve one configuration and print the corrected orientation.
    Solve {
        /// Pivot world position as `x,y,z`.
        #[arg(long, default_value = "0,0,0", value_parser = parse_vec3, allow_hyphen_values = true)]
        pivot: Vector3<f32>,

        /// Current pivot heading in radians (about +Y, 0 looks along +Z).
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        heading: f32,

        /// Current pivot elevation in radians.
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        elevation: f32,

        /// Muzzle translation in the pivot frame as `x,y,z`.
        #[arg(short, long, value_parser = parse_vec3, allow_hyphen_values = true)]
        muzzle: Vector3<f32>,

        /// Target world position as `x,y,z`.
        #[arg(short, long, value_parser = parse_vec3, allow_hyphen_values = true)]
        target: Vector3<f32>,
    },

    /// Tabulate yaw/pitch corrections as a target recedes along +Z.
    Sweep {
        /// Muzzle translation in the pivot frame as `x,y,z`.
        #[arg(short, long, value_parser = parse_vec3, allow_hyphen_values = true)]
        muzzle: Vector3<f32>,

        /// Target height above the pivot.
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        height: f32,

        /// Farthest range sampled.
        #[arg(long, default_value_t = 50.0)]
        max_range: f32,

        /// Number of samples.
        #[arg(short = 'n', long, default_value_t = 12)]
        steps: u32,
    },

    /// Run a headless turret scene and print per-frame boresight miss.
    Scene {
        /// Muzzle translation in the pivot frame as `x,y,z`.
        #[arg(short, long, default_value = "0.5,-0.25,1.5", value_parser = parse_vec3, allow_hyphen_values = true)]
        muzzle: Vector3<f32>,

        /// Target world position as `x,y,z`.
        #[arg(short, long, default_value = "-4,3,20", value_parser = parse_vec3, allow_hyphen_values = true)]
        target: Vector3<f32>,

        /// Frames to run.
        #[arg(short, long, default_value_t = 5)]
        frames: u32,
    },

    /// Print crate information.
    Info,
}

fn parse_vec3(s: &str) -> Result<Vector3<f32>, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let &[x, y, z] = parts.as_slice() else {
        return Err(format!("expected x,y,z but got {s:?}"));
    };
    let parse = |v: &str| {
        v.parse::<f32>()
            .map_err(|e| format!("invalid component {v:?}: {e}"))
    };
    Ok(Vector3::new(parse(x)?, parse(y)?, parse(z)?))
}

// ---------------------------------------------------------------------------
// Mode implementations
// ---------------------------------------------------------------------------

fn run_solve(
    config: &AimConfig,
    pivot: Pose,
    muzzle: Vector3<f32>,
    target: &Point3<f32>,
) -> Result<(), BoresightError> {
    let solver = AimSolver::from_aim_config(config);
    let mount = MuzzleMount::from_translation(muzzle);
    let muzzle_pose = mount.muzzle_pose(&pivot);

    println!(
        "pivot:  ({:.3}, {:.3}, {:.3})",
        pivot.position.x, pivot.position.y, pivot.position.z
    );
    println!(
        "muzzle: ({:.3}, {:.3}, {:.3})  min range {:.3}",
        muzzle_pose.position.x,
        muzzle_pose.position.y,
        muzzle_pose.position.z,
        mount.min_range()
    );

    match solver.solve(Some(&pivot), Some(&muzzle_pose), target)? {
        AimOutcome::Solved(solution) => {
            let aimed = Pose::new(pivot.position, solution.orientation);
            let forward = aimed.forward();
            println!("status: solved");
            println!(
                "yaw correction   {:+.5} rad ({:+.3} deg)",
                solution.yaw_correction,
                solution.yaw_correction.to_degrees()
            );
            println!(
                "pitch correction {:+.5} rad ({:+.3} deg)",
                solution.pitch_correction,
                solution.pitch_correction.to_degrees()
            );
            println!(
                "heading {:+.5} rad, elevation {:+.5} rad",
                heading(&forward),
                elevation(&forward)
            );
            let q = solution.orientation;
            println!(
                "orientation (x, y, z, w): ({:.6}, {:.6}, {:.6}, {:.6})",
                q.i, q.j, q.k, q.w
            );
            let muzzle_after = mount.muzzle_pose(&aimed);
            println!(
                "boresight miss: {:.6}",
                boresight_miss(&muzzle_after, target)
            );
        }
        AimOutcome::Infeasible(reason) => println!("status: infeasible ({reason})"),
    }
    Ok(())
}

fn run_sweep(config: &AimConfig, muzzle: Vector3<f32>, height: f32, max_range: f32, steps: u32) {
    let solver = AimSolver::from_aim_config(config);
    let mount = MuzzleMount::from_translation(muzzle);
    let pivot = Pose::identity();
    let muzzle_pose = mount.muzzle_pose(&pivot);
    let steps = steps.max(1);

    println!("min range {:.3}", mount.min_range());
    println!("{:>10} {:>12} {:>12} {:>10}", "range", "yaw", "pitch", "miss");
    for i in 1..=steps {
        #[allow(clippy::cast_precision_loss)]
        let range = max_range * i as f32 / steps as f32;
        let target = Point3::new(0.0, height, range);
        match solver.solve(Some(&pivot), Some(&muzzle_pose), &target) {
            Ok(AimOutcome::Solved(solution)) => {
                let aimed = Pose::new(pivot.position, solution.orientation);
                println!(
                    "{range:>10.3} {:>12.6} {:>12.6} {:>10.6}",
                    solution.yaw_correction,
                    solution.pitch_correction,
                    boresight_miss(&mount.muzzle_pose(&aimed), &target)
                );
            }
            Ok(AimOutcome::Infeasible(reason)) => println!("{range:>10.3} {reason:>12}"),
            Err(err) => println!("{range:>10.3} error: {err}"),
        }
    }
}

/// Returns the status and boresight miss of the last frame run.
fn run_scene(
    config: &AimConfig,
    muzzle: Vector3<f32>,
    target: Vector3<f32>,
    frames: u32,
) -> Option<(AimStatus, f32)> {
    let mut app = App::new();
    app.add_plugins(TransformPlugin);
    app.add_plugins(BoresightCorePlugin);
    app.add_plugins(BoresightAimPlugin);
    app.insert_resource(config.clone());
    app.finish();
    app.cleanup();

    let target = Vec3::new(target.x, target.y, target.z);
    let muzzle_entity = {
        let world = app.world_mut();
        let pivot = world.spawn(Transform::IDENTITY).id();
        let muzzle = world
            .spawn(Transform::from_xyz(muzzle.x, muzzle.y, muzzle.z))
            .id();
        world.entity_mut(pivot).add_child(muzzle);
        world.spawn(
            AimCorrection::from_config(config, Some(pivot), Some(muzzle))
                .with_target(AimTarget::Point(target)),
        );
        muzzle
    };

    let mut last = None;
    for frame in 1..=frames {
        app.update();

        let world = app.world();
        let Some(global) = world.get::<GlobalTransform>(muzzle_entity) else {
            break;
        };
        let (_, rotation, translation) = global.to_scale_rotation_translation();
        let miss = (target - translation).cross(rotation * Vec3::Z).length();
        let status = world
            .iter_entities()
            .find_map(|e| e.get::<AimCorrection>().map(AimCorrection::status))
            .unwrap_or_default();
        println!("frame {frame}: status={status:?}, miss={miss:.6}");
        last = Some((status, miss));
    }
    last
}

fn run_info(config: &AimConfig) {
    println!("boresight v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("crates:");
    println!("  boresight-core {}", env!("CARGO_PKG_VERSION"));
    println!("  boresight-aim  {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("solver:");
    println!("  epsilon          {:e}", config.solver.epsilon);
    println!("  up tolerance     {:e}", config.solver.up_tolerance);
    println!("  aim early/late   {}/{}", config.aim_early, config.aim_late);
    println!("  draw debug       {}", config.draw_debug);
    println!();
    println!("edition: 2024");
}

fn boresight_miss(muzzle: &Pose, target: &Point3<f32>) -> f32 {
    (target - muzzle.position).cross(&muzzle.forward()).norm()
}

fn load_config(path: Option<&Path>) -> Result<AimConfig, BoresightError> {
    match path {
        Some(path) => Ok(AimConfig::from_file(path)?),
        None => Ok(AimConfig::default()),
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn run(cli: Cli) -> Result<(), BoresightError> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Solve {
            pivot,
            heading,
            elevation,
            muzzle,
            target,
        }) => {
            let pivot = Pose::looking(Point3::from(pivot), heading, elevation);
            run_solve(&config, pivot, muzzle, &Point3::from(target))?;
        }
        Some(Commands::Sweep {
            muzzle,
            height,
            max_range,
            steps,
        }) => run_sweep(&config, muzzle, height, max_range, steps),
        Some(Commands::Scene {
            muzzle,
            target,
            frames,
        }) => {
            run_scene(&config, muzzle, target, frames);
        }
        Some(Commands::Info) | None => run_info(&config),
    }
    Ok(())
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("boresight: {err}");
            ExitCode::FAILURE
        }
    }
}
