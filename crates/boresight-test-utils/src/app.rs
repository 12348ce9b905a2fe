//! Bevy test app builders.

use bevy::prelude::*;

/// Create a minimal test app with only the core plugin.
///
/// Provides `AimSet` ordering and the `AimConfig` resource but no systems.
pub fn minimal_test_app() -> App {
    let mut app = App::new();
    app.add_plugins(boresight_core::BoresightCorePlugin);
    app.finish();
    app.cleanup();
    app
}

/// Create a test app with the core and aim plugins.
///
/// No transform propagation runs; spawn entities with [`spawn_posed`] so
/// their `GlobalTransform` already matches.
pub fn aim_test_app() -> App {
    let mut app = App::new();
    app.add_plugins(boresight_core::BoresightCorePlugin);
    app.add_plugins(boresight_aim::BoresightAimPlugin);
    app.finish();
    app.cleanup();
    app
}

/// Spawn an entity whose `GlobalTransform` equals its `Transform`.
pub fn spawn_posed(world: &mut World, transform: Transform) -> Entity {
    world
        .spawn((transform, GlobalTransform::from(transform)))
        .id()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
