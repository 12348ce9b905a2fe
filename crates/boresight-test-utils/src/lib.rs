//! Shared test fixtures and utilities for boresight crates.
//!
//! Provides reusable helpers for building Bevy test apps, spawning posed
//! entities, building rigs with known mounts, and deterministic RNG setup.

pub mod app;
pub mod rigs;
pub mod rng;

// ---------------------------------------------------------------------------
// Re-exports for convenience
// ---------------------------------------------------------------------------

pub use app::{aim_test_app, minimal_test_app, spawn_posed};
pub use rigs::{mounted_rig, random_mount, random_target_beyond};
pub use rng::seeded_rng;
