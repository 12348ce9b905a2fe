use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

const fn default_epsilon() -> f32 {
    1e-6
}
const fn default_up_tolerance() -> f32 {
    1e-6
}
const fn default_true() -> bool {
    true
}
const fn default_debug_ray_length() -> f32 {
    200.0
}
const fn default_debug_cross_size() -> f32 {
    2.0
}

// ---------------------------------------------------------------------------
// SolverConfig
// ---------------------------------------------------------------------------

/// Numerical guards for the aim solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Aim vectors shorter than this are treated as degenerate (default: 1e-6).
    #[serde(default = "default_epsilon")]
    pub epsilon: f32,

    /// Minimum sine of the angle between the final aim vector and world up.
    /// Below it the look rotation is undefined and the solve is skipped
    /// (default: 1e-6).
    #[serde(default = "default_up_tolerance")]
    pub up_tolerance: f32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            epsilon: default_epsilon(),
            up_tolerance: default_up_tolerance(),
        }
    }
}

impl SolverConfig {
    /// Validate configuration. Returns Err on invalid values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "solver.epsilon".into(),
                message: format!("{} (must be finite and > 0)", self.epsilon),
            });
        }
        if !(self.up_tolerance.is_finite() && (0.0..1.0).contains(&self.up_tolerance)) {
            return Err(ConfigError::InvalidValue {
                field: "solver.up_tolerance".into(),
                message: format!("{} (must be in [0, 1))", self.up_tolerance),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// AimConfig
// ---------------------------------------------------------------------------

/// Aim correction configuration.
///
/// The `aim_early` / `aim_late` flags are the defaults applied to newly
/// created rigs; each rig can still toggle them individually.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Resource)]
pub struct AimConfig {
    #[serde(default)]
    pub solver: SolverConfig,

    /// Solve once in the early phase of a tick (default: true).
    #[serde(default = "default_true")]
    pub aim_early: bool,

    /// Solve once in the late phase of a tick (default: true).
    #[serde(default = "default_true")]
    pub aim_late: bool,

    /// Emit debug line geometry (default: false).
    #[serde(default)]
    pub draw_debug: bool,

    /// Length of the muzzle boresight debug ray (default: 200).
    #[serde(default = "default_debug_ray_length")]
    pub debug_ray_length: f32,

    /// Half-extent of the axis crosses marking aim points (default: 2).
    #[serde(default = "default_debug_cross_size")]
    pub debug_cross_size: f32,
}

impl Default for AimConfig {
    fn default() -> Self {
        Self {
            solver: SolverConfig::default(),
            aim_early: true,
            aim_late: true,
            draw_debug: false,
            debug_ray_length: default_debug_ray_length(),
            debug_cross_size: default_debug_cross_size(),
        }
    }
}

impl AimConfig {
    /// Validate configuration. Returns Err on invalid values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.solver.validate()?;
        if !(self.debug_ray_length.is_finite() && self.debug_ray_length >= 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "debug_ray_length".into(),
                message: "must be finite and non-negative".into(),
            });
        }
        if !(self.debug_cross_size.is_finite() && self.debug_cross_size >= 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "debug_cross_size".into(),
                message: "must be finite and non-negative".into(),
            });
        }
        Ok(())
    }

    /// Parse and validate from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from TOML file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
