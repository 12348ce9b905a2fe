use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level error type for boresight.
#[derive(Debug, Error)]
pub enum BoresightError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Aim error: {0}")]
    Aim(#[from] AimError),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

/// Fatal aim configuration errors.
///
/// A rig that reports one of these stops solving until it is reconfigured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum AimError {
    #[error("pivot is not assigned")]
    MissingPivot,

    #[error("muzzle is not assigned")]
    MissingMuzzle,
}
