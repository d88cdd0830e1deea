//! Error types for Lane Blitz
//!
//! Only load-time configuration can fail. The per-tick simulation path clamps
//! and logs instead of returning errors.

use thiserror::Error;

/// Configuration rejected while loading settings or the level catalog
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Level catalog is empty")]
    EmptyCatalog,

    #[error("Level {level} has no phases")]
    NoPhases { level: usize },

    #[error("Level {level}: first phase must start at 0 ms, got {offset_ms}")]
    FirstPhaseOffset { level: usize, offset_ms: u32 },

    #[error("Level {level}: phase {phase} starts at {offset_ms} ms, not after the previous phase")]
    PhaseOrder {
        level: usize,
        phase: usize,
        offset_ms: u32,
    },

    #[error("Level {level}, phase {phase}: obstacle type set is empty")]
    EmptyObstacleSet { level: usize, phase: usize },

    #[error("Level {level}, phase {phase}: {field} must be greater than zero")]
    ZeroInterval {
        level: usize,
        phase: usize,
        field: &'static str,
    },

    #[error("Level {level}: {field} must be greater than zero")]
    ZeroLevelField { level: usize, field: &'static str },

    #[error("Level {level}: unknown theme '{theme}'")]
    UnknownTheme { level: usize, theme: String },

    #[error("Unknown vehicle style '{0}'")]
    UnknownVehicleStyle(String),

    #[error("Invalid lane geometry: {0}")]
    InvalidLane(String),

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
