//! Error types for the induction simulation.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML parse error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Invalid field grid `{grid}`: {reason}")]
    InvalidGrid { grid: String, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("charge crossed more than {segments} coil segments in one step (segment {index}, position {position})")]
    SegmentOverrun {
        segments: usize,
        index: usize,
        position: f64,
    },
}

pub type Result<T> = std::result::Result<T, SimulationError>;
