use posecheck_core::trajectory::DataError;
use posecheck_eval::ApeError;
use thiserror::Error;

/// Errors that can occur while loading trajectories or writing results
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{format} file format error at line {line}: {message}")]
    FileFormat {
        format: &'static str,
        line: usize,
        message: String,
    },

    #[error("Trajectory file not found: {0}")]
    TrajectoryFileNotFound(String),

    #[error("Output file already exists: {0} (pass --no_warnings to overwrite)")]
    OutputExists(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid trajectory: {0}")]
    Data(#[from] DataError),

    #[error(transparent)]
    Ape(#[from] ApeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Logger setup failed: {0}")]
    Logger(#[from] log::SetLoggerError),
}

pub type Result<T> = std::result::Result<T, CliError>;
