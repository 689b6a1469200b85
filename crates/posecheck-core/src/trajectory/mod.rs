mod path;
mod timed;

pub use path::PosePath;
pub use timed::PoseTrajectory;

use thiserror::Error;

use crate::math::SimilarityTransform;

/// Malformed trajectory data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    #[error("trajectory has {poses} poses but {timestamps} timestamps")]
    LengthMismatch { poses: usize, timestamps: usize },

    #[error("timestamps must be strictly increasing (index {index}: {previous} -> {current})")]
    NonIncreasingTimestamps {
        index: usize,
        previous: f64,
        current: f64,
    },

    #[error("timestamp at index {index} is not finite")]
    NonFiniteTimestamp { index: usize },

    #[error("index {index} is out of range for a trajectory of {len} poses")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("time range start {start} is after its end {end}")]
    InvalidTimeRange { start: f64, end: f64 },
}

/// Trajectory as supplied by a loader: with or without timestamps.
#[derive(Debug, Clone, PartialEq)]
pub enum Trajectory {
    Path(PosePath),
    Timed(PoseTrajectory),
}

impl Trajectory {
    pub fn path(&self) -> &PosePath {
        match self {
            Trajectory::Path(path) => path,
            Trajectory::Timed(trajectory) => trajectory.path(),
        }
    }

    pub fn timestamps(&self) -> Option<&[f64]> {
        match self {
            Trajectory::Path(_) => None,
            Trajectory::Timed(trajectory) => Some(trajectory.timestamps()),
        }
    }

    pub fn as_timed(&self) -> Option<&PoseTrajectory> {
        match self {
            Trajectory::Path(_) => None,
            Trajectory::Timed(trajectory) => Some(trajectory),
        }
    }

    pub fn len(&self) -> usize {
        self.path().len()
    }

    pub fn is_empty(&self) -> bool {
        self.path().is_empty()
    }

    pub fn transformed(&self, transform: &SimilarityTransform) -> Self {
        match self {
            Trajectory::Path(path) => Trajectory::Path(path.transformed(transform)),
            Trajectory::Timed(trajectory) => Trajectory::Timed(trajectory.transformed(transform)),
        }
    }
}

impl From<PosePath> for Trajectory {
    fn from(path: PosePath) -> Self {
        Trajectory::Path(path)
    }
}

impl From<PoseTrajectory> for Trajectory {
    fn from(trajectory: PoseTrajectory) -> Self {
        Trajectory::Timed(trajectory)
    }
}
