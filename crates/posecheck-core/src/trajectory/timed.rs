use nalgebra::Vector3;

use super::DataError;
use super::path::{PosePath, normalize_indices};
use crate::math::{Pose, SimilarityTransform};

/// A [`PosePath`] with one strictly increasing timestamp (seconds) per pose.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseTrajectory {
    path: PosePath,
    timestamps: Vec<f64>,
}

impl PoseTrajectory {
    pub fn new(poses: Vec<Pose>, timestamps: Vec<f64>) -> Result<Self, DataError> {
        Self::from_path(PosePath::new(poses), timestamps)
    }

    /// Builds a position-only trajectory.
    pub fn from_positions(
        positions: Vec<Vector3<f64>>,
        timestamps: Vec<f64>,
    ) -> Result<Self, DataError> {
        Self::from_path(PosePath::from_positions(positions), timestamps)
    }

    pub fn from_path(path: PosePath, timestamps: Vec<f64>) -> Result<Self, DataError> {
        validate_timestamps(path.len(), &timestamps)?;
        Ok(Self { path, timestamps })
    }

    pub fn path(&self) -> &PosePath {
        &self.path
    }

    pub fn into_path(self) -> PosePath {
        self.path
    }

    pub fn timestamps(&self) -> &[f64] {
        &self.timestamps
    }

    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub fn poses(&self) -> &[Pose] {
        self.path.poses()
    }

    pub fn positions(&self) -> Vec<Vector3<f64>> {
        self.path.positions()
    }

    pub fn distances(&self) -> Vec<f64> {
        self.path.distances()
    }

    /// Time elapsed since the first timestamp, per pose.
    pub fn seconds_from_start(&self) -> Vec<f64> {
        let Some(&start) = self.timestamps.first() else {
            return Vec::new();
        };
        self.timestamps.iter().map(|t| t - start).collect()
    }

    pub fn duration(&self) -> f64 {
        match (self.timestamps.first(), self.timestamps.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }

    pub fn reduce_to_indices(&self, indices: &[usize]) -> Result<Self, DataError> {
        let indices = normalize_indices(indices, self.len())?;
        Ok(self.pick(&indices))
    }

    /// Keeps only poses with `t_start <= t <= t_end`. Missing bounds are open.
    pub fn reduce_to_time_range(
        &self,
        t_start: Option<f64>,
        t_end: Option<f64>,
    ) -> Result<Self, DataError> {
        if let (Some(start), Some(end)) = (t_start, t_end) {
            if start > end {
                return Err(DataError::InvalidTimeRange { start, end });
            }
        }

        let indices: Vec<usize> = self
            .timestamps
            .iter()
            .enumerate()
            .filter(|(_, t)| t_start.is_none_or(|start| **t >= start))
            .filter(|(_, t)| t_end.is_none_or(|end| **t <= end))
            .map(|(index, _)| index)
            .collect();
        Ok(self.pick(&indices))
    }

    pub fn transformed(&self, transform: &SimilarityTransform) -> Self {
        Self {
            path: self.path.transformed(transform),
            timestamps: self.timestamps.clone(),
        }
    }

    /// `indices` must be sorted and in range.
    pub(crate) fn pick(&self, indices: &[usize]) -> Self {
        Self {
            path: self.path.pick(indices),
            timestamps: indices.iter().map(|&index| self.timestamps[index]).collect(),
        }
    }
}

fn validate_timestamps(poses: usize, timestamps: &[f64]) -> Result<(), DataError> {
    if poses != timestamps.len() {
        return Err(DataError::LengthMismatch {
            poses,
            timestamps: timestamps.len(),
        });
    }

    let mut previous = f64::NEG_INFINITY;
    for (index, &current) in timestamps.iter().enumerate() {
        if !current.is_finite() {
            return Err(DataError::NonFiniteTimestamp { index });
        }
        if current <= previous {
            return Err(DataError::NonIncreasingTimestamps {
                index,
                previous,
                current,
            });
        }
        previous = current;
    }
    Ok(())
}
