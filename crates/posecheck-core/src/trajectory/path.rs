use nalgebra::{UnitQuaternion, Vector3};

use super::DataError;
use crate::math::{Pose, SimilarityTransform, pose_from_parts};

/// Ordered sequence of rigid poses.
///
/// Paths built from bare positions carry identity rotations and report
/// `has_orientation() == false`, so orientation-based metrics can refuse them.
#[derive(Debug, Clone, PartialEq)]
pub struct PosePath {
    poses: Vec<Pose>,
    has_orientation: bool,
}

impl PosePath {
    pub fn new(poses: Vec<Pose>) -> Self {
        Self {
            poses,
            has_orientation: true,
        }
    }

    /// Builds a position-only path.
    pub fn from_positions(positions: Vec<Vector3<f64>>) -> Self {
        let poses = positions
            .into_iter()
            .map(|position| pose_from_parts(UnitQuaternion::identity(), position))
            .collect();
        Self {
            poses,
            has_orientation: false,
        }
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    pub fn has_orientation(&self) -> bool {
        self.has_orientation
    }

    pub fn poses(&self) -> &[Pose] {
        &self.poses
    }

    pub fn positions(&self) -> Vec<Vector3<f64>> {
        self.poses.iter().map(|pose| pose.translation.vector).collect()
    }

    pub fn orientations(&self) -> Vec<UnitQuaternion<f64>> {
        self.poses.iter().map(|pose| pose.rotation).collect()
    }

    /// Cumulative travelled distance at each pose, starting at `0.0`.
    pub fn distances(&self) -> Vec<f64> {
        let mut distances = Vec::with_capacity(self.poses.len());
        let mut total = 0.0;
        let mut previous: Option<&Pose> = None;
        for pose in &self.poses {
            if let Some(previous) = previous {
                total += (pose.translation.vector - previous.translation.vector).norm();
            }
            distances.push(total);
            previous = Some(pose);
        }
        distances
    }

    /// Total travelled distance.
    pub fn path_length(&self) -> f64 {
        self.distances().last().copied().unwrap_or(0.0)
    }

    /// Drops orientation data, keeping positions only.
    pub fn positions_only(&self) -> Self {
        Self::from_positions(self.positions())
    }

    /// Restricts the path to a subset of indices. Duplicates collapse and the
    /// result keeps the original ordering regardless of the order of `indices`.
    pub fn reduce_to_indices(&self, indices: &[usize]) -> Result<Self, DataError> {
        let indices = normalize_indices(indices, self.len())?;
        Ok(self.pick(&indices))
    }

    /// Applies `transform` to every pose, returning a new path.
    pub fn transformed(&self, transform: &SimilarityTransform) -> Self {
        Self {
            poses: self
                .poses
                .iter()
                .map(|pose| transform.apply_to_pose(pose))
                .collect(),
            has_orientation: self.has_orientation,
        }
    }

    /// `indices` must be sorted and in range.
    pub(crate) fn pick(&self, indices: &[usize]) -> Self {
        Self {
            poses: indices.iter().map(|&index| self.poses[index]).collect(),
            has_orientation: self.has_orientation,
        }
    }
}

pub(super) fn normalize_indices(indices: &[usize], len: usize) -> Result<Vec<usize>, DataError> {
    if let Some(&index) = indices.iter().find(|&&index| index >= len) {
        return Err(DataError::IndexOutOfRange { index, len });
    }
    let mut indices = indices.to_vec();
    indices.sort_unstable();
    indices.dedup();
    Ok(indices)
}
