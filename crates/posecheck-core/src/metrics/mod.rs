mod stats;

pub use stats::{Statistics, StatisticsType};

use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::math::{Pose, chordal_distance, homogeneous_distance, relative_pose, rotation_angle};
use crate::trajectory::PosePath;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetricError {
    #[error("reference has {reference} poses but estimate has {estimate}")]
    LengthMismatch { reference: usize, estimate: usize },

    #[error("no poses to evaluate")]
    Empty,

    #[error("pose relation '{relation}' needs orientations, but the {side} carries positions only")]
    OrientationRequired {
        relation: PoseRelation,
        side: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown pose relation '{0}' (expected one of: full, trans_part, rot_part, angle_deg, angle_rad, point_distance)")]
pub struct ParsePoseRelationError(pub String);

/// Reduction of a relative pose `E = reference⁻¹ · estimate` to a scalar error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoseRelation {
    /// Frobenius norm of `E - I` over the 4x4 homogeneous matrix.
    Full,
    /// Norm of the translation of `E`.
    #[default]
    TransPart,
    /// Frobenius norm of `R(E) - I`.
    RotPart,
    AngleDeg,
    AngleRad,
    /// Distance between raw positions; orientation is ignored.
    PointDistance,
}

impl PoseRelation {
    pub const ALL: [PoseRelation; 6] = [
        PoseRelation::Full,
        PoseRelation::TransPart,
        PoseRelation::RotPart,
        PoseRelation::AngleDeg,
        PoseRelation::AngleRad,
        PoseRelation::PointDistance,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PoseRelation::Full => "full",
            PoseRelation::TransPart => "trans_part",
            PoseRelation::RotPart => "rot_part",
            PoseRelation::AngleDeg => "angle_deg",
            PoseRelation::AngleRad => "angle_rad",
            PoseRelation::PointDistance => "point_distance",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PoseRelation::Full => "full transformation",
            PoseRelation::TransPart => "translation part",
            PoseRelation::RotPart => "rotation part",
            PoseRelation::AngleDeg => "rotation angle in degrees",
            PoseRelation::AngleRad => "rotation angle in radians",
            PoseRelation::PointDistance => "point distance",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            PoseRelation::TransPart | PoseRelation::PointDistance => "m",
            PoseRelation::AngleDeg => "deg",
            PoseRelation::AngleRad => "rad",
            PoseRelation::Full | PoseRelation::RotPart => "unit-less",
        }
    }

    pub fn requires_orientation(&self) -> bool {
        !matches!(self, PoseRelation::TransPart | PoseRelation::PointDistance)
    }

    /// Error between one reference pose and its matched estimate.
    pub fn pose_error(&self, reference: &Pose, estimate: &Pose) -> f64 {
        let relative = || relative_pose(reference, estimate);
        match self {
            PoseRelation::Full => homogeneous_distance(&relative()),
            PoseRelation::TransPart => relative().translation.vector.norm(),
            PoseRelation::RotPart => {
                chordal_distance(relative().rotation.to_rotation_matrix().matrix())
            }
            PoseRelation::AngleRad => rotation_angle(&relative().rotation),
            PoseRelation::AngleDeg => rotation_angle(&relative().rotation).to_degrees(),
            PoseRelation::PointDistance => {
                (estimate.translation.vector - reference.translation.vector).norm()
            }
        }
    }
}

impl fmt::Display for PoseRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PoseRelation {
    type Err = ParsePoseRelationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        PoseRelation::ALL
            .into_iter()
            .find(|relation| relation.label() == value)
            .ok_or_else(|| ParsePoseRelationError(value.to_string()))
    }
}

/// Absolute pose error under a fixed pose relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ape {
    relation: PoseRelation,
}

impl Ape {
    pub fn new(relation: PoseRelation) -> Self {
        Self { relation }
    }

    pub fn relation(&self) -> PoseRelation {
        self.relation
    }

    /// E.g. `APE w.r.t. translation part (m)`.
    pub fn title(&self) -> String {
        format!(
            "APE w.r.t. {} ({})",
            self.relation.description(),
            self.relation.unit()
        )
    }

    /// E.g. `APE (m)`.
    pub fn label(&self) -> String {
        format!("APE ({})", self.relation.unit())
    }

    /// Per-pose errors between index-matched `reference` and `estimate`.
    ///
    /// Indices are independent and evaluated in parallel; the output keeps
    /// index order.
    pub fn process(
        &self,
        reference: &PosePath,
        estimate: &PosePath,
    ) -> Result<Vec<f64>, MetricError> {
        if reference.len() != estimate.len() {
            return Err(MetricError::LengthMismatch {
                reference: reference.len(),
                estimate: estimate.len(),
            });
        }
        if reference.is_empty() {
            return Err(MetricError::Empty);
        }
        if self.relation.requires_orientation() {
            for (side, path) in [("reference", reference), ("estimate", estimate)] {
                if !path.has_orientation() {
                    return Err(MetricError::OrientationRequired {
                        relation: self.relation,
                        side,
                    });
                }
            }
        }

        let relation = self.relation;
        Ok(reference
            .poses()
            .par_iter()
            .zip(estimate.poses())
            .map(|(r, e)| relation.pose_error(r, e))
            .collect())
    }
}
