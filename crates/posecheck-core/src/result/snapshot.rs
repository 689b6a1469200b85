use nalgebra::{Quaternion, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::math::pose_from_parts;
use crate::trajectory::{DataError, PosePath, PoseTrajectory, Trajectory};

/// Plain-data copy of a trajectory for serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySnapshot {
    pub has_orientation: bool,
    pub poses: Vec<PoseRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub qw: f64,
    pub qx: f64,
    pub qy: f64,
    pub qz: f64,
}

impl From<&Trajectory> for TrajectorySnapshot {
    fn from(trajectory: &Trajectory) -> Self {
        let path = trajectory.path();
        let timestamps = trajectory.timestamps();
        let poses = path
            .poses()
            .iter()
            .enumerate()
            .map(|(index, pose)| {
                let translation = pose.translation.vector;
                let quaternion = pose.rotation.quaternion();
                PoseRecord {
                    timestamp: timestamps.map(|stamps| stamps[index]),
                    x: translation.x,
                    y: translation.y,
                    z: translation.z,
                    qw: quaternion.w,
                    qx: quaternion.i,
                    qy: quaternion.j,
                    qz: quaternion.k,
                }
            })
            .collect();

        Self {
            has_orientation: path.has_orientation(),
            poses,
        }
    }
}

impl TrajectorySnapshot {
    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    /// Rebuilds the trajectory; timed when every record carries a timestamp.
    pub fn to_trajectory(&self) -> Result<Trajectory, DataError> {
        let positions = self
            .poses
            .iter()
            .map(|record| Vector3::new(record.x, record.y, record.z));

        let path = if self.has_orientation {
            PosePath::new(
                positions
                    .zip(&self.poses)
                    .map(|(position, record)| {
                        let rotation = UnitQuaternion::from_quaternion(Quaternion::new(
                            record.qw, record.qx, record.qy, record.qz,
                        ));
                        pose_from_parts(rotation, position)
                    })
                    .collect(),
            )
        } else {
            PosePath::from_positions(positions.collect())
        };

        let timestamps: Option<Vec<f64>> = self.poses.iter().map(|record| record.timestamp).collect();
        match timestamps {
            Some(timestamps) if !self.poses.is_empty() => {
                Ok(Trajectory::Timed(PoseTrajectory::from_path(path, timestamps)?))
            }
            _ => Ok(Trajectory::Path(path)),
        }
    }
}
