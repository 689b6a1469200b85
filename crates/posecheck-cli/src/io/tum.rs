use std::path::Path;

use log::info;
use nalgebra::{Quaternion, UnitQuaternion, Vector3};
use posecheck_core::math::pose_from_parts;
use posecheck_core::trajectory::PoseTrajectory;

use super::read_rows;
use crate::errors::{CliError, Result};

const FORMAT: &str = "TUM";

/// Parses a TUM trajectory file.
///
/// Expected format, one pose per line:
/// timestamp tx ty tz qx qy qz qw
pub fn read_tum_trajectory_file(path: impl AsRef<Path>) -> Result<PoseTrajectory> {
    let path = path.as_ref();
    let rows = read_rows(path, FORMAT, 8)?;

    let mut timestamps = Vec::with_capacity(rows.len());
    let mut poses = Vec::with_capacity(rows.len());
    for row in &rows {
        let v = &row.values;
        let quaternion = Quaternion::new(v[7], v[4], v[5], v[6]);
        let norm = quaternion.norm();
        if !norm.is_finite() || norm == 0.0 {
            return Err(CliError::FileFormat {
                format: FORMAT,
                line: row.line,
                message: format!("quaternion norm must be finite and non-zero, got {norm}"),
            });
        }
        timestamps.push(v[0]);
        poses.push(pose_from_parts(
            UnitQuaternion::from_quaternion(quaternion),
            Vector3::new(v[1], v[2], v[3]),
        ));
    }

    let trajectory = PoseTrajectory::new(poses, timestamps)?;
    info!(
        "Loaded {} stamped poses from {}",
        trajectory.len(),
        path.display()
    );
    Ok(trajectory)
}
