use std::path::Path;

use log::info;
use nalgebra::{Matrix3, Vector3};
use posecheck_core::math::{pose_from_parts, rotation_from_matrix};
use posecheck_core::trajectory::PosePath;

use super::read_rows;
use crate::errors::{CliError, Result};

const FORMAT: &str = "KITTI";

/// Largest accepted deviation of a rotation block from SO(3). KITTI files
/// are written with limited precision.
const ROTATION_TOLERANCE: f64 = 1e-4;

/// Parses a KITTI pose file: the first three rows of a 4x4 pose matrix,
/// row-major, 12 values per line. KITTI poses carry no timestamps.
pub fn read_kitti_poses_file(path: impl AsRef<Path>) -> Result<PosePath> {
    let path = path.as_ref();
    let rows = read_rows(path, FORMAT, 12)?;

    let poses = rows
        .iter()
        .map(|row| {
            let v = &row.values;
            let rotation = Matrix3::new(v[0], v[1], v[2], v[4], v[5], v[6], v[8], v[9], v[10]);
            let rotation = rotation_from_matrix(&rotation, ROTATION_TOLERANCE).ok_or_else(|| {
                CliError::FileFormat {
                    format: FORMAT,
                    line: row.line,
                    message: "rotation block is not a proper rotation matrix".to_string(),
                }
            })?;
            Ok(pose_from_parts(rotation, Vector3::new(v[3], v[7], v[11])))
        })
        .collect::<Result<Vec<_>>>()?;

    info!("Loaded {} poses from {}", poses.len(), path.display());
    Ok(PosePath::new(poses))
}
