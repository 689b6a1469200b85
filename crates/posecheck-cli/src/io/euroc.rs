use std::fs::File;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use log::info;
use nalgebra::{Quaternion, UnitQuaternion, Vector3};
use posecheck_core::math::pose_from_parts;
use posecheck_core::trajectory::PoseTrajectory;

use crate::errors::{CliError, Result};

const FORMAT: &str = "EuRoC";

/// Position, orientation and the timestamp column.
const MIN_COLUMNS: usize = 8;

/// Parses the ground truth of a EuRoC MAV sequence
/// (`mav0/state_groundtruth_estimate0/data.csv`).
///
/// Expected format, comma separated, `#` header:
/// timestamp_ns,px,py,pz,qw,qx,qy,qz[,velocity and bias columns]
///
/// Timestamps are converted from nanoseconds to seconds. Columns after the
/// orientation are ignored.
pub fn read_euroc_csv_trajectory(path: impl AsRef<Path>) -> Result<PoseTrajectory> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|_| CliError::TrajectoryFileNotFound(path.display().to_string()))?;

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .comment(Some(b'#'))
        .flexible(true)
        .trim(Trim::All)
        .from_reader(file);

    let mut timestamps = Vec::new();
    let mut poses = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = result?;
        let line = record
            .position()
            .map_or(index + 1, |position| position.line() as usize);

        if record.len() < MIN_COLUMNS {
            return Err(CliError::FileFormat {
                format: FORMAT,
                line,
                message: format!(
                    "expected at least {MIN_COLUMNS} columns, found {}",
                    record.len()
                ),
            });
        }

        let timestamp_ns: u64 = record[0].parse().map_err(|e| CliError::FileFormat {
            format: FORMAT,
            line,
            message: format!("invalid timestamp '{}': {e}", &record[0]),
        })?;

        let mut values = [0.0_f64; MIN_COLUMNS - 1];
        for (column, value) in values.iter_mut().enumerate() {
            let field = &record[column + 1];
            *value = field.parse().map_err(|e| CliError::FileFormat {
                format: FORMAT,
                line,
                message: format!("invalid number '{field}': {e}"),
            })?;
        }

        let quaternion = Quaternion::new(values[3], values[4], values[5], values[6]);
        let norm = quaternion.norm();
        if !norm.is_finite() || norm == 0.0 {
            return Err(CliError::FileFormat {
                format: FORMAT,
                line,
                message: format!("quaternion norm must be finite and non-zero, got {norm}"),
            });
        }

        timestamps.push(timestamp_ns as f64 * 1e-9);
        poses.push(pose_from_parts(
            UnitQuaternion::from_quaternion(quaternion),
            Vector3::new(values[0], values[1], values[2]),
        ));
    }

    if poses.is_empty() {
        return Err(CliError::FileFormat {
            format: FORMAT,
            line: 0,
            message: format!("no poses found in {}", path.display()),
        });
    }

    let trajectory = PoseTrajectory::new(poses, timestamps)?;
    info!(
        "Loaded {} stamped poses from {}",
        trajectory.len(),
        path.display()
    );
    Ok(trajectory)
}
