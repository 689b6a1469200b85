pub mod cli;
pub mod config;
pub mod errors;
pub mod io;
pub mod logging;
pub mod output;

use log::debug;
use posecheck_core::result::EvalResult;
use posecheck_core::trajectory::Trajectory;
use posecheck_eval::evaluate;

use crate::cli::Command;
use crate::config::resolve_config;
use crate::errors::Result;
use crate::io::{read_euroc_csv_trajectory, read_kitti_poses_file, read_tum_trajectory_file};
use crate::output::save_result_file;

/// Loads both trajectory files, runs the APE pipeline and optionally saves
/// the result.
pub fn run(command: &Command) -> Result<EvalResult> {
    let config = resolve_config(command)?;
    debug!("Run configuration: {config:?}");

    let (ref_file, est_file) = command.files();
    let (reference, estimate) = match command {
        Command::Tum { .. } => (
            Trajectory::Timed(read_tum_trajectory_file(ref_file)?),
            Trajectory::Timed(read_tum_trajectory_file(est_file)?),
        ),
        Command::Euroc { .. } => (
            Trajectory::Timed(read_euroc_csv_trajectory(ref_file)?),
            Trajectory::Timed(read_tum_trajectory_file(est_file)?),
        ),
        Command::Kitti { .. } => (
            Trajectory::Path(read_kitti_poses_file(ref_file)?),
            Trajectory::Path(read_kitti_poses_file(est_file)?),
        ),
    };

    let mut result = evaluate(&reference, &estimate, &config)?;

    let common = command.common();
    if let Some(path) = &common.save_results {
        if !config.save_trajectories {
            result.clear_trajectories();
        }
        save_result_file(path, &result, !common.no_warnings)?;
    }
    Ok(result)
}
