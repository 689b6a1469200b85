use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use posecheck_core::metrics::PoseRelation;

/// Absolute pose error between a reference and an estimated trajectory.
#[derive(Debug, Parser)]
#[command(name = "posecheck-ape", author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// TUM trajectory files: `timestamp tx ty tz qx qy qz qw` per line
    Tum {
        /// Reference trajectory file
        ref_file: PathBuf,
        /// Estimated trajectory file
        est_file: PathBuf,
        #[command(flatten)]
        sync: SyncArgs,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// EuRoC ground truth CSV as reference, TUM trajectory file as estimate
    Euroc {
        /// Reference: <seq>/mav0/state_groundtruth_estimate0/data.csv
        state_gt_csv: PathBuf,
        /// Estimated trajectory file in TUM format
        est_file: PathBuf,
        #[command(flatten)]
        sync: SyncArgs,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// KITTI pose files: 12 values of a row-major 3x4 matrix per line
    Kitti {
        /// Reference pose file
        ref_file: PathBuf,
        /// Estimated pose file
        est_file: PathBuf,
        #[command(flatten)]
        common: CommonArgs,
    },
}

impl Command {
    pub fn common(&self) -> &CommonArgs {
        match self {
            Command::Tum { common, .. }
            | Command::Euroc { common, .. }
            | Command::Kitti { common, .. } => common,
        }
    }

    pub fn sync(&self) -> Option<&SyncArgs> {
        match self {
            Command::Tum { sync, .. } | Command::Euroc { sync, .. } => Some(sync),
            Command::Kitti { .. } => None,
        }
    }

    pub fn files(&self) -> (&PathBuf, &PathBuf) {
        match self {
            Command::Tum {
                ref_file, est_file, ..
            }
            | Command::Kitti {
                ref_file, est_file, ..
            } => (ref_file, est_file),
            Command::Euroc {
                state_gt_csv,
                est_file,
                ..
            } => (state_gt_csv, est_file),
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Pose relation on which the APE is based
    #[arg(short = 'r', long = "pose_relation", default_value = "trans_part")]
    pub pose_relation: PoseRelation,

    /// Align the trajectories with Umeyama's method (SE(3))
    #[arg(short = 'a', long)]
    pub align: bool,

    /// Correct the scale (Sim(3) together with --align)
    #[arg(short = 's', long = "correct_scale")]
    pub correct_scale: bool,

    /// Use only the first N poses for alignment; -1 uses all
    #[arg(long = "n_to_align", default_value_t = -1, allow_negative_numbers = true)]
    pub n_to_align: i64,

    /// Align the first estimate pose onto the first reference pose
    #[arg(long = "align_origin")]
    pub align_origin: bool,

    /// Store the result as a JSON file
    #[arg(long = "save_results")]
    pub save_results: Option<PathBuf>,

    /// Also write the log to this file
    #[arg(long)]
    pub logfile: Option<PathBuf>,

    /// Overwrite existing output files without refusing
    #[arg(long = "no_warnings")]
    pub no_warnings: bool,

    /// Verbose output
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Suppress all console output except errors
    #[arg(long)]
    pub silent: bool,

    /// Debug output
    #[arg(long)]
    pub debug: bool,

    /// JSON or YAML file whose keys override the command line
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct SyncArgs {
    /// Maximum timestamp difference for data association
    #[arg(long = "t_max_diff", default_value_t = 0.01)]
    pub t_max_diff: f64,

    /// Constant timestamp offset of the estimate relative to the reference
    #[arg(long = "t_offset", default_value_t = 0.0, allow_negative_numbers = true)]
    pub t_offset: f64,

    /// Only use reference poses from this timestamp on
    #[arg(long = "t_start")]
    pub t_start: Option<f64>,

    /// Only use reference poses up to this timestamp
    #[arg(long = "t_end")]
    pub t_end: Option<f64>,
}

impl CommonArgs {
    /// Log level selected by the verbosity flags; `--silent` wins.
    pub fn log_level(&self) -> &'static str {
        if self.silent {
            "error"
        } else if self.debug {
            "debug"
        } else if self.verbose {
            "info"
        } else {
            "warn"
        }
    }
}
