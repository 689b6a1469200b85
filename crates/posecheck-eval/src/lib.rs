//! Absolute pose error pipeline: time association, alignment, per-pose
//! errors and result assembly.

mod config;

pub use config::{ApeConfig, ApeSettings};

use log::{debug, info};
use posecheck_core::align::{AlignmentError, AlignmentMethod, estimate_alignment};
use posecheck_core::metrics::{Ape, MetricError};
use posecheck_core::result::EvalResult;
use posecheck_core::sync::{AssociationError, associate};
use posecheck_core::trajectory::{DataError, Trajectory};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApeError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Data(#[from] DataError),
    #[error("trajectory association failed: {0}")]
    Association(#[from] AssociationError),
    #[error("alignment failed: {0}")]
    Alignment(#[from] AlignmentError),
    #[error("APE computation failed: {0}")]
    Metric(#[from] MetricError),
}

/// Runs the full pipeline from an unchecked configuration.
///
/// When both inputs carry timestamps the reference is first restricted to
/// `[t_start, t_end]` and then associated with the estimate.
pub fn evaluate(
    reference: &Trajectory,
    estimate: &Trajectory,
    config: &ApeConfig,
) -> Result<EvalResult, ApeError> {
    let settings = config.validate()?;

    match (reference, estimate) {
        (Trajectory::Timed(reference), Trajectory::Timed(estimate)) => {
            let reference = if settings.t_start.is_some() || settings.t_end.is_some() {
                if let Some(start) = settings.t_start {
                    info!("Using time range start: {start}s");
                }
                if let Some(end) = settings.t_end {
                    info!("Using time range end: {end}s");
                }
                reference.reduce_to_time_range(settings.t_start, settings.t_end)?
            } else {
                reference.clone()
            };

            debug!("Synchronizing trajectories...");
            let (reference, estimate) =
                associate(&reference, estimate, settings.max_diff, settings.offset)?;
            ape(
                &Trajectory::Timed(reference),
                &Trajectory::Timed(estimate),
                &settings,
            )
        }
        _ => ape(reference, estimate, &settings),
    }
}

/// APE of index-matched trajectories.
///
/// Inputs are never modified; the aligned estimate is a new trajectory and is
/// the one stored in the result.
pub fn ape(
    reference: &Trajectory,
    estimate: &Trajectory,
    settings: &ApeSettings,
) -> Result<EvalResult, ApeError> {
    let transform = settings
        .alignment
        .as_ref()
        .map(|method| {
            debug!("Aligning with {method}");
            estimate_alignment(estimate.path(), reference.path(), method)
        })
        .transpose()?;
    let estimate = match &transform {
        Some(transform) => estimate.transformed(transform),
        None => estimate.clone(),
    };

    let metric = Ape::new(settings.pose_relation);
    let errors = metric.process(reference.path(), estimate.path())?;

    let mut result = EvalResult::from_errors(errors)?;
    result.add_info(
        "title",
        format!(
            "{}\n{}",
            metric.title(),
            alignment_title(settings.alignment.as_ref(), result.len())
        ),
    );
    result.add_info("label", metric.label());
    result.add_info("ref_name", settings.ref_name.as_str());
    result.add_info("est_name", settings.est_name.as_str());
    result.add_info("pose_relation", settings.pose_relation.label());
    result.add_info(
        "alignment",
        settings
            .alignment
            .as_ref()
            .map_or(Value::Null, |method| Value::from(method.to_string())),
    );

    info!("Computed {} for {} pose pairs", metric.title(), result.len());

    result.add_trajectory(settings.ref_name.as_str(), reference);
    result.add_trajectory(settings.est_name.as_str(), &estimate);

    if let Trajectory::Timed(timed) = &estimate {
        let reference_distances = reference.path().distances();
        let first = reference_distances.first().copied().unwrap_or(0.0);
        result.add_array("seconds_from_start", timed.seconds_from_start());
        result.add_array("timestamps", timed.timestamps().to_vec());
        result.add_array(
            "distances_from_start",
            reference_distances.iter().map(|d| d - first).collect(),
        );
        result.add_array("distances", timed.distances());
    }

    result.set_alignment(transform);
    Ok(result)
}

/// Describes the alignment mode. The reported pose count is capped at the
/// number of matched poses, which is what the fit actually used.
fn alignment_title(alignment: Option<&AlignmentMethod>, matched: usize) -> String {
    let mut title = match alignment {
        Some(AlignmentMethod::Umeyama {
            correct_scale: false,
            ..
        }) => "(with SE(3) Umeyama alignment)".to_string(),
        Some(AlignmentMethod::Umeyama {
            correct_scale: true,
            ..
        }) => "(with Sim(3) Umeyama alignment)".to_string(),
        Some(AlignmentMethod::ScaleOnly { .. }) => "(scale corrected)".to_string(),
        Some(AlignmentMethod::Origin) => "(with origin alignment)".to_string(),
        None => "(not aligned)".to_string(),
    };
    if let Some(n) = alignment.and_then(AlignmentMethod::n_to_align) {
        title.push_str(&format!(" (aligned poses: {})", n.min(matched)));
    }
    title
}
