//! Trajectory alignment: Umeyama least squares, scale-only correction and
//! origin alignment.
//!
//! Every entry point estimates a [`SimilarityTransform`] mapping the estimate
//! onto the reference. Callers apply it with `transformed`, which produces a
//! new trajectory and always covers every pose, even when only a prefix was
//! used for the fit.

mod umeyama;

pub use umeyama::{MIN_CORRESPONDENCES, umeyama};

use std::fmt;

use log::{debug, warn};
use nalgebra::UnitQuaternion;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::math::{SimilarityTransform, rotation_angle};
use crate::trajectory::PosePath;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AlignmentError {
    #[error("alignment needs at least {required} correspondences, got {available}")]
    InsufficientCorrespondences { required: usize, available: usize },

    #[error("cannot align {estimate} estimate poses to {reference} reference poses")]
    LengthMismatch { estimate: usize, reference: usize },

    #[error("degenerate covariance (rank {rank}): points are collinear or coincident")]
    DegenerateCovariance { rank: usize },

    #[error("singular value decomposition did not converge")]
    SvdFailed,
}

/// How an estimate is brought into the reference frame.
///
/// `n_to_align` limits the fit to the first `n` matched poses; `None` uses all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum AlignmentMethod {
    Umeyama {
        correct_scale: bool,
        n_to_align: Option<usize>,
    },
    ScaleOnly {
        n_to_align: Option<usize>,
    },
    Origin,
}

impl AlignmentMethod {
    pub fn n_to_align(&self) -> Option<usize> {
        match self {
            AlignmentMethod::Umeyama { n_to_align, .. }
            | AlignmentMethod::ScaleOnly { n_to_align } => *n_to_align,
            AlignmentMethod::Origin => None,
        }
    }
}

impl fmt::Display for AlignmentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlignmentMethod::Umeyama {
                correct_scale: false,
                ..
            } => write!(f, "SE(3) Umeyama alignment"),
            AlignmentMethod::Umeyama {
                correct_scale: true,
                ..
            } => write!(f, "Sim(3) Umeyama alignment"),
            AlignmentMethod::ScaleOnly { .. } => write!(f, "scale correction"),
            AlignmentMethod::Origin => write!(f, "origin alignment"),
        }
    }
}

/// Estimates the transform taking `estimate` onto `reference`.
///
/// Both paths must be index-matched. A Umeyama fit restricted to a single
/// correspondence without scale correction degrades to origin alignment.
pub fn estimate_alignment(
    estimate: &PosePath,
    reference: &PosePath,
    method: &AlignmentMethod,
) -> Result<SimilarityTransform, AlignmentError> {
    if estimate.len() != reference.len() {
        return Err(AlignmentError::LengthMismatch {
            estimate: estimate.len(),
            reference: reference.len(),
        });
    }

    let transform = match *method {
        AlignmentMethod::Origin => align_origin(estimate, reference)?,
        AlignmentMethod::Umeyama {
            correct_scale,
            n_to_align,
        } => {
            let n = correspondence_count(estimate.len(), n_to_align);
            if n == 1 && !correct_scale {
                debug!("Single correspondence requested, aligning origins");
                align_origin(estimate, reference)?
            } else {
                let estimate_points = estimate.positions();
                let reference_points = reference.positions();
                umeyama(&estimate_points[..n], &reference_points[..n], correct_scale)?
            }
        }
        AlignmentMethod::ScaleOnly { n_to_align } => {
            let n = correspondence_count(estimate.len(), n_to_align);
            let estimate_points = estimate.positions();
            let reference_points = reference.positions();
            let fit = umeyama(&estimate_points[..n], &reference_points[..n], true)?;
            let translation = umeyama::centroid(&reference_points[..n])
                - fit.scale() * umeyama::centroid(&estimate_points[..n]);
            SimilarityTransform::new(UnitQuaternion::identity(), translation, fit.scale())
        }
    };

    debug!(
        "{method}: rotation angle {:.6} rad, translation {:?}, scale {:.6}",
        rotation_angle(transform.rotation()),
        transform.translation().as_slice(),
        transform.scale()
    );
    Ok(transform)
}

/// Rigid transform mapping the estimate's first pose exactly onto the
/// reference's first pose: `T = ref₀ · est₀⁻¹`.
pub fn align_origin(
    estimate: &PosePath,
    reference: &PosePath,
) -> Result<SimilarityTransform, AlignmentError> {
    match (estimate.poses().first(), reference.poses().first()) {
        (Some(estimate_origin), Some(reference_origin)) => Ok(SimilarityTransform::from_rigid(
            &(reference_origin * estimate_origin.inverse()),
        )),
        _ => Err(AlignmentError::InsufficientCorrespondences {
            required: 1,
            available: 0,
        }),
    }
}

fn correspondence_count(len: usize, n_to_align: Option<usize>) -> usize {
    match n_to_align {
        Some(n) if n > len => {
            warn!("n_to_align = {n} exceeds the {len} matched poses, using all of them");
            len
        }
        Some(n) => n,
        None => len,
    }
}
