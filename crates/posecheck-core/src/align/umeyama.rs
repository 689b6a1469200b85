use nalgebra::{Matrix3, Vector3};

use super::AlignmentError;
use crate::math::{SimilarityTransform, quaternion_from_rotation_matrix};

/// Minimum number of correspondences for a least-squares fit.
pub const MIN_CORRESPONDENCES: usize = 3;

/// Singular values below this fraction of the largest count as zero.
const RANK_TOLERANCE: f64 = 1e-10;

/// Closed-form least-squares similarity transform mapping `estimate` onto
/// `reference` (S. Umeyama, 1991).
///
/// ```text
/// Σ  = 1/n · Σᵢ (rᵢ - μr)(eᵢ - μe)ᵀ = U·D·Vᵀ
/// R  = U·S·Vᵀ,  S = diag(1, 1, sign(det(U)·det(V)))
/// s  = tr(D·S) / σe²            (1 when `with_scale` is false)
/// t  = μr - s·R·μe
/// ```
///
/// The reflection fix acts on the smallest singular value, so `det(R) = +1`.
pub fn umeyama(
    estimate: &[Vector3<f64>],
    reference: &[Vector3<f64>],
    with_scale: bool,
) -> Result<SimilarityTransform, AlignmentError> {
    if estimate.len() != reference.len() {
        return Err(AlignmentError::LengthMismatch {
            estimate: estimate.len(),
            reference: reference.len(),
        });
    }
    if estimate.len() < MIN_CORRESPONDENCES {
        return Err(AlignmentError::InsufficientCorrespondences {
            required: MIN_CORRESPONDENCES,
            available: estimate.len(),
        });
    }

    let n = estimate.len() as f64;
    let mean_estimate = centroid(estimate);
    let mean_reference = centroid(reference);

    let mut covariance = Matrix3::zeros();
    let mut variance = 0.0;
    for (e, r) in estimate.iter().zip(reference) {
        let de = e - mean_estimate;
        let dr = r - mean_reference;
        covariance += dr * de.transpose();
        variance += de.norm_squared();
    }
    covariance /= n;
    variance /= n;

    let svd = covariance.svd(true, true);
    let u = svd.u.ok_or(AlignmentError::SvdFailed)?;
    let v_t = svd.v_t.ok_or(AlignmentError::SvdFailed)?;
    let singular_values = svd.singular_values;

    let largest = singular_values.max();
    let rank = if largest > 0.0 {
        singular_values
            .iter()
            .filter(|&&value| value > RANK_TOLERANCE * largest)
            .count()
    } else {
        0
    };
    if rank < 2 {
        return Err(AlignmentError::DegenerateCovariance { rank });
    }

    let mut correction = Vector3::repeat(1.0);
    if u.determinant() * v_t.determinant() < 0.0 {
        correction[singular_values.imin()] = -1.0;
    }
    let rotation_matrix = u * Matrix3::from_diagonal(&correction) * v_t;

    let scale = if with_scale {
        singular_values.dot(&correction) / variance
    } else {
        1.0
    };
    let translation = mean_reference - scale * (rotation_matrix * mean_estimate);

    Ok(SimilarityTransform::new(
        quaternion_from_rotation_matrix(&rotation_matrix),
        translation,
        scale,
    ))
}

pub(crate) fn centroid(points: &[Vector3<f64>]) -> Vector3<f64> {
    points.iter().sum::<Vector3<f64>>() / points.len() as f64
}
