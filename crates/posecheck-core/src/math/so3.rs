use nalgebra::{Matrix3, Rotation3, UnitQuaternion};

/// Returns the rotation angle in radians of a rotation matrix with the given trace.
///
/// The cosine is clamped to `[-1, 1]`, so traces that land marginally outside
/// `[-1, 3]` through rounding still map onto `[0, π]` instead of producing NaN.
pub fn rotation_angle_from_trace(trace: f64) -> f64 {
    ((trace - 1.0) / 2.0).clamp(-1.0, 1.0).acos()
}

/// Returns the rotation angle in radians of a unit quaternion, always in `[0, π]`.
pub fn rotation_angle(rotation: &UnitQuaternion<f64>) -> f64 {
    rotation_angle_from_trace(rotation.to_rotation_matrix().matrix().trace())
}

/// Frobenius norm of `R - I`, a matrix-based rotation magnitude.
pub fn chordal_distance(rotation: &Matrix3<f64>) -> f64 {
    (rotation - Matrix3::identity()).norm()
}

/// Checks `RᵀR = I` and `det(R) = +1` element-wise within `tolerance`.
pub fn is_orthonormal(matrix: &Matrix3<f64>, tolerance: f64) -> bool {
    let gram_error = (matrix.transpose() * matrix - Matrix3::identity()).amax();
    gram_error <= tolerance && (matrix.determinant() - 1.0).abs() <= tolerance
}

/// Converts a rotation matrix into a unit quaternion without validating it.
///
/// The quaternion is renormalized, so residual rounding in an otherwise proper
/// rotation matrix does not leak into later compositions.
pub fn quaternion_from_rotation_matrix(matrix: &Matrix3<f64>) -> UnitQuaternion<f64> {
    let mut rotation =
        UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(*matrix));
    rotation.renormalize();
    rotation
}

/// Builds a unit quaternion from a matrix that must lie within `tolerance` of SO(3).
///
/// Returns `None` for non-finite entries, reflections, or matrices that are not
/// orthonormal to the requested tolerance.
pub fn rotation_from_matrix(matrix: &Matrix3<f64>, tolerance: f64) -> Option<UnitQuaternion<f64>> {
    if !matrix.iter().all(|value| value.is_finite()) || !is_orthonormal(matrix, tolerance) {
        return None;
    }
    Some(quaternion_from_rotation_matrix(matrix))
}
