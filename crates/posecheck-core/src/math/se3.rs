use nalgebra::{Isometry3, Matrix4, Translation3, UnitQuaternion, Vector3};

/// Rigid 3D pose backed by a unit quaternion rotation and a translation.
pub type Pose = Isometry3<f64>;

/// Constructs a pose from a rotation and translation.
pub fn pose_from_parts(rotation: UnitQuaternion<f64>, translation: Vector3<f64>) -> Pose {
    Isometry3::from_parts(Translation3::from(translation), rotation)
}

/// Pose of `estimate` expressed in the frame of `reference`: `reference⁻¹ · estimate`.
pub fn relative_pose(reference: &Pose, estimate: &Pose) -> Pose {
    reference.inv_mul(estimate)
}

/// Frobenius norm of `T - I` over the 4x4 homogeneous matrix.
pub fn homogeneous_distance(pose: &Pose) -> f64 {
    (pose.to_homogeneous() - Matrix4::identity()).norm()
}
