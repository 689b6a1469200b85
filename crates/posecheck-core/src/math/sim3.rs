use nalgebra::{Matrix3, Matrix4, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use super::se3::{Pose, pose_from_parts};

/// Similarity transform `x ↦ s·R·x + t` in 3D.
///
/// A scale of exactly `1.0` makes this a rigid SE(3) transform. Instances are
/// immutable once built; composition and inversion return new values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityTransform {
    rotation: UnitQuaternion<f64>,
    translation: Vector3<f64>,
    scale: f64,
}

impl SimilarityTransform {
    /// Returns the identity transform.
    pub fn identity() -> Self {
        Self::new(UnitQuaternion::identity(), Vector3::zeros(), 1.0)
    }

    /// Constructs a transform from its parts. `scale` must be strictly positive.
    pub fn new(rotation: UnitQuaternion<f64>, translation: Vector3<f64>, scale: f64) -> Self {
        debug_assert!(scale > 0.0, "similarity scale must be positive, got {scale}");
        Self {
            rotation,
            translation,
            scale,
        }
    }

    /// Lifts a rigid pose into a similarity transform with unit scale.
    pub fn from_rigid(pose: &Pose) -> Self {
        Self::new(pose.rotation, pose.translation.vector, 1.0)
    }

    pub fn rotation(&self) -> &UnitQuaternion<f64> {
        &self.rotation
    }

    pub fn rotation_matrix(&self) -> Matrix3<f64> {
        self.rotation.to_rotation_matrix().into_inner()
    }

    pub fn translation(&self) -> Vector3<f64> {
        self.translation
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn is_rigid(&self) -> bool {
        self.scale == 1.0
    }

    /// Maps a point: `s·R·p + t`.
    pub fn apply_to_point(&self, point: &Vector3<f64>) -> Vector3<f64> {
        self.scale * (self.rotation * point) + self.translation
    }

    /// Left-multiplies a pose: rotation becomes `R·R_pose`, translation `s·R·t_pose + t`.
    pub fn apply_to_pose(&self, pose: &Pose) -> Pose {
        let mut rotation = self.rotation * pose.rotation;
        rotation.renormalize();
        pose_from_parts(rotation, self.apply_to_point(&pose.translation.vector))
    }

    /// Returns the transform applying `other` first, then `self`.
    pub fn compose(&self, other: &Self) -> Self {
        let mut rotation = self.rotation * other.rotation;
        rotation.renormalize();
        Self::new(
            rotation,
            self.apply_to_point(&other.translation),
            self.scale * other.scale,
        )
    }

    pub fn inverse(&self) -> Self {
        let rotation = self.rotation.inverse();
        let scale = 1.0 / self.scale;
        let translation = -(scale * (rotation * self.translation));
        Self::new(rotation, translation, scale)
    }

    /// Homogeneous 4x4 matrix `[[s·R, t], [0, 1]]`.
    pub fn to_matrix(&self) -> Matrix4<f64> {
        let mut matrix = Matrix4::identity();
        matrix
            .fixed_view_mut::<3, 3>(0, 0)
            .copy_from(&(self.rotation_matrix() * self.scale));
        matrix.fixed_view_mut::<3, 1>(0, 3).copy_from(&self.translation);
        matrix
    }
}

impl Default for SimilarityTransform {
    fn default() -> Self {
        Self::identity()
    }
}
