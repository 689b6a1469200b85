pub mod se3;
pub mod sim3;
pub mod so3;

pub use se3::{Pose, homogeneous_distance, pose_from_parts, relative_pose};
pub use sim3::SimilarityTransform;
pub use so3::{
    chordal_distance, is_orthonormal, quaternion_from_rotation_matrix, rotation_angle,
    rotation_angle_from_trace, rotation_from_matrix,
};
