pub mod align;
pub mod math;
pub mod metrics;
pub mod result;
pub mod sync;
pub mod trajectory;

pub use align::{AlignmentError, AlignmentMethod};
pub use math::{Pose, SimilarityTransform};
pub use metrics::{Ape, MetricError, PoseRelation, Statistics, StatisticsType};
pub use result::EvalResult;
pub use sync::AssociationError;
pub use trajectory::{DataError, PosePath, PoseTrajectory, Trajectory};
