//! Evaluation result container: metadata, statistics, per-pose arrays and
//! trajectory snapshots.

mod snapshot;

pub use snapshot::{PoseRecord, TrajectorySnapshot};

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::math::SimilarityTransform;
use crate::metrics::{MetricError, Statistics};
use crate::trajectory::Trajectory;

/// Key of the per-pose error array.
pub const ERROR_ARRAY: &str = "error_array";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalResult {
    pub info: BTreeMap<String, Value>,
    pub stats: BTreeMap<String, f64>,
    arrays: BTreeMap<String, Vec<f64>>,
    #[serde(default)]
    pub trajectories: BTreeMap<String, TrajectorySnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<SimilarityTransform>,
}

impl EvalResult {
    /// Result holding `errors` as its error array and the statistics over them.
    pub fn from_errors(errors: Vec<f64>) -> Result<Self, MetricError> {
        let statistics = Statistics::from_errors(&errors)?;
        let stats = statistics
            .iter()
            .map(|(kind, value)| (kind.label().to_string(), value))
            .collect();

        let mut arrays = BTreeMap::new();
        arrays.insert(ERROR_ARRAY.to_string(), errors);

        Ok(Self {
            info: BTreeMap::new(),
            stats,
            arrays,
            trajectories: BTreeMap::new(),
            alignment: None,
        })
    }

    pub fn add_info(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.info.insert(key.into(), value.into());
    }

    /// Attaches a per-pose array.
    ///
    /// # Panics
    ///
    /// If `values` does not have one entry per evaluated pose.
    pub fn add_array(&mut self, name: impl Into<String>, values: Vec<f64>) {
        let name = name.into();
        assert!(
            values.len() == self.len(),
            "array '{name}' has {} entries, expected {}",
            values.len(),
            self.len()
        );
        self.arrays.insert(name, values);
    }

    pub fn add_trajectory(&mut self, name: impl Into<String>, trajectory: &Trajectory) {
        self.trajectories
            .insert(name.into(), TrajectorySnapshot::from(trajectory));
    }

    pub fn remove_trajectory(&mut self, name: &str) -> Option<TrajectorySnapshot> {
        self.trajectories.remove(name)
    }

    pub fn clear_trajectories(&mut self) {
        self.trajectories.clear();
    }

    pub fn set_alignment(&mut self, alignment: Option<SimilarityTransform>) {
        self.alignment = alignment;
    }

    pub fn error_array(&self) -> &[f64] {
        self.array(ERROR_ARRAY).unwrap_or(&[])
    }

    pub fn array(&self, name: &str) -> Option<&[f64]> {
        self.arrays.get(name).map(Vec::as_slice)
    }

    pub fn arrays(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.arrays
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Number of evaluated poses.
    pub fn len(&self) -> usize {
        self.arrays.get(ERROR_ARRAY).map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stat(&self, name: &str) -> Option<f64> {
        self.stats.get(name).copied()
    }

    pub fn title(&self) -> &str {
        self.info
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or("")
    }
}

impl fmt::Display for EvalResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title())?;
        writeln!(f)?;
        for (name, value) in &self.stats {
            writeln!(f, "{name:>10}\t{value:.6}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trajectory::PoseTrajectory;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    #[test]
    fn from_errors_fills_stats_and_error_array() {
        let result = EvalResult::from_errors(vec![0.1, 0.1, 0.1]).unwrap();

        assert_eq!(result.len(), 3);
        assert_eq!(result.error_array(), &[0.1, 0.1, 0.1]);
        assert_relative_eq!(result.stat("rmse").unwrap(), 0.1, epsilon = 1e-12);
        assert_relative_eq!(result.stat("std").unwrap(), 0.0, epsilon = 1e-12);
        assert_eq!(result.stats.len(), 7);
    }

    #[test]
    fn empty_errors_are_rejected() {
        assert_eq!(
            EvalResult::from_errors(Vec::new()).unwrap_err(),
            MetricError::Empty
        );
    }

    #[test]
    #[should_panic(expected = "array 'timestamps' has 2 entries")]
    fn array_of_wrong_length_panics() {
        let mut result = EvalResult::from_errors(vec![1.0, 2.0, 3.0]).unwrap();
        result.add_array("timestamps", vec![0.0, 1.0]);
    }

    #[test]
    fn display_lists_title_and_stats() {
        let mut result = EvalResult::from_errors(vec![1.0, 3.0]).unwrap();
        result.add_info("title", "APE w.r.t. translation part (m)");

        let text = result.to_string();
        assert!(text.starts_with("APE w.r.t. translation part (m)\n"));
        assert!(text.contains("      mean\t2.000000"));
        assert!(text.contains("       max\t3.000000"));
    }

    #[test]
    fn json_round_trip_keeps_arrays_and_trajectories() {
        let trajectory = PoseTrajectory::from_positions(
            vec![Vector3::zeros(), Vector3::x()],
            vec![1.0, 2.0],
        )
        .unwrap();
        let mut result = EvalResult::from_errors(vec![0.5, 0.25]).unwrap();
        result.add_array("timestamps", vec![1.0, 2.0]);
        result.add_trajectory("estimate", &Trajectory::Timed(trajectory));
        result.set_alignment(Some(SimilarityTransform::identity()));

        let json = serde_json::to_string(&result).unwrap();
        let parsed: EvalResult = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.array("timestamps"), Some(&[1.0, 2.0][..]));
        assert_eq!(parsed.error_array(), &[0.5, 0.25]);
        assert_eq!(parsed.trajectories["estimate"], result.trajectories["estimate"]);
        assert_eq!(parsed.alignment, Some(SimilarityTransform::identity()));
        assert_relative_eq!(
            parsed.stat("rmse").unwrap(),
            result.stat("rmse").unwrap(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn trajectories_can_be_dropped() {
        let mut result = EvalResult::from_errors(vec![0.0]).unwrap();
        let path = Trajectory::Path(crate::trajectory::PosePath::from_positions(vec![
            Vector3::zeros(),
        ]));
        result.add_trajectory("reference", &path);
        result.add_trajectory("estimate", &path);

        assert!(result.remove_trajectory("reference").is_some());
        result.clear_trajectories();
        assert!(result.trajectories.is_empty());
    }
}
