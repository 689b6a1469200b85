use std::fmt;

use serde::{Deserialize, Serialize};

use super::MetricError;

/// Summary statistics of a per-pose error array.
///
/// Reductions run sequentially in index order, so identical input arrays give
/// bit-identical statistics no matter how the errors were produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub rmse: f64,
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation.
    pub std: f64,
    pub min: f64,
    pub max: f64,
    /// Sum of squared errors.
    pub sse: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatisticsType {
    Rmse,
    Mean,
    Median,
    Std,
    Min,
    Max,
    Sse,
}

impl StatisticsType {
    pub const ALL: [StatisticsType; 7] = [
        StatisticsType::Rmse,
        StatisticsType::Mean,
        StatisticsType::Median,
        StatisticsType::Std,
        StatisticsType::Min,
        StatisticsType::Max,
        StatisticsType::Sse,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            StatisticsType::Rmse => "rmse",
            StatisticsType::Mean => "mean",
            StatisticsType::Median => "median",
            StatisticsType::Std => "std",
            StatisticsType::Min => "min",
            StatisticsType::Max => "max",
            StatisticsType::Sse => "sse",
        }
    }
}

impl fmt::Display for StatisticsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Statistics {
    pub fn from_errors(errors: &[f64]) -> Result<Self, MetricError> {
        if errors.is_empty() {
            return Err(MetricError::Empty);
        }

        let n = errors.len() as f64;
        let sse: f64 = errors.iter().map(|e| e * e).sum();
        let mean = errors.iter().sum::<f64>() / n;
        let variance = errors.iter().map(|e| (e - mean).powi(2)).sum::<f64>() / n;

        let mut sorted = errors.to_vec();
        sorted.sort_by(f64::total_cmp);
        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        };

        Ok(Self {
            rmse: (sse / n).sqrt(),
            mean,
            median,
            std: variance.sqrt(),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            sse,
        })
    }

    pub fn get(&self, kind: StatisticsType) -> f64 {
        match kind {
            StatisticsType::Rmse => self.rmse,
            StatisticsType::Mean => self.mean,
            StatisticsType::Median => self.median,
            StatisticsType::Std => self.std,
            StatisticsType::Min => self.min,
            StatisticsType::Max => self.max,
            StatisticsType::Sse => self.sse,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatisticsType, f64)> + '_ {
        StatisticsType::ALL.into_iter().map(|kind| (kind, self.get(kind)))
    }
}
