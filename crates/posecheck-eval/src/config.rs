use log::warn;
use posecheck_core::align::AlignmentMethod;
use posecheck_core::metrics::PoseRelation;
use serde::{Deserialize, Serialize};

use crate::ApeError;

/// Untyped knobs of an APE run, as read from the command line or a config
/// file. Call [`ApeConfig::validate`] before evaluating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApeConfig {
    pub pose_relation: PoseRelation,
    pub align: bool,
    pub correct_scale: bool,
    /// Number of leading poses used for alignment; `-1` means all.
    pub n_to_align: i64,
    pub align_origin: bool,
    pub t_max_diff: f64,
    pub t_offset: f64,
    pub t_start: Option<f64>,
    pub t_end: Option<f64>,
    pub ref_name: String,
    pub est_name: String,
    /// Keep trajectory snapshots in saved result files.
    pub save_trajectories: bool,
}

impl Default for ApeConfig {
    fn default() -> Self {
        Self {
            pose_relation: PoseRelation::TransPart,
            align: false,
            correct_scale: false,
            n_to_align: -1,
            align_origin: false,
            t_max_diff: 0.01,
            t_offset: 0.0,
            t_start: None,
            t_end: None,
            ref_name: "reference".to_string(),
            est_name: "estimate".to_string(),
            save_trajectories: true,
        }
    }
}

/// Checked form of [`ApeConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct ApeSettings {
    pub pose_relation: PoseRelation,
    pub alignment: Option<AlignmentMethod>,
    pub max_diff: f64,
    pub offset: f64,
    pub t_start: Option<f64>,
    pub t_end: Option<f64>,
    pub ref_name: String,
    pub est_name: String,
}

impl Default for ApeSettings {
    fn default() -> Self {
        let config = ApeConfig::default();
        Self {
            pose_relation: config.pose_relation,
            alignment: None,
            max_diff: config.t_max_diff,
            offset: config.t_offset,
            t_start: None,
            t_end: None,
            ref_name: config.ref_name,
            est_name: config.est_name,
        }
    }
}

impl ApeConfig {
    pub fn validate(&self) -> Result<ApeSettings, ApeError> {
        if self.align_origin && (self.align || self.correct_scale) {
            return Err(ApeError::InvalidConfig(
                "align_origin cannot be combined with align or correct_scale".to_string(),
            ));
        }

        let n_to_align = match self.n_to_align {
            -1 => None,
            n if n > 0 => Some(usize::try_from(n).map_err(|_| {
                ApeError::InvalidConfig(format!("n_to_align = {n} is too large"))
            })?),
            n => {
                return Err(ApeError::InvalidConfig(format!(
                    "n_to_align must be -1 or positive, got {n}"
                )));
            }
        };

        if !self.t_max_diff.is_finite() || self.t_max_diff < 0.0 {
            return Err(ApeError::InvalidConfig(format!(
                "t_max_diff must be finite and non-negative, got {}",
                self.t_max_diff
            )));
        }
        if !self.t_offset.is_finite() {
            return Err(ApeError::InvalidConfig(format!(
                "t_offset must be finite, got {}",
                self.t_offset
            )));
        }
        if let (Some(start), Some(end)) = (self.t_start, self.t_end) {
            if start > end {
                return Err(ApeError::InvalidConfig(format!(
                    "t_start ({start}) is after t_end ({end})"
                )));
            }
        }

        let alignment = if self.align {
            Some(AlignmentMethod::Umeyama {
                correct_scale: self.correct_scale,
                n_to_align,
            })
        } else if self.correct_scale {
            Some(AlignmentMethod::ScaleOnly { n_to_align })
        } else if self.align_origin {
            Some(AlignmentMethod::Origin)
        } else {
            None
        };

        if n_to_align.is_some()
            && !matches!(
                alignment,
                Some(AlignmentMethod::Umeyama { .. } | AlignmentMethod::ScaleOnly { .. })
            )
        {
            warn!("n_to_align is ignored without --align or --correct_scale");
        }

        Ok(ApeSettings {
            pose_relation: self.pose_relation,
            alignment,
            max_diff: self.t_max_diff,
            offset: self.t_offset,
            t_start: self.t_start,
            t_end: self.t_end,
            ref_name: self.ref_name.clone(),
            est_name: self.est_name.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate_to_unaligned_trans_part() {
        let settings = ApeConfig::default().validate().unwrap();
        assert_eq!(settings.pose_relation, PoseRelation::TransPart);
        assert_eq!(settings.alignment, None);
        assert_eq!(settings.max_diff, 0.01);
        assert_eq!(settings, ApeSettings::default());
    }

    #[test]
    fn flags_select_alignment_method() {
        let cases = [
            (
                (true, false, false),
                Some(AlignmentMethod::Umeyama {
                    correct_scale: false,
                    n_to_align: None,
                }),
            ),
            (
                (true, true, false),
                Some(AlignmentMethod::Umeyama {
                    correct_scale: true,
                    n_to_align: None,
                }),
            ),
            (
                (false, true, false),
                Some(AlignmentMethod::ScaleOnly { n_to_align: None }),
            ),
            ((false, false, true), Some(AlignmentMethod::Origin)),
        ];
        for ((align, correct_scale, align_origin), expected) in cases {
            let config = ApeConfig {
                align,
                correct_scale,
                align_origin,
                ..ApeConfig::default()
            };
            assert_eq!(config.validate().unwrap().alignment, expected);
        }
    }

    #[test]
    fn n_to_align_must_be_positive_or_minus_one() {
        for n in [0, -2, -100] {
            let config = ApeConfig {
                align: true,
                n_to_align: n,
                ..ApeConfig::default()
            };
            assert!(matches!(config.validate(), Err(ApeError::InvalidConfig(_))));
        }

        let config = ApeConfig {
            align: true,
            n_to_align: 5,
            ..ApeConfig::default()
        };
        assert_eq!(config.validate().unwrap().alignment.unwrap().n_to_align(), Some(5));
    }

    #[test]
    fn origin_alignment_excludes_umeyama() {
        let config = ApeConfig {
            align: true,
            align_origin: true,
            ..ApeConfig::default()
        };
        assert!(matches!(config.validate(), Err(ApeError::InvalidConfig(_))));
    }

    #[test]
    fn inverted_time_range_is_rejected() {
        let config = ApeConfig {
            t_start: Some(5.0),
            t_end: Some(1.0),
            ..ApeConfig::default()
        };
        assert!(matches!(config.validate(), Err(ApeError::InvalidConfig(_))));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: ApeConfig =
            serde_json::from_str(r#"{"pose_relation": "angle_deg", "align": true}"#).unwrap();
        assert_eq!(config.pose_relation, PoseRelation::AngleDeg);
        assert!(config.align);
        assert_eq!(config.n_to_align, -1);
        assert_eq!(config.est_name, "estimate");
    }
}
