use approx::assert_relative_eq;
use nalgebra::{UnitQuaternion, Vector3};
use posecheck_core::align::AlignmentError;
use posecheck_core::math::{Pose, SimilarityTransform, pose_from_parts};
use posecheck_core::metrics::PoseRelation;
use posecheck_core::sync::AssociationError;
use posecheck_core::trajectory::{PosePath, PoseTrajectory, Trajectory};
use posecheck_eval::{ApeConfig, ApeError, evaluate};

fn line(offset: f64, timestamps: &[f64]) -> Trajectory {
    let poses = (0..timestamps.len())
        .map(|i| {
            pose_from_parts(
                UnitQuaternion::identity(),
                Vector3::new(i as f64 + offset, 0.0, 0.0),
            )
        })
        .collect();
    Trajectory::Timed(PoseTrajectory::new(poses, timestamps.to_vec()).expect("valid trajectory"))
}

fn curve(len: usize) -> Vec<Pose> {
    (0..len)
        .map(|i| {
            let t = i as f64 * 0.3;
            pose_from_parts(
                UnitQuaternion::from_euler_angles(0.05 * t, -0.1 * t, 0.4 * t),
                Vector3::new(t.cos() * 3.0, t.sin() * 2.0, 0.2 * t),
            )
        })
        .collect()
}

#[test]
fn shifted_estimate_without_alignment() {
    let reference = line(0.0, &[0.0, 1.0, 2.0]);
    let estimate = line(0.1, &[0.0, 1.0, 2.0]);

    let result = evaluate(&reference, &estimate, &ApeConfig::default()).unwrap();

    assert_eq!(result.len(), 3);
    for error in result.error_array() {
        assert_relative_eq!(*error, 0.1, epsilon = 1e-12);
    }
    assert_relative_eq!(result.stat("rmse").unwrap(), 0.1, epsilon = 1e-12);
    assert_eq!(
        result.title(),
        "APE w.r.t. translation part (m)\n(not aligned)"
    );
    assert_eq!(result.info["label"], "APE (m)");
    assert!(result.alignment.is_none());
}

#[test]
fn time_offset_matches_every_pose() {
    let reference = line(0.0, &[0.0, 1.0, 2.0]);
    let estimate = line(0.0, &[0.5, 1.5, 2.5]);
    let config = ApeConfig {
        t_offset: 0.5,
        t_max_diff: 0.2,
        ..ApeConfig::default()
    };

    let result = evaluate(&reference, &estimate, &config).unwrap();

    assert_eq!(result.len(), 3);
    assert_eq!(result.array("timestamps"), Some(&[0.5, 1.5, 2.5][..]));
    assert_eq!(result.array("seconds_from_start"), Some(&[0.0, 1.0, 2.0][..]));
    assert_eq!(result.array("distances_from_start"), Some(&[0.0, 1.0, 2.0][..]));
    assert!(result.error_array().iter().all(|e| *e == 0.0));
}

#[test]
fn unmatched_timestamps_fail_association() {
    let reference = line(0.0, &[0.0, 1.0, 2.0]);
    let estimate = line(0.0, &[10.0, 11.0, 12.0]);

    let err = evaluate(&reference, &estimate, &ApeConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        ApeError::Association(AssociationError::NoMatches { .. })
    ));
}

#[test]
fn single_aligned_pose_uses_origin_matching() {
    let reference = PosePath::from_positions(vec![
        Vector3::new(0.0, 0.0, 0.0),
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(0.0, 1.0, 0.0),
        Vector3::new(0.0, 0.0, 1.0),
    ]);
    let estimate = PosePath::from_positions(vec![
        Vector3::new(0.0, 0.0, 0.0),
        Vector3::new(1.3, 0.0, 0.0),
        Vector3::new(0.0, 1.3, 0.2),
        Vector3::new(0.1, 0.0, 1.3),
    ]);

    let first_only = ApeConfig {
        align: true,
        n_to_align: 1,
        ..ApeConfig::default()
    };
    let all = ApeConfig {
        align: true,
        ..ApeConfig::default()
    };

    let single = evaluate(
        &Trajectory::from(reference.clone()),
        &Trajectory::from(estimate.clone()),
        &first_only,
    )
    .unwrap();
    let full =
        evaluate(&Trajectory::from(reference), &Trajectory::from(estimate), &all).unwrap();

    let single_transform = single.alignment.clone().unwrap();
    assert_eq!(single_transform, SimilarityTransform::identity());
    assert!(
        (full.alignment.unwrap().to_matrix() - single_transform.to_matrix()).norm() > 1e-3
    );
    assert!(single.title().ends_with("(with SE(3) Umeyama alignment) (aligned poses: 1)"));
    // Untimed inputs carry no time arrays.
    assert!(single.array("timestamps").is_none());
}

#[test]
fn alignment_recovers_rigid_offset() {
    let truth = SimilarityTransform::new(
        UnitQuaternion::from_euler_angles(0.2, 0.1, -0.8),
        Vector3::new(1.0, -2.0, 0.5),
        1.0,
    );
    let estimate_poses = curve(20);
    let reference_poses: Vec<_> = estimate_poses
        .iter()
        .map(|pose| truth.apply_to_pose(pose))
        .collect();
    let timestamps: Vec<f64> = (0..20).map(|i| i as f64 * 0.1).collect();

    let reference =
        Trajectory::Timed(PoseTrajectory::new(reference_poses, timestamps.clone()).unwrap());
    let estimate = Trajectory::Timed(PoseTrajectory::new(estimate_poses, timestamps).unwrap());

    for relation in [PoseRelation::Full, PoseRelation::TransPart, PoseRelation::AngleDeg] {
        let config = ApeConfig {
            pose_relation: relation,
            align: true,
            ..ApeConfig::default()
        };
        let result = evaluate(&reference, &estimate, &config).unwrap();

        assert!(result.stat("max").unwrap() < 1e-5, "{relation}");
        assert_relative_eq!(
            result.alignment.unwrap().to_matrix(),
            truth.to_matrix(),
            epsilon = 1e-9
        );
    }
}

#[test]
fn scale_correction_removes_scale_drift() {
    let positions: Vec<_> = curve(15).iter().map(|p| p.translation.vector).collect();
    let reference = PosePath::from_positions(positions.clone());
    let estimate = PosePath::from_positions(positions.iter().map(|p| p * 0.5).collect());

    let config = ApeConfig {
        correct_scale: true,
        ..ApeConfig::default()
    };
    let result =
        evaluate(&Trajectory::from(reference), &Trajectory::from(estimate), &config).unwrap();

    let transform = result.alignment.clone().unwrap();
    assert_relative_eq!(transform.scale(), 2.0, epsilon = 1e-9);
    assert!(result.stat("rmse").unwrap() < 1e-9);
    assert!(result.title().ends_with("(scale corrected)"));
}

#[test]
fn collinear_points_cannot_be_aligned() {
    let reference = line(0.0, &[0.0, 1.0, 2.0, 3.0]);
    let estimate = line(0.5, &[0.0, 1.0, 2.0, 3.0]);
    let config = ApeConfig {
        align: true,
        ..ApeConfig::default()
    };

    let err = evaluate(&reference, &estimate, &config).unwrap_err();
    assert!(matches!(
        err,
        ApeError::Alignment(AlignmentError::DegenerateCovariance { .. })
    ));
}

#[test]
fn time_range_restricts_reference() {
    let timestamps: Vec<f64> = (0..10).map(|i| i as f64).collect();
    let reference = line(0.0, &timestamps);
    let estimate = line(0.0, &timestamps);
    let config = ApeConfig {
        t_start: Some(2.0),
        t_end: Some(5.0),
        ..ApeConfig::default()
    };

    let result = evaluate(&reference, &estimate, &config).unwrap();
    assert_eq!(result.array("timestamps"), Some(&[2.0, 3.0, 4.0, 5.0][..]));
}

#[test]
fn inputs_are_left_untouched() {
    let reference = line(0.0, &[0.0, 1.0, 2.0, 3.0]);
    let estimate = line(3.0, &[0.0, 1.0, 2.0, 3.0]);
    let before = estimate.clone();

    let config = ApeConfig {
        align_origin: true,
        ..ApeConfig::default()
    };
    let result = evaluate(&reference, &estimate, &config).unwrap();

    assert_eq!(estimate, before);
    assert!(result.stat("max").unwrap() < 1e-12);
    let stored = result.trajectories["estimate"].to_trajectory().unwrap();
    assert_ne!(stored, before);
}

#[test]
fn orientation_relation_on_positions_is_an_error() {
    let positions = PosePath::from_positions(vec![Vector3::zeros(), Vector3::x()]);
    let config = ApeConfig {
        pose_relation: PoseRelation::AngleRad,
        ..ApeConfig::default()
    };
    let err = evaluate(
        &Trajectory::from(positions.clone()),
        &Trajectory::from(positions),
        &config,
    )
    .unwrap_err();
    assert!(matches!(err, ApeError::Metric(_)));
}

#[test]
fn prefix_fit_is_applied_to_every_pose() {
    let truth = SimilarityTransform::new(
        UnitQuaternion::from_euler_angles(-0.3, 0.15, 0.6),
        Vector3::new(2.0, 0.5, -1.0),
        1.0,
    );
    let estimate_poses = curve(10);
    let shift = Vector3::new(1.0, 0.0, 0.0);
    let reference_poses: Vec<_> = estimate_poses
        .iter()
        .enumerate()
        .map(|(i, pose)| {
            let mut pose = truth.apply_to_pose(pose);
            if i >= 5 {
                pose.translation.vector += shift;
            }
            pose
        })
        .collect();

    let config = ApeConfig {
        align: true,
        n_to_align: 5,
        ..ApeConfig::default()
    };
    let result = evaluate(
        &Trajectory::from(PosePath::new(reference_poses)),
        &Trajectory::from(PosePath::new(estimate_poses)),
        &config,
    )
    .unwrap();

    assert_relative_eq!(
        result.alignment.clone().unwrap().to_matrix(),
        truth.to_matrix(),
        epsilon = 1e-9
    );
    let errors = result.error_array();
    assert_eq!(errors.len(), 10);
    for error in &errors[..5] {
        assert!(*error < 1e-9, "{errors:?}");
    }
    for error in &errors[5..] {
        assert_relative_eq!(*error, 1.0, epsilon = 1e-9);
    }
    assert!(result.title().ends_with("(aligned poses: 5)"));
}

#[test]
fn oversized_prefix_reports_matched_pose_count() {
    let positions: Vec<_> = curve(8).iter().map(|p| p.translation.vector).collect();
    let path = PosePath::from_positions(positions);
    let config = ApeConfig {
        align: true,
        n_to_align: 50,
        ..ApeConfig::default()
    };

    let result = evaluate(
        &Trajectory::from(path.clone()),
        &Trajectory::from(path),
        &config,
    )
    .unwrap();
    assert!(result.title().ends_with("(aligned poses: 8)"), "{}", result.title());
}
