//! Timestamp association between two trajectories.
//!
//! Each pose of the first trajectory is paired with the second trajectory's
//! pose whose offset-corrected timestamp is nearest, provided the residual is
//! within `max_diff` and that pose has not been claimed yet. The scan runs in
//! chronological order of the first trajectory, so assignment is greedy and
//! deterministic.
//!
//! Greedy first-come assignment is not a globally optimal matching. A second
//! stamp claimed by an earlier first stamp stays claimed even when a later
//! first stamp lies closer to it; the later pose is then dropped. With first
//! stamps `[1.0, 1.04]`, second stamps `[1.05]` and `max_diff = 0.1`, the
//! 0.05 s pair is kept and the 0.01 s pair is lost.

use log::debug;
use thiserror::Error;

use crate::trajectory::PoseTrajectory;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssociationError {
    #[error("max_diff must be finite and non-negative, got {0}")]
    InvalidTolerance(f64),

    #[error("time offset must be finite, got {0}")]
    InvalidOffset(f64),

    #[error(
        "found no matching timestamps between trajectories of {first_len} and {second_len} poses \
         with max_diff = {max_diff} s and offset = {offset} s"
    )]
    NoMatches {
        first_len: usize,
        second_len: usize,
        max_diff: f64,
        offset: f64,
    },
}

/// Matched `(first_index, second_index)` pairs, both strictly increasing.
///
/// `offset` is how far the second clock runs ahead of the first: a second
/// stamp `tb` is compared as `tb - offset`. Ties resolve to the earlier index
/// in `second`. Both slices must be sorted ascending.
pub fn matching_time_indices(
    first: &[f64],
    second: &[f64],
    max_diff: f64,
    offset: f64,
) -> Vec<(usize, usize)> {
    let mut consumed = vec![false; second.len()];
    let mut pairs = Vec::with_capacity(first.len().min(second.len()));

    for (first_index, &stamp) in first.iter().enumerate() {
        let Some((second_index, residual)) = nearest_stamp(second, stamp, offset) else {
            continue;
        };
        if residual <= max_diff && !consumed[second_index] {
            consumed[second_index] = true;
            pairs.push((first_index, second_index));
        }
    }
    pairs
}

/// Binary search for the stamp in `sorted` minimising `|tb - offset - target|`.
fn nearest_stamp(sorted: &[f64], target: f64, offset: f64) -> Option<(usize, f64)> {
    let upper = sorted.partition_point(|&tb| tb - offset < target);
    let residual = |index: usize| (sorted[index] - offset - target).abs();

    let below = upper.checked_sub(1).map(|index| (index, residual(index)));
    let above = (upper < sorted.len()).then(|| (upper, residual(upper)));

    match (below, above) {
        (Some(below), Some(above)) => Some(if above.1 < below.1 { above } else { below }),
        (below, above) => below.or(above),
    }
}

/// Associates two timestamped trajectories into index-matched copies.
///
/// Neither input is modified. Fails when no pair is within tolerance.
pub fn associate(
    first: &PoseTrajectory,
    second: &PoseTrajectory,
    max_diff: f64,
    offset: f64,
) -> Result<(PoseTrajectory, PoseTrajectory), AssociationError> {
    if !max_diff.is_finite() || max_diff < 0.0 {
        return Err(AssociationError::InvalidTolerance(max_diff));
    }
    if !offset.is_finite() {
        return Err(AssociationError::InvalidOffset(offset));
    }

    let max_pairs = first.len().min(second.len());
    let pairs = matching_time_indices(first.timestamps(), second.timestamps(), max_diff, offset);
    if pairs.is_empty() {
        return Err(AssociationError::NoMatches {
            first_len: first.len(),
            second_len: second.len(),
            max_diff,
            offset,
        });
    }

    let (first_indices, second_indices): (Vec<usize>, Vec<usize>) = pairs.into_iter().unzip();
    let first = first.pick(&first_indices);
    let second = second.pick(&second_indices);

    let mean_residual = first
        .timestamps()
        .iter()
        .zip(second.timestamps())
        .map(|(ta, tb)| (tb - offset - ta).abs())
        .sum::<f64>()
        / first.len() as f64;
    debug!(
        "Found {} of max. {} possible matching timestamps (mean residual {:.6} s)",
        first.len(),
        max_pairs,
        mean_residual
    );

    Ok((first, second))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    fn stamped(timestamps: &[f64]) -> PoseTrajectory {
        let positions = timestamps
            .iter()
            .map(|&t| Vector3::new(t, 0.0, 0.0))
            .collect();
        PoseTrajectory::from_positions(positions, timestamps.to_vec()).unwrap()
    }

    #[test]
    fn offset_is_removed_from_second_stamps() {
        let pairs = matching_time_indices(&[0.0, 1.0, 2.0], &[0.5, 1.5, 2.5], 0.2, 0.5);
        assert_eq!(pairs, vec![(0, 0), (1, 1), (2, 2)]);
    }

    #[test]
    fn ties_resolve_to_earliest_second_index() {
        let pairs = matching_time_indices(&[1.0], &[0.5, 1.5], 0.5, 0.0);
        assert_eq!(pairs, vec![(0, 0)]);
    }

    #[test]
    fn consumed_stamps_are_not_reassigned() {
        // 1.0 and 1.1 both have 1.05 as nearest; only the first scan wins it.
        let pairs = matching_time_indices(&[1.0, 1.1], &[1.05, 3.0], 0.1, 0.0);
        assert_eq!(pairs, vec![(0, 0)]);
    }

    #[test]
    fn earlier_claim_wins_over_closer_later_stamp() {
        let pairs = matching_time_indices(&[1.0, 1.04], &[1.05], 0.1, 0.0);
        assert_eq!(pairs, vec![(0, 0)]);
    }

    #[test]
    fn out_of_tolerance_poses_are_dropped() {
        let pairs = matching_time_indices(&[0.0, 1.0, 2.0, 3.0], &[0.01, 2.3, 2.98], 0.05, 0.0);
        assert_eq!(pairs, vec![(0, 0), (3, 2)]);
    }

    #[test]
    fn empty_second_yields_no_pairs() {
        assert!(matching_time_indices(&[0.0, 1.0], &[], 1.0, 0.0).is_empty());
    }

    #[test]
    fn associate_returns_index_matched_copies() {
        let reference = stamped(&[0.0, 1.0, 2.0, 3.0]);
        let estimate = stamped(&[0.98, 2.01, 5.0]);

        let (reference_sync, estimate_sync) = associate(&reference, &estimate, 0.05, 0.0).unwrap();

        assert_eq!(reference_sync.timestamps(), &[1.0, 2.0]);
        assert_eq!(estimate_sync.timestamps(), &[0.98, 2.01]);
        assert_eq!(reference.len(), 4);
        assert_eq!(estimate.len(), 3);
    }

    #[test]
    fn associate_with_itself_is_identity() {
        let trajectory = stamped(&[0.1, 0.2, 0.35, 0.9]);
        let (first, second) = associate(&trajectory, &trajectory, 0.0, 0.0).unwrap();
        assert_eq!(first, trajectory);
        assert_eq!(second, trajectory);
    }

    #[test]
    fn associate_fails_without_matches() {
        let err = associate(&stamped(&[0.0, 1.0]), &stamped(&[10.0, 11.0]), 0.1, 0.0)
            .unwrap_err();
        assert!(matches!(err, AssociationError::NoMatches { first_len: 2, second_len: 2, .. }));
    }

    #[test]
    fn associate_rejects_negative_tolerance() {
        let trajectory = stamped(&[0.0, 1.0]);
        assert_eq!(
            associate(&trajectory, &trajectory, -0.1, 0.0).unwrap_err(),
            AssociationError::InvalidTolerance(-0.1)
        );
        assert_eq!(
            associate(&trajectory, &trajectory, 0.1, f64::INFINITY).unwrap_err(),
            AssociationError::InvalidOffset(f64::INFINITY)
        );
    }
}
