// =========================================================================
// FALSIFY-OD: Iterative outlier detector contract
//
// Invariants of a full scale → dirty pass → trim → refine run.
// =========================================================================

use super::*;
use crate::error::{ClusterStage, OutlierError};
use crate::stats::{DescriptiveStats, StdDev};
use proptest::prelude::*;

fn ring_data() -> PointDataset {
    let mut pairs = Vec::new();
    for i in 0..24 {
        let angle = f64::from(i) * std::f64::consts::TAU / 24.0;
        pairs.push((10.0 + angle.cos(), 50.0 + 5.0 * angle.sin()));
        pairs.push((30.0 + angle.cos(), 150.0 + 5.0 * angle.sin()));
    }
    pairs.push((20.0, 400.0));
    PointDataset::from_pairs(&pairs).expect("finite")
}

fn two_cluster_config() -> DetectorConfig {
    DetectorConfig::default().with_n_clusters(2).with_n_init(5)
}

/// FALSIFY-OD-001: Threshold is mean + sigma * std of the final distances
#[test]
fn falsify_od_001_threshold_formula() {
    let report = IterativeOutlierDetector::new(two_cluster_config())
        .detect(&ring_data())
        .expect("detection succeeds");

    let distances: Vec<f64> = report.records.iter().map(|r| r.distance).collect();
    let stats = DescriptiveStats::new(&distances);
    let mean = stats.mean().expect("non-empty");
    let std = stats.std(StdDev::Sample).expect("non-empty");
    let expected = mean + 3.0 * std;

    assert!(
        (report.final_threshold - expected).abs() < 1e-9,
        "FALSIFIED OD-001: threshold {} != {expected}",
        report.final_threshold
    );
    assert!((report.distance_mean - mean).abs() < 1e-9);
    assert!((report.distance_std - std).abs() < 1e-9);
}

/// FALSIFY-OD-002: Label is Outlier iff distance is strictly above threshold
#[test]
fn falsify_od_002_labels_match_threshold() {
    let report = IterativeOutlierDetector::new(two_cluster_config())
        .detect(&ring_data())
        .expect("detection succeeds");

    for r in &report.records {
        let expected = if r.distance > report.final_threshold {
            OutlierLabel::Outlier
        } else {
            OutlierLabel::Normal
        };
        assert_eq!(
            r.label, expected,
            "FALSIFIED OD-002: record {} at distance {} labelled {}",
            r.index, r.distance, r.label
        );
    }
    assert_eq!(report.outlier_count, report.outliers().count());
}

/// FALSIFY-OD-003: Same input and config give an identical report
#[test]
fn falsify_od_003_idempotent() {
    let detector = IterativeOutlierDetector::new(two_cluster_config());
    let data = ring_data();
    let first = detector.detect(&data).expect("first run");
    let second = detector.detect(&data).expect("second run");
    assert_eq!(first, second, "FALSIFIED OD-003: runs differ");
}

/// FALSIFY-OD-004: A larger trim percentile never keeps fewer points
#[test]
fn falsify_od_004_trim_monotone() {
    let data = ring_data();
    let mut previous = 0;
    for p in [10.0, 30.0, 60.0, 100.0] {
        let config = two_cluster_config().with_trim_percentile(p);
        let report = IterativeOutlierDetector::new(config)
            .detect(&data)
            .expect("detection succeeds");
        assert!(
            report.trimmed_count >= previous,
            "FALSIFIED OD-004: percentile {p} kept {} < {previous}",
            report.trimmed_count
        );
        previous = report.trimmed_count;
    }
    assert_eq!(previous, data.len());
}

/// FALSIFY-OD-005: The far point is flagged and the rings are not
#[test]
fn falsify_od_005_far_point_flagged() {
    let report = IterativeOutlierDetector::new(two_cluster_config())
        .detect(&ring_data())
        .expect("detection succeeds");

    assert_eq!(report.outlier_count, 1, "FALSIFIED OD-005");
    assert_eq!(report.records[48].label, OutlierLabel::Outlier);
}

/// FALSIFY-OD-006: n == k succeeds with zero distances and no outliers
#[test]
fn falsify_od_006_points_equal_clusters() {
    let data = PointDataset::from_pairs(&[
        (1.0, 10.0),
        (2.0, 40.0),
        (3.0, 20.0),
        (4.0, 50.0),
        (5.0, 30.0),
    ])
    .expect("finite");
    let config = DetectorConfig::default().with_n_init(3);
    let report = IterativeOutlierDetector::new(config)
        .detect(&data)
        .expect("n == k is valid");

    assert_eq!(report.outlier_count, 0);
    assert_eq!(report.trimmed_count, 5);
    assert!(report.records.iter().all(|r| r.distance.abs() < 1e-12));
}

/// FALSIFY-OD-007: Trimming below k fails at the refine pass
#[test]
fn falsify_od_007_refine_insufficient() {
    // Five tight pairs with different spreads: the 30th percentile keeps
    // at most the two tightest pairs.
    let data = PointDataset::from_pairs(&[
        (1.0, 1.0),
        (1.2, 1.0),
        (10.0, 1.0),
        (10.4, 1.0),
        (20.0, 1.0),
        (20.6, 1.0),
        (30.0, 1.0),
        (30.8, 1.0),
        (40.0, 1.0),
        (41.0, 1.0),
    ])
    .expect("finite");
    let err = IterativeOutlierDetector::new(DetectorConfig::default().with_n_init(10))
        .detect(&data)
        .expect_err("trim leaves fewer than 5 points");

    match err {
        OutlierError::InsufficientData {
            stage,
            n_samples,
            n_clusters,
        } => {
            assert_eq!(stage, ClusterStage::Refine, "FALSIFIED OD-007");
            assert!(n_samples < 5);
            assert_eq!(n_clusters, 5);
        }
        other => panic!("FALSIFIED OD-007: unexpected error {other}"),
    }
}

/// FALSIFY-OD-008: Zero x-range is rejected before clustering
#[test]
fn falsify_od_008_degenerate() {
    let data = PointDataset::from_pairs(&[(0.0, 5.0), (0.0, 6.0)]).expect("finite");
    let err = IterativeOutlierDetector::new(DetectorConfig::default().with_n_clusters(1))
        .detect(&data)
        .expect_err("max(x) = 0");
    assert!(
        matches!(err, OutlierError::DegenerateInput { .. }),
        "FALSIFIED OD-008: {err}"
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// FALSIFY-OD-009: Reports are internally consistent for any positive data
    #[test]
    fn falsify_od_009_report_consistent(
        pairs in proptest::collection::vec((1.0f64..100.0, 1.0f64..100.0), 10..40)
    ) {
        let data = PointDataset::from_pairs(&pairs).expect("finite");
        let config = DetectorConfig::default().with_n_clusters(2).with_n_init(2);
        let report = IterativeOutlierDetector::new(config)
            .detect(&data)
            .expect("at least 3 points survive trimming");

        prop_assert_eq!(report.len(), data.len());
        prop_assert!(report.trimmed_count >= 3 && report.trimmed_count <= data.len());
        prop_assert!(report.final_threshold >= report.distance_mean);
        let flagged = report
            .records
            .iter()
            .filter(|r| r.distance > report.final_threshold)
            .count();
        prop_assert_eq!(report.outlier_count, flagged);
        prop_assert!(report.records.iter().all(|r| r.cluster < 2));
    }

    /// FALSIFY-OD-010: Trimming keeps a lower prefix of the sorted distances
    #[test]
    fn falsify_od_010_prop_trim_ordering(
        distances in proptest::collection::vec(0.0f64..100.0, 2..60)
    ) {
        let n = distances.len();
        let pairs: Vec<(f64, f64)> = (0..n).map(|i| (i as f64 + 1.0, 1.0)).collect();
        let scaled = PointDataset::from_pairs(&pairs).expect("finite");
        let stage = trim_stage(&scaled, &distances, 30.0).expect("matching lengths");

        let (kept, dropped): (Vec<(&f64, &bool)>, Vec<(&f64, &bool)>) =
            distances.iter().zip(&stage.keep).partition(|&(_, &k)| k);
        let kept: Vec<f64> = kept.into_iter().map(|(&d, _)| d).collect();
        let dropped: Vec<f64> = dropped.into_iter().map(|(&d, _)| d).collect();

        let max_kept = kept.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min_dropped = dropped.iter().copied().fold(f64::INFINITY, f64::min);
        prop_assert!(
            max_kept <= min_dropped,
            "FALSIFIED OD-010: kept {} above dropped {}", max_kept, min_dropped
        );
        prop_assert!(kept.iter().all(|&d| d <= stage.threshold));

        // R-7 interpolates at h = 0.3 * (n - 1); every order statistic up to floor(h) is kept.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let min_kept = ((n - 1) as f64 * (30.0 / 100.0)).floor() as usize + 1;
        prop_assert!(
            kept.len() >= min_kept,
            "FALSIFIED OD-010: kept {} of {}, expected at least {}", kept.len(), n, min_kept
        );
        prop_assert_eq!(stage.trimmed.len(), kept.len());
    }
}
