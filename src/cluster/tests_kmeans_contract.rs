// =========================================================================
// FALSIFY-KM: K-Means engine contract (KMeans as ClusterEngine)
//
// References:
//   - Lloyd (1982) "Least Squares Quantization in PCM"
//   - Arthur & Vassilvitskii (2007) "k-means++: The Advantages of Careful Seeding"
// =========================================================================

use super::*;
use crate::traits::ClusterEngine;
use proptest::prelude::*;

fn grid_data() -> PointDataset {
    PointDataset::from_pairs(&[
        (0.0, 0.0),
        (0.1, 0.1),
        (0.2, 0.2),
        (10.0, 10.0),
        (10.1, 10.1),
        (10.2, 10.2),
    ])
    .expect("valid")
}

/// FALSIFY-KM-001: Valid cluster indices — all labels in [0, K-1]
#[test]
fn falsify_km_001_valid_indices() {
    let k = 3;
    let result = KMeans::new().fit(&grid_data(), k, 4, 42).expect("fit succeeds");

    for (i, &label) in result.assignment.iter().enumerate() {
        assert!(
            label < k,
            "FALSIFIED KM-001: label[{i}] = {label}, expected < {k}"
        );
    }
}

/// FALSIFY-KM-002: Nearest centroid assignment — each point assigned to closest
#[test]
fn falsify_km_002_nearest_centroid() {
    let data = grid_data();
    let result = KMeans::new().fit(&data, 2, 4, 42).expect("fit succeeds");

    for (i, p) in data.iter().enumerate() {
        let assigned = result.assignment[i];
        let d_assigned = p.distance_squared(&result.centers[assigned]);
        for (c, center) in result.centers.iter().enumerate() {
            let d_other = p.distance_squared(center);
            assert!(
                d_assigned <= d_other + 1e-12,
                "FALSIFIED KM-002: point[{i}] assigned to c={assigned} (d={d_assigned}) but c={c} is closer (d={d_other})"
            );
        }
    }
}

/// FALSIFY-KM-003: Reported inertia equals the recomputed objective
#[test]
fn falsify_km_003_inertia_matches_objective() {
    let data = grid_data();
    let result = KMeans::new().fit(&data, 2, 4, 42).expect("fit succeeds");
    let recomputed = inertia(&data, &result.centers, &result.assignment);

    assert!(
        (result.inertia - recomputed).abs() < 1e-12,
        "FALSIFIED KM-003: inertia={} recomputed={recomputed}",
        result.inertia
    );
}

/// FALSIFY-KM-004: predict with the fitted centers reproduces the fit assignment
#[test]
fn falsify_km_004_predict_matches_fit() {
    let data = grid_data();
    let engine = KMeans::new();
    let result = engine.fit(&data, 2, 4, 42).expect("fit succeeds");

    assert_eq!(
        engine.predict(&result.centers, &data),
        result.assignment,
        "FALSIFIED KM-004: predict disagrees with fit"
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// FALSIFY-KM-005-prop: same seed, same result
    #[test]
    fn falsify_km_005_prop_deterministic(
        pairs in prop::collection::vec((-100.0..100.0f64, -100.0..100.0f64), 4..40),
        k in 1usize..4,
        seed in any::<u64>(),
    ) {
        let data = PointDataset::from_pairs(&pairs).expect("finite");
        let a = KMeans::new().fit(&data, k, 3, seed).expect("fit");
        let b = KMeans::new().fit(&data, k, 3, seed).expect("fit");
        prop_assert_eq!(a, b);
    }

    /// FALSIFY-KM-006-prop: centers are finite and inertia non-negative
    #[test]
    fn falsify_km_006_prop_finite_centers(
        pairs in prop::collection::vec((-100.0..100.0f64, -100.0..100.0f64), 4..40),
        k in 1usize..4,
    ) {
        let data = PointDataset::from_pairs(&pairs).expect("finite");
        let result = KMeans::new().fit(&data, k, 2, 42).expect("fit");
        prop_assert!(result.centers.iter().all(Point::is_finite));
        prop_assert!(result.inertia >= 0.0);
        prop_assert_eq!(result.centers.len(), k);
    }
}
