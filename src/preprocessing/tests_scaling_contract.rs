// =========================================================================
// FALSIFY-AS: axis scaling contract (AxisScaler)
//
// References:
//   - scaled.y = y / (max(y) / max(x)); x unchanged
// =========================================================================

use super::*;
use proptest::prelude::*;

/// FALSIFY-AS-001: after scaling, max(y) equals max(x) when both are positive
#[test]
fn falsify_as_001_scaled_axes_share_max() {
    let data = PointDataset::from_pairs(&[(0.5, 1200.0), (3.0, 40.0), (2.0, 800.0)])
        .expect("valid");
    let factor = AxisScaler::compute_scale(&data).expect("valid");
    let scaled = AxisScaler::apply_scale(&data, factor);

    let max_x = scaled.max_x().expect("non-empty");
    let max_y = scaled.max_y().expect("non-empty");
    assert!(
        (max_x - max_y).abs() < 1e-9,
        "FALSIFIED AS-001: max_x={max_x}, max_y={max_y}"
    );
}

/// FALSIFY-AS-002: scaling preserves cardinality and order
#[test]
fn falsify_as_002_order_preserved() {
    let data = PointDataset::from_pairs(&[(1.0, 9.0), (2.0, 3.0), (3.0, 6.0)]).expect("valid");
    let factor = AxisScaler::compute_scale(&data).expect("valid");
    let scaled = AxisScaler::apply_scale(&data, factor);

    assert_eq!(scaled.len(), data.len());
    for (i, (s, o)) in scaled.iter().zip(data.iter()).enumerate() {
        assert_eq!(s.x, o.x, "FALSIFIED AS-002: x changed at {i}");
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// FALSIFY-AS-003-prop: invert_scale(apply_scale(p, f), f) == p
    #[test]
    fn falsify_as_003_prop_roundtrip(
        x in -1e6..1e6f64,
        y in -1e6..1e6f64,
        f in prop_oneof![1e-6..1e6f64, -1e6..-1e-6f64],
    ) {
        let factor = ScalingFactor::new(f).expect("non-zero finite");
        let p = Point::new(x, y);
        let data = PointDataset::new(vec![p]).expect("finite");
        let scaled = AxisScaler::apply_scale(&data, factor);
        let back = AxisScaler::invert_scale(scaled[0], factor);

        prop_assert_eq!(back.x, p.x);
        prop_assert!(
            (back.y - p.y).abs() <= 1e-9 * p.y.abs().max(1.0),
            "FALSIFIED AS-003-prop: {} -> {}", p.y, back.y
        );
    }
}
