// =========================================================================
// FALSIFY-DS: descriptive statistics used by the outlier thresholds
//
// References:
//   - Hyndman & Fan (1996) "Sample Quantiles in Statistical Packages"
// =========================================================================

use super::*;

/// FALSIFY-DS-001: Min quantile (0.0) returns minimum
#[test]
fn falsify_ds_001_min_quantile() {
    let data = [5.0, 1.0, 3.0, 2.0, 4.0];
    let min = DescriptiveStats::new(&data).quantile(0.0).expect("valid quantile");

    assert!(
        (min - 1.0).abs() < 1e-12,
        "FALSIFIED DS-001: min quantile={min}, expected 1.0"
    );
}

/// FALSIFY-DS-002: Max quantile (1.0) returns maximum
#[test]
fn falsify_ds_002_max_quantile() {
    let data = [5.0, 1.0, 3.0, 2.0, 4.0];
    let max = DescriptiveStats::new(&data).quantile(1.0).expect("valid quantile");

    assert!(
        (max - 5.0).abs() < 1e-12,
        "FALSIFIED DS-002: max quantile={max}, expected 5.0"
    );
}

/// FALSIFY-DS-003: Mean + sigma * std reproduces a hand-computed threshold
#[test]
fn falsify_ds_003_threshold_arithmetic() {
    // mean = 5, sample variance = 32/7
    let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
    let stats = DescriptiveStats::new(&data);
    let threshold = stats.mean().expect("mean") + 3.0 * stats.std(StdDev::Sample).expect("std");
    let expected = 5.0 + 3.0 * (32.0_f64 / 7.0).sqrt();

    assert!(
        (threshold - expected).abs() < 1e-9,
        "FALSIFIED DS-003: threshold={threshold}, expected {expected}"
    );
}

mod ds_proptest_falsify {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// FALSIFY-DS-004-prop: percentile lies within [min, max]
        #[test]
        fn falsify_ds_004_prop_percentile_bounded(
            data in prop::collection::vec(-1e6..1e6f64, 1..60),
            p in 0.0..=100.0f64,
        ) {
            let stats = DescriptiveStats::new(&data);
            let value = stats.percentile(p).expect("valid percentile");
            let min = data.iter().copied().fold(f64::INFINITY, f64::min);
            let max = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);

            prop_assert!(
                value >= min - 1e-9 && value <= max + 1e-9,
                "FALSIFIED DS-004-prop: p{}={} not in [{}, {}]",
                p, value, min, max
            );
        }

        /// FALSIFY-DS-005-prop: percentile is monotone in p
        #[test]
        fn falsify_ds_005_prop_percentile_monotone(
            data in prop::collection::vec(-1e3..1e3f64, 2..60),
            a in 0.0..=100.0f64,
            b in 0.0..=100.0f64,
        ) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let stats = DescriptiveStats::new(&data);
            let v_lo = stats.percentile(lo).expect("valid");
            let v_hi = stats.percentile(hi).expect("valid");

            prop_assert!(
                v_lo <= v_hi + 1e-9,
                "FALSIFIED DS-005-prop: p{}={} > p{}={}",
                lo, v_lo, hi, v_hi
            );
        }

        /// FALSIFY-DS-006-prop: population std never exceeds sample std
        #[test]
        fn falsify_ds_006_prop_population_le_sample(
            data in prop::collection::vec(-1e3..1e3f64, 2..60),
        ) {
            let stats = DescriptiveStats::new(&data);
            let pop = stats.std(StdDev::Population).expect("valid");
            let sample = stats.std(StdDev::Sample).expect("valid");
            prop_assert!(pop <= sample + 1e-9);
        }
    }
}
