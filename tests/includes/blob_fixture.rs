// Five Gaussian blobs on a 100x100 grid (scaled units) plus ten planted
// outliers, each 25 units from its nearest blob center. Raw y is ten times
// the scaled y, so the detector has to undo an order-of-magnitude skew.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const BLOB_CENTERS: [(f64, f64); 5] = [
    (15.0, 15.0),
    (15.0, 85.0),
    (50.0, 50.0),
    (85.0, 15.0),
    (85.0, 85.0),
];

const PLANTED_OUTLIERS: [(f64, f64); 10] = [
    (15.0, 40.0),
    (15.0, 60.0),
    (85.0, 40.0),
    (85.0, 60.0),
    (40.0, 15.0),
    (60.0, 15.0),
    (40.0, 85.0),
    (60.0, 85.0),
    (50.0, 25.0),
    (50.0, 75.0),
];

const POINTS_PER_BLOB: usize = 100;
const Y_SKEW: f64 = 10.0;

/// Standard normal sample via Box-Muller.
fn standard_normal(rng: &mut StdRng) -> f64 {
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

/// Blob points first (blob by blob), then the planted outliers at indices
/// `500..510`.
fn blob_pairs(seed: u64) -> Vec<(f64, f64)> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut pairs = Vec::with_capacity(BLOB_CENTERS.len() * POINTS_PER_BLOB + 10);
    for &(cx, cy) in &BLOB_CENTERS {
        for _ in 0..POINTS_PER_BLOB {
            let x = cx + standard_normal(&mut rng);
            let y = cy + standard_normal(&mut rng);
            pairs.push((x, y * Y_SKEW));
        }
    }
    pairs.extend(PLANTED_OUTLIERS.iter().map(|&(x, y)| (x, y * Y_SKEW)));
    pairs
}

fn blob_dataset(seed: u64) -> PointDataset {
    PointDataset::from_pairs(&blob_pairs(seed)).expect("generated points are finite")
}

#[allow(dead_code)]
fn planted_range() -> std::ops::Range<usize> {
    let start = BLOB_CENTERS.len() * POINTS_PER_BLOB;
    start..start + PLANTED_OUTLIERS.len()
}

fn scenario_config() -> DetectorConfig {
    DetectorConfig::default()
        .with_n_clusters(5)
        .with_n_init(10)
        .with_sigma_final(3.0)
}
