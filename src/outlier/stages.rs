//! The four stages of a detection run, each a standalone function.
//!
//! Every stage consumes the previous stage's output by reference and
//! returns a fresh, immutable value, so stages can be driven and tested
//! independently of [`IterativeOutlierDetector`](super::IterativeOutlierDetector).

use crate::cluster::{assigned_distances, ClusterResult};
use crate::config::DetectorConfig;
use crate::error::{ClusterStage, OutlierError, Result};
use crate::preprocessing::{AxisScaler, ScalingFactor};
use crate::primitives::PointDataset;
use crate::stats::{DescriptiveStats, StdDev};
use crate::traits::ClusterEngine;

use super::OutlierLabel;

/// Output of the scale stage.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleStage {
    /// `max(y) / max(x)` of the raw dataset.
    pub factor: ScalingFactor,
    /// Raw dataset with y divided by `factor`.
    pub scaled: PointDataset,
}

/// Output of the dirty pass.
#[derive(Debug, Clone, PartialEq)]
pub struct DirtyPass {
    /// Fit over the full scaled dataset.
    pub result: ClusterResult,
    /// Distance of each point to its dirty center, in scaled space.
    pub distances: Vec<f64>,
}

/// Output of the trim stage.
#[derive(Debug, Clone, PartialEq)]
pub struct TrimStage {
    /// Percentile value of the dirty distances.
    pub threshold: f64,
    /// Per-point flag: kept for the refine pass.
    pub keep: Vec<bool>,
    /// Kept points, in original order.
    pub trimmed: PointDataset,
}

/// Output of the refine pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RefinePass {
    /// Fit over the trimmed subset; its centers are the trusted centers.
    pub result: ClusterResult,
    /// Nearest refined center of every point of the full dataset.
    pub assignment: Vec<usize>,
    /// Distance of every point to its refined center, in scaled space.
    pub distances: Vec<f64>,
}

/// Mean, spread and cutoff of the final distance vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threshold {
    /// Mean distance.
    pub mean: f64,
    /// Standard deviation of the distances.
    pub std: f64,
    /// `mean + sigma * std`.
    pub value: f64,
}

/// Computes the scaling factor and the scaled dataset.
///
/// # Errors
///
/// - [`OutlierError::EmptyDataset`] if `data` is empty
/// - [`OutlierError::DegenerateInput`] if the axes cannot be scaled
pub fn scale_stage(data: &PointDataset) -> Result<ScaleStage> {
    if data.is_empty() {
        return Err(OutlierError::empty("no points to scale"));
    }
    let factor = AxisScaler::compute_scale(data)?;
    let scaled = AxisScaler::apply_scale(data, factor);
    Ok(ScaleStage { factor, scaled })
}

fn ensure_enough(data: &PointDataset, k: usize, stage: ClusterStage) -> Result<()> {
    if data.len() < k {
        return Err(OutlierError::InsufficientData {
            stage,
            n_samples: data.len(),
            n_clusters: k,
        });
    }
    Ok(())
}

/// Fits the full scaled dataset and measures each point's distance to its
/// dirty center.
///
/// # Errors
///
/// Returns [`OutlierError::InsufficientData`] (dirty pass) if there are
/// fewer points than clusters, or any error from the engine.
pub fn dirty_pass<E: ClusterEngine + ?Sized>(
    engine: &E,
    scaled: &PointDataset,
    config: &DetectorConfig,
) -> Result<DirtyPass> {
    ensure_enough(scaled, config.n_clusters, ClusterStage::Dirty)?;
    let result = engine.fit(scaled, config.n_clusters, config.n_init, config.seed)?;
    let distances = result.distances(scaled);
    Ok(DirtyPass { result, distances })
}

/// Keeps the points whose dirty distance is at or below the given
/// percentile of all dirty distances.
///
/// The cutoff is inclusive: ties at the percentile value are kept.
///
/// # Errors
///
/// Returns an error if `distances` is empty, does not match `scaled`, or
/// `percentile` is outside [0, 100].
pub fn trim_stage(scaled: &PointDataset, distances: &[f64], percentile: f64) -> Result<TrimStage> {
    if distances.len() != scaled.len() {
        return Err(OutlierError::invalid_param(
            "distances",
            distances.len(),
            "one distance per point",
        ));
    }
    let threshold = DescriptiveStats::new(distances).percentile(percentile)?;
    let keep: Vec<bool> = distances.iter().map(|&d| d <= threshold).collect();
    let trimmed = scaled.select(&keep);
    Ok(TrimStage {
        threshold,
        keep,
        trimmed,
    })
}

/// Fits the trimmed subset, then classifies the full scaled dataset against
/// the refined centers.
///
/// # Errors
///
/// Returns [`OutlierError::InsufficientData`] (refine pass) if trimming left
/// fewer points than clusters, or any error from the engine.
pub fn refine_pass<E: ClusterEngine + ?Sized>(
    engine: &E,
    scaled: &PointDataset,
    trimmed: &PointDataset,
    config: &DetectorConfig,
) -> Result<RefinePass> {
    ensure_enough(trimmed, config.n_clusters, ClusterStage::Refine)?;
    let result = engine.fit(trimmed, config.n_clusters, config.n_init, config.seed)?;
    let assignment = engine.predict(&result.centers, scaled);
    let distances = assigned_distances(scaled, &result.centers, &assignment);
    Ok(RefinePass {
        result,
        assignment,
        distances,
    })
}

/// Computes `mean + sigma * std` over the final distances.
///
/// # Errors
///
/// Returns an error if `distances` is empty.
pub fn final_threshold(distances: &[f64], sigma: f64, std_dev: StdDev) -> Result<Threshold> {
    let stats = DescriptiveStats::new(distances);
    let mean = stats.mean()?;
    let std = stats.std(std_dev)?;
    Ok(Threshold {
        mean,
        std,
        value: mean + sigma * std,
    })
}

/// Labels a distance against the final threshold.
///
/// The cutoff is strict: a distance equal to the threshold is normal.
#[must_use]
pub fn classify(distance: f64, threshold: f64) -> OutlierLabel {
    if distance > threshold {
        OutlierLabel::Outlier
    } else {
        OutlierLabel::Normal
    }
}
