//! Iterative scale-normalized clustering outlier detection.
//!
//! A detection run has four sequential stages; a failure at any stage
//! aborts the run:
//!
//! 1. **Scale**: divide y by `max(y) / max(x)` so both axes weigh equally
//!    in the squared-distance metric
//! 2. **Dirty pass**: cluster the full scaled dataset and measure each
//!    point's distance to its center
//! 3. **Trim**: keep only points at or below the trim percentile of those
//!    distances (the closest 30% by default)
//! 4. **Refine**: re-cluster the trimmed points, classify every point
//!    against the refined centers, and flag points whose distance exceeds
//!    `mean + sigma_final * std`
//!
//! Distances are always measured in scaled space; only the reported
//! centers are converted back to original units.
//!
//! # Example
//!
//! ```
//! use kmeans_outliers::prelude::*;
//!
//! let mut pairs = Vec::new();
//! for i in 0..6 {
//!     for j in 0..6 {
//!         pairs.push((1.0 + f64::from(i) * 0.1, 100.0 + f64::from(j) * 10.0));
//!     }
//! }
//! pairs.push((1.25, 400.0));
//! let data = PointDataset::from_pairs(&pairs).expect("finite");
//!
//! let config = DetectorConfig::default()
//!     .with_n_clusters(1)
//!     .with_n_init(3);
//! let report = IterativeOutlierDetector::new(config)
//!     .detect(&data)
//!     .expect("detection succeeds");
//!
//! assert_eq!(report.outlier_count, 1);
//! assert_eq!(report.records[36].label, OutlierLabel::Outlier);
//! ```

mod stages;

pub use stages::{
    classify, dirty_pass, final_threshold, refine_pass, scale_stage, trim_stage, DirtyPass,
    RefinePass, ScaleStage, Threshold, TrimStage,
};

use crate::cluster::KMeans;
use crate::config::DetectorConfig;
use crate::error::Result;
use crate::preprocessing::{AxisScaler, ScalingFactor};
use crate::primitives::{Point, PointDataset};
use crate::traits::ClusterEngine;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Final classification of a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutlierLabel {
    /// Within the distance threshold.
    Normal,
    /// Strictly beyond the distance threshold.
    Outlier,
}

impl OutlierLabel {
    /// Returns true for [`OutlierLabel::Outlier`].
    #[must_use]
    pub fn is_outlier(self) -> bool {
        self == OutlierLabel::Outlier
    }
}

impl fmt::Display for OutlierLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutlierLabel::Normal => write!(f, "Normal"),
            OutlierLabel::Outlier => write!(f, "Outlier"),
        }
    }
}

/// Everything known about one input point at the end of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    /// Position in the input dataset.
    pub index: usize,
    /// Coordinates in original units.
    pub point: Point,
    /// Coordinates in scaled space.
    pub scaled: Point,
    /// Nearest refined center.
    pub cluster: usize,
    /// Distance to that center, in scaled space.
    pub distance: f64,
    /// Final label.
    pub label: OutlierLabel,
}

/// Result of one detection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionReport {
    /// Number of points labelled [`OutlierLabel::Outlier`].
    pub outlier_count: usize,
    /// Factor y was divided by during clustering.
    pub scaling_factor: ScalingFactor,
    /// Refined centers in original units.
    pub refined_centers: Vec<Point>,
    /// One record per input point, in input order.
    pub records: Vec<PointRecord>,
    /// Dirty-distance percentile used for trimming.
    pub trim_threshold: f64,
    /// Points kept for the refine pass.
    pub trimmed_count: usize,
    /// Mean of the final distances.
    pub distance_mean: f64,
    /// Standard deviation of the final distances.
    pub distance_std: f64,
    /// `distance_mean + sigma_final * distance_std`.
    pub final_threshold: f64,
    /// Parameters of the run.
    pub config: DetectorConfig,
}

impl DetectionReport {
    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the report covers no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Label of each point, in input order.
    #[must_use]
    pub fn labels(&self) -> Vec<OutlierLabel> {
        self.records.iter().map(|r| r.label).collect()
    }

    /// Refined cluster index of each point, in input order.
    #[must_use]
    pub fn cluster_indices(&self) -> Vec<usize> {
        self.records.iter().map(|r| r.cluster).collect()
    }

    /// Records labelled outlier.
    pub fn outliers(&self) -> impl Iterator<Item = &PointRecord> {
        self.records.iter().filter(|r| r.label.is_outlier())
    }

    /// Records labelled normal.
    pub fn normals(&self) -> impl Iterator<Item = &PointRecord> {
        self.records.iter().filter(|r| !r.label.is_outlier())
    }

    /// Number of points assigned to each refined cluster.
    #[must_use]
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.refined_centers.len()];
        for r in &self.records {
            sizes[r.cluster] += 1;
        }
        sizes
    }
}

/// Runs the scale → dirty pass → trim → refine pipeline.
///
/// The detector holds only its configuration and a stateless
/// [`ClusterEngine`]; each call to [`detect`](Self::detect) is an
/// independent run that shares nothing with other runs.
#[derive(Debug, Clone)]
pub struct IterativeOutlierDetector<E: ClusterEngine = KMeans> {
    config: DetectorConfig,
    engine: E,
}

impl IterativeOutlierDetector<KMeans> {
    /// Creates a detector backed by [`KMeans`] with the configured
    /// iteration limits.
    #[must_use]
    pub fn new(config: DetectorConfig) -> Self {
        let engine = KMeans::new()
            .with_max_iter(config.max_iter)
            .with_tol(config.tol);
        Self { config, engine }
    }
}

impl Default for IterativeOutlierDetector<KMeans> {
    fn default() -> Self {
        Self::new(DetectorConfig::default())
    }
}

impl<E: ClusterEngine> IterativeOutlierDetector<E> {
    /// Creates a detector with a custom clustering engine.
    #[must_use]
    pub fn with_engine(config: DetectorConfig, engine: E) -> Self {
        Self { config, engine }
    }

    /// Returns the run parameters.
    #[must_use]
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Returns the clustering engine.
    #[must_use]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Labels every point of `data` as normal or outlier.
    ///
    /// # Errors
    ///
    /// - [`InvalidHyperparameter`](crate::error::OutlierError::InvalidHyperparameter)
    ///   if the configuration is invalid
    /// - [`EmptyDataset`](crate::error::OutlierError::EmptyDataset) if `data` is empty
    /// - [`DegenerateInput`](crate::error::OutlierError::DegenerateInput) if the
    ///   axes cannot be scaled
    /// - [`InsufficientData`](crate::error::OutlierError::InsufficientData) if
    ///   either clustering stage has fewer points than clusters
    pub fn detect(&self, data: &PointDataset) -> Result<DetectionReport> {
        self.config.validate()?;

        let ScaleStage { factor, scaled } = scale_stage(data)?;
        let dirty = dirty_pass(&self.engine, &scaled, &self.config)?;
        let trim = trim_stage(&scaled, &dirty.distances, self.config.trim_percentile)?;
        let refine = refine_pass(&self.engine, &scaled, &trim.trimmed, &self.config)?;
        let threshold = final_threshold(
            &refine.distances,
            self.config.sigma_final,
            self.config.std_dev,
        )?;

        let records: Vec<PointRecord> = data
            .iter()
            .zip(scaled.iter())
            .zip(refine.assignment.iter().zip(&refine.distances))
            .enumerate()
            .map(|(index, ((&point, &scaled), (&cluster, &distance)))| PointRecord {
                index,
                point,
                scaled,
                cluster,
                distance,
                label: classify(distance, threshold.value),
            })
            .collect();

        let outlier_count = records.iter().filter(|r| r.label.is_outlier()).count();
        let refined_centers = refine
            .result
            .centers
            .iter()
            .map(|&c| AxisScaler::invert_scale(c, factor))
            .collect();

        Ok(DetectionReport {
            outlier_count,
            scaling_factor: factor,
            refined_centers,
            records,
            trim_threshold: trim.threshold,
            trimmed_count: trim.trimmed.len(),
            distance_mean: threshold.mean,
            distance_std: threshold.std,
            final_threshold: threshold.value,
            config: self.config.clone(),
        })
    }
}


#[cfg(test)]
#[path = "tests_detector_contract.rs"]
mod tests_detector_contract;
