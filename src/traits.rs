//! Core traits at the seams of a detection run.
//!
//! - [`Transformer`]: fit-then-transform preprocessing over a [`PointDataset`]
//! - [`ClusterEngine`]: stateless clustering capability used twice per run
//! - [`ReportingSink`]: receiver of finished detection reports

use crate::cluster::ClusterResult;
use crate::error::Result;
use crate::outlier::DetectionReport;
use crate::primitives::{Point, PointDataset};

/// Trait for dataset transformers (axis scalers).
///
/// # Examples
///
/// ```
/// use kmeans_outliers::prelude::*;
///
/// let data = PointDataset::from_pairs(&[(1.0, 100.0), (2.0, 200.0)]).expect("finite");
/// let mut scaler = AxisScaler::new();
/// let scaled = scaler.fit_transform(&data).expect("non-degenerate");
/// assert_eq!(scaled[1].y, 2.0);
/// ```
pub trait Transformer {
    /// Fits the transformer to data.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails.
    fn fit(&mut self, data: &PointDataset) -> Result<()>;

    /// Transforms data using fitted parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the transformer is not fitted.
    fn transform(&self, data: &PointDataset) -> Result<PointDataset>;

    /// Fits and transforms in one step.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails.
    fn fit_transform(&mut self, data: &PointDataset) -> Result<PointDataset> {
        self.fit(data)?;
        self.transform(data)
    }
}

/// A clustering capability: partition points into `k` groups minimizing
/// within-cluster squared distance.
///
/// Implementations hold only hyperparameters; every call to [`fit`] is an
/// independent, pure function of its inputs, so the dirty and refine passes
/// of a detection run are two invocations of the same operation.
///
/// [`fit`]: ClusterEngine::fit
pub trait ClusterEngine {
    /// Runs `n_init` independently initialized fits and returns the one
    /// with the lowest inertia. `seed` makes the restart sequence
    /// reproducible.
    ///
    /// # Errors
    ///
    /// Returns an error if `data` has fewer than `k` points.
    fn fit(&self, data: &PointDataset, k: usize, n_init: usize, seed: u64)
        -> Result<ClusterResult>;

    /// Assigns each point of `data` to its nearest center without refitting.
    fn predict(&self, centers: &[Point], data: &PointDataset) -> Vec<usize>;
}

/// Receives finished detection reports for display or storage.
pub trait ReportingSink {
    /// Handles the report produced for `source` (usually a file name).
    ///
    /// # Errors
    ///
    /// Returns an error if the sink cannot write the report.
    fn report(&mut self, source: &str, report: &DetectionReport) -> Result<()>;
}
