//! Clustering for the dirty and refine passes.
//!
//! [`KMeans`] implements [`ClusterEngine`](crate::traits::ClusterEngine):
//! Lloyd's algorithm with seeded k-means++ initialization, repeated
//! `n_init` times, keeping the lowest-inertia result.

mod kmeans;

pub use kmeans::KMeans;

use crate::primitives::{Point, PointDataset};
use serde::{Deserialize, Serialize};

/// Output of one clustering fit.
///
/// Centers live in whatever coordinate space the input dataset was in
/// (the scaled space during detection). Produced fresh per call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterResult {
    /// One center per cluster, indexed by cluster id.
    pub centers: Vec<Point>,
    /// Cluster id of each input point, aligned with the input order.
    pub assignment: Vec<usize>,
    /// Sum of squared distances of points to their assigned center.
    pub inertia: f64,
    /// Lloyd iterations run by the winning restart.
    pub n_iter: usize,
}

impl ClusterResult {
    /// Number of clusters.
    #[must_use]
    pub fn n_clusters(&self) -> usize {
        self.centers.len()
    }

    /// Euclidean distance of each point in `data` to its assigned center.
    ///
    /// # Panics
    ///
    /// Panics if `data` is not the dataset the result was fitted on.
    #[must_use]
    pub fn distances(&self, data: &PointDataset) -> Vec<f64> {
        assigned_distances(data, &self.centers, &self.assignment)
    }

    /// Number of points assigned to each cluster.
    #[must_use]
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.centers.len()];
        for &c in &self.assignment {
            sizes[c] += 1;
        }
        sizes
    }
}

/// Euclidean distance of every point to the center it is assigned to.
///
/// # Panics
///
/// Panics if `assignment` and `data` differ in length or an assignment is
/// not a valid center index.
#[must_use]
pub fn assigned_distances(data: &PointDataset, centers: &[Point], assignment: &[usize]) -> Vec<f64> {
    assert_eq!(
        data.len(),
        assignment.len(),
        "assignment must cover every point"
    );
    data.iter()
        .zip(assignment)
        .map(|(p, &c)| p.distance(&centers[c]))
        .collect()
}

/// Sum of squared distances of points to their assigned centers.
#[must_use]
pub fn inertia(data: &PointDataset, centers: &[Point], assignment: &[usize]) -> f64 {
    data.iter()
        .zip(assignment)
        .map(|(p, &c)| p.distance_squared(&centers[c]))
        .sum()
}

/// Index of the nearest center; ties go to the lowest index.
#[must_use]
pub(crate) fn nearest_center(point: &Point, centers: &[Point]) -> (usize, f64) {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (k, center) in centers.iter().enumerate() {
        let d = point.distance_squared(center);
        if d < best_dist {
            best_dist = d;
            best = k;
        }
    }
    (best, best_dist)
}


#[cfg(test)]
#[path = "tests_kmeans_contract.rs"]
mod tests_kmeans_contract;
