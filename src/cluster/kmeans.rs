//! K-Means clustering engine.
//!
//! Uses Lloyd's algorithm with k-means++ initialization and a fixed number
//! of random restarts.

use super::{inertia, nearest_center, ClusterResult};
use crate::error::{ClusterStage, OutlierError, Result};
use crate::primitives::{Point, PointDataset};
use crate::traits::ClusterEngine;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// K-Means clustering engine.
///
/// Holds only the per-restart iteration limits; the cluster count, restart
/// count and seed are arguments of [`ClusterEngine::fit`], so one engine
/// serves any number of independent fits.
///
/// # Algorithm
///
/// For each of `n_init` restarts, drawing from one `StdRng` seeded with
/// `seed`:
///
/// 1. Initialize centers using k-means++ (D² sampling)
/// 2. Assign each point to the nearest center
/// 3. Update centers as the mean of their points (an empty cluster is
///    re-seeded with the point farthest from its center)
/// 4. Repeat until every center moves less than `tol` or `max_iter`
///
/// The restart with the lowest inertia wins; ties keep the earlier one.
///
/// # Examples
///
/// ```
/// use kmeans_outliers::prelude::*;
///
/// let data = PointDataset::from_pairs(&[
///     (1.0, 2.0), (1.5, 1.8), (1.0, 0.6),
///     (8.0, 8.0), (9.0, 11.0), (8.5, 9.0),
/// ]).expect("finite");
///
/// let engine = KMeans::new();
/// let result = engine.fit(&data, 2, 10, 42).expect("enough points");
/// assert_eq!(result.assignment.len(), 6);
/// assert_ne!(result.assignment[0], result.assignment[3]);
///
/// let labels = engine.predict(&result.centers, &data);
/// assert_eq!(labels, result.assignment);
/// ```
///
/// # Performance
///
/// - Time complexity: O(n·k·i·`n_init`) where i = iterations per restart
/// - Space complexity: O(n + k)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KMeans {
    /// Maximum Lloyd iterations per restart.
    max_iter: usize,
    /// Convergence tolerance on center movement.
    tol: f64,
}

impl Default for KMeans {
    fn default() -> Self {
        Self::new()
    }
}

impl KMeans {
    /// Creates an engine with `max_iter = 300` and `tol = 1e-4`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_iter: 300,
            tol: 1e-4,
        }
    }

    /// Sets the maximum number of iterations.
    #[must_use]
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Sets the convergence tolerance.
    #[must_use]
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Maximum Lloyd iterations per restart.
    #[must_use]
    pub fn max_iter(&self) -> usize {
        self.max_iter
    }

    /// Convergence tolerance.
    #[must_use]
    pub fn tol(&self) -> f64 {
        self.tol
    }

    /// Initializes centers using k-means++.
    fn kmeans_plusplus_init(data: &PointDataset, k: usize, rng: &mut StdRng) -> Vec<Point> {
        let n = data.len();
        let mut centers = Vec::with_capacity(k);
        centers.push(data[rng.gen_range(0..n)]);

        let mut min_dist: Vec<f64> = data
            .iter()
            .map(|p| p.distance_squared(&centers[0]))
            .collect();

        while centers.len() < k {
            let total: f64 = min_dist.iter().sum();

            // Select a point with probability proportional to D²; when every
            // point coincides with a center, fall back to a uniform draw.
            let idx = if total > 0.0 {
                let target = rng.gen::<f64>() * total;
                let mut acc = 0.0;
                let mut chosen = n - 1;
                for (i, &d) in min_dist.iter().enumerate() {
                    acc += d;
                    if acc > target {
                        chosen = i;
                        break;
                    }
                }
                chosen
            } else {
                rng.gen_range(0..n)
            };

            let center = data[idx];
            centers.push(center);
            for (m, p) in min_dist.iter_mut().zip(data.iter()) {
                let d = p.distance_squared(&center);
                if d < *m {
                    *m = d;
                }
            }
        }

        centers
    }

    /// Assigns each point to the nearest center.
    fn assign_labels(data: &PointDataset, centers: &[Point]) -> Vec<usize> {
        data.iter().map(|p| nearest_center(p, centers).0).collect()
    }

    /// Updates centers as the mean of their assigned points.
    fn update_centers(data: &PointDataset, labels: &[usize], previous: &[Point]) -> Vec<Point> {
        let k = previous.len();
        let mut sums = vec![(0.0, 0.0); k];
        let mut counts = vec![0usize; k];

        for (p, &label) in data.iter().zip(labels) {
            sums[label].0 += p.x;
            sums[label].1 += p.y;
            counts[label] += 1;
        }

        let mut centers: Vec<Point> = sums
            .iter()
            .zip(&counts)
            .zip(previous)
            .map(|((&(sx, sy), &count), &prev)| {
                if count > 0 {
                    Point::new(sx / count as f64, sy / count as f64)
                } else {
                    prev
                }
            })
            .collect();

        if counts.contains(&0) {
            // Farthest points first, each used at most once
            let mut far: Vec<(usize, f64)> = data
                .iter()
                .zip(labels)
                .map(|(p, &l)| p.distance_squared(&previous[l]))
                .enumerate()
                .collect();
            far.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

            let mut donors = far.into_iter().map(|(i, _)| i);
            for (center, _) in centers
                .iter_mut()
                .zip(&counts)
                .filter(|&(_, &count)| count == 0)
            {
                if let Some(i) = donors.next() {
                    *center = data[i];
                }
            }
        }

        centers
    }

    /// Checks if every center moved less than `tol`.
    fn centers_converged(&self, old: &[Point], new: &[Point]) -> bool {
        old.iter()
            .zip(new)
            .all(|(a, b)| a.distance_squared(b) <= self.tol * self.tol)
    }

    /// Runs Lloyd iterations from `init` to convergence.
    fn lloyd(&self, data: &PointDataset, init: Vec<Point>) -> ClusterResult {
        let mut centers = init;
        let mut n_iter = 0;

        for iter in 0..self.max_iter {
            let labels = Self::assign_labels(data, &centers);
            let new_centers = Self::update_centers(data, &labels, &centers);
            let converged = self.centers_converged(&centers, &new_centers);
            centers = new_centers;
            n_iter = iter + 1;
            if converged {
                break;
            }
        }

        let assignment = Self::assign_labels(data, &centers);
        let inertia = inertia(data, &centers, &assignment);

        ClusterResult {
            centers,
            assignment,
            inertia,
            n_iter,
        }
    }
}

impl ClusterEngine for KMeans {
    /// Fits K-Means with `n_init` restarts and returns the best result.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `k` or `n_init` is zero
    /// - Data has fewer points than clusters
    fn fit(
        &self,
        data: &PointDataset,
        k: usize,
        n_init: usize,
        seed: u64,
    ) -> Result<ClusterResult> {
        if k == 0 {
            return Err(OutlierError::invalid_param("n_clusters", k, ">= 1"));
        }
        if n_init == 0 {
            return Err(OutlierError::invalid_param("n_init", n_init, ">= 1"));
        }
        if data.len() < k {
            return Err(OutlierError::InsufficientData {
                stage: ClusterStage::Fit,
                n_samples: data.len(),
                n_clusters: k,
            });
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let mut best: Option<ClusterResult> = None;

        for _ in 0..n_init {
            let init = Self::kmeans_plusplus_init(data, k, &mut rng);
            let result = self.lloyd(data, init);
            if best.as_ref().map_or(true, |b| result.inertia < b.inertia) {
                best = Some(result);
            }
        }

        best.ok_or_else(|| OutlierError::invalid_param("n_init", n_init, ">= 1"))
    }

    /// Predicts cluster labels against existing centers.
    fn predict(&self, centers: &[Point], data: &PointDataset) -> Vec<usize> {
        Self::assign_labels(data, centers)
    }
}
