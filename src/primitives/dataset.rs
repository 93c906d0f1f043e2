//! Ordered table of validated points.

use super::Point;
use crate::error::{OutlierError, Result};
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// An ordered sequence of finite [`Point`]s.
///
/// Index position is the identity used to correlate distances, cluster
/// assignments and labels across the stages of a detection run.
///
/// # Examples
///
/// ```
/// use kmeans_outliers::primitives::{Point, PointDataset};
///
/// let ds = PointDataset::new(vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)])
///     .expect("finite coordinates");
/// assert_eq!(ds.len(), 2);
/// assert_eq!(ds.max_x(), Some(3.0));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PointDataset {
    points: Vec<Point>,
}

impl PointDataset {
    /// Creates a dataset, rejecting NaN or infinite coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`OutlierError::InvalidPoint`] for the first non-finite point.
    pub fn new(points: Vec<Point>) -> Result<Self> {
        if let Some((index, p)) = points.iter().enumerate().find(|(_, p)| !p.is_finite()) {
            return Err(OutlierError::InvalidPoint {
                index,
                x: p.x,
                y: p.y,
            });
        }
        Ok(Self { points })
    }

    /// Creates a dataset from `(x, y)` pairs.
    ///
    /// # Errors
    ///
    /// Returns an error if any coordinate is not finite.
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Result<Self> {
        Self::new(pairs.iter().copied().map(Point::from).collect())
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if there are no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the points as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Point] {
        &self.points
    }

    /// Iterates over the points in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.points.iter()
    }

    /// Largest x coordinate, or `None` when empty.
    #[must_use]
    pub fn max_x(&self) -> Option<f64> {
        self.points.iter().map(|p| p.x).reduce(f64::max)
    }

    /// Largest y coordinate, or `None` when empty.
    #[must_use]
    pub fn max_y(&self) -> Option<f64> {
        self.points.iter().map(|p| p.y).reduce(f64::max)
    }

    /// Keeps the points whose `keep` flag is set, preserving order.
    ///
    /// # Panics
    ///
    /// Panics if `keep` is not the same length as the dataset.
    #[must_use]
    pub fn select(&self, keep: &[bool]) -> Self {
        assert_eq!(keep.len(), self.len(), "mask must match dataset length");
        let points = self
            .points
            .iter()
            .zip(keep)
            .filter(|&(_, &k)| k)
            .map(|(p, _)| *p)
            .collect();
        Self { points }
    }

    /// Applies `f` to every point, keeping order.
    ///
    /// Only finite-preserving maps should be used; the result is not
    /// re-validated.
    #[must_use]
    pub fn map(&self, f: impl Fn(&Point) -> Point) -> Self {
        Self {
            points: self.points.iter().map(f).collect(),
        }
    }

    /// Consumes the dataset, returning the points.
    #[must_use]
    pub fn into_points(self) -> Vec<Point> {
        self.points
    }
}

impl Index<usize> for PointDataset {
    type Output = Point;

    fn index(&self, index: usize) -> &Point {
        &self.points[index]
    }
}

impl<'a> IntoIterator for &'a PointDataset {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
