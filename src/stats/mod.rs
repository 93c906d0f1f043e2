//! Descriptive statistics over distance vectors.
//!
//! - Quantiles and percentiles using the R-7 method (Hyndman & Fan 1996),
//!   the linear-interpolation rule used by R, `NumPy` and Pandas
//! - Mean and standard deviation with an explicit degrees-of-freedom choice
//!
//! # Examples
//!
//! ```
//! use kmeans_outliers::stats::{DescriptiveStats, StdDev};
//!
//! let data = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(&data);
//!
//! assert_eq!(stats.quantile(0.5).expect("non-empty data"), 3.0);
//! assert!((stats.percentile(30.0).expect("non-empty data") - 2.2).abs() < 1e-12);
//! assert_eq!(stats.mean().expect("non-empty data"), 3.0);
//! assert!((stats.std(StdDev::Sample).expect("non-empty data") - 2.5_f64.sqrt()).abs() < 1e-12);
//! ```

use crate::error::{OutlierError, Result};
use serde::{Deserialize, Serialize};

/// Which standard deviation estimator to use.
///
/// `Sample` divides by `n - 1` (ddof = 1), `Population` by `n` (ddof = 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StdDev {
    /// Bessel-corrected estimator (ddof = 1).
    #[default]
    Sample,
    /// Biased estimator (ddof = 0).
    Population,
}

impl StdDev {
    /// Delta degrees of freedom subtracted from `n`.
    #[must_use]
    pub fn ddof(self) -> usize {
        match self {
            StdDev::Sample => 1,
            StdDev::Population => 0,
        }
    }
}

/// Descriptive statistics computed on a slice of `f64` values.
///
/// Borrows the data; nothing is copied until a quantile needs a working
/// buffer.
#[derive(Debug)]
pub struct DescriptiveStats<'a> {
    data: &'a [f64],
}

impl<'a> DescriptiveStats<'a> {
    /// Create a new `DescriptiveStats` over `data`.
    #[must_use]
    pub fn new(data: &'a [f64]) -> Self {
        Self { data }
    }

    /// Compute quantile using linear interpolation (R-7 method).
    ///
    /// Position `h = (n - 1) * q` in the sorted data; the result
    /// interpolates between the order statistics at `floor(h)` and `ceil(h)`.
    ///
    /// # Performance
    /// Uses `select_nth_unstable_by` for O(n) average-case selection instead
    /// of a full sort.
    ///
    /// # Errors
    /// Returns error if the data is empty or `q` is not in [0, 1].
    pub fn quantile(&self, q: f64) -> Result<f64> {
        if self.data.is_empty() {
            return Err(OutlierError::empty("cannot compute quantile"));
        }
        if !(0.0..=1.0).contains(&q) {
            return Err(OutlierError::invalid_param("quantile", q, "in [0, 1]"));
        }

        let n = self.data.len();
        if n == 1 {
            return Ok(self.data[0]);
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let (h, h_floor, h_ceil) = {
            let h = (n - 1) as f64 * q;
            (h, h.floor() as usize, h.ceil() as usize)
        };

        let mut working = self.data.to_vec();
        working.select_nth_unstable_by(h_floor, f64::total_cmp);
        let lower = working[h_floor];

        if h_floor == h_ceil {
            return Ok(lower);
        }

        // After partitioning at h_floor, the next order statistic is the
        // minimum of the upper partition.
        let upper = working[h_ceil..]
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min);

        let fraction = h - h_floor as f64;
        Ok(lower + fraction * (upper - lower))
    }

    /// Compute a percentile in [0, 100] (R-7 method).
    ///
    /// # Errors
    /// Returns error if the data is empty or `p` is not in [0, 100].
    pub fn percentile(&self, p: f64) -> Result<f64> {
        if !(0.0..=100.0).contains(&p) {
            return Err(OutlierError::invalid_param("percentile", p, "in [0, 100]"));
        }
        self.quantile(p / 100.0)
    }

    /// Arithmetic mean.
    ///
    /// # Errors
    /// Returns error if the data is empty.
    pub fn mean(&self) -> Result<f64> {
        if self.data.is_empty() {
            return Err(OutlierError::empty("cannot compute mean"));
        }
        Ok(self.data.iter().sum::<f64>() / self.data.len() as f64)
    }

    /// Standard deviation with the requested estimator.
    ///
    /// With [`StdDev::Sample`] and a single value the estimator is undefined;
    /// `0.0` is returned so a one-point run has zero spread.
    ///
    /// # Errors
    /// Returns error if the data is empty.
    pub fn std(&self, kind: StdDev) -> Result<f64> {
        let mean = self.mean()?;
        let n = self.data.len();
        let denom = n.saturating_sub(kind.ddof());
        if denom == 0 {
            return Ok(0.0);
        }
        let ss: f64 = self.data.iter().map(|v| (v - mean).powi(2)).sum();
        Ok((ss / denom as f64).sqrt())
    }

    /// Largest value.
    ///
    /// # Errors
    /// Returns error if the data is empty.
    pub fn max(&self) -> Result<f64> {
        self.data
            .iter()
            .copied()
            .reduce(f64::max)
            .ok_or_else(|| OutlierError::empty("cannot compute max"))
    }
}


#[cfg(test)]
#[path = "tests_descriptive_contract.rs"]
mod tests_descriptive_contract;
