//! Run parameters for a detection run.
//!
//! # Example
//!
//! ```
//! use kmeans_outliers::config::DetectorConfig;
//! use kmeans_outliers::stats::StdDev;
//!
//! let config = DetectorConfig::from_toml_str(
//!     r#"
//!     n_clusters = 4
//!     sigma_final = 2.5
//!     std_dev = "population"
//!     "#,
//! )
//! .expect("valid config");
//!
//! assert_eq!(config.n_clusters, 4);
//! assert_eq!(config.n_init, 50);
//! assert_eq!(config.std_dev, StdDev::Population);
//! ```

use crate::error::{OutlierError, Result};
use crate::stats::StdDev;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parameters of the scale → dirty pass → trim → refine pipeline.
///
/// Missing fields take their [`Default`] values when deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DetectorConfig {
    /// Number of clusters (k).
    pub n_clusters: usize,
    /// Restarts per clustering fit.
    pub n_init: usize,
    /// Percentile of dirty-pass distances kept for the refine pass.
    pub trim_percentile: f64,
    /// Multiplier of the distance standard deviation in the final threshold.
    pub sigma_final: f64,
    /// Seed shared by both clustering fits.
    pub seed: u64,
    /// Standard deviation estimator for the final threshold.
    pub std_dev: StdDev,
    /// Lloyd iterations per restart.
    pub max_iter: usize,
    /// Center-shift convergence tolerance.
    pub tol: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            n_clusters: 5,
            n_init: 50,
            trim_percentile: 30.0,
            sigma_final: 3.0,
            seed: 42,
            std_dev: StdDev::Sample,
            max_iter: 300,
            tol: 1e-4,
        }
    }
}

impl DetectorConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of clusters.
    #[must_use]
    pub fn with_n_clusters(mut self, n_clusters: usize) -> Self {
        self.n_clusters = n_clusters;
        self
    }

    /// Sets the restart count.
    #[must_use]
    pub fn with_n_init(mut self, n_init: usize) -> Self {
        self.n_init = n_init;
        self
    }

    /// Sets the trim percentile.
    #[must_use]
    pub fn with_trim_percentile(mut self, trim_percentile: f64) -> Self {
        self.trim_percentile = trim_percentile;
        self
    }

    /// Sets the sigma multiplier.
    #[must_use]
    pub fn with_sigma_final(mut self, sigma_final: f64) -> Self {
        self.sigma_final = sigma_final;
        self
    }

    /// Sets the random seed for reproducibility.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the standard deviation estimator.
    #[must_use]
    pub fn with_std_dev(mut self, std_dev: StdDev) -> Self {
        self.std_dev = std_dev;
        self
    }

    /// Sets the maximum Lloyd iterations.
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

    /// Checks every parameter against its constraint.
    ///
    /// # Errors
    ///
    /// Returns [`OutlierError::InvalidHyperparameter`] for the first
    /// violated constraint.
    pub fn validate(&self) -> Result<()> {
        if self.n_clusters == 0 {
            return Err(OutlierError::invalid_param("n_clusters", self.n_clusters, ">= 1"));
        }
        if self.n_init == 0 {
            return Err(OutlierError::invalid_param("n_init", self.n_init, ">= 1"));
        }
        if !(self.trim_percentile > 0.0 && self.trim_percentile <= 100.0) {
            return Err(OutlierError::invalid_param(
                "trim_percentile",
                self.trim_percentile,
                "in (0, 100]",
            ));
        }
        if !self.sigma_final.is_finite() || self.sigma_final < 0.0 {
            return Err(OutlierError::invalid_param(
                "sigma_final",
                self.sigma_final,
                "finite and >= 0",
            ));
        }
        if self.max_iter == 0 {
            return Err(OutlierError::invalid_param("max_iter", self.max_iter, ">= 1"));
        }
        if !self.tol.is_finite() || self.tol < 0.0 {
            return Err(OutlierError::invalid_param("tol", self.tol, "finite and >= 0"));
        }
        Ok(())
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed TOML, unknown keys, or invalid values.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is invalid.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            OutlierError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }
}
