//! Axis scaling for isotropic clustering.
//!
//! K-Means measures squared Euclidean distance, so an axis with a much
//! larger numeric range dominates the metric and clustering collapses into
//! one-dimensional splits. [`AxisScaler`] divides every y coordinate by
//! `max(y) / max(x)` so both axes span comparable ranges; x is untouched.
//!
//! # Example
//!
//! ```
//! use kmeans_outliers::prelude::*;
//!
//! let data = PointDataset::from_pairs(&[
//!     (1.0, 100.0),
//!     (2.0, 250.0),
//!     (4.0, 400.0),
//! ]).expect("finite");
//!
//! let factor = AxisScaler::compute_scale(&data).expect("non-degenerate");
//! assert_eq!(factor.value(), 100.0);
//!
//! let scaled = AxisScaler::apply_scale(&data, factor);
//! assert_eq!(scaled[2], Point::new(4.0, 4.0));
//!
//! let back = AxisScaler::invert_scale(scaled[1], factor);
//! assert_eq!(back, data[1]);
//! ```

use crate::error::{OutlierError, Result};
use crate::primitives::{Point, PointDataset};
use crate::traits::Transformer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The ratio `max(y) / max(x)` of a raw dataset.
///
/// Computed once per detection run and immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScalingFactor(f64);

impl ScalingFactor {
    /// Wraps a raw factor.
    ///
    /// # Errors
    ///
    /// Returns [`OutlierError::InvalidHyperparameter`] for zero or
    /// non-finite factors, which would make the y axis collapse or overflow.
    pub fn new(value: f64) -> Result<Self> {
        if value == 0.0 || !value.is_finite() {
            return Err(OutlierError::invalid_param(
                "scaling_factor",
                value,
                "finite and non-zero",
            ));
        }
        Ok(Self(value))
    }

    /// The identity factor.
    #[must_use]
    pub const fn identity() -> Self {
        Self(1.0)
    }

    /// Returns the raw ratio.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for ScalingFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(precision) = f.precision() {
            write!(f, "{:.*}", precision, self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Equalizes the numeric range of the two axes.
///
/// The associated functions are the stateless scaling operations; the
/// [`Transformer`] impl wraps them for fit/transform style use.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AxisScaler {
    /// Factor learned during fit.
    factor: Option<ScalingFactor>,
}

impl AxisScaler {
    /// Creates an unfitted scaler.
    #[must_use]
    pub fn new() -> Self {
        Self { factor: None }
    }

    /// Returns the fitted factor, if any.
    #[must_use]
    pub fn factor(&self) -> Option<ScalingFactor> {
        self.factor
    }

    /// Returns true if the scaler has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.factor.is_some()
    }

    /// Computes `max(y) / max(x)` over `data`.
    ///
    /// Negative maxima are accepted; when only one of them is negative the
    /// factor is negative and scaling mirrors the y axis.
    ///
    /// # Errors
    ///
    /// - [`OutlierError::EmptyDataset`] if `data` is empty
    /// - [`OutlierError::DegenerateInput`] if `max(x) == 0` or the ratio is
    ///   zero or not finite
    pub fn compute_scale(data: &PointDataset) -> Result<ScalingFactor> {
        let (Some(max_x), Some(max_y)) = (data.max_x(), data.max_y()) else {
            return Err(OutlierError::empty("cannot compute axis scale"));
        };
        if max_x == 0.0 {
            return Err(OutlierError::DegenerateInput { max_x });
        }
        ScalingFactor::new(max_y / max_x).map_err(|_| OutlierError::DegenerateInput { max_x })
    }

    /// Divides every y by `factor`, preserving order; x is unchanged.
    #[must_use]
    pub fn apply_scale(data: &PointDataset, factor: ScalingFactor) -> PointDataset {
        data.map(|p| Point::new(p.x, p.y / factor.0))
    }

    /// Brings a scaled-space point back to original units.
    #[must_use]
    pub fn invert_scale(point: Point, factor: ScalingFactor) -> Point {
        Point::new(point.x, point.y * factor.0)
    }

    /// Transforms scaled data back to original units.
    ///
    /// # Errors
    ///
    /// Returns an error if the scaler is not fitted.
    pub fn inverse_transform(&self, data: &PointDataset) -> Result<PointDataset> {
        let factor = self.fitted_factor()?;
        Ok(data.map(|p| Self::invert_scale(*p, factor)))
    }

    fn fitted_factor(&self) -> Result<ScalingFactor> {
        self.factor.ok_or_else(|| OutlierError::InvalidHyperparameter {
            param: "AxisScaler".to_string(),
            value: "unfitted".to_string(),
            constraint: "fit() before transform()".to_string(),
        })
    }
}

impl Transformer for AxisScaler {
    /// Computes the scaling factor.
    fn fit(&mut self, data: &PointDataset) -> Result<()> {
        self.factor = Some(Self::compute_scale(data)?);
        Ok(())
    }

    /// Divides y by the fitted factor.
    fn transform(&self, data: &PointDataset) -> Result<PointDataset> {
        Ok(Self::apply_scale(data, self.fitted_factor()?))
    }
}


#[cfg(test)]
#[path = "tests_scaling_contract.rs"]
mod tests_scaling_contract;
