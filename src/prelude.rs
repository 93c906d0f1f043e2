//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use kmeans_outliers::prelude::*;
//! ```

pub use crate::cluster::{ClusterResult, KMeans};
pub use crate::config::DetectorConfig;
pub use crate::error::{OutlierError, Result};
pub use crate::outlier::{DetectionReport, IterativeOutlierDetector, OutlierLabel, PointRecord};
pub use crate::preprocessing::{AxisScaler, ScalingFactor};
pub use crate::primitives::{Point, PointDataset};
pub use crate::stats::StdDev;
pub use crate::traits::{ClusterEngine, ReportingSink, Transformer};
