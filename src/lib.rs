//! kmeans-outliers: iterative scale-normalized clustering outlier detection
//! for two-dimensional point data.
//!
//! A detection run equalizes the numeric range of the two axes, clusters the
//! data once ("dirty pass"), keeps the points closest to their centers,
//! clusters that trusted core again ("refine pass"), and flags every point
//! whose distance to its refined center is more than `sigma` standard
//! deviations above the mean.
//!
//! # Quick Start
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
//! let config = DetectorConfig::default().with_n_clusters(1).with_n_init(3);
//! let report = IterativeOutlierDetector::new(config)
//!     .detect(&data)
//!     .expect("detection succeeds");
//!
//! assert_eq!(report.outlier_count, 1);
//! assert_eq!(report.outliers().next().map(|r| r.index), Some(36));
//! ```
//!
//! # Modules
//!
//! - [`primitives`]: Point and PointDataset
//! - [`preprocessing`]: Axis scaling (y divided by `max(y) / max(x)`)
//! - [`stats`]: Percentiles, mean and standard deviation
//! - [`cluster`]: K-Means with k-means++ seeding and restarts
//! - [`outlier`]: The detection pipeline and its stages
//! - [`config`]: Run parameters, loadable from TOML
//! - [`data`]: Cleaning, loading and writing point files
//! - [`report`]: Console, JSON and in-memory reporting sinks
//! - [`batch`]: Independent runs over many files

pub mod batch;
pub mod cluster;
pub mod config;
pub mod data;
pub mod error;
pub mod outlier;
pub mod prelude;
pub mod preprocessing;
pub mod primitives;
pub mod report;
pub mod stats;
pub mod traits;

pub use error::{OutlierError, Result};
pub use primitives::{Point, PointDataset};
pub use traits::{ClusterEngine, ReportingSink, Transformer};
