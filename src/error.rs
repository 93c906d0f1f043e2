//! Error types for outlier detection runs.
//!
//! Every failure in the core is returned as an [`OutlierError`]; nothing is
//! printed or logged from inside a detection run.

use std::fmt;
use std::path::PathBuf;

/// Which clustering fit of a detection run an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterStage {
    /// First fit on the full scaled dataset.
    Dirty,
    /// Second fit on the trimmed subset.
    Refine,
    /// A fit requested directly from a cluster engine.
    Fit,
}

impl fmt::Display for ClusterStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClusterStage::Dirty => write!(f, "dirty pass"),
            ClusterStage::Refine => write!(f, "refine pass"),
            ClusterStage::Fit => write!(f, "k-means fit"),
        }
    }
}

/// Main error type for detection runs.
///
/// # Examples
///
/// ```
/// use kmeans_outliers::error::{ClusterStage, OutlierError};
///
/// let err = OutlierError::InsufficientData {
///     stage: ClusterStage::Refine,
///     n_samples: 3,
///     n_clusters: 5,
/// };
/// assert!(err.to_string().contains("refine pass"));
/// ```
#[derive(Debug)]
pub enum OutlierError {
    /// The input dataset has no points.
    EmptyDataset {
        /// What was empty
        context: String,
    },

    /// Axis scaling cannot be computed (zero x-range or non-finite factor).
    DegenerateInput {
        /// Maximum x coordinate observed
        max_x: f64,
    },

    /// Fewer points than clusters at one of the clustering stages.
    InsufficientData {
        /// Stage that was about to fit
        stage: ClusterStage,
        /// Points available
        n_samples: usize,
        /// Clusters requested
        n_clusters: usize,
    },

    /// Invalid run parameter.
    InvalidHyperparameter {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// A point with a NaN or infinite coordinate.
    InvalidPoint {
        /// Position in the dataset
        index: usize,
        /// x coordinate
        x: f64,
        /// y coordinate
        y: f64,
    },

    /// Input data could not be obtained from a file.
    DataUnavailable {
        /// File that was requested
        path: PathBuf,
        /// Why it is unusable
        reason: String,
    },

    /// I/O error.
    Io(std::io::Error),

    /// CSV reading/writing error.
    Csv(String),

    /// Configuration could not be parsed.
    Config(String),

    /// Report serialization error.
    Serialization(String),
}

impl fmt::Display for OutlierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutlierError::EmptyDataset { context } => {
                write!(f, "Empty dataset: {context}")
            }
            OutlierError::DegenerateInput { max_x } => {
                write!(
                    f,
                    "Degenerate input: cannot scale axes with max(x) = {max_x}"
                )
            }
            OutlierError::InsufficientData {
                stage,
                n_samples,
                n_clusters,
            } => {
                write!(
                    f,
                    "Insufficient data for {stage}: {n_samples} points, need at least {n_clusters}"
                )
            }
            OutlierError::InvalidHyperparameter {
                param,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "Invalid hyperparameter: {param} = {value}, expected {constraint}"
                )
            }
            OutlierError::InvalidPoint { index, x, y } => {
                write!(f, "Invalid point at index {index}: ({x}, {y})")
            }
            OutlierError::DataUnavailable { path, reason } => {
                write!(f, "Data unavailable: {}: {reason}", path.display())
            }
            OutlierError::Io(e) => write!(f, "I/O error: {e}"),
            OutlierError::Csv(msg) => write!(f, "CSV error: {msg}"),
            OutlierError::Config(msg) => write!(f, "Configuration error: {msg}"),
            OutlierError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
        }
    }
}

impl std::error::Error for OutlierError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OutlierError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for OutlierError {
    fn from(err: std::io::Error) -> Self {
        OutlierError::Io(err)
    }
}

impl From<csv::Error> for OutlierError {
    fn from(err: csv::Error) -> Self {
        OutlierError::Csv(err.to_string())
    }
}

impl From<serde_json::Error> for OutlierError {
    fn from(err: serde_json::Error) -> Self {
        OutlierError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for OutlierError {
    fn from(err: toml::de::Error) -> Self {
        OutlierError::Config(err.to_string())
    }
}

impl OutlierError {
    /// Create an empty dataset error
    #[must_use]
    pub fn empty(context: &str) -> Self {
        Self::EmptyDataset {
            context: context.to_string(),
        }
    }

    /// Create an invalid hyperparameter error
    #[must_use]
    pub fn invalid_param(param: &str, value: impl fmt::Display, constraint: &str) -> Self {
        Self::InvalidHyperparameter {
            param: param.to_string(),
            value: value.to_string(),
            constraint: constraint.to_string(),
        }
    }

    /// Create a data unavailable error
    #[must_use]
    pub fn unavailable(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::DataUnavailable {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, OutlierError>;
