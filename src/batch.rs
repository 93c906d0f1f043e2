//! Independent detection runs over many files.
//!
//! Every file gets its own scaling factor and its own clustering fits; a
//! failure on one file never affects another. With parallelism enabled the
//! files are processed on the rayon pool, and outcomes are still returned in
//! input order.

use crate::config::DetectorConfig;
use crate::data::{load_points, write_clean_csv, CleaningReport, DataCleaner};
use crate::error::{OutlierError, Result};
use crate::outlier::{DetectionReport, IterativeOutlierDetector};
use crate::primitives::PointDataset;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Result of processing one input file.
#[derive(Debug)]
pub struct FileOutcome {
    /// Input file.
    pub path: PathBuf,
    /// Cleaning counts, when the file was cleaned first.
    pub cleaning: Option<CleaningReport>,
    /// Detection report, or the error that stopped this file.
    pub result: Result<DetectionReport>,
}

impl FileOutcome {
    /// Returns true if detection finished.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Runs the detector over a list of files.
#[derive(Debug, Clone)]
pub struct BatchRunner {
    detector: IterativeOutlierDetector,
    parallel: bool,
    clean_dir: Option<PathBuf>,
}

impl BatchRunner {
    /// Creates a sequential runner that reads already clean files.
    #[must_use]
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            detector: IterativeOutlierDetector::new(config),
            parallel: false,
            clean_dir: None,
        }
    }

    /// Processes files on the rayon pool.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Cleans each raw file first and writes the clean copy into `dir` as
    /// `clean_<file name>`.
    #[must_use]
    pub fn with_clean_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.clean_dir = Some(dir.into());
        self
    }

    /// Returns the run parameters.
    #[must_use]
    pub fn config(&self) -> &DetectorConfig {
        self.detector.config()
    }

    /// Processes every path, returning one outcome per path in input order.
    pub fn run<P: AsRef<Path> + Sync>(&self, paths: &[P]) -> Vec<FileOutcome> {
        if self.parallel {
            paths.par_iter().map(|p| self.process(p.as_ref())).collect()
        } else {
            paths.iter().map(|p| self.process(p.as_ref())).collect()
        }
    }

    /// Processes a single file.
    pub fn process(&self, path: &Path) -> FileOutcome {
        let started = Instant::now();
        let (cleaning, dataset) = match self.prepare(path) {
            Ok(prepared) => prepared,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read input");
                return FileOutcome {
                    path: path.to_path_buf(),
                    cleaning: None,
                    result: Err(e),
                };
            }
        };

        let result = self.detector.detect(&dataset);
        debug!(
            path = %path.display(),
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            "file processed"
        );
        match &result {
            Ok(report) => info!(
                path = %path.display(),
                points = report.len(),
                outliers = report.outlier_count,
                "detection finished"
            ),
            Err(e) => warn!(path = %path.display(), error = %e, "detection failed"),
        }
        FileOutcome {
            path: path.to_path_buf(),
            cleaning,
            result,
        }
    }

    fn prepare(&self, path: &Path) -> Result<(Option<CleaningReport>, PointDataset)> {
        let Some(dir) = &self.clean_dir else {
            return Ok((None, load_points(path)?));
        };
        let outcome = DataCleaner::clean_file(path)?;
        let name = path
            .file_name()
            .ok_or_else(|| OutlierError::unavailable(path, "not a file"))?;
        let clean_path = dir.join(format!("clean_{}", name.to_string_lossy()));
        write_clean_csv(&outcome.dataset, &clean_path)?;
        Ok((Some(outcome.report), outcome.dataset))
    }
}
