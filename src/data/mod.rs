//! Reading, cleaning and writing two-column point files.
//!
//! Raw files are headerless CSV whose first two columns are x and y. Cleaning
//! skips lines wider than the first row, drops rows that do not parse as
//! finite numbers (including rows missing x or y) and removes exact
//! duplicates, reporting how many rows each step discarded.
//!
//! # Example
//!
//! ```
//! use kmeans_outliers::data::DataCleaner;
//!
//! let raw = "1,10\n2,20\n1,10\nabc,5\n3,30,extra\n4,40\n";
//! let outcome = DataCleaner::clean_reader(raw.as_bytes()).expect("two columns");
//!
//! assert_eq!(outcome.dataset.len(), 3);
//! assert_eq!(outcome.report.bad_lines, 1);
//! assert_eq!(outcome.report.invalid_dropped, 1);
//! assert_eq!(outcome.report.duplicates_dropped, 1);
//! ```

use crate::error::{OutlierError, Result};
use crate::primitives::{Point, PointDataset};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tracing::{debug, info};

/// Row counts of one cleaning pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningReport {
    /// Well-formed rows read.
    pub original_count: usize,
    /// Lines skipped because they could not be read or had more fields
    /// than the first row.
    pub bad_lines: usize,
    /// Rows dropped for a non-numeric, empty or non-finite coordinate.
    pub invalid_dropped: usize,
    /// Rows dropped as exact duplicates of an earlier row.
    pub duplicates_dropped: usize,
    /// Rows kept.
    pub clean_count: usize,
}

impl fmt::Display for CleaningReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Original data: {} rows", self.original_count)?;
        writeln!(f, "Bad lines skipped: {}", self.bad_lines)?;
        writeln!(f, "Invalid rows dropped: {}", self.invalid_dropped)?;
        writeln!(f, "Duplicate rows dropped: {}", self.duplicates_dropped)?;
        write!(f, "Clean data: {} rows", self.clean_count)
    }
}

/// Cleaned points together with the counts that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct CleaningOutcome {
    /// Clean points in file order.
    pub dataset: PointDataset,
    /// What was dropped and why.
    pub report: CleaningReport,
}

/// Cleans raw point files.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataCleaner;

impl DataCleaner {
    /// Cleans the CSV file at `path`.
    ///
    /// # Errors
    ///
    /// - [`OutlierError::DataUnavailable`] if the file does not exist or has
    ///   fewer than two columns
    /// - [`OutlierError::Io`] on other read failures
    pub fn clean_file(path: impl AsRef<Path>) -> Result<CleaningOutcome> {
        let path = path.as_ref();
        let file = open(path)?;
        let outcome = Self::clean_rows(file).map_err(|e| match e {
            OutlierError::DataUnavailable { reason, .. } => OutlierError::unavailable(path, reason),
            other => other,
        })?;
        info!(
            path = %path.display(),
            original = outcome.report.original_count,
            clean = outcome.report.clean_count,
            "cleaned input file"
        );
        Ok(outcome)
    }

    /// Cleans CSV text from any reader.
    ///
    /// # Errors
    ///
    /// Returns [`OutlierError::DataUnavailable`] if the input has fewer than
    /// two columns.
    pub fn clean_reader<R: Read>(reader: R) -> Result<CleaningOutcome> {
        Self::clean_rows(reader)
    }

    fn clean_rows<R: Read>(reader: R) -> Result<CleaningOutcome> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut report = CleaningReport::default();
        let mut width: Option<usize> = None;
        let mut seen = HashSet::new();
        let mut points = Vec::new();

        for (line, result) in csv_reader.records().enumerate() {
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    debug!(line = line + 1, error = %e, "skipping unreadable line");
                    report.bad_lines += 1;
                    continue;
                }
            };
            let expected = *width.get_or_insert(record.len());
            if expected < 2 {
                return Err(OutlierError::unavailable(
                    "<input>",
                    format!("expected at least 2 columns, found {expected}"),
                ));
            }
            if record.len() > expected {
                debug!(
                    line = line + 1,
                    fields = record.len(),
                    expected,
                    "skipping line with too many fields"
                );
                report.bad_lines += 1;
                continue;
            }
            report.original_count += 1;

            // Short rows are missing trailing fields, not malformed.
            let parsed = match (record.get(0), record.get(1)) {
                (Some(x), Some(y)) => parse_point(x, y),
                _ => None,
            };
            let Some(point) = parsed else {
                report.invalid_dropped += 1;
                continue;
            };
            if !seen.insert((point.x.to_bits(), point.y.to_bits())) {
                report.duplicates_dropped += 1;
                continue;
            }
            points.push(point);
        }

        if width.is_none() {
            return Err(OutlierError::unavailable("<input>", "no rows"));
        }

        report.clean_count = points.len();
        Ok(CleaningOutcome {
            dataset: PointDataset::new(points)?,
            report,
        })
    }
}

fn parse_point(x: &str, y: &str) -> Option<Point> {
    let x: f64 = x.parse().ok()?;
    let y: f64 = y.parse().ok()?;
    let point = Point::new(x, y);
    point.is_finite().then_some(point)
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => OutlierError::unavailable(path, "file not found"),
        _ => OutlierError::Io(e),
    })
}

/// Writes `dataset` as headerless `x,y` rows.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_clean_csv(dataset: &PointDataset, output: impl AsRef<Path>) -> Result<()> {
    let output = output.as_ref();
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(output)?;
    for p in dataset {
        writer.serialize((p.x, p.y))?;
    }
    writer.flush()?;
    debug!(path = %output.display(), rows = dataset.len(), "wrote clean file");
    Ok(())
}

/// Reads an already clean two-column CSV file.
///
/// # Errors
///
/// - [`OutlierError::DataUnavailable`] if the file does not exist
/// - [`OutlierError::Csv`] if a row is not two numbers
/// - [`OutlierError::InvalidPoint`] if a coordinate is not finite
pub fn load_points(path: impl AsRef<Path>) -> Result<PointDataset> {
    let path = path.as_ref();
    let file = open(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(file);
    let points = reader
        .deserialize::<(f64, f64)>()
        .map(|row| row.map(Point::from))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    debug!(path = %path.display(), rows = points.len(), "loaded points");
    PointDataset::new(points)
}
