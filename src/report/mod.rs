//! Reporting sinks for finished detection runs.
//!
//! - [`ConsoleReporter`]: human-readable summary, optionally colored
//! - [`JsonReporter`]: one JSON object per report, one report per line
//! - [`CollectingReporter`]: keeps reports in memory

use crate::error::Result;
use crate::outlier::DetectionReport;
use crate::stats::DescriptiveStats;
use crate::traits::ReportingSink;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Aggregate view of a [`DetectionReport`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Points classified.
    pub n_points: usize,
    /// Points labelled outlier.
    pub outlier_count: usize,
    /// `outlier_count / n_points`.
    pub outlier_fraction: f64,
    /// Points per refined cluster.
    pub cluster_sizes: Vec<usize>,
    /// Outliers per refined cluster.
    pub cluster_outliers: Vec<usize>,
    /// Mean final distance.
    pub distance_mean: f64,
    /// Standard deviation of the final distances, with the run's estimator.
    pub distance_std: f64,
    /// Largest final distance.
    pub distance_max: f64,
}

impl SummaryStats {
    /// Summarizes `report`.
    #[must_use]
    pub fn from_report(report: &DetectionReport) -> Self {
        let n_points = report.len();
        let mut cluster_outliers = vec![0; report.refined_centers.len()];
        for r in report.outliers() {
            cluster_outliers[r.cluster] += 1;
        }
        let distances: Vec<f64> = report.records.iter().map(|r| r.distance).collect();
        let distance_max = DescriptiveStats::new(&distances).max().unwrap_or(0.0);

        #[allow(clippy::cast_precision_loss)]
        let outlier_fraction = if n_points == 0 {
            0.0
        } else {
            report.outlier_count as f64 / n_points as f64
        };

        Self {
            n_points,
            outlier_count: report.outlier_count,
            outlier_fraction,
            cluster_sizes: report.cluster_sizes(),
            cluster_outliers,
            distance_mean: report.distance_mean,
            distance_std: report.distance_std,
            distance_max,
        }
    }
}

/// Writes a human-readable summary of each report.
#[derive(Debug)]
pub struct ConsoleReporter<W: Write> {
    out: W,
    color: bool,
    list_outliers: bool,
}

impl<W: Write> ConsoleReporter<W> {
    /// Creates a colored reporter writing to `out`.
    pub fn new(out: W) -> Self {
        Self {
            out,
            color: true,
            list_outliers: false,
        }
    }

    /// Enables or disables ANSI colors.
    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Also prints one line per outlier.
    #[must_use]
    pub fn with_outlier_list(mut self, list_outliers: bool) -> Self {
        self.list_outliers = list_outliers;
        self
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn header(&self, title: &str) -> String {
        let text = format!("=== {title} ===");
        if self.color {
            text.cyan().bold().to_string()
        } else {
            text
        }
    }

    fn key(&self, key: &str) -> String {
        if self.color {
            key.white().bold().to_string()
        } else {
            key.to_string()
        }
    }

    fn outlier_tag(&self) -> String {
        if self.color {
            "[OUTLIER]".red().bold().to_string()
        } else {
            "[OUTLIER]".to_string()
        }
    }
}

impl<W: Write> ReportingSink for ConsoleReporter<W> {
    fn report(&mut self, source: &str, report: &DetectionReport) -> Result<()> {
        let summary = SummaryStats::from_report(report);
        let config = &report.config;

        writeln!(self.out, "{}", self.header(source))?;
        writeln!(self.out, "  {}: {}", self.key("Points"), summary.n_points)?;
        writeln!(
            self.out,
            "  {}: {} ({:.2}%)",
            self.key("Outliers"),
            summary.outlier_count,
            summary.outlier_fraction * 100.0
        )?;
        writeln!(
            self.out,
            "  {}: Y divided by {:.2}",
            self.key("Scaling"),
            report.scaling_factor
        )?;
        writeln!(
            self.out,
            "  {}: {} of {} points kept (distance <= {:.4})",
            self.key("Trimmed"),
            report.trimmed_count,
            summary.n_points,
            report.trim_threshold
        )?;
        writeln!(
            self.out,
            "  {}: {:.4} (mean {:.4} + {} x std {:.4})",
            self.key("Threshold"),
            report.final_threshold,
            report.distance_mean,
            config.sigma_final,
            report.distance_std
        )?;
        writeln!(self.out, "  {}:", self.key("Refined centers"))?;
        for (i, c) in report.refined_centers.iter().enumerate() {
            writeln!(
                self.out,
                "    [{i}] ({:.4}, {:.4})  size={}  outliers={}",
                c.x, c.y, summary.cluster_sizes[i], summary.cluster_outliers[i]
            )?;
        }
        if self.list_outliers {
            for r in report.outliers() {
                writeln!(
                    self.out,
                    "  {} #{} ({}, {})  distance={:.4}  cluster={}",
                    self.outlier_tag(),
                    r.index,
                    r.point.x,
                    r.point.y,
                    r.distance,
                    r.cluster
                )?;
            }
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct JsonLine<'a> {
    source: &'a str,
    summary: SummaryStats,
    report: &'a DetectionReport,
}

/// Writes each report as a single JSON line.
#[derive(Debug)]
pub struct JsonReporter<W: Write> {
    out: W,
}

impl<W: Write> JsonReporter<W> {
    /// Creates a reporter writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportingSink for JsonReporter<W> {
    fn report(&mut self, source: &str, report: &DetectionReport) -> Result<()> {
        let line = JsonLine {
            source,
            summary: SummaryStats::from_report(report),
            report,
        };
        serde_json::to_writer(&mut self.out, &line)?;
        writeln!(self.out)?;
        Ok(())
    }
}

/// Keeps every report it receives.
#[derive(Debug, Clone, Default)]
pub struct CollectingReporter {
    reports: Vec<(String, DetectionReport)>,
}

impl CollectingReporter {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Collected `(source, report)` pairs in arrival order.
    #[must_use]
    pub fn reports(&self) -> &[(String, DetectionReport)] {
        &self.reports
    }

    /// Total outliers across all collected reports.
    #[must_use]
    pub fn total_outliers(&self) -> usize {
        self.reports.iter().map(|(_, r)| r.outlier_count).sum()
    }
}

impl ReportingSink for CollectingReporter {
    fn report(&mut self, source: &str, report: &DetectionReport) -> Result<()> {
        self.reports.push((source.to_string(), report.clone()));
        Ok(())
    }
}
