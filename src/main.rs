//! kmo - K-Means outlier detection CLI
//!
//! Usage:
//!   kmo clean raw.csv -o clean.csv        # Clean a raw two-column file
//!   kmo detect clean.csv                  # Detect outliers (k = 5)
//!   kmo detect a.csv b.csv --k 3 --json   # Several files, JSON lines
//!   kmo run raw/*.csv --out-dir cleaned   # Clean, then detect

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use kmeans_outliers::batch::{BatchRunner, FileOutcome};
use kmeans_outliers::config::DetectorConfig;
use kmeans_outliers::data::{write_clean_csv, CleaningReport, DataCleaner};
use kmeans_outliers::report::{ConsoleReporter, JsonReporter};
use kmeans_outliers::stats::StdDev;
use kmeans_outliers::{OutlierError, ReportingSink};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// kmo - scale-normalized iterative K-Means outlier detection
#[derive(Parser, Debug)]
#[command(name = "kmo")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose logging (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Clean a raw CSV file: skip bad lines, drop invalid and duplicate rows
    Clean {
        /// Raw headerless CSV file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Where to write the clean file
        #[arg(short, long, value_name = "OUTPUT")]
        output: PathBuf,
    },

    /// Detect outliers in clean two-column CSV files
    Detect {
        /// Clean CSV files, each processed independently
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        detection: DetectionArgs,
    },

    /// Clean raw files into a directory, then detect outliers in each
    Run {
        /// Raw headerless CSV files
        #[arg(value_name = "RAW", required = true)]
        files: Vec<PathBuf>,

        /// Directory for the clean copies
        #[arg(long, value_name = "DIR")]
        out_dir: PathBuf,

        #[command(flatten)]
        detection: DetectionArgs,
    },
}

#[derive(Args, Debug, Default)]
struct DetectionArgs {
    /// Number of clusters
    #[arg(long)]
    k: Option<usize>,

    /// Restarts per clustering fit
    #[arg(long)]
    n_init: Option<usize>,

    /// Standard deviations above the mean distance for the final threshold
    #[arg(long)]
    sigma: Option<f64>,

    /// Percentile of dirty-pass distances kept for the refine pass
    #[arg(long)]
    trim_percentile: Option<f64>,

    /// Random seed shared by both clustering fits
    #[arg(long)]
    seed: Option<u64>,

    /// Use the population standard deviation instead of the sample one
    #[arg(long)]
    population_std: bool,

    /// TOML file with run parameters; flags override it
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Emit one JSON object per file
    #[arg(long)]
    json: bool,

    /// Stop at the first file that fails
    #[arg(long)]
    fail_fast: bool,

    /// Process files in parallel
    #[arg(long)]
    parallel: bool,

    /// Print every outlier
    #[arg(long)]
    list_outliers: bool,
}

impl DetectionArgs {
    fn build_config(&self) -> Result<DetectorConfig> {
        let mut config = match &self.config {
            Some(path) => DetectorConfig::from_toml_file(path)?,
            None => DetectorConfig::default(),
        };
        if let Some(k) = self.k {
            config = config.with_n_clusters(k);
        }
        if let Some(n_init) = self.n_init {
            config = config.with_n_init(n_init);
        }
        if let Some(sigma) = self.sigma {
            config = config.with_sigma_final(sigma);
        }
        if let Some(p) = self.trim_percentile {
            config = config.with_trim_percentile(p);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if self.population_std {
            config = config.with_std_dev(StdDev::Population);
        }
        config.validate()?;
        Ok(config)
    }
}

type Result<T> = std::result::Result<T, CliError>;

#[derive(Error, Debug)]
enum CliError {
    /// Input file missing or unusable
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    /// Bad run parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Detection run failed
    #[error("Detection failed: {0}")]
    Detection(String),
}

impl CliError {
    fn code(&self) -> u8 {
        match self {
            Self::Detection(_) => 1,
            Self::DataUnavailable(_) => 3,
            Self::InvalidConfig(_) => 4,
            Self::Io(_) => 7,
        }
    }

    fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code())
    }
}

impl From<OutlierError> for CliError {
    fn from(e: OutlierError) -> Self {
        match e {
            OutlierError::Io(io) => Self::Io(io),
            OutlierError::DataUnavailable { .. } | OutlierError::Csv(_) => {
                Self::DataUnavailable(e.to_string())
            }
            OutlierError::InvalidHyperparameter { .. } | OutlierError::Config(_) => {
                Self::InvalidConfig(e.to_string())
            }
            other => Self::Detection(other.to_string()),
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let default = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn section(title: &str) {
    println!("{}", format!("=== {title} ===").cyan().bold());
}

fn kv(key: &str, value: impl std::fmt::Display) {
    println!("  {}: {}", key.white().bold(), value);
}

fn error(msg: &str) {
    eprintln!("{} {}", "[ERROR]".red().bold(), msg);
}

fn print_cleaning(source: &Path, report: &CleaningReport) {
    section(&format!("clean {}", source.display()));
    kv("Original rows", report.original_count);
    kv("Bad lines skipped", report.bad_lines);
    kv("Invalid rows dropped", report.invalid_dropped);
    kv("Duplicates dropped", report.duplicates_dropped);
    kv("Clean rows", report.clean_count);
}

fn clean(input: &Path, output: &Path, quiet: bool) -> Result<()> {
    let outcome = DataCleaner::clean_file(input)?;
    write_clean_csv(&outcome.dataset, output)?;
    if !quiet {
        print_cleaning(input, &outcome.report);
        kv("Written to", output.display());
    }
    Ok(())
}

fn detect(
    files: &[PathBuf],
    args: &DetectionArgs,
    clean_dir: Option<&Path>,
    quiet: bool,
) -> Result<()> {
    let config = args.build_config()?;
    info!(
        k = config.n_clusters,
        n_init = config.n_init,
        sigma = config.sigma_final,
        files = files.len(),
        "starting detection"
    );

    let mut runner = BatchRunner::new(config).with_parallel(args.parallel);
    if let Some(dir) = clean_dir {
        std::fs::create_dir_all(dir)?;
        runner = runner.with_clean_dir(dir);
    }

    let mut sink: Box<dyn ReportingSink> = if args.json {
        Box::new(JsonReporter::new(io::stdout()))
    } else {
        Box::new(ConsoleReporter::new(io::stdout()).with_outlier_list(args.list_outliers))
    };

    let outcomes: Vec<FileOutcome> = if args.fail_fast && !args.parallel {
        let mut outcomes = Vec::with_capacity(files.len());
        for path in files {
            let outcome = runner.process(path);
            let failed = !outcome.is_ok();
            outcomes.push(outcome);
            if failed {
                break;
            }
        }
        outcomes
    } else {
        runner.run(files)
    };

    let mut first_failure: Option<CliError> = None;
    for outcome in outcomes {
        if let Some(cleaning) = &outcome.cleaning {
            if !quiet && !args.json {
                print_cleaning(&outcome.path, cleaning);
            }
        }
        match outcome.result {
            Ok(report) => {
                if !quiet || args.json {
                    sink.report(&outcome.path.display().to_string(), &report)?;
                }
            }
            Err(e) => {
                let e = CliError::from(e);
                if args.fail_fast {
                    return Err(e);
                }
                error(&format!("{}: {e}", outcome.path.display()));
                first_failure.get_or_insert(e);
            }
        }
    }
    first_failure.map_or(Ok(()), Err)
}

fn execute(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Clean { input, output } => clean(input, output, cli.quiet),
        Commands::Detect { files, detection } => detect(files, detection, None, cli.quiet),
        Commands::Run {
            files,
            out_dir,
            detection,
        } => detect(files, detection, Some(out_dir.as_path()), cli.quiet),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match execute(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error(&e.to_string());
            e.exit_code()
        }
    }
}
