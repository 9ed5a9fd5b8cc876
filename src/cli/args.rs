//! Command-line argument definitions for the PriceBot processor
//!
//! The CLI interface uses the clap derive API. Each subcommand owns its
//! arguments and validates them before any file is touched.

use crate::constants::{
    DEFAULT_AREA_MARGIN_M2, DEFAULT_COURTS_FILE, DEFAULT_DISCOUNT_PCT, DEFAULT_GAZETTEER_FILE,
    MERGE_FILE_PATTERN,
};
use crate::{Error, MatchingConfig, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// CLI arguments for the PriceBot processor
///
/// Cleans property valuation reports, estimates property values against the
/// scraped comparables database, and maintains the database itself.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "pricebot",
    version,
    about = "Clean valuation reports and estimate property values from scraped comparables",
    long_about = "A batch tool for property valuation workflows: fills gaps in report address \
                  columns from a canonical gazetteer, selects comparable listings by area and \
                  location, fences price outliers, writes valuations back into the report, and \
                  consolidates per-region scraped CSV files into one comparables database."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands for the PriceBot processor
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Fill missing address fields in a report from the gazetteer
    Resolve(ResolveArgs),
    /// Resolve addresses and write value estimates into a report
    Estimate(EstimateArgs),
    /// Merge per-region scraped CSV files into one comparables table
    Merge(MergeArgs),
    /// Clean and back-fill the comparables database in place
    Clean(CleanArgs),
}

/// Arguments for the resolve command
#[derive(Debug, Clone, Parser)]
pub struct ResolveArgs {
    /// Report file to resolve (CSV)
    #[arg(value_name = "REPORT")]
    pub report: PathBuf,

    /// Gazetteer file with the five administrative columns
    ///
    /// If not specified, looks for teryt.csv in the working directory.
    #[arg(
        short = 'g',
        long = "gazetteer",
        value_name = "FILE",
        help = "Path to the gazetteer CSV"
    )]
    pub gazetteer: Option<PathBuf>,

    /// Secondary court-district table consulted for fields the gazetteer
    /// cannot fill
    ///
    /// If not specified, looks for obszar_sadow.csv in the working
    /// directory; a missing file is simply skipped.
    #[arg(
        long = "courts",
        value_name = "FILE",
        help = "Path to the secondary court-district CSV"
    )]
    pub courts: Option<PathBuf>,

    /// Disable the mode-city heuristic
    ///
    /// By default a missing city is filled with the most common city of the
    /// narrowed gazetteer subset when the municipality is known. This is the
    /// only fill that accepts a non-unique answer.
    #[arg(long = "no-mode-city", help = "Fill the city only when it is unique")]
    pub no_mode_city: bool,

    /// Write the result to a different file instead of overwriting the report
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help = "Output path (default: overwrite the report)"
    )]
    pub output: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Print the run summary as JSON instead of the human-readable report
    #[arg(long = "json", help = "Machine-readable summary output", conflicts_with = "quiet")]
    pub json: bool,
}

/// Arguments for the estimate command
#[derive(Debug, Clone, Parser)]
pub struct EstimateArgs {
    /// Report file to value (CSV)
    #[arg(value_name = "REPORT")]
    pub report: PathBuf,

    /// Comparables database produced by the merge command
    #[arg(
        short = 'd',
        long = "database",
        value_name = "FILE",
        help = "Path to the comparables database CSV"
    )]
    pub database: PathBuf,

    /// Gazetteer file with the five administrative columns
    #[arg(
        short = 'g',
        long = "gazetteer",
        value_name = "FILE",
        help = "Path to the gazetteer CSV"
    )]
    pub gazetteer: Option<PathBuf>,

    /// Secondary court-district table
    #[arg(
        long = "courts",
        value_name = "FILE",
        help = "Path to the secondary court-district CSV"
    )]
    pub courts: Option<PathBuf>,

    /// Area window half-width in m²
    ///
    /// Comparables must have an area within this margin of the subject area.
    #[arg(
        short = 'm',
        long = "margin",
        value_name = "M2",
        default_value_t = DEFAULT_AREA_MARGIN_M2,
        help = "Area window half-width in m²"
    )]
    pub margin: f64,

    /// Percentage discount applied to the average price per m²
    #[arg(
        long = "discount",
        value_name = "PCT",
        default_value_t = DEFAULT_DISCOUNT_PCT,
        help = "Discount percentage in [0, 100]"
    )]
    pub discount: f64,

    /// Disable the mode-city heuristic during address resolution
    #[arg(long = "no-mode-city", help = "Fill the city only when it is unique")]
    pub no_mode_city: bool,

    /// Write the result to a different file instead of overwriting the report
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help = "Output path (default: overwrite the report)"
    )]
    pub output: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Print the run summary as JSON instead of the human-readable report
    #[arg(long = "json", help = "Machine-readable summary output", conflicts_with = "quiet")]
    pub json: bool,
}

/// Arguments for the merge command
#[derive(Debug, Clone, Parser)]
pub struct MergeArgs {
    /// Directory containing the per-region CSV files
    #[arg(value_name = "INPUT_DIR")]
    pub input_dir: PathBuf,

    /// Output file for the merged table
    ///
    /// If not specified, a timestamped "Polska (HH.MM dd.mm.YYYY).csv" is
    /// written into the input directory.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help = "Output path for the merged CSV"
    )]
    pub output: Option<PathBuf>,

    /// Glob pattern selecting the region files
    #[arg(
        long = "pattern",
        value_name = "GLOB",
        default_value = MERGE_FILE_PATTERN,
        help = "File pattern inside the input directory"
    )]
    pub pattern: String,

    /// Sort the merged table by province, city and district
    #[arg(long = "sort", help = "Sort rows by province, city, district")]
    pub sort: bool,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Print the run summary as JSON instead of the human-readable report
    #[arg(long = "json", help = "Machine-readable summary output", conflicts_with = "quiet")]
    pub json: bool,
}

/// Arguments for the clean command
#[derive(Debug, Clone, Parser)]
pub struct CleanArgs {
    /// Comparables database file to clean (CSV)
    #[arg(value_name = "DATABASE")]
    pub database: PathBuf,

    /// Gazetteer used for the final back-fill pass
    ///
    /// If not specified, looks for teryt.csv in the working directory; a
    /// missing file skips the gazetteer pass.
    #[arg(
        short = 'g',
        long = "gazetteer",
        value_name = "FILE",
        help = "Path to the gazetteer CSV"
    )]
    pub gazetteer: Option<PathBuf>,

    /// Write the result to a different file instead of overwriting in place
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help = "Output path (default: overwrite the database)"
    )]
    pub output: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Print the run summary as JSON instead of the human-readable report
    #[arg(long = "json", help = "Machine-readable summary output", conflicts_with = "quiet")]
    pub json: bool,
}

impl Args {
    /// Get the command if one was specified
    pub fn get_command(&self) -> Commands {
        self.command
            .clone()
            .expect("Command should be present when get_command() is called")
    }
}

/// Locate a reference file using standard directory conventions: the working
/// directory wins when the file is there, otherwise the per-user data
/// directory is used
fn reference_path(file: &str) -> PathBuf {
    let local = PathBuf::from(file);
    if local.is_file() {
        return local;
    }
    dirs::data_dir()
        .map(|dir| dir.join("pricebot").join(file))
        .unwrap_or(local)
}

fn require_file(path: &Path, what: &str) -> Result<()> {
    if !path.exists() {
        return Err(Error::configuration(format!(
            "{what} does not exist: {}",
            path.display()
        )));
    }
    if !path.is_file() {
        return Err(Error::configuration(format!(
            "{what} is not a file: {}",
            path.display()
        )));
    }
    Ok(())
}

fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

impl ResolveArgs {
    /// Validate the resolve command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        require_file(&self.report, "Report file")?;
        if let Some(gazetteer) = &self.gazetteer {
            require_file(gazetteer, "Gazetteer file")?;
        }
        Ok(())
    }

    /// Effective gazetteer path: explicit flag, working directory, then the
    /// per-user data directory
    pub fn gazetteer_path(&self) -> PathBuf {
        self.gazetteer
            .clone()
            .unwrap_or_else(|| reference_path(DEFAULT_GAZETTEER_FILE))
    }

    /// Effective court-table path: explicit flag, working directory, then the
    /// per-user data directory
    pub fn courts_path(&self) -> PathBuf {
        self.courts
            .clone()
            .unwrap_or_else(|| reference_path(DEFAULT_COURTS_FILE))
    }

    /// Get the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        log_level(self.verbose)
    }
}

impl EstimateArgs {
    /// Validate the estimate command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        require_file(&self.report, "Report file")?;
        require_file(&self.database, "Comparables database")?;
        if let Some(gazetteer) = &self.gazetteer {
            require_file(gazetteer, "Gazetteer file")?;
        }
        self.matching_config().validate()
    }

    /// Matching configuration assembled from the tuning flags
    pub fn matching_config(&self) -> MatchingConfig {
        let config = MatchingConfig::default()
            .with_area_margin(self.margin)
            .with_discount(self.discount);
        if self.no_mode_city {
            config.without_mode_city_backfill()
        } else {
            config
        }
    }

    /// Effective gazetteer path: explicit flag, working directory, then the
    /// per-user data directory
    pub fn gazetteer_path(&self) -> PathBuf {
        self.gazetteer
            .clone()
            .unwrap_or_else(|| reference_path(DEFAULT_GAZETTEER_FILE))
    }

    /// Effective court-table path: explicit flag, working directory, then the
    /// per-user data directory
    pub fn courts_path(&self) -> PathBuf {
        self.courts
            .clone()
            .unwrap_or_else(|| reference_path(DEFAULT_COURTS_FILE))
    }

    /// Get the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        log_level(self.verbose)
    }
}

impl MergeArgs {
    /// Validate the merge command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if !self.input_dir.is_dir() {
            return Err(Error::configuration(format!(
                "Input directory does not exist or is not a directory: {}",
                self.input_dir.display()
            )));
        }
        if self.pattern.trim().is_empty() {
            return Err(Error::configuration("File pattern cannot be empty"));
        }
        Ok(())
    }

    /// Get the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        log_level(self.verbose)
    }
}

impl CleanArgs {
    /// Validate the clean command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        require_file(&self.database, "Comparables database")?;
        if let Some(gazetteer) = &self.gazetteer {
            require_file(gazetteer, "Gazetteer file")?;
        }
        Ok(())
    }

    /// Effective gazetteer path: explicit flag, working directory, then the
    /// per-user data directory
    pub fn gazetteer_path(&self) -> PathBuf {
        self.gazetteer
            .clone()
            .unwrap_or_else(|| reference_path(DEFAULT_GAZETTEER_FILE))
    }

    /// Get the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        log_level(self.verbose)
    }
}
