//! Shared components for CLI commands
//!
//! Common statistics, logging setup and progress reporting used across the
//! subcommand implementations.

use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use crate::Result;

/// Run statistics for reporting across all commands
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// Rows read from the primary input
    pub rows_processed: usize,
    /// Address fields filled during resolution
    pub fields_filled: usize,
    /// Rows that received a computed valuation
    pub rows_valued: usize,
    /// Rows marked with the manual-review placeholder
    pub placeholders: usize,
    /// Region files merged
    pub files_merged: usize,
    /// Duplicate rows removed during a merge
    pub duplicates_removed: usize,
    /// Whether the run stopped early on a cancellation request
    pub interrupted: bool,
    /// Total processing time
    pub processing_time: std::time::Duration,
}

/// Set up structured logging shared by all commands
pub fn setup_logging(level: &str, quiet: bool) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pricebot_processor={level}")));

    if quiet {
        // Minimal logging for quiet mode
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        // Standard logging with timestamps
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", level);
    Ok(())
}

/// Create a progress bar with appropriate styling
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    pb.set_message(message.to_string());
    pb
}
