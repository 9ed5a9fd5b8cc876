//! Command implementations for the PriceBot processor CLI
//!
//! Each subcommand lives in its own module; this module dispatches parsed
//! arguments to the right one and re-exports the shared statistics type.

pub mod clean;
pub mod estimate;
pub mod merge;
pub mod resolve;
pub mod shared;

pub use shared::RunStats;

use tokio_util::sync::CancellationToken;

use crate::Result;
use crate::cli::args::{Args, Commands};

/// Main command runner for the PriceBot processor
///
/// Dispatches to the appropriate subcommand handler based on CLI args:
/// - `resolve`: fill report address gaps from the gazetteer
/// - `estimate`: resolve addresses and write valuations into a report
/// - `merge`: consolidate per-region CSV files into one table
/// - `clean`: repair and back-fill the comparables database
pub async fn run(args: Args, cancellation_token: CancellationToken) -> Result<RunStats> {
    match args.get_command() {
        Commands::Resolve(resolve_args) => resolve::run_resolve(resolve_args).await,
        Commands::Estimate(estimate_args) => {
            estimate::run_estimate(estimate_args, cancellation_token).await
        }
        Commands::Merge(merge_args) => merge::run_merge(merge_args).await,
        Commands::Clean(clean_args) => clean::run_clean(clean_args).await,
    }
}
