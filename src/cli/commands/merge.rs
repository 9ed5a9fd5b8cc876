//! Merge command implementation
//!
//! Discovers the per-region CSV files, merges them into the canonical
//! comparables table and writes the result with a timestamped default name.

use std::time::Instant;

use chrono::Local;
use colored::Colorize;
use tracing::{debug, info};

use super::shared::{RunStats, setup_logging};
use crate::app::services::merger::{default_output_name, discover_region_files, merge_files};
use crate::app::services::report::writer::write_table;
use crate::cli::args::MergeArgs;
use crate::Result;

/// Merge command runner
pub async fn run_merge(args: MergeArgs) -> Result<RunStats> {
    let start_time = Instant::now();

    setup_logging(args.get_log_level(), args.quiet)?;
    info!("Starting region merge");
    debug!("Command line arguments: {:?}", args);

    args.validate()?;

    let files = discover_region_files(&args.input_dir, &args.pattern)?;
    info!(files = files.len(), "discovered region files");

    let merged = merge_files(&files, args.sort)?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| args.input_dir.join(default_output_name(Local::now())));
    write_table(&output, b';', &merged.headers, &merged.rows)?;

    let stats = RunStats {
        rows_processed: merged.stats.rows_read,
        files_merged: merged.stats.files,
        duplicates_removed: merged.stats.duplicates,
        processing_time: start_time.elapsed(),
        ..RunStats::default()
    };

    if args.json {
        let json_stats = serde_json::json!({
            "files_merged": merged.stats.files,
            "rows_read": merged.stats.rows_read,
            "rows_written": merged.stats.rows_written,
            "duplicates_removed": merged.stats.duplicates,
            "split_prices_repaired": merged.stats.repaired,
            "malformed_rows": merged.stats.malformed,
            "output": output.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&json_stats).unwrap());
    } else if !args.quiet {
        println!();
        println!("{}", "Merge complete".green().bold());
        println!("   Files merged:       {}", merged.stats.files);
        println!("   Rows read:          {}", merged.stats.rows_read);
        println!("   Rows written:       {}", merged.stats.rows_written);
        println!("   Duplicates removed: {}", merged.stats.duplicates);
        if merged.stats.repaired > 0 {
            println!("   Split prices fixed: {}", merged.stats.repaired);
        }
        if merged.stats.malformed > 0 {
            println!(
                "   {} {}",
                "Malformed rows kept with error column:".yellow(),
                merged.stats.malformed
            );
        }
        println!("   Output: {}", output.display().to_string().cyan());
    }

    Ok(stats)
}
