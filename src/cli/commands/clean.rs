//! Clean command implementation
//!
//! Repairs the comparables database in place: price digits, derived
//! price-per-m², streets recovered from links, and address back-fill from
//! the table itself and from the gazetteer.

use std::time::Instant;

use colored::Colorize;
use tracing::{debug, info};

use super::shared::{RunStats, setup_logging};
use crate::app::services::cleaner::clean_database;
use crate::app::services::gazetteer::loader::load_optional_gazetteer;
use crate::app::services::report::Report;
use crate::cli::args::CleanArgs;
use crate::config::MatchingConfig;
use crate::Result;

/// Clean command runner
pub async fn run_clean(args: CleanArgs) -> Result<RunStats> {
    let start_time = Instant::now();

    setup_logging(args.get_log_level(), args.quiet)?;
    info!("Starting database cleaning");
    debug!("Command line arguments: {:?}", args);

    args.validate()?;

    let gazetteer = load_optional_gazetteer(&args.gazetteer_path())?;
    let mut report = Report::load(&args.database)?;

    let clean_stats = clean_database(&mut report, gazetteer.as_ref(), &MatchingConfig::default())?;

    let output = args.output.as_deref().unwrap_or(&args.database);
    report.save_as(output)?;

    let stats = RunStats {
        rows_processed: report.row_count(),
        fields_filled: clean_stats.internal_fills + clean_stats.gazetteer_fills,
        processing_time: start_time.elapsed(),
        ..RunStats::default()
    };

    if args.json {
        let json_stats = serde_json::json!({
            "rows_processed": report.row_count(),
            "prices_cleaned": clean_stats.prices_cleaned,
            "prices_per_m2_updated": clean_stats.prices_per_m2_updated,
            "streets_from_links": clean_stats.streets_from_links,
            "internal_fills": clean_stats.internal_fills,
            "gazetteer_fills": clean_stats.gazetteer_fills,
            "output": output.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&json_stats).unwrap());
    } else if !args.quiet {
        println!();
        println!("{}", "Database cleaning complete".green().bold());
        println!("   Rows processed:      {}", report.row_count());
        println!("   Prices cleaned:      {}", clean_stats.prices_cleaned);
        println!("   Price/m² updated:    {}", clean_stats.prices_per_m2_updated);
        println!("   Streets from links:  {}", clean_stats.streets_from_links);
        println!("   Internal fills:      {}", clean_stats.internal_fills);
        println!("   Gazetteer fills:     {}", clean_stats.gazetteer_fills);
        println!("   Output: {}", output.display().to_string().cyan());
    }

    Ok(stats)
}
