//! Estimate command implementation
//!
//! The full valuation pass: resolve each row's address, select comparables
//! from the database, fence outliers, and write the three value columns back
//! into the report. Rows whose address cannot be completed from any
//! reference source get the manual-review placeholder instead of numbers.
//!
//! Cancellation is soft: on Ctrl+C the pass finishes a bounded number of
//! additional rows, then writes out everything computed so far. A row's
//! valuation always completes once started.

use std::time::Instant;

use colored::Colorize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::shared::{RunStats, create_progress_bar, setup_logging};
use crate::app::services::comparables::estimator::estimate_row;
use crate::app::services::comparables::loader::load_database;
use crate::app::services::comparables::ComparablesDb;
use crate::app::services::gazetteer::loader::{load_gazetteer, load_optional_gazetteer};
use crate::app::services::gazetteer::resolver::{ResolverOptions, resolve};
use crate::app::services::gazetteer::Gazetteer;
use crate::app::services::numeric::format_number;
use crate::app::services::report::{Report, ReportSchema};
use crate::cli::args::EstimateArgs;
use crate::config::MatchingConfig;
use crate::constants::{MANUAL_REVIEW_PLACEHOLDER, VALUE_COLUMNS};
use crate::Result;

/// Per-run counters for the valuation pass
#[derive(Debug, Default, Clone, Copy)]
pub struct EstimateSummary {
    pub rows: usize,
    pub valued: usize,
    pub placeholders: usize,
    pub no_comparables: usize,
    pub interrupted: bool,
}

/// Estimate command runner
pub async fn run_estimate(
    args: EstimateArgs,
    cancellation_token: CancellationToken,
) -> Result<RunStats> {
    let start_time = Instant::now();

    setup_logging(args.get_log_level(), args.quiet)?;
    info!("Starting valuation run");
    debug!("Command line arguments: {:?}", args);

    args.validate()?;
    let config = args.matching_config();

    let database = load_database(&args.database)?;
    let gazetteer = load_gazetteer(&args.gazetteer_path())?;
    let courts = load_optional_gazetteer(&args.courts_path())?;
    let mut report = Report::load(&args.report)?;

    let progress = if args.quiet {
        None
    } else {
        Some(create_progress_bar(
            report.row_count() as u64,
            "Valuing rows",
        ))
    };

    let summary = estimate_report(
        &mut report,
        &database,
        &gazetteer,
        courts.as_ref(),
        &config,
        &cancellation_token,
        |_row| {
            if let Some(pb) = &progress {
                pb.inc(1);
            }
        },
    )?;

    if let Some(pb) = &progress {
        pb.finish_and_clear();
    }

    if summary.interrupted {
        warn!(
            rows = summary.rows,
            "stop requested; writing partial results"
        );
    }

    let output = args.output.as_deref().unwrap_or(&args.report);
    report.save_as(output)?;

    let stats = RunStats {
        rows_processed: summary.rows,
        rows_valued: summary.valued,
        placeholders: summary.placeholders,
        interrupted: summary.interrupted,
        processing_time: start_time.elapsed(),
        ..RunStats::default()
    };

    if args.json {
        print_json_summary(&summary, output.display().to_string());
    } else if !args.quiet {
        print_summary(&summary, output.display().to_string());
    }

    Ok(stats)
}

/// Value every report row, honoring the soft-stop contract.
///
/// After a cancellation request the loop finishes the configured number of
/// extra rows and stops; rows beyond that keep their existing cells.
pub fn estimate_report<F>(
    report: &mut Report,
    database: &ComparablesDb,
    primary: &Gazetteer,
    secondary: Option<&Gazetteer>,
    config: &MatchingConfig,
    cancellation_token: &CancellationToken,
    mut on_row: F,
) -> Result<EstimateSummary>
where
    F: FnMut(usize),
{
    let schema = ReportSchema::detect(report.headers());
    schema.require_area(&report.source().display().to_string())?;

    let value_columns: Vec<usize> = VALUE_COLUMNS
        .iter()
        .map(|name| report.ensure_column(name))
        .collect();

    let options = ResolverOptions::from(config);
    let mut summary = EstimateSummary::default();
    let mut extra_rows_left: Option<usize> = None;

    for row in 0..report.row_count() {
        if extra_rows_left.is_none() && cancellation_token.is_cancelled() {
            extra_rows_left = Some(config.soft_stop_extra_rows);
        }
        if let Some(left) = &mut extra_rows_left {
            if *left == 0 {
                summary.interrupted = true;
                break;
            }
            *left -= 1;
        }

        let mut address = schema.address_of(report, row);
        let filled = resolve(&mut address, primary, secondary, &options);
        for level in &filled {
            if let (Some(column), Some(value)) = (schema.index_of(*level), address.get(*level)) {
                report.set_cell(row, column, value.to_string());
            }
        }

        if !address.is_complete() {
            for column in &value_columns {
                report.set_cell(row, *column, MANUAL_REVIEW_PLACEHOLDER);
            }
            summary.placeholders += 1;
        } else {
            let area = schema.area_of(report, row);
            let estimate = estimate_row(database, &address, area, config);

            let cells = [
                estimate.valuation.average,
                estimate.valuation.adjusted,
                estimate.valuation.value,
            ];
            for (column, value) in value_columns.iter().zip(cells) {
                let text = value.map(format_number).unwrap_or_default();
                report.set_cell(row, *column, text);
            }

            if estimate.valuation.is_empty() {
                summary.no_comparables += 1;
            } else {
                summary.valued += 1;
            }
        }

        summary.rows += 1;
        on_row(row);
    }

    Ok(summary)
}

fn print_json_summary(summary: &EstimateSummary, output: String) {
    let json_stats = serde_json::json!({
        "rows_processed": summary.rows,
        "rows_valued": summary.valued,
        "no_comparables": summary.no_comparables,
        "manual_review": summary.placeholders,
        "interrupted": summary.interrupted,
        "output": output,
    });
    println!("{}", serde_json::to_string_pretty(&json_stats).unwrap());
}

fn print_summary(summary: &EstimateSummary, output: String) {
    println!();
    println!("{}", "Valuation complete".green().bold());
    println!("   Rows processed:   {}", summary.rows);
    println!("   Rows valued:      {}", summary.valued);
    println!("   No comparables:   {}", summary.no_comparables);
    if summary.placeholders > 0 {
        println!(
            "   {} {}",
            "Manual review needed:".yellow(),
            summary.placeholders
        );
    }
    if summary.interrupted {
        println!("   {}", "Stopped early on user request".yellow().bold());
    }
    println!("   Output: {}", output.cyan());
}
