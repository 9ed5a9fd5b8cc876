//! Resolve command implementation
//!
//! Loads a report and the reference gazetteers, then walks the rows filling
//! missing address fields. The report is written back (or to `--output`)
//! only after every row has been processed.

use std::time::Instant;

use colored::Colorize;
use tracing::{debug, info};

use super::shared::{RunStats, create_progress_bar, setup_logging};
use crate::app::services::gazetteer::loader::{load_gazetteer, load_optional_gazetteer};
use crate::app::services::gazetteer::resolver::{ResolverOptions, resolve};
use crate::app::services::gazetteer::Gazetteer;
use crate::app::services::report::{Report, ReportSchema};
use crate::cli::args::ResolveArgs;
use crate::Result;

/// Per-run counters for the resolution pass
#[derive(Debug, Default, Clone, Copy)]
pub struct ResolveSummary {
    pub rows: usize,
    pub fields_filled: usize,
    pub rows_completed: usize,
    pub rows_incomplete: usize,
}

/// Resolve command runner
pub async fn run_resolve(args: ResolveArgs) -> Result<RunStats> {
    let start_time = Instant::now();

    setup_logging(args.get_log_level(), args.quiet)?;
    info!("Starting address resolution");
    debug!("Command line arguments: {:?}", args);

    args.validate()?;

    let gazetteer = load_gazetteer(&args.gazetteer_path())?;
    let courts = load_optional_gazetteer(&args.courts_path())?;
    let mut report = Report::load(&args.report)?;

    let options = ResolverOptions {
        mode_city_backfill: !args.no_mode_city,
    };

    let progress = if args.quiet {
        None
    } else {
        Some(create_progress_bar(
            report.row_count() as u64,
            "Resolving addresses",
        ))
    };

    let summary = resolve_report(
        &mut report,
        &gazetteer,
        courts.as_ref(),
        &options,
        |_row| {
            if let Some(pb) = &progress {
                pb.inc(1);
            }
        },
    );

    if let Some(pb) = &progress {
        pb.finish_and_clear();
    }

    let output = args.output.as_deref().unwrap_or(&args.report);
    report.save_as(output)?;

    let stats = RunStats {
        rows_processed: summary.rows,
        fields_filled: summary.fields_filled,
        placeholders: 0,
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

/// Fill address gaps in every report row. The per-row callback drives
/// progress reporting.
pub fn resolve_report<F>(
    report: &mut Report,
    primary: &Gazetteer,
    secondary: Option<&Gazetteer>,
    options: &ResolverOptions,
    mut on_row: F,
) -> ResolveSummary
where
    F: FnMut(usize),
{
    let schema = ReportSchema::detect(report.headers());
    let mut summary = ResolveSummary::default();

    for row in 0..report.row_count() {
        let mut address = schema.address_of(report, row);
        let filled = resolve(&mut address, primary, secondary, options);

        for level in &filled {
            if let (Some(column), Some(value)) = (schema.index_of(*level), address.get(*level)) {
                report.set_cell(row, column, value.to_string());
                summary.fields_filled += 1;
            }
        }

        if address.is_complete() {
            summary.rows_completed += 1;
        } else {
            summary.rows_incomplete += 1;
        }
        summary.rows += 1;
        on_row(row);
    }

    summary
}

fn print_json_summary(summary: &ResolveSummary, output: String) {
    let json_stats = serde_json::json!({
        "rows_processed": summary.rows,
        "fields_filled": summary.fields_filled,
        "rows_completed": summary.rows_completed,
        "rows_incomplete": summary.rows_incomplete,
        "output": output,
    });
    println!("{}", serde_json::to_string_pretty(&json_stats).unwrap());
}

fn print_summary(summary: &ResolveSummary, output: String) {
    println!();
    println!("{}", "Address resolution complete".green().bold());
    println!("   Rows processed:      {}", summary.rows);
    println!("   Fields filled:       {}", summary.fields_filled);
    println!("   Complete addresses:  {}", summary.rows_completed);
    if summary.rows_incomplete > 0 {
        println!(
            "   {} {}",
            "Still incomplete:".yellow(),
            summary.rows_incomplete
        );
    }
    println!("   Output: {}", output.cyan());
}
