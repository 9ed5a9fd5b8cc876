use clap::Parser;
use pricebot_processor::cli::{args::Args, commands};
use std::process;
use tokio_util::sync::CancellationToken;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    // Create async runtime and run the main command logic with signal handling
    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        // Cancellation token shared with the soft-stop logic in the
        // estimate command
        let cancellation_token = CancellationToken::new();

        let signal_token = cancellation_token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("\nStop requested; finishing a few more rows before writing out...");
                signal_token.cancel();
            }
        });

        commands::run(args, cancellation_token).await
    });

    match result {
        Ok(_stats) => {
            // Success - stats have already been reported by the command
            process::exit(0);
        }
        Err(error) => {
            // Error occurred - print to stderr and exit with error code
            eprintln!("Error: {}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("PriceBot Processor - Property Valuation Toolkit");
    println!("===============================================");
    println!();
    println!("Clean valuation reports, estimate property values against the scraped");
    println!("comparables database, and maintain the database itself.");
    println!();
    println!("USAGE:");
    println!("    pricebot <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    resolve     Fill missing address fields in a report from the gazetteer");
    println!("    estimate    Resolve addresses and write value estimates into a report");
    println!("    merge       Merge per-region scraped CSV files into one comparables table");
    println!("    clean       Clean and back-fill the comparables database in place");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Fill address gaps in a report:");
    println!("    pricebot resolve raport.csv --gazetteer teryt.csv");
    println!();
    println!("    # Value a report against the comparables database:");
    println!("    pricebot estimate raport.csv --database \"Polska.csv\" --margin 15 --discount 15");
    println!();
    println!("    # Merge region files with sorting:");
    println!("    pricebot merge ./wojewodztwa --sort");
    println!();
    println!("    # Clean the database and back-fill addresses:");
    println!("    pricebot clean \"Polska.csv\" --gazetteer teryt.csv");
    println!();
    println!("For detailed help on any command, use:");
    println!("    pricebot <COMMAND> --help");
}
