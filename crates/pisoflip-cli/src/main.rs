mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::deal::{AnalyzeArgs, RebalanceArgs};
use commands::tax::ProfitTaxArgs;

/// Buy-refurbish-sell real estate deal analysis
#[derive(Parser)]
#[command(
    name = "pisoflip",
    version,
    about = "Buy-refurbish-sell real estate deal analysis",
    long_about = "Analyze acquisition-renovation-disposition property deals with \
                  decimal precision: purchase and renovation cost stacks, sale \
                  profitability, per-investor financing and tax breakdowns, and \
                  dual-scenario rental yields."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full deal analysis on a DealInput JSON document
    Analyze(AnalyzeArgs),
    /// Compute the profit tax for a single figure and tax subject
    ProfitTax(ProfitTaxArgs),
    /// Redistribute investor shares evenly across a new investor count
    Rebalance(RebalanceArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Analyze(args) => commands::deal::run_analyze(args),
        Commands::ProfitTax(args) => commands::tax::run_profit_tax(args),
        Commands::Rebalance(args) => commands::deal::run_rebalance(args),
        Commands::Version => {
            println!("pisoflip {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
