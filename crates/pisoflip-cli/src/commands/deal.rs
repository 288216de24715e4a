use clap::Args;
use serde_json::Value;

use pisoflip_core::deal::analysis;
use pisoflip_core::deal::input::{self, DealInput, Investor};

use crate::input as cli_input;

/// Arguments for the full deal analysis
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Path to a DealInput JSON file (stdin is used when piped)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for investor rebalancing
#[derive(Args)]
pub struct RebalanceArgs {
    /// New number of investors
    #[arg(long)]
    pub count: usize,

    /// Path to an investor-list JSON file (stdin is used when piped)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let deal: DealInput = read_typed(args.input.as_deref(), "deal analysis")?;
    let result = analysis::analyze(&deal);
    Ok(serde_json::to_value(result)?)
}

pub fn run_rebalance(args: RebalanceArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let investors: Vec<Investor> = read_typed(args.input.as_deref(), "rebalance")?;
    let rebalanced = input::rebalance(&investors, args.count);
    Ok(serde_json::to_value(rebalanced)?)
}

fn read_typed<T: serde::de::DeserializeOwned>(
    path: Option<&str>,
    context: &str,
) -> Result<T, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        cli_input::file::read_json(path)
    } else if let Some(raw) = cli_input::stdin::read_piped()? {
        parse_input(&raw)
    } else {
        Err(format!("--input <file.json> or stdin required for {context}").into())
    }
}

/// Single typed parse for piped input, shared by every subcommand that
/// accepts a JSON document.
fn parse_input<T: serde::de::DeserializeOwned>(
    raw: &str,
) -> Result<T, Box<dyn std::error::Error>> {
    Ok(serde_json::from_str(raw)?)
}
