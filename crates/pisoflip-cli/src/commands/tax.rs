use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::{json, Value};

use pisoflip_core::deal::input::TaxSubject;
use pisoflip_core::deal::tax::profit_tax;

#[derive(Debug, Clone, ValueEnum)]
pub enum SubjectArg {
    Individual,
    Company,
}

/// Arguments for the standalone profit-tax calculation
#[derive(Args)]
pub struct ProfitTaxArgs {
    /// Profit amount (negative values are allowed)
    #[arg(long, allow_hyphen_values = true)]
    pub profit: Decimal,

    /// Tax subject type
    #[arg(long, value_enum, default_value = "individual")]
    pub subject: SubjectArg,
}

pub fn run_profit_tax(args: ProfitTaxArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let subject = match args.subject {
        SubjectArg::Individual => TaxSubject::Individual,
        SubjectArg::Company => TaxSubject::Company,
    };
    let tax = profit_tax(args.profit, subject);

    Ok(json!({
        "profit": args.profit,
        "subject": subject,
        "tax_amount": tax,
        "net_profit": args.profit - tax,
    }))
}
