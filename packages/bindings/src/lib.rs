use napi::Result as NapiResult;
use napi_derive::napi;

use pisoflip_core::deal::analysis;
use pisoflip_core::deal::input::{self, DealInput, Investor, TaxSubject};
use pisoflip_core::deal::tax;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Full deal analysis: DealInput JSON in, ComputationOutput JSON out.
#[napi]
pub fn analyze_deal(input_json: String) -> NapiResult<String> {
    let deal: DealInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = analysis::analyze(&deal);
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Redistribute investor shares evenly across `count` investors.
#[napi]
pub fn rebalance_investors(investors_json: String, count: u32) -> NapiResult<String> {
    let investors: Vec<Investor> =
        serde_json::from_str(&investors_json).map_err(to_napi_error)?;
    let rebalanced = input::rebalance(&investors, count as usize);
    serde_json::to_string(&rebalanced).map_err(to_napi_error)
}

/// Profit tax for a single figure. `subject` is "individual" or "company".
#[napi]
pub fn profit_tax(profit: String, subject: String) -> NapiResult<String> {
    let profit = Decimal::from_str(&profit).map_err(to_napi_error)?;
    let subject: TaxSubject =
        serde_json::from_value(serde_json::Value::String(subject)).map_err(to_napi_error)?;
    let amount = tax::profit_tax(profit, subject);
    serde_json::to_string(&amount).map_err(to_napi_error)
}
