use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::deal::input::{
    participation_balanced, participation_total, DealInput, InvestorId, LoanBasis, RentalModel,
    TaxSubject,
};
use crate::deal::tax::{profit_tax, CLEANING_FEE_MONTHLY, STANDARD_VAT, SUPPLY_SETUP_FEE};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// One investor's slice of the deal: profit, tax, and financing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestorBreakdown {
    pub id: InvestorId,
    pub participation: Percent,
    #[serde(rename = "type")]
    pub tax_subject: TaxSubject,
    pub gross_profit: Money,
    pub tax_amount: Money,
    pub net_profit: Money,
    pub capital_provided: Money,
    pub loan_amount: Money,
    pub loan_associated_costs: Money,
}

/// Every intermediate line item, for full-itemisation display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationDetails {
    // Purchase
    pub property_value: Money,
    pub purchase_tax: Money,
    pub notary_fees: Money,
    pub registry_fees: Money,
    pub agency_fees: Money,
    pub brokerage_fees: Money,

    // Renovation and other costs
    pub renovation_base_cost: Money,
    pub renovation_vat: Money,
    pub furniture_base_cost: Money,
    pub furniture_vat: Money,
    pub contingency_amount: Money,
    pub general_expenses: Money,
    pub technical_fees_base: Money,
    pub technical_fees_vat: Money,
    pub icio_tax: Money,
    pub supply_setup_cost: Money,

    // Sale costs
    pub capital_gains_tax: Money,
    pub cee_cost: Money,
    pub notary_sale_cost: Money,

    // Rental (selected scenario)
    pub gross_annual_rent: Money,
    pub annual_expenses: Money,
    pub net_annual_rent: Money,
    pub gross_rental_yield: Percent,
    pub net_rental_yield: Percent,
}

/// Rental figures for one letting scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentalAnalysis {
    pub monthly_rent: Money,
    pub gross_annual_rent: Money,
    pub annual_expenses: Money,
    pub net_annual_rent: Money,
    pub gross_rental_yield: Percent,
    pub net_rental_yield: Percent,
}

/// Both letting scenarios, always fully computed so the caller can switch
/// the displayed model without re-running the analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentalScenarios {
    pub whole_unit: RentalAnalysis,
    pub per_room: RentalAnalysis,
}

/// Complete derived output of one deal analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationResult {
    pub total_project_cost: Money,
    /// Profit before tax over total project cost, in percent
    pub sale_profitability: Percent,
    pub sale_profit_before_tax: Money,
    pub net_profit_after_tax: Money,

    pub total_purchase_cost: Money,
    pub total_renovation_cost: Money,
    /// ICIO share of the renovation total, for the summary split
    pub total_licenses_cost: Money,
    /// Supply setup + general expenses + gross technical fees
    pub total_other_costs: Money,

    pub loan_amount: Money,
    pub loan_associated_costs: Money,
    pub total_capital_provided: Money,

    pub investor_breakdown: Vec<InvestorBreakdown>,
    pub details: CalculationDetails,

    /// Convenience yields mirroring the selected rental model
    pub gross_rental_yield: Percent,
    pub net_rental_yield: Percent,
    pub rental_analysis: RentalScenarios,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Analyze a buy-refurbish-sell deal.
///
/// Total and pure: the same input always yields the same
/// `CalculationResult`, and no input ever fails. Purity applies to the
/// `result` field only; `metadata.computation_time_us` is wall-clock and
/// varies between calls. Numeric edge cases resolve
/// to documented defaults (cost-based ratios are 0 when total cost is 0,
/// unrecognised tax schemes use the fallback rate) so the editing surface
/// can render continuously mid-edit. Participations that do not sum to
/// 100% are the caller's problem; the analysis runs anyway and only notes
/// it as a warning.
pub fn analyze(input: &DealInput) -> ComputationOutput<CalculationResult> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    collect_warnings(input, &mut warnings);

    // --- 1. Purchase costs ---
    let purchase_tax = input.property_value * input.purchase_tax_scheme.rate();
    let total_purchase_cost = input.property_value
        + purchase_tax
        + input.notary_fees
        + input.registry_fees
        + input.agency_fees
        + input.brokerage_fees;

    // --- 2. Renovation, licences and other costs ---
    let reno = compute_renovation(input);

    // --- 3. Total project cost ---
    let total_project_cost = total_purchase_cost + reno.total;
    if total_project_cost <= Decimal::ZERO {
        warnings.push("Total project cost is not positive; cost-based ratios are reported as 0".into());
    }

    // --- 4. Sale projection ---
    let capital_gains_tax = input.sale_price * pct(input.capital_gains_tax_rate);
    let total_sale_expenses = capital_gains_tax + input.cee_cost + input.notary_sale_cost;
    let sale_profit_before_tax = input.sale_price - total_project_cost - total_sale_expenses;
    let sale_profitability = ratio_pct(sale_profit_before_tax, total_project_cost);

    // --- 5/6. Financing and per-investor breakdown ---
    let investor_breakdown =
        compute_investor_breakdown(input, total_project_cost, sale_profit_before_tax);

    let loan_amount: Money = investor_breakdown.iter().map(|b| b.loan_amount).sum();
    let loan_associated_costs: Money = investor_breakdown
        .iter()
        .map(|b| b.loan_associated_costs)
        .sum();
    let total_capital_provided: Money =
        investor_breakdown.iter().map(|b| b.capital_provided).sum();
    let net_profit_after_tax: Money = investor_breakdown.iter().map(|b| b.net_profit).sum();

    // --- 7. Rental yield, both scenarios ---
    let rental_analysis = RentalScenarios {
        whole_unit: compute_rental(input, RentalModel::WholeUnit, total_project_cost),
        per_room: compute_rental(input, RentalModel::PerRoom, total_project_cost),
    };
    let selected = match input.rental_model {
        RentalModel::WholeUnit => &rental_analysis.whole_unit,
        RentalModel::PerRoom => &rental_analysis.per_room,
    };

    let details = CalculationDetails {
        property_value: input.property_value,
        purchase_tax,
        notary_fees: input.notary_fees,
        registry_fees: input.registry_fees,
        agency_fees: input.agency_fees,
        brokerage_fees: input.brokerage_fees,
        renovation_base_cost: reno.base_cost,
        renovation_vat: reno.vat,
        furniture_base_cost: reno.furniture_base_cost,
        furniture_vat: reno.furniture_vat,
        contingency_amount: reno.contingency,
        general_expenses: input.general_expenses,
        technical_fees_base: input.technical_fees,
        technical_fees_vat: reno.technical_fees_vat,
        icio_tax: reno.icio,
        supply_setup_cost: reno.supply_setup,
        capital_gains_tax,
        cee_cost: input.cee_cost,
        notary_sale_cost: input.notary_sale_cost,
        gross_annual_rent: selected.gross_annual_rent,
        annual_expenses: selected.annual_expenses,
        net_annual_rent: selected.net_annual_rent,
        gross_rental_yield: selected.gross_rental_yield,
        net_rental_yield: selected.net_rental_yield,
    };

    let result = CalculationResult {
        total_project_cost,
        sale_profitability,
        sale_profit_before_tax,
        net_profit_after_tax,
        total_purchase_cost,
        total_renovation_cost: reno.total,
        total_licenses_cost: reno.icio,
        total_other_costs: reno.supply_setup
            + input.general_expenses
            + input.technical_fees
            + reno.technical_fees_vat,
        loan_amount,
        loan_associated_costs,
        total_capital_provided,
        investor_breakdown,
        gross_rental_yield: selected.gross_rental_yield,
        net_rental_yield: selected.net_rental_yield,
        details,
        rental_analysis,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    with_metadata(
        "Buy-Refurbish-Sell Deal Analysis",
        input,
        warnings,
        elapsed,
        result,
    )
}

// ---------------------------------------------------------------------------
// Sub-calculations
// ---------------------------------------------------------------------------

struct RenovationCosts {
    base_cost: Money,
    furniture_base_cost: Money,
    vat: Money,
    furniture_vat: Money,
    contingency: Money,
    technical_fees_vat: Money,
    icio: Money,
    supply_setup: Money,
    total: Money,
}

fn compute_renovation(input: &DealInput) -> RenovationCosts {
    let base_cost = input.area_sqm * input.renovation_cost_per_sqm;
    let furniture_base_cost = input.area_sqm * input.furniture_cost_per_sqm;

    let vat_rate = input.renovation_vat_scheme.rate();
    let vat = (base_cost + furniture_base_cost) * vat_rate;
    let furniture_vat = furniture_base_cost * vat_rate;

    let contingency = (base_cost + furniture_base_cost) * pct(input.contingency_rate);

    // Technical fees always carry standard VAT regardless of the works scheme
    let technical_fees_vat = input.technical_fees * STANDARD_VAT;
    let technical_fees_gross = input.technical_fees + technical_fees_vat;

    // ICIO is levied on the works base only, not furniture
    let icio = base_cost * pct(input.icio_rate);

    let enabled_supplies =
        Decimal::from(u32::from(input.setup_electricity) + u32::from(input.setup_water));
    let supply_setup = enabled_supplies * SUPPLY_SETUP_FEE * (Decimal::ONE + STANDARD_VAT);

    let total = base_cost
        + furniture_base_cost
        + vat
        + contingency
        + input.general_expenses
        + technical_fees_gross
        + icio
        + supply_setup;

    RenovationCosts {
        base_cost,
        furniture_base_cost,
        vat,
        furniture_vat,
        contingency,
        technical_fees_vat,
        icio,
        supply_setup,
        total,
    }
}

fn compute_investor_breakdown(
    input: &DealInput,
    total_project_cost: Money,
    sale_profit_before_tax: Money,
) -> Vec<InvestorBreakdown> {
    input
        .investors
        .iter()
        .map(|investor| {
            let participation_ratio = pct(investor.participation);
            let cost_share = total_project_cost * participation_ratio;

            let loan_base = match input.loan_basis {
                LoanBasis::ProjectCostShare => cost_share,
                LoanBasis::PropertyValue => input.property_value * participation_ratio,
            };
            let loan_amount = loan_base * pct(investor.financing_pct);
            let loan_associated_costs = loan_amount * pct(investor.associated_costs_rate);
            let capital_provided = cost_share - loan_amount + loan_associated_costs;

            let gross_profit = sale_profit_before_tax * participation_ratio;
            let tax_amount = profit_tax(gross_profit, investor.tax_subject);
            let net_profit = gross_profit - tax_amount;

            InvestorBreakdown {
                id: investor.id,
                participation: investor.participation,
                tax_subject: investor.tax_subject,
                gross_profit,
                tax_amount,
                net_profit,
                capital_provided,
                loan_amount,
                loan_associated_costs,
            }
        })
        .collect()
}

fn compute_rental(
    input: &DealInput,
    model: RentalModel,
    total_project_cost: Money,
) -> RentalAnalysis {
    let monthly_rent = match model {
        RentalModel::WholeUnit => input.monthly_rent,
        RentalModel::PerRoom => Decimal::from(input.number_of_rooms) * input.rent_per_room,
    };

    let management_fee = if input.include_management_fee {
        // One month's rent per year, at this scenario's rent level
        monthly_rent
    } else {
        Decimal::ZERO
    };
    let cleaning_fee = if input.include_cleaning_fee {
        CLEANING_FEE_MONTHLY * (Decimal::ONE + STANDARD_VAT) * dec!(12)
    } else {
        Decimal::ZERO
    };

    let gross_annual_rent = monthly_rent * dec!(12);
    let annual_expenses = input.ibi_fee + input.insurance_fee + management_fee + cleaning_fee;
    let net_annual_rent = gross_annual_rent - annual_expenses;

    RentalAnalysis {
        monthly_rent,
        gross_annual_rent,
        annual_expenses,
        net_annual_rent,
        gross_rental_yield: ratio_pct(gross_annual_rent, total_project_cost),
        net_rental_yield: ratio_pct(net_annual_rent, total_project_cost),
    }
}

fn collect_warnings(input: &DealInput, warnings: &mut Vec<String>) {
    if !participation_balanced(&input.investors) {
        warnings.push(format!(
            "Investor participations sum to {}% instead of 100%; aggregate figures will not reconcile",
            participation_total(&input.investors).round_dp(2)
        ));
    }
    if input.property_value < Decimal::ZERO {
        warnings.push("Property value is negative".into());
    }
    if input.sale_price < Decimal::ZERO {
        warnings.push("Sale price is negative".into());
    }
}

/// Percent to fraction (5 -> 0.05).
fn pct(value: Percent) -> Decimal {
    value / dec!(100)
}

/// Ratio as a percent, 0 when the denominator is not positive.
fn ratio_pct(numerator: Money, denominator: Money) -> Percent {
    if denominator > Decimal::ZERO {
        numerator / denominator * dec!(100)
    } else {
        Decimal::ZERO
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
