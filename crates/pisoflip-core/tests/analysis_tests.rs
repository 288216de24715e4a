use pisoflip_core::deal::analysis::analyze;
use pisoflip_core::deal::input::{
    DealInput, Investor, InvestorId, LoanBasis, PurchaseTaxScheme, RentalModel, TaxSubject,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Reference scenario
// ===========================================================================

/// The worked reference deal: 110k flat in need of a 500/m² refurbishment,
/// resold at 195k. Every intermediate figure below is derived by hand.
fn reference_deal() -> DealInput {
    DealInput::default()
}

#[test]
fn test_reference_deal_cost_stack() {
    let result = analyze(&reference_deal()).result;

    // Purchase: 110000 + 11000 ITP + 600 + 450 + 300
    assert_eq!(result.total_purchase_cost, dec!(122350));
    // Renovation: 35000 + 2800 + 3780 VAT + 1890 contingency + 1750 ICIO
    assert_eq!(result.total_renovation_cost, dec!(45220));
    assert_eq!(result.total_project_cost, dec!(167570));
}

#[test]
fn test_reference_deal_sale_projection() {
    let result = analyze(&reference_deal()).result;

    // Sale expenses: 3900 plusvalía + 250 CEE + 500 notary
    assert_eq!(result.details.capital_gains_tax, dec!(3900));
    // 195000 - 167570 - 4650
    assert_eq!(result.sale_profit_before_tax, dec!(22780));
    assert!(
        (result.sale_profitability - dec!(13.59)).abs() < dec!(0.01),
        "expected ~13.59%, got {}",
        result.sale_profitability
    );
}

#[test]
fn test_reference_deal_single_investor_tax() {
    let result = analyze(&reference_deal()).result;
    let inv = &result.investor_breakdown[0];

    assert_eq!(inv.gross_profit, dec!(22780));
    // IRPF: 1140 + (22780 - 6000) x 21% = 4663.80
    assert_eq!(inv.tax_amount, dec!(4663.80));
    assert_eq!(inv.net_profit, dec!(18116.20));
    assert_eq!(result.net_profit_after_tax, dec!(18116.20));
}

// ===========================================================================
// Reconciliation properties
// ===========================================================================

fn four_way_deal() -> DealInput {
    let mut input = DealInput::default();
    let mut company = Investor::with_defaults(InvestorId(4), dec!(25));
    company.tax_subject = TaxSubject::Company;
    company.financing_pct = dec!(0);

    let mut low_leverage = Investor::with_defaults(InvestorId(2), dec!(25));
    low_leverage.financing_pct = dec!(40);
    low_leverage.associated_costs_rate = dec!(2);

    input.investors = vec![
        Investor::with_defaults(InvestorId(1), dec!(25)),
        low_leverage,
        Investor::with_defaults(InvestorId(3), dec!(25)),
        company,
    ];
    input
}

#[test]
fn test_capital_provided_sums_to_total() {
    let result = analyze(&four_way_deal()).result;

    let summed: Decimal = result
        .investor_breakdown
        .iter()
        .map(|b| b.capital_provided)
        .sum();
    assert_eq!(summed, result.total_capital_provided);

    // Independent derivation must agree by construction
    let derived = result.total_project_cost - result.loan_amount + result.loan_associated_costs;
    assert_eq!(result.total_capital_provided, derived);
}

#[test]
fn test_gross_profit_sums_to_profit_before_tax() {
    let result = analyze(&four_way_deal()).result;
    let summed: Decimal = result
        .investor_breakdown
        .iter()
        .map(|b| b.gross_profit)
        .sum();
    assert_eq!(summed, result.sale_profit_before_tax);
}

#[test]
fn test_net_profit_sums_to_aggregate() {
    let result = analyze(&four_way_deal()).result;
    let summed: Decimal = result
        .investor_breakdown
        .iter()
        .map(|b| b.net_profit)
        .sum();
    assert_eq!(summed, result.net_profit_after_tax);
}

#[test]
fn test_reconciliation_holds_on_property_value_basis() {
    let mut input = four_way_deal();
    input.loan_basis = LoanBasis::PropertyValue;
    let result = analyze(&input).result;

    let derived = result.total_project_cost - result.loan_amount + result.loan_associated_costs;
    assert_eq!(result.total_capital_provided, derived);
}

#[test]
fn test_analyze_twice_is_identical() {
    let input = four_way_deal();
    let a = serde_json::to_string(&analyze(&input).result).unwrap();
    let b = serde_json::to_string(&analyze(&input).result).unwrap();
    assert_eq!(a, b);
}

// ===========================================================================
// Degenerate and edge inputs
// ===========================================================================

#[test]
fn test_empty_deal_produces_all_zero_ratios() {
    let mut input = DealInput::default();
    input.property_value = Decimal::ZERO;
    input.notary_fees = Decimal::ZERO;
    input.registry_fees = Decimal::ZERO;
    input.agency_fees = Decimal::ZERO;
    input.brokerage_fees = Decimal::ZERO;
    input.area_sqm = Decimal::ZERO;
    input.general_expenses = Decimal::ZERO;
    input.technical_fees = Decimal::ZERO;

    let result = analyze(&input).result;
    assert_eq!(result.total_project_cost, Decimal::ZERO);
    assert_eq!(result.sale_profitability, Decimal::ZERO);
    assert_eq!(result.gross_rental_yield, Decimal::ZERO);
    assert_eq!(result.net_rental_yield, Decimal::ZERO);
    assert_eq!(
        result.rental_analysis.whole_unit.gross_rental_yield,
        Decimal::ZERO
    );
    assert_eq!(
        result.rental_analysis.per_room.net_rental_yield,
        Decimal::ZERO
    );
}

#[test]
fn test_loss_making_deal_flows_through() {
    let mut input = DealInput::default();
    input.sale_price = dec!(100000);
    let result = analyze(&input).result;

    // 100000 - 167570 - (2000 + 250 + 500)
    assert_eq!(result.sale_profit_before_tax, dec!(-70320));
    let inv = &result.investor_breakdown[0];
    // Individual loss runs through the bottom bracket as a credit
    assert_eq!(inv.tax_amount, dec!(-70320) * dec!(0.19));
    assert!(inv.net_profit > inv.gross_profit);
}

#[test]
fn test_corporate_loss_pays_no_tax() {
    let mut input = DealInput::default();
    input.sale_price = dec!(100000);
    input.investors[0].tax_subject = TaxSubject::Company;

    let result = analyze(&input).result;
    let inv = &result.investor_breakdown[0];
    assert_eq!(inv.tax_amount, Decimal::ZERO);
    assert_eq!(inv.net_profit, inv.gross_profit);
}

#[test]
fn test_iva_purchase_scheme_end_to_end() {
    let mut input = DealInput::default();
    input.purchase_tax_scheme = PurchaseTaxScheme::Iva21;
    let result = analyze(&input).result;

    // 110000 x 21% = 23100, shifting the whole stack
    assert_eq!(result.details.purchase_tax, dec!(23100));
    assert_eq!(result.total_purchase_cost, dec!(134450));
    assert_eq!(result.total_project_cost, dec!(179670));
}

// ===========================================================================
// Rental scenarios
// ===========================================================================

#[test]
fn test_both_rental_scenarios_always_present() {
    for model in [RentalModel::WholeUnit, RentalModel::PerRoom] {
        let mut input = DealInput::default();
        input.rental_model = model;
        let result = analyze(&input).result;

        assert_eq!(result.rental_analysis.whole_unit.gross_annual_rent, dec!(8400));
        assert_eq!(result.rental_analysis.per_room.gross_annual_rent, dec!(12600));
    }
}

#[test]
fn test_selected_yields_follow_the_model() {
    let mut input = DealInput::default();

    input.rental_model = RentalModel::WholeUnit;
    let whole = analyze(&input).result;
    assert_eq!(
        whole.gross_rental_yield,
        whole.rental_analysis.whole_unit.gross_rental_yield
    );

    input.rental_model = RentalModel::PerRoom;
    let rooms = analyze(&input).result;
    assert_eq!(
        rooms.gross_rental_yield,
        rooms.rental_analysis.per_room.gross_rental_yield
    );
    assert!(rooms.gross_rental_yield > whole.gross_rental_yield);
}

#[test]
fn test_rental_yields_against_project_cost() {
    let result = analyze(&DealInput::default()).result;

    // 8400 / 167570 x 100 ~ 5.013%
    let gross = result.rental_analysis.whole_unit.gross_rental_yield;
    assert!((gross - dec!(5.01)).abs() < dec!(0.01), "got {gross}");

    // 8100 / 167570 x 100 ~ 4.834%
    let net = result.rental_analysis.whole_unit.net_rental_yield;
    assert!((net - dec!(4.83)).abs() < dec!(0.01), "got {net}");
}
