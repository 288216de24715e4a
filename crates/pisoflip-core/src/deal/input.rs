use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Deserializer, Serialize};

use crate::types::{Money, Percent, SquareMetres};
use crate::{DealError, DealResult};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Tax scheme applied to the purchase price.
///
/// Unrecognised wire values deserialise to `Other`, which carries the
/// standard ITP rate rather than failing the whole input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PurchaseTaxScheme {
    /// Standard property transfer tax (ITP), 10%
    #[serde(rename = "itp_10")]
    Itp10,
    /// Reduced transfer tax, 6%
    #[serde(rename = "itp_6")]
    Itp6,
    /// New-build purchase subject to VAT, 21%
    #[serde(rename = "iva_21")]
    Iva21,
    #[serde(rename = "unknown")]
    Other,
}

impl<'de> Deserialize<'de> for PurchaseTaxScheme {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(match tag.as_str() {
            "itp_10" => PurchaseTaxScheme::Itp10,
            "itp_6" => PurchaseTaxScheme::Itp6,
            "iva_21" => PurchaseTaxScheme::Iva21,
            _ => PurchaseTaxScheme::Other,
        })
    }
}

/// VAT scheme applied to renovation and furniture works.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RenovationVatScheme {
    /// Reduced rate for qualifying refurbishments, 10%
    #[serde(rename = "10")]
    Reduced,
    /// Standard rate, 21%
    #[serde(rename = "21")]
    Standard,
    /// Works invoiced without VAT
    #[serde(rename = "none")]
    Exempt,
    #[serde(rename = "unknown")]
    Other,
}

impl<'de> Deserialize<'de> for RenovationVatScheme {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(match tag.as_str() {
            "10" => RenovationVatScheme::Reduced,
            "21" => RenovationVatScheme::Standard,
            "none" => RenovationVatScheme::Exempt,
            _ => RenovationVatScheme::Other,
        })
    }
}

/// How the investor's profit share is taxed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxSubject {
    /// Natural person: progressive IRPF savings brackets
    Individual,
    /// Corporate entity: flat 25% on positive profit
    Company,
}

/// Rental scenario selected for the summary display. Both scenarios are
/// always fully computed regardless of this selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RentalModel {
    /// Whole unit let at a flat monthly rent
    #[serde(rename = "traditional")]
    WholeUnit,
    /// Room-by-room let: room count x rent per room
    #[serde(rename = "rooms")]
    PerRoom,
}

/// Basis for each investor's loan amount. Historical report iterations
/// diverge here, so the choice is an explicit input rather than a blend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanBasis {
    /// Loan = financing % of the investor's share of total project cost
    #[default]
    ProjectCostShare,
    /// Loan = financing % of property value x participation
    PropertyValue,
}

// ---------------------------------------------------------------------------
// Investors
// ---------------------------------------------------------------------------

/// Opaque, stable investor identity. Allocated monotonically; only
/// stability within a single analysis is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvestorId(pub u64);

/// One co-investor's stake and financing terms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Investor {
    pub id: InvestorId,
    /// Share of the deal, in percent. A valid deal sums to 100 across all
    /// investors; the analyzer does not enforce this (caller precondition).
    pub participation: Percent,
    #[serde(rename = "type")]
    pub tax_subject: TaxSubject,
    /// Percent of this investor's cost share that is debt-financed
    pub financing_pct: Percent,
    /// Informational only; not used in the profit math
    pub loan_interest_rate: Percent,
    /// Loan arrangement costs as a percent of the loan amount
    pub associated_costs_rate: Percent,
}

impl Investor {
    /// Default financing profile for a newly created slot.
    pub fn with_defaults(id: InvestorId, participation: Percent) -> Self {
        Investor {
            id,
            participation,
            tax_subject: TaxSubject::Individual,
            financing_pct: dec!(80),
            loan_interest_rate: dec!(3),
            associated_costs_rate: dec!(1.5),
        }
    }
}

/// Sum of participation shares across all investors.
pub fn participation_total(investors: &[Investor]) -> Percent {
    investors.iter().map(|inv| inv.participation).sum()
}

/// Whether participations sum to exactly 100%, judged after rounding the
/// sum to 2 decimal places (form-entry values carry at most 2 dp).
pub fn participation_balanced(investors: &[Investor]) -> bool {
    participation_total(investors).round_dp(2) == dec!(100)
}

/// Caller-side precondition check: shares must sum to 100% before a result
/// is treated as reconciled. The analyzer itself never enforces this; the
/// editing surface calls it to decide whether to flag the deal.
pub fn check_participation(investors: &[Investor]) -> DealResult<()> {
    if participation_balanced(investors) {
        Ok(())
    } else {
        Err(DealError::InvalidInput {
            field: "investors".into(),
            reason: format!(
                "participations sum to {}% instead of 100%",
                participation_total(investors).round_dp(2)
            ),
        })
    }
}

/// Redistribute shares evenly across `new_count` investors.
///
/// Each slot gets 100/n rounded to 2 dp, with the rounding remainder
/// folded into the last slot so the total is exactly 100. Investors whose
/// index survives the resize keep their other fields and id; new slots get
/// the default financing profile and ids above the current maximum.
pub fn rebalance(investors: &[Investor], new_count: usize) -> Vec<Investor> {
    if new_count == 0 {
        return Vec::new();
    }

    let even_share = (dec!(100) / Decimal::from(new_count as u64)).round_dp(2);
    let mut next_id = investors.iter().map(|inv| inv.id.0).max().unwrap_or(0) + 1;

    let mut rebalanced: Vec<Investor> = (0..new_count)
        .map(|i| match investors.get(i) {
            Some(existing) => Investor {
                participation: even_share,
                ..existing.clone()
            },
            None => {
                let id = InvestorId(next_id);
                next_id += 1;
                Investor::with_defaults(id, even_share)
            }
        })
        .collect();

    let remainder = dec!(100) - participation_total(&rebalanced);
    if let Some(last) = rebalanced.last_mut() {
        last.participation = (last.participation + remainder).round_dp(2);
    }

    rebalanced
}

// ---------------------------------------------------------------------------
// Deal input
// ---------------------------------------------------------------------------

/// One immutable snapshot of every user-controlled parameter for one deal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DealInput {
    // --- Purchase ---
    pub property_value: Money,
    pub purchase_tax_scheme: PurchaseTaxScheme,
    pub notary_fees: Money,
    pub registry_fees: Money,
    /// Gestoría fees, entered gross (no VAT is added on top)
    pub agency_fees: Money,
    /// Estate-agency commission, entered gross
    pub brokerage_fees: Money,
    pub setup_electricity: bool,
    pub setup_water: bool,

    // --- Renovation ---
    pub area_sqm: SquareMetres,
    pub renovation_cost_per_sqm: Money,
    pub furniture_cost_per_sqm: Money,
    pub contingency_rate: Percent,
    pub general_expenses: Money,
    pub technical_fees: Money,
    pub renovation_vat_scheme: RenovationVatScheme,
    /// ICIO: municipal works levy on the renovation base cost
    pub icio_rate: Percent,

    // --- Disposition ---
    pub sale_price: Money,
    /// Plusvalía municipal, as a percent of the sale price
    pub capital_gains_tax_rate: Percent,
    /// Energy performance certificate (CEE)
    pub cee_cost: Money,
    pub notary_sale_cost: Money,

    // --- Rental ---
    pub rental_model: RentalModel,
    pub monthly_rent: Money,
    pub number_of_rooms: u32,
    pub rent_per_room: Money,
    /// IBI: annual property tax
    pub ibi_fee: Money,
    pub insurance_fee: Money,
    pub include_management_fee: bool,
    pub include_cleaning_fee: bool,

    // --- Financing ---
    #[serde(default)]
    pub loan_basis: LoanBasis,
    pub investors: Vec<Investor>,
}

impl Default for DealInput {
    /// The seed deal the editing surface starts from: a 110k flat of 70 m²
    /// with a single fully-participating individual investor at 80% debt.
    fn default() -> Self {
        DealInput {
            property_value: dec!(110000),
            purchase_tax_scheme: PurchaseTaxScheme::Itp10,
            notary_fees: dec!(600),
            registry_fees: dec!(450),
            agency_fees: dec!(300),
            brokerage_fees: dec!(0),
            setup_electricity: false,
            setup_water: false,
            area_sqm: dec!(70),
            renovation_cost_per_sqm: dec!(500),
            furniture_cost_per_sqm: dec!(40),
            contingency_rate: dec!(5),
            general_expenses: dec!(0),
            technical_fees: dec!(0),
            renovation_vat_scheme: RenovationVatScheme::Reduced,
            icio_rate: dec!(5),
            sale_price: dec!(195000),
            capital_gains_tax_rate: dec!(2),
            cee_cost: dec!(250),
            notary_sale_cost: dec!(500),
            rental_model: RentalModel::WholeUnit,
            monthly_rent: dec!(700),
            number_of_rooms: 3,
            rent_per_room: dec!(350),
            ibi_fee: dec!(150),
            insurance_fee: dec!(150),
            include_management_fee: false,
            include_cleaning_fee: false,
            loan_basis: LoanBasis::ProjectCostShare,
            investors: vec![Investor::with_defaults(InvestorId(1), dec!(100))],
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rebalance_three_way_split_sums_to_100() {
        let investors = vec![Investor::with_defaults(InvestorId(1), dec!(100))];
        let rebalanced = rebalance(&investors, 3);

        assert_eq!(rebalanced.len(), 3);
        // 100/3 -> 33.33, last gets the 0.01 remainder
        assert_eq!(rebalanced[0].participation, dec!(33.33));
        assert_eq!(rebalanced[1].participation, dec!(33.33));
        assert_eq!(rebalanced[2].participation, dec!(33.34));
        assert_eq!(participation_total(&rebalanced), dec!(100));
        assert!(participation_balanced(&rebalanced));
    }

    #[test]
    fn test_rebalance_preserves_surviving_fields() {
        let mut original = Investor::with_defaults(InvestorId(7), dec!(100));
        original.tax_subject = TaxSubject::Company;
        original.financing_pct = dec!(50);
        original.associated_costs_rate = dec!(2);

        let rebalanced = rebalance(&[original], 2);

        assert_eq!(rebalanced[0].id, InvestorId(7));
        assert_eq!(rebalanced[0].tax_subject, TaxSubject::Company);
        assert_eq!(rebalanced[0].financing_pct, dec!(50));
        assert_eq!(rebalanced[0].associated_costs_rate, dec!(2));

        // New slot gets the defaults
        assert_eq!(rebalanced[1].tax_subject, TaxSubject::Individual);
        assert_eq!(rebalanced[1].financing_pct, dec!(80));
        assert_eq!(rebalanced[1].associated_costs_rate, dec!(1.5));
    }

    #[test]
    fn test_rebalance_allocates_fresh_ids_above_max() {
        let investors = vec![
            Investor::with_defaults(InvestorId(3), dec!(50)),
            Investor::with_defaults(InvestorId(9), dec!(50)),
        ];
        let rebalanced = rebalance(&investors, 4);

        assert_eq!(rebalanced[0].id, InvestorId(3));
        assert_eq!(rebalanced[1].id, InvestorId(9));
        assert_eq!(rebalanced[2].id, InvestorId(10));
        assert_eq!(rebalanced[3].id, InvestorId(11));
    }

    #[test]
    fn test_rebalance_shrink_keeps_prefix() {
        let investors = rebalance(&[Investor::with_defaults(InvestorId(1), dec!(100))], 3);
        let shrunk = rebalance(&investors, 2);

        assert_eq!(shrunk.len(), 2);
        assert_eq!(shrunk[0].id, investors[0].id);
        assert_eq!(shrunk[1].id, investors[1].id);
        assert_eq!(participation_total(&shrunk), dec!(100));
    }

    #[test]
    fn test_rebalance_to_zero_is_empty() {
        let investors = vec![Investor::with_defaults(InvestorId(1), dec!(100))];
        assert!(rebalance(&investors, 0).is_empty());
    }

    #[test]
    fn test_rebalance_seven_way_exact_total() {
        // 100/7 -> 14.29 rounded; 7 x 14.29 = 100.03, last absorbs -0.03
        let rebalanced = rebalance(&[], 7);
        assert_eq!(rebalanced[0].participation, dec!(14.29));
        assert_eq!(rebalanced[6].participation, dec!(14.26));
        assert_eq!(participation_total(&rebalanced), dec!(100));
    }

    #[test]
    fn test_participation_balanced_tolerates_2dp_rounding() {
        let investors = vec![
            Investor::with_defaults(InvestorId(1), dec!(33.333)),
            Investor::with_defaults(InvestorId(2), dec!(33.333)),
            Investor::with_defaults(InvestorId(3), dec!(33.334)),
        ];
        // Sums to 100.000 exactly
        assert!(participation_balanced(&investors));

        let short = vec![Investor::with_defaults(InvestorId(1), dec!(80))];
        assert!(!participation_balanced(&short));
    }

    #[test]
    fn test_check_participation_reports_the_shortfall() {
        let investors = vec![Investor::with_defaults(InvestorId(1), dec!(80))];
        let err = check_participation(&investors).unwrap_err();
        match err {
            DealError::InvalidInput { field, reason } => {
                assert_eq!(field, "investors");
                assert!(reason.contains("80%"), "unexpected reason: {reason}");
            }
            other => panic!("Expected InvalidInput, got {other:?}"),
        }

        assert!(check_participation(&rebalance(&investors, 3)).is_ok());
    }

    #[test]
    fn test_scheme_wire_format() {
        let json = serde_json::to_string(&PurchaseTaxScheme::Itp10).unwrap();
        assert_eq!(json, "\"itp_10\"");

        let parsed: RenovationVatScheme = serde_json::from_str("\"21\"").unwrap();
        assert_eq!(parsed, RenovationVatScheme::Standard);

        let model: RentalModel = serde_json::from_str("\"rooms\"").unwrap();
        assert_eq!(model, RentalModel::PerRoom);
    }

    #[test]
    fn test_unrecognised_schemes_deserialise_to_fallback() {
        let purchase: PurchaseTaxScheme = serde_json::from_str("\"ajd_1.5\"").unwrap();
        assert_eq!(purchase, PurchaseTaxScheme::Other);

        let vat: RenovationVatScheme = serde_json::from_str("\"4\"").unwrap();
        assert_eq!(vat, RenovationVatScheme::Other);
    }

    #[test]
    fn test_default_deal_round_trips_through_json() {
        let input = DealInput::default();
        let json = serde_json::to_string(&input).unwrap();
        let back: DealInput = serde_json::from_str(&json).unwrap();
        assert_eq!(back.property_value, input.property_value);
        assert_eq!(back.investors.len(), 1);
        assert_eq!(back.loan_basis, LoanBasis::ProjectCostShare);
    }

    #[test]
    fn test_loan_basis_defaults_when_absent() {
        let mut value = serde_json::to_value(DealInput::default()).unwrap();
        value.as_object_mut().unwrap().remove("loan_basis");
        let parsed: DealInput = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.loan_basis, LoanBasis::ProjectCostShare);
    }
}
