use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::deal::input::{PurchaseTaxScheme, RenovationVatScheme, TaxSubject};
use crate::types::Money;

/// Standard Spanish VAT, as a fraction.
pub const STANDARD_VAT: Decimal = dec!(0.21);

/// Fixed per-utility connection fee, before VAT.
pub const SUPPLY_SETUP_FEE: Money = dec!(250);

/// Monthly cleaning service fee, before VAT.
pub const CLEANING_FEE_MONTHLY: Money = dec!(30);

/// Flat corporate tax on positive profit, as a fraction.
pub const CORPORATE_TAX: Decimal = dec!(0.25);

impl PurchaseTaxScheme {
    /// Purchase tax as a decimal fraction (0.10 = 10%).
    pub fn rate(self) -> Decimal {
        match self {
            PurchaseTaxScheme::Itp10 => dec!(0.10),
            PurchaseTaxScheme::Itp6 => dec!(0.06),
            PurchaseTaxScheme::Iva21 => dec!(0.21),
            // Unrecognised schemes fall back to standard ITP
            PurchaseTaxScheme::Other => dec!(0.10),
        }
    }
}

impl RenovationVatScheme {
    /// Renovation VAT as a decimal fraction (0.10 = 10%).
    pub fn rate(self) -> Decimal {
        match self {
            RenovationVatScheme::Reduced => dec!(0.10),
            RenovationVatScheme::Standard => dec!(0.21),
            RenovationVatScheme::Exempt => Decimal::ZERO,
            // Unrecognised schemes fall back to the reduced rate
            RenovationVatScheme::Other => dec!(0.10),
        }
    }
}

/// Tax on an investor's profit share.
///
/// Companies pay a flat 25% on positive profit and nothing on a loss (no
/// loss credit). Individuals run through the IRPF savings-income brackets;
/// the bottom bracket formula is applied to non-positive profit as well, so
/// a loss produces a negative tax. That credit is a known simplification of
/// this model, kept deliberately.
pub fn profit_tax(profit: Money, subject: TaxSubject) -> Money {
    match subject {
        TaxSubject::Company => {
            if profit > Decimal::ZERO {
                profit * CORPORATE_TAX
            } else {
                Decimal::ZERO
            }
        }
        TaxSubject::Individual => irpf_savings_tax(profit),
    }
}

/// IRPF savings-income schedule: 19% to 6k, 21% to 50k, 23% to 200k,
/// 26% above. Cumulative amounts: 6000x19% = 1140, 44000x21% = 9240,
/// 150000x23% = 34500.
fn irpf_savings_tax(profit: Money) -> Money {
    if profit <= dec!(6000) {
        return profit * dec!(0.19);
    }
    if profit <= dec!(50000) {
        return dec!(1140) + (profit - dec!(6000)) * dec!(0.21);
    }
    if profit <= dec!(200000) {
        return dec!(1140) + dec!(9240) + (profit - dec!(50000)) * dec!(0.23);
    }
    dec!(1140) + dec!(9240) + dec!(34500) + (profit - dec!(200000)) * dec!(0.26)
}
