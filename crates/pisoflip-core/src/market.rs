//! Market-data lookup collaborator.
//!
//! The deal math never consumes market data; a quote is displayed next to
//! the analysis for sanity-checking the purchase price. Only the interface
//! lives here; transport belongs to the caller, and lookup failures
//! surface as [`DealError::MarketLookup`] without ever blocking `analyze`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::deal::input::DealInput;
use crate::types::{Money, Percent, SquareMetres};
use crate::DealResult;

/// One comparable listing near the looked-up address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparableListing {
    pub address: String,
    pub price: Money,
    pub area_sqm: SquareMetres,
}

impl ComparableListing {
    pub fn price_per_sqm(&self) -> Money {
        if self.area_sqm > Decimal::ZERO {
            self.price / self.area_sqm
        } else {
            Decimal::ZERO
        }
    }
}

/// Average-price figure for an address, with whichever supporting data the
/// deployment variant provides: comparable listings, a map link, or both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketQuote {
    pub average_price_per_sqm: Money,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub comparables: Vec<ComparableListing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_url: Option<String>,
}

/// Free-text address lookup against a listings portal.
pub trait MarketDataProvider {
    fn lookup(&self, address: &str) -> DealResult<MarketQuote>;
}

/// How far the deal's implied price per m² sits from the market average,
/// in percent (positive = paying above market). 0 when either side of the
/// comparison is degenerate.
pub fn price_delta_pct(quote: &MarketQuote, input: &DealInput) -> Percent {
    if quote.average_price_per_sqm <= Decimal::ZERO || input.area_sqm <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let implied = input.property_value / input.area_sqm;
    (implied - quote.average_price_per_sqm) / quote.average_price_per_sqm * dec!(100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DealError;
    use pretty_assertions::assert_eq;

    struct FixedProvider(Money);

    impl MarketDataProvider for FixedProvider {
        fn lookup(&self, address: &str) -> DealResult<MarketQuote> {
            if address.trim().is_empty() {
                return Err(DealError::MarketLookup("empty address".into()));
            }
            Ok(MarketQuote {
                average_price_per_sqm: self.0,
                comparables: vec![ComparableListing {
                    address: "Calle Mayor 1".into(),
                    price: dec!(150000),
                    area_sqm: dec!(75),
                }],
                map_url: None,
            })
        }
    }

    #[test]
    fn test_lookup_error_is_distinct_state() {
        let provider = FixedProvider(dec!(2000));
        let err = provider.lookup("  ").unwrap_err();
        assert!(matches!(err, DealError::MarketLookup(_)));
    }

    #[test]
    fn test_price_delta_against_market() {
        let provider = FixedProvider(dec!(2000));
        let quote = provider.lookup("Calle Mayor, Madrid").unwrap();
        let input = DealInput::default();

        // Implied: 110000 / 70 ~ 1571.43/m², about 21.4% under market
        let delta = price_delta_pct(&quote, &input);
        assert!(delta < Decimal::ZERO);
        assert!((delta + dec!(21.43)).abs() < dec!(0.01), "got {delta}");
    }

    #[test]
    fn test_comparable_price_per_sqm() {
        let provider = FixedProvider(dec!(2000));
        let quote = provider.lookup("Calle Mayor, Madrid").unwrap();
        assert_eq!(quote.comparables[0].price_per_sqm(), dec!(2000));
    }

    #[test]
    fn test_degenerate_quote_delta_is_zero() {
        let quote = MarketQuote {
            average_price_per_sqm: Decimal::ZERO,
            comparables: Vec::new(),
            map_url: None,
        };
        assert_eq!(price_delta_pct(&quote, &DealInput::default()), Decimal::ZERO);
    }
}
