use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Side;
use crate::instruments::SecurityType;
use crate::values::Price;

/// Per-order constants captured when the parent order was created.
///
/// Arrival prices are the baseline for every slippage metric. A venue
/// sometimes reports a zero arrival quote or mark; the engine falls back to
/// the first fill's market context in that case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderContext {
    /// Descriptive order label, carried through to the results table
    pub title: String,
    /// Order side, constant across the parent order
    pub side: Side,
    /// Security type; determines the contract multiplier
    pub security_type: SecurityType,
    /// Best bid of the instrument at order arrival
    pub arrival_bid: Price,
    /// Best ask of the instrument at order arrival
    pub arrival_ask: Price,
    /// Venue mark of the instrument at order arrival
    pub arrival_mark: Price,
    /// Best bid of the underlying at order arrival
    pub arrival_underlying_bid: Price,
    /// Best ask of the underlying at order arrival
    pub arrival_underlying_ask: Price,
}

impl OrderContext {
    pub fn new(title: impl Into<String>, side: Side, security_type: SecurityType) -> Self {
        Self {
            title: title.into(),
            side,
            security_type,
            arrival_bid: Decimal::ZERO,
            arrival_ask: Decimal::ZERO,
            arrival_mark: Decimal::ZERO,
            arrival_underlying_bid: Decimal::ZERO,
            arrival_underlying_ask: Decimal::ZERO,
        }
    }

    /// Builder: set instrument quote at arrival
    pub fn with_arrival_quote(mut self, bid: Price, ask: Price) -> Self {
        self.arrival_bid = bid;
        self.arrival_ask = ask;
        self
    }

    /// Builder: set venue mark at arrival
    pub fn with_arrival_mark(mut self, mark: Price) -> Self {
        self.arrival_mark = mark;
        self
    }

    /// Builder: set underlying quote at arrival
    pub fn with_arrival_underlying_quote(mut self, bid: Price, ask: Price) -> Self {
        self.arrival_underlying_bid = bid;
        self.arrival_underlying_ask = ask;
        self
    }

    /// Mid of the instrument quote at arrival
    pub fn arrival_mid(&self) -> Price {
        (self.arrival_bid + self.arrival_ask) / Decimal::TWO
    }

    /// Mid of the underlying quote at arrival
    pub fn arrival_underlying_mid(&self) -> Price {
        (self.arrival_underlying_bid + self.arrival_underlying_ask) / Decimal::TWO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_arrival_mids() {
        let ctx = OrderContext::new("Buy 20 XYZ", Side::Buy, SecurityType::Option)
            .with_arrival_quote(dec!(5.00), dec!(5.10))
            .with_arrival_underlying_quote(dec!(99.95), dec!(100.05));

        assert_eq!(ctx.arrival_mid(), dec!(5.05));
        assert_eq!(ctx.arrival_underlying_mid(), dec!(100.00));
    }
}
