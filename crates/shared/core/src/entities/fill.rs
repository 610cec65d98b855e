use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::LiquidityRole;
use crate::values::{Price, Quantity, Timestamp, Vol};

/// One execution event of a child order, together with the market context
/// captured at fill time.
///
/// Fills with nonpositive quantity are venue accounting no-ops (busts,
/// corrections) and are excluded before any aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fill {
    /// Transaction time
    pub transact_time: Timestamp,
    /// Executed quantity (contracts or shares)
    pub quantity: Quantity,
    /// Execution price
    pub price: Price,
    /// Best bid of the traded instrument at fill time
    pub bid: Price,
    /// Best ask of the traded instrument at fill time
    pub ask: Price,
    /// Venue mark of the traded instrument at fill time
    pub mark: Price,
    /// Best bid of the underlying at fill time
    pub underlying_bid: Price,
    /// Best ask of the underlying at fill time
    pub underlying_ask: Price,
    /// Implied volatility at fill time
    pub implied_vol: Vol,
    /// Option delta (constant per single-contract order; 0 for stock)
    pub delta: Decimal,
    /// Option vega (constant per single-contract order; 0 for stock)
    pub vega: Decimal,
    /// Liquidity role of the owning child order
    pub role: LiquidityRole,
    /// Owning child-order identifier
    pub child_id: String,
    /// Requested size of the owning child order
    pub child_size: Quantity,
}

impl Fill {
    /// Create a new fill with the essentials; market context via builders
    pub fn new(
        child_id: impl Into<String>,
        role: LiquidityRole,
        quantity: Quantity,
        price: Price,
    ) -> Self {
        Self {
            transact_time: Utc::now(),
            quantity,
            price,
            bid: Decimal::ZERO,
            ask: Decimal::ZERO,
            mark: Decimal::ZERO,
            underlying_bid: Decimal::ZERO,
            underlying_ask: Decimal::ZERO,
            implied_vol: Decimal::ZERO,
            delta: Decimal::ZERO,
            vega: Decimal::ZERO,
            role,
            child_id: child_id.into(),
            child_size: quantity,
        }
    }

    /// Builder: set transaction time
    pub fn with_transact_time(mut self, transact_time: Timestamp) -> Self {
        self.transact_time = transact_time;
        self
    }

    /// Builder: set instrument quote at fill time
    pub fn with_quote(mut self, bid: Price, ask: Price) -> Self {
        self.bid = bid;
        self.ask = ask;
        self
    }

    /// Builder: set venue mark at fill time
    pub fn with_mark(mut self, mark: Price) -> Self {
        self.mark = mark;
        self
    }

    /// Builder: set underlying quote at fill time
    pub fn with_underlying_quote(mut self, bid: Price, ask: Price) -> Self {
        self.underlying_bid = bid;
        self.underlying_ask = ask;
        self
    }

    /// Builder: set implied vol at fill time
    pub fn with_implied_vol(mut self, vol: Vol) -> Self {
        self.implied_vol = vol;
        self
    }

    /// Builder: set contract greeks
    pub fn with_greeks(mut self, delta: Decimal, vega: Decimal) -> Self {
        self.delta = delta;
        self.vega = vega;
        self
    }

    /// Builder: set requested size of the owning child order
    pub fn with_child_size(mut self, child_size: Quantity) -> Self {
        self.child_size = child_size;
        self
    }

    /// Mid of the underlying quote at fill time
    pub fn underlying_mid(&self) -> Price {
        (self.underlying_bid + self.underlying_ask) / Decimal::TWO
    }

    /// Mid of the instrument quote at fill time
    pub fn mid(&self) -> Price {
        (self.bid + self.ask) / Decimal::TWO
    }

    /// Whether this fill counts toward aggregation
    pub fn is_qualifying(&self) -> bool {
        self.quantity > Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_fill_builders() {
        let fill = Fill::new("child-1", LiquidityRole::Taker, dec!(10), dec!(5.10))
            .with_quote(dec!(5.00), dec!(5.20))
            .with_underlying_quote(dec!(99.95), dec!(100.05))
            .with_greeks(dec!(0.5), dec!(0.10));

        assert_eq!(fill.mid(), dec!(5.10));
        assert_eq!(fill.underlying_mid(), dec!(100.00));
        assert!(fill.is_qualifying());
    }

    #[test]
    fn test_nonpositive_quantity_does_not_qualify() {
        let bust = Fill::new("child-1", LiquidityRole::Maker, dec!(0), dec!(5.10));
        assert!(!bust.is_qualifying());
    }
}
