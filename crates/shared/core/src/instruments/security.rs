use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Security type of the traded instrument.
///
/// The contract multiplier converts per-contract price differences into USD:
/// 100 shares per equity-option contract, 1 for stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SecurityType {
    Option,
    Stock,
}

impl SecurityType {
    /// Contract multiplier used by every USD-denominated metric
    pub fn multiplier(&self) -> Decimal {
        match self {
            SecurityType::Option => dec!(100),
            SecurityType::Stock => Decimal::ONE,
        }
    }
}

impl std::fmt::Display for SecurityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecurityType::Option => write!(f, "Option"),
            SecurityType::Stock => write!(f, "Stock"),
        }
    }
}
