use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::values::Symbol;

/// Option right: Call or Put
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionRight {
    Call,
    Put,
}

impl std::fmt::Display for OptionRight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionRight::Call => write!(f, "Call"),
            OptionRight::Put => write!(f, "Put"),
        }
    }
}

/// Composite key identifying one option leg of a package:
/// underlying ticker + expiration + strike + right.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContractKey {
    /// Underlying ticker
    pub ticker: Symbol,
    /// Expiration year
    pub year: i32,
    /// Expiration month
    pub month: u32,
    /// Expiration day
    pub day: u32,
    /// Strike price
    pub strike: Decimal,
    /// Call or Put
    pub right: OptionRight,
}

impl ContractKey {
    pub fn new(
        ticker: impl Into<Symbol>,
        year: i32,
        month: u32,
        day: u32,
        strike: Decimal,
        right: OptionRight,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            year,
            month,
            day,
            strike,
            right,
        }
    }

    /// Strike rendered without a spurious fraction: whole strikes print as
    /// integers, fractional ones keep two decimals.
    pub fn strike_label(&self) -> String {
        if self.strike.fract().is_zero() {
            self.strike.trunc().to_string()
        } else {
            let mut strike = self.strike.round_dp(2);
            strike.rescale(2);
            strike.to_string()
        }
    }
}

impl std::fmt::Display for ContractKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}{:02}{:02} {} {}",
            self.ticker,
            self.year,
            self.month,
            self.day,
            self.strike_label(),
            self.right
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_contract_display() {
        let key = ContractKey::new("XYZ", 2021, 4, 16, dec!(150), OptionRight::Call);
        assert_eq!(key.to_string(), "XYZ 20210416 150 Call");
    }

    #[test]
    fn test_fractional_strike_label() {
        let key = ContractKey::new("XYZ", 2021, 4, 16, dec!(22.5), OptionRight::Put);
        assert_eq!(key.strike_label(), "22.50");
    }
}
