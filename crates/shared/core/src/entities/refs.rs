use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::values::Price;

/// Quote-weighted average price benchmark, computed externally.
///
/// The underlying leg of the pair is absent for stock-only orders, where a
/// VWAP mark stands in for the QWAP and no underlying reference exists.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QwapRef {
    /// QWAP of the traded instrument
    pub price: Price,
    /// QWAP of the underlying, when the instrument is an option
    pub underlying_price: Option<Price>,
}

impl QwapRef {
    pub fn new(price: Price) -> Self {
        Self {
            price,
            underlying_price: None,
        }
    }

    /// Builder: set the underlying QWAP
    pub fn with_underlying(mut self, underlying_price: Price) -> Self {
        self.underlying_price = Some(underlying_price);
        self
    }
}

/// Optional externally-supplied reference points. Absence of either is a
/// normal input state that narrows the computed metric set; it is never an
/// error.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ExternalRefs {
    /// QWAP benchmark pair
    pub qwap: Option<QwapRef>,
    /// Realized hedge slippage: fractional deviation of the average hedge
    /// execution price from the underlying mid at hedge-order arrival
    pub hedge_slippage: Option<Decimal>,
}

impl ExternalRefs {
    pub fn none() -> Self {
        Self::default()
    }

    /// Builder: set the QWAP pair
    pub fn with_qwap(mut self, qwap: QwapRef) -> Self {
        self.qwap = Some(qwap);
        self
    }

    /// Builder: set the realized hedge slippage fraction
    pub fn with_hedge_slippage(mut self, fraction: Decimal) -> Self {
        self.hedge_slippage = Some(fraction);
        self
    }
}
