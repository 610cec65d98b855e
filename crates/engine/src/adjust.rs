//! Price-Adjustment Layer
//!
//! Projects every observed option price back to what it would have been had
//! the underlying stayed at its arrival level, isolating the vol/theta
//! component of price movement from delta-driven movement, and translates
//! the adjusted levels into implied-vol space through a vega-linear slope
//! anchored at the first fill.
//!
//! Single-contract restriction: all fills of a call are assumed to share one
//! delta/vega pair. The layer uses the first fill's greeks for the whole
//! series and does not detect violations; callers must not mix contracts in
//! one invocation.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use themis_core::{Fill, OrderContext, Price, Vol};

/// Arrival reference prices with the degenerate-quote fallback applied:
/// a zero arrival quote (or mark) is replaced by the first fill's market
/// context.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ArrivalRefs {
    /// Mid of the instrument at arrival
    pub mid: Price,
    /// Venue mark of the instrument at arrival
    pub mark: Price,
    /// Mid of the underlying at arrival
    pub underlying_mid: Price,
}

impl ArrivalRefs {
    /// Resolve arrival references from the order context, substituting the
    /// first fill's quote/mark where the venue reported zeros.
    pub fn resolve(ctx: &OrderContext, first_fill: &Fill) -> Self {
        let mid = if ctx.arrival_bid > Decimal::ZERO {
            ctx.arrival_mid()
        } else {
            first_fill.mid()
        };
        let (mark, underlying_mid) = if ctx.arrival_mark > Decimal::ZERO {
            (ctx.arrival_mark, ctx.arrival_underlying_mid())
        } else {
            (first_fill.mark, first_fill.underlying_mid())
        };
        Self {
            mid,
            mark,
            underlying_mid,
        }
    }
}

/// Delta-adjusted market context of a single fill, with the implied vol of
/// each adjusted level
#[derive(Debug, Clone, Copy, Serialize)]
pub struct AdjustedFill {
    /// Mid of the underlying at fill time
    pub underlying_mid: Price,
    pub price: Price,
    pub bid: Price,
    pub ask: Price,
    pub mark: Price,
    pub price_vol: Vol,
    pub bid_vol: Vol,
    pub ask_vol: Vol,
    pub mark_vol: Vol,
}

/// The delta-hedge-neutralized price series of one order, plus the vol
/// slope that converts adjusted price levels to implied vols.
///
/// The slope is established once, from the first fill (1 vol point equals
/// `100 * vega` price units) and reused for every conversion; it is never
/// recomputed per fill. `vol_scale` is nonzero by construction.
#[derive(Debug, Clone, Serialize)]
pub struct AdjustedSeries {
    /// Contract delta taken from the first fill
    pub delta: Decimal,
    /// Contract vega taken from the first fill
    pub vega: Decimal,
    /// Implied vol of the arrival mid at the arrival underlying mid
    pub arrival_mid_vol: Vol,
    /// Implied vol of the arrival mark at the arrival underlying mid
    pub arrival_mark_vol: Vol,
    /// Adjusted market context, parallel to the input fill sequence
    pub fills: Vec<AdjustedFill>,
    vol_scale: Decimal,
    arrival_mid: Price,
}

impl AdjustedSeries {
    /// Derive the adjusted series.
    ///
    /// Returns `None` for fill sets with no optionality (delta or vega of
    /// zero), where no adjusted or vol-space quantity is defined.
    pub fn compute(arrival: &ArrivalRefs, fills: &[&Fill]) -> Option<Self> {
        let first = *fills.first()?;
        let delta = first.delta;
        let vega = first.vega;
        if delta.is_zero() || vega.is_zero() {
            return None;
        }
        let vol_scale = dec!(100) * vega;

        let levels: Vec<(Price, Price, Price, Price, Price)> = fills
            .iter()
            .map(|fill| {
                let underlying_mid = fill.underlying_mid();
                let shift = delta * (underlying_mid - arrival.underlying_mid);
                (
                    underlying_mid,
                    fill.price - shift,
                    fill.bid - shift,
                    fill.ask - shift,
                    fill.mark - shift,
                )
            })
            .collect();

        // Vol slope anchored at the first fill's implied vol
        let first_adjusted_price = levels[0].1;
        let arrival_mid_vol = first.implied_vol + (arrival.mid - first_adjusted_price) / vol_scale;
        let arrival_mark_vol = first.implied_vol + (arrival.mark - first_adjusted_price) / vol_scale;

        let vol_at = |level: Price| arrival_mid_vol + (level - arrival.mid) / vol_scale;
        let adjusted = levels
            .into_iter()
            .map(|(underlying_mid, price, bid, ask, mark)| AdjustedFill {
                underlying_mid,
                price,
                bid,
                ask,
                mark,
                price_vol: vol_at(price),
                bid_vol: vol_at(bid),
                ask_vol: vol_at(ask),
                mark_vol: vol_at(mark),
            })
            .collect();

        Some(Self {
            delta,
            vega,
            arrival_mid_vol,
            arrival_mark_vol,
            fills: adjusted,
            vol_scale,
            arrival_mid: arrival.mid,
        })
    }

    /// Implied vol of an absolute adjusted price level
    pub fn vol_at(&self, level: Price) -> Vol {
        self.arrival_mid_vol + (level - self.arrival_mid) / self.vol_scale
    }

    /// A price difference expressed in vol points: the raw move scaled by
    /// the slope, with no additive offset
    pub fn vol_of_move(&self, price_move: Decimal) -> Vol {
        price_move / self.vol_scale
    }
}
