//! Multi-Leg Consolidation
//!
//! Combines per-leg results tables of an option package into one
//! consolidated table. Each leg runs through the single-leg engine first
//! (with QWAP disabled, since a QWAP benchmark is leg-specific); the combine
//! step then dispatches purely on each metric's [`CombinePolicy`] tag:
//!
//! - `SumSigned`: value weighted by +quantity for Buy legs, -quantity for
//!   Sell legs, summed, then normalized.
//! - `SumUnsigned`: already side-adjusted slippage figures, weighted by raw
//!   quantity, summed, then normalized.
//! - `Max`: elementwise maximum of descriptive figures.
//! - `Ignored` / `Label`: never combined numerically; leg titles are
//!   concatenated into the consolidated label.
//!
//! Normalization divides by the smallest nonzero leg quantity, treating the
//! smallest leg as one unit of the structure.

use rust_decimal::Decimal;
use themis_core::Side;

use crate::catalog::{CATALOG, CombinePolicy, Metric};
use crate::error::{Error, Result};
use crate::table::{MetricsTable, RoleColumn};

/// One leg's computed table together with its side, which the table itself
/// does not carry
#[derive(Debug, Clone)]
pub struct LegResult {
    pub side: Side,
    pub table: MetricsTable,
}

impl LegResult {
    pub fn new(side: Side, table: MetricsTable) -> Self {
        Self { side, table }
    }

    /// Total filled quantity of this leg
    fn filled(&self) -> Decimal {
        self.table
            .get(Metric::FilledContracts, RoleColumn::Total)
            .unwrap_or(Decimal::ZERO)
    }
}

const COLUMNS: [RoleColumn; 3] = [RoleColumn::Maker, RoleColumn::Taker, RoleColumn::Total];

/// Combine leg tables into one consolidated table
pub fn consolidate(legs: &[LegResult]) -> Result<MetricsTable> {
    if legs.is_empty() {
        return Err(Error::NoLegs);
    }
    let quantities: Vec<Decimal> = legs.iter().map(LegResult::filled).collect();
    // The engine guarantees a positive Total fill count per leg
    let min_qty = quantities
        .iter()
        .copied()
        .filter(|qty| *qty > Decimal::ZERO)
        .min()
        .unwrap_or(Decimal::ONE);

    let label = legs
        .iter()
        .map(|leg| leg.table.label())
        .collect::<Vec<_>>()
        .join(" ");
    let mut out = MetricsTable::new(label);

    for def in CATALOG {
        match def.combine {
            CombinePolicy::Label | CombinePolicy::Ignored => {}
            CombinePolicy::SumSigned | CombinePolicy::SumUnsigned => {
                for column in COLUMNS {
                    let mut acc = Some(Decimal::ZERO);
                    for (leg, qty) in legs.iter().zip(&quantities) {
                        let weight = match def.combine {
                            CombinePolicy::SumSigned => leg.side.sign() * qty,
                            _ => *qty,
                        };
                        acc = match (acc, leg.table.get(def.metric, column)) {
                            (Some(total), Some(value)) => Some(total + value * weight),
                            _ => None,
                        };
                    }
                    out.set_opt(def.metric, column, acc.map(|sum| sum / min_qty));
                }
            }
            CombinePolicy::Max => {
                for column in COLUMNS {
                    let max = legs
                        .iter()
                        .filter_map(|leg| leg.table.get(def.metric, column))
                        .max();
                    out.set_opt(def.metric, column, max);
                }
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn leg(label: &str, side: Side, filled: Decimal, exec_px: Decimal) -> LegResult {
        let mut table = MetricsTable::new(label);
        table.set(Metric::FilledContracts, RoleColumn::Total, filled);
        table.set(Metric::ExecPx, RoleColumn::Total, exec_px);
        table.set(Metric::SlipArrMidPx, RoleColumn::Total, dec!(0.05));
        table.set(Metric::PxRange, RoleColumn::Total, filled / dec!(100));
        LegResult::new(side, table)
    }

    #[test]
    fn test_signed_sum_normalization() {
        // identical per-contract values over quantities 10 and 20, both Buy:
        // (10v + 20v) / 10 = 3v
        let legs = vec![
            leg("leg one", Side::Buy, dec!(10), dec!(2.00)),
            leg("leg two", Side::Buy, dec!(20), dec!(2.00)),
        ];
        let combined = consolidate(&legs).unwrap();
        assert_eq!(
            combined.get(Metric::ExecPx, RoleColumn::Total),
            Some(dec!(6.00))
        );
    }

    #[test]
    fn test_sell_leg_flips_signed_metrics_only() {
        let legs = vec![
            leg("long leg", Side::Buy, dec!(10), dec!(2.00)),
            leg("short leg", Side::Sell, dec!(20), dec!(2.00)),
        ];
        let combined = consolidate(&legs).unwrap();
        // ExecPx is sign-flipped: (10*2 - 20*2) / 10 = -2
        assert_eq!(
            combined.get(Metric::ExecPx, RoleColumn::Total),
            Some(dec!(-2.00))
        );
        // slippage is already side-adjusted: (10 + 20) * 0.05 / 10 = 0.15
        assert_eq!(
            combined.get(Metric::SlipArrMidPx, RoleColumn::Total),
            Some(dec!(0.15))
        );
    }

    #[test]
    fn test_max_policy_takes_elementwise_maximum() {
        let legs = vec![
            leg("leg one", Side::Buy, dec!(10), dec!(2.00)),
            leg("leg two", Side::Buy, dec!(20), dec!(2.00)),
        ];
        let combined = consolidate(&legs).unwrap();
        assert_eq!(
            combined.get(Metric::FilledContracts, RoleColumn::Total),
            Some(dec!(20))
        );
        assert_eq!(
            combined.get(Metric::PxRange, RoleColumn::Total),
            Some(dec!(0.20))
        );
    }

    #[test]
    fn test_absent_leg_cell_poisons_summed_metric() {
        let mut incomplete = MetricsTable::new("bare leg");
        incomplete.set(Metric::FilledContracts, RoleColumn::Total, dec!(5));
        let legs = vec![
            leg("leg one", Side::Buy, dec!(10), dec!(2.00)),
            LegResult::new(Side::Buy, incomplete),
        ];
        let combined = consolidate(&legs).unwrap();
        assert_eq!(combined.get(Metric::ExecPx, RoleColumn::Total), None);
        // max metrics survive from the legs that had them
        assert_eq!(
            combined.get(Metric::FilledContracts, RoleColumn::Total),
            Some(dec!(10))
        );
    }

    #[test]
    fn test_label_concatenation() {
        let legs = vec![
            leg("Buy 10 XYZ 20210416 150 Call", Side::Buy, dec!(10), dec!(2.00)),
            leg("Sell 10 XYZ 20210416 155 Call", Side::Sell, dec!(10), dec!(2.00)),
        ];
        let combined = consolidate(&legs).unwrap();
        assert_eq!(
            combined.label(),
            "Buy 10 XYZ 20210416 150 Call Sell 10 XYZ 20210416 155 Call"
        );
    }

    #[test]
    fn test_no_legs_is_rejected() {
        assert!(matches!(consolidate(&[]), Err(Error::NoLegs)));
    }
}
