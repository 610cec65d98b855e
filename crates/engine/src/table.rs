//! Results Table
//!
//! An ordered mapping from metric to its Maker/Taker/Total cells. Cells are
//! `Option<Decimal>`: `None` marks a metric whose preconditions were not met
//! for that column (missing QWAP, zero delta, degenerate spread).

use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::Serialize;
use themis_core::LiquidityRole;

use crate::catalog::{CombinePolicy, CATALOG, Metric};

/// Which role partition a cell belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RoleColumn {
    Maker,
    Taker,
    Total,
}

impl RoleColumn {
    /// The partition column for fills with the given liquidity role
    pub fn from_role(role: LiquidityRole) -> Self {
        match role {
            LiquidityRole::Maker => RoleColumn::Maker,
            LiquidityRole::Taker => RoleColumn::Taker,
        }
    }
}

impl std::fmt::Display for RoleColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoleColumn::Maker => write!(f, "Maker"),
            RoleColumn::Taker => write!(f, "Taker"),
            RoleColumn::Total => write!(f, "Total"),
        }
    }
}

/// One metric's cells across the three role partitions
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Row {
    pub maker: Option<Decimal>,
    pub taker: Option<Decimal>,
    pub total: Option<Decimal>,
}

impl Row {
    pub fn get(&self, column: RoleColumn) -> Option<Decimal> {
        match column {
            RoleColumn::Maker => self.maker,
            RoleColumn::Taker => self.taker,
            RoleColumn::Total => self.total,
        }
    }

    pub fn set(&mut self, column: RoleColumn, value: Option<Decimal>) {
        match column {
            RoleColumn::Maker => self.maker = value,
            RoleColumn::Taker => self.taker = value,
            RoleColumn::Total => self.total = value,
        }
    }
}

/// The full TCA results table for one order (or one consolidated package).
///
/// Construction seeds every catalog metric with an empty row, so iteration
/// order always matches the catalog regardless of which metrics were
/// computed.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsTable {
    label: String,
    rows: IndexMap<Metric, Row>,
}

impl MetricsTable {
    /// Create an empty table carrying the order's descriptive label
    pub fn new(label: impl Into<String>) -> Self {
        let rows = CATALOG.iter().map(|d| (d.metric, Row::default())).collect();
        Self {
            label: label.into(),
            rows,
        }
    }

    /// The order label shown in the `Order` row
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    /// Set one cell
    pub fn set(&mut self, metric: Metric, column: RoleColumn, value: Decimal) {
        self.set_opt(metric, column, Some(value));
    }

    /// Set one cell from an optional value; `None` leaves the cell absent
    pub fn set_opt(&mut self, metric: Metric, column: RoleColumn, value: Option<Decimal>) {
        if let Some(row) = self.rows.get_mut(&metric) {
            row.set(column, value);
        }
    }

    /// Set a per-order header metric identically in all three columns
    pub fn set_header(&mut self, metric: Metric, value: Decimal) {
        for column in [RoleColumn::Maker, RoleColumn::Taker, RoleColumn::Total] {
            self.set(metric, column, value);
        }
    }

    pub fn get(&self, metric: Metric, column: RoleColumn) -> Option<Decimal> {
        self.rows.get(&metric).and_then(|row| row.get(column))
    }

    /// Report the literal value 0 for every metric in a partition that had
    /// no fills. The label row stays text-only.
    pub fn zero_column(&mut self, column: RoleColumn) {
        for (metric, row) in self.rows.iter_mut() {
            if metric.combine() != CombinePolicy::Label {
                row.set(column, Some(Decimal::ZERO));
            }
        }
    }

    /// Rows in catalog order
    pub fn rows(&self) -> impl Iterator<Item = (Metric, &Row)> {
        self.rows.iter().map(|(metric, row)| (*metric, row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_rows_follow_catalog_order() {
        let table = MetricsTable::new("test order");
        let metrics: Vec<Metric> = table.rows().map(|(m, _)| m).collect();
        let expected: Vec<Metric> = CATALOG.iter().map(|d| d.metric).collect();
        assert_eq!(metrics, expected);
    }

    #[test]
    fn test_set_and_get() {
        let mut table = MetricsTable::new("test order");
        table.set(Metric::ExecPx, RoleColumn::Taker, dec!(5.05));
        assert_eq!(table.get(Metric::ExecPx, RoleColumn::Taker), Some(dec!(5.05)));
        assert_eq!(table.get(Metric::ExecPx, RoleColumn::Maker), None);
    }

    #[test]
    fn test_zero_column_spares_the_label() {
        let mut table = MetricsTable::new("test order");
        table.zero_column(RoleColumn::Maker);
        assert_eq!(table.get(Metric::ExecPx, RoleColumn::Maker), Some(dec!(0)));
        assert_eq!(table.get(Metric::Qwap, RoleColumn::Maker), Some(dec!(0)));
        assert_eq!(table.get(Metric::Order, RoleColumn::Maker), None);
        assert_eq!(table.get(Metric::ExecPx, RoleColumn::Total), None);
    }

    #[test]
    fn test_set_header_fills_all_columns() {
        let mut table = MetricsTable::new("test order");
        table.set_header(Metric::ArrivalMid, dec!(5.05));
        for column in [RoleColumn::Maker, RoleColumn::Taker, RoleColumn::Total] {
            assert_eq!(table.get(Metric::ArrivalMid, column), Some(dec!(5.05)));
        }
    }
}
