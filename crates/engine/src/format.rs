//! Fixed-Width Display Formatting
//!
//! Converts numeric cells to right-aligned, width-10 strings per the
//! metric's format category. Rows with absent cells can be dropped so the
//! rendered table only shows metrics whose preconditions were met.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::catalog::{CATALOG, DisplayFormat, Metric};
use crate::table::MetricsTable;

const CELL_WIDTH: usize = 10;

/// One rendered row of the results table
#[derive(Debug, Clone, Serialize)]
pub struct FormattedRow {
    pub metric: &'static str,
    pub maker: String,
    pub taker: String,
    pub total: String,
    pub desc: String,
}

impl DisplayFormat {
    /// Render a value in this category, right-aligned to the cell width
    pub fn render(&self, value: Decimal) -> String {
        let body = match self {
            DisplayFormat::Comma => group_thousands(&fixed(value, 0)),
            DisplayFormat::Price => fixed(value, 2),
            DisplayFormat::Pct0 => format!("{}%", fixed(value * dec!(100), 0)),
            DisplayFormat::Pct2 => format!("{}%", fixed(value * dec!(100), 2)),
            DisplayFormat::Text => String::new(),
        };
        format!("{body:>width$}", width = CELL_WIDTH)
    }
}

/// Render with exactly `dp` fractional digits (banker's rounding, matching
/// the venue's reporting convention)
fn fixed(value: Decimal, dp: u32) -> String {
    let mut rounded = value.round_dp(dp);
    rounded.rescale(dp);
    rounded.to_string()
}

/// Insert thousands separators into a plain integer string
fn group_thousands(digits: &str) -> String {
    let (sign, magnitude) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };
    let mut grouped = String::with_capacity(magnitude.len() + magnitude.len() / 3);
    for (pos, ch) in magnitude.chars().enumerate() {
        if pos > 0 && (magnitude.len() - pos) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}{grouped}")
}

impl MetricsTable {
    /// Render every row to fixed-width strings.
    ///
    /// With `drop_incomplete`, rows holding any absent numeric cell are
    /// omitted, so the output only lists metrics computed for every
    /// partition.
    pub fn formatted(&self, drop_incomplete: bool) -> Vec<FormattedRow> {
        let mut out = Vec::with_capacity(CATALOG.len());
        for (metric, row) in self.rows() {
            let def = metric.def();
            if def.format == DisplayFormat::Text {
                out.push(FormattedRow {
                    metric: def.label,
                    maker: String::new(),
                    taker: String::new(),
                    total: String::new(),
                    desc: self.order_desc(metric),
                });
                continue;
            }

            let cells = [row.maker, row.taker, row.total]
                .map(|cell| cell.map(|value| def.format.render(value)));
            if drop_incomplete && cells.iter().any(Option::is_none) {
                continue;
            }
            let [maker, taker, total] = cells.map(Option::unwrap_or_default);
            out.push(FormattedRow {
                metric: def.label,
                maker,
                taker,
                total,
                desc: self.order_desc(metric),
            });
        }
        out
    }

    fn order_desc(&self, metric: Metric) -> String {
        if metric == Metric::Order {
            self.label().to_string()
        } else {
            metric.desc().to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::RoleColumn;

    #[test]
    fn test_price_rendering() {
        assert_eq!(DisplayFormat::Price.render(dec!(5.1)), "      5.10");
        assert_eq!(DisplayFormat::Price.render(dec!(-0.015)), "     -0.02");
    }

    #[test]
    fn test_comma_rendering() {
        assert_eq!(DisplayFormat::Comma.render(dec!(1234567.4)), " 1,234,567");
        assert_eq!(DisplayFormat::Comma.render(dec!(-5300)), "    -5,300");
        assert_eq!(DisplayFormat::Comma.render(dec!(42)), "        42");
    }

    #[test]
    fn test_percent_rendering() {
        assert_eq!(DisplayFormat::Pct0.render(dec!(0.25)), "       25%");
        assert_eq!(DisplayFormat::Pct2.render(dec!(0.1925)), "    19.25%");
    }

    #[test]
    fn test_drop_incomplete_rows() {
        let mut table = MetricsTable::new("Buy 20 XYZ");
        table.set_header(Metric::ArrivalMid, dec!(5.05));
        table.set(Metric::ExecPx, RoleColumn::Total, dec!(5.00));

        let rows = table.formatted(true);
        let labels: Vec<_> = rows.iter().map(|r| r.metric).collect();
        // Exec Px is missing Maker/Taker cells and must be dropped
        assert!(labels.contains(&"Arrival Mid"));
        assert!(!labels.contains(&"Exec Px"));
        // the label row always survives and carries the order title
        assert_eq!(rows[0].metric, "Order");
        assert_eq!(rows[0].desc, "Buy 20 XYZ");
    }

    #[test]
    fn test_keep_incomplete_rows_when_not_dropping() {
        let mut table = MetricsTable::new("Buy 20 XYZ");
        table.set(Metric::ExecPx, RoleColumn::Total, dec!(5.00));
        let rows = table.formatted(false);
        let exec = rows.iter().find(|r| r.metric == "Exec Px").unwrap();
        assert_eq!(exec.maker, "");
        assert_eq!(exec.total, "      5.00");
    }
}
