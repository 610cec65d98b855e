//! Day processing
//!
//! Walks one trade date's fill extract, runs the TCA engine once per parent
//! order (or per leg of a multi-leg package), and writes one result CSV per
//! run plus a consolidated CSV per package.
//!
//! Orders are grouped by risk group. A stock parent sharing a risk group
//! with option parents is taken to be the delta hedge: its realized average
//! price against its own arrival mid supplies the hedge slippage fraction
//! for the option legs. Stock parents without option siblings are analyzed
//! on their own against a VWAP reference.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use indexmap::IndexMap;
use log::{debug, info, warn};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use themis_core::{ContractKey, ExternalRefs, QwapRef, SecurityType};
use themis_engine::{consolidate, LegResult, Metric, MetricsTable, TcaCalculator};

use crate::error::{Error, Result};
use crate::records::{BrokerRecord, FillRecord, qwap_for, vwap_for};

/// Where to find the extracts and where to put the results
#[derive(Debug, Clone)]
pub struct DayConfig {
    /// Directory holding `Trades{date}.csv` and `BrkrState{date}*.csv`
    pub fills_dir: PathBuf,
    /// Directory the per-order result files are written to
    pub out_dir: PathBuf,
    /// Fixed-width strings (true) or raw numeric cells (false)
    pub formatted: bool,
}

/// Process every parent order traded on `date`. Returns the number of
/// result files written.
pub fn process_day(date: NaiveDate, cfg: &DayConfig) -> Result<usize> {
    let stamp = date.format("%Y%m%d").to_string();
    let trades_path = cfg.fills_dir.join(format!("Trades{stamp}.csv"));
    info!("processing {}", trades_path.display());

    let records = load_fills(&trades_path)?;
    if records.is_empty() {
        return Ok(0);
    }
    let brokers = load_broker_state(&cfg.fills_dir, &stamp)?;
    fs::create_dir_all(&cfg.out_dir)?;

    let mut groups: IndexMap<i64, Vec<&FillRecord>> = IndexMap::new();
    for record in &records {
        groups.entry(record.risk_group_id).or_default().push(record);
    }

    let mut written = 0;
    for (group_id, group) in &groups {
        let mut parents: IndexMap<i64, Vec<&FillRecord>> = IndexMap::new();
        for record in group {
            parents
                .entry(record.base_parent_number)
                .or_default()
                .push(record);
        }

        let mut option_parents: Vec<(i64, &Vec<&FillRecord>)> = Vec::new();
        let mut stock_parents: Vec<(i64, &Vec<&FillRecord>)> = Vec::new();
        for (parent, rows) in &parents {
            match rows[0].sec_type {
                SecurityType::Option => option_parents.push((*parent, rows)),
                SecurityType::Stock => stock_parents.push((*parent, rows)),
            }
        }

        if !option_parents.is_empty() {
            // a stock parent in the same risk group is the delta hedge
            let hedge = stock_parents
                .first()
                .and_then(|(_, rows)| hedge_slippage(rows));
            if let Some(fraction) = hedge {
                debug!("risk group {group_id}: realized hedge slippage {fraction}");
            }
            for (parent, rows) in &option_parents {
                match rows[0].exec_shape.as_str() {
                    "Single" => {
                        written +=
                            process_single(rows, qwap_for(&brokers, *parent), hedge, cfg)?;
                    }
                    "MLegLeg" => {
                        written += process_multi_leg(*parent, rows, hedge, &stamp, cfg)?;
                    }
                    other => {
                        warn!("parent {parent}: unsupported exec shape '{other}', skipping");
                    }
                }
            }
        } else {
            for (parent, rows) in &stock_parents {
                let refs = match vwap_for(&brokers, *parent) {
                    Some(vwap) => ExternalRefs::none().with_qwap(vwap),
                    None => ExternalRefs::none(),
                };
                let table = run_order(rows, make_title(rows)?, &refs)?;
                let path = cfg.out_dir.join(format!("{stamp} {}.csv", parent % 100_000));
                write_table(&path, &table, cfg.formatted)?;
                written += 1;
            }
        }
    }
    Ok(written)
}

/// One single-contract option parent: engine run with every available
/// reference, one output file named after the order title
fn process_single(
    rows: &[&FillRecord],
    qwap: Option<QwapRef>,
    hedge: Option<Decimal>,
    cfg: &DayConfig,
) -> Result<usize> {
    let mut refs = ExternalRefs::none();
    if let Some(qwap) = qwap {
        refs = refs.with_qwap(qwap);
    }
    if let Some(fraction) = hedge {
        refs = refs.with_hedge_slippage(fraction);
    }
    let title = make_title(rows)?;
    let table = run_order(rows, title.clone(), &refs)?;
    write_table(&cfg.out_dir.join(format!("{title}.csv")), &table, cfg.formatted)?;
    Ok(1)
}

/// A multi-leg package: one engine run per leg (QWAP disabled, it is
/// leg-specific), one file per leg, one consolidated file
fn process_multi_leg(
    parent: i64,
    rows: &[&FillRecord],
    hedge: Option<Decimal>,
    stamp: &str,
    cfg: &DayConfig,
) -> Result<usize> {
    let mut legs: IndexMap<ContractKey, Vec<&FillRecord>> = IndexMap::new();
    for record in rows {
        legs.entry(record.contract_key()?).or_default().push(record);
    }

    let mut refs = ExternalRefs::none();
    if let Some(fraction) = hedge {
        refs = refs.with_hedge_slippage(fraction);
    }

    let tag = parent % 100_000;
    let mut results = Vec::with_capacity(legs.len());
    let mut written = 0;
    for (index, leg_rows) in legs.values().enumerate() {
        let table = run_order(leg_rows, make_title(leg_rows)?, &refs)?;
        let path = cfg.out_dir.join(format!("{stamp} {tag}-{}.csv", index + 1));
        write_table(&path, &table, cfg.formatted)?;
        written += 1;
        results.push(LegResult::new(leg_rows[0].order_side, table));
    }

    let combined = consolidate(&results)?;
    let path = cfg.out_dir.join(format!("{stamp} {tag}-Cons.csv"));
    write_table(&path, &combined, cfg.formatted)?;
    Ok(written + 1)
}

/// Convert one parent order's rows and run the engine
fn run_order(rows: &[&FillRecord], title: String, refs: &ExternalRefs) -> Result<MetricsTable> {
    let first = rows
        .first()
        .ok_or_else(|| Error::BadRecord("empty parent order".into()))?;
    let ctx = first.order_context(title);
    let fills = rows
        .iter()
        .map(|record| record.to_fill())
        .collect::<Result<Vec<_>>>()?;
    Ok(TcaCalculator::calculate(&fills, &ctx, refs)?)
}

/// Fractional deviation of the hedge's realized average price from the
/// underlying mid at hedge-order arrival
fn hedge_slippage(rows: &[&FillRecord]) -> Option<Decimal> {
    let first = rows.first()?;
    let arrival_mid = (first.parent_bid + first.parent_ask) / dec!(2);
    let quantity: Decimal = rows.iter().map(|r| r.fill_quantity).sum();
    let notional: Decimal = rows.iter().map(|r| r.fill_price * r.fill_quantity).sum();
    let average = notional.checked_div(quantity)?;
    (average - arrival_mid).checked_div(arrival_mid)
}

/// Descriptive order title: side, total quantity, contract (or bare ticker
/// for stock), and the parent order's trade date
fn make_title(rows: &[&FillRecord]) -> Result<String> {
    let first = rows
        .first()
        .ok_or_else(|| Error::BadRecord("empty parent order".into()))?;
    let filled: Decimal = rows.iter().map(|r| r.fill_quantity).sum();
    let date = first.parent_time()?.format("%Y%m%d");
    let title = if first.is_option_contract() {
        format!(
            "{} {} {} {}",
            first.order_side,
            filled.normalize(),
            first.contract_key()?,
            date
        )
    } else {
        format!(
            "{} {} {} {}",
            first.order_side,
            filled.normalize(),
            first.ticker,
            date
        )
    };
    Ok(title)
}

fn load_fills(path: &Path) -> Result<Vec<FillRecord>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for row in reader.deserialize() {
        records.push(row?);
    }
    Ok(records)
}

/// First broker-state extract matching the date pattern; QWAP references
/// are simply unavailable when no file exists
fn load_broker_state(dir: &Path, stamp: &str) -> Result<Vec<BrokerRecord>> {
    let prefix = format!("BrkrState{stamp}");
    let mut candidates: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.starts_with(&prefix) && name.ends_with(".csv") {
            candidates.push(path);
        }
    }
    candidates.sort();
    let Some(path) = candidates.into_iter().next() else {
        debug!("no broker state extract for {stamp}");
        return Ok(Vec::new());
    };

    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for row in reader.deserialize() {
        records.push(row?);
    }
    Ok(records)
}

/// Persist one results table
fn write_table(path: &Path, table: &MetricsTable, formatted: bool) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["Metric", "Maker", "Taker", "Total", "Desc"])?;
    if formatted {
        for row in table.formatted(true) {
            writer.write_record([
                row.metric,
                row.maker.as_str(),
                row.taker.as_str(),
                row.total.as_str(),
                row.desc.as_str(),
            ])?;
        }
    } else {
        for (metric, row) in table.rows() {
            let cells = [row.maker, row.taker, row.total]
                .map(|cell| cell.map(|value| value.to_string()).unwrap_or_default());
            let desc = if metric == Metric::Order {
                table.label().to_string()
            } else {
                metric.desc().to_string()
            };
            writer.write_record([
                metric.label(),
                cells[0].as_str(),
                cells[1].as_str(),
                cells[2].as_str(),
                desc.as_str(),
            ])?;
        }
    }
    writer.flush()?;
    debug!("wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use themis_core::{LiquidityRole, Side};

    fn sample_record() -> FillRecord {
        FillRecord {
            risk_group_id: 7,
            base_parent_number: 500123,
            cl_ord_id: "co-1".into(),
            ticker: "XYZ".into(),
            expiry_year: 2021,
            expiry_month: 4,
            expiry_day: 16,
            strike: dec!(150),
            call_put: "Call".into(),
            sec_type: SecurityType::Option,
            order_side: Side::Buy,
            exec_shape: "Single".into(),
            child_size: dec!(10),
            child_maker_taker: LiquidityRole::Taker,
            fill_transact_dttm: "2021-04-07 10:30:00".into(),
            fill_transact_us: None,
            fill_price: dec!(5.10),
            fill_quantity: dec!(10),
            fill_bid: dec!(5.00),
            fill_ask: dec!(5.20),
            fill_mark: dec!(5.08),
            fill_u_bid: dec!(100.15),
            fill_u_ask: dec!(100.25),
            fill_vol: dec!(0.20),
            fill_delta: dec!(0.5),
            fill_vega: dec!(0.10),
            parent_dttm: "2021-04-07 10:29:00".into(),
            parent_us: None,
            parent_u_bid: dec!(99.95),
            parent_u_ask: dec!(100.05),
            parent_bid: dec!(5.02),
            parent_ask: dec!(5.12),
            parent_mark: dec!(5.06),
        }
    }

    #[test]
    fn test_option_title() {
        let record = sample_record();
        let title = make_title(&[&record]).unwrap();
        assert_eq!(title, "Buy 10 XYZ 20210416 150 Call 20210407");
    }

    #[test]
    fn test_stock_title_omits_the_contract() {
        let mut record = sample_record();
        record.sec_type = SecurityType::Stock;
        record.expiry_month = 0;
        record.expiry_day = 0;
        let title = make_title(&[&record]).unwrap();
        assert_eq!(title, "Buy 10 XYZ 20210407");
    }

    #[test]
    fn test_hedge_slippage_against_hedge_arrival_mid() {
        let mut hedge = sample_record();
        hedge.sec_type = SecurityType::Stock;
        hedge.parent_bid = dec!(99.95);
        hedge.parent_ask = dec!(100.05);
        hedge.fill_price = dec!(100.10);
        hedge.fill_quantity = dec!(1000);

        // (100.10 - 100.00) / 100.00
        assert_eq!(hedge_slippage(&[&hedge]), Some(dec!(0.001)));
    }

    #[test]
    fn test_hedge_slippage_with_no_fills() {
        assert_eq!(hedge_slippage(&[]), None);
    }
}
