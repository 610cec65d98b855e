//! Wire records
//!
//! Serde mappings for the venue's parent-execution and broker-state CSV
//! extracts, plus conversion into the core domain types. Field names follow
//! the venue's column names; extra columns in the extracts are ignored.

use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::Deserialize;
use themis_core::{
    ContractKey, Fill, LiquidityRole, OptionRight, OrderContext, QwapRef, SecurityType, Side,
};

use crate::error::{Error, Result};
use crate::time::parse_venue_time;

/// One row of the parent-execution extract (`Trades{date}.csv`)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillRecord {
    pub risk_group_id: i64,
    pub base_parent_number: i64,
    pub cl_ord_id: String,
    #[serde(rename = "secKey_tk")]
    pub ticker: String,
    #[serde(rename = "secKey_yr")]
    pub expiry_year: i32,
    #[serde(rename = "secKey_mn")]
    pub expiry_month: u32,
    #[serde(rename = "secKey_dy")]
    pub expiry_day: u32,
    #[serde(rename = "secKey_xx")]
    pub strike: Decimal,
    #[serde(rename = "secKey_cp")]
    pub call_put: String,
    pub sec_type: SecurityType,
    pub order_side: Side,
    pub exec_shape: String,
    pub child_size: Decimal,
    pub child_maker_taker: LiquidityRole,
    pub fill_transact_dttm: String,
    #[serde(rename = "fillTransactDttm_us", default)]
    pub fill_transact_us: Option<i64>,
    pub fill_price: Decimal,
    pub fill_quantity: Decimal,
    pub fill_bid: Decimal,
    pub fill_ask: Decimal,
    pub fill_mark: Decimal,
    #[serde(rename = "fillUBid")]
    pub fill_u_bid: Decimal,
    #[serde(rename = "fillUAsk")]
    pub fill_u_ask: Decimal,
    pub fill_vol: Decimal,
    #[serde(rename = "fillDe")]
    pub fill_delta: Decimal,
    #[serde(rename = "fillVe")]
    pub fill_vega: Decimal,
    pub parent_dttm: String,
    #[serde(rename = "parentDttm_us", default)]
    pub parent_us: Option<i64>,
    #[serde(rename = "parentUBid")]
    pub parent_u_bid: Decimal,
    #[serde(rename = "parentUAsk")]
    pub parent_u_ask: Decimal,
    pub parent_bid: Decimal,
    pub parent_ask: Decimal,
    pub parent_mark: Decimal,
}

impl FillRecord {
    /// Fill transaction time, normalized to Eastern
    pub fn transact_time(&self) -> Result<chrono::DateTime<Tz>> {
        parse_venue_time(&self.fill_transact_dttm, self.fill_transact_us)
    }

    /// Parent order creation time, normalized to Eastern
    pub fn parent_time(&self) -> Result<chrono::DateTime<Tz>> {
        parse_venue_time(&self.parent_dttm, self.parent_us)
    }

    /// Whether the security key carries an option contract; stock rows
    /// report a zero expiry month
    pub fn is_option_contract(&self) -> bool {
        self.expiry_month > 0
    }

    /// Option right parsed from the venue's call/put column
    pub fn right(&self) -> Result<OptionRight> {
        match self.call_put.trim() {
            "Call" | "C" => Ok(OptionRight::Call),
            "Put" | "P" => Ok(OptionRight::Put),
            other => Err(Error::BadRecord(format!("unknown option right '{other}'"))),
        }
    }

    /// Leg identity of an option row
    pub fn contract_key(&self) -> Result<ContractKey> {
        Ok(ContractKey::new(
            self.ticker.clone(),
            self.expiry_year,
            self.expiry_month,
            self.expiry_day,
            self.strike,
            self.right()?,
        ))
    }

    /// Convert to the core fill type
    pub fn to_fill(&self) -> Result<Fill> {
        let transact_time = self.transact_time()?;
        Ok(Fill::new(
            self.cl_ord_id.clone(),
            self.child_maker_taker,
            self.fill_quantity,
            self.fill_price,
        )
        .with_transact_time(transact_time.with_timezone(&chrono::Utc))
        .with_quote(self.fill_bid, self.fill_ask)
        .with_mark(self.fill_mark)
        .with_underlying_quote(self.fill_u_bid, self.fill_u_ask)
        .with_implied_vol(self.fill_vol)
        .with_greeks(self.fill_delta, self.fill_vega)
        .with_child_size(self.child_size))
    }

    /// Build the per-order context from this (first) row of a parent order
    pub fn order_context(&self, title: impl Into<String>) -> OrderContext {
        OrderContext::new(title, self.order_side, self.sec_type)
            .with_arrival_quote(self.parent_bid, self.parent_ask)
            .with_arrival_mark(self.parent_mark)
            .with_arrival_underlying_quote(self.parent_u_bid, self.parent_u_ask)
    }
}

/// One row of the broker-state extract (`BrkrState{date}*.csv`), the source
/// of QWAP/VWAP benchmark marks
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokerRecord {
    pub base_parent_number: i64,
    #[serde(default)]
    pub broker_qwap_mark: Option<Decimal>,
    #[serde(rename = "brokerQwapUMark", default)]
    pub broker_qwap_u_mark: Option<Decimal>,
    #[serde(default)]
    pub broker_vwap_mark: Option<Decimal>,
}

/// QWAP pair for an option parent order, when the broker state carries one
pub fn qwap_for(brokers: &[BrokerRecord], parent: i64) -> Option<QwapRef> {
    let record = brokers.iter().find(|b| b.base_parent_number == parent)?;
    let mut qwap = QwapRef::new(record.broker_qwap_mark?);
    if let Some(underlying) = record.broker_qwap_u_mark {
        qwap = qwap.with_underlying(underlying);
    }
    Some(qwap)
}

/// VWAP benchmark for a stock-only parent order; a better reference than
/// QWAP for pure stock executions
pub fn vwap_for(brokers: &[BrokerRecord], parent: i64) -> Option<QwapRef> {
    let record = brokers.iter().find(|b| b.base_parent_number == parent)?;
    Some(QwapRef::new(record.broker_vwap_mark?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const HEADER: &str = "riskGroupId,baseParentNumber,clOrdId,secKey_tk,secKey_yr,secKey_mn,secKey_dy,secKey_xx,secKey_cp,secType,orderSide,execShape,childSize,childMakerTaker,fillTransactDttm,fillPrice,fillQuantity,fillBid,fillAsk,fillMark,fillUBid,fillUAsk,fillVol,fillDe,fillVe,parentDttm,parentUBid,parentUAsk,parentBid,parentAsk,parentMark";

    fn sample_row() -> String {
        format!(
            "{HEADER}\n7,500123,co-1,XYZ,2021,4,16,150,Call,Option,Buy,Single,10,Taker,2021-04-07 10:30:00,5.10,10,5.00,5.20,5.08,100.15,100.25,0.20,0.5,0.10,2021-04-07 10:29:00,99.95,100.05,5.02,5.12,5.06\n"
        )
    }

    fn parse_one(csv_text: &str) -> FillRecord {
        let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
        reader.deserialize().next().unwrap().unwrap()
    }

    #[test]
    fn test_record_roundtrip_to_fill() {
        let record = parse_one(&sample_row());
        assert_eq!(record.base_parent_number, 500123);
        assert_eq!(record.sec_type, SecurityType::Option);

        let fill = record.to_fill().unwrap();
        assert_eq!(fill.quantity, dec!(10));
        assert_eq!(fill.price, dec!(5.10));
        assert_eq!(fill.role, LiquidityRole::Taker);
        assert_eq!(fill.underlying_mid(), dec!(100.20));
        assert_eq!(fill.delta, dec!(0.5));
    }

    #[test]
    fn test_contract_key() {
        let record = parse_one(&sample_row());
        assert!(record.is_option_contract());
        let key = record.contract_key().unwrap();
        assert_eq!(key.to_string(), "XYZ 20210416 150 Call");
    }

    #[test]
    fn test_order_context_from_first_row() {
        let record = parse_one(&sample_row());
        let ctx = record.order_context("Buy 10 XYZ");
        assert_eq!(ctx.side, Side::Buy);
        assert_eq!(ctx.arrival_mid(), dec!(5.07));
        assert_eq!(ctx.arrival_underlying_mid(), dec!(100.00));
    }

    #[test]
    fn test_broker_lookups() {
        let text = "baseParentNumber,brokerQwapMark,brokerQwapUMark,brokerVwapMark\n\
                    500123,5.04,100.10,\n\
                    500200,,,25.50\n";
        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let brokers: Vec<BrokerRecord> = reader.deserialize().map(|r| r.unwrap()).collect();

        let qwap = qwap_for(&brokers, 500123).unwrap();
        assert_eq!(qwap.price, dec!(5.04));
        assert_eq!(qwap.underlying_price, Some(dec!(100.10)));
        assert!(qwap_for(&brokers, 500200).is_none());

        let vwap = vwap_for(&brokers, 500200).unwrap();
        assert_eq!(vwap.price, dec!(25.50));
        assert_eq!(vwap.underlying_price, None);

        assert!(qwap_for(&brokers, 999).is_none());
    }
}
