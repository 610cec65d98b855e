//! Full day-processing flow over real files: a hedged single option order,
//! a stock-only order, and a two-leg package, all in one extract.

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use themis_runner::{DayConfig, process_day};

const HEADER: &str = "riskGroupId,baseParentNumber,clOrdId,secKey_tk,secKey_yr,secKey_mn,secKey_dy,secKey_xx,secKey_cp,secType,orderSide,execShape,childSize,childMakerTaker,fillTransactDttm,fillPrice,fillQuantity,fillBid,fillAsk,fillMark,fillUBid,fillUAsk,fillVol,fillDe,fillVe,parentDttm,parentUBid,parentUAsk,parentBid,parentAsk,parentMark";

fn trades_csv() -> String {
    let rows = [
        // risk group 1: a single option order plus its stock hedge
        "1,600001,oc-1,XYZ,2021,4,16,150,Call,Option,Buy,Single,10,Taker,2021-04-07 10:30:00,5.10,10,5.00,5.20,5.08,100.15,100.25,0.20,0.5,0.10,2021-04-07 10:29:00,99.95,100.05,5.02,5.12,5.06",
        "1,600002,hc-1,XYZ,2021,0,0,0,Call,Stock,Sell,Single,500,Taker,2021-04-07 10:31:00,100.10,500,100.05,100.15,100.10,100.05,100.15,0,0,0,2021-04-07 10:30:30,100.00,100.10,99.95,100.05,0",
        // risk group 2: a stock-only order
        "2,700003,sc-1,ABC,2021,0,0,0,Call,Stock,Buy,Single,100,Maker,2021-04-07 11:00:00,25.45,100,25.40,25.50,25.45,25.40,25.50,0,0,0,2021-04-07 10:59:00,25.40,25.50,25.40,25.50,0",
        // risk group 3: a two-leg vertical spread
        "3,800004,mc-1,XYZ,2021,4,16,150,Call,Option,Buy,MLegLeg,5,Taker,2021-04-07 12:00:00,5.10,5,5.00,5.20,5.08,100.15,100.25,0.20,0.5,0.10,2021-04-07 11:58:00,99.95,100.05,5.02,5.12,5.06",
        "3,800004,mc-2,XYZ,2021,4,16,155,Call,Option,Sell,MLegLeg,5,Maker,2021-04-07 12:00:30,3.00,5,2.95,3.05,3.01,100.15,100.25,0.18,0.45,0.09,2021-04-07 11:58:00,99.95,100.05,2.98,3.08,3.00",
    ];
    format!("{HEADER}\n{}\n", rows.join("\n"))
}

const BROKER_CSV: &str = "baseParentNumber,brokerQwapMark,brokerQwapUMark,brokerVwapMark\n\
                          600001,5.04,100.10,\n\
                          700003,,,25.44\n";

struct Workspace {
    root: PathBuf,
    cfg: DayConfig,
}

impl Workspace {
    fn set_up(tag: &str) -> Self {
        let root = std::env::temp_dir().join(format!("themis-day-{tag}-{}", std::process::id()));
        let fills_dir = root.join("FillData");
        let out_dir = root.join("TCA");
        fs::create_dir_all(&fills_dir).unwrap();
        fs::write(fills_dir.join("Trades20210407.csv"), trades_csv()).unwrap();
        fs::write(fills_dir.join("BrkrState20210407.csv"), BROKER_CSV).unwrap();
        Self {
            root,
            cfg: DayConfig {
                fills_dir,
                out_dir,
                formatted: true,
            },
        }
    }

    fn output(&self, name: &str) -> String {
        fs::read_to_string(self.cfg.out_dir.join(name)).unwrap()
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

#[test]
fn processes_a_full_day() {
    let ws = Workspace::set_up("full");
    let date = NaiveDate::from_ymd_opt(2021, 4, 7).unwrap();

    let written = process_day(date, &ws.cfg).unwrap();
    assert_eq!(written, 5);

    // single option order: file named after the order title, QWAP and
    // hedge-referenced families present
    let single = ws.output("Buy 10 XYZ 20210416 150 Call 20210407.csv");
    assert!(single.starts_with("Metric,Maker,Taker,Total,Desc"));
    assert!(single.contains("Slip Qwap Px"));
    assert!(single.contains("Act U Mid"));
    assert!(single.contains("Exec Theo Arr Mid Px"));

    // stock-only order: VWAP stands in for QWAP, nothing delta-adjusted
    let stock = ws.output("20210407 3.csv");
    assert!(stock.contains("Slip Qwap Px"));
    assert!(!stock.contains("Theo U Mid"));
    assert!(!stock.contains("Arrival Mid Vol"));

    // two-leg package: per-leg files plus a consolidated table
    let leg_one = ws.output("20210407 4-1.csv");
    assert!(leg_one.contains("Buy 5 XYZ 20210416 150 Call 20210407"));
    let leg_two = ws.output("20210407 4-2.csv");
    assert!(leg_two.contains("Sell 5 XYZ 20210416 155 Call 20210407"));
    let consolidated = ws.output("20210407 4-Cons.csv");
    assert!(consolidated.contains(
        "Buy 5 XYZ 20210416 150 Call 20210407 Sell 5 XYZ 20210416 155 Call 20210407"
    ));
    // legs ran without QWAP, so no QWAP row survives formatting
    assert!(!consolidated.contains("Slip Qwap Px"));
}

#[test]
fn empty_extract_processes_nothing() {
    let ws = Workspace::set_up("empty");
    let fills_dir = &ws.cfg.fills_dir;
    fs::write(fills_dir.join("Trades20210408.csv"), format!("{HEADER}\n")).unwrap();

    let date = NaiveDate::from_ymd_opt(2021, 4, 8).unwrap();
    assert_eq!(process_day(date, &ws.cfg).unwrap(), 0);
}
