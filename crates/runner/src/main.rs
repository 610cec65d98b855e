//! `tca` - post-trade transaction cost analysis for one trade date.
//!
//! Usage:
//!   tca --date 20210407 --fills-dir FillData --out-dir TCA

use std::path::PathBuf;
use std::process;

use chrono::NaiveDate;
use clap::Parser;
use log::{error, info};

use themis_runner::{DayConfig, process_day};

#[derive(Parser, Debug)]
#[command(name = "tca")]
#[command(about = "Post-trade TCA over a day of parent-order executions")]
struct Args {
    /// Trade date to process (YYYYMMDD)
    #[arg(long)]
    date: String,

    /// Directory holding Trades{date}.csv and BrkrState{date}*.csv
    #[arg(long, default_value = "FillData")]
    fills_dir: PathBuf,

    /// Directory the per-order result files are written to
    #[arg(long, default_value = "TCA")]
    out_dir: PathBuf,

    /// Write raw numeric cells instead of fixed-width strings
    #[arg(long)]
    raw: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let date = match NaiveDate::parse_from_str(&args.date, "%Y%m%d") {
        Ok(date) => date,
        Err(_) => {
            error!("--date must be YYYYMMDD, got '{}'", args.date);
            process::exit(2);
        }
    };

    let cfg = DayConfig {
        fills_dir: args.fills_dir,
        out_dir: args.out_dir,
        formatted: !args.raw,
    };

    match process_day(date, &cfg) {
        Ok(written) => info!("wrote {written} TCA files for {date}"),
        Err(err) => {
            error!("processing {date} failed: {err}");
            process::exit(1);
        }
    }
}
