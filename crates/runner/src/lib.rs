//! Themis Runner
//!
//! Batch side of the TCA system: loads a trade date's fill and broker-state
//! extracts, normalizes venue timestamps, derives the realized hedge
//! slippage for delta-hedged packages, runs the engine per parent order,
//! and persists one result CSV per order plus consolidated tables for
//! multi-leg packages.
//!
//! Everything here is synchronous plain I/O; the engine itself never
//! touches a file.

pub mod day;
pub mod error;
pub mod records;
pub mod time;

// Re-export main types
pub use day::{DayConfig, process_day};
pub use error::{Error, Result};
pub use records::{BrokerRecord, FillRecord};
pub use time::parse_venue_time;
