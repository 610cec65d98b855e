//! Themis TCA Engine
//!
//! Post-trade transaction cost analysis for option and stock parent orders.
//!
//! # Pipeline
//!
//! ```text
//! fills + order context ──► ┌─────────────────────────────────────────┐
//!                           │   Price-Adjustment Layer (adjust)       │
//!                           │   - delta-neutralized price series      │
//!                           │   - vega-linear vol translation         │
//!                           └───────────────┬─────────────────────────┘
//!                                           │ adjusted series
//! external refs ──────────► ┌───────────────▼─────────────────────────┐
//! (QWAP, hedge slippage)    │   Metrics Engine (metrics)              │
//!                           │   - Maker / Taker / Total partitions    │
//!                           │   - conditional metric families         │
//!                           └───────────────┬─────────────────────────┘
//!                                           │ results table
//!                           ┌───────────────▼─────────────────────────┐
//!                           │   rollup (multi-leg)  /  format (text)  │
//!                           └─────────────────────────────────────────┘
//! ```
//!
//! All computation is pure and synchronous over immutable inputs: one call
//! analyzes one order (or one leg). A day of orders is an embarrassingly
//! parallel batch of independent calls.

pub mod adjust;
pub mod catalog;
pub mod error;
pub mod format;
pub mod metrics;
pub mod rollup;
pub mod table;

// Re-export main types
pub use adjust::{AdjustedFill, AdjustedSeries, ArrivalRefs};
pub use catalog::{CATALOG, CombinePolicy, DisplayFormat, Metric, MetricDef};
pub use error::{Error, Result};
pub use format::FormattedRow;
pub use metrics::TcaCalculator;
pub use rollup::{LegResult, consolidate};
pub use table::{MetricsTable, RoleColumn, Row};
