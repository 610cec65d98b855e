//! Metric Catalog
//!
//! The closed set of TCA metrics together with their immutable metadata:
//! display label, format category, description, and the policy used when
//! consolidating a multi-leg package.
//!
//! The catalog is ordered; the results table and every renderer iterate it
//! in this order.

use serde::{Deserialize, Serialize};

/// Display format category of a metric value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayFormat {
    /// Integer with thousands separators
    Comma,
    /// Price with two decimals
    Price,
    /// Whole percent
    Pct0,
    /// Percent with two decimals
    Pct2,
    /// Free-form text, no numeric content
    Text,
}

/// How a metric combines across the legs of a multi-leg package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombinePolicy {
    /// Quantity-weighted sum, sign-flipped for Sell legs, normalized by the
    /// smallest nonzero leg quantity
    SumSigned,
    /// Quantity-weighted sum without sign flipping (the value is already
    /// side-adjusted), same normalization
    SumUnsigned,
    /// Elementwise maximum across legs; descriptive figures that would be
    /// meaningless summed
    Max,
    /// Never combined; QWAP references are leg-specific and disabled during
    /// per-leg runs
    Ignored,
    /// The order title; concatenated rather than combined numerically
    Label,
}

/// Every metric the engine can produce, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    Order,
    ArrivalMid,
    ArrivalMark,
    ArrivalUMid,
    ArrivalMidVol,
    ArrivalMarkVol,
    Qwap,
    QwapU,
    QwapVol,
    Delta,
    Vega,
    ChildOrders,
    AvgChildSize,
    FilledContracts,
    FillRate,
    AvgFillPctSpread,
    ExecPx,
    PxRange,
    SlipArrMidPx,
    SlipArrMidUsd,
    SlipArrMarkPx,
    SlipArrMarkUsd,
    SlipQwapPx,
    SlipQwapUsd,
    TheoUMid,
    ExecTheoArrMidPx,
    TheoPxRange,
    TheoSlipArrMidPx,
    TheoSlipArrMidUsd,
    TheoSlipArrMarkPx,
    TheoSlipArrMarkUsd,
    ExecTheoQwapPx,
    TheoSlipQwapPx,
    TheoSlipQwapUsd,
    ExecTheoVol,
    TheoVolRange,
    TheoSlipArrMidVol,
    TheoSlipArrMarkVol,
    TheoSlipQwapVol,
    ActUMid,
    ExecActArrMidPx,
    ActSlipArrMidPx,
    ActSlipArrMidUsd,
    ActSlipArrMarkPx,
    ActSlipArrMarkUsd,
    ExecActQwapPx,
    ActSlipQwapPx,
    ActSlipQwapUsd,
    ExecActVol,
    ActSlipArrMidVol,
    ActSlipArrMarkVol,
    ActSlipQwapVol,
}

/// Immutable metadata of one metric
#[derive(Debug, Clone, Copy)]
pub struct MetricDef {
    pub metric: Metric,
    pub label: &'static str,
    pub format: DisplayFormat,
    pub combine: CombinePolicy,
    pub desc: &'static str,
}

const fn def(
    metric: Metric,
    label: &'static str,
    format: DisplayFormat,
    combine: CombinePolicy,
    desc: &'static str,
) -> MetricDef {
    MetricDef {
        metric,
        label,
        format,
        combine,
        desc,
    }
}

use CombinePolicy::{Ignored, Label, Max, SumSigned, SumUnsigned};
use DisplayFormat::{Comma, Pct0, Pct2, Price, Text};

/// The ordered metric catalog. Array position matches the `Metric`
/// discriminant, which `Metric::def` relies on.
pub const CATALOG: &[MetricDef] = &[
    def(Metric::Order, "Order", Text, Label, ""),
    def(
        Metric::ArrivalMid,
        "Arrival Mid",
        Price,
        SumSigned,
        "Mid of the instrument at order arrival",
    ),
    def(
        Metric::ArrivalMark,
        "Arrival Mark",
        Price,
        SumSigned,
        "Venue mark of the instrument at order arrival",
    ),
    def(
        Metric::ArrivalUMid,
        "Arrival U Mid",
        Price,
        Max,
        "Mid of the underlying at order arrival",
    ),
    def(
        Metric::ArrivalMidVol,
        "Arrival Mid Vol",
        Pct2,
        SumSigned,
        "Implied volatility of Arrival Mid at Arrival U Mid",
    ),
    def(
        Metric::ArrivalMarkVol,
        "Arrival Mark Vol",
        Pct2,
        SumSigned,
        "Implied volatility of Arrival Mark at Arrival U Mid",
    ),
    def(
        Metric::Qwap,
        "Qwap",
        Price,
        Ignored,
        "Quote-weighted average price (Vwap for a stock-only order)",
    ),
    def(
        Metric::QwapU,
        "Qwap U",
        Price,
        Ignored,
        "Quote-weighted average price of the underlying",
    ),
    def(
        Metric::QwapVol,
        "Qwap Vol",
        Pct2,
        Ignored,
        "Implied volatility of Qwap at Qwap U",
    ),
    def(Metric::Delta, "Delta", Pct0, SumSigned, "Option contract delta"),
    def(Metric::Vega, "Vega", Price, SumSigned, "Option contract vega"),
    def(
        Metric::ChildOrders,
        "Child Orders",
        Comma,
        Max,
        "Number of child orders which had fills",
    ),
    def(
        Metric::AvgChildSize,
        "Avg Child Size",
        Comma,
        Max,
        "Avg size of child orders which had fills",
    ),
    def(
        Metric::FilledContracts,
        "Filled Ctr",
        Comma,
        Max,
        "Total number of contracts filled",
    ),
    def(
        Metric::FillRate,
        "Ctr Fill Rate",
        Pct0,
        Max,
        "Filled contracts divided by total size sent by child orders which had fills",
    ),
    def(
        Metric::AvgFillPctSpread,
        "Avg Fill Pct Spread",
        Pct2,
        SumSigned,
        "0% means fill is on bid at fill time; 100% means offer",
    ),
    def(Metric::ExecPx, "Exec Px", Price, SumSigned, "Average filled price"),
    def(
        Metric::PxRange,
        "Px Range",
        Price,
        Max,
        "High minus low fill price",
    ),
    def(
        Metric::SlipArrMidPx,
        "Slip Arr Mid Px",
        Price,
        SumUnsigned,
        "Amount by which Exec Px was more favorable than mid at order arrival",
    ),
    def(
        Metric::SlipArrMidUsd,
        "Slip Arr Mid USD",
        Comma,
        SumUnsigned,
        "Above * contracts filled * contract multiplier",
    ),
    def(
        Metric::SlipArrMarkPx,
        "Slip Arr Mark Px",
        Price,
        SumUnsigned,
        "Amount by which Exec Px was more favorable than venue mark at order arrival",
    ),
    def(
        Metric::SlipArrMarkUsd,
        "Slip Arr Mark USD",
        Comma,
        SumUnsigned,
        "Above * contracts filled * contract multiplier",
    ),
    def(
        Metric::SlipQwapPx,
        "Slip Qwap Px",
        Price,
        SumUnsigned,
        "Amount by which Exec Px was more favorable than Qwap",
    ),
    def(
        Metric::SlipQwapUsd,
        "Slip Qwap USD",
        Comma,
        SumUnsigned,
        "Above * contracts filled * contract multiplier",
    ),
    def(
        Metric::TheoUMid,
        "Theo U Mid",
        Price,
        Max,
        "Average underlying price if hedging mid-market at each fill time",
    ),
    def(
        Metric::ExecTheoArrMidPx,
        "Exec Theo Arr Mid Px",
        Price,
        SumSigned,
        "Exec Px delta-adjusted from Theo U Mid to Arrival U Mid",
    ),
    def(
        Metric::TheoPxRange,
        "Theo Px Range",
        Price,
        Max,
        "High minus low delta-adjusted fill price",
    ),
    def(
        Metric::TheoSlipArrMidPx,
        "Theo Slip Arr Mid Px",
        Price,
        SumUnsigned,
        "Amount by which Exec Theo Arr Mid Px was more favorable than Arrival Mid",
    ),
    def(
        Metric::TheoSlipArrMidUsd,
        "Theo Slip Arr Mid USD",
        Comma,
        SumUnsigned,
        "Above * contracts filled * contract multiplier",
    ),
    def(
        Metric::TheoSlipArrMarkPx,
        "Theo Slip Arr Mark Px",
        Price,
        SumUnsigned,
        "Amount by which Exec Theo Arr Mid Px was more favorable than Arrival Mark",
    ),
    def(
        Metric::TheoSlipArrMarkUsd,
        "Theo Slip Arr Mark USD",
        Comma,
        SumUnsigned,
        "Above * contracts filled * contract multiplier",
    ),
    def(
        Metric::ExecTheoQwapPx,
        "Exec Theo Qwap Px",
        Price,
        SumSigned,
        "Exec Px delta-adjusted from Theo U Mid to Qwap U",
    ),
    def(
        Metric::TheoSlipQwapPx,
        "Theo Slip Qwap Px",
        Price,
        SumUnsigned,
        "Amount by which Exec Theo Qwap Px was more favorable than Qwap",
    ),
    def(
        Metric::TheoSlipQwapUsd,
        "Theo Slip Qwap USD",
        Comma,
        SumUnsigned,
        "Above * contracts filled * contract multiplier",
    ),
    def(
        Metric::ExecTheoVol,
        "Exec Theo Vol",
        Pct2,
        SumSigned,
        "Implied volatility of Exec Theo Arr Mid Px at Arrival Mid",
    ),
    def(
        Metric::TheoVolRange,
        "Theo Vol Range",
        Pct2,
        Max,
        "High minus low vol",
    ),
    def(
        Metric::TheoSlipArrMidVol,
        "Theo Slip Arr Mid Vol",
        Pct2,
        SumUnsigned,
        "Theo Slip Arr Mid Px expressed in vol points",
    ),
    def(
        Metric::TheoSlipArrMarkVol,
        "Theo Slip Arr Mark Vol",
        Pct2,
        SumUnsigned,
        "Theo Slip Arr Mark Px expressed in vol points",
    ),
    def(
        Metric::TheoSlipQwapVol,
        "Theo Slip Qwap Vol",
        Pct2,
        SumUnsigned,
        "Theo Slip Qwap Px expressed in vol points",
    ),
    def(
        Metric::ActUMid,
        "Act U Mid",
        Price,
        Max,
        "Actual average underlying price from the executed hedge",
    ),
    def(
        Metric::ExecActArrMidPx,
        "Exec Act Arr Mid Px",
        Price,
        SumSigned,
        "Exec Px delta-adjusted from Act U Mid to Arrival U Mid",
    ),
    def(
        Metric::ActSlipArrMidPx,
        "Act Slip Arr Mid Px",
        Price,
        SumUnsigned,
        "Amount by which Exec Act Arr Mid Px was more favorable than Arrival Mid",
    ),
    def(
        Metric::ActSlipArrMidUsd,
        "Act Slip Arr Mid USD",
        Comma,
        SumUnsigned,
        "Above * contracts filled * contract multiplier",
    ),
    def(
        Metric::ActSlipArrMarkPx,
        "Act Slip Arr Mark Px",
        Price,
        SumUnsigned,
        "Amount by which Exec Act Arr Mid Px was more favorable than Arrival Mark",
    ),
    def(
        Metric::ActSlipArrMarkUsd,
        "Act Slip Arr Mark USD",
        Comma,
        SumUnsigned,
        "Above * contracts filled * contract multiplier",
    ),
    def(
        Metric::ExecActQwapPx,
        "Exec Act Qwap Px",
        Price,
        SumSigned,
        "Exec Px delta-adjusted from Act U Mid to Qwap U",
    ),
    def(
        Metric::ActSlipQwapPx,
        "Act Slip Qwap Px",
        Price,
        SumUnsigned,
        "Amount by which Exec Act Qwap Px was more favorable than Qwap",
    ),
    def(
        Metric::ActSlipQwapUsd,
        "Act Slip Qwap USD",
        Comma,
        SumUnsigned,
        "Above * contracts filled * contract multiplier",
    ),
    def(
        Metric::ExecActVol,
        "Exec Act Vol",
        Pct2,
        SumSigned,
        "Implied volatility of Exec Act Arr Mid Px at Arrival Mid",
    ),
    def(
        Metric::ActSlipArrMidVol,
        "Act Slip Arr Mid Vol",
        Pct2,
        SumUnsigned,
        "Act Slip Arr Mid Px expressed in vol points",
    ),
    def(
        Metric::ActSlipArrMarkVol,
        "Act Slip Arr Mark Vol",
        Pct2,
        SumUnsigned,
        "Act Slip Arr Mark Px expressed in vol points",
    ),
    def(
        Metric::ActSlipQwapVol,
        "Act Slip Qwap Vol",
        Pct2,
        SumUnsigned,
        "Act Slip Qwap Px expressed in vol points",
    ),
];

impl Metric {
    /// Metadata of this metric
    pub fn def(&self) -> &'static MetricDef {
        &CATALOG[*self as usize]
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        self.def().label
    }

    /// Display format category
    pub fn format(&self) -> DisplayFormat {
        self.def().format
    }

    /// Multi-leg combine policy
    pub fn combine(&self) -> CombinePolicy {
        self.def().combine
    }

    /// Human-readable description
    pub fn desc(&self) -> &'static str {
        self.def().desc
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
