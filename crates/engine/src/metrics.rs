//! Metrics Engine
//!
//! Computes the execution-quality table for one parent order (or one leg of
//! a package), split by liquidity role.
//!
//! # Conditional computation
//!
//! Three orthogonal capability flags decide which metric families exist:
//!
//! | flag | source | families gated |
//! |------|--------|-----------------|
//! | delta | first fill's greeks nonzero | mark slippage, Theo/Act hedge metrics, every vol figure |
//! | qwap | external QWAP pair supplied | QWAP slippage; with delta, QWAP-referenced hedge metrics |
//! | hedge | realized hedge slippage supplied | the Act family (requires delta) |
//!
//! Later metrics depend on earlier ones: the Theo family re-anchors the
//! execution price to the volume-weighted underlying mid, the Act family to
//! the realized hedge level, and each anchor feeds its own slippage and
//! vol figures.
//!
//! # Partitions
//!
//! Maker, Taker, and Total columns are computed independently from the
//! fills of that role (Total takes all qualifying fills). A role with no
//! qualifying quantity yields a column of literal zeros rather than
//! divisions by zero.

use std::collections::HashMap;

use log::debug;
use rust_decimal::Decimal;
use themis_core::{ExternalRefs, Fill, LiquidityRole, OrderContext, Price, Quantity, QwapRef};

use crate::adjust::{AdjustedFill, AdjustedSeries, ArrivalRefs};
use crate::catalog::Metric;
use crate::error::{Error, Result};
use crate::table::{MetricsTable, RoleColumn};

/// Post-trade TCA calculator.
///
/// Single-contract restriction: the greeks of the first qualifying fill are
/// applied to the whole order (see [`AdjustedSeries`]).
pub struct TcaCalculator;

impl TcaCalculator {
    /// Compute the full results table for one order.
    ///
    /// Fails only when no fill has positive quantity; every other degenerate
    /// input narrows the table instead of erroring.
    pub fn calculate(
        fills: &[Fill],
        ctx: &OrderContext,
        refs: &ExternalRefs,
    ) -> Result<MetricsTable> {
        let qualifying: Vec<&Fill> = fills.iter().filter(|f| f.is_qualifying()).collect();
        let first = *qualifying.first().ok_or(Error::NoFills)?;
        debug!(
            "computing TCA for '{}' over {} qualifying fills",
            ctx.title,
            qualifying.len()
        );

        let arrival = ArrivalRefs::resolve(ctx, first);
        let adjustment = AdjustedSeries::compute(&arrival, &qualifying);

        let mut table = MetricsTable::new(ctx.title.clone());

        // Per-order header metrics, identical across columns
        table.set_header(Metric::ArrivalMid, arrival.mid);
        if let Some(qwap) = &refs.qwap {
            table.set_header(Metric::Qwap, qwap.price);
            if let Some(qwap_u) = qwap.underlying_price {
                table.set_header(Metric::QwapU, qwap_u);
            }
        }

        let mut act_underlying_mid = None;
        if let Some(series) = &adjustment {
            table.set_header(Metric::Delta, series.delta);
            table.set_header(Metric::Vega, series.vega);
            table.set_header(Metric::ArrivalMark, arrival.mark);
            table.set_header(Metric::ArrivalUMid, arrival.underlying_mid);
            table.set_header(Metric::ArrivalMidVol, series.arrival_mid_vol);
            table.set_header(Metric::ArrivalMarkVol, series.arrival_mark_vol);

            if let Some(qwap) = &refs.qwap {
                if let Some(qwap_u) = qwap.underlying_price {
                    let qwap_adjusted =
                        qwap.price - series.delta * (qwap_u - arrival.underlying_mid);
                    table.set_header(Metric::QwapVol, series.vol_at(qwap_adjusted));
                }
            }

            if let Some(fraction) = refs.hedge_slippage {
                // Anchored at the first option fill, not order arrival: the
                // hedge order trails the option execution chronologically.
                let act = series.fills[0].underlying_mid * (Decimal::ONE + fraction);
                table.set_header(Metric::ActUMid, act);
                act_underlying_mid = Some(act);
            }
        }

        let env = Env {
            side: ctx.side.sign(),
            multiplier: ctx.security_type.multiplier(),
            arrival,
            adjustment: adjustment.as_ref(),
            qwap: refs.qwap,
            act_underlying_mid,
        };

        let views: Vec<FillView> = qualifying
            .iter()
            .enumerate()
            .map(|(idx, fill)| FillView {
                fill: *fill,
                adjusted: env.adjustment.map(|series| &series.fills[idx]),
            })
            .collect();

        for role in [LiquidityRole::Maker, LiquidityRole::Taker] {
            let column = RoleColumn::from_role(role);
            let subset: Vec<&FillView> =
                views.iter().filter(|view| view.fill.role == role).collect();
            let filled: Quantity = subset.iter().map(|view| view.fill.quantity).sum();
            if filled > Decimal::ZERO {
                populate(&mut table, column, &subset, &env);
            } else {
                table.zero_column(column);
            }
        }
        let all: Vec<&FillView> = views.iter().collect();
        populate(&mut table, RoleColumn::Total, &all, &env);

        Ok(table)
    }
}

/// A qualifying fill paired with its delta-adjusted context (absent for
/// zero-delta orders)
struct FillView<'a> {
    fill: &'a Fill,
    adjusted: Option<&'a AdjustedFill>,
}

/// Per-order constants shared by every partition
struct Env<'a> {
    side: Decimal,
    multiplier: Decimal,
    arrival: ArrivalRefs,
    adjustment: Option<&'a AdjustedSeries>,
    qwap: Option<QwapRef>,
    act_underlying_mid: Option<Price>,
}

/// Compute every applicable metric for one nonempty partition
fn populate(table: &mut MetricsTable, column: RoleColumn, views: &[&FillView], env: &Env) {
    let filled: Quantity = views.iter().map(|view| view.fill.quantity).sum();

    // Child-order statistics over distinct child ids; the requested size of
    // a child is taken from its first sighting
    let mut child_sizes: HashMap<&str, Quantity> = HashMap::new();
    for view in views {
        child_sizes
            .entry(view.fill.child_id.as_str())
            .or_insert(view.fill.child_size);
    }
    let child_orders = Decimal::from(child_sizes.len() as u64);
    let total_child_size: Quantity = child_sizes.values().copied().sum();
    let avg_child_size = total_child_size / child_orders;
    let fill_rate = filled.checked_div(total_child_size);

    // Quantity-weighted position of fills inside the spread; one degenerate
    // (ask == bid) fill makes the whole average undefined
    let mut spread_weighted = Some(Decimal::ZERO);
    for view in views {
        let fill = view.fill;
        spread_weighted = match spread_weighted {
            Some(acc) => (fill.price - fill.bid)
                .checked_div(fill.ask - fill.bid)
                .map(|fraction| acc + fraction * fill.quantity),
            None => None,
        };
    }
    let avg_fill_pct_spread = spread_weighted.map(|sum| sum / filled);

    let exec_px = views
        .iter()
        .map(|view| view.fill.price * view.fill.quantity)
        .sum::<Decimal>()
        / filled;
    let px_range = range(views.iter().map(|view| view.fill.price));
    let slip_arr_mid_px = env.side * (env.arrival.mid - exec_px);

    table.set(Metric::ChildOrders, column, child_orders);
    table.set(Metric::AvgChildSize, column, avg_child_size);
    table.set(Metric::FilledContracts, column, filled);
    table.set_opt(Metric::FillRate, column, fill_rate);
    table.set_opt(Metric::AvgFillPctSpread, column, avg_fill_pct_spread);
    table.set(Metric::ExecPx, column, exec_px);
    table.set(Metric::PxRange, column, px_range);
    table.set(Metric::SlipArrMidPx, column, slip_arr_mid_px);
    table.set(
        Metric::SlipArrMidUsd,
        column,
        slip_arr_mid_px * filled * env.multiplier,
    );

    if let Some(qwap) = &env.qwap {
        let slip_qwap_px = env.side * (qwap.price - exec_px);
        table.set(Metric::SlipQwapPx, column, slip_qwap_px);
        table.set(
            Metric::SlipQwapUsd,
            column,
            slip_qwap_px * filled * env.multiplier,
        );
    }

    let Some(series) = env.adjustment else {
        return;
    };
    let pairs: Vec<(&Fill, &AdjustedFill)> = views
        .iter()
        .filter_map(|view| view.adjusted.map(|adjusted| (view.fill, adjusted)))
        .collect();

    // Mark slippage needs no delta arithmetic, but marks are only reported
    // for options
    let slip_arr_mark_px = env.side * (env.arrival.mark - exec_px);
    table.set(Metric::SlipArrMarkPx, column, slip_arr_mark_px);
    table.set(
        Metric::SlipArrMarkUsd,
        column,
        slip_arr_mark_px * filled * env.multiplier,
    );

    // Theoretical hedge: as if hedging mid-market at each fill time
    let theo_underlying_mid = pairs
        .iter()
        .map(|(fill, adjusted)| adjusted.underlying_mid * fill.quantity)
        .sum::<Decimal>()
        / filled;
    let exec_theo = exec_px - series.delta * (theo_underlying_mid - env.arrival.underlying_mid);
    let theo_px_range = range(pairs.iter().map(|(_, adjusted)| adjusted.price));
    let theo_slip_arr_mid_px = env.side * (env.arrival.mid - exec_theo);
    let theo_slip_arr_mark_px = env.side * (env.arrival.mark - exec_theo);

    table.set(Metric::TheoUMid, column, theo_underlying_mid);
    table.set(Metric::ExecTheoArrMidPx, column, exec_theo);
    table.set(Metric::TheoPxRange, column, theo_px_range);
    table.set(Metric::TheoSlipArrMidPx, column, theo_slip_arr_mid_px);
    table.set(
        Metric::TheoSlipArrMidUsd,
        column,
        theo_slip_arr_mid_px * filled * env.multiplier,
    );
    table.set(Metric::TheoSlipArrMarkPx, column, theo_slip_arr_mark_px);
    table.set(
        Metric::TheoSlipArrMarkUsd,
        column,
        theo_slip_arr_mark_px * filled * env.multiplier,
    );
    table.set(Metric::ExecTheoVol, column, series.vol_at(exec_theo));
    table.set(Metric::TheoVolRange, column, series.vol_of_move(theo_px_range));
    table.set(
        Metric::TheoSlipArrMidVol,
        column,
        series.vol_of_move(theo_slip_arr_mid_px),
    );
    table.set(
        Metric::TheoSlipArrMarkVol,
        column,
        series.vol_of_move(theo_slip_arr_mark_px),
    );

    if let Some(qwap) = &env.qwap {
        if let Some(qwap_u) = qwap.underlying_price {
            let exec_theo_qwap = exec_px - series.delta * (theo_underlying_mid - qwap_u);
            let theo_slip_qwap_px = env.side * (qwap.price - exec_theo_qwap);
            table.set(Metric::ExecTheoQwapPx, column, exec_theo_qwap);
            table.set(Metric::TheoSlipQwapPx, column, theo_slip_qwap_px);
            table.set(
                Metric::TheoSlipQwapUsd,
                column,
                theo_slip_qwap_px * filled * env.multiplier,
            );
            table.set(
                Metric::TheoSlipQwapVol,
                column,
                series.vol_of_move(theo_slip_qwap_px),
            );
        }
    }

    // Actual hedge: re-anchor to the realized hedge execution level
    let Some(act_underlying_mid) = env.act_underlying_mid else {
        return;
    };
    let exec_act = exec_px - series.delta * (act_underlying_mid - env.arrival.underlying_mid);
    let act_slip_arr_mid_px = env.side * (env.arrival.mid - exec_act);
    let act_slip_arr_mark_px = env.side * (env.arrival.mark - exec_act);

    table.set(Metric::ExecActArrMidPx, column, exec_act);
    table.set(Metric::ActSlipArrMidPx, column, act_slip_arr_mid_px);
    table.set(
        Metric::ActSlipArrMidUsd,
        column,
        act_slip_arr_mid_px * filled * env.multiplier,
    );
    table.set(Metric::ActSlipArrMarkPx, column, act_slip_arr_mark_px);
    table.set(
        Metric::ActSlipArrMarkUsd,
        column,
        act_slip_arr_mark_px * filled * env.multiplier,
    );
    table.set(Metric::ExecActVol, column, series.vol_at(exec_act));
    table.set(
        Metric::ActSlipArrMidVol,
        column,
        series.vol_of_move(act_slip_arr_mid_px),
    );
    table.set(
        Metric::ActSlipArrMarkVol,
        column,
        series.vol_of_move(act_slip_arr_mark_px),
    );

    if let Some(qwap) = &env.qwap {
        if let Some(qwap_u) = qwap.underlying_price {
            let exec_act_qwap = exec_px - series.delta * (act_underlying_mid - qwap_u);
            let act_slip_qwap_px = env.side * (qwap.price - exec_act_qwap);
            table.set(Metric::ExecActQwapPx, column, exec_act_qwap);
            table.set(Metric::ActSlipQwapPx, column, act_slip_qwap_px);
            table.set(
                Metric::ActSlipQwapUsd,
                column,
                act_slip_qwap_px * filled * env.multiplier,
            );
            table.set(
                Metric::ActSlipQwapVol,
                column,
                series.vol_of_move(act_slip_qwap_px),
            );
        }
    }
}

/// High minus low over a nonempty price sequence
fn range<I: Iterator<Item = Decimal>>(mut values: I) -> Decimal {
    let first = match values.next() {
        Some(value) => value,
        None => return Decimal::ZERO,
    };
    let (low, high) = values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
    high - low
}
