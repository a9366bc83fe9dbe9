//! Statistics aggregation: pure reductions over the ledger and equity trace.
//!
//! Every metric is a pure function: equity trace and/or trade list in, scalar
//! out. `aggregate` runs once after the candle loop and assembles the
//! `BacktestResult`.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::Trade;
use crate::result::{BacktestResult, DailyPerformance};

/// Everything the loop leaves behind, moved into the aggregator.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub trades: Vec<Trade>,
    pub equity: Vec<f64>,
    pub daily_gains: BTreeMap<NaiveDate, f64>,
    pub bars_held: usize,
    pub bar_count: usize,
    pub initial_capital: f64,
    pub final_capital: f64,
}

/// Fold a finished run into its result object.
pub fn aggregate(run: RunOutput) -> BacktestResult {
    let trades = &run.trades;
    let winning_trades = trades.iter().filter(|t| t.is_winner()).count();
    let losing_trades = trades.iter().filter(|t| t.is_loser()).count();
    let neutral_trades = trades.iter().filter(|t| t.is_neutral()).count();

    BacktestResult {
        total_gain: run.final_capital - run.initial_capital,
        win_rate: win_rate(trades),
        gain_loss_ratio: gain_loss_ratio(trades),
        total_trades: trades.len(),
        winning_trades,
        losing_trades,
        neutral_trades,
        gains_only: gains_only(trades),
        losses_only: losses_only(trades),
        avg_gain_per_trade: avg_gain_per_trade(trades),
        best_trade: best_trade(trades),
        worst_trade: worst_trade(trades),
        max_drawdown: max_drawdown(&run.equity),
        max_runup: max_runup(&run.equity),
        time_in_market: time_in_market(run.bars_held, run.bar_count),
        avg_orders_per_day: avg_orders_per_day(trades.len(), run.daily_gains.len()),
        daily_performance: daily_performance(&run.daily_gains),
        initial_capital: run.initial_capital,
        final_capital: run.final_capital,
        bar_count: run.bar_count,
        equity: run.equity,
        trades: run.trades,
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// Win rate in percent. 0.0 without trades.
pub fn win_rate(trades: &[Trade]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    let winners = trades.iter().filter(|t| t.is_winner()).count();
    winners as f64 / trades.len() as f64 * 100.0
}

/// Mean winning P&L over mean absolute losing P&L.
///
/// Without losing trades the ratio is the mean winning P&L itself
/// (0.0 when there are no winners either).
pub fn gain_loss_ratio(trades: &[Trade]) -> f64 {
    let avg_win = mean(trades.iter().filter(|t| t.is_winner()).map(|t| t.pnl));
    let avg_loss = mean(trades.iter().filter(|t| t.is_loser()).map(|t| t.pnl.abs()));
    match avg_loss {
        Some(loss) => avg_win.unwrap_or(0.0) / loss,
        None => avg_win.unwrap_or(0.0),
    }
}

/// Sum of winning P&L.
pub fn gains_only(trades: &[Trade]) -> f64 {
    trades.iter().filter(|t| t.is_winner()).map(|t| t.pnl).sum()
}

/// Sum of losing P&L (zero or negative).
pub fn losses_only(trades: &[Trade]) -> f64 {
    trades.iter().filter(|t| t.is_loser()).map(|t| t.pnl).sum()
}

/// Mean P&L per trade. 0.0 without trades.
pub fn avg_gain_per_trade(trades: &[Trade]) -> f64 {
    mean(trades.iter().map(|t| t.pnl)).unwrap_or(0.0)
}

/// Largest single-trade P&L. 0.0 without trades.
pub fn best_trade(trades: &[Trade]) -> f64 {
    trades.iter().map(|t| t.pnl).reduce(f64::max).unwrap_or(0.0)
}

/// Smallest single-trade P&L. 0.0 without trades.
pub fn worst_trade(trades: &[Trade]) -> f64 {
    trades.iter().map(|t| t.pnl).reduce(f64::min).unwrap_or(0.0)
}

/// Maximum drawdown in account currency, as a negative number.
///
/// Scans left to right against the running peak. Returns 0.0 if equity
/// never falls below an earlier value.
pub fn max_drawdown(equity: &[f64]) -> f64 {
    let Some(&first) = equity.first() else {
        return 0.0;
    };
    let mut peak = first;
    let mut max_dd = 0.0_f64;
    for &eq in equity {
        if eq > peak {
            peak = eq;
        }
        let dd = peak - eq;
        if dd > max_dd {
            max_dd = dd;
        }
    }
    if max_dd > 0.0 {
        -max_dd
    } else {
        0.0
    }
}

/// Maximum run-up in account currency against the running trough.
pub fn max_runup(equity: &[f64]) -> f64 {
    let Some(&first) = equity.first() else {
        return 0.0;
    };
    let mut trough = first;
    let mut max_ru = 0.0_f64;
    for &eq in equity {
        if eq < trough {
            trough = eq;
        }
        let ru = eq - trough;
        if ru > max_ru {
            max_ru = ru;
        }
    }
    max_ru
}

/// Percentage of candles spent in a position.
pub fn time_in_market(bars_held: usize, bar_count: usize) -> f64 {
    if bar_count == 0 {
        return 0.0;
    }
    bars_held as f64 / bar_count as f64 * 100.0
}

/// Trades per active day (days with at least one closed trade).
pub fn avg_orders_per_day(trade_count: usize, active_days: usize) -> f64 {
    if active_days == 0 {
        return 0.0;
    }
    trade_count as f64 / active_days as f64
}

/// Daily gains in ascending date order.
pub fn daily_performance(daily_gains: &BTreeMap<NaiveDate, f64>) -> Vec<DailyPerformance> {
    daily_gains
        .iter()
        .map(|(&date, &gain)| DailyPerformance { date, gain })
        .collect()
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}
