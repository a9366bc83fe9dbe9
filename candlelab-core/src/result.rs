//! The results object returned by `simulate`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::Trade;

/// Realized P&L of the trades closed on one UTC day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyPerformance {
    pub date: NaiveDate,
    pub gain: f64,
}

/// Complete result of a single backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktestResult {
    /// Final capital minus initial capital.
    pub total_gain: f64,
    /// Percentage of trades with positive P&L (0 without trades).
    pub win_rate: f64,
    pub gain_loss_ratio: f64,
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub neutral_trades: usize,
    /// Sum of winning trade P&L.
    pub gains_only: f64,
    /// Sum of losing trade P&L (zero or negative).
    pub losses_only: f64,
    pub avg_gain_per_trade: f64,
    pub best_trade: f64,
    pub worst_trade: f64,
    /// Largest peak-to-trough equity decline, reported as zero or negative.
    pub max_drawdown: f64,
    /// Largest trough-to-peak equity rise, zero or positive.
    pub max_runup: f64,
    /// Percentage of candles spent in a position.
    pub time_in_market: f64,
    /// Trades per day with at least one closed trade.
    pub avg_orders_per_day: f64,
    pub daily_performance: Vec<DailyPerformance>,
    /// Capital after each candle; `equity[0]` is the initial capital.
    pub equity: Vec<f64>,
    /// Trade ledger in exit order.
    pub trades: Vec<Trade>,
    pub initial_capital: f64,
    pub final_capital: f64,
    pub bar_count: usize,
}

impl BacktestResult {
    /// Total return as a fraction of initial capital.
    pub fn total_return(&self) -> f64 {
        if self.initial_capital <= 0.0 {
            return 0.0;
        }
        self.total_gain / self.initial_capital
    }
}
