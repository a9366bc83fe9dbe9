use std::collections::BTreeMap;

use chrono::NaiveDate;

/// Capital, fee and equity tracker.
///
/// Capital changes only through [`EquityTracker::charge_fee`] (entry fee) and
/// [`EquityTracker::realize`] (net P&L of a close). The equity history is
/// append-only and is seeded with the initial capital.
#[derive(Debug, Clone)]
pub struct EquityTracker {
    initial_capital: f64,
    capital: f64,
    equity_history: Vec<f64>,
    daily_gains: BTreeMap<NaiveDate, f64>,
}

impl EquityTracker {
    pub fn new(initial_capital: f64) -> Self {
        Self::with_capacity(initial_capital, 1)
    }

    pub fn with_capacity(initial_capital: f64, bars: usize) -> Self {
        let mut equity_history = Vec::with_capacity(bars.max(1));
        equity_history.push(initial_capital);
        Self {
            initial_capital,
            capital: initial_capital,
            equity_history,
            daily_gains: BTreeMap::new(),
        }
    }

    /// Charge the flat fee for opening a position.
    pub fn charge_fee(&mut self, fee: f64) {
        self.capital -= fee;
    }

    /// Book the net P&L of a closed trade against capital and its exit day.
    pub fn realize(&mut self, pnl: f64, exit_date: NaiveDate) {
        self.capital += pnl;
        *self.daily_gains.entry(exit_date).or_insert(0.0) += pnl;
    }

    /// Record capital at the end of a candle.
    pub fn record_equity(&mut self) {
        self.equity_history.push(self.capital);
    }

    pub fn capital(&self) -> f64 {
        self.capital
    }

    pub fn initial_capital(&self) -> f64 {
        self.initial_capital
    }

    pub fn into_parts(self) -> (Vec<f64>, BTreeMap<NaiveDate, f64>) {
        (self.equity_history, self.daily_gains)
    }
}
