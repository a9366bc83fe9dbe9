//! Mutable state that evolves candle-by-candle during the engine loop.

use tracing::debug;

use crate::domain::{Candle, ExitReason, Position, PositionSide, Trade};
use crate::engine::accounting::EquityTracker;
use crate::settings::ResolvedSettings;

/// Run state owned exclusively by one `simulate` call.
///
/// `position` is the whole position book: `None` is FLAT, `Some` is
/// IN_POSITION. There is no way to hold two positions.
#[derive(Debug, Clone)]
pub struct EngineState {
    pub tracker: EquityTracker,
    pub position: Option<Position>,
    pub trades: Vec<Trade>,
    /// Candles evaluated while in position, across all trades.
    pub bars_held: usize,
}

impl EngineState {
    pub fn new(initial_capital: f64, bar_count: usize) -> Self {
        Self {
            tracker: EquityTracker::with_capacity(initial_capital, bar_count),
            position: None,
            trades: Vec::new(),
            bars_held: 0,
        }
    }

    pub fn is_flat(&self) -> bool {
        self.position.is_none()
    }

    /// Open a position at `candle`'s close. Charges the entry fee immediately.
    ///
    /// Returns `None` (and changes nothing) if a position is already open.
    pub fn open_position(
        &mut self,
        side: PositionSide,
        candle: &Candle,
        index: usize,
        settings: &ResolvedSettings,
    ) -> Option<Position> {
        if self.position.is_some() {
            return None;
        }
        let position = Position {
            side,
            entry_price: settings.costs.entry_price(candle.close, side),
            entry_time: candle.time,
            entry_index: index,
        };
        self.tracker.charge_fee(settings.costs.order_fee);
        self.position = Some(position);
        debug!(
            side = side.as_str(),
            index,
            time = candle.time,
            entry_price = position.entry_price,
            capital = self.tracker.capital(),
            "opened position"
        );
        Some(position)
    }

    /// Close the open position at `candle`'s close and append the trade.
    pub fn close_position(
        &mut self,
        candle: &Candle,
        index: usize,
        reason: ExitReason,
        settings: &ResolvedSettings,
    ) -> Option<&Trade> {
        let position = self.position.take()?;
        let delta = position.unrealized_delta(candle.close);
        let pnl = settings.costs.net_exit_pnl(delta, settings.exposure());
        self.tracker.realize(pnl, candle.date());

        let trade = Trade {
            side: position.side,
            entry_price: position.entry_price,
            exit_price: candle.close,
            entry_time: position.entry_time,
            exit_time: candle.time,
            pnl,
            exit_reason: reason,
            bars_held: index.saturating_sub(position.entry_index),
        };
        debug!(
            side = trade.side.as_str(),
            index,
            reason = reason.as_str(),
            exit_price = trade.exit_price,
            pnl,
            capital = self.tracker.capital(),
            "closed position"
        );
        self.trades.push(trade);
        self.trades.last()
    }

    /// Which exit, if any, fires for the open position at `candle`.
    ///
    /// Stop, then target, then signal; first match wins.
    pub fn exit_reason(
        position: &Position,
        candle: &Candle,
        signal_exit: bool,
        settings: &ResolvedSettings,
    ) -> Option<ExitReason> {
        let delta = position.unrealized_delta(candle.close);
        if -delta >= settings.stop_distance {
            Some(ExitReason::Stop)
        } else if delta >= settings.target_distance {
            Some(ExitReason::Target)
        } else if signal_exit {
            Some(ExitReason::Signal)
        } else {
            None
        }
    }
}
