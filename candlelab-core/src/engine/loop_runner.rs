//! Main candle loop.
//!
//! Per candle (from index 1; candle 0 seeds the indicators and `equity[0]`):
//! 1. Advance the indicator pipeline.
//! 2. IN_POSITION: count the bar, check stop → target → signal exits.
//!    FLAT: evaluate the entry signal and the trade-type gate.
//! 3. Last candle: force-close anything still open with reason `End`.
//! 4. Record capital into the equity trace.

use tracing::debug;

use crate::domain::{Candle, ExitReason};
use crate::engine::state::EngineState;
use crate::error::EngineError;
use crate::indicators::IndicatorPipeline;
use crate::metrics::{aggregate, RunOutput};
use crate::result::BacktestResult;
use crate::settings::{ResolvedSettings, Settings};

/// Fewest candles a run accepts.
pub const MIN_CANDLES: usize = 2;

/// Run a backtest over `candles` with caller-facing `settings`.
pub fn simulate(candles: &[Candle], settings: &Settings) -> Result<BacktestResult, EngineError> {
    validate_candles(candles)?;
    let resolved = settings.resolve()?;
    simulate_resolved(candles, &resolved)
}

/// Run a backtest with settings that were resolved up front.
///
/// Useful when the same settings are replayed over many candle series.
pub fn simulate_resolved(
    candles: &[Candle],
    settings: &ResolvedSettings,
) -> Result<BacktestResult, EngineError> {
    validate_candles(candles)?;

    let bar_count = candles.len();
    let last = bar_count - 1;
    let mode = settings.signal_mode;
    let mut pipeline = IndicatorPipeline::with_capacity(&candles[0], settings.obv_period, bar_count);
    let mut state = EngineState::new(settings.initial_capital, bar_count);

    for i in 1..bar_count {
        let candle = &candles[i];
        let indicators = pipeline.advance(candle);

        match state.position {
            Some(position) => {
                state.bars_held += 1;
                let signal_exit = mode.signals_exit(&position, &indicators);
                if let Some(reason) =
                    EngineState::exit_reason(&position, candle, signal_exit, settings)
                {
                    state.close_position(candle, i, reason, settings);
                }
            }
            None => {
                let entry = mode.evaluate(candle, &candles[i - 1], &indicators);
                if let Some(side) = entry.side(settings.trade_type) {
                    state.open_position(side, candle, i, settings);
                }
            }
        }

        if i == last && !state.is_flat() {
            state.close_position(candle, i, ExitReason::End, settings);
        }
        state.tracker.record_equity();
    }

    debug!(
        bars = bar_count,
        trades = state.trades.len(),
        bars_held = state.bars_held,
        final_capital = state.tracker.capital(),
        "simulation finished"
    );

    let final_capital = state.tracker.capital();
    let initial_capital = state.tracker.initial_capital();
    let (equity, daily_gains) = state.tracker.into_parts();
    Ok(aggregate(RunOutput {
        trades: state.trades,
        equity,
        daily_gains,
        bars_held: state.bars_held,
        bar_count,
        initial_capital,
        final_capital,
    }))
}

fn validate_candles(candles: &[Candle]) -> Result<(), EngineError> {
    if candles.is_empty() {
        return Err(EngineError::invalid("candle sequence is empty"));
    }
    if candles.len() < MIN_CANDLES {
        return Err(EngineError::invalid(format!(
            "at least {MIN_CANDLES} candles required, got {}",
            candles.len()
        )));
    }
    if let Some(index) = candles.iter().position(Candle::is_void) {
        return Err(EngineError::invalid(format!(
            "candle {index} has a NaN or infinite price"
        )));
    }
    Ok(())
}
