//! Causal indicators used as entry/exit inputs.
//!
//! Both indicators are sequential folds: each value depends only on the
//! current candle and the previous state. They are available in batch form
//! for analysis and in incremental form through `IndicatorPipeline`, which the
//! engine advances once per candle.

pub mod heikin_ashi;
pub mod obv;
pub mod pipeline;

pub use heikin_ashi::{heikin_ashi, HeikinAshiBar};
pub use obv::{oscillator_signal, volume_oscillator, Direction, VolumeOscillator};
pub use pipeline::{IndicatorPipeline, IndicatorSnapshot};

/// Create synthetic candles from close prices for testing.
///
/// Generates plausible OHLC: open = prev_close (or close for first candle),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, one hour apart.
#[cfg(test)]
pub fn make_candles(closes: &[f64]) -> Vec<crate::domain::Candle> {
    use crate::domain::Candle;
    let base_time = 1_704_067_200_i64; // 2024-01-01T00:00:00Z
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Candle {
                time: base_time + i as i64 * 3600,
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
