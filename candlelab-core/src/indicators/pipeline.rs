//! Per-candle indicator pipeline feeding the position state machine.
//!
//! Both indicators are advanced exactly once per candle and only ever see the
//! candles up to and including the current one.

use crate::domain::Candle;
use crate::indicators::heikin_ashi::HeikinAshiBar;
use crate::indicators::obv::{Direction, VolumeOscillator};

/// Indicator readings for one candle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorSnapshot {
    pub heikin_ashi: HeikinAshiBar,
    pub prev_heikin_ashi: HeikinAshiBar,
    pub oscillator: Direction,
}

/// Fold accumulator holding the oscillator state and the last smoothed bar.
#[derive(Debug, Clone)]
pub struct IndicatorPipeline {
    oscillator: VolumeOscillator,
    period: usize,
    heikin_ashi: HeikinAshiBar,
}

impl IndicatorPipeline {
    /// Seed both indicators from the first candle.
    pub fn new(first: &Candle, period: usize) -> Self {
        Self {
            oscillator: VolumeOscillator::new(first.close),
            period,
            heikin_ashi: HeikinAshiBar::next(None, first),
        }
    }

    /// Seed with history capacity for a series of `len` candles.
    pub fn with_capacity(first: &Candle, period: usize, len: usize) -> Self {
        Self {
            oscillator: VolumeOscillator::with_capacity(first.close, len.saturating_sub(1)),
            period,
            heikin_ashi: HeikinAshiBar::next(None, first),
        }
    }

    /// Advance by one candle and return the readings for it.
    pub fn advance(&mut self, candle: &Candle) -> IndicatorSnapshot {
        self.oscillator.update(candle.close);
        let prev = self.heikin_ashi;
        self.heikin_ashi = HeikinAshiBar::next(Some(&prev), candle);
        IndicatorSnapshot {
            heikin_ashi: self.heikin_ashi,
            prev_heikin_ashi: prev,
            oscillator: self.oscillator.signal(self.period),
        }
    }

    pub fn oscillator(&self) -> &VolumeOscillator {
        &self.oscillator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::heikin_ashi::heikin_ashi;
    use crate::indicators::make_candles;
    use crate::indicators::obv::{oscillator_signal, volume_oscillator};

    #[test]
    fn pipeline_matches_batch_indicators() {
        let closes: Vec<f64> = (0..40)
            .map(|i| 100.0 + (i as f64 * 0.45).sin() * 8.0 + i as f64 * 0.1)
            .collect();
        let candles = make_candles(&closes);
        let period = 3;

        let ha = heikin_ashi(&candles);
        let osc = volume_oscillator(&candles);

        let mut pipeline = IndicatorPipeline::new(&candles[0], period);
        for i in 1..candles.len() {
            let snap = pipeline.advance(&candles[i]);
            assert_eq!(snap.heikin_ashi, ha[i]);
            assert_eq!(snap.prev_heikin_ashi, ha[i - 1]);
            assert_eq!(snap.oscillator, oscillator_signal(&osc[..i], period));
        }
        assert_eq!(pipeline.oscillator().history(), osc.as_slice());
    }

    #[test]
    fn first_reading_has_one_history_value() {
        let candles = make_candles(&[10.0, 12.0]);
        let mut pipeline = IndicatorPipeline::new(&candles[0], 1);
        let snap = pipeline.advance(&candles[1]);
        // history [2.0], period 1 → older window empty → sign of latest
        assert_eq!(snap.oscillator, Direction::Up);
        assert_eq!(pipeline.oscillator().history().len(), 1);
    }
}
