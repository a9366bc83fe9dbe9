//! Heikin-Ashi smoothed candles.
//!
//! Recursive: HA_open[t] = (HA_open[t-1] + HA_close[t-1]) / 2,
//! seeded with (open + close) / 2 of the first raw candle.
//! HA_close[t] = (open + high + low + close) / 4 of the raw candle.
//! HA_high/HA_low extend the raw range to cover HA_open and HA_close.

use serde::{Deserialize, Serialize};

use crate::domain::Candle;

/// One smoothed bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeikinAshiBar {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl HeikinAshiBar {
    /// Fold step: the smoothed bar for `candle` given the previous smoothed bar.
    pub fn next(prev: Option<&HeikinAshiBar>, candle: &Candle) -> Self {
        let open = match prev {
            Some(p) => (p.open + p.close) / 2.0,
            None => (candle.open + candle.close) / 2.0,
        };
        let close = (candle.open + candle.high + candle.low + candle.close) / 4.0;
        Self {
            open,
            high: candle.high.max(open).max(close),
            low: candle.low.min(open).min(close),
            close,
        }
    }

    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }
}

/// Batch form as a prefix scan over the candles.
pub fn heikin_ashi(candles: &[Candle]) -> Vec<HeikinAshiBar> {
    candles
        .iter()
        .scan(None, |prev: &mut Option<HeikinAshiBar>, candle| {
            let bar = HeikinAshiBar::next(prev.as_ref(), candle);
            *prev = Some(bar);
            Some(bar)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    fn candle(open: f64, high: f64, low: f64, close: f64) -> Candle {
        Candle::new(0, open, high, low, close)
    }

    #[test]
    fn first_bar_seed() {
        let bar = HeikinAshiBar::next(None, &candle(10.0, 14.0, 9.0, 12.0));
        assert_approx(bar.open, 11.0, DEFAULT_EPSILON);
        assert_approx(bar.close, 11.25, DEFAULT_EPSILON);
        assert_approx(bar.high, 14.0, DEFAULT_EPSILON);
        assert_approx(bar.low, 9.0, DEFAULT_EPSILON);
        assert!(bar.is_bullish());
    }

    #[test]
    fn open_carries_previous_bar() {
        let bars = heikin_ashi(&[
            candle(10.0, 14.0, 9.0, 12.0),
            candle(12.0, 13.0, 11.0, 12.5),
        ]);
        assert_eq!(bars.len(), 2);
        // (11.0 + 11.25) / 2
        assert_approx(bars[1].open, 11.125, DEFAULT_EPSILON);
        // (12 + 13 + 11 + 12.5) / 4
        assert_approx(bars[1].close, 12.125, DEFAULT_EPSILON);
        assert_approx(bars[1].high, 13.0, DEFAULT_EPSILON);
        // synthetic open is below raw low
        assert_approx(bars[1].low, 11.0, DEFAULT_EPSILON);
    }

    #[test]
    fn range_covers_synthetic_open() {
        // prior smoothed bar far above the current raw range
        let prev = HeikinAshiBar {
            open: 50.0,
            high: 52.0,
            low: 48.0,
            close: 50.0,
        };
        let bar = HeikinAshiBar::next(Some(&prev), &candle(10.0, 11.0, 9.0, 10.0));
        assert_approx(bar.open, 50.0, DEFAULT_EPSILON);
        assert_approx(bar.high, 50.0, DEFAULT_EPSILON);
        assert_approx(bar.low, 9.0, DEFAULT_EPSILON);
        assert!(bar.is_bearish());
    }

    #[test]
    fn batch_matches_incremental_fold() {
        let candles: Vec<Candle> = (0..20)
            .map(|i| {
                let c = 100.0 + (i as f64 * 0.7).sin() * 5.0;
                candle(c - 0.4, c + 1.0, c - 1.0, c)
            })
            .collect();
        let batch = heikin_ashi(&candles);
        let mut prev: Option<HeikinAshiBar> = None;
        for (i, c) in candles.iter().enumerate() {
            let bar = HeikinAshiBar::next(prev.as_ref(), c);
            assert_eq!(bar, batch[i]);
            prev = Some(bar);
        }
    }

    #[test]
    fn causal_prefix_is_stable() {
        // appending candles never changes earlier smoothed bars
        let candles: Vec<Candle> = (0..10)
            .map(|i| candle(i as f64, i as f64 + 2.0, i as f64 - 1.0, i as f64 + 1.0))
            .collect();
        let short = heikin_ashi(&candles[..6]);
        let long = heikin_ashi(&candles);
        assert_eq!(&long[..6], short.as_slice());
    }
}
