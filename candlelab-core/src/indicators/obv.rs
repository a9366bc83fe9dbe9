//! Volume-direction oscillator.
//!
//! Cumulative, unbounded running sum of close-to-close moves:
//! up-closes add `close - prev_close`, down-closes subtract
//! `prev_close - close`, equal closes leave it unchanged. The first candle
//! only sets the reference close and contributes no history entry.

use crate::domain::Candle;

/// Direction read from the oscillator history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Flat,
}

impl Direction {
    pub fn is_up(self) -> bool {
        self == Direction::Up
    }

    pub fn is_down(self) -> bool {
        self == Direction::Down
    }
}

/// Incremental oscillator state.
#[derive(Debug, Clone)]
pub struct VolumeOscillator {
    prev_close: f64,
    total: f64,
    history: Vec<f64>,
}

impl VolumeOscillator {
    /// Start from the first candle's close with a zero accumulator.
    pub fn new(first_close: f64) -> Self {
        Self {
            prev_close: first_close,
            total: 0.0,
            history: Vec::new(),
        }
    }

    /// Same as [`VolumeOscillator::new`] with room for `capacity` updates.
    pub fn with_capacity(first_close: f64, capacity: usize) -> Self {
        Self {
            prev_close: first_close,
            total: 0.0,
            history: Vec::with_capacity(capacity),
        }
    }

    /// Fold in the next close and return the new running total.
    pub fn update(&mut self, close: f64) -> f64 {
        if close > self.prev_close {
            self.total += close - self.prev_close;
        } else if close < self.prev_close {
            self.total -= self.prev_close - close;
        }
        self.prev_close = close;
        self.history.push(self.total);
        self.total
    }

    pub fn value(&self) -> f64 {
        self.total
    }

    pub fn history(&self) -> &[f64] {
        &self.history
    }

    pub fn signal(&self, period: usize) -> Direction {
        oscillator_signal(&self.history, period)
    }
}

/// Read a direction from an oscillator history.
///
/// - fewer than `period` values: `Flat`
/// - at least `period` but fewer than `2 * period` (older window not full):
///   `Up` when the latest value is positive, otherwise `Down`
/// - otherwise compare the mean of the last `period` values with the mean of
///   the `period` values before them
pub fn oscillator_signal(history: &[f64], period: usize) -> Direction {
    let n = history.len();
    if period == 0 || n < period {
        return Direction::Flat;
    }
    if n < 2 * period {
        return match history.last() {
            Some(&latest) if latest > 0.0 => Direction::Up,
            _ => Direction::Down,
        };
    }

    let recent = mean(&history[n - period..]);
    let older = mean(&history[n - 2 * period..n - period]);
    if recent > older {
        Direction::Up
    } else if recent < older {
        Direction::Down
    } else {
        Direction::Flat
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Batch form: oscillator history for a candle series (length `n - 1`).
pub fn volume_oscillator(candles: &[Candle]) -> Vec<f64> {
    let Some(first) = candles.first() else {
        return Vec::new();
    };
    let mut osc = VolumeOscillator::with_capacity(first.close, candles.len().saturating_sub(1));
    for candle in &candles[1..] {
        osc.update(candle.close);
    }
    osc.history
}
