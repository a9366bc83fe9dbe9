//! Candle: the fundamental market data unit.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One OHLC price bar for a fixed time interval.
///
/// `time` is the bar's open time in unix seconds. Sequences handed to the
/// engine are ordered by non-decreasing `time`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Candle {
    pub fn new(time: i64, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
        }
    }

    /// Returns true if any OHLC field is NaN or infinite.
    pub fn is_void(&self) -> bool {
        !(self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite())
    }

    /// Basic OHLC sanity check: high >= low, high >= open, high >= close, etc.
    pub fn is_sane(&self) -> bool {
        if self.is_void() {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
    }

    /// Close above open.
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Close below open.
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// UTC calendar date of the candle's timestamp.
    pub fn date(&self) -> NaiveDate {
        utc_date(self.time)
    }
}

/// UTC calendar date for a unix timestamp.
///
/// Timestamps outside chrono's representable range map to the epoch date.
pub fn utc_date(time: i64) -> NaiveDate {
    DateTime::from_timestamp(time, 0)
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
        .date_naive()
}
