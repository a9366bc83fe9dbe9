//! Trade: a completed round trip, emitted when a position closes.

use super::position::PositionSide;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a position was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExitReason {
    /// Adverse move reached the stop distance.
    Stop,
    /// Favourable move reached the target distance.
    Target,
    /// Smoothed candle turned against the position.
    Signal,
    /// Still open after the last candle.
    End,
}

impl ExitReason {
    pub fn as_str(self) -> &'static str {
        match self {
            ExitReason::Stop => "stop",
            ExitReason::Target => "target",
            ExitReason::Signal => "signal",
            ExitReason::End => "end",
        }
    }
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable ledger record: entry → exit.
///
/// `pnl` is net of the exit-side spread charge and the exit fee. The entry fee
/// is charged to capital when the position opens and is not part of `pnl`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    #[serde(rename = "type")]
    pub side: PositionSide,
    pub entry_price: f64,
    pub exit_price: f64,
    pub entry_time: i64,
    pub exit_time: i64,
    pub pnl: f64,
    pub exit_reason: ExitReason,
    /// Candles evaluated while this position was open.
    pub bars_held: usize,
}

impl Trade {
    pub fn is_winner(&self) -> bool {
        self.pnl > 0.0
    }

    pub fn is_loser(&self) -> bool {
        self.pnl < 0.0
    }

    pub fn is_neutral(&self) -> bool {
        self.pnl == 0.0
    }
}
