//! Entry and signal-exit rules, selected once per run from the enabled filters.

use crate::domain::{Candle, Position, PositionSide};
use crate::indicators::IndicatorSnapshot;
use crate::settings::TradeType;

/// How entries are decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalMode {
    /// Smoothed bar direction and oscillator must agree.
    Both,
    /// Smoothed close versus previous smoothed close.
    HeikinOnly,
    /// Oscillator direction alone.
    ObvOnly,
    /// Neither filter enabled: raw close-to-close momentum confirmed by the candle body.
    RawMomentum,
}

/// Raw buy/sell readings for one candle, before the trade-type gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EntrySignal {
    pub buy: bool,
    pub sell: bool,
}

impl SignalMode {
    pub fn from_flags(use_obv: bool, use_heikin_ashi: bool) -> Self {
        match (use_obv, use_heikin_ashi) {
            (true, true) => SignalMode::Both,
            (false, true) => SignalMode::HeikinOnly,
            (true, false) => SignalMode::ObvOnly,
            (false, false) => SignalMode::RawMomentum,
        }
    }

    /// Whether the smoothed-candle filter is active (enables signal exits).
    pub fn uses_heikin_ashi(self) -> bool {
        matches!(self, SignalMode::Both | SignalMode::HeikinOnly)
    }

    pub fn evaluate(
        self,
        candle: &Candle,
        prev_candle: &Candle,
        indicators: &IndicatorSnapshot,
    ) -> EntrySignal {
        let ha = &indicators.heikin_ashi;
        let osc = indicators.oscillator;
        match self {
            SignalMode::Both => EntrySignal {
                buy: ha.is_bullish() && osc.is_up(),
                sell: ha.is_bearish() && osc.is_down(),
            },
            SignalMode::HeikinOnly => EntrySignal {
                buy: ha.close > indicators.prev_heikin_ashi.close,
                sell: ha.close < indicators.prev_heikin_ashi.close,
            },
            SignalMode::ObvOnly => EntrySignal {
                buy: osc.is_up(),
                sell: osc.is_down(),
            },
            SignalMode::RawMomentum => EntrySignal {
                buy: candle.close > prev_candle.close && candle.close > candle.open,
                sell: candle.close < prev_candle.close && candle.close < candle.open,
            },
        }
    }

    /// Whether the smoothed bar has turned against `position`.
    pub fn signals_exit(self, position: &Position, indicators: &IndicatorSnapshot) -> bool {
        if !self.uses_heikin_ashi() {
            return false;
        }
        match position.side {
            PositionSide::Long => indicators.heikin_ashi.is_bearish(),
            PositionSide::Short => indicators.heikin_ashi.is_bullish(),
        }
    }
}

impl EntrySignal {
    /// Apply the trade-type gate. Longs take precedence when both fire.
    pub fn side(self, trade_type: TradeType) -> Option<PositionSide> {
        if self.buy && trade_type.can_long() {
            Some(PositionSide::Long)
        } else if self.sell && trade_type.can_short() {
            Some(PositionSide::Short)
        } else {
            None
        }
    }
}
