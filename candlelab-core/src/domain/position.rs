use serde::{Deserialize, Serialize};

/// Direction of an open position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionSide {
    Long,
    Short,
}

impl PositionSide {
    /// Price move from `entry` to `price`, positive when it favours this side.
    pub fn signed_delta(self, entry: f64, price: f64) -> f64 {
        match self {
            PositionSide::Long => price - entry,
            PositionSide::Short => entry - price,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PositionSide::Long => "long",
            PositionSide::Short => "short",
        }
    }
}

/// The single open position. Alive between an entry and its matching exit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub side: PositionSide,
    pub entry_price: f64,
    pub entry_time: i64,
    /// Candle index at which the position was opened.
    pub entry_index: usize,
}

impl Position {
    /// Favourable price move at `price` (negative when adverse).
    pub fn unrealized_delta(&self, price: f64) -> f64 {
        self.side.signed_delta(self.entry_price, price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(side: PositionSide) -> Position {
        Position {
            side,
            entry_price: 100.0,
            entry_time: 0,
            entry_index: 1,
        }
    }

    #[test]
    fn long_delta_follows_price() {
        let pos = position(PositionSide::Long);
        assert_eq!(pos.unrealized_delta(105.0), 5.0);
        assert_eq!(pos.unrealized_delta(95.0), -5.0);
    }

    #[test]
    fn short_delta_is_inverted() {
        let pos = position(PositionSide::Short);
        assert_eq!(pos.unrealized_delta(105.0), -5.0);
        assert_eq!(pos.unrealized_delta(95.0), 5.0);
    }

    #[test]
    fn side_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&PositionSide::Short).unwrap(),
            "\"short\""
        );
    }
}
