//! Strategy settings as supplied by callers, and their resolved form.
//!
//! `Settings` mirrors the external configuration object (camelCase keys, every
//! key optional). `Settings::resolve` validates it once and produces an
//! immutable `ResolvedSettings` carrying the clamped position size, the asset
//! profile, the cost model and the selected `SignalMode`.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::AssetProfile;
use crate::engine::cost_model::CostModel;
use crate::engine::signal_mode::SignalMode;
use crate::error::EngineError;

/// Which entry directions are permitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeType {
    Long,
    Short,
    #[default]
    Both,
}

impl TradeType {
    pub fn can_long(self) -> bool {
        matches!(self, TradeType::Long | TradeType::Both)
    }

    pub fn can_short(self) -> bool {
        matches!(self, TradeType::Short | TradeType::Both)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TradeType::Long => "long",
            TradeType::Short => "short",
            TradeType::Both => "both",
        }
    }
}

impl std::str::FromStr for TradeType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "long" => Ok(TradeType::Long),
            "short" => Ok(TradeType::Short),
            "both" => Ok(TradeType::Both),
            other => Err(EngineError::invalid(format!(
                "unknown trade type '{other}' (expected long, short or both)"
            ))),
        }
    }
}

/// Caller-facing settings object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub initial_capital: f64,
    pub position_size: f64,
    pub max_position_size: f64,
    /// Stop distance in points.
    pub stop_loss: f64,
    /// Target distance in points.
    pub take_profit: f64,
    pub trade_type: TradeType,
    pub asset: String,
    /// Overrides the asset table's point value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_value: Option<f64>,
    /// Overrides the asset table's contract value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_value: Option<f64>,
    pub use_order_fee: bool,
    pub order_fee: f64,
    pub use_spread: bool,
    pub spread_pips: f64,
    #[serde(rename = "useOBV", alias = "useObv")]
    pub use_obv: bool,
    #[serde(rename = "obvPeriod")]
    pub obv_period: usize,
    pub use_heikin_ashi: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            initial_capital: 2000.0,
            position_size: 0.5,
            max_position_size: 1.0,
            stop_loss: 50.0,
            take_profit: 100.0,
            trade_type: TradeType::Both,
            asset: "EURUSD".to_string(),
            point_value: None,
            contract_value: None,
            use_order_fee: false,
            order_fee: 0.0,
            use_spread: false,
            spread_pips: 0.0,
            use_obv: true,
            obv_period: 10,
            use_heikin_ashi: true,
        }
    }
}

impl Settings {
    /// Validate and resolve into the immutable form the engine runs on.
    pub fn resolve(&self) -> Result<ResolvedSettings, EngineError> {
        require_positive("initialCapital", self.initial_capital)?;
        require_positive("positionSize", self.position_size)?;
        require_positive("maxPositionSize", self.max_position_size)?;
        require_non_negative("stopLoss", self.stop_loss)?;
        require_non_negative("takeProfit", self.take_profit)?;
        if self.use_order_fee {
            require_non_negative("orderFee", self.order_fee)?;
        }
        if self.use_spread {
            require_non_negative("spreadPips", self.spread_pips)?;
        }
        if self.use_obv && self.obv_period == 0 {
            return Err(EngineError::invalid("obvPeriod must be at least 1"));
        }

        let mut profile = match AssetProfile::lookup(&self.asset) {
            Some(profile) => profile,
            None => {
                warn!(asset = %self.asset, "unknown asset, using default point/contract values");
                AssetProfile::DEFAULT
            }
        };
        if let Some(point_value) = self.point_value {
            profile.point_value = point_value;
        }
        if let Some(contract_value) = self.contract_value {
            profile.contract_value = contract_value;
        }
        require_positive("pointValue", profile.point_value)?;
        require_positive("contractValue", profile.contract_value)?;

        let costs = CostModel::new(
            if self.use_order_fee { self.order_fee } else { 0.0 },
            if self.use_spread {
                profile.points_to_price(self.spread_pips)
            } else {
                0.0
            },
        );

        Ok(ResolvedSettings {
            initial_capital: self.initial_capital,
            position_size: self.position_size.min(self.max_position_size),
            stop_distance: profile.points_to_price(self.stop_loss),
            target_distance: profile.points_to_price(self.take_profit),
            trade_type: self.trade_type,
            profile,
            costs,
            obv_period: self.obv_period.max(1),
            signal_mode: SignalMode::from_flags(self.use_obv, self.use_heikin_ashi),
        })
    }
}

fn require_positive(name: &str, value: f64) -> Result<(), EngineError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(EngineError::invalid(format!(
            "{name} must be a positive number, got {value}"
        )))
    }
}

fn require_non_negative(name: &str, value: f64) -> Result<(), EngineError> {
    // Infinity is allowed: an unreachable stop or target.
    if !value.is_nan() && value >= 0.0 {
        Ok(())
    } else {
        Err(EngineError::invalid(format!(
            "{name} must not be negative, got {value}"
        )))
    }
}

/// Settings after validation. Immutable for the duration of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSettings {
    pub initial_capital: f64,
    /// Already clamped to the configured maximum.
    pub position_size: f64,
    /// Stop loss converted to price units.
    pub stop_distance: f64,
    /// Take profit converted to price units.
    pub target_distance: f64,
    pub trade_type: TradeType,
    pub profile: AssetProfile,
    pub costs: CostModel,
    pub obv_period: usize,
    pub signal_mode: SignalMode,
}

impl ResolvedSettings {
    /// Money per unit of price move for the configured position.
    pub fn exposure(&self) -> f64 {
        self.position_size * self.profile.contract_value
    }
}
