//! Cost model: flat order fee and modelled spread.
//!
//! The spread is directional: longs enter above the close, shorts below it.
//! On exit the spread is charged again in money terms, and the fee is charged
//! on both the open and the close event.

use crate::domain::PositionSide;

/// Execution friction for a run. Both values are zero when disabled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostModel {
    /// Flat fee per open or close event, in account currency.
    pub order_fee: f64,
    /// Spread in price units (`spread_pips * point_value`).
    pub spread_cost: f64,
}

impl CostModel {
    pub fn new(order_fee: f64, spread_cost: f64) -> Self {
        Self {
            order_fee,
            spread_cost,
        }
    }

    pub fn frictionless() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Entry price for a position opened at `close`.
    ///
    /// Directional: longs pay up, shorts sell lower.
    pub fn entry_price(&self, close: f64, side: PositionSide) -> f64 {
        match side {
            PositionSide::Long => close + self.spread_cost,
            PositionSide::Short => close - self.spread_cost,
        }
    }

    /// Money charged for the spread when closing a position of `exposure`
    /// (position size times contract value).
    pub fn exit_spread_charge(&self, exposure: f64) -> f64 {
        self.spread_cost * exposure
    }

    /// Net P&L of a close: gross move less exit spread charge less exit fee.
    pub fn net_exit_pnl(&self, price_delta: f64, exposure: f64) -> f64 {
        price_delta * exposure - self.exit_spread_charge(exposure) - self.order_fee
    }
}

impl Default for CostModel {
    fn default() -> Self {
        Self::frictionless()
    }
}
