//! Domain types for CandleLab

pub mod asset;
pub mod candle;
pub mod position;
pub mod trade;

pub use asset::AssetProfile;
pub use candle::{utc_date, Candle};
pub use position::{Position, PositionSide};
pub use trade::{ExitReason, Trade};
