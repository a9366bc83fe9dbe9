//! CandleLab Core: single-position strategy backtesting engine.
//!
//! This crate contains the whole engine:
//! - Domain types (candles, positions, trades, asset profiles)
//! - Settings and their validated, resolved form
//! - Indicator pipeline (volume-direction oscillator, Heikin-Ashi smoothing)
//! - Candle loop with a FLAT / IN_POSITION state machine
//! - Statistics aggregation into a `BacktestResult`
//!
//! `simulate` is a pure, deterministic function of its inputs. It performs no
//! I/O and shares no state between calls.

pub mod domain;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod metrics;
pub mod result;
pub mod settings;

pub use domain::{AssetProfile, Candle, ExitReason, Position, PositionSide, Trade};
pub use engine::{simulate, simulate_resolved};
pub use error::EngineError;
pub use result::{BacktestResult, DailyPerformance};
pub use settings::{ResolvedSettings, Settings, TradeType};
