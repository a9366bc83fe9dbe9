//! Backtesting engine: candle-by-candle loop and the position state machine.
//!
//! The engine consumes an ordered candle slice and resolved settings, advances
//! the indicator pipeline once per candle, and runs a two-state machine
//! (FLAT / IN_POSITION) over it:
//!
//! 1. FLAT: entry signal by `SignalMode`, gated by trade type
//! 2. IN_POSITION: stop, target, then signal exit
//! 3. Last candle: forced close with reason `end`
//! 4. Capital recorded into the equity trace

pub mod accounting;
pub mod cost_model;
pub mod loop_runner;
pub mod signal_mode;
pub mod state;

pub use accounting::EquityTracker;
pub use cost_model::CostModel;
pub use loop_runner::{simulate, simulate_resolved, MIN_CANDLES};
pub use signal_mode::{EntrySignal, SignalMode};
pub use state::EngineState;
