//! CandleLab Runner: caller-side orchestration around the engine.
//!
//! This crate builds on `candlelab-core` to provide:
//! - Candle loading from CSV, and seeded synthetic candles
//! - Settings files (TOML / JSON) and settings fingerprints
//! - Parallel parameter sweeps ranked by total gain
//! - JSON / CSV export of results and sweep summaries

pub mod config;
pub mod data_loader;
pub mod export;
pub mod sweep;

pub use config::{load_settings, settings_fingerprint, ConfigError, SettingsFormat, SettingsId};
pub use data_loader::{
    generate_synthetic_candles, load_candles_csv, read_candles_csv, write_candles_csv, LoadError,
};
pub use export::{
    export_daily_csv, export_equity_csv, export_json, export_sweep_csv, export_trades_csv,
    import_json, load_artifacts, save_artifacts,
};
pub use sweep::{run_sweep, ParamGrid, ParamSweep, SweepError, SweepPoint, SweepResults};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn sweep_types_are_send_sync() {
        assert_send::<ParamGrid>();
        assert_sync::<ParamGrid>();
        assert_send::<SweepPoint>();
        assert_sync::<SweepPoint>();
        assert_send::<SweepResults>();
        assert_sync::<SweepResults>();
    }

    #[test]
    fn error_types_are_send_sync() {
        assert_send::<LoadError>();
        assert_sync::<LoadError>();
        assert_send::<ConfigError>();
        assert_sync::<ConfigError>();
        assert_send::<SweepError>();
        assert_sync::<SweepError>();
    }
}
