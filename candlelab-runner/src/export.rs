//! Result export: JSON and CSV artifacts.
//!
//! Provides the export formats for a backtest:
//! - **JSON**: full serialization of `BacktestResult` (camelCase keys)
//! - **CSV**: trade tape, equity trace, daily gains
//! - **Sweep CSV**: one summary row per grid point

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use candlelab_core::{BacktestResult, DailyPerformance, Trade};
use tracing::info;

use crate::sweep::SweepPoint;

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a `BacktestResult` to pretty JSON.
pub fn export_json(result: &BacktestResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("failed to serialize BacktestResult to JSON")
}

/// Deserialize a `BacktestResult` from JSON.
pub fn import_json(json: &str) -> Result<BacktestResult> {
    serde_json::from_str(json).context("failed to deserialize BacktestResult from JSON")
}

// ─── CSV export ─────────────────────────────────────────────────────

fn finish(wtr: csv::Writer<Vec<u8>>) -> Result<String> {
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Export a trade list as CSV.
///
/// Columns: type, entry_time, exit_time, entry_price, exit_price, pnl,
/// exit_reason, bars_held
pub fn export_trades_csv(trades: &[Trade]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "type",
        "entry_time",
        "exit_time",
        "entry_price",
        "exit_price",
        "pnl",
        "exit_reason",
        "bars_held",
    ])?;

    for t in trades {
        wtr.write_record([
            t.side.as_str(),
            &t.entry_time.to_string(),
            &t.exit_time.to_string(),
            &format!("{:.6}", t.entry_price),
            &format!("{:.6}", t.exit_price),
            &format!("{:.2}", t.pnl),
            t.exit_reason.as_str(),
            &t.bars_held.to_string(),
        ])?;
    }

    finish(wtr)
}

/// Export an equity trace as CSV with bar_index and equity columns.
pub fn export_equity_csv(equity: &[f64]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["bar_index", "equity"])?;
    for (i, eq) in equity.iter().enumerate() {
        wtr.write_record([&i.to_string(), &format!("{:.2}", eq)])?;
    }
    finish(wtr)
}

/// Export daily gains as CSV with date (YYYY-MM-DD) and gain columns.
pub fn export_daily_csv(daily: &[DailyPerformance]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["date", "gain"])?;
    for d in daily {
        wtr.write_record([&d.date.to_string(), &format!("{:.2}", d.gain)])?;
    }
    finish(wtr)
}

/// Export sweep points as a CSV summary, one row per point in the given order.
pub fn export_sweep_csv(points: &[&SweepPoint]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "rank",
        "fingerprint",
        "stop_loss",
        "take_profit",
        "trade_type",
        "use_obv",
        "obv_period",
        "use_heikin_ashi",
        "total_gain",
        "win_rate",
        "gain_loss_ratio",
        "total_trades",
        "max_drawdown",
        "time_in_market",
    ])?;

    for (rank, p) in points.iter().enumerate() {
        let s = &p.settings;
        let r = &p.result;
        wtr.write_record([
            &(rank + 1).to_string(),
            &p.fingerprint,
            &s.stop_loss.to_string(),
            &s.take_profit.to_string(),
            &s.trade_type.as_str().to_string(),
            &s.use_obv.to_string(),
            &s.obv_period.to_string(),
            &s.use_heikin_ashi.to_string(),
            &format!("{:.2}", r.total_gain),
            &format!("{:.2}", r.win_rate),
            &format!("{:.4}", r.gain_loss_ratio),
            &r.total_trades.to_string(),
            &format!("{:.2}", r.max_drawdown),
            &format!("{:.2}", r.time_in_market),
        ])?;
    }

    finish(wtr)
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the full artifact set for a single backtest run into `output_dir`:
/// - `result.json`: the full `BacktestResult`
/// - `trades.csv`: trade tape
/// - `equity.csv`: per-candle equity
/// - `daily.csv`: gains per exit day
///
/// Returns the directory path.
pub fn save_artifacts(result: &BacktestResult, output_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create artifact dir: {}", output_dir.display()))?;

    let files = [
        ("result.json", export_json(result)?),
        ("trades.csv", export_trades_csv(&result.trades)?),
        ("equity.csv", export_equity_csv(&result.equity)?),
        ("daily.csv", export_daily_csv(&result.daily_performance)?),
    ];
    for (name, content) in &files {
        let path = output_dir.join(name);
        std::fs::write(&path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    info!(dir = %output_dir.display(), "artifacts saved");
    Ok(output_dir.to_path_buf())
}

/// Load a `BacktestResult` from an artifact directory's result.json.
pub fn load_artifacts(dir: &Path) -> Result<BacktestResult> {
    let path = dir.join("result.json");
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use candlelab_core::{ExitReason, PositionSide};
    use chrono::NaiveDate;

    fn sample_trade() -> Trade {
        Trade {
            side: PositionSide::Short,
            entry_price: 1.10005,
            exit_price: 1.09505,
            entry_time: 1_704_067_200,
            exit_time: 1_704_078_000,
            pnl: 249.5,
            exit_reason: ExitReason::Target,
            bars_held: 3,
        }
    }

    #[test]
    fn csv_trades_columns_and_content() {
        let csv = export_trades_csv(&[sample_trade()]).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "type,entry_time,exit_time,entry_price,exit_price,pnl,exit_reason,bars_held"
        );
        assert_eq!(
            lines.next().unwrap(),
            "short,1704067200,1704078000,1.100050,1.095050,249.50,target,3"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn csv_empty_trades_has_header_only() {
        let csv = export_trades_csv(&[]).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn csv_equity_basic() {
        let csv = export_equity_csv(&[2000.0, 1999.5, 2010.25]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines, vec!["bar_index,equity", "0,2000.00", "1,1999.50", "2,2010.25"]);
    }

    #[test]
    fn csv_daily_uses_iso_dates() {
        let daily = vec![DailyPerformance {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            gain: -12.5,
        }];
        let csv = export_daily_csv(&daily).unwrap();
        assert_eq!(csv.lines().nth(1).unwrap(), "2024-01-02,-12.50");
    }
}
