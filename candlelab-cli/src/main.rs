//! CandleLab CLI: run, sweep, and synthetic data commands.
//!
//! Commands:
//! - `run`: backtest one settings file over a candle CSV and save artifacts
//! - `sweep`: grid search over stop loss / take profit / oscillator period
//! - `synth`: write a seeded synthetic candle CSV

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use candlelab_core::{simulate, BacktestResult, Settings, TradeType};
use candlelab_runner::{
    export_sweep_csv, generate_synthetic_candles, load_candles_csv, load_settings,
    save_artifacts, write_candles_csv, ParamGrid, ParamSweep,
};

#[derive(Parser)]
#[command(
    name = "candlelab",
    about = "CandleLab CLI: single-position candle backtester"
)]
struct Cli {
    /// Debug-level logging (RUST_LOG takes precedence when set).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Backtest one configuration over a candle CSV.
    Run {
        /// Candle CSV with a time,open,high,low,close header.
        #[arg(long)]
        candles: PathBuf,

        /// Settings file (.toml or .json). Defaults apply when omitted.
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Directory for result.json, trades.csv, equity.csv and daily.csv.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Grid search over exit distances and indicator options.
    Sweep {
        /// Candle CSV with a time,open,high,low,close header.
        #[arg(long)]
        candles: PathBuf,

        /// Base settings file (.toml or .json).
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Stop-loss distances in points (comma separated).
        #[arg(long, value_delimiter = ',', required = true)]
        stop_loss: Vec<f64>,

        /// Take-profit distances in points (comma separated).
        #[arg(long, value_delimiter = ',', required = true)]
        take_profit: Vec<f64>,

        /// Oscillator periods (comma separated). Defaults to the base setting.
        #[arg(long, value_delimiter = ',')]
        obv_period: Vec<usize>,

        /// Trade types: long, short, both (comma separated). Defaults to the base setting.
        #[arg(long, value_delimiter = ',')]
        trade_type: Vec<TradeType>,

        /// Number of ranked rows to print.
        #[arg(long, default_value_t = 10)]
        top: usize,

        /// Write the full ranked summary as CSV.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Run grid points sequentially.
        #[arg(long, default_value_t = false)]
        sequential: bool,
    },
    /// Write a seeded synthetic candle CSV.
    Synth {
        /// Number of candles.
        #[arg(long)]
        count: usize,

        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Seconds between candles.
        #[arg(long, default_value_t = 3600)]
        interval: i64,

        /// Unix time of the first candle.
        #[arg(long, default_value_t = 1_704_067_200)]
        start: i64,

        #[arg(long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run {
            candles,
            settings,
            output,
        } => run_cmd(&candles, settings.as_deref(), output.as_deref()),
        Commands::Sweep {
            candles,
            settings,
            stop_loss,
            take_profit,
            obv_period,
            trade_type,
            top,
            output,
            sequential,
        } => {
            let base = read_settings(settings.as_deref())?;
            let mut grid = ParamGrid::from_base(&base);
            grid.stop_losses = stop_loss;
            grid.take_profits = take_profit;
            if !obv_period.is_empty() {
                grid.obv_periods = obv_period;
            }
            if !trade_type.is_empty() {
                grid.trade_types = trade_type;
            }
            sweep_cmd(&candles, &base, &grid, top, output.as_deref(), sequential)
        }
        Commands::Synth {
            count,
            seed,
            interval,
            start,
            output,
        } => synth_cmd(count, seed, start, interval, &output),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn read_settings(path: Option<&Path>) -> Result<Settings> {
    match path {
        Some(p) => load_settings(p).with_context(|| format!("loading {}", p.display())),
        None => Ok(Settings::default()),
    }
}

fn run_cmd(candles_path: &Path, settings_path: Option<&Path>, output: Option<&Path>) -> Result<()> {
    let settings = read_settings(settings_path)?;
    let candles = load_candles_csv(candles_path)
        .with_context(|| format!("loading {}", candles_path.display()))?;

    let result = simulate(&candles, &settings)?;
    info!(
        trades = result.total_trades,
        total_gain = result.total_gain,
        "backtest complete"
    );
    print_summary(&settings, &result);

    if let Some(dir) = output {
        let dir = save_artifacts(&result, dir)?;
        println!("Artifacts saved to: {}", dir.display());
    }
    Ok(())
}

fn sweep_cmd(
    candles_path: &Path,
    base: &Settings,
    grid: &ParamGrid,
    top: usize,
    output: Option<&Path>,
    sequential: bool,
) -> Result<()> {
    if grid.size() == 0 {
        bail!("sweep grid is empty");
    }
    let candles = load_candles_csv(candles_path)
        .with_context(|| format!("loading {}", candles_path.display()))?;

    info!(points = grid.size(), "starting sweep");
    let results = ParamSweep::new()
        .with_parallelism(!sequential)
        .sweep(&candles, grid, base)?;

    println!(
        "{:>4}  {:>8}  {:>8}  {:>5}  {:>5}  {:>3}  {:>12}  {:>7}  {:>6}",
        "rank", "stop", "target", "type", "obv", "ha", "total_gain", "win%", "trades"
    );
    for (rank, p) in results.top_n(top).iter().enumerate() {
        let s = &p.settings;
        let obv = if s.use_obv {
            s.obv_period.to_string()
        } else {
            "-".into()
        };
        println!(
            "{:>4}  {:>8}  {:>8}  {:>5}  {:>5}  {:>3}  {:>12.2}  {:>7.2}  {:>6}",
            rank + 1,
            s.stop_loss,
            s.take_profit,
            s.trade_type.as_str(),
            obv,
            if s.use_heikin_ashi { "on" } else { "off" },
            p.result.total_gain,
            p.result.win_rate,
            p.result.total_trades,
        );
    }

    if let Some(path) = output {
        let csv = export_sweep_csv(&results.ranked())?;
        std::fs::write(path, csv).with_context(|| format!("writing {}", path.display()))?;
        println!("Sweep summary saved to: {}", path.display());
    }
    Ok(())
}

fn synth_cmd(count: usize, seed: u64, start: i64, interval: i64, output: &Path) -> Result<()> {
    if interval <= 0 {
        bail!("--interval must be positive");
    }
    let candles = generate_synthetic_candles(count, seed, start, interval);
    let file = std::fs::File::create(output)
        .with_context(|| format!("creating {}", output.display()))?;
    write_candles_csv(std::io::BufWriter::new(file), &candles)?;
    info!(count, seed, path = %output.display(), "synthetic candles written");
    Ok(())
}

fn print_summary(settings: &Settings, r: &BacktestResult) {
    println!("=== {} ===", settings.asset);
    println!(
        "Candles: {}  Capital: {:.2} → {:.2}",
        r.bar_count, r.initial_capital, r.final_capital
    );
    println!();
    println!("Total gain:        {:>12.2}", r.total_gain);
    println!("Return:            {:>11.2}%", r.total_return() * 100.0);
    println!(
        "Trades:            {:>12}  (W {} / L {} / N {})",
        r.total_trades, r.winning_trades, r.losing_trades, r.neutral_trades
    );
    println!("Win rate:          {:>11.2}%", r.win_rate);
    println!("Gain/loss ratio:   {:>12.3}", r.gain_loss_ratio);
    println!("Gains only:        {:>12.2}", r.gains_only);
    println!("Losses only:       {:>12.2}", r.losses_only);
    println!("Avg per trade:     {:>12.2}", r.avg_gain_per_trade);
    println!("Best / worst:      {:>12.2} / {:.2}", r.best_trade, r.worst_trade);
    println!("Max drawdown:      {:>12.2}", r.max_drawdown);
    println!("Max run-up:        {:>12.2}", r.max_runup);
    println!("Time in market:    {:>11.2}%", r.time_in_market);
    println!("Orders per day:    {:>12.2}", r.avg_orders_per_day);
}
