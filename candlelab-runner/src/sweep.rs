//! Parameter sweep over a settings grid.

use rayon::prelude::*;
use std::collections::HashMap;
use thiserror::Error;
use tracing::info;

use candlelab_core::{simulate, BacktestResult, Candle, EngineError, Settings, TradeType};

use crate::config::{settings_fingerprint, SettingsId};

#[derive(Debug, Error)]
pub enum SweepError {
    #[error("parameter grid is empty")]
    EmptyGrid,

    #[error("sweep point {index} failed: {source}")]
    Point {
        index: usize,
        #[source]
        source: EngineError,
    },
}

/// Parameter grid specification.
///
/// Each axis lists the values to try. The grid is the cartesian product of
/// all axes, applied on top of a base `Settings`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamGrid {
    /// Stop-loss distances in points
    pub stop_losses: Vec<f64>,

    /// Take-profit distances in points
    pub take_profits: Vec<f64>,

    /// Oscillator look-back periods
    pub obv_periods: Vec<usize>,

    pub trade_types: Vec<TradeType>,

    /// `useOBV` toggles to try
    pub use_obv: Vec<bool>,

    /// `useHeikinAshi` toggles to try
    pub use_heikin_ashi: Vec<bool>,
}

impl ParamGrid {
    /// A single-point grid holding the base settings' own values.
    pub fn from_base(base: &Settings) -> Self {
        Self {
            stop_losses: vec![base.stop_loss],
            take_profits: vec![base.take_profit],
            obv_periods: vec![base.obv_period],
            trade_types: vec![base.trade_type],
            use_obv: vec![base.use_obv],
            use_heikin_ashi: vec![base.use_heikin_ashi],
        }
    }

    /// Upper bound on the number of configurations (before dropping repeated
    /// axis values and oscillator periods that have no effect).
    pub fn size(&self) -> usize {
        self.stop_losses.len()
            * self.take_profits.len()
            * self.obv_periods.len()
            * self.trade_types.len()
            * self.use_obv.len()
            * self.use_heikin_ashi.len()
    }

    /// Generates all settings in the grid, in axis order.
    ///
    /// Repeated values on an axis are tried once, so every point has a
    /// distinct fingerprint. With the oscillator off the period is
    /// irrelevant, so only the first period is kept for those points.
    pub fn generate_settings(&self, base: &Settings) -> Vec<Settings> {
        let stop_losses = distinct(&self.stop_losses);
        let take_profits = distinct(&self.take_profits);
        let obv_periods = distinct(&self.obv_periods);
        let trade_types = distinct(&self.trade_types);
        let use_obv_flags = distinct(&self.use_obv);
        let use_heikin_ashi_flags = distinct(&self.use_heikin_ashi);
        let mut out = Vec::with_capacity(self.size());

        for &stop_loss in &stop_losses {
            for &take_profit in &take_profits {
                for &trade_type in &trade_types {
                    for &use_heikin_ashi in &use_heikin_ashi_flags {
                        for &use_obv in &use_obv_flags {
                            for (k, &obv_period) in obv_periods.iter().enumerate() {
                                if !use_obv && k > 0 {
                                    continue;
                                }
                                out.push(Settings {
                                    stop_loss,
                                    take_profit,
                                    trade_type,
                                    use_heikin_ashi,
                                    use_obv,
                                    obv_period,
                                    ..base.clone()
                                });
                            }
                        }
                    }
                }
            }
        }

        out
    }
}

/// Axis values with later repeats dropped, first-seen order kept.
fn distinct<T: Copy + PartialEq>(values: &[T]) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(values.len());
    for &v in values {
        if !out.contains(&v) {
            out.push(v);
        }
    }
    out
}

/// One evaluated grid point.
#[derive(Debug, Clone)]
pub struct SweepPoint {
    pub settings: Settings,
    pub fingerprint: SettingsId,
    pub result: BacktestResult,
}

/// Parameter sweep executor.
///
/// Runs the engine once per grid point over a shared candle series,
/// optionally in parallel.
#[derive(Debug, Clone)]
pub struct ParamSweep {
    parallel: bool,
}

impl Default for ParamSweep {
    fn default() -> Self {
        Self::new()
    }
}

impl ParamSweep {
    pub fn new() -> Self {
        Self { parallel: true }
    }

    /// Enables or disables parallel execution.
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Executes the sweep. Fails on the first grid point the engine rejects.
    pub fn sweep(
        &self,
        candles: &[Candle],
        grid: &ParamGrid,
        base: &Settings,
    ) -> Result<SweepResults, SweepError> {
        let configs = grid.generate_settings(base);
        if configs.is_empty() {
            return Err(SweepError::EmptyGrid);
        }

        let run_point = |(index, settings): (usize, &Settings)| -> Result<SweepPoint, SweepError> {
            let result =
                simulate(candles, settings).map_err(|source| SweepError::Point { index, source })?;
            Ok(SweepPoint {
                fingerprint: settings_fingerprint(settings),
                settings: settings.clone(),
                result,
            })
        };

        let points: Vec<SweepPoint> = if self.parallel {
            configs
                .par_iter()
                .enumerate()
                .map(run_point)
                .collect::<Result<Vec<_>, _>>()?
        } else {
            configs
                .iter()
                .enumerate()
                .map(run_point)
                .collect::<Result<Vec<_>, _>>()?
        };

        info!(points = points.len(), candles = candles.len(), "sweep finished");
        Ok(SweepResults::new(points))
    }
}

/// Run a parallel sweep with default options.
pub fn run_sweep(
    candles: &[Candle],
    grid: &ParamGrid,
    base: &Settings,
) -> Result<SweepResults, SweepError> {
    ParamSweep::new().sweep(candles, grid, base)
}

/// Results from a parameter sweep, in grid order.
#[derive(Debug)]
pub struct SweepResults {
    points: Vec<SweepPoint>,
    by_fingerprint: HashMap<SettingsId, usize>,
}

impl SweepResults {
    fn new(points: Vec<SweepPoint>) -> Self {
        let by_fingerprint = points
            .iter()
            .enumerate()
            .map(|(i, p)| (p.fingerprint.clone(), i))
            .collect();
        Self {
            points,
            by_fingerprint,
        }
    }

    pub fn all(&self) -> &[SweepPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Gets a point by its settings fingerprint.
    pub fn get(&self, fingerprint: &str) -> Option<&SweepPoint> {
        self.by_fingerprint.get(fingerprint).map(|&i| &self.points[i])
    }

    /// Points sorted by total gain (descending). Ties keep grid order.
    pub fn ranked(&self) -> Vec<&SweepPoint> {
        let mut sorted: Vec<_> = self.points.iter().collect();
        sorted.sort_by(|a, b| {
            b.result
                .total_gain
                .partial_cmp(&a.result.total_gain)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        sorted
    }

    pub fn top_n(&self, n: usize) -> Vec<&SweepPoint> {
        self.ranked().into_iter().take(n).collect()
    }

    pub fn best(&self) -> Option<&SweepPoint> {
        self.ranked().into_iter().next()
    }
}
