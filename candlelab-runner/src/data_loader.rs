//! Candle loading for the runner.
//!
//! Candles come from a CSV file with a `time,open,high,low,close` header
//! (unix seconds, extra columns ignored) or from a seeded synthetic random
//! walk. Loaded series are validated before they reach the engine:
//! 1. Prices must be finite → otherwise fail
//! 2. Time must be non-decreasing → otherwise fail
//! 3. Rows with inconsistent OHLC (high below low, close outside the range)
//!    are skipped with a warning

use std::io::{Read, Write};
use std::path::Path;

use candlelab_core::Candle;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::{info, warn};

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}: non-finite price")]
    NonFinitePrice { row: usize },

    #[error("row {row}: time {time} is earlier than the previous candle ({prev})")]
    OutOfOrder { row: usize, prev: i64, time: i64 },
}

/// Read candles from any CSV source.
///
/// `row` in errors is the 1-based data row (header excluded).
pub fn read_candles_csv<R: Read>(reader: R) -> Result<Vec<Candle>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut candles: Vec<Candle> = Vec::new();
    let mut skipped = 0usize;
    for (i, record) in rdr.deserialize::<Candle>().enumerate() {
        let row = i + 1;
        let candle = record?;
        if candle.is_void() {
            return Err(LoadError::NonFinitePrice { row });
        }
        if let Some(prev) = candles.last() {
            if candle.time < prev.time {
                return Err(LoadError::OutOfOrder {
                    row,
                    prev: prev.time,
                    time: candle.time,
                });
            }
        }
        if !candle.is_sane() {
            warn!(row, time = candle.time, "skipping candle with inconsistent OHLC");
            skipped += 1;
            continue;
        }
        candles.push(candle);
    }

    if skipped > 0 {
        warn!(skipped, kept = candles.len(), "some candle rows were skipped");
    }
    Ok(candles)
}

/// Load candles from a CSV file.
pub fn load_candles_csv(path: &Path) -> Result<Vec<Candle>, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let candles = read_candles_csv(std::io::BufReader::new(file))?;
    info!(path = %path.display(), candles = candles.len(), "loaded candles");
    Ok(candles)
}

/// Write candles as CSV with the same header `read_candles_csv` expects.
pub fn write_candles_csv<W: Write>(writer: W, candles: &[Candle]) -> Result<(), LoadError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for candle in candles {
        wtr.serialize(candle)?;
    }
    wtr.flush().map_err(|source| LoadError::Io {
        path: "<writer>".into(),
        source,
    })?;
    Ok(())
}

/// Generate a synthetic candle series for demos and benchmarks.
///
/// A seeded random walk starting at 1.1000 (FX-like quotes). The same
/// `(count, seed, start_time, interval_secs)` always yields the same series.
pub fn generate_synthetic_candles(
    count: usize,
    seed: u64,
    start_time: i64,
    interval_secs: i64,
) -> Vec<Candle> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut price = 1.1_f64;

    (0..count)
        .map(|i| {
            let step: f64 = rng.gen_range(-0.002..0.002);
            let open = price;
            let close = (price * (1.0 + step)).max(0.0001);
            let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.001));
            let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.001));
            price = close;
            Candle::new(start_time + i as i64 * interval_secs, open, high, low, close)
        })
        .collect()
}
