//! Offline provider reading candle series from CSV files.
//!
//! Layout: `<dir>/<SYMBOL>_<timeframe>.csv` with a
//! `time,open,high,low,close,volume` header and epoch-millisecond times,
//! oldest row first. The exchange field of a request is ignored.

use std::path::{Path, PathBuf};

use chrono::DateTime;
use serde::Deserialize;

use super::provider::{normalize_symbol, retain_sane, CandleProvider, DataError, FetchRequest};
use crate::domain::Candle;

#[derive(Debug, Deserialize)]
struct CsvRow {
    time: i64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

#[derive(Debug, Clone)]
pub struct CsvProvider {
    dir: PathBuf,
}

impl CsvProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, symbol: &str, timeframe: &str) -> PathBuf {
        self.dir.join(format!("{}_{timeframe}.csv", normalize_symbol(symbol)))
    }
}

impl CandleProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch(&self, request: &FetchRequest) -> Result<Vec<Candle>, DataError> {
        let path = self.path_for(&request.symbol, &request.timeframe);
        if !path.exists() {
            return Err(DataError::SymbolNotFound {
                symbol: request.symbol.clone(),
            });
        }
        let mut candles = read_candles(&path)?;
        retain_sane(&mut candles, &request.symbol);
        let skip = candles.len().saturating_sub(request.limit);
        candles.drain(..skip);
        Ok(candles)
    }
}

/// Read every row of a candle CSV file.
pub fn read_candles(path: &Path) -> Result<Vec<Candle>, DataError> {
    let mut reader = ::csv::Reader::from_path(path)
        .map_err(|e| DataError::Csv(format!("open {}: {e}", path.display())))?;

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(line, row)| -> Result<Candle, DataError> {
            let row = row.map_err(|e| {
                DataError::Csv(format!("{} row {}: {e}", path.display(), line + 1))
            })?;
            let time = DateTime::from_timestamp_millis(row.time).ok_or_else(|| {
                DataError::ResponseFormatChanged(format!("invalid timestamp: {}", row.time))
            })?;
            Ok(Candle {
                time,
                open: row.open,
                high: row.high,
                low: row.low,
                close: row.close,
                volume: row.volume,
            })
        })
        .collect()
}
