//! Simple Moving Average (SMA) of close prices over a trailing window.

use crate::domain::Candle;

#[derive(Debug, Clone, Copy)]
pub struct Sma {
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    /// Mean of the last `period` closes.
    ///
    /// NaN when the series is shorter than the period or the period is zero,
    /// so every comparison against it fails.
    pub fn latest(&self, candles: &[Candle]) -> f64 {
        if self.period == 0 || candles.len() < self.period {
            return f64::NAN;
        }
        let window = &candles[candles.len() - self.period..];
        window.iter().map(|c| c.close).sum::<f64>() / self.period as f64
    }
}
