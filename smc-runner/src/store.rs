//! In-memory last-signal store keyed by symbol and timeframe.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use smc_core::Signal;

#[derive(Debug, Default)]
pub struct SignalStore {
    signals: RwLock<BTreeMap<String, Signal>>,
}

impl SignalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(symbol: &str, timeframe: &str) -> String {
        format!("{symbol}_{timeframe}")
    }

    /// Store `signal` as the latest for the pair, returning the one it replaced.
    pub fn save(&self, symbol: &str, timeframe: &str, signal: Signal) -> Option<Signal> {
        let mut signals = self.signals.write().unwrap_or_else(PoisonError::into_inner);
        signals.insert(Self::key(symbol, timeframe), signal)
    }

    pub fn get(&self, symbol: &str, timeframe: &str) -> Option<Signal> {
        let signals = self.signals.read().unwrap_or_else(PoisonError::into_inner);
        signals.get(&Self::key(symbol, timeframe)).cloned()
    }

    /// Stored signals for one symbol as `(timeframe, signal)`, ordered by
    /// timeframe key.
    pub fn for_symbol(&self, symbol: &str) -> Vec<(String, Signal)> {
        let prefix = Self::key(symbol, "");
        let signals = self.signals.read().unwrap_or_else(PoisonError::into_inner);
        signals
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .map(|(key, signal)| (key[prefix.len()..].to_string(), signal.clone()))
            .collect()
    }

    /// Every stored signal, ordered by key.
    pub fn all(&self) -> Vec<(String, Signal)> {
        let signals = self.signals.read().unwrap_or_else(PoisonError::into_inner);
        signals.iter().map(|(k, s)| (k.clone(), s.clone())).collect()
    }

    pub fn len(&self) -> usize {
        self.signals.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
