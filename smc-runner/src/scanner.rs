//! Periodic scanner over a fixed list of pairs.
//!
//! Each pass analyzes every pair in parallel, notifies only new or changed
//! signals and always stores the latest one.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use smc_core::data::normalize_symbol;
use smc_core::Signal;

use crate::config::ScannerSection;
use crate::service::{AnalysisService, AnalyzeRequest};
use crate::store::SignalStore;

/// Relative entry-midpoint move, in percent, that counts as a change.
const ENTRY_MOVE_PCT: f64 = 0.01;

/// Longest sleep between checks of the stop flag.
const STOP_POLL: Duration = Duration::from_millis(200);

/// Whether `next` differs enough from `prev` to notify again.
///
/// A side flip, an entry midpoint moved by more than 0.01 %, or any change in
/// stop or target.
pub fn signal_changed(prev: &Signal, next: &Signal) -> bool {
    if prev.side != next.side {
        return true;
    }

    let prev_mid = prev.entry.midpoint();
    if prev_mid > 0.0 {
        let moved_pct = (next.entry.midpoint() - prev_mid) / prev_mid * 100.0;
        if moved_pct.abs() > ENTRY_MOVE_PCT {
            return true;
        }
    }

    prev.stop_loss != next.stop_loss || prev.take_profit != next.take_profit
}

/// Counts from one scan pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReport {
    pub analyzed: usize,
    pub signals: usize,
    pub notified: usize,
    pub failed: usize,
}

pub struct Scanner<'a> {
    service: &'a AnalysisService,
    store: &'a SignalStore,
    settings: ScannerSection,
}

impl<'a> Scanner<'a> {
    pub fn new(
        service: &'a AnalysisService,
        store: &'a SignalStore,
        settings: ScannerSection,
    ) -> Self {
        Self {
            service,
            store,
            settings,
        }
    }

    pub fn scan_once(&self) -> ScanReport {
        let timeframe = self.settings.timeframe.as_str();
        let results: Vec<_> = self
            .settings
            .pairs
            .par_iter()
            .map(|pair| {
                let pair = normalize_symbol(pair);
                let request = AnalyzeRequest::new(pair.as_str(), timeframe);
                let result = self.service.signal_for(&request);
                (pair, result)
            })
            .collect();

        let mut report = ScanReport {
            analyzed: results.len(),
            ..ScanReport::default()
        };

        for (pair, result) in results {
            let signal = match result {
                Ok(Some(signal)) => signal,
                Ok(None) => continue,
                Err(e) => {
                    warn!(pair = %pair, error = %e, "scan failed");
                    report.failed += 1;
                    continue;
                }
            };
            report.signals += 1;

            let is_new = self
                .store
                .get(&pair, timeframe)
                .map_or(true, |prev| signal_changed(&prev, &signal));
            if is_new && self.service.notify(&signal, &pair) {
                report.notified += 1;
                info!(pair = %pair, side = %signal.side, grade = %signal.confidence, "signal sent");
            }
            self.store.save(&pair, timeframe, signal);
        }

        info!(
            analyzed = report.analyzed,
            signals = report.signals,
            notified = report.notified,
            failed = report.failed,
            "scan complete"
        );
        report
    }

    /// Scan immediately, then every `interval_secs`, until `stop` is set.
    /// Returns the number of completed passes.
    pub fn run(&self, stop: &AtomicBool) -> usize {
        let interval = Duration::from_secs(self.settings.interval_secs);
        let mut passes = 0;
        while !stop.load(Ordering::Relaxed) {
            self.scan_once();
            passes += 1;

            let deadline = Instant::now() + interval;
            while !stop.load(Ordering::Relaxed) {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if remaining.is_zero() {
                    break;
                }
                thread::sleep(remaining.min(STOP_POLL));
            }
        }
        info!(passes, "scanner stopped");
        passes
    }
}
