//! Request front-end: provider, then pipeline, then channel.
//!
//! "No signal" is never an error here. A failed or empty fetch and every
//! pipeline rejection come back as `AnalyzeResponse::default()`. Only bad
//! arguments and pipeline faults become a `ServiceError`.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use smc_core::data::{
    fetch_or_empty, normalize_symbol, validate_timeframe, CandleProvider, DataError, Exchange,
    FetchRequest,
};
use smc_core::notify::SignalChannel;
use smc_core::strategy::AnalysisError;
use smc_core::{Outcome, Signal, SmcStrategy};

use crate::config::ServiceSection;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unsupported request: {0}")]
    Unsupported(#[from] DataError),

    #[error("analysis failed: {0}")]
    Internal(#[from] AnalysisError),
}

impl ServiceError {
    /// Wire status for this error.
    pub fn status(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) | Self::Unsupported(_) => "INVALID_ARGUMENT",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub symbol: String,
    pub timeframe: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl AnalyzeRequest {
    pub fn new(symbol: impl Into<String>, timeframe: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe: timeframe.into(),
            ..Self::default()
        }
    }
}

/// Flat response record. The default value (empty strings, zero prices)
/// means "no signal".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub symbol: String,
    pub timeframe: String,
    pub side: String,
    pub entry_low: f64,
    pub entry_high: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub confidence: String,
    pub zone_source: String,
    pub risk_reward: f64,
}

impl AnalyzeResponse {
    pub fn from_signal(symbol: &str, timeframe: &str, signal: &Signal) -> Self {
        Self {
            symbol: symbol.to_string(),
            timeframe: timeframe.to_string(),
            side: signal.side.to_string(),
            entry_low: signal.entry.low,
            entry_high: signal.entry.high,
            stop_loss: signal.stop_loss,
            take_profit: signal.take_profit,
            confidence: signal.confidence.to_string(),
            zone_source: signal.zone_source.to_string(),
            risk_reward: signal.risk_reward,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.side.is_empty()
    }
}

pub struct AnalysisService {
    strategy: SmcStrategy,
    defaults: ServiceSection,
    provider: Box<dyn CandleProvider>,
    channel: Box<dyn SignalChannel>,
}

impl AnalysisService {
    pub fn new(
        strategy: SmcStrategy,
        defaults: ServiceSection,
        provider: Box<dyn CandleProvider>,
        channel: Box<dyn SignalChannel>,
    ) -> Self {
        Self {
            strategy,
            defaults,
            provider,
            channel,
        }
    }

    /// Full request: analyze, deliver, respond.
    ///
    /// Delivery is best-effort; a failed delivery is logged and the response
    /// is still returned.
    pub fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalyzeResponse, ServiceError> {
        let Some(signal) = self.signal_for(request)? else {
            return Ok(AnalyzeResponse::default());
        };
        self.notify(&signal, &request.symbol);
        Ok(AnalyzeResponse::from_signal(&request.symbol, &request.timeframe, &signal))
    }

    /// Fetch both series and run the pipeline without delivering anything.
    pub fn signal_for(&self, request: &AnalyzeRequest) -> Result<Option<Signal>, ServiceError> {
        let (htf_request, ltf_request) = self.fetch_requests(request)?;
        info!(
            symbol = %ltf_request.symbol,
            timeframe = %ltf_request.timeframe,
            htf = %htf_request.timeframe,
            exchange = %ltf_request.exchange,
            limit = ltf_request.limit,
            "analysis request"
        );

        let htf = fetch_or_empty(self.provider.as_ref(), &htf_request);
        let ltf = if htf_request == ltf_request {
            htf.clone()
        } else {
            fetch_or_empty(self.provider.as_ref(), &ltf_request)
        };

        match self.strategy.evaluate(&htf, &ltf)? {
            Outcome::Signal(signal) => Ok(Some(signal)),
            Outcome::Rejected(reason) => {
                debug!(symbol = %request.symbol, %reason, "no signal");
                Ok(None)
            }
        }
    }

    /// Deliver through the channel, logging a failure at warn.
    pub fn notify(&self, signal: &Signal, symbol: &str) -> bool {
        match self.channel.deliver(signal, symbol) {
            Ok(()) => true,
            Err(e) => {
                warn!(channel = self.channel.name(), symbol, error = %e, "delivery failed");
                false
            }
        }
    }

    fn fetch_requests(
        &self,
        request: &AnalyzeRequest,
    ) -> Result<(FetchRequest, FetchRequest), ServiceError> {
        let symbol = normalize_symbol(&request.symbol);
        if symbol.is_empty() {
            return Err(ServiceError::InvalidArgument("symbol is required".into()));
        }
        let timeframe = request.timeframe.trim();
        if timeframe.is_empty() {
            return Err(ServiceError::InvalidArgument("timeframe is required".into()));
        }
        validate_timeframe(timeframe)?;

        let exchange = match request.exchange.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.parse::<Exchange>()?,
            _ => self.defaults.exchange,
        };
        let limit = match request.limit {
            Some(0) | None => self.defaults.limit,
            Some(n) => n,
        };
        let htf_timeframe = self.defaults.htf_timeframe.as_deref().unwrap_or(timeframe);

        Ok((
            FetchRequest::new(symbol.clone(), htf_timeframe, exchange, limit),
            FetchRequest::new(symbol, timeframe, exchange, limit),
        ))
    }
}
