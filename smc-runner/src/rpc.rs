//! JSON-lines RPC surface.
//!
//! One request object per input line, one `RpcReply` per output line. Blank
//! input lines are skipped. A line without a `method` field is an analyze
//! request; `{"method":"signals","symbol":..}` reads the last-signal store,
//! optionally narrowed to one `timeframe`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::{self, BufRead, Write};
use tracing::{debug, error, warn};

use smc_core::data::normalize_symbol;

use crate::service::{AnalysisService, AnalyzeRequest, AnalyzeResponse, ServiceError};
use crate::store::SignalStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum RpcRequest {
    Analyze(AnalyzeRequest),
    Signals(SignalQuery),
}

impl RpcRequest {
    pub fn parse(line: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(line)?;
        if value.get("method").is_some() {
            serde_json::from_value(value)
        } else {
            serde_json::from_value(value).map(Self::Analyze)
        }
    }
}

/// Lookup of stored signals for one symbol.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalQuery {
    pub symbol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeframe: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RpcResponse {
    Analysis(AnalyzeResponse),
    /// Stored signals, ordered by timeframe. Empty on a miss.
    Signals(Vec<AnalyzeResponse>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RpcReply {
    Ok { response: RpcResponse },
    InvalidArgument { message: String },
    Internal { message: String },
}

impl RpcReply {
    pub fn status(&self) -> &'static str {
        match self {
            Self::Ok { .. } => "OK",
            Self::InvalidArgument { .. } => "INVALID_ARGUMENT",
            Self::Internal { .. } => "INTERNAL",
        }
    }

    fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

/// Answer one input line.
pub fn handle_line(service: &AnalysisService, store: &SignalStore, line: &str) -> RpcReply {
    match RpcRequest::parse(line) {
        Ok(RpcRequest::Analyze(request)) => analyze(service, &request),
        Ok(RpcRequest::Signals(query)) => lookup(store, &query),
        Err(e) => {
            warn!(error = %e, "malformed request");
            RpcReply::invalid(format!("malformed request: {e}"))
        }
    }
}

fn analyze(service: &AnalysisService, request: &AnalyzeRequest) -> RpcReply {
    match service.analyze(request) {
        Ok(response) => RpcReply::Ok {
            response: RpcResponse::Analysis(response),
        },
        Err(e) => {
            error!(symbol = %request.symbol, status = e.status(), error = %e, "request failed");
            let message = e.to_string();
            match e {
                ServiceError::Internal(_) => RpcReply::Internal { message },
                ServiceError::InvalidArgument(_) | ServiceError::Unsupported(_) => {
                    RpcReply::invalid(message)
                }
            }
        }
    }
}

fn lookup(store: &SignalStore, query: &SignalQuery) -> RpcReply {
    let symbol = normalize_symbol(&query.symbol);
    if symbol.is_empty() {
        return RpcReply::invalid("symbol is required");
    }

    let found: Vec<AnalyzeResponse> = match query.timeframe.as_deref().map(str::trim) {
        Some(timeframe) if !timeframe.is_empty() => store
            .get(&symbol, timeframe)
            .map(|signal| AnalyzeResponse::from_signal(&symbol, timeframe, &signal))
            .into_iter()
            .collect(),
        _ => store
            .for_symbol(&symbol)
            .iter()
            .map(|(timeframe, signal)| AnalyzeResponse::from_signal(&symbol, timeframe, signal))
            .collect(),
    };
    debug!(%symbol, found = found.len(), "signal lookup");

    RpcReply::Ok {
        response: RpcResponse::Signals(found),
    }
}

/// Serve requests until `input` is exhausted. Returns the number answered.
pub fn serve<R: BufRead, W: Write>(
    service: &AnalysisService,
    store: &SignalStore,
    input: R,
    mut output: W,
) -> io::Result<usize> {
    let mut answered = 0;
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let reply = handle_line(service, store, &line);
        serde_json::to_writer(&mut output, &reply)?;
        output.write_all(b"\n")?;
        output.flush()?;
        answered += 1;
    }
    Ok(answered)
}
