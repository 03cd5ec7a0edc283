//! SMC Runner: request front-end, RPC surface, last-signal store and scanner.
//!
//! This crate builds on `smc-core` to provide:
//! - Service configuration (`[strategy]`, `[service]`, `[telegram]`, `[scanner]`)
//! - `AnalysisService`: fetch, analyze and deliver for one request
//! - A JSON-lines RPC loop over any reader/writer pair, with analyze and
//!   stored-signal lookup requests
//! - A thread-safe last-signal store and a stoppable change-detecting scanner

pub mod config;
pub mod rpc;
pub mod scanner;
pub mod service;
pub mod store;

pub use config::{ScannerSection, ServiceConfig, ServiceSection, TelegramSection};
pub use rpc::{handle_line, serve, RpcReply, RpcRequest, RpcResponse, SignalQuery};
pub use scanner::{signal_changed, ScanReport, Scanner};
pub use service::{AnalysisService, AnalyzeRequest, AnalyzeResponse, ServiceError};
pub use store::SignalStore;
