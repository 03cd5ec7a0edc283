//! SMC CLI: analyze one pair, scan a watchlist, or serve JSON-lines requests.
//!
//! Commands:
//! - `analyze`: fetch, run the pipeline once and print the signal card
//! - `scan`: analyze the configured pairs on an interval (or once)
//! - `serve`: answer one JSON request per stdin line on stdout, optionally
//!   scanning the configured pairs in the background so `signals` lookups
//!   see fresh results

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use smc_core::data::{CandleProvider, CsvProvider, ExchangeProvider};
use smc_core::notify::{
    format_digest, format_signal, format_summary_stats, LogChannel, SignalChannel, TelegramChannel,
};
use smc_core::SmcStrategy;
use smc_runner::{serve, AnalysisService, AnalyzeRequest, Scanner, ServiceConfig, SignalStore};

#[derive(Parser)]
#[command(name = "smc", about = "Smart Money Concepts signal engine")]
struct Cli {
    /// Path to a TOML config file. Defaults are used when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Read candles from `<DIR>/<SYMBOL>_<TIMEFRAME>.csv` instead of an exchange.
    #[arg(long, global = true)]
    csv_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one symbol and print the signal, if any.
    Analyze {
        /// Symbol (e.g., BTCUSDT or BTC/USDT).
        symbol: String,

        /// Entry timeframe.
        #[arg(long, default_value = "1h")]
        timeframe: String,

        /// Exchange: binance or bybit. Defaults to the config value.
        #[arg(long)]
        exchange: Option<String>,

        /// Candles per series. Defaults to the config value.
        #[arg(long)]
        limit: Option<usize>,

        /// Print the signal as JSON instead of a card.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Scan the configured pairs.
    Scan {
        /// Run a single pass and print a digest.
        #[arg(long, default_value_t = false)]
        once: bool,
    },
    /// Answer JSON-lines requests on stdin.
    Serve {
        /// Run the scanner alongside and serve its stored signals.
        #[arg(long, default_value_t = false)]
        scan: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // stdout carries command output; logs go to stderr
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(false).compact())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = load_config(cli.config.as_deref())?;
    let service = build_service(&config, cli.csv_dir.as_deref())?;

    match cli.command {
        Commands::Analyze {
            symbol,
            timeframe,
            exchange,
            limit,
            json,
        } => {
            let request = AnalyzeRequest {
                symbol,
                timeframe,
                exchange,
                limit,
            };
            run_analyze(&service, &config, &request, json)
        }
        Commands::Scan { once } => run_scan(&service, &config, once),
        Commands::Serve { scan } => run_serve(&service, &config, scan),
    }
}

fn load_config(path: Option<&Path>) -> Result<ServiceConfig> {
    match path {
        Some(path) => {
            ServiceConfig::from_file(path).with_context(|| format!("loading {}", path.display()))
        }
        None => Ok(ServiceConfig::default()),
    }
}

fn build_service(config: &ServiceConfig, csv_dir: Option<&Path>) -> Result<AnalysisService> {
    let provider: Box<dyn CandleProvider> = match csv_dir {
        Some(dir) => {
            if !dir.is_dir() {
                bail!("--csv-dir {} is not a directory", dir.display());
            }
            Box::new(CsvProvider::new(dir))
        }
        None => Box::new(ExchangeProvider::new()?),
    };

    Ok(AnalysisService::new(
        SmcStrategy::new(config.strategy.clone()),
        config.service.clone(),
        provider,
        build_channel(config),
    ))
}

/// Telegram when enabled and configured in the environment, the log otherwise.
fn build_channel(config: &ServiceConfig) -> Box<dyn SignalChannel> {
    if !config.telegram.enabled {
        return Box::new(LogChannel);
    }
    match TelegramChannel::from_env() {
        Ok(channel) => {
            info!("telegram notifications enabled");
            Box::new(channel)
        }
        Err(e) => {
            warn!(error = %e, "telegram enabled but not configured, logging signals instead");
            Box::new(LogChannel)
        }
    }
}

fn run_analyze(
    service: &AnalysisService,
    config: &ServiceConfig,
    request: &AnalyzeRequest,
    json: bool,
) -> Result<()> {
    let Some(signal) = service.signal_for(request)? else {
        println!("No signal for {}", request.symbol);
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&signal)?);
    } else {
        println!("{}", format_signal(&signal, &request.symbol, Utc::now()));
    }

    if config.telegram.enabled {
        service.notify(&signal, &request.symbol);
    }
    Ok(())
}

fn run_scan(service: &AnalysisService, config: &ServiceConfig, once: bool) -> Result<()> {
    if config.scanner.pairs.is_empty() {
        bail!("no pairs configured under [scanner]");
    }

    let store = SignalStore::new();
    let scanner = Scanner::new(service, &store, config.scanner.clone());

    if !once {
        info!(
            pairs = config.scanner.pairs.len(),
            interval_secs = config.scanner.interval_secs,
            "scanner started"
        );
        scanner.run(&AtomicBool::new(false));
        return Ok(());
    }

    let report = scanner.scan_once();
    let now = Utc::now();
    let latest = store.all();
    let signals: Vec<_> = latest.iter().map(|(_, s)| s.clone()).collect();

    println!("{}", format_digest(&latest, now));
    println!();
    println!("{}", format_summary_stats(&signals, now));
    println!();
    println!(
        "Analyzed {} | signals {} | notified {} | failed {}",
        report.analyzed, report.signals, report.notified, report.failed
    );
    Ok(())
}

fn run_serve(service: &AnalysisService, config: &ServiceConfig, scan: bool) -> Result<()> {
    let store = SignalStore::new();
    if !scan {
        info!("serving JSON-lines requests on stdin");
        let answered = serve(service, &store, io::stdin().lock(), io::stdout().lock())?;
        info!(answered, "input closed");
        return Ok(());
    }

    if config.scanner.pairs.is_empty() {
        bail!("no pairs configured under [scanner]");
    }
    let scanner = Scanner::new(service, &store, config.scanner.clone());
    let stop = AtomicBool::new(false);

    let answered = thread::scope(|scope| {
        let worker = scope.spawn(|| scanner.run(&stop));
        info!(
            pairs = config.scanner.pairs.len(),
            "serving JSON-lines requests on stdin with the scanner running"
        );
        let answered = serve(service, &store, io::stdin().lock(), io::stdout().lock());
        stop.store(true, Ordering::Relaxed);
        if worker.join().is_err() {
            warn!("scanner thread panicked");
        }
        answered
    })?;
    info!(answered, "input closed");
    Ok(())
}
