//! Market-data providers: exchange REST adapters and an offline CSV reader.

pub mod csv_file;
pub mod exchange;
pub mod provider;

pub use csv_file::CsvProvider;
pub use exchange::ExchangeProvider;
pub use provider::{
    fetch_or_empty, normalize_symbol, retain_sane, validate_timeframe, CandleProvider, DataError,
    Exchange, FetchRequest, SUPPORTED_TIMEFRAMES,
};
