//! Signal rendering and delivery.

pub mod channel;
pub mod format;

pub use channel::{LogChannel, NotifyError, SignalChannel, TelegramChannel};
pub use format::{format_digest, format_signal, format_summary_stats};
