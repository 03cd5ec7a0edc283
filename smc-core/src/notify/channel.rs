//! Delivery channels for finished signals.
//!
//! Delivery is best-effort: a channel reports failure through `NotifyError`
//! and the caller decides whether to log it. Nothing here retries.

use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use super::format::format_signal;
use crate::domain::Signal;

pub const TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";
pub const CHAT_ID_ENV: &str = "TELEGRAM_CHAT_ID";

const TELEGRAM_API: &str = "https://api.telegram.org";

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("channel not configured: {0}")]
    NotConfigured(String),

    #[error("delivery failed: {0}")]
    Transport(String),

    #[error("rejected by Telegram (HTTP {status}): {description}")]
    Rejected { status: u16, description: String },
}

/// Accepts a finished signal for delivery.
pub trait SignalChannel: Send + Sync {
    fn name(&self) -> &str;

    fn deliver(&self, signal: &Signal, symbol: &str) -> Result<(), NotifyError>;
}

/// Writes the rendered card to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogChannel;

impl SignalChannel for LogChannel {
    fn name(&self) -> &str {
        "log"
    }

    fn deliver(&self, signal: &Signal, symbol: &str) -> Result<(), NotifyError> {
        info!(symbol, card = %format_signal(signal, symbol, Utc::now()), "signal");
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiReply {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Posts cards through the Telegram Bot API `sendMessage` method.
pub struct TelegramChannel {
    client: reqwest::blocking::Client,
    token: String,
    chat_id: String,
    api_url: String,
}

impl TelegramChannel {
    pub fn new(token: impl Into<String>, chat_id: impl Into<String>) -> Result<Self, NotifyError> {
        let token = token.into();
        let chat_id = chat_id.into();
        if token.trim().is_empty() || chat_id.trim().is_empty() {
            return Err(NotifyError::NotConfigured("empty bot token or chat id".into()));
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| NotifyError::Transport(format!("build HTTP client: {e}")))?;

        Ok(Self {
            client,
            token,
            chat_id,
            api_url: TELEGRAM_API.to_string(),
        })
    }

    /// Credentials come from `TELEGRAM_BOT_TOKEN` and `TELEGRAM_CHAT_ID`.
    pub fn from_env() -> Result<Self, NotifyError> {
        let read = |key: &str| {
            std::env::var(key).map_err(|_| NotifyError::NotConfigured(format!("{key} is not set")))
        };
        Self::new(read(TOKEN_ENV)?, read(CHAT_ID_ENV)?)
    }

    fn endpoint(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_url, self.token)
    }

    pub fn send_text(&self, text: &str) -> Result<(), NotifyError> {
        let resp = self
            .client
            .post(self.endpoint())
            .json(&SendMessage {
                chat_id: &self.chat_id,
                text,
            })
            .send()
            // reqwest errors embed the URL, which carries the token.
            .map_err(|e| NotifyError::Transport(e.without_url().to_string()))?;

        let status = resp.status().as_u16();
        let body = resp.text().unwrap_or_default();
        check_reply(status, &body)
    }
}

impl std::fmt::Debug for TelegramChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramChannel")
            .field("chat_id", &self.chat_id)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl SignalChannel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    fn deliver(&self, signal: &Signal, symbol: &str) -> Result<(), NotifyError> {
        self.send_text(&format_signal(signal, symbol, Utc::now()))?;
        info!(symbol, "signal sent to telegram");
        Ok(())
    }
}

fn check_reply(status: u16, body: &str) -> Result<(), NotifyError> {
    let reply: Option<ApiReply> = serde_json::from_str(body).ok();
    match reply {
        Some(ApiReply { ok: true, .. }) if (200..300).contains(&status) => Ok(()),
        Some(reply) => Err(NotifyError::Rejected {
            status,
            description: reply.description.unwrap_or_else(|| "no description".into()),
        }),
        None => {
            let excerpt: String = body.chars().take(200).collect();
            Err(NotifyError::Rejected {
                status,
                description: format!("unreadable reply: {excerpt}"),
            })
        }
    }
}
