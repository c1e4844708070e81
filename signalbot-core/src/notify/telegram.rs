//! Telegram Bot API notifier (`sendMessage`).

use super::{Notifier, NotifyError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.telegram.org";

#[derive(Clone, Deserialize)]
pub struct TelegramSettings {
    pub token: String,
    pub chat_id: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl fmt::Debug for TelegramSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramSettings")
            .field("token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    description: Option<String>,
}

pub struct TelegramNotifier {
    client: reqwest::blocking::Client,
    url: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(settings: &TelegramSettings) -> Result<Self, NotifyError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| NotifyError::Unreachable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: format!(
                "{}/bot{}/sendMessage",
                settings.base_url.trim_end_matches('/'),
                settings.token
            ),
            chat_id: settings.chat_id.clone(),
        })
    }
}

impl Notifier for TelegramNotifier {
    fn name(&self) -> &str {
        "telegram"
    }

    fn notify(&self, text: &str) -> Result<(), NotifyError> {
        let resp = self
            .client
            .post(&self.url)
            .json(&SendMessage {
                chat_id: &self.chat_id,
                text,
            })
            .send()
            // Strip the URL: it embeds the bot token
            .map_err(|e| NotifyError::Unreachable(e.without_url().to_string()))?;

        let status = resp.status();
        let body: ApiResponse = resp
            .json()
            .map_err(|e| NotifyError::Rejected(format!("HTTP {status}: {}", e.without_url())))?;

        if body.ok {
            Ok(())
        } else {
            Err(NotifyError::Rejected(
                body.description
                    .unwrap_or_else(|| format!("HTTP {status}")),
            ))
        }
    }
}
