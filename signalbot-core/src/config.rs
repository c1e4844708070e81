//! Bot configuration: one TOML file, loaded and validated once at startup.
//!
//! ```toml
//! [market]
//! symbol = "USDTTRY"
//! interval = "15m"
//!
//! [strategy]
//! period = 14
//!
//! [order]
//! quantity = 60
//!
//! [btcturk]
//! api_key = "..."
//! api_secret = "..."
//!
//! [telegram]
//! token = "..."
//! chat_id = "..."
//! ```
//!
//! `[btcturk]` and `[telegram]` are optional here. Live cycles need
//! `[btcturk]`; dry runs ignore both.

use crate::controller::CycleSettings;
use crate::data::binance;
use crate::decision::OrderTemplate;
use crate::engine::{EngineParams, IndicatorEngine};
use crate::exchange::btcturk;
use crate::exchange::BtcTurkCredentials;
use crate::notify::telegram::TelegramSettings;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSection {
    pub symbol: String,
    #[serde(default = "default_interval")]
    pub interval: String,
    /// Candles requested per cycle.
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default = "default_market_url")]
    pub base_url: String,
}

fn default_interval() -> String {
    "15m".to_string()
}

fn default_limit() -> u32 {
    500
}

fn default_market_url() -> String {
    binance::DEFAULT_BASE_URL.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSection {
    /// Exchange pair; defaults to the market symbol.
    #[serde(default)]
    pub pair_symbol: Option<String>,
    pub quantity: f64,
    #[serde(default = "default_client_order_id")]
    pub client_order_id: String,
}

fn default_client_order_id() -> String {
    "signalbot".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct BtcTurkSection {
    #[serde(flatten)]
    pub credentials: BtcTurkCredentials,
    #[serde(default = "default_exchange_url")]
    pub base_url: String,
}

fn default_exchange_url() -> String {
    btcturk::DEFAULT_BASE_URL.to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    pub market: MarketSection,
    #[serde(default)]
    pub strategy: EngineParams,
    pub order: OrderSection,
    #[serde(default)]
    pub btcturk: Option<BtcTurkSection>,
    #[serde(default)]
    pub telegram: Option<TelegramSettings>,
}

impl BotConfig {
    /// Load and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if self.market.symbol.trim().is_empty() {
            return invalid("market.symbol must not be empty".into());
        }
        if self.market.interval.trim().is_empty() {
            return invalid("market.interval must not be empty".into());
        }

        let s = &self.strategy;
        if s.period < 2 {
            return invalid(format!("strategy.period must be >= 2, got {}", s.period));
        }
        if s.smoothing < 1 {
            return invalid(format!("strategy.smoothing must be >= 1, got {}", s.smoothing));
        }
        if !(s.sar_acceleration.is_finite() && s.sar_acceleration > 0.0) {
            return invalid(format!(
                "strategy.sar_acceleration must be positive, got {}",
                s.sar_acceleration
            ));
        }
        if !(s.sar_maximum.is_finite() && s.sar_maximum >= s.sar_acceleration) {
            return invalid(format!(
                "strategy.sar_maximum must be >= sar_acceleration, got {}",
                s.sar_maximum
            ));
        }

        let limit = self.market.limit;
        if limit > binance::MAX_KLINES_LIMIT {
            return invalid(format!(
                "market.limit must be <= {}, got {limit}",
                binance::MAX_KLINES_LIMIT
            ));
        }
        if s.period > limit as usize {
            return invalid(format!(
                "strategy.period {} exceeds market.limit {limit}",
                s.period
            ));
        }
        if s.smoothing > limit as usize {
            return invalid(format!(
                "strategy.smoothing {} exceeds market.limit {limit}",
                s.smoothing
            ));
        }
        let required = IndicatorEngine::new(s).min_history();
        if (limit as usize) < required {
            return invalid(format!(
                "market.limit {limit} is below the {required} candles the indicators need"
            ));
        }

        if !(self.order.quantity.is_finite() && self.order.quantity > 0.0) {
            return invalid(format!(
                "order.quantity must be positive, got {}",
                self.order.quantity
            ));
        }
        if let Some(pair) = &self.order.pair_symbol {
            if pair.trim().is_empty() {
                return invalid("order.pair_symbol must not be empty when set".into());
            }
        }

        if let Some(exchange) = &self.btcturk {
            if exchange.credentials.api_key.trim().is_empty()
                || exchange.credentials.api_secret.trim().is_empty()
            {
                return invalid("btcturk.api_key and btcturk.api_secret are required".into());
            }
        }
        if let Some(telegram) = &self.telegram {
            if telegram.token.trim().is_empty() || telegram.chat_id.trim().is_empty() {
                return invalid("telegram.token and telegram.chat_id are required".into());
            }
        }

        Ok(())
    }

    /// Controller settings derived from the market and order sections.
    pub fn cycle_settings(&self) -> CycleSettings {
        CycleSettings {
            symbol: self.market.symbol.clone(),
            interval: self.market.interval.clone(),
            order: OrderTemplate {
                symbol: self
                    .order
                    .pair_symbol
                    .clone()
                    .unwrap_or_else(|| self.market.symbol.clone()),
                quantity: self.order.quantity,
            },
        }
    }

    /// Hash of everything that shapes trading behavior. Credentials excluded.
    ///
    /// Logged at startup so two runs can be matched to the same settings.
    pub fn fingerprint(&self) -> String {
        let canonical = serde_json::json!({
            "market": self.market,
            "strategy": self.strategy,
            "order": self.order,
        });
        blake3::hash(canonical.to_string().as_bytes())
            .to_hex()
            .to_string()
    }
}
