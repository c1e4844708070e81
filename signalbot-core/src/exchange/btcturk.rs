//! BtcTurk market-order client.
//!
//! `POST /api/v1/order` with three auth headers:
//! - `X-PCK`: public API key
//! - `X-Stamp`: request time in epoch milliseconds
//! - `X-Signature`: base64(HMAC-SHA256(base64-decoded secret, key + stamp))
//!
//! The response envelope carries a `success` flag; the whole body is kept as
//! the execution detail. No retries: a failed order is reported, not replayed.

use super::{DispatchError, OrderExecutor};
use crate::domain::{ExecutionResult, OrderRequest};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::fmt;
use std::time::Duration;

type HmacSha256 = Hmac<Sha256>;

pub const DEFAULT_BASE_URL: &str = "https://api.btcturk.com";

/// API credentials as issued by the exchange.
#[derive(Clone, Deserialize)]
pub struct BtcTurkCredentials {
    pub api_key: String,
    /// Base64-encoded private key.
    pub api_secret: String,
}

impl fmt::Debug for BtcTurkCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BtcTurkCredentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// Order body in the exchange's field naming.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct OrderBody<'a> {
    quantity: f64,
    stop_price: f64,
    new_order_client_id: &'a str,
    order_method: &'static str,
    order_type: &'static str,
    pair_symbol: &'a str,
}

pub struct BtcTurkExecutor {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
    secret: Vec<u8>,
    client_order_id: String,
}

impl BtcTurkExecutor {
    pub fn new(
        credentials: &BtcTurkCredentials,
        base_url: impl Into<String>,
        client_order_id: impl Into<String>,
    ) -> Result<Self, DispatchError> {
        let secret = STANDARD
            .decode(credentials.api_secret.trim())
            .map_err(|e| DispatchError::Signing(format!("API secret is not base64: {e}")))?;

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| DispatchError::Unreachable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: credentials.api_key.clone(),
            secret,
            client_order_id: client_order_id.into(),
        })
    }

    /// Signature for a request stamped at `stamp_ms`.
    fn sign(&self, stamp_ms: i64) -> Result<String, DispatchError> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| DispatchError::Signing(format!("failed to init signer: {e}")))?;
        mac.update(format!("{}{stamp_ms}", self.api_key).as_bytes());
        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }

    fn body<'a>(&'a self, order: &'a OrderRequest) -> OrderBody<'a> {
        OrderBody {
            quantity: order.quantity,
            stop_price: 0.0,
            new_order_client_id: &self.client_order_id,
            order_method: "market",
            order_type: order.side.as_str(),
            pair_symbol: &order.symbol,
        }
    }

    /// Map a response body to an execution result.
    fn interpret(status: u16, text: &str) -> Result<ExecutionResult, DispatchError> {
        let detail: serde_json::Value = match serde_json::from_str(text) {
            Ok(v) => v,
            Err(_) if !(200..300).contains(&status) => {
                return Err(DispatchError::Http {
                    status,
                    body: text.to_string(),
                })
            }
            Err(e) => return Err(DispatchError::InvalidResponse(e.to_string())),
        };

        // Rejections arrive as a JSON envelope with success=false, often on 4xx
        let accepted = match detail.get("success").and_then(|v| v.as_bool()) {
            Some(flag) => flag && (200..300).contains(&status),
            None if (200..300).contains(&status) => {
                return Err(DispatchError::InvalidResponse(
                    "response has no 'success' flag".into(),
                ))
            }
            None => {
                return Err(DispatchError::Http {
                    status,
                    body: text.to_string(),
                })
            }
        };

        Ok(ExecutionResult { accepted, detail })
    }
}

impl OrderExecutor for BtcTurkExecutor {
    fn name(&self) -> &str {
        "btcturk"
    }

    fn execute(&self, order: &OrderRequest) -> Result<ExecutionResult, DispatchError> {
        let stamp = chrono::Utc::now().timestamp_millis();
        let signature = self.sign(stamp)?;

        let resp = self
            .client
            .post(format!("{}/api/v1/order", self.base_url))
            .header("X-PCK", &self.api_key)
            .header("X-Stamp", stamp.to_string())
            .header("X-Signature", signature)
            .json(&self.body(order))
            .send()
            .map_err(|e| DispatchError::Unreachable(e.to_string()))?;

        let status = resp.status().as_u16();
        let text = resp
            .text()
            .map_err(|e| DispatchError::InvalidResponse(e.to_string()))?;

        Self::interpret(status, &text)
    }
}
