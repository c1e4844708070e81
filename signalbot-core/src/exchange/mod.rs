//! Order-execution endpoints.
//!
//! The controller only sees the `OrderExecutor` contract: one request in, one
//! `ExecutionResult` (accepted or rejected) or a `DispatchError` out.
//! Authentication and transport belong to the implementation.

pub mod btcturk;
pub mod paper;

pub use btcturk::{BtcTurkCredentials, BtcTurkExecutor};
pub use paper::PaperExecutor;

use crate::domain::{ExecutionResult, OrderRequest};
use thiserror::Error;

/// The order never produced a usable answer from the endpoint.
///
/// A well-formed rejection is not an error: it comes back as an
/// `ExecutionResult` with `accepted == false`.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("order endpoint unreachable: {0}")]
    Unreachable(String),

    #[error("order endpoint returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("invalid order response: {0}")]
    InvalidResponse(String),

    #[error("request signing failed: {0}")]
    Signing(String),
}

pub trait OrderExecutor: Send + Sync {
    /// Human-readable name of this endpoint.
    fn name(&self) -> &str;

    /// Submit one order. Called at most once per cycle.
    fn execute(&self, order: &OrderRequest) -> Result<ExecutionResult, DispatchError>;
}
