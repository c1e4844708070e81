//! Paper executor: accepts every order and keeps it in memory.

use super::{DispatchError, OrderExecutor};
use crate::domain::{ExecutionResult, OrderRequest};
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct PaperExecutor {
    orders: Mutex<Vec<OrderRequest>>,
}

impl PaperExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Orders received so far, oldest first.
    pub fn orders(&self) -> Vec<OrderRequest> {
        self.orders
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl OrderExecutor for PaperExecutor {
    fn name(&self) -> &str {
        "paper"
    }

    fn execute(&self, order: &OrderRequest) -> Result<ExecutionResult, DispatchError> {
        let mut orders = self
            .orders
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        orders.push(order.clone());
        Ok(ExecutionResult::accepted(serde_json::json!({
            "paper": true,
            "sequence": orders.len(),
            "order": order,
        })))
    }
}
