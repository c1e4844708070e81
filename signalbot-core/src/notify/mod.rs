//! Notification channels.
//!
//! Best-effort: a failed notification is logged by the controller and never
//! affects an order that was already placed.

pub mod message;
pub mod stdout;
pub mod telegram;

pub use message::render_cycle_message;
pub use stdout::StdoutNotifier;
pub use telegram::TelegramNotifier;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification channel unreachable: {0}")]
    Unreachable(String),

    #[error("notification rejected: {0}")]
    Rejected(String),
}

pub trait Notifier: Send + Sync {
    /// Human-readable name of this channel.
    fn name(&self) -> &str;

    /// Deliver one text message.
    fn notify(&self, text: &str) -> Result<(), NotifyError>;
}
