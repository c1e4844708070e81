use super::{Notifier, NotifyError};

/// Prints messages to stdout. Used for dry runs.
pub struct StdoutNotifier;

impl Notifier for StdoutNotifier {
    fn name(&self) -> &str {
        "stdout"
    }

    fn notify(&self, text: &str) -> Result<(), NotifyError> {
        println!("{text}");
        Ok(())
    }
}
