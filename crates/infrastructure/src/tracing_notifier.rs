//! Notifier that surfaces user-visible messages as log events.

use tilgang_application::{Notification, NotificationLevel, Notifier};
use tracing::{info, warn};

/// Notifier for the terminal console: success goes to `info`, errors to `warn`.
#[derive(Clone, Default)]
pub struct TracingNotifier;

impl TracingNotifier {
    /// Creates a new tracing notifier.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => info!("{}", notification.message),
            NotificationLevel::Error => warn!("{}", notification.message),
        }
    }
}
