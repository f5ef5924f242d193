/// Severity of a user-visible notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    /// The operation succeeded.
    Success,
    /// The operation failed or was rejected.
    Error,
}

/// Non-blocking message shown to the user after a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Severity.
    pub level: NotificationLevel,
    /// Message text.
    pub message: String,
}

impl Notification {
    /// Creates a success notification.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    /// Creates an error notification.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

/// Port for surfacing notifications to the presentation layer.
pub trait Notifier: Send + Sync {
    /// Shows a notification. Must not block.
    fn notify(&self, notification: Notification);
}
