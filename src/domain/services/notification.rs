use std::sync::Mutex;

/// Visual weight of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotificationVariant {
    #[default]
    Default,
    Success,
    Destructive,
}

/// Transient user-visible notification (toast)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: NotificationVariant,
}

impl Notification {
    pub fn info(title: &str, description: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            description: description.into(),
            variant: NotificationVariant::Default,
        }
    }

    pub fn success(title: &str, description: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            description: description.into(),
            variant: NotificationVariant::Success,
        }
    }

    pub fn error(title: &str, description: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            description: description.into(),
            variant: NotificationVariant::Destructive,
        }
    }
}

/// Notification sink
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Notifier that keeps every notification, in order
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .map(|n| n.clone())
            .unwrap_or_default()
    }

    pub fn last(&self) -> Option<Notification> {
        self.notifications().pop()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut n) = self.notifications.lock() {
            n.push(notification);
        }
    }
}
