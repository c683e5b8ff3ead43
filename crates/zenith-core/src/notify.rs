//! Notification capability.
//!
//! The launcher only fires a notification when permission is `Granted`;
//! failures are logged and never interrupt a flow.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const COMPLETION_TITLE: &str = "Focus Session Complete";
pub const COMPLETION_BODY: &str = "Well done. You've reclaimed your time.";

/// Permission state, mirroring the browser/OS model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPermission {
    /// Not asked yet.
    #[default]
    Default,
    Granted,
    Denied,
}

/// A notification to display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

impl Notification {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// Shown when a focus session runs to zero.
    pub fn session_complete() -> Self {
        Self::new(COMPLETION_TITLE, COMPLETION_BODY)
    }
}

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("notification permission not granted")]
    NotPermitted,

    #[error("notification backend failed: {0}")]
    Backend(String),
}

/// Something that can show notifications.
pub trait Notifier {
    fn permission(&self) -> NotificationPermission;

    /// Ask for permission. Only meaningful from `Default`; returns the
    /// resulting state.
    fn request_permission(&mut self) -> NotificationPermission;

    fn notify(&mut self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Emits notifications as `tracing` events.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier {
    permission: NotificationPermission,
    grant_on_request: bool,
}

impl LogNotifier {
    /// `grant_on_request` decides how a pending request resolves.
    pub fn new(permission: NotificationPermission, grant_on_request: bool) -> Self {
        Self {
            permission,
            grant_on_request,
        }
    }
}

impl Notifier for LogNotifier {
    fn permission(&self) -> NotificationPermission {
        self.permission
    }

    fn request_permission(&mut self) -> NotificationPermission {
        if self.permission == NotificationPermission::Default {
            self.permission = if self.grant_on_request {
                NotificationPermission::Granted
            } else {
                NotificationPermission::Denied
            };
        }
        self.permission
    }

    fn notify(&mut self, notification: &Notification) -> Result<(), NotifyError> {
        if self.permission != NotificationPermission::Granted {
            return Err(NotifyError::NotPermitted);
        }
        tracing::info!(title = %notification.title, body = %notification.body, "notification");
        Ok(())
    }
}

/// Never shows anything; permission is always denied.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn permission(&self) -> NotificationPermission {
        NotificationPermission::Denied
    }

    fn request_permission(&mut self) -> NotificationPermission {
        NotificationPermission::Denied
    }

    fn notify(&mut self, _notification: &Notification) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Keeps every delivered notification in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    pub permission: NotificationPermission,
    pub permission_requests: usize,
    pub delivered: Vec<Notification>,
    /// When set, `notify` fails with this message.
    pub fail_with: Option<String>,
}

impl RecordingNotifier {
    pub fn granted() -> Self {
        Self {
            permission: NotificationPermission::Granted,
            ..Default::default()
        }
    }
}

impl Notifier for RecordingNotifier {
    fn permission(&self) -> NotificationPermission {
        self.permission
    }

    fn request_permission(&mut self) -> NotificationPermission {
        self.permission_requests += 1;
        if self.permission == NotificationPermission::Default {
            self.permission = NotificationPermission::Granted;
        }
        self.permission
    }

    fn notify(&mut self, notification: &Notification) -> Result<(), NotifyError> {
        if let Some(message) = &self.fail_with {
            return Err(NotifyError::Backend(message.clone()));
        }
        self.delivered.push(notification.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_notifier_resolves_pending_request_once() {
        let mut n = LogNotifier::new(NotificationPermission::Default, false);
        assert_eq!(n.request_permission(), NotificationPermission::Denied);
        assert!(n.notify(&Notification::session_complete()).is_err());

        let mut n = LogNotifier::new(NotificationPermission::Default, true);
        assert_eq!(n.request_permission(), NotificationPermission::Granted);
        assert!(n.notify(&Notification::session_complete()).is_ok());
    }

    #[test]
    fn denied_is_sticky() {
        let mut n = LogNotifier::new(NotificationPermission::Denied, true);
        assert_eq!(n.request_permission(), NotificationPermission::Denied);
    }

    #[test]
    fn completion_text() {
        let n = Notification::session_complete();
        assert_eq!(n.title, "Focus Session Complete");
        assert_eq!(n.body, "Well done. You've reclaimed your time.");
    }
}
