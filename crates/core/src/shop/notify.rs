//! User-facing notifications emitted by the shop.
//!
//! The shop only describes what to show; rendering (toasts, flash messages,
//! terminal output) belongs to whoever implements [`NotificationSink`].

use serde::{Deserialize, Serialize};

/// How a notification should be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Success,
    Info,
    Error,
}

/// What activating a notification's action button does.
///
/// Actions are plain data so they can cross a serialization boundary; the
/// presentation layer maps each kind to its own behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Open the cart drawer.
    OpenCart,
}

/// An action button attached to a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationAction {
    pub label: String,
    pub kind: ActionKind,
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<NotificationAction>,
}

impl Notification {
    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            description: None,
            action: None,
        }
    }

    /// A success notification.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Severity::Success, message)
    }

    /// An informational notification.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    /// An error notification.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Attach a secondary line of text.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach an action button.
    #[must_use]
    pub fn with_action(mut self, label: impl Into<String>, kind: ActionKind) -> Self {
        self.action = Some(NotificationAction {
            label: label.into(),
            kind,
        });
        self
    }
}

/// Receiver of notifications.
pub trait NotificationSink {
    /// Show `notification` to the user.
    fn notify(&mut self, notification: Notification);
}

/// Collects notifications, e.g. to return them with an HTTP response.
impl NotificationSink for Vec<Notification> {
    fn notify(&mut self, notification: Notification) {
        self.push(notification);
    }
}

impl<T: NotificationSink + ?Sized> NotificationSink for &mut T {
    fn notify(&mut self, notification: Notification) {
        (**self).notify(notification);
    }
}

/// Delivers every notification to both sinks, first `A` then `B`.
impl<A: NotificationSink, B: NotificationSink> NotificationSink for (A, B) {
    fn notify(&mut self, notification: Notification) {
        self.0.notify(notification.clone());
        self.1.notify(notification);
    }
}

/// Writes notifications to the log instead of showing them.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&mut self, notification: Notification) {
        tracing::info!(
            severity = ?notification.severity,
            description = notification.description.as_deref().unwrap_or_default(),
            "{}",
            notification.message
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let n = Notification::success("Added")
            .with_description("In cart: 2 pcs.")
            .with_action("Open cart", ActionKind::OpenCart);
        assert_eq!(n.severity, Severity::Success);
        assert_eq!(n.description.as_deref(), Some("In cart: 2 pcs."));
        assert_eq!(
            n.action,
            Some(NotificationAction {
                label: "Open cart".to_string(),
                kind: ActionKind::OpenCart,
            })
        );
    }

    #[test]
    fn test_serialization_omits_empty_fields() {
        let json = serde_json::to_value(Notification::info("Cart cleared")).ok();
        assert_eq!(
            json,
            Some(serde_json::json!({"severity": "info", "message": "Cart cleared"}))
        );
    }

    #[test]
    fn test_vec_sink_collects() {
        fn emit<S: NotificationSink>(mut sink: S) {
            sink.notify(Notification::error("Cart is empty"));
        }

        let mut sink: Vec<Notification> = Vec::new();
        emit(&mut sink);
        assert_eq!(sink, vec![Notification::error("Cart is empty")]);
    }

    #[test]
    fn test_pair_sink_delivers_to_both() {
        let mut pair: (Vec<Notification>, Vec<Notification>) = (Vec::new(), Vec::new());
        pair.notify(Notification::success("Added to favorites: Rose"));
        assert_eq!(pair.0, pair.1);
        assert_eq!(pair.0.len(), 1);

        let mut logged: (Vec<Notification>, TracingSink) = (Vec::new(), TracingSink);
        logged.notify(Notification::info("Cart cleared"));
        assert_eq!(logged.0, vec![Notification::info("Cart cleared")]);
    }
}
