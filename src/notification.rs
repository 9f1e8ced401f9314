//! Render diagnostics.
//!
//! Recovered problems (bad coordinates, unresolvable glyphs, clip fallbacks)
//! do not abort a render session. They are collected as `Notification`
//! items so that a caller can tell that output was degraded even though
//! rendering completed.

use crate::error::RenderError;
use std::fmt;

/// Category of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationType {
    /// A primitive was skipped because its geometry was unusable.
    GeometryError,
    /// A font or glyph was replaced by a substitute.
    ResourceResolution,
    /// Output was approximated (non-convex clip, unknown hatch, ...).
    Warning,
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GeometryError => write!(f, "GeometryError"),
            Self::ResourceResolution => write!(f, "ResourceResolution"),
            Self::Warning => write!(f, "Warning"),
        }
    }
}

/// A single diagnostic produced during rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    /// The category.
    pub notification_type: NotificationType,
    /// Zero-based index of the draw call that produced it.
    pub call_index: usize,
    /// A human-readable description of the issue.
    pub message: String,
}

impl Notification {
    /// Create a new notification.
    pub fn new(
        notification_type: NotificationType,
        call_index: usize,
        message: impl Into<String>,
    ) -> Self {
        Self {
            notification_type,
            call_index,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] call #{}: {}",
            self.notification_type, self.call_index, self.message
        )
    }
}

/// Collects notifications during a render session.
#[derive(Debug, Clone, Default)]
pub struct NotificationCollection {
    items: Vec<Notification>,
}

impl NotificationCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Record a notification and mirror it to the log.
    pub fn notify(
        &mut self,
        notification_type: NotificationType,
        call_index: usize,
        message: impl Into<String>,
    ) {
        let notification = Notification::new(notification_type, call_index, message);
        log::warn!("{}", notification);
        self.items.push(notification);
    }

    /// Record a recovered error under its matching category.
    pub fn record_error(&mut self, call_index: usize, error: &RenderError) {
        let notification_type = match error {
            RenderError::ResourceResolution(_) => NotificationType::ResourceResolution,
            RenderError::Geometry(_) => NotificationType::GeometryError,
            _ => NotificationType::Warning,
        };
        self.notify(notification_type, call_index, error.to_string());
    }

    /// Check if there are any notifications.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of notifications.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Iterate over all notifications.
    pub fn iter(&self) -> std::slice::Iter<'_, Notification> {
        self.items.iter()
    }

    /// Number of notifications of a specific type.
    pub fn count(&self, nt: NotificationType) -> usize {
        self.items.iter().filter(|n| n.notification_type == nt).count()
    }

    /// Get all notifications of a specific type.
    pub fn of_type(&self, nt: NotificationType) -> Vec<&Notification> {
        self.items.iter().filter(|n| n.notification_type == nt).collect()
    }

    /// Check whether any notification of the given type exists.
    pub fn has_type(&self, nt: NotificationType) -> bool {
        self.items.iter().any(|n| n.notification_type == nt)
    }

    /// Consume the collection into a `Vec`.
    pub fn into_vec(self) -> Vec<Notification> {
        self.items
    }
}

impl<'a> IntoIterator for &'a NotificationCollection {
    type Item = &'a Notification;
    type IntoIter = std::slice::Iter<'a, Notification>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeometryError;

    #[test]
    fn test_collection_basics() {
        let mut c = NotificationCollection::new();
        assert!(c.is_empty());

        c.notify(NotificationType::Warning, 0, "w1");
        c.notify(NotificationType::GeometryError, 1, "e1");
        c.notify(NotificationType::Warning, 2, "w2");

        assert_eq!(c.len(), 3);
        assert_eq!(c.count(NotificationType::Warning), 2);
        assert!(c.has_type(NotificationType::GeometryError));
        assert!(!c.has_type(NotificationType::ResourceResolution));
    }

    #[test]
    fn test_record_error_categorizes() {
        let mut c = NotificationCollection::new();
        c.record_error(4, &GeometryError::MissingMoveTo.into());
        c.record_error(5, &RenderError::ResourceResolution("glyph 'x'".into()));
        assert_eq!(c.of_type(NotificationType::GeometryError)[0].call_index, 4);
        assert_eq!(c.count(NotificationType::ResourceResolution), 1);
    }

    #[test]
    fn test_display() {
        let n = Notification::new(NotificationType::Warning, 3, "non-convex clip");
        assert_eq!(format!("{}", n), "[Warning] call #3: non-convex clip");
    }
}
