use chrono::Local;
use std::time::{Duration, Instant};

/// How long a transient notification stays visible.
pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationStyle {
    Success,
    Error,
}

impl NotificationStyle {
    /// Background color the notification popup renders with.
    pub fn background(&self) -> &'static str {
        match self {
            NotificationStyle::Success => "#ffffffaa",
            NotificationStyle::Error => "#ff0000aa",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub message: String,
    pub style: NotificationStyle,
    pub timestamp: String,
}

impl Notification {
    pub fn new(message: impl Into<String>, style: NotificationStyle) -> Self {
        Self {
            message: message.into(),
            style,
            timestamp: Local::now().format("%H:%M:%S").to_string(),
        }
    }

    pub fn search_success(elapsed_seconds: f64) -> Self {
        Self::new(
            format!("[{elapsed_seconds:.2}s] request processed successfully"),
            NotificationStyle::Success,
        )
    }

    pub fn search_error(elapsed_seconds: f64) -> Self {
        Self::new(
            format!("[{elapsed_seconds:.2}s] an error occurred, check the logs"),
            NotificationStyle::Error,
        )
    }
}

/// Single-slot holder with lazy expiry: a new notification replaces the
/// previous one, and the slot stops answering once its TTL elapses. No
/// timers involved.
#[derive(Debug)]
pub struct NotificationCenter {
    slot: Option<(Notification, Instant)>,
    ttl: Duration,
}

impl NotificationCenter {
    pub fn new(ttl: Duration) -> Self {
        Self { slot: None, ttl }
    }

    pub fn post(&mut self, notification: Notification) {
        self.slot = Some((notification, Instant::now()));
    }

    /// The current notification, unless it already expired.
    pub fn active(&self) -> Option<&Notification> {
        match &self.slot {
            Some((notification, posted)) if posted.elapsed() < self.ttl => Some(notification),
            _ => None,
        }
    }

    pub fn dismiss(&mut self) {
        self.slot = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn posting_replaces_the_previous_notification() {
        let mut center = NotificationCenter::new(DEFAULT_NOTIFICATION_TTL);
        center.post(Notification::search_success(0.5));
        center.post(Notification::search_error(1.234));

        let active = center.active().unwrap();
        assert_eq!(active.style, NotificationStyle::Error);
        assert_eq!(active.message, "[1.23s] an error occurred, check the logs");
    }

    #[test]
    fn zero_ttl_expires_immediately() {
        let mut center = NotificationCenter::new(Duration::ZERO);
        center.post(Notification::search_success(2.0));
        assert!(center.active().is_none());
    }

    #[test]
    fn dismiss_clears_the_slot() {
        let mut center = NotificationCenter::new(DEFAULT_NOTIFICATION_TTL);
        center.post(Notification::search_success(2.0));
        center.dismiss();
        assert!(center.active().is_none());
    }

    #[test]
    fn styles_carry_their_popup_backgrounds() {
        assert_eq!(NotificationStyle::Success.background(), "#ffffffaa");
        assert_eq!(NotificationStyle::Error.background(), "#ff0000aa");
    }
}
