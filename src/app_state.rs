//! Session state
//!
//! One struct owns everything a submission mutates: the busy flag, the last
//! result, the overlay registry, queued alerts and the notification slot.
//! No globals; the orchestrator owns an `AppState` and collaborators borrow
//! what they need.

use crate::geometry::SearchResponse;
use crate::notifications::NotificationCenter;
use crate::overlay_registry::OverlayRegistry;
use std::time::Duration;
use tracing::info;

/// Submit-control lifecycle. `Waiting` never outlives one submission
/// because `submit` holds `&mut self` for its whole duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Idle,
    Waiting,
}

#[derive(Debug)]
pub struct AppState {
    lifecycle: Lifecycle,
    last_result: Option<SearchResponse>,
    alerts: Vec<String>,
    pub overlays: OverlayRegistry,
    pub notifications: NotificationCenter,
}

impl AppState {
    pub fn new(notification_ttl: Duration) -> Self {
        Self {
            lifecycle: Lifecycle::Idle,
            last_result: None,
            alerts: Vec::new(),
            overlays: OverlayRegistry::new(),
            notifications: NotificationCenter::new(notification_ttl),
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_busy(&self) -> bool {
        self.lifecycle == Lifecycle::Waiting
    }

    pub(crate) fn begin_waiting(&mut self) {
        info!(target: "lifecycle", "Idle -> Waiting");
        self.lifecycle = Lifecycle::Waiting;
    }

    pub(crate) fn finish(&mut self) {
        info!(target: "lifecycle", "Waiting -> Idle");
        self.lifecycle = Lifecycle::Idle;
    }

    pub fn last_result(&self) -> Option<&SearchResponse> {
        self.last_result.as_ref()
    }

    /// Replace, don't merge: each stored response supersedes the previous
    /// one entirely.
    pub(crate) fn store_result(&mut self, response: SearchResponse) {
        self.last_result = Some(response);
    }

    /// Queues a blocking alert for the front end to show.
    pub(crate) fn push_alert(&mut self, message: String) {
        self.alerts.push(message);
    }

    pub fn take_alerts(&mut self) -> Vec<String> {
        std::mem::take(&mut self.alerts)
    }
}
