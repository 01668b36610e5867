//! Request lifecycle
//!
//! Coordinates one submission end to end: the geocode call and the search
//! call run concurrently on the same task, each outcome is applied to the
//! map and the session state, and the busy flag is restored no matter
//! which calls failed.

use crate::api_client::{GeocodeResponse, SearchBackend, SearchRequest};
use crate::app_state::AppState;
use crate::error::BackendError;
use crate::geometry::{LatLon, SearchResponse};
use crate::map_surface::{MapSurface, Overlay};
use crate::notifications::Notification;
use crate::result_renderer::{RenderOptions, RenderStats, ResultRenderer};
use std::time::Duration;
use tracing::{error, info, warn};

/// How one submission ended, for display and history. The UI observes
/// state changes either way; this enum never drives control flow.
#[derive(Debug)]
pub enum SubmitOutcome {
    Success {
        elapsed_seconds: f64,
        stats: RenderStats,
    },
    /// 2xx response carrying an application error; any geometry in the
    /// same payload was still rendered.
    ApplicationError {
        message: String,
        elapsed_seconds: f64,
        stats: RenderStats,
    },
    TransportError(BackendError),
}

impl SubmitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmitOutcome::Success { .. })
    }

    pub fn elapsed_seconds(&self) -> f64 {
        match self {
            SubmitOutcome::Success {
                elapsed_seconds, ..
            }
            | SubmitOutcome::ApplicationError {
                elapsed_seconds, ..
            } => *elapsed_seconds,
            SubmitOutcome::TransportError(_) => 0.0,
        }
    }
}

pub struct SearchOrchestrator<B: SearchBackend> {
    backend: B,
    state: AppState,
    recenter_zoom: u8,
}

impl<B: SearchBackend> SearchOrchestrator<B> {
    pub fn new(backend: B, recenter_zoom: u8, notification_ttl: Duration) -> Self {
        Self {
            backend,
            state: AppState::new(notification_ttl),
            recenter_zoom,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    /// Runs one submission. Taking `&mut self` makes overlapping
    /// submissions unrepresentable; the busy flag is purely a UI signal.
    pub async fn submit(
        &mut self,
        request: SearchRequest,
        options: &RenderOptions,
        surface: &mut dyn MapSurface,
    ) -> SubmitOutcome {
        info!(target: "lifecycle", "submitting search for {:?}", request.address);

        // 1. Show the busy state before anything leaves the process.
        self.state.begin_waiting();

        // 2. Both calls run concurrently; neither outcome depends on the
        //    other.
        let (geocode_result, search_result) = tokio::join!(
            self.backend.geocode(&request.address),
            self.backend.search(&request),
        );

        // 3. Apply the geocode outcome: recenter and marker, or an alert.
        self.apply_geocode(geocode_result, surface);

        // 4. Apply the search outcome: render and notify, or an alert.
        let outcome = self.apply_search(search_result, options, surface);

        // 5. Restore Idle on every path; Waiting must never stick.
        self.state.finish();

        outcome
    }

    fn apply_geocode(
        &mut self,
        result: Result<GeocodeResponse, BackendError>,
        surface: &mut dyn MapSurface,
    ) {
        match result {
            Ok(GeocodeResponse::Coordinates { lat, lon }) => {
                let position = LatLon::new(lat, lon);
                surface.set_view(position, self.recenter_zoom);
                let id = surface.add_overlay(Overlay::Marker { position });
                self.state.overlays.track(id);
                info!(target: "lifecycle", "recentered on {:.5}, {:.5}", lat, lon);
            }
            Ok(GeocodeResponse::Failure { error }) => {
                warn!(target: "lifecycle", "geocode refused the address: {}", error);
                self.state
                    .push_alert(BackendError::Geocode(error).to_string());
            }
            Err(err) => {
                warn!(target: "lifecycle", "geocode call failed: {}", err);
                self.state.push_alert(err.to_string());
            }
        }
    }

    fn apply_search(
        &mut self,
        result: Result<SearchResponse, BackendError>,
        options: &RenderOptions,
        surface: &mut dyn MapSurface,
    ) -> SubmitOutcome {
        match result {
            Ok(response) => {
                let elapsed_seconds = response.elapsed_seconds;
                info!(target: "lifecycle", "search answered in {:.2}s", elapsed_seconds);

                let stats =
                    ResultRenderer::render(&response, options, surface, &mut self.state.overlays);
                let app_error = response.error.clone();
                self.state.store_result(response);

                match app_error {
                    None => {
                        self.state
                            .notifications
                            .post(Notification::search_success(elapsed_seconds));
                        SubmitOutcome::Success {
                            elapsed_seconds,
                            stats,
                        }
                    }
                    Some(message) => {
                        warn!(target: "lifecycle", "search reported an error: {}", message);
                        self.state
                            .notifications
                            .post(Notification::search_error(elapsed_seconds));
                        SubmitOutcome::ApplicationError {
                            message,
                            elapsed_seconds,
                            stats,
                        }
                    }
                }
            }
            Err(err) => {
                error!(target: "lifecycle", "search call failed: {}", err);
                self.state
                    .push_alert(format!("the request could not be sent: {err}"));
                SubmitOutcome::TransportError(err)
            }
        }
    }
}
