//! HTTP client for the two backend endpoints
//!
//! `SearchBackend` is the seam the orchestrator depends on; `ApiClient` is
//! the reqwest implementation of it. Lifecycle tests substitute a stub
//! behind the same trait.

use crate::error::BackendError;
use crate::geometry::SearchResponse;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Either coordinates or an error message, depending on whether the
/// geocoder recognized the address.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum GeocodeResponse {
    Coordinates { lat: f64, lon: f64 },
    Failure { error: String },
}

/// One search submission, immutable once built. Wire encoding lives in
/// `to_form`.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub address: String,
    /// Leak time in minutes; goes out as `HH:MM`.
    pub leak_time_minutes: u32,
    pub leak_direction: String,
    pub strategy: String,
    pub point_count: u32,
    /// Isochrone time step in seconds; only sent when present.
    pub time_step: Option<f64>,
    pub iso_color: Option<String>,
    pub show_isochrone: bool,
}

impl SearchRequest {
    fn leak_time_field(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.leak_time_minutes / 60,
            self.leak_time_minutes % 60
        )
    }

    /// Form pairs in the backend's wire vocabulary.
    pub(crate) fn to_form(&self) -> Vec<(&'static str, String)> {
        let mut form = vec![
            ("adresse", self.address.clone()),
            ("temps_fuite", self.leak_time_field()),
            ("direction_fuite", self.leak_direction.clone()),
            ("strategie", self.strategy.clone()),
            ("num", self.point_count.to_string()),
            ("print_iso", self.show_isochrone.to_string()),
        ];
        if let Some(color) = &self.iso_color {
            form.push(("iso_color", color.clone()));
        }
        if let Some(step) = self.time_step {
            form.push(("dt", step.to_string()));
        }
        form
    }
}

#[async_trait]
pub trait SearchBackend {
    async fn geocode(&self, address: &str) -> Result<GeocodeResponse, BackendError>;
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, BackendError>;
}

pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[async_trait]
impl SearchBackend for ApiClient {
    async fn geocode(&self, address: &str) -> Result<GeocodeResponse, BackendError> {
        debug!(target: "api", "POST /chercher for {:?}", address);
        let response = self
            .client
            .post(format!("{}/chercher", self.base_url))
            .form(&[("adresse", address)])
            .send()
            .await?;

        // Some backend revisions report an unknown address with a non-2xx
        // status but still put the message in the body.
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else if let Ok(GeocodeResponse::Failure { error }) =
            response.json::<GeocodeResponse>().await
        {
            Ok(GeocodeResponse::Failure { error })
        } else {
            Err(BackendError::Transport(format!(
                "geocoder returned {status}"
            )))
        }
    }

    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, BackendError> {
        debug!(
            target: "api",
            "POST /submit for {:?} ({} points requested)",
            request.address, request.point_count
        );
        let response = self
            .client
            .post(format!("{}/submit", self.base_url))
            .form(&request.to_form())
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }
}
