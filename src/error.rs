use thiserror::Error;

/// Ways a backend call can fail. An error field inside a 2xx search
/// response is not one of them; that case travels through the submit
/// outcome because the call itself succeeded and may still carry geometry.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    #[error("geocoding failed: {0}")]
    Geocode(String),

    #[error("transport failure: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        BackendError::Transport(err.to_string())
    }
}
