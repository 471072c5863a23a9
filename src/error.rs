use thiserror::Error;

/// Message shown to the user whenever the initial series load fails.
pub const FETCH_FAILURE_MESSAGE: &str = "Failed to fetch data. Please try again later.";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("indicators API error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Whether this error belongs to the fetch boundary (network, status or decode).
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, Self::Api { .. } | Self::Http(_) | Self::Json(_))
    }
}
