use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Telegram env vars not set")]
    MissingConfig,
    #[error("Telegram answered {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("Telegram request failed: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for RelayError {
    fn from(e: reqwest::Error) -> Self {
        RelayError::Transport(e.to_string())
    }
}

impl RelayError {
    /// Message exposed to the client. Upstream details stay in the log.
    pub fn public_message(&self) -> &'static str {
        match self {
            RelayError::MissingConfig => "Telegram env vars not set",
            RelayError::Rejected { .. } => "Failed to send to Telegram",
            RelayError::Transport(_) => "Telegram request failed",
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        error!(error = %self, "result relay failed");
        let body = Json(json!({ "error": self.public_message() }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
