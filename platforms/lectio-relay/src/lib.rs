//! `POST /api/submit`: forwards a reader's exercise results to a Telegram chat.

pub mod config;
pub mod error;
pub mod message;
pub mod notifier;

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::info;

pub use config::{RelayConfig, TelegramTarget};
pub use error::RelayError;
pub use message::{format_message, Submission};
pub use notifier::{Notifier, TelegramNotifier};

pub const SUBMIT_PATH: &str = "/api/submit";

/// Handlers share only immutable configuration and the notifier.
#[derive(Clone)]
pub struct AppState {
    pub target: Option<TelegramTarget>,
    pub notifier: Arc<dyn Notifier>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(SUBMIT_PATH, post(submit).fallback(reject_method))
        .with_state(state)
}

async fn submit(State(state): State<AppState>, body: Bytes) -> Result<Json<Value>, RelayError> {
    let target = state.target.as_ref().ok_or(RelayError::MissingConfig)?;
    let submission = Submission::from_body(&body);
    let text = format_message(&submission);

    state.notifier.send(target, &text).await?;
    info!(name = %submission.name, unit = %submission.unit, "result forwarded");
    Ok(Json(json!({ "ok": true })))
}

async fn reject_method(method: Method) -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "POST")],
        Json(json!({ "error": format!("Method {} not allowed", method) })),
    )
        .into_response()
}
