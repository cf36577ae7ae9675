use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    domain::{preview, Category, EmailOutcome, SessionResult},
    triage::EmailTriage,
};

use super::intake::{read_email_from_form, read_email_from_json, UserInputError};

const API_PREVIEW_LIMIT: usize = 200;

#[derive(Clone)]
pub struct WebState {
    pub triage: Arc<EmailTriage>,
    pub max_upload_bytes: usize,
}

pub fn router(state: WebState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/classify", post(classify_form))
        .route("/api/classify", post(classify_json))
        .layer(DefaultBodyLimit::max(state.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

#[derive(Serialize)]
struct FormResponse {
    success: bool,
    #[serde(flatten)]
    result: SessionResult,
}

/// POST /classify
///
/// Multipart form with either `email_text` or an `email_file` upload.
async fn classify_form(
    State(state): State<WebState>,
    multipart: Multipart,
) -> Result<Json<FormResponse>, ApiError> {
    let content = read_email_from_form(multipart, state.max_upload_bytes).await?;
    let outcome = state.triage.process(&content).await;
    log_outcome("/classify", &outcome);
    Ok(Json(FormResponse {
        success: true,
        result: SessionResult::new(&content, &outcome),
    }))
}

#[derive(Deserialize)]
struct ClassifyRequest {
    email_content: Option<String>,
}

#[derive(Serialize)]
struct ClassifyResponse {
    success: bool,
    classification: Category,
    response: String,
    original_content_preview: String,
}

/// POST /api/classify
///
/// JSON body `{ "email_content": "..." }`. Unparsable bodies are treated as
/// missing content; bodies over the upload limit get 413.
async fn classify_json(
    State(state): State<WebState>,
    payload: Result<Json<ClassifyRequest>, JsonRejection>,
) -> Result<Json<ClassifyResponse>, ApiError> {
    let email_content = match payload {
        Ok(Json(body)) => body.email_content,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            return Err(UserInputError::TooLarge(state.max_upload_bytes).into());
        }
        Err(_) => None,
    };
    let content = read_email_from_json(email_content.as_deref())?;
    let outcome = state.triage.process(&content).await;
    log_outcome("/api/classify", &outcome);
    Ok(Json(ClassifyResponse {
        success: true,
        classification: outcome.categoria,
        response: outcome.resposta,
        original_content_preview: preview(&content, API_PREVIEW_LIMIT),
    }))
}

fn log_outcome(route: &'static str, outcome: &EmailOutcome) {
    tracing::info!(
        target: "http",
        route,
        categoria = %outcome.categoria,
        source = outcome.classification.source.label(),
        score = outcome.classification.score,
        "request answered"
    );
}

pub struct ApiError(UserInputError);

impl From<UserInputError> for ApiError {
    fn from(err: UserInputError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            UserInputError::TooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::BAD_REQUEST,
        };
        tracing::warn!(target: "http", status = status.as_u16(), error = %self.0, "rejected request");
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
