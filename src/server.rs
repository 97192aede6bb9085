//! Relay endpoint for promptdrop
//!
//! Exposes `POST /api/upload`, which accepts one multipart submission
//! (`file` + `prompt`), forwards it to the configured model capability, and
//! returns the structured result. Each request is handled independently with
//! no shared mutable state; the only shared value is the provider handle.
//!
//! Wire contract:
//! - 200 `{ "success": true, "result": <opaque model result> }`
//! - 400 `{ "error": "Missing file or prompt" }` (model not called)
//! - 500 `{ "error": "Server error" }` (cause logged, never exposed)

use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;

use crate::error::Result;
use crate::providers::{FileAttachment, ModelProvider, ModelResult};

/// Shared state for the relay
#[derive(Clone)]
pub struct AppState {
    /// Model capability uploads are forwarded to
    pub provider: Arc<dyn ModelProvider>,
}

/// Builds the relay router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/upload", post(handle_upload))
        .with_state(state)
}

/// What a well-formed request produced
enum UploadOutcome {
    /// `file` or `prompt` was absent (or the prompt was empty)
    MissingField,
    /// The model call completed
    Completed(ModelResult),
}

/// Handles one upload submission
///
/// All failures are converted to a response value here; nothing propagates
/// as an unhandled fault. Parse failures and model-call failures both map to
/// the generic 500 body with the underlying cause logged for operators only.
async fn handle_upload(State(state): State<AppState>, multipart: Multipart) -> Response {
    match process_upload(&state, multipart).await {
        Ok(UploadOutcome::MissingField) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Missing file or prompt" })),
        )
            .into_response(),
        Ok(UploadOutcome::Completed(result)) => (
            StatusCode::OK,
            Json(json!({ "success": true, "result": result.raw })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("upload request failed: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Server error" })),
            )
                .into_response()
        }
    }
}

/// Parses the multipart body and invokes the provider on valid input
async fn process_upload(state: &AppState, mut multipart: Multipart) -> Result<UploadOutcome> {
    let mut file: Option<FileAttachment> = None;
    let mut file_name: Option<String> = None;
    let mut prompt: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        match field.name().unwrap_or("") {
            "file" => {
                let name = field.file_name().map(str::to_string);
                let mime_type = field.content_type().map(str::to_string).unwrap_or_default();
                let bytes = field.bytes().await?;
                tracing::debug!(
                    "received file part: name={:?}, type={}, {} bytes",
                    name,
                    if mime_type.is_empty() { "unknown" } else { &mime_type },
                    bytes.len()
                );
                file_name = name;
                file = Some(FileAttachment { bytes, mime_type });
            }
            "prompt" => {
                let text = field.text().await?;
                tracing::debug!("received prompt part ({} chars)", text.len());
                prompt = Some(text);
            }
            other => {
                tracing::debug!("ignoring unexpected multipart field: {}", other);
            }
        }
    }

    let (Some(file), Some(prompt)) = (file, prompt) else {
        return Ok(UploadOutcome::MissingField);
    };
    // An empty prompt counts as missing, same as the absent part.
    if prompt.is_empty() {
        return Ok(UploadOutcome::MissingField);
    }

    tracing::info!(
        "forwarding {} ({} bytes) to provider {}",
        file_name.as_deref().unwrap_or("<unnamed>"),
        file.bytes.len(),
        state.provider.name()
    );

    let result = state.provider.generate(&prompt, &file).await?;
    Ok(UploadOutcome::Completed(result))
}
