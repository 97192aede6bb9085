//! HTTP client for the relay endpoint
//!
//! Packages one [`UploadRequest`] as a multipart POST (`file` + `prompt`
//! parts) and translates the relay's wire responses back into values:
//! a [`ModelResult`] on success, an error carrying the relay's diagnostic
//! on anything else.

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::error::{PromptdropError, Result};
use crate::providers::ModelResult;
use crate::session::UploadRequest;

/// Fallback content type for files staged without one
const OCTET_STREAM: &str = "application/octet-stream";

/// Client for one relay endpoint
pub struct RelayClient {
    client: Client,
    endpoint: Url,
}

/// Success body from the relay: `{ "success": true, "result": ... }`
#[derive(Debug, Deserialize)]
struct UploadResponseBody {
    #[allow(dead_code)]
    success: bool,
    result: serde_json::Value,
}

/// Error body from the relay: `{ "error": "..." }`
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl RelayClient {
    /// Creates a client posting to the given upload endpoint
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be constructed.
    pub fn new(endpoint: Url) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| PromptdropError::Relay(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client, endpoint })
    }

    /// The endpoint this client posts to
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Sends one upload and awaits the relay's response
    ///
    /// # Errors
    ///
    /// Returns error if the request cannot be sent, the relay responds with
    /// a non-success status (the relay's `error` field becomes the message),
    /// or the success body cannot be parsed.
    pub async fn upload(&self, request: UploadRequest) -> Result<ModelResult> {
        let mime = if request.file_mime_type.is_empty() {
            OCTET_STREAM
        } else {
            &request.file_mime_type
        };

        let part = Part::bytes(request.file_bytes.to_vec())
            .file_name(request.file_name.clone())
            .mime_str(mime)
            .map_err(|e| PromptdropError::Relay(format!("Invalid mime type {}: {}", mime, e)))?;
        let form = Form::new()
            .part("file", part)
            .text("prompt", request.prompt.clone());

        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("relay request failed: {}", e);
                PromptdropError::Relay(format!("relay request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or(body);
            tracing::error!("relay returned {}: {}", status, message);
            return Err(
                PromptdropError::Relay(format!("relay returned {}: {}", status, message)).into(),
            );
        }

        let body: UploadResponseBody = response.json().await.map_err(|e| {
            tracing::error!("failed to parse relay response: {}", e);
            PromptdropError::Relay(format!("failed to parse relay response: {}", e))
        })?;

        Ok(ModelResult::from_raw(body.result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_keeps_endpoint() {
        let endpoint = Url::parse("http://localhost:8080/api/upload").unwrap();
        let client = RelayClient::new(endpoint.clone()).unwrap();
        assert_eq!(client.endpoint(), &endpoint);
    }

    #[test]
    fn test_error_body_parses() {
        let body: ErrorBody = serde_json::from_str(r#"{"error": "Missing file or prompt"}"#).unwrap();
        assert_eq!(body.error, "Missing file or prompt");
    }

    #[test]
    fn test_success_body_parses() {
        let body: UploadResponseBody =
            serde_json::from_str(r#"{"success": true, "result": {"text": "ok"}}"#).unwrap();
        assert_eq!(body.result["text"], "ok");
    }
}
