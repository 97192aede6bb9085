//! Base provider trait and common types for promptdrop
//!
//! This module defines the [`ModelProvider`] trait that hosted model
//! capabilities implement, along with the wire-level message types for the
//! single-turn multimodal request and the opaque [`ModelResult`] returned
//! per invocation.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One file forwarded to the model capability
///
/// Carries the raw bytes and the mime type declared by the uploader. The
/// mime type may be empty; it is passed through as-is since the capability
/// treats it as advisory.
#[derive(Debug, Clone)]
pub struct FileAttachment {
    /// Raw file content
    pub bytes: Bytes,
    /// Declared content type (may be empty)
    pub mime_type: String,
}

/// Outcome of one model invocation
///
/// The capability's response shape is opaque; `raw` holds it verbatim and
/// `text` is the best-effort extracted display string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelResult {
    /// Extracted display text (empty when no text field was found)
    pub text: String,
    /// The structured result exactly as the capability returned it
    pub raw: serde_json::Value,
}

impl ModelResult {
    /// Wraps an opaque capability response, extracting its display text
    ///
    /// Looks for `text` at the top level first, then common nested shapes.
    /// A response with no extractable text yields an empty string and a
    /// warning rather than an error; the raw value is kept either way.
    pub fn from_raw(raw: serde_json::Value) -> Self {
        let text = raw
            .get("text")
            .and_then(serde_json::Value::as_str)
            .or_else(|| raw.pointer("/content/0/text").and_then(serde_json::Value::as_str))
            .or_else(|| raw.pointer("/steps/0/text").and_then(serde_json::Value::as_str))
            .map(str::to_string)
            .unwrap_or_else(|| {
                tracing::warn!("model result contained no extractable text field");
                String::new()
            });
        Self { text, raw }
    }
}

/// One content part of the single user message sent to the capability
///
/// The request carries exactly two parts: the text prompt and the
/// base64-encoded file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentPart {
    /// Free-text prompt part
    Text { text: String },
    /// Base64-encoded file part with its declared mime type
    File {
        data: String,
        #[serde(rename = "mimeType")]
        mime_type: String,
    },
}

/// One message in the model request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestMessage {
    /// Role of the message sender (always "user" for relay submissions)
    pub role: String,
    /// Ordered content parts
    pub content: Vec<ContentPart>,
}

impl RequestMessage {
    /// Builds the single user message for a prompt plus encoded file
    pub fn user(prompt: impl Into<String>, data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: vec![
                ContentPart::Text {
                    text: prompt.into(),
                },
                ContentPart::File {
                    data: data.into(),
                    mime_type: mime_type.into(),
                },
            ],
        }
    }
}

/// Hosted model capability
///
/// Implementations forward one prompt + file pair to a remote model and
/// return the structured result. Latency, quota, and failure modes of the
/// remote side are outside this crate's control; implementations convert
/// every failure into an error value rather than panicking.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Invokes the model with the prompt and file as one user message
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent, the capability
    /// responds with a non-success status, or the response body is not JSON.
    async fn generate(&self, prompt: &str, attachment: &FileAttachment) -> Result<ModelResult>;

    /// Short identifier for logging
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_model_result_extracts_top_level_text() {
        let result = ModelResult::from_raw(json!({"text": "a red square", "usage": {"tokens": 9}}));
        assert_eq!(result.text, "a red square");
        assert_eq!(result.raw["usage"]["tokens"], 9);
    }

    #[test]
    fn test_model_result_extracts_nested_content_text() {
        let result = ModelResult::from_raw(json!({"content": [{"type": "text", "text": "nested"}]}));
        assert_eq!(result.text, "nested");
    }

    #[test]
    fn test_model_result_extracts_steps_text() {
        let result = ModelResult::from_raw(json!({"steps": [{"text": "step text"}]}));
        assert_eq!(result.text, "step text");
    }

    #[test]
    fn test_model_result_without_text_is_empty_not_error() {
        let raw = json!({"finishReason": "stop"});
        let result = ModelResult::from_raw(raw.clone());
        assert_eq!(result.text, "");
        assert_eq!(result.raw, raw);
    }

    #[test]
    fn test_user_message_has_two_parts_in_order() {
        let msg = RequestMessage::user("describe this", "aGVsbG8=", "image/png");
        assert_eq!(msg.role, "user");
        assert_eq!(msg.content.len(), 2);
        assert_eq!(
            msg.content[0],
            ContentPart::Text {
                text: "describe this".to_string()
            }
        );
        assert_eq!(
            msg.content[1],
            ContentPart::File {
                data: "aGVsbG8=".to_string(),
                mime_type: "image/png".to_string()
            }
        );
    }

    #[test]
    fn test_content_part_wire_shape() {
        let part = ContentPart::File {
            data: "QUJD".to_string(),
            mime_type: "application/pdf".to_string(),
        };
        let value = serde_json::to_value(&part).unwrap();
        assert_eq!(
            value,
            json!({"type": "file", "data": "QUJD", "mimeType": "application/pdf"})
        );

        let text = ContentPart::Text {
            text: "hi".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&text).unwrap(),
            json!({"type": "text", "text": "hi"})
        );
    }
}
