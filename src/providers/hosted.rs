//! Hosted model provider implementation for promptdrop
//!
//! This module implements the [`ModelProvider`] trait against a hosted
//! multimodal completion endpoint. The file bytes are base64-encoded and
//! sent together with the text prompt as the two content parts of a single
//! user message; the response body is kept verbatim as the opaque result.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use crate::config::HostedConfig;
use crate::error::{PromptdropError, Result};
use crate::providers::{FileAttachment, ModelProvider, ModelResult, RequestMessage};

/// Hosted multimodal model provider
///
/// Posts a single-turn generation request to `{api_base}/v1/generate` with
/// the configured model identifier. Credentials are read from the
/// environment variable named in the config; when absent the request is
/// sent unauthenticated (useful against local mocks).
pub struct HostedModelProvider {
    client: Client,
    config: HostedConfig,
    api_key: Option<String>,
}

/// Request body for the generation endpoint
#[derive(Debug, Serialize)]
struct GenerateRequest {
    model: String,
    messages: Vec<RequestMessage>,
}

impl HostedModelProvider {
    /// Creates a provider from configuration
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be constructed.
    pub fn new(config: HostedConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                PromptdropError::Provider(format!("Failed to create HTTP client: {}", e))
            })?;

        let api_key = std::env::var(&config.api_key_env).ok();
        if api_key.is_none() {
            tracing::debug!(
                "no API key in {}, sending unauthenticated requests",
                config.api_key_env
            );
        }

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    /// Full URL of the generation endpoint
    fn generate_url(&self) -> String {
        format!("{}/v1/generate", self.config.api_base.trim_end_matches('/'))
    }
}

#[async_trait]
impl ModelProvider for HostedModelProvider {
    async fn generate(&self, prompt: &str, attachment: &FileAttachment) -> Result<ModelResult> {
        let encoded = STANDARD.encode(&attachment.bytes);
        let request = GenerateRequest {
            model: self.config.model.clone(),
            messages: vec![RequestMessage::user(
                prompt,
                encoded,
                attachment.mime_type.clone(),
            )],
        };

        tracing::debug!(
            "sending generation request: model={}, file {} bytes ({})",
            request.model,
            attachment.bytes.len(),
            attachment.mime_type
        );

        let mut builder = self.client.post(self.generate_url()).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!("model request failed: {}", e);
            PromptdropError::Provider(format!("model request failed: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("model returned error {}: {}", status, error_text);
            return Err(PromptdropError::Provider(format!(
                "model returned error {}: {}",
                status, error_text
            ))
            .into());
        }

        let raw: serde_json::Value = response.json().await.map_err(|e| {
            tracing::error!("failed to parse model response: {}", e);
            PromptdropError::Provider(format!("failed to parse model response: {}", e))
        })?;

        Ok(ModelResult::from_raw(raw))
    }

    fn name(&self) -> &str {
        "hosted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_url_joins_without_double_slash() {
        let provider = HostedModelProvider::new(HostedConfig {
            api_base: "http://localhost:9000/".to_string(),
            ..HostedConfig::default()
        })
        .unwrap();
        assert_eq!(provider.generate_url(), "http://localhost:9000/v1/generate");

        let provider = HostedModelProvider::new(HostedConfig {
            api_base: "http://localhost:9000".to_string(),
            ..HostedConfig::default()
        })
        .unwrap();
        assert_eq!(provider.generate_url(), "http://localhost:9000/v1/generate");
    }

    #[test]
    fn test_provider_name() {
        let provider = HostedModelProvider::new(HostedConfig::default()).unwrap();
        assert_eq!(provider.name(), "hosted");
    }
}
