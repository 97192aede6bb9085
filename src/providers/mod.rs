//! Provider module for promptdrop
//!
//! This module contains the model-capability abstraction and the hosted
//! provider implementation the relay forwards uploads to.

pub mod base;
pub mod hosted;

pub use base::{ContentPart, FileAttachment, ModelProvider, ModelResult, RequestMessage};
pub use hosted::HostedModelProvider;

#[cfg(test)]
pub use base::MockModelProvider;

use std::sync::Arc;

use crate::config::ProviderConfig;
use crate::error::Result;

/// Create a provider instance based on configuration
///
/// # Arguments
///
/// * `config` - Provider configuration
///
/// # Returns
///
/// Returns a shared provider instance suitable for the relay state
///
/// # Errors
///
/// Returns error if the provider type is unknown or initialization fails
pub fn create_provider(config: &ProviderConfig) -> Result<Arc<dyn ModelProvider>> {
    match config.provider_type.as_str() {
        "hosted" => Ok(Arc::new(HostedModelProvider::new(config.hosted.clone())?)),
        other => Err(crate::error::PromptdropError::Provider(format!(
            "Unknown provider type: {}",
            other
        ))
        .into()),
    }
}
