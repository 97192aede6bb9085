//! Configuration management for promptdrop
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

use crate::error::{PromptdropError, Result};

/// Main configuration structure for promptdrop
///
/// Holds relay server settings, the hosted model provider settings, and the
/// relay endpoint the client side submits uploads to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Relay server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Model provider configuration
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Relay endpoint configuration for the client side
    #[serde(default)]
    pub relay: RelayConfig,
}

/// Relay server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address for the relay server
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port for the relay server
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Provider configuration
///
/// Specifies which model capability to use and its settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Type of provider to use
    #[serde(rename = "type", default = "default_provider_type")]
    pub provider_type: String,

    /// Hosted model configuration
    #[serde(default)]
    pub hosted: HostedConfig,
}

fn default_provider_type() -> String {
    "hosted".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_type: default_provider_type(),
            hosted: HostedConfig::default(),
        }
    }
}

/// Hosted model provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostedConfig {
    /// Base URL of the hosted generation API
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Model identifier to request
    #[serde(default = "default_model")]
    pub model: String,

    /// Name of the environment variable holding the API key
    ///
    /// Credentials themselves never appear in the config file.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Request timeout for model calls (seconds)
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_api_base() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_api_key_env() -> String {
    "PROMPTDROP_API_KEY".to_string()
}

fn default_timeout() -> u64 {
    120
}

impl Default for HostedConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// Relay endpoint configuration for the client side
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Full URL of the upload endpoint a `send` submission posts to
    #[serde(default = "default_endpoint")]
    pub endpoint: Url,
}

fn default_endpoint() -> Url {
    Url::parse("http://127.0.0.1:8080/api/upload").expect("default endpoint URL is valid")
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
        }
    }
}

impl Config {
    /// Loads configuration from file, environment, and CLI overrides
    ///
    /// Precedence, lowest to highest: built-in defaults, config file,
    /// `PROMPTDROP_*` environment variables, CLI arguments.
    ///
    /// # Errors
    ///
    /// Returns error if the config file exists but cannot be read or parsed.
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| PromptdropError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| PromptdropError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(host) = std::env::var("PROMPTDROP_HOST") {
            self.server.host = host;
        }

        if let Ok(port) = std::env::var("PROMPTDROP_PORT") {
            if let Ok(value) = port.parse() {
                self.server.port = value;
            } else {
                tracing::warn!("Invalid PROMPTDROP_PORT: {}", port);
            }
        }

        if let Ok(api_base) = std::env::var("PROMPTDROP_API_BASE") {
            self.provider.hosted.api_base = api_base;
        }

        if let Ok(model) = std::env::var("PROMPTDROP_MODEL") {
            self.provider.hosted.model = model;
        }

        if let Ok(endpoint) = std::env::var("PROMPTDROP_RELAY_ENDPOINT") {
            match Url::parse(&endpoint) {
                Ok(url) => self.relay.endpoint = url,
                Err(e) => tracing::warn!("Invalid PROMPTDROP_RELAY_ENDPOINT: {}", e),
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        match &cli.command {
            crate::cli::Commands::Serve { host, port } => {
                if let Some(host) = host {
                    self.server.host = host.clone();
                }
                if let Some(port) = port {
                    self.server.port = *port;
                }
            }
            crate::cli::Commands::Send { relay, .. } => {
                if let Some(relay) = relay {
                    self.relay.endpoint = relay.clone();
                }
            }
        }
    }

    /// Validates the loaded configuration
    ///
    /// # Errors
    ///
    /// Returns error if the provider type is unknown, the API base is not an
    /// HTTP(S) URL, the port is zero, or the timeout is zero.
    pub fn validate(&self) -> Result<()> {
        if self.provider.provider_type != "hosted" {
            return Err(PromptdropError::Config(format!(
                "Unknown provider type: {}",
                self.provider.provider_type
            ))
            .into());
        }

        let api_base = &self.provider.hosted.api_base;
        if !api_base.starts_with("http://") && !api_base.starts_with("https://") {
            return Err(PromptdropError::Config(format!(
                "Provider api_base must be an http(s) URL, got: {}",
                api_base
            ))
            .into());
        }

        if self.server.port == 0 {
            return Err(PromptdropError::Config("Server port must be non-zero".to_string()).into());
        }

        if self.provider.hosted.timeout_seconds == 0 {
            return Err(
                PromptdropError::Config("Provider timeout must be non-zero".to_string()).into(),
            );
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            provider: ProviderConfig::default(),
            relay: RelayConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use serial_test::serial;
    use std::io::Write;

    fn cli_with_serve(host: Option<String>, port: Option<u16>) -> Cli {
        Cli {
            config: None,
            verbose: false,
            command: Commands::Serve { host, port },
        }
    }

    #[test]
    fn test_default_config_validates() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.provider.hosted.model, "gemini-1.5-flash");
    }

    #[test]
    #[serial]
    fn test_load_missing_file_uses_defaults() {
        let cli = cli_with_serve(None, None);
        let config = Config::load("/nonexistent/config.yaml", &cli).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    #[serial]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "server:\n  port: 9999\nprovider:\n  hosted:\n    model: test-model"
        )
        .unwrap();

        let cli = cli_with_serve(None, None);
        let config = Config::load(file.path().to_str().unwrap(), &cli).unwrap();
        assert_eq!(config.server.port, 9999);
        assert_eq!(config.provider.hosted.model, "test-model");
        // Unset fields fall back to defaults
        assert_eq!(config.provider.hosted.api_key_env, "PROMPTDROP_API_KEY");
    }

    #[test]
    #[serial]
    fn test_invalid_yaml_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "server: [not a mapping").unwrap();

        let cli = cli_with_serve(None, None);
        let result = Config::load(file.path().to_str().unwrap(), &cli);
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_env_var_overrides() {
        std::env::set_var("PROMPTDROP_PORT", "7777");
        std::env::set_var("PROMPTDROP_MODEL", "env-model");

        let cli = cli_with_serve(None, None);
        let config = Config::load("/nonexistent/config.yaml", &cli).unwrap();

        std::env::remove_var("PROMPTDROP_PORT");
        std::env::remove_var("PROMPTDROP_MODEL");

        assert_eq!(config.server.port, 7777);
        assert_eq!(config.provider.hosted.model, "env-model");
    }

    #[test]
    #[serial]
    fn test_cli_overrides_take_precedence() {
        std::env::set_var("PROMPTDROP_PORT", "7777");

        let cli = cli_with_serve(Some("0.0.0.0".to_string()), Some(6000));
        let config = Config::load("/nonexistent/config.yaml", &cli).unwrap();

        std::env::remove_var("PROMPTDROP_PORT");

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 6000);
    }

    #[test]
    fn test_validate_rejects_unknown_provider() {
        let mut config = Config::default();
        config.provider.provider_type = "other".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_http_api_base() {
        let mut config = Config::default();
        config.provider.hosted.api_base = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.provider.hosted.timeout_seconds = 0;
        assert!(config.validate().is_err());
    }
}
