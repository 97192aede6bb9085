//! Command-line interface definition for promptdrop
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for running the relay server and for submitting a
//! staged upload to it.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use url::Url;

/// promptdrop - file + prompt relay for a hosted multimodal model
///
/// Run the relay endpoint with `serve`, or stage local files and a prompt
/// and submit them to a running relay with `send`.
#[derive(Parser, Debug, Clone)]
#[command(name = "promptdrop")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for promptdrop
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the relay endpoint
    Serve {
        /// Override the bind address from config
        #[arg(long)]
        host: Option<String>,

        /// Override the bind port from config
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Stage files and a prompt, then submit to a running relay
    ///
    /// All listed files are staged, but only the first is transmitted.
    Send {
        /// Files to stage (first one is submitted)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Prompt to send alongside the file
        #[arg(short = 'm', long)]
        prompt: String,

        /// Override the relay endpoint URL from config
        #[arg(long)]
        relay: Option<Url>,
    },
}

impl Cli {
    /// Parses command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_with_overrides() {
        let cli = Cli::try_parse_from(["promptdrop", "serve", "--host", "0.0.0.0", "-p", "9000"])
            .unwrap();
        match cli.command {
            Commands::Serve { host, port } => {
                assert_eq!(host.as_deref(), Some("0.0.0.0"));
                assert_eq!(port, Some(9000));
            }
            _ => panic!("expected serve command"),
        }
    }

    #[test]
    fn test_parse_send_with_multiple_files() {
        let cli = Cli::try_parse_from([
            "promptdrop",
            "send",
            "photo.png",
            "notes.txt",
            "-m",
            "describe these",
        ])
        .unwrap();
        match cli.command {
            Commands::Send {
                files,
                prompt,
                relay,
            } => {
                assert_eq!(files.len(), 2);
                assert_eq!(prompt, "describe these");
                assert!(relay.is_none());
            }
            _ => panic!("expected send command"),
        }
    }

    #[test]
    fn test_send_requires_files() {
        let result = Cli::try_parse_from(["promptdrop", "send", "-m", "no files"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_send_requires_prompt() {
        let result = Cli::try_parse_from(["promptdrop", "send", "photo.png"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_send_rejects_invalid_relay_url() {
        let result = Cli::try_parse_from([
            "promptdrop",
            "send",
            "photo.png",
            "-m",
            "hi",
            "--relay",
            "not a url",
        ]);
        assert!(result.is_err());
    }
}
