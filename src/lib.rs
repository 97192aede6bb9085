//! promptdrop - file + prompt relay for a hosted multimodal model
//!
//! This library implements both halves of a minimal upload pipeline:
//!
//! - `session` / `preview` / `client`: client-side staging of files with
//!   preview-handle lifecycle management, prompt state, and multipart
//!   submission to the relay endpoint
//! - `server` / `providers`: the relay endpoint that validates a `file` +
//!   `prompt` pair and forwards it to a hosted model capability as a single
//!   multimodal user message
//! - `config`, `error`, `cli`: configuration loading, error types, and the
//!   command-line surface
//!
//! # Example
//!
//! ```no_run
//! use promptdrop::session::{IncomingFile, UploadSession};
//!
//! let mut session = UploadSession::new();
//! session.add_files([IncomingFile {
//!     name: "photo.png".to_string(),
//!     mime_type: "image/png".to_string(),
//!     bytes: bytes::Bytes::from_static(&[0u8; 16]),
//! }]);
//! session.set_prompt("describe this image");
//! assert_eq!(session.files()[0].size_label(), "16 Bytes");
//! ```

pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod preview;
pub mod providers;
pub mod server;
pub mod session;

// Re-export commonly used types
pub use client::RelayClient;
pub use config::Config;
pub use error::{PromptdropError, Result};
pub use preview::{InMemoryPreviews, PreviewHandle, PreviewStore};
pub use providers::{FileAttachment, ModelProvider, ModelResult};
pub use server::{router, AppState};
pub use session::{format_size, IncomingFile, StagedFile, SubmitOutcome, UploadSession};
