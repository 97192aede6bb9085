//! Upload staging session for promptdrop
//!
//! This module holds the client-side state for one upload flow: the list of
//! staged files, their preview handles, and the prompt text. The session is
//! an explicit value object owned by whatever surface drives it (the `send`
//! command here); there is no free-floating global state.
//!
//! Preview handles are the one shared resource with lifecycle discipline:
//! every allocation in [`UploadSession::add_files`] is paired with a release
//! on every removal path (`remove_file`, `clear_all`, and session drop).

use bytes::Bytes;
use std::path::Path;

use crate::client::RelayClient;
use crate::error::{PromptdropError, Result};
use crate::preview::{InMemoryPreviews, PreviewHandle, PreviewStore};
use crate::providers::ModelResult;

/// Size units for [`format_size`], base 1024
const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// A raw file handed to the session for staging
#[derive(Debug, Clone)]
pub struct IncomingFile {
    /// Display name
    pub name: String,
    /// Declared content type (may be empty)
    pub mime_type: String,
    /// Full file content
    pub bytes: Bytes,
}

impl IncomingFile {
    /// Reads a local file into an incoming handle, guessing its mime type
    /// from the extension
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| PromptdropError::Upload(format!("Failed to read {}: {}", path.display(), e)))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        let mime_type = mime_guess::from_path(path)
            .first()
            .map(|m| m.to_string())
            .unwrap_or_default();

        Ok(Self {
            name,
            mime_type,
            bytes: Bytes::from(bytes),
        })
    }
}

/// One file staged for upload
///
/// Created when a file is added, destroyed (with its preview released) when
/// removed or the list is cleared; never mutated in place.
#[derive(Debug)]
pub struct StagedFile {
    /// Display name
    pub name: String,
    /// Declared content type (may be empty)
    pub mime_type: String,
    /// Byte length of the content
    pub size_bytes: u64,
    /// Full file content
    pub bytes: Bytes,
    /// Preview handle, present only for `image/*` files
    pub preview: Option<PreviewHandle>,
}

impl StagedFile {
    /// Content type for display, with empty types shown as "unknown"
    pub fn display_type(&self) -> &str {
        if self.mime_type.is_empty() {
            "unknown"
        } else {
            &self.mime_type
        }
    }

    /// Human-readable size label
    pub fn size_label(&self) -> String {
        format_size(self.size_bytes)
    }
}

/// Outcome of one submission attempt
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Nothing staged; no transport call was made
    NothingStaged,
    /// The relay round trip completed with a model result
    Completed(ModelResult),
    /// The transport or relay reported a failure (already logged)
    Failed(String),
}

/// Client-side staging state for one upload flow
///
/// Files are appended in call order and only the FIRST staged file is
/// submitted; staged files and the prompt are deliberately not cleared
/// after a successful submission, so the user can resubmit.
pub struct UploadSession {
    files: Vec<StagedFile>,
    prompt: String,
    previews: Box<dyn PreviewStore>,
}

impl UploadSession {
    /// Creates an empty session with the in-memory preview store
    pub fn new() -> Self {
        Self::with_store(Box::new(InMemoryPreviews::new()))
    }

    /// Creates an empty session over a caller-supplied preview store
    pub fn with_store(previews: Box<dyn PreviewStore>) -> Self {
        Self {
            files: Vec::new(),
            prompt: String::new(),
            previews,
        }
    }

    /// Currently staged files, in insertion order
    pub fn files(&self) -> &[StagedFile] {
        &self.files
    }

    /// Current prompt text
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// The preview store backing this session
    pub fn previews(&self) -> &dyn PreviewStore {
        &*self.previews
    }

    /// Stages incoming files, preserving prior entries and call order
    ///
    /// Files whose mime type starts with `image/` get a preview handle
    /// allocated from the session's preview store.
    pub fn add_files(&mut self, incoming: impl IntoIterator<Item = IncomingFile>) {
        for file in incoming {
            let preview = if file.mime_type.starts_with("image/") {
                Some(self.previews.acquire(&file.bytes, &file.mime_type))
            } else {
                None
            };

            tracing::debug!(
                "staged {} ({}, {} bytes, preview={})",
                file.name,
                if file.mime_type.is_empty() { "unknown" } else { &file.mime_type },
                file.bytes.len(),
                preview.is_some()
            );

            self.files.push(StagedFile {
                name: file.name,
                mime_type: file.mime_type,
                size_bytes: file.bytes.len() as u64,
                bytes: file.bytes,
                preview,
            });
        }
    }

    /// Removes the staged file at `index`, releasing its preview first
    ///
    /// An out-of-range index is a safe no-op: it is logged and the list is
    /// left unchanged, so a stale index can never panic the caller.
    pub fn remove_file(&mut self, index: usize) {
        if index >= self.files.len() {
            tracing::warn!(
                "remove_file index {} out of range (len {})",
                index,
                self.files.len()
            );
            return;
        }

        let file = self.files.remove(index);
        if let Some(handle) = &file.preview {
            self.previews.release(handle);
        }
    }

    /// Releases every preview and empties the staged list
    pub fn clear_all(&mut self) {
        for file in self.files.drain(..) {
            if let Some(handle) = &file.preview {
                self.previews.release(handle);
            }
        }
    }

    /// Replaces the prompt text; no validation at this layer
    pub fn set_prompt(&mut self, text: impl Into<String>) {
        self.prompt = text.into();
    }

    /// Submits the first staged file plus the prompt to the relay
    ///
    /// With an empty staged list no transport call is made. The payload is
    /// captured by value before the call, so staging edits made while the
    /// request is in flight do not affect it. Transport and relay failures
    /// are logged and returned as [`SubmitOutcome::Failed`], never panics.
    pub async fn submit(&self, client: &RelayClient) -> SubmitOutcome {
        let Some(first) = self.files.first() else {
            tracing::warn!("submit called with no staged files");
            return SubmitOutcome::NothingStaged;
        };

        let request = UploadRequest {
            prompt: self.prompt.clone(),
            file_name: first.name.clone(),
            file_mime_type: first.mime_type.clone(),
            file_bytes: first.bytes.clone(),
        };

        tracing::info!(
            "submitting {} ({}) with {} char prompt",
            request.file_name,
            format_size(request.file_bytes.len() as u64),
            request.prompt.len()
        );

        match client.upload(request).await {
            Ok(result) => SubmitOutcome::Completed(result),
            Err(e) => {
                tracing::error!("submission failed: {:#}", e);
                SubmitOutcome::Failed(e.to_string())
            }
        }
    }
}

impl Default for UploadSession {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for UploadSession {
    fn drop(&mut self) {
        // Previews outlive the entries only if never released; make teardown
        // a removal path too.
        self.clear_all();
    }
}

/// The transport payload for one submission
///
/// Constructed at submission time from the first staged file, consumed once
/// by the relay endpoint, not persisted.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Free-text prompt
    pub prompt: String,
    /// Display name of the submitted file
    pub file_name: String,
    /// Declared content type of the submitted file
    pub file_mime_type: String,
    /// Binary content of the submitted file
    pub file_bytes: Bytes,
}

/// Formats a byte count with base-1024 units
///
/// Zero bytes formats as `"0 Bytes"`; otherwise the unit is picked
/// logarithmically and the value rounded to two decimal places, with
/// trailing zeros dropped (`1536` -> `"1.5 KB"`).
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let exponent = ((bytes as f64).ln() / 1024_f64.ln()).floor() as usize;
    let exponent = exponent.min(SIZE_UNITS.len() - 1);
    let value = bytes as f64 / 1024_f64.powi(exponent as i32);
    let rounded = (value * 100.0).round() / 100.0;

    format!("{} {}", rounded, SIZE_UNITS[exponent])
}
