//! Send command handler
//!
//! Stages the listed files in an [`UploadSession`], sets the prompt, and
//! submits to the configured relay endpoint. Only the first staged file is
//! transmitted; the rest are staged for visibility only.

use std::path::PathBuf;

use crate::client::RelayClient;
use crate::config::Config;
use crate::error::{PromptdropError, Result};
use crate::session::{IncomingFile, SubmitOutcome, UploadSession};

/// Stages `files` with `prompt` and submits to the relay
///
/// # Errors
///
/// Returns error if a file cannot be read, the relay client cannot be
/// built, or the submission fails.
pub async fn run_send(config: Config, files: Vec<PathBuf>, prompt: String) -> Result<()> {
    let client = RelayClient::new(config.relay.endpoint.clone())?;

    let incoming = files
        .iter()
        .map(IncomingFile::from_path)
        .collect::<Result<Vec<_>>>()?;

    let mut session = UploadSession::new();
    session.add_files(incoming);
    session.set_prompt(prompt);

    for (index, staged) in session.files().iter().enumerate() {
        tracing::info!(
            "staged [{}] {} ({}, {})",
            index,
            staged.name,
            staged.display_type(),
            staged.size_label()
        );
    }
    if session.files().len() > 1 {
        tracing::warn!(
            "{} files staged; only the first is submitted",
            session.files().len()
        );
    }

    match session.submit(&client).await {
        SubmitOutcome::Completed(result) => {
            println!("{}", result.text);
            Ok(())
        }
        SubmitOutcome::Failed(message) => Err(PromptdropError::Upload(message).into()),
        SubmitOutcome::NothingStaged => {
            Err(PromptdropError::Upload("no files staged".to_string()).into())
        }
    }
}
