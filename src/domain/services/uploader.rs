#[cfg(test)]
#[path = "uploader_test.rs"]
mod tests;

use std::path::PathBuf;

use anyhow::bail;
use anyhow::Result;

use crate::domain::models::BackendBox;
use crate::domain::models::UploadRequest;

/// One-shot PDF uploader without a chat session. The server's reply is kept
/// verbatim as the result text.
#[derive(Default)]
pub struct Uploader {
    file: Option<PathBuf>,
    text: String,
}

impl Uploader {
    pub fn select_file(&mut self, file: PathBuf) -> Result<()> {
        if !UploadRequest::accepts(&file) {
            bail!("Only PDF files can be uploaded, {} is not a PDF.", file.display());
        }

        self.file = Some(file);
        return Ok(());
    }

    pub fn text(&self) -> &str {
        return &self.text;
    }

    pub async fn upload(&mut self, backend: &BackendBox) {
        let Some(file) = self.file.clone() else {
            tracing::warn!("No file selected for upload");
            return;
        };

        let request = UploadRequest {
            file,
            session_id: None,
        };

        match backend.upload(&request).await {
            Ok(res) if res.is_success() => {
                self.text = res.body;
            }
            Ok(res) => {
                tracing::error!(status = res.status, body = %res.body, "Upload was rejected");
            }
            Err(err) => {
                tracing::error!(error = ?err, "Upload failed");
            }
        }
    }
}
