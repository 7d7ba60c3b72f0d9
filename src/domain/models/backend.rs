#[cfg(test)]
#[path = "backend_test.rs"]
mod tests;

use std::path::Path;
use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;
use serde_derive::Deserialize;

pub struct ChatPrompt {
    pub seq: u64,
    pub session_id: String,
    pub text: String,
}

pub struct ChatReply {
    pub seq: u64,
    pub session_id: String,
    pub result: Result<String>,
}

pub struct UploadRequest {
    pub file: PathBuf,
    /// Omitted by the standalone uploader.
    pub session_id: Option<String>,
}

impl UploadRequest {
    /// Only PDFs are offered for upload, matched on the file extension.
    pub fn accepts(path: &Path) -> bool {
        return path
            .extension()
            .map(|ext| return ext.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);
    }
}

#[derive(Debug)]
pub struct UploadResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

impl UploadResponse {
    pub fn is_success(&self) -> bool {
        return (200..300).contains(&self.status);
    }

    /// The `error` field of a JSON error body, if the server sent one.
    pub fn error_text(&self) -> Option<String> {
        return serde_json::from_str::<ErrorBody>(&self.body)
            .ok()
            .and_then(|body| return body.error)
            .filter(|error| return !error.is_empty());
    }
}

pub struct UploadResult {
    pub session_id: Option<String>,
    pub result: Result<UploadResponse>,
}

#[async_trait]
pub trait Backend {
    /// Checks the liveness endpoint. Any non-200 response is an error.
    async fn health_check(&self) -> Result<()>;

    /// Sends one chat turn and returns the assistant's reply text.
    async fn chat(&self, prompt: &ChatPrompt) -> Result<String>;

    /// Posts a PDF to the upload endpoint. Errors are reserved for transport
    /// failures; HTTP error statuses are returned in the response.
    async fn upload(&self, request: &UploadRequest) -> Result<UploadResponse>;
}

pub type BackendBox = Box<dyn Backend + Send + Sync>;
