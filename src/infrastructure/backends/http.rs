#[cfg(test)]
#[path = "http_test.rs"]
mod tests;

use std::time::Duration;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::multipart;
use serde_derive::Deserialize;
use serde_derive::Serialize;
use tokio::fs;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Backend;
use crate::domain::models::ChatPrompt;
use crate::domain::models::UploadRequest;
use crate::domain::models::UploadResponse;

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ChatRequest {
    message: String,
    session_id: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ChatResponse {
    response: String,
}

pub struct HttpBackend {
    url: String,
    timeout: String,
}

impl Default for HttpBackend {
    fn default() -> HttpBackend {
        return HttpBackend::new(
            Config::get(ConfigKey::Url),
            Config::get(ConfigKey::HealthCheckTimeout),
        );
    }
}

impl HttpBackend {
    pub fn new(url: String, timeout: String) -> HttpBackend {
        return HttpBackend { url, timeout };
    }

    fn endpoint(&self, path: &str) -> String {
        return format!("{url}{path}", url = self.url.trim_end_matches('/'));
    }
}

#[async_trait]
impl Backend for HttpBackend {
    #[allow(clippy::implicit_return)]
    async fn health_check(&self) -> Result<()> {
        if self.url.is_empty() {
            bail!("Backend URL is not defined");
        }

        let res = reqwest::Client::new()
            .get(self.endpoint("/ping"))
            .header("Content-Type", "application/json")
            .timeout(Duration::from_millis(self.timeout.parse::<u64>()?))
            .send()
            .await;

        let res = match res {
            Ok(res) => res,
            Err(err) => {
                tracing::error!(error = ?err, "Backend is not reachable");
                bail!("Backend is not reachable");
            }
        };

        let status = res.status().as_u16();
        if status != 200 {
            tracing::error!(status = status, "Backend health check failed");
            bail!("Backend health check failed with status {status}");
        }

        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn chat(&self, prompt: &ChatPrompt) -> Result<String> {
        let req = ChatRequest {
            message: prompt.text.to_string(),
            session_id: prompt.session_id.to_string(),
        };

        let res = reqwest::Client::new()
            .post(self.endpoint("/chatapi/"))
            .json(&req)
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::error!(
                status = res.status().as_u16(),
                seq = prompt.seq,
                "Failed to make chat request"
            );
            bail!("Failed to make chat request");
        }

        let body = res.json::<ChatResponse>().await?;
        tracing::debug!(seq = prompt.seq, body = ?body, "Chat response");

        return Ok(body.response);
    }

    #[allow(clippy::implicit_return)]
    async fn upload(&self, request: &UploadRequest) -> Result<UploadResponse> {
        let bytes = fs::read(&request.file).await?;
        let file_name = request
            .file
            .file_name()
            .map(|name| return name.to_string_lossy().to_string())
            .unwrap_or_else(|| return "upload.pdf".to_string());

        let part = multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("application/pdf")?;

        let mut form = multipart::Form::new().part("file", part);
        if let Some(session_id) = &request.session_id {
            form = form.text("session_id", session_id.to_string());
        }

        let res = reqwest::Client::new()
            .post(self.endpoint("/upload/"))
            .multipart(form)
            .send()
            .await?;

        let status = res.status().as_u16();
        let body = res.text().await?;
        if !(200..300).contains(&status) {
            tracing::error!(status = status, body = %body, "Upload was rejected");
        }

        return Ok(UploadResponse { status, body });
    }
}
