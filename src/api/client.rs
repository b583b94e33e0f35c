//! HTTP transport to the meeting-assistant backend.
//!
//! Two stateless endpoints: `POST /extract/` (multipart notes upload) and
//! `POST /chat/` (JSON question). The [`Backend`] trait is the seam the
//! reducer's effects are executed against, so tests can substitute a fake
//! without a network.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::multipart;

use super::types::{Attachment, ChatRequest, ChatResponse, ExtractResponse};

/// Errors that can occur talking to the backend.
#[derive(Debug)]
pub enum ApiError {
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// The backend answered with a non-2xx status.
    Api { status: u16, message: String },
    /// The body was not the JSON shape we expect.
    Parse(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "network error: {msg}"),
            ApiError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ApiError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

#[async_trait]
pub trait Backend: Send + Sync {
    /// Upload notes text and/or a file for task extraction.
    /// At least one of the two is expected to be present; the caller
    /// enforces that before dispatching.
    async fn extract(
        &self,
        text: Option<String>,
        file: Option<Attachment>,
    ) -> Result<ExtractResponse, ApiError>;

    /// Ask a free-text question about previously extracted notes.
    async fn ask(&self, question: &str) -> Result<ChatResponse, ApiError>;
}

/// Production backend over reqwest.
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: String, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            // Builder only fails on TLS backend misconfiguration; with default
            // features this constructor is infallible in practice.
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        warn!("Backend error: HTTP {status} - {body}");
        Err(ApiError::Api {
            status,
            message: body,
        })
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn extract(
        &self,
        text: Option<String>,
        file: Option<Attachment>,
    ) -> Result<ExtractResponse, ApiError> {
        info!(
            "Extract request: text={} bytes, file={:?}",
            text.as_deref().map_or(0, str::len),
            file.as_ref().map(|f| &f.name)
        );

        let mut form = multipart::Form::new();
        if let Some(text) = text {
            form = form.text("text", text);
        }
        if let Some(file) = file {
            let part = multipart::Part::bytes(file.bytes)
                .file_name(file.name)
                .mime_str(file.mime)
                .map_err(|e| ApiError::Parse(e.to_string()))?;
            form = form.part("file", part);
        }

        let response = self
            .client
            .post(format!("{}/extract/", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        debug!("Extract response status: {}", response.status());
        let response = Self::check_status(response).await?;

        response
            .json::<ExtractResponse>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn ask(&self, question: &str) -> Result<ChatResponse, ApiError> {
        info!("Chat request: {} chars", question.len());

        let body = ChatRequest {
            question: question.to_string(),
        };

        let response = self
            .client
            .post(format!("{}/chat/", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        debug!("Chat response status: {}", response.status());
        let response = Self::check_status(response).await?;

        response
            .json::<ChatResponse>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }
}
