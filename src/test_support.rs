//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Arc;

use async_trait::async_trait;

use crate::api::{ApiError, Attachment, Backend, ChatResponse, ExtractResponse};

/// A no-op backend for tests that don't need real HTTP calls.
pub struct NoopBackend;

#[async_trait]
impl Backend for NoopBackend {
    async fn extract(
        &self,
        _text: Option<String>,
        _file: Option<Attachment>,
    ) -> Result<ExtractResponse, ApiError> {
        Ok(ExtractResponse::default())
    }

    async fn ask(&self, _question: &str) -> Result<ChatResponse, ApiError> {
        Ok(ChatResponse::default())
    }
}

/// Creates a test App with a NoopBackend.
pub fn test_app() -> crate::core::state::App {
    crate::core::state::App::new(Arc::new(NoopBackend), "http://test.invalid".to_string())
}

/// A small plain-text attachment for draft tests.
pub fn test_attachment() -> Attachment {
    Attachment {
        name: "agenda.txt".to_string(),
        mime: "text/plain",
        bytes: b"1. roadmap\n2. deadlines".to_vec(),
    }
}
