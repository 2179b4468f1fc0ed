//! Text generation seam
//!
//! The bridge talks to the outside world through [`Generator`]. Production
//! uses [`crate::GeminiClient`]; without credentials the server wires
//! [`UnconfiguredGenerator`].

use crate::error::AssistError;
use async_trait::async_trait;

/// One prompt in, one text response out
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Generator: Send + Sync {
    /// Send a single prompt and return the raw text response
    async fn generate_text(&self, prompt: &str) -> Result<String, AssistError>;
}

/// Generator used when no API credential is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredGenerator;

#[async_trait]
impl Generator for UnconfiguredGenerator {
    async fn generate_text(&self, _prompt: &str) -> Result<String, AssistError> {
        tracing::warn!("generation requested but no API key is configured");
        Err(AssistError::NotConfigured)
    }
}
