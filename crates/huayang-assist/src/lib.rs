//! Huayang Assist - AI drafts for annotations and translations
//!
//! Given a volume's original text and a target rendition, builds one of two
//! fixed prompts, sends a single generation request and returns the text.
//! Drafts are never saved here; the admin dashboard puts them in the editor
//! buffer and the editor decides whether to save.
//!
//! # Example
//!
//! ```rust,ignore
//! use huayang_assist::{AssistBridge, GeminiClient, GeminiConfig};
//! use huayang_core::AssistTarget;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GeminiClient::new(&GeminiConfig::new().with_api_key("..."))?;
//! let bridge = AssistBridge::new(Arc::new(client));
//! let html = bridge.generate("<p>华阳县，古蜀国地。</p>", AssistTarget::Annotation).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod bridge;
pub mod error;
pub mod gemini;
pub mod generator;
pub mod prompt;

pub use bridge::AssistBridge;
pub use error::{AssistError, ASSIST_UNAVAILABLE};
pub use gemini::{GeminiClient, GeminiConfig, DEFAULT_MODEL};
pub use generator::{Generator, UnconfiguredGenerator};
pub use prompt::build_prompt;

use std::sync::Arc;

/// Bridge for a configuration: Gemini when a key is set, otherwise a
/// generator that always fails
pub fn bridge_from_config(config: &GeminiConfig) -> Result<AssistBridge, AssistError> {
    let generator: Arc<dyn Generator> = match GeminiClient::new(config) {
        Ok(client) => {
            tracing::info!(model = client.model(), "AI assist enabled");
            Arc::new(client)
        }
        Err(AssistError::NotConfigured) => {
            tracing::warn!("no Gemini API key configured, AI assist disabled");
            Arc::new(UnconfiguredGenerator)
        }
        Err(e) => return Err(e),
    };
    Ok(AssistBridge::new(generator))
}
