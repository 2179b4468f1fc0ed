//! AI Assist Bridge
//!
//! Turns (original text, target rendition) into one generation call. The
//! result is returned verbatim and never persisted here.

use crate::error::AssistError;
use crate::generator::Generator;
use crate::prompt::build_prompt;
use huayang_core::AssistTarget;
use std::sync::Arc;

/// Drafts annotations and translations from original text
#[derive(Clone)]
pub struct AssistBridge {
    generator: Arc<dyn Generator>,
}

impl std::fmt::Debug for AssistBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssistBridge").finish_non_exhaustive()
    }
}

impl AssistBridge {
    /// Bridge over a generator
    #[inline]
    #[must_use]
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self { generator }
    }

    /// Draft `target` from `original`
    ///
    /// Empty input returns `""` without calling the generator. No retry.
    ///
    /// # Errors
    /// Any generator failure, or `AssistError::EmptyResponse` when the
    /// service returns no text.
    pub async fn generate(&self, original: &str, target: AssistTarget) -> Result<String, AssistError> {
        if original.is_empty() {
            return Ok(String::new());
        }

        let prompt = build_prompt(original, target);
        let text = self.generator.generate_text(&prompt).await.map_err(|e| {
            tracing::error!(error = %e, ?target, "generation failed");
            e
        })?;

        if text.trim().is_empty() {
            tracing::error!(?target, "generation returned no text");
            return Err(AssistError::EmptyResponse);
        }
        tracing::info!(?target, chars = text.chars().count(), "draft generated");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::MockGenerator;
    use mockall::predicate::function;

    #[tokio::test]
    async fn empty_original_skips_the_call() {
        let mut mock = MockGenerator::new();
        mock.expect_generate_text().times(0);
        let bridge = AssistBridge::new(Arc::new(mock));

        let out = bridge.generate("", AssistTarget::Annotation).await.unwrap();
        assert_eq!(out, "");
    }

    #[tokio::test]
    async fn returns_response_verbatim() {
        let mut mock = MockGenerator::new();
        mock.expect_generate_text()
            .with(function(|p: &str| p.contains("翻译成现代白话文") && p.ends_with("<p>秦灭蜀</p>")))
            .times(1)
            .returning(|_| Ok("  <p>秦国灭了蜀国</p>\n".to_string()));
        let bridge = AssistBridge::new(Arc::new(mock));

        let out = bridge
            .generate("<p>秦灭蜀</p>", AssistTarget::Translation)
            .await
            .unwrap();
        assert_eq!(out, "  <p>秦国灭了蜀国</p>\n");
    }

    #[tokio::test]
    async fn service_errors_propagate_without_retry() {
        let mut mock = MockGenerator::new();
        mock.expect_generate_text()
            .times(1)
            .returning(|_| Err(AssistError::Transport("connection reset".into())));
        let bridge = AssistBridge::new(Arc::new(mock));

        let err = bridge.generate("x", AssistTarget::Annotation).await.unwrap_err();
        assert!(matches!(err, AssistError::Transport(_)));
    }

    #[tokio::test]
    async fn blank_response_is_an_error() {
        let mut mock = MockGenerator::new();
        mock.expect_generate_text()
            .returning(|_| Ok("   ".to_string()));
        let bridge = AssistBridge::new(Arc::new(mock));

        let err = bridge.generate("x", AssistTarget::Annotation).await.unwrap_err();
        assert!(matches!(err, AssistError::EmptyResponse));
    }
}
