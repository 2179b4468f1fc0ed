//! Error types for the assist bridge

/// Message shown to editors for every generation failure
pub const ASSIST_UNAVAILABLE: &str = "AI 助手暂时无法响应，请稍后再试。";

/// Generation failures
#[derive(Debug, thiserror::Error)]
pub enum AssistError {
    /// No API credential configured
    #[error("generation service not configured")]
    NotConfigured,

    /// Request could not be sent or the connection failed
    #[error("transport error: {0}")]
    Transport(String),

    /// Service answered with an error status
    #[error("service error {status}: {message}")]
    Service {
        /// HTTP status code
        status: u16,
        /// Service-provided message
        message: String,
    },

    /// Response body could not be decoded
    #[error("invalid response: {0}")]
    Decode(String),

    /// Service answered without any text
    #[error("empty response")]
    EmptyResponse,
}

impl AssistError {
    /// The fixed user-facing message
    #[inline]
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        ASSIST_UNAVAILABLE
    }
}

impl From<reqwest::Error> for AssistError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_error_maps_to_the_same_user_message() {
        let errors = [
            AssistError::NotConfigured,
            AssistError::Transport("refused".into()),
            AssistError::Service {
                status: 503,
                message: "overloaded".into(),
            },
            AssistError::Decode("eof".into()),
            AssistError::EmptyResponse,
        ];
        for err in errors {
            assert_eq!(err.user_message(), ASSIST_UNAVAILABLE);
        }
    }

    #[test]
    fn service_error_display() {
        let err = AssistError::Service {
            status: 429,
            message: "quota".into(),
        };
        assert_eq!(err.to_string(), "service error 429: quota");
    }
}
