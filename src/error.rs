use teloxide::{dispatching::dialogue::InMemStorageError, RequestError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("completion request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("completion service returned {status}: {message}")]
    Status {
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("completion service returned an empty reply")]
    EmptyResponse,
}

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("topic '{0}' not found")]
    TopicNotFound(String),

    #[error("quiz session data is missing")]
    MissingSession,

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("telegram request failed: {0}")]
    Telegram(#[from] RequestError),

    #[error("dialogue storage failed: {0}")]
    Storage(#[from] InMemStorageError),
}

impl QuizError {
    /// Text shown to the user for errors that have a dedicated message.
    pub(crate) fn user_message(&self) -> Option<&'static str> {
        match self {
            QuizError::TopicNotFound(_) => Some("❌ Error: topic not found."),
            QuizError::MissingSession => {
                Some("❌ Quiz data not found. Use /quiz to start over.")
            }
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} should be set")]
    Missing(&'static str),

    #[error("{var} can't be parsed: {reason}")]
    Invalid { var: &'static str, reason: String },
}
