use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("attempt timed out after {0:?}")]
    Timeout(Duration),
    #[error("transport failure: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("endpoint answered HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("gave up after {attempts} attempts: {last}")]
    Exhausted {
        attempts: u32,
        #[source]
        last: Box<InferenceError>,
    },
    #[error("request deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),
}

impl InferenceError {
    /// Failures before a usable body arrived. Malformed bodies are final.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            InferenceError::Timeout(_) | InferenceError::Transport(_) | InferenceError::Status { .. }
        )
    }
}
