use std::time::Duration;

/// Failure modes of a generation call.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("generation backend unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("generation timed out after {}s", .0.as_secs_f32())]
    Timeout(Duration),

    #[error("generated summary is empty")]
    EmptyResponse,

    #[error("generation failed: {0}")]
    GenerationFailed(String),

    #[error("malformed backend response: {0}")]
    ParseError(String),
}

/// Discriminant of [`GenerationError`], for callers that only need to branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ServiceUnavailable,
    Timeout,
    EmptyResponse,
    GenerationFailed,
    ParseError,
}

impl GenerationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GenerationError::ServiceUnavailable(_) => ErrorKind::ServiceUnavailable,
            GenerationError::Timeout(_) => ErrorKind::Timeout,
            GenerationError::EmptyResponse => ErrorKind::EmptyResponse,
            GenerationError::GenerationFailed(_) => ErrorKind::GenerationFailed,
            GenerationError::ParseError(_) => ErrorKind::ParseError,
        }
    }

    /// Whether a later attempt may succeed. Retrying is the caller's decision.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            GenerationError::ServiceUnavailable(_) | GenerationError::Timeout(_)
        )
    }
}

/// Errors returned by [`crate::summarizer::Summarizer`].
#[derive(Debug, thiserror::Error)]
pub enum SummarizeError {
    #[error("summary generation already in progress for repository {id}")]
    Conflict { id: i64 },

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

pub type Result<T> = std::result::Result<T, GenerationError>;
