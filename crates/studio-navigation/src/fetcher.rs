use async_trait::async_trait;

use crate::project::ActiveProject;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    Transport,
    Unauthorized,
    Timeout,
    Decode,
    Http,
}

impl FetchErrorKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::Unauthorized => "unauthorized",
            Self::Timeout => "timeout",
            Self::Decode => "decode",
            Self::Http => "http",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("project request failed: {message}")]
    Transport { message: String },
    #[error("project request was not authorized (status {status})")]
    Unauthorized { status: u16 },
    #[error("project request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
    #[error("failed to decode project response: {message}")]
    Decode { message: String },
    #[error("project request returned status {status}")]
    Http { status: u16 },
}

impl FetchError {
    #[must_use]
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            Self::Transport { .. } => FetchErrorKind::Transport,
            Self::Unauthorized { .. } => FetchErrorKind::Unauthorized,
            Self::Timeout { .. } => FetchErrorKind::Timeout,
            Self::Decode { .. } => FetchErrorKind::Decode,
            Self::Http { .. } => FetchErrorKind::Http,
        }
    }

    /// Whether re-navigating to the same project could plausibly succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { .. } | Self::Timeout { .. } => true,
            Self::Http { status } => *status >= 500,
            Self::Unauthorized { .. } | Self::Decode { .. } => false,
        }
    }
}

/// Loads a project record by id from the backend.
///
/// `Ok(None)` means the project does not exist; errors are reserved for
/// transport, auth, and decode failures. Implementations own their timeouts.
#[async_trait(?Send)]
pub trait ProjectFetcher {
    async fn fetch_project(&self, project_id: &str) -> Result<Option<ActiveProject>, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryability_follows_kind() {
        assert!(FetchError::Transport {
            message: "offline".to_string()
        }
        .is_retryable());
        assert!(FetchError::Timeout { timeout_ms: 10_000 }.is_retryable());
        assert!(FetchError::Http { status: 503 }.is_retryable());
        assert!(!FetchError::Http { status: 422 }.is_retryable());
        assert!(!FetchError::Unauthorized { status: 401 }.is_retryable());
        assert_eq!(
            FetchError::Decode {
                message: "eof".to_string()
            }
            .kind()
            .as_str(),
            "decode"
        );
    }
}
