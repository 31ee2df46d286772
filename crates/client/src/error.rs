use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("csv export failed: {0}")]
    Export(#[from] csv::Error),
    #[error("not signed in")]
    SignedOut,
}

impl Error {
    /// Text to show the user: validation messages and server `detail`s are
    /// shown as-is, everything else falls back to `fallback`.
    pub fn message_or(&self, fallback: &str) -> String {
        match self {
            Self::Api(err) => err.message_or(fallback),
            Self::Validation(err) => err.message.clone(),
            Self::Config(_) | Self::Storage(_) | Self::Export(_) | Self::SignedOut => {
                fallback.to_string()
            }
        }
    }

    /// A 401 from the server or an operation that needs a session.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::SignedOut) || matches!(self, Self::Api(err) if err.is_unauthorized())
    }
}

/// Failure of a single call through the gateway.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No usable response: connection error, timeout or undecodable body.
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unauthorized: {}", detail.as_deref().unwrap_or("session expired"))]
    Unauthorized { detail: Option<String> },
    #[error("request rejected ({status}): {}", detail.as_deref().unwrap_or("no detail"))]
    Rejected {
        status: StatusCode,
        detail: Option<String>,
    },
    #[error("server error ({status}): {}", detail.as_deref().unwrap_or("no detail"))]
    Server {
        status: StatusCode,
        detail: Option<String>,
    },
}

impl ApiError {
    pub fn from_status(status: StatusCode, detail: Option<String>) -> Self {
        if status == StatusCode::UNAUTHORIZED {
            Self::Unauthorized { detail }
        } else if status.is_server_error() {
            Self::Server { status, detail }
        } else {
            Self::Rejected { status, detail }
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Transport(err) => err.status(),
            Self::Unauthorized { .. } => Some(StatusCode::UNAUTHORIZED),
            Self::Rejected { status, .. } | Self::Server { status, .. } => Some(*status),
        }
    }

    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Transport(_) => None,
            Self::Unauthorized { detail }
            | Self::Rejected { detail, .. }
            | Self::Server { detail, .. } => detail
                .as_deref()
                .filter(|detail| !detail.trim().is_empty()),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Transport failures and 5xx may succeed on a second attempt; 4xx won't.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Server { .. })
    }

    pub fn message_or(&self, fallback: &str) -> String {
        self.detail()
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string())
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A client-side shape or range check failed; nothing was sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_401_maps_to_unauthorized() {
        let err = ApiError::from_status(StatusCode::UNAUTHORIZED, None);
        assert!(err.is_unauthorized());
        assert!(!err.is_retryable());
    }

    #[test]
    fn status_5xx_is_retryable_and_4xx_is_not() {
        assert!(ApiError::from_status(StatusCode::BAD_GATEWAY, None).is_retryable());
        assert!(!ApiError::from_status(StatusCode::CONFLICT, None).is_retryable());
        assert!(!ApiError::from_status(StatusCode::UNPROCESSABLE_ENTITY, None).is_retryable());
    }

    #[test]
    fn message_prefers_detail_over_fallback() {
        let err = ApiError::from_status(
            StatusCode::CONFLICT,
            Some("Category already exists".to_string()),
        );
        assert_eq!(err.message_or("Could not create category."), "Category already exists");
    }

    #[test]
    fn blank_detail_falls_back() {
        let err = ApiError::from_status(StatusCode::BAD_REQUEST, Some("   ".to_string()));
        assert_eq!(err.message_or("Could not create category."), "Could not create category.");
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, None);
        assert_eq!(err.message_or("fallback"), "fallback");
    }

    #[test]
    fn detail_is_shown_as_sent() {
        let err = ApiError::from_status(StatusCode::CONFLICT, Some(" In use \n".to_string()));
        assert_eq!(err.message_or("fallback"), " In use \n");
    }

    #[test]
    fn validation_message_is_shown_verbatim() {
        let err = Error::from(ValidationError::new("amount", "Amount must be greater than 0."));
        assert_eq!(err.message_or("fallback"), "Amount must be greater than 0.");
    }
}
