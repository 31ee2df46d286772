use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("{message}")]
    Client {
        message: String,
        #[source]
        source: pftracker_client::Error,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("terminal error: {0}")]
    Terminal(String),
    #[error("{0}")]
    Input(String),
    #[error("not signed in, run `pftracker login` first")]
    SignedOut,
}

impl AppError {
    /// Wraps a client failure, shown as the server detail or `fallback`.
    pub fn client(source: pftracker_client::Error, fallback: &str) -> Self {
        Self::Client {
            message: source.message_or(fallback),
            source,
        }
    }

    /// 3 when a session is missing or was rejected, 2 for bad input or
    /// configuration, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::SignedOut => 3,
            Self::Client { source, .. } if source.is_unauthorized() => 3,
            Self::Config(_) | Self::Input(_) => 2,
            Self::Client {
                source: pftracker_client::Error::Config(_),
                ..
            } => 2,
            _ => 1,
        }
    }
}

impl From<pftracker_client::Error> for AppError {
    fn from(source: pftracker_client::Error) -> Self {
        let message = source.to_string();
        Self::Client { message, source }
    }
}

#[cfg(test)]
mod tests {
    use pftracker_client::error::ValidationError;

    use super::*;

    #[test]
    fn client_errors_prefer_fallback_text() {
        let err = AppError::client(pftracker_client::Error::SignedOut, "Could not load.");
        assert_eq!(err.to_string(), "Could not load.");
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn validation_failures_keep_their_message() {
        let source = pftracker_client::Error::from(ValidationError::new(
            "amount",
            "Amount must be greater than 0.",
        ));
        let err = AppError::client(source, "Could not create transaction.");
        assert_eq!(err.to_string(), "Amount must be greater than 0.");
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn missing_base_url_is_a_usage_error() {
        let err = AppError::from(pftracker_client::Error::Config("base url is not configured".into()));
        assert_eq!(err.exit_code(), 2);
    }
}
