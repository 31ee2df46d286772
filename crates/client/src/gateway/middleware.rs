use reqwest::RequestBuilder;

use crate::{error::ApiError, session::Session, storage::AuthStorage};

/// Hook run by the [`Gateway`](super::Gateway) around every call.
///
/// Hooks run in registration order: `on_request` right before the request
/// is sent, `on_error` before a failure is handed back to the caller.
pub trait Middleware: Send + Sync {
    fn on_request(&self, request: RequestBuilder) -> RequestBuilder {
        request
    }

    fn on_error(&self, _error: &ApiError) {}
}

/// Attaches the stored access token, read from the durable record on every
/// request. Without a token the request goes out unauthenticated.
pub struct BearerAuth {
    storage: AuthStorage,
}

impl BearerAuth {
    pub fn new(storage: AuthStorage) -> Self {
        Self { storage }
    }
}

impl Middleware for BearerAuth {
    fn on_request(&self, request: RequestBuilder) -> RequestBuilder {
        match self.storage.access_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

/// Drops the session on any 401, before the caller sees the error.
pub struct SessionGuard {
    session: Session,
}

impl SessionGuard {
    pub fn new(session: Session) -> Self {
        Self { session }
    }
}

impl Middleware for SessionGuard {
    fn on_error(&self, error: &ApiError) {
        if !error.is_unauthorized() {
            return;
        }

        tracing::warn!("request rejected with 401, logging out");
        if let Err(err) = self.session.storage().clear() {
            tracing::warn!("failed to clear auth record: {err}");
        }
        self.session.logout();
    }
}
