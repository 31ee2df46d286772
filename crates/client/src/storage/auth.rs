use std::{io::ErrorKind, sync::Arc};

use api_types::auth::{AuthTokens, User};
use serde::{Deserialize, Serialize};

use super::{AUTH_STORAGE_KEY, KeyValueStore};
use crate::error::StorageError;

/// The durable auth record: user and tokens always travel together.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredAuthState {
    pub user: User,
    pub tokens: AuthTokens,
}

impl StoredAuthState {
    /// Both tokens must be non-empty and the user must carry an id.
    fn is_complete(&self) -> bool {
        !self.tokens.access_token.is_empty()
            && !self.tokens.refresh_token.is_empty()
            && self.user.id != 0
    }
}

/// Persisted session store.
///
/// Reads fail closed: anything that is not a complete record is reported as
/// absent, and a malformed record is erased on the spot.
#[derive(Clone)]
pub struct AuthStorage {
    store: Arc<dyn KeyValueStore>,
}

impl AuthStorage {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn load(&self) -> Option<StoredAuthState> {
        let raw = match self.store.get(AUTH_STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(StorageError::Io(err)) if err.kind() == ErrorKind::InvalidData => {
                tracing::warn!("auth record is not valid text, discarding: {err}");
                self.erase();
                return None;
            }
            Err(err) => {
                tracing::warn!("auth record unreadable, treating as absent: {err}");
                return None;
            }
        };

        match serde_json::from_str::<StoredAuthState>(&raw) {
            Ok(state) if state.is_complete() => Some(state),
            Ok(_) => {
                tracing::warn!("auth record incomplete, discarding");
                self.erase();
                None
            }
            Err(err) => {
                tracing::warn!("auth record malformed, discarding: {err}");
                self.erase();
                None
            }
        }
    }

    pub fn save(&self, state: &StoredAuthState) -> Result<(), StorageError> {
        let payload = serde_json::to_string(state)?;
        self.store.set(AUTH_STORAGE_KEY, &payload)
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(AUTH_STORAGE_KEY)
    }

    pub fn access_token(&self) -> Option<String> {
        self.load().map(|state| state.tokens.access_token)
    }

    fn erase(&self) {
        if let Err(err) = self.clear() {
            tracing::warn!("failed to erase auth record: {err}");
        }
    }
}
