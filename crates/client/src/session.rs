//! Session state container.
//!
//! [`Session`] mirrors the persisted auth record in memory and publishes
//! every change as an immutable [`SessionState`] snapshot. Only
//! [`Session::set_auth`], [`Session::set_tokens`] and [`Session::logout`]
//! change it, and each of them writes the durable record before the new
//! snapshot becomes visible.

use std::sync::{Arc, Mutex, PoisonError};

use api_types::auth::{AuthTokens, User};
use tokio::sync::watch;

use crate::{
    error::StorageError,
    storage::{AuthStorage, StoredAuthState},
};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    pub user: Option<User>,
    pub tokens: Option<AuthTokens>,
    /// True iff an access token is held.
    pub is_authenticated: bool,
}

impl SessionState {
    fn new(user: Option<User>, tokens: Option<AuthTokens>) -> Self {
        let is_authenticated = tokens
            .as_ref()
            .is_some_and(|tokens| !tokens.access_token.is_empty());
        Self {
            user,
            tokens,
            is_authenticated,
        }
    }
}

#[derive(Clone)]
pub struct Session {
    inner: Arc<Inner>,
}

struct Inner {
    storage: AuthStorage,
    state: watch::Sender<SessionState>,
    // Serializes "persist, then publish" sequences.
    write: Mutex<()>,
}

impl Session {
    /// Seeds the in-memory state from the persisted record, read once.
    pub fn restore(storage: AuthStorage) -> Self {
        let initial = match storage.load() {
            Some(StoredAuthState { user, tokens }) => SessionState::new(Some(user), Some(tokens)),
            None => SessionState::default(),
        };
        tracing::debug!(authenticated = initial.is_authenticated, "session restored");

        let (state, _) = watch::channel(initial);
        Self {
            inner: Arc::new(Inner {
                storage,
                state,
                write: Mutex::new(()),
            }),
        }
    }

    pub fn storage(&self) -> &AuthStorage {
        &self.inner.storage
    }

    pub fn snapshot(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    /// Observers receive a new snapshot after every transition.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated
    }

    pub fn user(&self) -> Option<User> {
        self.inner.state.borrow().user.clone()
    }

    /// Stores a fresh login (login, registration or demo).
    pub fn set_auth(&self, user: User, tokens: AuthTokens) -> Result<(), StorageError> {
        let _guard = self.lock();

        let record = StoredAuthState { user, tokens };
        self.inner.storage.save(&record)?;

        tracing::info!(user_id = record.user.id, "session established");
        self.inner
            .state
            .send_replace(SessionState::new(Some(record.user), Some(record.tokens)));
        Ok(())
    }

    /// Replaces the tokens of the current user. Tokens without a user are not
    /// trusted: the session is dropped instead.
    pub fn set_tokens(&self, tokens: AuthTokens) -> Result<(), StorageError> {
        let _guard = self.lock();

        let current = self.inner.state.borrow().user.clone();
        let Some(user) = current else {
            tracing::warn!("tokens received without a user, dropping session");
            self.reset();
            return Ok(());
        };

        let record = StoredAuthState { user, tokens };
        self.inner.storage.save(&record)?;

        self.inner.state.send_modify(|state| {
            state.is_authenticated = !record.tokens.access_token.is_empty();
            state.tokens = Some(record.tokens);
        });
        tracing::debug!("session tokens rotated");
        Ok(())
    }

    pub fn logout(&self) {
        let _guard = self.lock();
        self.reset();
        tracing::info!("session closed");
    }

    fn reset(&self) {
        if let Err(err) = self.inner.storage.clear() {
            tracing::warn!("failed to clear auth record: {err}");
        }
        self.inner.state.send_replace(SessionState::default());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ()> {
        self.inner.write.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
