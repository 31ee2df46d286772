//! Client-side data and session layer of the finance tracker.
//!
//! The layer sits between a presentation front end and the REST backend:
//! it keeps the signed-in session (persisted and in memory), sends every
//! request through one [`Gateway`], and exposes per-view controllers that
//! hold filters, pagination and loaded data.
//!
//! A 401 from any endpoint drops the session before the caller sees the
//! error.

use std::{path::PathBuf, sync::Arc, time::Duration};

pub mod api;
pub mod controllers;
pub mod error;
pub mod export;
pub mod feedback;
pub mod gateway;
pub mod query;
pub mod session;
pub mod storage;
pub mod validation;

pub use error::{ApiError, Error, Result};
pub use gateway::Gateway;
pub use query::QueryCache;
pub use session::{Session, SessionState};

use api::{AuthApi, CategoriesApi, ReportsApi, TransactionsApi};
use controllers::{
    AuthController, CategoriesController, DashboardController, ReportsController,
    TransactionsController,
};
use gateway::{BearerAuth, DEFAULT_TIMEOUT, Middleware, SessionGuard};
use storage::{AuthStorage, FileStore, KeyValueStore, MemoryStore, ThemeStorage};

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Everything a view needs: the session, the gateway and the shared cache.
///
/// Cloning is cheap and clones share all state.
#[derive(Clone)]
pub struct Client {
    session: Session,
    gateway: Gateway,
    cache: Arc<QueryCache>,
    theme: ThemeStorage,
    page_size: u32,
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    pub fn theme(&self) -> &ThemeStorage {
        &self.theme
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn auth_api(&self) -> AuthApi {
        AuthApi::new(self.gateway.clone())
    }

    pub fn categories_api(&self) -> CategoriesApi {
        CategoriesApi::new(self.gateway.clone())
    }

    pub fn transactions_api(&self) -> TransactionsApi {
        TransactionsApi::new(self.gateway.clone())
    }

    pub fn reports_api(&self) -> ReportsApi {
        ReportsApi::new(self.gateway.clone())
    }

    pub fn auth(&self) -> AuthController {
        AuthController::new(self)
    }

    pub fn categories(&self) -> CategoriesController {
        CategoriesController::new(self)
    }

    pub fn transactions(&self) -> TransactionsController {
        TransactionsController::new(self)
    }

    pub fn reports(&self) -> ReportsController {
        ReportsController::new(self)
    }

    pub fn dashboard(&self) -> DashboardController {
        DashboardController::new(self)
    }
}

#[derive(Default)]
pub struct ClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    store: Option<Arc<dyn KeyValueStore>>,
    stale_time: Option<Duration>,
    page_size: Option<u32>,
}

impl ClientBuilder {
    pub fn base_url(mut self, base_url: &str) -> ClientBuilder {
        self.base_url = Some(base_url.to_string());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> ClientBuilder {
        self.timeout = Some(timeout);
        self
    }

    pub fn store(mut self, store: Arc<dyn KeyValueStore>) -> ClientBuilder {
        self.store = Some(store);
        self
    }

    /// Persists session and preferences as JSON files under `dir`.
    pub fn state_dir(self, dir: impl Into<PathBuf>) -> ClientBuilder {
        self.store(Arc::new(FileStore::new(dir)))
    }

    pub fn stale_time(mut self, stale_time: Duration) -> ClientBuilder {
        self.stale_time = Some(stale_time);
        self
    }

    pub fn page_size(mut self, page_size: u32) -> ClientBuilder {
        if page_size > 0 {
            self.page_size = Some(page_size);
        }
        self
    }

    /// Restores the session from the store and wires the gateway hooks:
    /// bearer token first, then the 401 guard. Without a store the session
    /// lives in memory only.
    pub fn build(self) -> Result<Client> {
        let store: Arc<dyn KeyValueStore> = match self.store {
            Some(store) => store,
            None => Arc::new(MemoryStore::new()),
        };
        let auth_storage = AuthStorage::new(store.clone());
        let session = Session::restore(auth_storage.clone());

        let middleware: Vec<Arc<dyn Middleware>> = vec![
            Arc::new(BearerAuth::new(auth_storage)),
            Arc::new(SessionGuard::new(session.clone())),
        ];
        let gateway = Gateway::new(
            self.base_url.as_deref(),
            self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            middleware,
        )?;
        tracing::debug!(base_url = %gateway.base_url(), "client ready");

        Ok(Client {
            session,
            gateway,
            cache: Arc::new(
                self.stale_time
                    .map(QueryCache::new)
                    .unwrap_or_default(),
            ),
            theme: ThemeStorage::new(store),
            page_size: self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        })
    }
}
