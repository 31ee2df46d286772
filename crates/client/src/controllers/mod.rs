//! Per-view state machines.
//!
//! A controller owns the UI-local state of one view (filters, page, dialog,
//! loaded data) and drives the resource façades. Handles are cheap to clone;
//! clones share state, so overlapping requests can be issued from one view.
//! State locks are never held across an `.await`.

mod auth;
mod categories;
mod dashboard;
mod reports;
mod transactions;

use std::{
    future::Future,
    sync::{Mutex, MutexGuard, PoisonError},
};

pub use auth::{AuthController, SIGN_IN_FALLBACK};
pub use categories::{CategoriesController, CategoriesState};
pub use dashboard::{DashboardController, DashboardState, RECENT_TRANSACTIONS};
pub use reports::{ReportsController, ReportsState};
pub use transactions::{
    CategoryFilter, Dialog, TransactionFilters, TransactionsController, TransactionsState,
    TypeFilter,
};

use crate::{
    error::ApiError,
    query::{QueryCache, QueryKey, Ticket, fetch_with_retry},
};

/// One independently loaded part of a view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section<T> {
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> Default for Section<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
        }
    }
}

impl<T> Section<T> {
    /// A failure keeps the previously loaded data; the error is handed back.
    fn apply(&mut self, result: Result<T, ApiError>, fallback: &str) -> Option<ApiError> {
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
                None
            }
            Err(err) => {
                self.error = Some(err.message_or(fallback));
                Some(err)
            }
        }
    }
}

/// Starts a read for `key` and runs it with the read retry policy.
async fn fetch<T, F, Fut>(cache: &QueryCache, key: QueryKey, op: F) -> (Ticket, Result<T, ApiError>)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let ticket = cache.begin(key);
    let result = fetch_with_retry(op).await;
    (ticket, result)
}

/// Whether a finished read is still the newest one for its key. Successful
/// reads also mark the key fresh.
fn settle<T>(cache: &QueryCache, ticket: &Ticket, result: &Result<T, ApiError>) -> bool {
    match result {
        Ok(_) => cache.complete(ticket),
        Err(_) => cache.is_current(ticket),
    }
}

fn lock<T>(state: &Mutex<T>) -> MutexGuard<'_, T> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
