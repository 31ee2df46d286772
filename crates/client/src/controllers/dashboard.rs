use std::sync::{Arc, Mutex};

use api_types::{
    TransactionType,
    report::{ReportByCategory, ReportMonthly, ReportSummary},
    transaction::TransactionListResponse,
};

use super::{Section, fetch, lock, settle};
use crate::{
    Client,
    api::{ByCategoryParams, DateRange, ReportsApi, TransactionListParams, TransactionsApi},
    error::Result,
    query::{QueryCache, QueryKey, keys},
};

pub const RECENT_TRANSACTIONS: u32 = 5;

fn summary_key() -> QueryKey {
    keys::dashboard().with("summary")
}

fn expenses_key() -> QueryKey {
    keys::dashboard().with("by-category").with("expense")
}

fn monthly_key() -> QueryKey {
    keys::dashboard().with("monthly")
}

fn recent_key() -> QueryKey {
    keys::dashboard().with("recent-transactions")
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DashboardState {
    pub summary: Section<ReportSummary>,
    /// Expense breakdown only.
    pub by_category: Section<ReportByCategory>,
    pub monthly: Section<ReportMonthly>,
    pub recent: Section<TransactionListResponse>,
}

/// Overview over all time plus the most recent transactions.
#[derive(Clone)]
pub struct DashboardController {
    reports: ReportsApi,
    transactions: TransactionsApi,
    cache: Arc<QueryCache>,
    state: Arc<Mutex<DashboardState>>,
}

impl DashboardController {
    pub fn new(client: &Client) -> Self {
        Self {
            reports: client.reports_api(),
            transactions: client.transactions_api(),
            cache: client.cache().clone(),
            state: Arc::new(Mutex::new(DashboardState::default())),
        }
    }

    pub fn snapshot(&self) -> DashboardState {
        lock(&self.state).clone()
    }

    /// Fetches unless every section is loaded and none of them went stale,
    /// e.g. after a transaction or category mutation.
    pub async fn load(&self) -> Result<()> {
        let loaded = {
            let state = lock(&self.state);
            state.summary.data.is_some()
                && state.by_category.data.is_some()
                && state.monthly.data.is_some()
                && state.recent.data.is_some()
        };
        let stale = [summary_key(), expenses_key(), monthly_key(), recent_key()]
            .iter()
            .any(|key| self.cache.is_stale(key));
        if loaded && !stale {
            return Ok(());
        }
        self.refresh().await
    }

    pub async fn refresh(&self) -> Result<()> {
        let range = DateRange::default();
        let expenses = ByCategoryParams {
            range,
            kind: Some(TransactionType::Expense),
        };
        let recent = TransactionListParams {
            page: Some(1),
            page_size: Some(RECENT_TRANSACTIONS),
            ..Default::default()
        };

        let (
            (summary_ticket, summary),
            (category_ticket, categories),
            (monthly_ticket, monthly),
            (recent_ticket, transactions),
        ) = tokio::join!(
            fetch(&self.cache, summary_key(), || self.reports.summary(&range)),
            fetch(&self.cache, expenses_key(), || {
                self.reports.by_category(&expenses)
            }),
            fetch(&self.cache, monthly_key(), || self.reports.monthly(&range)),
            fetch(&self.cache, recent_key(), || self.transactions.list(&recent)),
        );

        let mut state = lock(&self.state);
        let mut errors = Vec::new();
        if settle(&self.cache, &summary_ticket, &summary) {
            errors.extend(state.summary.apply(summary, "Could not load summary."));
        }
        if settle(&self.cache, &category_ticket, &categories) {
            errors.extend(
                state
                    .by_category
                    .apply(categories, "Could not load category breakdown."),
            );
        }
        if settle(&self.cache, &monthly_ticket, &monthly) {
            errors.extend(state.monthly.apply(monthly, "Could not load monthly trend."));
        }
        if settle(&self.cache, &recent_ticket, &transactions) {
            errors.extend(
                state
                    .recent
                    .apply(transactions, "Could not load recent transactions."),
            );
        }

        match errors.into_iter().next() {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }
}
