use std::{
    fmt,
    str::FromStr,
    sync::{Arc, Mutex},
};

use api_types::{
    TransactionType,
    category::Category,
    transaction::{Transaction, TransactionListResponse, TransactionUpsert},
};

use super::{fetch, lock, settle};
use crate::{
    Client,
    api::{DateRange, TransactionListParams, TransactionsApi},
    error::{ApiError, Result},
    feedback::Feedback,
    query::{QueryCache, QueryKey, keys},
    validation,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TypeFilter {
    #[default]
    All,
    Income,
    Expense,
}

impl TypeFilter {
    pub fn kind(self) -> Option<TransactionType> {
        match self {
            Self::All => None,
            Self::Income => Some(TransactionType::Income),
            Self::Expense => Some(TransactionType::Expense),
        }
    }
}

impl From<Option<TransactionType>> for TypeFilter {
    fn from(kind: Option<TransactionType>) -> Self {
        match kind {
            None => Self::All,
            Some(TransactionType::Income) => Self::Income,
            Some(TransactionType::Expense) => Self::Expense,
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            Some(kind) => f.write_str(kind.as_str()),
            None => f.write_str("all"),
        }
    }
}

impl FromStr for TypeFilter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse::<TransactionType>().map(|kind| Some(kind).into())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CategoryFilter {
    #[default]
    All,
    Id(i64),
}

impl CategoryFilter {
    pub fn id(self) -> Option<i64> {
        match self {
            Self::All => None,
            Self::Id(id) => Some(id),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TransactionFilters {
    pub kind: TypeFilter,
    pub category: CategoryFilter,
    pub range: DateRange,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Dialog {
    #[default]
    Closed,
    Create,
    Edit(Transaction),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionsState {
    pub filters: TransactionFilters,
    /// 1-based; clamped to the server's `total_pages` once known.
    pub page: u32,
    pub dialog: Dialog,
    pub data: Option<TransactionListResponse>,
    pub error: Option<String>,
    loaded: Option<QueryKey>,
}

impl Default for TransactionsState {
    fn default() -> Self {
        Self {
            filters: TransactionFilters::default(),
            page: 1,
            dialog: Dialog::Closed,
            data: None,
            error: None,
            loaded: None,
        }
    }
}

impl TransactionsState {
    fn params(&self, page_size: u32) -> TransactionListParams {
        TransactionListParams {
            page: Some(self.page),
            page_size: Some(page_size),
            kind: self.filters.kind.kind(),
            category_id: self.filters.category.id(),
            range: self.filters.range,
        }
    }
}

fn list_key(params: &TransactionListParams) -> QueryKey {
    params
        .query_pairs()
        .into_iter()
        .fold(keys::transactions(), |key, (name, value)| {
            key.with(format!("{name}={value}"))
        })
}

/// The transaction list view: filters, pagination, the create/edit dialog.
#[derive(Clone)]
pub struct TransactionsController {
    api: TransactionsApi,
    cache: Arc<QueryCache>,
    feedback: Feedback,
    page_size: u32,
    state: Arc<Mutex<TransactionsState>>,
}

impl TransactionsController {
    pub fn new(client: &Client) -> Self {
        Self {
            api: client.transactions_api(),
            cache: client.cache().clone(),
            feedback: Feedback::default(),
            page_size: client.page_size(),
            state: Arc::new(Mutex::new(TransactionsState::default())),
        }
    }

    pub fn snapshot(&self) -> TransactionsState {
        lock(&self.state).clone()
    }

    pub fn feedback(&self) -> &Feedback {
        &self.feedback
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Replaces every filter at once. Any filter change returns to page 1.
    pub fn set_filters(&self, filters: TransactionFilters) {
        self.update_filters(|current| *current = filters);
    }

    pub fn set_type_filter(&self, kind: TypeFilter) {
        self.update_filters(|filters| filters.kind = kind);
    }

    pub fn set_category_filter(&self, category: CategoryFilter) {
        self.update_filters(|filters| filters.category = category);
    }

    pub fn set_date_range(&self, range: DateRange) {
        self.update_filters(|filters| filters.range = range);
    }

    fn update_filters(&self, change: impl FnOnce(&mut TransactionFilters)) {
        let mut state = lock(&self.state);
        change(&mut state.filters);
        state.page = 1;
    }

    pub fn set_page(&self, page: u32) {
        lock(&self.state).page = page.max(1);
    }

    /// Fetches unless the current page is already loaded and fresh.
    pub async fn load(&self) -> Result<()> {
        let key = list_key(&lock(&self.state).params(self.page_size));
        let loaded = lock(&self.state).loaded.as_ref() == Some(&key);
        if loaded && !self.cache.is_stale(&key) {
            return Ok(());
        }
        self.refresh().await
    }

    /// Fetches the current page. When the server reports fewer pages than the
    /// current page number, the page is clamped and fetched again.
    pub async fn refresh(&self) -> Result<()> {
        loop {
            let params = lock(&self.state).params(self.page_size);
            let (ticket, result) =
                fetch(&self.cache, list_key(&params), || self.api.list(&params)).await;

            let mut state = lock(&self.state);
            // The view moved to other filters or another page meanwhile.
            if state.params(self.page_size) != params || !settle(&self.cache, &ticket, &result) {
                tracing::debug!(key = %ticket.key(), "ignoring outdated transaction list");
                return Ok(());
            }

            let response = match result {
                Ok(response) => response,
                Err(err) => {
                    state.error = Some(err.message_or("Could not load transactions."));
                    return Err(err.into());
                }
            };

            let total_pages = response.pagination.total_pages;
            state.data = Some(response);
            state.error = None;
            state.loaded = Some(ticket.key().clone());

            if total_pages == 0 || state.page <= total_pages {
                return Ok(());
            }
            tracing::debug!(from = state.page, to = total_pages, "page out of range, clamping");
            state.page = total_pages;
        }
    }

    pub fn open_create(&self) {
        lock(&self.state).dialog = Dialog::Create;
    }

    pub fn open_edit(&self, transaction: Transaction) {
        lock(&self.state).dialog = Dialog::Edit(transaction);
    }

    pub fn close_dialog(&self) {
        lock(&self.state).dialog = Dialog::Closed;
    }

    /// Creates a transaction, or updates the one being edited. On failure the
    /// dialog stays open.
    pub async fn submit(&self, payload: TransactionUpsert) -> Result<Transaction> {
        let editing = match &lock(&self.state).dialog {
            Dialog::Edit(transaction) => Some(transaction.id),
            Dialog::Create | Dialog::Closed => None,
        };
        let (success, fallback) = match editing {
            Some(_) => ("Transaction updated.", "Could not update transaction."),
            None => ("Transaction created.", "Could not create transaction."),
        };

        if let Err(err) = validation::transaction(&payload) {
            self.feedback.error(err.message.clone());
            return Err(err.into());
        }

        let result = match editing {
            Some(id) => self.api.update(id, &payload).await,
            None => self.api.create(&payload).await,
        };
        let transaction = self.settle_mutation(result, success, fallback)?;

        self.close_dialog();
        self.refetch().await;
        Ok(transaction)
    }

    /// Deletes after `confirm` accepts the prompt. Returns whether the
    /// transaction was deleted.
    pub async fn delete(
        &self,
        transaction: &Transaction,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Result<bool> {
        let prompt = format!("Delete transaction from {}?", transaction.category.name);
        if !confirm(&prompt) {
            return Ok(false);
        }

        let result = self.api.delete(transaction.id).await;
        self.settle_mutation(
            result,
            "Transaction deleted.",
            "Could not delete transaction.",
        )?;
        self.refetch().await;
        Ok(true)
    }

    /// The categories offered by the filter bar: only those of the selected
    /// type, or all of them.
    pub fn categories_for_filter(&self, categories: &[Category]) -> Vec<Category> {
        let kind = lock(&self.state).filters.kind.kind();
        super::categories::of_kind(categories, kind)
    }

    fn settle_mutation<T>(
        &self,
        result: std::result::Result<T, ApiError>,
        success: &str,
        fallback: &str,
    ) -> Result<T> {
        match result {
            Ok(value) => {
                self.feedback.success(success);
                for prefix in [keys::transactions(), keys::dashboard(), keys::reports()] {
                    self.cache.invalidate(&prefix);
                }
                Ok(value)
            }
            Err(err) => {
                self.feedback.error(err.message_or(fallback));
                Err(err.into())
            }
        }
    }

    async fn refetch(&self) {
        if let Err(err) = self.refresh().await {
            tracing::debug!("refetch after mutation failed: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn controller() -> TransactionsController {
        let client = Client::builder()
            .base_url("http://127.0.0.1:9")
            .build()
            .unwrap();
        TransactionsController::new(&client)
    }

    fn category(id: i64, kind: TransactionType) -> Category {
        Category {
            id,
            name: format!("c{id}"),
            kind,
            color: "#22c55e".to_string(),
            transaction_count: 0,
        }
    }

    #[test]
    fn starts_on_first_page_with_no_filters() {
        let state = controller().snapshot();
        assert_eq!(state.page, 1);
        assert_eq!(state.filters, TransactionFilters::default());
        assert_eq!(state.dialog, Dialog::Closed);
    }

    #[test]
    fn every_filter_change_resets_page() {
        let controller = controller();

        controller.set_page(4);
        controller.set_type_filter(TypeFilter::Income);
        assert_eq!(controller.snapshot().page, 1);

        controller.set_page(4);
        controller.set_category_filter(CategoryFilter::Id(3));
        assert_eq!(controller.snapshot().page, 1);

        controller.set_page(4);
        controller.set_date_range(DateRange::new(NaiveDate::from_ymd_opt(2024, 1, 1), None));
        assert_eq!(controller.snapshot().page, 1);

        controller.set_page(4);
        controller.set_filters(TransactionFilters::default());
        assert_eq!(controller.snapshot().page, 1);
    }

    #[test]
    fn page_never_drops_below_one() {
        let controller = controller();
        controller.set_page(0);
        assert_eq!(controller.snapshot().page, 1);
    }

    #[test]
    fn list_key_tracks_page_and_filters() {
        let controller = controller();
        let before = list_key(&controller.snapshot().params(10));
        controller.set_page(2);
        let after = list_key(&controller.snapshot().params(10));

        assert_ne!(before, after);
        assert!(after.starts_with(&keys::transactions()));
        assert_eq!(after.to_string(), "transactions/page=2/page_size=10");
    }

    #[test]
    fn filter_categories_follow_type_filter() {
        let controller = controller();
        let categories = [
            category(1, TransactionType::Income),
            category(2, TransactionType::Expense),
        ];
        assert_eq!(controller.categories_for_filter(&categories).len(), 2);

        controller.set_type_filter(TypeFilter::Expense);
        let shown = controller.categories_for_filter(&categories);
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].id, 2);
    }

    #[test]
    fn type_filter_parses_all_and_directions() {
        assert_eq!("all".parse::<TypeFilter>(), Ok(TypeFilter::All));
        assert_eq!("Expense".parse::<TypeFilter>(), Ok(TypeFilter::Expense));
        assert!("both".parse::<TypeFilter>().is_err());
    }

    #[tokio::test]
    async fn invalid_payload_is_rejected_before_sending() {
        let controller = controller();
        controller.open_create();

        let err = controller
            .submit(TransactionUpsert {
                category_id: 1,
                amount: api_types::Amount::new(0),
                kind: TransactionType::Expense,
                note: None,
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, crate::Error::Validation(_)));
        assert_eq!(controller.snapshot().dialog, Dialog::Create);
        assert_eq!(
            controller.feedback().current().map(|message| message.message),
            Some("Amount must be greater than 0.".to_string())
        );
    }

    #[tokio::test]
    async fn declined_delete_sends_nothing() {
        let controller = controller();
        let transaction = Transaction {
            id: 1,
            category_id: 2,
            amount: "5.00".to_string(),
            kind: TransactionType::Expense,
            note: None,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            created_at: "2024-01-01T00:00:00".to_string(),
            category: api_types::transaction::TransactionCategory {
                id: 2,
                name: "Food".to_string(),
                kind: TransactionType::Expense,
                color: "#f97316".to_string(),
            },
        };

        let mut asked = None;
        let deleted = controller
            .delete(&transaction, |prompt| {
                asked = Some(prompt.to_string());
                false
            })
            .await
            .unwrap();

        assert!(!deleted);
        assert_eq!(asked.as_deref(), Some("Delete transaction from Food?"));
    }
}
