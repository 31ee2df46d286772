use std::sync::{Arc, Mutex};

use api_types::{
    TransactionType,
    category::{Category, CategoryCreate, CategoryRead},
};

use super::{TypeFilter, fetch, lock, settle};
use crate::{
    Client,
    api::CategoriesApi,
    error::Result,
    feedback::Feedback,
    query::{QueryCache, keys},
    validation,
};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategoriesState {
    pub items: Option<Vec<Category>>,
    pub error: Option<String>,
}

/// Categories of `kind`, or all of them.
pub(super) fn of_kind(categories: &[Category], kind: Option<TransactionType>) -> Vec<Category> {
    categories
        .iter()
        .filter(|category| kind.is_none_or(|kind| category.kind == kind))
        .cloned()
        .collect()
}

#[derive(Clone)]
pub struct CategoriesController {
    api: CategoriesApi,
    cache: Arc<QueryCache>,
    feedback: Feedback,
    state: Arc<Mutex<CategoriesState>>,
}

impl CategoriesController {
    pub fn new(client: &Client) -> Self {
        Self {
            api: client.categories_api(),
            cache: client.cache().clone(),
            feedback: Feedback::default(),
            state: Arc::new(Mutex::new(CategoriesState::default())),
        }
    }

    pub fn snapshot(&self) -> CategoriesState {
        lock(&self.state).clone()
    }

    pub fn feedback(&self) -> &Feedback {
        &self.feedback
    }

    /// Loaded categories matching `filter`; empty before the first load.
    pub fn items(&self, filter: TypeFilter) -> Vec<Category> {
        let state = lock(&self.state);
        of_kind(state.items.as_deref().unwrap_or_default(), filter.kind())
    }

    pub async fn load(&self) -> Result<()> {
        let loaded = lock(&self.state).items.is_some();
        if loaded && !self.cache.is_stale(&keys::categories()) {
            return Ok(());
        }
        self.refresh().await
    }

    pub async fn refresh(&self) -> Result<()> {
        let (ticket, result) = fetch(&self.cache, keys::categories(), || self.api.list()).await;
        if !settle(&self.cache, &ticket, &result) {
            return Ok(());
        }

        let mut state = lock(&self.state);
        match result {
            Ok(items) => {
                state.items = Some(items);
                state.error = None;
                Ok(())
            }
            Err(err) => {
                state.error = Some(err.message_or("Could not load categories."));
                Err(err.into())
            }
        }
    }

    pub async fn create(&self, payload: CategoryCreate) -> Result<CategoryRead> {
        if let Err(err) = validation::category(&payload) {
            self.feedback.error(err.message.clone());
            return Err(err.into());
        }

        match self.api.create(&payload).await {
            Ok(created) => {
                self.feedback.success("Category created.");
                self.cache.invalidate(&keys::categories());
                self.refetch().await;
                Ok(created)
            }
            Err(err) => {
                self.feedback.error(err.message_or("Could not create category."));
                Err(err.into())
            }
        }
    }

    /// Deletes after `confirm` accepts the prompt. The server refuses while
    /// transactions still reference the category; nothing is invalidated
    /// then. Returns whether the category was deleted.
    pub async fn delete(
        &self,
        id: i64,
        name: &str,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Result<bool> {
        if !confirm(&format!("Delete category \"{name}\"?")) {
            return Ok(false);
        }

        match self.api.delete(id).await {
            Ok(()) => {
                self.feedback.success("Category deleted.");
                for prefix in [
                    keys::categories(),
                    keys::transactions(),
                    keys::dashboard(),
                    keys::reports(),
                ] {
                    self.cache.invalidate(&prefix);
                }
                self.refetch().await;
                Ok(true)
            }
            Err(err) => {
                self.feedback.error(err.message_or("Could not delete category."));
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
    use super::*;

    fn category(id: i64, kind: TransactionType) -> Category {
        Category {
            id,
            name: format!("c{id}"),
            kind,
            color: "#17c964".to_string(),
            transaction_count: 0,
        }
    }

    #[test]
    fn items_follow_type_filter() {
        let client = Client::builder()
            .base_url("http://127.0.0.1:9")
            .build()
            .unwrap();
        let controller = CategoriesController::new(&client);
        assert!(controller.items(TypeFilter::All).is_empty());

        lock(&controller.state).items = Some(vec![
            category(1, TransactionType::Income),
            category(2, TransactionType::Expense),
            category(3, TransactionType::Income),
        ]);

        assert_eq!(controller.items(TypeFilter::All).len(), 3);
        let income: Vec<i64> = controller
            .items(TypeFilter::Income)
            .into_iter()
            .map(|category| category.id)
            .collect();
        assert_eq!(income, [1, 3]);
    }
}
