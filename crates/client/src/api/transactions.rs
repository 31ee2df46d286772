use api_types::{
    TransactionType,
    transaction::{Transaction, TransactionListResponse, TransactionUpsert},
};

use super::{DateRange, Query};
use crate::{error::ApiError, gateway::Gateway};

/// Parameters of `GET /transactions`; every field is optional.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransactionListParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub kind: Option<TransactionType>,
    pub category_id: Option<i64>,
    pub range: DateRange,
}

impl TransactionListParams {
    pub fn query_pairs(&self) -> Query {
        let mut query = Query::new();
        // Zero means "not set" for the numeric parameters.
        if let Some(page) = self.page.filter(|page| *page > 0) {
            query.push(("page", page.to_string()));
        }
        if let Some(size) = self.page_size.filter(|size| *size > 0) {
            query.push(("page_size", size.to_string()));
        }
        if let Some(kind) = self.kind {
            query.push(("type", kind.as_str().to_string()));
        }
        if let Some(id) = self.category_id.filter(|id| *id > 0) {
            query.push(("category_id", id.to_string()));
        }
        self.range.push_into(&mut query);
        query
    }
}

#[derive(Clone)]
pub struct TransactionsApi {
    gateway: Gateway,
}

impl TransactionsApi {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub async fn list(
        &self,
        params: &TransactionListParams,
    ) -> Result<TransactionListResponse, ApiError> {
        self.gateway
            .get("/transactions", &params.query_pairs())
            .await
    }

    pub async fn create(&self, request: &TransactionUpsert) -> Result<Transaction, ApiError> {
        self.gateway.post("/transactions", request).await
    }

    pub async fn update(
        &self,
        id: i64,
        request: &TransactionUpsert,
    ) -> Result<Transaction, ApiError> {
        self.gateway
            .put(&format!("/transactions/{id}"), request)
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.gateway.delete(&format!("/transactions/{id}")).await
    }
}
