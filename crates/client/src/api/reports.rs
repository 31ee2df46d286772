use api_types::{
    TransactionType,
    report::{ReportByCategory, ReportMonthly, ReportSummary},
};

use super::{DateRange, Query};
use crate::{error::ApiError, gateway::Gateway};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ByCategoryParams {
    pub range: DateRange,
    pub kind: Option<TransactionType>,
}

impl ByCategoryParams {
    pub fn query_pairs(&self) -> Query {
        let mut query = self.range.query_pairs();
        if let Some(kind) = self.kind {
            query.push(("type", kind.as_str().to_string()));
        }
        query
    }
}

#[derive(Clone)]
pub struct ReportsApi {
    gateway: Gateway,
}

impl ReportsApi {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub async fn summary(&self, range: &DateRange) -> Result<ReportSummary, ApiError> {
        self.gateway
            .get("/reports/summary", &range.query_pairs())
            .await
    }

    pub async fn by_category(
        &self,
        params: &ByCategoryParams,
    ) -> Result<ReportByCategory, ApiError> {
        self.gateway
            .get("/reports/by-category", &params.query_pairs())
            .await
    }

    pub async fn monthly(&self, range: &DateRange) -> Result<ReportMonthly, ApiError> {
        self.gateway
            .get("/reports/monthly", &range.query_pairs())
            .await
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn type_follows_date_bounds() {
        let params = ByCategoryParams {
            range: DateRange::new(None, NaiveDate::from_ymd_opt(2024, 3, 31)),
            kind: Some(TransactionType::Expense),
        };
        assert_eq!(
            params.query_pairs(),
            vec![
                ("end_date", "2024-03-31".to_string()),
                ("type", "expense".to_string()),
            ]
        );
    }

    #[test]
    fn no_type_means_both_directions() {
        assert!(ByCategoryParams::default().query_pairs().is_empty());
    }
}
