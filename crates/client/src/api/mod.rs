//! Typed façades over the backend resources.
//!
//! Each call maps one typed parameter object onto exactly one HTTP request
//! through the [`Gateway`](crate::gateway::Gateway) and hands the response
//! body back unchanged. Optional parameters that are unset are left out of
//! the query string entirely.

mod auth;
mod categories;
mod reports;
mod transactions;

use chrono::NaiveDate;

pub use auth::AuthApi;
pub use categories::CategoriesApi;
pub use reports::{ByCategoryParams, ReportsApi};
pub use transactions::{TransactionListParams, TransactionsApi};

pub(crate) type Query = Vec<(&'static str, String)>;

/// Inclusive date bounds shared by list and report queries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// Parses `YYYY-MM-DD` inputs; a blank input means unbounded.
    pub fn parse(start: &str, end: &str) -> Result<Self, chrono::ParseError> {
        Ok(Self {
            start: parse_bound(start)?,
            end: parse_bound(end)?,
        })
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn query_pairs(&self) -> Query {
        let mut query = Query::new();
        self.push_into(&mut query);
        query
    }

    pub(crate) fn push_into(&self, query: &mut Query) {
        if let Some(start) = self.start {
            query.push(("start_date", start.to_string()));
        }
        if let Some(end) = self.end {
            query.push(("end_date", end.to_string()));
        }
    }
}

fn parse_bound(raw: &str) -> Result<Option<NaiveDate>, chrono::ParseError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_inputs_are_unbounded() {
        let range = DateRange::parse("", "  ").unwrap();
        assert!(range.is_unbounded());
        assert!(range.query_pairs().is_empty());
    }

    #[test]
    fn bounds_are_sent_as_iso_dates() {
        let range = DateRange::parse("2024-01-01", "").unwrap();
        assert_eq!(
            range.query_pairs(),
            vec![("start_date", "2024-01-01".to_string())]
        );
    }

    #[test]
    fn garbage_dates_are_rejected() {
        assert!(DateRange::parse("01/02/2024", "").is_err());
    }
}
