//! Wire types of the finance tracker REST API.
//!
//! Every request and response body the client exchanges with the backend is
//! declared here, grouped by resource family.

use serde::{Deserialize, Serialize};

mod money;

pub use money::{Amount, AmountError};

/// Direction of a category or transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    /// Returns the canonical string used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(format!("unknown transaction type: {other}")),
        }
    }
}

pub mod auth {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct User {
        pub id: i64,
        pub name: String,
        pub email: String,
        /// Server timestamp, kept verbatim.
        pub created_at: String,
    }

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum TokenType {
        #[default]
        Bearer,
    }

    #[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct AuthTokens {
        pub access_token: String,
        pub refresh_token: String,
        #[serde(default)]
        pub token_type: TokenType,
    }

    // Tokens are credentials: keep them out of logs and panic messages.
    impl std::fmt::Debug for AuthTokens {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("AuthTokens")
                .field("access_token", &"<redacted>")
                .field("refresh_token", &"<redacted>")
                .field("token_type", &self.token_type)
                .finish()
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct AuthResponse {
        pub user: User,
        pub tokens: AuthTokens,
    }

    #[derive(Clone, Serialize, Deserialize)]
    pub struct LoginRequest {
        pub email: String,
        pub password: String,
    }

    #[derive(Clone, Serialize, Deserialize)]
    pub struct RegisterRequest {
        pub name: String,
        pub email: String,
        pub password: String,
    }

    #[derive(Clone, Serialize, Deserialize)]
    pub struct RefreshRequest {
        pub refresh_token: String,
    }
}

pub mod category {
    use super::*;

    /// A category as listed by `GET /categories`.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Category {
        pub id: i64,
        pub name: String,
        #[serde(rename = "type")]
        pub kind: TransactionType,
        pub color: String,
        pub transaction_count: u64,
    }

    /// A freshly created category; the server does not count transactions here.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CategoryRead {
        pub id: i64,
        pub name: String,
        #[serde(rename = "type")]
        pub kind: TransactionType,
        pub color: String,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CategoryCreate {
        pub name: String,
        #[serde(rename = "type")]
        pub kind: TransactionType,
        pub color: String,
    }
}

pub mod transaction {
    use chrono::NaiveDate;

    use super::*;

    /// Category embedded in every listed transaction.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct TransactionCategory {
        pub id: i64,
        pub name: String,
        #[serde(rename = "type")]
        pub kind: TransactionType,
        pub color: String,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Transaction {
        pub id: i64,
        pub category_id: i64,
        /// Decimal string as returned by the server.
        pub amount: String,
        #[serde(rename = "type")]
        pub kind: TransactionType,
        pub note: Option<String>,
        pub date: NaiveDate,
        pub created_at: String,
        pub category: TransactionCategory,
    }

    /// Body of `POST /transactions` and `PUT /transactions/:id`.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct TransactionUpsert {
        pub category_id: i64,
        pub amount: Amount,
        #[serde(rename = "type")]
        pub kind: TransactionType,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub note: Option<String>,
        pub date: NaiveDate,
    }

    /// Server-authoritative pagination metadata.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct PaginationMeta {
        pub page: u32,
        pub page_size: u32,
        pub total: u64,
        pub total_pages: u32,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub items: Vec<Transaction>,
        pub pagination: PaginationMeta,
    }
}

pub mod report {
    use super::*;

    /// Totals over a date range. Values are decimal strings.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ReportSummary {
        pub income: String,
        pub expenses: String,
        pub net: String,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ReportCategoryItem {
        pub category_id: i64,
        pub category_name: String,
        pub category_color: String,
        #[serde(rename = "type")]
        pub kind: TransactionType,
        pub total: String,
        pub percentage: String,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ReportByCategory {
        pub items: Vec<ReportCategoryItem>,
        pub total: String,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ReportMonthlyItem {
        pub month: String,
        pub income: String,
        pub expenses: String,
        pub net: String,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ReportMonthly {
        pub items: Vec<ReportMonthlyItem>,
    }
}
