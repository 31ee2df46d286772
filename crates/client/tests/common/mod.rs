#![allow(dead_code)]

use std::sync::Arc;

use api_types::auth::{AuthTokens, TokenType, User};
use pftracker_client::{Client, storage::MemoryStore};
use serde_json::{Value, json};
use wiremock::{Match, MockServer, Request};

pub fn user() -> User {
    User {
        id: 1,
        name: "Demo".to_string(),
        email: "demo@x.com".to_string(),
        created_at: "2024-01-01T00:00:00".to_string(),
    }
}

pub fn tokens(access: &str, refresh: &str) -> AuthTokens {
    AuthTokens {
        access_token: access.to_string(),
        refresh_token: refresh.to_string(),
        token_type: TokenType::Bearer,
    }
}

pub fn auth_response() -> Value {
    json!({
        "user": {"id": 1, "name": "Demo", "email": "demo@x.com", "created_at": "2024-01-01T00:00:00"},
        "tokens": {"access_token": "a", "refresh_token": "b", "token_type": "bearer"}
    })
}

pub fn client(server: &MockServer, store: Arc<MemoryStore>) -> Client {
    Client::builder()
        .base_url(&server.uri())
        .store(store)
        .build()
        .unwrap()
}

/// A client that is already signed in with access token `a`.
pub fn signed_in(server: &MockServer) -> (Client, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let client = client(server, store.clone());
    client.session().set_auth(user(), tokens("a", "b")).unwrap();
    (client, store)
}

pub fn transaction(id: i64, kind: &str) -> Value {
    json!({
        "id": id,
        "category_id": 2,
        "amount": "12.50",
        "type": kind,
        "note": null,
        "date": "2024-01-15",
        "created_at": "2024-01-15T10:00:00",
        "category": {"id": 2, "name": "Food", "type": kind, "color": "#f97316"}
    })
}

pub fn list_response(items: Vec<Value>, page: u32, total: u64, total_pages: u32) -> Value {
    json!({
        "items": items,
        "pagination": {"page": page, "page_size": 10, "total": total, "total_pages": total_pages}
    })
}

pub fn summary() -> Value {
    json!({"income": "100.00", "expenses": "40.00", "net": "60.00"})
}

pub fn monthly() -> Value {
    json!({"items": [{"month": "2024-01", "income": "100.00", "expenses": "40.00", "net": "60.00"}]})
}

pub fn by_category() -> Value {
    json!({
        "items": [{
            "category_id": 2,
            "category_name": "Food",
            "category_color": "#f97316",
            "type": "expense",
            "total": "40.00",
            "percentage": "100.00"
        }],
        "total": "40.00"
    })
}

/// Matches requests whose query string has no blank values.
pub struct NoBlankParams;

impl Match for NoBlankParams {
    fn matches(&self, request: &Request) -> bool {
        request.url.query_pairs().all(|(_, value)| !value.is_empty())
    }
}

/// Matches requests that do not carry the query parameter at all.
pub struct ParamAbsent(pub &'static str);

impl Match for ParamAbsent {
    fn matches(&self, request: &Request) -> bool {
        !request.url.query_pairs().any(|(name, _)| name == self.0)
    }
}
