//! The single outbound HTTP client.
//!
//! Every backend call goes through [`Gateway`]: it resolves paths against the
//! configured base URL, applies the timeout and default headers, runs the
//! [`Middleware`] hooks and classifies failures into [`ApiError`].

use std::{sync::Arc, time::Duration};

use reqwest::{Method, RequestBuilder, Response, Url, header};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::error::{ApiError, Error, Result};

mod middleware;

pub use middleware::{BearerAuth, Middleware, SessionGuard};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Deserialize)]
struct ErrorBody {
    // FastAPI sends a list of issues for schema errors; only strings are shown.
    detail: Option<serde_json::Value>,
}

#[derive(Clone)]
pub struct Gateway {
    http: reqwest::Client,
    base_url: Url,
    middleware: Arc<[Arc<dyn Middleware>]>,
}

impl Gateway {
    /// Fails when the base URL is missing or unparsable: the client cannot
    /// do anything useful without it.
    pub fn new(
        base_url: Option<&str>,
        timeout: Duration,
        middleware: Vec<Arc<dyn Middleware>>,
    ) -> Result<Self> {
        let raw = base_url
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .ok_or_else(|| Error::Config("base url is not configured".to_string()))?;
        let base_url = Url::parse(raw)
            .map_err(|err| Error::Config(format!("invalid base url {raw:?}: {err}")))?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|err| Error::Config(format!("failed to build http client: {err}")))?;

        Ok(Self {
            http,
            base_url,
            middleware: middleware.into(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> std::result::Result<T, ApiError> {
        let mut request = self.http.get(self.url(path));
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = self.execute(Method::GET, path, request).await?;
        Ok(response.json::<T>().await?)
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> std::result::Result<T, ApiError> {
        let request = self.http.post(self.url(path)).json(body);
        let response = self.execute(Method::POST, path, request).await?;
        Ok(response.json::<T>().await?)
    }

    /// `POST` without a request body.
    pub async fn post_empty<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> std::result::Result<T, ApiError> {
        let request = self.http.post(self.url(path));
        let response = self.execute(Method::POST, path, request).await?;
        Ok(response.json::<T>().await?)
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> std::result::Result<T, ApiError> {
        let request = self.http.put(self.url(path)).json(body);
        let response = self.execute(Method::PUT, path, request).await?;
        Ok(response.json::<T>().await?)
    }

    /// `DELETE`; the (empty) response body is ignored.
    pub async fn delete(&self, path: &str) -> std::result::Result<(), ApiError> {
        let request = self.http.delete(self.url(path));
        self.execute(Method::DELETE, path, request).await?;
        Ok(())
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        request: RequestBuilder,
    ) -> std::result::Result<Response, ApiError> {
        let request = self
            .middleware
            .iter()
            .fold(request, |request, hook| hook.on_request(request));

        tracing::debug!(%method, path, "sending request");
        let outcome = match request.send().await {
            Ok(response) if response.status().is_success() => Ok(response),
            Ok(response) => {
                let status = response.status();
                let detail = read_detail(response).await;
                tracing::debug!(%method, path, %status, "request failed");
                Err(ApiError::from_status(status, detail))
            }
            Err(err) => {
                tracing::debug!(%method, path, "transport error: {err}");
                Err(ApiError::Transport(err))
            }
        };

        if let Err(err) = &outcome {
            for hook in self.middleware.iter() {
                hook.on_error(err);
            }
        }
        outcome
    }
}

async fn read_detail(response: Response) -> Option<String> {
    let body = response.json::<ErrorBody>().await.ok()?;
    match body.detail? {
        serde_json::Value::String(detail) => Some(detail),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_base_url_is_a_config_error() {
        let err = Gateway::new(None, DEFAULT_TIMEOUT, Vec::new()).err().unwrap();
        assert!(matches!(err, Error::Config(_)));

        let err = Gateway::new(Some("  "), DEFAULT_TIMEOUT, Vec::new()).err().unwrap();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn invalid_base_url_is_a_config_error() {
        let err = Gateway::new(Some("not a url"), DEFAULT_TIMEOUT, Vec::new())
            .err()
            .unwrap();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn paths_join_onto_base_prefix() {
        let gateway = Gateway::new(Some("http://localhost:8000/api/"), DEFAULT_TIMEOUT, Vec::new())
            .unwrap();
        assert_eq!(gateway.url("/auth/login"), "http://localhost:8000/api/auth/login");

        let gateway =
            Gateway::new(Some("http://localhost:8000"), DEFAULT_TIMEOUT, Vec::new()).unwrap();
        assert_eq!(gateway.url("categories"), "http://localhost:8000/categories");
    }
}
