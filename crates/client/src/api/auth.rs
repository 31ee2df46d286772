use api_types::auth::{AuthResponse, AuthTokens, LoginRequest, RefreshRequest, RegisterRequest};

use crate::{error::ApiError, gateway::Gateway};

#[derive(Clone)]
pub struct AuthApi {
    gateway: Gateway,
}

impl AuthApi {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.gateway.post("/auth/login", request).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.gateway.post("/auth/register", request).await
    }

    /// Exchanges a refresh token for a new token pair; no user is returned.
    pub async fn refresh(&self, request: &RefreshRequest) -> Result<AuthTokens, ApiError> {
        self.gateway.post("/auth/refresh", request).await
    }

    pub async fn demo(&self) -> Result<AuthResponse, ApiError> {
        self.gateway.post_empty("/auth/demo").await
    }
}
