use api_types::category::{Category, CategoryCreate, CategoryRead};

use crate::{error::ApiError, gateway::Gateway};

#[derive(Clone)]
pub struct CategoriesApi {
    gateway: Gateway,
}

impl CategoriesApi {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub async fn list(&self) -> Result<Vec<Category>, ApiError> {
        self.gateway.get("/categories", &[]).await
    }

    pub async fn create(&self, request: &CategoryCreate) -> Result<CategoryRead, ApiError> {
        self.gateway.post("/categories", request).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.gateway.delete(&format!("/categories/{id}")).await
    }
}
