//! Product catalogue endpoints.

use pharmacy_core::{Product, ProductInput, ReviewSummary, SearchResults};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::client::{ApiClient, MessageResponse};
use crate::error::ClientResult;

/// Body of `POST /api/products/{id}/reviews`.
#[derive(Debug, Clone, Serialize)]
pub struct NewReview<'a> {
    pub rating: u8,
    pub comment: &'a str,
    pub name: &'a str,
}

/// `{ message, product }` reply of the admin product endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductResponse {
    #[serde(default)]
    pub message: String,
    pub product: Product,
}

impl ApiClient {
    /// `GET /api/products`
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> ClientResult<Vec<Product>> {
        let request = self.public(Method::GET, "/api/products")?;
        self.send_json(request).await
    }

    /// `GET /api/products/categories`
    #[instrument(skip(self))]
    pub async fn categories(&self) -> ClientResult<Vec<String>> {
        let request = self.public(Method::GET, "/api/products/categories")?;
        self.send_json(request).await
    }

    /// `GET /api/products/search?query=`
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> ClientResult<SearchResults> {
        let request = self
            .public(Method::GET, "/api/products/search")?
            .query(&[("query", query)]);
        self.send_json(request).await
    }

    /// `GET /api/products/slug/{slug}`
    #[instrument(skip(self))]
    pub async fn product_by_slug(&self, slug: &str) -> ClientResult<Product> {
        let request = self.public(Method::GET, &format!("/api/products/slug/{slug}"))?;
        self.send_json(request).await
    }

    /// `GET /api/products/{id}`. Used for the fresh stock read before any
    /// cart mutation.
    #[instrument(skip(self))]
    pub async fn product_by_id(&self, id: &str) -> ClientResult<Product> {
        let request = self.public(Method::GET, &format!("/api/products/{id}"))?;
        self.send_json(request).await
    }

    /// `POST /api/products/{id}/reviews`
    #[instrument(skip(self, review), fields(rating = review.rating))]
    pub async fn create_review(
        &self,
        product_id: &str,
        review: &NewReview<'_>,
    ) -> ClientResult<ReviewSummary> {
        let request = self
            .authed(Method::POST, &format!("/api/products/{product_id}/reviews"))?
            .json(review);
        self.send_json(request).await
    }

    /// `POST /api/products` (admin)
    #[instrument(skip(self, input), fields(slug = %input.slug))]
    pub async fn create_product(&self, input: &ProductInput) -> ClientResult<ProductResponse> {
        let request = self.authed(Method::POST, "/api/products")?.json(input);
        self.send_json(request).await
    }

    /// `PUT /api/products/{id}` (admin)
    #[instrument(skip(self, input))]
    pub async fn update_product(
        &self,
        id: &str,
        input: &ProductInput,
    ) -> ClientResult<MessageResponse> {
        let request = self
            .authed(Method::PUT, &format!("/api/products/{id}"))?
            .json(input);
        self.send_json(request).await
    }

    /// `DELETE /api/products/{id}` (admin)
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: &str) -> ClientResult<MessageResponse> {
        let request = self.authed(Method::DELETE, &format!("/api/products/{id}"))?;
        self.send_json(request).await
    }
}
