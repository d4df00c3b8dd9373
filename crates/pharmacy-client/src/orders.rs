//! Order endpoints.

use pharmacy_core::{NewOrder, Order, OrderStatus};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::client::{ApiClient, MessageResponse};
use crate::error::ClientResult;

/// `{ message, order }` reply of order mutations.
///
/// Some endpoints omit the order; callers then apply the change locally.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub order: Option<Order>,
}

/// Body of `PUT /api/orders/{id}/status`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusUpdate<'a> {
    status: OrderStatus,
    /// Empty unless rejecting.
    reject_reason: &'a str,
}

impl ApiClient {
    /// `POST /api/orders`
    #[instrument(
        skip(self, order),
        fields(lines = order.order_items.len(), total = %order.total_price)
    )]
    pub async fn create_order(&self, order: &NewOrder) -> ClientResult<OrderResponse> {
        let request = self.authed(Method::POST, "/api/orders")?.json(order);
        self.send_json(request).await
    }

    /// `GET /api/orders/mine`
    #[instrument(skip(self))]
    pub async fn my_orders(&self) -> ClientResult<Vec<Order>> {
        let request = self.authed(Method::GET, "/api/orders/mine")?;
        self.send_json(request).await
    }

    /// `GET /api/orders/{id}`
    #[instrument(skip(self))]
    pub async fn order(&self, id: &str) -> ClientResult<Order> {
        let request = self.authed(Method::GET, &format!("/api/orders/{id}"))?;
        self.send_json(request).await
    }

    /// `GET /api/orders` (admin)
    #[instrument(skip(self))]
    pub async fn all_orders(&self) -> ClientResult<Vec<Order>> {
        let request = self.authed(Method::GET, "/api/orders")?;
        self.send_json(request).await
    }

    /// `PUT /api/orders/{id}/status` (admin)
    #[instrument(skip(self, reject_reason))]
    pub async fn update_order_status(
        &self,
        id: &str,
        status: OrderStatus,
        reject_reason: Option<&str>,
    ) -> ClientResult<OrderResponse> {
        let body = StatusUpdate {
            status,
            reject_reason: reject_reason.unwrap_or_default(),
        };
        let request = self
            .authed(Method::PUT, &format!("/api/orders/{id}/status"))?
            .json(&body);
        self.send_json(request).await
    }

    /// `PUT /api/orders/{id}/cancel`
    #[instrument(skip(self))]
    pub async fn cancel_order(&self, id: &str) -> ClientResult<OrderResponse> {
        let request = self
            .authed(Method::PUT, &format!("/api/orders/{id}/cancel"))?
            .json(&serde_json::json!({}));
        self.send_json(request).await
    }

    /// `DELETE /api/orders/{id}` (admin)
    #[instrument(skip(self))]
    pub async fn delete_order(&self, id: &str) -> ClientResult<MessageResponse> {
        let request = self.authed(Method::DELETE, &format!("/api/orders/{id}"))?;
        self.send_json(request).await
    }

    /// `GET /api/orders/{id}/report`: the invoice PDF.
    #[instrument(skip(self))]
    pub async fn order_report(&self, id: &str) -> ClientResult<Vec<u8>> {
        let request = self.authed(Method::GET, &format!("/api/orders/{id}/report"))?;
        self.send_bytes(request).await
    }
}
