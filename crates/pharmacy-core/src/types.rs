//! # Domain Types
//!
//! Wire types shared with the storefront backend.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    CartItem     │   │     Order       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  _id            │──►│  _id (product)  │──►│  orderItems     │       │
//! │  │  slug, name     │   │  price (frozen) │   │  shippingAddress│       │
//! │  │  price          │   │  quantity       │   │  totals         │       │
//! │  │  countInStock   │   │  countInStock   │   │  status         │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ ShippingAddress │   │    UserInfo     │   │  OrderStatus    │       │
//! │  │  fullName ...   │   │  _id, isAdmin   │   │  pending        │       │
//! │  │  location?      │   │  token          │   │  approved ...   │       │
//! │  │  prescription?  │   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Field Naming
//! The backend speaks camelCase JSON with MongoDB-style `_id` keys, and
//! stores the order discount under a capitalised `DiscountPrice`. The serde
//! attributes below follow the wire exactly; Rust code sees snake_case.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;
use crate::pricing::CartPricing;

// =============================================================================
// Product
// =============================================================================

/// A customer review attached to a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub name: String,
    pub comment: String,
    pub rating: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A product in the catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Backend identifier.
    #[serde(rename = "_id")]
    pub id: String,

    pub name: String,

    /// URL-safe identifier used by the product detail page.
    pub slug: String,

    #[serde(default)]
    pub image: String,

    #[serde(default)]
    pub images: Vec<String>,

    #[serde(default)]
    pub brand: String,

    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub description: String,

    pub price: Money,

    /// Live stock count. Always re-read before a cart mutation.
    #[serde(default)]
    pub count_in_stock: u32,

    /// Average review rating (0-5).
    #[serde(default)]
    pub rating: f64,

    #[serde(default)]
    pub num_reviews: u32,

    #[serde(default)]
    pub reviews: Vec<Review>,
}

impl Product {
    /// Snapshots this product into a cart line.
    ///
    /// The price is frozen at this moment; later catalogue changes do not
    /// move lines already in the cart.
    pub fn to_cart_item(&self, quantity: u32) -> CartItem {
        CartItem {
            product_id: self.id.clone(),
            name: self.name.clone(),
            slug: self.slug.clone(),
            image: self.image.clone(),
            price: self.price,
            quantity,
            count_in_stock: self.count_in_stock,
        }
    }
}

/// Admin payload for creating or editing a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: String,
    pub slug: String,
    pub price: Money,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub count_in_stock: u32,
    #[serde(default)]
    pub description: String,
}

/// Paged result of a product search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub count_products: u32,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub pages: u32,
}

/// Backend reply after a review is posted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    pub review: Review,
    pub num_reviews: u32,
    pub rating: f64,
}

// =============================================================================
// Cart
// =============================================================================

/// A line in the client-side cart.
///
/// Serialized with the same keys as the product it came from so the line
/// can be posted as an order item unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[serde(rename = "_id")]
    pub product_id: String,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub image: String,
    /// Unit price at the time the line was added.
    pub price: Money,
    pub quantity: u32,
    /// Stock count seen at the last fresh read.
    #[serde(default)]
    pub count_in_stock: u32,
}

impl CartItem {
    /// Creates a line without slug or image (handy for tests and tools).
    pub fn new(
        product_id: impl Into<String>,
        name: impl Into<String>,
        price: Money,
        quantity: u32,
        count_in_stock: u32,
    ) -> Self {
        CartItem {
            product_id: product_id.into(),
            name: name.into(),
            slug: String::new(),
            image: String::new(),
            price,
            quantity,
            count_in_stock,
        }
    }

    /// Unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Shipping
// =============================================================================

/// A point picked on the map for delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct GeoLocation {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub name: Option<String>,
}

/// Where and to whom an order ships.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub location: Option<GeoLocation>,
    /// URL of an uploaded prescription, if the order needs one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub prescription: Option<String>,
}

impl ShippingAddress {
    /// An address with no recipient yet is treated as "not saved".
    pub fn is_empty(&self) -> bool {
        self.full_name.trim().is_empty() && self.address.trim().is_empty()
    }
}

// =============================================================================
// Users
// =============================================================================

/// The signed-in session returned by sign-in, sign-up and profile update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
    /// Bearer token for authenticated calls.
    pub token: String,
}

/// A user as seen from the admin back-office (no token).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
}

// =============================================================================
// Orders
// =============================================================================

/// The order lifecycle stage.
///
/// Transition rules live in [`crate::order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Cancelled,
    Delivered,
}

impl OrderStatus {
    /// Wire name of the status.
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Approved => "approved",
            OrderStatus::Rejected => "rejected",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Delivered => "delivered",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A line of a placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub image: String,
    pub price: Money,
    pub quantity: u32,
    /// Product identifier.
    #[serde(default)]
    pub product: String,
}

/// The customer reference on an order: either a bare id or the populated
/// user document, depending on the endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(untagged)]
pub enum OrderCustomer {
    Profile {
        #[serde(rename = "_id")]
        id: String,
        name: String,
    },
    Id(String),
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(default)]
    pub order_items: Vec<OrderItem>,

    #[serde(default)]
    pub shipping_address: ShippingAddress,

    #[serde(default)]
    pub payment_method: String,

    pub items_price: Money,

    pub shipping_price: Money,

    #[serde(rename = "DiscountPrice", default)]
    pub discount_price: Money,

    pub total_price: Money,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub user: Option<OrderCustomer>,

    #[serde(default)]
    pub status: OrderStatus,

    /// Set when an administrator rejects the order. The backend sends an
    /// empty string for other statuses; use [`Order::reject_reason`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub reject_reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Order {
    /// The rejection reason, only when the order is actually rejected.
    pub fn reject_reason(&self) -> Option<&str> {
        if self.status != OrderStatus::Rejected {
            return None;
        }
        self.reject_reason
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }

    /// The totals recorded when the order was placed.
    pub fn pricing(&self) -> CartPricing {
        CartPricing {
            items_price: self.items_price,
            shipping_price: self.shipping_price,
            discount_price: self.discount_price,
            total_price: self.total_price,
        }
    }
}

/// Payload for placing an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub order_items: Vec<CartItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    pub items_price: Money,
    pub shipping_price: Money,
    #[serde(rename = "DiscountPrice")]
    pub discount_price: Money,
    pub total_price: Money,
}

impl NewOrder {
    /// Builds the order payload, computing the totals from the lines.
    pub fn new(
        items: Vec<CartItem>,
        shipping_address: ShippingAddress,
        payment_method: impl Into<String>,
    ) -> Self {
        let pricing = CartPricing::calculate(&items);
        NewOrder {
            order_items: items,
            shipping_address,
            payment_method: payment_method.into(),
            items_price: pricing.items_price,
            shipping_price: pricing.shipping_price,
            discount_price: pricing.discount_price,
            total_price: pricing.total_price,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
