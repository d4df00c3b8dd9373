//! # pharmacy-core: Pure Business Logic for the Pharmacy Storefront
//!
//! This crate holds every rule of the storefront that can be stated without
//! touching the network or the disk.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Pharmacy Storefront Architecture                     │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Storefront commands / CLI                       │   │
//! │  │   add_to_cart, place_order, cancel_order, update_status, ...   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ pharmacy-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐  │   │
//! │  │   │  money  │ │ pricing │ │  order  │ │  store  │ │ request │  │   │
//! │  │   │  Money  │ │ Totals  │ │ Status  │ │ reduce  │ │ Loading │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └─────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │         ┌──────────────────────┴──────────────────────┐                │
//! │  ┌──────▼───────────┐                        ┌────────▼─────────┐      │
//! │  │ pharmacy-storage │                        │ pharmacy-client  │      │
//! │  │ local storage    │                        │ REST backend     │      │
//! │  └──────────────────┘                        └──────────────────┘      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Wire types shared with the backend (Product, Order, ...)
//! - [`money`] - Money type with integer arithmetic
//! - [`pricing`] - Cart pricing calculator
//! - [`order`] - Order status state machine
//! - [`store`] - Application state and its pure reducer
//! - [`request`] - Request lifecycle (loading / ok / error)
//! - [`validation`] - Input validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use pharmacy_core::money::Money;
//! use pharmacy_core::pricing::CartPricing;
//! use pharmacy_core::CartItem;
//!
//! let items = vec![CartItem::new("p1", "Paracetamol", Money::from_cents(2000), 2, 10)];
//! let pricing = CartPricing::calculate(&items);
//!
//! assert_eq!(pricing.items_price.cents(), 4000);
//! assert_eq!(pricing.shipping_price.cents(), 1000);
//! assert_eq!(pricing.discount_price.cents(), 400);
//! assert_eq!(pricing.total_price.cents(), 4600);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod order;
pub mod pricing;
pub mod request;
pub mod store;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use order::{Actor, StatusChange};
pub use pricing::CartPricing;
pub use request::{MutationState, RequestAction, RequestState};
pub use store::{reduce, AppState, CartState, StorageKey, StoreAction};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines allowed in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line.
///
/// The live stock count is the real ceiling; this only guards against
/// typing 1000 instead of 10.
pub const MAX_ITEM_QUANTITY: u32 = 999;
