//! # Cart Commands
//!
//! The cart has no server endpoint; it lives in the store and is mirrored to
//! local storage under `cartItems`.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│ Checkout │────►│  Order   │       │
//! │  │  Cart    │     │          │     │          │     │  Placed  │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                                 │              │
//! │                   add_to_cart                       CART_CLEAR         │
//! │                   update_quantity                  (checkout.rs)       │
//! │                   remove_from_cart                       │              │
//! │                        │                                 ▼              │
//! │                   clear_cart ─────────────────────► back to empty      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Adds and quantity changes re-read the product first; the stock check and
//! the add are not atomic, the backend re-validates when the order is placed.

use pharmacy_core::validation::ensure_in_stock;
use pharmacy_core::{
    CartItem, CartPricing, CartState, CoreError, Product, StoreAction, MAX_CART_ITEMS,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::AppContext;

/// Cart screen contents.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartItem>,
    /// Sum of the line quantities.
    pub item_count: u32,
    pub pricing: CartPricing,
}

impl From<&CartState> for CartView {
    fn from(cart: &CartState) -> Self {
        CartView {
            items: cart.cart_items.clone(),
            item_count: CartPricing::item_count(&cart.cart_items),
            pricing: CartPricing::calculate(&cart.cart_items),
        }
    }
}

/// Gets the current cart with its pricing.
pub fn get_cart(ctx: &AppContext) -> CartView {
    debug!("get_cart command");
    ctx.store.with_state(|s| CartView::from(&s.cart))
}

/// Adds one more unit of a product (product screen "Add to Cart").
///
/// ## Behavior
/// - quantity = existing line quantity + 1, or 1 for a new line
/// - Fresh stock read via `GET /api/products/{id}`
/// - Refused with "Sorry. Product is out of stock" when stock < quantity
/// - The line takes the freshly read price and stock count
pub async fn add_to_cart(ctx: &AppContext, product_id: &str) -> AppResult<CartView> {
    let (existing, lines) = ctx
        .store
        .with_state(|s| (s.cart.quantity_of(product_id), s.cart.cart_items.len()));
    let quantity = existing + 1;
    debug!(product_id = %product_id, quantity, "add_to_cart command");

    if existing == 0 && lines >= MAX_CART_ITEMS {
        return Err(CoreError::CartTooLarge { max: MAX_CART_ITEMS }.into());
    }

    let product = fresh_read(ctx, product_id, quantity).await?;
    let state = ctx
        .store
        .dispatch(StoreAction::CartAddItem(product.to_cart_item(quantity)))
        .await?;

    info!(product_id = %product_id, quantity, "Added to cart");
    Ok(CartView::from(&state.cart))
}

/// Sets the quantity of a line already in the cart (cart screen).
///
/// Same fresh stock check as [`add_to_cart`]. The line keeps the price it
/// was added at; only the quantity and the stock count change.
pub async fn update_quantity(
    ctx: &AppContext,
    product_id: &str,
    quantity: u32,
) -> AppResult<CartView> {
    debug!(product_id = %product_id, quantity, "update_quantity command");

    let line = ctx
        .store
        .with_state(|s| s.cart.item(product_id).cloned())
        .ok_or_else(|| AppError::cart(format!("Product {product_id} is not in the cart")))?;

    let product = fresh_read(ctx, product_id, quantity).await?;
    let updated = CartItem {
        quantity,
        count_in_stock: product.count_in_stock,
        ..line
    };
    let state = ctx.store.dispatch(StoreAction::CartAddItem(updated)).await?;

    Ok(CartView::from(&state.cart))
}

/// Removes a line from the cart.
pub async fn remove_from_cart(ctx: &AppContext, product_id: &str) -> AppResult<CartView> {
    debug!(product_id = %product_id, "remove_from_cart command");

    let state = ctx
        .store
        .dispatch(StoreAction::CartRemoveItem {
            product_id: product_id.to_string(),
        })
        .await?;
    Ok(CartView::from(&state.cart))
}

/// Empties the cart, keeping the saved address and payment method.
pub async fn clear_cart(ctx: &AppContext) -> AppResult<CartView> {
    debug!("clear_cart command");
    let state = ctx.store.dispatch(StoreAction::CartClear).await?;
    Ok(CartView::from(&state.cart))
}

/// Reads the product and checks `quantity` against its live stock.
async fn fresh_read(ctx: &AppContext, product_id: &str, quantity: u32) -> AppResult<Product> {
    let product = ctx.api().product_by_id(product_id).await?;
    ensure_in_stock(&product.name, quantity, product.count_in_stock)?;
    Ok(product)
}
