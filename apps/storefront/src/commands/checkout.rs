//! # Checkout Commands
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cart ──► Shipping ──► (Map) ──► Payment ──► Place Order                │
//! │              │            │          │            │                     │
//! │              │            │          │            ├── POST /api/orders  │
//! │              │            │          │            └── CART_CLEAR        │
//! │              │            │          └── SAVE_PAYMENT_METHOD            │
//! │              │            └── SAVE_SHIPPING_ADDRESS_MAP_LOCATION        │
//! │              ├── optional prescription upload (first; abort on error)   │
//! │              └── SAVE_SHIPPING_ADDRESS                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::Path;

use pharmacy_core::validation::{validate_payment_method, validate_shipping_address};
use pharmacy_core::{
    CartItem, CartPricing, CoreError, GeoLocation, NewOrder, Order, ShippingAddress, StoreAction,
    ValidationError,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::AppContext;

/// Saves the shipping form.
///
/// When `prescription` is given the file is uploaded first and its URL is
/// stored on the address; an upload failure aborts without saving anything.
/// A map location picked earlier is kept.
pub async fn save_shipping_address(
    ctx: &AppContext,
    mut address: ShippingAddress,
    prescription: Option<&Path>,
) -> AppResult<ShippingAddress> {
    debug!(has_prescription = prescription.is_some(), "save_shipping_address command");

    ctx.session()?;
    validate_shipping_address(&address)?;

    if let Some(path) = prescription {
        let uploaded = ctx.api().upload_file(path).await?;
        address.prescription = Some(uploaded.secure_url);
    }

    let state = ctx
        .store
        .dispatch(StoreAction::SaveShippingAddress(address))
        .await?;
    Ok(state.cart.shipping_address)
}

/// Saves the point picked on the map onto the shipping address.
///
/// Leaves the full-screen map layout.
pub async fn save_map_location(
    ctx: &AppContext,
    location: GeoLocation,
) -> AppResult<ShippingAddress> {
    debug!(lat = location.lat, lng = location.lng, "save_map_location command");

    check_coordinate("lat", location.lat, 90)?;
    check_coordinate("lng", location.lng, 180)?;

    let state = ctx
        .store
        .dispatch(StoreAction::SaveShippingAddressMapLocation(location))
        .await?;
    Ok(state.cart.shipping_address)
}

fn check_coordinate(field: &str, value: f64, limit: i64) -> AppResult<()> {
    if !value.is_finite() || value.abs() > limit as f64 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: -limit,
            max: limit,
        }
        .into());
    }
    Ok(())
}

/// Saves the chosen payment method.
///
/// The shipping step must come first.
pub async fn save_payment_method(ctx: &AppContext, method: &str) -> AppResult<String> {
    debug!(method = %method, "save_payment_method command");

    let method = validate_payment_method(method)?;
    if ctx.store.with_state(|s| s.cart.shipping_address.is_empty()) {
        return Err(AppError::validation("Please enter a shipping address first"));
    }

    ctx.store
        .dispatch(StoreAction::SavePaymentMethod(method.clone()))
        .await?;
    Ok(method)
}

/// Place-order screen contents.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPreview {
    pub items: Vec<CartItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    pub pricing: CartPricing,
}

/// Assembles the order summary from the store.
///
/// ## Errors
/// - Cart is empty
/// - No payment method saved
/// - Shipping address incomplete
pub fn preview_order(ctx: &AppContext) -> AppResult<OrderPreview> {
    let cart = ctx.store.with_state(|s| s.cart.clone());

    if cart.is_empty() {
        return Err(CoreError::EmptyCart.into());
    }
    let payment_method = cart
        .payment_method
        .ok_or_else(|| ValidationError::required("paymentMethod"))?;
    validate_shipping_address(&cart.shipping_address)?;

    Ok(OrderPreview {
        pricing: CartPricing::calculate(&cart.cart_items),
        items: cart.cart_items,
        shipping_address: cart.shipping_address,
        payment_method,
    })
}

/// Places the order and clears the cart.
///
/// The totals are computed here from the cart lines. A second call while
/// the first is waiting for the backend is refused. On any failure the
/// cart is left untouched.
pub async fn place_order(ctx: &AppContext) -> AppResult<Order> {
    let user = ctx.session()?;
    let _in_flight = ctx.mutations.begin("place_order")?;
    let preview = preview_order(ctx)?;
    debug!(
        user = %user.id,
        lines = preview.items.len(),
        total = %preview.pricing.total_price,
        "place_order command"
    );

    let order = NewOrder::new(preview.items, preview.shipping_address, preview.payment_method);
    let created = ctx
        .api()
        .create_order(&order)
        .await?
        .order
        .ok_or_else(|| AppError::internal("Backend did not return the created order"))?;

    ctx.store.dispatch(StoreAction::CartClear).await?;

    info!(order_id = %created.id, total = %created.total_price, "Order placed");
    Ok(created)
}
