//! # Application Store
//!
//! The single application state and its pure reducer.
//!
//! ## Store Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Store Operations                                     │
//! │                                                                         │
//! │  Command                 StoreAction                State Change        │
//! │  ───────                 ───────────                ────────────        │
//! │                                                                         │
//! │  add_to_cart ──────────► CartAddItem ─────────────► replace or push    │
//! │  remove_from_cart ─────► CartRemoveItem ──────────► items.retain(..)   │
//! │  place_order ──────────► CartClear ───────────────► items.clear()      │
//! │  signin ───────────────► UserSignin ──────────────► user_info = Some   │
//! │  signout ──────────────► UserSignout ─────────────► session + cart     │
//! │  save_shipping ────────► SaveShippingAddress ─────► cart.address       │
//! │  save_payment ─────────► SavePaymentMethod ───────► cart.payment       │
//! │                                                                         │
//! │  reduce(state, action) -> state       (pure, no I/O)                    │
//! │  action.persisted_keys()              (which storage keys to mirror)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::types::{CartItem, GeoLocation, ShippingAddress, UserInfo};

// =============================================================================
// State
// =============================================================================

/// The client-side cart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartState {
    /// Insertion order is display order.
    pub cart_items: Vec<CartItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: Option<String>,
}

impl CartState {
    /// Finds the line for `product_id`.
    pub fn item(&self, product_id: &str) -> Option<&CartItem> {
        self.cart_items.iter().find(|i| i.product_id == product_id)
    }

    /// Quantity already in the cart for `product_id` (0 when absent).
    pub fn quantity_of(&self, product_id: &str) -> u32 {
        self.item(product_id).map_or(0, |i| i.quantity)
    }

    pub fn is_empty(&self) -> bool {
        self.cart_items.is_empty()
    }
}

/// Everything the storefront keeps between screens.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    /// Full-screen layout flag (the map picker sets it).
    pub full_box: bool,
    pub user_info: Option<UserInfo>,
    pub cart: CartState,
}

impl AppState {
    pub fn is_signed_in(&self) -> bool {
        self.user_info.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user_info.as_ref().is_some_and(|u| u.is_admin)
    }
}

// =============================================================================
// Actions
// =============================================================================

/// Every state change the storefront performs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StoreAction {
    CartAddItem(CartItem),
    CartRemoveItem { product_id: String },
    /// Drops the lines, keeps address and payment method.
    CartClear,
    /// Drops lines, address and payment method.
    CartReset,
    UserSignin(UserInfo),
    UserSignout,
    SaveShippingAddress(ShippingAddress),
    SaveShippingAddressMapLocation(GeoLocation),
    SavePaymentMethod(String),
    SetFullboxOn,
    SetFullboxOff,
}

/// Fixed local storage keys mirrored from the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    CartItems,
    ShippingAddress,
    PaymentMethod,
    UserInfo,
}

impl StorageKey {
    pub const ALL: [StorageKey; 4] = [
        StorageKey::CartItems,
        StorageKey::ShippingAddress,
        StorageKey::PaymentMethod,
        StorageKey::UserInfo,
    ];

    /// The key name in local storage.
    pub const fn as_str(&self) -> &'static str {
        match self {
            StorageKey::CartItems => "cartItems",
            StorageKey::ShippingAddress => "shippingAddress",
            StorageKey::PaymentMethod => "paymentMethod",
            StorageKey::UserInfo => "userInfo",
        }
    }
}

impl StoreAction {
    /// Action name as the web views know it.
    pub fn name(&self) -> &'static str {
        match self {
            StoreAction::CartAddItem(_) => "CART_ADD_ITEM",
            StoreAction::CartRemoveItem { .. } => "CART_REMOVE_ITEM",
            StoreAction::CartClear => "CART_CLEAR",
            StoreAction::CartReset => "CART_RESET",
            StoreAction::UserSignin(_) => "USER_SIGNIN",
            StoreAction::UserSignout => "USER_SIGNOUT",
            StoreAction::SaveShippingAddress(_) => "SAVE_SHIPPING_ADDRESS",
            StoreAction::SaveShippingAddressMapLocation(_) => "SAVE_SHIPPING_ADDRESS_MAP_LOCATION",
            StoreAction::SavePaymentMethod(_) => "SAVE_PAYMENT_METHOD",
            StoreAction::SetFullboxOn => "SET_FULLBOX_ON",
            StoreAction::SetFullboxOff => "SET_FULLBOX_OFF",
        }
    }

    /// Storage keys whose value may change under this action.
    pub fn persisted_keys(&self) -> &'static [StorageKey] {
        use StorageKey::*;
        match self {
            StoreAction::CartAddItem(_)
            | StoreAction::CartRemoveItem { .. }
            | StoreAction::CartClear => &[CartItems],
            StoreAction::CartReset => &[CartItems, ShippingAddress, PaymentMethod],
            StoreAction::UserSignin(_) => &[UserInfo],
            StoreAction::UserSignout => &StorageKey::ALL,
            StoreAction::SaveShippingAddress(_)
            | StoreAction::SaveShippingAddressMapLocation(_) => &[ShippingAddress],
            StoreAction::SavePaymentMethod(_) => &[PaymentMethod],
            StoreAction::SetFullboxOn | StoreAction::SetFullboxOff => &[],
        }
    }
}

// =============================================================================
// Reducer
// =============================================================================

/// Applies `action` to `state`.
///
/// Pure: the same inputs always give the same state, nothing is written
/// anywhere. Persistence is the caller's job (see
/// [`StoreAction::persisted_keys`]).
pub fn reduce(mut state: AppState, action: StoreAction) -> AppState {
    match action {
        StoreAction::CartAddItem(item) => {
            match state
                .cart
                .cart_items
                .iter_mut()
                .find(|i| i.product_id == item.product_id)
            {
                Some(existing) => *existing = item,
                None => state.cart.cart_items.push(item),
            }
        }
        StoreAction::CartRemoveItem { product_id } => {
            state.cart.cart_items.retain(|i| i.product_id != product_id);
        }
        StoreAction::CartClear => {
            state.cart.cart_items.clear();
        }
        StoreAction::CartReset => {
            state.cart = CartState::default();
        }
        StoreAction::UserSignin(user) => {
            state.user_info = Some(user);
        }
        StoreAction::UserSignout => {
            state.user_info = None;
            state.cart = CartState::default();
        }
        StoreAction::SaveShippingAddress(mut address) => {
            if address.location.is_none() {
                address.location = state.cart.shipping_address.location.take();
            }
            state.cart.shipping_address = address;
        }
        StoreAction::SaveShippingAddressMapLocation(location) => {
            state.cart.shipping_address.location = Some(location);
            state.full_box = false;
        }
        StoreAction::SavePaymentMethod(method) => {
            state.cart.payment_method = Some(method);
        }
        StoreAction::SetFullboxOn => state.full_box = true,
        StoreAction::SetFullboxOff => state.full_box = false,
    }
    state
}

// =============================================================================
// Unit Tests
// =============================================================================
