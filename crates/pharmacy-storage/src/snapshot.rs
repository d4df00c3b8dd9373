//! # State Snapshot
//!
//! Moves the persisted part of [`AppState`] in and out of local storage.
//!
//! ```text
//!   startup                           every dispatch
//!   ───────                           ──────────────
//!   local_storage ──hydrate()──► AppState ──mirror(keys)──► local_storage
//! ```
//!
//! `paymentMethod` is stored as the plain method name; the other keys hold
//! JSON.

use pharmacy_core::{AppState, CartItem, ShippingAddress, StorageKey, UserInfo};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{StorageError, StorageResult};
use crate::repository::local_storage::LocalStorageRepository;

/// Rebuilds the initial state from local storage.
///
/// Missing keys give defaults. A corrupt value is logged, removed and
/// replaced by its default so one bad key never blocks startup.
pub async fn hydrate(repo: &LocalStorageRepository) -> StorageResult<AppState> {
    let mut state = AppState::default();

    state.cart.cart_items = read_or_default::<Vec<CartItem>>(repo, StorageKey::CartItems)
        .await?
        .unwrap_or_default();
    state.cart.shipping_address =
        read_or_default::<ShippingAddress>(repo, StorageKey::ShippingAddress)
            .await?
            .unwrap_or_default();
    state.user_info = read_or_default::<UserInfo>(repo, StorageKey::UserInfo).await?;
    state.cart.payment_method = repo
        .get_item(StorageKey::PaymentMethod.as_str())
        .await?
        .filter(|m| !m.trim().is_empty());

    debug!(
        cart_items = state.cart.cart_items.len(),
        signed_in = state.user_info.is_some(),
        "Hydrated state from local storage"
    );
    Ok(state)
}

/// Writes the values of `keys` from `state`, removing keys whose value is
/// empty.
pub async fn mirror(
    repo: &LocalStorageRepository,
    state: &AppState,
    keys: &[StorageKey],
) -> StorageResult<()> {
    for key in keys {
        let name = key.as_str();
        match key {
            StorageKey::CartItems if state.cart.cart_items.is_empty() => {
                repo.remove_item(name).await?;
            }
            StorageKey::CartItems => repo.set_json(name, &state.cart.cart_items).await?,
            StorageKey::ShippingAddress
                if state.cart.shipping_address.is_empty()
                    && state.cart.shipping_address.location.is_none() =>
            {
                repo.remove_item(name).await?;
            }
            StorageKey::ShippingAddress => {
                repo.set_json(name, &state.cart.shipping_address).await?
            }
            StorageKey::PaymentMethod => match &state.cart.payment_method {
                Some(method) => repo.set_item(name, method).await?,
                None => {
                    repo.remove_item(name).await?;
                }
            },
            StorageKey::UserInfo => match &state.user_info {
                Some(user) => repo.set_json(name, user).await?,
                None => {
                    repo.remove_item(name).await?;
                }
            },
        }
    }
    Ok(())
}

async fn read_or_default<T: DeserializeOwned>(
    repo: &LocalStorageRepository,
    key: StorageKey,
) -> StorageResult<Option<T>> {
    match repo.get_json::<T>(key.as_str()).await {
        Ok(value) => Ok(value),
        Err(StorageError::Corrupt { key, source }) => {
            warn!(key = %key, error = %source, "Discarding corrupt local storage value");
            repo.remove_item(&key).await?;
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
