//! # Store State
//!
//! The single application store: cart, session and UI flags.
//!
//! ## Dispatch Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  command ──► dispatch(action)                                           │
//! │                 │                                                       │
//! │                 ├── 1. take the writer lock (one dispatch at a time)    │
//! │                 ├── 2. reduce(state, action) under the state mutex      │
//! │                 ├── 3. release the state mutex                          │
//! │                 └── 4. mirror action.persisted_keys() to local storage  │
//! │                                                                         │
//! │  Reads (snapshot / with_state) only take the state mutex, briefly.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use pharmacy_core::{reduce, AppState, StoreAction};
use pharmacy_storage::{snapshot, LocalStorageRepository};
use tracing::debug;

use crate::error::AppResult;

/// Thread-safe wrapper around [`AppState`].
///
/// Cheap to clone; clones share the same store.
#[derive(Debug, Clone)]
pub struct StoreState {
    state: Arc<Mutex<AppState>>,
    // serializes reduce+mirror so storage sees actions in dispatch order
    writer: Arc<tokio::sync::Mutex<()>>,
    storage: Option<LocalStorageRepository>,
}

impl StoreState {
    /// Creates a store that mirrors into `storage` when given.
    pub fn new(initial: AppState, storage: Option<LocalStorageRepository>) -> Self {
        StoreState {
            state: Arc::new(Mutex::new(initial)),
            writer: Arc::new(tokio::sync::Mutex::new(())),
            storage,
        }
    }

    /// Creates a store with no durable storage.
    pub fn in_memory() -> Self {
        Self::new(AppState::default(), None)
    }

    /// Creates a store hydrated from local storage.
    pub async fn load(storage: LocalStorageRepository) -> AppResult<Self> {
        let initial = snapshot::hydrate(&storage).await?;
        Ok(Self::new(initial, Some(storage)))
    }

    fn lock(&self) -> MutexGuard<'_, AppState> {
        // the reducer cannot panic halfway, so a poisoned state is still whole
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> AppState {
        self.lock().clone()
    }

    /// Executes a function with read access to the state.
    pub fn with_state<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&AppState) -> R,
    {
        f(&self.lock())
    }

    /// Applies `action` and persists the keys it touches.
    ///
    /// Returns the new state. If persisting fails the in-memory state has
    /// already changed; the error is still returned so the caller can
    /// report it.
    pub async fn dispatch(&self, action: StoreAction) -> AppResult<AppState> {
        let _writer = self.writer.lock().await;

        let name = action.name();
        let keys = action.persisted_keys();

        let next = {
            let mut state = self.lock();
            let next = reduce(state.clone(), action);
            *state = next.clone();
            next
        };

        if let Some(storage) = &self.storage {
            snapshot::mirror(storage, &next, keys).await?;
        }

        debug!(
            action = name,
            cart_items = next.cart.cart_items.len(),
            signed_in = next.user_info.is_some(),
            "Dispatched"
        );
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pharmacy_core::{CartItem, Money, StorageKey, UserInfo};
    use pharmacy_storage::{Database, DbConfig};

    fn user() -> UserInfo {
        UserInfo {
            id: "u1".to_string(),
            name: "Amina".to_string(),
            email: "amina@example.com".to_string(),
            is_admin: false,
            token: "token-123".to_string(),
        }
    }

    #[tokio::test]
    async fn test_dispatch_updates_snapshot() {
        let store = StoreState::in_memory();
        let item = CartItem::new("p1", "Zinc", Money::from_cents(800), 2, 5);

        let state = store.dispatch(StoreAction::CartAddItem(item)).await.unwrap();
        assert_eq!(state.cart.cart_items.len(), 1);
        assert_eq!(store.with_state(|s| s.cart.quantity_of("p1")), 2);
    }

    #[tokio::test]
    async fn test_dispatch_mirrors_and_reloads() {
        let repo = Database::new(DbConfig::in_memory())
            .await
            .unwrap()
            .local_storage();

        let store = StoreState::load(repo.clone()).await.unwrap();
        store.dispatch(StoreAction::UserSignin(user())).await.unwrap();
        store
            .dispatch(StoreAction::CartAddItem(CartItem::new(
                "p1",
                "Zinc",
                Money::from_cents(800),
                1,
                5,
            )))
            .await
            .unwrap();
        store
            .dispatch(StoreAction::SavePaymentMethod("PayPal".to_string()))
            .await
            .unwrap();

        assert_eq!(
            repo.get_item(StorageKey::PaymentMethod.as_str()).await.unwrap(),
            Some("PayPal".to_string())
        );

        let reloaded = StoreState::load(repo.clone()).await.unwrap().snapshot();
        assert_eq!(reloaded, store.snapshot());

        store.dispatch(StoreAction::UserSignout).await.unwrap();
        assert!(repo.keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_full_box_is_not_persisted() {
        let repo = Database::new(DbConfig::in_memory())
            .await
            .unwrap()
            .local_storage();
        let store = StoreState::load(repo.clone()).await.unwrap();

        store.dispatch(StoreAction::SetFullboxOn).await.unwrap();
        assert!(store.snapshot().full_box);
        assert!(repo.keys().await.unwrap().is_empty());
    }
}
