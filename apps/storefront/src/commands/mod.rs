//! # Storefront Commands
//!
//! One async function per user action, grouped by screen family.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports, screen loader)
//! ├── product.rs   ◄─── Home, product detail, reviews
//! ├── cart.rs      ◄─── Add / update / remove / view
//! ├── checkout.rs  ◄─── Shipping, map location, payment, place order
//! ├── orders.rs    ◄─── Order history, cancel, invoice
//! ├── admin.rs     ◄─── Order review, users, products
//! ├── user.rs      ◄─── Sign in/up/out, profile, password reset
//! └── search.rs    ◄─── Search and debounced suggestions
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CLI / web view                                                         │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  async fn add_to_cart(ctx: &AppContext, product_id: &str)               │
//! │      -> AppResult<CartView>                                             │
//! │        │                                                                │
//! │        ├── validate input (pharmacy-core)                               │
//! │        ├── call the backend (ctx.api())                                 │
//! │        └── dispatch a StoreAction (ctx.store)                           │
//! │                                                                         │
//! │  Every failure is an AppError with a one-line message; state is         │
//! │  left as it was before the command.                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod admin;
pub mod cart;
pub mod checkout;
pub mod orders;
pub mod product;
pub mod search;
pub mod user;

use std::future::Future;

use pharmacy_core::{RequestAction, RequestState};
use tracing::{debug, error};

use crate::error::{AppError, AppResult};

/// A screen's loaded data, failing with the full [`AppError`] so the code
/// survives next to the one-line message.
pub type Screen<T> = RequestState<T, AppError>;

/// Runs a screen's data load through the request lifecycle.
///
/// `Request` enters `Loading`; the outcome is folded in as `Success` or
/// `Fail`.
pub async fn load<T, F>(screen: &'static str, fetch: F) -> Screen<T>
where
    F: Future<Output = AppResult<T>>,
{
    let state = RequestState::Loading.apply(RequestAction::Request);
    debug!(screen, "Loading");

    match fetch.await {
        Ok(data) => state.apply(RequestAction::Success(data)),
        Err(err) => {
            error!(screen, code = ?err.code, error = %err.message, "Load failed");
            state.apply(RequestAction::Fail(err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn test_load_success_and_failure() {
        let ok = load("home", async { Ok::<_, AppError>(vec![1, 2]) }).await;
        assert_eq!(ok.data(), Some(&vec![1, 2]));

        let failed: Screen<Vec<u8>> =
            load("home", async { Err(AppError::unauthorized("Please sign in first")) }).await;
        let err = failed.error().unwrap();
        assert_eq!(err.code, ErrorCode::Unauthorized);
        assert_eq!(err.message, "Please sign in first");
        assert!(failed.data().is_none());
    }
}
