//! # pharmacy-client: Typed REST Client
//!
//! One method per backend endpoint, grouped by resource.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ApiClient (client.rs)                                                  │
//! │  ├── products.rs   /api/products/...                                    │
//! │  ├── orders.rs     /api/orders/...                                      │
//! │  ├── users.rs      /api/users/...                                       │
//! │  └── upload.rs     /api/upload                                          │
//! │                                                                         │
//! │  Authenticated calls send `Authorization: Bearer <token>`.              │
//! │  Failures carry the backend's `message` when it sent one.               │
//! │  No retries: a failure goes straight back to the caller.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,no_run
//! use pharmacy_client::{ApiClient, DEFAULT_TIMEOUT};
//!
//! # async fn run() -> Result<(), pharmacy_client::ClientError> {
//! let client = ApiClient::new("http://localhost:5000", DEFAULT_TIMEOUT)?;
//! let session = client.signin("amina@example.com", "secret").await?;
//! let orders = client.with_token(session.token).my_orders().await?;
//! # let _ = orders;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod orders;
pub mod products;
pub mod upload;
pub mod users;

pub use client::{ApiClient, MessageResponse, DEFAULT_TIMEOUT};
pub use error::{ClientError, ClientResult};
pub use orders::OrderResponse;
pub use products::{NewReview, ProductResponse};
pub use upload::UploadResult;
pub use users::{ProfileUpdate, UserUpdate};
