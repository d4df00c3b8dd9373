//! # pharmacy-storage: Durable Local Storage
//!
//! The storefront mirrors part of its state into a small SQLite key/value
//! table so the cart and session survive a restart.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Storefront Persistence Flow                         │
//! │                                                                         │
//! │  dispatch(StoreAction::CartAddItem)                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  reduce() in pharmacy-core  ──►  new AppState                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                pharmacy-storage (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌──────────────────┐   ┌─────────────┐  │   │
//! │  │   │   Database    │    │ LocalStorageRepo │   │  snapshot   │  │   │
//! │  │   │   (pool.rs)   │◄───│ get/set/remove   │◄──│ hydrate     │  │   │
//! │  │   │   SqlitePool  │    │ keys/clear       │   │ mirror      │  │   │
//! │  │   └───────────────┘    └──────────────────┘   └─────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  storefront.db (WAL mode)                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`pool`] - Connection pool and configuration
//! - [`migrations`] - Embedded schema migrations
//! - [`repository`] - Key/value repository
//! - [`snapshot`] - Rebuild and mirror the application state
//! - [`error`] - Storage error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pharmacy_storage::{snapshot, Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("storefront.db")).await?;
//! let state = snapshot::hydrate(&db.local_storage()).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod snapshot;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StorageError, StorageResult};
pub use pool::{Database, DbConfig};
pub use repository::local_storage::LocalStorageRepository;
