//! # State Module
//!
//! Long-lived state shared by every command.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────────────┐       ┌──────────────────────────────┐   │
//! │  │  StoreState              │       │  StorefrontConfig            │   │
//! │  │                          │       │                              │   │
//! │  │  Arc<Mutex<AppState>>    │       │  api_url, debounce_ms,       │   │
//! │  │  + local storage mirror  │       │  currency, storage path      │   │
//! │  └──────────────────────────┘       └──────────────────────────────┘   │
//! │                                                                         │
//! │  MutationTracker: per-key "request in flight" flags                    │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • StoreState: Arc<Mutex<T>>, dispatches serialized                    │
//! │  • StorefrontConfig: read-only after initialization                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod mutations;
mod store;

pub use config::{StorefrontConfig, CONFIG_FILE_NAME, STORAGE_FILE_NAME};
pub use mutations::{MutationGuard, MutationTracker};
pub use store::StoreState;
