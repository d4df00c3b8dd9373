//! # Pharmacy Storefront Library
//!
//! The application layer of the storefront: configuration, the store, and
//! one command module per screen family.
//!
//! ## Module Organization
//! ```text
//! pharmacy_storefront/
//! ├── lib.rs          ◄─── AppContext & startup
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── store.rs    ◄─── StoreState (AppState + local storage mirror)
//! │   ├── mutations.rs ◄── In-flight update/cancel/place-order flags
//! │   └── config.rs   ◄─── StorefrontConfig
//! ├── commands/
//! │   ├── product.rs  ◄─── Catalogue, detail, reviews
//! │   ├── cart.rs     ◄─── Cart manipulation with stock checks
//! │   ├── checkout.rs ◄─── Shipping, map location, payment, place order
//! │   ├── orders.rs   ◄─── Order history, cancel, invoice
//! │   ├── admin.rs    ◄─── Order review, users, products
//! │   ├── user.rs     ◄─── Sign in/up/out, profile, password reset
//! │   └── search.rs   ◄─── Search and debounced suggestions
//! └── error.rs        ◄─── AppError for commands
//! ```

pub mod commands;
pub mod error;
pub mod state;

use pharmacy_client::ApiClient;
use pharmacy_core::UserInfo;
use pharmacy_storage::{Database, DbConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use error::{AppError, AppResult};
use state::{MutationTracker, StoreState, StorefrontConfig};

/// Everything a command needs.
///
/// ```text
/// ┌──────────────────┐ ┌──────────────────┐ ┌──────────────────────┐
/// │ StorefrontConfig │ │    ApiClient     │ │     StoreState       │
/// │ (read-only)      │ │ (anonymous base) │ │ (AppState + storage) │
/// └──────────────────┘ └──────────────────┘ └──────────────────────┘
/// ```
#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: StorefrontConfig,
    /// Client without credentials; see [`AppContext::api`].
    pub client: ApiClient,
    pub store: StoreState,
    /// Update/cancel/place-order requests still waiting for the backend.
    pub mutations: MutationTracker,
    db: Option<Database>,
}

impl AppContext {
    /// Opens local storage, hydrates the store and builds the client.
    ///
    /// ## Startup Sequence
    /// ```text
    /// 1. Resolve storage path (config or platform data dir)
    /// 2. Open SQLite (WAL) and run migrations
    /// 3. Hydrate AppState from cartItems / shippingAddress / paymentMethod / userInfo
    /// 4. Build the REST client with the configured timeout
    /// ```
    pub async fn init(config: StorefrontConfig) -> AppResult<Self> {
        let path = config.resolve_storage_path()?;
        info!(path = %path.display(), "Local storage path determined");

        let db = Database::new(DbConfig::new(path)).await?;
        let store = StoreState::load(db.local_storage()).await?;
        let client = ApiClient::new(&config.api_url, config.request_timeout())?;

        info!(api_url = %config.api_url, "Storefront initialized");
        Ok(AppContext {
            config,
            client,
            store,
            mutations: MutationTracker::new(),
            db: Some(db),
        })
    }

    /// Assembles a context from parts (tests, embedding).
    pub fn from_parts(config: StorefrontConfig, client: ApiClient, store: StoreState) -> Self {
        AppContext {
            config,
            client,
            store,
            mutations: MutationTracker::new(),
            db: None,
        }
    }

    /// Client carrying the session token when signed in.
    pub fn api(&self) -> ApiClient {
        match self.store.with_state(|s| s.user_info.as_ref().map(|u| u.token.clone())) {
            Some(token) => self.client.with_token(token),
            None => self.client.anonymous(),
        }
    }

    /// The signed-in user.
    pub fn session(&self) -> AppResult<UserInfo> {
        self.store
            .with_state(|s| s.user_info.clone())
            .ok_or_else(|| AppError::unauthorized("Please sign in first"))
    }

    /// The signed-in user, who must be an administrator.
    pub fn require_admin(&self) -> AppResult<UserInfo> {
        let user = self.session()?;
        if !user.is_admin {
            tracing::warn!(user = %user.id, "Admin command refused");
            return Err(AppError::forbidden("Admin access required"));
        }
        Ok(user)
    }

    /// Closes local storage.
    pub async fn shutdown(&self) {
        if let Some(db) = &self.db {
            db.close().await;
        }
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=pharmacy=trace` - Show trace for pharmacy crates only
/// - Default: `info,pharmacy=debug,sqlx=warn`
///
/// Logs go to stderr so command output on stdout stays clean.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,pharmacy=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
