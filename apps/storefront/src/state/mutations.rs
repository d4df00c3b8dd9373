//! # In-Flight Mutations
//!
//! Tracks which update, cancel or place-order requests are still waiting
//! for the backend, so a second press of the same button is refused
//! instead of sending a duplicate request.
//!
//! ```text
//!  cancel_order("o1") ──► begin("order:o1") ──► InFlight ──► PUT ... ──► guard dropped ──► Idle
//!  cancel_order("o1") ──► begin("order:o1") ──► refused (BUSINESS_LOGIC)
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use pharmacy_core::MutationState;
use tracing::warn;

use crate::error::{AppError, AppResult, ErrorCode};

/// Per-key mutation flags shared by every clone.
#[derive(Debug, Clone, Default)]
pub struct MutationTracker {
    flags: Arc<Mutex<HashMap<String, MutationState>>>,
}

impl MutationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, MutationState>> {
        self.flags.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Marks `key` in flight until the returned guard is dropped.
    ///
    /// Refused while another mutation of the same key is running.
    pub fn begin(&self, key: impl Into<String>) -> AppResult<MutationGuard> {
        let key = key.into();
        let mut flags = self.lock();

        if !flags.entry(key.clone()).or_default().begin() {
            warn!(key = %key, "Mutation already in flight");
            return Err(AppError::new(
                ErrorCode::BusinessLogic,
                "Another update is still in progress, please wait",
            ));
        }

        Ok(MutationGuard {
            tracker: self.clone(),
            key,
        })
    }

    /// Whether a mutation of `key` is running.
    pub fn is_in_flight(&self, key: &str) -> bool {
        self.lock().get(key).is_some_and(MutationState::is_in_flight)
    }
}

/// Clears its key's in-flight flag on drop, whatever the outcome.
#[derive(Debug)]
pub struct MutationGuard {
    tracker: MutationTracker,
    key: String,
}

impl Drop for MutationGuard {
    fn drop(&mut self) {
        let mut flags = self.tracker.lock();
        if let Some(state) = flags.get_mut(&self.key) {
            state.finish();
        }
        flags.remove(&self.key);
    }
}
