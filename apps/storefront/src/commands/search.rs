//! # Search Commands
//!
//! Full search and the debounced suggestion box.
//!
//! ## Suggestions
//! ```text
//!  keystroke  "v"     "vi"    "vit"                       ""
//!     │        │       │        │                          │
//!     ▼        ▼       ▼        ▼                          ▼
//!  timer    [start]─x[start]─x[start]──300ms──► GET    cancel timer,
//!                                              search   publish [] (no request)
//!
//!  x = predecessor aborted before the successor is scheduled
//! ```
//!
//! Only the most recent input is looked up. Scheduling a successor aborts
//! the predecessor's task whether it is still waiting or already mid
//! lookup, so a stale result is never published over a newer one.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use pharmacy_client::ApiClient;
use pharmacy_core::validation::validate_search_query;
use pharmacy_core::{Product, SearchResults};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::commands::{load, Screen};
use crate::error::AppError;
use crate::AppContext;

/// Runs the full search screen query.
pub async fn search(ctx: &AppContext, query: &str) -> Screen<SearchResults> {
    load("search", async {
        let query = validate_search_query(query)?;
        debug!(query = %query, "search command");
        Ok::<_, AppError>(ctx.api().search(&query).await?)
    })
    .await
}

// =============================================================================
// Debouncer
// =============================================================================

/// Runs a task after its input has been quiet for `delay`.
///
/// Scheduling aborts the previous task first, including one that has
/// already fired and is still running, so at most one task is alive.
/// Dropping the debouncer aborts it too.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Debouncer {
            delay,
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    fn slot(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces any pending task with `task`, to run after the delay.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut slot = self.slot();
        if let Some(previous) = slot.take() {
            previous.abort();
        }

        let delay = self.delay;
        *slot = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        }));
    }

    /// Aborts the pending task, if any.
    pub fn cancel(&self) {
        if let Some(previous) = self.slot().take() {
            previous.abort();
        }
    }

    /// Whether a scheduled task has not finished yet.
    pub fn is_pending(&self) -> bool {
        self.slot().as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

// =============================================================================
// Suggestions
// =============================================================================

/// The search box's suggestion list.
///
/// Feed every keystroke to [`SearchSuggestions::on_input`]; read results
/// from [`SearchSuggestions::subscribe`]. Failed lookups publish an empty
/// list rather than an error.
#[derive(Debug)]
pub struct SearchSuggestions {
    client: ApiClient,
    debouncer: Debouncer,
    results: Arc<watch::Sender<Vec<Product>>>,
}

impl SearchSuggestions {
    pub fn new(client: ApiClient, delay: Duration) -> Self {
        let (results, _) = watch::channel(Vec::new());
        SearchSuggestions {
            client,
            debouncer: Debouncer::new(delay),
            results: Arc::new(results),
        }
    }

    /// Suggestions using the context's client and configured delay.
    pub fn from_context(ctx: &AppContext) -> Self {
        Self::new(ctx.api(), ctx.config.debounce())
    }

    /// Receiver of the latest suggestion list.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Product>> {
        self.results.subscribe()
    }

    /// The current suggestion list.
    pub fn current(&self) -> Vec<Product> {
        self.results.borrow().clone()
    }

    /// Handles one change of the search box text.
    pub fn on_input(&self, input: &str) {
        let query = match validate_search_query(input) {
            Ok(query) if !query.is_empty() => query,
            Ok(_) => {
                self.debouncer.cancel();
                self.results.send_replace(Vec::new());
                return;
            }
            Err(err) => {
                warn!(error = %err, "Ignoring search input");
                self.debouncer.cancel();
                self.results.send_replace(Vec::new());
                return;
            }
        };

        let client = self.client.clone();
        let results = Arc::clone(&self.results);
        self.debouncer.schedule(async move {
            let products = match client.search(&query).await {
                Ok(found) => found.products,
                Err(err) => {
                    warn!(query = %query, error = %err, "Suggestion lookup failed");
                    Vec::new()
                }
            };
            debug!(query = %query, suggestions = products.len(), "Suggestions updated");
            results.send_replace(products);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pharmacy_client::DEFAULT_TIMEOUT;

    fn recorder() -> Arc<Mutex<Vec<&'static str>>> {
        Arc::new(Mutex::new(Vec::new()))
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_the_last_timer_fires() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let fired = recorder();

        for query in ["v", "vi", "vit"] {
            let fired = Arc::clone(&fired);
            debouncer.schedule(async move { fired.lock().unwrap().push(query) });
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(*fired.lock().unwrap(), vec!["vit"]);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_the_quiet_period() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let fired = recorder();

        let sink = Arc::clone(&fired);
        debouncer.schedule(async move { sink.lock().unwrap().push("zinc") });

        tokio::time::sleep(Duration::from_millis(299)).await;
        assert!(fired.lock().unwrap().is_empty());
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(*fired.lock().unwrap(), vec!["zinc"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_successor_aborts_running_lookup() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let landed = recorder();

        let sink = Arc::clone(&landed);
        debouncer.schedule(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            sink.lock().unwrap().push("first");
        });

        // the first task has fired and is mid lookup
        tokio::time::sleep(Duration::from_millis(400)).await;
        let sink = Arc::clone(&landed);
        debouncer.schedule(async move { sink.lock().unwrap().push("second") });

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(*landed.lock().unwrap(), vec!["second"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_task() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let fired = recorder();

        let sink = Arc::clone(&fired);
        debouncer.schedule(async move { sink.lock().unwrap().push("zinc") });
        debouncer.cancel();

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(fired.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_input_clears_without_request() {
        // nothing listens on this port; a request would surface as a warning, not a result
        let client = ApiClient::new("http://127.0.0.1:9", DEFAULT_TIMEOUT).unwrap();
        let suggestions = SearchSuggestions::new(client, Duration::from_millis(300));

        suggestions.on_input("vitamin");
        suggestions.on_input("   ");

        assert!(!suggestions.debouncer.is_pending());
        assert!(suggestions.current().is_empty());
    }
}
