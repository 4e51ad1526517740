use crate::traits::{FoodService, Notifier};
use caltrack_core::toast::Toast;
use caltrack_core::types::FoodItem;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

const SEARCH_FAILED: &str = "Could not run the search";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    Loading,
    /// Nothing typed and nothing listed yet.
    Prompt,
    NoResults,
    Results,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SearchSnapshot {
    pub query: String,
    pub results: Vec<FoodItem>,
    pub is_loading: bool,
}

impl SearchSnapshot {
    pub fn status(&self) -> SearchStatus {
        if self.is_loading {
            SearchStatus::Loading
        } else if !self.results.is_empty() {
            SearchStatus::Results
        } else if self.query.is_empty() {
            SearchStatus::Prompt
        } else {
            SearchStatus::NoResults
        }
    }
}

#[derive(Default)]
struct SearchState {
    snapshot: SearchSnapshot,
    // Bumped on every keystroke; only the task holding the latest value may publish.
    seq: u64,
}

fn lock(state: &Mutex<SearchState>) -> MutexGuard<'_, SearchState> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}

/// Debounced food search.
///
/// Each `set_query` restarts a single timer; when it fires the query is sent. A newer
/// keystroke aborts the pending timer or in-flight request of the previous one, and a
/// response is only applied if its sequence number is still current.
pub struct SearchFlow {
    service: Arc<dyn FoodService>,
    notifier: Arc<dyn Notifier>,
    debounce: Duration,
    state: Arc<Mutex<SearchState>>,
    pending: Option<JoinHandle<()>>,
}

impl SearchFlow {
    /// Creates the flow and schedules the initial (empty-query) listing.
    ///
    /// Must be called within a tokio runtime.
    pub fn mount(
        service: Arc<dyn FoodService>,
        notifier: Arc<dyn Notifier>,
        debounce: Duration,
    ) -> Self {
        let mut flow = Self {
            service,
            notifier,
            debounce,
            state: Arc::new(Mutex::new(SearchState::default())),
            pending: None,
        };
        flow.set_query("");
        flow
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        let seq = {
            let mut st = lock(&self.state);
            st.seq += 1;
            st.snapshot.query = query.clone();
            // Whatever was loading is about to be aborted.
            st.snapshot.is_loading = false;
            st.seq
        };

        if let Some(prev) = self.pending.take() {
            prev.abort();
        }

        let task = SearchTask {
            service: self.service.clone(),
            notifier: self.notifier.clone(),
            state: self.state.clone(),
            seq,
            query,
            debounce: self.debounce,
        };
        self.pending = Some(tokio::spawn(task.run()));
    }

    pub fn query(&self) -> String {
        lock(&self.state).snapshot.query.clone()
    }

    pub fn snapshot(&self) -> SearchSnapshot {
        lock(&self.state).snapshot.clone()
    }

    pub fn status(&self) -> SearchStatus {
        lock(&self.state).snapshot.status()
    }

    /// The exact record at `index`, as returned by the backend.
    pub fn select(&self, index: usize) -> Option<FoodItem> {
        lock(&self.state).snapshot.results.get(index).cloned()
    }

    /// Waits for the pending timer and request (if any) to finish.
    pub async fn settle(&mut self) -> SearchSnapshot {
        if let Some(handle) = self.pending.take() {
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    log::error!("search task failed: {e}");
                }
            }
        }
        self.snapshot()
    }
}

impl Drop for SearchFlow {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

struct SearchTask {
    service: Arc<dyn FoodService>,
    notifier: Arc<dyn Notifier>,
    state: Arc<Mutex<SearchState>>,
    seq: u64,
    query: String,
    debounce: Duration,
}

impl SearchTask {
    async fn run(self) {
        tokio::time::sleep(self.debounce).await;

        {
            let mut st = lock(&self.state);
            if st.seq != self.seq {
                return;
            }
            st.snapshot.is_loading = true;
        }

        let result = self.service.search(&self.query).await;

        let failed = {
            let mut st = lock(&self.state);
            if st.seq != self.seq {
                log::debug!("dropping stale results for {:?}", self.query);
                return;
            }
            st.snapshot.is_loading = false;
            match result {
                Ok(items) => {
                    log::debug!("search {:?}: {} results", self.query, items.len());
                    st.snapshot.results = items;
                    None
                }
                Err(e) => {
                    st.snapshot.results.clear();
                    Some(e)
                }
            }
        };

        if let Some(e) = failed {
            log::warn!("search {:?} failed: {e}", self.query);
            self.notifier.notify(Toast::error(SEARCH_FAILED));
        }
    }
}
