//! Fetch orchestration between the image cache and the search client
//!
//! The `FetchOrchestrator` owns the only writable [`FetchState`]. A cached query
//! is answered immediately. Otherwise the search runs on a background tokio
//! task and its completion comes back over a channel; the owner applies it by
//! calling [`FetchOrchestrator::poll_completions`] or
//! [`FetchOrchestrator::settle`], so the state is only ever mutated from the
//! owner's context.

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::cache::ImageCache;
use crate::data::ImageResult;
use crate::search::{SearchClient, SearchError};

/// Where the current submission is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPhase {
    /// Nothing has been submitted yet
    Idle,
    /// Waiting for the search client
    Loading,
    /// Images are available
    Success,
    /// The search failed after all retries
    Failure,
}

/// Snapshot of the current search outcome, read-only outside this module
#[derive(Debug, Clone)]
pub struct FetchState {
    query: Option<String>,
    images: Vec<ImageResult>,
    phase: FetchPhase,
    error_message: Option<String>,
}

impl FetchState {
    fn idle() -> Self {
        Self {
            query: None,
            images: Vec::new(),
            phase: FetchPhase::Idle,
            error_message: None,
        }
    }

    /// Query of the latest submission
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Images of the latest successful fetch
    pub fn images(&self) -> &[ImageResult] {
        &self.images
    }

    pub fn phase(&self) -> FetchPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == FetchPhase::Loading
    }

    /// Human-readable message of the last failure
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}

/// Result of a background search, tagged with the submission it belongs to
#[derive(Debug)]
struct Completion {
    generation: u64,
    query: String,
    result: Result<Vec<ImageResult>, SearchError>,
}

/// Coordinates the image cache and the search client
///
/// Must be used from within a tokio runtime: uncached queries are searched on
/// a spawned task.
#[derive(Debug)]
pub struct FetchOrchestrator {
    state: FetchState,
    cache: ImageCache,
    client: Arc<SearchClient>,
    /// Incremented on every submission; older completions no longer own the state
    generation: u64,
    completion_tx: mpsc::UnboundedSender<Completion>,
    completion_rx: mpsc::UnboundedReceiver<Completion>,
}

impl FetchOrchestrator {
    /// Creates an orchestrator in the `Idle` state
    pub fn new(cache: ImageCache, client: SearchClient) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        Self {
            state: FetchState::idle(),
            cache,
            client: Arc::new(client),
            generation: 0,
            completion_tx,
            completion_rx,
        }
    }

    /// Current fetch state
    pub fn state(&self) -> &FetchState {
        &self.state
    }

    /// Read access to the cache, mainly for inspection
    pub fn cache(&self) -> &ImageCache {
        &self.cache
    }

    /// Starts fetching images for `query`
    ///
    /// A cached query moves straight to `Success` without any network request,
    /// however old the entry is. Otherwise the state becomes `Loading` and the
    /// search runs in the background; the outcome is applied by a later
    /// [`poll_completions`](Self::poll_completions) or [`settle`](Self::settle).
    ///
    /// A new submission supersedes any search still in flight: its completion
    /// is cached but no longer changes the state.
    pub fn fetch_images(&mut self, query: &str) {
        self.generation += 1;
        self.state.query = Some(query.to_string());

        if let Some(images) = self.cache.get(query) {
            tracing::info!(query, count = images.len(), "Serving search from cache");
            self.state.images = images;
            self.state.phase = FetchPhase::Success;
            self.state.error_message = None;
            return;
        }

        tracing::info!(query, generation = self.generation, "Searching for images");
        self.state.phase = FetchPhase::Loading;
        self.state.error_message = None;

        let client = Arc::clone(&self.client);
        let tx = self.completion_tx.clone();
        let generation = self.generation;
        let query = query.to_string();
        tokio::spawn(async move {
            let result = client.search(&query).await;
            // The receiver lives as long as the orchestrator
            let _ = tx.send(Completion {
                generation,
                query,
                result,
            });
        });
    }

    /// Applies every completion that has already arrived without waiting
    ///
    /// Returns true if the state changed.
    pub fn poll_completions(&mut self) -> bool {
        let mut changed = false;
        while let Ok(completion) = self.completion_rx.try_recv() {
            changed |= self.apply(completion);
        }
        changed
    }

    /// Waits until the current submission has finished loading
    ///
    /// Returns immediately when nothing is loading.
    pub async fn settle(&mut self) {
        while self.state.is_loading() {
            match self.completion_rx.recv().await {
                Some(completion) => {
                    self.apply(completion);
                }
                None => break,
            }
        }
    }

    /// Removes every cached search; the current state is left as is
    pub fn clear_cache(&mut self) {
        let removed = self.cache.clear();
        tracing::info!(removed, "Cleared search cache");
    }

    /// Applies one completion, returning true if the state changed
    fn apply(&mut self, completion: Completion) -> bool {
        let Completion {
            generation,
            query,
            result,
        } = completion;
        let is_current = generation == self.generation;

        match result {
            Ok(images) => {
                self.cache.put(&query, &images);
                if !is_current {
                    tracing::debug!(query = %query, generation, "Cached superseded search result");
                    return false;
                }
                self.state.images = images;
                self.state.phase = FetchPhase::Success;
                self.state.error_message = None;
                true
            }
            Err(e) => {
                if !is_current {
                    tracing::debug!(query = %query, generation, error = %e, "Dropped superseded search failure");
                    return false;
                }
                self.state.phase = FetchPhase::Failure;
                self.state.error_message = Some(format!("Error: {}", e));
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SearchBackend;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tempfile::TempDir;
    use tokio::sync::Notify;

    type Reply = Result<Vec<ImageResult>, ()>;

    /// Backend answering from a script, one reply per call
    struct ScriptedBackend {
        replies: Mutex<VecDeque<Reply>>,
        calls: AtomicUsize,
    }

    impl ScriptedBackend {
        fn new(replies: Vec<Reply>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    fn decode_error() -> SearchError {
        SearchError::Decode(serde_json::from_str::<serde_json::Value>("<html>").unwrap_err())
    }

    #[async_trait]
    impl SearchBackend for ScriptedBackend {
        async fn search_images(&self, _query: &str) -> Result<Vec<ImageResult>, SearchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let reply = self.replies.lock().unwrap().pop_front();
            match reply {
                Some(Ok(images)) => Ok(images),
                _ => Err(decode_error()),
            }
        }
    }

    /// Backend that waits for a signal before answering with the query as title
    struct GatedBackend {
        gates: Mutex<Vec<(String, Arc<Notify>)>>,
    }

    #[async_trait]
    impl SearchBackend for GatedBackend {
        async fn search_images(&self, query: &str) -> Result<Vec<ImageResult>, SearchError> {
            let gate = self
                .gates
                .lock()
                .unwrap()
                .iter()
                .find(|(q, _)| q == query)
                .map(|(_, gate)| Arc::clone(gate));
            if let Some(gate) = gate {
                gate.notified().await;
            }
            Ok(vec![ImageResult::new(query, "u", "s", "l")])
        }
    }

    fn pasta() -> Vec<ImageResult> {
        vec![ImageResult::new("Pasta", "u1", "s1", "l1")]
    }

    fn create_orchestrator(backend: Arc<dyn SearchBackend>) -> (FetchOrchestrator, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let cache = ImageCache::open(temp_dir.path());
        let client = SearchClient::with_backend(backend, 3);
        (FetchOrchestrator::new(cache, client), temp_dir)
    }

    #[tokio::test]
    async fn test_starts_idle() {
        let (orchestrator, _temp_dir) = create_orchestrator(ScriptedBackend::new(vec![]));
        let state = orchestrator.state();

        assert_eq!(state.phase(), FetchPhase::Idle);
        assert!(!state.is_loading());
        assert!(state.images().is_empty());
        assert!(state.error_message().is_none());
        assert!(state.query().is_none());
    }

    #[tokio::test]
    async fn test_uncached_query_loads_then_succeeds_and_caches() {
        let backend = ScriptedBackend::new(vec![Ok(pasta())]);
        let (mut orchestrator, _temp_dir) = create_orchestrator(backend.clone());

        orchestrator.fetch_images("Cuisine: Italian");
        assert!(orchestrator.state().is_loading());
        assert_eq!(orchestrator.state().phase(), FetchPhase::Loading);

        orchestrator.settle().await;

        let state = orchestrator.state();
        assert_eq!(state.phase(), FetchPhase::Success);
        assert!(!state.is_loading());
        assert_eq!(state.images(), pasta().as_slice());
        assert_eq!(state.query(), Some("Cuisine: Italian"));
        assert_eq!(orchestrator.cache().get("Cuisine: Italian"), Some(pasta()));
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_cached_query_never_hits_network() {
        let backend = ScriptedBackend::new(vec![Ok(pasta())]);
        let (mut orchestrator, _temp_dir) = create_orchestrator(backend.clone());

        orchestrator.fetch_images("q");
        orchestrator.settle().await;
        assert_eq!(backend.calls(), 1);

        orchestrator.fetch_images("q");

        // Answered synchronously, nothing to settle
        let state = orchestrator.state();
        assert_eq!(state.phase(), FetchPhase::Success);
        assert!(!state.is_loading());
        assert_eq!(state.images(), pasta().as_slice());
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_prepopulated_cache_short_circuits() {
        let backend = ScriptedBackend::new(vec![]);
        let temp_dir = TempDir::new().unwrap();
        let mut cache = ImageCache::open(temp_dir.path());
        cache.put("Diet: Vegetarian", &pasta());
        let mut orchestrator =
            FetchOrchestrator::new(cache, SearchClient::with_backend(backend.clone(), 3));

        orchestrator.fetch_images("Diet: Vegetarian");

        assert_eq!(orchestrator.state().images(), pasta().as_slice());
        assert!(orchestrator.state().error_message().is_none());
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_success_on_fourth_attempt() {
        let backend = ScriptedBackend::new(vec![Err(()), Err(()), Err(()), Ok(pasta())]);
        let (mut orchestrator, _temp_dir) = create_orchestrator(backend.clone());

        orchestrator.fetch_images("q");
        orchestrator.settle().await;

        assert_eq!(backend.calls(), 4);
        assert_eq!(orchestrator.state().phase(), FetchPhase::Success);
        assert_eq!(orchestrator.state().images(), pasta().as_slice());
    }

    #[tokio::test]
    async fn test_failure_after_four_attempts_keeps_images() {
        let backend = ScriptedBackend::new(vec![
            Ok(pasta()),
            Err(()),
            Err(()),
            Err(()),
            Err(()),
        ]);
        let (mut orchestrator, _temp_dir) = create_orchestrator(backend.clone());

        orchestrator.fetch_images("first");
        orchestrator.settle().await;
        orchestrator.fetch_images("second");
        orchestrator.settle().await;

        let state = orchestrator.state();
        assert_eq!(backend.calls(), 5);
        assert_eq!(state.phase(), FetchPhase::Failure);
        assert!(!state.is_loading());
        let message = state.error_message().expect("Should have an error message");
        assert!(message.starts_with("Error: "));
        assert!(message.len() > "Error: ".len());
        assert_eq!(state.images(), pasta().as_slice(), "Images stay from the last success");
        assert!(orchestrator.cache().get("second").is_none());
    }

    #[tokio::test]
    async fn test_new_fetch_clears_previous_error() {
        let backend = ScriptedBackend::new(vec![Err(()), Err(()), Err(()), Err(()), Ok(pasta())]);
        let (mut orchestrator, _temp_dir) = create_orchestrator(backend);

        orchestrator.fetch_images("q");
        orchestrator.settle().await;
        assert!(orchestrator.state().error_message().is_some());

        orchestrator.fetch_images("q");
        assert!(orchestrator.state().error_message().is_none());
        assert!(orchestrator.state().is_loading());

        orchestrator.settle().await;
        assert_eq!(orchestrator.state().phase(), FetchPhase::Success);
    }

    #[tokio::test]
    async fn test_clear_cache_keeps_state_and_forces_refetch() {
        let backend = ScriptedBackend::new(vec![Ok(pasta()), Ok(pasta())]);
        let (mut orchestrator, _temp_dir) = create_orchestrator(backend.clone());

        orchestrator.fetch_images("q");
        orchestrator.settle().await;
        orchestrator.clear_cache();

        assert_eq!(orchestrator.state().phase(), FetchPhase::Success);
        assert_eq!(orchestrator.state().images(), pasta().as_slice());
        assert!(orchestrator.cache().get("q").is_none());

        orchestrator.fetch_images("q");
        orchestrator.settle().await;
        assert_eq!(backend.calls(), 2);
    }

    #[tokio::test]
    async fn test_poll_completions_without_pending_work() {
        let (mut orchestrator, _temp_dir) = create_orchestrator(ScriptedBackend::new(vec![]));
        assert!(!orchestrator.poll_completions());
        orchestrator.settle().await;
        assert_eq!(orchestrator.state().phase(), FetchPhase::Idle);
    }

    #[tokio::test]
    async fn test_stale_completion_is_cached_but_not_shown() {
        let slow_gate = Arc::new(Notify::new());
        let backend = Arc::new(GatedBackend {
            gates: Mutex::new(vec![("slow".to_string(), Arc::clone(&slow_gate))]),
        });
        let (mut orchestrator, _temp_dir) = create_orchestrator(backend);

        orchestrator.fetch_images("slow");
        orchestrator.fetch_images("fast");
        orchestrator.settle().await;
        assert_eq!(orchestrator.state().images()[0].title, "fast");

        // Let the superseded search finish and wait for it to be cached
        slow_gate.notify_one();
        for _ in 0..100 {
            orchestrator.poll_completions();
            if orchestrator.cache().get("slow").is_some() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }

        assert_eq!(orchestrator.state().images()[0].title, "fast");
        assert_eq!(orchestrator.state().query(), Some("fast"));
        assert_eq!(orchestrator.cache().get("slow").unwrap()[0].title, "slow");
    }
}
