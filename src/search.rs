use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::timeout;

use crate::source::ContentSource;
use crate::types::{Remote, SearchResponse};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);

/// Snapshot of the search screen, replaced wholesale on every change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub is_loading: bool,
    pub results: Option<SearchResponse>,
    pub error: Option<String>,
    pub has_searched: bool,
}

/// Owns the query text and publishes [`SearchState`] snapshots.
///
/// Edits feed a background driver task that debounces, drops settled
/// duplicates, filters out blanks, and only then hits the fetch port. Must be
/// created inside a tokio runtime; the driver is aborted on drop.
///
/// A fetch already in flight is never cancelled: clearing the query resets
/// the snapshot immediately, but a late response may still land on top of it.
pub struct Search {
    source: Arc<dyn ContentSource>,
    query_tx: watch::Sender<String>,
    state_tx: Arc<watch::Sender<SearchState>>,
    driver: JoinHandle<()>,
}

impl Search {
    pub fn new(source: Arc<dyn ContentSource>) -> Self {
        Self::with_debounce(source, DEFAULT_DEBOUNCE)
    }

    pub fn with_debounce(source: Arc<dyn ContentSource>, window: Duration) -> Self {
        let (query_tx, query_rx) = watch::channel(String::new());
        let (state_tx, _) = watch::channel(SearchState::default());
        let state_tx = Arc::new(state_tx);
        let driver = tokio::spawn(run(
            Arc::clone(&source),
            query_rx,
            Arc::clone(&state_tx),
            window,
        ));
        Self {
            source,
            query_tx,
            state_tx,
            driver,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state_tx.subscribe()
    }

    pub fn state(&self) -> SearchState {
        self.state_tx.borrow().clone()
    }

    pub fn query(&self) -> String {
        self.query_tx.borrow().clone()
    }

    /// Record a keystroke's worth of query text. Blank input resets the
    /// snapshot right away and schedules nothing; anything else is picked up
    /// by the debounce loop.
    pub fn update_query(&self, query: &str) {
        self.query_tx.send_replace(query.to_string());
        if query.trim().is_empty() {
            self.state_tx.send_replace(SearchState::default());
        }
    }

    /// Re-run the current query immediately, bypassing the debounce window.
    /// No-op while the query is blank.
    pub async fn retry(&self) {
        let query = self.query();
        if query.trim().is_empty() {
            return;
        }
        dispatch(self.source.as_ref(), &self.state_tx, &query).await;
    }

    /// Reset the query and the snapshot, synchronously.
    pub fn clear_search(&self) {
        self.query_tx.send_replace(String::new());
        self.state_tx.send_replace(SearchState::default());
    }
}

impl Drop for Search {
    fn drop(&mut self) {
        self.driver.abort();
    }
}

async fn run(
    source: Arc<dyn ContentSource>,
    mut query_rx: watch::Receiver<String>,
    state_tx: Arc<watch::Sender<SearchState>>,
    window: Duration,
) {
    let mut last_settled: Option<String> = None;
    loop {
        if query_rx.changed().await.is_err() {
            return;
        }
        let mut candidate = query_rx.borrow_and_update().clone();

        // Debounce: every further edit restarts the window.
        loop {
            match timeout(window, query_rx.changed()).await {
                Ok(Ok(())) => candidate = query_rx.borrow_and_update().clone(),
                Ok(Err(_)) => return,
                Err(_) => break,
            }
        }

        // Distinct-until-changed over settled values, then the blank filter,
        // in that order: a settled blank never dispatches, but it does reset
        // the duplicate memory.
        if last_settled.as_deref() == Some(candidate.as_str()) {
            continue;
        }
        last_settled = Some(candidate.clone());
        if candidate.trim().is_empty() {
            continue;
        }

        dispatch(source.as_ref(), &state_tx, &candidate).await;
    }
}

async fn dispatch(
    source: &dyn ContentSource,
    state_tx: &watch::Sender<SearchState>,
    query: &str,
) {
    tracing::debug!(source = source.name(), query, "dispatching search");
    apply(state_tx, Remote::Loading);
    let outcome = match source.search(query).await {
        Ok(response) => Remote::Success(response),
        Err(err) => Remote::Error(err),
    };
    apply(state_tx, outcome);
}

/// Fold one fetch outcome into the published snapshot.
fn apply(state_tx: &watch::Sender<SearchState>, outcome: Remote<SearchResponse>) {
    match outcome {
        Remote::Loading => state_tx.send_modify(|s| {
            s.is_loading = true;
            s.error = None;
        }),
        Remote::Success(response) => state_tx.send_modify(|s| {
            s.is_loading = false;
            s.results = Some(response);
            s.error = None;
            s.has_searched = true;
        }),
        Remote::Error(err) => state_tx.send_modify(|s| {
            s.is_loading = false;
            s.error = Some(err.to_string());
            s.has_searched = true;
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tokio::time::sleep;

    use super::*;
    use crate::error::{FeedError, Result};
    use crate::types::HomeSectionsResponse;

    struct StubSearch {
        responses: Mutex<VecDeque<Result<SearchResponse>>>,
        queries: Mutex<Vec<String>>,
        delay: Option<Duration>,
    }

    impl std::fmt::Debug for StubSearch {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("StubSearch").finish_non_exhaustive()
        }
    }

    impl StubSearch {
        fn new(responses: Vec<Result<SearchResponse>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                queries: Mutex::new(Vec::new()),
                delay: None,
            })
        }

        fn slow(responses: Vec<Result<SearchResponse>>, delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                queries: Mutex::new(Vec::new()),
                delay: Some(delay),
            })
        }

        fn queries(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }
    }

    fn empty_response(query: &str) -> SearchResponse {
        SearchResponse {
            results: vec![],
            total_count: 0,
            query: query.to_string(),
        }
    }

    #[async_trait]
    impl ContentSource for StubSearch {
        fn name(&self) -> &str {
            "stub"
        }

        async fn home_sections(&self, _page: u32) -> Result<HomeSectionsResponse> {
            unreachable!("search tests never load the feed")
        }

        async fn search(&self, query: &str) -> Result<SearchResponse> {
            self.queries.lock().unwrap().push(query.to_string());
            if let Some(delay) = self.delay {
                sleep(delay).await;
            }
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(empty_response(query)))
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[tokio::test(start_paused = true)]
    async fn blank_query_resets_synchronously_without_dispatch() {
        let source = StubSearch::new(vec![]);
        let search = Search::new(source.clone());

        search.update_query("   ");
        assert_eq!(search.state(), SearchState::default());

        sleep(ms(500)).await;
        assert!(source.queries().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn debounce_collapses_rapid_edits_into_one_dispatch() {
        let source = StubSearch::new(vec![]);
        let search = Search::new(source.clone());

        search.update_query("a");
        sleep(ms(50)).await;
        search.update_query("ab");
        sleep(ms(70)).await;
        search.update_query("abc");

        // Inside the window nothing reaches the port.
        sleep(ms(190)).await;
        assert!(source.queries().is_empty());

        sleep(ms(20)).await;
        assert_eq!(source.queries(), vec!["abc"]);
    }

    #[tokio::test(start_paused = true)]
    async fn settled_duplicates_dispatch_once() {
        let source = StubSearch::new(vec![]);
        let search = Search::new(source.clone());

        search.update_query("x");
        sleep(ms(250)).await;
        search.update_query("x");
        sleep(ms(250)).await;
        search.update_query("y");
        sleep(ms(250)).await;

        assert_eq!(source.queries(), vec!["x", "y"]);
    }

    #[tokio::test(start_paused = true)]
    async fn loading_is_visible_while_the_fetch_is_in_flight() {
        let source = StubSearch::slow(vec![Ok(empty_response("q"))], ms(50));
        let search = Search::new(source.clone());

        search.update_query("q");
        sleep(ms(220)).await;
        let state = search.state();
        assert!(state.is_loading);
        assert!(state.error.is_none());
        assert!(!state.has_searched);

        sleep(ms(50)).await;
        let state = search.state();
        assert!(!state.is_loading);
        assert!(state.has_searched);
        assert_eq!(state.results, Some(empty_response("q")));
    }

    #[tokio::test(start_paused = true)]
    async fn failure_keeps_results_and_surfaces_the_message() {
        let source = StubSearch::new(vec![
            Ok(empty_response("ok")),
            Err(FeedError::Http {
                status: 500,
                message: "Internal Server Error".into(),
            }),
        ]);
        let search = Search::new(source.clone());

        search.update_query("ok");
        sleep(ms(250)).await;
        search.update_query("bad");
        sleep(ms(250)).await;

        let state = search.state();
        assert!(!state.is_loading);
        assert_eq!(state.error.as_deref(), Some("HTTP 500: Internal Server Error"));
        // The previous results stay on screen next to the error.
        assert_eq!(state.results, Some(empty_response("ok")));
        assert!(state.has_searched);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_result_set_still_counts_as_a_search() {
        let source = StubSearch::new(vec![Ok(empty_response("test"))]);
        let search = Search::new(source.clone());

        search.update_query("test");
        sleep(ms(250)).await;

        let state = search.state();
        assert!(!state.is_loading);
        assert!(state.error.is_none());
        assert!(state.has_searched);
        assert_eq!(state.results, Some(empty_response("test")));
    }

    #[tokio::test(start_paused = true)]
    async fn retry_bypasses_the_debounce_window() {
        let source = StubSearch::new(vec![]);
        let search = Search::new(source.clone());

        search.update_query("q");
        search.retry().await;

        assert_eq!(source.queries(), vec!["q"]);
    }

    #[tokio::test(start_paused = true)]
    async fn retry_on_blank_query_does_nothing() {
        let source = StubSearch::new(vec![]);
        let search = Search::new(source.clone());

        search.retry().await;

        assert!(source.queries().is_empty());
        assert!(!search.state().has_searched);
    }

    #[tokio::test(start_paused = true)]
    async fn clear_search_resets_query_and_state() {
        let source = StubSearch::new(vec![]);
        let search = Search::new(source.clone());

        search.update_query("books");
        sleep(ms(250)).await;
        assert!(search.state().has_searched);

        search.clear_search();
        assert_eq!(search.query(), "");
        assert_eq!(search.state(), SearchState::default());
    }

    #[tokio::test(start_paused = true)]
    async fn same_query_after_a_blank_dispatches_again() {
        let source = StubSearch::new(vec![]);
        let search = Search::new(source.clone());

        search.update_query("x");
        sleep(ms(250)).await;
        search.update_query("");
        sleep(ms(250)).await;
        search.update_query("x");
        sleep(ms(250)).await;

        assert_eq!(source.queries(), vec!["x", "x"]);
    }
}
