use crate::source::SearchSource;
use catalog_models::Title;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

/// Default quiet period between the last keystroke and the search
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub results: Vec<Title>,
    pub is_loading: bool,
    pub error: Option<String>,
    /// At least one search has completed since the query was last empty.
    /// Stays set while the query is edited, so earlier results remain on show.
    pub has_searched: bool,
    /// Query of the most recent completed search. Differs from `query` while
    /// an edit is waiting out the debounce or its search is in flight.
    pub searched_query: Option<String>,
    // Bumped by every query change and submit; only the search holding the
    // current value may write results.
    generation: u64,
}

/// Debounced search controller.
///
/// Query edits supersede any scheduled or running search. Clones share one state.
#[derive(Clone)]
pub struct DebouncedSearch {
    source: Arc<dyn SearchSource>,
    delay: Duration,
    state: Arc<watch::Sender<SearchState>>,
    pending: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl DebouncedSearch {
    pub fn new(source: Arc<dyn SearchSource>, delay: Duration) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self {
            source,
            delay,
            state: Arc::new(state),
            pending: Arc::new(Mutex::new(None)),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> SearchState {
        self.state.borrow().clone()
    }

    /// Update the query. An empty query clears results immediately; anything
    /// else schedules a search after the quiet period. Must be called within
    /// a tokio runtime.
    pub fn set_query(&self, query: impl Into<String>) {
        let query = query.into();
        let searchable = !query.trim().is_empty();

        let mut generation = 0;
        self.state.send_modify(|s| {
            s.generation += 1;
            generation = s.generation;
            s.query = query.clone();
            s.is_loading = false;
            if !searchable {
                s.results.clear();
                s.error = None;
                s.has_searched = false;
                s.searched_query = None;
            }
        });

        if searchable {
            let this = self.clone();
            let delay = self.delay;
            let handle = tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                this.run(generation, query).await;
            });
            self.replace_pending(Some(handle));
        } else {
            self.replace_pending(None);
        }
    }

    /// Search the current query now, skipping the quiet period
    pub async fn submit(&self) {
        let mut generation = 0;
        let mut query = String::new();
        self.state.send_modify(|s| {
            s.generation += 1;
            generation = s.generation;
            query = s.query.clone();
        });
        self.replace_pending(None);

        if query.trim().is_empty() {
            return;
        }
        self.run(generation, query).await;
    }

    /// Abort whatever search is scheduled, installing `next` in its place
    fn replace_pending(&self, next: Option<JoinHandle<()>>) {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = std::mem::replace(&mut *pending, next) {
            previous.abort();
        }
    }

    async fn run(&self, generation: u64, query: String) {
        let current = self.state.send_if_modified(|s| {
            if s.generation != generation {
                return false;
            }
            s.is_loading = true;
            s.error = None;
            true
        });
        if !current {
            return;
        }

        debug!(query = %query, "Searching");
        let result = self.source.search(&query).await;

        let committed = self.state.send_if_modified(|s| {
            if s.generation != generation {
                return false;
            }
            s.is_loading = false;
            s.has_searched = true;
            s.searched_query = Some(query.clone());
            match result {
                Ok(results) => s.results = results,
                Err(e) => s.error = Some(e.to_string()),
            }
            true
        });

        if !committed {
            debug!(query = %query, "Discarded results of superseded search");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use catalog_models::TitleKind;
    use catalog_sources::{CatalogError, TransportError};
    use tokio::time::sleep;

    /// Returns one title named after the query. "slow" takes a second,
    /// "fail" errors.
    #[derive(Default)]
    struct EchoSearch {
        queries: Mutex<Vec<String>>,
    }

    impl EchoSearch {
        fn queries(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }
    }

    fn title(name: &str) -> Title {
        Title {
            id: name.len() as i64,
            kind: TitleKind::Movie,
            title: name.to_string(),
            description: String::new(),
            year: 0,
            imdb: 0.0,
            rating: 0.0,
            duration: None,
            image: String::new(),
            cover: String::new(),
            genres: vec![],
            countries: vec![],
            sources: vec![],
        }
    }

    #[async_trait]
    impl SearchSource for EchoSearch {
        async fn search(&self, query: &str) -> Result<Vec<Title>, CatalogError> {
            self.queries.lock().unwrap().push(query.to_string());
            match query {
                "slow" => {
                    sleep(Duration::from_secs(1)).await;
                    Ok(vec![title("slow")])
                }
                "fail" => Err(CatalogError::Transport(TransportError::Status {
                    status: 502,
                    url: "https://api.test/api/search/fail/t/".to_string(),
                })),
                _ => Ok(vec![title(query)]),
            }
        }
    }

    fn controller(source: &Arc<EchoSearch>) -> DebouncedSearch {
        DebouncedSearch::new(source.clone(), DEFAULT_DEBOUNCE)
    }

    fn result_titles(search: &DebouncedSearch) -> Vec<String> {
        search.snapshot().results.into_iter().map(|t| t.title).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_edits_run_one_search() {
        let source = Arc::new(EchoSearch::default());
        let search = controller(&source);

        search.set_query("a");
        sleep(Duration::from_millis(100)).await;
        search.set_query("ab");
        sleep(Duration::from_millis(100)).await;
        search.set_query("abc");
        sleep(Duration::from_millis(600)).await;

        assert_eq!(source.queries(), vec!["abc".to_string()]);
        let state = search.snapshot();
        assert_eq!(state.query, "abc");
        assert!(state.has_searched);
        assert!(!state.is_loading);
        assert_eq!(result_titles(&search), vec!["abc".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_nothing_runs_before_quiet_period() {
        let source = Arc::new(EchoSearch::default());
        let search = controller(&source);

        search.set_query("heat");
        sleep(Duration::from_millis(499)).await;
        assert!(source.queries().is_empty());
        assert!(!search.snapshot().has_searched);

        sleep(Duration::from_millis(2)).await;
        assert_eq!(source.queries(), vec!["heat".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_query_clears_immediately() {
        let source = Arc::new(EchoSearch::default());
        let search = controller(&source);

        search.set_query("heat");
        sleep(Duration::from_millis(600)).await;
        assert_eq!(result_titles(&search), vec!["heat".to_string()]);

        search.set_query("ab");
        search.set_query("   ");
        let state = search.snapshot();
        assert!(state.results.is_empty());
        assert!(!state.has_searched);
        assert!(!state.is_loading);

        sleep(Duration::from_secs(2)).await;
        assert_eq!(source.queries(), vec!["heat".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_bypasses_delay_and_cancels_debounce() {
        let source = Arc::new(EchoSearch::default());
        let search = controller(&source);

        search.set_query("ronin");
        search.submit().await;
        assert_eq!(source.queries(), vec!["ronin".to_string()]);
        assert_eq!(result_titles(&search), vec!["ronin".to_string()]);

        sleep(Duration::from_secs(2)).await;
        assert_eq!(source.queries().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_search_never_writes() {
        let source = Arc::new(EchoSearch::default());
        let search = controller(&source);

        search.set_query("slow");
        let in_flight = tokio::spawn({
            let search = search.clone();
            async move { search.submit().await }
        });
        sleep(Duration::from_millis(100)).await;
        assert!(search.snapshot().is_loading);

        search.set_query("fast");
        sleep(Duration::from_secs(2)).await;
        in_flight.await.unwrap();

        assert_eq!(source.queries(), vec!["slow".to_string(), "fast".to_string()]);
        assert_eq!(result_titles(&search), vec!["fast".to_string()]);
        assert_eq!(search.snapshot().query, "fast");
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_keeps_previous_results() {
        let source = Arc::new(EchoSearch::default());
        let search = controller(&source);

        search.set_query("heat");
        search.submit().await;
        search.set_query("fail");
        search.submit().await;

        let state = search.snapshot();
        assert!(state.error.as_deref().unwrap().contains("502"));
        assert_eq!(result_titles(&search), vec!["heat".to_string()]);
        assert!(!state.is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_with_empty_query_does_nothing() {
        let source = Arc::new(EchoSearch::default());
        let search = controller(&source);

        search.submit().await;
        assert!(source.queries().is_empty());
        assert!(!search.snapshot().has_searched);
    }

    #[tokio::test(start_paused = true)]
    async fn test_edits_keep_previous_results_until_next_search() {
        let source = Arc::new(EchoSearch::default());
        let search = controller(&source);

        search.set_query("heat");
        search.submit().await;
        search.set_query("heath");

        let state = search.snapshot();
        assert!(state.has_searched);
        assert_eq!(state.searched_query.as_deref(), Some("heat"));
        assert_eq!(result_titles(&search), vec!["heat".to_string()]);

        sleep(Duration::from_millis(600)).await;
        let state = search.snapshot();
        assert_eq!(state.searched_query.as_deref(), Some("heath"));
        assert_eq!(result_titles(&search), vec!["heath".to_string()]);

        search.set_query("");
        let state = search.snapshot();
        assert!(!state.has_searched);
        assert_eq!(state.searched_query, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_search_is_recorded_against_its_query() {
        let source = Arc::new(EchoSearch::default());
        let search = controller(&source);

        search.set_query("fail");
        search.submit().await;
        let state = search.snapshot();
        assert_eq!(state.searched_query.as_deref(), Some("fail"));
        assert!(state.error.is_some());
    }
}
