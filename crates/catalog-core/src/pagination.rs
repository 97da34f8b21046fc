use crate::source::PageSource;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Predicate applied to every fetched record before it is merged into the list
pub type ItemFilter<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Observable state of a growable list
#[derive(Debug, Clone, PartialEq)]
pub struct ListState<T> {
    pub items: Vec<T>,
    /// Initial load or refresh in flight
    pub is_loading: bool,
    /// Incremental load in flight
    pub is_loading_more: bool,
    pub current_page: u32,
    /// False once a page yields nothing after filtering. A heuristic, not a
    /// true end-of-catalog signal: a page whose titles were all filtered out
    /// also ends the list.
    pub can_load_more: bool,
    pub error: Option<String>,
    // The fetch that produced `error`, re-issued by `retry`
    failed: Option<Fetch>,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            is_loading: false,
            is_loading_more: false,
            current_page: 0,
            can_load_more: true,
            error: None,
            failed: None,
        }
    }
}

impl<T> ListState<T> {
    pub fn is_busy(&self) -> bool {
        self.is_loading || self.is_loading_more
    }

    fn begin(&mut self, fetch: Fetch) {
        match fetch.merge {
            Merge::Replace => self.is_loading = true,
            Merge::Append => self.is_loading_more = true,
        }
        self.error = None;
    }

    fn fail(&mut self, fetch: Fetch, error: String) {
        self.error = Some(error);
        self.failed = Some(fetch);
        self.is_loading = false;
        self.is_loading_more = false;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Merge {
    Replace,
    Append,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fetch {
    page: u32,
    merge: Merge,
}

impl Fetch {
    const FIRST_PAGE: Fetch = Fetch { page: 0, merge: Merge::Replace };

    /// Page 0 replaces the list, any later page extends it
    fn of_page(page: u32) -> Self {
        if page == 0 {
            Self::FIRST_PAGE
        } else {
            Fetch { page, merge: Merge::Append }
        }
    }
}

/// Paginated list controller.
///
/// Clones share one state. At most one fetch runs at a time; calls that
/// arrive while one is in flight return `false` without doing anything.
/// Fetches run on their own task, so dropping the future returned by
/// `refresh`, `load_more` or `retry` does not stop the fetch or leave the
/// list stuck in a loading state.
pub struct PaginatedList<T: Send + 'static> {
    source: Arc<dyn PageSource<T>>,
    filter: Option<ItemFilter<T>>,
    state: Arc<watch::Sender<ListState<T>>>,
}

impl<T: Send + 'static> Clone for PaginatedList<T> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            filter: self.filter.clone(),
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> PaginatedList<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(source: Arc<dyn PageSource<T>>) -> Self {
        let (state, _) = watch::channel(ListState::default());
        Self {
            source,
            filter: None,
            state: Arc::new(state),
        }
    }

    pub fn with_filter(mut self, filter: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        self.filter = Some(Arc::new(filter));
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<ListState<T>> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> ListState<T> {
        self.state.borrow().clone()
    }

    /// Reload from page 0, replacing the list on success
    pub async fn refresh(&self) -> bool {
        let started = self.state.send_if_modified(|s| {
            if s.is_busy() {
                return false;
            }
            s.begin(Fetch::FIRST_PAGE);
            true
        });

        if !started {
            debug!("Refresh ignored, a fetch is already in flight");
            return false;
        }

        self.run(Fetch::FIRST_PAGE).await;
        true
    }

    /// Fetch the next page and append it
    pub async fn load_more(&self) -> bool {
        let mut fetch = Fetch::FIRST_PAGE;
        let started = self.state.send_if_modified(|s| {
            if s.is_busy() || !s.can_load_more {
                return false;
            }
            s.current_page += 1;
            fetch = Fetch::of_page(s.current_page);
            s.begin(fetch);
            true
        });

        if !started {
            debug!("Load more ignored");
            return false;
        }

        self.run(fetch).await;
        true
    }

    /// Re-issue the fetch that failed last: a failed refresh reloads page 0,
    /// a failed load-more re-requests its page. With no failure on record the
    /// current page is fetched again.
    pub async fn retry(&self) -> bool {
        let mut fetch = Fetch::FIRST_PAGE;
        let started = self.state.send_if_modified(|s| {
            if s.is_busy() {
                return false;
            }
            fetch = s.failed.unwrap_or_else(|| Fetch::of_page(s.current_page));
            s.begin(fetch);
            true
        });

        if !started {
            debug!("Retry ignored, a fetch is already in flight");
            return false;
        }

        self.run(fetch).await;
        true
    }

    async fn run(&self, fetch: Fetch) {
        let this = self.clone();
        let task = tokio::spawn(async move { this.fetch(fetch).await });

        // Only a panicking page source gets here
        if let Err(e) = task.await {
            warn!(page = fetch.page, error = %e, "Page fetch task failed");
            self.state.send_modify(|s| s.fail(fetch, format!("Page fetch failed: {}", e)));
        }
    }

    async fn fetch(&self, fetch: Fetch) {
        let page = fetch.page;
        match self.source.fetch_page(page).await {
            Ok(items) => {
                let fetched = items.len();
                let kept: Vec<T> = match &self.filter {
                    Some(filter) => items.into_iter().filter(|item| filter(item)).collect(),
                    None => items,
                };
                let kept_count = kept.len();

                self.state.send_modify(|s| {
                    match fetch.merge {
                        Merge::Replace => {
                            s.items = kept;
                            s.current_page = 0;
                        }
                        Merge::Append => s.items.extend(kept),
                    }
                    s.can_load_more = kept_count > 0;
                    s.failed = None;
                    s.is_loading = false;
                    s.is_loading_more = false;
                });

                info!(page, fetched, kept = kept_count, "Loaded page");
                if kept_count == 0 {
                    debug!(page, fetched, "Page empty after filtering, no further pages will be requested");
                }
            }
            Err(e) => {
                warn!(page, error = %e, "Page fetch failed");
                self.state.send_modify(|s| s.fail(fetch, e.to_string()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use catalog_sources::{CatalogError, TransportError};
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;
    use tokio::sync::Notify;

    /// Pages keyed by number; listed pages block until `release` is notified
    #[derive(Default)]
    struct ScriptedPages {
        pages: Mutex<HashMap<u32, Result<Vec<i64>, CatalogError>>>,
        blocked: Mutex<HashSet<u32>>,
        release: Notify,
        calls: Mutex<Vec<u32>>,
    }

    impl ScriptedPages {
        fn page(&self, page: u32, result: Result<Vec<i64>, CatalogError>) {
            self.pages.lock().unwrap().insert(page, result);
        }

        fn block(&self, page: u32) {
            self.blocked.lock().unwrap().insert(page);
        }

        fn calls(&self) -> Vec<u32> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageSource<i64> for ScriptedPages {
        async fn fetch_page(&self, page: u32) -> Result<Vec<i64>, CatalogError> {
            self.calls.lock().unwrap().push(page);
            let blocked = self.blocked.lock().unwrap().contains(&page);
            if blocked {
                self.release.notified().await;
            }
            self.pages
                .lock()
                .unwrap()
                .get(&page)
                .cloned()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    fn network_error() -> CatalogError {
        CatalogError::Transport(TransportError::Timeout { url: "https://api.test/".to_string() })
    }

    fn list(source: &Arc<ScriptedPages>) -> PaginatedList<i64> {
        PaginatedList::new(source.clone())
    }

    #[tokio::test]
    async fn test_initial_state() {
        let source = Arc::new(ScriptedPages::default());
        let state = list(&source).snapshot();
        assert!(state.items.is_empty());
        assert!(state.can_load_more);
        assert_eq!(state.current_page, 0);
        assert!(!state.is_busy());
    }

    #[tokio::test]
    async fn test_refresh_then_load_more_appends_in_order() {
        let source = Arc::new(ScriptedPages::default());
        source.page(0, Ok(vec![1, 2, 3]));
        source.page(1, Ok(vec![4, 5]));
        let list = list(&source);

        assert!(list.refresh().await);
        let state = list.snapshot();
        assert_eq!(state.current_page, 0);
        assert_eq!(state.items, vec![1, 2, 3]);
        assert!(state.can_load_more);

        assert!(list.load_more().await);
        let state = list.snapshot();
        assert_eq!(state.current_page, 1);
        assert_eq!(state.items, vec![1, 2, 3, 4, 5]);
        assert_eq!(source.calls(), vec![0, 1]);
    }

    #[tokio::test]
    async fn test_refresh_replaces_items() {
        let source = Arc::new(ScriptedPages::default());
        source.page(0, Ok(vec![1]));
        source.page(1, Ok(vec![2]));
        let list = list(&source);

        list.refresh().await;
        list.load_more().await;
        source.page(0, Ok(vec![9, 8]));
        list.refresh().await;

        let state = list.snapshot();
        assert_eq!(state.items, vec![9, 8]);
        assert_eq!(state.current_page, 0);
    }

    #[tokio::test]
    async fn test_filter_applies_to_each_page() {
        let source = Arc::new(ScriptedPages::default());
        source.page(0, Ok(vec![1, 2, 3, 4]));
        source.page(1, Ok(vec![5, 6]));
        let list = list(&source).with_filter(|n| n % 2 == 0);

        list.refresh().await;
        list.load_more().await;
        assert_eq!(list.snapshot().items, vec![2, 4, 6]);
    }

    #[tokio::test]
    async fn test_filtered_empty_page_ends_list() {
        let source = Arc::new(ScriptedPages::default());
        source.page(0, Ok(vec![2]));
        source.page(1, Ok(vec![1, 3, 5]));
        source.page(2, Ok(vec![8]));
        let list = list(&source).with_filter(|n| n % 2 == 0);

        list.refresh().await;
        assert!(list.load_more().await);

        let state = list.snapshot();
        assert!(!state.can_load_more);
        assert_eq!(state.items, vec![2]);

        // Page 2 has usable records, but the heuristic stops here
        assert!(!list.load_more().await);
        assert_eq!(list.snapshot().current_page, 1);
        assert_eq!(source.calls(), vec![0, 1]);
    }

    #[tokio::test]
    async fn test_load_more_while_loading_more_is_noop() {
        let source = Arc::new(ScriptedPages::default());
        source.page(0, Ok(vec![1]));
        source.page(1, Ok(vec![2]));
        source.block(1);
        let list = list(&source);
        list.refresh().await;

        let mut rx = list.subscribe();
        let background = tokio::spawn({
            let list = list.clone();
            async move { list.load_more().await }
        });
        rx.wait_for(|s| s.is_loading_more).await.unwrap();

        let before = list.snapshot();
        assert!(!list.load_more().await);
        assert!(!list.refresh().await);
        assert!(!list.retry().await);
        let after = list.snapshot();
        assert_eq!(after.items.len(), before.items.len());
        assert_eq!(after.current_page, before.current_page);

        source.release.notify_one();
        assert!(background.await.unwrap());
        assert_eq!(list.snapshot().items, vec![1, 2]);
        assert_eq!(source.calls(), vec![0, 1]);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_items() {
        let source = Arc::new(ScriptedPages::default());
        source.page(0, Ok(vec![1, 2]));
        let list = list(&source);
        list.refresh().await;

        source.page(0, Err(network_error()));
        list.refresh().await;

        let state = list.snapshot();
        assert_eq!(state.items, vec![1, 2]);
        assert!(state.error.as_deref().unwrap().contains("timed out"));
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn test_retry_after_failed_load_more_targets_same_page() {
        let source = Arc::new(ScriptedPages::default());
        source.page(0, Ok(vec![1]));
        source.page(1, Err(network_error()));
        let list = list(&source);

        list.refresh().await;
        list.load_more().await;
        let state = list.snapshot();
        assert!(state.error.is_some());
        assert_eq!(state.current_page, 1);
        assert_eq!(state.items, vec![1]);

        source.page(1, Ok(vec![2]));
        assert!(list.retry().await);
        let state = list.snapshot();
        assert_eq!(state.items, vec![1, 2]);
        assert_eq!(state.error, None);
        assert_eq!(source.calls(), vec![0, 1, 1]);
    }

    #[tokio::test]
    async fn test_retry_after_failed_initial_load() {
        let source = Arc::new(ScriptedPages::default());
        source.page(0, Err(network_error()));
        let list = list(&source);

        list.refresh().await;
        assert!(list.snapshot().error.is_some());

        source.page(0, Ok(vec![7]));
        list.retry().await;
        let state = list.snapshot();
        assert_eq!(state.items, vec![7]);
        assert_eq!(state.current_page, 0);
        assert_eq!(source.calls(), vec![0, 0]);
    }

    #[tokio::test]
    async fn test_empty_first_page_disables_load_more() {
        let source = Arc::new(ScriptedPages::default());
        let list = list(&source);

        list.refresh().await;
        assert!(!list.snapshot().can_load_more);
        assert!(!list.load_more().await);
    }

    #[tokio::test]
    async fn test_retry_after_failed_refresh_reloads_first_page() {
        let source = Arc::new(ScriptedPages::default());
        source.page(0, Ok(vec![1]));
        source.page(1, Ok(vec![2]));
        let list = list(&source);

        list.refresh().await;
        list.load_more().await;
        assert_eq!(list.snapshot().current_page, 1);

        source.page(0, Err(network_error()));
        list.refresh().await;
        let state = list.snapshot();
        assert!(state.error.is_some());
        assert_eq!(state.items, vec![1, 2]);

        source.page(0, Ok(vec![9]));
        assert!(list.retry().await);
        let state = list.snapshot();
        assert_eq!(state.items, vec![9]);
        assert_eq!(state.current_page, 0);
        assert_eq!(state.error, None);
        assert_eq!(source.calls(), vec![0, 1, 0, 0]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_refresh_still_completes() {
        let source = Arc::new(ScriptedPages::default());
        source.page(0, Ok(vec![1]));
        source.page(1, Ok(vec![2]));
        source.block(0);
        let list = list(&source);

        let timed_out = tokio::time::timeout(std::time::Duration::from_millis(10), list.refresh()).await;
        assert!(timed_out.is_err());
        assert!(list.snapshot().is_loading);

        source.release.notify_one();
        let mut rx = list.subscribe();
        rx.wait_for(|s| !s.is_busy()).await.unwrap();

        assert_eq!(list.snapshot().items, vec![1]);
        assert!(list.load_more().await);
        assert_eq!(list.snapshot().items, vec![1, 2]);
    }

    struct PanickingPages;

    #[async_trait]
    impl PageSource<i64> for PanickingPages {
        async fn fetch_page(&self, page: u32) -> Result<Vec<i64>, CatalogError> {
            panic!("page {} exploded", page);
        }
    }

    #[tokio::test]
    async fn test_panicking_source_does_not_lock_list() {
        let list: PaginatedList<i64> = PaginatedList::new(Arc::new(PanickingPages));

        assert!(list.refresh().await);
        let state = list.snapshot();
        assert!(!state.is_busy());
        assert!(state.error.is_some());

        // Still accepts new fetches
        assert!(list.retry().await);
    }
}
