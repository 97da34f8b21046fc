use super::{saved, Context};
use crate::output::Output;
use catalog_core::{DebouncedSearch, SearchState};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

pub async fn run_search(ctx: &Context, query: String, save: Option<i64>, output: &Output) -> Result<()> {
    let search = DebouncedSearch::new(Arc::new(ctx.client.clone()), ctx.config.search.debounce());

    let state = if query.trim().is_empty() {
        follow_stdin(&search, output).await?
    } else {
        search.set_query(query);
        search.submit().await;
        let state = search.snapshot();
        if let Some(error) = &state.error {
            return Err(eyre!("Search for '{}' failed: {}", state.query, error));
        }
        print_results(&state, output);
        state
    };

    if let Some(id) = save {
        saved::save_from(&state.results, id, output)?;
    }
    Ok(())
}

/// Treat every stdin line as the new contents of a search box. Results are
/// printed each time a debounced search completes; EOF submits whatever is
/// left so the last query is never lost.
async fn follow_stdin(search: &DebouncedSearch, output: &Output) -> Result<SearchState> {
    let mut updates = search.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut reported: Option<String> = None;

    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => {
                    debug!(query = %line, "Query edited");
                    search.set_query(line);
                }
                None => break,
            },
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                if unreported_result(&state, reported.as_deref()) {
                    report(&state, output);
                    reported = state.searched_query.clone();
                }
            }
        }
    }

    let mut state = search.snapshot();
    if !state.query.trim().is_empty() && state.searched_query.as_deref() != Some(state.query.as_str()) {
        search.submit().await;
        state = search.snapshot();
    }
    if unreported_result(&state, reported.as_deref()) {
        report(&state, output);
    }
    Ok(state)
}

/// The search for the current query has completed and was not printed yet.
/// Watch updates coalesce, so this looks at what was committed rather than
/// at loading transitions.
fn unreported_result(state: &SearchState, reported: Option<&str>) -> bool {
    match state.searched_query.as_deref() {
        Some(searched) => !state.is_loading && searched == state.query && reported != Some(searched),
        None => false,
    }
}

fn report(state: &SearchState, output: &Output) {
    match &state.error {
        Some(error) => output.error(format!("Search for '{}' failed: {}", state.query, error)),
        None => print_results(state, output),
    }
}

fn print_results(state: &SearchState, output: &Output) {
    if state.results.is_empty() && output.is_human() {
        output.info(format!("No results for '{}'", state.query));
        return;
    }
    output.titles(&state.results);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn committed(query: &str) -> SearchState {
        let mut state = SearchState::default();
        state.query = query.to_string();
        state.has_searched = true;
        state.searched_query = Some(query.to_string());
        state
    }

    #[test]
    fn test_completed_search_is_reported_once() {
        let state = committed("heat");
        assert!(unreported_result(&state, None));
        assert!(unreported_result(&state, Some("alien")));
        assert!(!unreported_result(&state, Some("heat")));
    }

    #[test]
    fn test_commit_seen_without_loading_transition_is_reported() {
        // Loading and done collapsed into one update
        let state = committed("alien");
        assert!(unreported_result(&state, Some("heat")));
    }

    #[test]
    fn test_stale_results_under_edited_query_are_held_back() {
        let mut state = committed("heat");
        state.query = "heath".to_string();
        assert!(!unreported_result(&state, None));

        let mut state = committed("heath");
        state.is_loading = true;
        assert!(!unreported_result(&state, None));

        assert!(!unreported_result(&SearchState::default(), None));
    }
}
