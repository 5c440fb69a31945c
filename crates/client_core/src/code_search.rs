use std::sync::Arc;

use shared::domain::{CodeSearchMatch, LegalDongSelection};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    error::{ErrorBanner, ErrorContext, UiError},
    fence::RequestFence,
    selection::SelectionSlot,
    source::RegionCodeSource,
};

pub const SEARCH_RESULT_LIMIT: usize = 30;

/// What the search panel should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchPanel {
    NeverSearched,
    Searching,
    Results(Vec<CodeSearchMatch>),
    Empty,
    Failed(UiError),
}

#[derive(Debug, Default)]
struct SearchState {
    query: String,
    results: Vec<CodeSearchMatch>,
    searched: bool,
    in_flight: bool,
    failed: Option<UiError>,
    fence: RequestFence,
}

pub struct CodeSearchController {
    source: Arc<dyn RegionCodeSource>,
    selection: SelectionSlot,
    banner: ErrorBanner,
    state: Mutex<SearchState>,
}

impl CodeSearchController {
    pub fn new(
        source: Arc<dyn RegionCodeSource>,
        selection: SelectionSlot,
        banner: ErrorBanner,
    ) -> Self {
        Self {
            source,
            selection,
            banner,
            state: Mutex::new(SearchState::default()),
        }
    }

    pub async fn set_query(&self, text: impl Into<String>) {
        self.state.lock().await.query = text.into();
    }

    pub async fn query(&self) -> String {
        self.state.lock().await.query.clone()
    }

    pub async fn results(&self) -> Vec<CodeSearchMatch> {
        self.state.lock().await.results.clone()
    }

    /// Sends the current query as typed, empty included. Only the latest search lands.
    pub async fn search(&self) {
        let (query, token) = {
            let mut state = self.state.lock().await;
            state.searched = true;
            state.in_flight = true;
            state.failed = None;
            (state.query.clone(), state.fence.issue())
        };
        self.banner.clear().await;

        let result = self.source.search_codes(&query, SEARCH_RESULT_LIMIT).await;

        let mut state = self.state.lock().await;
        if !state.fence.is_current(token) {
            debug!(query = %query, "discarding superseded search response");
            return;
        }
        state.in_flight = false;
        match result {
            Ok(matches) => {
                debug!(query = %query, count = matches.len(), "search results applied");
                state.results = matches;
            }
            Err(err) => {
                warn!(query = %query, %err, "legal-dong code search failed");
                state.results.clear();
                let err = UiError::from_source(ErrorContext::CodeSearch, err);
                state.failed = Some(err.clone());
                self.banner.show(err).await;
            }
        }
    }

    /// Adopts `matched` as the selected legal-dong, abolished codes included.
    pub async fn apply_match(&self, matched: &CodeSearchMatch) {
        match LegalDongSelection::try_from(matched) {
            Ok(selection) => {
                info!(
                    code = selection.code(),
                    status = matched.status.label(),
                    "legal-dong selected from search"
                );
                self.selection.replace(selection).await;
            }
            Err(err) => warn!(%err, "ignoring search match with unusable code"),
        }
    }

    /// Results win over everything; the last search's failure wins over the empty-results
    /// state and outlives banner changes made by other controllers.
    pub async fn panel(&self) -> SearchPanel {
        let state = self.state.lock().await;
        if !state.results.is_empty() {
            return SearchPanel::Results(state.results.clone());
        }
        if let Some(err) = &state.failed {
            return SearchPanel::Failed(err.clone());
        }
        if state.in_flight {
            SearchPanel::Searching
        } else if state.searched {
            SearchPanel::Empty
        } else {
            SearchPanel::NeverSearched
        }
    }
}

#[cfg(test)]
#[path = "tests/code_search_tests.rs"]
mod tests;
