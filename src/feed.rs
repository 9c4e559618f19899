use std::sync::Arc;

use tokio::sync::watch;

use crate::merge::merge_sections;
use crate::source::ContentSource;
use crate::types::{HomeSectionsResponse, Section};

/// Snapshot of the home feed, replaced wholesale on every change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HomeFeedState {
    pub is_loading: bool,
    pub home_sections: Option<HomeSectionsResponse>,
    pub error: Option<String>,
}

/// Owns the page cursor and the accumulated sections, and publishes
/// [`HomeFeedState`] snapshots through a watch channel.
///
/// Methods take `&mut self`, so one orchestrator never has two fetches in
/// flight; callers firing `load_next` repeatedly as the user nears the end of
/// the list just re-run the last-page guard.
pub struct HomeFeed {
    source: Arc<dyn ContentSource>,
    current_page: u32,
    accumulated: Vec<Section>,
    state_tx: watch::Sender<HomeFeedState>,
}

impl HomeFeed {
    pub fn new(source: Arc<dyn ContentSource>) -> Self {
        let (state_tx, _) = watch::channel(HomeFeedState::default());
        Self {
            source,
            current_page: 1,
            accumulated: Vec::new(),
            state_tx,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<HomeFeedState> {
        self.state_tx.subscribe()
    }

    pub fn state(&self) -> HomeFeedState {
        self.state_tx.borrow().clone()
    }

    fn reached_last_page(&self) -> bool {
        self.state_tx
            .borrow()
            .home_sections
            .as_ref()
            .and_then(|feed| feed.pagination.as_ref())
            .map(|p| self.current_page >= p.total_pages)
            .unwrap_or(false)
    }

    /// Fetch the next page and fold it into the feed. No-op once the last
    /// page has been reached. Failures land in the snapshot, never here.
    pub async fn load_next(&mut self) {
        if self.reached_last_page() {
            return;
        }

        let page = self.current_page;
        if page == 1 {
            self.state_tx.send_modify(|s| {
                s.is_loading = true;
                s.error = None;
            });
        }

        tracing::debug!(source = self.source.name(), page, "loading home sections");
        match self.source.home_sections(page).await {
            Ok(response) => {
                // Advance only on success, so a failed page is refetched
                // rather than skipped.
                self.current_page += 1;
                self.accumulated = merge_sections(&self.accumulated, &response.sections);
                let feed = HomeSectionsResponse {
                    sections: self.accumulated.clone(),
                    pagination: response.pagination,
                };
                self.state_tx.send_replace(HomeFeedState {
                    is_loading: false,
                    home_sections: Some(feed),
                    error: None,
                });
            }
            Err(err) => {
                tracing::warn!(source = self.source.name(), page, error = %err, "home sections fetch failed");
                self.state_tx.send_modify(|s| {
                    s.is_loading = false;
                    s.error = Some(err.to_string());
                });
            }
        }
    }

    /// Restart pagination from page one. Sections accumulated so far are
    /// kept; a reload of page one appends its items onto them again.
    pub async fn retry(&mut self) {
        self.current_page = 1;
        self.load_next().await;
    }
}
