//! Per-screen data and scroll state.
//!
//! Each screen owns its feed, its viewport and its page loader, so switching
//! tabs keeps the scroll position and loaded rows of the other tabs.

use opsdesk::{ConsoleConfig, Feed, LoadResult, PageLoader, PageQuery, RowProvider, ViewportState};
use std::sync::Arc;

/// State of one console screen.
///
/// Responsibilities:
/// - Holding the rows fetched so far
/// - Holding the viewport (scroll offset, measured row heights)
/// - Issuing page requests and applying their results
/// - Remembering the last fetch error for the retry affordance
pub struct ScreenState {
    feed: Feed,
    viewport: ViewportState,
    loader: PageLoader,
    error: Option<String>,
}

impl ScreenState {
    pub fn new(config: &ConsoleConfig) -> Self {
        Self {
            feed: Feed::new(),
            viewport: ViewportState::from_config(config),
            loader: PageLoader::new(),
            error: None,
        }
    }

    // ===== Queries =====

    pub fn feed(&self) -> &Feed {
        &self.feed
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn is_loading(&self) -> bool {
        self.loader.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether a new page request may be issued now.
    pub fn can_fetch(&self) -> bool {
        !self.loader.is_loading() && self.error.is_none()
    }

    // ===== Mutations =====

    pub fn viewport_mut(&mut self) -> &mut ViewportState {
        &mut self.viewport
    }

    /// Requests the page after the last loaded row.
    ///
    /// # Arguments
    /// * `provider` - Current data source
    /// * `query` - Page query of this screen
    /// * `on_complete` - Called from the fetch thread once the result is ready
    pub fn request_next_page<P, F>(&mut self, provider: Arc<P>, query: PageQuery, on_complete: F)
    where
        P: RowProvider + ?Sized + 'static,
        F: FnOnce() + Send + 'static,
    {
        let cursor = self.feed.next_cursor().map(str::to_string);
        self.loader.request(provider, query, cursor, on_complete);
    }

    /// Applies a finished fetch, if any. Returns true if the screen changed.
    pub fn poll_loader(&mut self) -> bool {
        match self.loader.check_completion() {
            LoadResult::Page(page) => {
                self.feed.apply_page(page);
                self.error = None;
                true
            }
            LoadResult::Error(err) => {
                log::warn!("page fetch failed: {}", err);
                self.error = Some(err.to_string());
                true
            }
            LoadResult::Stale | LoadResult::None => false,
        }
    }

    /// Clears the error so the failed page is requested again.
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Drops all rows and cancels the request in flight.
    pub fn reset(&mut self) {
        self.loader.cancel();
        self.feed.reset();
        self.viewport.reset();
        self.error = None;
    }
}
