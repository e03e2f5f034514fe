//! Centralized application state for the console.
//!
//! Composed of focused state components, each keeping its invariants local
//! and exposing intent-revealing methods.

use crate::state::{LayoutState, ScreenState, SelectionState, SourceState};
use opsdesk::{ConsoleConfig, PageQuery, Screen};
use std::collections::HashMap;

pub struct AppState {
    /// Resolved console configuration
    pub config: ConsoleConfig,

    /// Current data source
    pub source: SourceState,

    /// Per-screen feeds and viewports, created on first visit
    screens: HashMap<Screen, ScreenState>,

    /// Screen shown in the central panel
    active_screen: Screen,

    pub selection: SelectionState,

    pub layout: LayoutState,

    /// Current error message to display (if any)
    pub error_message: Option<String>,
}

impl AppState {
    pub fn new(config: ConsoleConfig) -> Self {
        Self::with_layout(config, LayoutState::new(), Screen::default())
    }

    /// Creates the state with layout settings and last screen loaded from storage.
    pub fn with_layout(config: ConsoleConfig, layout: LayoutState, active_screen: Screen) -> Self {
        Self {
            config,
            source: SourceState::new(),
            screens: HashMap::new(),
            active_screen,
            selection: SelectionState::new(),
            layout,
            error_message: None,
        }
    }

    // ===== Queries =====

    pub fn active_screen(&self) -> Screen {
        self.active_screen
    }

    pub fn screen_state(&self, screen: Screen) -> Option<&ScreenState> {
        self.screens.get(&screen)
    }

    /// Page query of `screen` under the configured page size.
    pub fn query_for(&self, screen: Screen) -> PageQuery {
        screen.table_spec().query(self.config.page_size)
    }

    // ===== Mutations =====

    pub fn screen_state_mut(&mut self, screen: Screen) -> &mut ScreenState {
        let config = &self.config;
        self.screens
            .entry(screen)
            .or_insert_with(|| ScreenState::new(config))
    }

    /// All screen states created so far.
    pub fn screen_states_mut(&mut self) -> impl Iterator<Item = &mut ScreenState> {
        self.screens.values_mut()
    }

    pub fn set_active_screen(&mut self, screen: Screen) {
        self.active_screen = screen;
    }

    /// Resets everything derived from the data source.
    ///
    /// Cancels in-flight fetches so their results are discarded on arrival.
    pub fn reset_data_state(&mut self) {
        for screen in self.screens.values_mut() {
            screen.reset();
        }
        self.selection.clear();
        self.error_message = None;
    }
}
