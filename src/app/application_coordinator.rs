//! Application-level coordination and workflow management.
//!
//! Handles data source switching, page fetching, error handling, and the
//! wiring between the UI panels and the per-screen state.

use crate::app::AppState;
use crate::io::{AsyncLoader, LoadResult};
use opsdesk::{DynRowProvider, RestProvider, RowProvider, Screen};
use std::path::PathBuf;
use std::sync::Arc;

/// Rows left below the rendered range before the next page is requested
pub const FETCH_AHEAD_ROWS: usize = 20;

/// Coordinates application-level operations and workflows.
///
/// This struct is responsible for:
/// - Managing dataset loading and backend connection
/// - Issuing page requests for the active screen
/// - Applying fetch results and surfacing errors
pub struct ApplicationCoordinator;

impl ApplicationCoordinator {
    /// Initiates asynchronous dataset loading.
    ///
    /// Immediately drops the previous source so stale rows are not shown.
    pub fn open_file(state: &mut AppState, loader: &mut AsyncLoader, path: PathBuf, ctx: &egui::Context) {
        state.reset_data_state();
        state.source.clear();
        loader.start_file_load(path, ctx);
    }

    /// Switches to the generated synthetic dataset.
    pub fn open_synthetic(state: &mut AppState, loader: &mut AsyncLoader) {
        let provider = loader.load_synthetic();
        Self::install_provider(state, provider, None);
    }

    /// Connects to the configured REST backend.
    pub fn connect_backend(state: &mut AppState) {
        let Some(backend) = state.config.backend.clone() else {
            state.error_message = Some("No backend configured".to_string());
            return;
        };
        match RestProvider::new(backend) {
            Ok(provider) => Self::install_provider(state, DynRowProvider::Rest(provider), None),
            Err(e) => state.error_message = Some(format!("Cannot connect: {}", e)),
        }
    }

    fn install_provider(state: &mut AppState, provider: DynRowProvider, path: Option<PathBuf>) {
        state.reset_data_state();
        log::info!("data source: {}", provider.describe());
        state.source.load_provider(provider, path);
    }

    /// Checks for dataset loading completion and applies the result.
    ///
    /// Called once per frame. Returns true if a load operation completed.
    pub fn check_loading_completion(state: &mut AppState, loader: &mut AsyncLoader) -> bool {
        match loader.check_completion() {
            LoadResult::Success { provider, path } => {
                Self::install_provider(state, provider, path);
                true
            }
            LoadResult::Error(error_msg) => {
                state.error_message = Some(format!("Error loading dataset: {}", error_msg));
                state.source.clear();
                true
            }
            LoadResult::None => false,
        }
    }

    /// Applies finished page fetches of every screen.
    ///
    /// Inactive screens are drained too so their stale results are discarded.
    pub fn poll_page_loaders(state: &mut AppState) -> bool {
        let mut changed = false;
        for screen in state.screen_states_mut() {
            changed |= screen.poll_loader();
        }
        changed
    }

    /// Requests the first page of the active screen if it has none yet.
    pub fn ensure_initial_page(state: &mut AppState, ctx: &egui::Context) {
        let screen = state.active_screen();
        let needs_load = state
            .screen_state(screen)
            .map_or(true, |s| s.feed().needs_initial_load() && s.can_fetch());
        if needs_load {
            Self::request_page(state, screen, ctx);
        }
    }

    /// Requests the next page of `screen` unless one is already in flight.
    pub fn request_page(state: &mut AppState, screen: Screen, ctx: &egui::Context) {
        let Some(provider) = state.source.provider().map(Arc::clone) else {
            return;
        };
        let query = state.query_for(screen);
        let screen_state = state.screen_state_mut(screen);
        if !screen_state.can_fetch() {
            return;
        }
        let ctx_handle = ctx.clone();
        screen_state.request_next_page(provider, query, move || ctx_handle.request_repaint());
    }

    /// Clears the active screen's error and repeats the failed request.
    pub fn retry(state: &mut AppState, ctx: &egui::Context) {
        let screen = state.active_screen();
        state.screen_state_mut(screen).clear_error();
        state.error_message = None;
        Self::request_page(state, screen, ctx);
    }

    /// Reloads the active screen from its first page.
    pub fn refresh(state: &mut AppState, ctx: &egui::Context) {
        let screen = state.active_screen();
        state.screen_state_mut(screen).reset();
        Self::request_page(state, screen, ctx);
    }

    pub fn select_screen(state: &mut AppState, screen: Screen) {
        state.set_active_screen(screen);
    }

    pub fn handle_row_click(state: &mut AppState, index: usize) {
        let screen = state.active_screen();
        state.selection.toggle(screen, index);
    }
}
