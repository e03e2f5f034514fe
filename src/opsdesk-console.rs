//! Opsdesk Console GUI Application
//!
//! Interactive console for browsing CRM/ERP records using the egui framework.
//! The console features:
//! - Module and tab navigation (Sales, Finance, Compliance, People, Projects, Admin)
//! - Virtualized tables that only draw the rows in view
//! - Cursor-paginated loading from a REST backend or an offline dataset
//! - Asynchronous loading with loading indicators and retry on failure
//! - Persistent column widths, dark mode and last visited screen

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]
//!
//! The application is built with a modular architecture:
//! - `app/` - Application state management and coordination
//! - `io/` - Dataset file loading
//! - `utils/` - Utility functions for formatting
//! - `ui/` - UI panel rendering and interaction
//! - `rendering/` - Low-level rendering for table rows
//! - `state/` - State management for screens, selection and layout

use eframe::egui;
use opsdesk::ConsoleConfig;
use std::path::PathBuf;

mod utils;
mod io;
mod app;
mod rendering;
mod ui;
mod state;

use app::{AppState, ApplicationCoordinator, SettingsCoordinator, ThemeCoordinator};
use io::AsyncLoader;
use ui::panel_manager::{PanelInteraction, PanelManager};

/// Command-line arguments: `[--config PATH] [DATASET]`
struct Args {
    config_path: Option<PathBuf>,
    dataset: Option<PathBuf>,
}

fn parse_args() -> Args {
    let mut args = Args {
        config_path: None,
        dataset: None,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => args.config_path = iter.next().map(PathBuf::from),
            _ => args.dataset = Some(PathBuf::from(arg)),
        }
    }
    args
}

/// Main application entry point that initializes and launches the console GUI.
fn main() -> eframe::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = parse_args();
    let config = match ConsoleConfig::load(args.config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}; using defaults", e);
            ConsoleConfig::default()
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_title("Opsdesk Console"),
        ..Default::default()
    };

    eframe::run_native(
        "Opsdesk Console",
        options,
        Box::new(move |cc| Ok(Box::new(OpsdeskApp::new(cc, config, args.dataset)))),
    )
}

/// The main console application.
///
/// Delegates most functionality to coordinators:
/// - `ApplicationCoordinator` handles data sources, page fetching and interactions
/// - `SettingsCoordinator` handles persistence of layout preferences
/// - `PanelManager` handles UI panel layout and rendering
struct OpsdeskApp {
    /// Centralized application state
    state: AppState,
    /// Asynchronous dataset loader
    loader: AsyncLoader,
    /// Optional dataset to load on first frame
    pending_file_load: Option<PathBuf>,
    /// Whether to connect to the configured backend on first frame
    pending_connect: bool,
}

impl OpsdeskApp {
    /// Creates the console with layout settings loaded from persistent storage.
    /// A dataset given on the command line takes precedence over the backend.
    fn new(cc: &eframe::CreationContext, config: ConsoleConfig, initial_file: Option<PathBuf>) -> Self {
        let layout = SettingsCoordinator::load_layout(cc.storage);
        let last_screen = SettingsCoordinator::load_last_screen(cc.storage);
        let pending_connect = initial_file.is_none() && config.backend.is_some();

        Self {
            state: AppState::with_layout(config, layout, last_screen),
            loader: AsyncLoader::new(),
            pending_file_load: initial_file,
            pending_connect,
        }
    }

    /// Handles panel interactions by delegating to ApplicationCoordinator.
    fn handle_panel_interaction(&mut self, interaction: PanelInteraction, ctx: &egui::Context) {
        match interaction {
            PanelInteraction::OpenFileRequested(path) => {
                ApplicationCoordinator::open_file(&mut self.state, &mut self.loader, path, ctx);
            }
            PanelInteraction::OpenSyntheticRequested => {
                ApplicationCoordinator::open_synthetic(&mut self.state, &mut self.loader);
            }
            PanelInteraction::ConnectBackendRequested => {
                ApplicationCoordinator::connect_backend(&mut self.state);
            }
            PanelInteraction::ScreenSelected(screen) => {
                ApplicationCoordinator::select_screen(&mut self.state, screen);
            }
            PanelInteraction::RowClicked(index) => {
                ApplicationCoordinator::handle_row_click(&mut self.state, index);
            }
            PanelInteraction::FetchMoreRequested => {
                let screen = self.state.active_screen();
                ApplicationCoordinator::request_page(&mut self.state, screen, ctx);
            }
            PanelInteraction::RetryRequested => {
                ApplicationCoordinator::retry(&mut self.state, ctx);
            }
            PanelInteraction::RefreshRequested => {
                ApplicationCoordinator::refresh(&mut self.state, ctx);
            }
        }
    }
}

impl eframe::App for OpsdeskApp {
    /// Called when the app is being shut down - ensures preferences are saved.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        SettingsCoordinator::save_console_settings(storage, &self.state);
    }

    /// Main update loop that renders all UI panels and handles application state.
    ///
    /// 1. Pick up finished dataset loads and page fetches
    /// 2. Apply light/dark visuals
    /// 3. Load the command-line dataset or connect the backend (first frame only)
    /// 4. Request the first page of the active screen if needed
    /// 5. Render all panels via PanelManager and handle their interactions
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ApplicationCoordinator::check_loading_completion(&mut self.state, &mut self.loader);
        ApplicationCoordinator::poll_page_loaders(&mut self.state);

        ThemeCoordinator::apply_current_theme(ctx, &self.state);

        if let Some(path) = self.pending_file_load.take() {
            ApplicationCoordinator::open_file(&mut self.state, &mut self.loader, path, ctx);
        } else if std::mem::take(&mut self.pending_connect) {
            ApplicationCoordinator::connect_backend(&mut self.state);
        }

        ApplicationCoordinator::ensure_initial_page(&mut self.state, ctx);

        if let Some(interaction) = PanelManager::render_all_panels(ctx, &mut self.state) {
            self.handle_panel_interaction(interaction, ctx);
        }

        if self.loader.is_loading() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}
