//! Panel orchestration and layout management.
//!
//! Coordinates all UI panels (header, table, details, status) and manages
//! their layout, resizing, and interaction coordination.

use crate::app::AppState;
use crate::ui::{details_panel, header, status_bar, table_panel};
use opsdesk::Screen;

/// Result of panel interactions that need to be handled by the application coordinator.
pub enum PanelInteraction {
    /// User requested to open a dataset file
    OpenFileRequested(std::path::PathBuf),
    /// User requested the synthetic dataset
    OpenSyntheticRequested,
    /// User requested to connect to the configured backend
    ConnectBackendRequested,
    /// User switched to another module or tab
    ScreenSelected(Screen),
    /// A table row was clicked
    RowClicked(usize),
    /// The active table needs its next page
    FetchMoreRequested,
    /// User asked to repeat the failed fetch
    RetryRequested,
    /// User asked to reload the active table
    RefreshRequested,
}

/// Manages the layout and rendering of all UI panels.
pub struct PanelManager;

impl PanelManager {
    /// Renders all panels in the application window.
    ///
    /// This is the main entry point for rendering the entire UI, called from
    /// the eframe::App::update() implementation.
    pub fn render_all_panels(ctx: &egui::Context, state: &mut AppState) -> Option<PanelInteraction> {
        let mut interaction: Option<PanelInteraction> = None;

        // Header panel at the top
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            if let Some(header_interaction) = header::render_header(ui, state) {
                interaction = Some(match header_interaction {
                    header::HeaderInteraction::OpenFileRequested(path) => {
                        PanelInteraction::OpenFileRequested(path)
                    }
                    header::HeaderInteraction::OpenSyntheticRequested => {
                        PanelInteraction::OpenSyntheticRequested
                    }
                    header::HeaderInteraction::ConnectBackendRequested => {
                        PanelInteraction::ConnectBackendRequested
                    }
                    header::HeaderInteraction::RefreshRequested => PanelInteraction::RefreshRequested,
                    header::HeaderInteraction::ScreenSelected(screen) => {
                        PanelInteraction::ScreenSelected(screen)
                    }
                });
            }
        });

        // Status panel at the very bottom
        egui::TopBottomPanel::bottom("status_panel").show(ctx, |ui| {
            status_bar::render_status_bar(ui, state);
        });

        // Details panel above status panel
        egui::TopBottomPanel::bottom("details_panel")
            .default_height(ctx.content_rect().height() * (1.0 - state.layout.split_ratio()))
            .resizable(true)
            .show(ctx, |ui| {
                egui::Frame::default().inner_margin(4.0).show(ui, |ui| {
                    details_panel::render_details_panel(ui, state);
                });
            });

        let table_frame = egui::Frame::default()
            .inner_margin(egui::Margin::same(4))
            .fill(ctx.style().visuals.panel_fill);

        egui::CentralPanel::default()
            .frame(table_frame)
            .show(ctx, |ui| {
                ui.heading(state.active_screen().to_string());
                ui.separator();

                if let Some(table_interaction) = table_panel::render_table_panel(ui, state) {
                    let mapped = match table_interaction {
                        table_panel::TablePanelInteraction::RowClicked(index) => {
                            PanelInteraction::RowClicked(index)
                        }
                        table_panel::TablePanelInteraction::FetchMoreRequested => {
                            PanelInteraction::FetchMoreRequested
                        }
                        table_panel::TablePanelInteraction::RetryRequested => {
                            PanelInteraction::RetryRequested
                        }
                    };
                    // Header clicks win over the automatic fetch-ahead
                    if interaction.is_none() {
                        interaction = Some(mapped);
                    }
                }
            });

        interaction
    }
}
