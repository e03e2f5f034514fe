//! Header panel UI rendering
//!
//! Handles the top bar with data source controls, module and tab navigation,
//! and the dark mode toggle.

use eframe::egui;
use egui::Color32;
use opsdesk::Screen;
use std::path::PathBuf;
use crate::app::AppState;

/// Result of user interaction with the header panel
pub enum HeaderInteraction {
    /// User picked a dataset file
    OpenFileRequested(PathBuf),
    /// User clicked "Synthetic"
    OpenSyntheticRequested,
    /// User clicked "Connect"
    ConnectBackendRequested,
    /// User clicked "Refresh"
    RefreshRequested,
    /// User picked a module or a tab
    ScreenSelected(Screen),
}

/// Renders the application header
///
/// # Arguments
/// * `ui` - The egui UI context for drawing
/// * `state` - Mutable reference to application state
///
/// # Returns
/// * `Option<HeaderInteraction>` - User interaction result
pub fn render_header(ui: &mut egui::Ui, state: &mut AppState) -> Option<HeaderInteraction> {
    let mut interaction = None;
    let active = state.active_screen();

    ui.horizontal(|ui| {
        if ui.button("📁 Open Dataset").clicked() {
            let mut dialog = rfd::FileDialog::new()
                .add_filter("Datasets", &["jsonl", "br"]);

            if let Ok(cwd) = std::env::current_dir() {
                dialog = dialog.set_directory(cwd);
            }

            if let Some(path) = dialog.pick_file() {
                interaction = Some(HeaderInteraction::OpenFileRequested(path));
            }
        }

        if ui.button("🎲 Synthetic").clicked() {
            interaction = Some(HeaderInteraction::OpenSyntheticRequested);
        }

        let connect = ui.add_enabled(state.config.backend.is_some(), egui::Button::new("🔌 Connect"));
        if connect.clicked() {
            interaction = Some(HeaderInteraction::ConnectBackendRequested);
        }
        connect.on_disabled_hover_text("Set OPSDESK_ENDPOINT_URL and OPSDESK_PUBLIC_KEY, or a backend in the config file");

        if ui
            .add_enabled(state.source.provider().is_some(), egui::Button::new("⟳ Refresh"))
            .clicked()
        {
            interaction = Some(HeaderInteraction::RefreshRequested);
        }

        ui.separator();

        for module in Screen::MODULES {
            if ui
                .selectable_label(active.same_module(module), module.module_label())
                .clicked()
                && !active.same_module(module)
            {
                interaction = Some(HeaderInteraction::ScreenSelected(module));
            }
        }

        // Push the dark mode toggle to the right
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let mut dark_mode = state.layout.dark_mode();
            if ui.checkbox(&mut dark_mode, "Dark").changed() {
                state.layout.set_dark_mode(dark_mode);
                ui.ctx().request_repaint();
            }
        });
    });

    ui.horizontal(|ui| {
        for tab in active.tabs() {
            if ui.selectable_label(tab == active, tab.tab_label()).clicked() && tab != active {
                interaction = Some(HeaderInteraction::ScreenSelected(tab));
            }
        }
    });

    if let Some(err) = &state.error_message {
        ui.colored_label(Color32::RED, err);
    }

    interaction
}
