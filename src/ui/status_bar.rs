//! Status bar UI rendering
//!
//! Handles the bottom status bar showing memory use, the data source and the
//! active screen's feed progress.

use eframe::egui;
use egui::RichText;
use crate::app::AppState;
use crate::utils::{format_count, get_current_memory_mb, format_memory_mb};

/// Renders the status panel at the bottom of the window
///
/// # Arguments
/// * `ui` - The egui UI context for drawing
/// * `state` - Reference to application state
pub fn render_status_bar(ui: &mut egui::Ui, state: &AppState) {
    ui.horizontal(|ui| {
        // Always show memory usage first
        let memory_text = format_memory_mb(get_current_memory_mb());
        ui.label(RichText::new(&memory_text).strong());
        ui.label(RichText::new("|").strong());

        if state.source.provider().is_none() {
            ui.label(RichText::new("No data source").strong());
            return;
        }

        let source = match state.source.file_path() {
            Some(path) => format!("{} ({})", state.source.description(), path.display()),
            None => state.source.description().to_string(),
        };
        ui.label(RichText::new(source).strong());
        ui.label(RichText::new("|").strong());

        let screen = state.active_screen();
        match state.screen_state(screen) {
            Some(screen_state) => {
                let feed = screen_state.feed();
                let more = if feed.has_more() { "+" } else { "" };
                ui.label(RichText::new(format!(
                    "{} | Rows: {}{} | Pages: {}",
                    screen,
                    format_count(feed.len() as i64),
                    more,
                    feed.pages_loaded()
                )).strong());

                let range = screen_state.viewport().visible_range(feed.len());
                if !range.is_empty() {
                    ui.label(RichText::new(format!(
                        "| Rendering {}..{}",
                        range.start_index, range.end_index
                    )));
                }

                if screen_state.is_loading() {
                    ui.spinner();
                }
            }
            None => {
                ui.label(RichText::new(screen.to_string()).strong());
            }
        }
    });
}
