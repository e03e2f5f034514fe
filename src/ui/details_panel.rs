//! Details panel UI rendering
//!
//! Shows every field of the selected record, formatted by column kind.

use eframe::egui;
use egui::{Color32, RichText, ScrollArea};
use crate::app::AppState;
use crate::utils::format_cell;

/// Renders the details panel for the selected row of the active screen
///
/// # Arguments
/// * `ui` - The egui UI context for drawing
/// * `state` - Reference to application state
pub fn render_details_panel(ui: &mut egui::Ui, state: &AppState) {
    let screen = state.active_screen();
    let row = state
        .selection
        .selected_index(screen)
        .and_then(|index| state.screen_state(screen)?.feed().get(index));

    let Some(row) = row else {
        ui.label("Details (select a row to view)");
        return;
    };

    let spec = screen.table_spec();
    let id = format_cell(row.get(spec.id_field), opsdesk::ColumnKind::Id);
    ui.label(RichText::new(format!("{} {}", screen.tab_label(), id)).strong());
    ui.separator();

    ScrollArea::vertical()
        .id_salt("details_scroll_area")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            egui::Grid::new("details_grid")
                .num_columns(2)
                .striped(true)
                .show(ui, |ui| {
                    for column in spec.columns {
                        ui.label(RichText::new(column.title).strong());
                        let value = row.get(column.key);
                        if value.map_or(true, |v| v.is_null()) {
                            ui.colored_label(Color32::GRAY, "(empty)");
                        } else {
                            ui.add(egui::Label::new(format_cell(value, column.kind)).wrap());
                        }
                        ui.end_row();
                    }
                });
        });
}
