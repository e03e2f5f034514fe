//! Table header component rendering
//!
//! Handles the rendering of resizable column headers for the active table.

use eframe::egui;
use egui::Color32;
use opsdesk::{SortDir, TableSpec};
use crate::rendering::text_utils::{truncate_text_to_fit, CELL_PADDING};
use crate::state::{LayoutState, MIN_COLUMN_WIDTH};

/// Height of the header row
pub const HEADER_HEIGHT: f32 = 24.0;

/// Renders the resizable column headers of `spec`
///
/// The sort column carries an arrow showing the feed's order.
///
/// # Arguments
/// * `ui` - The egui UI context for drawing
/// * `layout` - Layout state holding per-table column widths
/// * `spec` - Table whose columns are shown
pub fn render_table_header(ui: &mut egui::Ui, layout: &mut LayoutState, spec: &TableSpec) {
    let widths = layout.column_widths(spec);
    let total_width: f32 = widths.iter().sum();
    let start_pos = ui.cursor().min;

    // Reserve space for the entire header row
    let (_header_rect, _) = ui.allocate_exact_size(
        egui::vec2(ui.available_width().max(total_width), HEADER_HEIGHT),
        egui::Sense::hover(),
    );

    let font_id = egui::FontId::proportional(14.0);
    let mut x_offset = 0.0;

    for (i, column) in spec.columns.iter().enumerate() {
        let width = widths[i];
        let label_rect = egui::Rect::from_min_size(
            egui::pos2(start_pos.x + x_offset, start_pos.y),
            egui::vec2(width, HEADER_HEIGHT),
        );

        let title = if column.key == spec.sort_field {
            format!("{} {}", column.title, sort_arrow(spec.sort_dir))
        } else {
            column.title.to_string()
        };
        let truncated = truncate_text_to_fit(&title, width, &font_id, ui.painter());
        ui.painter().text(
            label_rect.left_center() + egui::vec2(CELL_PADDING / 2.0, 0.0),
            egui::Align2::LEFT_CENTER,
            truncated,
            font_id.clone(),
            ui.visuals().strong_text_color(),
        );

        x_offset += width;

        // Column resize handle
        if i < spec.columns.len() - 1 {
            let handle_width = 8.0;
            let handle_rect = egui::Rect::from_center_size(
                egui::pos2(start_pos.x + x_offset, start_pos.y + HEADER_HEIGHT / 2.0),
                egui::vec2(handle_width, HEADER_HEIGHT),
            );

            let handle_id = ui.id().with((spec.table, "header_resize", i));
            let handle_response = ui.interact(handle_rect, handle_id, egui::Sense::drag());

            if handle_response.dragged() {
                let delta = handle_response.drag_delta().x;
                let column_widths = layout.column_widths_mut(spec);
                column_widths[i] = (column_widths[i] + delta).max(MIN_COLUMN_WIDTH);
            }

            let color = if handle_response.hovered() || handle_response.dragged() {
                ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeHorizontal);
                Color32::from_rgb(100, 150, 255)
            } else {
                ui.visuals().widgets.noninteractive.bg_stroke.color.gamma_multiply(0.5)
            };

            ui.painter().rect_filled(handle_rect.shrink(2.0), 0.0, color);
        }
    }
}

fn sort_arrow(dir: SortDir) -> &'static str {
    match dir {
        SortDir::Asc => "↑",
        SortDir::Desc => "↓",
    }
}
