//! Table row rendering logic
//!
//! Draws one record as a row of cells using egui's painter API. Rows grow to
//! fit wrapped notes; the caller records the resulting height so the
//! virtualized list can place the following rows.

use eframe::egui;
use opsdesk::{ColumnKind, Row, TableSpec};

use crate::rendering::text_utils::{layout_wrapped, truncate_text_to_fit, CELL_PADDING};
use crate::utils::format_cell;

/// Vertical padding above and below wrapped text
const WRAP_PADDING: f32 = 3.0;

/// Outcome of drawing one row.
pub struct RowResponse {
    /// Height the row occupied, in points
    pub height: f32,
    pub clicked: bool,
}

/// Renders a single record row
///
/// # Arguments
/// * `ui` - The egui UI context for drawing
/// * `row` - Record to draw
/// * `spec` - Table whose columns decide cell order and formatting
/// * `column_widths` - Width of each column, in column order
/// * `min_height` - Height of a row without wrapped text
/// * `is_selected` - Whether to draw the selection background
/// * `striped` - Whether to draw the alternating background
///
/// # Returns
/// * `RowResponse` - Occupied height and click state
pub fn render_row(
    ui: &mut egui::Ui,
    row: &Row,
    spec: &TableSpec,
    column_widths: &[f32],
    min_height: f32,
    is_selected: bool,
    striped: bool,
) -> RowResponse {
    let font_id = egui::FontId::proportional(13.0);
    let text_color = ui.visuals().text_color();

    // Wrapped cells are laid out up front; they decide the row height
    let mut height = min_height;
    let mut wrapped = Vec::with_capacity(spec.columns.len());
    for (column, &width) in spec.columns.iter().zip(column_widths) {
        let galley = match column.kind {
            ColumnKind::Notes => {
                let text = format_cell(row.get(column.key), column.kind);
                let galley = layout_wrapped(&text, width, &font_id, text_color, ui.painter());
                height = height.max(galley.size().y + 2.0 * WRAP_PADDING);
                Some(galley)
            }
            _ => None,
        };
        wrapped.push(galley);
    }

    let total_width: f32 = column_widths.iter().sum();
    let (row_rect, response) = ui.allocate_exact_size(
        egui::vec2(ui.available_width().max(total_width), height),
        egui::Sense::click(),
    );

    let painter = ui.painter();
    if is_selected {
        painter.rect_filled(row_rect, 0.0, ui.visuals().selection.bg_fill);
    } else if striped {
        painter.rect_filled(row_rect, 0.0, ui.visuals().faint_bg_color);
    } else if response.hovered() {
        painter.rect_filled(row_rect, 0.0, ui.visuals().widgets.hovered.weak_bg_fill);
    }

    let mut x = row_rect.min.x;
    for ((column, &width), galley) in spec.columns.iter().zip(column_widths).zip(wrapped) {
        let cell_rect = egui::Rect::from_min_size(
            egui::pos2(x, row_rect.min.y),
            egui::vec2(width, min_height),
        );

        match galley {
            Some(galley) => {
                let pos = egui::pos2(x + CELL_PADDING / 2.0, row_rect.min.y + WRAP_PADDING);
                painter.galley(pos, galley, text_color);
            }
            None => {
                let text = format_cell(row.get(column.key), column.kind);
                let text = truncate_text_to_fit(&text, width, &font_id, painter);
                let (anchor, pos) = if column.kind.is_numeric() {
                    (egui::Align2::RIGHT_CENTER, cell_rect.right_center() - egui::vec2(CELL_PADDING / 2.0, 0.0))
                } else {
                    (egui::Align2::LEFT_CENTER, cell_rect.left_center() + egui::vec2(CELL_PADDING / 2.0, 0.0))
                };
                let color = match column.kind {
                    ColumnKind::Status(_) => ui.visuals().strong_text_color(),
                    _ => text_color,
                };
                painter.text(pos, anchor, text, font_id.clone(), color);
            }
        }

        x += width;
    }

    RowResponse {
        height,
        clicked: response.clicked(),
    }
}
