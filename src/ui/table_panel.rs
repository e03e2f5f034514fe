//! Table panel UI rendering
//!
//! Handles the central panel showing the active screen's records. Only the
//! rows of the visible range (plus overscan) are drawn; spacers above and
//! below stand in for the rest so the scroll bar reflects the full feed.

use crate::app::{AppState, FETCH_AHEAD_ROWS};
use crate::rendering::row_renderer;
use crate::ui::table_header;
use egui::{Color32, ScrollArea};
use std::time::Instant;

/// Result of table panel interactions that need to be handled by the application.
pub enum TablePanelInteraction {
    /// A row was clicked (index into the feed)
    RowClicked(usize),
    /// The visible range got close to the end of the loaded rows
    FetchMoreRequested,
    /// User asked to repeat a failed fetch
    RetryRequested,
}

/// Renders the complete table panel with header and virtualized rows.
pub fn render_table_panel(ui: &mut egui::Ui, state: &mut AppState) -> Option<TablePanelInteraction> {
    if state.source.provider().is_none() {
        ui.label("No data source. Open a dataset, generate synthetic data or connect to the backend.");
        return None;
    }

    let screen = state.active_screen();
    let spec = screen.table_spec();
    let mut interaction: Option<TablePanelInteraction> = None;

    table_header::render_table_header(ui, &mut state.layout, spec);
    ui.separator();

    let column_widths = state.layout.column_widths(spec);
    let selected = state.selection.selected_index(screen);
    let min_row_height = state.config.row_height;
    let screen_state = state.screen_state_mut(screen);

    // Apply throttled scroll and debounced resize input that came due
    let now = Instant::now();
    screen_state.viewport_mut().poll(now);

    if let Some(error) = screen_state.error() {
        ui.horizontal(|ui| {
            ui.colored_label(Color32::RED, format!("Fetch failed: {}", error));
            if ui.button("Retry").clicked() {
                interaction = Some(TablePanelInteraction::RetryRequested);
            }
        });
    }

    let feed = screen_state.feed();
    if feed.is_empty() {
        if screen_state.is_loading() {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading…");
            });
        } else if feed.pages_loaded() > 0 {
            ui.label("No records");
        }
        return interaction;
    }

    let item_count = feed.len();
    let range = screen_state.viewport().visible_range(item_count);

    let output = ScrollArea::both()
        .id_salt(("table_scroll_area", spec.table))
        .auto_shrink([false, false])
        .show(ui, |ui| {
            // Rows are placed back to back; offsets come from the height table
            ui.spacing_mut().item_spacing.y = 0.0;

            let mut measured = Vec::with_capacity(range.len());
            let mut clicked = None;

            if range.offset_top > 0.0 {
                ui.add_space(range.offset_top);
            }

            for (i, row) in feed.slice(&range).iter().enumerate() {
                let index = range.start_index + i;
                let response = row_renderer::render_row(
                    ui,
                    row,
                    spec,
                    &column_widths,
                    min_row_height,
                    selected == Some(index),
                    index % 2 == 1,
                );
                if response.clicked {
                    clicked = Some(index);
                }
                measured.push((index, response.height));
            }

            let bottom_padding = screen_state.viewport().bottom_padding(&range, item_count);
            if bottom_padding > 0.0 {
                ui.add_space(bottom_padding);
            }

            if screen_state.is_loading() {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading more…");
                });
            }

            (measured, clicked)
        });

    let (measured, clicked) = output.inner;
    if let Some(index) = clicked {
        interaction = Some(TablePanelInteraction::RowClicked(index));
    }

    let viewport = screen_state.viewport_mut();
    for (index, height) in measured {
        viewport.measure(index, height);
    }
    let offset = output.state.offset.y;
    if offset != viewport.scroll_offset() {
        viewport.on_scroll(offset, now);
    }
    if viewport.on_resize(output.inner_rect.height(), now) {
        ui.ctx().request_repaint();
    }

    if let Some(deadline) = viewport.next_deadline() {
        ui.ctx().request_repaint_after(deadline.saturating_duration_since(now));
    }

    if interaction.is_none()
        && screen_state.can_fetch()
        && screen_state.feed().should_fetch_more(&range, FETCH_AHEAD_ROWS)
    {
        interaction = Some(TablePanelInteraction::FetchMoreRequested);
    }

    interaction
}
