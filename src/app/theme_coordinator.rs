//! Light/dark visuals coordination.

use crate::app::AppState;

/// Applies the persisted dark mode preference to the egui context.
pub struct ThemeCoordinator;

impl ThemeCoordinator {
    /// Called every frame; only touches the context when the mode differs.
    pub fn apply_current_theme(ctx: &egui::Context, state: &AppState) {
        let dark_mode = state.layout.dark_mode();
        if ctx.style().visuals.dark_mode == dark_mode {
            return;
        }
        let visuals = if dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        ctx.set_visuals(visuals);
    }
}
