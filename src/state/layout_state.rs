//! UI layout state management.
//!
//! Column widths are kept per table so resizing one screen does not disturb
//! the others. Widths are persisted between sessions.

use opsdesk::TableSpec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Narrowest a column can be dragged to
pub const MIN_COLUMN_WIDTH: f32 = 40.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutState {
    /// Split ratio between table and details panel (0.0 to 1.0)
    split_ratio: f32,
    /// Column widths by table name
    column_widths: HashMap<String, Vec<f32>>,
    dark_mode: bool,
}

impl Default for LayoutState {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutState {
    pub fn new() -> Self {
        Self {
            split_ratio: 0.7,
            column_widths: HashMap::new(),
            dark_mode: true,
        }
    }

    /// Creates a layout state from persisted settings.
    pub fn with_settings(column_widths: HashMap<String, Vec<f32>>, dark_mode: bool) -> Self {
        Self {
            split_ratio: 0.7,
            column_widths,
            dark_mode,
        }
    }

    // ===== Layout Queries =====

    pub fn split_ratio(&self) -> f32 {
        self.split_ratio
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    /// Current column widths of `spec`; defaults when nothing valid is stored.
    pub fn column_widths(&self, spec: &TableSpec) -> Vec<f32> {
        match self.column_widths.get(spec.table) {
            Some(widths) if widths.len() == spec.columns.len() => widths.clone(),
            _ => spec.columns.iter().map(|c| c.width).collect(),
        }
    }

    /// All stored widths, for persistence.
    pub fn all_column_widths(&self) -> &HashMap<String, Vec<f32>> {
        &self.column_widths
    }

    // ===== Mutations =====

    /// Mutable widths of `spec`, created from the defaults when missing.
    pub(crate) fn column_widths_mut(&mut self, spec: &TableSpec) -> &mut Vec<f32> {
        let widths = self
            .column_widths
            .entry(spec.table.to_string())
            .or_default();
        if widths.len() != spec.columns.len() {
            *widths = spec.columns.iter().map(|c| c.width).collect();
        }
        widths
    }

    pub fn set_dark_mode(&mut self, dark_mode: bool) {
        self.dark_mode = dark_mode;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opsdesk::Screen;

    #[test]
    fn test_defaults_come_from_table_spec() {
        let layout = LayoutState::new();
        let spec = Screen::default().table_spec();
        let widths = layout.column_widths(spec);
        assert_eq!(widths.len(), spec.columns.len());
        assert_eq!(widths[0], spec.columns[0].width);
    }

    #[test]
    fn test_stale_widths_are_replaced() {
        let spec = Screen::default().table_spec();
        let mut stored = HashMap::new();
        stored.insert(spec.table.to_string(), vec![10.0]);
        let mut layout = LayoutState::with_settings(stored, false);
        assert_eq!(layout.column_widths(spec).len(), spec.columns.len());
        layout.column_widths_mut(spec)[1] = 333.0;
        assert_eq!(layout.column_widths(spec)[1], 333.0);
    }
}
