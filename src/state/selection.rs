//! Row selection state.

use opsdesk::Screen;

/// Selected row, remembered per screen.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    selected: Option<(Screen, usize)>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    // ===== Selection Queries =====

    /// Selected feed index on `screen`, if any.
    pub fn selected_index(&self, screen: Screen) -> Option<usize> {
        match self.selected {
            Some((s, index)) if s == screen => Some(index),
            _ => None,
        }
    }

    // ===== Selection Mutations =====

    /// Selects a row, or clears the selection if it was already selected.
    pub fn toggle(&mut self, screen: Screen, index: usize) {
        if self.selected == Some((screen, index)) {
            self.selected = None;
        } else {
            self.selected = Some((screen, index));
        }
    }
}
