//! State management modules for the console.
//!
//! This module contains state-only logic (no UI concerns):
//! - Source state (current row provider)
//! - Screen state (feed, viewport and page loader per screen)
//! - Selection state (selected row)
//! - Layout state (split ratio, column widths, dark mode)

mod source_state;
mod screen_state;
mod selection;
mod layout_state;

pub use source_state::SourceState;
pub use screen_state::ScreenState;
pub use selection::SelectionState;
pub use layout_state::{LayoutState, MIN_COLUMN_WIDTH};
