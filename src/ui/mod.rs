//! UI panel rendering subsystem
//!
//! This module contains all UI panel rendering logic for the opsdesk console:
//! - Header panel (data source controls, module and tab navigation)
//! - Table panel (virtualized rows of the active screen)
//! - Details panel (fields of the selected row)
//! - Status bar (memory, data source, feed progress)
//! - Table header component (resizable column headers)
//! - Panel manager (panel orchestration and layout)

pub mod header;
pub mod table_panel;
pub mod details_panel;
pub mod status_bar;
pub mod table_header;
pub mod panel_manager;
