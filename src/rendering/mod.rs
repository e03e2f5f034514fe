//! Rendering subsystem for drawing table rows
//!
//! - Row rendering (cells laid out by column widths, wrapped notes)
//! - Text utilities (text measurement, truncation and wrapping)

pub mod row_renderer;
pub mod text_utils;
