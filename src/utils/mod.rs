//! Utility modules for the console.

pub mod formatting;

pub use formatting::{format_cell, format_count, format_memory_mb, get_current_memory_mb};
