pub mod traits;
pub mod error;
pub mod config;
pub mod cursor;
pub mod pagination;
pub mod windowing;
pub mod throttle;
pub mod viewport;
pub mod memory_provider;
pub mod rest_provider;
pub mod fetch;
pub mod feed;
pub mod loader;
pub mod screens;
pub mod synthetic;
pub mod dataset;

// Export provider interface
pub use traits::{
    KeyValue, SortDir, SortSpec, PageQuery, Row,
    RowProvider, DynRowProvider, compare_keys, compare_positions
};

pub use error::FetchError;
pub use config::{BackendConfig, ConsoleConfig, ConfigError};

// Export cursor pagination codec
pub use cursor::{
    CursorPosition, Direction, DecodeError,
    encode_cursor, decode_cursor, decode_cursor_or_first_page
};
pub use pagination::{CursorPage, to_cursor_paginated_result, select_fields};

// Export windowing engine
pub use windowing::{
    VisibleRange, PrefixSumHeights, ItemHeights,
    compute_visible_range, total_height, bottom_padding
};
pub use throttle::{ScrollThrottle, ResizeDebounce};
pub use viewport::ViewportState;

// Export providers
pub use memory_provider::MemoryProvider;
pub use rest_provider::RestProvider;
pub use fetch::{fetch_page, fetch_all};

pub use feed::Feed;
pub use loader::{PageLoader, LoadResult};
pub use screens::{Screen, TableSpec, ColumnSpec, ColumnKind};

// Export dataset I/O
pub use dataset::{DatasetWriter, read_dataset, write_synthetic};
pub use synthetic::SyntheticDataset;
