//! Data source state.

use opsdesk::{DynRowProvider, RowProvider};
use std::path::PathBuf;
use std::sync::Arc;

/// The row provider all screens currently read from.
///
/// Responsibilities:
/// - Owning the provider shared with fetch threads
/// - Tracking the dataset file it came from (None for backend or synthetic data)
#[derive(Default)]
pub struct SourceState {
    provider: Option<Arc<DynRowProvider>>,
    file_path: Option<PathBuf>,
    description: String,
}

impl SourceState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_provider(&mut self, provider: DynRowProvider, path: Option<PathBuf>) {
        self.description = provider.describe();
        self.provider = Some(Arc::new(provider));
        self.file_path = path;
    }

    pub fn clear(&mut self) {
        self.provider = None;
        self.file_path = None;
        self.description.clear();
    }

    pub fn provider(&self) -> Option<&Arc<DynRowProvider>> {
        self.provider.as_ref()
    }

    pub fn file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}
