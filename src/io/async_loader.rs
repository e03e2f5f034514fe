//! Asynchronous dataset loading.
//!
//! Opens offline dataset files in background threads, keeping the GUI
//! responsive while large (possibly compressed) files are parsed.

use eframe::egui;
use opsdesk::{read_dataset, DynRowProvider, SyntheticDataset};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::sync::{Arc, Mutex};
use std::thread;
use crate::io::LoadingState;

/// Result of a completed dataset loading operation.
pub enum LoadResult {
    /// Loading completed successfully
    Success {
        provider: DynRowProvider,
        /// Path of the loaded file (None for synthetic data)
        path: Option<PathBuf>,
    },
    /// Loading failed with an error
    Error(String),
    /// No loading operation in progress
    None,
}

/// Manages asynchronous loading of dataset files.
pub struct AsyncLoader {
    /// Shared loading state flag
    loading_state: Arc<Mutex<LoadingState>>,

    /// Channel receiver for loading results
    loading_receiver: Option<Receiver<Result<DynRowProvider, String>>>,

    /// Path of the file currently being loaded
    pending_load_path: Option<PathBuf>,
}

impl AsyncLoader {
    pub fn new() -> Self {
        Self {
            loading_state: Arc::new(Mutex::new(LoadingState::new())),
            loading_receiver: None,
            pending_load_path: None,
        }
    }

    /// Checks if a loading operation is currently in progress.
    pub fn is_loading(&self) -> bool {
        self.loading_state
            .lock()
            .map(|state| state.in_progress)
            .unwrap_or(false)
    }

    /// Starts loading a dataset file asynchronously.
    ///
    /// Call `check_completion()` once per frame to pick up the result.
    ///
    /// # Arguments
    /// * `path` - Dataset file (`.jsonl` or `.jsonl.br`)
    /// * `ctx` - egui context for requesting a repaint when loading completes
    pub fn start_file_load(&mut self, path: PathBuf, ctx: &egui::Context) {
        let (sender, receiver) = channel();
        self.loading_receiver = Some(receiver);

        if let Ok(mut state) = self.loading_state.lock() {
            state.in_progress = true;
        }

        self.pending_load_path = Some(path.clone());

        let loading_state = Arc::clone(&self.loading_state);
        let ctx_handle = ctx.clone();

        thread::spawn(move || {
            let result = read_dataset(&path)
                .map(DynRowProvider::Memory)
                .map_err(|e| format!("{:#}", e));

            let _ = sender.send(result);

            if let Ok(mut state) = loading_state.lock() {
                state.in_progress = false;
            }

            ctx_handle.request_repaint();
        });
    }

    /// Generates the default synthetic dataset in-memory.
    pub fn load_synthetic(&mut self) -> DynRowProvider {
        DynRowProvider::Memory(SyntheticDataset::default().build())
    }

    /// Checks if background loading has completed and returns the result if available.
    ///
    /// # Returns
    /// * `LoadResult::Success` - Loading completed successfully
    /// * `LoadResult::Error` - Loading failed with an error
    /// * `LoadResult::None` - No result available (still loading or no operation active)
    pub fn check_completion(&mut self) -> LoadResult {
        if let Some(receiver) = &self.loading_receiver {
            if let Ok(result) = receiver.try_recv() {
                let load_result = match result {
                    Ok(provider) => LoadResult::Success {
                        provider,
                        path: self.pending_load_path.take(),
                    },
                    Err(error_msg) => {
                        self.pending_load_path = None;
                        LoadResult::Error(error_msg)
                    }
                };

                self.loading_receiver = None;
                return load_result;
            }
        }

        LoadResult::None
    }
}

impl Default for AsyncLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opsdesk::RowProvider;

    #[test]
    fn test_async_loader_creation() {
        let loader = AsyncLoader::new();
        assert!(!loader.is_loading());
    }

    #[test]
    fn test_synthetic_loading() {
        let mut loader = AsyncLoader::new();
        let provider = loader.load_synthetic();
        assert!(provider.describe().starts_with("synthetic"));
    }

    #[test]
    fn test_check_completion_when_idle() {
        let mut loader = AsyncLoader::new();
        assert!(matches!(loader.check_completion(), LoadResult::None));
    }
}
