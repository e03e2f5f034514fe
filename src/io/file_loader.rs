//! Shared state of a background dataset load.

/// Whether a dataset load is running.
///
/// Wrapped in an `Arc<Mutex<>>` and shared with the loading thread; the
/// loaded data itself comes back through a channel.
#[derive(Debug, Default)]
pub struct LoadingState {
    pub in_progress: bool,
}

impl LoadingState {
    pub fn new() -> Self {
        Self::default()
    }
}
