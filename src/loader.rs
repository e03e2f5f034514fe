//! Background page fetching.
//!
//! Fetches run on spawned threads so the UI thread never blocks on the
//! network. Results come back through a channel that the UI polls once per
//! frame, the same way dataset files are loaded.
//!
//! Every request is stamped with a generation number. Issuing a new request
//! or calling [`PageLoader::cancel`] moves the generation forward, so a
//! late-arriving result for an older request is discarded instead of being
//! applied to a view that has since changed.

use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::error::FetchError;
use crate::fetch::fetch_page;
use crate::pagination::CursorPage;
use crate::traits::{PageQuery, Row, RowProvider};

/// Message sent from a fetch thread.
struct Completion {
    generation: u64,
    result: Result<CursorPage<Row>, FetchError>,
}

/// Outcome of polling the loader.
#[derive(Debug)]
pub enum LoadResult {
    /// The current request completed
    Page(CursorPage<Row>),
    /// The current request failed
    Error(FetchError),
    /// A superseded request completed; its result was dropped
    Stale,
    /// Nothing has arrived
    None,
}

pub struct PageLoader {
    /// Generation of the most recent request (or cancellation)
    generation: u64,
    /// Generation still awaiting a result, if any
    pending: Option<u64>,
    sender: Sender<Completion>,
    receiver: Receiver<Completion>,
}

impl PageLoader {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self {
            generation: 0,
            pending: None,
            sender,
            receiver,
        }
    }

    /// Checks if the current request is still in flight.
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Starts fetching a page in the background, superseding any request in flight.
    ///
    /// Call [`check_completion`](Self::check_completion) regularly (e.g. once
    /// per frame) to pick up the result.
    ///
    /// # Arguments
    /// * `provider` - Data source shared with the fetch thread
    /// * `query` - Page to fetch
    /// * `cursor` - Continuation token, `None` for the first page
    /// * `on_complete` - Called from the fetch thread after the result is sent,
    ///   typically to request a repaint
    ///
    /// # Returns
    /// The generation assigned to this request.
    pub fn request<P, F>(
        &mut self,
        provider: Arc<P>,
        query: PageQuery,
        cursor: Option<String>,
        on_complete: F,
    ) -> u64
    where
        P: RowProvider + ?Sized + 'static,
        F: FnOnce() + Send + 'static,
    {
        self.generation += 1;
        let generation = self.generation;
        self.pending = Some(generation);

        let sender = self.sender.clone();
        log::debug!("page request {} for {}", generation, query.table);

        thread::spawn(move || {
            let result = fetch_page(provider.as_ref(), &query, cursor.as_deref());
            // Receiver may be gone if the loader was dropped
            let _ = sender.send(Completion { generation, result });
            on_complete();
        });

        generation
    }

    /// Invalidates the request in flight; its result will be discarded.
    pub fn cancel(&mut self) {
        if self.pending.take().is_some() {
            log::debug!("page request {} cancelled", self.generation);
        }
        self.generation += 1;
    }

    /// Returns the next available result without blocking.
    pub fn check_completion(&mut self) -> LoadResult {
        match self.receiver.try_recv() {
            Ok(completion) => self.accept(completion),
            Err(_) => LoadResult::None,
        }
    }

    /// Blocks up to `timeout` for the next result.
    pub fn wait_completion(&mut self, timeout: Duration) -> LoadResult {
        match self.receiver.recv_timeout(timeout) {
            Ok(completion) => self.accept(completion),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => LoadResult::None,
        }
    }

    fn accept(&mut self, completion: Completion) -> LoadResult {
        if Some(completion.generation) != self.pending {
            log::debug!(
                "discarding stale page {} (current {})",
                completion.generation,
                self.generation
            );
            return LoadResult::Stale;
        }
        self.pending = None;
        match completion.result {
            Ok(page) => LoadResult::Page(page),
            Err(error) => LoadResult::Error(error),
        }
    }
}

impl Default for PageLoader {
    fn default() -> Self {
        Self::new()
    }
}
