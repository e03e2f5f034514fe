//! Viewport state of a virtualized list.
//!
//! This module encapsulates the inputs of the windowing math (scroll offset,
//! container height, item sizing, overscan) together with the scroll throttle
//! and resize debounce that decide when those inputs change.

use std::time::Instant;

use crate::config::ConsoleConfig;
use crate::throttle::{ResizeDebounce, ScrollThrottle};
use crate::windowing::{ItemHeights, PrefixSumHeights, VisibleRange};

/// State of one scrollable list.
///
/// Responsibilities:
/// - Tracking the applied scroll offset and container height
/// - Coalescing scroll events (at most one application per interval)
/// - Debouncing resize events
/// - Answering visible-range queries against the current item count
#[derive(Debug, Clone)]
pub struct ViewportState {
    /// Applied vertical scroll offset in pixels
    scroll_offset: f32,
    /// Applied container height in pixels
    container_height: f32,
    /// Item sizing mode
    heights: ItemHeights,
    /// Extra items rendered beyond each visible edge
    overscan: usize,
    scroll: ScrollThrottle<f32>,
    resize: ResizeDebounce<f32>,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::from_config(&ConsoleConfig::default())
    }
}

impl ViewportState {
    pub fn new(heights: ItemHeights, overscan: usize) -> Self {
        Self {
            scroll_offset: 0.0,
            container_height: 0.0,
            heights,
            overscan,
            scroll: ScrollThrottle::default(),
            resize: ResizeDebounce::default(),
        }
    }

    /// Creates a viewport using the sizing and rate limits from `config`.
    ///
    /// Lists start in variable-height mode with the configured row height as
    /// the estimate, so wrapped cells can be measured in later.
    pub fn from_config(config: &ConsoleConfig) -> Self {
        Self {
            scroll_offset: 0.0,
            container_height: 0.0,
            heights: ItemHeights::Variable(PrefixSumHeights::new(config.row_height)),
            overscan: config.overscan,
            scroll: ScrollThrottle::new(config.scroll_interval()),
            resize: ResizeDebounce::new(config.resize_debounce()),
        }
    }

    /// Resets scroll and measurements, keeping configuration.
    pub fn reset(&mut self) {
        self.scroll_offset = 0.0;
        self.scroll = ScrollThrottle::new(self.scroll.interval());
        if let ItemHeights::Variable(table) = &mut self.heights {
            table.clear();
        }
    }

    // ===== Queries =====

    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    pub fn container_height(&self) -> f32 {
        self.container_height
    }

    pub fn overscan(&self) -> usize {
        self.overscan
    }

    pub fn heights(&self) -> &ItemHeights {
        &self.heights
    }

    /// Range to render for a collection of `item_count` items.
    pub fn visible_range(&self, item_count: usize) -> VisibleRange {
        self.heights
            .compute_visible_range(item_count, self.container_height, self.scroll_offset, self.overscan)
    }

    /// Full content height, used to size the spacer.
    pub fn total_height(&self, item_count: usize) -> f32 {
        self.heights.total_height(item_count)
    }

    pub fn bottom_padding(&self, range: &VisibleRange, item_count: usize) -> f32 {
        self.heights.bottom_padding(range, item_count)
    }

    /// Whether throttled or debounced input is waiting to be applied.
    pub fn has_pending(&self) -> bool {
        self.scroll.has_pending() || self.resize.has_pending()
    }

    /// Earliest instant at which [`poll`](Self::poll) can apply pending input.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.scroll.next_deadline(), self.resize.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    // ===== Mutations =====

    /// Handles a scroll event. Returns true if the offset was applied.
    pub fn on_scroll(&mut self, offset: f32, now: Instant) -> bool {
        match self.scroll.submit(offset.max(0.0), now) {
            Some(applied) => {
                self.scroll_offset = applied;
                true
            }
            None => false,
        }
    }

    /// Handles a resize event; the height is applied after the quiet period.
    ///
    /// The very first size is applied immediately so the list is not blank
    /// on its first frame.
    pub fn on_resize(&mut self, container_height: f32, now: Instant) -> bool {
        let container_height = container_height.max(0.0);
        if self.container_height == 0.0 && !self.resize.has_pending() {
            self.container_height = container_height;
            return true;
        }
        if container_height == self.container_height {
            // Back at the applied height; a pending intermediate size is obsolete
            self.resize.cancel();
        } else if self.resize.pending() != Some(&container_height) {
            self.resize.notify(container_height, now);
        }
        false
    }

    /// Applies pending throttled/debounced input. Returns true if anything changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        let mut changed = false;
        if let Some(offset) = self.scroll.poll(now) {
            self.scroll_offset = offset;
            changed = true;
        }
        if let Some(height) = self.resize.poll(now) {
            self.container_height = height;
            changed = true;
        }
        changed
    }

    /// Sets the scroll offset immediately, bypassing the throttle.
    pub fn jump_to_offset(&mut self, offset: f32) {
        self.scroll_offset = offset.max(0.0);
    }

    /// Records the measured height of item `index` (variable mode only).
    pub fn measure(&mut self, index: usize, height: f32) {
        if let ItemHeights::Variable(table) = &mut self.heights {
            table.set(index, height);
        }
    }

    pub fn set_overscan(&mut self, overscan: usize) {
        self.overscan = overscan;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn fixed_viewport() -> ViewportState {
        ViewportState::new(ItemHeights::Fixed(40.0), 5)
    }

    #[test]
    fn test_first_resize_applies_immediately() {
        let t0 = Instant::now();
        let mut vp = fixed_viewport();
        assert!(vp.on_resize(800.0, t0));
        assert_eq!(vp.visible_range(1000).as_range(), 0..25);
    }

    #[test]
    fn test_resize_is_debounced() {
        let t0 = Instant::now();
        let mut vp = fixed_viewport();
        vp.on_resize(800.0, t0);
        assert!(!vp.on_resize(400.0, t0 + Duration::from_millis(10)));
        assert_eq!(vp.container_height(), 800.0);
        assert!(vp.poll(t0 + Duration::from_secs(1)));
        assert_eq!(vp.container_height(), 400.0);
    }

    #[test]
    fn test_resize_back_to_applied_height_drops_pending() {
        let t0 = Instant::now();
        let mut vp = fixed_viewport();
        vp.on_resize(800.0, t0);
        vp.on_resize(400.0, t0 + Duration::from_millis(10));
        vp.on_resize(800.0, t0 + Duration::from_millis(50));
        assert!(!vp.has_pending());
        assert!(!vp.poll(t0 + Duration::from_secs(1)));
        assert_eq!(vp.container_height(), 800.0);
    }

    #[test]
    fn test_repeated_resize_keeps_quiet_period() {
        let t0 = Instant::now();
        let mut vp = fixed_viewport();
        vp.on_resize(800.0, t0);
        vp.on_resize(400.0, t0 + Duration::from_millis(10));
        // Same size reported again every frame
        vp.on_resize(400.0, t0 + Duration::from_millis(100));
        assert!(vp.poll(t0 + Duration::from_millis(130)));
        assert_eq!(vp.container_height(), 400.0);
    }

    #[test]
    fn test_scroll_coalesces_to_latest() {
        let t0 = Instant::now();
        let mut vp = fixed_viewport();
        vp.on_resize(800.0, t0);
        assert!(vp.on_scroll(400.0, t0));
        assert!(!vp.on_scroll(800.0, t0 + Duration::from_millis(1)));
        assert!(!vp.on_scroll(4000.0, t0 + Duration::from_millis(2)));
        assert_eq!(vp.scroll_offset(), 400.0);
        assert!(vp.has_pending());
        assert!(vp.poll(t0 + Duration::from_millis(50)));
        assert_eq!(vp.scroll_offset(), 4000.0);
        assert_eq!(vp.visible_range(1000).as_range(), 95..125);
    }

    #[test]
    fn test_range_tracks_growing_collection() {
        let t0 = Instant::now();
        let mut vp = fixed_viewport();
        vp.on_resize(800.0, t0);
        vp.jump_to_offset(1_000_000.0);
        assert_eq!(vp.visible_range(50).end_index, 50);
        assert_eq!(vp.visible_range(500).end_index, 500);
    }

    #[test]
    fn test_measure_updates_total_height() {
        let mut vp = ViewportState::new(ItemHeights::Variable(PrefixSumHeights::new(20.0)), 2);
        assert_eq!(vp.total_height(10), 200.0);
        vp.measure(0, 60.0);
        assert_eq!(vp.total_height(10), 240.0);
    }
}
