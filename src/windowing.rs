//! Viewport windowing math.
//!
//! Pure functions that turn (item count, item size, container size, scroll
//! offset, overscan) into the index range a list has to materialize, plus the
//! pixel offset that places that slice inside a full-height spacer. All inputs
//! are clamped instead of rejected, so nothing here can fail.

use std::ops::Range;

/// Smallest item height accepted; non-positive heights are raised to this.
pub const MIN_ITEM_HEIGHT: f32 = 1.0;

/// Contiguous slice of a collection that must be rendered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleRange {
    /// First index to render (inclusive)
    pub start_index: usize,
    /// One past the last index to render
    pub end_index: usize,
    /// Pixel offset of `start_index` from the top of the content
    pub offset_top: f32,
}

impl VisibleRange {
    pub const EMPTY: VisibleRange = VisibleRange {
        start_index: 0,
        end_index: 0,
        offset_top: 0.0,
    };

    pub fn len(&self) -> usize {
        self.end_index - self.start_index
    }

    pub fn is_empty(&self) -> bool {
        self.start_index == self.end_index
    }

    pub fn as_range(&self) -> Range<usize> {
        self.start_index..self.end_index
    }

    pub fn contains(&self, index: usize) -> bool {
        self.as_range().contains(&index)
    }
}

/// Replaces NaN and negative values by zero.
fn clamp_non_negative(value: f32) -> f32 {
    if value.is_nan() || value < 0.0 {
        0.0
    } else {
        value
    }
}

fn clamp_item_height(value: f32) -> f32 {
    if value.is_finite() && value >= MIN_ITEM_HEIGHT {
        value
    } else {
        MIN_ITEM_HEIGHT
    }
}

/// Total content height of `item_count` fixed-height items.
pub fn total_height(item_count: usize, item_height: f32) -> f32 {
    item_count as f32 * clamp_item_height(item_height)
}

/// Computes the range to render for fixed-height items.
///
/// Overscan is added on both edges and clamped at the collection bounds.
/// A scroll offset past the end of the content is treated as "scrolled to
/// the bottom", so the range always ends at `item_count` in that case.
pub fn compute_visible_range(
    item_count: usize,
    item_height: f32,
    container_height: f32,
    scroll_offset: f32,
    overscan: usize,
) -> VisibleRange {
    let item_height = clamp_item_height(item_height);
    let container_height = clamp_non_negative(container_height);

    if item_count == 0 || container_height == 0.0 {
        return VisibleRange::EMPTY;
    }

    let max_scroll = (total_height(item_count, item_height) - container_height).max(0.0);
    let scroll_offset = clamp_non_negative(scroll_offset).min(max_scroll);

    let first_visible_row = ((scroll_offset / item_height).floor() as usize).min(item_count);
    let last_visible_row = ((scroll_offset + container_height) / item_height).ceil() as usize;

    let start_index = first_visible_row.saturating_sub(overscan);
    let end_index = last_visible_row.saturating_add(overscan).min(item_count);

    VisibleRange {
        start_index,
        end_index,
        offset_top: start_index as f32 * item_height,
    }
}

/// Height of the spacer needed below a rendered range.
pub fn bottom_padding(range: &VisibleRange, item_count: usize, item_height: f32) -> f32 {
    item_count.saturating_sub(range.end_index) as f32 * clamp_item_height(item_height)
}

/// Prefix-sum table for variable-height items.
///
/// `offsets[i]` is the top of item `i`; `offsets[len]` is the total height.
/// Items beyond the measured length are assumed to have `default_height`.
///
/// Invariants:
/// 1. `offsets[0] == 0.0`
/// 2. `offsets` is non-decreasing
/// 3. `offsets.len() == heights.len() + 1`
#[derive(Debug, Clone, PartialEq)]
pub struct PrefixSumHeights {
    heights: Vec<f32>,
    offsets: Vec<f32>,
    default_height: f32,
}

impl Default for PrefixSumHeights {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_ROW_HEIGHT)
    }
}

impl PrefixSumHeights {
    /// Creates an empty table using `default_height` as the estimate for
    /// unmeasured items.
    pub fn new(default_height: f32) -> Self {
        Self {
            heights: Vec::new(),
            offsets: vec![0.0],
            default_height: clamp_item_height(default_height),
        }
    }

    pub fn from_heights<I: IntoIterator<Item = f32>>(default_height: f32, heights: I) -> Self {
        let mut table = Self::new(default_height);
        for h in heights {
            table.push(h);
        }
        table
    }

    /// Number of measured items.
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    pub fn default_height(&self) -> f32 {
        self.default_height
    }

    /// Appends a measured height.
    pub fn push(&mut self, height: f32) {
        let height = clamp_item_height(height);
        let last = self.offsets[self.offsets.len() - 1];
        self.heights.push(height);
        self.offsets.push(last + height);
    }

    /// Replaces the height of item `index`, extending the table with the
    /// default estimate if needed. Offsets after `index` are recomputed.
    pub fn set(&mut self, index: usize, height: f32) {
        while self.heights.len() <= index {
            self.push(self.default_height);
        }
        let height = clamp_item_height(height);
        if self.heights[index] == height {
            return;
        }
        self.heights[index] = height;
        for i in index..self.heights.len() {
            self.offsets[i + 1] = self.offsets[i] + self.heights[i];
        }
    }

    /// Drops all measurements past `len`.
    pub fn truncate(&mut self, len: usize) {
        self.heights.truncate(len);
        self.offsets.truncate(self.heights.len() + 1);
    }

    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Height of item `index` (measured or estimated).
    pub fn height_of(&self, index: usize) -> f32 {
        self.heights.get(index).copied().unwrap_or(self.default_height)
    }

    /// Top offset of item `index`.
    pub fn offset_of(&self, index: usize) -> f32 {
        let measured = self.heights.len();
        if index <= measured {
            self.offsets[index]
        } else {
            self.offsets[measured] + (index - measured) as f32 * self.default_height
        }
    }

    /// Total height of the first `item_count` items.
    pub fn total_height(&self, item_count: usize) -> f32 {
        self.offset_of(item_count)
    }

    /// Index of the item covering `offset`, for a collection of `item_count`.
    ///
    /// Returns `item_count` when the offset is at or past the end.
    pub fn index_at_offset(&self, offset: f32, item_count: usize) -> usize {
        let offset = clamp_non_negative(offset);
        let measured = self.heights.len().min(item_count);

        if offset < self.offsets[measured] {
            // Largest i with offsets[i] <= offset
            let upper = self.offsets[..=measured].partition_point(|&top| top <= offset);
            return upper.saturating_sub(1);
        }

        let past = offset - self.offsets[measured];
        let extra = (past / self.default_height).floor() as usize;
        (measured + extra).min(item_count)
    }

    /// Index one past the last item intersecting `[0, offset)`.
    fn end_index_for_offset(&self, offset: f32, item_count: usize) -> usize {
        let first = self.index_at_offset(offset, item_count);
        if first < item_count && self.offset_of(first) < offset {
            first + 1
        } else {
            first
        }
    }

    /// Variable-height counterpart of [`compute_visible_range`].
    pub fn compute_visible_range(
        &self,
        item_count: usize,
        container_height: f32,
        scroll_offset: f32,
        overscan: usize,
    ) -> VisibleRange {
        let container_height = clamp_non_negative(container_height);
        if item_count == 0 || container_height == 0.0 {
            return VisibleRange::EMPTY;
        }

        let max_scroll = (self.total_height(item_count) - container_height).max(0.0);
        let scroll_offset = clamp_non_negative(scroll_offset).min(max_scroll);

        let first_visible = self.index_at_offset(scroll_offset, item_count);
        let last_visible = self.end_index_for_offset(scroll_offset + container_height, item_count);

        let start_index = first_visible.saturating_sub(overscan).min(item_count);
        let end_index = last_visible.saturating_add(overscan).min(item_count).max(start_index);

        VisibleRange {
            start_index,
            end_index,
            offset_top: self.offset_of(start_index),
        }
    }

    /// Height of the spacer below a rendered range.
    pub fn bottom_padding(&self, range: &VisibleRange, item_count: usize) -> f32 {
        (self.total_height(item_count) - self.offset_of(range.end_index.min(item_count))).max(0.0)
    }
}

/// Item sizing mode of a list.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemHeights {
    Fixed(f32),
    Variable(PrefixSumHeights),
}

impl ItemHeights {
    pub fn compute_visible_range(
        &self,
        item_count: usize,
        container_height: f32,
        scroll_offset: f32,
        overscan: usize,
    ) -> VisibleRange {
        match self {
            ItemHeights::Fixed(h) => {
                compute_visible_range(item_count, *h, container_height, scroll_offset, overscan)
            }
            ItemHeights::Variable(table) => {
                table.compute_visible_range(item_count, container_height, scroll_offset, overscan)
            }
        }
    }

    pub fn total_height(&self, item_count: usize) -> f32 {
        match self {
            ItemHeights::Fixed(h) => total_height(item_count, *h),
            ItemHeights::Variable(table) => table.total_height(item_count),
        }
    }

    pub fn bottom_padding(&self, range: &VisibleRange, item_count: usize) -> f32 {
        match self {
            ItemHeights::Fixed(h) => bottom_padding(range, item_count, *h),
            ItemHeights::Variable(table) => table.bottom_padding(range, item_count),
        }
    }

    pub fn height_of(&self, index: usize) -> f32 {
        match self {
            ItemHeights::Fixed(h) => clamp_item_height(*h),
            ItemHeights::Variable(table) => table.height_of(index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_window_at_top() {
        let r = compute_visible_range(1000, 40.0, 800.0, 0.0, 5);
        assert_eq!(r.start_index, 0);
        assert_eq!(r.end_index, 25);
        assert_eq!(r.offset_top, 0.0);
    }

    #[test]
    fn test_window_mid_scroll() {
        // Rows 100..120 are visible, overscan 5 on each side
        let r = compute_visible_range(1000, 40.0, 800.0, 4000.0, 5);
        assert_eq!(r.as_range(), 95..125);
        assert_eq!(r.offset_top, 95.0 * 40.0);
    }

    #[test]
    fn test_window_past_end_clamps() {
        let r = compute_visible_range(100, 40.0, 800.0, 1_000_000.0, 5);
        assert_eq!(r.end_index, 100);
        assert_eq!(r.start_index, 75);
        assert!(r.start_index <= r.end_index);
    }

    #[test]
    fn test_empty_collection() {
        for offset in [0.0, 10.0, 1e9] {
            assert_eq!(compute_visible_range(0, 40.0, 800.0, offset, 5), VisibleRange::EMPTY);
        }
    }

    #[test]
    fn test_zero_container() {
        assert!(compute_visible_range(1000, 40.0, 0.0, 400.0, 3).is_empty());
    }

    #[test]
    fn test_negative_and_nan_inputs_are_clamped() {
        let r = compute_visible_range(50, -3.0, 10.0, -100.0, 0);
        assert_eq!(r.start_index, 0);
        assert_eq!(r.end_index, 10);
        let r = compute_visible_range(50, 20.0, f32::NAN, 0.0, 0);
        assert!(r.is_empty());
    }

    #[test]
    fn test_short_list_fits_container() {
        let r = compute_visible_range(5, 40.0, 800.0, 300.0, 2);
        assert_eq!(r.as_range(), 0..5);
    }

    #[test]
    fn test_spacers_add_up() {
        let count = 1000;
        let r = compute_visible_range(count, 22.0, 500.0, 7000.0, 10);
        let rendered = r.len() as f32 * 22.0;
        let total = r.offset_top + rendered + bottom_padding(&r, count, 22.0);
        assert!((total - total_height(count, 22.0)).abs() < 0.01);
    }

    #[test]
    fn test_prefix_sums() {
        let t = PrefixSumHeights::from_heights(20.0, [10.0, 30.0, 20.0]);
        assert_eq!(t.offset_of(0), 0.0);
        assert_eq!(t.offset_of(2), 40.0);
        assert_eq!(t.total_height(3), 60.0);
        // Unmeasured items use the estimate
        assert_eq!(t.total_height(5), 100.0);
        assert_eq!(t.index_at_offset(0.0, 3), 0);
        assert_eq!(t.index_at_offset(9.9, 3), 0);
        assert_eq!(t.index_at_offset(10.0, 3), 1);
        assert_eq!(t.index_at_offset(39.0, 3), 1);
        assert_eq!(t.index_at_offset(45.0, 3), 2);
        assert_eq!(t.index_at_offset(60.0, 3), 3);
        assert_eq!(t.index_at_offset(85.0, 5), 4);
    }

    #[test]
    fn test_prefix_set_recomputes_suffix() {
        let mut t = PrefixSumHeights::from_heights(20.0, [10.0, 10.0, 10.0]);
        t.set(1, 50.0);
        assert_eq!(t.offset_of(2), 60.0);
        assert_eq!(t.total_height(3), 70.0);
        t.set(5, 5.0);
        assert_eq!(t.len(), 6);
        assert_eq!(t.total_height(6), 70.0 + 20.0 + 20.0 + 5.0);
    }

    #[test]
    fn test_variable_window() {
        // 10 tall rows followed by many short ones
        let heights = (0..100).map(|i| if i < 10 { 100.0 } else { 10.0 });
        let t = PrefixSumHeights::from_heights(10.0, heights);
        let r = t.compute_visible_range(100, 150.0, 950.0, 1);
        // Offset 950 lies in row 9 (900..1000); bottom edge 1100 closes row 19
        assert_eq!(r.start_index, 8);
        assert_eq!(r.end_index, 21);
        assert_eq!(r.offset_top, 800.0);
    }

    #[test]
    fn test_variable_past_end() {
        let t = PrefixSumHeights::from_heights(10.0, vec![10.0; 30]);
        let r = t.compute_visible_range(30, 100.0, 1e6, 2);
        assert_eq!(r.end_index, 30);
        assert_eq!(r.start_index, 18);
    }

    proptest! {
        #[test]
        fn prop_range_within_bounds(
            count in 0usize..100_000,
            h in 0.0f32..200.0,
            container in 0.0f32..5000.0,
            offset in 0.0f32..10_000_000.0,
            overscan in 0usize..50,
        ) {
            let r = compute_visible_range(count, h, container, offset, overscan);
            prop_assert!(r.start_index <= r.end_index);
            prop_assert!(r.end_index <= count);
            prop_assert_eq!(r, compute_visible_range(count, h, container, offset, overscan));
        }

        #[test]
        fn prop_uniform_variable_matches_fixed(
            count in 0usize..2000,
            container in 0.0f32..3000.0,
            offset in 0.0f32..100_000.0,
            overscan in 0usize..20,
        ) {
            let t = PrefixSumHeights::from_heights(16.0, vec![16.0; count]);
            let fixed = compute_visible_range(count, 16.0, container, offset, overscan);
            let variable = t.compute_visible_range(count, container, offset, overscan);
            prop_assert_eq!(fixed.as_range(), variable.as_range());
        }
    }
}
