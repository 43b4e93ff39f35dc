//! Scroll position and follow (autoscroll) state.

use crate::view_state::window::{content_height, visible_range, Viewport, VisibleRange};

/// Scroll state of the log pane, including the follow contract:
/// while `follow` is set, any growth of the row count snaps the view to the
/// last row; any user-initiated scroll clears the flag until it is
/// explicitly re-enabled. Programmatic jumps ([`ScrollModel::scroll_to_row`],
/// [`ScrollModel::center_on_row`]) are idempotent and leave the flag alone.
#[derive(Debug, Clone)]
pub struct ScrollModel {
    viewport: Viewport,
    follow: bool,
    last_row_count: usize,
}

impl ScrollModel {
    /// New model at the top of empty content, with follow enabled.
    pub fn new(row_height: usize, overscan: usize) -> Self {
        Self {
            viewport: Viewport {
                scroll_offset: 0,
                container_height: 0,
                row_height,
                overscan,
            },
            follow: true,
            last_row_count: 0,
        }
    }

    /// Current geometry.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Whether autoscroll is active.
    pub fn follow(&self) -> bool {
        self.follow
    }

    /// Dedicated control: re-enable (or disable) autoscroll.
    pub fn set_follow(&mut self, follow: bool, row_count: usize) {
        self.follow = follow;
        if follow {
            self.viewport.scroll_offset = self.max_offset(row_count);
        }
    }

    /// Resize the visible container (throttling happens upstream).
    pub fn set_container_height(&mut self, height: usize, row_count: usize) {
        self.viewport.container_height = height;
        self.clamp(row_count);
    }

    /// Materialized row range for the current position.
    pub fn visible_rows(&self, row_count: usize) -> VisibleRange {
        visible_range(&self.viewport, row_count)
    }

    /// User-initiated relative scroll; clears follow.
    pub fn scroll_by(&mut self, delta: isize, row_count: usize) {
        self.follow = false;
        let offset = self.viewport.scroll_offset as isize + delta;
        self.viewport.scroll_offset = offset.max(0) as usize;
        self.clamp(row_count);
    }

    /// User-initiated jump to the top; clears follow.
    pub fn scroll_to_top(&mut self) {
        self.follow = false;
        self.viewport.scroll_offset = 0;
    }

    /// User-initiated jump to the bottom; clears follow.
    pub fn scroll_to_bottom(&mut self, row_count: usize) {
        self.follow = false;
        self.viewport.scroll_offset = self.max_offset(row_count);
    }

    /// Programmatic jump: put `row` at the top of the container (clamped).
    /// Idempotent; does not touch the follow flag.
    pub fn scroll_to_row(&mut self, row: usize, row_count: usize) {
        self.viewport.scroll_offset = (row * self.viewport.row_height).min(self.max_offset(row_count));
    }

    /// Programmatic jump: center `row` in the container (clamped).
    /// Idempotent; does not touch the follow flag.
    pub fn center_on_row(&mut self, row: usize, row_count: usize) {
        let row_top = row * self.viewport.row_height;
        let half = self.viewport.container_height.saturating_sub(self.viewport.row_height) / 2;
        self.viewport.scroll_offset = row_top.saturating_sub(half).min(self.max_offset(row_count));
    }

    /// Notify the model that the wrapped row count changed.
    ///
    /// While following, growth snaps to the last row. Shrinkage (a rewrap at
    /// a wider width) only clamps the offset back into range.
    pub fn on_row_count_changed(&mut self, row_count: usize) {
        if self.follow && row_count > self.last_row_count {
            self.viewport.scroll_offset = self.max_offset(row_count);
        } else {
            self.clamp(row_count);
        }
        self.last_row_count = row_count;
    }

    fn max_offset(&self, row_count: usize) -> usize {
        content_height(row_count, self.viewport.row_height)
            .saturating_sub(self.viewport.container_height)
    }

    fn clamp(&mut self, row_count: usize) {
        let max = self.max_offset(row_count);
        if self.viewport.scroll_offset > max {
            self.viewport.scroll_offset = max;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> ScrollModel {
        let mut model = ScrollModel::new(1, 0);
        model.set_container_height(10, 0);
        model
    }

    mod follow_contract {
        use super::*;

        #[test]
        fn starts_following() {
            assert!(model().follow());
        }

        #[test]
        fn growth_snaps_to_bottom_while_following() {
            let mut model = model();
            model.on_row_count_changed(100);
            assert_eq!(model.viewport().scroll_offset, 90);
        }

        #[test]
        fn user_scroll_clears_follow() {
            let mut model = model();
            model.on_row_count_changed(100);
            model.scroll_by(-5, 100);
            assert!(!model.follow());
            assert_eq!(model.viewport().scroll_offset, 85);
        }

        #[test]
        fn growth_leaves_position_alone_once_follow_cleared() {
            let mut model = model();
            model.on_row_count_changed(100);
            model.scroll_by(-50, 100);
            let offset = model.viewport().scroll_offset;
            model.on_row_count_changed(200);
            assert_eq!(model.viewport().scroll_offset, offset);
        }

        #[test]
        fn set_follow_reenables_and_snaps() {
            let mut model = model();
            model.on_row_count_changed(100);
            model.scroll_by(-50, 100);
            model.set_follow(true, 100);
            assert!(model.follow());
            assert_eq!(model.viewport().scroll_offset, 90);
            model.on_row_count_changed(120);
            assert_eq!(model.viewport().scroll_offset, 110);
        }

        #[test]
        fn programmatic_jump_keeps_follow_flag() {
            let mut model = model();
            model.on_row_count_changed(100);
            assert!(model.follow());
            model.center_on_row(50, 100);
            assert!(model.follow(), "centering must not clear follow");
            model.scroll_to_row(10, 100);
            assert!(model.follow(), "scroll_to_row must not clear follow");
        }

        #[test]
        fn shrinking_content_clamps_offset() {
            let mut model = model();
            model.on_row_count_changed(100);
            model.scroll_by(-1, 100); // offset 89, follow off
            model.on_row_count_changed(20);
            assert_eq!(model.viewport().scroll_offset, 10);
        }
    }

    mod positioning {
        use super::*;

        #[test]
        fn scroll_by_saturates_at_top() {
            let mut model = model();
            model.on_row_count_changed(100);
            model.scroll_to_top();
            model.scroll_by(-5, 100);
            assert_eq!(model.viewport().scroll_offset, 0);
        }

        #[test]
        fn scroll_by_clamps_at_bottom() {
            let mut model = model();
            model.on_row_count_changed(100);
            model.scroll_by(500, 100);
            assert_eq!(model.viewport().scroll_offset, 90);
        }

        #[test]
        fn scroll_to_row_is_idempotent() {
            let mut model = model();
            model.on_row_count_changed(100);
            model.scroll_to_row(42, 100);
            let first = model.viewport().scroll_offset;
            model.scroll_to_row(42, 100);
            assert_eq!(model.viewport().scroll_offset, first);
            assert_eq!(first, 42);
        }

        #[test]
        fn center_on_row_centers_within_container() {
            let mut model = model();
            model.on_row_count_changed(100);
            model.center_on_row(50, 100);
            // Container 10, row height 1: half = 4, so row 50 sits at offset 46.
            assert_eq!(model.viewport().scroll_offset, 46);
        }

        #[test]
        fn center_on_row_clamps_near_edges() {
            let mut model = model();
            model.on_row_count_changed(100);
            model.center_on_row(1, 100);
            assert_eq!(model.viewport().scroll_offset, 0);
            model.center_on_row(99, 100);
            assert_eq!(model.viewport().scroll_offset, 90);
        }

        #[test]
        fn content_shorter_than_container_pins_offset_to_zero() {
            let mut model = model();
            model.on_row_count_changed(5);
            model.scroll_by(3, 5);
            assert_eq!(model.viewport().scroll_offset, 0);
        }

        #[test]
        fn resize_clamps_current_offset() {
            let mut model = model();
            model.on_row_count_changed(100);
            model.scroll_by(-10, 100); // offset 80
            model.set_container_height(50, 100);
            assert_eq!(model.viewport().scroll_offset, 50);
        }
    }
}
