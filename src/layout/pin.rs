//! Sticky (pinned) leading columns.
//!
//! The pin count refers to the currently visible columns. It is clamped
//! against the visible count only when a pin operation runs; hiding columns
//! leaves it alone until then.

use super::ColumnResizeController;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PinController {
    count: usize,
}

impl PinController {
    pub fn count(&self) -> usize {
        self.count
    }

    /// Pin one more column, up to `visible_count`.
    pub fn add(&mut self, visible_count: usize) {
        self.count = (self.count + 1).min(visible_count);
    }

    pub fn remove(&mut self) {
        self.count = self.count.saturating_sub(1);
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }

    /// The pinned prefix of the visible column list.
    pub fn pinned<'a>(&self, visible: &'a [usize]) -> &'a [usize] {
        visible.get(..self.count.min(visible.len())).unwrap_or(&[])
    }

    /// Left offset of each pinned column for sticky positioning.
    pub fn sticky_offsets(
        &self,
        visible: &[usize],
        widths: &ColumnResizeController,
    ) -> Vec<(usize, f32)> {
        let mut left = 0.0;
        self.pinned(visible)
            .iter()
            .map(|&col| {
                let offset = left;
                left += widths.width(col);
                (col, offset)
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_add_remove_clamp() {
        let mut p = PinController::default();
        p.add(2);
        p.add(2);
        p.add(2);
        assert_eq!(p.count(), 2);
        p.remove();
        p.remove();
        p.remove();
        assert_eq!(p.count(), 0);
    }

    #[test]
    fn test_clamp_is_lazy() {
        let mut p = PinController::default();
        for _ in 0..5 {
            p.add(5);
        }
        assert_eq!(p.count(), 5);
        // three columns hidden: nothing changes until the next pin call
        let visible = [0, 4];
        assert_eq!(p.count(), 5);
        assert_eq!(p.pinned(&visible), &[0, 4]);
        p.add(visible.len());
        assert_eq!(p.count(), 2);
    }

    #[test]
    fn test_sticky_offsets_accumulate() {
        let widths = ColumnResizeController::new(HashMap::from([(0, 60.0), (2, 90.0)]), 50.0);
        let mut p = PinController::default();
        p.add(3);
        p.add(3);
        assert_eq!(p.sticky_offsets(&[0, 2, 3], &widths), vec![(0, 0.0), (2, 60.0)]);
        p.reset();
        assert!(p.sticky_offsets(&[0, 2, 3], &widths).is_empty());
    }
}
