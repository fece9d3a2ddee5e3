//! Row selection keyed by original index, with a shift-click range anchor.

use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: BTreeSet<usize>,
    /// Visible position of the last clicked row, including clicks that
    /// deselected it.
    anchor: Option<usize>,
}

impl Selection {
    /// Click the checkbox at visible position `pos`.
    ///
    /// With `shift` and an anchor, every row between the anchor and `pos`
    /// (inclusive, over the current view) is added; nothing is removed.
    /// Otherwise the single row flips. Returns `false` when `pos` is out of
    /// range.
    pub fn toggle(&mut self, visible: &[usize], pos: usize, shift: bool) -> bool {
        let Some(&orig) = visible.get(pos) else {
            return false;
        };

        match self.anchor.filter(|_| shift) {
            Some(anchor) => {
                // the anchor may point past a view that has since shrunk
                let last = visible.len().saturating_sub(1);
                let (lo, hi) = (anchor.min(pos), anchor.max(pos).min(last));
                let range = visible.get(lo..=hi).unwrap_or_default();
                self.selected.extend(range.iter().copied());
            }
            None => {
                if !self.selected.remove(&orig) {
                    self.selected.insert(orig);
                }
            }
        }
        self.anchor = Some(pos);
        true
    }

    pub fn select_all(&mut self, visible: &[usize]) {
        self.selected = visible.iter().copied().collect();
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.anchor = None;
    }

    pub fn is_selected(&self, orig_idx: usize) -> bool {
        self.selected.contains(&orig_idx)
    }

    /// True when the view is non-empty and every visible row is selected.
    pub fn all_selected(&self, visible: &[usize]) -> bool {
        !visible.is_empty() && visible.iter().all(|i| self.selected.contains(i))
    }

    pub fn selected(&self) -> &BTreeSet<usize> {
        &self.selected
    }

    pub fn anchor(&self) -> Option<usize> {
        self.anchor
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Hand the selection over for deletion. The anchor stays put.
    pub fn take(&mut self) -> BTreeSet<usize> {
        std::mem::take(&mut self.selected)
    }
}
