//! Hidden column bookkeeping, independent of filters and sort.

use std::collections::BTreeSet;

#[derive(Debug, Clone, Default)]
pub struct ColumnVisibility {
    hidden: BTreeSet<usize>,
    column_count: usize,
}

impl ColumnVisibility {
    pub fn new(column_count: usize) -> Self {
        Self {
            hidden: BTreeSet::new(),
            column_count,
        }
    }

    pub fn toggle(&mut self, col: usize) {
        if col >= self.column_count {
            return;
        }
        if !self.hidden.remove(&col) {
            self.hidden.insert(col);
        }
    }

    pub fn show_all(&mut self) {
        self.hidden.clear();
    }

    pub fn hide_all(&mut self) {
        self.hidden = (0..self.column_count).collect();
    }

    pub fn is_hidden(&self, col: usize) -> bool {
        self.hidden.contains(&col)
    }

    pub fn hidden(&self) -> &BTreeSet<usize> {
        &self.hidden
    }

    /// Visible column indices in original order.
    pub fn visible_columns(&self) -> Vec<usize> {
        (0..self.column_count)
            .filter(|col| !self.hidden.contains(col))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_and_bulk() {
        let mut v = ColumnVisibility::new(4);
        v.toggle(1);
        v.toggle(3);
        assert_eq!(v.visible_columns(), vec![0, 2]);
        v.toggle(1);
        assert_eq!(v.visible_columns(), vec![0, 1, 2]);
        v.hide_all();
        assert!(v.visible_columns().is_empty());
        v.show_all();
        assert_eq!(v.visible_columns().len(), 4);
    }

    #[test]
    fn test_out_of_range_toggle_is_noop() {
        let mut v = ColumnVisibility::new(2);
        v.toggle(5);
        assert!(v.hidden().is_empty());
    }
}
