//! Column width overrides driven by dragging a column border.
//!
//! A drag reports a live width on every pointer move without touching the
//! committed widths; only the release commits. This keeps high-frequency
//! pointer events from invalidating anything but the dragged column.

use std::collections::HashMap;

/// Fallback width for a column the estimate does not know about.
pub const DEFAULT_COL_WIDTH: f32 = 100.0;

/// An in-progress border drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub col: usize,
    pub start_x: f32,
    pub start_width: f32,
}

#[derive(Debug, Clone, Default)]
pub struct ColumnResizeController {
    estimate: HashMap<usize, f32>,
    widths: HashMap<usize, f32>,
    drag: Option<DragSession>,
    min_width: f32,
}

impl ColumnResizeController {
    pub fn new(estimate: HashMap<usize, f32>, min_width: f32) -> Self {
        Self {
            widths: estimate.clone(),
            estimate,
            drag: None,
            min_width,
        }
    }

    /// Committed width of a column.
    pub fn width(&self, col: usize) -> f32 {
        self.widths
            .get(&col)
            .copied()
            .unwrap_or(DEFAULT_COL_WIDTH)
    }

    pub fn widths(&self) -> &HashMap<usize, f32> {
        &self.widths
    }

    pub fn drag(&self) -> Option<DragSession> {
        self.drag
    }

    /// Start dragging the right border of `col` at pointer `x`.
    pub fn begin_resize(&mut self, col: usize, pointer_x: f32) {
        self.drag = Some(DragSession {
            col,
            start_x: pointer_x,
            start_width: self.width(col),
        });
    }

    fn width_at(&self, session: DragSession, pointer_x: f32) -> f32 {
        (session.start_width + (pointer_x - session.start_x)).max(self.min_width)
    }

    /// Live width for pointer `x` while dragging. Not committed.
    pub fn drag_to(&self, pointer_x: f32) -> Option<(usize, f32)> {
        self.drag
            .map(|session| (session.col, self.width_at(session, pointer_x)))
    }

    /// Finish the drag at pointer `x` and commit the resulting width.
    pub fn end_resize(&mut self, pointer_x: f32) -> Option<(usize, f32)> {
        let session = self.drag.take()?;
        let width = self.width_at(session, pointer_x);
        self.widths.insert(session.col, width);
        log::debug!("column {} resized to {width}px", session.col);
        Some((session.col, width))
    }

    /// Abandon a drag without committing.
    pub fn cancel_resize(&mut self) {
        self.drag = None;
    }

    /// Drop every override and return to the estimate.
    pub fn reset_widths(&mut self) {
        self.widths = self.estimate.clone();
        self.drag = None;
    }
}
