//! Screen-coordinate, scrollback-anchored selection range.
//!
//! Rows are absolute (scrollback-anchored) indices so a selection survives
//! scrolling — the same shape as the donor's character/word/line selection,
//! minus the multi-mode machinery this crate doesn't need.

/// A selection endpoint in absolute (scrollback-anchored) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionPoint {
    pub row_abs: i64,
    pub col: usize,
}

impl SelectionPoint {
    pub fn new(row_abs: i64, col: usize) -> Self {
        Self { row_abs, col }
    }
}

/// Normalized pair of endpoints, `a <= b` in `(row, col)` order.
#[derive(Debug, Clone, Copy)]
struct Ordered {
    a: SelectionPoint,
    b: SelectionPoint,
}

/// A screen-coordinate selection range with an active flag.
///
/// The selection doesn't activate on a bare click: `update` must observe
/// the drag crossing `0.6 * cell_width` pixels from the anchor before
/// `active` flips true, so a click-without-drag leaves no stray highlight.
#[derive(Debug, Clone)]
pub struct Selection {
    anchor: SelectionPoint,
    end: SelectionPoint,
    active: bool,
    anchor_px: (f32, f32),
    armed: bool,
}

impl Selection {
    /// Start a selection at `point`; it does not become active until
    /// `update` observes enough drag distance.
    pub fn start(point: SelectionPoint, anchor_px: (f32, f32)) -> Self {
        Self {
            anchor: point,
            end: point,
            active: false,
            anchor_px,
            armed: false,
        }
    }

    /// Update the drag endpoint. `cursor_px` is the current pointer
    /// position in the same coordinate space as the anchor; `cell_width`
    /// is used to compute the `0.6 * cell_width` activation threshold.
    pub fn update(&mut self, point: SelectionPoint, cursor_px: (f32, f32), cell_width: f32) {
        self.end = point;
        if !self.armed {
            let dx = cursor_px.0 - self.anchor_px.0;
            let dy = cursor_px.1 - self.anchor_px.1;
            let dist = dx.hypot(dy);
            if dist >= 0.6 * cell_width {
                self.armed = true;
                self.active = true;
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Clear the selection (click without drag, or explicit dismissal).
    pub fn clear(&mut self) {
        self.active = false;
        self.armed = false;
    }

    fn ordered(&self) -> Ordered {
        let key = |p: &SelectionPoint| (p.row_abs, p.col);
        if key(&self.anchor) <= key(&self.end) {
            Ordered { a: self.anchor, b: self.end }
        } else {
            Ordered { a: self.end, b: self.anchor }
        }
    }

    /// Whether the absolute cell `(row_abs, col)` falls inside the
    /// normalized range.
    pub fn contains(&self, row_abs: i64, col: usize) -> bool {
        if !self.active {
            return false;
        }
        let Ordered { a, b } = self.ordered();
        if row_abs < a.row_abs || row_abs > b.row_abs {
            return false;
        }
        if a.row_abs == b.row_abs {
            return col >= a.col && col <= b.col;
        }
        if row_abs == a.row_abs {
            return col >= a.col;
        }
        if row_abs == b.row_abs {
            return col <= b.col;
        }
        true
    }

    /// Normalized endpoints, for serializing the selected text.
    pub fn range(&self) -> Option<(SelectionPoint, SelectionPoint)> {
        if !self.active {
            return None;
        }
        let Ordered { a, b } = self.ordered();
        Some((a, b))
    }
}
