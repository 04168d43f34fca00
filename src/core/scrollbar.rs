//! Overlay fade model, drag/hit-testing, and viewport↔pixel mapping.
//!
//! No donor precedent exists for this component (the donor terminal has no
//! scrollbar at all); field shape is grounded on the closest pack example
//! modeling grouped scroll-offset/opacity/hover state, and the fade/drag
//! formulas come directly from this component's own timing contract.

const FADE_DELAY_MS: f32 = 800.0;
const FADE_DURATION_MS: f32 = 400.0;
const MIN_THUMB_PX: f32 = 20.0;

/// Scrollbar overlay state: fade opacity, hover/drag, and scroll metrics.
#[derive(Debug, Clone, Copy)]
pub struct Scrollbar {
    offset: usize,
    visible: usize,
    total: usize,
    opacity: f32,
    ms_since_interaction: f32,
    hover: bool,
    dragging: bool,
    drag_offset_px: f32,
}

impl Scrollbar {
    pub fn new() -> Self {
        Self {
            offset: 0,
            visible: 1,
            total: 1,
            opacity: 0.0,
            ms_since_interaction: f32::INFINITY,
            hover: false,
            dragging: false,
            drag_offset_px: 0.0,
        }
    }

    /// Update the scroll metrics from the terminal's scrollback state.
    /// `(offset, visible, total)`, matching `Terminal::scrollback_metrics`.
    pub fn set_metrics(&mut self, offset: usize, visible: usize, total: usize) {
        self.offset = offset;
        self.visible = visible.max(1);
        self.total = total.max(self.visible);
    }

    pub fn set_hover(&mut self, hover: bool) {
        self.hover = hover;
    }

    /// Call after any scroll interaction to restart the fade-out clock.
    pub fn notify_interaction(&mut self) {
        self.ms_since_interaction = 0.0;
        self.opacity = 1.0;
    }

    /// Advance the fade clock by `dt_ms` of wall time.
    pub fn tick(&mut self, dt_ms: f32) {
        if self.hover || self.dragging {
            self.opacity = 1.0;
            return;
        }
        self.ms_since_interaction += dt_ms;
        self.opacity = if self.ms_since_interaction <= FADE_DELAY_MS {
            1.0
        } else {
            let t = (self.ms_since_interaction - FADE_DELAY_MS) / FADE_DURATION_MS;
            (1.0 - t).clamp(0.0, 1.0)
        };
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Thumb height in pixels for a track of height `track_h`.
    pub fn thumb_height(&self, track_h: f32) -> f32 {
        let proportional = track_h * self.visible as f32 / self.total as f32;
        proportional.max(MIN_THUMB_PX).min(track_h)
    }

    /// Top-left Y of the thumb within the track.
    pub fn thumb_top(&self, track_h: f32, track_top: f32) -> f32 {
        let thumb_h = self.thumb_height(track_h);
        let scrollable = (self.total - self.visible).max(1) as f32;
        let frac = self.offset as f32 / scrollable;
        track_top + frac * (track_h - thumb_h)
    }

    /// Begin a drag at pixel `y`, recording the offset from the thumb's
    /// own top so subsequent drag updates don't jump the thumb under the
    /// cursor.
    pub fn begin_drag(&mut self, y: f32, track_h: f32, track_top: f32) {
        self.dragging = true;
        let thumb_top = self.thumb_top(track_h, track_top);
        self.drag_offset_px = y - thumb_top;
        self.notify_interaction();
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
        self.notify_interaction();
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Map a drag pointer Y to a new scroll offset.
    pub fn drag_to_offset(&self, y: f32, track_h: f32, track_top: f32) -> usize {
        let thumb_h = self.thumb_height(track_h);
        let denom = (track_h - thumb_h).max(1.0);
        let frac = ((y - track_top - self.drag_offset_px) / denom).clamp(0.0, 1.0);
        let scrollable = self.total.saturating_sub(self.visible);
        (frac * scrollable as f32).round() as usize
    }

    /// Whether pixel `(x, y)` falls on the thumb, for hit-testing hover.
    pub fn hit_thumb(&self, x: f32, y: f32, track_x: f32, track_w: f32, track_h: f32, track_top: f32) -> bool {
        if x < track_x || x > track_x + track_w {
            return false;
        }
        let top = self.thumb_top(track_h, track_top);
        let bottom = top + self.thumb_height(track_h);
        y >= top && y <= bottom
    }
}

impl Default for Scrollbar {
    fn default() -> Self {
        Self::new()
    }
}
