//! Per-window state: tab array, input dispatch, close-button fade,
//! clipboard, fullscreen toggle (§4.7).
//!
//! Grounded on the donor's `app/tab_management.rs` (tab spawn/close/cwd
//! inheritance), `app/window_management.rs` (per-window font/GPU
//! lifecycle), and `window.rs` (`TermWindow`'s own window-handle wrapper).
//! The donor stores tabs in a `HashMap<TabId, Tab>` with an external
//! per-window `Vec<TabId>` ordering; this component's tab array is
//! specified as bounded, so tabs live directly in a capacity-checked
//! `Vec<Tab>` instead of re-deriving an unbounded map + order pair.

use crate::core::surface::Surface;

/// Upper bound on tabs per window. Not numerically specified; chosen to
/// comfortably exceed any reasonable interactive tab count while keeping
/// the close-fade array small.
pub const MAX_TABS: usize = 64;

/// Tab close buttons fade in/out at this rate, applied per-frame against
/// elapsed time.
pub const TAB_CLOSE_FADE_SPEED: f32 = 6.0;

/// New-window cascade offset from the requesting window's position.
pub const CASCADE_OFFSET: (i32, i32) = (30, 30);

#[derive(Debug, thiserror::Error)]
pub enum WindowError {
    #[error("tab array is full (max {0})")]
    TooManyTabs(usize),
    #[error("no such tab index {0}")]
    NoSuchTab(usize),
}

/// One tab: its `Surface` plus the close-button fade opacity this
/// window's chrome animates independently of render state.
pub struct Tab {
    pub surface: Surface,
    pub close_fade: f32,
}

/// Per-window state: the tab array and the input-dispatch/chrome state
/// that belongs to one GPU surface.
pub struct WindowCore {
    tabs: Vec<Tab>,
    active_tab: usize,
    pub should_close: bool,
    pub is_fullscreen: bool,
    saved_rect: Option<(i32, i32, u32, u32)>,
}

impl WindowCore {
    pub fn new() -> Self {
        Self {
            tabs: Vec::new(),
            active_tab: 0,
            should_close: false,
            is_fullscreen: false,
            saved_rect: None,
        }
    }

    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    pub fn active_tab_index(&self) -> usize {
        self.active_tab
    }

    pub fn active_tab(&self) -> Option<&Tab> {
        self.tabs.get(self.active_tab)
    }

    pub fn active_surface(&self) -> Option<&Surface> {
        self.active_tab().map(|t| &t.surface)
    }

    /// Append a freshly spawned surface as the new active tab.
    pub fn push_tab(&mut self, surface: Surface) -> Result<usize, WindowError> {
        if self.tabs.len() >= MAX_TABS {
            return Err(WindowError::TooManyTabs(MAX_TABS));
        }
        self.tabs.push(Tab { surface, close_fade: 0.0 });
        self.active_tab = self.tabs.len() - 1;
        Ok(self.active_tab)
    }

    /// Close the tab at `index`. If it was the last tab, sets
    /// `should_close` instead of leaving an empty window. Otherwise the
    /// tab is dropped and the active index clamps to stay in range.
    pub fn close_tab(&mut self, index: usize) -> Result<(), WindowError> {
        if index >= self.tabs.len() {
            return Err(WindowError::NoSuchTab(index));
        }
        if self.tabs.len() == 1 {
            self.should_close = true;
            return Ok(());
        }
        self.tabs.remove(index);
        if self.active_tab >= self.tabs.len() {
            self.active_tab = self.tabs.len() - 1;
        } else if self.active_tab > index {
            self.active_tab -= 1;
        }
        Ok(())
    }

    /// Switch to `index`, bounded to existing tabs.
    pub fn switch_to(&mut self, index: usize) -> Result<(), WindowError> {
        if index >= self.tabs.len() {
            return Err(WindowError::NoSuchTab(index));
        }
        self.active_tab = index;
        Ok(())
    }

    pub fn next_tab(&mut self) {
        if !self.tabs.is_empty() {
            self.active_tab = (self.active_tab + 1) % self.tabs.len();
        }
    }

    pub fn prev_tab(&mut self) {
        if !self.tabs.is_empty() {
            self.active_tab = (self.active_tab + self.tabs.len() - 1) % self.tabs.len();
        }
    }

    /// Advance every tab's close-button fade opacity toward 1.0 (hovered)
    /// or 0.0 (not hovered) at `TAB_CLOSE_FADE_SPEED` units/second.
    pub fn tick_close_fades(&mut self, hovered: Option<usize>, dt_secs: f32) {
        let step = TAB_CLOSE_FADE_SPEED * dt_secs;
        for (i, tab) in self.tabs.iter_mut().enumerate() {
            let target = if Some(i) == hovered { 1.0 } else { 0.0 };
            if tab.close_fade < target {
                tab.close_fade = (tab.close_fade + step).min(target);
            } else if tab.close_fade > target {
                tab.close_fade = (tab.close_fade - step).max(target);
            }
        }
    }

    /// Toggle fullscreen, stashing/restoring the windowed rectangle. The
    /// actual OS-level style switch is performed by the caller; this only
    /// tracks the logical state and the rectangle to restore.
    pub fn toggle_fullscreen(&mut self, current_rect: (i32, i32, u32, u32)) -> (i32, i32, u32, u32) {
        if self.is_fullscreen {
            self.is_fullscreen = false;
            self.saved_rect.take().unwrap_or(current_rect)
        } else {
            self.is_fullscreen = true;
            self.saved_rect = Some(current_rect);
            current_rect
        }
    }

    /// Working directory to inherit for a new tab/window spawned from the
    /// active surface, falling back to `None` (the default shell
    /// directory) when the active surface hasn't reported one yet.
    pub fn active_cwd(&self) -> Option<String> {
        self.active_surface().and_then(Surface::cwd)
    }
}

impl Default for WindowCore {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialize a selection range over row text into a plain string for the
/// system clipboard. `rows` gives each selected row's text content; the
/// caller trims it to the selection's column range per row.
pub fn serialize_selection(rows: &[String]) -> String {
    rows.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offset(base: (i32, i32), delta: (i32, i32)) -> (i32, i32) {
        (base.0 + delta.0, base.1 + delta.1)
    }

    #[test]
    fn cascade_offset_matches_spec_example() {
        assert_eq!(offset((200, 200), CASCADE_OFFSET), (230, 230));
    }

    #[test]
    fn close_fade_step_saturates_at_target() {
        let mut core = WindowCore::new();
        // Exercise the stepping logic directly without a live Surface: a
        // single fake tab entry isn't constructible here (Surface needs a
        // live pty), so this test instead checks the arithmetic via a
        // local mirror of the fade step used by `tick_close_fades`.
        let mut fade = 0.0f32;
        let step = TAB_CLOSE_FADE_SPEED * 0.1;
        for _ in 0..20 {
            fade = (fade + step).min(1.0);
        }
        assert_eq!(fade, 1.0);
        let _ = &mut core;
    }

    #[test]
    fn serialize_selection_joins_rows_with_newline() {
        let rows = vec!["abc".to_string(), "def".to_string()];
        assert_eq!(serialize_selection(&rows), "abc\ndef");
    }
}
