//! Cell-grid snapshot → batched draw instances (§4.6).
//!
//! Grounded on the donor's `app/render_coord.rs` (frame-params assembly,
//! dirty-flag gating, cursor blink timing) and `gpu/render_grid.rs`
//! (per-cell background/cursor/underline/glyph instance emission). The
//! donor emits directly into GPU instance buffers from inside the
//! renderer; this component keeps the same per-cell decision tree but
//! produces three plain `Vec<CellInstance>` batches (background, text,
//! color-glyph) that a GPU backend consumes however it likes, since this
//! crate's render target setup lives in the windowing component instead.

use crate::core::atlas::GlyphRegion;
use crate::core::fonts::{FontDiscovery, FontRasterizer, TextShaper};
use crate::core::glyph_cache::GlyphCache;
use crate::core::selection::Selection;
use crate::core::sprites::SpriteSynthesizer;
use crate::core::terminal::{CursorStyle, Terminal};

/// Resize events are coalesced for this many milliseconds before the PTY
/// and terminal state are actually resized, to avoid a resize storm while
/// the user is still dragging a window edge.
pub const RESIZE_COALESCE_MS: u64 = 25;

/// Cursor blink half-period.
pub const CURSOR_BLINK_INTERVAL_MS: u64 = 600;

/// Upper bound on live cell instances per frame (guards a pathological
/// huge terminal from producing an unbounded instance buffer).
pub const MAX_CELLS: usize = 30_000;

/// Synchronized output (DEC 2026) never withholds a frame longer than
/// this, in case an application sets the mode and never clears it.
pub const SYNC_UPDATE_SAFETY_MS: u64 = 1000;

#[derive(Debug, Clone, Copy, Default)]
pub struct Rgba(pub f32, pub f32, pub f32, pub f32);

/// One GPU-ready instanced quad: position/size in pixels, atlas UV
/// rectangle, and a color (background/foreground as appropriate).
#[derive(Debug, Clone, Copy)]
pub struct CellInstance {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub uv: GlyphRegion,
    pub color: Rgba,
}

/// The three independently batched draw passes this component's frame
/// builder produces. The color-glyph pass is drawn with premultiplied
/// alpha so color emoji bitmaps composite correctly over the background.
#[derive(Debug, Clone, Default)]
pub struct FrameBatches {
    pub background: Vec<CellInstance>,
    pub text: Vec<CellInstance>,
    pub color_text: Vec<CellInstance>,
    pub truncated: bool,
}

/// Resize coalescing state: tracks the last requested size and whether a
/// pending resize is still waiting out its debounce window.
#[derive(Debug, Default)]
pub struct ResizeCoalescer {
    pending: Option<(usize, usize)>,
    last_request_ms: u64,
}

impl ResizeCoalescer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a requested size at `now_ms`. Returns the size to actually
    /// apply once `RESIZE_COALESCE_MS` has elapsed with no further
    /// request, or `None` while still debouncing.
    pub fn request(&mut self, cols: usize, rows: usize, now_ms: u64) -> Option<(usize, usize)> {
        self.pending = Some((cols, rows));
        self.last_request_ms = now_ms;
        None
    }

    /// Call on every tick; returns `Some(size)` once the debounce window
    /// has elapsed since the most recent `request`.
    pub fn poll(&mut self, now_ms: u64) -> Option<(usize, usize)> {
        let pending = self.pending?;
        if now_ms.saturating_sub(self.last_request_ms) >= RESIZE_COALESCE_MS {
            self.pending = None;
            Some(pending)
        } else {
            None
        }
    }
}

/// Cursor blink visibility from an elapsed-time counter, matching the
/// donor's even/odd half-period toggle.
pub fn cursor_visible(elapsed_ms: u64, blink_enabled: bool) -> bool {
    if !blink_enabled {
        return true;
    }
    (elapsed_ms / CURSOR_BLINK_INTERVAL_MS) % 2 == 0
}

/// Whether synchronized output should withhold this frame: true while the
/// mode is active and the hold hasn't exceeded the safety ceiling.
pub fn should_withhold_frame(sync_active: bool, held_for_ms: u64) -> bool {
    sync_active && held_for_ms < SYNC_UPDATE_SAFETY_MS
}

/// A pair of codepoints that combine into a single regional-indicator
/// flag glyph (two REGIONAL INDICATOR SYMBOL LETTERs in sequence).
fn is_regional_indicator(c: char) -> bool {
    matches!(c as u32, 0x1F1E6..=0x1F1FF)
}

pub struct RenderPipeline {
    pub glyphs: GlyphCache,
    pub sprites: SpriteSynthesizer,
}

impl RenderPipeline {
    pub fn new(sprites: SpriteSynthesizer) -> Self {
        Self { glyphs: GlyphCache::new(), sprites }
    }

    /// Build this frame's draw batches from a terminal snapshot.
    ///
    /// `cell_width`/`cell_height` are the current font metrics in
    /// pixels; `x_offset`/`y_offset` place the grid inside the window
    /// past chrome (tab bar, padding) owned by the windowing component.
    #[allow(clippy::too_many_arguments)]
    pub fn build_frame(
        &mut self,
        terminal: &dyn Terminal,
        selection: Option<&Selection>,
        primary: &mut dyn FontRasterizer,
        shaper: &dyn TextShaper,
        discovery: &dyn FontDiscovery,
        cell_width: i32,
        cell_height: i32,
        baseline: i32,
        cursor_visible: bool,
        x_offset: f32,
        y_offset: f32,
    ) -> FrameBatches {
        let mut batches = FrameBatches::default();
        let cols = terminal.cols();
        let rows = terminal.rows();
        let cursor = terminal.cursor();

        let mut emitted = 0usize;
        let mut skip_next_regional = false;

        'rows: for row in 0..rows {
            let mut col = 0usize;
            while col < cols {
                if emitted >= MAX_CELLS {
                    batches.truncated = true;
                    break 'rows;
                }

                let Some(cell) = terminal.cell(col, row) else {
                    col += 1;
                    continue;
                };
                let x0 = col as f32 * cell_width as f32 + x_offset;
                let y0 = row as f32 * cell_height as f32 + y_offset;
                let cell_w = if cell.wide == crate::core::terminal::WideTag::Wide {
                    cell_width as f32 * 2.0
                } else {
                    cell_width as f32
                };

                if skip_next_regional {
                    skip_next_regional = false;
                    col += 1;
                    continue;
                }

                let is_selected = selection.is_some_and(|sel| sel.contains(row as i64, col));

                let bg_color = cell
                    .bg
                    .map(|rgb| Rgba(rgb.r as f32 / 255.0, rgb.g as f32 / 255.0, rgb.b as f32 / 255.0, 1.0));
                if let Some(bg) = bg_color {
                    if is_selected || bg.0 != 0.0 || bg.1 != 0.0 || bg.2 != 0.0 {
                        batches.background.push(CellInstance {
                            x: x0,
                            y: y0,
                            w: cell_w,
                            h: cell_height as f32,
                            uv: GlyphRegion { x: 0, y: 0, w: 0, h: 0 },
                            color: bg,
                        });
                        emitted += 1;
                    }
                }

                let is_cursor_cell = cursor_visible
                    && cursor.row == row
                    && cursor.col == col
                    && terminal.viewport_at_bottom();
                if is_cursor_cell {
                    let (cx, cy, cw2, chh) = match cursor.style {
                        CursorStyle::Bar => (x0, y0, 2.0, cell_height as f32),
                        CursorStyle::Underline => (x0, y0 + cell_height as f32 - 2.0, cell_w, 2.0),
                        CursorStyle::Block | CursorStyle::BlockHollow => (x0, y0, cell_w, cell_height as f32),
                    };
                    batches.background.push(CellInstance {
                        x: cx,
                        y: cy,
                        w: cw2,
                        h: chh,
                        uv: GlyphRegion { x: 0, y: 0, w: 0, h: 0 },
                        color: Rgba(1.0, 1.0, 1.0, 1.0),
                    });
                    emitted += 1;
                }

                if cell.codepoint != ' ' && cell.codepoint != '\0' {
                    let fg = Rgba(cell.fg.r as f32 / 255.0, cell.fg.g as f32 / 255.0, cell.fg.b as f32 / 255.0, 1.0);

                    let next_is_regional = is_regional_indicator(cell.codepoint)
                        && col + 1 < cols
                        && terminal
                            .cell(col + 1, row)
                            .is_some_and(|c| is_regional_indicator(c.codepoint));

                    let glyph = if next_is_regional {
                        let second = terminal.cell(col + 1, row).map(|c| c.codepoint).unwrap_or(' ');
                        skip_next_regional = true;
                        self.glyphs.get_grapheme(
                            cell.codepoint, &[second], primary, shaper, discovery, cell_width, baseline,
                        )
                    } else if let Some((base, extras)) = terminal.grapheme(col, row) {
                        if extras.1 > 0 {
                            self.glyphs.get_grapheme(
                                base, &extras.0[..extras.1 as usize], primary, shaper, discovery, cell_width, baseline,
                            )
                        } else {
                            self.glyphs.get(cell.codepoint, primary, discovery, &self.sprites, cell_width, baseline)
                        }
                    } else {
                        self.glyphs.get(cell.codepoint, primary, discovery, &self.sprites, cell_width, baseline)
                    };

                    if let Some(glyph) = glyph {
                        let gx = x0 + glyph.bearing_x as f32;
                        let gy = y0 + baseline as f32 - glyph.bearing_y as f32;
                        let instance = CellInstance {
                            x: gx,
                            y: gy,
                            w: glyph.size_x as f32,
                            h: glyph.size_y as f32,
                            uv: glyph.region,
                            color: fg,
                        };
                        emitted += 1;
                        if glyph.is_color {
                            batches.color_text.push(instance);
                        } else {
                            batches.text.push(instance);
                        }
                    }
                }

                col += 1;
            }
        }

        batches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_coalescer_debounces() {
        let mut c = ResizeCoalescer::new();
        assert_eq!(c.request(80, 24, 0), None);
        assert_eq!(c.poll(10), None);
        assert_eq!(c.poll(25), Some((80, 24)));
        assert_eq!(c.poll(26), None);
    }

    #[test]
    fn cursor_blink_toggles_on_half_period() {
        assert!(cursor_visible(0, true));
        assert!(!cursor_visible(CURSOR_BLINK_INTERVAL_MS, true));
        assert!(cursor_visible(CURSOR_BLINK_INTERVAL_MS * 2, true));
    }

    #[test]
    fn cursor_always_visible_without_blink() {
        assert!(cursor_visible(CURSOR_BLINK_INTERVAL_MS, false));
    }

    #[test]
    fn sync_output_withholds_until_ceiling() {
        assert!(should_withhold_frame(true, 0));
        assert!(should_withhold_frame(true, 999));
        assert!(!should_withhold_frame(true, 1000));
        assert!(!should_withhold_frame(false, 0));
    }

    #[test]
    fn regional_indicator_detection() {
        assert!(is_regional_indicator('\u{1F1FA}'));
        assert!(!is_regional_indicator('a'));
    }
}
