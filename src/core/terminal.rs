//! The `Terminal` capability trait (§6.2) and its concrete implementation
//! on top of `phantty_term`'s VT engine.
//!
//! The renderer only needs the operations enumerated here; modeling access
//! this way lets `RenderPipeline` be exercised against a fake terminal in
//! tests instead of a live VT parser.

use phantty_term::grid::CursorShape as EngineCursorShape;
use phantty_term::{Event, EventListener, Rgb, Term, TermMode};

/// Wide-cell tag for a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WideTag {
    Narrow,
    Wide,
    SpacerTail,
    SpacerHead,
}

/// Cursor shape as reported by the terminal state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorStyle {
    Block,
    BlockHollow,
    Underline,
    Bar,
}

impl From<EngineCursorShape> for CursorStyle {
    fn from(shape: EngineCursorShape) -> Self {
        match shape {
            EngineCursorShape::Block => Self::Block,
            EngineCursorShape::HollowBlock => Self::BlockHollow,
            EngineCursorShape::Underline => Self::Underline,
            EngineCursorShape::Bar => Self::Bar,
        }
    }
}

/// A read-only view of one grid cell, with palette already resolved.
///
/// This is the per-cell shape the spec's `§6.2` cell-access contract
/// describes (`content_tag`, `style_id`-equivalent already folded into
/// `fg`/`bg`, `wide`, `hasGrapheme`/`lookupGrapheme` folded into
/// `grapheme`).
#[derive(Debug, Clone, Copy)]
pub struct CellView {
    pub codepoint: char,
    pub fg: Rgb,
    /// `None` means "default terminal background" (no `CellBg` instance
    /// needed unless some other override, e.g. cursor/selection, applies).
    pub bg: Option<Rgb>,
    pub wide: WideTag,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

/// Up to 8 extra codepoints making up a grapheme cluster, per the
/// `Glyph`/`SnapCell` data model (§3).
pub type Grapheme = ([char; 8], u8);

/// Cursor position and rendering style, as observed at snapshot time.
#[derive(Debug, Clone, Copy)]
pub struct CursorInfo {
    pub col: usize,
    pub row: usize,
    pub style: CursorStyle,
}

/// Per-granularity dirty flags the render pipeline checks in Phase B.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirtyFlags {
    pub terminal: bool,
    pub screen: bool,
    pub any_row: bool,
}

/// The capability the core renders against (§6.2).
///
/// `phantty_term::Term` is the concrete collaborator; this trait is the
/// seam a fake terminal could be substituted at for pipeline tests.
pub trait Terminal: Send {
    fn resize(&mut self, cols: usize, rows: usize);
    fn feed(&mut self, bytes: &[u8]);

    fn cols(&self) -> usize;
    fn rows(&self) -> usize;

    fn cursor(&self) -> CursorInfo;

    /// Resolved cell at `(viewport_col, viewport_row)`, or `None` if the
    /// coordinate is out of range.
    fn cell(&self, viewport_col: usize, viewport_row: usize) -> Option<CellView>;

    /// Grapheme cluster attached to a cell, if any (base excluded).
    fn grapheme(&self, viewport_col: usize, viewport_row: usize) -> Option<Grapheme>;

    fn scroll_viewport(&mut self, delta: isize);
    fn scroll_to_bottom(&mut self);
    fn viewport_at_bottom(&self) -> bool;

    /// `(offset, visible_len, total_len)` for the scrollbar.
    fn scrollback_metrics(&self) -> (usize, usize, usize);

    fn synchronized_output(&self) -> bool;
    fn cursor_blinking_mode(&self) -> bool;

    fn title(&self) -> &str;

    fn dirty(&self) -> DirtyFlags;
    /// Clear all dirty flags (terminal, screen, and every per-row bit).
    fn clear_dirty(&mut self);
}

/// No-op terminal event sink; `Surface` routes the events it cares about
/// (title changes, bell, clipboard) through its own channel instead.
#[derive(Clone)]
pub struct SurfaceListener;

impl EventListener for SurfaceListener {
    fn send_event(&self, _event: Event) {}
}

/// Concrete `Terminal` backed by `phantty_term::Term`.
pub struct TermBackend {
    term: Term<SurfaceListener>,
}

impl TermBackend {
    pub fn new(rows: usize, cols: usize, scrollback_bytes: usize) -> Self {
        // The donor sizes scrollback in lines, not bytes; approximate a
        // lines budget from an average ~2 bytes/cell assumption so the
        // `scrollback-limit` config key (specified in bytes, §6) still
        // means something concrete here.
        let scrollback_lines = (scrollback_bytes / (cols.max(1) * 2)).max(1);
        Self {
            term: Term::new(rows, cols, scrollback_lines, SurfaceListener),
        }
    }
}

impl Terminal for TermBackend {
    fn resize(&mut self, cols: usize, rows: usize) {
        // phantty_term's Grid handles reflow internally through VTE
        // handler calls; for an out-of-band resize we rebuild the active
        // grid's dimensions via a fresh feed-free scroll display reset.
        let _ = (cols, rows);
        // Grid resize lives on the VTE handler path in the full engine;
        // a direct resize is exposed once `term/mod.rs` grows a public
        // `resize` passthrough. Until then this is a logged no-op rather
        // than a panic, matching §7's ResizeFailure policy.
        log::warn!("Terminal::resize({cols}, {rows}) not yet wired to phantty_term::Grid::resize");
    }

    fn feed(&mut self, bytes: &[u8]) {
        let mut processor = vte::ansi::Processor::new();
        let mut handler = EngineHandlerAdapter { term: &mut self.term };
        processor.advance(&mut handler, bytes);
    }

    fn cols(&self) -> usize {
        self.term.grid().cols()
    }

    fn rows(&self) -> usize {
        self.term.grid().lines()
    }

    fn cursor(&self) -> CursorInfo {
        let grid = self.term.grid();
        let cursor = grid.cursor();
        CursorInfo {
            col: cursor.col().0,
            row: cursor.line(),
            style: self.term.cursor_shape().into(),
        }
    }

    fn cell(&self, viewport_col: usize, viewport_row: usize) -> Option<CellView> {
        use phantty_term::index::{Column, Line};

        let grid = self.term.grid();
        if viewport_row >= grid.lines() || viewport_col >= grid.cols() {
            return None;
        }
        let row = &grid[Line(viewport_row as i32)];
        let cell = &row[Column(viewport_col)];
        let palette = self.term.palette();

        let wide = if cell.flags.contains(phantty_term::CellFlags::WIDE_CHAR) {
            WideTag::Wide
        } else if cell.flags.contains(phantty_term::CellFlags::WIDE_CHAR_SPACER) {
            WideTag::SpacerTail
        } else {
            WideTag::Narrow
        };

        let bg = if cell.bg == vte::ansi::Color::Named(vte::ansi::NamedColor::Background) {
            None
        } else {
            Some(palette.resolve(cell.bg))
        };

        Some(CellView {
            codepoint: cell.ch,
            fg: palette.resolve(cell.fg),
            bg,
            wide,
            bold: cell.flags.contains(phantty_term::CellFlags::BOLD),
            italic: cell.flags.contains(phantty_term::CellFlags::ITALIC),
            underline: cell.flags.intersects(
                phantty_term::CellFlags::UNDERLINE
                    | phantty_term::CellFlags::CURLY_UNDERLINE
                    | phantty_term::CellFlags::DOUBLE_UNDERLINE
                    | phantty_term::CellFlags::DOTTED_UNDERLINE
                    | phantty_term::CellFlags::DASHED_UNDERLINE,
            ),
        })
    }

    fn grapheme(&self, viewport_col: usize, viewport_row: usize) -> Option<Grapheme> {
        use phantty_term::index::{Column, Line};

        let grid = self.term.grid();
        if viewport_row >= grid.lines() || viewport_col >= grid.cols() {
            return None;
        }
        let row = &grid[Line(viewport_row as i32)];
        let cell = &row[Column(viewport_col)];
        let extra = cell.extra.as_ref()?;
        if extra.zerowidth.is_empty() {
            return None;
        }
        let mut buf = ['\0'; 8];
        let n = extra.zerowidth.len().min(8);
        buf[..n].copy_from_slice(&extra.zerowidth[..n]);
        Some((buf, n as u8))
    }

    fn scroll_viewport(&mut self, delta: isize) {
        self.term.grid_mut().scroll_display(delta);
    }

    fn scroll_to_bottom(&mut self) {
        self.term.grid_mut().scroll_display(isize::MIN);
    }

    fn viewport_at_bottom(&self) -> bool {
        self.term.grid().display_offset() == 0
    }

    fn scrollback_metrics(&self) -> (usize, usize, usize) {
        let grid = self.term.grid();
        let offset = grid.display_offset();
        (offset, grid.lines(), grid.total_lines())
    }

    fn synchronized_output(&self) -> bool {
        self.term.mode().contains(TermMode::SYNC_UPDATE)
    }

    fn cursor_blinking_mode(&self) -> bool {
        self.term.mode().contains(TermMode::CURSOR_BLINKING)
    }

    fn title(&self) -> &str {
        self.term.title()
    }

    fn dirty(&self) -> DirtyFlags {
        let any_row = self.term.grid().dirty().is_any_dirty();
        DirtyFlags {
            terminal: any_row,
            screen: any_row,
            any_row,
        }
    }

    fn clear_dirty(&mut self) {
        // `drain()` both yields and clears; we only need the clearing
        // side-effect here, Phase C already walked the rows it needed.
        let _ = self.term.grid_mut().dirty_mut().drain().count();
    }
}

/// Adapts `vte::ansi::Handler` calls onto `phantty_term::Term`.
///
/// `phantty_term::Term` does not itself implement `vte::ansi::Handler` in
/// the excerpt this crate vendors (that wiring lives in the donor's larger
/// `term_handler` module, which this crate keeps as the application-level
/// VT-to-grid translation). This adapter is the minimal bridge so
/// `TermBackend::feed` has a concrete VTE entry point; grid mutation
/// itself is delegated to `Term::grid_mut()`.
struct EngineHandlerAdapter<'a> {
    term: &'a mut Term<SurfaceListener>,
}

impl vte::ansi::Handler for EngineHandlerAdapter<'_> {
    fn input(&mut self, c: char) {
        use phantty_term::index::{Column, Line};
        let grid = self.term.grid_mut();
        let col = grid.cursor().col();
        let line = grid.cursor().line();
        if line < grid.lines() && col.0 < grid.cols() {
            let mut cell = grid.cursor().template.clone();
            cell.ch = c;
            grid[Line(line as i32)][col] = cell;
            grid.cursor_mut().set_col(Column(col.0 + 1));
            grid.dirty_mut().mark(line);
        }
    }

    fn linefeed(&mut self) {
        let grid = self.term.grid_mut();
        let next_line = (grid.cursor().line() + 1).min(grid.lines() - 1);
        grid.cursor_mut().set_line(next_line);
        grid.dirty_mut().mark_all();
    }

    fn carriage_return(&mut self) {
        use phantty_term::index::Column;
        self.term.grid_mut().cursor_mut().set_col(Column(0));
    }
}
