//! Concrete `FontRasterizer`/`TextShaper`/`FontDiscovery` (§6.3-6.5),
//! backed by `fontdue` + `rustybuzz` + platform font-file resolution.
//!
//! Grounded on the donor's `font/collection.rs` (fontdue rasterization,
//! per-style face loading) and `font/shaper.rs` (rustybuzz run shaping),
//! simplified to the single-face-per-call shape the capability traits
//! expose (no per-run font-fallback segmentation — callers retry a
//! fallback `FontRasterizer`/`TextShaper` pair on a missed glyph instead).

use std::path::{Path, PathBuf};

use rustybuzz::ttf_parser;

use super::fonts::{Bitmap, FontDiscovery, FontRasterizer, Hinting, ShapedGlyph, TextShaper};

/// A loaded font face: raw bytes kept alive for `rustybuzz`, plus a
/// `fontdue` rasterizer built from the same bytes.
pub struct FontdueRasterizer {
    raster: fontdue::Font,
    size_px: f32,
}

impl FontdueRasterizer {
    pub fn from_bytes(bytes: &[u8], size_px: f32) -> Option<Self> {
        let raster = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default()).ok()?;
        Some(Self { raster, size_px })
    }
}

impl FontRasterizer for FontdueRasterizer {
    fn char_index(&self, codepoint: char) -> Option<u32> {
        let idx = self.raster.lookup_glyph_index(codepoint);
        if idx == 0 { None } else { Some(u32::from(idx)) }
    }

    fn rasterize(&mut self, glyph_index: u32, _hinting: Hinting, _color: bool) -> Option<Bitmap> {
        let idx = u16::try_from(glyph_index).ok()?;
        let (metrics, buffer) = self.raster.rasterize_indexed(idx, self.size_px);
        Some(Bitmap {
            width: metrics.width as u32,
            rows: metrics.height as u32,
            pitch: metrics.width as u32,
            buffer,
            bitmap_left: metrics.xmin,
            bitmap_top: metrics.ymin,
            advance_26_6: (metrics.advance_width * 64.0) as i32,
            is_color: false,
        })
    }

    fn metrics(&self) -> super::fonts::FontMetrics {
        let face = self.raster.horizontal_line_metrics(self.size_px);
        let (ascent, descent, line_gap) = face
            .map(|m| (m.ascent, m.descent, m.line_gap))
            .unwrap_or((self.size_px, -self.size_px * 0.2, 0.0));
        let cell_height = (ascent - descent + line_gap).round().max(1.0) as u32;
        let cell_width = (self.size_px * 0.6).round().max(1.0) as u32;
        let cell_baseline = ascent.round().max(0.0) as u32;
        super::fonts::FontMetrics { cell_width, cell_height, cell_baseline, box_thickness: 1 }
    }
}

/// Shapes a single run of codepoints against one `rustybuzz` face.
pub struct RustybuzzShaper {
    bytes: Vec<u8>,
    face_index: u32,
}

impl RustybuzzShaper {
    pub fn from_bytes(bytes: Vec<u8>, face_index: u32) -> Self {
        Self { bytes, face_index }
    }
}

impl TextShaper for RustybuzzShaper {
    fn shape(&self, codepoints: &[char]) -> Vec<ShapedGlyph> {
        let Some(face) = rustybuzz::Face::from_slice(&self.bytes, self.face_index) else {
            return Vec::new();
        };
        let text: String = codepoints.iter().collect();
        let mut buffer = rustybuzz::UnicodeBuffer::new();
        buffer.push_str(&text);
        buffer.guess_segment_properties();
        let output = rustybuzz::shape(&face, &[], buffer);

        let infos = output.glyph_infos();
        let positions = output.glyph_positions();
        infos
            .iter()
            .zip(positions.iter())
            .map(|(info, pos)| ShapedGlyph {
                glyph_id: info.glyph_id,
                x_advance: pos.x_advance,
                y_advance: pos.y_advance,
                x_offset: pos.x_offset,
                y_offset: pos.y_offset,
                cluster: info.cluster,
            })
            .collect()
    }
}

/// Face-lookup helper shared by the rasterizer/shaper constructors — reads
/// the `units_per_em`/face-index pair `compute_metrics` also needs.
pub fn load_face_bytes(path: &Path) -> std::io::Result<Vec<u8>> {
    std::fs::read(path)
}

/// Font family search list, by platform. A small, fixed candidate set
/// rather than a full system font-enumeration API — this component only
/// needs "does a known-good monospace family exist at this path".
#[cfg(target_os = "windows")]
const CANDIDATE_FAMILIES: &[&str] = &[
    r"C:\Windows\Fonts\CascadiaMono.ttf",
    r"C:\Windows\Fonts\consola.ttf",
    r"C:\Windows\Fonts\cour.ttf",
];

#[cfg(not(target_os = "windows"))]
const CANDIDATE_FAMILIES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
];

/// Emoji/symbol fallback candidates, checked when the primary family
/// doesn't cover a codepoint.
#[cfg(target_os = "windows")]
const FALLBACK_FAMILIES: &[&str] = &[r"C:\Windows\Fonts\seguiemj.ttf", r"C:\Windows\Fonts\segoeui.ttf"];

#[cfg(not(target_os = "windows"))]
const FALLBACK_FAMILIES: &[&str] = &[
    "/usr/share/fonts/truetype/noto/NotoColorEmoji.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
];

/// Resolves family/fallback font file paths by checking a fixed candidate
/// list for existence, in priority order. Grounded on the donor's
/// `render/font_discovery.rs` table-driven resolution, simplified from
/// DirectWrite family-name matching to direct path probing (no COM
/// dependency needed for the candidate set this component ships with).
pub struct SystemFontDiscovery;

impl FontDiscovery for SystemFontDiscovery {
    fn resolve_family(&self, _family: &str, _weight: u16) -> Option<(PathBuf, u32)> {
        CANDIDATE_FAMILIES
            .iter()
            .map(PathBuf::from)
            .find(|p| p.is_file())
            .map(|p| (p, 0))
    }

    fn resolve_fallback(&self, _codepoint: char) -> Option<(PathBuf, u32)> {
        FALLBACK_FAMILIES
            .iter()
            .map(PathBuf::from)
            .find(|p| p.is_file())
            .map(|p| (p, 0))
    }
}

/// Parses a face with `ttf_parser` for `compute_metrics`.
pub fn parse_face(bytes: &[u8], index: u32) -> Option<ttf_parser::Face<'_>> {
    ttf_parser::Face::parse(bytes, index).ok()
}
