//! URL detection under the cursor: a pure function over already-rebuilt row
//! text, decoupled from any particular grid representation.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

/// A single row-segment of a detected URL.
pub type UrlSegment = (usize, usize, usize);

/// A URL detected across one or more grid rows (handles soft-wrapped lines).
#[derive(Debug, Clone)]
pub struct DetectedUrl {
    /// Per-row segments, each inclusive.
    pub segments: Vec<UrlSegment>,
    pub url: String,
}

impl DetectedUrl {
    /// Check whether this URL covers (`abs_row`, `col`).
    pub fn contains(&self, abs_row: usize, col: usize) -> bool {
        self.segments
            .iter()
            .any(|&(r, sc, ec)| r == abs_row && col >= sc && col <= ec)
    }
}

/// What `UrlDetectCache` needs from a terminal's row storage, independent of
/// the storage's own cell/grid representation.
pub trait RowTextSource {
    /// Total number of rows available (visible + scrollback).
    fn total_rows(&self) -> usize;
    /// Rebuilt text of one row, with a column for each character.
    fn row_text(&self, abs_row: usize) -> Option<(String, Vec<usize>)>;
    /// Whether the row soft-wraps into `abs_row + 1`.
    fn row_wraps(&self, abs_row: usize) -> bool;
    /// Whether the cell at (`abs_row`, `col`) already carries an OSC 8
    /// hyperlink (those are skipped — they're already clickable as-is).
    fn has_hyperlink(&self, abs_row: usize, col: usize) -> bool;
}

/// Cache of detected URLs keyed by the first absolute row of the logical line.
#[derive(Default)]
pub struct UrlDetectCache {
    /// Logical line start row -> detected URLs for that logical line.
    lines: HashMap<usize, Vec<DetectedUrl>>,
    /// Row index -> logical line start (for fast lookup of any row).
    row_to_line: HashMap<usize, usize>,
}

impl UrlDetectCache {
    /// Find a URL at (`abs_row`, `col`), computing and caching the logical line
    /// if needed. Returns the URL string and its segments.
    pub fn url_at(&mut self, rows: &dyn RowTextSource, abs_row: usize, col: usize) -> Option<DetectedUrl> {
        let line_start = self.ensure_logical_line(rows, abs_row);
        let urls = self.lines.get(&line_start)?;
        urls.iter().find(|u| u.contains(abs_row, col)).cloned()
    }

    /// Ensure the logical line containing `abs_row` is computed and cached.
    fn ensure_logical_line(&mut self, rows: &dyn RowTextSource, abs_row: usize) -> usize {
        if let Some(&ls) = self.row_to_line.get(&abs_row) {
            return ls;
        }
        let line_start = logical_line_start(rows, abs_row);
        let line_end = logical_line_end(rows, abs_row);

        let urls = detect_urls_in_logical_line(rows, line_start, line_end);

        for r in line_start..=line_end {
            self.row_to_line.insert(r, line_start);
        }
        self.lines.insert(line_start, urls);
        line_start
    }

    /// Invalidate the entire cache (call after PTY output, scroll, resize).
    pub fn invalidate(&mut self) {
        self.lines.clear();
        self.row_to_line.clear();
    }
}

/// Walk backwards to find the start of a logical (soft-wrapped) line.
fn logical_line_start(rows: &dyn RowTextSource, abs_row: usize) -> usize {
    let mut r = abs_row;
    while r > 0 && rows.row_wraps(r - 1) {
        r -= 1;
    }
    r
}

/// Walk forwards to find the end of a logical (soft-wrapped) line.
fn logical_line_end(rows: &dyn RowTextSource, abs_row: usize) -> usize {
    let total = rows.total_rows();
    let mut r = abs_row;
    while rows.row_wraps(r) && r + 1 < total {
        r += 1;
    }
    r
}

/// URL regex pattern.
static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:https?|ftp|file)://[^\s<>\[\]'"]+"#).expect("URL regex is valid")
});

/// Trim trailing punctuation from a URL, preserving balanced parentheses.
fn trim_url_trailing(url: &str) -> &str {
    let mut s = url;
    loop {
        let prev = s;
        s = s.trim_end_matches(['.', ',', ';', ':', '!', '?']);
        if let Some(stripped) = s.strip_suffix(')') {
            let open = s.chars().filter(|&c| c == '(').count();
            let close = s.chars().filter(|&c| c == ')').count();
            if close > open {
                s = stripped;
            }
        }
        if s == prev {
            break;
        }
    }
    s
}

/// Detect URLs across a logical line spanning `line_start..=line_end` (absolute rows).
///
/// Concatenates text from all rows, runs the regex, then maps byte spans
/// back to per-row segments.
#[allow(clippy::string_slice)]
fn detect_urls_in_logical_line(
    rows: &dyn RowTextSource,
    line_start: usize,
    line_end: usize,
) -> Vec<DetectedUrl> {
    let mut text = String::new();
    let mut char_to_pos: Vec<(usize, usize)> = Vec::new();

    for abs_row in line_start..=line_end {
        let Some((row_text, col_map)) = rows.row_text(abs_row) else {
            continue;
        };
        for (ci, _ch) in row_text.chars().enumerate() {
            let col = col_map.get(ci).copied().unwrap_or(0);
            char_to_pos.push((abs_row, col));
        }
        text.push_str(&row_text);
    }

    let mut urls = Vec::new();

    for m in URL_RE.find_iter(&text) {
        let trimmed = trim_url_trailing(m.as_str());
        if trimmed.len() <= "https://".len() {
            continue;
        }

        let char_start = text[..m.start()].chars().count();
        let trimmed_char_len = trimmed.chars().count();
        let char_end = char_start + trimmed_char_len - 1;

        if char_end >= char_to_pos.len() {
            continue;
        }

        let has_osc8 = (char_start..=char_end)
            .any(|ci| rows.has_hyperlink(char_to_pos[ci].0, char_to_pos[ci].1));
        if has_osc8 {
            continue;
        }

        let mut segments: Vec<UrlSegment> = Vec::new();
        let mut current_row = char_to_pos[char_start].0;
        let mut seg_start_col = char_to_pos[char_start].1;
        let mut seg_end_col = seg_start_col;

        for &(ar, col) in &char_to_pos[char_start..=char_end] {
            if ar != current_row {
                segments.push((current_row, seg_start_col, seg_end_col));
                current_row = ar;
                seg_start_col = col;
            }
            seg_end_col = col;
        }
        segments.push((current_row, seg_start_col, seg_end_col));

        urls.push(DetectedUrl { segments, url: trimmed.to_string() });
    }

    urls
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A fixed set of plain-text rows, none of them wrapped, no hyperlinks —
    /// enough to exercise the detection logic without a real terminal grid.
    struct FakeRows(Vec<(&'static str, bool)>);

    impl RowTextSource for FakeRows {
        fn total_rows(&self) -> usize {
            self.0.len()
        }

        fn row_text(&self, abs_row: usize) -> Option<(String, Vec<usize>)> {
            let (text, _) = self.0.get(abs_row)?;
            let col_map: Vec<usize> = (0..text.chars().count()).collect();
            Some(((*text).to_owned(), col_map))
        }

        fn row_wraps(&self, abs_row: usize) -> bool {
            self.0.get(abs_row).is_some_and(|&(_, wraps)| wraps)
        }

        fn has_hyperlink(&self, _abs_row: usize, _col: usize) -> bool {
            false
        }
    }

    #[test]
    fn detect_simple_url() {
        let rows = FakeRows(vec![("Visit https://example.com for info", false)]);
        let urls = detect_urls_in_logical_line(&rows, 0, 0);
        assert_eq!(urls.len(), 1);
        assert_eq!(urls[0].url, "https://example.com");
        assert_eq!(urls[0].segments[0], (0, 6, 24));
    }

    #[test]
    fn detect_multiple_urls() {
        let rows = FakeRows(vec![("see https://a.com and http://b.com/x ok", false)]);
        let urls = detect_urls_in_logical_line(&rows, 0, 0);
        assert_eq!(urls.len(), 2);
        assert_eq!(urls[0].url, "https://a.com");
        assert_eq!(urls[1].url, "http://b.com/x");
    }

    #[test]
    fn detect_url_with_parens() {
        let rows = FakeRows(vec![("see https://en.wikipedia.org/wiki/Rust_(language) ok", false)]);
        let urls = detect_urls_in_logical_line(&rows, 0, 0);
        assert_eq!(urls.len(), 1);
        assert_eq!(urls[0].url, "https://en.wikipedia.org/wiki/Rust_(language)");
    }

    #[test]
    fn no_urls() {
        let rows = FakeRows(vec![("just plain text here", false)]);
        let urls = detect_urls_in_logical_line(&rows, 0, 0);
        assert!(urls.is_empty());
    }

    #[test]
    fn detect_wrapped_url() {
        let rows = FakeRows(vec![
            ("go https://example.com/long/path ", true),
            ("ok", false),
        ]);
        let urls = detect_urls_in_logical_line(&rows, 0, 1);
        assert_eq!(urls.len(), 1);
        assert_eq!(urls[0].url, "https://example.com/long/path");
        assert_eq!(urls[0].segments.len(), 1);
    }

    #[test]
    fn url_contains() {
        let url = DetectedUrl {
            segments: vec![(5, 3, 19), (6, 0, 10)],
            url: "https://example.com/long/path".to_owned(),
        };
        assert!(url.contains(5, 3));
        assert!(url.contains(5, 19));
        assert!(url.contains(6, 0));
        assert!(url.contains(6, 10));
        assert!(!url.contains(5, 2));
        assert!(!url.contains(5, 20));
        assert!(!url.contains(6, 11));
        assert!(!url.contains(7, 0));
    }
}
