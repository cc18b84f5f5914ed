//! Text Measurement
//!
//! Shaping is an external concern: a [`GlyphShaper`] turns a string into
//! positioned glyph records. This module only wraps and aligns them.
//!
//! Wrapping is greedy: glyphs are packed onto the current line until the next
//! glyph's advance would exceed the wrap width. A line always takes at least
//! one glyph, so a glyph wider than the wrap width gets a line of its own.
//!
//! [`MonospaceShaper`] is a grid approximation for tests and terminal-like
//! backends: ASCII printable is one cell, CJK and emoji are two, control
//! characters are zero.

use crate::state::TextEdit;
use crate::style::FontId;
use crate::types::{Rect, TextAlign, Vec2};

// =============================================================================
// Shaping
// =============================================================================

/// One glyph as produced by the shaping backend.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShapedGlyph {
    /// Pen advance to the next glyph.
    pub advance_x: f32,
    /// Bitmap offset from the pen position.
    pub offset: Vec2,
    /// Bitmap size.
    pub size: Vec2,
    /// Atlas coordinates of the bitmap.
    pub uv: Rect,
    /// Hard line break. Takes no space.
    pub line_break: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShapedRun {
    pub glyphs: Vec<ShapedGlyph>,
    pub line_height: f32,
}

/// Produces shaped glyph metrics for a string.
pub trait GlyphShaper {
    fn shape(&mut self, text: &str, font: FontId) -> ShapedRun;
}

/// Display width of a character in grid cells.
pub fn char_cells(c: char) -> u8 {
    if c.is_ascii() {
        return if c.is_ascii_control() { 0 } else { 1 };
    }
    let code = c as u32;
    if (0x1100..=0x115F).contains(&code)     // Hangul Jamo
        || (0x2E80..=0x9FFF).contains(&code)   // CJK
        || (0xAC00..=0xD7A3).contains(&code)   // Hangul Syllables
        || (0xF900..=0xFAFF).contains(&code)   // CJK Compatibility
        || (0xFE10..=0xFE1F).contains(&code)   // Vertical Forms
        || (0xFE30..=0xFE6F).contains(&code)   // CJK Compatibility Forms
        || (0xFF00..=0xFF60).contains(&code)   // Fullwidth Forms
        || (0xFFE0..=0xFFE6).contains(&code)   // Fullwidth Forms
        || (0x1F300..=0x1F9FF).contains(&code) // Emoji
        || (0x20000..=0x2FFFF).contains(&code) // CJK Extension B-F
    {
        2
    } else {
        1
    }
}

/// Display width of a string in grid cells.
pub fn text_cells(s: &str) -> usize {
    s.chars().map(|c| char_cells(c) as usize).sum()
}

/// Fixed-grid shaper: every cell is `cell_width` wide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceShaper {
    pub cell_width: f32,
    pub line_height: f32,
}

impl Default for MonospaceShaper {
    fn default() -> Self {
        Self {
            cell_width: 8.0,
            line_height: 16.0,
        }
    }
}

impl GlyphShaper for MonospaceShaper {
    fn shape(&mut self, text: &str, _font: FontId) -> ShapedRun {
        let glyphs = text
            .chars()
            .map(|c| {
                if c == '\n' {
                    return ShapedGlyph {
                        line_break: true,
                        ..ShapedGlyph::default()
                    };
                }
                let advance = char_cells(c) as f32 * self.cell_width;
                ShapedGlyph {
                    advance_x: advance,
                    offset: Vec2::ZERO,
                    size: Vec2::new(advance, self.line_height),
                    uv: Rect::ZERO,
                    line_break: false,
                }
            })
            .collect();
        ShapedRun {
            glyphs,
            line_height: self.line_height,
        }
    }
}

// =============================================================================
// Wrapping
// =============================================================================

/// A wrapped line: a glyph range plus its measured width and alignment offset.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextLine {
    pub first_glyph: usize,
    pub glyph_count: usize,
    pub width: f32,
    /// Horizontal offset from the content origin, set by alignment.
    pub offset_x: f32,
}

/// Greedily pack `glyphs` into lines no wider than `wrap_width`.
///
/// Returns the number of soft wraps (line breaks caused by width, not by
/// hard line-break glyphs).
pub fn wrap_glyphs(glyphs: &[ShapedGlyph], wrap_width: f32, lines: &mut Vec<TextLine>) -> u32 {
    lines.clear();
    if glyphs.is_empty() {
        return 0;
    }

    let mut wraps = 0u32;
    let mut line = TextLine::default();

    for (i, glyph) in glyphs.iter().enumerate() {
        if glyph.line_break {
            lines.push(line);
            line = TextLine {
                first_glyph: i + 1,
                ..TextLine::default()
            };
            continue;
        }

        if line.glyph_count > 0 && line.width + glyph.advance_x > wrap_width {
            lines.push(line);
            wraps += 1;
            line = TextLine {
                first_glyph: i,
                ..TextLine::default()
            };
        }
        line.glyph_count += 1;
        line.width += glyph.advance_x;
    }
    lines.push(line);
    wraps
}

// =============================================================================
// Text resource
// =============================================================================

/// Cached shaping and wrapping results for one text node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextResource {
    pub text: String,
    pub glyphs: Vec<ShapedGlyph>,
    pub line_height: f32,
    pub lines: Vec<TextLine>,
    /// Soft wraps in the last wrap.
    pub wrap_count: u32,
    /// Wrap width the current `lines` were computed for.
    pub wrap_width: f32,
    /// Text changed since the last shaping.
    pub dirty: bool,
    /// Edits applied by interaction that the caller's buffer has not seen yet.
    pub pending_edits: Vec<TextEdit>,
}

impl TextResource {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            dirty: true,
            ..Self::default()
        }
    }

    /// Replace the text, marking it for reshaping when it differs.
    pub fn set_text(&mut self, text: &str) {
        if self.text != text {
            self.text.clear();
            self.text.push_str(text);
            self.dirty = true;
        }
    }

    /// Reshape if the text changed.
    pub fn shape_if_dirty(&mut self, shaper: &mut dyn GlyphShaper, font: FontId) {
        if !self.dirty {
            return;
        }
        let run = shaper.shape(&self.text, font);
        self.glyphs = run.glyphs;
        self.line_height = run.line_height;
        self.dirty = false;
    }

    /// Wrap to `wrap_width` and return the text block size.
    pub fn measure(&mut self, wrap_width: f32) -> Vec2 {
        self.wrap_width = wrap_width;
        self.wrap_count = wrap_glyphs(&self.glyphs, wrap_width, &mut self.lines);
        let width = self.lines.iter().map(|l| l.width).fold(0.0, f32::max);
        Vec2::new(width, self.lines.len() as f32 * self.line_height)
    }

    /// Set each line's horizontal offset inside `available_width`.
    pub fn align_lines(&mut self, align: TextAlign, available_width: f32) {
        for line in &mut self.lines {
            let free = available_width - line.width;
            line.offset_x = match align {
                TextAlign::Start => 0.0,
                TextAlign::Center => free * 0.5,
                TextAlign::End => free,
            };
        }
    }

    pub fn line_glyphs(&self, line: &TextLine) -> &[ShapedGlyph] {
        let end = (line.first_glyph + line.glyph_count).min(self.glyphs.len());
        &self.glyphs[line.first_glyph.min(end)..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shaped(text: &str) -> TextResource {
        let mut res = TextResource::new(text);
        res.shape_if_dirty(&mut MonospaceShaper::default(), FontId::default());
        res
    }

    #[test]
    fn test_cells_ascii_and_wide() {
        assert_eq!(text_cells("hello"), 5);
        assert_eq!(text_cells("a\tb"), 2);
        assert_eq!(text_cells("日本"), 4);
    }

    #[test]
    fn test_shaper_advances() {
        let run = MonospaceShaper::default().shape("a日\n", FontId::default());
        assert_eq!(run.glyphs.len(), 3);
        assert_eq!(run.glyphs[0].advance_x, 8.0);
        assert_eq!(run.glyphs[1].advance_x, 16.0);
        assert!(run.glyphs[2].line_break);
        assert_eq!(run.line_height, 16.0);
    }

    #[test]
    fn test_wrap_greedy() {
        let mut res = shaped("abcdefghij");
        let size = res.measure(32.0);

        assert_eq!(res.lines.len(), 3);
        assert_eq!(res.wrap_count, 2);
        assert_eq!(res.lines[0].glyph_count, 4);
        assert_eq!(res.lines[2].glyph_count, 2);
        assert_eq!(size, Vec2::new(32.0, 48.0));
    }

    #[test]
    fn test_wrap_exact_fit_does_not_wrap() {
        let mut res = shaped("abcd");
        res.measure(32.0);
        assert_eq!(res.lines.len(), 1);
        assert_eq!(res.wrap_count, 0);
    }

    #[test]
    fn test_wrap_hard_breaks() {
        let mut res = shaped("ab\ncd\n");
        let size = res.measure(1000.0);

        assert_eq!(res.lines.len(), 3);
        assert_eq!(res.wrap_count, 0);
        assert_eq!(res.lines[1].first_glyph, 3);
        assert_eq!(res.lines[2].glyph_count, 0);
        assert_eq!(size.y, 48.0);
    }

    #[test]
    fn test_wrap_oversized_glyph_gets_own_line() {
        let mut res = shaped("ab");
        res.measure(4.0);
        assert_eq!(res.lines.len(), 2);
        assert!(res.lines.iter().all(|l| l.glyph_count == 1));
    }

    #[test]
    fn test_empty_text_has_no_lines() {
        let mut res = shaped("");
        assert_eq!(res.measure(100.0), Vec2::ZERO);
    }

    #[test]
    fn test_align_lines() {
        let mut res = shaped("abcdef");
        res.measure(32.0);
        res.align_lines(TextAlign::Center, 40.0);
        assert_eq!(res.lines[0].offset_x, 4.0);
        assert_eq!(res.lines[1].offset_x, 12.0);

        res.align_lines(TextAlign::End, 40.0);
        assert_eq!(res.lines[1].offset_x, 24.0);
    }

    #[test]
    fn test_set_text_marks_dirty_only_on_change() {
        let mut res = shaped("abc");
        res.set_text("abc");
        assert!(!res.dirty);
        res.set_text("abd");
        assert!(res.dirty);
    }

    #[test]
    fn test_line_glyphs() {
        let mut res = shaped("abcdef");
        res.measure(16.0);
        let line = res.lines[1];
        assert_eq!(res.line_glyphs(&line).len(), 2);
    }
}
