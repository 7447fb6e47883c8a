use gpui::Pixels;

use super::WordSpan;

/// Text layout and measurement facilities provided by the rendering host.
pub trait TextLayoutHost {
    /// Zero-based visual line containing the byte `offset`.
    fn line_for_offset(&self, offset: usize) -> usize;

    /// Byte offset where visual `line` starts.
    fn line_start_offset(&self, line: usize) -> usize;

    /// Rendered width of `text` in the widget's font.
    fn measure_text_width(&self, text: &str) -> Pixels;
}

/// Where a selected word sits, for anchoring a popup over it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WordPosition {
    /// One-based visual line of the word's first character.
    pub line_number: usize,
    /// Horizontal distance from the line start to the middle of the word.
    pub left_offset: Pixels,
}

/// Horizontal offset from the start of the line to the visual midpoint of `word`.
///
/// `line_start` must be the start of the visual line containing
/// `selection_start`; the prefix between them is measured as one run.
pub fn left_offset(
    host: &(impl TextLayoutHost + ?Sized),
    text: &str,
    line_start: usize,
    selection_start: usize,
    word: &str,
) -> Pixels {
    let prefix = text.get(line_start..selection_start).unwrap_or_default();
    host.measure_text_width(prefix) + host.measure_text_width(word) / 2.
}

/// Resolves the visual line of `span` and the offset of its midpoint on that line.
pub fn resolve_word_position(
    host: &(impl TextLayoutHost + ?Sized),
    text: &str,
    span: WordSpan,
) -> WordPosition {
    let line = host.line_for_offset(span.start);
    let line_start = host.line_start_offset(line).min(span.start);
    let word = text.get(span.range()).unwrap_or_default();

    WordPosition {
        line_number: line + 1,
        left_offset: left_offset(host, text, line_start, span.start, word),
    }
}
