use std::ops::Range;

use unicode_segmentation::UnicodeSegmentation;

/// Returns true if the character is considered part of a word (alphanumeric or underscore).
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Half-open byte range of one word in the displayed text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WordSpan {
    /// Byte offset of the first byte of the word.
    pub start: usize,
    /// Byte offset one past the last byte of the word.
    pub end: usize,
}

impl WordSpan {
    /// Creates a span. `start` must be less than `end`.
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start < end, "word span must not be empty");
        Self { start, end }
    }

    /// The span as a `Range<usize>`.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Always false; word spans are never empty.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Whether `offset` falls inside the span (`start <= offset < end`).
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

impl From<WordSpan> for Range<usize> {
    fn from(span: WordSpan) -> Self {
        span.range()
    }
}

/// Rule deciding where words start and end.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WordBoundary {
    /// UAX #29 word boundaries. A segment counts as a word when it contains at
    /// least one alphanumeric character, so `can't` and `3.14` stay whole and
    /// every CJK ideograph is its own word.
    #[default]
    Unicode,
    /// Maximal runs of grapheme clusters starting with an alphanumeric
    /// character or `_`. Any other grapheme splits words.
    Alphanumeric,
}

/// Splits `text` into ordered, non-overlapping word spans.
///
/// Leading and trailing non-word characters never belong to a span, and a
/// text without word characters yields no spans at all.
pub fn segment(text: &str, boundary: WordBoundary) -> Vec<WordSpan> {
    match boundary {
        WordBoundary::Unicode => text
            .unicode_word_indices()
            .filter_map(|(start, word)| {
                trim_to_word_graphemes(word)
                    .map(|range| WordSpan::new(start + range.start, start + range.end))
            })
            .collect(),
        WordBoundary::Alphanumeric => alphanumeric_runs(text),
    }
}

/// Narrows a UAX #29 segment to its first through last grapheme that starts
/// with a word character. A mark following whitespace joins the whitespace's
/// segment, so segments may open with a space.
fn trim_to_word_graphemes(word: &str) -> Option<Range<usize>> {
    let mut word_graphemes = word
        .grapheme_indices(true)
        .filter(|(_, grapheme)| grapheme.chars().next().is_some_and(is_word_char));
    let (start, first) = word_graphemes.next()?;
    let end = word_graphemes
        .next_back()
        .map_or(start + first.len(), |(idx, grapheme)| idx + grapheme.len());
    Some(start..end)
}

fn alphanumeric_runs(text: &str) -> Vec<WordSpan> {
    let mut spans = Vec::new();
    let mut run_start: Option<usize> = None;

    for (idx, grapheme) in text.grapheme_indices(true) {
        let is_word = grapheme.chars().next().is_some_and(is_word_char);
        match (is_word, run_start) {
            (true, None) => run_start = Some(idx),
            (false, Some(start)) => {
                spans.push(WordSpan::new(start, idx));
                run_start = None;
            }
            _ => {}
        }
    }

    if let Some(start) = run_start {
        spans.push(WordSpan::new(start, text.len()));
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str, boundary: WordBoundary) -> Vec<&str> {
        segment(text, boundary)
            .into_iter()
            .map(|span| &text[span.range()])
            .collect()
    }

    #[test]
    fn test_is_word_char() {
        assert!(is_word_char('a'));
        assert!(is_word_char('Z'));
        assert!(is_word_char('7'));
        assert!(is_word_char('_'));
        assert!(is_word_char('é'));
        assert!(!is_word_char(' '));
        assert!(!is_word_char(','));
        assert!(!is_word_char('\n'));
    }

    #[test]
    fn test_empty_text_has_no_words() {
        assert!(segment("", WordBoundary::Unicode).is_empty());
        assert!(segment("", WordBoundary::Alphanumeric).is_empty());
    }

    #[test]
    fn test_whitespace_only_has_no_words() {
        assert!(segment("   ", WordBoundary::Unicode).is_empty());
        assert!(segment("   ", WordBoundary::Alphanumeric).is_empty());
        assert!(segment(" ,.!? \n\t", WordBoundary::Unicode).is_empty());
    }

    #[test]
    fn test_punctuation_is_excluded() {
        assert_eq!(words("Hello, world!", WordBoundary::Unicode), ["Hello", "world"]);
        assert_eq!(
            words("Hello, world!", WordBoundary::Alphanumeric),
            ["Hello", "world"]
        );
        assert_eq!(
            segment("Hello, world!", WordBoundary::Unicode),
            [WordSpan::new(0, 5), WordSpan::new(7, 12)]
        );
    }

    #[test]
    fn test_leading_and_trailing_delimiters() {
        assert_eq!(
            segment("  (quiet)  ", WordBoundary::Unicode),
            [WordSpan::new(3, 8)]
        );
    }

    #[test]
    fn test_unicode_keeps_contractions_whole() {
        assert_eq!(words("don't stop", WordBoundary::Unicode), ["don't", "stop"]);
        assert_eq!(
            words("don't stop", WordBoundary::Alphanumeric),
            ["don", "t", "stop"]
        );
    }

    #[test]
    fn test_multibyte_offsets_are_byte_offsets() {
        let text = "café über naïve";
        let spans = segment(text, WordBoundary::Unicode);
        assert_eq!(words(text, WordBoundary::Unicode), ["café", "über", "naïve"]);
        assert_eq!(spans[0], WordSpan::new(0, 5));
        assert_eq!(spans[1].start, 6);
    }

    #[test]
    fn test_cjk_ideographs_are_separate_words() {
        assert_eq!(words("你好 world", WordBoundary::Unicode), ["你", "好", "world"]);
    }

    #[test]
    fn test_combining_marks_stay_in_word() {
        // "e" followed by a combining acute accent is one grapheme.
        let text = "cafe\u{301} noir";
        assert_eq!(
            words(text, WordBoundary::Alphanumeric),
            ["cafe\u{301}", "noir"]
        );
        assert_eq!(words(text, WordBoundary::Unicode), ["cafe\u{301}", "noir"]);
    }

    #[test]
    fn test_mark_after_space_does_not_start_a_word() {
        // U+093E (Devanagari vowel sign AA) attaches to the preceding space.
        let text = "word \u{93e}x";
        let spans = words(text, WordBoundary::Unicode);
        assert!(spans.contains(&"word"));
        assert!(spans.contains(&"x"));
        assert!(
            spans.iter().all(|word| !word.starts_with(' ')),
            "{spans:?} has a span starting with a space"
        );

        // NBSP followed by U+0BBE (Tamil vowel sign AA).
        assert!(segment("\u{a0}\u{bbe}", WordBoundary::Unicode).is_empty());
    }

    #[test]
    fn test_trailing_format_char_is_trimmed() {
        assert_eq!(words("soft\u{ad} hyphen", WordBoundary::Unicode), ["soft", "hyphen"]);
    }

    #[test]
    fn test_word_span_contains() {
        let span = WordSpan::new(4, 7);
        assert!(!span.contains(3));
        assert!(span.contains(4));
        assert!(span.contains(6));
        assert!(!span.contains(7));
        assert_eq!(span.len(), 3);
        assert_eq!(Range::from(span), 4..7);
    }
}
