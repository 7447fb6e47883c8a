use std::ops::Range;

use gpui::SharedString;

use super::{SelectionOverlay, WordBoundary, WordSpan, segment};

/// One clickable word region: its ordinal in the text and its byte span.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WordRegion {
    /// Position of the word among all words of the text.
    pub index: usize,
    /// Byte range covered by the word.
    pub span: WordSpan,
}

/// Registry of clickable word regions, sorted by start offset.
///
/// Taps are resolved by looking up the byte offset under the pointer rather
/// than by giving every word its own handler.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpanIndex {
    spans: Vec<WordSpan>,
}

impl SpanIndex {
    /// Builds the registry from segmenter output. Spans must be sorted and disjoint.
    pub fn new(spans: Vec<WordSpan>) -> Self {
        debug_assert!(spans.windows(2).all(|pair| pair[0].end <= pair[1].start));
        Self { spans }
    }

    /// Number of regions.
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// True when the text has no words.
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Region by ordinal.
    pub fn get(&self, index: usize) -> Option<WordRegion> {
        self.spans
            .get(index)
            .map(|&span| WordRegion { index, span })
    }

    /// The region covering `offset`, if any. Offsets in the gaps between words
    /// (whitespace, punctuation) resolve to nothing.
    pub fn region_at(&self, offset: usize) -> Option<WordRegion> {
        let index = self.spans.partition_point(|span| span.end <= offset);
        self.get(index).filter(|region| region.span.contains(offset))
    }

    /// Iterates all regions in text order.
    pub fn iter(&self) -> impl Iterator<Item = WordRegion> + '_ {
        self.spans
            .iter()
            .enumerate()
            .map(|(index, &span)| WordRegion { index, span })
    }

    /// Moves regions for `len` bytes inserted at `at`.
    ///
    /// Regions are exclusive at both ends: text inserted exactly at a start
    /// or end offset lands outside the region.
    pub fn shift_for_insert(&mut self, at: usize, len: usize) {
        for span in &mut self.spans {
            let shifted = shift_range_for_insert(span.range(), at, len);
            *span = WordSpan::new(shifted.start, shifted.end);
        }
    }
}

/// Applies exclusive-exclusive insertion semantics to one range.
pub fn shift_range_for_insert(range: Range<usize>, at: usize, len: usize) -> Range<usize> {
    if at <= range.start {
        range.start + len..range.end + len
    } else if at < range.end {
        range.start..range.end + len
    } else {
        range
    }
}

/// The displayed text together with its word regions and the current selection overlay.
#[derive(Clone, Debug, Default)]
pub struct DisplayText {
    text: SharedString,
    spans: SpanIndex,
    pub(super) overlay: Option<SelectionOverlay>,
}

impl DisplayText {
    /// Segments `text` and attaches one clickable region per word.
    ///
    /// The returned value has no selection overlay.
    pub fn attach(text: impl Into<SharedString>, boundary: WordBoundary) -> Self {
        let text = text.into();
        let spans = SpanIndex::new(segment(&text, boundary));
        Self {
            text,
            spans,
            overlay: None,
        }
    }

    /// The raw text.
    pub fn text(&self) -> &SharedString {
        &self.text
    }

    /// Length of the text in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// True for empty text.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The word region registry.
    pub fn spans(&self) -> &SpanIndex {
        &self.spans
    }

    /// Text covered by `region`.
    pub fn word(&self, region: &WordRegion) -> Option<&str> {
        self.text.get(region.span.range())
    }

    /// Inserts `s` at byte offset `at`, moving regions and the overlay with
    /// exclusive-exclusive semantics. Returns false (and changes nothing) when
    /// `at` is not a char boundary of the text.
    pub fn insert_str(&mut self, at: usize, s: &str) -> bool {
        if !self.text.is_char_boundary(at) {
            return false;
        }
        if s.is_empty() {
            return true;
        }

        let mut text = String::with_capacity(self.text.len() + s.len());
        text.push_str(&self.text[..at]);
        text.push_str(s);
        text.push_str(&self.text[at..]);
        self.text = text.into();

        self.spans.shift_for_insert(at, s.len());
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.shift_for_insert(at, s.len());
        }
        true
    }
}
