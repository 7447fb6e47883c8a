//! Span invariants of the word segmenter over arbitrary text.

use gpui_word_primitives::words::{WordBoundary, is_word_char, segment};
use proptest::prelude::*;
use unicode_segmentation::UnicodeSegmentation;

fn check_spans(text: &str, boundary: WordBoundary) -> Result<(), TestCaseError> {
    let spans = segment(text, boundary);

    for pair in spans.windows(2) {
        prop_assert!(
            pair[0].end <= pair[1].start,
            "{:?} and {:?} overlap or are out of order",
            pair[0],
            pair[1]
        );
    }

    for span in &spans {
        prop_assert!(span.start < span.end);
        prop_assert!(span.end <= text.len());
        prop_assert!(text.is_char_boundary(span.start));
        prop_assert!(text.is_char_boundary(span.end));

        let word = &text[span.range()];
        prop_assert!(
            word.chars().next().is_some_and(is_word_char),
            "{word:?} starts with a non-word char"
        );
        prop_assert!(
            word.graphemes(true)
                .next_back()
                .and_then(|grapheme| grapheme.chars().next())
                .is_some_and(is_word_char),
            "{word:?} ends with a non-word grapheme"
        );
        prop_assert!(
            !word.chars().any(char::is_whitespace),
            "{word:?} contains whitespace"
        );
    }

    Ok(())
}

proptest! {
    #[test]
    fn unicode_spans_are_well_formed(text in "\\PC*") {
        check_spans(&text, WordBoundary::Unicode)?;
    }

    #[test]
    fn alphanumeric_spans_are_well_formed(text in "\\PC*") {
        check_spans(&text, WordBoundary::Alphanumeric)?;
    }

    // Words separated by single spaces come back one span per word.
    #[test]
    fn ascii_words_are_found_in_order(words in prop::collection::vec("[a-z]{1,8}", 0..12)) {
        let text = words.join(" ");
        let found: Vec<&str> = segment(&text, WordBoundary::Unicode)
            .into_iter()
            .map(|span| &text[span.range()])
            .collect();
        prop_assert_eq!(found, words.iter().map(String::as_str).collect::<Vec<_>>());
    }
}
