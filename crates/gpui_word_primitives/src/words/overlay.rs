use std::ops::Range;

use gpui::{Hsla, red, transparent_black};
use smallvec::SmallVec;

use super::{DisplayText, shift_range_for_insert};

/// Colors and toggles used when a word gets selected.
///
/// Changes only apply to the next selection; an overlay that is already on
/// screen keeps the colors it was built with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WordStyle {
    /// Background painted behind the selected word. Transparent by default.
    pub highlight_background: Hsla,
    /// Text color of the selected word. Red by default.
    pub highlight_text: Hsla,
    /// Whether the selected word is underlined. Off by default.
    pub underline: bool,
}

impl Default for WordStyle {
    fn default() -> Self {
        Self {
            highlight_background: transparent_black(),
            highlight_text: red(),
            underline: false,
        }
    }
}

/// What a [`Decoration`] does to the text it covers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DecorationStyle {
    /// Underline in the given color.
    Underline(Hsla),
    /// Filled background in the given color.
    Background(Hsla),
    /// Text drawn in the given color.
    Foreground(Hsla),
}

/// A visual annotation attached to a byte range of the displayed text.
#[derive(Clone, Debug, PartialEq)]
pub struct Decoration {
    /// Covered byte range.
    pub range: Range<usize>,
    /// Effect applied to the range.
    pub style: DecorationStyle,
}

/// The decorations marking the selected word. At most one exists per widget.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectionOverlay {
    underline: Option<Decoration>,
    background: Decoration,
    foreground: Decoration,
}

impl SelectionOverlay {
    fn new(range: Range<usize>, style: &WordStyle) -> Self {
        Self {
            underline: style.underline.then(|| Decoration {
                range: range.clone(),
                style: DecorationStyle::Underline(style.highlight_text),
            }),
            background: Decoration {
                range: range.clone(),
                style: DecorationStyle::Background(style.highlight_background),
            },
            foreground: Decoration {
                range,
                style: DecorationStyle::Foreground(style.highlight_text),
            },
        }
    }

    /// The byte range shared by all decorations of the overlay.
    pub fn range(&self) -> Range<usize> {
        self.foreground.range.clone()
    }

    /// Underline decoration, present only when underlining was enabled.
    pub fn underline(&self) -> Option<&Decoration> {
        self.underline.as_ref()
    }

    /// Background color decoration.
    pub fn background(&self) -> &Decoration {
        &self.background
    }

    /// Foreground color decoration.
    pub fn foreground(&self) -> &Decoration {
        &self.foreground
    }

    /// All live decorations, background first.
    pub fn decorations(&self) -> SmallVec<[&Decoration; 3]> {
        let mut decorations = SmallVec::new();
        decorations.push(&self.background);
        decorations.push(&self.foreground);
        if let Some(underline) = &self.underline {
            decorations.push(underline);
        }
        decorations
    }

    /// Underline color, if underlining.
    pub fn underline_color(&self) -> Option<Hsla> {
        match self.underline.as_ref()?.style {
            DecorationStyle::Underline(color) => Some(color),
            _ => None,
        }
    }

    /// Background color of the selected word.
    pub fn background_color(&self) -> Hsla {
        match self.background.style {
            DecorationStyle::Background(color) => color,
            _ => transparent_black(),
        }
    }

    /// Text color of the selected word.
    pub fn foreground_color(&self) -> Hsla {
        match self.foreground.style {
            DecorationStyle::Foreground(color) => color,
            _ => red(),
        }
    }

    pub(super) fn shift_for_insert(&mut self, at: usize, len: usize) {
        for decoration in [
            Some(&mut self.background),
            Some(&mut self.foreground),
            self.underline.as_mut(),
        ]
        .into_iter()
        .flatten()
        {
            decoration.range = shift_range_for_insert(decoration.range.clone(), at, len);
        }
    }
}

/// Why a selection could not be applied.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    /// The range is empty, reaches past the end of the text, or splits a character.
    #[error("selection {range:?} is out of range for text of length {len}")]
    OutOfRange {
        /// The rejected range.
        range: Range<usize>,
        /// Length of the text at the time of the attempt.
        len: usize,
    },
}

impl DisplayText {
    /// The current selection overlay, if a word is selected.
    pub fn overlay(&self) -> Option<&SelectionOverlay> {
        self.overlay.as_ref()
    }

    /// True while a word is selected.
    pub fn is_selected(&self) -> bool {
        self.overlay.is_some()
    }

    /// Moves the selection to `range`.
    ///
    /// The previous overlay is discarded before the range is checked, so a
    /// rejected range leaves nothing selected. The text itself is never
    /// modified.
    pub fn select(&mut self, range: Range<usize>, style: &WordStyle) -> Result<(), SelectionError> {
        self.overlay = None;

        let text = self.text();
        let valid = range.start < range.end
            && range.end <= text.len()
            && text.is_char_boundary(range.start)
            && text.is_char_boundary(range.end);
        if !valid {
            return Err(SelectionError::OutOfRange {
                range,
                len: text.len(),
            });
        }

        self.overlay = Some(SelectionOverlay::new(range, style));
        Ok(())
    }

    /// Removes the selection overlay. Returns whether one was present.
    pub fn dismiss(&mut self) -> bool {
        self.overlay.take().is_some()
    }
}
