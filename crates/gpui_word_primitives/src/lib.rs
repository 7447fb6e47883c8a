#![warn(missing_docs)]

//! Primitive UI components built on GPUI for text whose words are tappable.

/// Word segmentation, span registry, selection overlay, click gate and geometry.
pub mod words;

/// Read-only text element where each word is an independently tappable region.
pub mod selectable_words;

mod utils;

/// Initialize all gpui_word_primitives components.
pub fn init(cx: &mut gpui::App) {
    selectable_words::init(cx);
}
