//! Word-tappable text for GPUI: tap a word, get it highlighted and shown in a tooltip.

pub mod components;

pub mod config;

pub mod views;

mod init;
pub use init::*;

pub use gpui_word_primitives::{selectable_words, words};
