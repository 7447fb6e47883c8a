//! Shared utilities for the selectable words element.

mod rendering;
mod wrapped_text;

pub use rendering::*;
pub use wrapped_text::*;
