mod word_tooltip;
pub use word_tooltip::*;
