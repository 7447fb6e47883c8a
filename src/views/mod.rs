mod root;
pub use root::{OverlayEntry, Root};
