//! Headless word logic shared by the selectable words element.
//!
//! Nothing in here touches a window: segmentation, the region registry, the
//! selection overlay and the click gate are plain data, and geometry goes
//! through the [`TextLayoutHost`] trait so it can be backed by GPUI's text
//! system or by a fixed-width fake in tests.

mod gate;
mod geometry;
mod overlay;
mod segment;
mod span_index;

pub use gate::*;
pub use geometry::*;
pub use overlay::*;
pub use segment::*;
pub use span_index::*;

#[cfg(test)]
pub(crate) use geometry::test_support;
