use std::sync::Arc;

use gpui::{
    Bounds, Font, Hsla, Pixels, Point, ShapedLine, SharedString, Window, WindowTextSystem,
    WrappedLine,
};
use smallvec::SmallVec;

use crate::utils::create_text_run;
use crate::words::TextLayoutHost;

/// Byte range of one visual line after wrapping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisualLineInfo {
    /// Byte offset where the visual line starts.
    pub start_offset: usize,
    /// Byte offset where the visual line ends (exclusive, before any newline).
    pub end_offset: usize,
}

impl VisualLineInfo {
    /// The line's byte range.
    pub fn range(&self) -> std::ops::Range<usize> {
        self.start_offset..self.end_offset
    }
}

/// A visual line as it was painted in the last frame.
#[derive(Clone)]
pub struct VisibleLineInfo {
    /// Index into the visual lines.
    pub line_index: usize,
    /// Where the line was painted.
    pub bounds: Bounds<Pixels>,
    /// The shaped glyphs of the line.
    pub shaped_line: ShapedLine,
}

/// Shapes text with wrapping and builds visual line info.
///
/// Returns `(visual_lines, max_line_width)`, where the width is that of the
/// widest logical line capped at `width`. Empty text still has one (empty)
/// visual line.
pub fn shape_and_build_visual_lines(
    text: &SharedString,
    width: Option<Pixels>,
    font_size: Pixels,
    font: Font,
    text_color: Hsla,
    window: &Window,
) -> (Vec<VisualLineInfo>, Pixels) {
    let mut visual_lines = Vec::new();

    if text.is_empty() {
        visual_lines.push(VisualLineInfo {
            start_offset: 0,
            end_offset: 0,
        });
        return (visual_lines, Pixels::ZERO);
    }

    let run = create_text_run(font, text_color, text.len());

    let wrapped_lines: SmallVec<[WrappedLine; 1]> = window
        .text_system()
        .shape_text(text.clone(), font_size, &[run], width, None)
        .unwrap_or_default();

    let mut text_offset = 0;
    for wrapped_line in &wrapped_lines {
        let line_len = wrapped_line.len();
        build_visual_lines_from_wrap_boundaries(
            &mut visual_lines,
            wrapped_line,
            text_offset,
            line_len,
        );
        text_offset += line_len + 1;
    }

    let max_line_width = wrapped_lines
        .iter()
        .map(|line| line.unwrapped_layout.width)
        .fold(Pixels::ZERO, |a, b| if b > a { b } else { a });
    let max_line_width = width.map_or(max_line_width, |width| max_line_width.min(width));

    (visual_lines, max_line_width)
}

/// Appends one [`VisualLineInfo`] per wrap segment of `wrapped_line`.
pub fn build_visual_lines_from_wrap_boundaries(
    visual_lines: &mut Vec<VisualLineInfo>,
    wrapped_line: &WrappedLine,
    text_offset: usize,
    line_len: usize,
) {
    let layout = &wrapped_line.unwrapped_layout;
    let mut segment_start = 0;

    for boundary in &wrapped_line.wrap_boundaries {
        let boundary_ix = layout
            .runs
            .get(boundary.run_ix)
            .and_then(|run| run.glyphs.get(boundary.glyph_ix))
            .map_or(line_len, |glyph| glyph.index);

        visual_lines.push(VisualLineInfo {
            start_offset: text_offset + segment_start,
            end_offset: text_offset + boundary_ix,
        });
        segment_start = boundary_ix;
    }

    visual_lines.push(VisualLineInfo {
        start_offset: text_offset + segment_start,
        end_offset: text_offset + line_len,
    });
}

/// Index of the visual line containing `offset`. Offsets on a newline belong
/// to the line the newline terminates.
pub fn visual_line_for_offset(visual_lines: &[VisualLineInfo], offset: usize) -> usize {
    visual_lines
        .partition_point(|line| line.start_offset <= offset)
        .saturating_sub(1)
}

/// Byte offset of the glyph under `position`, or `None` when the position is
/// not over any painted glyph.
pub fn index_for_position(
    position: Point<Pixels>,
    visible_lines: &[VisibleLineInfo],
    visual_lines: &[VisualLineInfo],
) -> Option<usize> {
    index_for_position_with(position, visible_lines, visual_lines, |line, x| {
        line.index_for_x(x)
    })
}

/// [`index_for_position`] with the glyph lookup inside a line supplied by
/// the caller. `index_for_x` gets an x relative to the line's left edge.
fn index_for_position_with(
    position: Point<Pixels>,
    visible_lines: &[VisibleLineInfo],
    visual_lines: &[VisualLineInfo],
    index_for_x: impl Fn(&ShapedLine, Pixels) -> Option<usize>,
) -> Option<usize> {
    let info = visible_lines
        .iter()
        .find(|info| info.bounds.contains(&position))?;
    let local_index = index_for_x(&info.shaped_line, position.x - info.bounds.left())?;
    let visual_line = visual_lines.get(info.line_index)?;
    Some(visual_line.start_offset + local_index)
}

/// [`TextLayoutHost`] backed by the window's text system and the visual lines
/// of the last layout pass.
pub struct WindowTextLayout {
    text_system: Arc<WindowTextSystem>,
    visual_lines: Vec<VisualLineInfo>,
    font: Font,
    font_size: Pixels,
}

impl WindowTextLayout {
    /// Captures what is needed to measure text outside of a paint pass.
    pub fn new(
        visual_lines: Vec<VisualLineInfo>,
        font: Font,
        font_size: Pixels,
        window: &Window,
    ) -> Self {
        Self {
            text_system: window.text_system().clone(),
            visual_lines,
            font,
            font_size,
        }
    }
}

impl TextLayoutHost for WindowTextLayout {
    fn line_for_offset(&self, offset: usize) -> usize {
        visual_line_for_offset(&self.visual_lines, offset)
    }

    fn line_start_offset(&self, line: usize) -> usize {
        self.visual_lines
            .get(line)
            .map_or(0, |info| info.start_offset)
    }

    fn measure_text_width(&self, text: &str) -> Pixels {
        if text.is_empty() {
            return Pixels::ZERO;
        }
        let run = create_text_run(self.font.clone(), Hsla::default(), text.len());
        self.text_system
            .shape_line(text.to_string().into(), self.font_size, &[run], None)
            .width
    }
}

#[cfg(test)]
mod tests {
    use gpui::{point, px, size};

    use super::*;

    fn line(start: usize, end: usize) -> VisualLineInfo {
        VisualLineInfo {
            start_offset: start,
            end_offset: end,
        }
    }

    fn painted(line_index: usize, origin: Point<Pixels>) -> VisibleLineInfo {
        VisibleLineInfo {
            line_index,
            bounds: Bounds::new(origin, size(px(200.), px(20.))),
            shaped_line: ShapedLine::default(),
        }
    }

    // Ten pixels per byte, nothing past the line's end.
    fn monospace(len: usize) -> impl Fn(&ShapedLine, Pixels) -> Option<usize> {
        move |_line, x| {
            let index = (f32::from(x) / 10.) as usize;
            (index < len).then_some(index)
        }
    }

    #[test]
    fn test_index_for_position_adds_line_start() {
        // "the cat sat on" wrapped after "the cat ", painted 40px in.
        let lines = [line(0, 8), line(8, 14)];
        let visible = [
            painted(0, point(px(40.), px(0.))),
            painted(1, point(px(40.), px(20.))),
        ];

        let at = |x: f32, y: f32| {
            index_for_position_with(point(px(x), px(y)), &visible, &lines, monospace(8))
        };
        assert_eq!(at(45., 5.), Some(0));
        assert_eq!(at(75., 5.), Some(3));
        assert_eq!(at(75., 25.), Some(11));
        assert_eq!(at(40., 21.), Some(8));
    }

    #[test]
    fn test_index_for_position_misses() {
        let lines = [line(0, 8)];
        let visible = [painted(0, point(px(0.), px(0.)))];

        let at = |x: f32, y: f32, lines: &[VisualLineInfo]| {
            index_for_position_with(point(px(x), px(y)), &visible, lines, monospace(8))
        };
        assert_eq!(at(30., 40., &lines), None, "below every painted line");
        assert_eq!(at(120., 5., &lines), None, "past the last glyph");
        assert_eq!(at(30., 5., &[]), None, "stale visual lines");
    }

    #[test]
    fn test_visual_line_for_offset_with_soft_wrap() {
        // "the cat sat" wrapped after "the cat ".
        let lines = [line(0, 8), line(8, 11)];
        assert_eq!(visual_line_for_offset(&lines, 0), 0);
        assert_eq!(visual_line_for_offset(&lines, 7), 0);
        assert_eq!(visual_line_for_offset(&lines, 8), 1);
        assert_eq!(visual_line_for_offset(&lines, 11), 1);
    }

    #[test]
    fn test_visual_line_for_offset_with_newlines() {
        // "ab\n\ncd"
        let lines = [line(0, 2), line(3, 3), line(4, 6)];
        assert_eq!(visual_line_for_offset(&lines, 2), 0, "newline ends line 0");
        assert_eq!(visual_line_for_offset(&lines, 3), 1);
        assert_eq!(visual_line_for_offset(&lines, 5), 2);
    }

    #[test]
    fn test_visual_line_for_offset_empty() {
        assert_eq!(visual_line_for_offset(&[], 5), 0);
    }
}
