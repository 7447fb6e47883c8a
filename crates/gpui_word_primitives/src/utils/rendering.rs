use std::ops::Range;

use gpui::{Bounds, Font, Hsla, PaintQuad, Pixels, TextRun, UnderlineStyle, fill, point, px};

use crate::words::SelectionOverlay;

/// Small epsilon used when comparing wrap widths so float noise in layout
/// does not trigger a rewrap on every frame.
pub const WRAP_WIDTH_EPSILON: Pixels = px(1.5);

/// Whether wrapping at `new` could differ from wrapping at `old`.
pub fn wrap_width_changed(old: Option<Pixels>, new: Option<Pixels>) -> bool {
    match (old, new) {
        (Some(old), Some(new)) => (old - new).abs() > WRAP_WIDTH_EPSILON,
        (None, None) => false,
        _ => true,
    }
}

/// Rounds a pixel value to the nearest pixel-perfect increment based on scale factor.
pub fn pixel_perfect_round(value: Pixels, scale_factor: f32) -> Pixels {
    let increment = if scale_factor >= 2.0 { 0.5 } else { 1.0 };
    let val = value.to_f64() as f32;
    px((val / increment).round() * increment)
}

/// Height of `line_count` lines, snapped to device pixels.
pub fn multiline_height(line_height: Pixels, line_count: usize, scale_factor: f32) -> Pixels {
    pixel_perfect_round(line_height * line_count as f32, scale_factor)
}

/// A plain run with no decorations.
pub fn create_text_run(font: Font, color: Hsla, len: usize) -> TextRun {
    TextRun {
        len,
        font,
        color,
        background_color: None,
        underline: None,
        strikethrough: None,
    }
}

/// Splits the visual line `line_range` into runs, recoloring and underlining
/// the part covered by `overlay`. Backgrounds are painted separately as quads.
pub fn build_line_runs(
    line_range: Range<usize>,
    overlay: Option<&SelectionOverlay>,
    font: &Font,
    text_color: Hsla,
) -> Vec<TextRun> {
    let line_len = line_range.end - line_range.start;
    let on_line = overlay.and_then(|overlay| {
        local_range(&line_range, &overlay.range()).map(|local| (overlay, local))
    });
    let Some((overlay, local)) = on_line else {
        return vec![create_text_run(font.clone(), text_color, line_len)];
    };

    let mut runs = Vec::with_capacity(3);
    if local.start > 0 {
        runs.push(create_text_run(font.clone(), text_color, local.start));
    }

    let mut selected = create_text_run(
        font.clone(),
        overlay.foreground_color(),
        local.end - local.start,
    );
    selected.underline = overlay.underline_color().map(|color| UnderlineStyle {
        thickness: px(1.),
        color: Some(color),
        wavy: false,
    });
    runs.push(selected);

    if local.end < line_len {
        runs.push(create_text_run(font.clone(), text_color, line_len - local.end));
    }
    runs
}

/// The part of `selection` that falls on the visual line `line_range`, in
/// line-local offsets.
pub fn local_range(line_range: &Range<usize>, selection: &Range<usize>) -> Option<Range<usize>> {
    let start = selection.start.max(line_range.start);
    let end = selection.end.min(line_range.end);
    (start < end).then(|| start - line_range.start..end - line_range.start)
}

/// Creates a filled quad spanning `start_x..end_x` across the full line height.
pub fn make_highlight_quad(
    bounds: Bounds<Pixels>,
    start_x: Pixels,
    end_x: Pixels,
    color: Hsla,
) -> PaintQuad {
    fill(
        Bounds::from_corners(
            point(bounds.left() + start_x, bounds.top()),
            point(bounds.left() + end_x, bounds.bottom()),
        ),
        color,
    )
}

#[cfg(test)]
mod tests {
    use gpui::{blue, font, white};

    use super::*;
    use crate::words::{DisplayText, WordBoundary, WordStyle};

    fn overlay_for(range: Range<usize>, underline: bool) -> SelectionOverlay {
        let mut display = DisplayText::attach("the cat sat on the mat", WordBoundary::Unicode);
        let style = WordStyle {
            highlight_text: blue(),
            underline,
            ..WordStyle::default()
        };
        display.select(range, &style).unwrap();
        display.overlay().cloned().unwrap()
    }

    #[test]
    fn test_runs_without_overlay_cover_line() {
        let runs = build_line_runs(0..11, None, &font("Helvetica"), white());
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].len, 11);
        assert_eq!(runs[0].color, white());
    }

    #[test]
    fn test_runs_split_around_selected_word() {
        let overlay = overlay_for(4..7, true);
        let runs = build_line_runs(0..11, Some(&overlay), &font("Helvetica"), white());

        let lens: Vec<_> = runs.iter().map(|run| run.len).collect();
        assert_eq!(lens, [4, 3, 4]);
        assert_eq!(runs[1].color, blue());
        assert!(runs[1].underline.is_some());
        assert!(runs[0].underline.is_none());
        assert_eq!(runs[2].color, white());
    }

    #[test]
    fn test_runs_ignore_overlay_on_other_line() {
        let overlay = overlay_for(15..18, false);
        let runs = build_line_runs(0..11, Some(&overlay), &font("Helvetica"), white());
        assert_eq!(runs.len(), 1);
    }

    #[test]
    fn test_runs_use_line_local_offsets() {
        let overlay = overlay_for(12..14, false);
        let runs = build_line_runs(12..22, Some(&overlay), &font("Helvetica"), white());
        let lens: Vec<_> = runs.iter().map(|run| run.len).collect();
        assert_eq!(lens, [2, 8]);
        assert_eq!(runs[0].color, blue());
        assert!(runs[0].underline.is_none());
    }

    #[test]
    fn test_local_range() {
        assert_eq!(local_range(&(10..20), &(12..15)), Some(2..5));
        assert_eq!(local_range(&(10..20), &(5..8)), None);
        assert_eq!(local_range(&(10..20), &(18..25)), Some(8..10));
        assert_eq!(local_range(&(10..20), &(20..25)), None);
    }

    #[test]
    fn test_wrap_width_changed() {
        assert!(!wrap_width_changed(Some(px(200.)), Some(px(201.))));
        assert!(wrap_width_changed(Some(px(200.)), Some(px(210.))));
        assert!(wrap_width_changed(None, Some(px(200.))));
        assert!(!wrap_width_changed(None, None));
    }

    #[test]
    fn test_multiline_height_snaps() {
        assert_eq!(multiline_height(px(10.3), 3, 1.0), px(31.));
        assert_eq!(multiline_height(px(10.3), 3, 2.0), px(31.));
    }
}
