use gpui::{
    App, AvailableSpace, Bounds, CursorStyle, Element, ElementId, Entity, Font, GlobalElementId,
    Hitbox, HitboxBehavior, Hsla, InspectorElementId, IntoElement, LayoutId, PaintQuad, Pixels,
    ShapedLine, SharedString, Style, TextAlign, Window, point, size,
};

use crate::selectable_words::state::SelectableWordsState;
use crate::utils::{
    VisibleLineInfo, build_line_runs, local_range, make_highlight_quad, multiline_height,
};

/// Leaf element that measures, wraps and paints the words of a
/// [`SelectableWordsState`].
///
/// Wrapping happens in the measure callback of `request_measured_layout`, so
/// the element's height always matches the number of visual lines at the
/// width Taffy settled on.
pub(crate) struct WordTextElement {
    pub state: Entity<SelectableWordsState>,
    pub text_color: Hsla,
    pub line_height: Pixels,
    pub font_size: Pixels,
    pub font: Font,
    pub scale_factor: f32,
    pub style: Style,
}

struct PreparedLine {
    line_index: usize,
    bounds: Bounds<Pixels>,
    shaped: ShapedLine,
    highlight: Option<PaintQuad>,
}

pub(crate) struct WordTextPrepaintState {
    lines: Vec<PreparedLine>,
    hitbox: Option<Hitbox>,
}

impl IntoElement for WordTextElement {
    type Element = Self;

    fn into_element(self) -> Self::Element {
        self
    }
}

impl Element for WordTextElement {
    type RequestLayoutState = ();
    type PrepaintState = WordTextPrepaintState;

    fn id(&self) -> Option<ElementId> {
        None
    }

    fn source_location(&self) -> Option<&'static core::panic::Location<'static>> {
        None
    }

    fn request_layout(
        &mut self,
        _id: Option<&GlobalElementId>,
        _inspector_id: Option<&InspectorElementId>,
        window: &mut Window,
        cx: &mut App,
    ) -> (LayoutId, Self::RequestLayoutState) {
        self.state.update(cx, |state, _cx| {
            state.set_render_params(
                self.font.clone(),
                self.font_size,
                self.text_color,
                self.line_height,
            );
        });

        let state = self.state.clone();
        let line_height = self.line_height;
        let scale_factor = self.scale_factor;

        let layout_id = window.request_measured_layout(self.style.clone(), {
            move |known_dimensions, available_space, window, cx| {
                let width = known_dimensions.width.or(match available_space.width {
                    AvailableSpace::Definite(x) => Some(x),
                    _ => None,
                });

                let (line_count, max_line_width) = state.update(cx, |state, _cx| {
                    let line_count = state.rewrap(width, window);
                    (line_count, state.max_line_width)
                });
                let height = multiline_height(line_height, line_count, scale_factor);

                let result_width = match (known_dimensions.width, width) {
                    (Some(known), _) => known,
                    (None, Some(width)) => window.round(max_line_width).min(width),
                    (None, None) => window.round(max_line_width),
                };
                size(result_width, height)
            }
        });

        (layout_id, ())
    }

    fn prepaint(
        &mut self,
        _id: Option<&GlobalElementId>,
        _inspector_id: Option<&InspectorElementId>,
        bounds: Bounds<Pixels>,
        _request_layout: &mut Self::RequestLayoutState,
        window: &mut Window,
        cx: &mut App,
    ) -> Self::PrepaintState {
        let (text, visual_lines, overlay, interactive) = {
            let state = self.state.read(cx);
            (
                state.text(),
                state.visual_lines.clone(),
                state.display().overlay().cloned(),
                state.is_interactive(),
            )
        };

        let mut lines = Vec::with_capacity(visual_lines.len());
        for (line_index, info) in visual_lines.iter().enumerate() {
            let line_bounds = Bounds {
                origin: point(
                    bounds.origin.x,
                    bounds.origin.y + self.line_height * line_index as f32,
                ),
                size: size(bounds.size.width, self.line_height),
            };

            let line_text: SharedString = text
                .get(info.range())
                .unwrap_or_default()
                .to_string()
                .into();
            let runs = build_line_runs(
                info.range(),
                overlay.as_ref(),
                &self.font,
                self.text_color,
            );
            let shaped = window
                .text_system()
                .shape_line(line_text, self.font_size, &runs, None);

            let highlight = overlay.as_ref().and_then(|overlay| {
                let local = local_range(&info.range(), &overlay.range())?;
                Some(make_highlight_quad(
                    line_bounds,
                    shaped.x_for_index(local.start),
                    shaped.x_for_index(local.end),
                    overlay.background_color(),
                ))
            });

            lines.push(PreparedLine {
                line_index,
                bounds: line_bounds,
                shaped,
                highlight,
            });
        }

        let hitbox = interactive.then(|| window.insert_hitbox(bounds, HitboxBehavior::Normal));

        WordTextPrepaintState { lines, hitbox }
    }

    fn paint(
        &mut self,
        _id: Option<&GlobalElementId>,
        _inspector_id: Option<&InspectorElementId>,
        bounds: Bounds<Pixels>,
        _request_layout: &mut Self::RequestLayoutState,
        prepaint: &mut Self::PrepaintState,
        window: &mut Window,
        cx: &mut App,
    ) {
        if let Some(hitbox) = &prepaint.hitbox {
            window.set_cursor_style(CursorStyle::PointingHand, hitbox);
        }

        let mut visible_lines = Vec::with_capacity(prepaint.lines.len());
        window.with_content_mask(Some(gpui::ContentMask { bounds }), |window| {
            for line in prepaint.lines.drain(..) {
                if let Some(highlight) = line.highlight {
                    window.paint_quad(highlight);
                }

                if let Err(err) = line.shaped.paint(
                    line.bounds.origin,
                    self.line_height,
                    TextAlign::Left,
                    None,
                    window,
                    cx,
                ) {
                    log::error!("failed to paint line {}: {err}", line.line_index);
                }

                visible_lines.push(VisibleLineInfo {
                    line_index: line.line_index,
                    bounds: line.bounds,
                    shaped_line: line.shaped,
                });
            }
        });

        self.state.update(cx, |state, _cx| {
            state.visible_lines_info = visible_lines;
            state.last_bounds = Some(bounds);
        });
    }
}
