//! Read-only text where each word is a tappable region.

mod elements;
mod state;

use gpui::{
    AbsoluteLength, App, CursorStyle, ElementId, Entity, Font, Hsla, InteractiveElement,
    IntoElement, KeyBinding, MouseButton, ParentElement, Pixels, Refineable, RenderOnce,
    StyleRefinement, Styled, Window, div, prelude::FluentBuilder, rgb,
};

use elements::WordTextElement;

pub use crate::utils::{VisibleLineInfo, VisualLineInfo, WindowTextLayout};
pub use state::{
    DismissWord, SelectableWordsState, TooltipAnchor, WordPopup, WordSelected,
    WordSelectedListener,
};

const KEY_CONTEXT: &str = "SelectableWords";

/// Binds Escape to [`DismissWord`] inside selectable words.
pub fn init(cx: &mut App) {
    cx.bind_keys([KeyBinding::new("escape", DismissWord, Some(KEY_CONTEXT))]);
}

/// A text element whose words can be tapped.
///
/// Tapping a word highlights it with the state's [`WordStyle`](crate::words::WordStyle)
/// and reports it to the listener registered with
/// [`SelectableWordsState::on_word_selected`].
#[derive(IntoElement)]
pub struct SelectableWords {
    id: ElementId,
    state: Entity<SelectableWordsState>,
    style: StyleRefinement,
}

impl Styled for SelectableWords {
    fn style(&mut self) -> &mut StyleRefinement {
        &mut self.style
    }
}

impl SelectableWords {
    /// Creates a new selectable words element.
    pub fn new(id: impl Into<ElementId>, state: Entity<SelectableWordsState>) -> Self {
        Self {
            id: id.into(),
            state,
            style: StyleRefinement::default(),
        }
    }
}

struct RenderParams {
    font: Font,
    font_size: Pixels,
    line_height: Pixels,
    scale_factor: f32,
    text_color: Hsla,
}

impl RenderOnce for SelectableWords {
    fn render(self, window: &mut Window, cx: &mut App) -> impl IntoElement {
        let params = self.compute_render_params(window);
        let (interactive, focus_handle) = {
            let state = self.state.read(cx);
            (state.is_interactive(), state.focus_handle.clone())
        };

        let element = WordTextElement {
            state: self.state.clone(),
            text_color: params.text_color,
            line_height: params.line_height,
            font_size: params.font_size,
            font: params.font,
            scale_factor: params.scale_factor,
            style: gpui::Style::default(),
        };

        let state = self.state.clone();
        let dismiss_state = self.state.clone();

        div()
            .id(self.id)
            .min_w_0()
            .map(|mut this| {
                this.style().refine(&self.style);
                this
            })
            .key_context(KEY_CONTEXT)
            .track_focus(&focus_handle)
            .when(interactive, |this| this.cursor(CursorStyle::PointingHand))
            .on_action(move |action: &DismissWord, window, cx| {
                dismiss_state.update(cx, |state, cx| state.dismiss_word(action, window, cx));
            })
            .on_mouse_down(MouseButton::Left, move |event, window, cx| {
                SelectableWordsState::on_mouse_down(&state, event, window, cx);
            })
            .child(element)
    }
}

impl SelectableWords {
    fn compute_render_params(&self, window: &Window) -> RenderParams {
        let text_style = &self.style.text;
        let font_size = match text_style
            .font_size
            .unwrap_or_else(|| window.text_style().font_size)
        {
            AbsoluteLength::Pixels(px) => px,
            AbsoluteLength::Rems(rems) => rems.to_pixels(window.rem_size()),
        };
        let line_height = text_style
            .line_height
            .map(|this| this.to_pixels(font_size.into(), window.rem_size()))
            .unwrap_or_else(|| window.line_height());
        let line_height = window.round(line_height);
        let font = Font {
            family: text_style
                .font_family
                .clone()
                .unwrap_or_else(|| window.text_style().font_family),
            features: text_style.font_features.clone().unwrap_or_default(),
            fallbacks: text_style.font_fallbacks.clone(),
            weight: text_style.font_weight.unwrap_or_default(),
            style: text_style.font_style.unwrap_or_default(),
        };
        let text_color = text_style.color.unwrap_or_else(|| rgb(0xE8E4FF).into());

        RenderParams {
            font,
            font_size,
            line_height,
            scale_factor: window.scale_factor(),
            text_color,
        }
    }
}
