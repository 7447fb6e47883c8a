use std::cell::Cell;
use std::rc::Rc;

use anyhow::Context as _;
use gpui::{
    App, Bounds, Entity, Hsla, InteractiveElement, IntoElement, ParentElement, Pixels, Point,
    SharedString, Size, Styled, WeakEntity, Window, div, point, px, rgb, size,
};
use gpui_word_primitives::selectable_words::{SelectableWordsState, TooltipAnchor, WordPopup};

use crate::views::Root;

/// Look of a [`WordTooltip`].
#[derive(Clone, Debug, PartialEq)]
pub struct WordTooltipStyle {
    /// Size of the bubble.
    pub size: Size<Pixels>,
    /// Space between the bubble and the top of the tapped line.
    pub gap: Pixels,
    /// Corner radius of the bubble.
    pub corner_radius: Pixels,
    /// Bubble fill.
    pub background: Hsla,
    /// Color of the word inside the bubble.
    pub text_color: Hsla,
}

impl Default for WordTooltipStyle {
    fn default() -> Self {
        Self {
            size: size(px(160.), px(32.)),
            gap: px(6.),
            corner_radius: px(8.),
            background: rgb(0x2B2838).into(),
            text_color: rgb(0xE8E4FF).into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ShownOverlays {
    backdrop: u64,
    bubble: u64,
}

/// Popup that shows the tapped word in a bubble above it.
///
/// The bubble lives on the window's [`Root`]. Only one bubble per tooltip is
/// shown at a time, and clicking anywhere outside it hides the bubble and
/// clears the word highlight.
#[derive(Clone, Default)]
pub struct WordTooltip {
    style: WordTooltipStyle,
    shown: Rc<Cell<Option<ShownOverlays>>>,
}

impl WordTooltip {
    /// Creates a tooltip with the default style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a tooltip with `style`.
    pub fn with_style(style: WordTooltipStyle) -> Self {
        Self {
            style,
            shown: Rc::default(),
        }
    }

    /// The tooltip's style.
    pub fn style(&self) -> &WordTooltipStyle {
        &self.style
    }

    /// Whether the bubble is currently on screen.
    pub fn is_visible(&self) -> bool {
        self.shown.get().is_some()
    }

    /// Removes the bubble, if shown.
    pub fn hide(&self, window: &mut Window, cx: &mut App) {
        remove_overlays(&self.shown, window, cx);
    }

    fn try_show(
        &self,
        anchor: &Entity<SelectableWordsState>,
        word: &SharedString,
        line_number: usize,
        left_offset: Pixels,
        window: &mut Window,
        cx: &mut App,
    ) -> anyhow::Result<()> {
        let root = window
            .root::<Root>()
            .flatten()
            .context("window root view is not a gpui_wordtip::Root")?;
        let tooltip_anchor = anchor
            .read(cx)
            .anchor()
            .context("word text has not been painted yet")?;

        let origin = bubble_origin(
            tooltip_anchor,
            line_number,
            left_offset,
            self.style.size,
            self.style.gap,
        );
        let viewport = Bounds::new(Point::default(), window.viewport_size());
        let bubble_bounds = Bounds::new(origin, self.style.size);

        let shown = self.shown.clone();
        let weak_anchor = anchor.downgrade();
        let style = self.style.clone();
        let word = word.clone();

        root.update(cx, |root, cx| {
            if let Some(previous) = shown.take() {
                root.remove(previous.backdrop);
                root.remove(previous.bubble);
            }

            let backdrop = root.add(viewport, {
                let shown = shown.clone();
                move |_window, _cx| backdrop(shown.clone(), weak_anchor.clone())
            });
            let bubble = root.add(bubble_bounds, move |_window, _cx| {
                div()
                    .size_full()
                    .flex()
                    .items_center()
                    .justify_center()
                    .rounded(style.corner_radius)
                    .bg(style.background)
                    .text_color(style.text_color)
                    .child(word.clone())
                    .into_any_element()
            });

            shown.set(Some(ShownOverlays { backdrop, bubble }));
            cx.notify();
        });

        Ok(())
    }
}

impl WordPopup for WordTooltip {
    fn show_at(
        &self,
        anchor: &Entity<SelectableWordsState>,
        word: &SharedString,
        line_number: usize,
        left_offset: Pixels,
        window: &mut Window,
        cx: &mut App,
    ) {
        if let Err(err) = self.try_show(anchor, word, line_number, left_offset, window, cx) {
            log::error!("failed to show word tooltip: {err:#}");
        }
    }
}

/// Top-left corner of a bubble of `bubble_size` centered over the word at
/// `left_offset` on the one-based `line_number`, kept inside the window.
pub fn bubble_origin(
    anchor: TooltipAnchor,
    line_number: usize,
    left_offset: Pixels,
    bubble_size: Size<Pixels>,
    gap: Pixels,
) -> Point<Pixels> {
    let line_top =
        anchor.bounds.top() + anchor.line_height * line_number.saturating_sub(1) as f32;
    let x = anchor.bounds.left() + left_offset - bubble_size.width / 2.;
    let y = line_top - bubble_size.height - gap;
    point(x.max(Pixels::ZERO), y.max(Pixels::ZERO))
}

fn backdrop(
    shown: Rc<Cell<Option<ShownOverlays>>>,
    anchor: WeakEntity<SelectableWordsState>,
) -> gpui::AnyElement {
    div()
        .id("word-tooltip-backdrop")
        .size_full()
        .on_any_mouse_down(move |_event, window, cx| {
            remove_overlays(&shown, window, cx);
            anchor.update(cx, |state, cx| state.dismiss(cx)).ok();
        })
        .into_any_element()
}

fn remove_overlays(shown: &Cell<Option<ShownOverlays>>, window: &mut Window, cx: &mut App) {
    let Some(overlays) = shown.take() else {
        return;
    };
    let Some(root) = window.root::<Root>().flatten() else {
        log::warn!("word tooltip root went away before the tooltip was hidden");
        return;
    };
    root.update(cx, |root, cx| {
        root.remove(overlays.backdrop);
        root.remove(overlays.bubble);
        cx.notify();
    });
}


#[cfg(all(test, feature = "test-support"))]
mod gpui_tests {
    use gpui::{AppContext, Context, Render, TestAppContext, VisualTestContext};

    use super::*;

    struct Blank;

    impl Render for Blank {
        fn render(&mut self, _window: &mut Window, _cx: &mut Context<Self>) -> impl IntoElement {
            div()
        }
    }

    fn painted_state(cx: &mut TestAppContext) -> Entity<SelectableWordsState> {
        cx.new(|cx| {
            let mut state = SelectableWordsState::new(cx);
            state.set_text("alpha beta", cx);
            state
        })
    }

    #[gpui::test]
    fn test_missing_root_is_not_fatal(cx: &mut TestAppContext) {
        let state = painted_state(cx);
        let tooltip = WordTooltip::new();
        let cx = cx.add_empty_window();

        cx.update(|window, cx| {
            tooltip.show_at(&state, &"beta".into(), 1, px(40.), window, cx);
        });
        assert!(!tooltip.is_visible());
    }

    #[gpui::test]
    fn test_unpainted_anchor_is_not_fatal(cx: &mut TestAppContext) {
        let state = painted_state(cx);
        let tooltip = WordTooltip::new();
        let window = cx.update(|cx| {
            cx.open_window(Default::default(), |window, cx| {
                let blank = cx.new(|_cx| Blank);
                cx.new(|cx| Root::new(blank, window, cx))
            })
            .unwrap()
        });
        let mut cx = VisualTestContext::from_window(window.into(), cx);

        cx.update(|window, cx| {
            tooltip.show_at(&state, &"beta".into(), 1, px(40.), window, cx);
        });
        assert!(!tooltip.is_visible());

        let root = window.root(&mut cx).unwrap();
        root.read_with(&cx, |root, _| assert_eq!(root.overlay_count(), 0));
    }
}
