use std::ops::Range;
use std::rc::Rc;

use gpui::{
    App, Bounds, Context, Entity, FocusHandle, Focusable, Font, Hsla, MouseDownEvent, Pixels,
    SharedString, Window,
};

use crate::utils::{
    VisibleLineInfo, VisualLineInfo, WindowTextLayout, index_for_position,
    shape_and_build_visual_lines, wrap_width_changed,
};
use crate::words::{
    CLICK_COOLDOWN, ClickGate, DisplayText, SelectionError, TextLayoutHost, WordBoundary,
    WordRegion, WordStyle, resolve_word_position,
};

mod actions {
    #![allow(missing_docs)]
    use gpui::actions;

    actions!(selectable_words, [DismissWord]);
}
pub use actions::*;

/// A tapped word, as reported to the listener.
#[derive(Clone, Debug, PartialEq)]
pub struct WordSelected {
    /// The word's text.
    pub word: SharedString,
    /// Byte range of the word in the displayed text.
    pub range: Range<usize>,
    /// One-based visual line the word starts on.
    pub line_number: usize,
    /// Distance from the start of that line to the middle of the word.
    pub left_offset: Pixels,
}

/// Geometry a popup needs to place itself over the widget.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TooltipAnchor {
    /// Window bounds of the text as last painted.
    pub bounds: Bounds<Pixels>,
    /// Height of one visual line.
    pub line_height: Pixels,
}

/// A popup that can be shown over a tapped word.
///
/// The widget only forwards to it. Showing, positioning and dismissing are
/// entirely up to the implementation.
pub trait WordPopup {
    /// Shows the popup for `word` on `line_number`, `left_offset` from the line start.
    fn show_at(
        &self,
        anchor: &Entity<SelectableWordsState>,
        word: &SharedString,
        line_number: usize,
        left_offset: Pixels,
        window: &mut Window,
        cx: &mut App,
    );
}

/// Callback invoked when a word is tapped, at most once per click cooldown.
pub type WordSelectedListener =
    Rc<dyn Fn(&Entity<SelectableWordsState>, &WordSelected, &mut Window, &mut App)>;

/// State of a selectable words element: the text, its word regions, the
/// selected word and the single listener and popup slots.
pub struct SelectableWordsState {
    /// Focus handle used for keyboard dismissal.
    pub focus_handle: FocusHandle,
    display: DisplayText,
    boundary: WordBoundary,
    style: WordStyle,
    interactive: bool,
    gate: ClickGate,
    listener: Option<WordSelectedListener>,
    popup: Option<Rc<dyn WordPopup>>,

    pub(crate) visual_lines: Vec<VisualLineInfo>,
    pub(crate) visible_lines_info: Vec<VisibleLineInfo>,
    pub(crate) wrap_width: Option<Pixels>,
    pub(crate) max_line_width: Pixels,
    pub(crate) needs_wrap_recompute: bool,
    pub(crate) last_bounds: Option<Bounds<Pixels>>,
    pub(crate) line_height: Option<Pixels>,
    pub(crate) last_font: Option<Font>,
    pub(crate) last_font_size: Option<Pixels>,
    pub(crate) last_text_color: Option<Hsla>,
}

impl Focusable for SelectableWordsState {
    fn focus_handle(&self, _cx: &App) -> FocusHandle {
        self.focus_handle.clone()
    }
}

impl SelectableWordsState {
    /// Creates an empty, interactive state with the default [`WordStyle`].
    pub fn new(cx: &mut Context<Self>) -> Self {
        Self {
            focus_handle: cx.focus_handle(),
            display: DisplayText::default(),
            boundary: WordBoundary::default(),
            style: WordStyle::default(),
            interactive: true,
            gate: ClickGate::new(),
            listener: None,
            popup: None,
            visual_lines: Vec::new(),
            visible_lines_info: Vec::new(),
            wrap_width: None,
            max_line_width: Pixels::ZERO,
            needs_wrap_recompute: true,
            last_bounds: None,
            line_height: None,
            last_font: None,
            last_font_size: None,
            last_text_color: None,
        }
    }

    /// Creates a state with `style` applied from the start.
    pub fn with_style(style: WordStyle, cx: &mut Context<Self>) -> Self {
        Self {
            style,
            ..Self::new(cx)
        }
    }

    /// Replaces the text, re-segments it and clears any selection.
    ///
    /// Also turns interaction back on if it was switched off.
    pub fn set_text(&mut self, text: impl Into<SharedString>, cx: &mut Context<Self>) {
        self.display = DisplayText::attach(text, self.boundary);
        self.interactive = true;
        self.invalidate_layout();
        log::trace!(
            "segmented {} bytes into {} words",
            self.display.len(),
            self.display.spans().len()
        );
        cx.notify();
    }

    /// Inserts `text` at byte offset `at` without re-segmenting.
    ///
    /// Regions and the selection move with the text; neither grows to include
    /// text inserted at its edges. Returns false when `at` is not a char boundary.
    pub fn insert_str(&mut self, at: usize, text: &str, cx: &mut Context<Self>) -> bool {
        let inserted = self.display.insert_str(at, text);
        if inserted {
            self.invalidate_layout();
            cx.notify();
        }
        inserted
    }

    /// The displayed text.
    pub fn text(&self) -> SharedString {
        self.display.text().clone()
    }

    /// The text with its word regions and selection overlay.
    pub fn display(&self) -> &DisplayText {
        &self.display
    }

    /// Iterates the clickable word regions.
    pub fn regions(&self) -> impl Iterator<Item = WordRegion> + '_ {
        self.display.spans().iter()
    }

    /// Changes the word boundary rule and re-segments the current text.
    pub fn set_word_boundary(&mut self, boundary: WordBoundary, cx: &mut Context<Self>) {
        if self.boundary == boundary {
            return;
        }
        self.boundary = boundary;
        self.display = DisplayText::attach(self.display.text().clone(), boundary);
        cx.notify();
    }

    /// The active word boundary rule.
    pub fn word_boundary(&self) -> WordBoundary {
        self.boundary
    }

    /// The style used for the next selection.
    pub fn style(&self) -> &WordStyle {
        &self.style
    }

    /// Replaces the selection style. Takes effect on the next selection.
    pub fn set_style(&mut self, style: WordStyle) -> &mut Self {
        self.style = style;
        self
    }

    /// Sets the background painted behind the selected word.
    pub fn set_highlight_background(&mut self, color: impl Into<Hsla>) -> &mut Self {
        self.style.highlight_background = color.into();
        self
    }

    /// Sets the text color of the selected word.
    pub fn set_highlight_text_color(&mut self, color: impl Into<Hsla>) -> &mut Self {
        self.style.highlight_text = color.into();
        self
    }

    /// Enables or disables underlining the selected word.
    pub fn set_underline(&mut self, underline: bool) -> &mut Self {
        self.style.underline = underline;
        self
    }

    /// Enables or disables word taps. [`Self::set_text`] re-enables them.
    pub fn set_interactive(&mut self, interactive: bool, cx: &mut Context<Self>) {
        self.interactive = interactive;
        cx.notify();
    }

    /// Whether taps select words.
    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// Sets the word selection listener, replacing any previous one.
    pub fn on_word_selected(
        &mut self,
        listener: impl Fn(&Entity<Self>, &WordSelected, &mut Window, &mut App) + 'static,
    ) {
        self.listener = Some(Rc::new(listener));
    }

    /// Removes the word selection listener.
    pub fn clear_listener(&mut self) {
        self.listener = None;
    }

    /// Whether a listener is registered.
    pub fn has_listener(&self) -> bool {
        self.listener.is_some()
    }

    /// The popup most recently passed to [`Self::request_tooltip`].
    pub fn popup(&self) -> Option<&Rc<dyn WordPopup>> {
        self.popup.as_ref()
    }

    /// Whether word events are currently being dropped by the click cooldown.
    pub fn is_cooling_down(&self) -> bool {
        self.gate.is_locked()
    }

    /// Highlights `range` with the current style.
    ///
    /// The previous highlight is removed first, so an out-of-range request
    /// leaves no word selected.
    pub fn select(&mut self, range: Range<usize>, cx: &mut Context<Self>) -> Result<(), SelectionError> {
        let result = self.display.select(range, &self.style);
        cx.notify();
        result
    }

    /// Highlights the word under `offset`, if there is one.
    pub fn select_word_at(&mut self, offset: usize, cx: &mut Context<Self>) -> Option<WordRegion> {
        let region = self.display.spans().region_at(offset)?;
        if let Err(err) = self.select(region.span.range(), cx) {
            log::error!("failed to highlight word: {err}");
        }
        Some(region)
    }

    /// Removes the highlight from the selected word. Does nothing when no word is selected.
    pub fn dismiss(&mut self, cx: &mut Context<Self>) {
        if self.display.dismiss() {
            cx.notify();
        }
    }

    /// Action handler for [`DismissWord`].
    pub fn dismiss_word(&mut self, _: &DismissWord, _window: &mut Window, cx: &mut Context<Self>) {
        self.dismiss(cx);
    }

    /// The selected word, if any.
    pub fn selected_word(&self) -> Option<SharedString> {
        let overlay = self.display.overlay()?;
        let word = self.display.text().get(overlay.range())?;
        Some(word.to_string().into())
    }

    /// Where a popup should attach, once the text has been painted.
    pub fn anchor(&self) -> Option<TooltipAnchor> {
        let bounds = self.last_bounds?;
        let line_height = self.line_height?;
        Some(TooltipAnchor {
            bounds,
            line_height,
        })
    }

    /// Stores `popup` as the widget's popup and shows it for `word`.
    pub fn request_tooltip(
        this: &Entity<Self>,
        word: &SharedString,
        line_number: usize,
        left_offset: Pixels,
        popup: Rc<dyn WordPopup>,
        window: &mut Window,
        cx: &mut App,
    ) {
        this.update(cx, |state, _cx| state.popup = Some(popup.clone()));
        popup.show_at(this, word, line_number, left_offset, window, cx);
    }

    /// Handles a tap at byte `offset`: selects the word under it and, unless
    /// the click cooldown is running, notifies the listener.
    ///
    /// Returns true when the listener was notified.
    pub fn dispatch_tap(
        this: &Entity<Self>,
        offset: usize,
        host: &dyn TextLayoutHost,
        window: &mut Window,
        cx: &mut App,
    ) -> bool {
        let Some(event) = this.update(cx, |state, cx| state.handle_tap(offset, host, cx)) else {
            return false;
        };

        let listener = this.read(cx).listener.clone();
        if let Some(listener) = listener {
            listener(this, &event, window, cx);
        }
        true
    }

    /// Maps a left click to a byte offset through the painted lines and dispatches it.
    pub fn on_mouse_down(
        this: &Entity<Self>,
        event: &MouseDownEvent,
        window: &mut Window,
        cx: &mut App,
    ) {
        let focus_handle = this.read(cx).focus_handle.clone();
        focus_handle.focus(window, cx);

        let (offset, host) = {
            let state = this.read(cx);
            (
                index_for_position(
                    event.position,
                    &state.visible_lines_info,
                    &state.visual_lines,
                ),
                state.text_layout(window),
            )
        };
        let (Some(offset), Some(host)) = (offset, host) else {
            return;
        };

        if Self::dispatch_tap(this, offset, &host, window, cx) {
            cx.stop_propagation();
        }
    }

    fn handle_tap(
        &mut self,
        offset: usize,
        host: &dyn TextLayoutHost,
        cx: &mut Context<Self>,
    ) -> Option<WordSelected> {
        if !self.interactive || self.display.is_empty() {
            return None;
        }
        let Some(region) = self.display.spans().region_at(offset) else {
            log::debug!("tap at byte {offset} is not on a word");
            return None;
        };

        let range = region.span.range();
        if let Err(err) = self.display.select(range.clone(), &self.style) {
            log::error!("failed to highlight selected word: {err}");
        }
        cx.notify();

        let word: SharedString = self.display.word(&region)?.to_string().into();
        let position = resolve_word_position(host, self.display.text(), region.span);
        let event = WordSelected {
            word,
            range,
            line_number: position.line_number,
            left_offset: position.left_offset,
        };

        let fired = self.gate.try_fire(|| event);
        if fired.is_some() {
            self.schedule_unlock(cx);
        } else {
            log::debug!("word tap dropped during click cooldown");
        }
        fired
    }

    fn schedule_unlock(&mut self, cx: &mut Context<Self>) {
        cx.spawn(async move |this, cx| {
            cx.background_executor().timer(CLICK_COOLDOWN).await;
            this.update(cx, |state, _cx| state.gate.unlock()).ok();
        })
        .detach();
    }

    fn invalidate_layout(&mut self) {
        self.needs_wrap_recompute = true;
        self.visual_lines.clear();
        self.visible_lines_info.clear();
        self.max_line_width = Pixels::ZERO;
    }

    pub(crate) fn set_render_params(
        &mut self,
        font: Font,
        font_size: Pixels,
        text_color: Hsla,
        line_height: Pixels,
    ) {
        if self.last_font.as_ref() != Some(&font) || self.last_font_size != Some(font_size) {
            self.needs_wrap_recompute = true;
        }
        self.last_font = Some(font);
        self.last_font_size = Some(font_size);
        self.last_text_color = Some(text_color);
        self.line_height = Some(line_height);
    }

    /// Wraps the text at `width` unless the cached wrapping still applies.
    /// Returns the number of visual lines.
    pub(crate) fn rewrap(&mut self, width: Option<Pixels>, window: &Window) -> usize {
        let (Some(font), Some(font_size), Some(text_color)) = (
            self.last_font.clone(),
            self.last_font_size,
            self.last_text_color,
        ) else {
            return self.visual_lines.len().max(1);
        };

        if self.needs_wrap_recompute
            || self.visual_lines.is_empty()
            || wrap_width_changed(self.wrap_width, width)
        {
            let (visual_lines, max_line_width) = shape_and_build_visual_lines(
                self.display.text(),
                width,
                font_size,
                font,
                text_color,
                window,
            );
            self.visual_lines = visual_lines;
            self.max_line_width = max_line_width;
            self.wrap_width = width;
            self.needs_wrap_recompute = false;
        }

        self.visual_lines.len().max(1)
    }

    pub(crate) fn text_layout(&self, window: &Window) -> Option<WindowTextLayout> {
        Some(WindowTextLayout::new(
            self.visual_lines.clone(),
            self.last_font.clone()?,
            self.last_font_size?,
            window,
        ))
    }
}
