use std::rc::Rc;

use gpui::{App, Entity};
use gpui_word_primitives::selectable_words::{SelectableWordsState, WordPopup};

/// Registers key bindings for all components.
pub fn init(cx: &mut App) {
    gpui_word_primitives::init(cx);
}

/// Makes `popup` show every word tapped in `state`.
///
/// Replaces any listener already registered on `state`.
pub fn show_tooltips(
    state: &Entity<SelectableWordsState>,
    popup: Rc<dyn WordPopup>,
    cx: &mut App,
) {
    state.update(cx, |state, _cx| {
        state.on_word_selected(move |this, event, window, cx| {
            SelectableWordsState::request_tooltip(
                this,
                &event.word,
                event.line_number,
                event.left_offset,
                popup.clone(),
                window,
                cx,
            );
        });
    });
}
