use std::rc::Rc;

use gpui::{
    App, AppContext, Application, Bounds, Context, Entity, Menu, TitlebarOptions, Window,
    WindowBounds, WindowOptions, div, point, prelude::*, px, rgb, size,
};

use gpui_wordtip::{
    components::WordTooltip,
    config::WordTextConfig,
    selectable_words::{SelectableWords, SelectableWordsState},
    show_tooltips,
    views::Root,
};

const STYLE: &str = r##"{
    "underline": true,
    "highlight_background": "#ffe08a40",
    "highlight_text": "#ffe08a",
    "tooltip": { "width": "180px", "height": 30, "background": "#3a3550" }
}"##;

const TEXT: &str = "Tap any word in this paragraph. The tapped word is underlined and \
recolored, and a bubble with the word appears right above it. Taps that come \
in faster than once a second still move the highlight, but only the first \
one opens a bubble. Ünïcödé wörds, contractions like don't, and numbers such \
as 3.14 are single words too.";

struct Demo {
    words: Entity<SelectableWordsState>,
}

impl Render for Demo {
    fn render(&mut self, _window: &mut Window, _cx: &mut Context<Self>) -> impl IntoElement {
        div()
            .size_full()
            .bg(rgb(0x1C1A24))
            .flex()
            .flex_col()
            .justify_center()
            .items_center()
            .p(px(80.))
            .child(
                SelectableWords::new("demo-words", self.words.clone())
                    .w_full()
                    .max_w(px(460.))
                    .text_size(px(18.))
                    .line_height(px(28.))
                    .text_color(rgb(0xE8E4FF)),
            )
    }
}

fn main() {
    env_logger::init();

    Application::new()
        .with_quit_mode(gpui::QuitMode::LastWindowClosed)
        .run(|cx: &mut App| {
            gpui_wordtip::init(cx);

            cx.set_menus(vec![Menu {
                name: "Word Tooltip".into(),
                items: vec![],
            }]);

            let config = WordTextConfig::from_json(STYLE).unwrap();
            let bounds = Bounds::centered(None, size(px(620.), px(480.)), cx);

            cx.open_window(
                WindowOptions {
                    window_bounds: Some(WindowBounds::Windowed(bounds)),
                    titlebar: Some(TitlebarOptions {
                        appears_transparent: true,
                        traffic_light_position: Some(point(px(10.), px(10.))),
                        ..Default::default()
                    }),
                    ..Default::default()
                },
                move |window, cx| {
                    let words = cx.new(|cx| {
                        let mut state = SelectableWordsState::with_style(config.word_style(), cx);
                        state.set_word_boundary(config.word_boundary(), cx);
                        state.set_text(TEXT, cx);
                        state
                    });
                    show_tooltips(
                        &words,
                        Rc::new(WordTooltip::with_style(config.tooltip_style())),
                        cx,
                    );

                    let demo = cx.new(|_cx| Demo { words });
                    cx.new(|cx| Root::new(demo, window, cx))
                },
            )
            .unwrap();

            cx.activate(true);
        });
}
