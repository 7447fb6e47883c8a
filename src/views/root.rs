use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use gpui::{
    AnyElement, AnyView, App, Bounds, Context, ElementId, InteractiveElement, IntoElement,
    ParentElement, Pixels, Render, Styled, Window, div, prelude::FluentBuilder, px,
};

static NEXT_OVERLAY_ID: AtomicU64 = AtomicU64::new(0);

fn next_overlay_id() -> u64 {
    NEXT_OVERLAY_ID.fetch_add(1, Ordering::SeqCst)
}

type OverlayBuilder = Rc<dyn Fn(&mut Window, &mut App) -> AnyElement + 'static>;

/// A single overlay: where it sits and how to build its element.
pub struct OverlayEntry {
    /// Unique identifier, as returned by [`Root::add`].
    pub id: u64,
    /// Position and size of the overlay within the root.
    pub bounds: Bounds<Pixels>,
    element: OverlayBuilder,
}

/// Root is the top-level view component that renders a child view and any overlay elements.
///
/// Overlays are rendered in front of everything else, positioned absolutely
/// within the Root's bounds, and stay until they are removed.
///
/// # Example
///
/// ```ignore
/// cx.open_window(options, |window, cx| {
///     cx.new(|cx| Root::new(your_main_view, window, cx))
/// });
///
/// let root = window.root::<Root>().flatten().context("no Root")?;
/// root.update(cx, |root, cx| {
///     let id = root.add(
///         Bounds::new(point(px(100.), px(100.)), size(px(200.), px(150.))),
///         |_window, _cx| div().size_full().bg(red()).into_any_element(),
///     );
///     cx.notify();
/// });
/// ```
pub struct Root {
    view: AnyView,
    entries: Vec<OverlayEntry>,
}

impl Root {
    /// Creates a new Root with the given child view.
    pub fn new(view: impl Into<AnyView>, _window: &mut Window, _cx: &mut Context<Self>) -> Self {
        Self {
            view: view.into(),
            entries: Vec::new(),
        }
    }

    /// Adds an overlay with the specified bounds. Returns the overlay ID.
    ///
    /// `element` is called on every render until the overlay is removed.
    pub fn add(
        &mut self,
        bounds: Bounds<Pixels>,
        element: impl Fn(&mut Window, &mut App) -> AnyElement + 'static,
    ) -> u64 {
        let id = next_overlay_id();
        self.entries.push(OverlayEntry {
            id,
            bounds,
            element: Rc::new(element),
        });
        id
    }

    /// Removes an overlay by its ID. Returns true if found and removed.
    pub fn remove(&mut self, id: u64) -> bool {
        if let Some(pos) = self.entries.iter().position(|e| e.id == id) {
            self.entries.remove(pos);
            true
        } else {
            false
        }
    }

    /// Clears all overlay entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// The overlay with `id`, if it is still shown.
    pub fn overlay(&self, id: u64) -> Option<&OverlayEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Number of overlays currently shown.
    pub fn overlay_count(&self) -> usize {
        self.entries.len()
    }
}

impl Render for Root {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let builders: Vec<_> = self
            .entries
            .iter()
            .map(|entry| (entry.id, entry.bounds, entry.element.clone()))
            .collect();

        let mut overlay_elements: Vec<AnyElement> = Vec::with_capacity(builders.len());
        for (id, bounds, element) in builders {
            let element = element(window, cx);

            let overlay_div = div()
                .id(ElementId::Name(format!("overlay-item-{}", id).into()))
                .absolute()
                .top(bounds.origin.y)
                .left(bounds.origin.x)
                .w(bounds.size.width)
                .h(bounds.size.height)
                .child(element);

            overlay_elements.push(overlay_div.into_any_element());
        }

        div()
            .id("root")
            .size_full()
            .relative()
            .child(self.view.clone())
            .when(!overlay_elements.is_empty(), |this| {
                this.child(
                    div()
                        .id("root-overlay-container")
                        .absolute()
                        .top(px(0.))
                        .left(px(0.))
                        .size_full()
                        .children(overlay_elements),
                )
            })
    }
}
