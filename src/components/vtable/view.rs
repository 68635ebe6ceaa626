//! VTableView - GPUI Rendering of a Render Window
//!
//! Draws the rows the engine materialized between two spacer columns and
//! feeds scroll offsets, viewport size, keys and clicks back into it.

use std::future::Future;
use std::rc::Rc;
use std::sync::Arc;

use gpui::{
    div, img, point, prelude::*, px, relative, AnyElement, Context, FocusHandle, Focusable,
    FontWeight, Image, ImageFormat, InteractiveElement, IntoElement, KeyDownEvent, MouseButton,
    MouseDownEvent, ParentElement, Render, ScrollHandle, ScrollWheelEvent, SharedString, Styled,
    Window,
};

use super::binding::{IconSlot, Record, SlotBinding, SlotValue, SlotWidth};
use super::engine::{Focus, RenderedRow, WindowSnapshot};
use super::navigation::{target_for, KeyInput, Modifiers, NavigationController};
use crate::constants::BUILTIN_FOLDER_ICON;
use crate::domain::icon::{IconFormat, IconResource};
use crate::error::Result;
use crate::theme::colors::XcmdColors;

const ICON_SIZE: f32 = 16.0;
const HEADER_HEIGHT: f32 = 26.0;

/// Convert a GPUI keystroke into a key press
pub fn key_input(keystroke: &gpui::Keystroke) -> KeyInput {
    let m = &keystroke.modifiers;
    KeyInput::parse(
        &keystroke.key,
        Modifiers {
            control: m.control,
            alt: m.alt,
            shift: m.shift,
            platform: m.platform,
        },
    )
}

/// Virtualized table view
pub struct VTableView<T> {
    navigation: NavigationController<T>,
    focus_handle: FocusHandle,
    scroll_handle: ScrollHandle,
    /// Engine scroll revision last applied to the scroll handle
    synced_revision: u64,
    /// Scroll offset last reported to the engine
    reported_offset: f64,
    viewport_height: f64,
    show_header: bool,
    /// Whether the view takes keyboard focus itself
    focusable: bool,
    on_activate: Option<Rc<dyn Fn()>>,
}

impl<T> VTableView<T>
where
    T: Record + Clone + Send + Sync + 'static,
{
    pub fn new(navigation: NavigationController<T>, cx: &mut Context<Self>) -> Self {
        let reported_offset = navigation.window().snapshot().scroll_top;
        Self {
            navigation,
            focus_handle: cx.focus_handle(),
            scroll_handle: ScrollHandle::new(),
            synced_revision: 0,
            reported_offset,
            viewport_height: 0.0,
            show_header: false,
            focusable: true,
            on_activate: None,
        }
    }

    /// Show a header row with the slot labels
    pub fn with_header(mut self) -> Self {
        self.show_header = true;
        self
    }

    /// Leave keyboard focus to an enclosing view
    pub fn passive(mut self) -> Self {
        self.focusable = false;
        self
    }

    /// Called before a key or click is handled
    pub fn on_activate(mut self, f: impl Fn() + 'static) -> Self {
        self.on_activate = Some(Rc::new(f));
        self
    }

    pub fn navigation(&self) -> &NavigationController<T> {
        &self.navigation
    }

    /// Take keyboard focus and restore the active row
    pub fn focus(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        if self.focusable {
            window.focus(&self.focus_handle);
        }
        let nav = self.navigation.clone();
        self.run(async move { nav.window().focus().await.map(drop) }, cx);
    }

    /// Run an engine operation, then redraw and resolve pending icons
    pub fn run<F>(&self, op: F, cx: &mut Context<Self>)
    where
        F: Future<Output = Result<()>> + 'static,
    {
        let window = self.navigation.window().clone();
        cx.spawn(async move |this, cx| {
            if let Err(e) = op.await {
                tracing::warn!("Table operation failed: {}", e);
            }
            let _ = this.update(cx, |_, cx| cx.notify());

            match window.load_pending_icons().await {
                Ok(0) => {}
                Ok(swapped) => {
                    tracing::trace!(swapped, "Icons resolved");
                    let _ = this.update(cx, |_, cx| cx.notify());
                }
                Err(e) => tracing::debug!("Icon resolution failed: {}", e),
            }
        })
        .detach();
    }

    fn activate(&self) {
        if let Some(f) = &self.on_activate {
            f();
        }
    }

    /// Push the engine's scroll offset into the handle, or report the
    /// user's scrolling and resizing to the engine
    fn sync_viewport(&mut self, snapshot: &WindowSnapshot<T>, cx: &mut Context<Self>) {
        let height = f64::from(f32::from(self.scroll_handle.bounds().size.height));
        let resized = height > 0.0 && (height - self.viewport_height).abs() > 0.5;
        if resized {
            self.viewport_height = height;
            self.navigation.window().resize(height);
        }

        if snapshot.scroll_revision != self.synced_revision {
            self.synced_revision = snapshot.scroll_revision;
            self.reported_offset = snapshot.scroll_top;
            self.scroll_handle
                .set_offset(point(px(0.0), px(-(snapshot.scroll_top as f32))));
            if resized {
                let window = self.navigation.window().clone();
                self.run(async move { window.populate().await.map(drop) }, cx);
            }
            return;
        }

        let offset = -f64::from(f32::from(self.scroll_handle.offset().y));
        let scrolled = (offset - self.reported_offset).abs() > 0.5;
        if scrolled {
            self.reported_offset = offset;
        }
        if scrolled || resized {
            let window = self.navigation.window().clone();
            self.run(async move { window.scroll_to(offset).await.map(drop) }, cx);
        }
    }

    fn handle_key_down(&mut self, event: &KeyDownEvent, cx: &mut Context<Self>) {
        let key = key_input(&event.keystroke);
        let window = self.navigation.window();
        let navigates = target_for(&key, window.active_index(), window.rows_per_page()).is_some();
        self.activate();
        if navigates {
            cx.stop_propagation();
        }

        let nav = self.navigation.clone();
        self.run(async move { nav.handle_key(key).await.map(drop) }, cx);
    }

    fn handle_row_mouse_down(
        &mut self,
        index: usize,
        event: &MouseDownEvent,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        if self.focusable {
            window.focus(&self.focus_handle);
        }
        self.activate();
        if event.click_count >= 2 {
            let nav = self.navigation.clone();
            self.run(async move { nav.double_click(index).await }, cx);
        } else if self.navigation.window().focus_in(index) {
            cx.notify();
        }
    }

    fn render_header(&self) -> impl IntoElement {
        let slots = self.navigation.window().template().slots();
        div()
            .h(px(HEADER_HEIGHT))
            .w_full()
            .flex()
            .flex_none()
            .items_center()
            .bg(XcmdColors::tab_strip_bg())
            .border_b_1()
            .border_color(XcmdColors::border())
            .children(slots.iter().map(|slot| {
                sized_cell(div(), slot)
                    .px_2()
                    .text_xs()
                    .font_weight(FontWeight::MEDIUM)
                    .text_color(XcmdColors::text_secondary())
                    .child(SharedString::from(slot.label.clone()))
            }))
    }

    fn render_row(
        &self,
        row: &RenderedRow<T>,
        snapshot: &WindowSnapshot<T>,
        has_focus: bool,
        cx: &mut Context<Self>,
    ) -> impl IntoElement {
        let index = row.index;
        let bg = if has_focus && snapshot.focus == Focus::Row(index) {
            Some(XcmdColors::row_focused())
        } else if index == snapshot.active_index {
            Some(XcmdColors::row_active())
        } else {
            None
        };
        let slots = self.navigation.window().template().slots();

        let mut el = div()
            .id(("vtable-row", index))
            .h(px(snapshot.row_height as f32))
            .w_full()
            .flex()
            .flex_none()
            .items_center()
            .text_sm()
            .text_color(XcmdColors::text_primary())
            .hover(|s| s.bg(XcmdColors::row_hover()))
            .on_mouse_down(
                MouseButton::Left,
                cx.listener(move |this, event: &MouseDownEvent, window, cx| {
                    this.handle_row_mouse_down(index, event, window, cx);
                }),
            );
        if let Some(bg) = bg {
            el = el.bg(bg);
        }

        el.children(slots.iter().map(|slot| {
            let cell = sized_cell(div(), slot).px_2().overflow_hidden();
            match row.slot(&slot.id) {
                Some(value) => cell.child(render_value(value)),
                None => cell,
            }
        }))
    }
}

/// Apply a slot width to a cell
fn sized_cell(cell: gpui::Div, slot: &SlotBinding) -> gpui::Div {
    match slot.width {
        SlotWidth::Fixed(w) => cell.w(px(w)).flex_none(),
        SlotWidth::Flex { min, max } => {
            let mut cell = cell.flex_1();
            if let Some(min) = min {
                cell = cell.min_w(px(min));
            }
            if let Some(max) = max {
                cell = cell.max_w(px(max));
            }
            cell
        }
        SlotWidth::Percent(p) => cell.w(relative(p / 100.0)).flex_none(),
    }
}

fn render_value(value: &SlotValue) -> AnyElement {
    match value {
        SlotValue::Text(text) => div()
            .whitespace_nowrap()
            .child(SharedString::from(text.clone()))
            .into_any_element(),
        SlotValue::Highlight(spans) => div()
            .flex()
            .whitespace_nowrap()
            .children(spans.iter().map(|span| {
                let part = div().child(SharedString::from(span.text.clone()));
                if span.bold {
                    part.font_weight(FontWeight::BOLD)
                        .text_color(XcmdColors::text_match())
                } else {
                    part
                }
            }))
            .into_any_element(),
        SlotValue::Icon(icon) => render_icon(icon),
    }
}

fn builtin_glyph(name: &str) -> &'static str {
    if name == BUILTIN_FOLDER_ICON {
        "\u{1F4C1}"
    } else {
        "\u{1F4C4}"
    }
}

fn glyph(text: &'static str) -> AnyElement {
    div().text_xs().child(text).into_any_element()
}

fn image_of(icon: &IconResource) -> Arc<Image> {
    let format = match icon.format {
        IconFormat::Png => ImageFormat::Png,
        IconFormat::Svg => ImageFormat::Svg,
    };
    Arc::new(Image::from_bytes(format, icon.bytes.to_vec()))
}

fn render_icon(icon: &IconSlot) -> AnyElement {
    match icon {
        IconSlot::Builtin(name) => glyph(builtin_glyph(name)),
        IconSlot::Cached { icon, .. } => img(image_of(icon))
            .size(px(ICON_SIZE))
            .into_any_element(),
        IconSlot::Url(url) | IconSlot::Pending { showing: url, .. } => {
            img(SharedString::from(url.clone()))
                .size(px(ICON_SIZE))
                .with_fallback(|| glyph(builtin_glyph("")))
                .into_any_element()
        }
    }
}

impl<T> Focusable for VTableView<T>
where
    T: Record + Clone + Send + Sync + 'static,
{
    fn focus_handle(&self, _cx: &gpui::App) -> FocusHandle {
        self.focus_handle.clone()
    }
}

impl<T> Render for VTableView<T>
where
    T: Record + Clone + Send + Sync + 'static,
{
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let snapshot = self.navigation.window().snapshot();
        self.sync_viewport(&snapshot, cx);

        let has_focus = !self.focusable || self.focus_handle.is_focused(window);
        let rows: Vec<AnyElement> = snapshot
            .rows
            .iter()
            .map(|row| self.render_row(row, &snapshot, has_focus, cx).into_any_element())
            .collect();
        let spacer = |extent: f64| div().w_full().flex_none().h(px(extent as f32));

        let mut body = div()
            .id("vtable-body")
            .flex_1()
            .flex()
            .flex_col()
            .overflow_y_scroll()
            .track_scroll(&self.scroll_handle)
            .on_scroll_wheel(cx.listener(|_this, _: &ScrollWheelEvent, _window, cx| {
                cx.notify();
            }))
            .children(snapshot.space_above.chunks().iter().map(|c| spacer(c.extent())))
            .children(rows)
            .children(snapshot.space_below.chunks().iter().map(|c| spacer(c.extent())));
        if self.focusable {
            body = body
                .track_focus(&self.focus_handle)
                .on_key_down(cx.listener(|this, event: &KeyDownEvent, _window, cx| {
                    this.handle_key_down(event, cx);
                }));
        }

        let mut table = div()
            .size_full()
            .flex()
            .flex_col()
            .bg(XcmdColors::pane_bg())
            .overflow_hidden();
        if self.show_header {
            table = table.child(self.render_header());
        }
        table.child(body)
    }
}
