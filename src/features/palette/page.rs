//! Palette Page
//!
//! Overlay with a query line above the matching commands.

use std::sync::Arc;

use gpui::{
    div, prelude::*, px, Context, Entity, EventEmitter, FocusHandle, Focusable,
    InteractiveElement, IntoElement, KeyDownEvent, ParentElement, Render, SharedString, Styled,
    Window,
};

use crate::components::vtable::navigation::target_for;
use crate::components::vtable::view::key_input;
use crate::components::vtable::{KeyCode, VTableView};
use crate::domain::command::CommandId;
use crate::features::palette::controller::{PaletteController, PaletteEntry};
use crate::theme::colors::XcmdColors;

const PALETTE_WIDTH: f32 = 520.0;
const PALETTE_LIST_HEIGHT: f32 = 240.0;

/// What the palette asks of the workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteEvent {
    Run(CommandId),
    Dismiss,
}

/// Command palette overlay
pub struct PalettePage {
    controller: Arc<PaletteController>,
    table: Entity<VTableView<PaletteEntry>>,
    focus_handle: FocusHandle,
    query: String,
}

impl EventEmitter<PaletteEvent> for PalettePage {}

impl PalettePage {
    pub fn new(controller: Arc<PaletteController>, cx: &mut Context<Self>) -> Self {
        let navigation = controller.navigation().clone();
        let table = cx.new(|cx| VTableView::new(navigation, cx).passive());
        let page = Self {
            controller,
            table,
            focus_handle: cx.focus_handle(),
            query: String::new(),
        };
        page.filter(cx);
        page
    }

    /// Clear the query and take keyboard focus
    pub fn show(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        self.query.clear();
        self.filter(cx);
        window.focus(&self.focus_handle);
        cx.notify();
    }

    fn filter(&self, cx: &mut Context<Self>) {
        let controller = Arc::clone(&self.controller);
        let query = self.query.clone();
        self.table.update(cx, |table, cx| {
            table.run(async move { controller.set_query(query).await.map(drop) }, cx);
        });
    }

    fn handle_key_down(&mut self, event: &KeyDownEvent, cx: &mut Context<Self>) {
        let key = key_input(&event.keystroke);
        let navigation = self.controller.navigation().clone();
        let window = navigation.window();

        if target_for(&key, window.active_index(), window.rows_per_page()).is_some() {
            cx.stop_propagation();
            self.table.update(cx, |table, cx| {
                table.run(async move { navigation.handle_key(key).await.map(drop) }, cx);
            });
            return;
        }

        let m = key.modifiers;
        match key.code {
            KeyCode::Escape => cx.emit(PaletteEvent::Dismiss),
            KeyCode::Enter => {
                if let Some(command) = self.controller.selected() {
                    cx.emit(PaletteEvent::Run(command.id));
                }
            }
            KeyCode::Other(ref name) if name == "backspace" => {
                if self.query.pop().is_some() {
                    self.filter(cx);
                }
            }
            _ if !m.control && !m.platform && !m.alt => {
                if let Some(text) = event.keystroke.key_char.as_deref() {
                    self.query.push_str(text);
                    self.filter(cx);
                }
            }
            _ => return,
        }
        cx.stop_propagation();
        cx.notify();
    }
}

impl Focusable for PalettePage {
    fn focus_handle(&self, _cx: &gpui::App) -> FocusHandle {
        self.focus_handle.clone()
    }
}

impl Render for PalettePage {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let (query, color) = if self.query.is_empty() {
            ("Type a command".to_string(), XcmdColors::text_muted())
        } else {
            (self.query.clone(), XcmdColors::text_primary())
        };

        div()
            .id("palette")
            .track_focus(&self.focus_handle)
            .on_key_down(cx.listener(|this, event: &KeyDownEvent, _window, cx| {
                this.handle_key_down(event, cx);
            }))
            .w(px(PALETTE_WIDTH))
            .flex()
            .flex_col()
            .bg(XcmdColors::palette_bg())
            .border_1()
            .border_color(XcmdColors::border_focus())
            .rounded_md()
            .shadow_lg()
            .overflow_hidden()
            .child(
                div()
                    .px_3()
                    .py_2()
                    .border_b_1()
                    .border_color(XcmdColors::border())
                    .text_sm()
                    .text_color(color)
                    .child(SharedString::from(query)),
            )
            .child(div().h(px(PALETTE_LIST_HEIGHT)).child(self.table.clone()))
    }
}
