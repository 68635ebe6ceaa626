//! TextInput Component

use gpui::{
    div, prelude::*, px, ClickEvent, Context, ElementId, EventEmitter, FocusHandle, Focusable,
    InteractiveElement, IntoElement, KeyDownEvent, ParentElement, Render, SharedString,
    StatefulInteractiveElement, Styled, Subscription, Window,
};

use crate::components::vtable::view::key_input;
use crate::components::vtable::KeyCode;
use crate::theme::colors::XcmdColors;

/// What the input reports to its owner
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextInputEvent {
    /// The value was edited
    Changed,
    /// Enter was pressed, or focus left with unsubmitted edits
    Submit(String),
    /// Escape restored the last committed value
    Cancel,
}

/// A single-line text input
pub struct TextInput {
    id: ElementId,
    value: String,
    committed: String,
    placeholder: SharedString,
    focus_handle: FocusHandle,
    _subscriptions: Vec<Subscription>,
}

impl EventEmitter<TextInputEvent> for TextInput {}

impl TextInput {
    /// Create a new text input
    pub fn new(id: impl Into<ElementId>, window: &mut Window, cx: &mut Context<Self>) -> Self {
        let focus_handle = cx.focus_handle();
        let subscriptions = vec![cx.on_blur(&focus_handle, window, |this, _window, cx| {
            if this.is_dirty() {
                this.submit(cx);
            }
        })];

        Self {
            id: id.into(),
            value: String::new(),
            committed: String::new(),
            placeholder: SharedString::default(),
            focus_handle,
            _subscriptions: subscriptions,
        }
    }

    /// Replace the value unless the user is mid-edit
    pub fn set_value(&mut self, value: impl Into<String>, cx: &mut Context<Self>) {
        let value = value.into();
        if !self.is_dirty() {
            self.value = value.clone();
        }
        self.committed = value;
        cx.notify();
    }

    pub fn set_placeholder(&mut self, placeholder: impl Into<SharedString>) {
        self.placeholder = placeholder.into();
    }

    fn is_dirty(&self) -> bool {
        self.value != self.committed
    }

    fn submit(&mut self, cx: &mut Context<Self>) {
        self.committed = self.value.clone();
        cx.emit(TextInputEvent::Submit(self.value.clone()));
        cx.notify();
    }

    fn handle_input(&mut self, text: &str, cx: &mut Context<Self>) {
        self.value.push_str(text);
        cx.emit(TextInputEvent::Changed);
        cx.notify();
    }

    fn handle_backspace(&mut self, cx: &mut Context<Self>) {
        if self.value.pop().is_some() {
            cx.emit(TextInputEvent::Changed);
            cx.notify();
        }
    }

    fn handle_key_down(&mut self, event: &KeyDownEvent, cx: &mut Context<Self>) {
        let key = key_input(&event.keystroke);
        let m = key.modifiers;
        match key.code {
            KeyCode::Enter => self.submit(cx),
            KeyCode::Escape => {
                self.value = self.committed.clone();
                cx.emit(TextInputEvent::Cancel);
                cx.notify();
            }
            KeyCode::Other(ref name) if name == "backspace" => self.handle_backspace(cx),
            _ if !m.control && !m.platform && !m.alt => {
                let Some(text) = event.keystroke.key_char.as_deref() else {
                    return;
                };
                self.handle_input(text, cx);
            }
            _ => return,
        }
        cx.stop_propagation();
    }
}

impl Focusable for TextInput {
    fn focus_handle(&self, _cx: &gpui::App) -> FocusHandle {
        self.focus_handle.clone()
    }
}

impl Render for TextInput {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let is_focused = self.focus_handle.is_focused(window);
        let border_color = if is_focused {
            XcmdColors::border_focus()
        } else {
            XcmdColors::address_bg()
        };

        let (display_text, text_color) = if self.value.is_empty() {
            (self.placeholder.clone(), XcmdColors::text_muted())
        } else {
            (
                SharedString::from(self.value.clone()),
                XcmdColors::text_secondary(),
            )
        };

        div()
            .id(self.id.clone())
            .track_focus(&self.focus_handle)
            .on_click(cx.listener(|this, _: &ClickEvent, window, _cx| {
                window.focus(&this.focus_handle);
            }))
            .on_key_down(cx.listener(|this, event: &KeyDownEvent, _window, cx| {
                this.handle_key_down(event, cx);
            }))
            .flex_1()
            .flex()
            .items_center()
            .px_1()
            .border_1()
            .border_color(border_color)
            .rounded_sm()
            .text_color(text_color)
            .text_sm()
            .overflow_hidden()
            .child(display_text)
            .when(is_focused, |el| {
                el.child(div().w(px(1.0)).h(px(14.0)).bg(XcmdColors::text_primary()))
            })
    }
}
