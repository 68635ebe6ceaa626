//! Pane Page
//!
//! Tab strip, address bar and file table of one pane.

use std::future::Future;

use gpui::{
    div, prelude::*, px, ClickEvent, Context, Entity, Focusable, InteractiveElement, IntoElement,
    ParentElement, Render, SharedString, StatefulInteractiveElement, Styled, Subscription, Window,
};

use crate::app::navigation::{NavigationContext, PaneId};
use crate::components::primitives::{TextInput, TextInputEvent};
use crate::components::vtable::VTableView;
use crate::constants::{ADDRESS_BAR_HEIGHT, TAB_STRIP_HEIGHT};
use crate::domain::file_info::{FileInfo, ListRequest};
use crate::error::Result;
use crate::features::pane::controller::PaneController;
use crate::theme::colors::XcmdColors;

/// Pane page component
pub struct PanePage {
    controller: PaneController,
    table: Entity<VTableView<FileInfo>>,
    address_input: Entity<TextInput>,
    context: NavigationContext,
    error: Option<SharedString>,
    _subscriptions: Vec<Subscription>,
}

impl PanePage {
    pub fn new(
        controller: PaneController,
        context: NavigationContext,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> Self {
        let navigation = controller.navigation().clone();
        let activate = {
            let context = context.clone();
            let id = controller.id();
            move || context.activate(id)
        };
        let table = cx.new(|cx| {
            VTableView::new(navigation, cx)
                .with_header()
                .on_activate(activate)
        });

        let pane_id = controller.id() as u64;
        let address_input = cx.new(|cx| {
            let mut input = TextInput::new(("pane-address", pane_id), window, cx);
            input.set_placeholder("Type a path and press Enter");
            input
        });
        let subscriptions = vec![cx.subscribe_in(
            &address_input,
            window,
            |this, _input, event: &TextInputEvent, window, cx| {
                this.on_address_event(event, window, cx);
            },
        )];

        Self {
            controller,
            table,
            address_input,
            context,
            error: None,
            _subscriptions: subscriptions,
        }
    }

    pub fn id(&self) -> PaneId {
        self.controller.id()
    }

    pub fn controller(&self) -> &PaneController {
        &self.controller
    }

    /// Run a controller operation and redraw the table afterwards
    pub fn run_with<F, Fut>(&self, op: F, cx: &mut Context<Self>)
    where
        F: FnOnce(PaneController) -> Fut,
        Fut: Future<Output = Result<()>> + 'static,
    {
        let fut = op(self.controller.clone());
        self.table.update(cx, |table, cx| table.run(fut, cx));
    }

    /// List a directory; failures show in the address bar
    pub fn open(&mut self, request: ListRequest, cx: &mut Context<Self>) {
        self.error = None;
        self.run_with(
            |controller| async move { controller.open(request).await.map(drop) },
            cx,
        );
    }

    /// Take keyboard focus
    pub fn focus(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        self.context.activate(self.controller.id());
        self.table.update(cx, |table, cx| table.focus(window, cx));
        cx.notify();
    }

    pub fn set_error(&mut self, message: impl Into<SharedString>, cx: &mut Context<Self>) {
        self.error = Some(message.into());
        cx.notify();
    }

    /// Redraw after the controller changed address or tabs
    pub fn refresh(&mut self, cx: &mut Context<Self>) {
        if let Some(address) = self.controller.address() {
            self.error = None;
            self.address_input
                .update(cx, |input, cx| input.set_value(address, cx));
        }
        cx.notify();
    }

    fn on_address_event(
        &mut self,
        event: &TextInputEvent,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        match event {
            TextInputEvent::Changed => {
                if self.error.take().is_some() {
                    cx.notify();
                }
            }
            TextInputEvent::Submit(typed) => {
                let typed = typed.clone();
                self.run_with(
                    |controller| async move { controller.submit_address(&typed).await.map(drop) },
                    cx,
                );
                if self.address_input.focus_handle(cx).is_focused(window) {
                    self.focus(window, cx);
                }
            }
            TextInputEvent::Cancel => self.focus(window, cx),
        }
    }

    fn select_tab(&mut self, tab_id: u64, cx: &mut Context<Self>) {
        self.run_with(
            |controller| async move { controller.select_tab(tab_id).await.map(drop) },
            cx,
        );
    }

    fn close_tab(&mut self, tab_id: u64, cx: &mut Context<Self>) {
        self.run_with(
            |controller| async move { controller.close_tab(tab_id).await.map(drop) },
            cx,
        );
    }

    fn render_tabs(&self, cx: &mut Context<Self>) -> impl IntoElement {
        let tabs = self.controller.tabs();
        let closable = tabs.tabs.len() > 1;

        div()
            .h(px(TAB_STRIP_HEIGHT))
            .w_full()
            .flex()
            .flex_none()
            .items_end()
            .bg(XcmdColors::tab_strip_bg())
            .children(tabs.tabs.iter().map(|tab| {
                let tab_id = tab.id;
                let active = tab_id == tabs.active_tab;
                let title = SharedString::from(tab.title().to_string());

                let mut el = div()
                    .id(("pane-tab", tab_id))
                    .h_full()
                    .px_3()
                    .flex()
                    .items_center()
                    .gap_2()
                    .text_sm()
                    .cursor_pointer()
                    .border_r_1()
                    .border_color(XcmdColors::border())
                    .on_click(cx.listener(move |this, _: &ClickEvent, _window, cx| {
                        this.select_tab(tab_id, cx);
                    }))
                    .child(title);
                el = if active {
                    el.bg(XcmdColors::tab_active_bg())
                        .text_color(XcmdColors::text_primary())
                } else {
                    el.text_color(XcmdColors::text_muted())
                };
                if closable {
                    el = el.child(
                        div()
                            .id(("pane-tab-close", tab_id))
                            .text_xs()
                            .text_color(XcmdColors::text_muted())
                            .hover(|s| s.text_color(XcmdColors::text_primary()))
                            .on_click(cx.listener(move |this, _: &ClickEvent, _window, cx| {
                                cx.stop_propagation();
                                this.close_tab(tab_id, cx);
                            }))
                            .child("×"),
                    );
                }
                el
            }))
    }

    fn render_address(&self) -> impl IntoElement {
        div()
            .h(px(ADDRESS_BAR_HEIGHT))
            .w_full()
            .flex()
            .flex_none()
            .items_center()
            .gap_2()
            .px_1()
            .bg(XcmdColors::address_bg())
            .border_b_1()
            .border_color(XcmdColors::border())
            .overflow_hidden()
            .child(self.address_input.clone())
            .children(self.error.clone().map(|error| {
                div()
                    .flex_none()
                    .max_w(px(240.0))
                    .overflow_hidden()
                    .text_xs()
                    .text_color(XcmdColors::danger())
                    .child(error)
            }))
    }
}

impl Render for PanePage {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let active = self.context.active() == self.controller.id();
        let border = if active {
            XcmdColors::border_focus()
        } else {
            XcmdColors::border()
        };

        div()
            .flex_1()
            .h_full()
            .flex()
            .flex_col()
            .overflow_hidden()
            .border_1()
            .border_color(border)
            .child(self.render_tabs(cx))
            .child(self.render_address())
            .child(self.table.clone())
    }
}
