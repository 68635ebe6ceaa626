//! Workspace - Dual-Pane Shell with Event Pump
//!
//! Holds both panes side by side and the command palette overlay, and pumps
//! pane events from the controllers into the views.

use std::sync::Arc;

use gpui::{
    div, prelude::*, px, Context, Entity, InteractiveElement, IntoElement, KeyDownEvent,
    ParentElement, Render, SharedString, Styled, Subscription, Window,
};

use crate::app::navigation::{NavigationContext, PaneId};
use crate::components::vtable::{IconCache, KeyCode};
use crate::components::vtable::view::key_input;
use crate::domain::command::{CommandId, PaletteCommand};
use crate::domain::config::AppConfig;
use crate::domain::file_info::ListRequest;
use crate::error::Result;
use crate::features::palette::controller::PaletteController;
use crate::features::palette::page::{PaletteEvent, PalettePage};
use crate::features::pane::controller::{PaneController, PaneEvent};
use crate::features::pane::page::PanePage;
use crate::services::Backend;
use crate::theme::colors::XcmdColors;
use crate::utils::format::truncate;

const PALETTE_VIEWPORT_HEIGHT: f64 = 240.0;
const PREVIEW_CHARS: usize = 4_000;

/// Controllers behind the workspace, built before any window exists
pub struct WorkspaceParts {
    pub context: NavigationContext,
    pub left: PaneController,
    pub right: PaneController,
    pub palette: PaletteController,
    pub events: flume::Receiver<PaneEvent>,
    pub initial: [ListRequest; 2],
}

impl WorkspaceParts {
    pub fn build(config: &AppConfig, backend: Arc<dyn Backend>) -> Result<Self> {
        let icons = IconCache::shared(config.view.icon_cache_capacity);
        let context = NavigationContext::new(PaneId::Left);
        let (event_tx, event_rx) = flume::unbounded::<PaneEvent>();

        let pane = |id: PaneId| {
            PaneController::new(
                id,
                Arc::clone(&backend),
                &config.view,
                Arc::clone(&icons),
                context.clone(),
                event_tx.clone(),
            )
        };
        let left = pane(PaneId::Left)?;
        let right = pane(PaneId::Right)?;
        let palette = PaletteController::new(
            PaletteCommand::builtin(),
            config.view.row_height,
            PALETTE_VIEWPORT_HEIGHT,
            Arc::clone(&icons),
        )?;

        let request = |path: &Option<String>| {
            path.clone().map(ListRequest::path).unwrap_or_default()
        };
        let initial = [request(&config.panes.left), request(&config.panes.right)];

        Ok(Self {
            context,
            left,
            right,
            palette,
            events: event_rx,
            initial,
        })
    }
}

/// Main workspace containing both panes
pub struct Workspace {
    context: NavigationContext,
    left: Entity<PanePage>,
    right: Entity<PanePage>,
    palette: Entity<PalettePage>,
    palette_open: bool,
    preview: Option<(SharedString, SharedString)>,
    _subscriptions: Vec<Subscription>,
}

impl Workspace {
    pub fn new(parts: WorkspaceParts, window: &mut Window, cx: &mut Context<Self>) -> Self {
        let WorkspaceParts {
            context,
            left,
            right,
            palette,
            events,
            initial: [left_request, right_request],
        } = parts;

        let left = cx.new(|cx| PanePage::new(left, context.clone(), window, cx));
        let right = cx.new(|cx| PanePage::new(right, context.clone(), window, cx));
        let palette = cx.new(|cx| PalettePage::new(Arc::new(palette), cx));

        left.update(cx, |page, cx| page.open(left_request, cx));
        right.update(cx, |page, cx| page.open(right_request, cx));
        left.update(cx, |page, cx| page.focus(window, cx));

        let subscriptions = vec![cx.subscribe_in(
            &palette,
            window,
            |this, _palette, event: &PaletteEvent, window, cx| {
                this.on_palette_event(*event, window, cx);
            },
        )];

        Self::start_event_pump(events, window, cx);

        Self {
            context,
            left,
            right,
            palette,
            palette_open: false,
            preview: None,
            _subscriptions: subscriptions,
        }
    }

    /// Start the event pump that dispatches pane events to the views
    fn start_event_pump(
        event_rx: flume::Receiver<PaneEvent>,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        cx.spawn_in(window, async move |this, cx| {
            while let Ok(event) = event_rx.recv_async().await {
                let updated = this.update_in(cx, |this, window, cx| {
                    this.dispatch_event(event, window, cx);
                });
                if updated.is_err() {
                    break;
                }
            }
        })
        .detach();
    }

    fn page(&self, pane: PaneId) -> &Entity<PanePage> {
        match pane {
            PaneId::Left => &self.left,
            PaneId::Right => &self.right,
        }
    }

    fn active_page(&self) -> Entity<PanePage> {
        self.page(self.context.active()).clone()
    }

    fn focus_pane(&mut self, pane: PaneId, window: &mut Window, cx: &mut Context<Self>) {
        self.page(pane)
            .clone()
            .update(cx, |page, cx| page.focus(window, cx));
        cx.notify();
    }

    /// Dispatch a pane event to the view it concerns
    fn dispatch_event(&mut self, event: PaneEvent, window: &mut Window, cx: &mut Context<Self>) {
        match event {
            PaneEvent::FocusPane(pane) => self.focus_pane(pane, window, cx),
            PaneEvent::OpenFile { pane, path, key } => {
                tracing::info!(%pane, ?path, %key, "Open file requested");
            }
            PaneEvent::Preview {
                pane,
                name,
                content,
            } => {
                tracing::debug!(%pane, %name, bytes = content.len(), "Preview loaded");
                let text = String::from_utf8_lossy(&content);
                self.preview = Some((name.into(), truncate(&text, PREVIEW_CHARS).into()));
                cx.notify();
            }
            PaneEvent::AddressChanged { pane, .. } | PaneEvent::TabsChanged(pane) => {
                self.page(pane).update(cx, |page, cx| page.refresh(cx));
            }
            PaneEvent::ListingFailed { pane, message } => {
                tracing::warn!(%pane, "Listing failed: {}", message);
                self.page(pane)
                    .update(cx, |page, cx| page.set_error(message, cx));
            }
        }
    }

    fn toggle_palette(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        if self.palette_open {
            self.close_palette(window, cx);
        } else {
            self.palette_open = true;
            self.palette.update(cx, |palette, cx| palette.show(window, cx));
            cx.notify();
        }
    }

    fn close_palette(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        self.palette_open = false;
        self.focus_pane(self.context.active(), window, cx);
    }

    fn on_palette_event(&mut self, event: PaletteEvent, window: &mut Window, cx: &mut Context<Self>) {
        self.close_palette(window, cx);
        if let PaletteEvent::Run(command) = event {
            self.run_command(command, window, cx);
        }
    }

    /// Run a palette command against the active pane
    fn run_command(&mut self, command: CommandId, window: &mut Window, cx: &mut Context<Self>) {
        tracing::debug!(?command, pane = %self.context.active(), "Running command");
        let page = self.active_page();
        match command {
            CommandId::FocusOtherPane => self.focus_pane(self.context.other(), window, cx),
            CommandId::NewTab => {
                page.update(cx, |page, cx| {
                    page.controller().new_tab();
                    cx.notify();
                });
            }
            CommandId::GoToParent => page.update(cx, |page, cx| {
                page.run_with(|c| async move { c.go_to_parent().await.map(drop) }, cx);
            }),
            CommandId::ReloadPane => page.update(cx, |page, cx| {
                page.run_with(|c| async move { c.reload().await.map(drop) }, cx);
            }),
            CommandId::PreviewFile => page.update(cx, |page, cx| {
                page.run_with(|c| async move { c.preview().await.map(drop) }, cx);
            }),
        }
    }

    fn handle_key_down(&mut self, event: &KeyDownEvent, window: &mut Window, cx: &mut Context<Self>) {
        let key = key_input(&event.keystroke);
        let m = key.modifiers;
        if key.code == KeyCode::Char('p') && m.control && m.shift && !m.alt {
            cx.stop_propagation();
            self.toggle_palette(window, cx);
        } else if key.code == KeyCode::Escape && self.preview.is_some() {
            self.preview = None;
            cx.notify();
        }
    }

    fn render_preview(&self) -> Option<impl IntoElement> {
        let (name, text) = self.preview.clone()?;
        Some(
            div()
                .h(px(180.0))
                .w_full()
                .flex()
                .flex_none()
                .flex_col()
                .bg(XcmdColors::address_bg())
                .border_t_1()
                .border_color(XcmdColors::border())
                .child(
                    div()
                        .px_2()
                        .py_1()
                        .text_xs()
                        .text_color(XcmdColors::text_secondary())
                        .child(name),
                )
                .child(
                    div()
                        .id("preview-content")
                        .flex_1()
                        .px_2()
                        .overflow_y_scroll()
                        .text_sm()
                        .text_color(XcmdColors::text_primary())
                        .child(text),
                ),
        )
    }
}

impl Render for Workspace {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let mut root = div()
            .size_full()
            .relative()
            .flex()
            .flex_col()
            .bg(XcmdColors::background())
            .on_key_down(cx.listener(|this, event: &KeyDownEvent, window, cx| {
                this.handle_key_down(event, window, cx);
            }))
            .child(
                div()
                    .flex_1()
                    .flex()
                    .flex_row()
                    .gap_1()
                    .overflow_hidden()
                    .child(self.left.clone())
                    .child(self.right.clone()),
            )
            .children(self.render_preview());

        if self.palette_open {
            root = root.child(
                div()
                    .absolute()
                    .top(px(48.0))
                    .left_0()
                    .right_0()
                    .flex()
                    .justify_center()
                    .child(self.palette.clone()),
            );
        }
        root
    }
}
